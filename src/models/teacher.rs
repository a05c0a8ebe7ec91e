use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Staff account. Existence of a row is what makes a caller staff.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Teacher {
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub username: String,
    pub display_name: String,
}

impl From<Teacher> for TeacherProfile {
    fn from(t: Teacher) -> Self {
        Self {
            username: t.username,
            display_name: t.display_name,
        }
    }
}
