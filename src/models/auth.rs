use serde::{Deserialize, Serialize};

use super::teacher::TeacherProfile;

/// Claims embedded in the JWT access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // teacher username
    pub exp: usize,
    pub iat: usize,
}

/// Extracted from a validated token whose subject still has a teacher record.
#[derive(Debug, Clone)]
pub struct AuthenticatedTeacher {
    pub username: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub teacher: TeacherProfile,
}
