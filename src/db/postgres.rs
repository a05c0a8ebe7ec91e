use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AnnouncementStore, TeacherStore};
use crate::models::{
    announcement::{Announcement, AnnouncementChanges, NewAnnouncement},
    teacher::{NewTeacher, Teacher},
};

pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the migrations embedded from ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// PostgreSQL-backed store for both collections.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnouncementStore for PgStore {
    async fn list(&self) -> anyhow::Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, Announcement>(
            "SELECT * FROM announcements ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, Announcement>("SELECT * FROM announcements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, new: &NewAnnouncement) -> anyhow::Result<Announcement> {
        let row = sqlx::query_as::<_, Announcement>(
            "INSERT INTO announcements (id, message, start_date, expiration_date, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.message)
        .bind(new.start_date)
        .bind(new.expiration_date)
        .bind(&new.created_by)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &AnnouncementChanges,
    ) -> anyhow::Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, Announcement>(
            "UPDATE announcements
             SET message = COALESCE($1, message),
                 start_date = CASE WHEN $2 THEN $3::timestamptz ELSE start_date END,
                 expiration_date = COALESCE($4, expiration_date)
             WHERE id = $5
             RETURNING *",
        )
        .bind(&changes.message)
        .bind(changes.start_date.is_some())
        .bind(changes.start_date.flatten())
        .bind(changes.expiration_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TeacherStore for PgStore {
    async fn find_teacher(&self, username: &str) -> anyhow::Result<Option<Teacher>> {
        let row = sqlx::query_as::<_, Teacher>("SELECT * FROM teachers WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn upsert_teacher(&self, teacher: &NewTeacher) -> anyhow::Result<Teacher> {
        let row = sqlx::query_as::<_, Teacher>(
            "INSERT INTO teachers (username, display_name, password_hash)
             VALUES ($1, $2, $3)
             ON CONFLICT (username) DO UPDATE
             SET display_name = EXCLUDED.display_name,
                 password_hash = EXCLUDED.password_hash
             RETURNING *",
        )
        .bind(&teacher.username)
        .bind(&teacher.display_name)
        .bind(&teacher.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
