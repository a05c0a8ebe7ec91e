use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::AnnouncementStore,
    error::{AppError, AppResult},
    models::{
        announcement::{
            parse_timestamp, Announcement, AnnouncementChanges, CreateAnnouncementRequest,
            NewAnnouncement, UpdateAnnouncementRequest,
        },
        auth::AuthenticatedTeacher,
    },
    services::metrics::ANNOUNCEMENT_MUTATIONS_COUNTER,
};

pub struct AnnouncementService;

impl AnnouncementService {
    /// Announcements whose window contains `now`, oldest first.
    pub async fn list_active(
        store: &dyn AnnouncementStore,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Announcement>> {
        let all = store.list().await?;
        Ok(filter_active(all, now))
    }

    pub async fn list_all(store: &dyn AnnouncementStore) -> AppResult<Vec<Announcement>> {
        Ok(store.list().await?)
    }

    pub async fn create(
        store: &dyn AnnouncementStore,
        teacher: &AuthenticatedTeacher,
        req: &CreateAnnouncementRequest,
        now: DateTime<Utc>,
    ) -> AppResult<Announcement> {
        req.validate()?;

        // A blank start date (e.g. an empty form field) means "no start date".
        let start_date = req
            .start_date
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(parse_date)
            .transpose()?;
        let expiration_date = parse_date(&req.expiration_date)?;

        let new = NewAnnouncement {
            message: req.message.clone(),
            start_date,
            expiration_date,
            created_by: teacher.username.clone(),
            created_at: now,
        };
        let announcement = store.insert(&new).await?;

        ANNOUNCEMENT_MUTATIONS_COUNTER.with_label_values(&["create"]).inc();
        tracing::info!(id = %announcement.id, username = %teacher.username, "announcement created");
        Ok(announcement)
    }

    /// Partial update. Checks run in order: id format, existence, field
    /// validity, then non-empty payload.
    pub async fn update(
        store: &dyn AnnouncementStore,
        teacher: &AuthenticatedTeacher,
        raw_id: &str,
        req: &UpdateAnnouncementRequest,
    ) -> AppResult<Announcement> {
        let id = parse_id(raw_id)?;

        if store.find(id).await?.is_none() {
            return Err(not_found());
        }

        req.validate()?;
        let changes = AnnouncementChanges {
            message: req.message.clone(),
            start_date: req.start_date.as_deref().map(parse_optional_date).transpose()?,
            expiration_date: req.expiration_date.as_deref().map(parse_date).transpose()?,
        };
        if changes.is_empty() {
            return Err(AppError::InvalidArgument("No fields to update".into()));
        }

        // The record can vanish between the existence check and the write.
        let announcement = store.update(id, &changes).await?.ok_or_else(not_found)?;

        ANNOUNCEMENT_MUTATIONS_COUNTER.with_label_values(&["update"]).inc();
        tracing::info!(%id, username = %teacher.username, "announcement updated");
        Ok(announcement)
    }

    pub async fn delete(
        store: &dyn AnnouncementStore,
        teacher: &AuthenticatedTeacher,
        raw_id: &str,
    ) -> AppResult<()> {
        let id = parse_id(raw_id)?;

        if !store.delete(id).await? {
            return Err(not_found());
        }

        ANNOUNCEMENT_MUTATIONS_COUNTER.with_label_values(&["delete"]).inc();
        tracing::info!(%id, username = %teacher.username, "announcement deleted");
        Ok(())
    }
}

pub fn filter_active(announcements: Vec<Announcement>, now: DateTime<Utc>) -> Vec<Announcement> {
    announcements
        .into_iter()
        .filter(|a| a.is_active_at(now))
        .collect()
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidArgument("Invalid announcement ID".into()))
}

fn parse_date(raw: &str) -> AppResult<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| AppError::InvalidArgument("Invalid date format".into()))
}

/// Blank input clears the value; anything else must parse.
fn parse_optional_date(raw: &str) -> AppResult<Option<DateTime<Utc>>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_date(raw).map(Some)
}

fn not_found() -> AppError {
    AppError::NotFound("Announcement not found".into())
}
