use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{
        announcement::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
        auth::AuthenticatedTeacher,
    },
    services::announcements::AnnouncementService,
    AppState,
};

/// GET /announcements — public, only announcements inside their window.
pub async fn list_active(State(state): State<AppState>) -> AppResult<Json<Vec<Announcement>>> {
    AnnouncementService::list_active(state.announcements.as_ref(), Utc::now())
        .await
        .map(Json)
}

/// GET /announcements/all — staff view, unfiltered.
pub async fn list_all(
    State(state): State<AppState>,
    _teacher: AuthenticatedTeacher,
) -> AppResult<Json<Vec<Announcement>>> {
    AnnouncementService::list_all(state.announcements.as_ref())
        .await
        .map(Json)
}

pub async fn create_announcement(
    State(state): State<AppState>,
    teacher: AuthenticatedTeacher,
    Json(body): Json<CreateAnnouncementRequest>,
) -> AppResult<Json<Announcement>> {
    AnnouncementService::create(state.announcements.as_ref(), &teacher, &body, Utc::now())
        .await
        .map(Json)
}

pub async fn update_announcement(
    State(state): State<AppState>,
    teacher: AuthenticatedTeacher,
    Path(id): Path<String>,
    Json(body): Json<UpdateAnnouncementRequest>,
) -> AppResult<Json<Announcement>> {
    AnnouncementService::update(state.announcements.as_ref(), &teacher, &id, &body)
        .await
        .map(Json)
}

pub async fn delete_announcement(
    State(state): State<AppState>,
    teacher: AuthenticatedTeacher,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    AnnouncementService::delete(state.announcements.as_ref(), &teacher, &id).await?;
    Ok(Json(json!({ "message": "Announcement deleted successfully" })))
}
