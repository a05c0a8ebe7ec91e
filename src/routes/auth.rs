use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{
        auth::{AuthenticatedTeacher, LoginRequest, LoginResponse},
        teacher::TeacherProfile,
    },
    services::auth::AuthService,
    AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    AuthService::login(
        state.teachers.as_ref(),
        &body.username,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_expiry_seconds,
    )
    .await
    .map(Json)
}

pub async fn me(teacher: AuthenticatedTeacher) -> Json<TeacherProfile> {
    Json(TeacherProfile {
        username: teacher.username,
        display_name: teacher.display_name,
    })
}
