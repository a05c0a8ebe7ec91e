use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::{
    error::AppError,
    models::auth::{AuthenticatedTeacher, Claims},
    AppState,
};

/// Resolves the bearer token to a teacher that still exists in the store.
impl FromRequestParts<AppState> for AuthenticatedTeacher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(AppError::unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header format".into()))?;

        let claims = decode_access_token(token, &state.config.jwt_secret).map_err(|e| {
            tracing::debug!("rejected access token: {e}");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        // A valid signature is not enough: the account must still exist.
        let teacher = state
            .teachers
            .find_teacher(&claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::warn!(username = %claims.sub, "token subject has no teacher record");
                AppError::unauthorized()
            })?;

        Ok(AuthenticatedTeacher {
            username: teacher.username,
            display_name: teacher.display_name,
        })
    }
}

pub fn decode_access_token(token: &str, secret: &str) -> Result<Claims, anyhow::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation)?;
    Ok(data.claims)
}
