use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::{
    db::TeacherStore,
    error::{AppError, AppResult},
    models::{
        auth::{Claims, LoginResponse},
        teacher::{NewTeacher, Teacher, TeacherProfile},
    },
    services::metrics::LOGINS_COUNTER,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService;

impl AuthService {
    /// Verify a teacher's password and issue an access token.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(
        teachers: &dyn TeacherStore,
        username: &str,
        password: &str,
        jwt_secret: &str,
        ttl_seconds: u64,
    ) -> AppResult<LoginResponse> {
        let Some(teacher) = teachers.find_teacher(username).await? else {
            LOGINS_COUNTER.with_label_values(&["failure"]).inc();
            tracing::warn!(%username, "login for unknown teacher");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        let valid = bcrypt::verify(password, &teacher.password_hash).unwrap_or_else(|e| {
            tracing::error!("bcrypt verify error for {}: {}", username, e);
            false
        });
        if !valid {
            LOGINS_COUNTER.with_label_values(&["failure"]).inc();
            tracing::warn!(%username, "login with wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let access_token = Self::generate_access_token(&teacher.username, jwt_secret, ttl_seconds)?;
        LOGINS_COUNTER.with_label_values(&["success"]).inc();
        tracing::info!(username = %teacher.username, "teacher logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer",
            expires_in: ttl_seconds,
            teacher: TeacherProfile::from(teacher),
        })
    }

    pub fn generate_access_token(
        username: &str,
        secret: &str,
        ttl_seconds: u64,
    ) -> anyhow::Result<String> {
        let now = Utc::now().timestamp() as usize;
        let exp = usize::try_from(ttl_seconds)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| anyhow::anyhow!("token lifetime of {ttl_seconds}s is out of range"))?;
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Create or replace a teacher account with a freshly hashed password.
    pub async fn provision_teacher(
        teachers: &dyn TeacherStore,
        username: &str,
        display_name: &str,
        password: &str,
        cost: u32,
    ) -> anyhow::Result<Teacher> {
        if username.trim().is_empty() {
            anyhow::bail!("username must not be empty");
        }
        let password_hash = bcrypt::hash(password, cost)?;
        teachers
            .upsert_teacher(&NewTeacher {
                username: username.trim().to_string(),
                display_name: display_name.to_string(),
                password_hash,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::MemoryStore, middleware::auth::decode_access_token};

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip() {
        let token = AuthService::generate_access_token("mchen", SECRET, 60).unwrap();
        let claims = decode_access_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "mchen");
        assert_eq!(claims.exp - claims.iat, 60);

        assert!(decode_access_token(&token, "other-secret").is_err());
    }

    #[test]
    fn oversized_lifetime_is_an_error() {
        assert!(AuthService::generate_access_token("mchen", SECRET, u64::MAX).is_err());
    }

    #[tokio::test]
    async fn login_with_oversized_lifetime_is_internal_error() {
        let store = MemoryStore::new();
        AuthService::provision_teacher(&store, "mchen", "Ms. Chen", "hunter22", 4)
            .await
            .unwrap();

        let result = AuthService::login(&store, "mchen", "hunter22", SECRET, u64::MAX).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn login_checks_password() {
        let store = MemoryStore::new();
        AuthService::provision_teacher(&store, "mchen", "Ms. Chen", "hunter22", 4)
            .await
            .unwrap();

        let ok = AuthService::login(&store, "mchen", "hunter22", SECRET, 60).await.unwrap();
        assert_eq!(ok.teacher.username, "mchen");
        assert_eq!(ok.token_type, "Bearer");
        assert_eq!(decode_access_token(&ok.access_token, SECRET).unwrap().sub, "mchen");

        let wrong = AuthService::login(&store, "mchen", "nope", SECRET, 60).await;
        let unknown = AuthService::login(&store, "ghost", "hunter22", SECRET, 60).await;
        for result in [wrong, unknown] {
            match result {
                Err(AppError::Unauthorized(msg)) => assert_eq!(msg, INVALID_CREDENTIALS),
                Err(other) => panic!("unexpected error: {other:?}"),
                Ok(_) => panic!("login should fail"),
            }
        }
    }

    #[tokio::test]
    async fn provisioning_rejects_blank_username() {
        let store = MemoryStore::new();
        assert!(AuthService::provision_teacher(&store, "  ", "Nobody", "pw", 4)
            .await
            .is_err());
    }
}
