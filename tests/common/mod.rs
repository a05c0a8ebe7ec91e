#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use announcements_api::config::Config;
use announcements_api::db::MemoryStore;
use announcements_api::services::auth::AuthService;
use announcements_api::AppState;

pub const JWT_SECRET: &str = "integration-test-secret";

/// Build a test `Config` with safe defaults. The database URL is never used
/// because tests run against `MemoryStore`.
pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiry_seconds: 3600,
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = announcements_api::app(AppState::new(store.clone(), test_config()));
    (app, store)
}

/// Create a teacher with password `password123` and return a bearer token for it.
pub async fn seed_teacher(store: &MemoryStore, username: &str) -> String {
    AuthService::provision_teacher(store, username, &format!("Teacher {username}"), "password123", 4)
        .await
        .expect("teacher provisioning should succeed");
    AuthService::generate_access_token(username, JWT_SECRET, 3600)
        .expect("token generation should succeed")
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::DELETE, uri, token, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
