pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::{AnnouncementStore, TeacherStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub announcements: Arc<dyn AnnouncementStore>,
    pub teachers: Arc<dyn TeacherStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state from a single store that holds both collections.
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: AnnouncementStore + TeacherStore + 'static,
    {
        Self {
            announcements: store.clone(),
            teachers: store,
            config: Arc::new(config),
        }
    }
}

/// Full router with CORS and request tracing. Shared by `main` and the
/// integration tests so both exercise the same stack.
pub fn app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {o}");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(AllowOrigin::list(origins));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        // Auth
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::me))
        // Announcements
        .route(
            "/announcements",
            get(routes::announcements::list_active).post(routes::announcements::create_announcement),
        )
        .route("/announcements/all", get(routes::announcements::list_all))
        .route(
            "/announcements/{id}",
            put(routes::announcements::update_announcement)
                .delete(routes::announcements::delete_announcement),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
