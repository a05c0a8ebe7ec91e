use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use announcements_api::{
    config::Config,
    db::{self, PgStore},
    services::metrics,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::postgres::create_pool(&config.database_url, config.db_max_connections).await?;
    db::postgres::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let store = Arc::new(PgStore::new(pool));
    metrics::start(store.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(store, config);
    let app = announcements_api::app(state);

    info!("announcements API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
