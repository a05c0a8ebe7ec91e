//! Create or update a teacher account.
//!
//! Usage: create-teacher --username USER --display-name NAME [--password PW]
//!   The password may also come from TEACHER_PASSWORD.

use clap::Parser;

use announcements_api::{
    db::{self, PgStore},
    services::auth::AuthService,
};

#[derive(Parser)]
#[command(name = "create-teacher", about = "Provision a teacher account for the announcements API")]
struct Args {
    /// Login name, used as the teacher's key
    #[arg(long)]
    username: String,

    /// Name shown in the UI (defaults to the username)
    #[arg(long)]
    display_name: Option<String>,

    #[arg(long, env = "TEACHER_PASSWORD", hide_env_values = true)]
    password: String,

    /// bcrypt cost factor
    #[arg(long, default_value_t = 12)]
    cost: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?;

    let pool = db::postgres::create_pool(&database_url, 2).await?;
    db::postgres::run_migrations(&pool).await?;
    let store = PgStore::new(pool);

    let display_name = args.display_name.unwrap_or_else(|| args.username.clone());
    let teacher =
        AuthService::provision_teacher(&store, &args.username, &display_name, &args.password, args.cost)
            .await?;

    tracing::info!("Teacher '{}' ready ({})", teacher.username, teacher.display_name);
    Ok(())
}
