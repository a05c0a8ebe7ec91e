use std::sync::Arc;

use chrono::Utc;
use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_gauge, CounterVec, Gauge};
use tracing::{debug, warn};

use crate::db::AnnouncementStore;

lazy_static! {
    // ── Event counters ──────────────────────────────────────────────────────
    pub static ref LOGINS_COUNTER: CounterVec = register_counter_vec!(
        "api_logins_total",
        "Login attempts by outcome",
        &["status"]
    ).unwrap();

    pub static ref ANNOUNCEMENT_MUTATIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_announcement_mutations_total",
        "Successful announcement writes by action",
        &["action"]
    ).unwrap();

    // ── Business metrics ────────────────────────────────────────────────────
    pub static ref ANNOUNCEMENTS_GAUGE: Gauge = register_gauge!(
        "announcements_total",
        "Stored announcements"
    ).unwrap();

    pub static ref ACTIVE_ANNOUNCEMENTS_GAUGE: Gauge = register_gauge!(
        "announcements_active_total",
        "Announcements currently inside their display window"
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(store: Arc<dyn AnnouncementStore>) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = collect(store.as_ref()).await {
                warn!("Metrics: collection failed: {}", e);
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
        }
    });
}

pub async fn collect(store: &dyn AnnouncementStore) -> anyhow::Result<()> {
    let all = store.list().await?;
    let now = Utc::now();
    let active = all.iter().filter(|a| a.is_active_at(now)).count();

    ANNOUNCEMENTS_GAUGE.set(all.len() as f64);
    ACTIVE_ANNOUNCEMENTS_GAUGE.set(active as f64);

    debug!("Metrics: {} announcement(s), {} active", all.len(), active);
    Ok(())
}
