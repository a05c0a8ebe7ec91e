pub mod announcements;
pub mod auth;
pub mod health;
pub mod metrics;
