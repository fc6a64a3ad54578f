/// Shared application state
use crate::config::AppConfig;
use crate::db::ScheduleDb;

/// State handed to every request handler.
pub struct AppState {
    /// The scheduling store.
    pub db: ScheduleDb,
    /// Application configuration as loaded at startup.
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: ScheduleDb, config: AppConfig) -> Self {
        Self { db, config }
    }
}
