//! Application state shared across handlers and middleware

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::infrastructure::config::Config;

#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Implement FromRef so handlers can keep extracting `State<DatabaseConnection>`
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
