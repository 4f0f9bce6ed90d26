use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::config::Config;
use super::import::ImportContext;

/// Общее состояние обработчиков axum
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub import_ctx: Arc<ImportContext>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, import_ctx: ImportContext) -> Self {
        Self {
            db,
            config: Arc::new(config),
            import_ctx: Arc::new(import_ctx),
        }
    }
}
