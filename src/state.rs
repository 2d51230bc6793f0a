use std::sync::Arc;

use sqlx::SqlitePool;

use crate::scheduling::ResourceLocks;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub locks: Arc<ResourceLocks>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            locks: Arc::new(ResourceLocks::new()),
        }
    }
}
