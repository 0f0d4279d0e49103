pub mod manager;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod postgres;
pub mod seed;
pub mod store;

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::Store;

/// Store selected by configuration: PostgreSQL when a URL is set,
/// otherwise the seeded in-memory store.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
    if config.url.is_none() {
        warn!("DATABASE_URL not set; serving from the seeded in-memory store");
        return Ok(Arc::new(MemoryStore::seeded()));
    }

    let pool = DatabaseManager::connect(config).await?;
    if config.run_migrations {
        let applied = migrations::run(&pool).await?;
        info!("Migrations complete ({} applied)", applied);
    }

    Ok(Arc::new(PgStore::new(pool)))
}
