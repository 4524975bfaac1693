use std::sync::Arc;

use taxonomy_core::memory::{InMemoryCategoryStore, InMemoryUserStore};
use taxonomy_core::service::CategoryService;
use taxonomy_core::store::UserStore;
use taxonomy_db::repositories::{PgCategoryStore, PgUserStore};
use taxonomy_db::DbPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Category tree engine.
    pub categories: CategoryService,
    /// User account persistence.
    pub users: Arc<dyn UserStore>,
    /// Database pool, when running on PostgreSQL.
    pub pool: Option<DbPool>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn postgres(pool: DbPool, config: ServerConfig) -> Self {
        Self {
            categories: CategoryService::new(Arc::new(PgCategoryStore::new(pool.clone()))),
            users: Arc::new(PgUserStore::new(pool.clone())),
            pool: Some(pool),
            config: Arc::new(config),
        }
    }

    /// State backed by process-local stores. Data is lost on restart.
    pub fn in_memory(config: ServerConfig) -> Self {
        Self {
            categories: CategoryService::new(Arc::new(InMemoryCategoryStore::new())),
            users: Arc::new(InMemoryUserStore::new()),
            pool: None,
            config: Arc::new(config),
        }
    }
}
