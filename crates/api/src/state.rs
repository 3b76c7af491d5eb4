use std::sync::Arc;

use holocron_db::store::CatalogStore;

use crate::config::ServerConfig;
use crate::directory::characters::CharacterDirectory;
use crate::directory::movies::MovieDirectory;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend; PostgreSQL in production, in-process in tests.
    pub store: Arc<dyn CatalogStore>,
    /// Server configuration (read-only after startup).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn characters(&self) -> CharacterDirectory {
        CharacterDirectory::new(Arc::clone(&self.store))
    }

    pub fn movies(&self) -> MovieDirectory {
        MovieDirectory::new(Arc::clone(&self.store))
    }
}
