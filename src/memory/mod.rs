// src/memory/mod.rs — Persistence layer

pub mod bridge;
pub mod history;
pub mod schema;
pub mod store;

use std::sync::{Arc, Mutex};

use crate::infra::config::StorageConfig;
use crate::infra::errors::PrepError;
use store::{KeyValueStore, SqliteStore};

/// Shared handle used by the controller and the results view.
pub type SharedStore = Arc<Mutex<dyn KeyValueStore>>;

/// Open the configured SQLite store.
pub fn open_store(config: &StorageConfig) -> Result<SharedStore, PrepError> {
    let path = config.resolved_db_path();
    let store = SqliteStore::open(&path)?;
    Ok(Arc::new(Mutex::new(store)))
}

/// Wrap any store for sharing.
pub fn shared<S: KeyValueStore + 'static>(store: S) -> SharedStore {
    Arc::new(Mutex::new(store))
}
