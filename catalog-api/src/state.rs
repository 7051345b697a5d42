//! Application state
//!
//! Shared state for the catalog API service.

use std::sync::Arc;

use catalog_core::{BookStore, FileBookStore, StoreResult};

use crate::middleware::JwtConfig;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Book document store
    pub store: Arc<dyn BookStore>,
    /// Token verification config
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    /// Create state backed by the file store at `data_path`.
    pub async fn new(data_path: &str, jwt: JwtConfig) -> StoreResult<Self> {
        let store = Arc::new(FileBookStore::open(data_path).await?);
        Ok(Self::with_store(store, jwt))
    }

    /// Create state with a custom store.
    pub fn with_store(store: Arc<dyn BookStore>, jwt: JwtConfig) -> Self {
        Self {
            store,
            jwt: Arc::new(jwt),
        }
    }
}
