//! Application state shared by the HTTP handlers

use std::sync::Arc;

use crate::infrastructure::api_key::KeyStore;

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub key_store: Arc<KeyStore>,
}

impl AppState {
    pub fn new(key_store: KeyStore) -> Self {
        Self {
            key_store: Arc::new(key_store),
        }
    }
}
