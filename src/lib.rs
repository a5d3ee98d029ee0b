//! KeyVault
//!
//! Dashboard service for named API key records:
//! - Classification and masking of key values by environment prefix
//! - Remote PostgreSQL storage with a seeded local JSON file fallback
//! - REST endpoints and a CLI over the same key store

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::api_key::KeyStore;
use infrastructure::storage::StoreFactory;
use tracing::info;

/// Build the store factory for the configured storage and prepare its backend
pub async fn create_store_factory(config: &AppConfig) -> Arc<StoreFactory> {
    let factory = Arc::new(StoreFactory::new(&config.storage));
    factory.prepare().await;

    info!(
        remote_configured = factory.is_remote_configured(),
        "Storage initialized"
    );

    factory
}

/// Create the application state over a prepared store factory
pub fn create_app_state(factory: Arc<StoreFactory>) -> AppState {
    AppState::new(KeyStore::new(factory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::domain::StoreBackend;

    #[tokio::test]
    async fn test_app_state_without_remote_uses_seeded_file() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.file_path = dir.path().join("data").join("api-keys.json");

        let factory = create_store_factory(&config).await;
        let state = create_app_state(factory);

        assert_eq!(state.key_store.backend(), StoreBackend::File);
        assert!(config.storage.file_path.exists());
        assert_eq!(state.key_store.list_all().await.len(), 3);
    }
}
