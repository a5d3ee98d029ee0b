//! Store factory for per-call backend selection

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{info, warn};

use crate::config::{RemoteConfig, StorageConfig};
use crate::domain::storage::RecordStore;
use crate::domain::DomainError;

use super::file::FileStore;
use super::remote::RemoteStore;

/// Source of the record store serving the next operation
pub trait StoreSelector: Send + Sync + std::fmt::Debug {
    fn select(&self) -> Arc<dyn RecordStore>;
}

/// Factory choosing between the remote and file-backed stores
///
/// Owns the lazily-built remote connection pool; the pool is created on the
/// first remote selection and reused until `shutdown`.
#[derive(Debug)]
pub struct StoreFactory {
    remote: RemoteConfig,
    file_store: Arc<FileStore>,
    pool: OnceCell<PgPool>,
}

impl StoreFactory {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            remote: config.remote.clone(),
            file_store: Arc::new(FileStore::new(config.file_path.clone())),
            pool: OnceCell::new(),
        }
    }

    /// The file-backed store, also used as the remote read fallback
    pub fn file_store(&self) -> Arc<FileStore> {
        self.file_store.clone()
    }

    pub fn is_remote_configured(&self) -> bool {
        self.remote.is_configured()
    }

    /// Builds the remote store, constructing the pool on first use
    pub fn remote_store(&self) -> Result<RemoteStore, DomainError> {
        let pool = self.remote_pool()?;
        Ok(RemoteStore::new(pool.clone(), self.file_store.clone()))
    }

    fn remote_pool(&self) -> Result<&PgPool, DomainError> {
        let (url, credential) = self.remote.endpoint().ok_or_else(|| {
            DomainError::backend_unavailable("Remote storage endpoint or credential is not set")
        })?;

        self.pool.get_or_try_init(|| {
            let options = PgConnectOptions::from_str(url)
                .map_err(|e| {
                    DomainError::backend_unavailable(format!("Invalid remote storage URL: {}", e))
                })?
                .password(credential);

            let pool = PgPoolOptions::new()
                .max_connections(self.remote.max_connections)
                .acquire_timeout(Duration::from_secs(self.remote.acquire_timeout_secs))
                .connect_lazy_with(options);

            info!("Remote storage client initialized");
            Ok(pool)
        })
    }

    /// Prepares the active backend: the remote table, or the seeded file
    pub async fn prepare(&self) {
        if !self.is_remote_configured() {
            let path = self.file_store.path().display();
            match self.file_store.initialize().await {
                Ok(records) => {
                    info!(path = %path, count = records.len(), "Using file storage for API keys")
                }
                Err(e) => warn!(path = %path, error = %e, "File storage could not be initialized"),
            }
            return;
        }

        match self.remote_store() {
            Ok(store) => match store.ensure_table().await {
                Ok(()) => info!("Using remote storage for API keys"),
                Err(e) => warn!(error = %e, "Remote storage table could not be prepared"),
            },
            Err(e) => warn!(error = %e, "Remote storage unavailable, using file storage"),
        }
    }

    /// Closes the remote pool if one was created
    pub async fn shutdown(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            info!("Remote storage client closed");
        }
    }
}

impl StoreSelector for StoreFactory {
    fn select(&self) -> Arc<dyn RecordStore> {
        if !self.is_remote_configured() {
            return self.file_store.clone();
        }

        match self.remote_store() {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!(error = %e, "Remote storage client unavailable, using file storage");
                self.file_store.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::domain::storage::StoreBackend;

    fn config(remote: RemoteConfig) -> StorageConfig {
        StorageConfig {
            file_path: PathBuf::from("unused/api-keys.json"),
            remote,
        }
    }

    #[test]
    fn test_selects_file_store_when_unconfigured() {
        let factory = StoreFactory::new(&config(RemoteConfig::default()));

        assert!(!factory.is_remote_configured());
        assert_eq!(factory.select().backend(), StoreBackend::File);
    }

    #[test]
    fn test_selects_file_store_without_credential() {
        let mut remote = RemoteConfig::default();
        remote.url = Some("postgres://localhost/keys".to_string());
        let factory = StoreFactory::new(&config(remote));

        assert_eq!(factory.select().backend(), StoreBackend::File);
        assert!(matches!(
            factory.remote_store(),
            Err(DomainError::BackendUnavailable { .. })
        ));
    }

    #[test]
    fn test_invalid_url_falls_back_to_file_store() {
        let factory = StoreFactory::new(&config(RemoteConfig::new("not a url", "secret")));

        assert_eq!(factory.select().backend(), StoreBackend::File);
        assert!(factory.pool.get().is_none());
    }

    #[tokio::test]
    async fn test_selects_remote_store_when_configured() {
        let factory = StoreFactory::new(&config(RemoteConfig::new(
            "postgres://keyvault@localhost:5432/keyvault",
            "secret",
        )));

        assert_eq!(factory.select().backend(), StoreBackend::Remote);
        assert!(factory.pool.get().is_some());

        factory.shutdown().await;
    }

    #[tokio::test]
    async fn test_pool_is_built_once() {
        let factory = StoreFactory::new(&config(RemoteConfig::new(
            "postgres://keyvault@localhost:5432/keyvault",
            "secret",
        )));

        let first = factory.remote_pool().unwrap() as *const PgPool;
        let second = factory.remote_pool().unwrap() as *const PgPool;

        assert_eq!(first, second);
    }
}
