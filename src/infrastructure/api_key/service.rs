//! Key store facade
//!
//! Entry point for every API key operation. The backing store is chosen
//! per call, so a remote backend that becomes usable is picked up without
//! a restart.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::api_key::{ApiKeyPatch, ApiKeyRecord};
use crate::domain::storage::{RecordStore, StoreBackend};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_store_operation;
use crate::infrastructure::storage::StoreSelector;

/// Selector that always answers with the same store
#[derive(Debug)]
struct FixedStore(Arc<dyn RecordStore>);

impl StoreSelector for FixedStore {
    fn select(&self) -> Arc<dyn RecordStore> {
        self.0.clone()
    }
}

/// High-level API key operations over the selected record store
#[derive(Debug, Clone)]
pub struct KeyStore {
    selector: Arc<dyn StoreSelector>,
}

impl KeyStore {
    /// Create a key store that asks `selector` for a store on every call
    pub fn new(selector: Arc<dyn StoreSelector>) -> Self {
        Self { selector }
    }

    /// Create a key store pinned to a single store
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self::new(Arc::new(FixedStore(store)))
    }

    /// Backend that would serve the next operation
    pub fn backend(&self) -> StoreBackend {
        self.selector.select().backend()
    }

    /// List all API keys, most recently updated first
    pub async fn list_all(&self) -> Vec<ApiKeyRecord> {
        let store = self.selector.select();
        let records = store.list_all().await;

        debug!(backend = %store.backend(), count = records.len(), "Listed API keys");
        record_store_operation(store.backend(), "list", true);

        records
    }

    /// Number of stored API keys
    pub async fn count(&self) -> usize {
        self.selector.select().count().await
    }

    /// Verify the selected backend is reachable
    pub async fn check(&self) -> Result<(), DomainError> {
        let store = self.selector.select();
        let result = store.check().await;

        if let Err(ref e) = result {
            warn!(error = %e, backend = %store.backend(), "Storage check failed");
        }

        result
    }

    /// Get an API key by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<ApiKeyRecord>, DomainError> {
        let store = self.selector.select();
        let result = store.get_by_id(id).await;

        record_store_operation(store.backend(), "get", result.is_ok());
        result
    }

    /// Create a new API key
    pub async fn create(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<ApiKeyRecord, DomainError> {
        let record = ApiKeyRecord::new(name, value)?;
        let store = self.selector.select();

        info!(
            id = %record.id(),
            name = %record.name(),
            masked_value = %record.masked_value(),
            backend = %store.backend(),
            "Creating API key"
        );

        let result = store.create(record).await;
        record_store_operation(store.backend(), "create", result.is_ok());

        if let Err(ref e) = result {
            warn!(error = %e, backend = %store.backend(), "Failed to create API key");
        }

        result
    }

    /// Update the supplied fields of an API key
    ///
    /// Returns `None` when no key has the given id.
    pub async fn update(
        &self,
        id: &str,
        patch: ApiKeyPatch,
    ) -> Result<Option<ApiKeyRecord>, DomainError> {
        patch.validate()?;
        let store = self.selector.select();

        info!(
            id = %id,
            name_changed = patch.name.is_some(),
            value_changed = patch.value.is_some(),
            backend = %store.backend(),
            "Updating API key"
        );

        let result = store.update(id, patch).await;
        record_store_operation(store.backend(), "update", result.is_ok());

        match result {
            Ok(None) => {
                debug!(id = %id, "API key not found for update");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, id = %id, "Failed to update API key");
                Err(e)
            }
            ok => ok,
        }
    }

    /// Delete an API key, returns true if it existed
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let store = self.selector.select();
        info!(id = %id, backend = %store.backend(), "Deleting API key");

        let result = store.delete(id).await;
        record_store_operation(store.backend(), "delete", result.is_ok());

        if let Err(ref e) = result {
            warn!(error = %e, id = %id, "Failed to delete API key");
        }

        result
    }
}
