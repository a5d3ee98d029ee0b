//! Record store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::api_key::{ApiKeyPatch, ApiKeyRecord};
use crate::domain::DomainError;

use super::backend::StoreBackend;

/// CRUD operations over API key records
///
/// Absence is modelled as `None`/`false`, never as an error. Listing is
/// infallible: implementations degrade to seed data instead of failing.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    /// Backend serving this store
    fn backend(&self) -> StoreBackend;

    /// Retrieves all records, most recently updated first
    async fn list_all(&self) -> Vec<ApiKeyRecord>;

    /// Retrieves a record by its id
    async fn get_by_id(&self, id: &str) -> Result<Option<ApiKeyRecord>, DomainError>;

    /// Persists a new record, returning it once durably stored
    async fn create(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, DomainError>;

    /// Applies a partial update, returns `None` if the id does not exist
    async fn update(
        &self,
        id: &str,
        patch: ApiKeyPatch,
    ) -> Result<Option<ApiKeyRecord>, DomainError>;

    /// Deletes a record by its id, returns true if it existed
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Returns the count of records
    async fn count(&self) -> usize {
        self.list_all().await.len()
    }

    /// Verifies the backend can serve requests right now
    ///
    /// Unlike `list_all`, this never degrades to fallback data.
    async fn check(&self) -> Result<(), DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::api_key::sort_by_recency;

    /// Mock record store for testing
    #[derive(Debug)]
    pub struct MockRecordStore {
        backend: StoreBackend,
        records: Mutex<HashMap<String, ApiKeyRecord>>,
        error: Mutex<Option<String>>,
    }

    impl Default for MockRecordStore {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockRecordStore {
        pub fn new() -> Self {
            Self {
                backend: StoreBackend::File,
                records: Mutex::new(HashMap::new()),
                error: Mutex::new(None),
            }
        }

        pub fn with_backend(mut self, backend: StoreBackend) -> Self {
            self.backend = backend;
            self
        }

        pub fn with_record(self, record: ApiKeyRecord) -> Self {
            self.records
                .lock()
                .unwrap()
                .insert(record.id().to_string(), record);
            self
        }

        /// Makes every fallible operation fail with a persistence error
        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::persistence(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RecordStore for MockRecordStore {
        fn backend(&self) -> StoreBackend {
            self.backend
        }

        async fn list_all(&self) -> Vec<ApiKeyRecord> {
            let mut records: Vec<ApiKeyRecord> =
                self.records.lock().unwrap().values().cloned().collect();
            sort_by_recency(&mut records);
            records
        }

        async fn get_by_id(&self, id: &str) -> Result<Option<ApiKeyRecord>, DomainError> {
            self.check_error()?;
            Ok(self.records.lock().unwrap().get(id).cloned())
        }

        async fn create(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
            self.check_error()?;
            self.records
                .lock()
                .unwrap()
                .insert(record.id().to_string(), record.clone());
            Ok(record)
        }

        async fn update(
            &self,
            id: &str,
            patch: ApiKeyPatch,
        ) -> Result<Option<ApiKeyRecord>, DomainError> {
            self.check_error()?;
            let mut records = self.records.lock().unwrap();

            let Some(record) = records.get_mut(id) else {
                return Ok(None);
            };

            record.apply(patch)?;
            Ok(Some(record.clone()))
        }

        async fn delete(&self, id: &str) -> Result<bool, DomainError> {
            self.check_error()?;
            Ok(self.records.lock().unwrap().remove(id).is_some())
        }

        async fn check(&self) -> Result<(), DomainError> {
            match self.error.lock().unwrap().clone() {
                Some(error) => Err(DomainError::backend_unavailable(error)),
                None => Ok(()),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn record(name: &str, value: &str) -> ApiKeyRecord {
            ApiKeyRecord::new(name, value).unwrap()
        }

        #[tokio::test]
        async fn test_mock_store_create_and_get() {
            let store = MockRecordStore::new();
            let created = store.create(record("Test", "dev_1")).await.unwrap();

            let fetched = store.get_by_id(created.id()).await.unwrap();
            assert_eq!(fetched, Some(created));
        }

        #[tokio::test]
        async fn test_mock_store_update_missing() {
            let store = MockRecordStore::new();

            let result = store
                .update("missing", ApiKeyPatch::new().with_name("x"))
                .await
                .unwrap();
            assert!(result.is_none());
        }

        #[tokio::test]
        async fn test_mock_store_delete() {
            let r = record("Test", "dev_1");
            let store = MockRecordStore::new().with_record(r.clone());

            assert!(store.delete(r.id()).await.unwrap());
            assert!(!store.delete(r.id()).await.unwrap());
            assert_eq!(store.count().await, 0);
        }

        #[tokio::test]
        async fn test_mock_store_with_error() {
            let store = MockRecordStore::new().with_error("Simulated failure");

            let result = store.create(record("Test", "dev_1")).await;
            assert!(matches!(result, Err(DomainError::Persistence { .. })));
            assert!(matches!(
                store.check().await,
                Err(DomainError::BackendUnavailable { .. })
            ));
        }
    }
}
