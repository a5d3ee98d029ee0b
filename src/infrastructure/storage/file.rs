//! File-backed record store
//!
//! The whole store is a single JSON array document. Every mutation reads the
//! full array, changes it in memory and rewrites the full array through a
//! temporary file and rename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::api_key::{sort_by_recency, ApiKeyPatch, ApiKeyRecord};
use crate::domain::storage::{RecordStore, StoreBackend};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_seed_fallback;

use super::seed::generate_seed_records;

/// JSON file record store with lazy seeding
///
/// A process-local lock serializes read-modify-write cycles. Separate
/// processes sharing the file are not coordinated.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store over the given document path; nothing is touched on disk yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored records, seeding the document first if it is unusable
    pub async fn initialize(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let _guard = self.lock.lock().await;
        self.load_or_seed().await
    }

    /// Reads the document
    ///
    /// Returns `None` when the file is missing, empty, unparseable or holds an
    /// empty array.
    async fn read_records(&self) -> Result<Option<Vec<ApiKeyRecord>>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "API key file does not exist");
                return Ok(None);
            }
            Err(e) => {
                return Err(DomainError::persistence(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        match serde_json::from_slice::<Vec<ApiKeyRecord>>(&bytes) {
            Ok(records) if records.is_empty() => Ok(None),
            Ok(records) => Ok(Some(records)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "API key file is unparseable, it will be re-seeded"
                );
                Ok(None)
            }
        }
    }

    async fn write_records(&self, records: &[ApiKeyRecord]) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::persistence(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let payload = serde_json::to_vec_pretty(records).map_err(|e| {
            DomainError::persistence(format!("Failed to serialize API keys: {}", e))
        })?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        tokio::fs::write(&temp_path, payload).await.map_err(|e| {
            DomainError::persistence(format!("Failed to write {}: {}", temp_path.display(), e))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(DomainError::persistence(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        Ok(())
    }

    /// Caller must hold `lock`
    async fn load_or_seed(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        if let Some(records) = self.read_records().await? {
            return Ok(records);
        }

        let seeds = generate_seed_records();
        self.write_records(&seeds).await?;

        info!(
            path = %self.path.display(),
            count = seeds.len(),
            "Seeded API key file"
        );

        Ok(seeds)
    }

    /// Runs one locked read-modify-write cycle
    async fn mutate<T, F>(&self, operation: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Vec<ApiKeyRecord>) -> Result<T, DomainError>,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.load_or_seed().await?;

        let result = operation(&mut records)?;

        self.write_records(&records).await?;
        Ok(result)
    }
}

#[async_trait]
impl RecordStore for FileStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::File
    }

    async fn list_all(&self) -> Vec<ApiKeyRecord> {
        let mut records = match self.initialize().await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Failed to load API key file, serving generated seed data");
                record_seed_fallback("file_io");
                generate_seed_records()
            }
        };

        sort_by_recency(&mut records);
        records
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ApiKeyRecord>, DomainError> {
        let records = self.initialize().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    async fn create(&self, record: ApiKeyRecord) -> Result<ApiKeyRecord, DomainError> {
        self.mutate(|records| {
            records.push(record.clone());
            Ok(record)
        })
        .await
    }

    async fn update(
        &self,
        id: &str,
        patch: ApiKeyPatch,
    ) -> Result<Option<ApiKeyRecord>, DomainError> {
        patch.validate()?;

        self.mutate(|records| {
            let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
                return Ok(None);
            };

            record.apply(patch)?;
            Ok(Some(record.clone()))
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        self.mutate(|records| {
            let before = records.len();
            records.retain(|r| r.id() != id);
            Ok(records.len() < before)
        })
        .await
    }

    async fn check(&self) -> Result<(), DomainError> {
        self.initialize().await.map(|_| ())
    }
}
