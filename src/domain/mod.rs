//! Domain layer - Core entities, classification and storage contracts

pub mod api_key;
pub mod error;
pub mod storage;

pub use api_key::{ApiKeyPatch, ApiKeyRecord, ApiKeyValidationError, KeyType};
pub use error::DomainError;
pub use storage::{RecordStore, StoreBackend};
