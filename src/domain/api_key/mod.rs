//! API key domain
//!
//! Record entity, input validation, and the pure classification and masking
//! helpers used when keys are displayed.

pub mod classifier;
mod entity;
mod validation;

pub use classifier::{classify, is_well_formed, mask, KeyType, MASK_LENGTH};
pub use entity::{sort_by_recency, timestamp_now, ApiKeyPatch, ApiKeyRecord};
pub use validation::{validate_name, validate_value, ApiKeyValidationError};
