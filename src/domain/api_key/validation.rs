//! API key record validation utilities

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur while validating API key record input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("API key name cannot be empty")]
    EmptyName,

    #[error("API key value cannot be empty")]
    EmptyValue,
}

impl From<ApiKeyValidationError> for DomainError {
    fn from(err: ApiKeyValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Validate a record name
///
/// Whitespace-only names are rejected; the stored name is not trimmed.
pub fn validate_name(name: &str) -> Result<(), ApiKeyValidationError> {
    if name.trim().is_empty() {
        return Err(ApiKeyValidationError::EmptyName);
    }

    Ok(())
}

/// Validate a record secret value
pub fn validate_value(value: &str) -> Result<(), ApiKeyValidationError> {
    if value.trim().is_empty() {
        return Err(ApiKeyValidationError::EmptyValue);
    }

    Ok(())
}
