use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Backend unavailable: {message}")]
    BackendUnavailable { message: String },

    #[error("Persistence failure: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("API key 'abc' not found");
        assert_eq!(error.to_string(), "Not found: API key 'abc' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Name is required");
        assert_eq!(error.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn test_persistence_error() {
        let error = DomainError::persistence("disk full");
        assert_eq!(error.to_string(), "Persistence failure: disk full");
    }

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("Invalid configuration: port");
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration: port"
        );
    }

    #[test]
    fn test_backend_unavailable_error() {
        let error = DomainError::backend_unavailable("no credential");
        assert_eq!(error.to_string(), "Backend unavailable: no credential");
    }
}
