use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Record storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Location of the JSON document used when no remote backend is configured
    pub file_path: PathBuf,
    pub remote: RemoteConfig,
}

/// Remote PostgreSQL backend configuration
///
/// The backend is only used when both `url` and `credential` are set.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Database endpoint, e.g. `postgres://user@db.example.com:5432/keys`
    pub url: Option<String>,
    /// Database password
    pub credential: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("data/api-keys.json"),
            remote: RemoteConfig::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            credential: None,
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            credential: Some(credential.into()),
            ..Default::default()
        }
    }

    /// Endpoint and credential, when both are present and non-blank
    pub fn endpoint(&self) -> Option<(&str, &str)> {
        let url = self.url.as_deref().filter(|s| !s.trim().is_empty())?;
        let credential = self.credential.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((url, credential))
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint().is_some()
    }
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Load `config/default`, `config/local` and `APP__*` variables, in that order
    pub fn load() -> Result<Self, DomainError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to read configuration: {}", e)))?;

        Self::from_config(config)
    }

    fn from_config(config: config::Config) -> Result<Self, DomainError> {
        config
            .try_deserialize()
            .map_err(|e| DomainError::configuration(format!("Invalid configuration: {}", e)))
    }
}
