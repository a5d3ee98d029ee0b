//! API key record entity and related types

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::classifier::{self, KeyType};
use super::validation::{validate_name, validate_value, ApiKeyValidationError};

/// Named API key record
///
/// Serialized with camelCase field names, which is also the on-disk layout of
/// the file-backed store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRecord {
    /// Unique identifier, assigned at creation
    id: String,
    /// Display name
    name: String,
    /// Secret key value
    value: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl ApiKeyRecord {
    /// Create a new record with a fresh id and identical timestamps
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ApiKeyValidationError> {
        let name = name.into();
        let value = value.into();
        validate_name(&name)?;
        validate_value(&value)?;

        let now = timestamp_now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            value,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a record from stored columns
    ///
    /// A missing update timestamp reports the creation time.
    pub fn from_parts(
        id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: value.into(),
            created_at,
            updated_at: updated_at.unwrap_or(created_at),
        }
    }

    // Getters

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Environment type of the secret value
    pub fn key_type(&self) -> KeyType {
        classifier::classify(&self.value)
    }

    /// Redacted display form of the secret value
    pub fn masked_value(&self) -> String {
        classifier::mask(&self.value)
    }

    /// Apply a partial update and refresh the update timestamp
    ///
    /// The timestamp is refreshed even when no field changes, and never moves
    /// backwards.
    pub fn apply(&mut self, patch: ApiKeyPatch) -> Result<(), ApiKeyValidationError> {
        patch.validate()?;

        if let Some(name) = patch.name {
            self.name = name;
        }

        if let Some(value) = patch.value {
            self.value = value;
        }

        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = timestamp_now().max(self.updated_at);
    }
}

/// Partial update of a record; `None` fields keep their prior value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiKeyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl ApiKeyPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Supplied fields must satisfy the same rules as on creation
    pub fn validate(&self) -> Result<(), ApiKeyValidationError> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }

        if let Some(ref value) = self.value {
            validate_value(value)?;
        }

        Ok(())
    }
}

/// Current time truncated to microseconds
///
/// PostgreSQL keeps microsecond precision; records are stamped at that
/// precision so a returned record equals the stored row.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Sort records most recently updated first
pub fn sort_by_recency(records: &mut [ApiKeyRecord]) {
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
