//! Key type classification and masked display

use serde::{Deserialize, Serialize};

/// Number of `*` characters appended to every masked value
pub const MASK_LENGTH: usize = 30;

/// Number of leading characters kept visible for custom keys
const CUSTOM_VISIBLE_CHARS: usize = 4;

/// Environment type derived from a key's literal prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Prod,
    Stg,
    Dev,
    Custom,
}

impl KeyType {
    /// Types recognised by prefix, in match order
    const PREFIXED: [KeyType; 3] = [KeyType::Prod, KeyType::Stg, KeyType::Dev];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Stg => "stg",
            Self::Dev => "dev",
            Self::Custom => "custom",
        }
    }

    /// Literal value prefix for this type, including the underscore
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::Prod => Some("prod_"),
            Self::Stg => Some("stg_"),
            Self::Dev => Some("dev_"),
            Self::Custom => None,
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a raw key value by its exact, case-sensitive prefix
pub fn classify(value: &str) -> KeyType {
    KeyType::PREFIXED
        .into_iter()
        .find(|kind| kind.prefix().is_some_and(|p| value.starts_with(p)))
        .unwrap_or(KeyType::Custom)
}

/// Build the redacted display form of a key value
///
/// Known types render as `<type>-` followed by the mask. Custom keys keep
/// their first four characters.
pub fn mask(value: &str) -> String {
    let stars = "*".repeat(MASK_LENGTH);

    match classify(value) {
        KeyType::Custom => {
            let visible: String = value.chars().take(CUSTOM_VISIBLE_CHARS).collect();
            format!("{}{}", visible, stars)
        }
        kind => format!("{}-{}", kind.as_str(), stars),
    }
}

/// Pattern check used by the validation endpoint
///
/// A key is well formed when it carries a known prefix followed by at least
/// one more character. No lookup against stored records takes place.
pub fn is_well_formed(value: &str) -> bool {
    classify(value)
        .prefix()
        .is_some_and(|p| value.len() > p.len())
}
