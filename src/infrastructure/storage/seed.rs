//! Generated seed records for the file-backed store

use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

use crate::domain::api_key::{timestamp_now, ApiKeyRecord, KeyType};

/// Length of the random suffix appended to each seed key prefix
const SEED_SECRET_LENGTH: usize = 32;

const SEED_KEYS: [(&str, KeyType); 3] = [
    ("Production Key", KeyType::Prod),
    ("Staging Key", KeyType::Stg),
    ("Development Key", KeyType::Dev),
];

/// Generate one record per environment type with a random secret suffix
pub fn generate_seed_records() -> Vec<ApiKeyRecord> {
    let now = timestamp_now();

    SEED_KEYS
        .iter()
        .map(|(name, kind)| {
            let value = format!("{}{}", kind.prefix().unwrap_or_default(), random_secret());
            ApiKeyRecord::from_parts(Uuid::new_v4().to_string(), *name, value, now, None)
        })
        .collect()
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SEED_SECRET_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::domain::api_key::classify;

    #[test]
    fn test_seed_has_one_of_each_type() {
        let records = generate_seed_records();
        let types: Vec<KeyType> = records.iter().map(|r| classify(r.value())).collect();

        assert_eq!(records.len(), 3);
        assert_eq!(types, vec![KeyType::Prod, KeyType::Stg, KeyType::Dev]);
    }

    #[test]
    fn test_seed_values_have_random_suffix() {
        let records = generate_seed_records();
        let prod = &records[0];

        assert!(prod.value().starts_with("prod_"));
        assert_eq!(prod.value().len(), "prod_".len() + SEED_SECRET_LENGTH);
    }

    #[test]
    fn test_seed_ids_and_values_are_unique() {
        let first = generate_seed_records();
        let second = generate_seed_records();

        let ids: HashSet<&str> = first.iter().chain(&second).map(|r| r.id()).collect();
        let values: HashSet<&str> = first.iter().chain(&second).map(|r| r.value()).collect();

        assert_eq!(ids.len(), 6);
        assert_eq!(values.len(), 6);
    }

    #[test]
    fn test_seed_timestamps_match() {
        for record in generate_seed_records() {
            assert_eq!(record.created_at(), record.updated_at());
        }
    }
}
