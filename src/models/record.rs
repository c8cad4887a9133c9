//! Ranked characters and the records persisted for them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A character row from a ranking page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntity {
    /// Ranking source character id
    pub id: u64,

    /// Character name
    pub name: String,

    /// Region slug (e.g., "eu")
    pub region: String,

    /// Realm slug (e.g., "tarren-mill")
    pub realm: String,

    /// Realm display name, used for progress output only
    pub realm_name: String,

    /// Category the ranking page was pulled for
    pub category: String,
}

/// Outcome of an equipment lookup that succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentResult {
    /// Whether the target item is equipped
    pub equipped: bool,

    /// Epoch seconds of the observation when equipped, otherwise 0
    pub timestamp: i64,
}

impl EnrichmentResult {
    /// Build a result observed at `now` (epoch seconds).
    pub fn observed(equipped: bool, now: i64) -> Self {
        Self {
            equipped,
            timestamp: if equipped { now } else { 0 },
        }
    }
}

/// One durable output row per collected character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub id: u64,
    pub name: String,
    pub region: String,
    pub realm: String,

    #[serde(rename = "class")]
    pub category: String,

    #[serde(rename = "has_item")]
    pub equipped: bool,

    pub timestamp: i64,
}

impl PersistedRecord {
    pub fn new(entity: &RankedEntity, result: EnrichmentResult) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            region: entity.region.clone(),
            realm: entity.realm.clone(),
            category: entity.category.clone(),
            equipped: result.equipped,
            timestamp: result.timestamp,
        }
    }
}

/// Advisory record of a request that produced no usable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLogEntry {
    pub url: String,

    /// HTTP status code, or a tag such as `Exception`
    pub status: String,
}

impl fmt::Display for FailureLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed request to {} with status code {}",
            self.url, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entity() -> RankedEntity {
        RankedEntity {
            id: 42,
            name: "Brewmasta".to_string(),
            region: "eu".to_string(),
            realm: "tarren-mill".to_string(),
            realm_name: "Tarren Mill".to_string(),
            category: "warrior".to_string(),
        }
    }

    #[test]
    fn observed_false_has_zero_timestamp() {
        let result = EnrichmentResult::observed(false, 1_700_000_000);
        assert!(!result.equipped);
        assert_eq!(result.timestamp, 0);
    }

    #[test]
    fn observed_true_keeps_timestamp() {
        let result = EnrichmentResult::observed(true, 1_700_000_000);
        assert_eq!(result.timestamp, 1_700_000_000);
    }

    #[test]
    fn record_serializes_with_output_field_names() {
        let record = PersistedRecord::new(
            &sample_entity(),
            EnrichmentResult::observed(true, 1_700_000_000),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["class"], "warrior");
        assert_eq!(value["has_item"], true);
        assert_eq!(value["timestamp"], 1_700_000_000i64);
        assert!(value.get("category").is_none());
    }

    #[test]
    fn failure_entry_format() {
        let entry = FailureLogEntry {
            url: "https://raider.io/a".to_string(),
            status: "Exception".to_string(),
        };
        assert_eq!(
            entry.to_string(),
            "Failed request to https://raider.io/a with status code Exception"
        );
    }
}
