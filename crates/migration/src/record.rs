//! Persisted fact that a migration has been applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub name:       String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub applied_at: DateTime<Utc>,
    /// Insertion order, breaks ties between equal `applied_at` values.
    #[serde(default)]
    pub sequence:   i64,
}

impl MigrationRecord {
    /// A record stamped with the current time at millisecond precision.
    pub fn new(name: impl Into<String>, sequence: i64) -> Self {
        Self {
            name: name.into(),
            applied_at: bson::DateTime::now().to_chrono(),
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn test_record_survives_bson() {
        let record = MigrationRecord::new("001_create_users_collection", 1);
        let document = bson::to_document(&record).unwrap();
        assert!(matches!(document.get("applied_at"), Some(bson::Bson::DateTime(_))));

        let decoded: MigrationRecord = bson::from_document(document).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_record_without_sequence() {
        let record: MigrationRecord = bson::from_document(doc! {
            "name": "001_create_users_collection",
            "applied_at": bson::DateTime::now(),
        })
        .unwrap();
        assert_eq!(record.sequence, 0);
    }
}
