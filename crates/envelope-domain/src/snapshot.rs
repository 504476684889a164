//! Persisted unit of state: buckets plus ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{bucket::BucketSet, ledger::Ledger};

/// Wire shape `{ buckets, transactions, lastSync }` shared by the local cache and
/// the remote document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub buckets: BucketSet,
    #[serde(default)]
    pub transactions: Ledger,
    #[serde(default = "Utc::now")]
    pub last_sync: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(buckets: BucketSet, transactions: Ledger) -> Self {
        Self {
            buckets,
            transactions,
            last_sync: Utc::now(),
        }
    }

    /// Stamps `last_sync` with the current time.
    pub fn touch(&mut self) {
        self.last_sync = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster;

    #[test]
    fn dashboard_document_deserializes() {
        let raw = r#"{
            "_id": "main_wallet_state",
            "buckets": [
                {"id":"daily","name":"Daily Allowance","current":42.5,"target":600,"priority":5}
            ],
            "transactions": [],
            "lastSync": "2024-06-01T08:00:00.000Z"
        }"#;
        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.buckets.len(), 1);
        assert!(snapshot.transactions.is_empty());
        assert_eq!(snapshot.last_sync.to_rfc3339(), "2024-06-01T08:00:00+00:00");
    }

    #[test]
    fn serializes_last_sync_in_camel_case() {
        let snapshot = Snapshot::new(roster::reference_roster(), Ledger::new());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("lastSync").is_some());
        assert_eq!(json["buckets"].as_array().map(Vec::len), Some(8));
    }
}
