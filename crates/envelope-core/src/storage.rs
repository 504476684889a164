use std::collections::HashSet;

use envelope_domain::{BucketSet, Ledger, Snapshot};

use crate::StoreError;

/// Abstraction over persistence backends capable of holding one wallet snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Short label used in logs and sync status messages.
    fn describe(&self) -> String;

    /// Returns the stored snapshot, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Writes `buckets` and explicitly discards the stored transaction log.
    fn save_reset(&self, buckets: &BucketSet) -> Result<(), StoreError> {
        self.save(&Snapshot::new(buckets.clone(), Ledger::new()))
    }
}

/// Detects anomalies in a loaded snapshot that the allocation rules would never
/// produce themselves.
pub fn snapshot_warnings(snapshot: &Snapshot) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for bucket in &snapshot.buckets {
        if !seen.insert(bucket.id.as_str()) {
            warnings.push(format!("bucket `{}` appears more than once", bucket.id));
        }
        if bucket.current.is_negative() {
            warnings.push(format!(
                "bucket `{}` holds a negative balance {}",
                bucket.id, bucket.current
            ));
        }
        if let Some(target) = bucket.target {
            if bucket.current > target {
                warnings.push(format!(
                    "bucket `{}` holds {} above its target {}",
                    bucket.id, bucket.current, target
                ));
            }
        }
    }

    for txn in snapshot.transactions.iter() {
        if !txn.amount.is_positive() {
            warnings.push(format!(
                "transaction {} has non-positive amount {}",
                txn.id, txn.amount
            ));
        }
    }
    warnings
}
