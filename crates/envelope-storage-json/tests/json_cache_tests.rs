use std::fs;

use envelope_core::{storage::SnapshotStore, StoreError};
use envelope_domain::{
    roster::reference_roster, Ledger, Money, Snapshot, Transaction, TransactionKind,
};
use envelope_storage_json::{JsonSnapshotCache, CACHE_FILE_NAME};
use tempfile::tempdir;

fn sample_snapshot() -> Snapshot {
    let mut buckets = reference_roster();
    buckets.get_mut("rent").expect("rent").current = Money::from_cents(12_345);
    buckets.get_mut("wifi").expect("wifi").is_paid = true;
    let mut ledger = Ledger::new();
    ledger.record(Transaction::new(
        TransactionKind::Income,
        Money::from_cents(12_345),
        Some("Salary"),
    ));
    Snapshot::new(buckets, ledger)
}

#[test]
fn missing_cache_loads_as_absent() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonSnapshotCache::in_dir(dir.path()).expect("cache");
    assert!(cache.load().expect("load").is_none());
}

#[test]
fn cache_persists_and_reloads_snapshot() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonSnapshotCache::in_dir(&dir.path().join("cache")).expect("cache");
    let snapshot = sample_snapshot();

    cache.save(&snapshot).expect("save");
    assert!(cache.path().ends_with(CACHE_FILE_NAME));
    assert!(!cache.path().with_extension("json.tmp").exists());

    let loaded = cache.load().expect("load").expect("snapshot present");
    assert_eq!(loaded.buckets, snapshot.buckets);
    assert_eq!(loaded.transactions.len(), 1);
    assert_eq!(
        loaded.transactions.latest().map(|txn| txn.note.as_str()),
        Some("Salary")
    );
}

#[test]
fn cache_uses_dashboard_document_shape() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonSnapshotCache::in_dir(dir.path()).expect("cache");
    cache.save(&sample_snapshot()).expect("save");

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(cache.path()).expect("read")).expect("json");
    assert!(raw.get("lastSync").and_then(|v| v.as_str()).is_some());
    let rent = &raw["buckets"][0];
    assert_eq!(rent["id"], "rent");
    assert_eq!(rent["current"].as_f64(), Some(123.45));
    assert_eq!(raw["buckets"][1]["isPaid"], true);
    assert_eq!(raw["transactions"][0]["type"], "income");
}

#[test]
fn null_or_empty_document_loads_as_absent() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonSnapshotCache::in_dir(dir.path()).expect("cache");

    fs::write(cache.path(), "null").expect("write");
    assert!(cache.load().expect("load").is_none());

    fs::write(cache.path(), "  \n").expect("write");
    assert!(cache.load().expect("load").is_none());
}

#[test]
fn corrupt_cache_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonSnapshotCache::in_dir(dir.path()).expect("cache");
    fs::write(cache.path(), "{ not json").expect("write");

    assert!(matches!(cache.load(), Err(StoreError::Serde(_))));
}

#[test]
fn reset_save_discards_transactions() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonSnapshotCache::in_dir(dir.path()).expect("cache");
    let snapshot = sample_snapshot();
    cache.save(&snapshot).expect("save");

    cache.save_reset(&snapshot.buckets).expect("reset save");
    let loaded = cache.load().expect("load").expect("snapshot present");
    assert!(loaded.transactions.is_empty());
    assert_eq!(loaded.buckets, snapshot.buckets);
}

#[test]
fn clear_removes_document() {
    let dir = tempdir().expect("tempdir");
    let cache = JsonSnapshotCache::in_dir(dir.path()).expect("cache");
    cache.save(&sample_snapshot()).expect("save");

    cache.clear().expect("clear");
    assert!(!cache.path().exists());
    assert!(cache.load().expect("load").is_none());
}
