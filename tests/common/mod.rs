#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use envelope_budget::{PersistenceGateway, WalletSession};
use envelope_core::AllocationPolicy;
use envelope_storage_json::JsonSnapshotCache;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated application home for one test.
pub fn test_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Local-only gateway writing `wallet.json` under `dir`.
pub fn local_gateway(dir: &Path) -> PersistenceGateway {
    let cache = JsonSnapshotCache::in_dir(dir).expect("create snapshot cache");
    PersistenceGateway::new(Box::new(cache))
}

/// Session over the reference policy backed by a cache in `dir`.
pub fn open_session(dir: &Path) -> WalletSession {
    WalletSession::open(local_gateway(dir), AllocationPolicy::reference()).expect("open session")
}
