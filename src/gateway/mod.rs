//! Persistence gateway: remote document store first, local JSON cache always.
//!
//! Nothing here ever surfaces an error to the allocation flow. Failures are
//! logged and folded into a [`SyncStatus`].

mod remote;
mod worker;

use std::{fmt, path::Path, time::Duration};

use envelope_config::Config;
use envelope_core::{
    storage::{snapshot_warnings, SnapshotStore},
    StoreError,
};
use envelope_domain::{BucketSet, Snapshot};
use envelope_storage_json::JsonSnapshotCache;
use tracing::{info, warn};

use crate::{errors::BudgetError, utils};

pub use remote::RemoteStore;
pub use worker::SyncWorker;

/// Outcome of the most recent background save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncStatus {
    #[default]
    Idle,
    /// Remote store accepted the snapshot.
    Synced,
    /// Only the local cache holds the latest snapshot.
    LocalOnly(String),
    /// Neither store accepted the snapshot.
    Failed(String),
}

impl SyncStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, SyncStatus::LocalOnly(_) | SyncStatus::Failed(_))
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Idle => f.write_str("idle"),
            SyncStatus::Synced => f.write_str("synced"),
            SyncStatus::LocalOnly(reason) => write!(f, "saved locally only ({reason})"),
            SyncStatus::Failed(reason) => write!(f, "save failed ({reason})"),
        }
    }
}

pub struct PersistenceGateway {
    remote: Option<Box<dyn SnapshotStore>>,
    local: Box<dyn SnapshotStore>,
}

impl PersistenceGateway {
    pub fn new(local: Box<dyn SnapshotStore>) -> Self {
        Self {
            remote: None,
            local,
        }
    }

    pub fn with_remote(mut self, remote: Box<dyn SnapshotStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Local cache under `home`, plus the remote store when `config` names one.
    pub fn from_config(config: &Config, home: &Path) -> Result<Self, BudgetError> {
        let cache = JsonSnapshotCache::in_dir(&utils::cache_dir(home))?;
        let gateway = Self::new(Box::new(cache));
        Ok(match config.remote() {
            Some(endpoint) => gateway.with_remote(Box::new(RemoteStore::new(
                endpoint,
                Duration::from_secs(config.remote_timeout_secs),
            ))),
            None => gateway,
        })
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn describe(&self) -> String {
        match &self.remote {
            Some(remote) => format!("{} + {}", remote.describe(), self.local.describe()),
            None => self.local.describe(),
        }
    }

    /// Latest snapshot from the remote store, else the local cache, else `None`.
    pub fn load(&self) -> Option<Snapshot> {
        if let Some(remote) = &self.remote {
            match remote.load() {
                Ok(Some(snapshot)) => {
                    report_anomalies(&snapshot, &remote.describe());
                    return Some(snapshot);
                }
                Ok(None) => info!("remote store holds no snapshot; using local cache"),
                Err(err) => warn!(error = %err, "remote load failed; using local cache"),
            }
        }
        match self.local.load() {
            Ok(Some(snapshot)) => {
                report_anomalies(&snapshot, &self.local.describe());
                Some(snapshot)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "local cache unreadable; starting fresh");
                None
            }
        }
    }

    pub fn save(&self, snapshot: &Snapshot) -> SyncStatus {
        let remote = self.remote.as_ref().map(|remote| remote.save(snapshot));
        let local = self.local.save(snapshot);
        settle(remote, local)
    }

    /// Persists a month reset: buckets kept, transaction log discarded.
    pub fn save_reset(&self, buckets: &BucketSet) -> SyncStatus {
        let remote = self.remote.as_ref().map(|remote| remote.save_reset(buckets));
        let local = self.local.save_reset(buckets);
        settle(remote, local)
    }
}

fn report_anomalies(snapshot: &Snapshot, source: &str) {
    for warning in snapshot_warnings(snapshot) {
        warn!(source, "{warning}");
    }
}

fn settle(
    remote: Option<Result<(), StoreError>>,
    local: Result<(), StoreError>,
) -> SyncStatus {
    if let Err(err) = &local {
        warn!(error = %err, "local cache write failed");
    }
    match (remote, local) {
        (Some(Ok(())), _) => SyncStatus::Synced,
        (Some(Err(remote)), Ok(())) => {
            warn!(error = %remote, "remote save failed; kept local copy");
            SyncStatus::LocalOnly(remote.to_string())
        }
        (Some(Err(remote)), Err(local)) => {
            warn!(error = %remote, "remote save failed");
            SyncStatus::Failed(format!("{remote}; {local}"))
        }
        (None, Ok(())) => SyncStatus::LocalOnly("no remote store configured".into()),
        (None, Err(local)) => SyncStatus::Failed(local.to_string()),
    }
}
