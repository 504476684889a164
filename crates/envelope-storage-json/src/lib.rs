//! envelope-storage-json
//!
//! Local durable cache for the wallet snapshot, one JSON document on disk.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use envelope_core::{storage::SnapshotStore, StoreError};
use envelope_domain::Snapshot;
use tracing::debug;

pub const CACHE_FILE_NAME: &str = "wallet.json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed snapshot cache.
///
/// A missing, empty or `null` document loads as absent. Unparseable content is
/// reported as [`StoreError::Serde`] so the caller can decide how loudly to
/// degrade.
#[derive(Debug, Clone)]
pub struct JsonSnapshotCache {
    path: PathBuf,
}

impl JsonSnapshotCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Cache stored as [`CACHE_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self::new(dir.join(CACHE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the cached document, if any.
    pub fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl SnapshotStore for JsonSnapshotCache {
    fn describe(&self) -> String {
        format!("local cache {}", self.path.display())
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str::<Option<Snapshot>>(&data)
            .map_err(|err| StoreError::Serde(err.to_string()))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        save_snapshot_to_path(snapshot, &self.path)?;
        debug!(path = %self.path.display(), "snapshot cached");
        Ok(())
    }
}

/// Writes `snapshot` to `path` through a temporary sibling file and a rename.
pub fn save_snapshot_to_path(snapshot: &Snapshot, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|err| StoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), StoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
