//! File-backed snapshot store.
//!
//! The snapshot lives in one JSON file. Writes go to a sibling `.tmp`
//! file, fsync, then rename over the real path, so a crash mid-write
//! leaves the previous snapshot intact. A `.lock` sibling guards the
//! whole read-modify-write cycle against overlapping runs.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::snapshot::AwardSnapshot;

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> SnapshotStore {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire the store lock. Fails with [`StoreError::Locked`] if another
    /// run holds it; the returned guard releases the lock on drop.
    pub fn lock(&self) -> Result<StoreLock> {
        let lock_path = sibling(&self.path, ".lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }
        match OpenOptions::new().write(true).create_new(true).open(&lock_path) {
            Ok(mut file) => {
                let _ = writeln!(file, "{}", std::process::id());
                debug!(path = %lock_path.display(), "acquired store lock");
                Ok(StoreLock { path: lock_path })
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::Locked { path: lock_path })
            }
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    /// Load the previous snapshot. A missing file means a fresh season;
    /// an unreadable one is logged and treated the same, so one corrupt
    /// write never wedges the automation.
    pub fn load(&self) -> Option<AwardSnapshot> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no previous snapshot, starting fresh");
                return None;
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "snapshot unreadable, starting fresh");
                return None;
            }
        };
        match serde_json::from_str::<AwardSnapshot>(&raw) {
            Ok(snapshot) => {
                debug!(
                    path = %self.path.display(),
                    version = %snapshot.version,
                    substitutions = snapshot.substitutions.len(),
                    "loaded previous snapshot"
                );
                Some(snapshot)
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "snapshot did not parse, starting fresh");
                None
            }
        }
    }

    /// Write the snapshot atomically: temp file, fsync, rename.
    pub fn save(&self, snapshot: &AwardSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = sibling(&self.path, ".tmp");

        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        fs::rename(&tmp_path, &self.path)?;
        info!(
            path = %self.path.display(),
            week = snapshot.current_week,
            substitutions = snapshot.substitutions.len(),
            "saved snapshot"
        );
        Ok(())
    }
}

/// Lock file guard. Removing the file on drop releases the lock.
pub struct StoreLock {
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %err, "failed to release store lock");
        }
    }
}

/// `<path><suffix>`, keeping the original extension in place.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
