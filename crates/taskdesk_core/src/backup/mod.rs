//! Full-store snapshot export and destructive-merge import.
//!
//! # Responsibility
//! - Serialize every stored key to one backup artifact.
//! - Reconstruct state by merging an artifact back in, key by key.
//!
//! # Invariants
//! - Export is a pure read over the whole store in one pass.
//! - Import aborts before any write when the artifact fails to parse.
//! - The merge is last-write-wins per key; keys absent from the artifact
//!   are left untouched. A storage failure mid-merge can leave a mixed
//!   state; there is no rollback.

use crate::store::{KeyValueStore, StoreError};
use chrono::{Local, NaiveDate};
use log::{error, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Point-in-time serialization of every persisted key.
///
/// Ordered map so artifact serialization is deterministic.
pub type Snapshot = BTreeMap<String, String>;

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug)]
pub enum SnapshotError {
    /// The artifact does not parse as a key-to-string mapping.
    MalformedArtifact(serde_json::Error),
    Serialize(serde_json::Error),
    Store(StoreError),
    Io(std::io::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedArtifact(err) => write!(f, "malformed backup artifact: {err}"),
            Self::Serialize(err) => write!(f, "snapshot serialization failed: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedArtifact(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<StoreError> for SnapshotError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Captures every key and its raw stored value.
///
/// One pass over the shared store, so directory, session and every
/// per-user task list land in the same artifact.
pub fn export_snapshot<S: KeyValueStore>(store: &S) -> SnapshotResult<Snapshot> {
    let mut snapshot = Snapshot::new();
    for key in store.keys()? {
        if let Some(value) = store.get(&key)? {
            snapshot.insert(key, value);
        }
    }
    info!(
        "event=snapshot_export module=backup status=ok keys={}",
        snapshot.len()
    );
    Ok(snapshot)
}

/// Renders a snapshot as the pretty-printed JSON artifact shape.
pub fn snapshot_to_json(snapshot: &Snapshot) -> SnapshotResult<String> {
    serde_json::to_string_pretty(snapshot).map_err(SnapshotError::Serialize)
}

/// Artifact filename embedding the export date.
pub fn snapshot_file_name(date: NaiveDate) -> String {
    format!("todo_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Merges a parsed artifact into the live store.
///
/// Returns the number of keys applied. The caller is expected to force a
/// full reload afterward: in-memory state is stale relative to the store.
pub fn import_snapshot<S: KeyValueStore>(store: &S, artifact: &str) -> SnapshotResult<usize> {
    let snapshot: Snapshot = match serde_json::from_str(artifact) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            error!(
                "event=snapshot_import module=backup status=error error_code=malformed_artifact error={err}"
            );
            return Err(SnapshotError::MalformedArtifact(err));
        }
    };

    let mut applied = 0usize;
    for (key, value) in &snapshot {
        store.set(key, value)?;
        applied += 1;
    }

    info!("event=snapshot_import module=backup status=ok keys={applied}");
    Ok(applied)
}

/// Exports the store to `<dir>/todo_backup_<today>.json`.
pub fn write_snapshot_file<S: KeyValueStore>(store: &S, dir: &Path) -> SnapshotResult<PathBuf> {
    let snapshot = export_snapshot(store)?;
    let path = dir.join(snapshot_file_name(Local::now().date_naive()));
    std::fs::write(&path, snapshot_to_json(&snapshot)?)?;
    Ok(path)
}

/// Reads an artifact file and merges it into the store.
pub fn import_snapshot_file<S: KeyValueStore>(store: &S, path: &Path) -> SnapshotResult<usize> {
    let artifact = std::fs::read_to_string(path)?;
    import_snapshot(store, &artifact)
}

#[cfg(test)]
mod tests {
    use super::snapshot_file_name;
    use chrono::NaiveDate;

    #[test]
    fn file_name_embeds_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        assert_eq!(snapshot_file_name(date), "todo_backup_2026-08-27.json");
    }
}
