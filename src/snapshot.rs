//! JSON snapshots of the in-memory store between runs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;
use crate::store::{InMemoryStore, StoreDump};

/// Snapshot metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub saved_at: DateTime<Utc>,
    pub colony_count: usize,
    pub tile_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub metadata: SnapshotMetadata,
    pub store: StoreDump,
}

/// Reads and writes a store snapshot at a fixed path.
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(
        &self,
        store: &InMemoryStore,
        now: DateTime<Utc>,
    ) -> Result<SnapshotMetadata, StoreError> {
        let dump = store.dump()?;
        let metadata = SnapshotMetadata {
            saved_at: now,
            colony_count: dump.colonies.len(),
            tile_count: dump.tiles.len(),
        };
        let snapshot = WorldSnapshot {
            metadata: metadata.clone(),
            store: dump,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, json)?;
        info!(
            path = %self.path.display(),
            colonies = metadata.colony_count,
            tiles = metadata.tile_count,
            "snapshot written"
        );
        Ok(metadata)
    }

    pub fn read(&self) -> Result<WorldSnapshot, StoreError> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load the store from disk, or start empty when no snapshot exists yet.
    pub fn load_or_empty(&self) -> Result<InMemoryStore, StoreError> {
        if !self.path.exists() {
            return Ok(InMemoryStore::new());
        }
        let snapshot = self.read()?;
        Ok(InMemoryStore::from_dump(snapshot.store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ColonyRecord, TileStore};
    use chrono::TimeZone;

    #[test]
    fn test_missing_snapshot_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("none.json"));
        let store = writer.load_or_empty().unwrap();
        assert_eq!(store.tile_count().unwrap(), 0);
    }

    #[test]
    fn test_snapshot_creation() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("nested").join("world.json"));
        let store = InMemoryStore::new();
        store.insert_colony(ColonyRecord::new("a".into())).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap();
        let metadata = writer.write(&store, now).unwrap();
        assert_eq!(metadata.colony_count, 1);
        assert!(writer.path().exists());

        let snapshot = writer.read().unwrap();
        assert_eq!(snapshot.metadata.saved_at, now);
        let restored = writer.load_or_empty().unwrap();
        assert_eq!(restored.colonies().unwrap().len(), 1);
    }
}
