//! Persistence contract for colony records and world tiles
//!
//! Each method is one atomic operation against the backing document store.
//! Sequences of calls are not atomic as a whole; callers rely on
//! `insert_if_absent` keyed by `(colony, x, y)` rather than on locking.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::coords::{ChunkBounds, TilePos};
use crate::error::StoreError;
use crate::tile::{ColonyId, WorldTile};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColonyStatus {
    #[default]
    Active,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColonyRecord {
    pub id: ColonyId,
    #[serde(default)]
    pub world_seed: Option<u64>,
    #[serde(default)]
    pub status: ColonyStatus,
}

impl ColonyRecord {
    pub fn new(id: ColonyId) -> Self {
        Self {
            id,
            world_seed: None,
            status: ColonyStatus::Active,
        }
    }
}

pub trait TileStore: Send + Sync {
    fn colony(&self, colony: &ColonyId) -> Result<Option<ColonyRecord>, StoreError>;
    fn insert_colony(&self, record: ColonyRecord) -> Result<(), StoreError>;
    fn colonies(&self) -> Result<Vec<ColonyRecord>, StoreError>;
    fn set_world_seed(&self, colony: &ColonyId, seed: u64) -> Result<(), StoreError>;
    /// Store `seed` only if the colony has none yet; returns the seed now on record.
    fn assign_world_seed(&self, colony: &ColonyId, seed: u64) -> Result<u64, StoreError>;
    fn set_status(&self, colony: &ColonyId, status: ColonyStatus) -> Result<(), StoreError>;

    fn tile(&self, colony: &ColonyId, pos: TilePos) -> Result<Option<WorldTile>, StoreError>;
    fn tiles_in_rect(
        &self,
        colony: &ColonyId,
        bounds: ChunkBounds,
    ) -> Result<Vec<WorldTile>, StoreError>;
    fn any_tile_in_rect(&self, colony: &ColonyId, bounds: ChunkBounds)
        -> Result<bool, StoreError>;
    fn tiles_for_colony(&self, colony: &ColonyId) -> Result<Vec<WorldTile>, StoreError>;

    /// Insert each tile whose `(colony, x, y)` key is free; returns how many were inserted.
    fn insert_if_absent(&self, tiles: Vec<WorldTile>) -> Result<usize, StoreError>;
    /// Atomic read-modify-write of one tile. Returns `false` when the tile is absent.
    fn mutate_tile(
        &self,
        colony: &ColonyId,
        pos: TilePos,
        apply: &mut dyn FnMut(&mut WorldTile),
    ) -> Result<bool, StoreError>;
    fn delete_colony_tiles(&self, colony: &ColonyId) -> Result<usize, StoreError>;
}

type TileKey = (ColonyId, i32, i32);

fn key(colony: &ColonyId, pos: TilePos) -> TileKey {
    (colony.clone(), pos.x, pos.y)
}

#[derive(Debug, Default)]
struct StoreInner {
    colonies: BTreeMap<ColonyId, ColonyRecord>,
    tiles: BTreeMap<TileKey, WorldTile>,
}

/// Flat, serializable image of a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDump {
    pub colonies: Vec<ColonyRecord>,
    pub tiles: Vec<WorldTile>,
}

/// Sparse in-process store keyed by `(colony, x, y)`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dump(dump: StoreDump) -> Self {
        let mut inner = StoreInner::default();
        for record in dump.colonies {
            inner.colonies.insert(record.id.clone(), record);
        }
        for tile in dump.tiles {
            inner.tiles.insert(key(&tile.colony_id, tile.pos()), tile);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub fn dump(&self) -> Result<StoreDump, StoreError> {
        let inner = self.read()?;
        Ok(StoreDump {
            colonies: inner.colonies.values().cloned().collect(),
            tiles: inner.tiles.values().cloned().collect(),
        })
    }

    pub fn tile_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.tiles.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl StoreInner {
    fn rect<'a>(
        &'a self,
        colony: &ColonyId,
        bounds: ChunkBounds,
    ) -> impl Iterator<Item = &'a WorldTile> + 'a {
        let start = (colony.clone(), bounds.min_x, i32::MIN);
        let end = (colony.clone(), bounds.max_x, i32::MIN);
        self.tiles
            .range(start..end)
            .map(|(_, tile)| tile)
            .filter(move |tile| tile.y >= bounds.min_y && tile.y < bounds.max_y)
    }
}

impl TileStore for InMemoryStore {
    fn colony(&self, colony: &ColonyId) -> Result<Option<ColonyRecord>, StoreError> {
        Ok(self.read()?.colonies.get(colony).cloned())
    }

    fn insert_colony(&self, record: ColonyRecord) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if inner.colonies.contains_key(&record.id) {
            return Err(StoreError::ColonyExists(record.id));
        }
        inner.colonies.insert(record.id.clone(), record);
        Ok(())
    }

    fn colonies(&self) -> Result<Vec<ColonyRecord>, StoreError> {
        Ok(self.read()?.colonies.values().cloned().collect())
    }

    fn set_world_seed(&self, colony: &ColonyId, seed: u64) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let record = inner
            .colonies
            .get_mut(colony)
            .ok_or_else(|| StoreError::ColonyMissing(colony.clone()))?;
        record.world_seed = Some(seed);
        Ok(())
    }

    fn assign_world_seed(&self, colony: &ColonyId, seed: u64) -> Result<u64, StoreError> {
        let mut inner = self.write()?;
        let record = inner
            .colonies
            .get_mut(colony)
            .ok_or_else(|| StoreError::ColonyMissing(colony.clone()))?;
        Ok(*record.world_seed.get_or_insert(seed))
    }

    fn set_status(&self, colony: &ColonyId, status: ColonyStatus) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let record = inner
            .colonies
            .get_mut(colony)
            .ok_or_else(|| StoreError::ColonyMissing(colony.clone()))?;
        record.status = status;
        Ok(())
    }

    fn tile(&self, colony: &ColonyId, pos: TilePos) -> Result<Option<WorldTile>, StoreError> {
        Ok(self.read()?.tiles.get(&key(colony, pos)).cloned())
    }

    fn tiles_in_rect(
        &self,
        colony: &ColonyId,
        bounds: ChunkBounds,
    ) -> Result<Vec<WorldTile>, StoreError> {
        Ok(self.read()?.rect(colony, bounds).cloned().collect())
    }

    fn any_tile_in_rect(
        &self,
        colony: &ColonyId,
        bounds: ChunkBounds,
    ) -> Result<bool, StoreError> {
        Ok(self.read()?.rect(colony, bounds).next().is_some())
    }

    fn tiles_for_colony(&self, colony: &ColonyId) -> Result<Vec<WorldTile>, StoreError> {
        let start = (colony.clone(), i32::MIN, i32::MIN);
        let end = (colony.clone(), i32::MAX, i32::MAX);
        Ok(self
            .read()?
            .tiles
            .range(start..=end)
            .map(|(_, tile)| tile.clone())
            .collect())
    }

    fn insert_if_absent(&self, tiles: Vec<WorldTile>) -> Result<usize, StoreError> {
        let mut inner = self.write()?;
        let mut inserted = 0;
        for tile in tiles {
            let k = key(&tile.colony_id, tile.pos());
            if let Entry::Vacant(slot) = inner.tiles.entry(k) {
                slot.insert(tile);
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn mutate_tile(
        &self,
        colony: &ColonyId,
        pos: TilePos,
        apply: &mut dyn FnMut(&mut WorldTile),
    ) -> Result<bool, StoreError> {
        let mut inner = self.write()?;
        match inner.tiles.get_mut(&key(colony, pos)) {
            Some(tile) => {
                apply(tile);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_colony_tiles(&self, colony: &ColonyId) -> Result<usize, StoreError> {
        let mut inner = self.write()?;
        let before = inner.tiles.len();
        inner.tiles.retain(|(owner, _, _), _| owner != colony);
        Ok(before - inner.tiles.len())
    }
}
