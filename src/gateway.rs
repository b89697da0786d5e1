//! World gateway: lazy, idempotent chunk materialization and tile mutations
//!
//! Queries (`get_tile`, `get_tiles_in_chunk`, `get_all_tiles`) never generate.
//! Anything that writes goes through an explicit mutating call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::coords::{
    centered_block, colony_anchor, ChunkBounds, ChunkCoord, TilePos, TILES_PER_CHUNK,
};
use crate::economy;
use crate::error::{WorldError, WorldResult};
use crate::fog::RevealMap;
use crate::mapgen::{generate_chunk, ChunkSpec, GeneratedTile};
use crate::rng::roll;
use crate::store::{ColonyRecord, TileStore};
use crate::territory::{tile_influence, PatrolPresence, TerritorySummary};
use crate::tile::{ColonyId, ResourceKind, WorldTile};
use crate::wear;

/// Chunk block generated for a new colony.
pub const STARTING_BLOCK: u32 = 3;

/// Whether `ensure_chunk` had to write anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStatus {
    Existing,
    Generated { inserted: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub tiles_scanned: usize,
    pub regenerated: usize,
    pub replenished: usize,
    pub wear_decayed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetReport {
    pub previous_seed: Option<u64>,
    pub new_seed: u64,
    pub deleted: usize,
    pub generated: usize,
}

pub struct WorldGateway<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: TileStore> WorldGateway<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Register a colony with no seed yet.
    pub fn create_colony(&self, colony: &ColonyId) -> WorldResult<ColonyRecord> {
        let record = ColonyRecord::new(colony.clone());
        self.store.insert_colony(record.clone())?;
        info!(colony = %colony, "colony registered");
        Ok(record)
    }

    fn colony(&self, colony: &ColonyId) -> WorldResult<ColonyRecord> {
        self.store
            .colony(colony)?
            .ok_or_else(|| WorldError::ColonyNotFound(colony.clone()))
    }

    /// The colony's world seed, assigning and persisting one on first use.
    pub fn world_seed(&self, colony: &ColonyId) -> WorldResult<u64> {
        let record = self.colony(colony)?;
        if let Some(seed) = record.world_seed {
            return Ok(seed);
        }
        let candidate = seed_from_time(self.now());
        let seed = self.store.assign_world_seed(colony, candidate)?;
        if seed == candidate {
            info!(colony = %colony, seed, "assigned world seed");
        }
        Ok(seed)
    }

    /// Materialize the chunk if no tile of it exists yet. Safe to call repeatedly
    /// and concurrently: generation is deterministic and inserts never overwrite.
    pub fn ensure_chunk(&self, colony: &ColonyId, chunk: ChunkCoord) -> WorldResult<ChunkStatus> {
        self.colony(colony)?;
        let bounds = addressable_bounds(chunk)?;
        if self.store.any_tile_in_rect(colony, bounds)? {
            return Ok(ChunkStatus::Existing);
        }
        let world_seed = self.world_seed(colony)?;
        let generated = generate_chunk(ChunkSpec {
            chunk,
            world_seed,
            anchor: colony_anchor(),
        });
        check_generated(chunk, bounds, &generated)?;

        let tiles = generated
            .into_iter()
            .map(|tile| tile.into_world_tile(colony.clone()))
            .collect();
        let inserted = self.store.insert_if_absent(tiles)?;
        debug!(
            colony = %colony,
            chunk_x = chunk.x,
            chunk_y = chunk.y,
            inserted,
            "materialized chunk"
        );
        Ok(ChunkStatus::Generated { inserted })
    }

    /// Point lookup. Does not generate; call `ensure_chunk` first when presence matters.
    pub fn get_tile(&self, colony: &ColonyId, pos: TilePos) -> WorldResult<Option<WorldTile>> {
        self.colony(colony)?;
        Ok(self.store.tile(colony, pos)?)
    }

    pub fn get_tiles_in_chunk(
        &self,
        colony: &ColonyId,
        chunk: ChunkCoord,
    ) -> WorldResult<Vec<WorldTile>> {
        self.colony(colony)?;
        Ok(self.store.tiles_in_rect(colony, addressable_bounds(chunk)?)?)
    }

    /// Every tile of the colony. Grows with explored area; page with
    /// `get_tiles_in_chunk` for large worlds.
    pub fn get_all_tiles(&self, colony: &ColonyId) -> WorldResult<Vec<WorldTile>> {
        self.colony(colony)?;
        Ok(self.store.tiles_for_colony(colony)?)
    }

    /// Generate the starting 3×3 chunk block around the origin.
    pub fn initialize_world(&self, colony: &ColonyId) -> WorldResult<usize> {
        self.generate_block(colony, STARTING_BLOCK)
    }

    /// Generate every missing chunk in a `size × size` block around the origin.
    pub fn expand_revealed_area(&self, colony: &ColonyId, size: i32) -> WorldResult<usize> {
        let size = u32::try_from(size).map_err(|_| {
            WorldError::InvalidInput(format!("reveal size must not be negative, got {size}"))
        })?;
        self.generate_block(colony, size)
    }

    fn generate_block(&self, colony: &ColonyId, size: u32) -> WorldResult<usize> {
        self.colony(colony)?;
        let mut inserted_total = 0;
        for chunk in centered_block(size) {
            if let ChunkStatus::Generated { inserted } = self.ensure_chunk(colony, chunk)? {
                inserted_total += inserted;
            }
        }
        Ok(inserted_total)
    }

    /// Drop every tile and regenerate the starting area under a fresh seed.
    ///
    /// Tiles go first: if the delete fails the colony keeps its old seed and
    /// old tiles together. Callers must hold exclusive access to this colony's
    /// world for the duration.
    pub fn reset_world(&self, colony: &ColonyId) -> WorldResult<ResetReport> {
        let record = self.colony(colony)?;
        let mut new_seed = seed_from_time(self.now());
        if Some(new_seed) == record.world_seed {
            new_seed = new_seed.wrapping_add(1);
        }
        let deleted = self.store.delete_colony_tiles(colony)?;
        self.store.set_world_seed(colony, new_seed)?;
        let generated = self.initialize_world(colony)?;
        info!(
            colony = %colony,
            previous_seed = ?record.world_seed,
            new_seed,
            deleted,
            generated,
            "world reset"
        );
        Ok(ResetReport {
            previous_seed: record.world_seed,
            new_seed,
            deleted,
            generated,
        })
    }

    /// Harvest from a materialized tile; returns the amount taken.
    pub fn harvest_tile(
        &self,
        colony: &ColonyId,
        pos: TilePos,
        kind: ResourceKind,
        skill: u32,
    ) -> WorldResult<u32> {
        self.colony(colony)?;
        let now = self.now();
        let mut harvested = 0;
        let found = self.store.mutate_tile(colony, pos, &mut |tile| {
            let outcome = economy::harvest(tile, kind, skill, now);
            harvested = outcome.harvested;
            *tile = outcome.tile;
        })?;
        if !found {
            return Err(WorldError::TileNotFound {
                colony: colony.clone(),
                pos,
            });
        }
        Ok(harvested)
    }

    /// Same as `harvest_tile` but with the resource named as text.
    pub fn harvest_named(
        &self,
        colony: &ColonyId,
        pos: TilePos,
        kind: &str,
        skill: u32,
    ) -> WorldResult<u32> {
        let kind: ResourceKind = kind.parse()?;
        self.harvest_tile(colony, pos, kind, skill)
    }

    /// Accrue wear from movement, materializing the tile's chunk first.
    pub fn add_wear(&self, colony: &ColonyId, pos: TilePos, amount: u8) -> WorldResult<u8> {
        self.ensure_chunk(colony, pos.chunk())?;
        let mut wear_after = 0;
        let found = self.store.mutate_tile(colony, pos, &mut |tile| {
            tile.path_wear = wear::add_wear(tile.path_wear, amount);
            wear_after = tile.path_wear;
        })?;
        if !found {
            return Err(WorldError::TileNotFound {
                colony: colony.clone(),
                pos,
            });
        }
        Ok(wear_after)
    }

    pub fn is_tile_depleted(&self, colony: &ColonyId, pos: TilePos) -> WorldResult<bool> {
        let tile = self
            .get_tile(colony, pos)?
            .ok_or_else(|| WorldError::TileNotFound {
                colony: colony.clone(),
                pos,
            })?;
        Ok(economy::is_depleted(&tile))
    }

    /// Scheduled sweep: regrow depleted tiles and decay path wear by one step.
    ///
    /// Each tile is updated in its own atomic read-modify-write so harvests landing
    /// during the sweep are never overwritten.
    pub fn regenerate_and_decay(&self, colony: &ColonyId) -> WorldResult<SweepReport> {
        self.colony(colony)?;
        let now = self.now();
        let mut report = SweepReport::default();
        for snapshot in self.store.tiles_for_colony(colony)? {
            report.tiles_scanned += 1;
            let needs_regen = !snapshot.is_river() && snapshot.is_marked_depleted();
            if !needs_regen && snapshot.path_wear == 0 {
                continue;
            }
            self.store.mutate_tile(colony, snapshot.pos(), &mut |tile| {
                if !tile.is_river() {
                    if let Some(hours) = economy::hours_since_depletion(tile, now) {
                        let regrown = economy::regenerate(tile, hours);
                        report.regenerated += 1;
                        if !regrown.is_marked_depleted() {
                            report.replenished += 1;
                        }
                        tile.resources = regrown.resources;
                        tile.last_depleted = regrown.last_depleted;
                    }
                }
                if tile.path_wear > 0 {
                    tile.path_wear = wear::decay_wear(tile.path_wear);
                    report.wear_decayed += 1;
                }
            })?;
        }
        debug!(
            colony = %colony,
            scanned = report.tiles_scanned,
            regenerated = report.regenerated,
            replenished = report.replenished,
            wear_decayed = report.wear_decayed,
            "sweep finished"
        );
        Ok(report)
    }

    /// Influence summary over every materialized tile, measured from the anchor.
    pub fn territory_summary(
        &self,
        colony: &ColonyId,
        presence: &PatrolPresence,
    ) -> WorldResult<TerritorySummary> {
        let anchor = colony_anchor();
        let tiles = self.get_all_tiles(colony)?;
        Ok(TerritorySummary::from_influences(tiles.iter().map(|tile| {
            let (cats, guards) = presence.at(tile.pos());
            tile_influence(tile.pos().distance(anchor), cats, guards, tile.terrain)
        })))
    }

    pub fn reveal_map(&self, colony: &ColonyId) -> WorldResult<RevealMap> {
        let tiles = self.get_all_tiles(colony)?;
        Ok(RevealMap::from_tiles(&tiles))
    }
}

/// Unpredictable seed derived from wall-clock time.
fn seed_from_time(now: DateTime<Utc>) -> u64 {
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_millis().wrapping_mul(1_000_000));
    roll(nanos as u64).next_seed
}

fn addressable_bounds(chunk: ChunkCoord) -> WorldResult<ChunkBounds> {
    chunk.bounds().ok_or_else(|| {
        WorldError::InvalidInput(format!(
            "chunk ({}, {}) lies past the edge of the map",
            chunk.x, chunk.y
        ))
    })
}

fn check_generated(
    chunk: ChunkCoord,
    bounds: ChunkBounds,
    tiles: &[GeneratedTile],
) -> WorldResult<()> {
    if tiles.len() != TILES_PER_CHUNK {
        return Err(WorldError::GenerationFailure(format!(
            "chunk ({}, {}) produced {} tiles, expected {}",
            chunk.x,
            chunk.y,
            tiles.len(),
            TILES_PER_CHUNK
        )));
    }
    for tile in tiles {
        let pos = TilePos::new(tile.x, tile.y);
        if !bounds.contains(pos) {
            return Err(WorldError::GenerationFailure(format!(
                "tile ({}, {}) lies outside chunk ({}, {})",
                tile.x, tile.y, chunk.x, chunk.y
            )));
        }
        let record = tile.clone().into_world_tile(ColonyId::new(""));
        record.validate().map_err(WorldError::GenerationFailure)?;
    }
    Ok(())
}
