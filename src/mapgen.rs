//! Deterministic chunk generation
//!
//! Every field of a generated tile is a function of `(world_seed, x, y)` and the
//! colony anchor. Nothing reads the clock or depends on visiting order, so two
//! callers generating the same chunk always agree byte-for-byte.

use serde::{Deserialize, Serialize};

use crate::coords::{chunk_bounds, ChunkCoord, TilePos, TILES_PER_CHUNK};
use crate::rng::{derive_tile_seed, SeedStream};
use crate::terrain::{OverlayFeature, TerrainType};
use crate::tile::{ColonyId, Resources, WorldTile};

/// Tiles closer than this to the anchor are kept calm and fertile.
const HOME_RADIUS: f64 = 4.0;
/// Rival ground starts appearing past this distance, outside the starting 3×3 chunks.
const FRONTIER_RADIUS: f64 = 26.0;
/// Lairs only past this distance.
const LAIR_RADIUS: f64 = 36.0;

/// Inputs for generating one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    pub chunk: ChunkCoord,
    pub world_seed: u64,
    pub anchor: TilePos,
}

/// A generated tile before it is assigned to a colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTile {
    pub x: i32,
    pub y: i32,
    pub terrain: TerrainType,
    pub overlay_feature: Option<OverlayFeature>,
    pub resources: Resources,
    pub max_resources: Resources,
    pub danger_level: u8,
}

impl GeneratedTile {
    pub fn into_world_tile(self, colony_id: ColonyId) -> WorldTile {
        WorldTile {
            colony_id,
            x: self.x,
            y: self.y,
            terrain: self.terrain,
            overlay_feature: self.overlay_feature,
            resources: self.resources,
            max_resources: self.max_resources,
            last_depleted: 0,
            path_wear: 0,
            danger_level: self.danger_level,
        }
    }
}

/// Produce exactly `CHUNK_SIZE²` tiles for the chunk, row-major. A chunk that
/// does not fit the `i32` plane produces nothing.
pub fn generate_chunk(spec: ChunkSpec) -> Vec<GeneratedTile> {
    let mut tiles = Vec::with_capacity(TILES_PER_CHUNK);
    if let Some(bounds) = chunk_bounds(spec.chunk.x, spec.chunk.y) {
        for pos in bounds.positions() {
            tiles.push(generate_tile(spec.world_seed, pos, spec.anchor));
        }
    }
    tracing::debug!(
        chunk_x = spec.chunk.x,
        chunk_y = spec.chunk.y,
        tiles = tiles.len(),
        "generated chunk"
    );
    tiles
}

/// Generate a single tile. Exposed so callers can preview a position without a chunk.
pub fn generate_tile(world_seed: u64, pos: TilePos, anchor: TilePos) -> GeneratedTile {
    let mut stream = SeedStream::new(derive_tile_seed(world_seed, pos.x, pos.y));
    let distance = pos.distance(anchor);

    let terrain = pick_terrain(&mut stream, distance);
    let overlay_feature = pick_overlay(&mut stream, terrain);
    let max_resources = endow(&mut stream, terrain);

    let (low, high) = terrain.danger_band();
    let mut danger = stream.range_u32(low, high);
    if distance < HOME_RADIUS {
        danger = danger.min(5);
    }

    GeneratedTile {
        x: pos.x,
        y: pos.y,
        terrain,
        overlay_feature,
        resources: max_resources,
        max_resources,
        danger_level: danger.min(100) as u8,
    }
}

fn pick_terrain(stream: &mut SeedStream, distance: f64) -> TerrainType {
    use TerrainType::*;

    let table: Vec<(TerrainType, u32)> = if distance < HOME_RADIUS {
        vec![(Meadow, 5), (Field, 3), (Forest, 2)]
    } else {
        let frontier = distance >= FRONTIER_RADIUS;
        let deep = distance >= LAIR_RADIUS;
        vec![
            (Meadow, 4),
            (Field, 3),
            (Forest, 4),
            (DenseForest, 2),
            (PineForest, 2),
            (Mountains, 1),
            (Swamp, 1),
            (Desert, 1),
            (Tundra, 1),
            (CaveEntrance, 1),
            (River, 2),
            (EnemyTerritory, if frontier { 2 } else { 0 }),
            (EnemyLair, if deep { 1 } else { 0 }),
        ]
    };
    stream.pick_weighted(&table).unwrap_or(Meadow)
}

fn pick_overlay(stream: &mut SeedStream, terrain: TerrainType) -> Option<OverlayFeature> {
    // Always consume the draw so later fields stay aligned across terrains.
    let draw = stream.next_f64();
    if terrain == TerrainType::River {
        return None;
    }
    let trail_chance = match terrain {
        TerrainType::Forest | TerrainType::DenseForest | TerrainType::PineForest => 0.08,
        _ => 0.03,
    };
    if draw < 0.04 {
        Some(OverlayFeature::River)
    } else if draw < 0.06 {
        Some(OverlayFeature::AncientRoad)
    } else if draw < 0.08 && !terrain.is_hostile() {
        Some(OverlayFeature::TradeRoute)
    } else if draw < 0.08 + trail_chance {
        Some(OverlayFeature::GameTrail)
    } else {
        None
    }
}

fn endow(stream: &mut SeedStream, terrain: TerrainType) -> Resources {
    let profile = terrain.resource_profile();
    Resources {
        food: stream.range_u32(profile.food / 2, profile.food),
        herbs: stream.range_u32(profile.herbs / 2, profile.herbs),
        water: stream.range_u32(profile.water / 2, profile.water),
    }
}
