//! Territory influence: how strongly a colony holds each tile

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coords::TilePos;
use crate::terrain::TerrainType;

pub const CAT_BONUS: f64 = 15.0;
pub const GUARD_BONUS: f64 = 10.0;
pub const CONTROLLED_THRESHOLD: f64 = 60.0;
pub const CONTESTED_THRESHOLD: f64 = 30.0;

/// `100 / (distance + 1)`; zero for negative distance.
pub fn distance_decay(distance: f64) -> f64 {
    if distance < 0.0 {
        0.0
    } else {
        100.0 / (distance + 1.0)
    }
}

/// Penalty for ground held by a rival faction.
pub fn hostility_penalty(terrain: TerrainType) -> f64 {
    match terrain {
        TerrainType::EnemyTerritory => 20.0,
        TerrainType::EnemyLair => 30.0,
        _ => 0.0,
    }
}

/// Influence over one tile, clamped to `[0, 100]`.
pub fn tile_influence(distance: f64, cat_count: u32, guard_count: u32, terrain: TerrainType) -> f64 {
    let base = distance_decay(distance);
    let raw = base + CAT_BONUS * f64::from(cat_count) + GUARD_BONUS * f64::from(guard_count)
        - hostility_penalty(terrain);
    raw.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Controlled,
    Contested,
    Wild,
}

pub fn classify(influence: f64) -> Control {
    if influence >= CONTROLLED_THRESHOLD {
        Control::Controlled
    } else if influence >= CONTESTED_THRESHOLD {
        Control::Contested
    } else {
        Control::Wild
    }
}

/// Cats and guards stationed on tiles, supplied by the colony simulation.
#[derive(Debug, Clone, Default)]
pub struct PatrolPresence {
    counts: HashMap<TilePos, (u32, u32)>,
}

impl PatrolPresence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cat(&mut self, pos: TilePos) {
        self.counts.entry(pos).or_default().0 += 1;
    }

    pub fn add_guard(&mut self, pos: TilePos) {
        self.counts.entry(pos).or_default().1 += 1;
    }

    /// `(cats, guards)` on the tile.
    pub fn at(&self, pos: TilePos) -> (u32, u32) {
        self.counts.get(&pos).copied().unwrap_or((0, 0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerritorySummary {
    pub controlled: usize,
    pub contested: usize,
    pub wild: usize,
    pub total_influence: f64,
    pub average_influence: f64,
}

impl TerritorySummary {
    /// Aggregate per-tile influence values. Empty input yields all zeros.
    pub fn from_influences(influences: impl IntoIterator<Item = f64>) -> Self {
        let mut summary = TerritorySummary::default();
        let mut count = 0usize;
        for influence in influences {
            match classify(influence) {
                Control::Controlled => summary.controlled += 1,
                Control::Contested => summary.contested += 1,
                Control::Wild => summary.wild += 1,
            }
            summary.total_influence += influence;
            count += 1;
        }
        if count > 0 {
            summary.average_influence = summary.total_influence / count as f64;
        }
        summary
    }

    pub fn tile_count(&self) -> usize {
        self.controlled + self.contested + self.wild
    }
}
