//! Desire-path wear: accrual, decay and the trail bonuses it unlocks

use crate::tile::{WorldTile, MAX_WEAR};

/// Wear added when a cat passes through a tile.
pub const TRAVERSAL_WEAR: u8 = 5;

pub fn add_wear(current: u8, amount: u8) -> u8 {
    current.saturating_add(amount).min(MAX_WEAR)
}

/// One scheduled decay step.
pub fn decay_wear(current: u8) -> u8 {
    current.saturating_sub(1)
}

/// Trail tier unlocked by a wear value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrailTier {
    Untrodden,
    Path,
    Trail,
    Road,
}

impl TrailTier {
    pub fn from_wear(wear: u8) -> Self {
        match wear {
            0..=29 => TrailTier::Untrodden,
            30..=59 => TrailTier::Path,
            60..=89 => TrailTier::Trail,
            _ => TrailTier::Road,
        }
    }
}

/// Multiplicative movement-speed bonus.
pub fn speed_bonus(wear: u8) -> f64 {
    match TrailTier::from_wear(wear) {
        TrailTier::Untrodden => 0.0,
        TrailTier::Path => 0.1,
        TrailTier::Trail => 0.25,
        TrailTier::Road => 0.4,
    }
}

/// Fraction of ambient danger suppressed; 1.0 means encounter-free.
pub fn danger_reduction(wear: u8) -> f64 {
    match TrailTier::from_wear(wear) {
        TrailTier::Untrodden => 0.0,
        TrailTier::Path => 0.25,
        TrailTier::Trail => 0.6,
        TrailTier::Road => 1.0,
    }
}

/// Danger left after the tile's wear suppresses it.
pub fn effective_danger(tile: &WorldTile) -> f64 {
    f64::from(tile.danger_level) * (1.0 - danger_reduction(tile.path_wear))
}

/// Travel cost of a tile once terrain, overlay and wear are combined.
pub fn travel_cost(tile: &WorldTile) -> f64 {
    let overlay = tile
        .overlay_feature
        .map(|o| o.travel_multiplier())
        .unwrap_or(1.0);
    tile.terrain.travel_cost() * overlay / (1.0 + speed_bonus(tile.path_wear))
}
