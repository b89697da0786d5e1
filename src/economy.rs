//! Tile resource economy: harvest, depletion and regeneration
//!
//! The store-level mutations in `gateway` call straight into these functions;
//! the formulas live only here.

use chrono::{DateTime, Utc};

use crate::tile::{ResourceKind, WorldTile};

/// Hours after which a depleted tile is fully regrown.
pub const FULL_REGEN_HOURS: f64 = 6.0;
/// Fraction of max regrown per elapsed hour.
pub const REGEN_PER_HOUR: f64 = 0.1;

/// Outcome of one harvest attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Harvest {
    pub harvested: u32,
    pub tile: WorldTile,
}

/// Units a harvester of the given skill can take in one action.
pub fn harvest_capacity(skill: u32) -> u32 {
    1 + skill / 50
}

/// Take up to `harvest_capacity(skill)` of `kind` from the tile.
///
/// River water is capped by the tile's stock like anything else but is never
/// decremented and never starts the depletion clock. When a tracked resource
/// reaches zero the depletion clock starts, unless it is already running.
pub fn harvest(tile: &WorldTile, kind: ResourceKind, skill: u32, now: DateTime<Utc>) -> Harvest {
    let mut updated = tile.clone();
    let capacity = harvest_capacity(skill);

    if kind == ResourceKind::Water && tile.is_river() {
        return Harvest {
            harvested: capacity.min(tile.resources.water),
            tile: updated,
        };
    }

    let amount = updated.resources.get_mut(kind);
    let harvested = capacity.min(*amount);
    *amount -= harvested;
    if *amount == 0 && !updated.is_marked_depleted() {
        updated.last_depleted = now.timestamp_millis();
    }
    Harvest {
        harvested,
        tile: updated,
    }
}

/// Share of max restored after `hours` of depletion: 10% per hour, full from hour 6.
pub fn regen_percent(hours_since_depletion: f64) -> f64 {
    if hours_since_depletion >= FULL_REGEN_HOURS {
        1.0
    } else {
        (hours_since_depletion.max(0.0) * REGEN_PER_HOUR).min(1.0)
    }
}

/// Regrow food and herbs toward their maxima. Rivers are returned unchanged and
/// water never regrows here. Clears `last_depleted` once both are full again.
pub fn regenerate(tile: &WorldTile, hours_since_depletion: f64) -> WorldTile {
    let mut updated = tile.clone();
    if tile.is_river() {
        return updated;
    }
    let percent = regen_percent(hours_since_depletion);
    for kind in [ResourceKind::Food, ResourceKind::Herbs] {
        let max = updated.max_resources.get(kind);
        let current = updated.resources.get(kind);
        let grown = (f64::from(current) + f64::from(max) * percent).floor();
        *updated.resources.get_mut(kind) = (grown as u32).min(max);
    }
    if updated.resources.food == updated.max_resources.food
        && updated.resources.herbs == updated.max_resources.herbs
    {
        updated.last_depleted = 0;
    }
    updated
}

/// Hours elapsed since the tile's depletion stamp, or `None` when not depleted.
pub fn hours_since_depletion(tile: &WorldTile, now: DateTime<Utc>) -> Option<f64> {
    if !tile.is_marked_depleted() {
        return None;
    }
    let elapsed_ms = now.timestamp_millis().saturating_sub(tile.last_depleted).max(0);
    Some(elapsed_ms as f64 / 3_600_000.0)
}

/// Both food and herbs exhausted. Rivers are never depleted.
pub fn is_depleted(tile: &WorldTile) -> bool {
    !tile.is_river() && tile.resources.food == 0 && tile.resources.herbs == 0
}
