//! Fog of war, derived at read time from path wear and distance to home

use std::collections::HashSet;

use crate::coords::{colony_anchor, TilePos};
use crate::tile::WorldTile;
use crate::wear::effective_danger;

/// Tiles nearer than this to the anchor are always visible.
pub const HOME_REVEAL_RADIUS: f64 = 3.0;

/// Revealed if the tile or one of its orthogonal neighbours has been walked,
/// or if it lies within the home radius.
pub fn is_revealed(pos: TilePos, worn: impl Fn(TilePos) -> bool) -> bool {
    worn(pos)
        || pos.neighbors().any(&worn)
        || pos.distance(colony_anchor()) < HOME_REVEAL_RADIUS
}

/// Worn positions of a colony, for repeated fog queries.
#[derive(Debug, Clone, Default)]
pub struct RevealMap {
    worn: HashSet<TilePos>,
}

impl RevealMap {
    pub fn from_tiles<'a>(tiles: impl IntoIterator<Item = &'a WorldTile>) -> Self {
        let worn = tiles
            .into_iter()
            .filter(|t| t.path_wear > 0)
            .map(WorldTile::pos)
            .collect();
        Self { worn }
    }

    pub fn is_revealed(&self, pos: TilePos) -> bool {
        is_revealed(pos, |p| self.worn.contains(&p))
    }
}

/// Scouting value of a tile: riskier unworn ground and notable overlays score higher.
pub fn exploration_score(tile: &WorldTile) -> f64 {
    let overlay = tile
        .overlay_feature
        .map(|o| f64::from(o.exploration_bonus()))
        .unwrap_or(0.0);
    effective_danger(tile) / 2.0 + overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{OverlayFeature, TerrainType};
    use crate::tile::{ColonyId, Resources};

    #[test]
    fn test_home_radius_is_strict() {
        let never = |_| false;
        assert!(is_revealed(colony_anchor(), never));
        assert!(is_revealed(TilePos::new(8, 8), never)); // ~2.83
        assert!(!is_revealed(TilePos::new(9, 6), never)); // exactly 3
        assert!(!is_revealed(TilePos::new(20, 20), never));
    }

    #[test]
    fn test_soft_edge_reveal() {
        let trail = TilePos::new(30, 30);
        let worn = |p: TilePos| p == trail;
        assert!(is_revealed(trail, worn));
        assert!(is_revealed(TilePos::new(31, 30), worn));
        assert!(is_revealed(TilePos::new(30, 29), worn));
        assert!(!is_revealed(TilePos::new(31, 31), worn), "diagonals stay hidden");
        assert!(!is_revealed(TilePos::new(32, 30), worn));
    }

    #[test]
    fn test_reveal_at_plane_edge() {
        let edge = TilePos::new(i32::MAX, i32::MIN);
        let worn = |p: TilePos| p == TilePos::new(i32::MAX - 1, i32::MIN);
        assert!(is_revealed(edge, worn));
        assert!(!is_revealed(edge, |_| false));
    }

    #[test]
    fn test_reveal_map_from_tiles() {
        let mut tile = WorldTile {
            colony_id: ColonyId::new("c"),
            x: 40,
            y: -40,
            terrain: TerrainType::Swamp,
            overlay_feature: Some(OverlayFeature::AncientRoad),
            resources: Resources::default(),
            max_resources: Resources::default(),
            last_depleted: 0,
            path_wear: 0,
            danger_level: 40,
        };
        assert!(!RevealMap::from_tiles([&tile]).is_revealed(tile.pos()));
        assert_eq!(exploration_score(&tile), 45.0);

        tile.path_wear = 1;
        let map = RevealMap::from_tiles([&tile]);
        assert!(map.is_revealed(tile.pos()));
        assert!(map.is_revealed(TilePos::new(41, -40)));
    }
}
