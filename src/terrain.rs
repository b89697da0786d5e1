//! Terrain and overlay classifications

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    Meadow,
    Field,
    Forest,
    DenseForest,
    PineForest,
    Mountains,
    Swamp,
    Desert,
    Tundra,
    CaveEntrance,
    River,
    EnemyTerritory,
    EnemyLair,
}

/// Upper bounds a freshly generated tile may be endowed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceProfile {
    pub food: u32,
    pub herbs: u32,
    pub water: u32,
}

impl TerrainType {
    pub const ALL: [TerrainType; 13] = [
        TerrainType::Meadow,
        TerrainType::Field,
        TerrainType::Forest,
        TerrainType::DenseForest,
        TerrainType::PineForest,
        TerrainType::Mountains,
        TerrainType::Swamp,
        TerrainType::Desert,
        TerrainType::Tundra,
        TerrainType::CaveEntrance,
        TerrainType::River,
        TerrainType::EnemyTerritory,
        TerrainType::EnemyLair,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TerrainType::Meadow => "meadow",
            TerrainType::Field => "field",
            TerrainType::Forest => "forest",
            TerrainType::DenseForest => "dense_forest",
            TerrainType::PineForest => "pine_forest",
            TerrainType::Mountains => "mountains",
            TerrainType::Swamp => "swamp",
            TerrainType::Desert => "desert",
            TerrainType::Tundra => "tundra",
            TerrainType::CaveEntrance => "cave_entrance",
            TerrainType::River => "river",
            TerrainType::EnemyTerritory => "enemy_territory",
            TerrainType::EnemyLair => "enemy_lair",
        }
    }

    pub fn resource_profile(self) -> ResourceProfile {
        let (food, herbs, water) = match self {
            TerrainType::Meadow => (6, 4, 2),
            TerrainType::Field => (8, 2, 1),
            TerrainType::Forest => (7, 6, 2),
            TerrainType::DenseForest => (9, 8, 1),
            TerrainType::PineForest => (5, 7, 1),
            TerrainType::Mountains => (2, 5, 1),
            TerrainType::Swamp => (4, 9, 6),
            TerrainType::Desert => (1, 1, 0),
            TerrainType::Tundra => (2, 1, 3),
            TerrainType::CaveEntrance => (3, 3, 2),
            TerrainType::River => (5, 3, 10),
            TerrainType::EnemyTerritory => (4, 3, 2),
            TerrainType::EnemyLair => (6, 2, 1),
        };
        ResourceProfile { food, herbs, water }
    }

    /// Inclusive danger band for freshly generated tiles.
    pub fn danger_band(self) -> (u32, u32) {
        match self {
            TerrainType::Meadow | TerrainType::Field => (0, 10),
            TerrainType::Forest => (5, 20),
            TerrainType::PineForest | TerrainType::River => (5, 25),
            TerrainType::DenseForest | TerrainType::Tundra => (15, 40),
            TerrainType::Desert => (20, 45),
            TerrainType::Swamp | TerrainType::Mountains => (25, 50),
            TerrainType::CaveEntrance => (35, 65),
            TerrainType::EnemyTerritory => (50, 80),
            TerrainType::EnemyLair => (75, 100),
        }
    }

    /// Movement cost multiplier before any wear or overlay bonus.
    pub fn travel_cost(self) -> f64 {
        match self {
            TerrainType::Meadow | TerrainType::Field => 1.0,
            TerrainType::Forest | TerrainType::EnemyTerritory => 1.2,
            TerrainType::PineForest | TerrainType::CaveEntrance | TerrainType::EnemyLair => 1.4,
            TerrainType::DenseForest | TerrainType::Desert | TerrainType::Tundra => 1.6,
            TerrainType::Swamp | TerrainType::River => 1.8,
            TerrainType::Mountains => 2.2,
        }
    }

    /// Ground held by a rival faction.
    pub fn is_hostile(self) -> bool {
        matches!(self, TerrainType::EnemyTerritory | TerrainType::EnemyLair)
    }

    /// Single-character map glyph.
    pub fn glyph(self) -> char {
        match self {
            TerrainType::Meadow => '.',
            TerrainType::Field => ',',
            TerrainType::Forest => 'f',
            TerrainType::DenseForest => 'F',
            TerrainType::PineForest => 'p',
            TerrainType::Mountains => '^',
            TerrainType::Swamp => '%',
            TerrainType::Desert => ':',
            TerrainType::Tundra => '*',
            TerrainType::CaveEntrance => 'C',
            TerrainType::River => '~',
            TerrainType::EnemyTerritory => 'x',
            TerrainType::EnemyLair => 'X',
        }
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TerrainType {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TerrainType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| WorldError::InvalidInput(format!("unknown terrain type '{s}'")))
    }
}

/// Feature layered over terrain. Orthogonal to `TerrainType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayFeature {
    River,
    AncientRoad,
    GameTrail,
    TradeRoute,
}

impl OverlayFeature {
    pub fn as_str(self) -> &'static str {
        match self {
            OverlayFeature::River => "river",
            OverlayFeature::AncientRoad => "ancient_road",
            OverlayFeature::GameTrail => "game_trail",
            OverlayFeature::TradeRoute => "trade_route",
        }
    }

    /// Multiplier applied to the terrain's travel cost.
    pub fn travel_multiplier(self) -> f64 {
        match self {
            OverlayFeature::River => 1.3,
            OverlayFeature::AncientRoad => 0.6,
            OverlayFeature::TradeRoute => 0.7,
            OverlayFeature::GameTrail => 0.85,
        }
    }

    /// Flat bonus added to a tile's exploration score.
    pub fn exploration_bonus(self) -> u32 {
        match self {
            OverlayFeature::AncientRoad => 25,
            OverlayFeature::TradeRoute => 15,
            OverlayFeature::River => 10,
            OverlayFeature::GameTrail => 5,
        }
    }
}

impl fmt::Display for OverlayFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
