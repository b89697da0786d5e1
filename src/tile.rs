//! Persisted world tile records

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coords::{ChunkCoord, TilePos};
use crate::error::WorldError;
use crate::terrain::{OverlayFeature, TerrainType};

/// Maximum path wear a tile can accumulate.
pub const MAX_WEAR: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColonyId(String);

impl ColonyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColonyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColonyId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Food,
    Herbs,
    Water,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Food => "food",
            ResourceKind::Herbs => "herbs",
            ResourceKind::Water => "water",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(ResourceKind::Food),
            "herbs" => Ok(ResourceKind::Herbs),
            "water" => Ok(ResourceKind::Water),
            other => Err(WorldError::InvalidInput(format!(
                "unknown resource kind '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resources {
    pub food: u32,
    pub herbs: u32,
    pub water: u32,
}

impl Resources {
    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Food => self.food,
            ResourceKind::Herbs => self.herbs,
            ResourceKind::Water => self.water,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Food => &mut self.food,
            ResourceKind::Herbs => &mut self.herbs,
            ResourceKind::Water => &mut self.water,
        }
    }
}

/// One cell of a colony's world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldTile {
    pub colony_id: ColonyId,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub terrain: TerrainType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_feature: Option<OverlayFeature>,
    pub resources: Resources,
    pub max_resources: Resources,
    /// Milliseconds since the epoch when a tracked resource hit zero; `0` when not depleted.
    #[serde(default)]
    pub last_depleted: i64,
    pub path_wear: u8,
    pub danger_level: u8,
}

impl WorldTile {
    pub fn pos(&self) -> TilePos {
        TilePos::new(self.x, self.y)
    }

    pub fn chunk(&self) -> ChunkCoord {
        self.pos().chunk()
    }

    /// Rivers hold infinite water, whether the river is the terrain or an overlay.
    pub fn is_river(&self) -> bool {
        self.terrain == TerrainType::River || self.overlay_feature == Some(OverlayFeature::River)
    }

    pub fn is_marked_depleted(&self) -> bool {
        self.last_depleted != 0
    }

    /// Checks the per-tile invariants the store relies on.
    pub fn validate(&self) -> Result<(), String> {
        for kind in [ResourceKind::Food, ResourceKind::Herbs, ResourceKind::Water] {
            if self.resources.get(kind) > self.max_resources.get(kind) {
                return Err(format!(
                    "tile ({}, {}) has {} {} above max {}",
                    self.x,
                    self.y,
                    self.resources.get(kind),
                    kind,
                    self.max_resources.get(kind)
                ));
            }
        }
        if self.path_wear > MAX_WEAR {
            return Err(format!("tile ({}, {}) wear {} above 100", self.x, self.y, self.path_wear));
        }
        if self.danger_level > 100 {
            return Err(format!(
                "tile ({}, {}) danger {} above 100",
                self.x, self.y, self.danger_level
            ));
        }
        Ok(())
    }
}
