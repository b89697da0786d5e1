//! Chunked, seed-deterministic world map and territory economy for a colony idle game.

pub mod clock;
pub mod config;
pub mod coords;
pub mod economy;
pub mod error;
pub mod fog;
pub mod gateway;
pub mod mapgen;
pub mod render;
pub mod rng;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod terrain;
pub mod territory;
pub mod tile;
pub mod wear;

pub use config::Config;
pub use coords::{ChunkCoord, TilePos, CHUNK_SIZE};
pub use error::{StoreError, WorldError, WorldResult};
pub use gateway::{ChunkStatus, ResetReport, SweepReport, WorldGateway};
pub use store::{ColonyRecord, ColonyStatus, InMemoryStore, TileStore};
pub use tile::{ColonyId, ResourceKind, Resources, WorldTile};
