use thiserror::Error;

use crate::coords::TilePos;
use crate::tile::ColonyId;

/// Failures raised by a tile store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tile store lock poisoned")]
    Poisoned,
    #[error("colony '{0}' has no record in the store")]
    ColonyMissing(ColonyId),
    #[error("colony '{0}' already exists")]
    ColonyExists(ColonyId),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("colony '{0}' not found")]
    ColonyNotFound(ColonyId),
    #[error("tile ({x}, {y}) not found for colony '{colony}'", x = .pos.x, y = .pos.y)]
    TileNotFound { colony: ColonyId, pos: TilePos },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("chunk generation failed: {0}")]
    GenerationFailure(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type WorldResult<T> = Result<T, WorldError>;
