//! Fatal configuration errors. Every search inside the generator recovers on its own,
//! so only bad inputs reach the caller.

use std::io;

use thiserror::Error;

use crate::types::TileCodeError;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("grid dimensions {width}x{height} are below the minimum of {minimum}x{minimum}")]
    InvalidDimensions { width: usize, height: usize, minimum: usize },

    #[error("unknown archetype '{0}'")]
    UnknownArchetype(String),

    #[error("invalid generator config: {0}")]
    InvalidConfig(String),

    #[error("grid rows must all have length {expected}, row {row} has {found}")]
    RaggedRows { row: usize, expected: usize, found: usize },

    #[error(transparent)]
    TileCode(#[from] TileCodeError),

    #[error("config io error: {0}")]
    Io(#[from] io::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("export error: {0}")]
    Json(#[from] serde_json::Error),
}
