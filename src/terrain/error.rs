// src/terrain/error.rs

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TerrainError {
    #[error("cell ({i}, {j}) is outside a {size}x{size} terrain")]
    OutOfBounds { i: i32, j: i32, size: usize },

    #[error("world position ({x}, {y}) is outside the terrain")]
    WorldOutOfBounds { x: f32, y: f32 },

    #[error("unknown mesh style `{0}` (expected block, indented or tapered)")]
    UnknownStyle(String),

    #[error("invalid terrain configuration: {0}")]
    InvalidConfig(String),

    #[error("height level {level} at ({i}, {j}) is outside [{min}, {max}]")]
    LevelOutOfRange { i: usize, j: usize, level: i32, min: i32, max: i32 },

    #[error("expected {expected} height levels for the grid, got {actual}")]
    LevelCountMismatch { expected: usize, actual: usize },
}
