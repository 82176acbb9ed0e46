//! Error types for dungeon generation

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Pipeline stage, used to locate invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Stage {
    #[strum(serialize = "blueprint")]
    Blueprint,
    #[strum(serialize = "expansion")]
    Expansion,
    #[strum(serialize = "connectivity")]
    Connectivity,
    #[strum(serialize = "classification")]
    Classification,
}

/// Invalid configuration, detected before any stage runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("blueprint dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    #[error("minimum block size must be at least 1")]
    ZeroBlockSize,

    #[error("minimum block size {block} exceeds blueprint size {width}x{height}")]
    BlockLargerThanGrid {
        block: usize,
        width: usize,
        height: usize,
    },

    #[error("expansion factor must be at least 1")]
    ZeroExpansion,

    #[error("{name} must lie in 0..=1, got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("blueprint {width}x{height} expanded by {expansion} does not fit in memory")]
    GridTooLarge {
        width: usize,
        height: usize,
        expansion: usize,
    },

    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("min_floor_cells {required} exceeds the {available} cells of the grid")]
    FloorMinimumUnreachable { required: usize, available: usize },
}

/// Failure of a generation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A bug: the pipeline produced something its own invariants forbid.
    #[error("invariant violated during {stage} at ({x}, {y}): {detail}")]
    InvariantViolation {
        stage: Stage,
        x: usize,
        y: usize,
        detail: String,
    },

    #[error("only {best} floor cells after {attempts} attempts, {required} required")]
    InsufficientFloor {
        best: usize,
        required: usize,
        attempts: u32,
    },

    #[error("dividing walls split the floor in all {attempts} attempts with enough floor")]
    Unpathable { attempts: u32 },
}

impl GenerationError {
    pub(crate) fn invariant(stage: Stage, x: usize, y: usize, detail: impl Into<String>) -> Self {
        GenerationError::InvariantViolation {
            stage,
            x,
            y,
            detail: detail.into(),
        }
    }
}
