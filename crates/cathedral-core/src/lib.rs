//! cathedral-core: procedural layouts in the style of cathedral dungeon levels
//!
//! A recursive quadrant subdivision produces a coarse floor/wall blueprint,
//! which is expanded to full resolution, made fully connected by carving
//! corridors, optionally split by dividing walls with doorways, and finally
//! autotiled into wall, corner and floor categories.
//!
//! This crate does no I/O. Rendering lives in `cathedral-render`.
//!
//! ```
//! use cathedral_core::{DungeonConfig, generate};
//!
//! let result = generate(&DungeonConfig::cathedral(), 7).unwrap();
//! assert_eq!(result.width, 40);
//! assert!(result.connectivity.is_connected());
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod grid;
pub mod tile;

mod rng;

pub use config::{Axis, DungeonConfig, SplitStrategy};
pub use error::{ConfigError, GenerationError, Stage};
pub use generation::{
    ConnectivityReport, Corridor, DividerReport, DungeonResult, generate, generate_with_rng,
};
pub use grid::{OccupancyGrid, Region};
pub use rng::DungeonRng;
pub use tile::{NeighborhoodPattern, TileCategory, TileCell};
