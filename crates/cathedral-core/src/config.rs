//! Generation configuration
//!
//! Every input to the pipeline is a named field here; nothing is defaulted
//! inside the stages.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::ConfigError;

/// A split axis for bisecting regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[strum(serialize = "x")]
    X,
    #[strum(serialize = "y")]
    Y,
}

impl Axis {
    pub const fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// How a region is divided when the blueprint builder subdivides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SplitStrategy {
    /// Split both axes at once into up to four quadrants.
    Quadrants,
    /// Split a single axis per level, alternating, starting with `first`.
    Bisect { first: Axis },
}

/// Input record for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonConfig {
    /// Blueprint width in coarse cells
    pub blueprint_width: usize,
    /// Blueprint height in coarse cells
    pub blueprint_height: usize,
    /// Regions at or below this size on both axes become leaves
    pub min_block_size: usize,
    /// Side of the square block each blueprint cell expands to
    pub expansion: usize,
    /// Probability that a leaf becomes floor
    pub floor_probability: f64,
    /// Probability that a region larger than a leaf is split further
    pub subdivide_probability: f64,
    pub split: SplitStrategy,
    /// Attempts with fewer floor cells than this are discarded
    pub min_floor_cells: usize,
    pub max_attempts: u32,
    /// Fraction of inner corners that grow a dividing wall; 0 disables
    /// dividers and doorways
    #[serde(default)]
    pub divider_ratio: f64,
}

impl DungeonConfig {
    /// The 40x40 level of the classic cathedral generator: a 10x10 blueprint
    /// of single-cell blocks, each expanded to 4x4.
    pub fn cathedral() -> Self {
        Self {
            blueprint_width: 10,
            blueprint_height: 10,
            min_block_size: 1,
            expansion: 4,
            floor_probability: 0.5,
            subdivide_probability: 0.75,
            split: SplitStrategy::Quadrants,
            min_floor_cells: 500,
            max_attempts: 1000,
            divider_ratio: 0.0,
        }
    }

    /// Full-resolution width, saturating for configurations that fail
    /// [`validate`](Self::validate)
    pub fn grid_width(&self) -> usize {
        self.blueprint_width.saturating_mul(self.expansion)
    }

    /// Full-resolution height, saturating like [`grid_width`](Self::grid_width)
    pub fn grid_height(&self) -> usize {
        self.blueprint_height.saturating_mul(self.expansion)
    }

    /// Full-resolution cell count, `None` when it does not fit in `usize`
    pub fn grid_cells(&self) -> Option<usize> {
        let width = self.blueprint_width.checked_mul(self.expansion)?;
        let height = self.blueprint_height.checked_mul(self.expansion)?;
        width.checked_mul(height)
    }

    /// Check every field; run before any stage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blueprint_width == 0 || self.blueprint_height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.blueprint_width,
                height: self.blueprint_height,
            });
        }
        if self.min_block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.min_block_size > self.blueprint_width.min(self.blueprint_height) {
            return Err(ConfigError::BlockLargerThanGrid {
                block: self.min_block_size,
                width: self.blueprint_width,
                height: self.blueprint_height,
            });
        }
        if self.expansion == 0 {
            return Err(ConfigError::ZeroExpansion);
        }
        check_probability("floor_probability", self.floor_probability)?;
        check_probability("subdivide_probability", self.subdivide_probability)?;
        check_probability("divider_ratio", self.divider_ratio)?;
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        let available = self.grid_cells().ok_or(ConfigError::GridTooLarge {
            width: self.blueprint_width,
            height: self.blueprint_height,
            expansion: self.expansion,
        })?;
        if self.min_floor_cells > available {
            return Err(ConfigError::FloorMinimumUnreachable {
                required: self.min_floor_cells,
                available,
            });
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails the range check too
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_is_valid() {
        let config = DungeonConfig::cathedral();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.grid_width(), 40);
        assert_eq!(config.grid_height(), 40);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let config = DungeonConfig {
            blueprint_width: 0,
            ..DungeonConfig::cathedral()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDimension { width: 0, .. })
        ));
    }

    #[test]
    fn test_block_larger_than_grid_rejected() {
        let config = DungeonConfig {
            blueprint_width: 8,
            blueprint_height: 4,
            min_block_size: 5,
            min_floor_cells: 0,
            ..DungeonConfig::cathedral()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BlockLargerThanGrid {
                block: 5,
                width: 8,
                height: 4
            })
        );
    }

    #[test]
    fn test_zero_expansion_rejected() {
        let config = DungeonConfig {
            expansion: 0,
            ..DungeonConfig::cathedral()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroExpansion));
    }

    #[test]
    fn test_bad_probabilities_rejected() {
        let config = DungeonConfig {
            floor_probability: 1.5,
            ..DungeonConfig::cathedral()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "floor_probability", .. })
        ));

        let config = DungeonConfig {
            subdivide_probability: f64::NAN,
            ..DungeonConfig::cathedral()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "subdivide_probability", .. })
        ));
    }

    #[test]
    fn test_unreachable_floor_minimum_rejected() {
        let config = DungeonConfig {
            min_floor_cells: 1601,
            ..DungeonConfig::cathedral()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FloorMinimumUnreachable {
                required: 1601,
                available: 1600
            })
        );
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let config = DungeonConfig {
            blueprint_width: usize::MAX / 2,
            expansion: 4,
            min_floor_cells: 0,
            ..DungeonConfig::cathedral()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooLarge {
                width: usize::MAX / 2,
                height: 10,
                expansion: 4
            })
        );
        assert_eq!(config.grid_width(), usize::MAX);
        assert_eq!(config.grid_cells(), None);
    }

    #[test]
    fn test_cell_count_overflow_rejected() {
        // Each side fits, the product does not
        let side = 1usize << (usize::BITS / 2);
        let config = DungeonConfig {
            blueprint_width: side,
            blueprint_height: side,
            expansion: 1,
            min_floor_cells: 0,
            ..DungeonConfig::cathedral()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_divider_ratio_checked() {
        let config = DungeonConfig {
            divider_ratio: -0.1,
            ..DungeonConfig::cathedral()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "divider_ratio", .. })
        ));
    }

    #[test]
    fn test_divider_ratio_defaults_in_json() {
        let json = r#"{"blueprint_width":4,"blueprint_height":4,"min_block_size":1,
            "expansion":2,"floor_probability":0.5,"subdivide_probability":1.0,
            "split":{"kind":"quadrants"},"min_floor_cells":0,"max_attempts":1}"#;
        let config: DungeonConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.divider_ratio, 0.0);
    }

    #[test]
    fn test_config_json_shape() {
        let config = DungeonConfig {
            split: SplitStrategy::Bisect { first: Axis::Y },
            ..DungeonConfig::cathedral()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""split":{"kind":"bisect","first":"y"}"#));
        let back: DungeonConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_axis_other() {
        assert_eq!(Axis::X.other(), Axis::Y);
        assert_eq!(Axis::Y.other(), Axis::X);
    }
}
