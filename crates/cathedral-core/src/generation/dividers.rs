//! Dividing walls and doorways
//!
//! Inner room corners grow straight walls across the floor, continuing the
//! edges of the rock that forms the corner, until they run into another wall.
//! Each unbroken run of new wall is a span. A span is cut where a later
//! divider runs into it, and every span gets exactly one doorway.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::generation::classify::corner_shape;
use crate::grid::OccupancyGrid;
use crate::rng::DungeonRng;
use crate::tile::TileCategory;

/// Counts from a divider pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DividerReport {
    /// Divider cells left standing after doorways were opened
    pub walls: usize,
    pub doors: usize,
}

/// Output of [`add_dividers`].
#[derive(Debug, Clone)]
pub struct Divided {
    pub grid: OccupancyGrid,
    /// Per-cell mask of divider walls, row-major
    pub divider: Vec<bool>,
    pub report: DividerReport,
}

/// Directions a divider may grow from an inner corner: away from the rock,
/// along each of its two edges.
fn growth_directions(shape: TileCategory) -> &'static [(isize, isize)] {
    match shape {
        TileCategory::CornerInnerSW => &[(0, -1), (1, 0)],
        TileCategory::CornerInnerSE => &[(0, -1), (-1, 0)],
        TileCategory::CornerInnerNE => &[(0, 1), (-1, 0)],
        TileCategory::CornerInnerNW => &[(0, 1), (1, 0)],
        _ => &[],
    }
}

struct Builder {
    grid: OccupancyGrid,
    divider: Vec<bool>,
    /// Divider cells another divider ran into
    junction: Vec<bool>,
}

impl Builder {
    fn index(&self, x: isize, y: isize) -> usize {
        y as usize * self.grid.width() + x as usize
    }

    /// Grow one divider from `start` in `dir`, returning its spans.
    fn grow(&mut self, start: (usize, usize), (dx, dy): (isize, isize)) -> Vec<Vec<usize>> {
        let mut spans: Vec<Vec<usize>> = vec![Vec::new()];
        let (mut x, mut y) = (start.0 as isize + dx, start.1 as isize + dy);

        loop {
            if !self.grid.is_floor_at(x, y) {
                if self.grid.in_bounds(x, y) {
                    let idx = self.index(x, y);
                    if self.divider[idx] {
                        self.junction[idx] = true;
                    }
                }
                break;
            }
            // Sides across the direction of growth
            let open_sides = self.grid.is_floor_at(x + dy, y + dx)
                && self.grid.is_floor_at(x - dy, y - dx);
            if open_sides {
                let idx = self.index(x, y);
                self.grid.set(x as usize, y as usize, false);
                self.divider[idx] = true;
                if let Some(span) = spans.last_mut() {
                    span.push(idx);
                }
            } else if spans.last().is_some_and(|span| !span.is_empty()) {
                spans.push(Vec::new());
            }
            x += dx;
            y += dy;
        }

        spans.retain(|span| !span.is_empty());
        spans
    }
}

/// Grow dividers from `ratio` of the inner-corner growth sites of `grid`,
/// then open one doorway per span.
pub fn add_dividers(grid: &OccupancyGrid, ratio: f64, rng: &mut DungeonRng) -> Divided {
    let cells = grid.width() * grid.height();
    let mut builder = Builder {
        grid: grid.clone(),
        divider: vec![false; cells],
        junction: vec![false; cells],
    };

    let sites: Vec<((usize, usize), (isize, isize))> = grid
        .iter()
        .filter(|&(_, _, floor)| !floor)
        .flat_map(|(x, y, _)| {
            growth_directions(corner_shape(grid, x, y))
                .iter()
                .map(move |&dir| ((x, y), dir))
        })
        .collect();
    let amount = (sites.len() as f64 * ratio.clamp(0.0, 1.0)) as usize;

    let mut spans = Vec::new();
    if amount > 0 {
        for i in rng.sample(sites.len(), amount) {
            let (start, dir) = sites[i];
            spans.extend(builder.grow(start, dir));
        }
    }

    // Junction cells stay wall and cut their span in two
    let pieces: Vec<Vec<usize>> = spans
        .iter()
        .flat_map(|span| span.split(|&idx| builder.junction[idx]))
        .filter(|piece| !piece.is_empty())
        .map(<[usize]>::to_vec)
        .collect();

    let width = grid.width();
    for piece in &pieces {
        let door = piece[rng.below(piece.len())];
        builder.grid.set(door % width, door / width, true);
        builder.divider[door] = false;
    }

    let report = DividerReport {
        walls: builder.divider.iter().filter(|&&d| d).count(),
        doors: pieces.len(),
    };
    debug!(
        "{} of {} divider sites grown: {} wall cells, {} doorways",
        amount,
        sites.len(),
        report.walls,
        report.doors
    );

    Divided {
        grid: builder.grid,
        divider: builder.divider,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::connectivity::count_rooms;

    /// An L-shaped room: rock in the top-left quadrant of a 7x7 floor area.
    fn l_room() -> OccupancyGrid {
        OccupancyGrid::from_rows(&[
            "#########", //
            "####....#", //
            "####....#", //
            "####....#", //
            "#.......#", //
            "#.......#", //
            "#.......#", //
            "#.......#", //
            "#########",
        ])
    }

    #[test]
    fn test_growth_sites_are_inner_corners() {
        let grid = l_room();
        assert_eq!(corner_shape(&grid, 3, 3), TileCategory::CornerInnerNW);
        assert_eq!(growth_directions(TileCategory::CornerInnerNW), &[(0, 1), (1, 0)]);
        assert!(growth_directions(TileCategory::WallN).is_empty());
    }

    #[test]
    fn test_zero_ratio_changes_nothing() {
        let grid = l_room();
        let mut rng = DungeonRng::new(1);
        let divided = add_dividers(&grid, 0.0, &mut rng);
        assert_eq!(divided.grid, grid);
        assert_eq!(divided.report, DividerReport::default());
    }

    #[test]
    fn test_full_ratio_divides_the_l() {
        let grid = l_room();
        let mut rng = DungeonRng::new(5);
        let divided = add_dividers(&grid, 1.0, &mut rng);

        // Both edges of the rock are extended: column 3 down, row 3 right
        assert!(divided.report.walls > 0);
        assert_eq!(divided.report.doors, 2);
        for y in 4..8 {
            let idx = y * 9 + 3;
            assert!(divided.divider[idx] || divided.grid.is_floor(3, y));
        }
        for x in 4..8 {
            let idx = 3 * 9 + x;
            assert!(divided.divider[idx] || divided.grid.is_floor(x, 3));
        }
        // Dividers only replace floor
        for (x, y, floor) in divided.grid.iter() {
            if divided.divider[y * 9 + x] {
                assert!(!floor && grid.is_floor(x, y));
            }
        }
        assert_eq!(count_rooms(&divided.grid), 1);
    }

    #[test]
    fn test_single_span_gets_one_door() {
        let mut builder = Builder {
            grid: OccupancyGrid::from_rows(&[
                "#####", //
                ".....", //
                ".....", //
                ".....",
            ]),
            divider: vec![false; 20],
            junction: vec![false; 20],
        };
        // Grow down column 2 from the top wall
        let spans = builder.grow((2, 0), (0, 1));
        assert_eq!(spans, vec![vec![7, 12, 17]]);
        assert!(!builder.grid.is_floor(2, 3));
    }

    #[test]
    fn test_span_breaks_where_a_side_is_wall() {
        let mut builder = Builder {
            grid: OccupancyGrid::from_rows(&[
                "......", //
                "......", //
                ".##...", //
            ]),
            divider: vec![false; 18],
            junction: vec![false; 18],
        };
        // Row 1 left to right: cells 1 and 2 have wall below
        let spans = builder.grow((0, 1), (1, 0));
        assert_eq!(spans, vec![vec![9, 10, 11]]);
        assert!(builder.grid.is_floor(1, 1) && builder.grid.is_floor(2, 1));
    }

    #[test]
    fn test_running_into_a_divider_marks_junction() {
        let mut builder = Builder {
            grid: OccupancyGrid::from_rows(&[
                "#####", //
                ".....", //
                ".....", //
                ".....",
            ]),
            divider: vec![false; 20],
            junction: vec![false; 20],
        };
        builder.grow((2, 0), (0, 1));
        // Row 2 from the left edge hits the column-2 divider at (2, 2)
        let spans = builder.grow((0, 2), (1, 0));
        assert_eq!(spans, vec![vec![11]]);
        assert!(builder.junction[12]);
    }

    #[test]
    fn test_dividers_are_reproducible() {
        let grid = l_room();
        let a = add_dividers(&grid, 0.5, &mut DungeonRng::new(8));
        let b = add_dividers(&grid, 0.5, &mut DungeonRng::new(8));
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.divider, b.divider);
    }
}
