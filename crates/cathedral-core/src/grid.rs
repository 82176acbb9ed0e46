//! Boolean floor/wall grids
//!
//! `true` is floor, `false` is wall. Storage is row-major.

use serde::{Deserialize, Serialize};

/// The four cardinal steps, in N, W, E, S order.
pub(crate) const CARDINALS: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// A rectangular floor/wall grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Create a grid filled with wall
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, false)
    }

    /// Create a grid where every cell holds `floor`
    pub fn filled(width: usize, height: usize, floor: bool) -> Self {
        Self {
            width,
            height,
            cells: vec![floor; width * height],
        }
    }

    /// Build a grid from text rows: `.` is floor, anything else is wall.
    ///
    /// Rows shorter than the first are padded with wall.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().take(width).enumerate() {
                grid.set(x, y, c == '.');
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Check if (x, y) lies inside the grid
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Floor test; panics outside the grid like slice indexing.
    pub fn is_floor(&self, x: usize, y: usize) -> bool {
        assert!(x < self.width && y < self.height, "({x}, {y}) outside grid");
        self.cells[self.index(x, y)]
    }

    /// Floor test where everything outside the grid is wall
    pub fn is_floor_at(&self, x: isize, y: isize) -> bool {
        self.in_bounds(x, y) && self.cells[self.index(x as usize, y as usize)]
    }

    pub fn set(&mut self, x: usize, y: usize, floor: bool) {
        assert!(x < self.width && y < self.height, "({x}, {y}) outside grid");
        let idx = self.index(x, y);
        self.cells[idx] = floor;
    }

    /// Fill every cell of `region` that lies inside the grid
    pub fn fill(&mut self, region: &Region, floor: bool) {
        let x_end = (region.x + region.width).min(self.width);
        let y_end = (region.y + region.height).min(self.height);
        for y in region.y..y_end {
            for x in region.x..x_end {
                self.set(x, y, floor);
            }
        }
    }

    /// Number of floor cells
    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Iterate over (x, y, floor) in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &floor)| (i % width, i / width, floor))
    }

    /// In-grid 4-neighbours of (x, y)
    pub fn neighbors4(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        CARDINALS.iter().filter_map(move |&(dx, dy)| {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            self.in_bounds(nx, ny).then_some((nx as usize, ny as usize))
        })
    }
}

/// A rectangular area of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left x coordinate
    pub x: usize,
    /// Top y coordinate
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Split along the x axis into a left and right part.
    ///
    /// The left part receives the extra column of an odd width.
    pub fn split_x(&self) -> (Region, Region) {
        let left = self.width.div_ceil(2);
        (
            Region::new(self.x, self.y, left, self.height),
            Region::new(self.x + left, self.y, self.width - left, self.height),
        )
    }

    /// Split along the y axis into a top and bottom part.
    ///
    /// The top part receives the extra row of an odd height.
    pub fn split_y(&self) -> (Region, Region) {
        let top = self.height.div_ceil(2);
        (
            Region::new(self.x, self.y, self.width, top),
            Region::new(self.x, self.y + top, self.width, self.height - top),
        )
    }
}
