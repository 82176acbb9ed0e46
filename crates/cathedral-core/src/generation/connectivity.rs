//! Room labeling and corridor carving
//!
//! Rooms are maximal 4-connected floor regions. Disconnected rooms are joined
//! Kruskal-style. A breadth-first search from every floor cell at once gives
//! each wall cell the room whose floor is nearest to it. Wherever two of these
//! areas touch, the rooms get a candidate edge between the floor cells the two
//! sides grew from, weighted by their Manhattan distance. Edges are taken
//! cheapest first, and each pair that is still apart gets an L-shaped corridor
//! (horizontal run, then vertical run) carved from wall to floor. The number of
//! candidates grows with the grid area, not with the square of the room count.

use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Stage};
use crate::grid::OccupancyGrid;

/// Tracks room connectivity as disjoint sets
///
/// Arena-backed union-find with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl ConnectivityTracker {
    /// Create a tracker where each of `num_rooms` rooms is its own set
    pub fn new(num_rooms: usize) -> Self {
        Self {
            parent: (0..num_rooms).collect(),
            rank: vec![0; num_rooms],
            sets: num_rooms,
        }
    }

    fn find(&mut self, mut a: usize) -> usize {
        let mut root = a;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[a] != root {
            let next = self.parent[a];
            self.parent[a] = root;
            a = next;
        }
        root
    }

    /// Check if two rooms are in the same set
    pub fn are_connected(&mut self, a: usize, b: usize) -> bool {
        if a >= self.parent.len() || b >= self.parent.len() {
            return false;
        }
        self.find(a) == self.find(b)
    }

    /// Join the sets of two rooms. Returns false if they were already joined.
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        if a >= self.parent.len() || b >= self.parent.len() {
            return false;
        }
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        self.sets -= 1;
        true
    }

    /// Check if all rooms are connected
    pub fn all_connected(&self) -> bool {
        self.sets <= 1
    }
}

/// Room labels for every cell of a grid.
#[derive(Debug, Clone)]
pub struct RoomMap {
    width: usize,
    labels: Vec<Option<usize>>,
    /// Cells of each room in discovery order; index is the room id
    rooms: Vec<Vec<(usize, usize)>>,
}

impl RoomMap {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Room id of a cell, `None` for wall
    pub fn label(&self, x: usize, y: usize) -> Option<usize> {
        self.labels[y * self.width + x]
    }

    /// Cells of room `id`
    pub fn cells(&self, id: usize) -> &[(usize, usize)] {
        &self.rooms[id]
    }
}

/// Label 4-connected floor regions.
///
/// Rooms are numbered in row-major order of their first cell. Uses an
/// explicit queue, so stack usage does not grow with room size.
pub fn label_rooms(grid: &OccupancyGrid) -> RoomMap {
    let width = grid.width();
    let mut labels = vec![None; width * grid.height()];
    let mut rooms = Vec::new();
    let mut queue = VecDeque::new();

    for (x, y, floor) in grid.iter() {
        if !floor || labels[y * width + x].is_some() {
            continue;
        }
        let id = rooms.len();
        let mut cells = Vec::new();
        labels[y * width + x] = Some(id);
        queue.push_back((x, y));

        while let Some((cx, cy)) = queue.pop_front() {
            cells.push((cx, cy));
            for (nx, ny) in grid.neighbors4(cx, cy) {
                let idx = ny * width + nx;
                if grid.is_floor(nx, ny) && labels[idx].is_none() {
                    labels[idx] = Some(id);
                    queue.push_back((nx, ny));
                }
            }
        }
        rooms.push(cells);
    }

    RoomMap {
        width,
        labels,
        rooms,
    }
}

/// Number of 4-connected floor regions
pub fn count_rooms(grid: &OccupancyGrid) -> usize {
    label_rooms(grid).room_count()
}

/// One carved corridor: an L from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corridor {
    pub from: (usize, usize),
    pub to: (usize, usize),
    /// Wall cells flipped to floor
    pub carved: usize,
}

/// Diagnostics of a connectivity pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub rooms_before: usize,
    pub rooms_after: usize,
    pub corridors: Vec<Corridor>,
    pub carved_cells: usize,
}

impl ConnectivityReport {
    /// True when the floor forms a single region (or there is no floor at all)
    pub fn is_connected(&self) -> bool {
        self.rooms_after <= 1
    }
}

/// Output of [`resolve_connectivity`].
#[derive(Debug, Clone)]
pub struct Resolved {
    pub grid: OccupancyGrid,
    /// Per-cell mask of cells carved by corridors, row-major
    pub carved: Vec<bool>,
    pub report: ConnectivityReport,
}

/// A candidate join between two rooms, `a_room < b_room`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Edge {
    distance: usize,
    a_room: usize,
    b_room: usize,
    // (y, x) so the derived ordering is row-major
    a: (usize, usize),
    b: (usize, usize),
}

/// Nearest room of a cell and the floor cell (x, y) it was reached from.
#[derive(Debug, Clone, Copy)]
struct Reach {
    room: usize,
    origin: (usize, usize),
}

/// Breadth-first search from all floor cells at once, across walls.
///
/// Floor cells are seeded in row-major order and neighbours are visited in
/// `CARDINALS` order, so a wall cell equally close to two rooms always goes to
/// the same one.
fn nearest_rooms(grid: &OccupancyGrid, rooms: &RoomMap) -> Vec<Option<Reach>> {
    let width = grid.width();
    let mut reach: Vec<Option<Reach>> = rooms
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            label.map(|room| Reach {
                room,
                origin: (i % width, i / width),
            })
        })
        .collect();
    let mut queue: VecDeque<(usize, usize)> = grid
        .iter()
        .filter(|&(_, _, floor)| floor)
        .map(|(x, y, _)| (x, y))
        .collect();

    while let Some((x, y)) = queue.pop_front() {
        let Some(from) = reach[y * width + x] else {
            continue;
        };
        for (nx, ny) in grid.neighbors4(x, y) {
            let idx = ny * width + nx;
            if reach[idx].is_none() {
                reach[idx] = Some(from);
                queue.push_back((nx, ny));
            }
        }
    }
    reach
}

/// Edges between touching nearest-room areas, sorted cheapest first.
fn candidate_edges(grid: &OccupancyGrid, rooms: &RoomMap) -> Vec<Edge> {
    let width = grid.width();
    let reach = nearest_rooms(grid, rooms);
    let mut edges = Vec::new();

    for (x, y, _) in grid.iter() {
        let Some(here) = reach[y * width + x] else {
            continue;
        };
        // Right and down cover every adjacent pair once
        for (nx, ny) in [(x + 1, y), (x, y + 1)] {
            if nx >= width || ny >= grid.height() {
                continue;
            }
            let Some(there) = reach[ny * width + nx] else {
                continue;
            };
            if here.room == there.room {
                continue;
            }
            let (a, b) = if here.room < there.room {
                (here, there)
            } else {
                (there, here)
            };
            edges.push(Edge {
                distance: a.origin.0.abs_diff(b.origin.0) + a.origin.1.abs_diff(b.origin.1),
                a_room: a.room,
                b_room: b.room,
                a: (a.origin.1, a.origin.0),
                b: (b.origin.1, b.origin.0),
            });
        }
    }

    edges.sort_unstable();
    edges.dedup();
    edges
}

/// Cells of the L from `from` to `to`, both (x, y): along `from`'s row to
/// `to`'s column, then along that column to `to`.
fn l_path(from: (usize, usize), to: (usize, usize)) -> Vec<(usize, usize)> {
    let (mut x, mut y) = from;
    let (tx, ty) = to;
    let mut path = Vec::with_capacity(x.abs_diff(tx) + y.abs_diff(ty) + 1);
    path.push((x, y));
    while x != tx {
        x = if x < tx { x + 1 } else { x - 1 };
        path.push((x, y));
    }
    while y != ty {
        y = if y < ty { y + 1 } else { y - 1 };
        path.push((x, y));
    }
    path
}

/// Join all rooms of `grid` into one 4-connected component.
///
/// Fails only if the carved grid still has more than one room, which would
/// be a bug in this module.
pub fn resolve_connectivity(grid: &OccupancyGrid) -> Result<Resolved, GenerationError> {
    let mut grid = grid.clone();
    let width = grid.width();
    let mut carved = vec![false; width * grid.height()];
    let rooms = label_rooms(&grid);
    let rooms_before = rooms.room_count();

    if rooms_before <= 1 {
        return Ok(Resolved {
            grid,
            carved,
            report: ConnectivityReport {
                rooms_before,
                rooms_after: rooms_before,
                corridors: Vec::new(),
                carved_cells: 0,
            },
        });
    }

    let edges = candidate_edges(&grid, &rooms);
    let mut labels = rooms.labels.clone();
    let mut tracker = ConnectivityTracker::new(rooms_before);
    let mut corridors = Vec::new();

    for edge in edges {
        if tracker.all_connected() {
            break;
        }
        if tracker.are_connected(edge.a_room, edge.b_room) {
            continue;
        }
        let from = (edge.a.1, edge.a.0);
        let to = (edge.b.1, edge.b.0);
        let mut flipped = 0;

        for (x, y) in l_path(from, to) {
            if !grid.is_floor(x, y) {
                grid.set(x, y, true);
                carved[y * width + x] = true;
                labels[y * width + x] = Some(edge.a_room);
                flipped += 1;
            }
            // The corridor touches every room adjacent to its path
            for (nx, ny) in std::iter::once((x, y)).chain(grid.neighbors4(x, y)) {
                if let Some(other) = labels[ny * width + nx] {
                    tracker.merge(edge.a_room, other);
                }
            }
        }

        corridors.push(Corridor {
            from,
            to,
            carved: flipped,
        });
    }

    let after = label_rooms(&grid);
    if after.room_count() != 1 {
        let (x, y) = after.cells(1)[0];
        return Err(GenerationError::invariant(
            Stage::Connectivity,
            x,
            y,
            format!("{} rooms remain after carving", after.room_count()),
        ));
    }

    let carved_cells = corridors.iter().map(|c| c.carved).sum();
    debug!(
        "connected {} rooms with {} corridors ({} cells carved)",
        rooms_before,
        corridors.len(),
        carved_cells
    );

    Ok(Resolved {
        grid,
        carved,
        report: ConnectivityReport {
            rooms_before,
            rooms_after: 1,
            corridors,
            carved_cells,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_tracker() {
        let mut tracker = ConnectivityTracker::new(5);

        assert!(!tracker.are_connected(0, 1));
        assert!(!tracker.are_connected(1, 2));

        assert!(tracker.merge(0, 1));
        assert!(tracker.are_connected(0, 1));
        assert!(!tracker.are_connected(0, 2));

        // Transitive
        tracker.merge(1, 2);
        assert!(tracker.are_connected(0, 2));

        assert!(!tracker.all_connected());
        assert!(!tracker.merge(2, 0));

        tracker.merge(2, 3);
        tracker.merge(3, 4);
        assert!(tracker.all_connected());
    }

    #[test]
    fn test_tracker_out_of_range() {
        let mut tracker = ConnectivityTracker::new(2);
        assert!(!tracker.are_connected(0, 5));
        assert!(!tracker.merge(5, 0));
    }

    #[test]
    fn test_label_rooms_scan_order() {
        let grid = OccupancyGrid::from_rows(&[
            "#..#.", //
            "#..#.", //
            "#####", //
            ".####",
        ]);
        let rooms = label_rooms(&grid);
        assert_eq!(rooms.room_count(), 3);
        assert_eq!(rooms.label(1, 0), Some(0));
        assert_eq!(rooms.label(4, 1), Some(1));
        assert_eq!(rooms.label(0, 3), Some(2));
        assert_eq!(rooms.label(0, 0), None);
        assert_eq!(rooms.cells(0).len(), 4);
    }

    #[test]
    fn test_diagonal_cells_are_separate_rooms() {
        let grid = OccupancyGrid::from_rows(&[".#", "#."]);
        assert_eq!(count_rooms(&grid), 2);
    }

    #[test]
    fn test_l_path_shapes() {
        assert_eq!(l_path((1, 1), (3, 2)), vec![(1, 1), (2, 1), (3, 1), (3, 2)]);
        assert_eq!(l_path((3, 2), (1, 0)), vec![(3, 2), (2, 2), (1, 2), (1, 1), (1, 0)]);
        assert_eq!(l_path((2, 2), (2, 2)), vec![(2, 2)]);
    }

    #[test]
    fn test_single_room_unchanged() {
        let grid = OccupancyGrid::from_rows(&["....", ".##.", "...."]);
        let resolved = resolve_connectivity(&grid).unwrap();
        assert_eq!(resolved.grid, grid);
        assert_eq!(resolved.report.rooms_before, 1);
        assert!(resolved.report.corridors.is_empty());
    }

    #[test]
    fn test_all_wall_has_no_rooms() {
        let grid = OccupancyGrid::new(5, 5);
        let resolved = resolve_connectivity(&grid).unwrap();
        assert_eq!(resolved.report.rooms_before, 0);
        assert_eq!(resolved.report.rooms_after, 0);
        assert!(resolved.report.is_connected());
    }

    #[test]
    fn test_two_rooms_joined_by_straight_corridor() {
        let grid = OccupancyGrid::from_rows(&[
            "..###..", //
            "..###..",
        ]);
        let resolved = resolve_connectivity(&grid).unwrap();
        assert_eq!(resolved.report.rooms_before, 2);
        assert_eq!(resolved.report.rooms_after, 1);
        assert_eq!(count_rooms(&resolved.grid), 1);
        // Closest pair on row 0 wins the tie with row 1
        assert_eq!(
            resolved.report.corridors,
            vec![Corridor {
                from: (1, 0),
                to: (5, 0),
                carved: 3
            }]
        );
        assert!(resolved.carved[2] && resolved.carved[3] && resolved.carved[4]);
        assert!(!resolved.grid.is_floor(3, 1));
    }

    #[test]
    fn test_corridor_through_middle_room_merges_it() {
        // Room 0 and room 2 are farther apart than either is from room 1;
        // two corridors are enough for three rooms
        let grid = OccupancyGrid::from_rows(&[
            ".#.#.", //
        ]);
        let resolved = resolve_connectivity(&grid).unwrap();
        assert_eq!(resolved.report.rooms_before, 3);
        assert_eq!(resolved.report.corridors.len(), 2);
        assert_eq!(resolved.report.carved_cells, 2);
        assert_eq!(resolved.grid.floor_count(), 5);
    }

    #[test]
    fn test_many_scattered_rooms_connect() {
        let grid = OccupancyGrid::from_rows(&[
            ".#.#.#.#", //
            "########", //
            "#.#.#.#.", //
            "########", //
            ".#######", //
            "#######.",
        ]);
        let resolved = resolve_connectivity(&grid).unwrap();
        assert_eq!(resolved.report.rooms_before, 10);
        assert_eq!(count_rooms(&resolved.grid), 1);
        let carved = resolved.carved.iter().filter(|&&c| c).count();
        assert_eq!(carved, resolved.report.carved_cells);
        assert_eq!(
            resolved.grid.floor_count(),
            grid.floor_count() + resolved.report.carved_cells
        );
    }

    #[test]
    fn test_candidates_grow_with_area_not_room_pairs() {
        // 24x24 lattice of single floor cells: 576 rooms, 165600 room pairs
        let row_floor: String = (0..48).map(|x| if x % 2 == 0 { '.' } else { '#' }).collect();
        let row_wall = "#".repeat(48);
        let rows: Vec<&str> = (0..48)
            .map(|y| if y % 2 == 0 { row_floor.as_str() } else { row_wall.as_str() })
            .collect();
        let grid = OccupancyGrid::from_rows(&rows);
        let rooms = label_rooms(&grid);
        assert_eq!(rooms.room_count(), 576);

        let edges = candidate_edges(&grid, &rooms);
        assert!(edges.len() <= 2 * 48 * 48, "{} edges", edges.len());
        assert!(edges.windows(2).all(|w| w[0] <= w[1]));
        assert!(edges.iter().all(|e| e.a_room < e.b_room));

        let resolved = resolve_connectivity(&grid).unwrap();
        assert_eq!(count_rooms(&resolved.grid), 1);
        assert_eq!(resolved.report.corridors.len(), 575);
    }

    #[test]
    fn test_wall_cells_go_to_nearest_room() {
        let grid = OccupancyGrid::from_rows(&[
            ".###.", //
        ]);
        let rooms = label_rooms(&grid);
        let reach = nearest_rooms(&grid, &rooms);
        let owner: Vec<usize> = reach.iter().map(|r| r.unwrap().room).collect();
        // (2, 0) is two steps from each room; row-major seeding gives it to room 0
        assert_eq!(owner, vec![0, 0, 0, 1, 1]);
        assert_eq!(reach[2].unwrap().origin, (0, 0));
        assert_eq!(reach[3].unwrap().origin, (4, 0));
    }

    #[test]
    fn test_carving_only_turns_wall_into_floor() {
        let grid = OccupancyGrid::from_rows(&[
            "..#####", //
            "..#####", //
            "#####..", //
            "#####..",
        ]);
        let resolved = resolve_connectivity(&grid).unwrap();
        for (x, y, floor) in grid.iter() {
            if floor {
                assert!(resolved.grid.is_floor(x, y));
            }
        }
    }
}
