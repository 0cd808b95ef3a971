//! Geometry primitives shared by every search stage.
//!
//! Provides the integer grid point type, the Euclidean heuristic,
//! Bresenham line rasterization, line-of-sight testing, and disk masks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::SpeedGrid;

/// Integer pixel coordinate on a speed grid (x = column, y = row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl GridPoint {
    /// Create a new grid point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &GridPoint) -> f64 {
        euclidean(*self, *other)
    }
}

/// Euclidean distance between two grid points.
///
/// Admissible heuristic for both the coarse and the refinement search.
#[inline]
pub fn euclidean(a: GridPoint, b: GridPoint) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    dx.hypot(dy)
}

/// 8-connected neighbor offsets.
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Rasterize the segment from `a` to `b` with Bresenham's algorithm.
///
/// Both endpoints are included. The covered cell set is symmetric in
/// direction; only the ordering depends on which endpoint comes first.
pub fn bresenham_line(a: GridPoint, b: GridPoint) -> Vec<GridPoint> {
    let mut points = Vec::new();

    let mut x0 = a.x;
    let mut y0 = a.y;
    let x1 = b.x;
    let y1 = b.y;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        points.push(GridPoint::new(x0, y0));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }

    points
}

/// Check whether the straight line between two cells crosses an
/// impassable cell. Endpoints are included in the test.
pub fn has_line_of_sight(grid: &SpeedGrid, a: GridPoint, b: GridPoint) -> bool {
    bresenham_line(a, b).iter().all(|p| grid.get(*p) != 0)
}

/// All integer offsets within Euclidean `radius`, boundary inclusive.
pub fn disk_offsets(radius: i32) -> Vec<(i32, i32)> {
    let r2 = radius * radius;
    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

/// Memoized line-of-sight queries for one search invocation.
///
/// The pair space is unbounded in theory, so the cache holds at most
/// `capacity` entries; once full, further pairs are computed but not
/// stored. A cache is scoped to a single grid and must not be reused
/// across searches over different grids.
#[derive(Debug)]
pub struct LosCache {
    entries: HashMap<(GridPoint, GridPoint), bool>,
    capacity: usize,
}

impl LosCache {
    /// Create an empty cache with the given entry capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
        }
    }

    /// Line-of-sight between `a` and `b`, answered from the cache when
    /// the pair has been seen before.
    pub fn is_visible(&mut self, grid: &SpeedGrid, a: GridPoint, b: GridPoint) -> bool {
        if let Some(&visible) = self.entries.get(&(a, b)) {
            return visible;
        }
        let visible = has_line_of_sight(grid, a, b);
        if self.entries.len() < self.capacity {
            self.entries.insert((a, b), visible);
        }
        visible
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no pair has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_line() {
        let p = GridPoint::new(3, 7);
        assert_eq!(bresenham_line(p, p), vec![p]);
    }

    #[test]
    fn test_line_endpoints_included() {
        let a = GridPoint::new(0, 0);
        let b = GridPoint::new(5, 2);
        let line = bresenham_line(a, b);
        assert_eq!(*line.first().unwrap(), a);
        assert_eq!(*line.last().unwrap(), b);
    }

    #[test]
    fn test_line_direction_symmetry() {
        use std::collections::HashSet;

        let a = GridPoint::new(1, 2);
        let b = GridPoint::new(11, 6);

        let forward: HashSet<GridPoint> = bresenham_line(a, b).into_iter().collect();
        let backward: HashSet<GridPoint> = bresenham_line(b, a).into_iter().collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_disk_offsets_within_radius() {
        let offsets = disk_offsets(3);
        assert!(offsets.contains(&(0, 0)));
        assert!(offsets.contains(&(3, 0)));
        assert!(!offsets.contains(&(3, 1)));
        for (dx, dy) in offsets {
            assert!(dx * dx + dy * dy <= 9);
        }
    }

    #[test]
    fn test_disk_offsets_zero_radius() {
        assert_eq!(disk_offsets(0), vec![(0, 0)]);
    }

    #[test]
    fn test_line_of_sight_blocked() {
        let mut grid = SpeedGrid::filled(10, 10, 255);
        for y in 0..10 {
            grid.set(GridPoint::new(5, y), 0);
        }

        assert!(!has_line_of_sight(
            &grid,
            GridPoint::new(0, 5),
            GridPoint::new(9, 5)
        ));
        assert!(has_line_of_sight(
            &grid,
            GridPoint::new(0, 0),
            GridPoint::new(4, 9)
        ));
    }

    #[test]
    fn test_line_of_sight_blocked_endpoint() {
        let mut grid = SpeedGrid::filled(5, 5, 200);
        grid.set(GridPoint::new(4, 4), 0);

        assert!(!has_line_of_sight(
            &grid,
            GridPoint::new(0, 0),
            GridPoint::new(4, 4)
        ));
    }

    #[test]
    fn test_los_cache_capacity() {
        let grid = SpeedGrid::filled(20, 20, 255);
        let mut cache = LosCache::new(2);

        assert!(cache.is_visible(&grid, GridPoint::new(0, 0), GridPoint::new(5, 5)));
        assert!(cache.is_visible(&grid, GridPoint::new(0, 0), GridPoint::new(6, 5)));
        assert!(cache.is_visible(&grid, GridPoint::new(0, 0), GridPoint::new(7, 5)));

        // Third pair computed but not stored
        assert_eq!(cache.len(), 2);
    }
}
