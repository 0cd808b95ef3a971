//! Working-region extraction and the margin growth loop.
//!
//! Coarse search never runs on the full map. A sub-grid is cropped
//! around start and goal with a margin, its border is sealed so the
//! search cannot escape the window, reference-route bands are masked
//! out, and the endpoints are snapped onto traversable terrain. When no
//! path exists inside the window the margin grows and the whole
//! procedure repeats, up to a maximum margin.

use std::collections::VecDeque;

use log::debug;

use crate::geometry::{bresenham_line, disk_offsets, euclidean, GridPoint, NEIGHBORS_8};
use crate::grid::SpeedGrid;
use crate::pathfinding::astar;

/// Fraction of the start-goal distance around each endpoint that is
/// exempt from reference-route masking.
const HINT_ENDPOINT_EXCLUSION: f64 = 0.4;

/// Divisor turning endpoint distance into the masked band radius.
const HINT_RADIUS_DIVISOR: f64 = 7.0;

/// A cropped working region in its own local coordinate space.
#[derive(Clone, Debug)]
pub struct Subregion {
    /// Owned copy of the cropped terrain.
    pub grid: SpeedGrid,
    /// Origin of the crop in parent-grid coordinates.
    pub offset: GridPoint,
    /// Start translated into crop coordinates.
    pub start: GridPoint,
    /// Goal translated into crop coordinates.
    pub goal: GridPoint,
    /// Reference routes translated into crop coordinates.
    pub hints: Vec<Vec<GridPoint>>,
}

/// Margin growth parameters.
#[derive(Clone, Debug)]
pub struct GrowthConfig {
    /// Margin of the first crop attempt, in pixels.
    pub initial_margin: i32,
    /// Margin increase per failed attempt.
    pub margin_step: i32,
    /// Margin at which the search gives up.
    pub max_margin: i32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            initial_margin: 50,
            margin_step: 50,
            max_margin: 400,
        }
    }
}

/// Crop a margin-expanded bounding box around start and goal.
///
/// The crop's outer border is forced impassable and start, goal, and
/// hints are translated into crop-local coordinates.
pub fn extract_subgrid(
    grid: &SpeedGrid,
    start: GridPoint,
    goal: GridPoint,
    hints: &[Vec<GridPoint>],
    margin: i32,
) -> Subregion {
    let w = grid.width() as i32;
    let h = grid.height() as i32;

    let x_min = (start.x.min(goal.x) - margin).clamp(0, w - 1);
    let x_max = (start.x.max(goal.x) + margin).clamp(0, w - 1);
    let y_min = (start.y.min(goal.y) - margin).clamp(0, h - 1);
    let y_max = (start.y.max(goal.y) + margin).clamp(0, h - 1);

    let sub_w = (x_max - x_min + 1) as usize;
    let sub_h = (y_max - y_min + 1) as usize;

    let mut sub = SpeedGrid::filled(sub_w, sub_h, 0);
    for y in 0..sub_h as i32 {
        for x in 0..sub_w as i32 {
            let value = grid.get(GridPoint::new(x_min + x, y_min + y));
            sub.set(GridPoint::new(x, y), value);
        }
    }

    // Seal the border so the search stays inside the window
    for x in 0..sub_w as i32 {
        sub.set(GridPoint::new(x, 0), 0);
        sub.set(GridPoint::new(x, sub_h as i32 - 1), 0);
    }
    for y in 0..sub_h as i32 {
        sub.set(GridPoint::new(0, y), 0);
        sub.set(GridPoint::new(sub_w as i32 - 1, y), 0);
    }

    let translate =
        |p: GridPoint| -> GridPoint { GridPoint::new(p.x - x_min, p.y - y_min) };

    Subregion {
        grid: sub,
        offset: GridPoint::new(x_min, y_min),
        start: translate(start),
        goal: translate(goal),
        hints: hints
            .iter()
            .map(|route| route.iter().copied().map(translate).collect())
            .collect(),
    }
}

/// Mask out bands along reference routes.
///
/// Along each rasterized hint segment, a disk of cells is zeroed. The
/// disk radius scales with the distance to the nearest endpoint, and
/// pixels within 40% of the start-goal distance of either endpoint are
/// left untouched, so the mask only shapes the middle of the route and
/// tapers off toward start and goal.
pub fn carve_hint_mask(
    grid: &mut SpeedGrid,
    hints: &[Vec<GridPoint>],
    start: GridPoint,
    goal: GridPoint,
) {
    let total = euclidean(start, goal);
    if total <= 0.0 {
        return;
    }

    for route in hints {
        for pair in route.windows(2) {
            for pixel in bresenham_line(pair[0], pair[1]) {
                let dist_start = euclidean(pixel, start);
                let dist_goal = euclidean(pixel, goal);
                if dist_start / total < HINT_ENDPOINT_EXCLUSION
                    || dist_goal / total < HINT_ENDPOINT_EXCLUSION
                {
                    continue;
                }
                if !grid.contains(pixel) {
                    continue;
                }
                let radius = (dist_start.min(dist_goal) / HINT_RADIUS_DIVISOR) as i32;
                for (dx, dy) in disk_offsets(radius) {
                    grid.set(GridPoint::new(pixel.x + dx, pixel.y + dy), 0);
                }
            }
        }
    }
}

/// Snap a point onto the nearest traversable cell.
///
/// A point already on traversable terrain is returned unchanged.
/// Otherwise an 8-connected breadth-first search finds the nearest
/// non-zero cell. Returns `None` when the point lies outside the grid
/// or no traversable cell is reachable.
pub fn snap_to_nearest_free(grid: &SpeedGrid, point: GridPoint) -> Option<GridPoint> {
    if !grid.contains(point) {
        return None;
    }
    if grid.is_passable(point) {
        return Some(point);
    }

    let mut visited = vec![false; grid.cell_count()];
    let mut queue = VecDeque::new();
    queue.push_back(point);
    visited[grid.index(point)] = true;

    while let Some(current) = queue.pop_front() {
        for (dx, dy) in NEIGHBORS_8 {
            let neighbor = GridPoint::new(current.x + dx, current.y + dy);
            if !grid.contains(neighbor) {
                continue;
            }
            let idx = grid.index(neighbor);
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            if grid.is_passable(neighbor) {
                return Some(neighbor);
            }
            queue.push_back(neighbor);
        }
    }

    None
}

/// Grow impassable cells into a penalty band.
///
/// Every traversable cell with an impassable cell inside the Chebyshev
/// `radius` box is rewritten to `penalty`, approximating a finite agent
/// footprint without making the band impassable. Pure copy-and-return;
/// the input grid is untouched.
pub fn inflate_obstacles(grid: &SpeedGrid, radius: i32, penalty: u8) -> SpeedGrid {
    let mut inflated = grid.clone();

    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let p = GridPoint::new(x, y);
            if grid.get(p) == 0 {
                continue;
            }
            'scan: for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let n = GridPoint::new(x + dx, y + dy);
                    if grid.contains(n) && grid.get(n) == 0 {
                        inflated.set(p, penalty);
                        break 'scan;
                    }
                }
            }
        }
    }

    inflated
}

/// Run the margin growth loop around the coarse search.
///
/// Per margin: crop, mask reference routes, snap both endpoints, run
/// A*. A failed snap or an empty search result only fails that margin;
/// the loop grows the window and retries until `max_margin` is
/// exceeded, at which point `None` is returned.
pub fn grow_region_and_search(
    grid: &SpeedGrid,
    start: GridPoint,
    goal: GridPoint,
    hints: &[Vec<GridPoint>],
    config: &GrowthConfig,
) -> Option<(Vec<GridPoint>, Subregion)> {
    let mut margin = config.initial_margin;

    while margin <= config.max_margin {
        let mut region = extract_subgrid(grid, start, goal, hints, margin);
        carve_hint_mask(&mut region.grid, &region.hints, region.start, region.goal);

        match (
            snap_to_nearest_free(&region.grid, region.start),
            snap_to_nearest_free(&region.grid, region.goal),
        ) {
            (Some(local_start), Some(local_goal)) => {
                region.start = local_start;
                region.goal = local_goal;
                if let Some(path) = astar(&region.grid, local_start, local_goal) {
                    debug!("coarse path found with margin {}", margin);
                    return Some((path, region));
                }
                debug!("no coarse path with margin {}, growing", margin);
            }
            _ => {
                debug!("endpoint snapping failed with margin {}, growing", margin);
            }
        }

        margin += config.margin_step;
    }

    debug!("margin growth exhausted at {}", config.max_margin);
    None
}
