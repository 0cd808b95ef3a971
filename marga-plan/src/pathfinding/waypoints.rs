//! Waypoint reduction for coarse paths.
//!
//! A raw A* path visits every cell. The refinement stage only needs the
//! path's shape, so the cell chain is reduced in two passes: turn
//! extraction keeps the points where the direction actually changes,
//! and visibility shortcutting merges runs of turns that can see each
//! other directly.

use log::debug;

use crate::geometry::{euclidean, has_line_of_sight, GridPoint};
use crate::grid::SpeedGrid;

/// Reduce a cell-by-cell path to its turning points.
///
/// Walks the path comparing consecutive direction vectors by
/// cross-product sign. Straight runs collapse entirely; when two
/// consecutive turns rotate the same way, only the later point is kept,
/// while alternating turns are preserved. The endpoints always survive.
/// Paths shorter than three points pass through unchanged.
pub fn extract_turns(path: &[GridPoint]) -> Vec<GridPoint> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let mut waypoints = vec![path[0]];
    let mut prev = (path[1].x - path[0].x, path[1].y - path[0].y);
    let mut last_turn_sign = 0i32;
    let mut last_index = 0usize;

    for i in 1..path.len() - 1 {
        let curr = (path[i + 1].x - path[i].x, path[i + 1].y - path[i].y);
        let sign = (prev.0 * curr.1 - prev.1 * curr.0).signum();
        if sign == 0 {
            continue;
        }
        if last_turn_sign == sign {
            waypoints.push(path[last_index]);
            last_turn_sign = 0;
        } else {
            last_turn_sign = sign;
        }
        last_index = i;
        prev = curr;
    }

    let goal = *path.last().unwrap();
    if *waypoints.last().unwrap() != goal {
        waypoints.push(goal);
    }
    waypoints
}

/// Merge waypoints by greedy line-of-sight shortcutting.
///
/// From each kept waypoint, candidates are scanned from the farthest
/// remaining waypoint backward; candidates closer than `min_distance`
/// are skipped, and the walk jumps to the farthest candidate with an
/// unobstructed line of sight. The output never has more waypoints than
/// the input.
pub fn simplify_by_visibility(
    waypoints: &[GridPoint],
    grid: &SpeedGrid,
    min_distance: f64,
) -> Vec<GridPoint> {
    let mut simplified = Vec::new();
    let mut i = 0;

    while i < waypoints.len() {
        simplified.push(waypoints[i]);
        let mut next_i = i + 1;
        for j in (i + 1..waypoints.len()).rev() {
            if euclidean(waypoints[i], waypoints[j]) < min_distance {
                continue;
            }
            if has_line_of_sight(grid, waypoints[i], waypoints[j]) {
                next_i = j;
                break;
            }
        }
        i = next_i;
    }

    debug!(
        "reduced {} waypoints to {}",
        waypoints.len(),
        simplified.len()
    );
    simplified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_path_keeps_endpoints_only() {
        let path: Vec<GridPoint> = (0..10).map(|i| GridPoint::new(i, 0)).collect();
        let turns = extract_turns(&path);
        assert_eq!(turns, vec![GridPoint::new(0, 0), GridPoint::new(9, 0)]);
    }

    #[test]
    fn test_short_path_unchanged() {
        let path = vec![GridPoint::new(0, 0), GridPoint::new(1, 1)];
        assert_eq!(extract_turns(&path), path);
    }

    #[test]
    fn test_single_turn_detected() {
        // L-shaped path: right along y=0, then down along x=4
        let mut path: Vec<GridPoint> = (0..5).map(|i| GridPoint::new(i, 0)).collect();
        path.extend((1..5).map(|i| GridPoint::new(4, i)));

        let turns = extract_turns(&path);
        assert_eq!(*turns.first().unwrap(), GridPoint::new(0, 0));
        assert_eq!(*turns.last().unwrap(), GridPoint::new(4, 4));
        assert!(turns.contains(&GridPoint::new(4, 0)));
    }

    #[test]
    fn test_visibility_shortcut_collapses_open_grid() {
        let grid = SpeedGrid::filled(40, 40, 255);
        let waypoints = vec![
            GridPoint::new(0, 0),
            GridPoint::new(10, 5),
            GridPoint::new(20, 0),
            GridPoint::new(30, 30),
        ];

        let simplified = simplify_by_visibility(&waypoints, &grid, 1.0);
        assert_eq!(
            simplified,
            vec![GridPoint::new(0, 0), GridPoint::new(30, 30)]
        );
    }

    #[test]
    fn test_visibility_pairs_remain_visible() {
        let mut grid = SpeedGrid::filled(30, 30, 255);
        for y in 0..25 {
            grid.set(GridPoint::new(15, y), 0);
        }

        let waypoints = vec![
            GridPoint::new(2, 2),
            GridPoint::new(8, 14),
            GridPoint::new(14, 27),
            GridPoint::new(20, 27),
            GridPoint::new(27, 10),
        ];

        let simplified = simplify_by_visibility(&waypoints, &grid, 3.0);
        for pair in simplified.windows(2) {
            assert!(has_line_of_sight(&grid, pair[0], pair[1]));
        }
        assert!(simplified.len() <= waypoints.len());
    }

    #[test]
    fn test_min_distance_skips_close_candidates() {
        let grid = SpeedGrid::filled(20, 20, 255);
        let waypoints = vec![
            GridPoint::new(0, 0),
            GridPoint::new(1, 0),
            GridPoint::new(2, 0),
        ];

        // Every candidate is closer than min_distance, so the walk
        // falls back to single steps.
        let simplified = simplify_by_visibility(&waypoints, &grid, 10.0);
        assert_eq!(simplified, waypoints);
    }
}
