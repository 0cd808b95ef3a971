//! Coarse A* search over a speed grid.
//!
//! 8-connected weighted shortest path. Edge costs scale with the
//! inverse of terrain speed, so the search prefers fast terrain over
//! geometrically shorter but slower routes. The resulting cell-by-cell
//! path is the guidance skeleton for the any-angle refinement stage.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use crate::geometry::{euclidean, GridPoint, NEIGHBORS_8};
use crate::grid::SpeedGrid;

/// Frontier entry. Ordered by f-score, ties broken by g-score, both
/// min-first.
#[derive(Clone, Copy, Debug)]
struct OpenNode {
    f: f64,
    g: f64,
    index: u32,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then(other.g.partial_cmp(&self.g).unwrap_or(Ordering::Equal))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the cheapest 8-connected path from `start` to `goal`.
///
/// Returns `None` when the frontier empties without reaching the goal,
/// or when either endpoint lies outside the grid. `start == goal`
/// yields a single-point path.
pub fn astar(grid: &SpeedGrid, start: GridPoint, goal: GridPoint) -> Option<Vec<GridPoint>> {
    if !grid.contains(start) || !grid.contains(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let cell_count = grid.cell_count();
    let mut g_score = vec![f64::INFINITY; cell_count];
    let mut parent = vec![u32::MAX; cell_count];
    let mut closed = vec![false; cell_count];
    let mut open = BinaryHeap::new();

    let start_idx = grid.index(start);
    let goal_idx = grid.index(goal);

    g_score[start_idx] = 0.0;
    open.push(OpenNode {
        f: euclidean(start, goal),
        g: 0.0,
        index: start_idx as u32,
    });

    let mut nodes_expanded = 0usize;

    while let Some(node) = open.pop() {
        let current_idx = node.index as usize;
        if closed[current_idx] {
            continue;
        }
        closed[current_idx] = true;
        nodes_expanded += 1;

        if current_idx == goal_idx {
            trace!(
                "coarse path found: g={:.1}, {} nodes expanded",
                node.g,
                nodes_expanded
            );
            return Some(reconstruct(grid, &parent, goal_idx, start_idx));
        }

        let current = grid.point(current_idx);
        let current_g = g_score[current_idx];

        for (dx, dy) in NEIGHBORS_8 {
            let neighbor = GridPoint::new(current.x + dx, current.y + dy);
            if !grid.contains(neighbor) {
                continue;
            }
            let speed = grid.get(neighbor);
            if speed == 0 {
                continue;
            }

            let step = ((dx * dx + dy * dy) as f64).sqrt();
            let tentative_g = current_g + step * (255 - speed) as f64;

            let neighbor_idx = grid.index(neighbor);
            if tentative_g < g_score[neighbor_idx] {
                g_score[neighbor_idx] = tentative_g;
                parent[neighbor_idx] = current_idx as u32;
                open.push(OpenNode {
                    f: tentative_g + euclidean(neighbor, goal),
                    g: tentative_g,
                    index: neighbor_idx as u32,
                });
            }
        }
    }

    trace!("coarse search exhausted after {} nodes", nodes_expanded);
    None
}

/// Walk parent handles from goal back to start and reverse.
fn reconstruct(grid: &SpeedGrid, parent: &[u32], goal_idx: usize, start_idx: usize) -> Vec<GridPoint> {
    let mut path = Vec::new();
    let mut current = goal_idx;

    path.push(grid.point(current));
    while current != start_idx {
        current = parent[current] as usize;
        path.push(grid.point(current));
    }

    path.reverse();
    path
}
