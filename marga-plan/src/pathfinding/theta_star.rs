//! Guided any-angle refinement search.
//!
//! Refines a coarse path into a smooth route. The search is A*-shaped
//! but assigns parents through line-of-sight shortcuts: a neighbor that
//! is visible from the current node's parent across uniform terrain
//! hooks directly onto that parent, producing long straight segments
//! instead of grid-constrained staircases. A sequence of guidance
//! waypoints from the coarse path biases the heuristic so the
//! refinement follows the coarse route's general shape while still
//! cutting local corners.
//!
//! The search is exposed as a finite, non-restartable iterator of
//! [`GuidedEvent`]s so a transport can stream progress without waiting
//! for the full path.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use log::{trace, warn};

use crate::geometry::{bresenham_line, euclidean, GridPoint, LosCache, NEIGHBORS_8};
use crate::grid::SpeedGrid;

/// Configuration for the guided refinement search.
#[derive(Clone, Debug)]
pub struct GuidedConfig {
    /// Distance at which a guidance waypoint counts as reached.
    pub switch_radius: f64,
    /// Capacity of the per-run line-of-sight cache.
    pub los_cache_capacity: usize,
}

impl Default for GuidedConfig {
    fn default() -> Self {
        Self {
            switch_radius: 10.0,
            los_cache_capacity: 100_000,
        }
    }
}

/// Progress emitted by the refinement search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuidedEvent {
    /// A guidance waypoint was reached and the heuristic target moved on.
    WaypointReached {
        /// Index of the waypoint now being targeted.
        index: usize,
        /// Total number of guidance waypoints.
        total: usize,
        /// Node position at the moment of the switch.
        position: GridPoint,
    },
    /// The goal was reached; carries the full refined path.
    Complete {
        /// Refined path from start to goal, in crop coordinates.
        path: Vec<GridPoint>,
    },
    /// The frontier emptied before reaching the goal.
    Exhausted,
}

/// Frontier entry, min-ordered by f-score.
#[derive(Clone, Copy, Debug)]
struct OpenNode {
    f: f64,
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
        other.f.partial_cmp(&self.f).unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Guided Theta*-style search over an owned grid.
///
/// Constructed once per refinement run; iterate to drive the search.
/// The iterator is finite and ends after a [`GuidedEvent::Complete`] or
/// [`GuidedEvent::Exhausted`] event.
#[derive(Debug)]
pub struct GuidedThetaStar {
    grid: SpeedGrid,
    goal: GridPoint,
    waypoints: Vec<GridPoint>,
    switch_radius: f64,

    open: BinaryHeap<OpenNode>,
    g_score: Vec<f64>,
    parent: Vec<u32>,
    closed: Vec<bool>,
    los: LosCache,

    guidance_index: usize,
    pending: VecDeque<GuidedEvent>,
    finished: bool,
}

impl GuidedThetaStar {
    /// Set up a search from `start` to `goal` guided by `waypoints`.
    ///
    /// The grid is an owned working copy (typically the inflated
    /// sub-grid); search state never outlives the run.
    pub fn new(
        grid: SpeedGrid,
        start: GridPoint,
        goal: GridPoint,
        waypoints: Vec<GridPoint>,
        config: &GuidedConfig,
    ) -> Self {
        let cell_count = grid.cell_count();
        let mut g_score = vec![f64::INFINITY; cell_count];
        let mut parent = vec![u32::MAX; cell_count];
        let closed = vec![false; cell_count];
        let mut open = BinaryHeap::new();

        if grid.contains(start) && grid.contains(goal) {
            let start_idx = grid.index(start);
            g_score[start_idx] = 0.0;
            // The start is its own parent
            parent[start_idx] = start_idx as u32;
            open.push(OpenNode {
                f: euclidean(start, goal),
                index: start_idx as u32,
            });
        } else {
            // Empty frontier; the first pull reports exhaustion
            warn!("refinement endpoints outside grid, search will fail");
        }

        Self {
            grid,
            goal,
            waypoints,
            switch_radius: config.switch_radius,
            open,
            g_score,
            parent,
            closed,
            los: LosCache::new(config.los_cache_capacity),
            guidance_index: 0,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// The grid the search runs on.
    pub fn grid(&self) -> &SpeedGrid {
        &self.grid
    }

    /// Advance the guidance index past every waypoint within reach of
    /// `current`, queueing one event per switch.
    fn advance_guidance(&mut self, current: GridPoint) {
        while self.guidance_index + 1 < self.waypoints.len()
            && euclidean(current, self.waypoints[self.guidance_index]) < self.switch_radius
        {
            self.guidance_index += 1;
            self.pending.push_back(GuidedEvent::WaypointReached {
                index: self.guidance_index,
                total: self.waypoints.len(),
                position: current,
            });
        }
    }

    /// Current heuristic target: the active guidance waypoint, or the
    /// goal once guidance is exhausted.
    fn guidance_target(&self) -> GridPoint {
        if self.guidance_index < self.waypoints.len() {
            self.waypoints[self.guidance_index]
        } else {
            self.goal
        }
    }

    /// Whether every cell on the segment after the first carries the
    /// same terrain value as the segment's origin. Exact u8 equality;
    /// terrain values are integers so no tolerance is involved.
    fn terrain_consistent(&self, from: GridPoint, to: GridPoint) -> bool {
        let reference = self.grid.get(from);
        bresenham_line(from, to)
            .iter()
            .skip(1)
            .all(|p| self.grid.get(*p) == reference)
    }

    /// Relax all neighbors of the node at `current_idx`.
    fn expand(&mut self, current_idx: usize) {
        let current = self.grid.point(current_idx);
        let current_g = self.g_score[current_idx];
        let parent_idx = self.parent[current_idx] as usize;
        let parent_point = self.grid.point(parent_idx);
        let parent_g = self.g_score[parent_idx];
        let target = self.guidance_target();

        for (dx, dy) in NEIGHBORS_8 {
            let neighbor = GridPoint::new(current.x + dx, current.y + dy);
            if !self.grid.contains(neighbor) {
                continue;
            }
            let speed = self.grid.get(neighbor);
            if speed == 0 {
                continue;
            }
            let neighbor_idx = self.grid.index(neighbor);
            if self.closed[neighbor_idx] {
                continue;
            }

            let cost = (255 - speed) as f64;

            let (candidate_parent, candidate_g) =
                if self.los.is_visible(&self.grid, parent_point, neighbor) {
                    if self.terrain_consistent(parent_point, neighbor) {
                        // Shortcut: hook onto the grandparent across
                        // uniform terrain
                        let distance = euclidean(parent_point, neighbor);
                        (parent_idx, parent_g + distance * cost)
                    } else {
                        let distance = euclidean(current, neighbor);
                        (current_idx, current_g + distance * cost)
                    }
                } else {
                    // Entering differently-costed or occluded terrain:
                    // distance plus a flat entry penalty
                    let distance = euclidean(current, neighbor);
                    (current_idx, current_g + distance + cost)
                };

            if candidate_g < self.g_score[neighbor_idx] {
                self.g_score[neighbor_idx] = candidate_g;
                self.parent[neighbor_idx] = candidate_parent as u32;
                self.open.push(OpenNode {
                    f: candidate_g + euclidean(neighbor, target),
                    index: neighbor_idx as u32,
                });
            }
        }
    }

    /// Walk parent handles back from the goal and reverse.
    fn reconstruct(&self, goal_idx: usize) -> Vec<GridPoint> {
        let mut path = Vec::new();
        let mut current = goal_idx;

        path.push(self.grid.point(current));
        while self.parent[current] as usize != current {
            current = self.parent[current] as usize;
            path.push(self.grid.point(current));
        }

        path.reverse();
        path
    }
}

impl Iterator for GuidedThetaStar {
    type Item = GuidedEvent;

    fn next(&mut self) -> Option<GuidedEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        if self.finished {
            return None;
        }

        let goal_idx = if self.grid.contains(self.goal) {
            self.grid.index(self.goal)
        } else {
            usize::MAX
        };

        while let Some(node) = self.open.pop() {
            let current_idx = node.index as usize;
            if self.closed[current_idx] {
                continue;
            }
            self.closed[current_idx] = true;

            if current_idx == goal_idx {
                let path = self.reconstruct(current_idx);
                trace!("refinement complete, {} path points", path.len());
                self.finished = true;
                return Some(GuidedEvent::Complete { path });
            }

            let current = self.grid.point(current_idx);
            self.advance_guidance(current);
            self.expand(current_idx);

            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
        }

        warn!("refinement frontier exhausted before reaching the goal");
        self.finished = true;
        Some(GuidedEvent::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::has_line_of_sight;

    fn path_length(path: &[GridPoint]) -> f64 {
        path.windows(2).map(|w| euclidean(w[0], w[1])).sum()
    }

    fn run_to_path(search: GuidedThetaStar) -> Option<Vec<GridPoint>> {
        for event in search {
            match event {
                GuidedEvent::Complete { path } => return Some(path),
                GuidedEvent::Exhausted => return None,
                GuidedEvent::WaypointReached { .. } => {}
            }
        }
        None
    }

    #[test]
    fn test_uniform_grid_near_straight_path() {
        let grid = SpeedGrid::filled(60, 60, 200);
        let start = GridPoint::new(5, 5);
        let goal = GridPoint::new(50, 40);

        let search =
            GuidedThetaStar::new(grid, start, goal, Vec::new(), &GuidedConfig::default());
        let path = run_to_path(search).unwrap();

        assert_eq!(path[0], start);
        assert_eq!(*path.last().unwrap(), goal);
        // No large detours on uniform terrain
        assert!(path_length(&path) <= euclidean(start, goal) * 1.2);
    }

    #[test]
    fn test_waypoint_events_emitted_in_order() {
        let grid = SpeedGrid::filled(80, 20, 200);
        let start = GridPoint::new(2, 10);
        let goal = GridPoint::new(75, 10);
        let waypoints = vec![
            GridPoint::new(20, 10),
            GridPoint::new(40, 10),
            GridPoint::new(60, 10),
            goal,
        ];

        let config = GuidedConfig {
            switch_radius: 8.0,
            ..Default::default()
        };
        let search = GuidedThetaStar::new(grid, start, goal, waypoints.clone(), &config);

        let mut seen = Vec::new();
        let mut completed = false;
        for event in search {
            match event {
                GuidedEvent::WaypointReached { index, total, .. } => {
                    assert_eq!(total, waypoints.len());
                    seen.push(index);
                }
                GuidedEvent::Complete { path } => {
                    completed = true;
                    assert_eq!(*path.last().unwrap(), goal);
                }
                GuidedEvent::Exhausted => panic!("unexpected exhaustion"),
            }
        }

        assert!(completed);
        assert!(!seen.is_empty());
        for pair in seen.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_walled_goal_exhausts() {
        let mut grid = SpeedGrid::filled(20, 20, 200);
        for y in 0..20 {
            grid.set(GridPoint::new(10, y), 0);
        }

        let search = GuidedThetaStar::new(
            grid,
            GridPoint::new(2, 10),
            GridPoint::new(17, 10),
            Vec::new(),
            &GuidedConfig::default(),
        );

        let events: Vec<GuidedEvent> = search.collect();
        assert_eq!(*events.last().unwrap(), GuidedEvent::Exhausted);
    }

    #[test]
    fn test_iterator_ends_after_terminal_event() {
        let grid = SpeedGrid::filled(10, 10, 200);
        let mut search = GuidedThetaStar::new(
            grid,
            GridPoint::new(1, 1),
            GridPoint::new(8, 8),
            Vec::new(),
            &GuidedConfig::default(),
        );

        let mut terminal = 0;
        while let Some(event) = search.next() {
            if matches!(event, GuidedEvent::Complete { .. } | GuidedEvent::Exhausted) {
                terminal += 1;
            }
        }
        assert_eq!(terminal, 1);
        assert!(search.next().is_none());
    }

    #[test]
    fn test_path_stays_on_passable_cells() {
        let mut grid = SpeedGrid::filled(40, 40, 230);
        for y in 5..35 {
            grid.set(GridPoint::new(20, y), 0);
        }
        let probe = grid.clone();

        let search = GuidedThetaStar::new(
            grid,
            GridPoint::new(5, 20),
            GridPoint::new(35, 20),
            Vec::new(),
            &GuidedConfig::default(),
        );
        let path = run_to_path(search).unwrap();

        for p in &path {
            assert!(probe.is_passable(*p));
        }
        // Every segment of the refined path is unobstructed
        for pair in path.windows(2) {
            assert!(has_line_of_sight(&probe, pair[0], pair[1]));
        }
    }
}
