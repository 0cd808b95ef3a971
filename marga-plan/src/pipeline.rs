//! End-to-end route planning pipeline.
//!
//! Sequences the full stack: margin-growth coarse search, waypoint
//! reduction, obstacle inflation, guided refinement, angle smoothing,
//! and the final translation back into the caller's coordinate space.
//! The refinement stage streams progress, so the pipeline hands back an
//! event iterator rather than a finished path.

use log::warn;

use crate::error::{PlanError, Result};
use crate::geometry::GridPoint;
use crate::grid::SpeedGrid;
use crate::pathfinding::{
    extract_turns, simplify_by_angle, simplify_by_visibility, GuidedConfig, GuidedEvent,
    GuidedThetaStar, SimplifyConfig,
};
use crate::region::{grow_region_and_search, inflate_obstacles, GrowthConfig, Subregion};

/// Parameters for a full pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Margin growth parameters for the coarse stage.
    pub growth: GrowthConfig,
    /// Minimum spacing between guidance waypoints during visibility
    /// shortcutting.
    pub min_waypoint_spacing: f64,
    /// Chebyshev radius of the obstacle inflation pass.
    pub inflation_radius: i32,
    /// Speed value written into the inflated penalty band.
    pub inflation_penalty: u8,
    /// Guided refinement parameters.
    pub guided: GuidedConfig,
    /// Final smoothing thresholds.
    pub simplify: SimplifyConfig,
    /// Factor between caller display coordinates and mask pixels.
    pub display_scale: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            growth: GrowthConfig::default(),
            min_waypoint_spacing: 10.0,
            inflation_radius: 1,
            inflation_penalty: 150,
            guided: GuidedConfig::default(),
            simplify: SimplifyConfig::default(),
            display_scale: 0.710,
        }
    }
}

/// Event stream emitted by a pipeline run.
///
/// The stream is an append-only log: any number of `Waypoint` events,
/// then either `FinalPath` followed by `Done`, or a single `Failed`.
#[derive(Clone, Debug, PartialEq)]
pub enum RouteEvent {
    /// Refinement reached a guidance waypoint.
    Waypoint {
        /// Index of the waypoint now targeted.
        index: usize,
        /// Total number of guidance waypoints.
        total: usize,
        /// Node position at the switch, in crop coordinates.
        position: GridPoint,
    },
    /// The finished route in caller display coordinates.
    FinalPath {
        /// Route points, scaled back to display coordinates.
        points: Vec<(f64, f64)>,
    },
    /// Terminal success marker.
    Done,
    /// Terminal failure.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

/// Route planning pipeline.
pub struct RoutePipeline {
    config: PipelineConfig,
}

impl RoutePipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Create a pipeline with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PipelineConfig::default())
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Plan a route and return the refinement event stream.
    ///
    /// Coordinates are in mask-pixel space; the emitted final path is
    /// scaled back by `display_scale`. Fails fast when the inputs are
    /// invalid or the coarse growth loop exhausts every margin.
    pub fn find_route(
        &self,
        grid: &SpeedGrid,
        start: GridPoint,
        goal: GridPoint,
        hints: &[Vec<GridPoint>],
    ) -> Result<RouteStream> {
        if !grid.contains(start) {
            return Err(PlanError::InvalidInput(format!(
                "start ({}, {}) outside {}x{} grid",
                start.x,
                start.y,
                grid.width(),
                grid.height()
            )));
        }
        if !grid.contains(goal) {
            return Err(PlanError::InvalidInput(format!(
                "goal ({}, {}) outside {}x{} grid",
                goal.x,
                goal.y,
                grid.width(),
                grid.height()
            )));
        }

        let (coarse_path, region) =
            grow_region_and_search(grid, start, goal, hints, &self.config.growth).ok_or(
                PlanError::SearchExhausted {
                    max_margin: self.config.growth.max_margin,
                },
            )?;

        let turns = extract_turns(&coarse_path);
        let waypoints =
            simplify_by_visibility(&turns, &region.grid, self.config.min_waypoint_spacing);

        let inflated = inflate_obstacles(
            &region.grid,
            self.config.inflation_radius,
            self.config.inflation_penalty,
        );

        let guided = GuidedThetaStar::new(
            inflated,
            region.start,
            region.goal,
            waypoints,
            &self.config.guided,
        );

        Ok(RouteStream {
            guided,
            region,
            simplify: self.config.simplify.clone(),
            display_scale: self.config.display_scale,
            state: StreamState::Refining,
            final_path: None,
            final_path_local: None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    Refining,
    FinalSent,
    Terminated,
}

/// Streaming result of one pipeline run.
///
/// Iterate to drive the refinement search; the stream ends after a
/// terminal `Done` or `Failed` event.
#[derive(Debug)]
pub struct RouteStream {
    guided: GuidedThetaStar,
    region: Subregion,
    simplify: SimplifyConfig,
    display_scale: f64,
    state: StreamState,
    final_path: Option<Vec<(f64, f64)>>,
    final_path_local: Option<Vec<GridPoint>>,
}

impl RouteStream {
    /// The working region the refinement runs in (pre-inflation crop).
    pub fn region(&self) -> &Subregion {
        &self.region
    }

    /// The final scaled path, available once `FinalPath` was emitted.
    pub fn final_path(&self) -> Option<&[(f64, f64)]> {
        self.final_path.as_deref()
    }

    /// The final path in crop-local grid coordinates, for audit
    /// rendering. Available once `FinalPath` was emitted.
    pub fn final_path_local(&self) -> Option<&[GridPoint]> {
        self.final_path_local.as_deref()
    }

    /// Translate a crop-local point back into display coordinates.
    fn to_display(&self, p: GridPoint) -> (f64, f64) {
        (
            (p.x + self.region.offset.x) as f64 * self.display_scale,
            (p.y + self.region.offset.y) as f64 * self.display_scale,
        )
    }
}

impl Iterator for RouteStream {
    type Item = RouteEvent;

    fn next(&mut self) -> Option<RouteEvent> {
        match self.state {
            StreamState::Refining => match self.guided.next() {
                Some(GuidedEvent::WaypointReached {
                    index,
                    total,
                    position,
                }) => Some(RouteEvent::Waypoint {
                    index,
                    total,
                    position,
                }),
                Some(GuidedEvent::Complete { path }) => {
                    let simplified = simplify_by_angle(
                        &path,
                        self.simplify.angle_threshold_deg,
                        self.simplify.distance_threshold,
                    );
                    let points: Vec<(f64, f64)> =
                        simplified.iter().map(|p| self.to_display(*p)).collect();
                    self.final_path = Some(points.clone());
                    self.final_path_local = Some(simplified);
                    self.state = StreamState::FinalSent;
                    Some(RouteEvent::FinalPath { points })
                }
                Some(GuidedEvent::Exhausted) => {
                    // Unexpected after a successful coarse pass
                    warn!("refinement exhausted after a successful coarse search");
                    self.state = StreamState::Terminated;
                    Some(RouteEvent::Failed {
                        reason: PlanError::RefinementExhausted.to_string(),
                    })
                }
                None => {
                    self.state = StreamState::Terminated;
                    None
                }
            },
            StreamState::FinalSent => {
                self.state = StreamState::Terminated;
                Some(RouteEvent::Done)
            }
            StreamState::Terminated => None,
        }
    }
}
