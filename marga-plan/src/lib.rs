//! # MargaPlan
//!
//! Terrain-aware route planning over raster speed maps.
//!
//! A speed map encodes traversal cost per pixel: 0 is impassable,
//! 1-255 is traversable with higher values being faster terrain. The
//! pipeline computes a smoothed route between two points in four
//! stages:
//!
//! 1. **Region growth + coarse A\***: a sub-grid is cropped around the
//!    endpoints and searched; the crop margin grows until a path exists
//! 2. **Waypoint reduction**: the raw path collapses to turning points,
//!    then to a minimal visible skeleton
//! 3. **Guided refinement**: an any-angle Theta*-style search follows
//!    the skeleton, streaming progress events
//! 4. **Smoothing**: angle/distance reduction of the refined polyline
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga_plan::{GridPoint, RouteEvent, RoutePipeline, SpeedGrid};
//!
//! let grid = SpeedGrid::from_raw(width, height, pixels)?;
//! let pipeline = RoutePipeline::with_defaults();
//!
//! let stream = pipeline.find_route(&grid, start, goal, &hints)?;
//! for event in stream {
//!     match event {
//!         RouteEvent::Waypoint { index, total, .. } => {
//!             println!("waypoint {}/{}", index, total)
//!         }
//!         RouteEvent::FinalPath { points } => println!("{} points", points.len()),
//!         RouteEvent::Done | RouteEvent::Failed { .. } => break,
//!     }
//! }
//! ```
//!
//! ## Coordinate System
//!
//! Grid coordinates are `(x, y)` with x = column, y = row, origin at
//! the top-left pixel of the mask. Callers work in display coordinates;
//! the pipeline divides by the configured display scale on the way in
//! and multiplies on the way out.

#![warn(missing_docs)]

// Geometry primitives and line-of-sight
pub mod geometry;

// Speed grid storage
pub mod grid;

// Error types
pub mod error;

// Search algorithms
pub mod pathfinding;

// Sub-grid extraction and margin growth
pub mod region;

// End-to-end orchestration
pub mod pipeline;

// Re-export commonly used types
pub use error::{PlanError, Result};
pub use geometry::{
    bresenham_line, disk_offsets, euclidean, has_line_of_sight, GridPoint, LosCache,
};
pub use grid::SpeedGrid;
pub use pathfinding::{
    astar, extract_turns, path_length, simplify_by_angle, simplify_by_visibility, GuidedConfig,
    GuidedEvent, GuidedThetaStar, SimplifyConfig,
};
pub use pipeline::{PipelineConfig, RouteEvent, RoutePipeline, RouteStream};
pub use region::{
    carve_hint_mask, extract_subgrid, grow_region_and_search, inflate_obstacles,
    snap_to_nearest_free, GrowthConfig, Subregion,
};
