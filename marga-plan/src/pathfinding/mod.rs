//! Search algorithms over speed grids.
//!
//! - **Coarse A\***: weighted 8-connected search producing a raw
//!   cell-by-cell path
//! - **Waypoint reduction**: turn extraction and visibility
//!   shortcutting of the coarse path
//! - **Guided refinement**: any-angle Theta*-style search streaming
//!   progress events
//! - **Smoothing**: angle/distance polyline reduction of the refined
//!   path

pub mod astar;
pub mod smoothing;
pub mod theta_star;
pub mod waypoints;

pub use astar::astar;
pub use smoothing::{path_length, simplify_by_angle, SimplifyConfig};
pub use theta_star::{GuidedConfig, GuidedEvent, GuidedThetaStar};
pub use waypoints::{extract_turns, simplify_by_visibility};
