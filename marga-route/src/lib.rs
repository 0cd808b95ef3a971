//! Boundary adapters around the route planning core.
//!
//! The planning algorithms live in `marga-plan`; this crate owns the
//! narrow interfaces to the outside world:
//!
//! - **Mask store**: grayscale speed rasters addressed by map name
//! - **Requests**: JSON search requests in display coordinates
//! - **Streaming**: newline-delimited JSON progress events
//! - **Terrain classes**: class raster to speed mask banding
//! - **SVG audit**: after-the-fact render of a planning run

pub mod config;
pub mod error;
pub mod mask;
pub mod request;
pub mod stream;
pub mod svg;
pub mod terrain;

pub use config::RouteConfig;
pub use error::{Result, RouteError};
pub use mask::MaskStore;
pub use request::{PlanRequest, RouteRequest};
pub use stream::EventWriter;
