//! Search request parsing and coordinate scaling.
//!
//! Requests arrive in display coordinates; the planner works in
//! mask-pixel space. Parsing validates the required fields and divides
//! every coordinate by the display scale on the way in.

use serde::Deserialize;

use marga_plan::GridPoint;

use crate::error::{Result, RouteError};
use crate::mask::map_name_from_file;

/// A point in display coordinates.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

/// One reference route supplied by the caller.
#[derive(Clone, Debug, Deserialize)]
pub struct ReferenceRoute {
    /// Route points, in display coordinates.
    #[serde(rename = "rP", default)]
    pub points: Vec<DisplayPoint>,
}

/// A route search request.
#[derive(Clone, Debug, Deserialize)]
pub struct RouteRequest {
    pub start: DisplayPoint,
    #[serde(alias = "ziel")]
    pub goal: DisplayPoint,
    #[serde(rename = "mapFile")]
    pub map_file: String,
    #[serde(rename = "route", default)]
    pub routes: Vec<ReferenceRoute>,
}

/// Request translated into mask-pixel space.
#[derive(Clone, Debug)]
pub struct PlanRequest {
    pub start: GridPoint,
    pub goal: GridPoint,
    pub map_name: String,
    pub hints: Vec<Vec<GridPoint>>,
}

impl RouteRequest {
    /// Parse a request from JSON.
    pub fn from_json(body: &str) -> Result<Self> {
        let request: RouteRequest = serde_json::from_str(body)?;
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<()> {
        if self.map_file.trim().is_empty() {
            return Err(RouteError::InvalidRequest("missing mapFile".to_string()));
        }
        for p in [&self.start, &self.goal] {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(RouteError::InvalidRequest(
                    "non-finite start or goal coordinate".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Scale the request into mask-pixel space.
    ///
    /// Coordinates are divided by `display_scale` and truncated to
    /// integers, matching the inverse of the scaling applied to the
    /// final path.
    pub fn to_plan(&self, display_scale: f64) -> PlanRequest {
        let scale = |p: &DisplayPoint| -> GridPoint {
            GridPoint::new((p.x / display_scale) as i32, (p.y / display_scale) as i32)
        };

        PlanRequest {
            start: scale(&self.start),
            goal: scale(&self.goal),
            map_name: map_name_from_file(&self.map_file),
            hints: self
                .routes
                .iter()
                .map(|route| route.points.iter().map(&scale).collect())
                .collect(),
        }
    }
}
