//! Configuration loading for the route service.

use std::path::Path;

use serde::Deserialize;

use marga_plan::{GrowthConfig, GuidedConfig, PipelineConfig, SimplifyConfig};

use crate::error::Result;

/// Main configuration structure.
#[derive(Clone, Debug, Deserialize)]
pub struct RouteConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Mask storage settings.
#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    /// Directory holding mask rasters (default: "masks")
    #[serde(default = "default_mask_dir")]
    pub mask_dir: String,
}

/// Planner parameters, mapped onto the pipeline configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    /// Initial crop margin in pixels (default: 50)
    #[serde(default = "default_initial_margin")]
    pub initial_margin: i32,

    /// Margin increase per retry (default: 50)
    #[serde(default = "default_margin_step")]
    pub margin_step: i32,

    /// Maximum crop margin (default: 400)
    #[serde(default = "default_max_margin")]
    pub max_margin: i32,

    /// Minimum guidance waypoint spacing (default: 10.0)
    #[serde(default = "default_waypoint_spacing")]
    pub waypoint_spacing: f64,

    /// Guidance switch radius (default: 10.0)
    #[serde(default = "default_switch_radius")]
    pub switch_radius: f64,

    /// Obstacle inflation radius in cells (default: 1)
    #[serde(default = "default_inflation_radius")]
    pub inflation_radius: i32,

    /// Speed value of the inflated penalty band (default: 150)
    #[serde(default = "default_inflation_penalty")]
    pub inflation_penalty: u8,

    /// Smoothing angle threshold in degrees (default: 10.0)
    #[serde(default = "default_angle_threshold")]
    pub angle_threshold_deg: f64,

    /// Smoothing distance threshold in pixels (default: 5.0)
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,

    /// Display-to-mask coordinate scale (default: 0.710)
    #[serde(default = "default_display_scale")]
    pub display_scale: f64,
}

/// Output settings.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Optional path for an SVG audit render of the planned route
    #[serde(default)]
    pub svg_path: Option<String>,
}

// Default value functions
fn default_mask_dir() -> String {
    "masks".to_string()
}
fn default_initial_margin() -> i32 {
    50
}
fn default_margin_step() -> i32 {
    50
}
fn default_max_margin() -> i32 {
    400
}
fn default_waypoint_spacing() -> f64 {
    10.0
}
fn default_switch_radius() -> f64 {
    10.0
}
fn default_inflation_radius() -> i32 {
    1
}
fn default_inflation_penalty() -> u8 {
    150
}
fn default_angle_threshold() -> f64 {
    10.0
}
fn default_distance_threshold() -> f64 {
    5.0
}
fn default_display_scale() -> f64 {
    0.710
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mask_dir: default_mask_dir(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            initial_margin: default_initial_margin(),
            margin_step: default_margin_step(),
            max_margin: default_max_margin(),
            waypoint_spacing: default_waypoint_spacing(),
            switch_radius: default_switch_radius(),
            inflation_radius: default_inflation_radius(),
            inflation_penalty: default_inflation_penalty(),
            angle_threshold_deg: default_angle_threshold(),
            distance_threshold: default_distance_threshold(),
            display_scale: default_display_scale(),
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            planner: PlannerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl RouteConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RouteConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Build the pipeline configuration from the planner section.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            growth: GrowthConfig {
                initial_margin: self.planner.initial_margin,
                margin_step: self.planner.margin_step,
                max_margin: self.planner.max_margin,
            },
            min_waypoint_spacing: self.planner.waypoint_spacing,
            inflation_radius: self.planner.inflation_radius,
            inflation_penalty: self.planner.inflation_penalty,
            guided: GuidedConfig {
                switch_radius: self.planner.switch_radius,
                ..Default::default()
            },
            simplify: SimplifyConfig {
                angle_threshold_deg: self.planner.angle_threshold_deg,
                distance_threshold: self.planner.distance_threshold,
            },
            display_scale: self.planner.display_scale,
        }
    }
}
