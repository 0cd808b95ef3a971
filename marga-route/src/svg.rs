//! SVG audit rendering for planned routes.
//!
//! Renders the working sub-grid and the final route to an SVG file so a
//! planning run can be inspected after the fact: terrain shading, the
//! masked and impassable cells, and the route polyline on top.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use tracing::info;

use marga_plan::{GridPoint, SpeedGrid};

use crate::error::Result;

/// Colors used by the audit render.
#[derive(Clone, Debug)]
pub struct SvgColorScheme {
    /// Impassable cells
    pub blocked: &'static str,
    /// Penalty-band cells (inflated obstacles)
    pub penalty: &'static str,
    /// Route polyline
    pub route: &'static str,
    /// Background (fast terrain)
    pub background: &'static str,
}

impl Default for SvgColorScheme {
    fn default() -> Self {
        Self {
            blocked: "#333333",
            penalty: "#BBAA88",
            route: "#CC2222",
            background: "#FFFFFF",
        }
    }
}

/// Configuration for SVG rendering.
#[derive(Clone, Debug)]
pub struct SvgConfig {
    /// Pixels per grid cell
    pub scale: f32,
    /// Route line width
    pub route_width: f32,
    /// Color scheme
    pub colors: SvgColorScheme,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            scale: 4.0,
            route_width: 2.0,
            colors: SvgColorScheme::default(),
        }
    }
}

/// Audit renderer for one planning run.
pub struct SvgAudit {
    grid: SpeedGrid,
    config: SvgConfig,
    route: Vec<GridPoint>,
}

impl SvgAudit {
    /// Create a renderer for a working grid.
    pub fn new(grid: SpeedGrid, config: SvgConfig) -> Self {
        Self {
            grid,
            config,
            route: Vec::new(),
        }
    }

    /// Attach the route polyline, in grid-local coordinates.
    pub fn with_route(mut self, route: Vec<GridPoint>) -> Self {
        self.route = route;
        self
    }

    /// Render to an SVG string.
    pub fn render(&self) -> String {
        let scale = self.config.scale;
        let width = self.grid.width() as f32 * scale;
        let height = self.grid.height() as f32 * scale;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
            width, height, width, height
        );
        let _ = writeln!(
            svg,
            "  <rect width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            width, height, self.config.colors.background
        );

        // Terrain cells; fast terrain stays background-colored
        for y in 0..self.grid.height() as i32 {
            for x in 0..self.grid.width() as i32 {
                let value = self.grid.get(GridPoint::new(x, y));
                let fill = match value {
                    0 => self.config.colors.blocked,
                    v if v < 200 => self.config.colors.penalty,
                    _ => continue,
                };
                let _ = writeln!(
                    svg,
                    "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                    x as f32 * scale,
                    y as f32 * scale,
                    scale,
                    scale,
                    fill
                );
            }
        }

        if self.route.len() >= 2 {
            let points: Vec<String> = self
                .route
                .iter()
                .map(|p| {
                    format!(
                        "{},{}",
                        (p.x as f32 + 0.5) * scale,
                        (p.y as f32 + 0.5) * scale
                    )
                })
                .collect();
            let _ = writeln!(
                svg,
                "  <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                points.join(" "),
                self.config.colors.route,
                self.config.route_width
            );
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Render and write to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render())?;
        info!("route audit saved to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_route_and_walls() {
        let mut grid = SpeedGrid::filled(10, 10, 255);
        grid.set(GridPoint::new(5, 5), 0);

        let audit = SvgAudit::new(grid, SvgConfig::default())
            .with_route(vec![GridPoint::new(1, 1), GridPoint::new(8, 8)]);
        let svg = audit.render();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("polyline"));
        assert!(svg.contains("#333333"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_render_without_route() {
        let grid = SpeedGrid::filled(4, 4, 255);
        let svg = SvgAudit::new(grid, SvgConfig::default()).render();
        assert!(!svg.contains("polyline"));
    }
}
