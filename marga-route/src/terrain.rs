//! Terrain class to speed value mapping.
//!
//! The terrain-classification model is an external collaborator: it
//! takes an RGB map image and returns a per-pixel class raster. This
//! module only owns the narrow boundary around it: the trait the
//! collaborator implements and the banding that turns its class raster
//! into a speed mask the planner can consume.

use image::GrayImage;

use crate::error::Result;

/// Speed values written into generated masks.
pub mod speeds {
    /// Blocked terrain
    pub const IMPASSABLE: u8 = 0;
    /// Dense vegetation, marsh
    pub const VERY_SLOW: u8 = 100;
    /// Rough open or undergrowth
    pub const SLOW: u8 = 150;
    /// Crossable linear features
    pub const CROSS: u8 = 200;
    /// Open runnable terrain, tracks
    pub const FAST: u8 = 230;
    /// Unclassified pixels stay at full speed
    pub const DEFAULT: u8 = 255;
}

/// Per-pixel class raster produced by the classifier.
#[derive(Clone, Debug)]
pub struct ClassRaster {
    pub width: u32,
    pub height: u32,
    /// Row-major class indices.
    pub classes: Vec<u8>,
}

/// External terrain-classification model.
///
/// Implementations wrap the actual inference runtime; the planner only
/// ever sees the resulting mask.
pub trait TerrainClassifier {
    /// Classify an RGB image, resized by `scale` before inference.
    fn classify(&self, rgb: &image::RgbImage, scale: f64) -> Result<ClassRaster>;
}

/// Map one class index to its mask speed value.
pub fn class_to_speed(class: u8) -> u8 {
    match class {
        0..=9 => speeds::IMPASSABLE,
        10..=21 => speeds::VERY_SLOW,
        22..=25 => speeds::SLOW,
        26..=27 => speeds::CROSS,
        28..=31 => speeds::FAST,
        32 => speeds::CROSS,
        33 => speeds::FAST,
        34 => speeds::IMPASSABLE,
        _ => speeds::DEFAULT,
    }
}

/// Convert a class raster into a grayscale speed mask.
pub fn mask_from_classes(raster: &ClassRaster) -> GrayImage {
    let mut mask = GrayImage::new(raster.width, raster.height);
    for (i, class) in raster.classes.iter().enumerate() {
        let x = (i as u32) % raster.width;
        let y = (i as u32) / raster.width;
        mask.put_pixel(x, y, image::Luma([class_to_speed(*class)]));
    }
    mask
}
