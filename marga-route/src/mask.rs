//! Mask store: speed rasters addressed by map name.
//!
//! Masks are single-channel images named `mask_{map}.png` inside the
//! configured directory. Pixel values follow the speed-grid convention
//! (0 impassable, 1-255 traversable).

use std::path::{Path, PathBuf};

use image::GrayImage;
use tracing::debug;

use marga_plan::SpeedGrid;

use crate::error::{Result, RouteError};

/// File-backed mask store.
pub struct MaskStore {
    dir: PathBuf,
}

impl MaskStore {
    /// Create a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the mask file for a map name.
    pub fn path_for(&self, map_name: &str) -> PathBuf {
        self.dir.join(format!("mask_{}.png", map_name))
    }

    /// Load the mask for a map as a speed grid.
    ///
    /// A missing file is reported as a distinct not-found error so the
    /// caller can tell it apart from decode failures.
    pub fn load(&self, map_name: &str) -> Result<SpeedGrid> {
        let path = self.path_for(map_name);
        if !path.exists() {
            return Err(RouteError::MaskNotFound(map_name.to_string()));
        }

        let mask = image::open(&path)?.to_luma8();
        debug!(
            "loaded mask {:?}: {}x{}",
            path,
            mask.width(),
            mask.height()
        );
        grid_from_gray(&mask)
    }
}

/// Convert a grayscale image into a speed grid.
pub fn grid_from_gray(mask: &GrayImage) -> Result<SpeedGrid> {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    let grid = SpeedGrid::from_raw(width, height, mask.as_raw().clone())?;
    Ok(grid)
}

/// Render a speed grid back into a grayscale image.
///
/// Used to persist generated masks next to the maps they belong to.
pub fn gray_from_grid(grid: &SpeedGrid) -> GrayImage {
    let mut img = GrayImage::new(grid.width() as u32, grid.height() as u32);
    for y in 0..grid.height() as u32 {
        for x in 0..grid.width() as u32 {
            let value = grid.get(marga_plan::GridPoint::new(x as i32, y as i32));
            img.put_pixel(x, y, image::Luma([value]));
        }
    }
    img
}

/// Save a mask image into the store's directory layout.
pub fn save_mask(store: &MaskStore, map_name: &str, mask: &GrayImage) -> Result<()> {
    let path = store.path_for(map_name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    mask.save(&path)
        .map_err(RouteError::from)?;
    debug!("saved mask for '{}' to {:?}", map_name, path);
    Ok(())
}

/// Strip directory and extension from a map file reference.
pub fn map_name_from_file(map_file: &str) -> String {
    Path::new(map_file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| map_file.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_naming() {
        let store = MaskStore::new("masks");
        assert_eq!(
            store.path_for("forest"),
            PathBuf::from("masks/mask_forest.png")
        );
    }

    #[test]
    fn test_missing_mask_is_not_found() {
        let store = MaskStore::new("/nonexistent-marga-test");
        match store.load("missing") {
            Err(RouteError::MaskNotFound(name)) => assert_eq!(name, "missing"),
            other => panic!("expected MaskNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_gray_round_trip() {
        let mut grid = SpeedGrid::filled(4, 3, 200);
        grid.set(marga_plan::GridPoint::new(2, 1), 0);

        let img = gray_from_grid(&grid);
        let back = grid_from_gray(&img).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_map_name_from_file() {
        assert_eq!(map_name_from_file("maps/forest.png"), "forest");
        assert_eq!(map_name_from_file("forest.jpg"), "forest");
        assert_eq!(map_name_from_file("forest"), "forest");
    }
}
