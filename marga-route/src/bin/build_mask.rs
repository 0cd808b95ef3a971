//! Build a speed mask from a terrain class raster.
//!
//! Takes the per-pixel class raster produced by the terrain
//! classification model (stored as a grayscale image of class indices)
//! and writes the banded speed mask into the mask store layout.
//!
//! Usage: build_mask <classes.png> <map-name> [mask-dir]

use std::path::Path;
use std::process::exit;

use tracing::{error, info};

use marga_route::mask::{save_mask, MaskStore};
use marga_route::terrain::{mask_from_classes, ClassRaster};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: build_mask <classes.png> <map-name> [mask-dir]");
        exit(2);
    }

    let classes_path = &args[1];
    let map_name = &args[2];
    let mask_dir = args.get(3).map(String::as_str).unwrap_or("masks");

    if let Err(e) = run(classes_path, map_name, mask_dir) {
        error!("mask generation failed: {}", e);
        exit(1);
    }
}

fn run(classes_path: &str, map_name: &str, mask_dir: &str) -> marga_route::Result<()> {
    let classes = image::open(Path::new(classes_path))?.to_luma8();
    info!(
        "class raster {}: {}x{}",
        classes_path,
        classes.width(),
        classes.height()
    );

    let raster = ClassRaster {
        width: classes.width(),
        height: classes.height(),
        classes: classes.into_raw(),
    };

    let mask = mask_from_classes(&raster);
    let store = MaskStore::new(mask_dir);
    save_mask(&store, map_name, &mask)?;

    info!("mask for '{}' written to {}", map_name, mask_dir);
    Ok(())
}
