//! MargaRoute - route planning service boundary.
//!
//! Reads a search request (JSON file argument or stdin), loads the
//! speed mask for the requested map, runs the planning pipeline, and
//! streams progress events as newline-delimited JSON to stdout. Every
//! failure surfaces on the stream as an error object; the process never
//! emits both an error and a done marker.

use std::io::Read;
use std::path::Path;

use tracing::{error, info};

use marga_plan::RoutePipeline;

use marga_route::config::RouteConfig;
use marga_route::error::Result;
use marga_route::mask::MaskStore;
use marga_route::request::RouteRequest;
use marga_route::stream::EventWriter;
use marga_route::svg::{SvgAudit, SvgConfig};

fn main() {
    // Initialize logging; the event stream owns stdout, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marga_route=info".parse().unwrap()),
        )
        .init();

    let mut writer = EventWriter::new(std::io::stdout());

    if let Err(e) = run(&mut writer) {
        error!("planning failed: {}", e);
        let _ = writer.emit_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(writer: &mut EventWriter<std::io::Stdout>) -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Optional --config argument, otherwise marga.toml when present
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let config = match &config_path {
        Some(path) => {
            info!("loading configuration from {}", path);
            RouteConfig::load(Path::new(path))?
        }
        None if Path::new("marga.toml").exists() => {
            info!("loading configuration from marga.toml");
            RouteConfig::load(Path::new("marga.toml"))?
        }
        None => {
            info!("using default configuration");
            RouteConfig::default()
        }
    };

    // Request from the first non-flag argument, or stdin
    let request_arg = args
        .iter()
        .skip(1)
        .filter(|a| !a.starts_with("--"))
        .find(|a| {
            config_path
                .as_ref()
                .map(|c| a.as_str() != c.as_str())
                .unwrap_or(true)
        })
        .cloned();

    let body = match request_arg {
        Some(ref path) if path != "-" => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let request = RouteRequest::from_json(&body)?;
    let plan = request.to_plan(config.planner.display_scale);
    info!(
        "route request on '{}': ({}, {}) -> ({}, {}), {} reference routes",
        plan.map_name,
        plan.start.x,
        plan.start.y,
        plan.goal.x,
        plan.goal.y,
        plan.hints.len()
    );

    let store = MaskStore::new(&config.storage.mask_dir);
    let grid = store.load(&plan.map_name)?;
    info!("mask loaded: {}x{}", grid.width(), grid.height());

    let pipeline = RoutePipeline::new(config.pipeline_config());
    let mut route = pipeline.find_route(&grid, plan.start, plan.goal, &plan.hints)?;

    while let Some(event) = route.next() {
        writer.emit(&event)?;
    }

    if let (Some(svg_path), Some(local)) =
        (config.output.svg_path.as_ref(), route.final_path_local())
    {
        let audit = SvgAudit::new(route.region().grid.clone(), SvgConfig::default())
            .with_route(local.to_vec());
        audit.save(Path::new(svg_path))?;
    }

    info!("route planning finished");
    Ok(())
}
