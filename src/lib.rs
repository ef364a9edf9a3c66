//! Converts directories of station vector tiles into an interactive
//! passenger-volume map.

use anyhow::{Context, Result};
use log::{info, warn};

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod tile;

pub use config::{MapConfig, PipelineConfig};
pub use error::{StatusOr, TileError};
pub use model::{StationCollection, StationRecord};
pub use pipeline::{aggregate_directory, decode_file, LoadReport};
pub use render::{create_map, marker_radius, StationMap};
pub use tile::{tile_pixel_to_lonlat, TileCoordinate};

/// Loads every tile in `pipeline.input_dir` and writes the station map.
///
/// Returns `Ok(false)` without writing anything when no station could be
/// loaded. Failing to list the input directory or to write the map is an error.
pub fn run(pipeline: &PipelineConfig, map_config: &MapConfig) -> Result<bool> {
    info!("Loading tiles from {}", pipeline.input_dir.display());
    let report = aggregate_directory(&pipeline.input_dir, pipeline)
        .with_context(|| format!("Failed to read tile directory {}", pipeline.input_dir.display()))?;

    if report.stations.is_empty() {
        warn!("No valid station data found, skipping map creation");
        return Ok(false);
    }

    info!("Loaded {} stations", report.stations.len());
    if let Some(bounds) = report.stations.bounds() {
        info!(
            "Bounding box: [{}, {}, {}, {}]",
            bounds.min().x,
            bounds.min().y,
            bounds.max().x,
            bounds.max().y
        );
    }

    let map = create_map(&report.stations, map_config);
    map.save(&map_config.output_path)
        .context("Failed to save map")?;

    info!("Map saved as {}", map_config.output_path.display());
    Ok(true)
}
