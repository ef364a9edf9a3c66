use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use stationmap::{run, MapConfig, PipelineConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the station tiles
    #[arg(short, long, default_value = "500m_mesh/station_users_500m_mesh")]
    input_dir: PathBuf,

    /// Path of the generated HTML map
    #[arg(short, long, default_value = "tokyo_station_map.html")]
    output: PathBuf,

    /// Latitude the map is centred on
    #[arg(long, default_value_t = 35.6852, allow_hyphen_values = true)]
    center_lat: f64,

    /// Longitude the map is centred on
    #[arg(long, default_value_t = 139.7528, allow_hyphen_values = true)]
    center_lon: f64,

    /// Initial zoom level of the map
    #[arg(short, long, default_value_t = 11)]
    zoom: u8,

    /// Zoom level of the tiles; file names only carry x and y
    #[arg(long, default_value_t = 15)]
    tile_zoom: u8,

    /// Tile file extension
    #[arg(long, default_value = "pbf")]
    extension: String,

    /// Attribute holding the station name
    #[arg(long, default_value = "S12_001_ja")]
    name_key: String,

    /// Attribute holding the passenger count
    #[arg(long, default_value = "S12_009")]
    passenger_key: String,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            input_dir: self.input_dir.clone(),
            extension: self.extension.clone(),
            tile_zoom: self.tile_zoom,
            name_key: self.name_key.clone(),
            passenger_key: self.passenger_key.clone(),
        }
    }

    fn map_config(&self) -> MapConfig {
        MapConfig {
            center_lat: self.center_lat,
            center_lon: self.center_lon,
            zoom: self.zoom,
            output_path: self.output.clone(),
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    // Diagnostics go to stdout, `info` unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let cli = Cli::parse();
    run(&cli.pipeline_config(), &cli.map_config())?;
    Ok(())
}
