use std::path::PathBuf;

/// Configuration for loading station records from a tile directory
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,     // Directory holding the tile files
    pub extension: String,      // Tile file extension, without the dot
    pub tile_zoom: u8,          // Zoom level every tile in the directory is assumed to be at
    pub name_key: String,       // Attribute carrying the station name
    pub passenger_key: String,  // Attribute carrying the passenger count
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("500m_mesh/station_users_500m_mesh"),
            extension: "pbf".to_string(),
            // File names only carry x/y, the dataset is published at zoom 15
            tile_zoom: 15,
            name_key: "S12_001_ja".to_string(),
            // 2022 boarding/alighting counts
            passenger_key: "S12_009".to_string(),
        }
    }
}

/// Configuration for the rendered map document
#[derive(Clone, Debug)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub output_path: PathBuf,
    pub min_radius: f64,
    pub max_radius: f64,
    pub color: String,
    pub name_label: String,
    pub count_label: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Imperial Palace, zoom 11 shows all 23 wards
            center_lat: 35.6852,
            center_lon: 139.7528,
            zoom: 11,
            output_path: PathBuf::from("tokyo_station_map.html"),
            min_radius: 5.0,
            max_radius: 20.0,
            color: "red".to_string(),
            name_label: "駅名".to_string(),
            count_label: "乗降客数".to_string(),
        }
    }
}
