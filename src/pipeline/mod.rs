use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::config::PipelineConfig;
use crate::error::{StatusOr, TileError};
use crate::model::extract::extract_features;
use crate::model::{StationCollection, StationRecord};
use crate::tile::decode::decode_first_layer;
use crate::tile::TileCoordinate;

/// Outcome of loading a whole tile directory
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub stations: StationCollection,
    /// Files whose name matched the tile extension
    pub files_considered: usize,
    /// Matching files that contributed nothing because they failed to load
    pub files_skipped: usize,
}

/// Decodes one tile file into station records.
///
/// Only the first layer of the tile is used. The tile address comes from the
/// file name, with the zoom level taken from `config.tile_zoom`.
pub fn decode_file<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> StatusOr<Vec<StationRecord>> {
    let path = path.as_ref();

    let data = fs::read(path)?;
    let layer = decode_first_layer(&data)?;

    let tile = TileCoordinate::from_file_name(path, config.tile_zoom)?;
    let records = extract_features(&layer, &tile, config);

    info!("Extracted {} valid features from {}", records.len(), path.display());
    Ok(records)
}

/// Lists the tile files of a directory, sorted by file name
fn list_tile_files(dir: &Path, extension: &str) -> StatusOr<Vec<PathBuf>> {
    let suffix = format!(".{}", extension);
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let matches = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(&suffix))
            .unwrap_or(false);
        if matches && entry.path().is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Decodes every tile file in `dir` and concatenates the station records.
///
/// A file that fails to load is logged and skipped; the run always completes.
/// The only error returned is a failure to list the directory itself.
pub fn aggregate_directory<P: AsRef<Path>>(dir: P, config: &PipelineConfig) -> StatusOr<LoadReport> {
    let dir = dir.as_ref();
    let files = list_tile_files(dir, &config.extension)?;

    let mut report = LoadReport {
        files_considered: files.len(),
        ..Default::default()
    };

    for path in &files {
        match decode_file(path, config) {
            Ok(records) => report.stations.extend(records),
            Err(TileError::EmptyTile) => {
                warn!("File {} is empty", path.display());
                report.files_skipped += 1;
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                report.files_skipped += 1;
            }
        }
    }

    info!(
        "Processed {} files from {} ({} skipped), collected {} stations",
        report.files_considered,
        dir.display(),
        report.files_skipped,
        report.stations.len()
    );

    Ok(report)
}
