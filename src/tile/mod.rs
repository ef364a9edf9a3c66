use std::f64::consts::PI;
use std::path::Path;

use geo::{Coord, Point};

use crate::error::{StatusOr, TileError};

pub mod decode;
pub mod geometry;
pub mod proto;
#[cfg(test)]
pub(crate) mod testing;

/// Slippy-map address of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCoordinate {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoordinate {
    pub fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// Derives the tile address from a file name of the form `<prefix>_<x>_<y>.<ext>`.
    ///
    /// Only x and y are encoded in the name; the zoom level is supplied by the
    /// caller since every tile in a dataset shares it.
    pub fn from_file_name<P: AsRef<Path>>(path: P, zoom: u8) -> StatusOr<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| TileError::NameParse(path.display().to_string()))?;
        let parse_error = || TileError::NameParse(name.to_string());

        let mut parts = name.rsplit('_');
        let y_part = parts.next().ok_or_else(parse_error)?;
        let x_part = parts.next().ok_or_else(parse_error)?;
        let y_part = y_part.split('.').next().unwrap_or(y_part);

        let x = x_part.parse::<u32>().map_err(|_| parse_error())?;
        let y = y_part.parse::<u32>().map_err(|_| parse_error())?;

        Ok(Self { zoom, x, y })
    }

    /// Converts a point in this tile's local units to WGS84 longitude/latitude
    pub fn to_lonlat(&self, extent: u32, local: Coord<f64>) -> Point<f64> {
        let (lon, lat) = tile_pixel_to_lonlat(self.x, self.y, self.zoom, extent, local.x, local.y);
        Point::new(lon, lat)
    }
}

/// Converts a tile-local position to longitude/latitude in degrees.
///
/// `local_x`/`local_y` are in the layer's extent units, measured from the
/// tile's north-west corner. Values outside `[0, extent]` are not rejected and
/// simply land in the neighbouring tile.
pub fn tile_pixel_to_lonlat(
    tile_x: u32,
    tile_y: u32,
    zoom: u8,
    extent: u32,
    local_x: f64,
    local_y: f64,
) -> (f64, f64) {
    let n = 2.0_f64.powi(i32::from(zoom));
    let extent = f64::from(extent);

    let x = f64::from(tile_x) + local_x / extent;
    let y = f64::from(tile_y) + local_y / extent;

    let lon = x / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();

    (lon, lat)
}
