use geo::{Coord, Geometry};
use log::warn;

use crate::config::PipelineConfig;
use crate::error::{StatusOr, TileError};
use crate::model::StationRecord;
use crate::tile::decode::{DecodedFeature, DecodedLayer};
use crate::tile::geometry::geometry_type_name;
use crate::tile::TileCoordinate;

/// Reduces a geometry to the single coordinate used as the station location.
///
/// Points use their own coordinate, lines their first vertex and polygons the
/// first vertex of the exterior ring. Multi-part geometries are not reduced.
pub fn first_coordinate(geometry: &Geometry<f64>) -> StatusOr<Coord<f64>> {
    let coord = match geometry {
        Geometry::Point(point) => Some(point.0),
        Geometry::LineString(line) => line.0.first().copied(),
        Geometry::Polygon(polygon) => polygon.exterior().0.first().copied(),
        other => return Err(TileError::UnsupportedGeometry(geometry_type_name(other))),
    };
    coord.ok_or(TileError::UnsupportedGeometry("empty geometry"))
}

/// Extracts station records from one layer, in feature order.
///
/// Features without the name attribute are dropped silently. Features with a
/// geometry that has no single representative coordinate are dropped with a
/// warning.
pub fn extract_features(
    layer: &DecodedLayer,
    tile: &TileCoordinate,
    config: &PipelineConfig,
) -> Vec<StationRecord> {
    layer
        .features
        .iter()
        .filter_map(|feature| extract_feature(feature, layer.extent, tile, config))
        .collect()
}

fn extract_feature(
    feature: &DecodedFeature,
    extent: u32,
    tile: &TileCoordinate,
    config: &PipelineConfig,
) -> Option<StationRecord> {
    let name = feature.properties.get(&config.name_key)?.to_string();

    let passenger_count = match feature.properties.get(&config.passenger_key) {
        None => 0.0,
        Some(value) => value.as_f64().unwrap_or_else(|| {
            warn!("Station {}: passenger count {:?} is not a number, using 0", name, value);
            0.0
        }),
    };

    let coord = match feature.geometry.as_ref() {
        None => Err(TileError::UnsupportedGeometry("Unknown")),
        Some(geometry) => first_coordinate(geometry),
    };
    let coord = match coord {
        Ok(coord) => coord,
        Err(e) => {
            warn!("Skipping station {}: {}", name, e);
            return None;
        }
    };

    Some(StationRecord::new(name, passenger_count, tile.to_lonlat(extent, coord)))
}
