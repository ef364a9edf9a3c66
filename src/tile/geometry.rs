use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use log::debug;

use super::proto::GeomType;
use crate::error::{StatusOr, TileError};

const MOVE_TO: u32 = 1;
const LINE_TO: u32 = 2;
const CLOSE_PATH: u32 = 7;

fn decode_zigzag(value: u32) -> i64 {
    i64::from(value >> 1) ^ -i64::from(value & 1)
}

/// Decodes a feature's command stream into a geometry in tile-local units.
///
/// Coordinates are kept exactly as encoded, with the y axis pointing down
/// from the tile's top edge. Returns `Ok(None)` for `GeomType::Unknown`.
///
/// No y-flip is applied, so positions deliberately differ from decoders that
/// default to a y-up axis (`extent - y`).
pub fn decode_geometry(geom_type: GeomType, commands: &[u32]) -> StatusOr<Option<Geometry<f64>>> {
    if geom_type == GeomType::Unknown {
        return Ok(None);
    }

    let paths = decode_paths(geom_type, commands)?;
    if paths.is_empty() {
        return Err(TileError::Malformed(format!("{:?} geometry has no parts", geom_type)));
    }

    let geometry = match geom_type {
        GeomType::Point => {
            let mut points: Vec<Point<f64>> = paths.into_iter().flatten().map(Point::from).collect();
            if points.len() == 1 {
                Geometry::Point(points.remove(0))
            } else {
                Geometry::MultiPoint(MultiPoint::new(points))
            }
        }
        GeomType::Linestring => {
            let mut lines: Vec<LineString<f64>> = paths.into_iter().map(LineString::new).collect();
            if lines.len() == 1 {
                Geometry::LineString(lines.remove(0))
            } else {
                Geometry::MultiLineString(MultiLineString::new(lines))
            }
        }
        GeomType::Polygon => assemble_polygons(paths)?,
        GeomType::Unknown => return Ok(None),
    };

    Ok(Some(geometry))
}

/// Splits a command stream into paths, one per MoveTo.
fn decode_paths(geom_type: GeomType, commands: &[u32]) -> StatusOr<Vec<Vec<Coord<f64>>>> {
    let mut paths: Vec<Vec<Coord<f64>>> = Vec::new();
    let mut cursor = 0usize;
    let mut x = 0i64;
    let mut y = 0i64;

    while cursor < commands.len() {
        let command = commands[cursor];
        cursor += 1;
        let id = command & 0x7;
        let count = (command >> 3) as usize;

        match id {
            MOVE_TO | LINE_TO => {
                if id == MOVE_TO && geom_type != GeomType::Point && count != 1 {
                    return Err(TileError::Malformed(format!(
                        "MoveTo with count {} in {:?} geometry",
                        count, geom_type
                    )));
                }
                if id == LINE_TO && (geom_type == GeomType::Point || paths.is_empty()) {
                    return Err(TileError::Malformed("unexpected LineTo".to_string()));
                }

                let end = cursor + 2 * count;
                if end > commands.len() {
                    return Err(TileError::Malformed(format!(
                        "command at {} needs {} parameters, stream has {}",
                        cursor - 1,
                        2 * count,
                        commands.len() - cursor
                    )));
                }

                for pair in commands[cursor..end].chunks_exact(2) {
                    x += decode_zigzag(pair[0]);
                    y += decode_zigzag(pair[1]);
                    if id == MOVE_TO {
                        paths.push(Vec::new());
                    }
                    if let Some(path) = paths.last_mut() {
                        path.push(Coord { x: x as f64, y: y as f64 });
                    }
                }
                cursor = end;
            }
            CLOSE_PATH => {
                if geom_type != GeomType::Polygon || paths.is_empty() {
                    return Err(TileError::Malformed("unexpected ClosePath".to_string()));
                }
            }
            other => {
                return Err(TileError::Malformed(format!("unknown command id {}", other)));
            }
        }
    }

    Ok(paths)
}

/// Groups rings into polygons by winding: positive area opens a new polygon,
/// negative area is a hole in the current one.
fn assemble_polygons(rings: Vec<Vec<Coord<f64>>>) -> StatusOr<Geometry<f64>> {
    let mut shells: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();

    for ring in rings {
        let area = signed_area(&ring);
        if area == 0.0 {
            debug!("Dropping zero-area ring with {} points", ring.len());
            continue;
        }
        let ring = LineString::new(ring);
        match shells.last_mut() {
            Some((_, interiors)) if area < 0.0 => interiors.push(ring),
            _ => shells.push((ring, Vec::new())),
        }
    }

    let mut polygons: Vec<Polygon<f64>> = shells
        .into_iter()
        .map(|(exterior, interiors)| Polygon::new(exterior, interiors))
        .collect();

    match polygons.len() {
        0 => Err(TileError::Malformed("polygon has no ring with area".to_string())),
        1 => Ok(Geometry::Polygon(polygons.remove(0))),
        _ => Ok(Geometry::MultiPolygon(MultiPolygon::new(polygons))),
    }
}

// Surveyor's formula in tile coordinates
fn signed_area(ring: &[Coord<f64>]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Short name of a geometry variant, as used in diagnostics
pub fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
