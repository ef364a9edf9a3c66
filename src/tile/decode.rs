use std::collections::HashMap;
use std::fmt;

use geo::Geometry;
use log::debug;
use prost::Message;

use super::geometry::decode_geometry;
use super::proto::{self, GeomType};
use crate::error::{StatusOr, TileError};

/// A typed attribute value from a layer's value table
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Float(f32),
    Double(f64),
    Int(i64),
    UInt(u64),
    SInt(i64),
    Bool(bool),
}

impl PropertyValue {
    fn from_proto(value: &proto::Value) -> Option<Self> {
        if let Some(v) = &value.string_value {
            return Some(Self::String(v.clone()));
        }
        if let Some(v) = value.float_value {
            return Some(Self::Float(v));
        }
        if let Some(v) = value.double_value {
            return Some(Self::Double(v));
        }
        if let Some(v) = value.int_value {
            return Some(Self::Int(v));
        }
        if let Some(v) = value.uint_value {
            return Some(Self::UInt(v));
        }
        if let Some(v) = value.sint_value {
            return Some(Self::SInt(v));
        }
        value.bool_value.map(Self::Bool)
    }

    /// Numeric reading of the value; strings are parsed, booleans count as 1/0.
    /// Infinite and NaN readings are rejected.
    pub fn as_f64(&self) -> Option<f64> {
        let number = match self {
            Self::String(s) => s.trim().parse().ok(),
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            Self::Int(v) | Self::SInt(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            Self::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
        };
        number.filter(|n| n.is_finite())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Int(v) | Self::SInt(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// One feature: its decoded geometry (`None` for an unknown geometry type)
/// and its attribute mapping.
#[derive(Debug, Clone)]
pub struct DecodedFeature {
    pub id: Option<u64>,
    pub geometry: Option<Geometry<f64>>,
    pub properties: HashMap<String, PropertyValue>,
}

#[derive(Debug, Clone)]
pub struct DecodedLayer {
    pub name: String,
    pub extent: u32,
    pub features: Vec<DecodedFeature>,
}

/// Parses raw tile bytes and decodes the first layer.
///
/// Later layers are never decoded, so a broken layer after the first one
/// does not affect the result.
pub fn decode_first_layer(data: &[u8]) -> StatusOr<DecodedLayer> {
    let tile = proto::Tile::decode(data)?;
    let layer = tile.layers.first().ok_or(TileError::EmptyTile)?;
    decode_layer(layer)
}

fn decode_layer(layer: &proto::Layer) -> StatusOr<DecodedLayer> {
    let extent = layer.extent();
    if extent == 0 {
        return Err(TileError::Malformed(format!("layer {:?} has extent 0", layer.name)));
    }

    let features = layer
        .features
        .iter()
        .map(|feature| decode_feature(layer, feature))
        .collect::<StatusOr<Vec<_>>>()?;

    Ok(DecodedLayer {
        name: layer.name.clone(),
        extent,
        features,
    })
}

fn decode_feature(layer: &proto::Layer, feature: &proto::Feature) -> StatusOr<DecodedFeature> {
    let geom_type = feature
        .geometry_type
        .and_then(|t| GeomType::try_from(t).ok())
        .unwrap_or(GeomType::Unknown);
    let geometry = decode_geometry(geom_type, &feature.geometry)?;

    let mut properties = HashMap::new();
    for pair in feature.tags.chunks_exact(2) {
        let Some(key) = layer.keys.get(pair[0] as usize) else {
            debug!("Layer {}: key index {} out of range", layer.name, pair[0]);
            continue;
        };
        let Some(value) = layer.values.get(pair[1] as usize).and_then(PropertyValue::from_proto) else {
            debug!("Layer {}: value index {} out of range or empty", layer.name, pair[1]);
            continue;
        };
        properties.insert(key.clone(), value);
    }

    Ok(DecodedFeature {
        id: feature.id,
        geometry,
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::testing::{encode_tile, int_value, string_value, station_tile, CommandEncoder, LayerBuilder};

    #[test]
    fn test_decode_station_tile() {
        let layer = decode_first_layer(&station_tile()).unwrap();
        assert_eq!(layer.name, "station_users");
        assert_eq!(layer.extent, 4096);
        assert_eq!(layer.features.len(), 4);

        let first = &layer.features[0];
        assert_eq!(first.properties.get("S12_001_ja"), Some(&PropertyValue::String("東京".to_string())));
        assert_eq!(first.properties.get("S12_009"), Some(&PropertyValue::Int(100)));
        assert!(matches!(first.geometry, Some(Geometry::Point(_))));
    }

    #[test]
    fn test_missing_extent_defaults_to_4096() {
        let mut layer = LayerBuilder::new("l", 512)
            .feature(GeomType::Point, CommandEncoder::new().move_to(&[(1, 1)]).finish(), vec![])
            .build();
        layer.extent = None;
        let layer = decode_first_layer(&encode_tile(vec![layer])).unwrap();
        assert_eq!(layer.extent, 4096);
    }

    #[test]
    fn test_zero_extent_is_malformed() {
        let layer = LayerBuilder::new("l", 0).build();
        let result = decode_first_layer(&encode_tile(vec![layer]));
        assert!(matches!(result, Err(TileError::Malformed(_))));
    }

    #[test]
    fn test_out_of_range_tags_are_skipped() {
        let mut layer = LayerBuilder::new("l", 4096)
            .feature(
                GeomType::Point,
                CommandEncoder::new().move_to(&[(1, 1)]).finish(),
                vec![("name", string_value("a"))],
            )
            .build();
        layer.features[0].tags.extend([0, 9, 7, 0]);
        let layer = decode_first_layer(&encode_tile(vec![layer])).unwrap();
        assert_eq!(layer.features[0].properties.len(), 1);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = decode_first_layer(&[0x1a, 0x05, 0x01]);
        assert!(matches!(result, Err(TileError::Decode(_))));
    }

    #[test]
    fn test_broken_second_layer_is_ignored() {
        let first = LayerBuilder::new("first", 4096)
            .feature(GeomType::Point, CommandEncoder::new().move_to(&[(1, 1)]).finish(), vec![("n", int_value(1))])
            .build();
        let second = LayerBuilder::new("second", 0).build();
        let layer = decode_first_layer(&encode_tile(vec![first, second])).unwrap();
        assert_eq!(layer.name, "first");
        assert_eq!(layer.features.len(), 1);
    }

    #[test]
    fn test_tile_without_layers_is_empty() {
        let result = decode_first_layer(&encode_tile(vec![]));
        assert!(matches!(result, Err(TileError::EmptyTile)));
    }

    #[test]
    fn test_property_value_numbers() {
        assert_eq!(PropertyValue::String(" 42 ".to_string()).as_f64(), Some(42.0));
        assert_eq!(PropertyValue::String("n/a".to_string()).as_f64(), None);
        assert_eq!(PropertyValue::UInt(7).as_f64(), Some(7.0));
        assert_eq!(PropertyValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(PropertyValue::Double(12.5).to_string(), "12.5");
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        for text in ["inf", "-infinity", "NaN"] {
            assert_eq!(PropertyValue::String(text.to_string()).as_f64(), None, "{}", text);
        }
        assert_eq!(PropertyValue::Double(f64::INFINITY).as_f64(), None);
        assert_eq!(PropertyValue::Float(f32::NAN).as_f64(), None);
    }
}
