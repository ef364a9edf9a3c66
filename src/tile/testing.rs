//! Builders for encoding test tiles.

use prost::Message;

use super::proto::{Feature, GeomType, Layer, Tile, Value};

/// Encodes absolute tile coordinates into a geometry command stream
#[derive(Default)]
pub struct CommandEncoder {
    cursor: (i32, i32),
    commands: Vec<u32>,
}

fn zigzag(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

fn command(id: u32, count: usize) -> u32 {
    (id & 0x7) | ((count as u32) << 3)
}

impl CommandEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_points(mut self, id: u32, points: &[(i32, i32)]) -> Self {
        self.commands.push(command(id, points.len()));
        for &(x, y) in points {
            self.commands.push(zigzag(x - self.cursor.0));
            self.commands.push(zigzag(y - self.cursor.1));
            self.cursor = (x, y);
        }
        self
    }

    pub fn move_to(self, points: &[(i32, i32)]) -> Self {
        self.push_points(1, points)
    }

    pub fn line_to(self, points: &[(i32, i32)]) -> Self {
        self.push_points(2, points)
    }

    pub fn close_path(mut self) -> Self {
        self.commands.push(command(7, 1));
        self
    }

    pub fn ring(self, points: &[(i32, i32)]) -> Self {
        self.move_to(&points[..1]).line_to(&points[1..]).close_path()
    }

    pub fn finish(self) -> Vec<u32> {
        self.commands
    }
}

/// Builds a single layer, interning keys and values the way tile encoders do
pub struct LayerBuilder {
    layer: Layer,
}

impl LayerBuilder {
    pub fn new(name: &str, extent: u32) -> Self {
        Self {
            layer: Layer {
                name: name.to_string(),
                extent: Some(extent),
                version: 2,
                ..Default::default()
            },
        }
    }

    fn key_index(&mut self, key: &str) -> u32 {
        match self.layer.keys.iter().position(|k| k == key) {
            Some(i) => i as u32,
            None => {
                self.layer.keys.push(key.to_string());
                (self.layer.keys.len() - 1) as u32
            }
        }
    }

    fn value_index(&mut self, value: Value) -> u32 {
        match self.layer.values.iter().position(|v| *v == value) {
            Some(i) => i as u32,
            None => {
                self.layer.values.push(value);
                (self.layer.values.len() - 1) as u32
            }
        }
    }

    pub fn feature(mut self, geom_type: GeomType, geometry: Vec<u32>, properties: Vec<(&str, Value)>) -> Self {
        let mut tags = Vec::new();
        for (key, value) in properties {
            tags.push(self.key_index(key));
            tags.push(self.value_index(value));
        }
        self.layer.features.push(Feature {
            id: Some(self.layer.features.len() as u64 + 1),
            tags,
            geometry_type: Some(geom_type as i32),
            geometry,
        });
        self
    }

    pub fn build(self) -> Layer {
        self.layer
    }
}

pub fn string_value(s: &str) -> Value {
    Value {
        string_value: Some(s.to_string()),
        ..Default::default()
    }
}

pub fn int_value(n: i64) -> Value {
    Value {
        int_value: Some(n),
        ..Default::default()
    }
}

pub fn encode_tile(layers: Vec<Layer>) -> Vec<u8> {
    Tile { layers }.encode_to_vec()
}

/// A station tile with a point, a line and a polygon station plus one
/// feature lacking a name; three records at extent 4096.
pub fn station_tile() -> Vec<u8> {
    let layer = LayerBuilder::new("station_users", 4096)
        .feature(
            GeomType::Point,
            CommandEncoder::new().move_to(&[(2048, 2048)]).finish(),
            vec![("S12_001_ja", string_value("東京")), ("S12_009", int_value(100))],
        )
        .feature(
            GeomType::Linestring,
            CommandEncoder::new().move_to(&[(0, 0)]).line_to(&[(100, 100)]).finish(),
            vec![("S12_001_ja", string_value("有楽町")), ("S12_009", int_value(50))],
        )
        .feature(
            GeomType::Point,
            CommandEncoder::new().move_to(&[(10, 10)]).finish(),
            vec![("S12_009", int_value(7))],
        )
        .feature(
            GeomType::Polygon,
            CommandEncoder::new().ring(&[(4096, 0), (4096, 4096), (0, 4096)]).finish(),
            vec![("S12_001_ja", string_value("新橋"))],
        )
        .build();
    encode_tile(vec![layer])
}
