use geo::{BoundingRect, MultiPoint, Point, Rect};

pub mod extract;

/// A station with its passenger volume, located in WGS84 (x = longitude, y = latitude)
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub name: String,
    pub passenger_count: f64,
    pub location: Point<f64>,
}

impl StationRecord {
    pub fn new(name: String, passenger_count: f64, location: Point<f64>) -> Self {
        Self {
            name,
            passenger_count,
            location,
        }
    }

    pub fn lon(&self) -> f64 {
        self.location.x()
    }

    pub fn lat(&self) -> f64 {
        self.location.y()
    }
}

/// Station records in load order. Stations repeated across tiles are kept as
/// separate records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationCollection {
    records: Vec<StationRecord>,
}

impl StationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend<I: IntoIterator<Item = StationRecord>>(&mut self, records: I) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StationRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StationRecord> {
        self.records.iter()
    }

    /// Bounding box of all station locations, `None` when empty
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let points: MultiPoint<f64> = self.records.iter().map(|r| r.location).collect();
        points.bounding_rect()
    }

    /// Smallest and largest passenger counts, `None` when empty
    pub fn passenger_range(&self) -> Option<(f64, f64)> {
        self.records.iter().map(|r| r.passenger_count).fold(None, |range, count| match range {
            None => Some((count, count)),
            Some((min, max)) => Some((min.min(count), max.max(count))),
        })
    }
}

impl From<Vec<StationRecord>> for StationCollection {
    fn from(records: Vec<StationRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a StationCollection {
    type Item = &'a StationRecord;
    type IntoIter = std::slice::Iter<'a, StationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
