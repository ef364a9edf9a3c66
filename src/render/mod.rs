use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::MapConfig;
use crate::model::StationCollection;

const LEAFLET_VERSION: &str = "1.9.4";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta name="generator" content="stationmap __VERSION__">
<meta name="generated" content="__GENERATED__">
<title>Station passenger map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@__LEAFLET__/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@__LEAFLET__/dist/leaflet.js"></script>
<style>html, body, #map { width: 100%; height: 100%; margin: 0; padding: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([__CENTER_LAT__, __CENTER_LON__], __ZOOM__);
L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);
var markers = __MARKERS__;
markers.forEach(function (m) {
  L.circleMarker([m.lat, m.lon], {
    radius: m.radius,
    color: m.color,
    fill: true,
    fillColor: m.color
  }).bindPopup(m.popup).addTo(map);
});
</script>
</body>
</html>
"#;

/// A filled circle drawn at a station, with an HTML popup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    pub popup: String,
    pub color: String,
}

/// Scales a passenger count linearly onto `[min_radius, max_radius]`.
///
/// When every station has the same count there is no range to scale over and
/// all markers get `min_radius`.
pub fn marker_radius(count: f64, min: f64, max: f64, min_radius: f64, max_radius: f64) -> f64 {
    if max <= min {
        return min_radius;
    }
    min_radius + (count - min) / (max - min) * (max_radius - min_radius)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// An interactive map document under construction
#[derive(Debug, Clone)]
pub struct StationMap {
    center_lat: f64,
    center_lon: f64,
    zoom: u8,
    markers: Vec<CircleMarker>,
    generated_at: String,
}

impl StationMap {
    pub fn new(center_lat: f64, center_lon: f64, zoom: u8) -> Self {
        Self {
            center_lat,
            center_lon,
            zoom,
            markers: Vec::new(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn add_circle_marker(&mut self, marker: CircleMarker) {
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    /// Renders the map as a standalone Leaflet page
    pub fn to_html(&self) -> Result<String> {
        // Keep "</script>" inside popups from closing the script element
        let markers = serde_json::to_string(&self.markers)
            .context("Failed to serialize markers")?
            .replace("</", "<\\/");

        Ok(TEMPLATE
            .replace("__VERSION__", env!("CARGO_PKG_VERSION"))
            .replace("__GENERATED__", &self.generated_at)
            .replace("__LEAFLET__", LEAFLET_VERSION)
            .replace("__CENTER_LAT__", &self.center_lat.to_string())
            .replace("__CENTER_LON__", &self.center_lon.to_string())
            .replace("__ZOOM__", &self.zoom.to_string())
            .replace("__MARKERS__", &markers))
    }

    /// Write the map document to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let html = self.to_html()?;
        fs::write(path, html).with_context(|| format!("Failed to write map to {}", path.display()))?;
        info!("Saved map with {} markers to {}", self.markers.len(), path.display());
        Ok(())
    }
}

/// Builds the station map: one circle per station, sized by passenger count
/// relative to the smallest and largest counts in the collection.
pub fn create_map(stations: &StationCollection, config: &MapConfig) -> StationMap {
    let mut map = StationMap::new(config.center_lat, config.center_lon, config.zoom);
    let (min, max) = stations.passenger_range().unwrap_or((0.0, 0.0));

    for station in stations {
        let popup = format!(
            "{}: {}<br>{}: {}",
            escape_html(&config.name_label),
            escape_html(&station.name),
            escape_html(&config.count_label),
            station.passenger_count
        );
        map.add_circle_marker(CircleMarker {
            lat: station.lat(),
            lon: station.lon(),
            radius: marker_radius(station.passenger_count, min, max, config.min_radius, config.max_radius),
            popup,
            color: config.color.clone(),
        });
    }

    map
}
