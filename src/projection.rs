//! Equirectangular projection and SVG path serialization.
//!
//! Works directly on GeoJSON positions (`[lon, lat, ...]`), so malformed
//! input is tolerated point by point instead of failing a whole geometry.

use geojson::{PolygonType, Position};
use std::fmt::Write;

/// Canvas size used when the host surface does not define one.
pub const DEFAULT_WIDTH: f64 = 1000.0;
pub const DEFAULT_HEIGHT: f64 = 500.0;

/// Projects a geographic point onto a `width`×`height` canvas.
///
/// No clamping: points outside the valid lon/lat range land off-canvas.
pub fn project(lon: f64, lat: f64, width: f64, height: f64) -> (f64, f64) {
    ((lon + 180.0) / 360.0 * width, (90.0 - lat) / 180.0 * height)
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    (x / width * 360.0 - 180.0, 90.0 - y / height * 180.0)
}

/// Reads `(lon, lat)` from a GeoJSON position; extra members (altitude) are ignored.
pub fn lon_lat(position: &Position) -> Option<(f64, f64)> {
    match position.as_slice() {
        [lon, lat, ..] => Some((*lon, *lat)),
        _ => None,
    }
}

/// Serializes one ring as `M x,y L x,y ... Z`. Rings with no usable point yield `None`.
fn ring_path(ring: &[Position], width: f64, height: f64) -> Option<String> {
    let mut d = String::new();
    for (lon, lat) in ring.iter().filter_map(lon_lat) {
        let (x, y) = project(lon, lat, width, height);
        let cmd = if d.is_empty() { "M" } else { " L" };
        let _ = write!(d, "{cmd}{x:.2},{y:.2}");
    }
    if d.is_empty() {
        return None;
    }
    d.push_str(" Z");
    Some(d)
}

/// Builds path data for a polygon's ring sequence. An empty sequence gives `""`.
pub fn build_path(rings: &PolygonType, width: f64, height: f64) -> String {
    rings
        .iter()
        .filter_map(|ring| ring_path(ring, width, height))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds path data for a multipolygon, one fragment per constituent polygon.
pub fn build_multi_path(polygons: &[PolygonType], width: f64, height: f64) -> String {
    polygons
        .iter()
        .map(|rings| build_path(rings, width, height))
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
