//! Coordinate types.
//!
//! The map and the geocoder speak `(lat, lng)`; everything stored or sent to
//! the backend is a GeoJSON point with `[lng, lat]` coordinates. Conversions
//! between the two only happen through the functions in this module.

use serde::{Deserialize, Serialize};

/// Decimal places kept for captured coordinates (~11 cm).
pub const COORDINATE_PRECISION: i32 = 6;

/// A map-facing position in `(lat, lng)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// GeoJSON geometry type tag. Only points are produced by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeometryType {
    #[default]
    Point,
}

/// A GeoJSON point: `{"type": "Point", "coordinates": [lng, lat]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default)]
    pub kind: GeometryType,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    /// Build a point from a map position, rounding to [`COORDINATE_PRECISION`].
    pub fn from_lat_lng(position: LatLng) -> Self {
        Self {
            kind: GeometryType::Point,
            coordinates: [round_coordinate(position.lng), round_coordinate(position.lat)],
        }
    }

    pub fn lng(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }

    /// Convert back to the map's `(lat, lng)` order.
    pub fn to_lat_lng(&self) -> LatLng {
        LatLng::new(self.lat(), self.lng())
    }

    /// True when both longitude and latitude are finite numbers.
    pub fn is_complete(&self) -> bool {
        self.lng().is_finite() && self.lat().is_finite()
    }
}

/// Round to [`COORDINATE_PRECISION`] decimal places. Non-finite values pass through.
pub fn round_coordinate(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(COORDINATE_PRECISION);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_uses_lng_lat_order() {
        let point = GeoPoint::from_lat_lng(LatLng::new(42.3601, -71.0589));
        assert_eq!(point.coordinates, [-71.0589, 42.3601]);
        assert_eq!(point.to_lat_lng(), LatLng::new(42.3601, -71.0589));
    }

    #[test]
    fn test_point_rounds_to_six_decimals() {
        let point = GeoPoint::from_lat_lng(LatLng::new(42.36012345678, -71.05891111111));
        assert_eq!(point.coordinates, [-71.058911, 42.360123]);
    }

    #[test]
    fn test_point_serializes_as_geojson() {
        let point = GeoPoint::from_lat_lng(LatLng::new(1.5, 2.25));
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "Point", "coordinates": [2.25, 1.5]})
        );

        let parsed: GeoPoint =
            serde_json::from_value(serde_json::json!({"coordinates": [2.25, 1.5]})).unwrap();
        assert_eq!(parsed, point);
    }

    #[test]
    fn test_incomplete_point() {
        let point = GeoPoint::from_lat_lng(LatLng::new(f64::NAN, 3.0));
        assert!(!point.is_complete());
        assert!(!LatLng::new(1.0, f64::INFINITY).is_finite());
    }
}
