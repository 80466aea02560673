//! Angles and geographic points.

use crate::error::{AstroError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

pub const DEG_TO_RAD: f64 = PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / PI;
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Normalize radians into [0, 2π).
pub fn normalize_radians(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Normalize radians into [-π, π).
pub fn normalize_signed_radians(angle: f64) -> f64 {
    normalize_radians(angle + PI) - PI
}

/// Normalize degrees into [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Normalize a longitude into [-180, 180).
pub fn normalize_longitude(lng: f64) -> f64 {
    normalize_degrees(lng + 180.0) - 180.0
}

/// Signed shortest arc from `from` to `to` in degrees, in (-180, 180].
pub fn shortest_arc(from: f64, to: f64) -> f64 {
    let d = normalize_degrees(to - from);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// A point on the Earth's surface.
///
/// Longitude is always stored in [-180, 180); latitude in [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Builds a point, normalizing longitude and clamping latitude.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: lat.clamp(-90.0, 90.0),
            lng: normalize_longitude(lng),
        }
    }

    /// Builds a point from caller input, rejecting non-finite or out-of-range latitude.
    pub fn checked(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AstroError::InvalidCoordinate { field: "lat", value: lat });
        }
        if !lng.is_finite() {
            return Err(AstroError::InvalidCoordinate { field: "lng", value: lng });
        }
        Ok(Self::new(lat, lng))
    }

    /// Unit vector in Earth-centred coordinates.
    pub fn to_unit_vector(self) -> [f64; 3] {
        let (lat, lng) = (self.lat * DEG_TO_RAD, self.lng * DEG_TO_RAD);
        [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_longitude_range() {
        assert_eq!(normalize_longitude(180.0), -180.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
        assert!((normalize_longitude(190.0) + 170.0).abs() < 1e-12);
        assert!((normalize_longitude(-540.5) - 179.5).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_radians() {
        assert!((normalize_radians(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!(normalize_radians(TAU) < 1e-12);
        assert!((normalize_signed_radians(1.5 * PI) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_shortest_arc() {
        assert!((shortest_arc(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((shortest_arc(10.0, 350.0) + 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_checked_rejects_bad_latitude() {
        assert!(GeoPoint::checked(91.0, 0.0).is_err());
        assert!(GeoPoint::checked(f64::NAN, 0.0).is_err());
        assert_eq!(GeoPoint::checked(10.0, 200.0).unwrap().lng, -160.0);
    }
}
