//! Local-space rays: great circles leaving the origin along each body's azimuth.

use super::types::{Line, LineType};
use crate::ephemeris::PlanetaryPosition;
use crate::error::{AstroError, Result};
use crate::geo::{normalize_degrees, normalize_radians, GeoPoint, DEG_TO_RAD, EARTH_RADIUS_KM, RAD_TO_DEG};
use crate::time::lst;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSpaceRay {
    pub line: Line,
    /// Degrees clockwise from north
    pub azimuth: f64,
    /// Degrees above the horizon, negative below
    pub altitude: f64,
    pub direction: String,
}

/// Equatorial to horizontal coordinates: (azimuth from north, altitude), radians.
pub fn equatorial_to_horizontal(ra: f64, dec: f64, lst: f64, observer_lat: f64) -> (f64, f64) {
    let h = lst - ra;
    let altitude = (dec.sin() * observer_lat.sin() + dec.cos() * observer_lat.cos() * h.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let y = h.sin();
    let x = h.cos() * observer_lat.sin() - dec.tan() * observer_lat.cos();
    // atan2 measures from south; shift to north-based
    let azimuth = normalize_radians(y.atan2(x) + PI);
    (azimuth, altitude)
}

/// Point reached from `start` after `distance_km` along an initial bearing (radians).
pub fn destination_point(start: GeoPoint, bearing: f64, distance_km: f64) -> GeoPoint {
    let delta = distance_km / EARTH_RADIUS_KM;
    let lat1 = start.lat * DEG_TO_RAD;
    let lng1 = start.lng * DEG_TO_RAD;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lng2 = lng1 + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());
    GeoPoint::new(lat2 * RAD_TO_DEG, lng2 * RAD_TO_DEG)
}

/// Farthest reach of a ray: half the Earth's circumference.
pub const MAX_RAY_DISTANCE_KM: f64 = PI * EARTH_RADIUS_KM;

/// Most samples per ray beyond the origin.
pub const MAX_RAY_STEPS: f64 = 10_000.0;

/// Rejects ray lengths past the antipode and sample counts above [`MAX_RAY_STEPS`].
pub fn check_ray_sampling(max_distance_km: f64, step_km: f64) -> Result<()> {
    if !(max_distance_km.is_finite() && (0.0..=MAX_RAY_DISTANCE_KM).contains(&max_distance_km)) {
        return Err(AstroError::InvalidParameter {
            field: "max_distance_km",
            value: max_distance_km,
        });
    }
    if !(step_km.is_finite() && step_km > 0.0 && max_distance_km / step_km <= MAX_RAY_STEPS) {
        return Err(AstroError::InvalidParameter {
            field: "step_km",
            value: step_km,
        });
    }
    Ok(())
}

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Eight-point compass name for an azimuth in degrees.
pub fn azimuth_to_direction(azimuth_deg: f64) -> &'static str {
    let sector = (normalize_degrees(azimuth_deg + 22.5) / 45.0).floor() as usize;
    COMPASS[sector.min(7)]
}

/// Rays from `origin` for each position, sampled every `step_km` up to `max_distance_km`.
///
/// Sampling is capped at [`MAX_RAY_STEPS`] points; callers validate with [`check_ray_sampling`].
pub fn local_space_rays(
    origin: GeoPoint,
    positions: &[PlanetaryPosition],
    gmst: f64,
    max_distance_km: f64,
    step_km: f64,
) -> Vec<LocalSpaceRay> {
    let local_sidereal = lst(gmst, origin.lng);
    let steps = if step_km > 0.0 {
        (max_distance_km / step_km + 1e-9).floor().clamp(0.0, MAX_RAY_STEPS) as usize
    } else {
        0
    };

    positions
        .iter()
        .map(|position| {
            let (azimuth, altitude) = equatorial_to_horizontal(
                position.right_ascension,
                position.declination,
                local_sidereal,
                origin.lat * DEG_TO_RAD,
            );

            let mut points = Vec::with_capacity(steps + 1);
            points.push(origin);
            points.extend((1..=steps).map(|i| destination_point(origin, azimuth, i as f64 * step_km)));

            let azimuth_deg = azimuth * RAD_TO_DEG;
            LocalSpaceRay {
                line: Line::new(position.body, LineType::LocalSpace, points),
                azimuth: azimuth_deg,
                altitude: altitude * RAD_TO_DEG,
                direction: azimuth_to_direction(azimuth_deg).to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compass_sectors() {
        assert_eq!(azimuth_to_direction(0.0), "N");
        assert_eq!(azimuth_to_direction(350.0), "N");
        assert_eq!(azimuth_to_direction(45.0), "NE");
        assert_eq!(azimuth_to_direction(100.0), "E");
        assert_eq!(azimuth_to_direction(200.0), "S");
        assert_eq!(azimuth_to_direction(300.0), "NW");
    }

    #[test]
    fn test_ray_sampling_bounds() {
        assert!(check_ray_sampling(15_000.0, 200.0).is_ok());
        assert!(check_ray_sampling(20_000.0, 2.0).is_ok());
        assert!(check_ray_sampling(MAX_RAY_DISTANCE_KM + 1.0, 100.0).is_err());
        assert!(check_ray_sampling(1.0e300, 1.0).is_err());
        assert!(check_ray_sampling(20_000.0, 1.0e-6).is_err());
        assert!(check_ray_sampling(f64::NAN, 1.0).is_err());
        assert!(check_ray_sampling(1000.0, 0.0).is_err());
    }

    #[test]
    fn test_step_count_is_capped() {
        let pos = PlanetaryPosition {
            body: crate::ephemeris::Body::Sun,
            right_ascension: 0.0,
            declination: 0.0,
            ecliptic_longitude: 0.0,
            ecliptic_latitude: 0.0,
        };
        let rays = local_space_rays(GeoPoint::new(0.0, 0.0), &[pos], 0.0, 1.0e300, 1.0);
        assert_eq!(rays[0].line.points.len(), MAX_RAY_STEPS as usize + 1);
    }

    #[test]
    fn test_destination_due_north() {
        let p = destination_point(GeoPoint::new(0.0, 10.0), 0.0, 111.195);
        assert!((p.lat - 1.0).abs() < 1e-3);
        assert!((p.lng - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_body_at_meridian_is_due_south_from_north() {
        // observer at 45N, body on the meridian at the equator
        let (az, alt) = equatorial_to_horizontal(1.0, 0.0, 1.0, 45.0 * DEG_TO_RAD);
        assert!((az * RAD_TO_DEG - 180.0).abs() < 1e-9);
        assert!((alt * RAD_TO_DEG - 45.0).abs() < 1e-9);
    }
}
