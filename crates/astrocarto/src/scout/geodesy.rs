//! Great-circle distances on a spherical Earth (mean radius 6371 km).
//!
//! All formulas work on unit vectors or bearings, so a segment crossing the
//! ±180° meridian needs no special casing.

use crate::geo::{GeoPoint, EARTH_RADIUS_KM};
use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;

/// Segments per bounding cap in a [`PreparedPolyline`].
const CHUNK_SEGMENTS: usize = 16;
/// Slack added to cap radii to absorb rounding, radians.
const CAP_MARGIN: f64 = 1e-3;

/// Haversine distance in kilometres between two points given in degrees.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lng2 - lng1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Central angle between two points, degrees.
pub fn angular_distance_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_km(a.lat, a.lng, b.lat, b.lng) / EARTH_RADIUS_KM * 180.0 / std::f64::consts::PI
}

fn initial_bearing(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let y = (lng2 - lng1).sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lng2 - lng1).cos();
    y.atan2(x)
}

/// Cross-track and signed along-track distance (km) of `p` relative to the
/// great circle through `a` and `b`.
///
/// The along-track distance is negative when `p` projects behind `a`.
pub fn cross_track_distance(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> (f64, f64) {
    let (lat_p, lng_p) = (p.lat.to_radians(), p.lng.to_radians());
    let (lat_a, lng_a) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat_b, lng_b) = (b.lat.to_radians(), b.lng.to_radians());

    let d13 = haversine_km(a.lat, a.lng, p.lat, p.lng) / EARTH_RADIUS_KM;
    let theta13 = initial_bearing(lat_a, lng_a, lat_p, lng_p);
    let theta12 = initial_bearing(lat_a, lng_a, lat_b, lng_b);

    let dxt = (d13.sin() * (theta13 - theta12).sin()).clamp(-1.0, 1.0).asin();
    let cross = dxt.abs() * EARTH_RADIUS_KM;

    let mut cos_dxt = dxt.cos();
    if cos_dxt.abs() < 1e-10 {
        cos_dxt = 1e-10_f64.copysign(cos_dxt);
    }
    let dat = (d13.cos() / cos_dxt).clamp(-1.0, 1.0).acos();
    let sign = if (theta13 - theta12).cos() >= 0.0 { 1.0 } else { -1.0 };
    let along = if dat.is_nan() { 0.0 } else { sign * dat * EARTH_RADIUS_KM };

    (cross, along)
}

/// Distance (km) from `p` to the great-circle segment `a`–`b`; the nearest
/// endpoint when `p` does not project onto the segment.
pub fn distance_to_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> f64 {
    let (cross, along) = cross_track_distance(p, a, b);
    let length = haversine_km(a.lat, a.lng, b.lat, b.lng);
    if along < 0.0 {
        haversine_km(p.lat, p.lng, a.lat, a.lng)
    } else if along > length {
        haversine_km(p.lat, p.lng, b.lat, b.lng)
    } else {
        cross
    }
}

/// Brute-force distance (km) to an unprepared polyline. Infinite for no points.
pub fn distance_to_polyline(p: GeoPoint, points: &[GeoPoint]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => haversine_km(p.lat, p.lng, only.lat, only.lng),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

#[derive(Debug, Clone)]
struct Cap {
    centre: [f64; 3],
    /// Angular radius, radians; at or past 90° the cap bounds nothing useful
    radius: f64,
    first_segment: usize,
    end_segment: usize,
}

/// A polyline with per-chunk bounding caps for exact nearest-segment queries.
///
/// A cap of radius below 90° is convex, so every great-circle arc between two
/// of its points stays inside it. The angular distance from a query point to
/// the cap centre minus the radius is then a lower bound for every segment in
/// the chunk, and chunks whose bound exceeds the best distance so far are skipped.
#[derive(Debug, Clone)]
pub struct PreparedPolyline {
    points: Vec<GeoPoint>,
    caps: Vec<Cap>,
}

impl PreparedPolyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        let segment_count = points.len().saturating_sub(1);
        let vectors: Vec<[f64; 3]> = points.iter().map(|p| p.to_unit_vector()).collect();

        let caps = (0..segment_count)
            .step_by(CHUNK_SEGMENTS)
            .map(|first| {
                let end = (first + CHUNK_SEGMENTS).min(segment_count);
                bounding_cap(&vectors[first..=end], first, end)
            })
            .collect();

        Self { points, caps }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Exact distance (km) from `p` to the nearest segment. Infinite for no points.
    pub fn distance_km(&self, p: GeoPoint) -> f64 {
        match self.points.as_slice() {
            [] => return f64::INFINITY,
            [only] => return haversine_km(p.lat, p.lng, only.lat, only.lng),
            _ => {}
        }

        let v = p.to_unit_vector();
        let mut order: Vec<(f64, &Cap)> = self
            .caps
            .iter()
            .map(|cap| {
                let bound = if cap.radius >= FRAC_PI_2 {
                    0.0
                } else {
                    (angle_between(&v, &cap.centre) - cap.radius).max(0.0) * EARTH_RADIUS_KM
                };
                (bound, cap)
            })
            .collect();
        order.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut best = f64::INFINITY;
        for (bound, cap) in order {
            if bound >= best {
                break;
            }
            for i in cap.first_segment..cap.end_segment {
                best = best.min(distance_to_segment(p, self.points[i], self.points[i + 1]));
            }
        }
        best
    }
}

fn bounding_cap(vectors: &[[f64; 3]], first_segment: usize, end_segment: usize) -> Cap {
    let sum = vectors.iter().fold([0.0; 3], |acc, v| [acc[0] + v[0], acc[1] + v[1], acc[2] + v[2]]);
    let norm = (sum[0] * sum[0] + sum[1] * sum[1] + sum[2] * sum[2]).sqrt();
    if norm < 1e-9 {
        return Cap {
            centre: [0.0, 0.0, 1.0],
            radius: std::f64::consts::PI,
            first_segment,
            end_segment,
        };
    }
    let centre = [sum[0] / norm, sum[1] / norm, sum[2] / norm];
    let radius = vectors
        .iter()
        .map(|v| angle_between(v, &centre))
        .fold(0.0, f64::max)
        + CAP_MARGIN;
    Cap {
        centre,
        radius,
        first_segment,
        end_segment,
    }
}

fn angle_between(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let cross = [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ];
    let sin = (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt();
    let cos = a[0] * b[0] + a[1] * b[1] + a[2] * b[2];
    sin.atan2(cos)
}
