//! Parans: latitudes where two bodies are angular at the same moment.

use super::projector::{anti_culmination_longitude, culmination_longitude, longitude_for_angle_at_latitude};
use super::types::Angle;
use crate::ephemeris::{Body, PlanetaryPosition};
use crate::geo::{normalize_longitude, shortest_arc};
use serde::{Deserialize, Serialize};

/// Angle pairings examined for each ordered body pair.
const ANGLE_PAIRS: [(Angle, Angle); 6] = [
    (Angle::Mc, Angle::Asc),
    (Angle::Mc, Angle::Dsc),
    (Angle::Mc, Angle::Ic),
    (Angle::Ic, Angle::Asc),
    (Angle::Ic, Angle::Dsc),
    (Angle::Asc, Angle::Dsc),
];

const SEARCH_LIMIT_LAT: f64 = 66.0;
const SEARCH_STEP_LAT: f64 = 0.25;
const MERIDIAN_COINCIDENCE_DEG: f64 = 2.0;
const CROSSING_TOLERANCE_DEG: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paran {
    pub body1: Body,
    pub angle1: Angle,
    pub body2: Body,
    pub angle2: Angle,
    pub latitude: f64,
    pub longitude: f64,
}

fn meridian_longitude(position: &PlanetaryPosition, gmst: f64, angle: Angle) -> f64 {
    if angle == Angle::Mc {
        culmination_longitude(position.right_ascension, gmst)
    } else {
        anti_culmination_longitude(position.right_ascension, gmst)
    }
}

/// Crossing of two angle lines, searched over |lat| ≤ 66° in 0.25° steps.
pub fn paran(p1: &PlanetaryPosition, a1: Angle, p2: &PlanetaryPosition, a2: Angle, gmst: f64) -> Option<Paran> {
    let make = |latitude: f64, longitude: f64| Paran {
        body1: p1.body,
        angle1: a1,
        body2: p2.body,
        angle2: a2,
        latitude,
        longitude,
    };

    if a1.is_meridian() && a2.is_meridian() {
        // two meridians only meet when they coincide
        let l1 = meridian_longitude(p1, gmst, a1);
        let l2 = meridian_longitude(p2, gmst, a2);
        return (shortest_arc(l1, l2).abs() < MERIDIAN_COINCIDENCE_DEG).then(|| make(0.0, l1));
    }

    let steps = (2.0 * SEARCH_LIMIT_LAT / SEARCH_STEP_LAT).round() as usize;
    let mut best: Option<(f64, f64, f64)> = None;
    for i in 0..=steps {
        let lat = -SEARCH_LIMIT_LAT + i as f64 * SEARCH_STEP_LAT;
        let (Some(l1), Some(l2)) = (
            longitude_for_angle_at_latitude(p1, gmst, lat, a1),
            longitude_for_angle_at_latitude(p2, gmst, lat, a2),
        ) else {
            continue;
        };
        let diff = shortest_arc(l1, l2);
        if diff.abs() < CROSSING_TOLERANCE_DEG && best.map_or(true, |(_, _, d)| diff.abs() < d) {
            // a meridian fixes the longitude exactly; two curves meet halfway
            let lng = if a1.is_meridian() { l1 } else { normalize_longitude(l1 + diff / 2.0) };
            best = Some((lat, lng, diff.abs()));
        }
    }
    best.map(|(lat, lng, _)| make(lat, lng))
}

/// All parans between every ordered pair of distinct bodies.
pub fn all_parans(positions: &[PlanetaryPosition], gmst: f64) -> Vec<Paran> {
    let mut out = Vec::new();
    for (i, p1) in positions.iter().enumerate() {
        for (j, p2) in positions.iter().enumerate() {
            if i == j {
                continue;
            }
            for (a1, a2) in ANGLE_PAIRS {
                out.extend(paran(p1, a1, p2, a2, gmst));
            }
        }
    }
    out
}
