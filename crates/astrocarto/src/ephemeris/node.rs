use super::moon::LunarArguments;
use crate::geo::{normalize_radians, DEG_TO_RAD};
use crate::time::centuries_since_j2000;

/// (amplitude in degrees, multiples of D, M, M', F)
const TRUE_NODE_TERMS: &[(f64, i8, i8, i8, i8)] = &[
    (-1.4979, 2, 0, 0, -2),
    (-0.1500, 0, 0, 1, 0),
    (-0.1226, 2, 0, 0, 0),
    (0.1176, 0, 0, 0, 2),
    (-0.0801, 0, 0, 2, -2),
    (-0.0616, 2, -1, 0, -2),
    (0.0490, 2, 0, -1, -2),
    (0.0438, 2, 0, -2, 0),
    (-0.0393, 0, 0, 2, 0),
    (-0.0311, 2, 0, -1, 0),
    (0.0227, 0, 0, 1, -2),
    (-0.0220, 2, 0, 1, -2),
    (0.0181, 0, 1, 0, 0),
    (-0.0149, 2, 0, -2, -2),
];

/// Mean longitude of the Moon's ascending node in degrees.
pub fn mean_node_degrees(t: f64) -> f64 {
    125.04452 - 1934.136261 * t + 0.0020708 * t * t + t * t * t / 450_000.0
}

/// Ecliptic longitude of the true (osculating) ascending node in radians.
/// The node lies on the ecliptic, so latitude is zero.
pub fn true_node_position(jde: f64) -> (f64, f64) {
    let t = centuries_since_j2000(jde);
    let args = LunarArguments::at(t);
    let (d, m, mp, f) = (
        args.d * DEG_TO_RAD,
        args.m * DEG_TO_RAD,
        args.m_prime * DEG_TO_RAD,
        args.f * DEG_TO_RAD,
    );

    let correction: f64 = TRUE_NODE_TERMS
        .iter()
        .map(|&(amp, kd, km, kmp, kf)| {
            amp * (kd as f64 * d + km as f64 * m + kmp as f64 * mp + kf as f64 * f).sin()
        })
        .sum();

    (normalize_radians((mean_node_degrees(t) + correction) * DEG_TO_RAD), 0.0)
}
