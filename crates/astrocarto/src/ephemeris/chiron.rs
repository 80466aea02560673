//! Heliocentric Chiron from osculating elements with first-order giant-planet terms.
//!
//! Chiron's orbit is chaotic; expect roughly half a degree near J2000.

use crate::geo::{normalize_radians, DEG_TO_RAD};
use crate::time::{centuries_since_j2000, J2000_EPOCH};

/// Newton iteration on Kepler's equation `E - e sin E = M`.
pub(crate) fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = if e > 0.8 { std::f64::consts::PI } else { mean_anomaly };
    for _ in 0..15 {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

/// Heliocentric ecliptic (longitude rad, latitude rad, distance AU).
pub fn chiron_heliocentric(jde: f64) -> (f64, f64, f64) {
    let t = centuries_since_j2000(jde);

    let a = 13.648 + 0.0001 * t;
    let e = 0.3814 + 0.00001 * t;
    let incl = (6.930 + 0.0001 * t) * DEG_TO_RAD;
    let node = (209.379 - 0.0094 * t) * DEG_TO_RAD;
    let peri = (339.557 + 0.0085 * t) * DEG_TO_RAD;

    // degrees per day
    let n = 0.9856076686 / (a * a.sqrt());
    let mean_anomaly = normalize_radians((12.49 + n * (jde - J2000_EPOCH)) * DEG_TO_RAD);

    let ecc = solve_kepler(mean_anomaly, e);
    let nu = 2.0 * ((1.0 + e).sqrt() * (ecc / 2.0).tan()).atan2((1.0 - e).sqrt());
    let r = a * (1.0 - e * ecc.cos());
    let (x_orb, y_orb) = (r * nu.cos(), r * nu.sin());

    let (sn, cn) = node.sin_cos();
    let (si, ci) = incl.sin_cos();
    let (sw, cw) = peri.sin_cos();
    let x = (cn * cw - sn * sw * ci) * x_orb + (-cn * sw - sn * cw * ci) * y_orb;
    let y = (sn * cw + cn * sw * ci) * x_orb + (-sn * sw + cn * cw * ci) * y_orb;
    let z = si * sw * x_orb + si * cw * y_orb;

    let lon = y.atan2(x);
    let lat = (z / r).asin();

    let jupiter = (34.35 + 3034.9057 * t) * DEG_TO_RAD;
    let saturn = (50.08 + 1222.1138 * t) * DEG_TO_RAD;
    let uranus = (314.055 + 429.8640 * t) * DEG_TO_RAD;
    let perturbation = 0.12 * (lon - jupiter).sin()
        + 0.35 * (lon - saturn).sin()
        + 0.08 * (2.0 * (lon - saturn)).sin()
        + 0.18 * (lon - uranus).sin();

    (normalize_radians(lon + perturbation * DEG_TO_RAD), lat, r)
}
