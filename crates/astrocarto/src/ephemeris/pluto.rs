//! Heliocentric Pluto from the Meeus ch. 37 periodic series (valid 1885–2099).

use crate::geo::{normalize_radians, DEG_TO_RAD};
use crate::time::centuries_since_j2000;

/// (J, S, P multiples, longitude sin, longitude cos, latitude sin, latitude cos), 1e-6 degrees.
#[rustfmt::skip]
const TERMS: &[(i8, i8, i8, f64, f64, f64, f64)] = &[
    (0, 0, 1, -19799805.0, 19850055.0, -5452852.0, -14974862.0),
    (0, 0, 2, 897144.0, -4954829.0, 3527812.0, 1672790.0),
    (0, 0, 3, 611149.0, 1211027.0, -1050748.0, 327647.0),
    (0, 0, 4, -341243.0, -189585.0, 178690.0, -292153.0),
    (0, 0, 5, 129027.0, -34863.0, 18650.0, 100340.0),
    (0, 0, 6, -38215.0, 31061.0, -30594.0, -25823.0),
    (0, 1, -1, 20349.0, -9886.0, 4965.0, 11263.0),
    (0, 1, 0, -4045.0, -4904.0, 310.0, -132.0),
    (0, 1, 1, -5885.0, -3238.0, 2036.0, -947.0),
    (0, 1, 2, -3812.0, 3011.0, -2.0, -674.0),
    (0, 1, 3, -601.0, 3468.0, -329.0, -563.0),
    (0, 2, -2, 1237.0, 463.0, -64.0, 39.0),
    (0, 2, -1, 1086.0, -911.0, -94.0, 210.0),
    (0, 2, 0, 595.0, -1229.0, -8.0, -160.0),
    (1, -1, 0, 2484.0, -485.0, -177.0, 259.0),
    (1, -1, 1, 839.0, -1414.0, 17.0, 234.0),
    (1, 0, -3, -964.0, 1059.0, 582.0, -285.0),
    (1, 0, -2, -2303.0, -1038.0, -298.0, 692.0),
    (1, 0, -1, 7049.0, 747.0, 157.0, 201.0),
    (1, 0, 0, 1179.0, -358.0, 304.0, 825.0),
    (1, 0, 1, 393.0, -63.0, -124.0, -29.0),
    (1, 0, 2, 111.0, -268.0, 15.0, 8.0),
    (1, 0, 3, -52.0, -154.0, 7.0, 15.0),
    (1, 0, 4, -78.0, -30.0, 2.0, 2.0),
    (1, 1, -3, -34.0, -26.0, 4.0, 2.0),
    (1, 1, -2, -43.0, 1.0, 3.0, 0.0),
    (1, 1, -1, -15.0, 21.0, 1.0, -1.0),
    (1, 1, 0, -1.0, 15.0, 0.0, -2.0),
    (1, 1, 1, 4.0, 7.0, 1.0, 0.0),
    (1, 1, 3, 1.0, 5.0, 1.0, -1.0),
    (2, 0, -6, 8.0, 3.0, -2.0, -3.0),
    (2, 0, -5, -3.0, 6.0, 1.0, 2.0),
    (2, 0, -4, 6.0, -13.0, -8.0, 2.0),
    (2, 0, -3, 10.0, 22.0, 10.0, -7.0),
    (2, 0, -2, -57.0, -32.0, 0.0, 21.0),
    (2, 0, -1, 157.0, -46.0, 8.0, 5.0),
    (2, 0, 0, 12.0, -18.0, 13.0, 16.0),
    (2, 0, 1, -4.0, 8.0, -2.0, -3.0),
    (2, 0, 2, -5.0, 0.0, 0.0, 0.0),
    (2, 0, 3, 3.0, 4.0, 0.0, 1.0),
    (3, 0, -2, -1.0, -1.0, 0.0, 1.0),
    (3, 0, -1, 6.0, -3.0, 0.0, 0.0),
    (3, 0, 0, -1.0, -2.0, 0.0, 1.0),
];

const SEMI_MAJOR_AXIS_AU: f64 = 39.482;
const ECCENTRICITY: f64 = 0.2488;
const PERIHELION_LONGITUDE_DEG: f64 = 224.07;

/// Heliocentric ecliptic (longitude rad, latitude rad, distance AU), J2000 ecliptic.
///
/// The series gives no usable radius, so distance comes from the osculating
/// ellipse evaluated at the series longitude.
pub fn pluto_heliocentric(jde: f64) -> (f64, f64, f64) {
    let t = centuries_since_j2000(jde);
    let j = (34.35 + 3034.9057 * t) * DEG_TO_RAD;
    let s = (50.08 + 1222.1138 * t) * DEG_TO_RAD;
    let p = (238.96 + 144.9600 * t) * DEG_TO_RAD;

    let (mut lon_sum, mut lat_sum) = (0.0, 0.0);
    for &(jm, sm, pm, lon_sin, lon_cos, lat_sin, lat_cos) in TERMS {
        let arg = jm as f64 * j + sm as f64 * s + pm as f64 * p;
        let (sin, cos) = arg.sin_cos();
        lon_sum += lon_sin * sin + lon_cos * cos;
        lat_sum += lat_sin * sin + lat_cos * cos;
    }

    let lon_deg = 238.958116 + 144.96 * t + lon_sum / 1e6;
    let lat_deg = -3.908239 + lat_sum / 1e6;

    let anomaly = (lon_deg - PERIHELION_LONGITUDE_DEG) * DEG_TO_RAD;
    let r = SEMI_MAJOR_AXIS_AU * (1.0 - ECCENTRICITY * ECCENTRICITY) / (1.0 + ECCENTRICITY * anomaly.cos());

    (normalize_radians(lon_deg * DEG_TO_RAD), lat_deg * DEG_TO_RAD, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::RAD_TO_DEG;

    #[test]
    fn test_meeus_example_37a() {
        // 1992 October 13.0 TD: l = 232.74009°, b = 14.58782°, r = 29.711111 AU
        let (l, b, r) = pluto_heliocentric(2448908.5);
        assert!((l * RAD_TO_DEG - 232.74009).abs() < 0.01);
        assert!((b * RAD_TO_DEG - 14.58782).abs() < 0.01);
        assert!((r - 29.711111).abs() < 0.1);
    }
}
