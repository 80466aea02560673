//! Lunar position from the truncated ELP-2000/82 series (Meeus ch. 47).

use crate::geo::{normalize_radians, DEG_TO_RAD};
use crate::time::centuries_since_j2000;

/// One periodic term: multiples of D, M, M', F and an amplitude in 1e-6 degrees.
struct MoonTerm {
    d: i8,
    m: i8,
    mp: i8,
    f: i8,
    coef: f64,
}

const LONGITUDE_TERMS: &[MoonTerm] = &[
    MoonTerm { d: 0, m: 0, mp: 1, f: 0, coef: 6288774.0 },
    MoonTerm { d: 2, m: 0, mp: -1, f: 0, coef: 1274027.0 },
    MoonTerm { d: 2, m: 0, mp: 0, f: 0, coef: 658314.0 },
    MoonTerm { d: 0, m: 0, mp: 2, f: 0, coef: 213618.0 },
    MoonTerm { d: 0, m: 1, mp: 0, f: 0, coef: -185116.0 },
    MoonTerm { d: 0, m: 0, mp: 0, f: 2, coef: -114332.0 },
    MoonTerm { d: 2, m: 0, mp: -2, f: 0, coef: 58793.0 },
    MoonTerm { d: 2, m: -1, mp: -1, f: 0, coef: 57066.0 },
    MoonTerm { d: 2, m: 0, mp: 1, f: 0, coef: 53322.0 },
    MoonTerm { d: 2, m: -1, mp: 0, f: 0, coef: 45758.0 },
    MoonTerm { d: 0, m: 1, mp: -1, f: 0, coef: -40923.0 },
    MoonTerm { d: 1, m: 0, mp: 0, f: 0, coef: -34720.0 },
    MoonTerm { d: 0, m: 1, mp: 1, f: 0, coef: -30383.0 },
    MoonTerm { d: 2, m: 0, mp: 0, f: -2, coef: 15327.0 },
    MoonTerm { d: 0, m: 0, mp: 1, f: 2, coef: -12528.0 },
    MoonTerm { d: 0, m: 0, mp: 1, f: -2, coef: 10980.0 },
    MoonTerm { d: 4, m: 0, mp: -1, f: 0, coef: 10675.0 },
    MoonTerm { d: 0, m: 0, mp: 3, f: 0, coef: 10034.0 },
    MoonTerm { d: 4, m: 0, mp: -2, f: 0, coef: 8548.0 },
    MoonTerm { d: 2, m: 1, mp: -1, f: 0, coef: -7888.0 },
    MoonTerm { d: 2, m: 1, mp: 0, f: 0, coef: -6766.0 },
    MoonTerm { d: 1, m: 0, mp: -1, f: 0, coef: -5163.0 },
    MoonTerm { d: 1, m: 1, mp: 0, f: 0, coef: 4987.0 },
    MoonTerm { d: 2, m: -1, mp: 1, f: 0, coef: 4036.0 },
    MoonTerm { d: 2, m: 0, mp: 2, f: 0, coef: 3994.0 },
    MoonTerm { d: 4, m: 0, mp: 0, f: 0, coef: 3861.0 },
    MoonTerm { d: 2, m: 0, mp: -3, f: 0, coef: 3665.0 },
    MoonTerm { d: 0, m: 1, mp: -2, f: 0, coef: -2689.0 },
    MoonTerm { d: 2, m: 0, mp: -1, f: 2, coef: -2602.0 },
    MoonTerm { d: 2, m: -1, mp: -2, f: 0, coef: 2390.0 },
    MoonTerm { d: 1, m: 0, mp: 1, f: 0, coef: -2348.0 },
    MoonTerm { d: 2, m: -2, mp: 0, f: 0, coef: 2236.0 },
    MoonTerm { d: 0, m: 1, mp: 2, f: 0, coef: -2120.0 },
    MoonTerm { d: 0, m: 2, mp: 0, f: 0, coef: -2069.0 },
    MoonTerm { d: 2, m: -2, mp: -1, f: 0, coef: 2048.0 },
    MoonTerm { d: 2, m: 0, mp: 1, f: -2, coef: -1773.0 },
    MoonTerm { d: 2, m: 0, mp: 0, f: 2, coef: -1595.0 },
    MoonTerm { d: 4, m: -1, mp: -1, f: 0, coef: 1215.0 },
    MoonTerm { d: 0, m: 0, mp: 2, f: 2, coef: -1110.0 },
    MoonTerm { d: 3, m: 0, mp: -1, f: 0, coef: -892.0 },
    MoonTerm { d: 2, m: 1, mp: 1, f: 0, coef: -810.0 },
    MoonTerm { d: 4, m: -1, mp: -2, f: 0, coef: 759.0 },
    MoonTerm { d: 0, m: 2, mp: -1, f: 0, coef: -713.0 },
    MoonTerm { d: 2, m: 2, mp: -1, f: 0, coef: -700.0 },
    MoonTerm { d: 2, m: 1, mp: -2, f: 0, coef: 691.0 },
    MoonTerm { d: 2, m: -1, mp: 0, f: -2, coef: 596.0 },
    MoonTerm { d: 4, m: 0, mp: 1, f: 0, coef: 549.0 },
    MoonTerm { d: 0, m: 0, mp: 4, f: 0, coef: 537.0 },
    MoonTerm { d: 4, m: -1, mp: 0, f: 0, coef: 520.0 },
    MoonTerm { d: 1, m: 0, mp: -2, f: 0, coef: -487.0 },
    MoonTerm { d: 2, m: 1, mp: 0, f: -2, coef: -399.0 },
    MoonTerm { d: 0, m: 0, mp: 2, f: -2, coef: -381.0 },
    MoonTerm { d: 1, m: 1, mp: 1, f: 0, coef: 351.0 },
    MoonTerm { d: 3, m: 0, mp: -2, f: 0, coef: -340.0 },
    MoonTerm { d: 4, m: 0, mp: -3, f: 0, coef: 330.0 },
    MoonTerm { d: 2, m: -1, mp: 2, f: 0, coef: 327.0 },
    MoonTerm { d: 0, m: 2, mp: 1, f: 0, coef: -323.0 },
    MoonTerm { d: 1, m: 1, mp: -1, f: 0, coef: 299.0 },
    MoonTerm { d: 2, m: 0, mp: 3, f: 0, coef: 294.0 },
];

const LATITUDE_TERMS: &[MoonTerm] = &[
    MoonTerm { d: 0, m: 0, mp: 0, f: 1, coef: 5128122.0 },
    MoonTerm { d: 0, m: 0, mp: 1, f: 1, coef: 280602.0 },
    MoonTerm { d: 0, m: 0, mp: 1, f: -1, coef: 277693.0 },
    MoonTerm { d: 2, m: 0, mp: 0, f: -1, coef: 173237.0 },
    MoonTerm { d: 2, m: 0, mp: -1, f: 1, coef: 55413.0 },
    MoonTerm { d: 2, m: 0, mp: -1, f: -1, coef: 46271.0 },
    MoonTerm { d: 2, m: 0, mp: 0, f: 1, coef: 32573.0 },
    MoonTerm { d: 0, m: 0, mp: 2, f: 1, coef: 17198.0 },
    MoonTerm { d: 2, m: 0, mp: 1, f: -1, coef: 9266.0 },
    MoonTerm { d: 0, m: 0, mp: 2, f: -1, coef: 8822.0 },
    MoonTerm { d: 2, m: -1, mp: 0, f: -1, coef: 8216.0 },
    MoonTerm { d: 2, m: 0, mp: -2, f: -1, coef: 4324.0 },
    MoonTerm { d: 2, m: 0, mp: 1, f: 1, coef: 4200.0 },
    MoonTerm { d: 2, m: 1, mp: 0, f: -1, coef: -3359.0 },
    MoonTerm { d: 2, m: -1, mp: -1, f: 1, coef: 2463.0 },
    MoonTerm { d: 2, m: -1, mp: 0, f: 1, coef: 2211.0 },
    MoonTerm { d: 2, m: -1, mp: -1, f: -1, coef: 2065.0 },
    MoonTerm { d: 0, m: 1, mp: -1, f: -1, coef: -1870.0 },
    MoonTerm { d: 4, m: 0, mp: -1, f: -1, coef: 1828.0 },
    MoonTerm { d: 0, m: 1, mp: 0, f: 1, coef: -1794.0 },
    MoonTerm { d: 0, m: 0, mp: 0, f: 3, coef: -1749.0 },
    MoonTerm { d: 0, m: 1, mp: -1, f: 1, coef: -1565.0 },
    MoonTerm { d: 1, m: 0, mp: 0, f: 1, coef: -1491.0 },
    MoonTerm { d: 0, m: 1, mp: 1, f: 1, coef: -1475.0 },
    MoonTerm { d: 0, m: 1, mp: 1, f: -1, coef: -1410.0 },
    MoonTerm { d: 0, m: 1, mp: 0, f: -1, coef: -1344.0 },
    MoonTerm { d: 1, m: 0, mp: 0, f: -1, coef: -1335.0 },
    MoonTerm { d: 0, m: 0, mp: 3, f: 1, coef: 1107.0 },
    MoonTerm { d: 4, m: 0, mp: 0, f: -1, coef: 1021.0 },
    MoonTerm { d: 4, m: 0, mp: -1, f: 1, coef: 833.0 },
    MoonTerm { d: 0, m: 0, mp: 1, f: -3, coef: 777.0 },
    MoonTerm { d: 4, m: 0, mp: -2, f: 1, coef: 671.0 },
    MoonTerm { d: 2, m: 0, mp: 0, f: -3, coef: 607.0 },
    MoonTerm { d: 2, m: 0, mp: 2, f: -1, coef: 596.0 },
    MoonTerm { d: 2, m: -1, mp: 1, f: -1, coef: 491.0 },
    MoonTerm { d: 2, m: 0, mp: -2, f: 1, coef: -451.0 },
    MoonTerm { d: 0, m: 0, mp: 3, f: -1, coef: 439.0 },
    MoonTerm { d: 2, m: 0, mp: 2, f: 1, coef: 422.0 },
    MoonTerm { d: 2, m: 0, mp: -3, f: -1, coef: 421.0 },
    MoonTerm { d: 2, m: 1, mp: -1, f: 1, coef: -366.0 },
    MoonTerm { d: 2, m: 1, mp: 0, f: 1, coef: -351.0 },
    MoonTerm { d: 4, m: 0, mp: 0, f: 1, coef: 331.0 },
    MoonTerm { d: 2, m: -1, mp: 1, f: 1, coef: 315.0 },
    MoonTerm { d: 2, m: -2, mp: 0, f: -1, coef: 302.0 },
    MoonTerm { d: 0, m: 0, mp: 1, f: 3, coef: -283.0 },
    MoonTerm { d: 2, m: 1, mp: 1, f: -1, coef: -229.0 },
    MoonTerm { d: 1, m: 1, mp: 0, f: -1, coef: 223.0 },
    MoonTerm { d: 1, m: 1, mp: 0, f: 1, coef: 223.0 },
    MoonTerm { d: 0, m: 1, mp: -2, f: -1, coef: -220.0 },
    MoonTerm { d: 2, m: 1, mp: -1, f: -1, coef: -220.0 },
    MoonTerm { d: 1, m: 0, mp: 1, f: 1, coef: -185.0 },
    MoonTerm { d: 2, m: -1, mp: -2, f: -1, coef: 181.0 },
    MoonTerm { d: 0, m: 1, mp: 2, f: 1, coef: -177.0 },
    MoonTerm { d: 4, m: 0, mp: -2, f: -1, coef: 176.0 },
    MoonTerm { d: 4, m: -1, mp: -1, f: -1, coef: 166.0 },
    MoonTerm { d: 1, m: 0, mp: 1, f: -1, coef: -164.0 },
    MoonTerm { d: 4, m: 0, mp: 1, f: -1, coef: 132.0 },
    MoonTerm { d: 1, m: 0, mp: -1, f: -1, coef: -119.0 },
    MoonTerm { d: 4, m: -1, mp: 0, f: -1, coef: 115.0 },
    MoonTerm { d: 2, m: -2, mp: 0, f: 1, coef: 107.0 },
];

/// Mean lunar arguments in degrees, shared with the true-node model.
pub(crate) struct LunarArguments {
    pub l_prime: f64,
    pub d: f64,
    pub m: f64,
    pub m_prime: f64,
    pub f: f64,
}

impl LunarArguments {
    pub(crate) fn at(t: f64) -> Self {
        let (t2, t3, t4) = (t * t, t * t * t, t * t * t * t);
        Self {
            l_prime: 218.3164477 + 481267.88123421 * t - 0.0015786 * t2 + t3 / 538_841.0
                - t4 / 65_194_000.0,
            d: 297.8501921 + 445267.1114034 * t - 0.0018819 * t2 + t3 / 545_868.0
                - t4 / 113_065_000.0,
            m: 357.5291092 + 35999.0502909 * t - 0.0001536 * t2 + t3 / 24_490_000.0,
            m_prime: 134.9633964 + 477198.8675055 * t + 0.0087414 * t2 + t3 / 69_699.0
                - t4 / 14_712_000.0,
            f: 93.2720950 + 483202.0175233 * t - 0.0036539 * t2 - t3 / 3_526_000.0
                + t4 / 863_310_000.0,
        }
    }
}

fn sum_terms(terms: &[MoonTerm], args: &LunarArguments, e: f64) -> f64 {
    let (d, m, mp, f) = (
        args.d * DEG_TO_RAD,
        args.m * DEG_TO_RAD,
        args.m_prime * DEG_TO_RAD,
        args.f * DEG_TO_RAD,
    );
    terms
        .iter()
        .map(|term| {
            let arg = term.d as f64 * d + term.m as f64 * m + term.mp as f64 * mp + term.f as f64 * f;
            // terms in M are scaled by the decreasing eccentricity of Earth's orbit
            let scale = match term.m.abs() {
                1 => e,
                2 => e * e,
                _ => 1.0,
            };
            term.coef * scale * arg.sin()
        })
        .sum()
}

/// Geocentric ecliptic (longitude, latitude) of the Moon in radians, mean equinox of date.
pub fn moon_position(jde: f64) -> (f64, f64) {
    let t = centuries_since_j2000(jde);
    let args = LunarArguments::at(t);

    let a1 = (119.75 + 131.849 * t) * DEG_TO_RAD;
    let a2 = (53.09 + 479264.290 * t) * DEG_TO_RAD;
    let a3 = (313.45 + 481266.484 * t) * DEG_TO_RAD;
    let e = 1.0 - 0.002516 * t - 0.0000074 * t * t;

    let l_prime = args.l_prime * DEG_TO_RAD;
    let m_prime = args.m_prime * DEG_TO_RAD;
    let f = args.f * DEG_TO_RAD;

    let sum_l = sum_terms(LONGITUDE_TERMS, &args, e)
        + 3958.0 * a1.sin()
        + 1962.0 * (l_prime - f).sin()
        + 318.0 * a2.sin();

    let sum_b = sum_terms(LATITUDE_TERMS, &args, e) - 2235.0 * l_prime.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (l_prime - m_prime).sin()
        - 115.0 * (l_prime + m_prime).sin();

    let lon = (args.l_prime + sum_l / 1e6) * DEG_TO_RAD;
    let lat = (sum_b / 1e6) * DEG_TO_RAD;
    (normalize_radians(lon), lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::RAD_TO_DEG;

    #[test]
    fn test_meeus_example_47a() {
        // 1992 April 12, 0h TD: λ = 133.162655°, β = -3.229126°
        let (lon, lat) = moon_position(2448724.5);
        assert!((lon * RAD_TO_DEG - 133.162655).abs() < 0.01);
        assert!((lat * RAD_TO_DEG + 3.229126).abs() < 0.01);
    }
}
