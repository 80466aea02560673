use super::{centuries_since_j2000, J2000_EPOCH, SECONDS_PER_DAY};
use crate::geo::{normalize_degrees, normalize_radians, DEG_TO_RAD};
use std::f64::consts::TAU;

/// Model of UT1 − UTC in seconds, fitted around 2020 and clamped to the ±0.9 s
/// band that leap seconds maintain.
pub fn dut1(jd_utc: f64) -> f64 {
    let years = (jd_utc - 2_458_849.5) / 365.25;

    let trend = -0.177 + 0.0001 * years - 0.00002 * years * years;
    let annual = 0.022 * (TAU * years).sin() + 0.012 * (TAU * years).cos();
    let semiannual = 0.006 * (2.0 * TAU * years).sin() + 0.007 * (2.0 * TAU * years).cos();
    // Chandler wobble, ~433 day period
    let chandler = 0.003 * (TAU * years / (433.0 / 365.25)).sin();

    (trend + annual + semiannual + chandler).clamp(-0.9, 0.9)
}

pub fn utc_to_ut1(jd_utc: f64) -> f64 {
    jd_utc + dut1(jd_utc) / SECONDS_PER_DAY
}

/// Greenwich Mean Sidereal Time in radians, [0, 2π), for a UT1 Julian Date.
pub fn gmst(jd_ut1: f64) -> f64 {
    let t = centuries_since_j2000(jd_ut1);
    let theta = 280.46061837 + 360.98564736629 * (jd_ut1 - J2000_EPOCH) + 0.000387933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_degrees(theta) * DEG_TO_RAD
}

/// GMST for a UTC Julian Date, applying the DUT1 model first.
pub fn gmst_from_utc(jd_utc: f64) -> f64 {
    gmst(utc_to_ut1(jd_utc))
}

/// Local Sidereal Time in radians; longitude in degrees, east positive.
pub fn lst(gmst: f64, longitude_deg: f64) -> f64 {
    normalize_radians(gmst + longitude_deg * DEG_TO_RAD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::SIDEREAL_DAY;

    #[test]
    fn test_gmst_j2000() {
        // 18h 41m 50.548s at J2000.0
        let expected = 280.46061837 * DEG_TO_RAD;
        assert!((gmst(J2000_EPOCH) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_gmst_meeus_example() {
        // Meeus example 12.b: 1987 April 10, 19h21m UT -> 128.7378734°
        let jd = 2446896.30625;
        assert!((gmst(jd) / DEG_TO_RAD - 128.7378734).abs() < 1e-4);
    }

    #[test]
    fn test_lst_wraps() {
        let l = lst(6.0, 90.0);
        assert!((0.0..TAU).contains(&l));
        assert!((l - normalize_radians(6.0 + std::f64::consts::FRAC_PI_2)).abs() < 1e-12);
    }

    #[test]
    fn test_dut1_bounded() {
        for i in 0..200 {
            let jd = 2_415_020.0 + i as f64 * 365.25;
            assert!(dut1(jd).abs() <= 0.9);
        }
        assert!(SIDEREAL_DAY < 1.0);
    }
}
