//! Obliquity, nutation, annual aberration and the ecliptic→equatorial rotation.

use crate::geo::{normalize_radians, DEG_TO_RAD};
use crate::time::centuries_since_j2000;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const ARCSEC_TO_RAD: f64 = PI / 648_000.0;
const ABERRATION_CONSTANT: f64 = 20.49552 * ARCSEC_TO_RAD;

/// Mean obliquity of the ecliptic (IAU 2006), radians.
pub fn mean_obliquity(jde: f64) -> f64 {
    let t = centuries_since_j2000(jde);
    let arcsec = 84381.406 - 46.836769 * t - 0.0001831 * t.powi(2) + 0.00200340 * t.powi(3)
        - 0.000000576 * t.powi(4)
        - 0.0000000434 * t.powi(5);
    arcsec * ARCSEC_TO_RAD
}

/// Nutation in longitude and obliquity, radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutation {
    pub delta_psi: f64,
    pub delta_epsilon: f64,
}

/// Multiples of (l, l', F, D, Ω), then Δψ sin coefficient and its rate, Δε cos
/// coefficient and its rate, in units of 0.0001".
#[rustfmt::skip]
const NUTATION_TERMS: &[([f64; 5], f64, f64, f64, f64)] = &[
    ([0.0, 0.0, 0.0, 0.0, 1.0], -171996.0, -174.2, 92025.0, 8.9),
    ([0.0, 0.0, 2.0, -2.0, 2.0], -13187.0, -1.6, 5736.0, -3.1),
    ([0.0, 0.0, 2.0, 0.0, 2.0], -2274.0, -0.2, 977.0, -0.5),
    ([0.0, 0.0, 0.0, 0.0, 2.0], 2062.0, 0.2, -895.0, 0.5),
    ([0.0, 1.0, 0.0, 0.0, 0.0], 1426.0, -3.4, 54.0, -0.1),
    ([1.0, 0.0, 0.0, 0.0, 0.0], 712.0, 0.1, -7.0, 0.0),
    ([0.0, 1.0, 2.0, -2.0, 2.0], -517.0, 1.2, 224.0, -0.6),
    ([0.0, 0.0, 2.0, 0.0, 1.0], -386.0, -0.4, 200.0, 0.0),
    ([1.0, 0.0, 2.0, 0.0, 2.0], -301.0, 0.0, 129.0, -0.1),
    ([0.0, -1.0, 2.0, -2.0, 2.0], 217.0, -0.5, -95.0, 0.3),
    ([1.0, 0.0, 0.0, -2.0, 0.0], -158.0, 0.0, -1.0, 0.0),
    ([0.0, 0.0, 2.0, -2.0, 1.0], 129.0, 0.1, -70.0, 0.0),
    ([-1.0, 0.0, 2.0, 0.0, 2.0], 123.0, 0.0, -53.0, 0.0),
];

fn arcsec_polynomial(coefs: [f64; 5], t: f64) -> f64 {
    let value = coefs[0] + coefs[1] * t + coefs[2] * t.powi(2) + coefs[3] * t.powi(3) + coefs[4] * t.powi(4);
    normalize_radians(value * ARCSEC_TO_RAD)
}

pub fn nutation(jde: f64) -> Nutation {
    let t = centuries_since_j2000(jde);
    let args = [
        arcsec_polynomial([485868.249036, 1717915923.2178, 31.8792, 0.051635, -0.00024470], t),
        arcsec_polynomial([1287104.79305, 129596581.0481, -0.5532, 0.000136, -0.00001149], t),
        arcsec_polynomial([335779.526232, 1739527262.8478, -12.7512, -0.001037, 0.00000417], t),
        arcsec_polynomial([1072260.70369, 1602961601.2090, -6.3706, 0.006593, -0.00003169], t),
        arcsec_polynomial([450160.398036, -6962890.5431, 7.4722, 0.007702, -0.00005939], t),
    ];

    let (mut psi, mut eps) = (0.0, 0.0);
    for (mult, s, st, c, ct) in NUTATION_TERMS {
        let arg: f64 = mult.iter().zip(args.iter()).map(|(k, a)| k * a).sum();
        psi += (s + st * t) * arg.sin();
        eps += (c + ct * t) * arg.cos();
    }

    Nutation {
        delta_psi: psi * 1e-4 * ARCSEC_TO_RAD,
        delta_epsilon: eps * 1e-4 * ARCSEC_TO_RAD,
    }
}

/// Mean obliquity plus nutation in obliquity.
pub fn true_obliquity(jde: f64, nutation: &Nutation) -> f64 {
    mean_obliquity(jde) + nutation.delta_epsilon
}

/// Ecliptic (λ, β) to equatorial (α, δ), radians.
///
/// Written without tan β so it stays finite at the ecliptic poles.
pub fn ecliptic_to_equatorial(lon: f64, lat: f64, obliquity: f64) -> (f64, f64) {
    let (sl, cl) = lon.sin_cos();
    let (sb, cb) = lat.sin_cos();
    let (se, ce) = obliquity.sin_cos();

    let y = sl * ce * cb - sb * se;
    let x = cl * cb;
    let ra = normalize_radians(y.atan2(x));
    let dec = (sb * ce + cb * se * sl).clamp(-1.0, 1.0).asin();
    (ra, dec)
}

/// Annual aberration (Δα, Δδ) in radians, including the e-terms.
pub fn aberration(ra: f64, dec: f64, jde: f64, obliquity: f64) -> (f64, f64) {
    let t = centuries_since_j2000(jde);

    let l0 = (280.46646 + 36000.76983 * t + 0.0003032 * t * t) * DEG_TO_RAD;
    let m = (357.52911 + 35999.05029 * t - 0.0001537 * t * t) * DEG_TO_RAD;
    let e = 0.016708634 - 0.000042037 * t - 0.0000001267 * t * t;
    let center = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();
    let sun = l0 + center * DEG_TO_RAD;
    let perihelion = (102.93735 + 1.71946 * t + 0.00046 * t * t) * DEG_TO_RAD;

    let (ss, cs) = sun.sin_cos();
    let (sp, cp) = perihelion.sin_cos();
    let (sa, ca) = ra.sin_cos();
    let (se, ce) = obliquity.sin_cos();
    let cos_dec = dec.cos().max(1e-12);
    let tan_dec = dec.tan();
    let k = ABERRATION_CONSTANT;

    let d_ra = -k * (ca * cs * ce + sa * ss) / cos_dec + e * k * (ca * cp * ce + sa * sp) / cos_dec;
    let d_dec = -k * (cs * ce * (tan_dec * ce - sa * se) + ca * ss * se)
        + e * k * (cp * ce * (tan_dec * ce - sa * se) + ca * sp * se);
    (d_ra, d_dec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::RAD_TO_DEG;
    use crate::time::J2000_EPOCH;

    #[test]
    fn test_obliquity_j2000() {
        assert!((mean_obliquity(J2000_EPOCH) * RAD_TO_DEG - 23.4392794).abs() < 1e-6);
        assert!(mean_obliquity(J2000_EPOCH + 36525.0) < mean_obliquity(J2000_EPOCH));
    }

    #[test]
    fn test_nutation_meeus_example_22a() {
        // 1987 April 10, 0h TD: Δψ = -3.788", Δε = +9.443"
        let n = nutation(2446895.5);
        assert!((n.delta_psi / ARCSEC_TO_RAD + 3.788).abs() < 0.5);
        assert!((n.delta_epsilon / ARCSEC_TO_RAD - 9.443).abs() < 0.5);
    }

    #[test]
    fn test_equinox_and_solstice() {
        let eps = 23.44 * DEG_TO_RAD;
        let (ra, dec) = ecliptic_to_equatorial(0.0, 0.0, eps);
        assert!(ra.abs() < 1e-12 && dec.abs() < 1e-12);
        let (ra, dec) = ecliptic_to_equatorial(PI / 2.0, 0.0, eps);
        assert!((ra - PI / 2.0).abs() < 1e-12);
        assert!((dec - eps).abs() < 1e-12);
    }

    #[test]
    fn test_aberration_magnitude() {
        let eps = 23.44 * DEG_TO_RAD;
        let (d_ra, d_dec) = aberration(1.0, 0.3, J2000_EPOCH, eps);
        // never more than ~21" away from the mean place at moderate declination
        assert!(d_ra.abs() < 25.0 * ARCSEC_TO_RAD / 0.3_f64.cos());
        assert!(d_dec.abs() < 25.0 * ARCSEC_TO_RAD);
    }
}
