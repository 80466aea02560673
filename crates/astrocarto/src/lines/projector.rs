//! Meridian and horizon geometry of planetary lines.

use super::types::{Angle, Line, LineType, PlanetLines};
use crate::ephemeris::{Body, PlanetaryPosition};
use crate::geo::{normalize_longitude, normalize_radians, normalize_signed_radians, GeoPoint, DEG_TO_RAD, RAD_TO_DEG};
use std::f64::consts::FRAC_PI_2;

const DEGENERATE_EPS: f64 = 1e-9;

fn radians_to_longitude(angle: f64) -> f64 {
    normalize_longitude(normalize_radians(angle) * RAD_TO_DEG)
}

/// Longitude (degrees) where the body culminates: `ra − gmst`.
pub fn culmination_longitude(ra: f64, gmst: f64) -> f64 {
    radians_to_longitude(ra - gmst)
}

/// Longitude (degrees) of lower culmination, antipodal to [`culmination_longitude`].
pub fn anti_culmination_longitude(ra: f64, gmst: f64) -> f64 {
    normalize_longitude(culmination_longitude(ra, gmst) + 180.0)
}

fn hour_angle(ra: f64, gmst: f64, longitude_deg: f64) -> f64 {
    normalize_signed_radians(gmst + longitude_deg * DEG_TO_RAD - ra)
}

/// Latitude (degrees) at which the body sits on the horizon at this longitude.
///
/// Solves `sin φ sin δ + cos φ cos δ cos H = 0`. `None` for a body on the
/// celestial equator, where the horizon locus collapses onto two meridians
/// (see [`is_all_latitudes_horizon`]).
pub fn horizon_latitude(ra: f64, dec: f64, gmst: f64, longitude_deg: f64) -> Option<f64> {
    let sin_dec = dec.sin();
    if sin_dec.abs() < DEGENERATE_EPS {
        return None;
    }
    let h = hour_angle(ra, gmst, longitude_deg);
    let tan_phi = -dec.cos() * h.cos() / sin_dec;
    Some((tan_phi.atan() * RAD_TO_DEG).clamp(-90.0, 90.0))
}

/// True when every latitude at this longitude is on the horizon.
pub fn is_all_latitudes_horizon(ra: f64, dec: f64, gmst: f64, longitude_deg: f64) -> bool {
    dec.sin().abs() < DEGENERATE_EPS && hour_angle(ra, gmst, longitude_deg).cos().abs() < DEGENERATE_EPS
}

/// Ascendant side of the horizon: the body is east of the meridian.
pub fn is_rising(ra: f64, gmst: f64, longitude_deg: f64) -> bool {
    hour_angle(ra, gmst, longitude_deg).sin() < 0.0
}

/// Longitude (degrees) where the body is on the given angle at a latitude.
/// `None` when the body never reaches the horizon there.
pub fn longitude_for_angle_at_latitude(position: &PlanetaryPosition, gmst: f64, latitude: f64, angle: Angle) -> Option<f64> {
    let ra = position.right_ascension;
    match angle {
        Angle::Mc => Some(culmination_longitude(ra, gmst)),
        Angle::Ic => Some(anti_culmination_longitude(ra, gmst)),
        Angle::Asc | Angle::Dsc => {
            let cos_h = -(latitude * DEG_TO_RAD).tan() * position.declination.tan();
            if cos_h.abs() > 1.0 {
                return None;
            }
            let h = cos_h.acos();
            let h = if angle == Angle::Asc { -h } else { h };
            Some(radians_to_longitude(ra + h - gmst))
        }
    }
}

/// Number of samples for a sweep step, at least one.
pub fn sample_count(step_deg: f64) -> usize {
    ((360.0 / step_deg).round() as usize).max(1)
}

/// Projects positions onto the globe at a fixed sidereal time.
#[derive(Debug, Clone, Copy)]
pub struct LineProjector {
    gmst: f64,
    step_deg: f64,
}

impl LineProjector {
    pub fn new(gmst: f64, step_deg: f64) -> Self {
        Self { gmst, step_deg }
    }

    pub fn gmst(&self) -> f64 {
        self.gmst
    }

    fn sweep_longitudes(&self) -> impl Iterator<Item = f64> {
        let step = self.step_deg;
        (0..sample_count(step)).map(move |i| -180.0 + i as f64 * step)
    }

    fn meridian(&self, body: Body, line_type: LineType, longitude: f64) -> Line {
        let n = sample_count(self.step_deg);
        let spacing = 180.0 / n as f64;
        let points = (0..n)
            .map(|i| GeoPoint::new(-90.0 + (i as f64 + 0.5) * spacing, longitude))
            .collect();
        Line::new(body, line_type, points)
    }

    pub fn culmination_line(&self, position: &PlanetaryPosition) -> Line {
        let lng = culmination_longitude(position.right_ascension, self.gmst);
        self.meridian(position.body, LineType::Culmination, lng)
    }

    pub fn anti_culmination_line(&self, position: &PlanetaryPosition) -> Line {
        let lng = anti_culmination_longitude(position.right_ascension, self.gmst);
        self.meridian(position.body, LineType::AntiCulmination, lng)
    }

    /// Rising (`rising = true`) or setting branch of the horizon curve.
    pub fn horizon_line(&self, position: &PlanetaryPosition, rising: bool) -> Line {
        let (ra, dec) = (position.right_ascension, position.declination);
        let line_type = if rising { LineType::Rising } else { LineType::Setting };

        if dec.sin().abs() < DEGENERATE_EPS {
            // equatorial body: rises along H = -90° and sets along H = +90°
            let h = if rising { -FRAC_PI_2 } else { FRAC_PI_2 };
            return self.meridian(position.body, line_type, radians_to_longitude(ra + h - self.gmst));
        }

        let points = self
            .sweep_longitudes()
            .filter(|&lng| is_rising(ra, self.gmst, lng) == rising)
            .filter_map(|lng| horizon_latitude(ra, dec, self.gmst, lng).map(|lat| GeoPoint::new(lat, lng)))
            .collect();
        Line::swept(position.body, line_type, points, self.step_deg)
    }

    /// Sub-body point: latitude equals declination on the culmination meridian.
    pub fn zenith_point(&self, position: &PlanetaryPosition) -> GeoPoint {
        GeoPoint::new(
            position.declination * RAD_TO_DEG,
            culmination_longitude(position.right_ascension, self.gmst),
        )
    }

    pub fn project(&self, position: &PlanetaryPosition) -> PlanetLines {
        PlanetLines {
            position: *position,
            culmination: self.culmination_line(position),
            anti_culmination: self.anti_culmination_line(position),
            rising: self.horizon_line(position, true),
            setting: self.horizon_line(position, false),
            zenith: self.zenith_point(position),
        }
    }

    /// Angle lines for a bare equatorial point, skipping empty horizon branches.
    pub(crate) fn angle_lines(&self, position: &PlanetaryPosition) -> Vec<(Angle, Line)> {
        let mut out = vec![
            (Angle::Mc, self.culmination_line(position)),
            (Angle::Ic, self.anti_culmination_line(position)),
        ];
        for (angle, rising) in [(Angle::Asc, true), (Angle::Dsc, false)] {
            let line = self.horizon_line(position, rising);
            if !line.is_empty() {
                out.push((angle, line));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(ra_deg: f64, dec_deg: f64) -> PlanetaryPosition {
        PlanetaryPosition {
            body: Body::Mars,
            right_ascension: ra_deg * DEG_TO_RAD,
            declination: dec_deg * DEG_TO_RAD,
            ecliptic_longitude: ra_deg,
            ecliptic_latitude: 0.0,
        }
    }

    #[test]
    fn test_culmination_basic() {
        assert!((culmination_longitude(1.0, 1.0)).abs() < 1e-9);
        assert!((culmination_longitude(30.0 * DEG_TO_RAD, 0.0) - 30.0).abs() < 1e-9);
        assert!((culmination_longitude(0.0, 30.0 * DEG_TO_RAD) + 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_equatorial_body_horizon_latitude() {
        assert!(horizon_latitude(0.0, 0.0, 0.0, 45.0).is_none());
        assert!(is_all_latitudes_horizon(0.0, 0.0, 0.0, 90.0));
        assert!(!is_all_latitudes_horizon(0.0, 0.0, 0.0, 45.0));
    }

    #[test]
    fn test_horizon_latitude_at_quadrature_is_equator() {
        // H = ±90° puts the horizon through the equator for any declination
        let lat = horizon_latitude(0.0, 20.0 * DEG_TO_RAD, 0.0, 90.0).unwrap();
        assert!(lat.abs() < 1e-9);
    }

    #[test]
    fn test_is_rising_east_of_meridian() {
        assert!(is_rising(0.0, 0.0, -45.0));
        assert!(!is_rising(0.0, 0.0, 45.0));
    }

    #[test]
    fn test_horizon_branches_partition_sweep() {
        let projector = LineProjector::new(1.2, 1.0);
        let p = pos(80.0, 15.0);
        let rising = projector.horizon_line(&p, true);
        let setting = projector.horizon_line(&p, false);
        assert_eq!(rising.points.len() + setting.points.len(), 360);
    }

    #[test]
    fn test_equatorial_body_horizon_is_meridian() {
        let projector = LineProjector::new(0.0, 1.0);
        let line = projector.horizon_line(&pos(0.0, 0.0), true);
        assert_eq!(line.points.len(), 360);
        assert!(line.points.iter().all(|p| (p.lng + 90.0).abs() < 1e-9));
    }

    #[test]
    fn test_longitude_for_angle_round_trip() {
        let projector = LineProjector::new(0.7, 1.0);
        let p = pos(120.0, -10.0);
        let lng = longitude_for_angle_at_latitude(&p, projector.gmst(), 30.0, Angle::Asc).unwrap();
        let lat = horizon_latitude(p.right_ascension, p.declination, projector.gmst(), lng).unwrap();
        assert!((lat - 30.0).abs() < 1e-6);
        assert!(is_rising(p.right_ascension, projector.gmst(), lng));
    }
}
