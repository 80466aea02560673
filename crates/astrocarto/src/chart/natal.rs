use super::houses::{degree_in_sign, find_house, house_cusps, lahiri_ayanamsa, shift_cusps, sign_index, sign_name, ChartAngles};
use super::settings::{ChartSettings, ZodiacFrame};
use crate::ephemeris::{Body, EphemerisEngine, EpochContext, PlanetaryPosition};
use crate::geo::{normalize_degrees, GeoPoint, RAD_TO_DEG};
use crate::time::{gmst_from_utc, lst, utc_to_tt};
use log::debug;
use serde::{Deserialize, Serialize};

/// Everything about a chart that depends only on the instant.
///
/// Casting several charts from one epoch (natal plus relocations) reuses the
/// same ephemeris evaluation, so charts for the same place are bit-identical.
#[derive(Debug, Clone)]
pub struct ChartEpoch {
    /// UTC Julian Date
    pub julian_date: f64,
    /// Greenwich Mean Sidereal Time, radians
    pub gmst: f64,
    /// True obliquity, radians
    pub obliquity: f64,
    /// Lahiri ayanamsa at this instant, degrees
    pub ayanamsa: f64,
    bodies: Vec<(PlanetaryPosition, f64)>,
}

impl ChartEpoch {
    pub fn new(engine: &EphemerisEngine, jd_utc: f64) -> Self {
        let ctx = EpochContext::new(utc_to_tt(jd_utc));
        let bodies = Body::ALL
            .iter()
            .map(|&body| (engine.position_in(body, &ctx), engine.daily_motion(body, ctx.jde)))
            .collect();
        Self {
            julian_date: jd_utc,
            gmst: gmst_from_utc(jd_utc),
            obliquity: ctx.obliquity,
            ayanamsa: lahiri_ayanamsa(jd_utc),
            bodies,
        }
    }

    /// Angles, cusps and body placements at `location`.
    pub fn cast(&self, location: GeoPoint, settings: ChartSettings) -> NatalChart {
        let system = settings.house_system;
        let local_sidereal = lst(self.gmst, location.lng);
        let armc = local_sidereal * RAD_TO_DEG;
        let obliquity = self.obliquity * RAD_TO_DEG;

        let tropical = ChartAngles::at(local_sidereal, location.lat, self.obliquity);
        let (ayanamsa, angles, cusps) = match settings.zodiac {
            ZodiacFrame::Tropical => (None, tropical, house_cusps(system, armc, location.lat, obliquity, &tropical)),
            ZodiacFrame::Sidereal => {
                let shifted = tropical.shifted(self.ayanamsa);
                // quadrant cusps are found on the sky, sign-based ones from the sidereal ascendant
                let cusps = if system.is_quadrant() {
                    shift_cusps(&house_cusps(system, armc, location.lat, obliquity, &tropical), self.ayanamsa)
                } else {
                    house_cusps(system, armc, location.lat, obliquity, &shifted)
                };
                (Some(self.ayanamsa), shifted, cusps)
            }
        };

        let offset = ayanamsa.unwrap_or(0.0);
        let bodies = self
            .bodies
            .iter()
            .map(|&(position, daily_motion)| ChartBody::place(position, daily_motion, offset, &cusps))
            .collect();

        debug!(
            "cast {system}/{} chart at ({:.4}, {:.4}): ASC {:.3} MC {:.3}",
            settings.zodiac, location.lat, location.lng, angles.ascendant, angles.midheaven
        );

        NatalChart {
            julian_date: self.julian_date,
            location,
            settings,
            ayanamsa,
            angles,
            house_cusps: cusps,
            local_sidereal_time: armc,
            obliquity,
            bodies,
        }
    }
}

/// One body placed in a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBody {
    pub position: PlanetaryPosition,
    /// Ecliptic longitude in the chart's zodiac frame, degrees
    pub longitude: f64,
    pub sign_index: u8,
    pub sign: String,
    pub degree_in_sign: f64,
    pub house: u8,
    /// Degrees per day in ecliptic longitude
    pub daily_motion: f64,
    pub retrograde: bool,
}

impl ChartBody {
    fn place(position: PlanetaryPosition, daily_motion: f64, offset: f64, cusps: &[f64; 12]) -> Self {
        let longitude = normalize_degrees(position.ecliptic_longitude - offset);
        let index = sign_index(longitude);
        Self {
            position,
            longitude,
            sign_index: index,
            sign: sign_name(index).to_string(),
            degree_in_sign: degree_in_sign(longitude),
            house: find_house(longitude, cusps),
            daily_motion,
            retrograde: daily_motion < 0.0,
        }
    }

    pub fn body(&self) -> Body {
        self.position.body
    }
}

/// A chart for one instant and place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    /// UTC Julian Date
    pub julian_date: f64,
    pub location: GeoPoint,
    pub settings: ChartSettings,
    /// Present for sidereal charts
    pub ayanamsa: Option<f64>,
    pub angles: ChartAngles,
    pub house_cusps: [f64; 12],
    /// Degrees
    pub local_sidereal_time: f64,
    /// True obliquity, degrees
    pub obliquity: f64,
    pub bodies: Vec<ChartBody>,
}

impl NatalChart {
    pub fn body(&self, body: Body) -> Option<&ChartBody> {
        self.bodies.iter().find(|b| b.body() == body)
    }

    /// House of an arbitrary longitude given in this chart's frame.
    pub fn house_of(&self, longitude: f64) -> u8 {
        find_house(longitude, &self.house_cusps)
    }
}

/// Casts a chart for a UTC Julian Date.
pub fn natal_chart(engine: &EphemerisEngine, jd_utc: f64, location: GeoPoint, settings: ChartSettings) -> NatalChart {
    ChartEpoch::new(engine, jd_utc).cast(location, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::houses::is_cyclic;
    use crate::chart::HouseSystem;
    use crate::time::J2000_EPOCH;

    #[test]
    fn sidereal_chart_is_tropical_minus_ayanamsa() {
        let epoch = ChartEpoch::new(&EphemerisEngine::new(), J2000_EPOCH);
        let here = GeoPoint::new(51.5, -0.1);
        let tropical = epoch.cast(here, ChartSettings::new(HouseSystem::Placidus, ZodiacFrame::Tropical));
        let sidereal = epoch.cast(here, ChartSettings::new(HouseSystem::Placidus, ZodiacFrame::Sidereal));

        let ayanamsa = sidereal.ayanamsa.unwrap();
        assert!(tropical.ayanamsa.is_none());
        let diff = normalize_degrees(tropical.angles.ascendant - sidereal.angles.ascendant);
        assert!((diff - ayanamsa).abs() < 1e-9);
        for (t, s) in tropical.bodies.iter().zip(&sidereal.bodies) {
            // houses are frame independent for quadrant systems
            assert_eq!(t.house, s.house, "{}", t.body());
        }
    }

    #[test]
    fn chart_has_every_body_and_ordered_cusps() {
        let chart = natal_chart(
            &EphemerisEngine::new(),
            2_447_892.5,
            GeoPoint::new(-33.87, 151.21),
            ChartSettings::new(HouseSystem::Koch, ZodiacFrame::Tropical),
        );
        assert_eq!(chart.bodies.len(), Body::ALL.len());
        assert!(is_cyclic(&chart.house_cusps));
        for b in &chart.bodies {
            assert!((1..=12).contains(&b.house));
            assert!(b.degree_in_sign >= 0.0 && b.degree_in_sign < 30.0);
        }
        assert!(!chart.body(Body::Sun).unwrap().retrograde);
    }
}
