use super::natal::{ChartEpoch, NatalChart};
use super::settings::ChartSettings;
use crate::ephemeris::{Body, EphemerisEngine};
use crate::geo::{shortest_arc, GeoPoint};
use log::debug;
use serde::{Deserialize, Serialize};

/// Signed change of each angle, degrees in (-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleShifts {
    pub ascendant: f64,
    pub midheaven: f64,
    pub descendant: f64,
    pub imum_coeli: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelocatedBody {
    pub body: Body,
    pub longitude: f64,
    pub sign: String,
    pub degree_in_sign: f64,
    pub original_house: u8,
    pub relocated_house: u8,
    pub house_changed: bool,
}

/// A natal chart recast at another place for the same instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelocationResult {
    pub original: NatalChart,
    pub relocated: NatalChart,
    pub shifts: AngleShifts,
    pub bodies: Vec<RelocatedBody>,
}

impl RelocationResult {
    pub fn from_epoch(epoch: &ChartEpoch, original: GeoPoint, target: GeoPoint, settings: ChartSettings) -> Self {
        let original = epoch.cast(original, settings);
        let relocated = epoch.cast(target, settings);

        let shifts = AngleShifts {
            ascendant: shortest_arc(original.angles.ascendant, relocated.angles.ascendant),
            midheaven: shortest_arc(original.angles.midheaven, relocated.angles.midheaven),
            descendant: shortest_arc(original.angles.descendant, relocated.angles.descendant),
            imum_coeli: shortest_arc(original.angles.imum_coeli, relocated.angles.imum_coeli),
        };

        let bodies: Vec<RelocatedBody> = original
            .bodies
            .iter()
            .zip(&relocated.bodies)
            .map(|(before, after)| RelocatedBody {
                body: before.body(),
                longitude: before.longitude,
                sign: before.sign.clone(),
                degree_in_sign: before.degree_in_sign,
                original_house: before.house,
                relocated_house: after.house,
                house_changed: before.house != after.house,
            })
            .collect();

        debug!(
            "relocated chart by ASC {:+.3} MC {:+.3}, {} bodies changed house",
            shifts.ascendant,
            shifts.midheaven,
            bodies.iter().filter(|b| b.house_changed).count()
        );

        Self {
            original,
            relocated,
            shifts,
            bodies,
        }
    }

    /// Bodies whose house differs between the two places.
    pub fn changed(&self) -> impl Iterator<Item = &RelocatedBody> {
        self.bodies.iter().filter(|b| b.house_changed)
    }
}

/// Holds the birth instant fixed and recasts the chart at `target`.
pub fn relocation_chart(
    engine: &EphemerisEngine,
    jd_utc: f64,
    original: GeoPoint,
    target: GeoPoint,
    settings: ChartSettings,
) -> RelocationResult {
    RelocationResult::from_epoch(&ChartEpoch::new(engine, jd_utc), original, target, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{HouseSystem, ZodiacFrame};

    #[test]
    fn moving_east_shifts_midheaven_east() {
        let result = relocation_chart(
            &EphemerisEngine::new(),
            2_451_545.0,
            GeoPoint::new(40.7, -74.0),
            GeoPoint::new(40.7, -64.0),
            ChartSettings::new(HouseSystem::Equal, ZodiacFrame::Tropical),
        );
        // 10° of RA near the MC maps to roughly 9..12° of ecliptic longitude
        assert!(result.shifts.midheaven > 8.0 && result.shifts.midheaven < 12.5);
        assert_eq!(result.bodies.len(), Body::ALL.len());
        assert_eq!(result.changed().count(), result.bodies.iter().filter(|b| b.house_changed).count());
    }
}
