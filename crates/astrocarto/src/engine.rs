//! Entry points for host applications.
//!
//! [`AstroEngine`] bundles the ephemeris with the offline timezone resolver
//! and exposes every calculation as a call over plain values. Civil times
//! given with a location are local wall-clock times at that location.

use crate::chart::{natal_chart, ChartEpoch, ChartSettings, NatalChart, RelocationResult};
use crate::ephemeris::{Body, EphemerisEngine, EpochContext, PlanetaryPosition};
use crate::error::{AstroError, Result};
use crate::geo::GeoPoint;
use crate::lines::{check_ray_sampling, local_space_rays, project_all, LineOptions, LineSet, LocalSpaceRay};
use crate::scout::{
    rank_cities_by_category, run_scout_task, CancellationToken, City, CityRanking, GridScorer, LifeCategory,
    ScoringConfig, ScoutConfig, ScoutLines, ScoutResult, SortMode,
};
use crate::time::{gmst_from_utc, utc_to_tt, CivilDateTime};
use crate::timezone::TimezoneResolver;
use log::debug;

/// Smallest accepted sweep step, degrees.
const MIN_LONGITUDE_STEP: f64 = 0.01;

fn check_positive(field: &'static str, value: f64, min: f64) -> Result<()> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(AstroError::InvalidParameter { field, value })
    }
}

fn check_longitude_step(step: f64) -> Result<()> {
    if step > 90.0 {
        return Err(AstroError::InvalidParameter {
            field: "longitude_step_deg",
            value: step,
        });
    }
    check_positive("longitude_step_deg", step, MIN_LONGITUDE_STEP)
}

pub struct AstroEngine {
    ephemeris: EphemerisEngine,
    timezones: TimezoneResolver,
}

impl AstroEngine {
    pub fn new() -> Self {
        Self {
            ephemeris: EphemerisEngine::new(),
            timezones: TimezoneResolver::new(),
        }
    }

    pub fn ephemeris(&self) -> &EphemerisEngine {
        &self.ephemeris
    }

    pub fn timezones(&self) -> &TimezoneResolver {
        &self.timezones
    }

    /// UTC Julian Date of a local civil time at `location`.
    pub fn local_to_utc_julian_date(&self, location: GeoPoint, local: &CivilDateTime) -> f64 {
        self.timezones.local_to_utc_julian_date(location.lat, location.lng, local)
    }

    /// Apparent position of `body` at a Terrestrial Time Julian Date.
    pub fn calculate_planetary_position(&self, body: Body, jd_tt: f64) -> PlanetaryPosition {
        self.ephemeris.position(body, jd_tt)
    }

    /// Apparent position of `body` at a UTC Julian Date.
    pub fn calculate_planetary_position_utc(&self, body: Body, jd_utc: f64) -> PlanetaryPosition {
        self.ephemeris.position_utc(body, jd_utc)
    }

    /// Every body's lines for a UTC civil instant.
    pub fn calculate_all_lines(&self, utc: &CivilDateTime, longitude_step_deg: f64) -> Result<LineSet> {
        let options = LineOptions {
            longitude_step_deg,
            ..LineOptions::default()
        };
        self.calculate_lines_with(utc.julian_date(), &options)
    }

    /// Every body's lines for a local civil time at the birth place.
    pub fn calculate_all_lines_local(
        &self,
        birth: GeoPoint,
        local: &CivilDateTime,
        longitude_step_deg: f64,
    ) -> Result<LineSet> {
        let options = LineOptions {
            longitude_step_deg,
            ..LineOptions::default()
        };
        self.calculate_lines_with(self.local_to_utc_julian_date(birth, local), &options)
    }

    /// Lines with explicit body selection, aspect lines and parans.
    pub fn calculate_lines_with(&self, jd_utc: f64, options: &LineOptions) -> Result<LineSet> {
        check_longitude_step(options.longitude_step_deg)?;
        Ok(project_all(&self.ephemeris, jd_utc, options))
    }

    /// Local-space rays of every body from the birth place.
    pub fn calculate_local_space_lines(
        &self,
        origin: GeoPoint,
        local: &CivilDateTime,
        max_distance_km: f64,
        step_km: f64,
    ) -> Result<Vec<LocalSpaceRay>> {
        check_ray_sampling(max_distance_km, step_km)?;

        let jd_utc = self.local_to_utc_julian_date(origin, local);
        let ctx = EpochContext::new(utc_to_tt(jd_utc));
        let positions: Vec<PlanetaryPosition> = Body::ALL.iter().map(|&b| self.ephemeris.position_in(b, &ctx)).collect();
        let rays = local_space_rays(origin, &positions, gmst_from_utc(jd_utc), max_distance_km, step_km);
        debug!("{} local space rays from ({:.4}, {:.4})", rays.len(), origin.lat, origin.lng);
        Ok(rays)
    }

    /// Natal chart for a local birth time. `house_system` is parsed strictly.
    pub fn calculate_natal_chart(
        &self,
        location: GeoPoint,
        local: &CivilDateTime,
        house_system: &str,
        use_sidereal: bool,
    ) -> Result<NatalChart> {
        let settings = ChartSettings::parse(house_system, use_sidereal)?;
        Ok(natal_chart(
            &self.ephemeris,
            self.local_to_utc_julian_date(location, local),
            location,
            settings,
        ))
    }

    /// Recasts a chart at `target`, the birth time read at `original`.
    pub fn calculate_relocation_chart(
        &self,
        local: &CivilDateTime,
        original: GeoPoint,
        target: GeoPoint,
        house_system: &str,
        use_sidereal: bool,
    ) -> Result<RelocationResult> {
        let settings = ChartSettings::parse(house_system, use_sidereal)?;
        let epoch = ChartEpoch::new(&self.ephemeris, self.local_to_utc_julian_date(original, local));
        Ok(RelocationResult::from_epoch(&epoch, original, target, settings))
    }

    pub fn timezone_name(&self, lat: f64, lng: f64) -> Result<String> {
        self.timezones.timezone_name(lat, lng)
    }

    /// Offset from UTC, hours, of a local civil time at a coordinate.
    pub fn timezone_offset_hours(&self, lat: f64, lng: f64, local: &CivilDateTime) -> Result<f64> {
        let point = GeoPoint::checked(lat, lng)?;
        Ok(self.timezones.offset_hours(point.lat, point.lng, local))
    }

    /// Lines of a birth moment prepared for scouting.
    pub fn scout_lines(
        &self,
        birth: GeoPoint,
        local: &CivilDateTime,
        options: &LineOptions,
        category: Option<LifeCategory>,
    ) -> Result<ScoutLines> {
        let set = self.calculate_lines_with(self.local_to_utc_julian_date(birth, local), options)?;
        Ok(ScoutLines::from_line_set(&set, category))
    }

    /// Runs a full scout query on the calling thread.
    pub fn scout(&self, lines: ScoutLines, config: ScoutConfig, cancel: CancellationToken) -> Result<ScoutResult> {
        GridScorer::new(lines, config)?.with_cancellation(cancel).run()
    }

    /// Runs a scout query on the tokio blocking pool.
    pub async fn scout_async(
        &self,
        lines: ScoutLines,
        config: ScoutConfig,
        cancel: CancellationToken,
    ) -> Result<ScoutResult> {
        run_scout_task(lines, config, cancel).await
    }

    pub fn rank_cities(
        &self,
        cities: &[City],
        lines: &ScoutLines,
        scoring: &ScoringConfig,
        sort_mode: SortMode,
    ) -> Result<Vec<CityRanking>> {
        scoring.validate()?;
        Ok(rank_cities_by_category(cities, lines, scoring, sort_mode))
    }
}

impl Default for AstroEngine {
    fn default() -> Self {
        Self::new()
    }
}
