//! Projection of planetary positions onto the Earth's surface.

pub mod aspects;
pub mod local_space;
pub mod parans;
pub mod projector;
mod types;

pub use aspects::{aspect_lines, AspectKind, AspectLine};
pub use local_space::{check_ray_sampling, local_space_rays, LocalSpaceRay, MAX_RAY_DISTANCE_KM, MAX_RAY_STEPS};
pub use parans::{all_parans, Paran};
pub use projector::{
    anti_culmination_longitude, culmination_longitude, horizon_latitude, is_all_latitudes_horizon, is_rising,
    LineProjector,
};
pub use types::{Angle, Line, LineType, PlanetLines};

use crate::ephemeris::{Body, EphemerisEngine, EpochContext};
use crate::time::{gmst_from_utc, utc_to_tt};
use log::debug;
use serde::{Deserialize, Serialize};

/// What to include in a bulk line computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineOptions {
    pub longitude_step_deg: f64,
    pub bodies: Vec<Body>,
    pub include_aspect_lines: bool,
    pub include_parans: bool,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            longitude_step_deg: 1.0,
            bodies: Body::ALL.to_vec(),
            include_aspect_lines: false,
            include_parans: false,
        }
    }
}

/// Every line for one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSet {
    /// UTC Julian Date of the instant
    pub julian_date: f64,
    /// Greenwich Mean Sidereal Time, radians
    pub gmst: f64,
    pub planets: Vec<PlanetLines>,
    #[serde(default)]
    pub aspect_lines: Vec<AspectLine>,
    #[serde(default)]
    pub parans: Vec<Paran>,
}

impl LineSet {
    /// The four base lines of every body.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.planets.iter().flat_map(|p| p.lines())
    }

    pub fn planet(&self, body: Body) -> Option<&PlanetLines> {
        self.planets.iter().find(|p| p.position.body == body)
    }
}

/// Projects every requested body for a UTC instant.
pub fn project_all(engine: &EphemerisEngine, jd_utc: f64, options: &LineOptions) -> LineSet {
    let gmst = gmst_from_utc(jd_utc);
    let ctx = EpochContext::new(utc_to_tt(jd_utc));
    let projector = LineProjector::new(gmst, options.longitude_step_deg);

    let positions: Vec<_> = options.bodies.iter().map(|&b| engine.position_in(b, &ctx)).collect();
    let planets: Vec<PlanetLines> = positions.iter().map(|p| projector.project(p)).collect();

    let aspect_lines = if options.include_aspect_lines {
        positions
            .iter()
            .flat_map(|p| aspect_lines(&projector, p, ctx.obliquity))
            .collect()
    } else {
        Vec::new()
    };
    let parans = if options.include_parans {
        all_parans(&positions, gmst)
    } else {
        Vec::new()
    };

    debug!(
        "projected {} bodies at JD {jd_utc:.5} ({} aspect lines, {} parans)",
        planets.len(),
        aspect_lines.len(),
        parans.len()
    );

    LineSet {
        julian_date: jd_utc,
        gmst,
        planets,
        aspect_lines,
        parans,
    }
}
