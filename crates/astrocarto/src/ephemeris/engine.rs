use super::chiron::chiron_heliocentric;
use super::corrections::{aberration, ecliptic_to_equatorial, nutation, true_obliquity, Nutation};
use super::moon::moon_position;
use super::node::true_node_position;
use super::pluto::pluto_heliocentric;
use super::types::{Body, PlanetaryPosition};
use super::vsop::{earth_heliocentric, heliocentric_to_geocentric, planet_heliocentric, Heliocentric, VsopPlanet};
use crate::error::Result;
use crate::geo::{normalize_degrees, normalize_radians, shortest_arc, RAD_TO_DEG};
use crate::time::utc_to_tt;
use std::f64::consts::FRAC_PI_2;

/// Quantities shared by every body at one instant.
#[derive(Debug, Clone, Copy)]
pub struct EpochContext {
    pub jde: f64,
    pub nutation: Nutation,
    pub obliquity: f64,
}

impl EpochContext {
    pub fn new(jde: f64) -> Self {
        let nutation = nutation(jde);
        Self {
            jde,
            nutation,
            obliquity: true_obliquity(jde, &nutation),
        }
    }
}

/// Apparent geocentric positions from analytic theories.
///
/// Stateless; build one wherever convenient.
#[derive(Debug, Clone, Copy, Default)]
pub struct EphemerisEngine;

impl EphemerisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Position at a Julian Ephemeris Date (TT).
    pub fn position(&self, body: Body, jde: f64) -> PlanetaryPosition {
        self.position_in(body, &EpochContext::new(jde))
    }

    /// Position for a UTC Julian Date, converted through UT1 to TT.
    pub fn position_utc(&self, body: Body, jd_utc: f64) -> PlanetaryPosition {
        self.position(body, utc_to_tt(jd_utc))
    }

    /// Position for a body given by name, e.g. `"mars"` or `"north_node"`.
    pub fn position_by_name(&self, name: &str, jde: f64) -> Result<PlanetaryPosition> {
        Ok(self.position(name.parse()?, jde))
    }

    /// Positions of several bodies sharing one nutation/obliquity evaluation.
    pub fn positions(&self, bodies: &[Body], jde: f64) -> Vec<PlanetaryPosition> {
        let ctx = EpochContext::new(jde);
        bodies.iter().map(|&b| self.position_in(b, &ctx)).collect()
    }

    pub fn position_in(&self, body: Body, ctx: &EpochContext) -> PlanetaryPosition {
        let (lon, lat) = geometric_ecliptic(body, ctx.jde);
        let lon = normalize_radians(lon + ctx.nutation.delta_psi);

        let (mut ra, mut dec) = ecliptic_to_equatorial(lon, lat, ctx.obliquity);
        // the Moon's aberration is already inside its mean elements
        if body != Body::Moon {
            let (d_ra, d_dec) = aberration(ra, dec, ctx.jde, ctx.obliquity);
            ra = normalize_radians(ra + d_ra);
            dec = (dec + d_dec).clamp(-FRAC_PI_2, FRAC_PI_2);
        }

        PlanetaryPosition {
            body,
            right_ascension: ra,
            declination: dec,
            ecliptic_longitude: normalize_degrees(lon * RAD_TO_DEG),
            ecliptic_latitude: lat * RAD_TO_DEG,
        }
    }

    /// Daily motion in ecliptic longitude (degrees/day), central difference over one day.
    pub fn daily_motion(&self, body: Body, jde: f64) -> f64 {
        let before = self.position(body, jde - 0.5).ecliptic_longitude;
        let after = self.position(body, jde + 0.5).ecliptic_longitude;
        shortest_arc(before, after)
    }
}

/// Geocentric ecliptic (λ, β) in radians before nutation and aberration.
fn geometric_ecliptic(body: Body, jde: f64) -> (f64, f64) {
    match body {
        Body::Sun => {
            let (lon, lat, _) = earth_heliocentric(jde);
            (normalize_radians(lon + std::f64::consts::PI), -lat)
        }
        Body::Moon => moon_position(jde),
        Body::NorthNode => true_node_position(jde),
        Body::Mercury => seen_from_earth(planet_heliocentric(VsopPlanet::Mercury, jde), jde),
        Body::Venus => seen_from_earth(planet_heliocentric(VsopPlanet::Venus, jde), jde),
        Body::Mars => seen_from_earth(planet_heliocentric(VsopPlanet::Mars, jde), jde),
        Body::Jupiter => seen_from_earth(planet_heliocentric(VsopPlanet::Jupiter, jde), jde),
        Body::Saturn => seen_from_earth(planet_heliocentric(VsopPlanet::Saturn, jde), jde),
        Body::Uranus => seen_from_earth(planet_heliocentric(VsopPlanet::Uranus, jde), jde),
        Body::Neptune => seen_from_earth(planet_heliocentric(VsopPlanet::Neptune, jde), jde),
        Body::Pluto => seen_from_earth(pluto_heliocentric(jde), jde),
        Body::Chiron => seen_from_earth(chiron_heliocentric(jde), jde),
    }
}

fn seen_from_earth(helio: Heliocentric, jde: f64) -> (f64, f64) {
    heliocentric_to_geocentric(helio, earth_heliocentric(jde))
}
