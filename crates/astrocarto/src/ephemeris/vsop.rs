//! Heliocentric planet positions (VSOP87B) and their geocentric projection.

use crate::geo::normalize_radians;
use vsop87::vsop87b;

/// Heliocentric ecliptic (longitude rad, latitude rad, distance AU).
pub type Heliocentric = (f64, f64, f64);

pub fn earth_heliocentric(jde: f64) -> Heliocentric {
    let c = vsop87b::earth(jde);
    (c.longitude(), c.latitude(), c.distance())
}

/// Planets covered by VSOP87B besides the Earth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VsopPlanet {
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

pub fn planet_heliocentric(planet: VsopPlanet, jde: f64) -> Heliocentric {
    let c = match planet {
        VsopPlanet::Mercury => vsop87b::mercury(jde),
        VsopPlanet::Venus => vsop87b::venus(jde),
        VsopPlanet::Mars => vsop87b::mars(jde),
        VsopPlanet::Jupiter => vsop87b::jupiter(jde),
        VsopPlanet::Saturn => vsop87b::saturn(jde),
        VsopPlanet::Uranus => vsop87b::uranus(jde),
        VsopPlanet::Neptune => vsop87b::neptune(jde),
    };
    (c.longitude(), c.latitude(), c.distance())
}

fn to_rectangular((lon, lat, r): Heliocentric) -> [f64; 3] {
    [r * lat.cos() * lon.cos(), r * lat.cos() * lon.sin(), r * lat.sin()]
}

/// Geocentric ecliptic (longitude, latitude) from two heliocentric positions.
pub fn heliocentric_to_geocentric(body: Heliocentric, earth: Heliocentric) -> (f64, f64) {
    let p = to_rectangular(body);
    let e = to_rectangular(earth);
    let (x, y, z) = (p[0] - e[0], p[1] - e[1], p[2] - e[2]);
    (normalize_radians(y.atan2(x)), z.atan2((x * x + y * y).sqrt()))
}
