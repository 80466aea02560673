//! Apparent geocentric positions of the Sun, Moon, planets, Chiron and the lunar node.

mod chiron;
mod corrections;
mod engine;
mod moon;
mod node;
mod pluto;
mod types;
mod vsop;

pub use corrections::{aberration, ecliptic_to_equatorial, mean_obliquity, nutation, true_obliquity, Nutation};
pub use engine::{EphemerisEngine, EpochContext};
pub use types::{Body, PlanetaryPosition};
