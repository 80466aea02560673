//! Astrocartography core.
//!
//! Planetary positions, their projection onto the globe as MC/IC/ASC/DSC
//! lines, natal and relocated charts, and a grid search for places where
//! favourable lines concentrate. Everything is a pure calculation over plain
//! values; [`engine::AstroEngine`] is the usual entry point.

pub mod chart;
pub mod engine;
pub mod ephemeris;
pub mod error;
pub mod geo;
pub mod lines;
pub mod scout;
pub mod time;
pub mod timezone;

pub use engine::AstroEngine;
pub use ephemeris::{Body, PlanetaryPosition};
pub use error::{AstroError, Result};
pub use geo::GeoPoint;
pub use time::CivilDateTime;
