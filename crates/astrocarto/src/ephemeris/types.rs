use crate::error::{valid_names, AstroError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Celestial bodies with a position model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    NorthNode,
}

const BODY_NAMES: &[(&str, Body)] = &[
    ("sun", Body::Sun),
    ("moon", Body::Moon),
    ("mercury", Body::Mercury),
    ("venus", Body::Venus),
    ("mars", Body::Mars),
    ("jupiter", Body::Jupiter),
    ("saturn", Body::Saturn),
    ("uranus", Body::Uranus),
    ("neptune", Body::Neptune),
    ("pluto", Body::Pluto),
    ("chiron", Body::Chiron),
    ("north_node", Body::NorthNode),
];

impl Body {
    pub const ALL: [Body; 12] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Chiron,
        Body::NorthNode,
    ];

    pub fn name(self) -> &'static str {
        BODY_NAMES
            .iter()
            .find(|(_, b)| *b == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Names accepted by `FromStr`.
    pub fn valid_names() -> Vec<String> {
        valid_names(BODY_NAMES)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        let key = match key.as_str() {
            "true_node" | "node" => "north_node",
            other => other,
        };
        BODY_NAMES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, body)| *body)
            .ok_or_else(|| AstroError::UnsupportedBody { body: s.to_string() })
    }
}

/// Apparent geocentric place of one body at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryPosition {
    pub body: Body,
    /// Right ascension in radians, [0, 2π)
    pub right_ascension: f64,
    /// Declination in radians, [-π/2, π/2]
    pub declination: f64,
    /// Ecliptic longitude in degrees, [0, 360), true equinox of date
    pub ecliptic_longitude: f64,
    /// Ecliptic latitude in degrees
    pub ecliptic_latitude: f64,
}
