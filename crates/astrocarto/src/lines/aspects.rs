//! Aspect lines: where a point a fixed zodiacal distance from a body becomes angular.
//!
//! The aspect is measured along the ecliptic and the shifted point is taken
//! on the ecliptic itself (zero latitude), unlike the body's own lines, which
//! use its true declination.

use super::projector::LineProjector;
use super::types::{Angle, Line};
use crate::ephemeris::{ecliptic_to_equatorial, Body, PlanetaryPosition};
use crate::geo::{normalize_degrees, DEG_TO_RAD};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Trine,
    Sextile,
    Square,
}

impl AspectKind {
    pub const ALL: [AspectKind; 3] = [AspectKind::Trine, AspectKind::Sextile, AspectKind::Square];

    pub fn angle_deg(self) -> f64 {
        match self {
            AspectKind::Trine => 120.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
        }
    }

    pub fn is_harmonious(self) -> bool {
        !matches!(self, AspectKind::Square)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectLine {
    pub body: Body,
    pub aspect: AspectKind,
    pub angle: Angle,
    /// +1 for the point ahead of the body in the zodiac, -1 behind
    pub direction: i8,
    /// Ecliptic longitude of the aspected point, degrees
    pub aspect_longitude: f64,
    pub line: Line,
}

/// Every trine/sextile/square line in both directions for one body.
pub fn aspect_lines(projector: &LineProjector, position: &PlanetaryPosition, obliquity: f64) -> Vec<AspectLine> {
    let mut out = Vec::new();
    for aspect in AspectKind::ALL {
        for direction in [1i8, -1] {
            let shifted = normalize_degrees(position.ecliptic_longitude + direction as f64 * aspect.angle_deg());
            let (ra, dec) = ecliptic_to_equatorial(shifted * DEG_TO_RAD, 0.0, obliquity);
            let point = PlanetaryPosition {
                body: position.body,
                right_ascension: ra,
                declination: dec,
                ecliptic_longitude: shifted,
                ecliptic_latitude: 0.0,
            };
            for (angle, line) in projector.angle_lines(&point) {
                out.push(AspectLine {
                    body: position.body,
                    aspect,
                    angle,
                    direction,
                    aspect_longitude: shifted,
                    line,
                });
            }
        }
    }
    out
}
