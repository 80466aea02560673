use crate::ephemeris::{Body, PlanetaryPosition};
use crate::error::{valid_names, AstroError};
use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Culmination,
    AntiCulmination,
    Rising,
    Setting,
    LocalSpace,
}

const LINE_TYPE_NAMES: &[(&str, LineType)] = &[
    ("culmination", LineType::Culmination),
    ("anti_culmination", LineType::AntiCulmination),
    ("rising", LineType::Rising),
    ("setting", LineType::Setting),
    ("local_space", LineType::LocalSpace),
];

impl LineType {
    /// The chart angle a projected line belongs to. Local-space rays have none.
    pub fn angle(self) -> Option<Angle> {
        match self {
            LineType::Culmination => Some(Angle::Mc),
            LineType::AntiCulmination => Some(Angle::Ic),
            LineType::Rising => Some(Angle::Asc),
            LineType::Setting => Some(Angle::Dsc),
            LineType::LocalSpace => None,
        }
    }
}

impl FromStr for LineType {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        let key = match key.as_str() {
            "mc" => "culmination",
            "ic" => "anti_culmination",
            "asc" => "rising",
            "dsc" | "dc" => "setting",
            other => other,
        };
        LINE_TYPE_NAMES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, t)| *t)
            .ok_or_else(|| AstroError::InvalidLineType {
                line_type: s.to_string(),
                valid: valid_names(LINE_TYPE_NAMES),
            })
    }
}

/// The four chart angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Angle {
    Mc,
    Ic,
    Asc,
    Dsc,
}

impl Angle {
    pub const ALL: [Angle; 4] = [Angle::Mc, Angle::Ic, Angle::Asc, Angle::Dsc];

    pub fn is_meridian(self) -> bool {
        matches!(self, Angle::Mc | Angle::Ic)
    }

    pub fn line_type(self) -> LineType {
        match self {
            Angle::Mc => LineType::Culmination,
            Angle::Ic => LineType::AntiCulmination,
            Angle::Asc => LineType::Rising,
            Angle::Dsc => LineType::Setting,
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Angle::Mc => "MC",
            Angle::Ic => "IC",
            Angle::Asc => "ASC",
            Angle::Dsc => "DSC",
        })
    }
}

/// A planetary line on the Earth's surface.
///
/// Rising/setting lines only hold the longitudes where the body is on that
/// side of the horizon, so their geometry can have gaps. Use
/// [`Line::segments`] to get the connected runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub body: Body,
    pub line_type: LineType,
    pub points: Vec<GeoPoint>,
    /// Longitude sweep step that produced the points; `None` when the points
    /// are already one connected run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep_step_deg: Option<f64>,
}

impl Line {
    pub fn new(body: Body, line_type: LineType, points: Vec<GeoPoint>) -> Self {
        Self {
            body,
            line_type,
            points,
            sweep_step_deg: None,
        }
    }

    pub fn swept(body: Body, line_type: LineType, points: Vec<GeoPoint>, step_deg: f64) -> Self {
        Self {
            body,
            line_type,
            points,
            sweep_step_deg: Some(step_deg),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Connected runs of the geometry.
    ///
    /// A swept line breaks wherever consecutive samples skip a longitude step.
    /// A run touching -180° is joined to a run ending just before +180°.
    pub fn segments(&self) -> Vec<Vec<GeoPoint>> {
        let step = match self.sweep_step_deg {
            Some(step) if self.points.len() > 1 => step,
            _ => return if self.points.is_empty() { Vec::new() } else { vec![self.points.clone()] },
        };

        let mut runs: Vec<Vec<GeoPoint>> = Vec::new();
        let mut current: Vec<GeoPoint> = Vec::new();
        for p in &self.points {
            if let Some(prev) = current.last() {
                if p.lng - prev.lng > 1.5 * step {
                    runs.push(std::mem::take(&mut current));
                }
            }
            current.push(*p);
        }
        runs.push(current);

        if runs.len() > 1 {
            let first_lng = runs[0][0].lng;
            let last_lng = runs[runs.len() - 1].last().map(|p| p.lng).unwrap_or(first_lng);
            if first_lng + 360.0 - last_lng <= 1.5 * step {
                let mut tail = runs.pop().unwrap_or_default();
                tail.extend(runs.remove(0));
                runs.insert(0, tail);
            }
        }
        runs
    }
}

/// All lines of one body plus its zenith point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetLines {
    pub position: PlanetaryPosition,
    pub culmination: Line,
    pub anti_culmination: Line,
    pub rising: Line,
    pub setting: Line,
    /// Where the body stands exactly overhead.
    pub zenith: GeoPoint,
}

impl PlanetLines {
    pub fn lines(&self) -> [&Line; 4] {
        [&self.culmination, &self.anti_culmination, &self.rising, &self.setting]
    }

    pub fn line(&self, angle: Angle) -> &Line {
        match angle {
            Angle::Mc => &self.culmination,
            Angle::Ic => &self.anti_culmination,
            Angle::Asc => &self.rising,
            Angle::Dsc => &self.setting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lng: f64) -> GeoPoint {
        GeoPoint::new(10.0, lng)
    }

    #[test]
    fn test_segments_split_on_gap() {
        let pts = vec![pt(-180.0), pt(-179.0), pt(-178.0), pt(50.0), pt(51.0)];
        let line = Line::swept(Body::Sun, LineType::Rising, pts, 1.0);
        let runs = line.segments();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 3);
    }

    #[test]
    fn test_segments_join_across_dateline() {
        let pts = vec![pt(-180.0), pt(-179.0), pt(100.0), pt(178.0), pt(179.0)];
        let line = Line::swept(Body::Sun, LineType::Setting, pts, 1.0);
        let runs = line.segments();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].iter().map(|p| p.lng).collect::<Vec<_>>(), vec![178.0, 179.0, -180.0, -179.0]);
    }

    #[test]
    fn test_line_type_parse() {
        assert_eq!("MC".parse::<LineType>().unwrap(), LineType::Culmination);
        assert_eq!("anti-culmination".parse::<LineType>().unwrap(), LineType::AntiCulmination);
        assert!(matches!("zenith".parse::<LineType>(), Err(AstroError::InvalidLineType { .. })));
    }
}
