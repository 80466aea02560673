//! Lines prepared for repeated distance queries.

use super::category::{line_rating, LifeCategory};
use super::geodesy::PreparedPolyline;
use super::scoring::{score_influences, AspectType, Influence, PointScore, ScoringConfig};
use crate::ephemeris::Body;
use crate::geo::GeoPoint;
use crate::lines::{Angle, Line, LineSet};

#[derive(Debug, Clone)]
struct ScoutLine {
    body: Body,
    angle: Angle,
    rating: u8,
    aspect: Option<AspectType>,
    runs: Vec<PreparedPolyline>,
}

impl ScoutLine {
    fn distance_km(&self, p: GeoPoint) -> f64 {
        self.runs.iter().map(|run| run.distance_km(p)).fold(f64::INFINITY, f64::min)
    }
}

/// The lines that bear on a query, each with its rating and prepared geometry.
///
/// Lines irrelevant to the chosen category are dropped up front, as are lines
/// with no geometry (a circumpolar body's horizon line).
#[derive(Debug, Clone, Default)]
pub struct ScoutLines {
    lines: Vec<ScoutLine>,
    category: Option<LifeCategory>,
}

impl ScoutLines {
    pub fn new(sets: &[LineSet], category: Option<LifeCategory>) -> Self {
        let mut out = Self {
            lines: Vec::new(),
            category,
        };
        for set in sets {
            for line in set.lines() {
                if let Some(angle) = line.line_type.angle() {
                    out.push(line, angle, None);
                }
            }
            for aspect_line in &set.aspect_lines {
                out.push(&aspect_line.line, aspect_line.angle, Some(aspect_line.aspect.into()));
            }
        }
        out
    }

    pub fn from_line_set(set: &LineSet, category: Option<LifeCategory>) -> Self {
        Self::new(std::slice::from_ref(set), category)
    }

    fn push(&mut self, line: &Line, angle: Angle, aspect: Option<AspectType>) {
        let Some(rating) = line_rating(line.body, angle, self.category) else {
            return;
        };
        let runs: Vec<PreparedPolyline> = line
            .segments()
            .into_iter()
            .filter(|run| !run.is_empty())
            .map(PreparedPolyline::new)
            .collect();
        if runs.is_empty() {
            return;
        }
        self.lines.push(ScoutLine {
            body: line.body,
            angle,
            rating,
            aspect,
            runs,
        });
    }

    pub fn category(&self) -> Option<LifeCategory> {
        self.category
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Every line's influence on `p`, nearest first.
    pub fn influences(&self, p: GeoPoint) -> Vec<Influence> {
        let mut out: Vec<Influence> = self
            .lines
            .iter()
            .map(|line| Influence {
                body: line.body,
                angle: line.angle,
                rating: line.rating,
                aspect: line.aspect,
                distance_km: line.distance_km(p),
            })
            .collect();
        out.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        out
    }

    /// Influences no farther than `max_distance_km`, nearest first.
    pub fn influences_within(&self, p: GeoPoint, max_distance_km: f64) -> Vec<Influence> {
        let mut out = self.influences(p);
        out.retain(|i| i.distance_km <= max_distance_km);
        out
    }

    /// Score of a grid location. Every line counts, however far.
    pub fn score(&self, p: GeoPoint, config: &ScoringConfig) -> PointScore {
        score_influences(&self.influences(p), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::EphemerisEngine;
    use crate::lines::{project_all, LineOptions};

    fn line_set() -> LineSet {
        let options = LineOptions {
            longitude_step_deg: 2.0,
            bodies: vec![Body::Venus, Body::Saturn],
            ..LineOptions::default()
        };
        project_all(&EphemerisEngine::new(), 2_451_545.0, &options)
    }

    #[test]
    fn category_filters_lines() {
        let set = line_set();
        let all = ScoutLines::from_line_set(&set, None);
        assert_eq!(all.len(), 8);

        // love rates Venus on ASC and DSC, Saturn on DSC
        let love = ScoutLines::from_line_set(&set, Some(LifeCategory::Love));
        assert_eq!(love.len(), 3);
    }

    #[test]
    fn point_on_culmination_line_has_zero_distance() {
        let set = line_set();
        let lines = ScoutLines::from_line_set(&set, None);
        let venus = set.planet(Body::Venus).map(|p| p.culmination.points[40]).unwrap();
        let nearest = &lines.influences(venus)[0];
        assert!(nearest.distance_km < 1e-6, "{}", nearest.distance_km);
    }

    #[test]
    fn empty_set_scores_zero() {
        let lines = ScoutLines::default();
        let score = lines.score(GeoPoint::new(10.0, 10.0), &ScoringConfig::default());
        assert_eq!(score.overall, 0.0);
        assert_eq!(score.influence_count, 0);
    }
}
