use super::geodesy::angular_distance_deg;
use super::grid::{rank_order, ScoredGridPoint};

/// Picks up to `top_n` well separated high scorers.
///
/// Candidates are visited best first. One within `radius_deg` (great-circle)
/// of an already chosen zone is suppressed, as is one tying the last chosen
/// score, so the result is strictly descending. Points scoring zero are never zones.
pub fn cluster_hot_zones(points: &[ScoredGridPoint], top_n: usize, radius_deg: f64) -> Vec<ScoredGridPoint> {
    let mut candidates: Vec<ScoredGridPoint> = points.iter().copied().filter(|p| p.overall() > 0.0).collect();
    candidates.sort_by(rank_order);

    let mut zones: Vec<ScoredGridPoint> = Vec::with_capacity(top_n.min(candidates.len()));
    for candidate in candidates {
        if zones.len() >= top_n {
            break;
        }
        if zones.last().is_some_and(|last| candidate.overall() >= last.overall()) {
            continue;
        }
        if zones
            .iter()
            .any(|zone| angular_distance_deg(zone.point, candidate.point) < radius_deg)
        {
            continue;
        }
        zones.push(candidate);
    }
    zones
}
