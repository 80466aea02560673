//! Grid generation for scanning the globe.

use super::config::ScoutConfig;
use super::scoring::PointScore;
use crate::error::{AstroError, Result};
use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

pub type GridPoint = GeoPoint;

/// A grid location with its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredGridPoint {
    #[serde(flatten)]
    pub point: GridPoint,
    pub score: PointScore,
}

impl ScoredGridPoint {
    pub fn overall(&self) -> f64 {
        self.score.overall
    }
}

/// Descending by overall score, ties broken by latitude then longitude.
pub fn rank_order(a: &ScoredGridPoint, b: &ScoredGridPoint) -> Ordering {
    b.score
        .overall
        .total_cmp(&a.score.overall)
        .then(a.point.lat.total_cmp(&b.point.lat))
        .then(a.point.lng.total_cmp(&b.point.lng))
}

/// Rounded-coordinate identity of a grid point, 1e-4 degree resolution.
pub fn grid_key(p: GridPoint) -> (i64, i64) {
    ((p.lat * 1e4).round() as i64, (p.lng * 1e4).round() as i64)
}

/// Approximate land areas as (lat_min, lat_max, lng_min, lng_max).
///
/// Deliberately generous boxes: coasts, small islands and inland seas are
/// misclassified. Good enough to skip open ocean in a coarse scan.
const LAND_BOXES: &[(f64, f64, f64, f64)] = &[
    (15.0, 72.0, -168.0, -52.0),  // North America
    (60.0, 72.0, -180.0, -168.0), // Chukotka and the Bering coast
    (7.0, 23.0, -118.0, -77.0),   // Central America
    (10.0, 27.0, -85.0, -59.0),   // Caribbean
    (18.0, 23.0, -161.0, -154.0), // Hawaii
    (59.0, 84.0, -74.0, -11.0),   // Greenland
    (-56.0, 13.0, -82.0, -34.0),  // South America
    (35.0, 72.0, -25.0, 45.0),    // Europe and Iceland
    (76.0, 81.0, 10.0, 34.0),     // Svalbard
    (-35.0, 38.0, -18.0, 52.0),   // Africa
    (-26.0, -12.0, 43.0, 51.0),   // Madagascar
    (5.0, 78.0, 25.0, 180.0),     // Asia
    (-11.0, 20.0, 95.0, 155.0),   // Maritime Southeast Asia
    (-44.0, -10.0, 112.0, 154.0), // Australia
    (-47.0, -34.0, 166.0, 179.0), // New Zealand
    (-22.0, -15.0, 177.0, 180.0), // Fiji
    (-90.0, -60.0, -180.0, 180.0), // Antarctica
];

/// Whether a point falls inside the approximate land mask.
pub fn is_probably_land(p: GridPoint) -> bool {
    LAND_BOXES
        .iter()
        .any(|&(lat_min, lat_max, lng_min, lng_max)| {
            (lat_min..=lat_max).contains(&p.lat) && (lng_min..=lng_max).contains(&p.lng)
        })
}

fn check_step(field: &'static str, step: f64) -> Result<()> {
    if step.is_finite() && step > 0.0 && step <= 90.0 {
        Ok(())
    } else {
        Err(AstroError::InvalidParameter { field, value: step })
    }
}

/// Global grid with cell-centred latitudes and longitudes from -180°.
pub fn generate_coarse_grid(step: f64, exclude_water: bool) -> Result<Vec<GridPoint>> {
    check_step("coarse_step", step)?;
    let rows = (180.0 / step).round().max(1.0) as usize;
    let cols = (360.0 / step).round().max(1.0) as usize;

    let mut points = Vec::with_capacity(rows * cols);
    for i in 0..rows {
        let lat = -90.0 + step / 2.0 + i as f64 * step;
        if lat > 90.0 {
            break;
        }
        for j in 0..cols {
            let p = GeoPoint::new(lat, -180.0 + j as f64 * step);
            if !exclude_water || is_probably_land(p) {
                points.push(p);
            }
        }
    }
    Ok(points)
}

/// Square of points spaced `step` apart reaching `radius_deg` from `center`
/// in latitude and longitude. Rows beyond a pole are dropped and longitudes wrap.
pub fn generate_fine_grid(center: GridPoint, radius_deg: f64, step: f64) -> Result<Vec<GridPoint>> {
    check_step("fine_step", step)?;
    if !(radius_deg.is_finite() && radius_deg >= 0.0) {
        return Err(AstroError::InvalidParameter {
            field: "refine_radius_deg",
            value: radius_deg,
        });
    }

    let n = (radius_deg / step + 1e-9).floor() as i64;
    let mut points = Vec::new();
    for i in -n..=n {
        let lat = center.lat + i as f64 * step;
        if lat.abs() > 90.0 {
            continue;
        }
        for j in -n..=n {
            points.push(GeoPoint::new(lat, center.lng + j as f64 * step));
        }
    }
    Ok(points)
}

/// Fine grid of each zone, with points already claimed by an earlier zone removed.
pub fn zone_grids(hot_zones: &[GridPoint], config: &ScoutConfig) -> Result<Vec<Vec<GridPoint>>> {
    let mut seen = HashSet::new();
    hot_zones
        .iter()
        .map(|&zone| {
            let mut grid = generate_fine_grid(zone, config.refine_radius_deg, config.fine_step)?;
            grid.retain(|&p| seen.insert(grid_key(p)));
            Ok(grid)
        })
        .collect()
}

/// Union of the fine grids around every hot zone; no two points share a [`grid_key`].
pub fn generate_refined_grids(hot_zones: &[GridPoint], config: &ScoutConfig) -> Result<Vec<GridPoint>> {
    Ok(zone_grids(hot_zones, config)?.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coarse_grid_covers_globe() {
        let grid = generate_coarse_grid(2.0, false).unwrap();
        assert_eq!(grid.len(), 90 * 180);
        assert_eq!(grid[0], GeoPoint::new(-89.0, -180.0));
        assert!(grid.iter().all(|p| p.lat.abs() < 90.0 && p.lng >= -180.0 && p.lng < 180.0));
    }

    #[test]
    fn land_mask() {
        assert!(is_probably_land(GeoPoint::new(48.9, 2.35)));
        assert!(is_probably_land(GeoPoint::new(-33.9, 151.2)));
        assert!(!is_probably_land(GeoPoint::new(0.0, -140.0)));
        assert!(!is_probably_land(GeoPoint::new(-40.0, -20.0)));
    }

    #[test]
    fn fine_grid_wraps_dateline_and_skips_pole() {
        let grid = generate_fine_grid(GeoPoint::new(89.5, 179.5), 1.0, 0.5).unwrap();
        assert!(grid.iter().all(|p| p.lat <= 90.0 && p.lng >= -180.0 && p.lng < 180.0));
        // rows 88.5..=90.0 survive, 90.5 is dropped
        assert_eq!(grid.len(), 4 * 5);
        assert!(grid.iter().any(|p| p.lng < 0.0));
    }

    #[test]
    fn refined_grids_deduplicate_overlap() {
        let config = ScoutConfig::default();
        let zones = [GeoPoint::new(10.0, 10.0), GeoPoint::new(10.0, 11.0)];
        let grid = generate_refined_grids(&zones, &config).unwrap();
        let keys: HashSet<_> = grid.iter().map(|&p| grid_key(p)).collect();
        assert_eq!(keys.len(), grid.len());
        // two 9×9 squares overlapping in 7 columns
        assert_eq!(grid.len(), 9 * 11);
    }

    #[test]
    fn rejects_bad_steps() {
        assert!(generate_coarse_grid(0.0, true).is_err());
        assert!(generate_fine_grid(GeoPoint::new(0.0, 0.0), 1.0, f64::NAN).is_err());
        assert!(generate_fine_grid(GeoPoint::new(0.0, 0.0), -1.0, 0.5).is_err());
    }
}
