use astrocarto::ephemeris::EphemerisEngine;
use astrocarto::lines::{project_all, Angle, LineOptions};
use astrocarto::scout::{
    angular_distance_deg, cluster_hot_zones, generate_coarse_grid, generate_refined_grids, grid_key,
    group_and_rank_countries, rank_cities_by_category, run_scout_task, score_influences, CancellationToken,
    City, GridScorer, Influence, LifeCategory, ScoredGridPoint, ScoringConfig, ScoutConfig, ScoutLines,
    SortMode,
};
use astrocarto::{AstroError, Body, GeoPoint};
use std::collections::HashSet;

fn scout_lines(category: Option<LifeCategory>) -> ScoutLines {
    let options = LineOptions {
        longitude_step_deg: 2.0,
        ..LineOptions::default()
    };
    ScoutLines::from_line_set(&project_all(&EphemerisEngine::new(), 2_451_545.0, &options), category)
}

fn quick_config() -> ScoutConfig {
    ScoutConfig {
        coarse_step: 6.0,
        fine_step: 1.0,
        refine_radius_deg: 3.0,
        top_n_coarse: 8,
        ..ScoutConfig::default()
    }
}

#[test]
fn test_refined_grids_have_unique_keys() {
    let zones: Vec<GeoPoint> = [(10.0, 10.0), (11.0, 11.5), (10.5, 9.0), (-5.0, 179.0), (-5.0, -179.5)]
        .iter()
        .map(|&(lat, lng)| GeoPoint::new(lat, lng))
        .collect();
    let grid = generate_refined_grids(&zones, &ScoutConfig::default()).unwrap();
    let keys: HashSet<_> = grid.iter().map(|&p| grid_key(p)).collect();
    assert_eq!(keys.len(), grid.len());
}

#[test]
fn test_hot_zones_descend_and_keep_apart() {
    let lines = scout_lines(None);
    let config = ScoringConfig::default();
    let points: Vec<ScoredGridPoint> = generate_coarse_grid(5.0, false)
        .unwrap()
        .into_iter()
        .map(|p| ScoredGridPoint {
            point: p,
            score: lines.score(p, &config),
        })
        .collect();

    let radius = 10.0;
    let zones = cluster_hot_zones(&points, 25, radius);
    assert!(!zones.is_empty());
    assert!(zones.windows(2).all(|w| w[0].overall() > w[1].overall()));
    for (i, a) in zones.iter().enumerate() {
        for b in &zones[i + 1..] {
            assert!(angular_distance_deg(a.point, b.point) >= radius);
        }
    }
}

#[test]
fn test_score_never_increases_with_distance() {
    let config = ScoringConfig::default();
    let others = [
        Influence {
            body: Body::Saturn,
            angle: Angle::Asc,
            rating: 1,
            aspect: None,
            distance_km: 250.0,
        },
        Influence {
            body: Body::Venus,
            angle: Angle::Ic,
            rating: 5,
            aspect: None,
            distance_km: 400.0,
        },
    ];
    let score_at = |d: f64| {
        let mut all = others.to_vec();
        all.push(Influence {
            body: Body::Jupiter,
            angle: Angle::Mc,
            rating: 5,
            aspect: None,
            distance_km: d,
        });
        score_influences(&all, &config).overall
    };

    let mut prev = score_at(0.0);
    for step in 1..=300 {
        let d = step as f64 * 5.0;
        let s = score_at(d);
        assert!(s <= prev + 1e-12, "score rose from {prev} to {s} at {d} km");
        prev = s;
    }
    // no step at the reporting radius
    let below = score_at(config.max_distance_km - 0.01);
    let above = score_at(config.max_distance_km + 0.01);
    assert!((below - above).abs() < 0.01);
}

#[test]
fn test_water_mask_removes_points() {
    let land = generate_coarse_grid(2.0, true).unwrap();
    let all = generate_coarse_grid(2.0, false).unwrap();
    assert!(land.len() < all.len());
    assert!(!land.is_empty());
}

#[test]
fn test_full_run_is_deterministic() {
    let first = GridScorer::new(scout_lines(Some(LifeCategory::Career)), quick_config())
        .unwrap()
        .run()
        .unwrap();
    let second = GridScorer::new(scout_lines(Some(LifeCategory::Career)), quick_config())
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(first.points, second.points);
    assert_eq!(first.hot_zones, second.hot_zones);
    assert_ne!(first.run_id, second.run_id);
    assert!(first.points.iter().all(|p| (0.0..=100.0).contains(&p.overall())));

    let keys: HashSet<_> = first.points.iter().map(|p| grid_key(p.point)).collect();
    assert_eq!(keys.len(), first.points.len());
}

#[test]
fn test_empty_line_set_scores_zero() {
    let result = GridScorer::new(ScoutLines::default(), quick_config()).unwrap().run().unwrap();
    assert!(result.hot_zones.is_empty());
    assert!(result.points.is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = ScoutConfig {
        fine_step: -0.5,
        ..ScoutConfig::default()
    };
    assert!(matches!(
        GridScorer::new(ScoutLines::default(), config),
        Err(AstroError::InvalidScoutConfig { field: "fine_step", .. })
    ));
}

#[tokio::test]
async fn test_scout_task_completes() {
    let result = run_scout_task(scout_lines(None), quick_config(), CancellationToken::new())
        .await
        .unwrap();
    assert!(!result.points.is_empty());
}

#[tokio::test]
async fn test_cancelled_scout_returns_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = run_scout_task(scout_lines(None), quick_config(), cancel).await;
    assert_eq!(result, Err(AstroError::Cancelled));
}

#[test]
fn test_city_ranking_by_category() {
    let lines = scout_lines(Some(LifeCategory::Love));
    let config = ScoringConfig::relaxed();
    let cities: Vec<City> = (0..36)
        .map(|i| {
            let lng = -180.0 + i as f64 * 10.0;
            City::new(format!("City {i}"), format!("Country {}", i % 4), GeoPoint::new(20.0, lng))
        })
        .collect();

    let ranked = rank_cities_by_category(&cities, &lines, &config, SortMode::BenefitFirst);
    assert!(ranked.windows(2).all(|w| w[0].benefit >= w[1].benefit));
    for city in &ranked {
        assert!(!city.top_influences.is_empty() && city.top_influences.len() <= 3);
        assert!(city.top_influences.iter().all(|i| i.distance_km <= config.max_distance_km));
    }

    let total = ranked.len();
    let countries = group_and_rank_countries(ranked);
    assert_eq!(countries.iter().map(|c| c.cities.len()).sum::<usize>(), total);
    assert!(countries
        .windows(2)
        .all(|w| w[0].cities[0].benefit >= w[1].cities[0].benefit));
}
