use astrocarto::geo::{normalize_degrees, DEG_TO_RAD};
use astrocarto::lines::{
    anti_culmination_longitude, culmination_longitude, horizon_latitude, LineOptions, LineType,
};
use astrocarto::{AstroEngine, AstroError, Body, CivilDateTime, GeoPoint};

fn j2000() -> CivilDateTime {
    CivilDateTime::new(2000, 1, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_culmination_lines_are_antipodal() {
    for i in 0..50 {
        let ra = i as f64 * 0.37;
        let gmst = i as f64 * 1.13 % 6.28;
        let mc = culmination_longitude(ra, gmst);
        let ic = anti_culmination_longitude(ra, gmst);
        let gap = normalize_degrees(ic - mc);
        assert!((gap - 180.0).abs() < 1e-9, "ra {ra} gmst {gmst}: {gap}");
    }
}

#[test]
fn test_horizon_latitude_solves_horizon_equation() {
    for i in 0..200 {
        let ra = i as f64 * 0.113;
        let dec = (-28.0 + (i % 57) as f64) * DEG_TO_RAD;
        let gmst = 1.7;
        let lng = -180.0 + (i * 7 % 360) as f64;
        if let Some(lat) = horizon_latitude(ra, dec, gmst, lng) {
            let phi = lat * DEG_TO_RAD;
            let h = gmst + lng * DEG_TO_RAD - ra;
            let residual = phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos();
            assert!(residual.abs() < 1e-9, "residual {residual} at ra {ra} dec {dec} lng {lng}");
        }
    }
}

#[test]
fn test_all_lines_at_j2000() {
    let engine = AstroEngine::new();
    let set = engine.calculate_all_lines(&j2000(), 1.0).unwrap();
    assert_eq!(set.planets.len(), Body::ALL.len());

    for planet in &set.planets {
        let mc = &planet.culmination;
        assert_eq!(mc.line_type, LineType::Culmination);
        assert_eq!(mc.points.len(), 360);
        assert!(mc.points.iter().all(|p| p.lng == mc.points[0].lng));
        assert!(mc.points.first().unwrap().lat < -89.0 && mc.points.last().unwrap().lat > 89.0);

        assert!(planet.rising.points.len() <= 360);
        assert!(planet.setting.points.len() <= 360);
        assert!(planet.rising.points.len() + planet.setting.points.len() <= 360);
        for p in planet.rising.points.iter().chain(&planet.setting.points) {
            assert!((-90.0..=90.0).contains(&p.lat));
            assert!((-180.0..180.0).contains(&p.lng));
        }
    }
}

#[test]
fn test_local_time_lines_match_utc_lines() {
    let engine = AstroEngine::new();
    // 07:00 in New York in January is 12:00 UTC
    let local = CivilDateTime::new(2000, 1, 1, 7, 0, 0).unwrap();
    let local_set = engine
        .calculate_all_lines_local(GeoPoint::new(40.7128, -74.006), &local, 2.0)
        .unwrap();
    let utc_set = engine.calculate_all_lines(&j2000(), 2.0).unwrap();
    assert!((local_set.julian_date - utc_set.julian_date).abs() < 1e-6);
}

#[test]
fn test_aspect_lines_and_parans_on_request() {
    let engine = AstroEngine::new();
    let options = LineOptions {
        longitude_step_deg: 2.0,
        bodies: vec![Body::Sun, Body::Moon, Body::Venus],
        include_aspect_lines: true,
        include_parans: true,
    };
    let set = engine.calculate_lines_with(2_451_545.0, &options).unwrap();
    assert_eq!(set.planets.len(), 3);
    assert!(!set.aspect_lines.is_empty());
    assert!(set.aspect_lines.iter().all(|a| a.direction == 1 || a.direction == -1));
    assert!(set.parans.iter().all(|p| p.body1 != p.body2));
}

#[test]
fn test_local_space_rays_start_at_origin() {
    let engine = AstroEngine::new();
    let origin = GeoPoint::new(51.5, -0.12);
    let rays = engine
        .calculate_local_space_lines(origin, &j2000(), 1000.0, 200.0)
        .unwrap();
    assert_eq!(rays.len(), Body::ALL.len());
    for ray in &rays {
        assert_eq!(ray.line.points[0], origin);
        assert_eq!(ray.line.points.len(), 6);
        assert!((0.0..360.0).contains(&ray.azimuth));
    }
    assert!(engine.calculate_local_space_lines(origin, &j2000(), 1000.0, 0.0).is_err());
}

#[test]
fn test_local_space_rejects_unbounded_sampling() {
    let engine = AstroEngine::new();
    let origin = GeoPoint::new(51.5, -0.12);
    for (max_km, step_km) in [(1.0e300, 1.0), (20_000.0, 1.0e-6), (25_000.0, 100.0)] {
        assert!(
            matches!(
                engine.calculate_local_space_lines(origin, &j2000(), max_km, step_km),
                Err(AstroError::InvalidParameter { .. })
            ),
            "({max_km}, {step_km})"
        );
    }
    let rays = engine
        .calculate_local_space_lines(origin, &j2000(), 20_000.0, 2.0)
        .unwrap();
    assert_eq!(rays[0].line.points.len(), 10_001);
}
