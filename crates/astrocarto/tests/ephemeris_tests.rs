use astrocarto::ephemeris::{Body, EphemerisEngine};
use astrocarto::time::utc_to_tt;

const J2000: f64 = 2451545.0;

fn arc(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[test]
fn test_sun_meeus_example_25b() {
    // 1992 Oct 13.0 TD, apparent longitude 199.9061°
    let engine = EphemerisEngine::new();
    let sun = engine.position(Body::Sun, 2448908.5);
    assert!(arc(sun.ecliptic_longitude, 199.9061) < 0.02, "{}", sun.ecliptic_longitude);
    assert!(sun.ecliptic_latitude.abs() < 0.001);
}

#[test]
fn test_venus_meeus_example_33a() {
    // 1992 Dec 20.0 TD, apparent λ 313.0810°, β -2.0847°
    let engine = EphemerisEngine::new();
    let venus = engine.position(Body::Venus, 2448976.5);
    assert!(arc(venus.ecliptic_longitude, 313.0810) < 0.05, "{}", venus.ecliptic_longitude);
    assert!((venus.ecliptic_latitude + 2.0847).abs() < 0.05, "{}", venus.ecliptic_latitude);
}

#[test]
fn test_all_bodies_in_range() {
    let engine = EphemerisEngine::new();
    for jde in [J2000 - 36525.0, J2000, J2000 + 9000.5] {
        for pos in engine.positions(&Body::ALL, jde) {
            assert!((0.0..360.0).contains(&pos.ecliptic_longitude), "{:?}", pos);
            assert!((0.0..std::f64::consts::TAU).contains(&pos.right_ascension), "{:?}", pos);
            assert!(pos.declination.to_degrees().abs() < 45.0, "{:?}", pos);
        }
    }
}

#[test]
fn test_batch_matches_single_calls() {
    let engine = EphemerisEngine::new();
    let batch = engine.positions(&Body::ALL, J2000 + 123.4);
    for pos in batch {
        assert_eq!(pos, engine.position(pos.body, J2000 + 123.4));
    }
}

#[test]
fn test_utc_position_goes_through_delta_t() {
    let engine = EphemerisEngine::new();
    let jd_utc = 2460000.25;
    let via_utc = engine.position_utc(Body::Moon, jd_utc);
    let via_tt = engine.position(Body::Moon, utc_to_tt(jd_utc));
    assert_eq!(via_utc, via_tt);
    // the Moon moves about 0.5" per second, so ΔT is visible
    let naive = engine.position(Body::Moon, jd_utc);
    assert!(arc(naive.ecliptic_longitude, via_utc.ecliptic_longitude) > 1e-3);
}

#[test]
fn test_daily_motion() {
    let engine = EphemerisEngine::new();
    let sun = engine.daily_motion(Body::Sun, J2000);
    assert!((0.95..1.03).contains(&sun), "{sun}");
    let moon = engine.daily_motion(Body::Moon, J2000);
    assert!((11.5..15.5).contains(&moon), "{moon}");
}

#[test]
fn test_mercury_goes_retrograde_within_a_year() {
    let engine = EphemerisEngine::new();
    let motions: Vec<f64> = (0..73)
        .map(|i| engine.daily_motion(Body::Mercury, J2000 + i as f64 * 5.0))
        .collect();
    assert!(motions.iter().any(|&m| m < 0.0));
    assert!(motions.iter().any(|&m| m > 1.0));
}

#[test]
fn test_position_by_name() {
    let engine = EphemerisEngine::new();
    let chiron = engine.position_by_name("Chiron", J2000).unwrap();
    assert_eq!(chiron.body, Body::Chiron);
    assert_eq!(engine.position_by_name("true node", J2000).unwrap().body, Body::NorthNode);
    assert!(engine.position_by_name("vulcan", J2000).is_err());
}

#[test]
fn test_every_body_has_its_own_moving_position() {
    let engine = EphemerisEngine::new();
    let now = engine.positions(&Body::ALL, J2000);
    let later = engine.positions(&Body::ALL, J2000 + 30.0);
    for (a, b) in now.iter().zip(&later) {
        assert!(arc(a.ecliptic_longitude, b.ecliptic_longitude) > 1e-3, "{:?} did not move", a.body);
    }
    for (i, a) in now.iter().enumerate() {
        for b in &now[i + 1..] {
            assert!(
                arc(a.ecliptic_longitude, b.ecliptic_longitude) > 1e-6,
                "{:?} and {:?} coincide",
                a.body,
                b.body
            );
        }
    }
}
