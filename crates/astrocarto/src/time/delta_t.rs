use super::{jd_to_calendar, utc_to_ut1, SECONDS_PER_DAY};

type Poly = fn(f64) -> f64;

fn parabola(y: f64) -> f64 {
    let u = (y - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

/// Piecewise polynomial model of TT − UT1 in seconds, keyed by segment start year.
/// The first segment extends to -∞ and the last to +∞.
const SEGMENTS: &[(f64, Poly)] = &[
    (f64::NEG_INFINITY, parabola),
    (-500.0, |y| {
        let u = y / 100.0;
        10583.6 - 1014.41 * u + 33.78311 * u.powi(2) - 5.952053 * u.powi(3)
            - 0.1798452 * u.powi(4)
            + 0.022174192 * u.powi(5)
            + 0.0090316521 * u.powi(6)
    }),
    (500.0, |y| {
        let u = (y - 1000.0) / 100.0;
        1574.2 - 556.01 * u + 71.23472 * u.powi(2) + 0.319781 * u.powi(3)
            - 0.8503463 * u.powi(4)
            - 0.005050998 * u.powi(5)
            + 0.0083572073 * u.powi(6)
    }),
    (1600.0, |y| {
        let t = y - 1600.0;
        120.0 - 0.9808 * t - 0.01532 * t.powi(2) + t.powi(3) / 7129.0
    }),
    (1700.0, |y| {
        let t = y - 1700.0;
        8.83 + 0.1603 * t - 0.0059285 * t.powi(2) + 0.00013336 * t.powi(3) - t.powi(4) / 1_174_000.0
    }),
    (1800.0, |y| {
        let t = y - 1800.0;
        13.72 - 0.332447 * t + 0.0068612 * t.powi(2) + 0.0041116 * t.powi(3)
            - 0.00037436 * t.powi(4)
            + 0.0000121272 * t.powi(5)
            - 0.0000001699 * t.powi(6)
            + 0.000000000875 * t.powi(7)
    }),
    (1860.0, |y| {
        let t = y - 1860.0;
        7.62 + 0.5737 * t - 0.251754 * t.powi(2) + 0.01680668 * t.powi(3)
            - 0.0004473624 * t.powi(4)
            + t.powi(5) / 233_174.0
    }),
    (1900.0, |y| {
        let t = y - 1900.0;
        -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3) - 0.000197 * t.powi(4)
    }),
    (1920.0, |y| {
        let t = y - 1920.0;
        21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
    }),
    (1941.0, |y| {
        let t = y - 1950.0;
        29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
    }),
    (1961.0, |y| {
        let t = y - 1975.0;
        45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
    }),
    (1986.0, |y| {
        let t = y - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t.powi(2) + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    }),
    (2005.0, |y| {
        let t = y - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t.powi(2)
    }),
    (2050.0, |y| parabola(y) - 0.5628 * (2150.0 - y)),
    (2150.0, parabola),
];

/// Delta-T (TT − UT1) in seconds for a decimal year.
///
/// The published polynomials disagree slightly where they meet. Each finite
/// segment is blended linearly from the previous segment's end value to its own
/// raw value at its end, so the curve has no jumps.
pub fn delta_t_for_decimal_year(y: f64) -> f64 {
    let idx = SEGMENTS
        .iter()
        .rposition(|(start, _)| y >= *start)
        .unwrap_or(0);
    let (start, raw) = SEGMENTS[idx];
    if idx == 0 {
        return raw(y);
    }

    let jump = SEGMENTS[idx - 1].1(start) - raw(start);
    match SEGMENTS.get(idx + 1) {
        Some(&(end, _)) => raw(y) + jump * (end - y) / (end - start),
        None => raw(y) + jump,
    }
}

/// Delta-T in seconds for a calendar year and month (mid-month).
pub fn delta_t(year: i32, month: u32) -> f64 {
    delta_t_for_decimal_year(year as f64 + (month as f64 - 0.5) / 12.0)
}

/// Universal Time to Terrestrial Time: `jd_ut + ΔT/86400`.
pub fn ut_to_tt(jd_ut: f64, year: i32, month: u32) -> f64 {
    jd_ut + delta_t(year, month) / SECONDS_PER_DAY
}

/// UTC Julian Date to Julian Ephemeris Date, via UT1 and the calendar month of the instant.
pub fn utc_to_tt(jd_utc: f64) -> f64 {
    let (year, month, _) = jd_to_calendar(jd_utc);
    ut_to_tt(utc_to_ut1(jd_utc), year, month)
}
