use crate::error::{AstroError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Civil calendar fields, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivilDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CivilDateTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AstroError::InvalidCalendarField { field: "month", value: month as i64 });
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(AstroError::InvalidCalendarField { field: "day", value: day as i64 });
        }
        if hour > 23 {
            return Err(AstroError::InvalidCalendarField { field: "hour", value: hour as i64 });
        }
        if minute > 59 {
            return Err(AstroError::InvalidCalendarField { field: "minute", value: minute as i64 });
        }
        if second > 59 {
            return Err(AstroError::InvalidCalendarField { field: "second", value: second as i64 });
        }
        Ok(Self { year, month, day, hour, minute, second })
    }

    pub fn from_naive(dt: &NaiveDateTime) -> Self {
        use chrono::{Datelike, Timelike};
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }

    /// Chrono representation, when the year is inside chrono's range.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, self.minute, self.second))
    }

    /// Julian Date of these fields read as UT.
    pub fn julian_date(&self) -> f64 {
        julian_date_unchecked(self.year, self.month, self.day, self.hour, self.minute, self.second)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

/// Gregorian calendar fields to Julian Date.
///
/// Out-of-range fields fail with `InvalidCalendarField` naming the field.
pub fn to_julian_date(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Result<f64> {
    Ok(CivilDateTime::new(year, month, day, hour, minute, second)?.julian_date())
}

fn julian_date_unchecked(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> f64 {
    let ut = hour as f64 + minute as f64 / 60.0 + second as f64 / 3600.0;
    let (y, m) = if month <= 2 { (year - 1, month + 12) } else { (year, month) };

    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (y as f64 + 4716.0)).floor()
        + (30.6001 * (m as f64 + 1.0)).floor()
        + day as f64
        + ut / 24.0
        + b
        - 1524.5
}

/// Julian Date back to (year, month, day).
///
/// Dates before the Gregorian reform (JD 2299161) come back in the Julian calendar.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, u32) {
    let z = (jd + 0.5).floor() as i64;

    let a = if z < 2_299_161 {
        z
    } else {
        let alpha = ((z as f64 - 1_867_216.25) / 36_524.25).floor() as i64;
        z + 1 + alpha - alpha.div_euclid(4)
    };

    let b = a + 1524;
    let c = ((b as f64 - 122.1) / 365.25).floor() as i64;
    let d = (365.25 * c as f64).floor() as i64;
    let e = ((b - d) as f64 / 30.6001).floor() as i64;

    let day = (b - d - (30.6001 * e as f64).floor() as i64) as u32;
    let month = if e < 14 { (e - 1) as u32 } else { (e - 13) as u32 };
    let year = (if month > 2 { c - 4716 } else { c - 4715 }) as i32;

    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_j2000_epoch() {
        let jd = to_julian_date(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((jd - 2451545.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_dates() {
        // Meeus example 7.a: 1957 October 4.81
        let jd = to_julian_date(1957, 10, 4, 19, 26, 24).unwrap();
        assert!((jd - 2436116.31).abs() < 1e-6);
        let jd = to_julian_date(1987, 6, 19, 12, 0, 0).unwrap();
        assert!((jd - 2446966.0).abs() < 1e-9);
    }

    #[test]
    fn test_leap_day() {
        assert!(to_julian_date(2024, 2, 29, 0, 0, 0).is_ok());
        let err = to_julian_date(2023, 2, 29, 0, 0, 0).unwrap_err();
        assert_eq!(err, AstroError::InvalidCalendarField { field: "day", value: 29 });
    }

    #[test]
    fn test_invalid_fields_named() {
        assert!(matches!(
            to_julian_date(2000, 13, 1, 0, 0, 0),
            Err(AstroError::InvalidCalendarField { field: "month", .. })
        ));
        assert!(matches!(
            to_julian_date(2000, 1, 1, 24, 0, 0),
            Err(AstroError::InvalidCalendarField { field: "hour", .. })
        ));
        assert!(matches!(
            to_julian_date(2000, 1, 1, 0, 60, 0),
            Err(AstroError::InvalidCalendarField { field: "minute", .. })
        ));
    }

    #[test]
    fn test_calendar_round_trip() {
        for &(y, m, d) in &[(2000, 1, 1), (1999, 12, 31), (1600, 3, 1), (2024, 2, 29), (1700, 7, 15)] {
            let jd = to_julian_date(y, m, d, 12, 0, 0).unwrap();
            assert_eq!(jd_to_calendar(jd), (y, m, d));
        }
    }

    #[test]
    fn test_julian_calendar_before_reform() {
        // Meeus example 7.c: 333 January 27.5 (Julian calendar)
        assert_eq!(jd_to_calendar(1842713.0), (333, 1, 27));
    }
}
