//! Coordinate to timezone resolution.
//!
//! The embedded offline dataset is the single source of truth for every
//! instant conversion. A network provider can be layered on top for display
//! purposes only (see [`display`]).

pub mod display;

use crate::error::{AstroError, Result};
use crate::geo::GeoPoint;
use crate::time::CivilDateTime;
use chrono::{Duration, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use log::warn;
use tzf_rs::DefaultFinder;

/// Whole-and-half-hour offset implied by longitude alone.
pub fn longitude_fallback_offset(lng: f64) -> f64 {
    (lng / 15.0 * 2.0).round() / 2.0
}

/// `Etc/GMT` zone nearest to the longitude. POSIX sign convention is inverted.
///
/// `Etc/GMT` zones come in whole hours only, so the name can sit half an hour
/// from [`longitude_fallback_offset`]; at 80°E the pair is `Etc/GMT-5` and 5.5.
/// The offset is the value used for arithmetic.
pub fn longitude_fallback_zone(lng: f64) -> String {
    let hours = (lng / 15.0).round() as i32;
    match hours {
        0 => "Etc/GMT".to_string(),
        h if h > 0 => format!("Etc/GMT-{}", h.min(14)),
        h => format!("Etc/GMT+{}", (-h).min(12)),
    }
}

/// Offline timezone lookup backed by the `tzf-rs` polygon dataset.
///
/// Loading the dataset is not free, so callers build one resolver and reuse it.
pub struct TimezoneResolver {
    finder: DefaultFinder,
}

impl TimezoneResolver {
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }

    /// IANA zone name for a coordinate. Open ocean resolves to an `Etc/GMT` zone.
    pub fn timezone_name(&self, lat: f64, lng: f64) -> Result<String> {
        let point = GeoPoint::checked(lat, lng)?;
        // tzf-rs takes (lng, lat)
        let name = self.finder.get_tz_name(point.lng, point.lat);
        if name.is_empty() {
            warn!("no timezone polygon at ({lat}, {lng}), using longitude zone");
            return Ok(longitude_fallback_zone(point.lng));
        }
        Ok(name.to_string())
    }

    /// UTC offset in hours for a local civil time at a coordinate.
    ///
    /// Lookup failures degrade to the longitude-based offset and are logged.
    pub fn offset_hours(&self, lat: f64, lng: f64, local: &CivilDateTime) -> f64 {
        match self.lookup_offset_seconds(lat, lng, local) {
            Ok(secs) => secs as f64 / 3600.0,
            Err(err) => {
                warn!("{err}; falling back to longitude offset");
                longitude_fallback_offset(lng)
            }
        }
    }

    /// Local civil time at a coordinate to a UTC Julian Date.
    pub fn local_to_utc_julian_date(&self, lat: f64, lng: f64, local: &CivilDateTime) -> f64 {
        let offset_hours = self.offset_hours(lat, lng, local);
        local.julian_date() - offset_hours / 24.0
    }

    /// Offset in seconds east of UTC, or `TimezoneLookupFailed`.
    pub fn lookup_offset_seconds(&self, lat: f64, lng: f64, local: &CivilDateTime) -> Result<i32> {
        let failed = |message: String| AstroError::TimezoneLookupFailed { lat, lng, message };

        let name = self.finder.get_tz_name(lng, lat);
        let tz: Tz = name
            .parse()
            .map_err(|e| failed(format!("unknown zone '{name}': {e}")))?;
        let naive = local
            .to_naive()
            .ok_or_else(|| failed(format!("date {local:?} outside supported range")))?;
        offset_at_local(&tz, &naive).ok_or_else(|| failed(format!("no offset for {naive} in {name}")))
    }
}

impl Default for TimezoneResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Offset for a local wall-clock time. Ambiguous times take the earlier
/// mapping; times inside a DST gap use the offset in force the day before.
fn offset_at_local(tz: &Tz, naive: &NaiveDateTime) -> Option<i32> {
    let resolved = tz
        .from_local_datetime(naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(*naive - Duration::days(1))).earliest())?;
    Some(resolved.offset().fix().local_minus_utc())
}

/// Offset in hours for a zone name at a UTC instant.
pub fn zone_offset_hours_at(name: &str, at: chrono::DateTime<Utc>) -> Option<f64> {
    let tz: Tz = name.parse().ok()?;
    Some(tz.offset_from_utc_datetime(&at.naive_utc()).fix().local_minus_utc() as f64 / 3600.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_offset_half_hours() {
        assert_eq!(longitude_fallback_offset(80.27), 5.5);
        assert_eq!(longitude_fallback_offset(-74.0), -5.0);
        assert_eq!(longitude_fallback_offset(0.0), 0.0);
    }

    #[test]
    fn test_fallback_zone_within_half_hour_of_offset() {
        for i in -360..=360 {
            let lng = i as f64 * 0.5;
            let zone = longitude_fallback_zone(lng);
            let zone_hours = zone_offset_hours_at(&zone, Utc::now()).unwrap();
            assert!(
                (zone_hours - longitude_fallback_offset(lng)).abs() <= 0.5,
                "{lng}: {zone} vs {}",
                longitude_fallback_offset(lng)
            );
        }
        assert_eq!(longitude_fallback_zone(80.0), "Etc/GMT-5");
        assert_eq!(longitude_fallback_offset(80.0), 5.5);
    }

    #[test]
    fn test_fallback_zone_sign() {
        assert_eq!(longitude_fallback_zone(-75.0), "Etc/GMT+5");
        assert_eq!(longitude_fallback_zone(120.0), "Etc/GMT-8");
        assert_eq!(longitude_fallback_zone(3.0), "Etc/GMT");
    }
}
