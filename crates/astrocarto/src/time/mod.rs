//! Calendar and instant arithmetic: Julian Dates, Delta-T, sidereal time.

mod delta_t;
mod julian;
mod sidereal;

pub use delta_t::{delta_t, delta_t_for_decimal_year, ut_to_tt, utc_to_tt};
pub use julian::{jd_to_calendar, to_julian_date, CivilDateTime};
pub use sidereal::{dut1, gmst, gmst_from_utc, lst, utc_to_ut1};

pub const J2000_EPOCH: f64 = 2451545.0;
pub const JULIAN_CENTURY: f64 = 36525.0;
pub const SECONDS_PER_DAY: f64 = 86400.0;
/// Length of one sidereal day in solar days.
pub const SIDEREAL_DAY: f64 = 0.997_269_566_329_084;

/// Julian centuries since J2000.0.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000_EPOCH) / JULIAN_CENTURY
}
