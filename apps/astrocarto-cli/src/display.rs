//! Display timezone backed by the embedded dataset.
//!
//! The CLI has no network provider, so the display lookup resolves through the
//! same offline finder used for calculation. The cache and timeout still apply.

use astrocarto::error::{AstroError, Result};
use astrocarto::timezone::display::TimezoneDisplayProvider;
use astrocarto::timezone::{zone_offset_hours_at, TimezoneResolver};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub struct OfflineDisplayProvider<'a> {
    resolver: &'a TimezoneResolver,
}

impl<'a> OfflineDisplayProvider<'a> {
    pub fn new(resolver: &'a TimezoneResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl TimezoneDisplayProvider for OfflineDisplayProvider<'_> {
    async fn lookup(&self, lat: f64, lng: f64, at: DateTime<Utc>) -> Result<(String, f64)> {
        let name = self.resolver.timezone_name(lat, lng)?;
        let offset = zone_offset_hours_at(&name, at).ok_or_else(|| AstroError::TimezoneLookupFailed {
            lat,
            lng,
            message: format!("zone '{name}' has no offset at {at}"),
        })?;
        Ok((name, offset))
    }
}
