//! Display-only timezone lookup.
//!
//! Providers (typically a web API) are consulted with a strict timeout and a
//! cache keyed by rounded coordinates. Any failure degrades to the offline or
//! longitude-derived answer; nothing here is on the instant-conversion path.

use super::{longitude_fallback_offset, longitude_fallback_zone, zone_offset_hours_at};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySource {
    Provider,
    Cache,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTimezone {
    pub name: String,
    pub offset_hours: f64,
    pub source: DisplaySource,
}

#[async_trait]
pub trait TimezoneDisplayProvider: Send + Sync {
    /// Zone name and offset at the given instant.
    async fn lookup(&self, lat: f64, lng: f64, at: DateTime<Utc>) -> Result<(String, f64)>;
}

/// Coordinates rounded to 0.01° (about 1 km).
fn cache_key(lat: f64, lng: f64) -> (i64, i64) {
    ((lat * 100.0).round() as i64, (lng * 100.0).round() as i64)
}

/// Cached coordinates kept before the cache is cleared.
pub const DEFAULT_CACHE_LIMIT: usize = 4096;

pub struct CachedDisplayLookup<P> {
    provider: P,
    timeout: Duration,
    cache_limit: usize,
    cache: Mutex<HashMap<(i64, i64), String>>,
}

impl<P: TimezoneDisplayProvider> CachedDisplayLookup<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            cache_limit: DEFAULT_CACHE_LIMIT,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Caps the cache; a full cache is cleared before the next insert.
    pub fn with_cache_limit(mut self, limit: usize) -> Self {
        self.cache_limit = limit.max(1);
        self
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Never fails: a slow or failing provider yields the longitude fallback.
    pub async fn lookup(&self, lat: f64, lng: f64, at: DateTime<Utc>) -> DisplayTimezone {
        let key = cache_key(lat, lng);
        let cached = self.cache.lock().ok().and_then(|c| c.get(&key).cloned());
        if let Some(name) = cached {
            if let Some(offset_hours) = zone_offset_hours_at(&name, at) {
                return DisplayTimezone {
                    name,
                    offset_hours,
                    source: DisplaySource::Cache,
                };
            }
        }

        match tokio::time::timeout(self.timeout, self.provider.lookup(lat, lng, at)).await {
            Ok(Ok((name, offset_hours))) => {
                debug!("display timezone for ({lat}, {lng}): {name}");
                if let Ok(mut cache) = self.cache.lock() {
                    if cache.len() >= self.cache_limit && !cache.contains_key(&key) {
                        debug!("display timezone cache full at {} entries, clearing", cache.len());
                        cache.clear();
                    }
                    cache.insert(key, name.clone());
                }
                DisplayTimezone {
                    name,
                    offset_hours,
                    source: DisplaySource::Provider,
                }
            }
            Ok(Err(err)) => {
                warn!("display timezone provider failed: {err}");
                Self::fallback(lng)
            }
            Err(_) => {
                warn!("display timezone provider timed out after {:?}", self.timeout);
                Self::fallback(lng)
            }
        }
    }

    fn fallback(lng: f64) -> DisplayTimezone {
        DisplayTimezone {
            name: longitude_fallback_zone(lng),
            offset_hours: longitude_fallback_offset(lng),
            source: DisplaySource::Fallback,
        }
    }
}
