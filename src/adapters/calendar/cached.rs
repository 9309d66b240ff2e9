//! Per-year caching decorator for holiday calendars.
//!
//! Holiday dates of a given year never change once published, so a
//! successful fetch is memoized for the process lifetime. A failed fetch
//! degrades to an empty set - scheduling continues without holiday
//! exclusions rather than blocking - and is NOT cached, so the next call
//! retries the source.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::warn;

use crate::domain::calendar::HolidaySet;
use crate::domain::foundation::DomainError;
use crate::ports::HolidayCalendar;

/// Caching decorator over any `HolidayCalendar`.
///
/// Safe for concurrent reads from multiple in-flight scheduling
/// operations; the cache is populated lazily on first access per year
/// and never invalidated during the process lifetime.
pub struct CachedHolidayCalendar {
    inner: Arc<dyn HolidayCalendar>,
    cache: RwLock<HashMap<i32, HolidaySet>>,
}

impl CachedHolidayCalendar {
    /// Wraps a holiday source with a per-year cache.
    pub fn new(inner: Arc<dyn HolidayCalendar>) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the holidays of a year, absorbing source failures.
    ///
    /// Infallible by design: a degraded calendar yields an empty set and
    /// a warning log instead of blocking scheduling.
    pub async fn holidays_for(&self, year: i32) -> HolidaySet {
        match self.fetch_holidays(year).await {
            Ok(set) => set,
            Err(err) => {
                warn!(year, error = %err, "holiday fetch failed, scheduling without holidays");
                HolidaySet::empty()
            }
        }
    }
}

#[async_trait]
impl HolidayCalendar for CachedHolidayCalendar {
    async fn fetch_holidays(&self, year: i32) -> Result<HolidaySet, DomainError> {
        if let Some(cached) = self.cache.read().await.get(&year) {
            return Ok(cached.clone());
        }

        let fetched = self.inner.fetch_holidays(year).await?;

        // Double-checked under the write lock; a concurrent fetch of the
        // same year may have landed first, which is harmless.
        let mut cache = self.cache.write().await;
        let entry = cache.entry(year).or_insert_with(|| fetched.clone());
        Ok(entry.clone())
    }
}
