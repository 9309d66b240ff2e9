//! Hebcal adapter for the holiday calendar port.
//!
//! Fetches Jewish holiday dates from the Hebcal JSON API
//! (`https://www.hebcal.com/hebcal?cfg=json&...`). Only yom tov entries
//! block teaching; informational entries (minor fasts, modern
//! observances) are ignored.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::domain::calendar::HolidaySet;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::HolidayCalendar;

/// Configuration for the Hebcal adapter.
#[derive(Debug, Clone)]
pub struct HebcalConfig {
    /// API base URL (e.g., "https://www.hebcal.com").
    pub base_url: String,

    /// Request timeout.
    pub request_timeout: Duration,
}

impl Default for HebcalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.hebcal.com".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// One calendar entry in a Hebcal response.
#[derive(Debug, Deserialize)]
struct HebcalItem {
    /// Entry date; plain date or RFC 3339 timestamp.
    date: String,

    /// Entry category (e.g., "holiday", "candles", "parashat").
    category: String,

    /// True when the entry is a yom tov (work-restricted holiday).
    #[serde(default)]
    yomtov: bool,
}

/// Top-level Hebcal response body.
#[derive(Debug, Deserialize)]
struct HebcalResponse {
    #[serde(default)]
    items: Vec<HebcalItem>,
}

/// Holiday calendar backed by the Hebcal JSON API.
pub struct HebcalHolidayCalendar {
    config: HebcalConfig,
    client: reqwest::Client,
}

impl HebcalHolidayCalendar {
    /// Creates an adapter with the given configuration.
    pub fn new(config: HebcalConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to build HTTP client: {}", e),
                )
            })?;

        Ok(Self { config, client })
    }

    fn holidays_url(&self, year: i32) -> String {
        format!(
            "{}/hebcal?v=1&cfg=json&year={}&maj=on&min=on&mod=on&i=on",
            self.config.base_url.trim_end_matches('/'),
            year
        )
    }

    fn collect_blocked_dates(items: &[HebcalItem]) -> HolidaySet {
        items
            .iter()
            .filter(|item| item.category == "holiday" && item.yomtov)
            .filter_map(|item| {
                let day = item.date.get(..10).unwrap_or(&item.date);
                NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
            })
            .collect()
    }
}

#[async_trait]
impl HolidayCalendar for HebcalHolidayCalendar {
    async fn fetch_holidays(&self, year: i32) -> Result<HolidaySet, DomainError> {
        let url = self.holidays_url(year);
        debug!(year, %url, "fetching holidays");

        let response = self.client.get(&url).send().await.map_err(|e| {
            DomainError::new(
                ErrorCode::CalendarUnavailable,
                format!("Holiday calendar unreachable: {}", e),
            )
        })?;

        if !response.status().is_success() {
            return Err(DomainError::new(
                ErrorCode::CalendarUnavailable,
                format!("Holiday calendar returned {}", response.status()),
            ));
        }

        let body: HebcalResponse = response.json().await.map_err(|e| {
            DomainError::new(
                ErrorCode::CalendarUnavailable,
                format!("Holiday calendar response malformed: {}", e),
            )
        })?;

        Ok(Self::collect_blocked_dates(&body.items))
    }
}
