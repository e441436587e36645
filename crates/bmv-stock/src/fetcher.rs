//! Memoized company metadata and price history per ticker

use chrono::{Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{InfoMap, MarketDataProvider};
use crate::cache::TtlCache;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::series::{PriceSeries, shape_history};

/// Company fields as the provider returned them, missing ones empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCompanyInfo {
    pub long_name: String,
    pub sector: String,
    pub industry: String,
    pub long_business_summary: String,
}

impl RawCompanyInfo {
    pub fn from_info(info: &InfoMap) -> Self {
        let field = |key: &str| {
            info.get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            long_name: field("longName"),
            sector: field("sector"),
            industry: field("industry"),
            long_business_summary: field("longBusinessSummary"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.long_name.is_empty()
            && self.sector.is_empty()
            && self.industry.is_empty()
            && self.long_business_summary.is_empty()
    }
}

/// Everything fetched for one ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockData {
    pub info: RawCompanyInfo,
    pub series: PriceSeries,
}

impl StockData {
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when either the metadata or the history is missing
    pub fn is_incomplete(&self) -> bool {
        self.info.is_empty() || self.series.is_empty()
    }
}

/// Market-data wrapper that caches per ticker and never fails
pub struct StockDataFetcher {
    provider: Arc<dyn MarketDataProvider>,
    validity: TtlCache<String, bool>,
    data: TtlCache<String, StockData>,
    history_days: i64,
}

impl StockDataFetcher {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: &DashboardConfig) -> Self {
        Self {
            provider,
            validity: TtlCache::new(config.cache_ttl_market_data),
            data: TtlCache::new(config.cache_ttl_market_data),
            history_days: config.history_days(),
        }
    }

    /// Whether the provider recognises `ticker`.
    ///
    /// False on any provider error or when the metadata lacks `longName`.
    pub async fn is_valid(&self, ticker: &str) -> bool {
        self.validity
            .get_or_compute(ticker.to_string(), || async {
                match self.provider.get_info(ticker).await {
                    Ok(info) => info
                        .get("longName")
                        .and_then(serde_json::Value::as_str)
                        .is_some_and(|name| !name.trim().is_empty()),
                    Err(err) => {
                        tracing::warn!(ticker, error = %err, "Ticker validity check failed");
                        false
                    }
                }
            })
            .await
    }

    /// Company metadata and trailing daily history for `ticker`.
    ///
    /// Any provider error yields [`StockData::empty`]; callers detect it with
    /// [`StockData::is_incomplete`].
    pub async fn fetch(&self, ticker: &str) -> StockData {
        self.data
            .get_or_compute(ticker.to_string(), || async {
                match self.try_fetch(ticker).await {
                    Ok(data) => data,
                    Err(err) => {
                        tracing::warn!(ticker, error = %err, "Failed to load stock data");
                        StockData::empty()
                    }
                }
            })
            .await
    }

    async fn try_fetch(&self, ticker: &str) -> Result<StockData> {
        let info = self.provider.get_info(ticker).await?;

        let end = Utc::now();
        let start = end - ChronoDuration::days(self.history_days);
        let rows = self.provider.get_history(ticker, start, end).await?;

        let series = shape_history(&rows);
        tracing::info!(ticker, points = series.len(), "Loaded price history");

        Ok(StockData {
            info: RawCompanyInfo::from_info(&info),
            series,
        })
    }
}
