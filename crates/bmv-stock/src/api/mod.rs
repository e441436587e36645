//! Contracts and clients for the external collaborators
//!
//! The dashboard talks to a market-data provider and a translation provider
//! through the traits below. Production implementations live in the
//! submodules; tests substitute mocks.

pub mod google;
pub mod yahoo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use google::GoogleTranslateClient;
pub use yahoo::YahooFinanceClient;

/// Key/value company metadata as returned by the provider
pub type InfoMap = serde_json::Map<String, serde_json::Value>;

/// One daily OHLCV row of provider history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Source of company metadata and daily price history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Company metadata; the dashboard reads `longName`, `sector`,
    /// `industry` and `longBusinessSummary`
    async fn get_info(&self, ticker: &str) -> Result<InfoMap>;

    /// Daily rows between `start` and `end`, oldest first
    async fn get_history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HistoryRow>>;
}

/// Machine translation service with a per-call size limit
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}
