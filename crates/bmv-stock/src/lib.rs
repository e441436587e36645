//! BMV equity dashboard core
//!
//! Loads company data for tickers listed on the Mexican stock exchange,
//! translates the company description into Spanish and computes trailing
//! performance figures over five years of daily closes.
//!
//! - [`StockDataFetcher`]: memoized company metadata and price history
//! - [`TranslationCache`]: chunked, memoized, best-effort translation
//! - [`metrics`]: CAGR over 1/3/5 year windows and annualized volatility
//! - [`series`]: history shaping and chart-ready tables
//! - [`Dashboard`]: the per-ticker pipeline tying these together
//!
//! # Example
//!
//! ```rust,ignore
//! use bmv_stock::{Dashboard, DashboardConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::default().with_env()?;
//!     let dashboard = Dashboard::from_config(&config)?;
//!
//!     let view = dashboard.load("WALMEX.MX").await?;
//!     println!("{}: {:?}", view.company.display_name, view.performance);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod roster;
pub mod series;
pub mod translation;

// Re-export main types for convenience
pub use config::DashboardConfig;
pub use dashboard::{CompanyInfo, Dashboard, DashboardView, TranslatedField};
pub use error::{DashboardError, Result};
pub use fetcher::{RawCompanyInfo, StockData, StockDataFetcher};
pub use metrics::{PerformanceReport, ReturnWindow, WindowReturn};
pub use roster::{Roster, RosterEntry, Ticker};
pub use series::{ChartRange, ChartSeries, PricePoint, PriceSeries};
pub use translation::{Translation, TranslationCache};
