//! Request pipeline: roster check, fetch, translate, compute.
//!
//! [`Dashboard::load`] runs the steps in order for one ticker and returns an
//! immutable [`DashboardView`]. Invalid tickers and fetch failures abort with
//! an error; translation problems become warnings and short histories become
//! notes.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::{
    GoogleTranslateClient, MarketDataProvider, TranslationProvider, YahooFinanceClient,
};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::fetcher::{RawCompanyInfo, StockDataFetcher};
use crate::metrics::{PerformanceReport, compute_performance_report};
use crate::roster::{Roster, Ticker};
use crate::series::{ChartSeries, PriceSeries};
use crate::translation::{NOT_AVAILABLE, TranslationCache};

/// A company field in provider language and in Spanish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedField {
    /// Provider text; `None` when the provider had nothing
    pub raw: Option<String>,
    pub translated: String,
}

/// Company details ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub display_name: String,
    pub sector: TranslatedField,
    pub industry: TranslatedField,
    pub summary: TranslatedField,
}

/// Everything the presentation layer renders for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub ticker: String,
    pub company_ref: String,
    pub company: CompanyInfo,
    pub series: PriceSeries,
    pub chart: ChartSeries,
    /// Always set for a loaded view; one close is enough for a report
    pub performance: Option<PerformanceReport>,
    /// Non-fatal problems, e.g. a failed translation
    pub warnings: Vec<String>,
    /// Caveats about how figures were computed
    pub notes: Vec<String>,
    pub generated_at: DateTime<Local>,
}

/// Composes the fetcher, translator and metrics for one ticker at a time
pub struct Dashboard {
    roster: Arc<Roster>,
    fetcher: StockDataFetcher,
    translator: TranslationCache,
}

impl Dashboard {
    pub fn new(
        roster: Arc<Roster>,
        market: Arc<dyn MarketDataProvider>,
        translator: Arc<dyn TranslationProvider>,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            roster,
            fetcher: StockDataFetcher::new(market, config),
            translator: TranslationCache::new(translator, config),
        }
    }

    /// Wire the Yahoo and Google clients and load the configured roster
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        config.validate()?;
        let roster = Roster::load(config.roster_path.as_deref())?;
        let market = YahooFinanceClient::new(config.request_timeout)?;
        let translator =
            GoogleTranslateClient::new(&config.translate_base_url, config.request_timeout)?;

        tracing::info!(tickers = roster.len(), "Dashboard ready");
        Ok(Self::new(
            Arc::new(roster),
            Arc::new(market),
            Arc::new(translator),
            config,
        ))
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Build the view for `symbol`
    pub async fn load(&self, symbol: &str) -> Result<DashboardView> {
        let ticker = self.roster.ticker(symbol)?;
        tracing::info!(ticker = %ticker, "Loading dashboard");

        if !self.fetcher.is_valid(ticker.symbol()).await {
            return Err(DashboardError::InvalidTicker(ticker.symbol().to_string()));
        }

        let data = self.fetcher.fetch(ticker.symbol()).await;
        if data.is_incomplete() {
            return Err(DashboardError::fetch(
                ticker.symbol(),
                "no company data or price history returned",
            ));
        }

        let mut warnings = Vec::new();
        let company = self.company_info(&ticker, &data.info, &mut warnings).await;

        let chart = ChartSeries::from_series(&data.series);
        // Empty series were rejected above; the report only refuses those
        let performance = compute_performance_report(&data.series).ok();
        let notes = performance
            .as_ref()
            .map(|report| performance_notes(report, data.series.len()))
            .unwrap_or_default();

        Ok(DashboardView {
            ticker: ticker.symbol().to_string(),
            company_ref: ticker.company_ref().to_string(),
            company,
            series: data.series,
            chart,
            performance,
            warnings,
            notes,
            generated_at: Local::now(),
        })
    }

    async fn company_info(
        &self,
        ticker: &Ticker,
        raw: &RawCompanyInfo,
        warnings: &mut Vec<String>,
    ) -> CompanyInfo {
        let display_name = [raw.long_name.as_str(), ticker.display_name()]
            .into_iter()
            .find(|name| !name.is_empty())
            .unwrap_or(ticker.symbol())
            .to_string();

        let summary = self.translate_field(&raw.long_business_summary, true, warnings).await;
        let sector = self.translate_field(&raw.sector, false, warnings).await;
        let industry = self.translate_field(&raw.industry, false, warnings).await;

        CompanyInfo {
            display_name,
            sector,
            industry,
            summary,
        }
    }

    /// Translate one field. Missing labels stay "No disponible"; a missing
    /// description still goes through the translator's placeholder handling.
    async fn translate_field(
        &self,
        raw: &str,
        always: bool,
        warnings: &mut Vec<String>,
    ) -> TranslatedField {
        let raw = Some(raw.trim()).filter(|text| !text.is_empty());
        if raw.is_none() && !always {
            return TranslatedField {
                raw: None,
                translated: NOT_AVAILABLE.to_string(),
            };
        }

        let translation = self.translator.translate(raw.unwrap_or_default()).await;
        if let Some(warning) = translation.warning {
            if !warnings.contains(&warning) {
                warnings.push(warning);
            }
        }
        TranslatedField {
            raw: raw.map(str::to_string),
            translated: translation.text,
        }
    }
}

fn performance_notes(report: &PerformanceReport, points: usize) -> Vec<String> {
    let mut notes: Vec<String> = report
        .partial_windows()
        .map(|w| {
            format!(
                "El rendimiento a {} se calculó con {} días de historial (se esperaban {}), \
                 tomando el primer precio disponible como base.",
                w.window.label(),
                points,
                w.window.trading_days() + 1
            )
        })
        .collect();

    if report.return_count == 0 {
        notes.push(
            "La volatilidad no está disponible: se necesitan al menos dos precios de cierre."
                .to_string(),
        );
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HistoryRow, InfoMap, MockMarketDataProvider, MockTranslationProvider};
    use crate::metrics::ReturnWindow;
    use crate::translation::NO_DESCRIPTION;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn info(value: serde_json::Value) -> InfoMap {
        value.as_object().cloned().unwrap()
    }

    fn rows(len: usize) -> Vec<HistoryRow> {
        (0..len)
            .map(|i| {
                let close = 100.0 + i as f64;
                HistoryRow {
                    timestamp: Utc.with_ymd_and_hms(2020, 1, 1, 15, 0, 0).unwrap()
                        + Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 100,
                }
            })
            .collect()
    }

    fn echo_translator() -> MockTranslationProvider {
        let mut translator = MockTranslationProvider::new();
        translator
            .expect_translate()
            .returning(|text, _, _| Ok(format!("es:{text}")));
        translator
    }

    fn dashboard(market: MockMarketDataProvider, translator: MockTranslationProvider) -> Dashboard {
        Dashboard::new(
            Arc::new(Roster::bundled().unwrap()),
            Arc::new(market),
            Arc::new(translator),
            &DashboardConfig::default(),
        )
    }

    fn market_with(metadata: serde_json::Value, history_len: usize) -> MockMarketDataProvider {
        let mut market = MockMarketDataProvider::new();
        market
            .expect_get_info()
            .returning(move |_| Ok(info(metadata.clone())));
        market
            .expect_get_history()
            .returning(move |_, _, _| Ok(rows(history_len)));
        market
    }

    #[tokio::test]
    async fn load_builds_full_view() {
        let market = market_with(
            json!({
                "longName": "Kimberly-Clark de México, S.A.B. de C.V.",
                "sector": "Consumer Defensive",
                "industry": "Household & Personal Products",
                "longBusinessSummary": "Makes tissue products."
            }),
            1300,
        );
        let view = dashboard(market, echo_translator())
            .load("kimbera.mx")
            .await
            .unwrap();

        assert_eq!(view.ticker, "KIMBERA.MX");
        assert_eq!(view.company_ref, "KIMBERA");
        assert_eq!(
            view.company.display_name,
            "Kimberly-Clark de México, S.A.B. de C.V."
        );
        assert_eq!(view.company.sector.translated, "es:Consumer Defensive");
        assert_eq!(view.company.summary.translated, "es:Makes tissue products.");
        assert_eq!(view.series.len(), 1300);
        assert_eq!(view.chart.len(), 1300);
        assert!(view.warnings.is_empty());
        assert!(view.notes.is_empty());

        let report = view.performance.unwrap();
        assert!(report.window(ReturnWindow::FiveYears).full_history);
    }

    #[tokio::test]
    async fn symbol_outside_roster_is_rejected_without_provider_calls() {
        let mut market = MockMarketDataProvider::new();
        market.expect_get_info().times(0);
        let err = dashboard(market, MockTranslationProvider::new())
            .load("AAPL")
            .await
            .unwrap_err();
        assert_eq!(err, DashboardError::InvalidTicker("AAPL".to_string()));
    }

    #[tokio::test]
    async fn provider_rejection_is_invalid_ticker() {
        let mut market = MockMarketDataProvider::new();
        market
            .expect_get_info()
            .returning(|ticker| Err(DashboardError::fetch(ticker, "404")));
        let err = dashboard(market, MockTranslationProvider::new())
            .load("Q.MX")
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidTicker(_)));
    }

    #[tokio::test]
    async fn empty_history_is_fetch_failure() {
        let market = market_with(json!({"longName": "Alsea"}), 0);
        let err = dashboard(market, MockTranslationProvider::new())
            .load("ALSEA.MX")
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::FetchFailure { .. }));
    }

    #[tokio::test]
    async fn missing_fields_fall_back_without_translation() {
        let market = market_with(json!({"longName": "Gentera", "sector": null}), 10);
        let mut translator = MockTranslationProvider::new();
        translator.expect_translate().times(0);

        let view = dashboard(market, translator)
            .load("GENTERA.MX")
            .await
            .unwrap();
        assert_eq!(view.company.display_name, "Gentera");
        assert_eq!(view.company.sector.raw, None);
        assert_eq!(view.company.industry.raw, None);
        assert_eq!(view.company.sector.translated, NOT_AVAILABLE);
        assert_eq!(view.company.industry.translated, NOT_AVAILABLE);
        assert_eq!(view.company.summary.translated, NO_DESCRIPTION);
    }

    #[tokio::test]
    async fn translation_failure_becomes_warning() {
        let market = market_with(
            json!({
                "longName": "Grupo Traxión",
                "sector": "Industrials",
                "industry": "Trucking",
                "longBusinessSummary": "Moves freight."
            }),
            300,
        );
        let mut translator = MockTranslationProvider::new();
        translator
            .expect_translate()
            .returning(|_, _, _| Err(DashboardError::TranslationFailure("timeout".into())));

        let view = dashboard(market, translator)
            .load("TRAXIONA.MX")
            .await
            .unwrap();
        assert_eq!(view.company.summary.translated, "Moves freight.");
        assert_eq!(view.company.sector.translated, "Industrials");
        // same failure reported once
        assert_eq!(view.warnings.len(), 1);
        assert!(view.performance.is_some());
    }

    #[tokio::test]
    async fn short_history_adds_window_notes() {
        let market = market_with(json!({"longName": "Banco del Bajío"}), 300);
        let view = dashboard(market, echo_translator())
            .load("BBAJIOO.MX")
            .await
            .unwrap();

        let report = view.performance.unwrap();
        assert_eq!(report.window(ReturnWindow::OneYear).base_index, 47);
        // 3y and 5y windows fall back to the first price
        assert_eq!(view.notes.len(), 2);
        assert!(view.notes[0].contains("3 años"));
    }

    #[tokio::test]
    async fn single_price_notes_missing_volatility() {
        let market = market_with(json!({"longName": "Bolsa"}), 1);
        let view = dashboard(market, echo_translator())
            .load("BOLSAA.MX")
            .await
            .unwrap();

        let report = view.performance.unwrap();
        assert_eq!(report.annualized_volatility, 0.0);
        assert!(view.notes.iter().any(|n| n.contains("volatilidad")));
    }
}
