//! Yahoo Finance API client

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use yahoo_finance_api as yahoo;

use super::{HistoryRow, InfoMap, MarketDataProvider};
use crate::error::{DashboardError, Result};

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SUMMARY_MODULES: &str = "price,assetProfile";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Yahoo Finance API client
///
/// Metadata comes from the quoteSummary endpoint, which needs a session
/// cookie plus a crumb token. History goes through `yahoo_finance_api`.
pub struct YahooFinanceClient {
    http: reqwest::Client,
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            crumb: Mutex::new(None),
        })
    }

    /// Session crumb, fetched once and reused
    async fn crumb(&self, ticker: &str) -> Result<String> {
        let mut guard = self.crumb.lock().await;
        if let Some(crumb) = guard.as_ref() {
            return Ok(crumb.clone());
        }

        // The cookie endpoint answers 404 but still sets the session cookie
        self.http
            .get(COOKIE_URL)
            .header("referer", "https://finance.yahoo.com/")
            .send()
            .await
            .map_err(|e| DashboardError::fetch(ticker, format!("Yahoo cookie: {e}")))?;

        let body = self
            .http
            .get(CRUMB_URL)
            .header("referer", "https://finance.yahoo.com/")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| DashboardError::fetch(ticker, format!("Yahoo crumb: {e}")))?
            .text()
            .await
            .map_err(|e| DashboardError::fetch(ticker, format!("Yahoo crumb: {e}")))?;

        let crumb = body.trim();
        if crumb.is_empty() || crumb.len() >= 100 || crumb.contains(' ') || crumb.contains('<') {
            return Err(DashboardError::fetch(ticker, "Yahoo returned no usable crumb"));
        }

        tracing::debug!("Obtained Yahoo crumb");
        *guard = Some(crumb.to_string());
        Ok(crumb.to_string())
    }

    async fn quote_summary(&self, ticker: &str) -> Result<Value> {
        let crumb = self.crumb(ticker).await?;
        let response = self
            .http
            .get(format!("{SUMMARY_URL}/{ticker}"))
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())])
            .send()
            .await
            .map_err(|e| DashboardError::fetch(ticker, e))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Stale session; the next request starts a fresh handshake
            *self.crumb.lock().await = None;
        }

        response
            .error_for_status()
            .map_err(|e| DashboardError::fetch(ticker, e))?
            .json::<Value>()
            .await
            .map_err(|e| DashboardError::fetch(ticker, e))
    }
}

/// Merge the modules of a quoteSummary response into one flat map.
///
/// The first module to define a key wins.
pub fn flatten_quote_summary(ticker: &str, body: &Value) -> Result<InfoMap> {
    let summary = &body["quoteSummary"];
    if let Some(error) = summary.get("error").filter(|e| !e.is_null()) {
        let reason = error["description"]
            .as_str()
            .map_or_else(|| error.to_string(), str::to_string);
        return Err(DashboardError::fetch(ticker, reason));
    }

    let result = summary["result"]
        .get(0)
        .and_then(Value::as_object)
        .ok_or_else(|| DashboardError::fetch(ticker, "quoteSummary has no result"))?;

    let mut info = InfoMap::new();
    for module in result.values().filter_map(Value::as_object) {
        for (key, value) in module {
            info.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
    Ok(info)
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn get_info(&self, ticker: &str) -> Result<InfoMap> {
        let body = self.quote_summary(ticker).await?;
        flatten_quote_summary(ticker, &body)
    }

    async fn get_history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HistoryRow>> {
        let provider =
            yahoo::YahooConnector::new().map_err(|e| DashboardError::fetch(ticker, e))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DashboardError::fetch(ticker, format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DashboardError::fetch(ticker, format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(ticker, start_odt, end_odt)
            .await
            .map_err(|e| DashboardError::fetch(ticker, e))?;

        let quotes = response
            .quotes()
            .map_err(|e| DashboardError::fetch(ticker, e))?;

        tracing::debug!(ticker, rows = quotes.len(), "Fetched Yahoo history");

        Ok(quotes
            .iter()
            .filter_map(|q| {
                Some(HistoryRow {
                    timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)?,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_quote_summary() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "price": {
                        "longName": "Walmart de México, S.A.B. de C.V.",
                        "currency": "MXN"
                    },
                    "assetProfile": {
                        "sector": "Consumer Defensive",
                        "industry": "Discount Stores",
                        "longBusinessSummary": "Wal-Mart de México operates stores."
                    }
                }],
                "error": null
            }
        });

        let info = flatten_quote_summary("WALMEX.MX", &body).unwrap();
        assert_eq!(info["longName"], "Walmart de México, S.A.B. de C.V.");
        assert_eq!(info["sector"], "Consumer Defensive");
        assert_eq!(info["industry"], "Discount Stores");
        assert_eq!(info["currency"], "MXN");
    }

    #[test]
    fn test_flatten_reports_provider_error() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "Quote not found for symbol: ZZZ.MX"
                }
            }
        });

        let err = flatten_quote_summary("ZZZ.MX", &body).unwrap_err();
        assert_eq!(
            err,
            DashboardError::fetch("ZZZ.MX", "Quote not found for symbol: ZZZ.MX")
        );
    }

    #[test]
    fn test_flatten_empty_result() {
        let body = json!({ "quoteSummary": { "result": [], "error": null } });
        assert!(flatten_quote_summary("ZZZ.MX", &body).is_err());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_get_info() {
        let client = YahooFinanceClient::new(Duration::from_secs(30)).unwrap();
        let info = client.get_info("WALMEX.MX").await.unwrap();
        assert!(info.contains_key("longName"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_get_history() {
        let client = YahooFinanceClient::new(Duration::from_secs(30)).unwrap();
        let end = Utc::now();
        let start = end - chrono::Duration::days(30);
        let rows = client.get_history("WALMEX.MX", start, end).await.unwrap();
        assert!(!rows.is_empty());
    }
}
