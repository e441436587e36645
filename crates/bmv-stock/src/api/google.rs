//! Google Translate client (public `translate_a/single` endpoint)

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::TranslationProvider;
use crate::error::{DashboardError, Result};

/// Google Translate API client
pub struct GoogleTranslateClient {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleTranslateClient {
    /// Create a client against `base_url`, e.g. `https://translate.googleapis.com`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Concatenate the translated segments of a `translate_a/single` response.
///
/// The body is a nested array whose first element lists
/// `[translated, original, ...]` segments.
pub fn parse_translation(body: &Value) -> Result<String> {
    let segments = body.get(0).and_then(Value::as_array).ok_or_else(|| {
        DashboardError::TranslationFailure("unexpected response shape".to_string())
    })?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(DashboardError::TranslationFailure(
            "response contained no translated text".to_string(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl TranslationProvider for GoogleTranslateClient {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/translate_a/single", self.base_url))
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| DashboardError::TranslationFailure(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| DashboardError::TranslationFailure(e.to_string()))?;

        parse_translation(&body)
    }
}
