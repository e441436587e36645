//! Error types for dashboard operations

use thiserror::Error;

/// Dashboard specific errors
///
/// The first four variants are the request-pipeline taxonomy: invalid
/// tickers and fetch failures abort the pipeline, translation failures are
/// recovered into a warning, and insufficient data leaves the metrics out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// The provider cannot confirm basic identity for the symbol
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// Metadata or history could not be retrieved
    #[error("Fetch failed for {ticker}: {reason}")]
    FetchFailure { ticker: String, reason: String },

    /// The translation provider failed or rejected the request
    #[error("Translation failed: {0}")]
    TranslationFailure(String),

    /// The price series is too short to compute the requested metric
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A price series violates its ordering or value invariant
    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    /// Configuration or roster error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    /// Shorthand for a fetch failure on `ticker`
    pub fn fetch(ticker: impl Into<String>, reason: impl ToString) -> Self {
        Self::FetchFailure {
            ticker: ticker.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

impl From<bmv_utils::ConfigError> for DashboardError {
    fn from(err: bmv_utils::ConfigError) -> Self {
        DashboardError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Settings {
        #[allow(dead_code)]
        x: u32,
    }

    #[test]
    fn test_error_display() {
        let err = DashboardError::InvalidTicker("XYZ.MX".to_string());
        assert_eq!(err.to_string(), "Invalid ticker: XYZ.MX");

        let err = DashboardError::fetch("WALMEX.MX", "timeout");
        assert_eq!(err.to_string(), "Fetch failed for WALMEX.MX: timeout");
    }

    #[test]
    fn test_config_error_conversion() {
        let cfg_err = bmv_utils::parse_toml::<Settings>("x = ").unwrap_err();
        let err: DashboardError = cfg_err.into();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
