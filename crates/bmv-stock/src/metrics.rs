//! Performance metrics as pure functions over close prices.
//!
//! No I/O. Every function takes prices in and returns scalars or a
//! [`PerformanceReport`]; degenerate inputs produce zeros, never NaN.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DashboardError, Result};
use crate::series::PriceSeries;

/// Trading days assumed per calendar year
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Look-back windows reported by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnWindow {
    OneYear,
    ThreeYears,
    FiveYears,
}

impl ReturnWindow {
    pub const ALL: [ReturnWindow; 3] = [
        ReturnWindow::OneYear,
        ReturnWindow::ThreeYears,
        ReturnWindow::FiveYears,
    ];

    /// Years used as the CAGR exponent, regardless of available history
    pub fn nominal_years(self) -> u32 {
        match self {
            ReturnWindow::OneYear => 1,
            ReturnWindow::ThreeYears => 3,
            ReturnWindow::FiveYears => 5,
        }
    }

    /// Trading-day offset of the base price: 252, 756 or 1260
    pub fn trading_days(self) -> usize {
        self.nominal_years() as usize * TRADING_DAYS_PER_YEAR
    }

    pub fn label(self) -> &'static str {
        match self {
            ReturnWindow::OneYear => "1 año",
            ReturnWindow::ThreeYears => "3 años",
            ReturnWindow::FiveYears => "5 años",
        }
    }
}

impl fmt::Display for ReturnWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Annualized return of one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowReturn {
    pub window: ReturnWindow,
    /// Index of the base price in the series
    pub base_index: usize,
    pub base_price: f64,
    pub cagr: f64,
    /// False when the series was shorter than the window and the first
    /// price was used as the base
    pub full_history: bool,
}

/// Growth and risk figures for one price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub current_price: f64,
    pub windows: [WindowReturn; 3],
    /// Population standard deviation of daily returns
    pub daily_volatility: f64,
    pub annualized_volatility: f64,
    /// Number of daily returns behind the volatility figure
    pub return_count: usize,
}

impl PerformanceReport {
    pub fn window(&self, window: ReturnWindow) -> &WindowReturn {
        match window {
            ReturnWindow::OneYear => &self.windows[0],
            ReturnWindow::ThreeYears => &self.windows[1],
            ReturnWindow::FiveYears => &self.windows[2],
        }
    }

    pub fn cagr(&self, window: ReturnWindow) -> f64 {
        self.window(window).cagr
    }

    /// Windows computed over less history than their label suggests
    pub fn partial_windows(&self) -> impl Iterator<Item = &WindowReturn> {
        self.windows.iter().filter(|w| !w.full_history)
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Compound Annual Growth Rate.
///
/// `(final / initial)^(1 / years) - 1`. Returns 0.0 when `initial_value` or
/// `years` is not positive.
pub fn calculate_cagr(initial_value: f64, final_value: f64, years: f64) -> f64 {
    if initial_value <= 0.0 || years <= 0.0 {
        return 0.0;
    }
    (final_value / initial_value).powf(1.0 / years) - 1.0
}

/// Fractional change from `previous` to `current`.
///
/// Undefined, and therefore `None`, when `previous` is not positive.
pub fn pct_change(previous: f64, current: f64) -> Option<f64> {
    (previous > 0.0).then(|| current / previous - 1.0)
}

/// Daily returns of consecutive closes; the first close has none.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter_map(|w| pct_change(w[0], w[1]))
        .collect()
}

/// Population standard deviation; 0.0 for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Standard deviation of daily returns scaled by sqrt(252).
pub fn annualized_volatility(closes: &[f64]) -> f64 {
    population_std_dev(&daily_returns(closes)) * (TRADING_DAYS_PER_YEAR as f64).sqrt()
}

/// Index of the price `offset` trading days before the last one.
///
/// Falls back to index 0 when the series holds fewer than `offset + 1`
/// prices. `None` for an empty series.
pub fn base_index(len: usize, offset: usize) -> Option<usize> {
    match len {
        0 => None,
        n if n > offset => Some(n - 1 - offset),
        _ => Some(0),
    }
}

/// Compute CAGR for every [`ReturnWindow`] plus annualized volatility.
///
/// A short series still reports all three windows: the base price falls back
/// to the first close while the exponent stays at 1, 3 or 5 years.
pub fn compute_performance_report(series: &PriceSeries) -> Result<PerformanceReport> {
    let closes = series.closes();
    let Some(&current_price) = closes.last() else {
        return Err(DashboardError::InsufficientData(
            "price series is empty".to_string(),
        ));
    };

    let windows = ReturnWindow::ALL.map(|window| {
        let offset = window.trading_days();
        let base_index = base_index(closes.len(), offset).unwrap_or(0);
        let base_price = closes[base_index];
        WindowReturn {
            window,
            base_index,
            base_price,
            cagr: calculate_cagr(base_price, current_price, f64::from(window.nominal_years())),
            full_history: closes.len() > offset,
        }
    });

    let returns = daily_returns(&closes);
    let daily_volatility = population_std_dev(&returns);

    Ok(PerformanceReport {
        current_price,
        windows,
        daily_volatility,
        annualized_volatility: daily_volatility * (TRADING_DAYS_PER_YEAR as f64).sqrt(),
        return_count: returns.len(),
    })
}
