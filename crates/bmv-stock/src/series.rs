//! Price series shaping for charts and metrics.
//!
//! Provider rows go in, a validated [`PriceSeries`] comes out. Charts use a
//! separate derived table, [`ChartSeries`], so the daily-return column is
//! computed once and the source series is never modified.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::HistoryRow;
use crate::error::{DashboardError, Result};
use crate::metrics::pct_change;

/// One close price on one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Close prices in strictly increasing date order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, checking the ordering and value invariant
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        for window in points.windows(2) {
            if window[1].date <= window[0].date {
                return Err(DashboardError::InvalidSeries(format!(
                    "dates not strictly increasing at {}",
                    window[1].date
                )));
            }
        }
        if let Some(bad) = points.iter().find(|p| !p.close.is_finite() || p.close < 0.0) {
            return Err(DashboardError::InvalidSeries(format!(
                "invalid close {} on {}",
                bad.close, bad.date
            )));
        }
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Series of consecutive calendar days starting at `start`
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Result<Self> {
        let points = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&close, date)| PricePoint { date, close })
            .collect();
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Turn raw provider rows into a [`PriceSeries`].
///
/// Keeps only the close column. Rows are ordered by timestamp; when a date
/// repeats the row with the latest timestamp wins. Rows with a non-finite or
/// negative close are dropped. Missing trading days stay missing.
pub fn shape_history(rows: &[HistoryRow]) -> PriceSeries {
    let mut valid: Vec<&HistoryRow> = rows
        .iter()
        .filter(|row| row.close.is_finite() && row.close >= 0.0)
        .collect();
    valid.sort_by_key(|row| row.timestamp);

    let mut points: Vec<PricePoint> = Vec::with_capacity(valid.len());
    for row in valid {
        let point = PricePoint {
            date: row.timestamp.date_naive(),
            close: row.close,
        };
        match points.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => points.push(point),
        }
    }

    let dropped = rows.len() - points.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Discarded invalid or duplicate history rows");
    }

    PriceSeries { points }
}

/// Range selector windows of the price chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartRange {
    OneMonth,
    SixMonths,
    OneYear,
    ThreeYears,
    All,
}

impl ChartRange {
    /// Selector order, shortest first
    pub const ALL: [ChartRange; 5] = [
        ChartRange::OneMonth,
        ChartRange::SixMonths,
        ChartRange::OneYear,
        ChartRange::ThreeYears,
        ChartRange::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartRange::OneMonth => "1m",
            ChartRange::SixMonths => "6m",
            ChartRange::OneYear => "1y",
            ChartRange::ThreeYears => "3y",
            ChartRange::All => "Todo",
        }
    }

    fn months(self) -> Option<u32> {
        match self {
            ChartRange::OneMonth => Some(1),
            ChartRange::SixMonths => Some(6),
            ChartRange::OneYear => Some(12),
            ChartRange::ThreeYears => Some(36),
            ChartRange::All => None,
        }
    }

    /// First date included when the window ends on `end`
    pub fn start_from(self, end: NaiveDate) -> Option<NaiveDate> {
        end.checked_sub_months(Months::new(self.months()?))
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the chart table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: f64,
    /// Change from the previous close; absent on the first row
    pub daily_return: Option<f64>,
}

/// Summary of a chart window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartMetadata {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_close: f64,
    pub max_close: f64,
    pub data_points: usize,
}

/// Chart-ready table derived from a [`PriceSeries`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn from_series(series: &PriceSeries) -> Self {
        let mut previous: Option<f64> = None;
        let points = series
            .points()
            .iter()
            .map(|p| {
                let daily_return = previous.and_then(|prev| pct_change(prev, p.close));
                previous = Some(p.close);
                ChartPoint {
                    date: p.date,
                    close: p.close,
                    daily_return,
                }
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Defined daily returns, in date order
    pub fn returns(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|p| p.daily_return)
    }

    /// Rows inside `range`, counted back from the last row
    pub fn trailing(&self, range: ChartRange) -> ChartSeries {
        let Some(start) = self.points.last().and_then(|p| range.start_from(p.date)) else {
            return self.clone();
        };
        let points = self
            .points
            .iter()
            .copied()
            .skip_while(|p| p.date < start)
            .collect();
        ChartSeries { points }
    }

    /// Change between the first and last close of `range`
    pub fn range_change(&self, range: ChartRange) -> Option<f64> {
        let window = self.trailing(range);
        let first = window.points.first()?;
        let last = window.points.last()?;
        pct_change(first.close, last.close)
    }

    pub fn metadata(&self) -> Option<ChartMetadata> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        let (min_close, max_close) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.close), hi.max(p.close))
            });
        Some(ChartMetadata {
            start_date: first.date,
            end_date: last.date,
            min_close,
            max_close,
            data_points: self.points.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(ts: &str, close: f64) -> HistoryRow {
        HistoryRow {
            timestamp: ts.parse::<DateTime<Utc>>().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn shape_sorts_and_keeps_close_only() {
        let rows = vec![
            row("2024-03-05T14:30:00Z", 52.0),
            row("2024-03-01T14:30:00Z", 50.0),
            row("2024-03-04T14:30:00Z", 51.0),
        ];
        let series = shape_history(&rows);
        assert_eq!(series.closes(), vec![50.0, 51.0, 52.0]);
        assert_eq!(series.first().unwrap().date, date(2024, 3, 1));
        // weekend gap is kept as a gap
        assert_eq!(series.points()[1].date, date(2024, 3, 4));
    }

    #[test]
    fn shape_drops_invalid_rows_and_duplicate_dates() {
        let rows = vec![
            row("2024-03-01T14:30:00Z", 50.0),
            row("2024-03-01T20:00:00Z", 50.5),
            row("2024-03-04T14:30:00Z", f64::NAN),
            row("2024-03-05T14:30:00Z", -1.0),
            row("2024-03-06T14:30:00Z", 49.0),
        ];
        let series = shape_history(&rows);
        assert_eq!(series.closes(), vec![50.5, 49.0]);
    }

    #[test]
    fn shape_keeps_latest_timestamp_for_repeated_date() {
        let rows = vec![
            row("2024-03-01T20:00:00Z", 50.5),
            row("2024-03-01T14:30:00Z", 50.0),
            row("2024-03-04T14:30:00Z", 51.0),
        ];
        let series = shape_history(&rows);
        assert_eq!(series.closes(), vec![50.5, 51.0]);
    }

    #[test]
    fn shape_does_not_touch_input() {
        let rows = vec![
            row("2024-03-05T14:30:00Z", 2.0),
            row("2024-03-01T14:30:00Z", 1.0),
        ];
        let before = rows.clone();
        let _ = shape_history(&rows);
        assert_eq!(rows, before);
    }

    #[test]
    fn new_rejects_unordered_or_negative() {
        let unordered = vec![
            PricePoint {
                date: date(2024, 1, 2),
                close: 1.0,
            },
            PricePoint {
                date: date(2024, 1, 2),
                close: 1.0,
            },
        ];
        assert!(matches!(
            PriceSeries::new(unordered),
            Err(DashboardError::InvalidSeries(_))
        ));

        let negative = vec![PricePoint {
            date: date(2024, 1, 2),
            close: -3.0,
        }];
        assert!(PriceSeries::new(negative).is_err());
    }

    #[test]
    fn chart_series_first_return_is_absent() {
        let series = PriceSeries::from_closes(date(2024, 1, 1), &[100.0, 110.0, 99.0]).unwrap();
        let chart = ChartSeries::from_series(&series);

        assert_eq!(chart.len(), 3);
        assert_eq!(chart.points()[0].daily_return, None);
        let up = chart.points()[1].daily_return.unwrap();
        let down = chart.points()[2].daily_return.unwrap();
        assert!((up - 0.10).abs() < 1e-12);
        assert!((down + 0.10).abs() < 1e-12);
        assert_eq!(chart.returns().count(), 2);
        // source series is unchanged
        assert_eq!(series.closes(), vec![100.0, 110.0, 99.0]);
    }

    #[test]
    fn trailing_ranges_count_back_from_last_date() {
        let closes: Vec<f64> = (0..400).map(|i| 100.0 + f64::from(i)).collect();
        let series = PriceSeries::from_closes(date(2023, 1, 1), &closes).unwrap();
        let chart = ChartSeries::from_series(&series);
        let last = chart.points().last().unwrap().date;

        let month = chart.trailing(ChartRange::OneMonth);
        assert_eq!(
            month.points().first().unwrap().date,
            last.checked_sub_months(Months::new(1)).unwrap()
        );
        assert_eq!(month.points().last().unwrap().date, last);

        assert_eq!(chart.trailing(ChartRange::All).len(), 400);
        assert_eq!(chart.trailing(ChartRange::ThreeYears).len(), 400);
    }

    #[test]
    fn range_change_and_metadata() {
        let series =
            PriceSeries::from_closes(date(2024, 1, 1), &[10.0, 8.0, 12.0, 15.0]).unwrap();
        let chart = ChartSeries::from_series(&series);

        let change = chart.range_change(ChartRange::All).unwrap();
        assert!((change - 0.5).abs() < 1e-12);

        let meta = chart.metadata().unwrap();
        assert_eq!(meta.start_date, date(2024, 1, 1));
        assert_eq!(meta.end_date, date(2024, 1, 4));
        assert_eq!(meta.min_close, 8.0);
        assert_eq!(meta.max_close, 15.0);
        assert_eq!(meta.data_points, 4);

        assert!(ChartSeries::default().metadata().is_none());
    }

    #[test]
    fn range_labels_match_selector() {
        let labels: Vec<&str> = ChartRange::ALL.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["1m", "6m", "1y", "3y", "Todo"]);
    }
}
