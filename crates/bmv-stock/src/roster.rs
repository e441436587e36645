//! Ticker roster: the allow-list of symbols offered by a deployment.
//!
//! The roster is stored as a TOML resource with one `[[tickers]]` table per
//! listed instrument. The default roster is bundled from
//! `config/tickers.toml`; a replacement can be loaded from any path.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

const BUNDLED_ROSTER: &str = include_str!("../config/tickers.toml");

/// Suffix Yahoo uses for BMV listings
const BMV_SUFFIX: &str = ".MX";

/// One roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub symbol: String,
    /// Display name shown when the provider has no long name
    pub name: String,
}

/// A symbol that belongs to the roster.
///
/// Only [`Roster::ticker`] hands these out, so holding a `Ticker` means the
/// symbol passed the allow-list check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker {
    symbol: String,
    display_name: String,
}

impl Ticker {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Name from the roster, used as a fallback label
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Symbol without the exchange suffix, e.g. `WALMEX` for `WALMEX.MX`
    pub fn company_ref(&self) -> &str {
        self.symbol
            .strip_suffix(BMV_SUFFIX)
            .unwrap_or(&self.symbol)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// The complete roster configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    tickers: Vec<RosterEntry>,
}

impl Roster {
    /// The roster shipped with the crate
    pub fn bundled() -> Result<Self> {
        Self::from_toml(BUNDLED_ROSTER)
    }

    /// Load a roster from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let roster: Self = bmv_utils::load_toml(path)?;
        roster.validate()?;
        Ok(roster)
    }

    /// Parse a roster from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let roster: Self = bmv_utils::parse_toml(content)?;
        roster.validate()?;
        Ok(roster)
    }

    /// Load from `path` when given, otherwise the bundled roster
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.tickers.is_empty() {
            return Err(DashboardError::Config("roster has no tickers".to_string()));
        }

        let mut seen = HashSet::new();
        for entry in &self.tickers {
            let symbol = entry.symbol.trim();
            if symbol.is_empty() {
                return Err(DashboardError::Config(
                    "roster entry with empty symbol".to_string(),
                ));
            }
            if !seen.insert(symbol.to_uppercase()) {
                return Err(DashboardError::Config(format!(
                    "duplicate roster symbol: {symbol}"
                )));
            }
        }
        Ok(())
    }

    /// Entries in file order
    pub fn tickers(&self) -> &[RosterEntry] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Resolve a symbol, case-insensitively, against the allow-list
    pub fn ticker(&self, symbol: &str) -> Result<Ticker> {
        let wanted = symbol.trim();
        self.tickers
            .iter()
            .find(|entry| entry.symbol.trim().eq_ignore_ascii_case(wanted))
            .map(|entry| Ticker {
                symbol: entry.symbol.trim().to_string(),
                display_name: entry.name.clone(),
            })
            .ok_or_else(|| DashboardError::InvalidTicker(wanted.to_string()))
    }

    /// Resolve a 1-based position as shown in menus
    pub fn ticker_at(&self, position: usize) -> Option<Ticker> {
        let entry = self.tickers.get(position.checked_sub(1)?)?;
        self.ticker(&entry.symbol).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_roster_lists_bmv_symbols() {
        let roster = Roster::bundled().unwrap();
        assert_eq!(roster.len(), 19);
        assert_eq!(roster.tickers()[0].symbol, "WALMEX.MX");
        assert!(roster.tickers().iter().all(|t| t.symbol.ends_with(".MX")));
    }

    #[test]
    fn ticker_lookup_is_case_insensitive() {
        let roster = Roster::bundled().unwrap();
        let ticker = roster.ticker("walmex.mx").unwrap();
        assert_eq!(ticker.symbol(), "WALMEX.MX");
        assert_eq!(ticker.company_ref(), "WALMEX");
        assert_eq!(ticker.display_name(), "Walmart de México y Centroamérica");
    }

    #[test]
    fn unknown_symbol_is_invalid_ticker() {
        let roster = Roster::bundled().unwrap();
        let err = roster.ticker("AAPL").unwrap_err();
        assert_eq!(err, DashboardError::InvalidTicker("AAPL".to_string()));
    }

    #[test]
    fn ticker_at_is_one_based() {
        let roster = Roster::bundled().unwrap();
        assert_eq!(roster.ticker_at(1).unwrap().symbol(), "WALMEX.MX");
        assert!(roster.ticker_at(0).is_none());
        assert!(roster.ticker_at(20).is_none());
    }

    #[test]
    fn custom_roster_replaces_bundled() {
        let roster = Roster::from_toml(
            r#"
            [[tickers]]
            symbol = "ORBIA.MX"
            name = "Orbia Advance"
            "#,
        )
        .unwrap();
        assert_eq!(roster.len(), 1);
        let orbia = roster.ticker("orbia.mx").unwrap();
        assert_eq!(orbia.display_name(), "Orbia Advance");
        assert!(roster.ticker("WALMEX.MX").is_err());
    }

    #[test]
    fn duplicate_and_empty_rosters_are_rejected() {
        let dup = Roster::from_toml(
            r#"
            [[tickers]]
            symbol = "Q.MX"
            name = "Quálitas"
            [[tickers]]
            symbol = "q.mx"
            name = "Quálitas again"
            "#,
        );
        assert!(matches!(dup, Err(DashboardError::Config(_))));

        let empty = Roster::from_toml("tickers = []");
        assert!(matches!(empty, Err(DashboardError::Config(_))));
    }

    #[test]
    fn company_ref_without_suffix() {
        let roster = Roster::from_toml(
            r#"
            [[tickers]]
            symbol = "AC"
            name = "Arca Continental"
            "#,
        )
        .unwrap();
        assert_eq!(roster.ticker("AC").unwrap().company_ref(), "AC");
    }
}
