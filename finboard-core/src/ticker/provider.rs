//! Price provider trait, series types and structured error types.
//!
//! The `PriceProvider` trait abstracts over market-data sources so the HTTP
//! implementation can be swapped or mocked in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily OHLCV row as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Price history for one symbol, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Window and granularity of a history request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Provider range token, e.g. `1y`.
    pub range: String,
    /// Bar interval token, e.g. `1d`.
    pub interval: String,
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self {
            range: "1y".to_string(),
            interval: "1d".to_string(),
        }
    }
}

/// Errors from fetching a ticker's history.
///
/// These are designed to be displayable directly to the user.
#[derive(Debug, Error)]
pub enum TickerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned an unexpected response: {0}")]
    Provider(String),

    #[error("no price history for '{symbol}' in the requested window")]
    EmptySeries { symbol: String },
}

/// Trait for market-data providers.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily price history for a symbol.
    fn fetch(&self, symbol: &str, request: &HistoryRequest) -> Result<PriceSeries, TickerError>;
}

/// Fetch history and reject an empty series, whichever provider is used.
pub fn fetch_history(
    provider: &dyn PriceProvider,
    symbol: &str,
    request: &HistoryRequest,
) -> Result<PriceSeries, TickerError> {
    let symbol = symbol.trim();
    tracing::info!(
        provider = provider.name(),
        symbol,
        range = %request.range,
        "fetching price history"
    );

    let series = provider.fetch(symbol, request)?;
    if series.is_empty() {
        return Err(TickerError::EmptySeries {
            symbol: symbol.to_string(),
        });
    }

    tracing::info!(symbol, rows = series.len(), "price history loaded");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Vec<PricePoint>);

    impl PriceProvider for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn fetch(&self, symbol: &str, _: &HistoryRequest) -> Result<PriceSeries, TickerError> {
            Ok(PriceSeries {
                symbol: symbol.to_string(),
                points: self.0.clone(),
            })
        }
    }

    fn point(day: u32, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 10,
        }
    }

    #[test]
    fn empty_series_is_an_error() {
        let err = fetch_history(&Canned(vec![]), "ZZZZ", &HistoryRequest::default()).unwrap_err();
        assert!(matches!(err, TickerError::EmptySeries { ref symbol } if symbol == "ZZZZ"));
    }

    #[test]
    fn symbol_is_trimmed_before_fetch() {
        let series =
            fetch_history(&Canned(vec![point(1, 10.0)]), "  AAPL ", &HistoryRequest::default())
                .unwrap();
        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.last().unwrap().close, 10.0);
    }

    #[test]
    fn default_request_is_one_year_daily() {
        let req = HistoryRequest::default();
        assert_eq!(req.range, "1y");
        assert_eq!(req.interval, "1d");
    }
}
