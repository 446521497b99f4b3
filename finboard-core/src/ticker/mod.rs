//! Ticker price history.

pub mod provider;
pub mod yahoo;

pub use provider::{
    fetch_history, HistoryRequest, PricePoint, PriceProvider, PriceSeries, TickerError,
};
pub use yahoo::{YahooProvider, YahooSettings};
