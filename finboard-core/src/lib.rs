//! finboard core: statement tables, aggregates, view selection, ticker history.
//!
//! This crate contains everything the dashboards compute:
//! - Financial record and table types
//! - Spreadsheet loader (xlsx/xls/ods via calamine, csv) and a content-addressed load cache
//! - Aggregates over the table (total, mean, distinct count, stable top-N)
//! - View selection (overview or single-entity drill-down)
//! - Ticker price history behind a provider trait, with a Yahoo implementation
//! - Renderer-boundary values (metrics, chart specs, raw tables) and number formatting

pub mod aggregate;
pub mod cache;
pub mod display;
pub mod format;
pub mod loader;
pub mod record;
pub mod ticker;
pub mod view;

pub use cache::{CacheStats, LoadCache};
pub use display::{
    Axis, AxisValues, BarMode, ChartError, ChartKind, ChartSpec, DeltaColor, MetricDisplay,
    TableSpec,
};
pub use loader::{load_table, ParseError};
pub use record::{FinancialRecord, FinancialTable, Metric};
pub use ticker::{
    fetch_history, HistoryRequest, PricePoint, PriceProvider, PriceSeries, TickerError,
};
pub use view::{select, selector_options, Selection, View, ViewError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: shared types are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<FinancialTable>();
        require_sync::<FinancialTable>();
        require_send::<LoadCache>();
        require_sync::<LoadCache>();
        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<ChartSpec>();
        require_sync::<ChartSpec>();
        require_send::<ticker::YahooProvider>();
        require_sync::<ticker::YahooProvider>();
        require_send::<ParseError>();
        require_sync::<ParseError>();
        require_send::<TickerError>();
        require_sync::<TickerError>();
    }

    #[test]
    fn price_provider_is_object_safe() {
        fn _takes_provider(p: &dyn PriceProvider) -> &str {
            p.name()
        }
    }
}
