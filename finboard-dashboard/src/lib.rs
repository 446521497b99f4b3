//! finboard dashboard: page composition for statements and ticker history.
//!
//! Turns core data into render-ready pages. Pages are plain serializable
//! values; the CLI prints them as text or hands them out as JSON.

pub mod config;
pub mod page;
pub mod statements;
pub mod ticker;

use finboard_core::{ChartError, TickerError, ViewError};
use thiserror::Error;

pub use config::{ConfigError, DashboardConfig, StatementSettings, TickerSettings};
pub use page::{Block, Page, Section, Tab};
pub use statements::{build_statement_page, StatementRequest};
pub use ticker::build_ticker_page;

/// Errors from building a dashboard page.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Ticker(#[from] TickerError),
}
