//! Yahoo Finance price provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API with a blocking client.
//! One request per fetch: no retries, no circuit breaker. Failures surface to
//! the caller as `TickerError`.

use std::time::Duration;

use serde::Deserialize;

use super::provider::{HistoryRequest, PriceProvider, PricePoint, PriceSeries, TickerError};

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Connection settings for the chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for YahooSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Yahoo Finance price provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
}

impl YahooProvider {
    pub fn new(settings: &YahooSettings) -> Result<Self, TickerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| TickerError::Network(format!("failed to build HTTP client: {e}")))?;
        let base_url = reqwest::Url::parse(&settings.base_url).map_err(|e| {
            TickerError::Network(format!("invalid base URL '{}': {e}", settings.base_url))
        })?;

        Ok(Self { client, base_url })
    }

    /// Build the chart API URL for a symbol; the symbol is percent-encoded as a path segment.
    fn chart_url(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> Result<reqwest::Url, TickerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TickerError::Network(format!("base URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("range", &request.range)
            .append_pair("interval", &request.interval);
        Ok(url)
    }

    /// Parse the chart API response into price points.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<PricePoint>, TickerError> {
        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) if err.code == "Not Found" => {
                return Err(TickerError::EmptySeries {
                    symbol: symbol.to_string(),
                })
            }
            (None, Some(err)) => {
                return Err(TickerError::Provider(format!("{}: {}", err.code, err.description)))
            }
            (None, None) => return Err(TickerError::Provider("empty result with no error".into())),
        };

        let Some(data) = result.into_iter().next() else {
            return Err(TickerError::EmptySeries {
                symbol: symbol.to_string(),
            });
        };

        // No timestamps means no trading history in the window.
        let timestamps = data.timestamp.unwrap_or_default();

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| TickerError::Provider("no quote data".into()))?;

        let mut points = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| TickerError::Provider(format!("invalid timestamp: {ts}")))?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Skip rows where all OHLCV are None (holidays/non-trading days)
            if open.is_none()
                && high.is_none()
                && low.is_none()
                && close.is_none()
                && volume.is_none()
            {
                continue;
            }

            points.push(PricePoint {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
            });
        }

        if points.is_empty() {
            return Err(TickerError::EmptySeries {
                symbol: symbol.to_string(),
            });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbol: &str, request: &HistoryRequest) -> Result<PriceSeries, TickerError> {
        let url = self.chart_url(symbol, request)?;
        tracing::debug!(%url, "requesting chart");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| TickerError::Network(e.to_string()))?;

        let status = resp.status();
        // Yahoo answers unknown symbols with 404 and a chart.error body.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(TickerError::Network(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            TickerError::Provider(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let points = Self::parse_response(symbol, chart)?;
        Ok(PriceSeries {
            symbol: symbol.to_string(),
            points,
        })
    }
}
