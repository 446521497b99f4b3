//! Ticker price history page.

use finboard_core::display::{Axis, ChartKind, ChartSpec, DeltaColor, MetricDisplay, TableSpec};
use finboard_core::PriceSeries;

use crate::page::{Page, Section, Tab};
use crate::DashboardError;

/// Build the price history page for a fetched series.
pub fn build_ticker_page(series: &PriceSeries) -> Result<Page, DashboardError> {
    let symbol = series.symbol.to_uppercase();
    let points = &series.points;

    let mut last_close = MetricDisplay::new(
        "Last Close",
        series
            .last()
            .map(|p| format!("{:.2}", p.close))
            .unwrap_or_else(|| "n/a".to_string()),
    );
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        let change = last.close - first.close;
        if change.is_finite() {
            let pct = if first.close != 0.0 {
                format!(" ({:+.2}%)", change / first.close * 100.0)
            } else {
                String::new()
            };
            last_close = last_close.with_delta(format!("{change:+.2}{pct}"), DeltaColor::Normal);
        }
    }

    let dates: Vec<_> = points.iter().map(|p| p.date).collect();
    let closes: Vec<f64> = points.iter().map(|p| p.close).collect();

    let chart = ChartSpec::new(ChartKind::Line, format!("{symbol} Closing Price"))
        .x(Axis::dates("Date", dates.clone()))
        .y(Axis::numbers("Close", closes.clone()));

    let raw = TableSpec::new(
        format!("{symbol} Raw Data"),
        vec![
            Axis::dates("Date", dates),
            Axis::numbers("Open", points.iter().map(|p| p.open).collect()),
            Axis::numbers("High", points.iter().map(|p| p.high).collect()),
            Axis::numbers("Low", points.iter().map(|p| p.low).collect()),
            Axis::numbers("Close", closes),
            Axis::numbers("Volume", points.iter().map(|p| p.volume as f64).collect()),
        ],
    );

    let page = Page::new(format!("{symbol} Price History")).tab(
        Tab::new("Price History").section(
            Section::new("Closing Price")
                .metrics(vec![last_close])
                .chart(chart)
                .table(raw),
        ),
    );
    page.validate()?;
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Block;
    use chrono::NaiveDate;
    use finboard_core::display::AxisValues;
    use finboard_core::PricePoint;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries {
            symbol: "msft".into(),
            points: closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PricePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 2 + i as u32).unwrap(),
                    open: close - 1.0,
                    high: close + 1.0,
                    low: close - 2.0,
                    close,
                    volume: 1_000 * (i as u64 + 1),
                })
                .collect(),
        }
    }

    #[test]
    fn page_has_last_close_chart_and_raw_table() {
        let page = build_ticker_page(&series(&[100.0, 105.0, 110.0])).unwrap();
        assert_eq!(page.title, "MSFT Price History");

        let last = page.metric("Last Close").unwrap();
        assert_eq!(last.value, "110.00");
        let delta = last.delta.as_ref().unwrap();
        assert_eq!(delta.text, "+10.00 (+10.00%)");
        assert_eq!(delta.color, DeltaColor::Normal);

        let chart = page.charts().next().unwrap();
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.point_count(), 3);

        let table = page.tabs[0].sections[0]
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table { table } => Some(table),
                _ => None,
            })
            .unwrap();
        let names: Vec<_> = table.columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(names, ["Date", "Open", "High", "Low", "Close", "Volume"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns[5].values, AxisValues::Numbers(vec![1_000.0, 2_000.0, 3_000.0]));
    }

    #[test]
    fn falling_price_gets_negative_delta() {
        let page = build_ticker_page(&series(&[50.0, 40.0])).unwrap();
        let delta = page.metric("Last Close").unwrap().delta.clone().unwrap();
        assert_eq!(delta.text, "-10.00 (-20.00%)");
    }

    #[test]
    fn single_point_has_zero_change() {
        let page = build_ticker_page(&series(&[42.0])).unwrap();
        let delta = page.metric("Last Close").unwrap().delta.clone().unwrap();
        assert_eq!(delta.text, "+0.00 (+0.00%)");
    }
}
