//! Statement dashboard pages.
//!
//! `build_statement_page` is a pure function of the table, the request and the
//! settings: no state survives between calls.

use finboard_core::aggregate::{self, distinct_ids, mean, top_n, total};
use finboard_core::display::{Axis, BarMode, ChartKind, ChartSpec, DeltaColor, MetricDisplay};
use finboard_core::format::{count, currency, percent, percent_opt};
use finboard_core::record::USER_ID_COLUMN;
use finboard_core::{select, FinancialRecord, FinancialTable, Metric, Selection, View};

use crate::config::StatementSettings;
use crate::page::{Page, Section, Tab};
use crate::DashboardError;

const DONUT_HOLE: f64 = 0.4;

/// Request-scoped inputs for one statement render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRequest {
    pub selection: Selection,
}

impl StatementRequest {
    pub fn overview() -> Self {
        Self {
            selection: Selection::Overview,
        }
    }

    pub fn entity(id: impl Into<String>) -> Self {
        Self {
            selection: Selection::Entity(id.into()),
        }
    }
}

/// Build the page for a selection: overview or single-user drill-down.
pub fn build_statement_page(
    table: &FinancialTable,
    request: &StatementRequest,
    settings: &StatementSettings,
) -> Result<Page, DashboardError> {
    let page = match select(table, &request.selection)? {
        View::Aggregate(table) => overview_page(table, settings),
        View::Entity(record) => drilldown_page(table, record),
    };
    page.validate()?;
    tracing::debug!(
        selection = %request.selection,
        tabs = page.tabs.len(),
        charts = page.charts().count(),
        "built statement page"
    );
    Ok(page)
}

// ── Overview ─────────────────────────────────────────────────────────

fn overview_page(table: &FinancialTable, settings: &StatementSettings) -> Page {
    Page::new("Dashboard Overview: All Users")
        .tab(key_metrics_tab(table, settings))
        .tab(profitability_tab(table))
        .tab(balance_sheet_tab(table, settings))
}

fn key_metrics_tab(table: &FinancialTable, settings: &StatementSettings) -> Tab {
    let kpis = vec![
        MetricDisplay::new("Total Revenue", currency(total(table, Metric::Revenue))),
        MetricDisplay::new("Total Assets", currency(total(table, Metric::TotalAssets))),
        MetricDisplay::new(
            "Avg. Net Profit Margin",
            percent_opt(mean(table, Metric::NetProfitMargin)),
        ),
        MetricDisplay::new("Total Users", count(distinct_ids(table))),
    ];

    let histogram = ChartSpec::new(
        ChartKind::Histogram {
            bins: settings.histogram_bins,
        },
        "Revenue Frequency",
    )
    .x(Axis::numbers(
        Metric::Revenue.column_name(),
        aggregate::column(table, Metric::Revenue),
    ));

    let n = settings.top_revenue_users;
    let top = top_n(table, Metric::Revenue, n);
    let pie = ChartSpec::new(
        ChartKind::Pie { hole: 0.0 },
        format!("Revenue Contribution by Top {n} Users"),
    )
    .x(id_axis(&top))
    .y(metric_axis(&top, Metric::Revenue));

    Tab::new("Key Metrics & Distributions")
        .section(Section::new("Key Performance Indicators").metrics(kpis))
        .section(
            Section::new("Data Distributions")
                .chart(histogram)
                .chart(pie),
        )
}

fn profitability_tab(table: &FinancialTable) -> Tab {
    let spread = ChartSpec::new(ChartKind::Box, "Spread of Net Profit Margin").y(Axis::numbers(
        Metric::NetProfitMargin.column_name(),
        aggregate::column(table, Metric::NetProfitMargin),
    ));

    let scatter = ChartSpec::new(ChartKind::Scatter, "Profitability vs. Scale")
        .x(Axis::numbers(
            Metric::Revenue.column_name(),
            aggregate::column(table, Metric::Revenue),
        )
        .labelled("Total Revenue"))
        .y(Axis::numbers(
            Metric::NetProfit.column_name(),
            aggregate::column(table, Metric::NetProfit),
        )
        .labelled("Net Profit"));

    Tab::new("Profitability Analysis").section(
        Section::new("Profitability Analysis")
            .chart(spread)
            .chart(scatter),
    )
}

fn balance_sheet_tab(table: &FinancialTable, settings: &StatementSettings) -> Tab {
    let n = settings.top_asset_users;
    let top = top_n(table, Metric::TotalAssets, n);
    let bars = ChartSpec::new(
        ChartKind::Bar {
            mode: BarMode::Group,
        },
        "Assets vs. Liabilities",
    )
    .x(id_axis(&top))
    .y(metric_axis(&top, Metric::TotalAssets))
    .y(metric_axis(&top, Metric::TotalLiabilities));

    Tab::new("Balance Sheet Insights").section(
        Section::new(format!("Assets vs. Liabilities (Top {n} Users by Assets)")).chart(bars),
    )
}

fn id_axis(rows: &[&FinancialRecord]) -> Axis {
    Axis::labels(
        USER_ID_COLUMN,
        rows.iter().map(|r| r.user_id.clone()).collect(),
    )
}

fn metric_axis(rows: &[&FinancialRecord], metric: Metric) -> Axis {
    Axis::numbers(
        metric.column_name(),
        rows.iter().map(|r| r.get(metric)).collect(),
    )
}

// ── Drill-down ───────────────────────────────────────────────────────

fn drilldown_page(table: &FinancialTable, record: &FinancialRecord) -> Page {
    Page::new(format!("Financial Statement for User: {}", record.user_id))
        .tab(summary_tab(record))
        .tab(margin_tab(table, record))
        .tab(composition_tab(record))
}

fn summary_tab(record: &FinancialRecord) -> Tab {
    let money =
        |label: &str, metric: Metric| MetricDisplay::new(label, currency(record.get(metric)));

    let income = vec![
        money("Revenue", Metric::Revenue),
        money("COGS", Metric::Cogs),
        money("Gross Profit", Metric::GrossProfit),
        money("Net Profit", Metric::NetProfit),
    ];

    Tab::new("Financial Summary")
        .section(Section::new("Income Statement Highlights").metrics(income))
        .section(
            Section::new("Balance Sheet Summary")
                .lines(
                    money("Total Assets", Metric::TotalAssets),
                    vec![
                        money("Cash and Bank", Metric::CashAndBankBalance),
                        money("Accounts Receivable", Metric::AccountReceivables),
                    ],
                )
                .lines(
                    money("Total Liabilities", Metric::TotalLiabilities),
                    vec![
                        money("Accounts Payable", Metric::AccountPayables),
                        money("Wages Payable", Metric::WagesPayable),
                    ],
                ),
        )
}

fn margin_tab(table: &FinancialTable, record: &FinancialRecord) -> Tab {
    let ratio =
        |label: &str, metric: Metric| MetricDisplay::new(label, percent(record.get(metric)));
    let ratios = vec![
        ratio("Gross Profit Margin", Metric::GrossProfitMargin),
        ratio("Operating Expense Ratio", Metric::OperatingExpenseRatio),
        ratio("Net Profit Margin", Metric::NetProfitMargin),
    ];

    let avg = mean(table, Metric::NetProfitMargin);
    let mut average = MetricDisplay::new("Company Average Net Profit Margin", percent_opt(avg));
    if let Some(avg) = avg {
        let delta = record.net_profit_margin - avg;
        if delta.is_finite() {
            average = average.with_delta(format!("{delta:.2}% vs. Average"), DeltaColor::Inverse);
        }
    }

    Tab::new("Margin Analysis")
        .section(Section::new("Profitability Ratios").metrics(ratios))
        .section(Section::new("Net Profit Margin vs. Average").metrics(vec![average]))
}

fn composition_tab(record: &FinancialRecord) -> Tab {
    let donut = |title: &str, parts: [(&str, Metric); 4]| {
        ChartSpec::new(ChartKind::Pie { hole: DONUT_HOLE }, title)
            .x(Axis::labels(
                "Component",
                parts.iter().map(|(name, _)| name.to_string()).collect(),
            ))
            .y(Axis::numbers(
                "Value",
                parts.iter().map(|(_, m)| record.get(*m)).collect(),
            ))
    };

    let assets = donut(
        "Assets",
        [
            ("Cash/Bank", Metric::CashAndBankBalance),
            ("Receivables", Metric::AccountReceivables),
            ("Inventory", Metric::Inventory),
            ("Deposits/Advances", Metric::DepositsAdvancesPrepayments),
        ],
    );
    let liabilities = donut(
        "Liabilities",
        [
            ("Payables", Metric::AccountPayables),
            ("Wages", Metric::WagesPayable),
            ("Provisions", Metric::ProvisionsAccruals),
            ("Other", Metric::OtherPayables),
        ],
    );

    Tab::new("Asset & Liability Breakdown").section(
        Section::new("Composition Breakdown")
            .chart(assets)
            .chart(liabilities),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use finboard_core::display::AxisValues;
    use finboard_core::ViewError;

    fn record(id: &str, revenue: f64, npm: f64, assets: f64) -> FinancialRecord {
        let mut values = [0.0; Metric::COUNT];
        values[0] = revenue;
        values[4] = npm;
        values[7] = assets;
        values[8] = assets / 2.0;
        FinancialRecord::from_values(id, values)
    }

    fn table() -> FinancialTable {
        FinancialTable::new(vec![
            record("A", 100.0, 10.0, 1_000.0),
            record("B", 300.0, 20.0, 5_000.0),
            record("C", 200.0, 30.0, 3_000.0),
        ])
    }

    fn page_for(request: StatementRequest) -> Result<Page, DashboardError> {
        build_statement_page(&table(), &request, &StatementSettings::default())
    }

    #[test]
    fn overview_kpis_are_formatted() {
        let page = page_for(StatementRequest::overview()).unwrap();
        assert_eq!(page.title, "Dashboard Overview: All Users");
        assert_eq!(page.tabs.len(), 3);
        assert_eq!(page.metric("Total Revenue").unwrap().value, "$600");
        assert_eq!(page.metric("Total Assets").unwrap().value, "$9,000");
        assert_eq!(page.metric("Avg. Net Profit Margin").unwrap().value, "20.00%");
        assert_eq!(page.metric("Total Users").unwrap().value, "3");
    }

    #[test]
    fn overview_top_n_charts_follow_settings() {
        let settings = StatementSettings {
            top_revenue_users: 2,
            top_asset_users: 1,
            histogram_bins: 5,
        };
        let page =
            build_statement_page(&table(), &StatementRequest::overview(), &settings).unwrap();
        let charts: Vec<_> = page.charts().collect();
        assert_eq!(charts.len(), 5);

        assert_eq!(charts[0].kind, ChartKind::Histogram { bins: 5 });

        let pie = charts[1];
        assert_eq!(pie.title, "Revenue Contribution by Top 2 Users");
        assert_eq!(
            pie.x.as_ref().unwrap().values,
            AxisValues::Labels(vec!["B".into(), "C".into()])
        );

        let bars = charts[4];
        assert_eq!(bars.y.len(), 2);
        assert_eq!(bars.y[0].values, AxisValues::Numbers(vec![5_000.0]));
        assert_eq!(bars.y[1].values, AxisValues::Numbers(vec![2_500.0]));
    }

    #[test]
    fn drilldown_shows_delta_against_average() {
        let page = page_for(StatementRequest::entity("C")).unwrap();
        assert_eq!(page.title, "Financial Statement for User: C");
        assert_eq!(page.metric("Revenue").unwrap().value, "$200");
        assert_eq!(page.metric("Net Profit Margin").unwrap().value, "30.00%");

        let avg = page.metric("Company Average Net Profit Margin").unwrap();
        assert_eq!(avg.value, "20.00%");
        let delta = avg.delta.as_ref().unwrap();
        assert_eq!(delta.text, "10.00% vs. Average");
        assert_eq!(delta.color, DeltaColor::Inverse);
    }

    #[test]
    fn drilldown_donuts_have_four_components() {
        let page = page_for(StatementRequest::entity("A")).unwrap();
        let donuts: Vec<_> = page.charts().collect();
        assert_eq!(donuts.len(), 2);
        for donut in donuts {
            assert_eq!(donut.kind, ChartKind::Pie { hole: 0.4 });
            assert_eq!(donut.point_count(), 4);
        }
    }

    #[test]
    fn unknown_user_surfaces_not_found() {
        let err = page_for(StatementRequest::entity("Z")).unwrap_err();
        assert!(matches!(err, DashboardError::View(ViewError::NotFound { .. })));
    }

    #[test]
    fn empty_table_overview_renders() {
        let page = build_statement_page(
            &FinancialTable::default(),
            &StatementRequest::overview(),
            &StatementSettings::default(),
        )
        .unwrap();
        assert_eq!(page.metric("Total Revenue").unwrap().value, "$0");
        assert_eq!(page.metric("Avg. Net Profit Margin").unwrap().value, "n/a");
        assert_eq!(page.metric("Total Users").unwrap().value, "0");
    }
}
