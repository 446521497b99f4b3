//! Plain-text rendering of dashboard pages.

use anyhow::Result;
use finboard_core::display::{AxisValues, ChartSpec, MetricDisplay, TableSpec};
use finboard_dashboard::{Block, Page};
use polars::prelude::DataFrame;

/// Print a page to stdout. `table_rows` caps raw tables; `None` prints them whole.
pub fn print_page(page: &Page, table_rows: Option<usize>) -> Result<()> {
    println!("{}", page.title);
    println!("{}", "=".repeat(page.title.chars().count()));

    for tab in &page.tabs {
        println!();
        println!("[{}]", tab.title);
        for section in &tab.sections {
            println!();
            println!("  {}", section.heading);
            println!("  {}", "-".repeat(section.heading.chars().count()));
            for block in &section.blocks {
                print_block(block, table_rows)?;
            }
        }
    }
    println!();
    Ok(())
}

fn print_block(block: &Block, table_rows: Option<usize>) -> Result<()> {
    match block {
        Block::Metrics { items } => {
            for item in items {
                println!("  {}", metric_line(item));
            }
        }
        Block::Lines { title, lines } => {
            println!("  {}", metric_line(title));
            for line in lines {
                println!("    - {}", metric_line(line));
            }
        }
        Block::Chart { chart } => print_chart(chart),
        Block::Table { table } => {
            let df = table_frame(table, table_rows)?;
            println!("  {}", table.title);
            println!("{df}");
        }
    }
    Ok(())
}

fn metric_line(metric: &MetricDisplay) -> String {
    match &metric.delta {
        Some(delta) => format!("{:<36} {:>16}  ({})", metric.label, metric.value, delta.text),
        None => format!("{:<36} {:>16}", metric.label, metric.value),
    }
}

fn print_chart(chart: &ChartSpec) {
    let fields: Vec<&str> = chart.y.iter().map(|a| a.label.as_str()).collect();
    match &chart.x {
        Some(x) => println!(
            "  <{} chart> {}: {} points, x = {}, y = {}",
            chart.kind.name(),
            chart.title,
            chart.point_count(),
            x.label,
            fields.join(", ")
        ),
        None => println!(
            "  <{} chart> {}: {} points, y = {}",
            chart.kind.name(),
            chart.title,
            chart.point_count(),
            fields.join(", ")
        ),
    }

    // Short categorical charts (pies, donuts, top-N bars) list their values.
    if let (Some(x), Some(y)) = (&chart.x, chart.y.first()) {
        if let (AxisValues::Labels(names), AxisValues::Numbers(values)) = (&x.values, &y.values) {
            if names.len() <= 20 {
                for (name, value) in names.iter().zip(values) {
                    println!("      {name:<24} {value:>18.2}");
                }
            }
        }
    }
}

fn table_frame(table: &TableSpec, rows: Option<usize>) -> Result<DataFrame> {
    let df = table.to_dataframe()?;
    Ok(match rows {
        Some(n) => df.tail(Some(n)),
        None => df,
    })
}
