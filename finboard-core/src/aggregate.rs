//! Whole-table aggregates: totals, means, distinct counts, top-N.
//!
//! Missing values (`NaN`) are skipped by `total` and `mean`, and sort after
//! every number in `top_n`.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::record::{FinancialRecord, FinancialTable, Metric};

/// Sum of a column over non-missing values. `0.0` for an empty table.
pub fn total(table: &FinancialTable, metric: Metric) -> f64 {
    present(table, metric).fold(0.0, |acc, v| acc + v)
}

/// Mean of a column over non-missing values.
pub fn mean(table: &FinancialTable, metric: Metric) -> Option<f64> {
    let (sum, count) = present(table, metric).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Number of distinct UserIDs.
pub fn distinct_ids(table: &FinancialTable) -> usize {
    table
        .iter()
        .map(|r| r.user_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// The `n` rows with the largest value of `metric`, descending.
///
/// Always returns `min(n, table.len())` rows. The sort is stable, so ties keep
/// their original row order.
pub fn top_n(table: &FinancialTable, metric: Metric, n: usize) -> Vec<&FinancialRecord> {
    let mut rows: Vec<&FinancialRecord> = table.iter().collect();
    rows.sort_by(|a, b| descending(a.get(metric), b.get(metric)));
    rows.truncate(n);
    rows
}

/// All values of a column in row order, missing values included.
pub fn column(table: &FinancialTable, metric: Metric) -> Vec<f64> {
    table.iter().map(|r| r.get(metric)).collect()
}

/// All UserIDs in row order.
pub fn ids(table: &FinancialTable) -> Vec<&str> {
    table.iter().map(|r| r.user_id.as_str()).collect()
}

fn present(table: &FinancialTable, metric: Metric) -> impl Iterator<Item = f64> + '_ {
    table.iter().map(move |r| r.get(metric)).filter(|v| !v.is_nan())
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
