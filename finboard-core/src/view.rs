//! View selection: whole-table overview or a single-entity drill-down.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{FinancialRecord, FinancialTable};

/// Selector value for the aggregate view.
pub const OVERVIEW: &str = "Overview";

/// What the caller asked to see.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    Overview,
    Entity(String),
}

impl FromStr for Selection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s == OVERVIEW {
            Selection::Overview
        } else {
            Selection::Entity(s.to_string())
        })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Overview => f.write_str(OVERVIEW),
            Selection::Entity(id) => f.write_str(id),
        }
    }
}

/// The resolved view for a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Aggregate(&'a FinancialTable),
    Entity(&'a FinancialRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("no record with UserID '{id}'")]
    NotFound { id: String },

    #[error("UserID '{id}' matches {count} rows; drill-down needs a unique identifier")]
    DuplicateUserId { id: String, count: usize },
}

/// Resolve a selection against the table.
pub fn select<'a>(table: &'a FinancialTable, selection: &Selection) -> Result<View<'a>, ViewError> {
    let id = match selection {
        Selection::Overview => return Ok(View::Aggregate(table)),
        Selection::Entity(id) => id,
    };

    let mut matches = table.iter().filter(|r| &r.user_id == id);
    let first = matches.next().ok_or_else(|| ViewError::NotFound { id: id.clone() })?;
    let extra = matches.count();
    if extra > 0 {
        return Err(ViewError::DuplicateUserId {
            id: id.clone(),
            count: extra + 1,
        });
    }
    Ok(View::Entity(first))
}

/// Selector entries: `Overview` followed by the distinct UserIDs, sorted.
///
/// When every ID is numeric they are ordered by value, otherwise lexically.
pub fn selector_options(table: &FinancialTable) -> Vec<String> {
    let distinct: BTreeSet<&str> = table.iter().map(|r| r.user_id.as_str()).collect();
    let mut ids: Vec<&str> = distinct.into_iter().collect();

    if ids.iter().all(|id| id.parse::<f64>().is_ok()) {
        ids.sort_by(|a, b| {
            let x = a.parse::<f64>().unwrap_or(f64::NAN);
            let y = b.parse::<f64>().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        });
    }

    std::iter::once(OVERVIEW.to_string())
        .chain(ids.into_iter().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metric;

    fn table(ids: &[&str]) -> FinancialTable {
        FinancialTable::new(
            ids.iter()
                .enumerate()
                .map(|(i, id)| FinancialRecord::from_values(*id, [i as f64; Metric::COUNT]))
                .collect(),
        )
    }

    #[test]
    fn overview_returns_aggregate_view() {
        let t = table(&["A", "B"]);
        assert_eq!(select(&t, &Selection::Overview).unwrap(), View::Aggregate(&t));
    }

    #[test]
    fn entity_returns_matching_row() {
        let t = table(&["A", "B", "C"]);
        match select(&t, &Selection::Entity("B".into())).unwrap() {
            View::Entity(record) => {
                assert_eq!(record.user_id, "B");
                assert_eq!(record.revenue, 1.0);
            }
            other => panic!("expected entity view, got {other:?}"),
        }
    }

    #[test]
    fn unknown_id_is_not_found() {
        let t = table(&["A"]);
        assert_eq!(
            select(&t, &Selection::Entity("Z".into())),
            Err(ViewError::NotFound { id: "Z".into() })
        );
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let t = table(&["A", "B", "A"]);
        assert_eq!(
            select(&t, &Selection::Entity("A".into())),
            Err(ViewError::DuplicateUserId {
                id: "A".into(),
                count: 2
            })
        );
        // Overview still works on a table with duplicates.
        assert!(select(&t, &Selection::Overview).is_ok());
    }

    #[test]
    fn parses_sentinel() {
        assert_eq!("Overview".parse::<Selection>().unwrap(), Selection::Overview);
        assert_eq!(" U7 ".parse::<Selection>().unwrap(), Selection::Entity("U7".into()));
        assert_eq!(Selection::Entity("U7".into()).to_string(), "U7");
    }

    #[test]
    fn options_sort_numeric_ids_by_value() {
        let t = table(&["10", "9", "100", "9"]);
        assert_eq!(selector_options(&t), vec!["Overview", "9", "10", "100"]);
    }

    #[test]
    fn options_sort_mixed_ids_lexically() {
        let t = table(&["b", "10", "a", "9"]);
        assert_eq!(selector_options(&t), vec!["Overview", "10", "9", "a", "b"]);
    }
}
