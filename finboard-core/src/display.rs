//! Values handed to the renderer: metric tiles, chart specs, raw tables.
//!
//! The renderer is an external sink. This module only guarantees the values
//! are well formed (`ChartSpec::validate`, equal-length table columns); layout
//! and styling are the renderer's business.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A labelled scalar with an optional change indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDisplay {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Delta>,
}

impl MetricDisplay {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta: None,
        }
    }

    pub fn with_delta(mut self, text: impl Into<String>, color: DeltaColor) -> Self {
        self.delta = Some(Delta {
            text: text.into(),
            color,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub text: String,
    pub color: DeltaColor,
}

/// `Inverse` flips the usual green-up / red-down coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaColor {
    Normal,
    Inverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Group,
    Stack,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    Histogram { bins: usize },
    /// `hole > 0` renders as a donut.
    Pie { hole: f64 },
    Box,
    Scatter,
    Bar { mode: BarMode },
    Line,
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Histogram { .. } => "histogram",
            ChartKind::Pie { .. } => "pie",
            ChartKind::Box => "box",
            ChartKind::Scatter => "scatter",
            ChartKind::Bar { .. } => "bar",
            ChartKind::Line => "line",
        }
    }
}

/// Column data bound to an axis or table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum AxisValues {
    Numbers(Vec<f64>),
    Labels(Vec<String>),
    Dates(Vec<NaiveDate>),
}

impl AxisValues {
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Numbers(v) => v.len(),
            AxisValues::Labels(v) => v.len(),
            AxisValues::Dates(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, AxisValues::Numbers(_))
    }
}

/// A field binding: source field name, display label and the bound values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub field: String,
    pub label: String,
    pub values: AxisValues,
}

impl Axis {
    /// Axis whose label is the field name.
    pub fn new(field: impl Into<String>, values: AxisValues) -> Self {
        let field = field.into();
        Self {
            label: field.clone(),
            field,
            values,
        }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn numbers(field: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(field, AxisValues::Numbers(values))
    }

    pub fn labels(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, AxisValues::Labels(values))
    }

    pub fn dates(field: impl Into<String>, values: Vec<NaiveDate>) -> Self {
        Self::new(field, AxisValues::Dates(values))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("{kind} chart '{title}' requires {what}")]
    Shape {
        kind: &'static str,
        title: String,
        what: &'static str,
    },

    #[error("chart '{title}': field '{field}' has {actual} values, expected {expected}")]
    LengthMismatch {
        title: String,
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("table '{title}': column '{column}' has {actual} rows, expected {expected}")]
    RaggedTable {
        title: String,
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// Chart specification for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Axis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub y: Vec<Axis>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            x: None,
            y: Vec::new(),
        }
    }

    pub fn x(mut self, axis: Axis) -> Self {
        self.x = Some(axis);
        self
    }

    pub fn y(mut self, axis: Axis) -> Self {
        self.y.push(axis);
        self
    }

    /// Check the bindings match what this chart kind needs.
    pub fn validate(&self) -> Result<(), ChartError> {
        let shape = |what: &'static str| ChartError::Shape {
            kind: self.kind.name(),
            title: self.title.clone(),
            what,
        };
        let numeric_y = !self.y.is_empty() && self.y.iter().all(|a| a.values.is_numeric());

        match self.kind {
            ChartKind::Histogram { bins } => {
                if bins == 0 {
                    return Err(shape("at least one bin"));
                }
                if !self.x.as_ref().is_some_and(|a| a.values.is_numeric()) || !self.y.is_empty() {
                    return Err(shape("a numeric x axis and no y axis"));
                }
            }
            ChartKind::Pie { hole } => {
                if !(0.0..1.0).contains(&hole) {
                    return Err(shape("a hole fraction in [0, 1)"));
                }
                let names_are_labels =
                    matches!(self.x.as_ref().map(|a| &a.values), Some(AxisValues::Labels(_)));
                if !names_are_labels || self.y.len() != 1 || !numeric_y {
                    return Err(shape("label names on x and exactly one numeric value axis"));
                }
            }
            ChartKind::Box => {
                if self.x.is_some() || self.y.len() != 1 || !numeric_y {
                    return Err(shape("exactly one numeric y axis and no x axis"));
                }
            }
            ChartKind::Scatter => {
                if !self.x.as_ref().is_some_and(|a| a.values.is_numeric()) || !numeric_y {
                    return Err(shape("numeric x and y axes"));
                }
            }
            ChartKind::Bar { .. } | ChartKind::Line => {
                if self.x.is_none() || !numeric_y {
                    return Err(shape("an x axis and at least one numeric y axis"));
                }
            }
        }

        let expected = self
            .x
            .as_ref()
            .or_else(|| self.y.first())
            .map(|a| a.values.len())
            .unwrap_or(0);
        for axis in self.x.iter().chain(&self.y) {
            if axis.values.len() != expected {
                return Err(ChartError::LengthMismatch {
                    title: self.title.clone(),
                    field: axis.field.clone(),
                    expected,
                    actual: axis.values.len(),
                });
            }
        }
        Ok(())
    }

    /// Number of data points bound to the chart.
    pub fn point_count(&self) -> usize {
        self.x
            .as_ref()
            .or_else(|| self.y.first())
            .map(|a| a.values.len())
            .unwrap_or(0)
    }
}

/// Raw tabular data for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub title: String,
    pub columns: Vec<Axis>,
}

impl TableSpec {
    pub fn new(title: impl Into<String>, columns: Vec<Axis>) -> Self {
        Self {
            title: title.into(),
            columns,
        }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ChartError> {
        let expected = self.row_count();
        match self.columns.iter().find(|c| c.values.len() != expected) {
            Some(column) => Err(ChartError::RaggedTable {
                title: self.title.clone(),
                column: column.label.clone(),
                expected,
                actual: column.values.len(),
            }),
            None => Ok(()),
        }
    }

    /// Convert to a Polars DataFrame for tabular display.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let name: PlSmallStr = c.label.as_str().into();
                match &c.values {
                    AxisValues::Numbers(v) => Ok(Column::new(name, v.as_slice())),
                    AxisValues::Labels(v) => Ok(Column::new(name, v.as_slice())),
                    AxisValues::Dates(v) => {
                        let days: Vec<i32> =
                            v.iter().map(|d| (*d - epoch).num_days() as i32).collect();
                        Column::new(name, days).cast(&DataType::Date)
                    }
                }
            })
            .collect::<PolarsResult<Vec<Column>>>()?;
        DataFrame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(field: &str, n: usize) -> Axis {
        Axis::numbers(field, (0..n).map(|i| i as f64).collect())
    }

    fn names(n: usize) -> Axis {
        Axis::labels("Component", (0..n).map(|i| format!("c{i}")).collect())
    }

    #[test]
    fn well_formed_charts_validate() {
        let charts = [
            ChartSpec::new(ChartKind::Histogram { bins: 50 }, "h").x(nums("Revenue", 3)),
            ChartSpec::new(ChartKind::Pie { hole: 0.4 }, "p").x(names(4)).y(nums("Value", 4)),
            ChartSpec::new(ChartKind::Box, "b").y(nums("NetProfitMargin", 5)),
            ChartSpec::new(ChartKind::Scatter, "s").x(nums("Revenue", 2)).y(nums("NetProfit", 2)),
            ChartSpec::new(ChartKind::Bar { mode: BarMode::Group }, "g")
                .x(names(2))
                .y(nums("TotalAssets", 2))
                .y(nums("TotalLiabilities", 2)),
        ];
        for chart in &charts {
            chart.validate().unwrap_or_else(|e| panic!("{e}"));
        }
    }

    #[test]
    fn histogram_needs_bins_and_numeric_x() {
        let zero = ChartSpec::new(ChartKind::Histogram { bins: 0 }, "h").x(nums("Revenue", 3));
        assert!(matches!(zero.validate(), Err(ChartError::Shape { .. })));
        let labels = ChartSpec::new(ChartKind::Histogram { bins: 5 }, "h").x(names(3));
        assert!(labels.validate().is_err());
    }

    #[test]
    fn pie_rejects_full_hole_and_second_series() {
        let hole = ChartSpec::new(ChartKind::Pie { hole: 1.0 }, "p").x(names(2)).y(nums("v", 2));
        assert!(hole.validate().is_err());
        let two = ChartSpec::new(ChartKind::Pie { hole: 0.0 }, "p")
            .x(names(2))
            .y(nums("a", 2))
            .y(nums("b", 2));
        assert!(two.validate().is_err());
    }

    #[test]
    fn mismatched_lengths_are_reported() {
        let chart = ChartSpec::new(ChartKind::Line, "l").x(nums("Date", 3)).y(nums("Close", 2));
        assert_eq!(
            chart.validate(),
            Err(ChartError::LengthMismatch {
                title: "l".into(),
                field: "Close".into(),
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn empty_data_is_still_well_formed() {
        let chart = ChartSpec::new(ChartKind::Box, "b").y(nums("v", 0));
        assert!(chart.validate().is_ok());
        assert_eq!(chart.point_count(), 0);
    }

    #[test]
    fn serializes_kind_with_tag() {
        let chart = ChartSpec::new(ChartKind::Pie { hole: 0.4 }, "Assets")
            .x(names(1))
            .y(nums("Value", 1));
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"]["type"], "pie");
        assert_eq!(json["kind"]["hole"], 0.4);
        assert_eq!(json["x"]["values"]["type"], "labels");
    }

    #[test]
    fn table_converts_to_dataframe() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let table = TableSpec::new(
            "prices",
            vec![
                Axis::dates("date", vec![day, day.succ_opt().unwrap()]).labelled("Date"),
                Axis::numbers("close", vec![1.0, 2.0]).labelled("Close"),
            ],
        );
        table.validate().unwrap();

        let df = table.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("Close").unwrap().f64().unwrap().get(1), Some(2.0));
    }

    #[test]
    fn ragged_table_is_rejected() {
        let table = TableSpec::new("t", vec![nums("a", 2), nums("b", 3)]);
        assert!(matches!(table.validate(), Err(ChartError::RaggedTable { .. })));
    }
}
