//! Render-ready page model: page → tabs → sections → blocks.

use finboard_core::display::{ChartSpec, MetricDisplay, TableSpec};
use finboard_core::ChartError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
}

/// A single renderable item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum Block {
    /// A row of metric tiles.
    Metrics { items: Vec<MetricDisplay> },
    /// A titled list of label/value lines (e.g. balance sheet lines).
    Lines {
        title: MetricDisplay,
        lines: Vec<MetricDisplay>,
    },
    Chart { chart: ChartSpec },
    Table { table: TableSpec },
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tabs: Vec::new(),
        }
    }

    pub fn tab(mut self, tab: Tab) -> Self {
        self.tabs.push(tab);
        self
    }

    /// All charts on the page, in display order.
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.blocks().filter_map(|b| match b {
            Block::Chart { chart } => Some(chart),
            _ => None,
        })
    }

    /// All metric tiles on the page, in display order.
    pub fn metrics(&self) -> impl Iterator<Item = &MetricDisplay> {
        self.blocks().flat_map(|b| match b {
            Block::Metrics { items } => items.iter().collect::<Vec<_>>(),
            Block::Lines { title, lines } => std::iter::once(title).chain(lines).collect(),
            _ => Vec::new(),
        })
    }

    /// Look up a metric tile by label.
    pub fn metric(&self, label: &str) -> Option<&MetricDisplay> {
        self.metrics().find(|m| m.label == label)
    }

    /// Validate every chart and table on the page.
    pub fn validate(&self) -> Result<(), ChartError> {
        for block in self.blocks() {
            match block {
                Block::Chart { chart } => chart.validate()?,
                Block::Table { table } => table.validate()?,
                _ => {}
            }
        }
        Ok(())
    }

    fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.tabs
            .iter()
            .flat_map(|t| &t.sections)
            .flat_map(|s| &s.blocks)
    }
}

impl Tab {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

impl Section {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            blocks: Vec::new(),
        }
    }

    pub fn metrics(mut self, items: Vec<MetricDisplay>) -> Self {
        self.blocks.push(Block::Metrics { items });
        self
    }

    pub fn lines(mut self, title: MetricDisplay, lines: Vec<MetricDisplay>) -> Self {
        self.blocks.push(Block::Lines { title, lines });
        self
    }

    pub fn chart(mut self, chart: ChartSpec) -> Self {
        self.blocks.push(Block::Chart { chart });
        self
    }

    pub fn table(mut self, table: TableSpec) -> Self {
        self.blocks.push(Block::Table { table });
        self
    }
}
