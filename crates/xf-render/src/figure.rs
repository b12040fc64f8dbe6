//! Backend-agnostic figure description

use serde::Serialize;
use xf_core::{DragMode, MarkStyle, RowId, Rgba};

/// Everything a drawing backend needs to display one view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub view_id: String,
    pub title: String,
    pub drag_mode: DragMode,
    pub traces: Vec<Trace>,
}

impl Figure {
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name() == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Histogram bin; `end` is exclusive except for the last bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
    pub color: Rgba,
}

/// One layer of a figure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    /// Map markers; `rows` carries each marker's row identity so lasso
    /// selections can be reported back without relying on marker order
    Points {
        name: String,
        rows: Vec<RowId>,
        latitude: Vec<f64>,
        longitude: Vec<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        color_values: Option<Vec<Option<f64>>>,
        style: MarkStyle,
    },
    /// Histogram bars stacked over a shared set of bins
    Bars {
        name: String,
        bins: Vec<Bin>,
        style: MarkStyle,
    },
    /// Category bars
    Categories {
        name: String,
        categories: Vec<CategoryCount>,
        opacity: f32,
    },
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Points { name, .. } | Trace::Bars { name, .. } | Trace::Categories { name, .. } => name,
        }
    }

    /// Number of rows drawn by the trace
    pub fn row_count(&self) -> usize {
        match self {
            Trace::Points { rows, .. } => rows.len(),
            Trace::Bars { bins, .. } => bins.iter().map(|b| b.count).sum(),
            Trace::Categories { categories, .. } => categories.iter().map(|c| c.count).sum(),
        }
    }
}
