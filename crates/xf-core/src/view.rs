//! View descriptors and their static chart configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::dataset::Dataset;
use crate::error::PredicateError;
use crate::predicate::Predicate;
use crate::selection::SelectionEvent;

/// Identifier of a linked view
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// RGBA color
pub type Rgba = [u8; 4];

/// How a partition of marks is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkStyle {
    pub color: Rgba,
    pub opacity: f32,
}

impl MarkStyle {
    pub const fn new(color: Rgba, opacity: f32) -> Self {
        Self { color, opacity }
    }
}

/// Gesture the view accepts for brushing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragMode {
    Lasso,
    Select,
    Click,
}

/// Chart family and the columns it draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// Points placed by latitude/longitude, optionally colored by a numeric column
    PointMap {
        latitude: String,
        longitude: String,
        color_by: Option<String>,
        zoom: f32,
    },
    /// Binned distribution of a numeric or temporal column
    Histogram { column: String, bins: usize },
    /// One bar per category; `palette` gives each category its color
    CategoryBar {
        column: String,
        palette: BTreeMap<String, Rgba>,
    },
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::PointMap { .. } => "point_map",
            ChartKind::Histogram { .. } => "histogram",
            ChartKind::CategoryBar { .. } => "category_bar",
        }
    }

    /// Dataset columns the chart reads
    pub fn columns(&self) -> Vec<&str> {
        match self {
            ChartKind::PointMap { latitude, longitude, color_by, .. } => {
                let mut columns = vec![latitude.as_str(), longitude.as_str()];
                columns.extend(color_by.as_deref());
                columns
            }
            ChartKind::Histogram { column, .. } | ChartKind::CategoryBar { column, .. } => vec![column.as_str()],
        }
    }
}

/// Static per-view configuration handed to the render adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub title: String,
    pub chart: ChartKind,
    pub selected: MarkStyle,
    pub unselected: MarkStyle,
    pub drag_mode: DragMode,
    /// Share of the dashboard width the view occupies
    pub width_fraction: f32,
}

/// A linked view: identity, chart configuration and the translation of its
/// raw selection events into predicates.
pub trait ViewDescriptor: Send + Sync {
    /// Unique id of the view
    fn id(&self) -> &ViewId;

    /// Static chart configuration
    fn config(&self) -> &ViewConfig;

    /// Translate a raw selection event into a predicate.
    ///
    /// `None` means the view currently has no selection and must yield
    /// [`Predicate::Empty`].
    fn predicate_from_event(
        &self,
        dataset: &Dataset,
        event: Option<&SelectionEvent>,
    ) -> Result<Predicate, PredicateError>;
}
