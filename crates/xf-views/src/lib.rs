//! Linked view implementations
//!
//! Concrete [`ViewDescriptor`](xf_core::ViewDescriptor)s: a lasso-brushed
//! point map, range-brushed histograms and category bar charts, plus the
//! color ↔ category map used when a chart reports colors instead of labels.

pub mod category_bar;
pub mod color;
pub mod histogram;
pub mod point_map;
pub mod style;

pub use category_bar::CategoryBarView;
pub use color::{format_color, parse_color, CategoryColorMap};
pub use histogram::HistogramView;
pub use point_map::PointMapView;

use thiserror::Error;

/// View configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("'{0}' is not a recognized color")]
    InvalidColor(String),

    #[error("color {color} is mapped to both '{first}' and '{second}'")]
    DuplicateColor { color: String, first: String, second: String },

    #[error("category '{0}' is mapped more than once")]
    DuplicateCategory(String),
}
