//! Core functionality for the linked-views platform
//!
//! This crate provides the shared dataset, selection predicates and the
//! cross-filter engine that keeps every linked view consistent with the
//! brushes made in the others.

pub mod dataset;
pub mod error;
pub mod events;
pub mod predicate;
pub mod render;
pub mod selection;
pub mod sync;
pub mod timestamp;
pub mod view;

// Re-export commonly used types
pub use dataset::{ColumnKind, Dataset, RowId, RowSet};
pub use error::{EngineError, PredicateError};
pub use events::EventBus;
pub use predicate::{BoundsPolicy, Predicate, Scalar};
pub use render::RenderAdapter;
pub use selection::{AxisValue, SelectedPoint, SelectionEvent, SelectionRange};
pub use timestamp::{parse_timestamp, ParsedTimestamp};
pub use sync::{
    AmbientFilter, CrossFilterEngine, EngineSnapshot, Partition, RenderPass, SelectionState, ViewRegistry,
};
pub use view::{ChartKind, DragMode, MarkStyle, Rgba, ViewConfig, ViewDescriptor, ViewId};
