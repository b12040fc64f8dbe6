//! Render hand-off to the drawing layer

use crate::dataset::Dataset;
use crate::sync::Partition;
use crate::view::{ViewConfig, ViewId};

/// Turns a view's partition into something displayable.
///
/// Called once per affected view after every selection change. Calls may run
/// concurrently and must not rely on each other; the engine does not wait for
/// any acknowledgment beyond the returned figure.
pub trait RenderAdapter: Send + Sync {
    /// Output of one render call
    type Figure: Send;

    /// Draw `view_id` with its selected and unselected rows.
    ///
    /// `partition.selected` and `partition.unselected` always cover the
    /// dataset exactly once.
    fn render(&self, view_id: &ViewId, dataset: &Dataset, partition: &Partition, config: &ViewConfig) -> Self::Figure;
}
