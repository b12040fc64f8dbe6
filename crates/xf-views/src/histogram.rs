//! Histogram brushed with a range select

use std::sync::Arc;
use xf_core::{
    BoundsPolicy, ChartKind, Dataset, DragMode, MarkStyle, Predicate, PredicateError, SelectionEvent, ViewConfig,
    ViewDescriptor, ViewId,
};

use crate::style;

/// Binned distribution of a numeric or temporal column.
///
/// A drag selection becomes an inclusive range on the column; how the bounds
/// are read from the reported bars is set by the [`BoundsPolicy`].
#[derive(Debug, Clone)]
pub struct HistogramView {
    id: ViewId,
    config: ViewConfig,
    column: String,
    policy: BoundsPolicy,
}

impl HistogramView {
    pub fn new(id: impl Into<String>, title: impl Into<String>, column: &str, bins: usize) -> Self {
        Self {
            id: ViewId::new(id),
            config: ViewConfig {
                title: title.into(),
                chart: ChartKind::Histogram { column: column.to_string(), bins },
                selected: style::SELECTED,
                unselected: style::UNSELECTED,
                drag_mode: DragMode::Select,
                width_fraction: 0.5,
            },
            column: column.to_string(),
            policy: BoundsPolicy::default(),
        }
    }

    pub fn bounds(mut self, policy: BoundsPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn styles(mut self, selected: MarkStyle, unselected: MarkStyle) -> Self {
        self.config.selected = selected;
        self.config.unselected = unselected;
        self
    }

    pub fn width_fraction(mut self, fraction: f32) -> Self {
        self.config.width_fraction = fraction;
        self
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn policy(&self) -> BoundsPolicy {
        self.policy
    }

    pub fn shared(self) -> Arc<dyn ViewDescriptor> {
        Arc::new(self)
    }
}

impl ViewDescriptor for HistogramView {
    fn id(&self) -> &ViewId {
        &self.id
    }

    fn config(&self) -> &ViewConfig {
        &self.config
    }

    fn predicate_from_event(&self, dataset: &Dataset, event: Option<&SelectionEvent>) -> Result<Predicate, PredicateError> {
        match event {
            Some(event) => Predicate::range_from_selection(dataset, &self.column, event, self.policy),
            None => Ok(Predicate::Empty),
        }
    }
}
