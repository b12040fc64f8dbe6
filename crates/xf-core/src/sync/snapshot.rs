//! Frozen engine state read by concurrent render calls

use indexmap::IndexMap;
use rayon::prelude::*;
use std::sync::Arc;

use super::ambient::{AmbientFilter, Partition};
use crate::dataset::Dataset;
use crate::predicate::Predicate;
use crate::render::RenderAdapter;
use crate::view::{ViewDescriptor, ViewId};

/// The dataset and every view's predicate at one instant.
///
/// Unset views are recorded as [`Predicate::Empty`]; both contribute nothing
/// to ambient filters.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    dataset: Arc<Dataset>,
    predicates: IndexMap<ViewId, Predicate>,
}

impl EngineSnapshot {
    pub(crate) fn new(dataset: Arc<Dataset>, predicates: IndexMap<ViewId, Predicate>) -> Self {
        Self { dataset, predicates }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn predicate(&self, view: &ViewId) -> Option<&Predicate> {
        self.predicates.get(view)
    }

    /// Union of the predicates of every view other than `view`
    pub fn ambient_filter(&self, view: &ViewId) -> AmbientFilter {
        AmbientFilter::combine(
            &self.dataset,
            self.predicates
                .iter()
                .filter(|(other, _)| *other != view)
                .map(|(_, predicate)| predicate),
        )
    }

    pub fn partition(&self, view: &ViewId) -> Partition {
        Partition::compute(&self.dataset, &self.ambient_filter(view))
    }

    /// Render `views` concurrently, returning figures in the order given
    pub(crate) fn render<R>(&self, views: &[Arc<dyn ViewDescriptor>], renderer: &R) -> Vec<(ViewId, R::Figure)>
    where
        R: RenderAdapter,
    {
        views
            .par_iter()
            .map(|view| {
                let partition = self.partition(view.id());
                debug_assert!(partition.is_complete(self.dataset.len()));
                tracing::debug!(
                    "Rendering '{}' with {} selected / {} unselected rows",
                    view.id(),
                    partition.selected.len(),
                    partition.unselected.len()
                );
                let figure = renderer.render(view.id(), &self.dataset, &partition, view.config());
                (view.id().clone(), figure)
            })
            .collect()
    }
}
