//! Ordered registry of view descriptors

use indexmap::IndexMap;
use std::sync::Arc;

use crate::dataset::Dataset;
use crate::error::{EngineError, PredicateError};
use crate::view::{ViewDescriptor, ViewId};

/// Views known to the engine, kept in registration order
#[derive(Default, Clone)]
pub struct ViewRegistry {
    views: IndexMap<ViewId, Arc<dyn ViewDescriptor>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a view after checking that every column it draws exists
    pub fn register(&mut self, descriptor: Arc<dyn ViewDescriptor>, dataset: &Dataset) -> Result<(), EngineError> {
        let id = descriptor.id().clone();
        if self.views.contains_key(&id) {
            return Err(EngineError::DuplicateView(id));
        }

        if let Some(column) = descriptor
            .config()
            .chart
            .columns()
            .into_iter()
            .find(|column| dataset.column_kind(column).is_none())
        {
            return Err(EngineError::InvalidView {
                view: id,
                source: PredicateError::missing_column(column),
            });
        }

        self.views.insert(id, descriptor);
        Ok(())
    }

    pub fn get(&self, id: &ViewId) -> Option<&Arc<dyn ViewDescriptor>> {
        self.views.get(id)
    }

    pub fn contains(&self, id: &ViewId) -> bool {
        self.views.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ViewId> {
        self.views.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ViewDescriptor>> {
        self.views.values()
    }

    /// Every view except `id`, in registration order
    pub fn others<'a>(&'a self, id: &'a ViewId) -> impl Iterator<Item = &'a Arc<dyn ViewDescriptor>> + 'a {
        self.views.iter().filter(move |(other, _)| *other != id).map(|(_, view)| view)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
