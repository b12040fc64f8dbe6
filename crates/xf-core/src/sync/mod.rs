//! Cross-filter synchronization across linked views
//!
//! Every view owns one predicate. When a view's predicate changes, each other
//! view is redrawn with the union of the predicates of all views except
//! itself, so a brush never filters the view it was drawn on.

mod ambient;
mod registry;
mod snapshot;

pub use ambient::{AmbientFilter, Partition};
pub use registry::ViewRegistry;
pub use snapshot::EngineSnapshot;

use indexmap::IndexMap;
use std::sync::Arc;

use crate::dataset::Dataset;
use crate::error::{EngineError, PredicateError};
use crate::events::{events, EventBus};
use crate::predicate::Predicate;
use crate::render::RenderAdapter;
use crate::selection::SelectionEvent;
use crate::view::{ViewDescriptor, ViewId};

/// Selection state of one view
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    /// No gesture seen since registration or the last clear
    #[default]
    Unset,
    /// Latest predicate produced by the view, which may be [`Predicate::Empty`]
    Active(Predicate),
}

impl SelectionState {
    pub fn predicate(&self) -> Option<&Predicate> {
        match self {
            SelectionState::Unset => None,
            SelectionState::Active(predicate) => Some(predicate),
        }
    }
}

/// Figures produced by one recompute
#[derive(Debug)]
pub struct RenderPass<F> {
    /// View whose selection triggered the pass, `None` for a full render
    pub source: Option<ViewId>,
    /// One figure per redrawn view, in registration order
    pub figures: Vec<(ViewId, F)>,
}

impl<F> RenderPass<F> {
    fn empty(source: ViewId) -> Self {
        Self { source: Some(source), figures: Vec::new() }
    }

    pub fn rendered_views(&self) -> impl Iterator<Item = &ViewId> {
        self.figures.iter().map(|(id, _)| id)
    }

    pub fn figure(&self, view: &ViewId) -> Option<&F> {
        self.figures.iter().find(|(id, _)| id == view).map(|(_, figure)| figure)
    }
}

/// Keeps the highlighted/unhighlighted split of every view consistent with
/// the selections made in all the others.
///
/// Events are handled one at a time to completion; later events simply
/// overwrite earlier predicates.
pub struct CrossFilterEngine {
    dataset: Arc<Dataset>,
    registry: ViewRegistry,
    selections: IndexMap<ViewId, SelectionState>,
    event_bus: Arc<EventBus>,
}

impl CrossFilterEngine {
    /// Create an engine over an immutable dataset
    pub fn new(dataset: Arc<Dataset>) -> Self {
        tracing::info!(
            "Cross-filter engine bound to dataset with {} rows and {} columns",
            dataset.len(),
            dataset.column_names().count()
        );
        Self {
            dataset,
            registry: ViewRegistry::new(),
            selections: IndexMap::new(),
            event_bus: Arc::new(EventBus::new()),
        }
    }

    /// Publish engine events on a shared bus
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Register a linked view; it starts out unset
    pub fn register_view(&mut self, descriptor: Arc<dyn ViewDescriptor>) -> Result<(), EngineError> {
        let id = descriptor.id().clone();
        let chart = descriptor.config().chart.name();
        self.registry.register(descriptor, &self.dataset)?;
        self.selections.insert(id.clone(), SelectionState::Unset);

        tracing::info!("Registered {} view '{}'", chart, id);
        self.event_bus.publish(events::ViewRegistered { view_id: id.to_string(), chart });
        Ok(())
    }

    pub fn selection_state(&self, view: &ViewId) -> Result<&SelectionState, EngineError> {
        self.selections.get(view).ok_or_else(|| EngineError::UnknownView(view.clone()))
    }

    /// Handle a raw selection event from `view` and redraw every other view.
    ///
    /// A gesture that cannot be turned into a predicate leaves all state as
    /// it was and is reported as an error.
    pub fn handle_selection<R>(
        &mut self,
        view: &ViewId,
        event: Option<&SelectionEvent>,
        renderer: &R,
    ) -> Result<RenderPass<R::Figure>, EngineError>
    where
        R: RenderAdapter,
    {
        let descriptor = self.descriptor(view)?;
        let predicate = descriptor
            .predicate_from_event(&self.dataset, event)
            .and_then(|predicate| predicate.validate(&self.dataset).map(|_| predicate))
            .map_err(|source| self.reject(view, source))?;

        self.store(view, SelectionState::Active(predicate), renderer)
    }

    /// Store an already built predicate for `view` and redraw every other view
    pub fn apply_predicate<R>(
        &mut self,
        view: &ViewId,
        predicate: Predicate,
        renderer: &R,
    ) -> Result<RenderPass<R::Figure>, EngineError>
    where
        R: RenderAdapter,
    {
        self.descriptor(view)?;
        predicate.validate(&self.dataset).map_err(|source| self.reject(view, source))?;
        self.store(view, SelectionState::Active(predicate), renderer)
    }

    /// Return `view` to the unset state and redraw every other view
    pub fn clear<R>(&mut self, view: &ViewId, renderer: &R) -> Result<RenderPass<R::Figure>, EngineError>
    where
        R: RenderAdapter,
    {
        self.descriptor(view)?;
        if self.selection_state(view)? != &SelectionState::Unset {
            self.event_bus.publish(events::SelectionCleared { view_id: view.to_string() });
        }
        self.store(view, SelectionState::Unset, renderer)
    }

    /// Render every registered view, e.g. for the initial dashboard
    pub fn render_all<R>(&self, renderer: &R) -> RenderPass<R::Figure>
    where
        R: RenderAdapter,
    {
        let views: Vec<_> = self.registry.iter().cloned().collect();
        let figures = self.snapshot().render(&views, renderer);
        self.publish_render(None, &figures);
        RenderPass { source: None, figures }
    }

    /// Union of the predicates of every view other than `view`
    pub fn ambient_filter(&self, view: &ViewId) -> Result<AmbientFilter, EngineError> {
        self.descriptor(view)?;
        Ok(self.snapshot().ambient_filter(view))
    }

    /// Selected/unselected split `view` is drawn with
    pub fn partition(&self, view: &ViewId) -> Result<Partition, EngineError> {
        self.descriptor(view)?;
        Ok(self.snapshot().partition(view))
    }

    /// Copy of the current predicate set
    pub fn snapshot(&self) -> EngineSnapshot {
        let predicates = self
            .selections
            .iter()
            .map(|(id, state)| (id.clone(), state.predicate().cloned().unwrap_or_default()))
            .collect();
        EngineSnapshot::new(self.dataset.clone(), predicates)
    }

    fn descriptor(&self, view: &ViewId) -> Result<Arc<dyn ViewDescriptor>, EngineError> {
        self.registry.get(view).cloned().ok_or_else(|| EngineError::UnknownView(view.clone()))
    }

    fn reject(&self, view: &ViewId, source: PredicateError) -> EngineError {
        tracing::warn!("Selection on '{}' rejected, keeping previous state: {}", view, source);
        self.event_bus.publish(events::PredicateRejected {
            view_id: view.to_string(),
            error: source.to_string(),
        });
        EngineError::Predicate { view: view.clone(), source }
    }

    fn store<R>(&mut self, view: &ViewId, state: SelectionState, renderer: &R) -> Result<RenderPass<R::Figure>, EngineError>
    where
        R: RenderAdapter,
    {
        let slot = self.selections.get_mut(view).ok_or_else(|| EngineError::UnknownView(view.clone()))?;
        if *slot == state {
            tracing::debug!("Selection on '{}' unchanged, nothing to redraw", view);
            return Ok(RenderPass::empty(view.clone()));
        }
        *slot = state;

        if let Some(predicate) = self.selections[view].predicate() {
            let matched_rows = predicate.evaluate(&self.dataset).len();
            tracing::debug!("Applied {} predicate on '{}' matching {} rows", predicate.kind(), view, matched_rows);
            self.event_bus.publish(events::PredicateApplied {
                view_id: view.to_string(),
                kind: predicate.kind(),
                matched_rows,
            });
        }

        // The source view is left alone: its ambient filter excludes its own predicate.
        let targets: Vec<_> = self.registry.others(view).cloned().collect();
        let figures = self.snapshot().render(&targets, renderer);
        self.publish_render(Some(view), &figures);

        Ok(RenderPass { source: Some(view.clone()), figures })
    }

    fn publish_render<F>(&self, source: Option<&ViewId>, figures: &[(ViewId, F)]) {
        let rendered_views: Vec<String> = figures.iter().map(|(id, _)| id.to_string()).collect();
        tracing::info!(
            "Render pass from {} redrew {:?}",
            source.map(ViewId::as_str).unwrap_or("<all>"),
            rendered_views
        );
        self.event_bus.publish(events::RenderPassCompleted {
            source_view: source.map(ViewId::to_string),
            rendered_views,
        });
    }
}


#[cfg(test)]
mod properties;
