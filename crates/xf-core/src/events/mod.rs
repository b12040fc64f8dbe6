use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// System-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

impl dyn Event {
    /// Downcast to a concrete event type
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events published by the cross-filter engine
pub mod events {
    use super::Event;

    /// A view joined the engine
    #[derive(Debug, Clone)]
    pub struct ViewRegistered {
        pub view_id: String,
        pub chart: &'static str,
    }

    /// A view's predicate was replaced
    #[derive(Debug, Clone)]
    pub struct PredicateApplied {
        pub view_id: String,
        pub kind: &'static str,
        pub matched_rows: usize,
    }

    /// A selection could not be turned into a predicate; state is unchanged
    #[derive(Debug, Clone)]
    pub struct PredicateRejected {
        pub view_id: String,
        pub error: String,
    }

    /// A view was returned to the unset state
    #[derive(Debug, Clone)]
    pub struct SelectionCleared {
        pub view_id: String,
    }

    /// Figures were produced for the listed views
    #[derive(Debug, Clone)]
    pub struct RenderPassCompleted {
        pub source_view: Option<String>,
        pub rendered_views: Vec<String>,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        ViewRegistered,
        PredicateApplied,
        PredicateRejected,
        SelectionCleared,
        RenderPassCompleted
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Event handler backed by a closure
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
