// Client events for UI observers
// Defines event names, emission traits for testability and a broadcast-based emitter

use tokio::sync::broadcast;

/// Event names as constants for consistency
pub mod event_names {
    pub const DICTIONARY_SELECTION_CHANGED: &str = "dictionary_selection_changed";
    pub const TOO_MANY_REQUESTS: &str = "too_many_requests";
}

/// Events delivered to subscribers of a [`BroadcastEmitter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The set of selected dictionaries changed; observers re-read the selection
    DictionarySelectionChanged,
    /// The backend rejected a request because of rate limiting
    TooManyRequests,
}

impl AppEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::DictionarySelectionChanged => event_names::DICTIONARY_SELECTION_CHANGED,
            AppEvent::TooManyRequests => event_names::TOO_MANY_REQUESTS,
        }
    }
}

/// Trait for emitting selection events
/// Allows mocking in tests while using the broadcast emitter in production
pub trait SelectionEventEmitter: Send + Sync {
    /// Emit dictionary_selection_changed event
    fn emit_selection_changed(&self);
}

/// Trait for emitting backend access events
pub trait BackendEventEmitter: Send + Sync {
    /// Emit too_many_requests event
    fn emit_too_many_requests(&self);
}

/// Default capacity of the broadcast channel
const DEFAULT_CAPACITY: usize = 64;

/// Typed event bus owned by the client; observers register via [`BroadcastEmitter::subscribe`]
#[derive(Debug, Clone)]
pub struct BroadcastEmitter {
    sender: broadcast::Sender<AppEvent>,
}

impl BroadcastEmitter {
    /// Create a new emitter with the default channel capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new emitter buffering at most `capacity` undelivered events per subscriber
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new observer
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Number of currently registered observers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn emit(&self, event: AppEvent) {
        // Sending only fails when nobody is listening
        if self.sender.send(event).is_err() {
            crate::trace!("No subscribers for event '{}'", event.name());
        }
    }
}

impl Default for BroadcastEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionEventEmitter for BroadcastEmitter {
    fn emit_selection_changed(&self) {
        self.emit(AppEvent::DictionarySelectionChanged);
    }
}

impl BackendEventEmitter for BroadcastEmitter {
    fn emit_too_many_requests(&self) {
        self.emit(AppEvent::TooManyRequests);
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
pub(crate) mod tests;
