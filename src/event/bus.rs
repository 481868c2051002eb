use std::cell::RefCell;

use crate::event::{HistoryEvent, HistoryEventHandler};

/// A simple event bus for broadcasting history notifications to registered
/// handlers. Single-threaded by design; handlers may capture `Rc`s.
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn HistoryEventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive notifications
    pub fn subscribe(&self, handler: Box<dyn HistoryEventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Emit a notification to all registered handlers
    pub fn emit(&self, event: HistoryEvent) {
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }
}
