mod bus;
mod events;

pub use bus::EventBus;
pub use events::HistoryEvent;

/// Receives history notifications broadcast through the [`EventBus`].
///
/// Handlers run synchronously, possibly while the canvas surface is still
/// mutably borrowed by the mutation that triggered the notification. They
/// must not call back into the canvas or the history controller.
pub trait HistoryEventHandler {
    fn handle_event(&mut self, event: &HistoryEvent);
}

impl<F: FnMut(&HistoryEvent)> HistoryEventHandler for F {
    fn handle_event(&mut self, event: &HistoryEvent) {
        self(event)
    }
}
