mod controller;
mod recorder;
mod stack;

pub use controller::{CompletionCallback, EditingHook, HistoryController};
pub use recorder::EngineState;
pub use stack::StackManager;

/// Configuration for a [`HistoryController`].
#[derive(Debug, Clone)]
pub struct HistoryOptions {
    /// Per-object properties the canvas serializer must include beyond its
    /// defaults, so restored objects keep their editing affordances.
    pub extra_props: Vec<String>,
    /// Cap on undo stack depth; the oldest entry is evicted once the cap is
    /// exceeded. `None` leaves history unbounded.
    pub max_depth: Option<usize>,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            extra_props: vec!["selectable".to_owned()],
            max_depth: None,
        }
    }
}
