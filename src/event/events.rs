use crate::snapshot::Snapshot;

/// Notifications broadcast by the history engine, intended for UI
/// affordances such as enabling or disabling undo/redo controls.
#[derive(Debug, Clone)]
pub enum HistoryEvent {
    /// A new entry was pushed onto the undo stack. Carries the snapshot
    /// that was pushed, i.e. the state before the mutation being recorded.
    Append { snapshot: Snapshot },
    /// An undo restore completed.
    Undo,
    /// A redo restore completed.
    Redo,
    /// Both stacks were emptied.
    Clear,
}
