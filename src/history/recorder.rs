use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{EventBus, HistoryEvent};
use crate::port::SnapshotSource;
use crate::snapshot::Snapshot;

use super::stack::StackManager;

/// Capture guard state.
///
/// A single tagged state makes `Editing` and `Processing` structurally
/// exclusive; captures happen only in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Mutation events are captured.
    #[default]
    Idle,
    /// A caller-delimited gesture is open; captures are suppressed until
    /// the gesture is collapsed into a single entry.
    Editing,
    /// An undo/redo restore is in flight, or history is muted. Mutation
    /// events fired by the restore itself are swallowed.
    Processing,
}

/// Shared mutable core of the history engine: guard state, the two stacks
/// and the pending snapshot. Lives behind `Rc<RefCell<..>>` so the mutation
/// handler installed on the canvas and the controller see the same state.
pub struct HistoryCore {
    pub(crate) state: EngineState,
    pub(crate) stacks: StackManager,
    pub(crate) pending: Snapshot,
    pub(crate) extra_props: Vec<String>,
}

impl HistoryCore {
    pub(crate) fn new(pending: Snapshot, extra_props: Vec<String>, max_depth: Option<usize>) -> Self {
        Self {
            state: EngineState::Idle,
            stacks: StackManager::new(max_depth),
            pending,
            extra_props,
        }
    }

    /// Record one history entry from the live state, unless a guard holds.
    ///
    /// Pushes the cached pending snapshot (the state as it was before the
    /// mutation now being reported) onto the undo stack and recomputes the
    /// pending snapshot from the live state. The redo stack is deliberately
    /// left intact: redone states stay reachable across interleaved edits.
    pub(crate) fn save_action(core: &Rc<RefCell<Self>>, bus: &EventBus, live: &dyn SnapshotSource) {
        let pushed = {
            let mut core = core.borrow_mut();
            if core.state != EngineState::Idle {
                log::trace!("capture suppressed while {:?}", core.state);
                return;
            }
            let next = live.serialize(&core.extra_props);
            let pushed = std::mem::replace(&mut core.pending, next);
            core.stacks.push_undo(pushed.clone());
            log::debug!("captured history entry, undo depth {}", core.stacks.undo_count());
            pushed
        };
        bus.emit(HistoryEvent::Append { snapshot: pushed });
    }
}
