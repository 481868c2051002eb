use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::HistoryResult;
use crate::event::{EventBus, HistoryEvent, HistoryEventHandler};
use crate::port::{CanvasPort, MutationHandler, MutationKind, RestoreDone, SnapshotSource};
use crate::snapshot::Snapshot;

use super::HistoryOptions;
use super::recorder::{EngineState, HistoryCore};

/// Callback invoked after an undo or redo restore has fully applied.
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Hook fired when an editing gesture starts or stops.
pub type EditingHook = Box<dyn FnMut()>;

/// Which stack an undo/redo step pops from.
#[derive(Clone, Copy)]
enum StackSide {
    Undo,
    Redo,
}

/// The undo/redo controller, composed over a [`CanvasPort`].
///
/// The controller observes the canvas through mutation-event bindings and
/// captures a full-state snapshot per observable mutation. Restores run
/// through the same canvas, which may re-fire mutation events while it
/// rebuilds objects from a snapshot; the `Processing` guard swallows those
/// so a restore never records itself.
///
/// # Usage
///
/// ```no_run
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use canvas_history::{HistoryController, HistoryOptions, SceneCanvas};
///
/// let canvas = Rc::new(RefCell::new(SceneCanvas::new()));
/// let mut history = HistoryController::new(Rc::clone(&canvas), HistoryOptions::default());
/// history.initialize();
/// // ... mutate the canvas ...
/// history.undo(None)?;
/// # Ok::<(), canvas_history::HistoryError>(())
/// ```
///
/// The controller is not reentrant: at most one undo/redo may be
/// outstanding at a time, and completion callbacks must not issue another
/// history operation.
pub struct HistoryController<C: CanvasPort> {
    canvas: Rc<RefCell<C>>,
    core: Rc<RefCell<HistoryCore>>,
    events: Rc<EventBus>,
    on_start_editing: Option<EditingHook>,
    on_stop_editing: Option<EditingHook>,
    attached: bool,
}

impl<C: CanvasPort> HistoryController<C> {
    /// Create a controller over `canvas`. No bindings are installed until
    /// [`initialize`](Self::initialize) is called.
    pub fn new(canvas: Rc<RefCell<C>>, options: HistoryOptions) -> Self {
        let pending = canvas.borrow().serialize(&options.extra_props);
        Self {
            canvas,
            core: Rc::new(RefCell::new(HistoryCore::new(
                pending,
                options.extra_props,
                options.max_depth,
            ))),
            events: Rc::new(EventBus::new()),
            on_start_editing: None,
            on_stop_editing: None,
            attached: false,
        }
    }

    /// Install all mutation bindings and reset history to the current live
    /// state. Both stacks come up empty and the pending snapshot is the
    /// canvas as it is right now.
    pub fn initialize(&mut self) {
        let extra_props = self.core.borrow().extra_props.clone();
        let current = self.canvas.borrow().serialize(&extra_props);
        {
            let mut core = self.core.borrow_mut();
            core.stacks.clear();
            core.state = EngineState::Idle;
            core.pending = current;
        }
        let handler = self.mutation_handler();
        let mut canvas = self.canvas.borrow_mut();
        for kind in MutationKind::ALL {
            canvas.subscribe(kind, Rc::clone(&handler));
        }
        drop(canvas);
        self.attached = true;
        log::trace!("installed {} mutation bindings", MutationKind::ALL.len());
    }

    /// Remove all mutation bindings. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if !self.attached {
            return;
        }
        let mut canvas = self.canvas.borrow_mut();
        for kind in MutationKind::ALL {
            canvas.unsubscribe(kind);
        }
        drop(canvas);
        self.attached = false;
        log::trace!("removed mutation bindings");
    }

    /// One shared handler for every mutation kind. Holds only weak
    /// references, so bindings left on a canvas that outlives the
    /// controller degrade to no-ops.
    fn mutation_handler(&self) -> MutationHandler {
        let core = Rc::downgrade(&self.core);
        let events: Weak<EventBus> = Rc::downgrade(&self.events);
        Rc::new(move |live: &dyn SnapshotSource, kind: MutationKind| {
            let (Some(core), Some(events)) = (core.upgrade(), events.upgrade()) else {
                return;
            };
            log::trace!("mutation event: {kind:?}");
            HistoryCore::save_action(&core, &events, live);
        })
    }

    /// Undo the most recent history entry.
    ///
    /// Pops the undo stack, parks the pre-undo live state on the redo stack
    /// and asks the canvas to restore the popped snapshot. Once the restore
    /// has fully applied the canvas is re-rendered, [`HistoryEvent::Undo`]
    /// is emitted and `on_complete` is invoked. Popping an empty stack is a
    /// no-op and emits nothing.
    pub fn undo(&mut self, on_complete: Option<CompletionCallback>) -> HistoryResult<()> {
        self.step(StackSide::Undo, on_complete)
    }

    /// Redo the most recently undone entry. Symmetric to
    /// [`undo`](Self::undo) with the stack roles swapped.
    pub fn redo(&mut self, on_complete: Option<CompletionCallback>) -> HistoryResult<()> {
        self.step(StackSide::Redo, on_complete)
    }

    fn step(&mut self, side: StackSide, on_complete: Option<CompletionCallback>) -> HistoryResult<()> {
        let target = {
            let mut core = self.core.borrow_mut();
            core.state = EngineState::Processing;
            let popped = match side {
                StackSide::Undo => core.stacks.pop_undo(),
                StackSide::Redo => core.stacks.pop_redo(),
            };
            let Some(snapshot) = popped else {
                core.state = EngineState::Idle;
                return Ok(());
            };
            // Park the live state on the opposite stack, freshly serialized:
            // the pending cache lags behind any suppressed mutations.
            let live = self.canvas.borrow().serialize(&core.extra_props);
            match side {
                StackSide::Undo => core.stacks.push_redo(live),
                StackSide::Redo => core.stacks.push_undo(live),
            }
            core.pending = snapshot.clone();
            snapshot
        };
        let event = match side {
            StackSide::Undo => HistoryEvent::Undo,
            StackSide::Redo => HistoryEvent::Redo,
        };
        self.load_snapshot(target, event, on_complete)
    }

    /// Hand a snapshot to the canvas and finish the operation once the
    /// restore completes: re-render, notify, drop the `Processing` guard,
    /// then the caller's callback.
    fn load_snapshot(
        &mut self,
        snapshot: Snapshot,
        event: HistoryEvent,
        on_complete: Option<CompletionCallback>,
    ) -> HistoryResult<()> {
        let core = Rc::clone(&self.core);
        let events = Rc::clone(&self.events);
        let done: RestoreDone = Box::new(move |surface: &mut dyn CanvasPort| {
            surface.render();
            events.emit(event);
            core.borrow_mut().state = EngineState::Idle;
            if let Some(callback) = on_complete {
                callback();
            }
        });
        let result = self.canvas.borrow_mut().restore(&snapshot, done);
        if let Err(err) = result {
            // A latched Processing guard would freeze capture forever, so
            // clear it before propagating. The popped entry stays popped and
            // pending stays set to it; the operation is fatal, not rolled
            // back.
            log::warn!("restore failed: {err}");
            self.core.borrow_mut().state = EngineState::Idle;
            return Err(err.into());
        }
        Ok(())
    }

    /// Empty both stacks and notify subscribers.
    pub fn clear_history(&mut self) {
        self.core.borrow_mut().stacks.clear();
        log::debug!("history cleared");
        self.events.emit(HistoryEvent::Clear);
    }

    /// Open an editing gesture: mutation events are suppressed until
    /// [`stop_editing`](Self::stop_editing) collapses the whole gesture
    /// into a single history entry.
    pub fn start_editing(&mut self) {
        self.core.borrow_mut().state = EngineState::Editing;
        if let Some(hook) = &mut self.on_start_editing {
            hook();
        }
    }

    /// Close the current editing gesture and record its net effect as one
    /// entry, regardless of how many mutations fired while it was open.
    pub fn stop_editing(&mut self) {
        self.core.borrow_mut().state = EngineState::Idle;
        if let Some(hook) = &mut self.on_stop_editing {
            hook();
        }
        self.capture_now();
    }

    /// Suppress capture during a programmatic batch of mutations.
    pub fn mute_history(&mut self) {
        self.core.borrow_mut().state = EngineState::Processing;
    }

    /// Re-enable capture and record the net effect of the batch as one
    /// entry.
    pub fn unmute_history(&mut self) {
        self.core.borrow_mut().state = EngineState::Idle;
        self.capture_now();
    }

    fn capture_now(&mut self) {
        let canvas = self.canvas.borrow();
        HistoryCore::save_action(&self.core, &self.events, &*canvas);
    }

    /// Subscribe to history notifications.
    pub fn subscribe(&self, handler: Box<dyn HistoryEventHandler>) {
        self.events.subscribe(handler);
    }

    pub fn set_on_start_editing(&mut self, hook: EditingHook) {
        self.on_start_editing = Some(hook);
    }

    pub fn set_on_stop_editing(&mut self, hook: EditingHook) {
        self.on_stop_editing = Some(hook);
    }

    /// Returns true if there are entries that can be undone
    pub fn can_undo(&self) -> bool {
        self.core.borrow().stacks.can_undo()
    }

    /// Returns true if there are entries that can be redone
    pub fn can_redo(&self) -> bool {
        self.core.borrow().stacks.can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.core.borrow().stacks.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.core.borrow().stacks.redo_count()
    }

    /// Current guard state, mostly useful for debugging and assertions.
    pub fn state(&self) -> EngineState {
        self.core.borrow().state
    }
}
