use std::cell::{Cell, RefCell};
use std::rc::Rc;

use canvas_history::{
    CanvasPort, HistoryController, HistoryOptions, MutationHandler, MutationKind, RestoreDone,
    RestoreError, SceneCanvas, SceneObject, Snapshot, SnapshotSource,
};
use egui::{Pos2, Vec2};

fn setup() -> (Rc<RefCell<SceneCanvas>>, HistoryController<SceneCanvas>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let canvas = Rc::new(RefCell::new(SceneCanvas::new()));
    let mut controller = HistoryController::new(Rc::clone(&canvas), HistoryOptions::default());
    controller.initialize();
    (canvas, controller)
}

fn image(name: &str) -> SceneObject {
    SceneObject::image(name, Pos2::new(0.0, 0.0), Vec2::new(32.0, 32.0))
}

#[test]
fn gesture_collapses_into_one_entry() {
    let (canvas, mut controller) = setup();
    let id = canvas.borrow_mut().add_object(image("a.png"));
    assert_eq!(controller.undo_count(), 1);

    controller.start_editing();
    canvas.borrow_mut().move_object(id, Pos2::new(1.0, 1.0));
    canvas.borrow_mut().move_object(id, Pos2::new(2.0, 2.0));
    canvas.borrow_mut().rotate_object(id, 1.0);
    controller.stop_editing();

    // Three suppressed mutations, one recorded entry.
    assert_eq!(controller.undo_count(), 2);

    // Undoing the gesture returns to the pre-gesture state in one step.
    controller.undo(None).unwrap();
    let object = canvas.borrow().find_object(id).cloned().unwrap();
    assert_eq!(object.pos, Pos2::new(0.0, 0.0));
    assert_eq!(object.angle, 0.0);
}

#[test]
fn editing_hooks_fire_on_start_and_stop() {
    let (_canvas, mut controller) = setup();
    let started = Rc::new(Cell::new(0));
    let stopped = Rc::new(Cell::new(0));

    let counter = Rc::clone(&started);
    controller.set_on_start_editing(Box::new(move || counter.set(counter.get() + 1)));
    let counter = Rc::clone(&stopped);
    controller.set_on_stop_editing(Box::new(move || counter.set(counter.get() + 1)));

    controller.start_editing();
    assert_eq!((started.get(), stopped.get()), (1, 0));
    controller.stop_editing();
    assert_eq!((started.get(), stopped.get()), (1, 1));
}

#[test]
fn mute_batches_programmatic_mutations() {
    let (canvas, mut controller) = setup();

    controller.mute_history();
    for i in 0..5 {
        canvas.borrow_mut().add_object(image(&format!("{i}.png")));
    }
    assert_eq!(controller.undo_count(), 0);
    controller.unmute_history();

    assert_eq!(controller.undo_count(), 1);
    controller.undo(None).unwrap();
    assert!(canvas.borrow().objects().is_empty());
}

#[test]
fn restore_feedback_is_not_recorded() {
    let (canvas, mut controller) = setup();
    canvas.borrow_mut().add_object(image("a.png"));
    canvas.borrow_mut().add_object(image("b.png"));

    canvas.borrow_mut().set_deferred(true);
    controller.undo(None).unwrap();
    assert!(canvas.borrow().has_parked_restore());

    // Applying the parked document re-fires object-added per object; none
    // of that feedback may land on the undo stack.
    canvas.borrow_mut().complete_restore();
    assert_eq!(controller.undo_count(), 1);
    assert_eq!(controller.redo_count(), 1);
    assert_eq!(canvas.borrow().objects().len(), 1);
}

#[test]
fn mutations_during_suspended_restore_are_swallowed() {
    let (canvas, mut controller) = setup();
    canvas.borrow_mut().add_object(image("a.png"));

    canvas.borrow_mut().set_deferred(true);
    controller.undo(None).unwrap();

    // The thread is free between restore request and completion; an event
    // arriving in that window must not be captured.
    canvas.borrow_mut().add_object(image("late.png"));
    assert_eq!(controller.undo_count(), 0);

    canvas.borrow_mut().complete_restore();
    assert!(canvas.borrow().objects().is_empty());
}

#[test]
fn dispose_stops_capture_until_reinitialized() {
    let (canvas, mut controller) = setup();
    canvas.borrow_mut().add_object(image("a.png"));
    assert_eq!(controller.undo_count(), 1);

    controller.dispose();
    controller.dispose(); // safe to repeat
    canvas.borrow_mut().add_object(image("b.png"));
    assert_eq!(controller.undo_count(), 1);

    controller.initialize();
    assert_eq!(controller.undo_count(), 0);
    canvas.borrow_mut().add_object(image("c.png"));
    assert_eq!(controller.undo_count(), 1);
}

/// Wraps a [`SceneCanvas`] and fails restores on demand, for exercising the
/// restore-failure path through the canvas port seam.
struct FlakyCanvas {
    inner: SceneCanvas,
    fail_restores: bool,
}

impl FlakyCanvas {
    fn new() -> Self {
        Self {
            inner: SceneCanvas::new(),
            fail_restores: false,
        }
    }
}

impl SnapshotSource for FlakyCanvas {
    fn serialize(&self, extra_props: &[String]) -> Snapshot {
        self.inner.serialize(extra_props)
    }
}

impl CanvasPort for FlakyCanvas {
    fn subscribe(&mut self, kind: MutationKind, handler: MutationHandler) {
        self.inner.subscribe(kind, handler);
    }

    fn unsubscribe(&mut self, kind: MutationKind) {
        self.inner.unsubscribe(kind);
    }

    fn restore(&mut self, snapshot: &Snapshot, on_complete: RestoreDone) -> Result<(), RestoreError> {
        if self.fail_restores {
            return Err(RestoreError::ResourceLoad("image fetch failed".into()));
        }
        self.inner.restore(snapshot, on_complete)
    }

    fn render(&mut self) {
        self.inner.render();
    }
}

#[test]
fn failed_restore_releases_the_processing_guard() {
    let canvas = Rc::new(RefCell::new(FlakyCanvas::new()));
    let mut controller = HistoryController::new(Rc::clone(&canvas), HistoryOptions::default());
    controller.initialize();

    canvas.borrow_mut().inner.add_object(image("a.png"));
    canvas.borrow_mut().inner.add_object(image("b.png"));

    canvas.borrow_mut().fail_restores = true;
    let err = controller.undo(None);
    assert!(err.is_err());

    // The popped entry stays popped, but capture must work again.
    assert_eq!(controller.undo_count(), 1);
    canvas.borrow_mut().fail_restores = false;
    canvas.borrow_mut().inner.add_object(image("c.png"));
    assert_eq!(controller.undo_count(), 2);

    // Pending stayed set to the snapshot whose restore failed, so the next
    // undo lands on that state.
    controller.undo(None).unwrap();
    assert_eq!(canvas.borrow().inner.objects().len(), 1);
}

#[test]
fn unsubscribing_unknown_kind_does_not_panic() {
    let mut canvas = SceneCanvas::new();
    canvas.unsubscribe(MutationKind::ObjectTransformed);
}
