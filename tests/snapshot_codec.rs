use std::cell::RefCell;
use std::rc::Rc;

use canvas_history::{
    CanvasPort, HistoryController, HistoryOptions, RestoreError, SceneCanvas, SceneDocument,
    SceneObject, Snapshot, SnapshotSource,
};
use egui::{Color32, Pos2, Vec2};

fn selectable_props() -> Vec<String> {
    vec!["selectable".to_owned()]
}

#[test]
fn allowlist_controls_selectable_round_trip() {
    let mut canvas = SceneCanvas::new();
    let mut object = SceneObject::image("a.png", Pos2::new(0.0, 0.0), Vec2::new(32.0, 32.0));
    object.selectable = false;
    canvas.add_object(object);

    let with = canvas.serialize(&selectable_props());
    let without = canvas.serialize(&[]);

    assert!(with.as_json().contains("selectable"));
    assert!(!without.as_json().contains("selectable"));

    let kept: SceneDocument = with.decode().unwrap();
    assert!(!kept.objects[0].selectable);

    // Stripped extra properties fall back to their defaults on restore.
    let dropped: SceneDocument = without.decode().unwrap();
    assert!(dropped.objects[0].selectable);
}

#[test]
fn undo_retains_editing_affordances() {
    let canvas = Rc::new(RefCell::new(SceneCanvas::new()));
    let mut controller = HistoryController::new(Rc::clone(&canvas), HistoryOptions::default());
    controller.initialize();

    let id = canvas
        .borrow_mut()
        .add_object(SceneObject::image("a.png", Pos2::new(0.0, 0.0), Vec2::new(32.0, 32.0)));
    canvas.borrow_mut().set_selectable(id, false);
    canvas.borrow_mut().move_object(id, Pos2::new(9.0, 9.0));

    // Undo the move; the locked-selection affordance must survive the
    // round trip through the snapshot.
    controller.undo(None).unwrap();
    let object = canvas.borrow().find_object(id).cloned().unwrap();
    assert_eq!(object.pos, Pos2::new(0.0, 0.0));
    assert!(!object.selectable);
}

#[test]
fn stroke_objects_survive_the_codec() {
    let mut canvas = SceneCanvas::new();
    let points = vec![Pos2::new(0.0, 0.0), Pos2::new(4.0, 2.0), Pos2::new(8.0, 8.0)];
    canvas.add_object(SceneObject::stroke(points.clone(), Color32::RED, 2.5));

    let snapshot = canvas.serialize(&selectable_props());
    let document: SceneDocument = snapshot.decode().unwrap();
    assert_eq!(document.objects, canvas.objects());
}

#[test]
fn malformed_snapshot_fails_restore_synchronously() {
    let mut canvas = SceneCanvas::new();
    let result = canvas.restore(
        &Snapshot::from_json("{\"objects\": 7}"),
        Box::new(|_: &mut dyn CanvasPort| panic!("completion must not run for a failed restore")),
    );
    assert!(matches!(result, Err(RestoreError::MalformedSnapshot(_))));
}

#[test]
fn snapshots_on_stacks_are_independent_copies() {
    let canvas = Rc::new(RefCell::new(SceneCanvas::new()));
    let mut controller = HistoryController::new(Rc::clone(&canvas), HistoryOptions::default());
    controller.initialize();

    let captured = Rc::new(RefCell::new(Vec::<Snapshot>::new()));
    let sink = Rc::clone(&captured);
    controller.subscribe(Box::new(move |event: &canvas_history::HistoryEvent| {
        if let canvas_history::HistoryEvent::Append { snapshot } = event {
            sink.borrow_mut().push(snapshot.clone());
        }
    }));

    canvas
        .borrow_mut()
        .add_object(SceneObject::image("a.png", Pos2::new(0.0, 0.0), Vec2::new(8.0, 8.0)));
    controller.undo(None).unwrap();
    controller.redo(None).unwrap();

    // The notification payload and the stack entries decode to the same
    // document even after the stacks have been reshuffled.
    let document: SceneDocument = captured.borrow()[0].decode().unwrap();
    assert!(document.objects.is_empty());
    assert_eq!(controller.undo_count(), 1);
}
