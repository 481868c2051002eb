use std::collections::HashMap;

use egui::Pos2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RestoreError;
use crate::port::{CanvasPort, MutationHandler, MutationKind, RestoreDone, SnapshotSource};
use crate::snapshot::Snapshot;

use super::object::SceneObject;

/// Serialized form of the whole surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub objects: Vec<SceneObject>,
}

/// Per-object properties serialized only when a caller allowlists them.
const OPTIONAL_PROPS: [&str; 1] = ["selectable"];

/// In-memory reference canvas surface.
///
/// Stands in for a real rendering canvas: mutators fire the same mutation
/// events a rendering surface would, and `restore` can be switched into a
/// deferred mode that parks the decoded document until
/// [`complete_restore`](Self::complete_restore) is called, emulating nested
/// resource loads such as image decodes.
pub struct SceneCanvas {
    objects: Vec<SceneObject>,
    handlers: HashMap<MutationKind, MutationHandler>,
    deferred: bool,
    parked: Option<(SceneDocument, RestoreDone)>,
    renders: usize,
}

impl Default for SceneCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneCanvas {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            handlers: HashMap::new(),
            deferred: false,
            parked: None,
            renders: 0,
        }
    }

    /// When set, restores park their decoded document until
    /// [`complete_restore`](Self::complete_restore) instead of applying
    /// immediately.
    pub fn set_deferred(&mut self, deferred: bool) {
        self.deferred = deferred;
    }

    pub fn has_parked_restore(&self) -> bool {
        self.parked.is_some()
    }

    /// Finish a parked restore: apply the document, then invoke the
    /// completion callback exactly as an immediate restore would.
    pub fn complete_restore(&mut self) {
        if let Some((document, done)) = self.parked.take() {
            self.apply_document(document);
            done(self);
        }
    }

    pub fn add_object(&mut self, object: SceneObject) -> Uuid {
        let id = object.id;
        self.objects.push(object);
        self.fire(MutationKind::ObjectAdded);
        id
    }

    pub fn remove_object(&mut self, id: Uuid) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        let removed = self.objects.remove(index);
        self.fire(MutationKind::ObjectRemoved);
        Some(removed)
    }

    pub fn move_object(&mut self, id: Uuid, pos: Pos2) -> bool {
        let Some(object) = self.objects.iter_mut().find(|o| o.id == id) else {
            return false;
        };
        object.pos = pos;
        self.fire(MutationKind::ObjectModified);
        true
    }

    pub fn rotate_object(&mut self, id: Uuid, angle: f32) -> bool {
        let Some(object) = self.objects.iter_mut().find(|o| o.id == id) else {
            return false;
        };
        object.angle = angle;
        self.fire(MutationKind::ObjectTransformed);
        true
    }

    pub fn set_selectable(&mut self, id: Uuid, selectable: bool) -> bool {
        let Some(object) = self.objects.iter_mut().find(|o| o.id == id) else {
            return false;
        };
        object.selectable = selectable;
        self.fire(MutationKind::ObjectModified);
        true
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn find_object(&self, id: Uuid) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Number of render passes requested so far, observable in tests.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    fn fire(&mut self, kind: MutationKind) {
        if let Some(handler) = self.handlers.get(&kind).cloned() {
            handler(&*self, kind);
        }
    }

    fn apply_document(&mut self, document: SceneDocument) {
        self.objects = document.objects;
        // A real canvas re-creates every object while loading a snapshot
        // and fires object-added for each one; reproduce that feedback.
        for _ in 0..self.objects.len() {
            self.fire(MutationKind::ObjectAdded);
        }
    }
}

impl SnapshotSource for SceneCanvas {
    fn serialize(&self, extra_props: &[String]) -> Snapshot {
        let document = SceneDocument {
            objects: self.objects.clone(),
        };
        let mut value =
            serde_json::to_value(&document).expect("in-memory scene serialization cannot fail");
        if let Some(objects) = value.get_mut("objects").and_then(|v| v.as_array_mut()) {
            for object in objects {
                let Some(map) = object.as_object_mut() else {
                    continue;
                };
                for prop in OPTIONAL_PROPS {
                    if !extra_props.iter().any(|p| p == prop) {
                        map.remove(prop);
                    }
                }
            }
        }
        Snapshot::from_json(value.to_string())
    }
}

impl CanvasPort for SceneCanvas {
    fn subscribe(&mut self, kind: MutationKind, handler: MutationHandler) {
        self.handlers.insert(kind, handler);
    }

    fn unsubscribe(&mut self, kind: MutationKind) {
        // Removing a binding that was never installed is a caller error,
        // but must not panic.
        self.handlers.remove(&kind);
    }

    fn restore(&mut self, snapshot: &Snapshot, on_complete: RestoreDone) -> Result<(), RestoreError> {
        let document: SceneDocument = snapshot.decode()?;
        if self.deferred {
            self.parked = Some((document, on_complete));
            return Ok(());
        }
        self.apply_document(document);
        on_complete(self);
        Ok(())
    }

    fn render(&mut self) {
        self.renders += 1;
        log::trace!("render pass {}", self.renders);
    }
}
