//! Capability interface the history engine needs from a canvas surface.
//!
//! The engine is composed over these traits rather than inheriting from a
//! rendering type, so any scene-graph implementation that can report
//! mutations and serialize itself can be given undo/redo support. The crate
//! ships one reference implementation, [`crate::scene::SceneCanvas`].

use std::rc::Rc;

use crate::error::RestoreError;
use crate::snapshot::Snapshot;

/// The mutation events a canvas surface reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    ObjectAdded,
    ObjectRemoved,
    ObjectModified,
    ObjectTransformed,
}

impl MutationKind {
    /// Every kind the history engine binds to, in installation order.
    pub const ALL: [MutationKind; 4] = [
        MutationKind::ObjectAdded,
        MutationKind::ObjectRemoved,
        MutationKind::ObjectModified,
        MutationKind::ObjectTransformed,
    ];
}

/// Handler a canvas surface invokes when a mutation event fires. The surface
/// passes itself so the handler can re-serialize the live state.
pub type MutationHandler = Rc<dyn Fn(&dyn SnapshotSource, MutationKind)>;

/// Completion callback for a restore. The surface passes itself so the
/// caller can trigger a re-render once the snapshot is fully applied.
pub type RestoreDone = Box<dyn FnOnce(&mut dyn CanvasPort)>;

/// Read-only serialization capability of a canvas surface.
pub trait SnapshotSource {
    /// Serialize the full live state. `extra_props` names per-object
    /// properties to include beyond the surface's defaults, so restored
    /// objects keep their editing affordances.
    fn serialize(&self, extra_props: &[String]) -> Snapshot;
}

/// Full capability set of a canvas surface.
pub trait CanvasPort: SnapshotSource {
    /// Install `handler` for `kind`, replacing any previous binding.
    fn subscribe(&mut self, kind: MutationKind, handler: MutationHandler);

    /// Remove the binding for `kind`. Unsubscribing a kind that was never
    /// subscribed is a caller error but must not panic.
    fn unsubscribe(&mut self, kind: MutationKind);

    /// Begin restoring `snapshot`.
    ///
    /// Restore may complete asynchronously, e.g. when embedded image
    /// resources have to be decoded first. The surface must invoke
    /// `on_complete` exactly once, after the snapshot is fully applied
    /// including any nested resource loads. A synchronous `Err` means the
    /// restore never started and `on_complete` will not be called.
    fn restore(&mut self, snapshot: &Snapshot, on_complete: RestoreDone)
    -> Result<(), RestoreError>;

    /// Force a visual refresh.
    fn render(&mut self);
}
