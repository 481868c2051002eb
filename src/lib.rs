#![warn(clippy::all, rust_2018_idioms)]

pub mod error;
pub mod event;
pub mod history;
pub mod port;
pub mod scene;
pub mod snapshot;

pub use error::{CodecError, HistoryError, HistoryResult, RestoreError};
pub use event::{EventBus, HistoryEvent, HistoryEventHandler};
pub use history::{
    CompletionCallback, EditingHook, EngineState, HistoryController, HistoryOptions, StackManager,
};
pub use port::{CanvasPort, MutationHandler, MutationKind, RestoreDone, SnapshotSource};
pub use scene::{ObjectKind, SceneCanvas, SceneDocument, SceneObject};
pub use snapshot::Snapshot;
