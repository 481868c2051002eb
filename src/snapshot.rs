use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// A serialized, immutable capture of the entire canvas state at one instant.
///
/// Snapshots are opaque to the history engine: it never looks inside them, it
/// only moves them between stacks and hands them back to the canvas surface
/// for restoring. Cloning produces an independent copy, so the undo and redo
/// stacks never alias the same instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot(String);

impl Snapshot {
    /// Encode serializable scene state into a snapshot.
    ///
    /// In-memory serialization of an already-valid scene graph cannot fail.
    pub fn encode<T: Serialize>(state: &T) -> Self {
        Self(serde_json::to_string(state).expect("in-memory scene serialization cannot fail"))
    }

    /// Decode the snapshot back into scene data.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CodecError> {
        Ok(serde_json::from_str(&self.0)?)
    }

    /// Wrap an already-serialized JSON document.
    pub fn from_json(json: impl Into<String>) -> Self {
        Self(json.into())
    }

    pub fn as_json(&self) -> &str {
        &self.0
    }
}
