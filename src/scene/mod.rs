mod canvas;
mod object;

pub use canvas::{SceneCanvas, SceneDocument};
pub use object::{ObjectKind, SceneObject};
