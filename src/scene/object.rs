use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content variants a scene object can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// A placed raster image, fetched from `source` when a snapshot is
    /// restored.
    Image { source: String },
    /// A freehand stroke.
    Stroke {
        points: Vec<Pos2>,
        color: Color32,
        width: f32,
    },
}

/// One object on the canvas surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: Uuid,
    pub kind: ObjectKind,
    pub pos: Pos2,
    pub size: Vec2,
    pub angle: f32,
    /// Whether the object responds to selection. Serialized only when the
    /// history engine allowlists it as an extra property; absent values
    /// restore as `true`.
    #[serde(default = "default_selectable")]
    pub selectable: bool,
}

fn default_selectable() -> bool {
    true
}

impl SceneObject {
    pub fn image(source: impl Into<String>, pos: Pos2, size: Vec2) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ObjectKind::Image {
                source: source.into(),
            },
            pos,
            size,
            angle: 0.0,
            selectable: true,
        }
    }

    pub fn stroke(points: Vec<Pos2>, color: Color32, width: f32) -> Self {
        let bounds = points
            .iter()
            .fold(None::<egui::Rect>, |acc, p| match acc {
                Some(rect) => Some(rect.union(egui::Rect::from_min_max(*p, *p))),
                None => Some(egui::Rect::from_min_max(*p, *p)),
            })
            .unwrap_or(egui::Rect::ZERO);
        Self {
            id: Uuid::new_v4(),
            kind: ObjectKind::Stroke {
                points,
                color,
                width,
            },
            pos: bounds.min,
            size: bounds.size(),
            angle: 0.0,
            selectable: true,
        }
    }
}
