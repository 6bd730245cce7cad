//! Value types shared by every editor component.

use boardkit_core::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The two object variants the editor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Text,
    Image,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Text => "text",
            ObjectKind::Image => "image",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-axis scale factor. Both components stay positive; mirroring is
/// tracked separately by [`Transform::is_flipped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn uniform(s: f64) -> Self {
        Self { x: s, y: s }
    }

    /// Geometric mean of the absolute axis factors.
    pub fn magnitude(&self) -> f64 {
        (self.x.abs() * self.y.abs()).sqrt()
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Placement of an object in world space.
///
/// Rotation is in radians, clockwise on screen (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Position,
    pub rotation: f64,
    pub scale: Scale,
    pub is_flipped: bool,
}

impl Transform {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// `-1.0` when mirrored horizontally, `1.0` otherwise.
    pub fn flip_sign(&self) -> f64 {
        if self.is_flipped {
            -1.0
        } else {
            1.0
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.rotation.is_finite()
            && self.scale.x.is_finite()
            && self.scale.y.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Position::ORIGIN,
            rotation: 0.0,
            scale: Scale::IDENTITY,
            is_flipped: false,
        }
    }
}

/// Pan/zoom state. `x`/`y` is the canvas-pixel offset of the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub is_dragging: bool,
    pub last_mouse_position: Option<Position>,
}

impl Camera {
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self {
            x,
            y,
            zoom,
            is_dragging: false,
            last_mouse_position: None,
        }
    }

    pub fn offset(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Handles around a selected object.
///
/// The eight resize handles are numbered clockwise from the top-left corner;
/// the numbering is part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlPointType {
    #[default]
    None,
    TopLeft,
    TopCenter,
    TopRight,
    MiddleRight,
    BottomRight,
    BottomCenter,
    BottomLeft,
    MiddleLeft,
    Rotation,
}

impl ControlPointType {
    /// Resize handles in index order.
    pub const RESIZE_HANDLES: [ControlPointType; 8] = [
        ControlPointType::TopLeft,
        ControlPointType::TopCenter,
        ControlPointType::TopRight,
        ControlPointType::MiddleRight,
        ControlPointType::BottomRight,
        ControlPointType::BottomCenter,
        ControlPointType::BottomLeft,
        ControlPointType::MiddleLeft,
    ];

    pub fn index(&self) -> i32 {
        match self {
            ControlPointType::None => -1,
            ControlPointType::TopLeft => 0,
            ControlPointType::TopCenter => 1,
            ControlPointType::TopRight => 2,
            ControlPointType::MiddleRight => 3,
            ControlPointType::BottomRight => 4,
            ControlPointType::BottomCenter => 5,
            ControlPointType::BottomLeft => 6,
            ControlPointType::MiddleLeft => 7,
            ControlPointType::Rotation => 8,
        }
    }

    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            -1 => Some(ControlPointType::None),
            8 => Some(ControlPointType::Rotation),
            0..=7 => Some(Self::RESIZE_HANDLES[index as usize]),
            _ => None,
        }
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            ControlPointType::TopLeft
                | ControlPointType::TopRight
                | ControlPointType::BottomRight
                | ControlPointType::BottomLeft
        )
    }

    /// Handles that scale along one axis only.
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            ControlPointType::TopCenter
                | ControlPointType::MiddleRight
                | ControlPointType::BottomCenter
                | ControlPointType::MiddleLeft
        )
    }

    pub fn is_horizontal_edge(&self) -> bool {
        matches!(
            self,
            ControlPointType::MiddleLeft | ControlPointType::MiddleRight
        )
    }
}

/// Pointer cursor the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Move,
    Grab,
    Grabbing,
    Text,
    NwseResize,
    NeswResize,
    NsResize,
    EwResize,
    SResize,
    WResize,
}

impl CursorStyle {
    /// CSS cursor keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorStyle::Default => "default",
            CursorStyle::Move => "move",
            CursorStyle::Grab => "grab",
            CursorStyle::Grabbing => "grabbing",
            CursorStyle::Text => "text",
            CursorStyle::NwseResize => "nwse-resize",
            CursorStyle::NeswResize => "nesw-resize",
            CursorStyle::NsResize => "ns-resize",
            CursorStyle::EwResize => "ew-resize",
            CursorStyle::SResize => "s-resize",
            CursorStyle::WResize => "w-resize",
        }
    }
}

impl fmt::Display for CursorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wrap an angle into `[-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}
