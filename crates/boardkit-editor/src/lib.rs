//! # BoardKit Editor
//!
//! Interactive 2D scene editor core: text and image objects on a pannable,
//! zoomable infinite canvas, with selection, move/scale/rotate/flip
//! gestures, text editing, image cropping and undo/redo.
//!
//! ## Core Components
//!
//! ### Coordinates
//! - **CoordinateSystem**: screen/world conversion, visible bounds, grid cell sizing
//! - **ScreenSpaceSystem**: canvas/CSS pixels, object-local space, screen distances and angles
//!
//! ### Scene
//! - **SceneObject**: identity, transform and selection flag over text or image content
//! - **Scene**: the ordered object list and its [`SelectionManager`]
//! - **ControlPointManager**: resize handles and the rotation handle, hit testing and drawing
//!
//! ### Interaction
//! - **TransformManager**: the move/scale/rotate/flip gesture state machine
//! - **InteractionManager**: priority dispatch of pointer and key input to handlers
//! - **Commands**: reversible edits and the bounded undo/redo processor
//!
//! ### Rendering
//! - **ViewportManager**: visible-area culling
//! - **InfiniteGrid**: zoom-adaptive background grid
//! - **Surface**: the drawing backend (tiny-skia pixmap or a recording double)
//! - **CanvasController**: owns all of the above and runs the frame loop
//!
//! ## Architecture
//!
//! ```text
//! CanvasController
//!   ├── Scene (objects + selection)
//!   ├── InteractionManager ── handlers ── TransformManager
//!   │                                 └── CommandProcessor
//!   ├── ViewportManager / InfiniteGrid
//!   └── FrameScheduler (render coalescing, zoom, caret blink)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use boardkit_editor::{CanvasController, RecordingSurface, SceneObject, TextStyle};
//! use boardkit_core::Position;
//! use boardkit_settings::EditorConfig;
//!
//! let surface = RecordingSurface::new(800, 600);
//! let mut canvas = CanvasController::new(surface, EditorConfig::default()).unwrap();
//! canvas.add_object(SceneObject::text("Hello", TextStyle::default(), Position::ORIGIN));
//! assert!(canvas.frame(16.0));
//! ```

pub mod commands;
pub mod control_points;
pub mod controller;
pub mod coordinate_system;
pub mod crop;
pub mod events;
pub mod font_manager;
pub mod grid;
pub mod input;
pub mod interaction;
pub mod objects;
pub mod scene;
pub mod scheduler;
pub mod screen_space;
pub mod selection_manager;
pub mod style;
pub mod surface;
pub mod toolbar;
pub mod transform_manager;
pub mod types;
pub mod viewport;

pub use commands::{
    AddCommand, Command, CommandKind, CommandMeta, CommandProcessor, CropCommand, DeleteCommand,
    EditorCommand, SelectCommand, TextEditCommand, TransformCommand,
};
pub use control_points::ControlPointManager;
pub use controller::{CanvasController, ZoomAnimation};
pub use coordinate_system::CoordinateSystem;
pub use crop::{CropBounds, CropHandle, CropMode, CropResult, ImageCropper};
pub use events::CanvasEvents;
pub use grid::InfiniteGrid;
pub use input::{
    CanvasRect, KeyCombo, KeyEvent, Modifiers, MouseButton, PointerEvent, RawPointerEvent,
    RawWheelEvent,
};
pub use interaction::{
    CropInteraction, HandlerResult, InteractionEnv, InteractionHandler, InteractionManager,
    MouseContext, SelectInteraction, TextInteraction, TransformInteraction,
};
pub use objects::{
    FontWeight, HitContext, ImageData, ObjectContent, RenderContext, SceneObject, TextData,
    TextSnapshot, TextStyle, TextStylePatch,
};
pub use scene::Scene;
pub use scheduler::{FrameHandle, FrameScheduler};
pub use screen_space::ScreenSpaceSystem;
pub use selection_manager::SelectionManager;
pub use style::{ControlPointStyle, GridStyle, RenderStyle};
pub use surface::{DrawOp, PixmapSurface, RecordingSurface, StrokeStyle, Surface};
pub use toolbar::{ObjectAction, ToolbarGroup, ToolbarRegistry};
pub use transform_manager::{soft_clamp, InteractionState, TransformEnd, TransformLimits, TransformManager};
pub use types::{Camera, ControlPointType, CursorStyle, ObjectId, ObjectKind, Scale, Transform};
pub use viewport::ViewportManager;
