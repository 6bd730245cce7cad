//! The handler contract and what handlers get to work with.

use crate::commands::{CommandProcessor, EditorCommand};
use crate::control_points::ControlPointManager;
use crate::input::{KeyCombo, KeyEvent, PointerEvent};
use crate::objects::{HitContext, SceneObject};
use crate::scene::Scene;
use crate::scheduler::FrameScheduler;
use crate::transform_manager::TransformManager;
use crate::types::{Camera, ControlPointType, CursorStyle, ObjectId};
use boardkit_core::{Position, Shared};
use std::fmt;

/// Outcome of a mouse handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandlerResult {
    pub handled: bool,
    /// Keep lower-priority handlers from seeing the event.
    pub stop_propagation: bool,
}

impl HandlerResult {
    pub const IGNORED: HandlerResult = HandlerResult {
        handled: false,
        stop_propagation: false,
    };

    /// Handled, but later handlers may react too.
    pub const HANDLED: HandlerResult = HandlerResult {
        handled: true,
        stop_propagation: false,
    };

    /// Handled, and nobody else gets the event.
    pub const CONSUMED: HandlerResult = HandlerResult {
        handled: true,
        stop_propagation: true,
    };
}

/// Where a mouse event happened and what it hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseContext {
    /// Canvas pixels.
    pub position: Position,
    pub object: Option<ObjectId>,
    pub control_point: ControlPointType,
    pub event: PointerEvent,
}

/// Mutable access to the editor state for the duration of one event.
pub struct InteractionEnv<'a> {
    pub scene: &'a mut Scene,
    pub transform: &'a mut TransformManager,
    pub commands: &'a mut CommandProcessor,
    pub camera: &'a Camera,
    pub control_points: &'a ControlPointManager,
    pub min_hit_size: f64,
    pub scheduler: &'a Shared<FrameScheduler>,
}

impl fmt::Debug for InteractionEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionEnv")
            .field("objects", &self.scene.len())
            .field("camera", self.camera)
            .finish()
    }
}

impl InteractionEnv<'_> {
    pub fn hit_context(&self) -> HitContext<'_> {
        HitContext {
            camera: self.camera,
            control_points: self.control_points,
            min_hit_size: self.min_hit_size,
        }
    }

    /// Run a command through the undo history.
    pub fn execute(&mut self, command: impl Into<EditorCommand>) {
        self.commands.execute(command, self.scene);
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.scene.get(id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.scene.get_mut(id)
    }
}

/// One pluggable behavior competing for pointer and keyboard input.
///
/// Every method has a do-nothing default so handlers only implement the
/// events they care about.
pub trait InteractionHandler: fmt::Debug {
    fn id(&self) -> &'static str;

    /// Lower runs first.
    fn priority(&self) -> i32;

    fn is_enabled(&self) -> bool {
        true
    }

    fn can_handle(&self, object: &SceneObject) -> bool;

    fn handle_mouse_down(&mut self, _ctx: &MouseContext, _env: &mut InteractionEnv<'_>) -> HandlerResult {
        HandlerResult::IGNORED
    }

    fn handle_mouse_move(&mut self, _ctx: &MouseContext, _env: &mut InteractionEnv<'_>) -> HandlerResult {
        HandlerResult::IGNORED
    }

    fn handle_mouse_up(&mut self, _ctx: &MouseContext, _env: &mut InteractionEnv<'_>) -> HandlerResult {
        HandlerResult::IGNORED
    }

    fn handle_double_click(&mut self, _ctx: &MouseContext, _env: &mut InteractionEnv<'_>) -> HandlerResult {
        HandlerResult::IGNORED
    }

    /// A mouse-down that hit no object.
    fn handle_background_click(&mut self, _env: &mut InteractionEnv<'_>) {}

    fn handle_key_down(
        &mut self,
        _event: &KeyEvent,
        _object: Option<ObjectId>,
        _env: &mut InteractionEnv<'_>,
    ) -> bool {
        false
    }

    fn handle_key_up(
        &mut self,
        _event: &KeyEvent,
        _object: Option<ObjectId>,
        _env: &mut InteractionEnv<'_>,
    ) -> bool {
        false
    }

    fn get_cursor_style(&self, _control_point: ControlPointType) -> Option<CursorStyle> {
        None
    }

    fn shortcuts(&self) -> &[KeyCombo] {
        &[]
    }

    /// Wants every key regardless of shortcuts, e.g. while editing text.
    fn captures_keyboard(&self) -> bool {
        false
    }

    fn on_disable(&mut self, _env: &mut InteractionEnv<'_>) {}
}
