//! Routing of pointer and keyboard input to interaction handlers.
//!
//! Handlers are tried in priority order. The handler that accepts a
//! mouse-down (or double-click) becomes the *active* handler and gets first
//! refusal on every event until the gesture ends, so a resize drag keeps
//! working when the pointer leaves the object and text editing keeps the
//! keyboard.

mod crop;
mod handler;
mod select;
mod text;
mod transform;

pub use crop::CropInteraction;
pub use handler::{HandlerResult, InteractionEnv, InteractionHandler, MouseContext};
pub use select::SelectInteraction;
pub use text::TextInteraction;
pub use transform::TransformInteraction;

use crate::input::KeyEvent;
use crate::objects::SceneObject;
use crate::types::{ControlPointType, CursorStyle, ObjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MouseEventKind {
    Down,
    Move,
    Up,
    DoubleClick,
}

impl MouseEventKind {
    fn starts_gesture(self) -> bool {
        matches!(self, MouseEventKind::Down | MouseEventKind::DoubleClick)
    }
}

#[derive(Debug, Default)]
pub struct InteractionManager {
    handlers: Vec<Box<dyn InteractionHandler>>,
    active: Option<usize>,
}

impl InteractionManager {
    pub fn new(handlers: Vec<Box<dyn InteractionHandler>>) -> Self {
        let mut manager = Self {
            handlers,
            active: None,
        };
        manager.sort();
        manager
    }

    /// Select, crop, text and transform handlers.
    pub fn with_default_handlers() -> Self {
        Self::new(vec![
            Box::new(SelectInteraction::new()),
            Box::new(CropInteraction::new()),
            Box::new(TextInteraction::new()),
            Box::new(TransformInteraction::new()),
        ])
    }

    pub fn add_handler(&mut self, handler: Box<dyn InteractionHandler>) {
        let active_id = self.active_handler_id();
        self.handlers.push(handler);
        self.sort();
        self.active = active_id.and_then(|id| self.handlers.iter().position(|h| h.id() == id));
    }

    fn sort(&mut self) {
        self.handlers.sort_by_key(|h| h.priority());
    }

    pub fn handler_ids(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.id()).collect()
    }

    pub fn active_handler_id(&self) -> Option<&'static str> {
        self.active.and_then(|i| self.handlers.get(i)).map(|h| h.id())
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn handle_mouse_down(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        self.dispatch_mouse(MouseEventKind::Down, ctx, env)
    }

    pub fn handle_mouse_move(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        self.dispatch_mouse(MouseEventKind::Move, ctx, env)
    }

    pub fn handle_double_click(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        self.dispatch_mouse(MouseEventKind::DoubleClick, ctx, env)
    }

    /// Ends the gesture: the active handler is cleared afterwards whatever
    /// the outcome.
    pub fn handle_mouse_up(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        let result = self.dispatch_mouse(MouseEventKind::Up, ctx, env);
        self.active = None;
        result
    }

    fn dispatch_mouse(
        &mut self,
        kind: MouseEventKind,
        ctx: &MouseContext,
        env: &mut InteractionEnv<'_>,
    ) -> HandlerResult {
        // A press on empty canvas ends whatever was latched, edit sessions
        // included, before any handler sees it.
        if kind == MouseEventKind::Down && ctx.object.is_none() {
            self.active = None;
            for handler in self.handlers.iter_mut().filter(|h| h.is_enabled()) {
                handler.handle_background_click(env);
            }
            return HandlerResult::IGNORED;
        }

        let mut declined = None;
        if let Some(index) = self.active {
            if let Some(handler) = self.handlers.get_mut(index) {
                let result = call_mouse(handler.as_mut(), kind, ctx, env);
                if result.handled {
                    return result;
                }
            }
            declined = Some(index);
            if kind == MouseEventKind::Down {
                tracing::trace!("Active handler declined mouse-down; releasing it");
                self.active = None;
            }
        }

        let Some(object_id) = ctx.object else {
            return HandlerResult::IGNORED;
        };

        let mut outcome = HandlerResult::IGNORED;
        for index in 0..self.handlers.len() {
            if Some(index) == declined {
                continue;
            }
            let eligible = {
                let handler = &self.handlers[index];
                handler.is_enabled()
                    && env
                        .scene
                        .get(object_id)
                        .is_some_and(|object| handler.can_handle(object))
            };
            if !eligible {
                continue;
            }

            let result = call_mouse(self.handlers[index].as_mut(), kind, ctx, env);
            if result.handled {
                outcome.handled = true;
                if kind.starts_gesture() {
                    self.active = Some(index);
                }
            }
            if result.stop_propagation {
                outcome.stop_propagation = true;
                break;
            }
        }

        if let Some(id) = self.active_handler_id() {
            tracing::trace!("Active handler after {:?}: {}", kind, id);
        }
        outcome
    }

    /// Offer a key to the active handler, then to handlers whose shortcuts
    /// match or that capture the keyboard. The handler that takes the key
    /// becomes active until the next key-up.
    pub fn handle_key_down(
        &mut self,
        event: &KeyEvent,
        object: Option<ObjectId>,
        env: &mut InteractionEnv<'_>,
    ) -> bool {
        self.dispatch_key(event, object, env, true)
    }

    pub fn handle_key_up(
        &mut self,
        event: &KeyEvent,
        object: Option<ObjectId>,
        env: &mut InteractionEnv<'_>,
    ) -> bool {
        let handled = self.dispatch_key(event, object, env, false);
        self.active = None;
        handled
    }

    fn dispatch_key(
        &mut self,
        event: &KeyEvent,
        object: Option<ObjectId>,
        env: &mut InteractionEnv<'_>,
        down: bool,
    ) -> bool {
        let mut declined = None;
        if let Some(index) = self.active {
            if let Some(handler) = self.handlers.get_mut(index) {
                if call_key(handler.as_mut(), down, event, object, env) {
                    return true;
                }
            }
            declined = Some(index);
        }

        for index in 0..self.handlers.len() {
            if Some(index) == declined {
                continue;
            }
            let eligible = {
                let handler = &self.handlers[index];
                let handles_object = match object.and_then(|id| env.scene.get(id)) {
                    Some(obj) => handler.can_handle(obj),
                    None => false,
                };
                let matches_shortcut = handler.shortcuts().iter().any(|combo| combo.matches(event));
                handler.is_enabled()
                    && (handler.captures_keyboard() || (handles_object && matches_shortcut))
            };
            if !eligible {
                continue;
            }
            if call_key(self.handlers[index].as_mut(), down, event, object, env) {
                self.active = Some(index);
                return true;
            }
        }
        false
    }

    /// Cursor for hovering `object` at `control_point`.
    pub fn get_cursor_style(&self, object: Option<&SceneObject>, control_point: ControlPointType) -> CursorStyle {
        let Some(object) = object else {
            return CursorStyle::Default;
        };
        if let Some(cursor) = self
            .active
            .and_then(|i| self.handlers.get(i))
            .and_then(|h| h.get_cursor_style(control_point))
        {
            return cursor;
        }
        self.handlers
            .iter()
            .filter(|h| h.is_enabled() && h.can_handle(object))
            .find_map(|h| h.get_cursor_style(control_point))
            .unwrap_or(CursorStyle::Default)
    }

    /// Disable every handler and drop them.
    pub fn destroy(&mut self, env: &mut InteractionEnv<'_>) {
        for handler in &mut self.handlers {
            handler.on_disable(env);
        }
        self.handlers.clear();
        self.active = None;
        tracing::debug!("Interaction handlers destroyed");
    }
}

fn call_mouse(
    handler: &mut dyn InteractionHandler,
    kind: MouseEventKind,
    ctx: &MouseContext,
    env: &mut InteractionEnv<'_>,
) -> HandlerResult {
    match kind {
        MouseEventKind::Down => handler.handle_mouse_down(ctx, env),
        MouseEventKind::Move => handler.handle_mouse_move(ctx, env),
        MouseEventKind::Up => handler.handle_mouse_up(ctx, env),
        MouseEventKind::DoubleClick => handler.handle_double_click(ctx, env),
    }
}

fn call_key(
    handler: &mut dyn InteractionHandler,
    down: bool,
    event: &KeyEvent,
    object: Option<ObjectId>,
    env: &mut InteractionEnv<'_>,
) -> bool {
    if down {
        handler.handle_key_down(event, object, env)
    } else {
        handler.handle_key_up(event, object, env)
    }
}
