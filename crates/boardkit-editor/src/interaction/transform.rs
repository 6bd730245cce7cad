use super::{HandlerResult, InteractionEnv, InteractionHandler, MouseContext};
use crate::commands::TransformCommand;
use crate::control_points::ControlPointManager;
use crate::objects::{HitContext, SceneObject};
use crate::types::{ControlPointType, CursorStyle};

/// Move, scale, rotate and flip the selected object by dragging it or one
/// of its handles. A finished drag is recorded as a transform command.
#[derive(Debug)]
pub struct TransformInteraction {
    enabled: bool,
    cursors: ControlPointManager,
}

impl Default for TransformInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformInteraction {
    pub fn new() -> Self {
        Self {
            enabled: true,
            cursors: ControlPointManager::default(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn finish(&mut self, env: &mut InteractionEnv<'_>) -> bool {
        let Some(end) = env.transform.end_drag() else {
            return false;
        };
        let changed = env
            .scene
            .get(end.object_id)
            .is_some_and(|o| *o.transform() != end.initial_transform);
        if changed {
            env.execute(TransformCommand::new(end.object_id, end.initial_transform));
        }
        true
    }
}

impl InteractionHandler for TransformInteraction {
    fn id(&self) -> &'static str {
        "transform"
    }

    fn priority(&self) -> i32 {
        3
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn can_handle(&self, object: &SceneObject) -> bool {
        object.is_selected() && !object.as_image().is_some_and(|i| i.is_cropping())
    }

    fn get_cursor_style(&self, control_point: ControlPointType) -> Option<CursorStyle> {
        Some(self.cursors.get_cursor_style(control_point))
    }

    fn handle_mouse_down(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        let hit_ctx = HitContext {
            camera: env.camera,
            control_points: env.control_points,
            min_hit_size: env.min_hit_size,
        };
        let Some(object) = ctx.object.and_then(|id| env.scene.get(id)) else {
            return HandlerResult::IGNORED;
        };
        if ctx.control_point == ControlPointType::None && !object.contains_point(ctx.position, &hit_ctx) {
            return HandlerResult::IGNORED;
        }
        env.transform
            .start_drag(object, ctx.position, ctx.control_point, env.camera);
        HandlerResult::CONSUMED
    }

    fn handle_mouse_move(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        if !env.transform.is_dragging() {
            return HandlerResult::IGNORED;
        }
        let Some(id) = env.transform.target_id() else {
            return HandlerResult::IGNORED;
        };
        let camera = *env.camera;
        let Some(object) = env.scene.get_mut(id) else {
            tracing::warn!("Dragged object {} left the scene", id);
            env.transform.end_drag();
            return HandlerResult::IGNORED;
        };
        env.transform.drag(object, ctx.position, &camera);
        HandlerResult::CONSUMED
    }

    fn handle_mouse_up(&mut self, _ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        if self.finish(env) {
            HandlerResult::CONSUMED
        } else {
            HandlerResult::IGNORED
        }
    }

    fn on_disable(&mut self, env: &mut InteractionEnv<'_>) {
        self.finish(env);
    }
}
