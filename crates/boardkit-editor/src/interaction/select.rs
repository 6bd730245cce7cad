use super::{HandlerResult, InteractionEnv, InteractionHandler, MouseContext};
use crate::commands::SelectCommand;
use crate::objects::SceneObject;

/// Selects whatever object is clicked. Never stops propagation, so the
/// handlers after it can start a gesture on the freshly selected object.
#[derive(Debug, Default)]
pub struct SelectInteraction {
    enabled: bool,
}

impl SelectInteraction {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl InteractionHandler for SelectInteraction {
    fn id(&self) -> &'static str {
        "select"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn can_handle(&self, _object: &SceneObject) -> bool {
        true
    }

    fn handle_mouse_down(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        let Some(id) = ctx.object else {
            return HandlerResult::IGNORED;
        };
        if env.scene.selected_id() != Some(id) {
            env.execute(SelectCommand::new(Some(id)));
        }
        HandlerResult::HANDLED
    }
}
