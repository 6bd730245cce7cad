use super::{HandlerResult, InteractionEnv, InteractionHandler, MouseContext};
use crate::commands::TextEditCommand;
use crate::input::{KeyCombo, KeyEvent};
use crate::objects::{SceneObject, TextSnapshot};
use crate::types::ObjectId;

/// Text editing: double-click to edit, type while editing, Ctrl+B/Ctrl+I
/// to toggle bold/italic, Escape or a click elsewhere to finish.
///
/// The whole editing session becomes one undoable text edit command.
#[derive(Debug)]
pub struct TextInteraction {
    enabled: bool,
    shortcuts: Vec<KeyCombo>,
    /// Object being edited and its state when editing began.
    editing: Option<(ObjectId, TextSnapshot)>,
}

impl Default for TextInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInteraction {
    pub fn new() -> Self {
        Self {
            enabled: true,
            shortcuts: vec![
                KeyCombo::ctrl("b"),
                KeyCombo::ctrl("i"),
                KeyCombo::new("Escape"),
            ],
            editing: None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn editing_id(&self) -> Option<ObjectId> {
        self.editing.as_ref().map(|(id, _)| *id)
    }

    /// Leave edit mode and record the session if it changed anything.
    fn commit(&mut self, env: &mut InteractionEnv<'_>) {
        let Some((id, before)) = self.editing.take() else {
            return;
        };
        let Some(text) = env.scene.get_mut(id).and_then(|o| o.as_text_mut()) else {
            tracing::debug!("Edited text {} left the scene", id);
            return;
        };
        text.stop_editing(Some(env.scheduler));
        let after = text.snapshot();
        if after != before {
            env.execute(TextEditCommand::from_states(id, before, after));
        }
    }

    /// Run a style toggle. Outside edit mode it becomes its own command.
    fn toggle(&mut self, id: ObjectId, env: &mut InteractionEnv<'_>, bold: bool) -> bool {
        let Some(text) = env.scene.get_mut(id).and_then(|o| o.as_text_mut()) else {
            return false;
        };
        let before = text.snapshot();
        if bold {
            text.toggle_bold();
        } else {
            text.toggle_italic();
        }
        if self.editing_id() != Some(id) {
            let after = text.snapshot();
            env.execute(TextEditCommand::from_states(id, before, after));
        }
        true
    }
}

impl InteractionHandler for TextInteraction {
    fn id(&self) -> &'static str {
        "text"
    }

    fn priority(&self) -> i32 {
        2
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn can_handle(&self, object: &SceneObject) -> bool {
        object.as_text().is_some()
    }

    fn shortcuts(&self) -> &[KeyCombo] {
        &self.shortcuts
    }

    fn captures_keyboard(&self) -> bool {
        self.editing.is_some()
    }

    fn handle_double_click(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        let Some(id) = ctx.object else {
            return HandlerResult::IGNORED;
        };
        if self.editing_id() == Some(id) {
            return HandlerResult::CONSUMED;
        }
        self.commit(env);

        let Some(text) = env.scene.get_mut(id).and_then(|o| o.as_text_mut()) else {
            return HandlerResult::IGNORED;
        };
        let before = text.snapshot();
        text.start_editing(Some(env.scheduler));
        self.editing = Some((id, before));
        HandlerResult::CONSUMED
    }

    fn handle_mouse_down(&mut self, ctx: &MouseContext, env: &mut InteractionEnv<'_>) -> HandlerResult {
        let Some(editing) = self.editing_id() else {
            return HandlerResult::IGNORED;
        };
        if ctx.object == Some(editing) {
            // Presses inside the text being edited must not start a drag.
            return HandlerResult::CONSUMED;
        }
        self.commit(env);
        HandlerResult::IGNORED
    }

    fn handle_background_click(&mut self, env: &mut InteractionEnv<'_>) {
        self.commit(env);
    }

    fn handle_key_down(
        &mut self,
        event: &KeyEvent,
        object: Option<ObjectId>,
        env: &mut InteractionEnv<'_>,
    ) -> bool {
        let target = self.editing_id().or(object);

        if self.shortcuts[2].matches(event) {
            if self.editing.is_none() {
                return false;
            }
            self.commit(env);
            return true;
        }
        if let Some(id) = target {
            if self.shortcuts[0].matches(event) {
                return self.toggle(id, env, true);
            }
            if self.shortcuts[1].matches(event) {
                return self.toggle(id, env, false);
            }
        }

        let Some(id) = self.editing_id() else {
            return false;
        };
        match env.scene.get_mut(id).and_then(|o| o.as_text_mut()) {
            Some(text) => text.on_key_down(event),
            None => {
                self.editing = None;
                false
            }
        }
    }

    fn on_disable(&mut self, env: &mut InteractionEnv<'_>) {
        self.commit(env);
    }
}
