use super::{Command, CommandKind, CommandMeta};
use crate::objects::{SceneObject, TextSnapshot, TextStylePatch};
use crate::scene::Scene;
use crate::types::{ObjectId, ObjectKind};
use boardkit_core::EditorError;

/// Change a text object's content and/or style.
#[derive(Debug, Clone)]
pub struct TextEditCommand {
    id: ObjectId,
    before: TextSnapshot,
    after: TextSnapshot,
    meta: CommandMeta,
}

impl TextEditCommand {
    /// Replace the content and patch the base style. Fields left `None`
    /// keep their current value.
    pub fn new(
        object: &SceneObject,
        content: Option<String>,
        style: Option<TextStylePatch>,
    ) -> Result<Self, EditorError> {
        let text = object.as_text().ok_or_else(|| EditorError::WrongObjectKind {
            id: object.id().to_string(),
            expected: ObjectKind::Text.as_str().to_string(),
        })?;
        let before = text.snapshot();
        let mut after = before.clone();
        if let Some(content) = content {
            after.content = content;
        }
        if let Some(patch) = style {
            after.style = after.style.apply(&patch);
        }
        Ok(Self::from_states(object.id(), before, after))
    }

    /// A command between two captured states, for edits that already
    /// happened live (typing in edit mode).
    pub fn from_states(id: ObjectId, before: TextSnapshot, after: TextSnapshot) -> Self {
        Self {
            id,
            before,
            after,
            meta: CommandMeta::default(),
        }
    }

    pub fn before(&self) -> &TextSnapshot {
        &self.before
    }

    pub fn after(&self) -> &TextSnapshot {
        &self.after
    }

    fn restore(&self, scene: &mut Scene, state: &TextSnapshot) {
        match scene.get_mut(self.id).and_then(|o| o.as_text_mut()) {
            Some(text) => text.restore(state),
            None => tracing::warn!("Text object {} not in scene", self.id),
        }
    }
}

impl Command for TextEditCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::TextEdit
    }

    fn target_id(&self) -> Option<ObjectId> {
        Some(self.id)
    }

    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn execute(&mut self, scene: &mut Scene) {
        self.meta.add_debug_info("from", &self.before.content);
        self.meta.add_debug_info("to", &self.after.content);
        let after = self.after.clone();
        self.restore(scene, &after);
    }

    fn undo(&mut self, scene: &mut Scene) {
        let before = self.before.clone();
        self.restore(scene, &before);
    }
}
