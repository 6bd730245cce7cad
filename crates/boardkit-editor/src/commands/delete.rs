use super::{Command, CommandKind, CommandMeta};
use crate::objects::SceneObject;
use crate::scene::Scene;
use crate::types::ObjectId;
use boardkit_core::EditorError;

/// Remove an object, remembering where it was and whether it was selected.
#[derive(Debug, Clone)]
pub struct DeleteCommand {
    id: ObjectId,
    original_index: usize,
    was_selected: bool,
    /// Held while the object is out of the scene.
    object: Option<SceneObject>,
    meta: CommandMeta,
}

impl DeleteCommand {
    pub fn new(scene: &Scene, id: ObjectId) -> Result<Self, EditorError> {
        let original_index = scene.index_of(id).ok_or_else(|| EditorError::not_found(id))?;
        let mut meta = CommandMeta::default();
        meta.add_debug_info("original_index", original_index);
        Ok(Self {
            id,
            original_index,
            was_selected: scene.selected_id() == Some(id),
            object: None,
            meta,
        })
    }

    pub fn original_index(&self) -> usize {
        self.original_index
    }

    pub fn was_selected(&self) -> bool {
        self.was_selected
    }
}

impl Command for DeleteCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Delete
    }

    fn target_id(&self) -> Option<ObjectId> {
        Some(self.id)
    }

    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn execute(&mut self, scene: &mut Scene) {
        match scene.remove(self.id) {
            Some((_, object)) => self.object = Some(object),
            None => tracing::warn!("Cannot delete object {}: not in scene", self.id),
        }
    }

    fn undo(&mut self, scene: &mut Scene) {
        let Some(object) = self.object.take() else {
            tracing::warn!("Cannot undo delete of {}: nothing captured", self.id);
            return;
        };
        scene.insert(self.original_index, object);
        if self.was_selected && scene.selected_id() != Some(self.id) {
            scene.select(self.id);
        }
    }
}
