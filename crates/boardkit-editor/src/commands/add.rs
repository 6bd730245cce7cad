use super::{Command, CommandKind, CommandMeta};
use crate::objects::SceneObject;
use crate::scene::Scene;
use crate::types::ObjectId;

/// Put a new object on top of the scene.
#[derive(Debug, Clone)]
pub struct AddCommand {
    id: ObjectId,
    /// Held while the object is not in the scene.
    object: Option<SceneObject>,
    meta: CommandMeta,
}

impl AddCommand {
    pub fn new(object: SceneObject) -> Self {
        Self {
            id: object.id(),
            object: Some(object),
            meta: CommandMeta::default(),
        }
    }

    pub fn object_id(&self) -> ObjectId {
        self.id
    }
}

impl Command for AddCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Add
    }

    fn target_id(&self) -> Option<ObjectId> {
        Some(self.id)
    }

    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn execute(&mut self, scene: &mut Scene) {
        match self.object.take() {
            Some(object) => {
                self.meta.add_debug_info("kind", object.kind().as_str());
                scene.add(object);
            }
            None => tracing::warn!("Object {} is already in the scene", self.id),
        }
    }

    fn undo(&mut self, scene: &mut Scene) {
        match scene.remove(self.id) {
            Some((_, object)) => self.object = Some(object),
            None => tracing::warn!("Cannot undo add: object {} is gone", self.id),
        }
    }
}
