use super::{Command, CommandKind, CommandMeta};
use crate::scene::Scene;
use crate::types::{ObjectId, Transform};

/// Record a transform change.
///
/// Gestures mutate the object live, so the command is usually created
/// after the fact with the pre-gesture transform; the first execute reads
/// the final transform back from the object.
#[derive(Debug, Clone)]
pub struct TransformCommand {
    id: ObjectId,
    before: Transform,
    after: Option<Transform>,
    meta: CommandMeta,
}

impl TransformCommand {
    pub fn new(id: ObjectId, before: Transform) -> Self {
        Self {
            id,
            before,
            after: None,
            meta: CommandMeta::default(),
        }
    }

    /// A command that moves the object from `before` to `after` itself.
    pub fn with_after(id: ObjectId, before: Transform, after: Transform) -> Self {
        Self {
            after: Some(after),
            ..Self::new(id, before)
        }
    }

    pub fn before(&self) -> &Transform {
        &self.before
    }

    pub fn after(&self) -> Option<&Transform> {
        self.after.as_ref()
    }
}

impl Command for TransformCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Transform
    }

    fn target_id(&self) -> Option<ObjectId> {
        Some(self.id)
    }

    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn execute(&mut self, scene: &mut Scene) {
        let Some(object) = scene.get_mut(self.id) else {
            tracing::warn!("Cannot transform object {}: not in scene", self.id);
            return;
        };
        match self.after {
            Some(after) => object.set_transform(after),
            None => {
                let after = *object.transform();
                self.meta.add_debug_info("before", self.before);
                self.meta.add_debug_info("after", after);
                self.after = Some(after);
            }
        }
    }

    fn undo(&mut self, scene: &mut Scene) {
        match scene.get_mut(self.id) {
            Some(object) => object.set_transform(self.before),
            None => tracing::warn!("Cannot undo transform of {}: not in scene", self.id),
        }
    }
}
