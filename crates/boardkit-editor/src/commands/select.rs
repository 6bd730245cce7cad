use super::{Command, CommandKind, CommandMeta};
use crate::scene::Scene;
use crate::types::ObjectId;

/// Change the selection. `None` clears it.
#[derive(Debug, Clone)]
pub struct SelectCommand {
    target: Option<ObjectId>,
    /// Selection before the last execute.
    previous: Option<ObjectId>,
    meta: CommandMeta,
}

impl SelectCommand {
    pub fn new(target: Option<ObjectId>) -> Self {
        Self {
            target,
            previous: None,
            meta: CommandMeta::default(),
        }
    }

    pub fn previous(&self) -> Option<ObjectId> {
        self.previous
    }
}

fn apply(scene: &mut Scene, id: Option<ObjectId>) {
    match id {
        Some(id) => {
            if !scene.select(id) {
                scene.clear_selection();
            }
        }
        None => scene.clear_selection(),
    }
}

impl Command for SelectCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Select
    }

    fn target_id(&self) -> Option<ObjectId> {
        self.target
    }

    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn execute(&mut self, scene: &mut Scene) {
        self.previous = scene.selected_id();
        apply(scene, self.target);
    }

    fn undo(&mut self, scene: &mut Scene) {
        apply(scene, self.previous);
    }
}
