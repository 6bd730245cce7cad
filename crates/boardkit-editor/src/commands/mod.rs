//! Reversible scene mutations.
//!
//! Every user-visible change goes through a [`Command`] so it can be undone.
//! Commands capture before and after state themselves; they never replay
//! input events. [`EditorCommand`] wraps the concrete commands in one enum so
//! the [`CommandProcessor`] can store them without boxing.

mod add;
mod crop;
mod delete;
mod processor;
mod select;
mod text_edit;
mod transform;

pub use add::AddCommand;
pub use crop::CropCommand;
pub use delete::DeleteCommand;
pub use processor::{CommandProcessor, DEFAULT_MAX_UNDO_STACK_SIZE};
pub use select::SelectCommand;
pub use text_edit::TextEditCommand;
pub use transform::TransformCommand;

use crate::scene::Scene;
use crate::types::ObjectId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    Add,
    Delete,
    Select,
    Transform,
    TextEdit,
    Crop,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Add => "add",
            CommandKind::Delete => "delete",
            CommandKind::Select => "select",
            CommandKind::Transform => "transform",
            CommandKind::TextEdit => "text-edit",
            CommandKind::Crop => "crop",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation time plus free-form debug data a command may attach.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandMeta {
    pub timestamp: DateTime<Utc>,
    pub debug: Map<String, Value>,
}

impl Default for CommandMeta {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            debug: Map::new(),
        }
    }
}

impl CommandMeta {
    pub fn add_debug_info(&mut self, key: &str, value: impl Serialize) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.debug.insert(key.to_string(), value);
            }
            Err(e) => tracing::debug!("Unserializable debug info '{}': {}", key, e),
        }
    }
}

/// A reversible mutation of a [`Scene`].
///
/// `undo` followed by `redo` must leave the scene observably identical to
/// how it was before the undo. Commands whose target has left the scene
/// log a warning and do nothing.
pub trait Command {
    fn kind(&self) -> CommandKind;

    /// The object this command is about, if any.
    fn target_id(&self) -> Option<ObjectId>;

    fn meta(&self) -> &CommandMeta;

    fn execute(&mut self, scene: &mut Scene);

    fn undo(&mut self, scene: &mut Scene);

    fn redo(&mut self, scene: &mut Scene) {
        self.execute(scene);
    }
}

#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum EditorCommand {
    Add(AddCommand),
    Delete(DeleteCommand),
    Select(SelectCommand),
    Transform(TransformCommand),
    TextEdit(TextEditCommand),
    Crop(CropCommand),
}

macro_rules! dispatch {
    ($self:ident, $cmd:ident => $body:expr) => {
        match $self {
            EditorCommand::Add($cmd) => $body,
            EditorCommand::Delete($cmd) => $body,
            EditorCommand::Select($cmd) => $body,
            EditorCommand::Transform($cmd) => $body,
            EditorCommand::TextEdit($cmd) => $body,
            EditorCommand::Crop($cmd) => $body,
        }
    };
}

impl Command for EditorCommand {
    fn kind(&self) -> CommandKind {
        dispatch!(self, cmd => cmd.kind())
    }

    fn target_id(&self) -> Option<ObjectId> {
        dispatch!(self, cmd => cmd.target_id())
    }

    fn meta(&self) -> &CommandMeta {
        dispatch!(self, cmd => cmd.meta())
    }

    fn execute(&mut self, scene: &mut Scene) {
        dispatch!(self, cmd => cmd.execute(scene))
    }

    fn undo(&mut self, scene: &mut Scene) {
        dispatch!(self, cmd => cmd.undo(scene))
    }

    fn redo(&mut self, scene: &mut Scene) {
        dispatch!(self, cmd => cmd.redo(scene))
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for EditorCommand {
            fn from(cmd: $ty) -> Self {
                EditorCommand::$variant(cmd)
            }
        })*
    };
}

impl_from!(
    Add(AddCommand),
    Delete(DeleteCommand),
    Select(SelectCommand),
    Transform(TransformCommand),
    TextEdit(TextEditCommand),
    Crop(CropCommand),
);
