use super::{Command, EditorCommand};
use crate::scene::Scene;
use std::collections::VecDeque;

pub const DEFAULT_MAX_UNDO_STACK_SIZE: usize = 50;

/// Undo and redo stacks of executed commands.
///
/// The undo stack is bounded; the oldest entry is evicted on overflow.
/// Executing a new command discards the redo history.
#[derive(Debug)]
pub struct CommandProcessor {
    undo_stack: VecDeque<EditorCommand>,
    redo_stack: Vec<EditorCommand>,
    max_undo_stack_size: usize,
    debug: bool,
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_STACK_SIZE)
    }
}

impl CommandProcessor {
    pub fn new(max_undo_stack_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_undo_stack_size: max_undo_stack_size.max(1),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn max_undo_stack_size(&self) -> usize {
        self.max_undo_stack_size
    }

    pub fn execute(&mut self, command: impl Into<EditorCommand>, scene: &mut Scene) {
        let mut command = command.into();
        tracing::debug!(
            "Executing {} command on {:?}",
            command.kind(),
            command.target_id()
        );

        self.redo_stack.clear();
        command.execute(scene);
        self.undo_stack.push_back(command);

        while self.undo_stack.len() > self.max_undo_stack_size {
            self.undo_stack.pop_front();
        }
        self.log_state();
    }

    /// Returns false when there was nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return false;
        };
        tracing::debug!("Undoing {} command on {:?}", command.kind(), command.target_id());
        command.undo(scene);
        self.redo_stack.push(command);
        self.log_state();
        true
    }

    /// Returns false when there was nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(mut command) = self.redo_stack.pop() else {
            return false;
        };
        tracing::debug!("Redoing {} command on {:?}", command.kind(), command.target_id());
        command.redo(scene);
        self.undo_stack.push_back(command);
        self.log_state();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Commands that can still be undone, oldest first.
    pub fn undo_history(&self) -> impl Iterator<Item = &EditorCommand> {
        self.undo_stack.iter()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.log_state();
    }

    fn log_state(&self) {
        if !self.debug {
            return;
        }
        tracing::debug!(
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            last = ?self.undo_stack.back().map(|c| c.kind()),
            "Command processor state"
        );
    }
}
