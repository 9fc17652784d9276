// src/core/history.rs

use crate::cli::command::Command;
use crate::core::case_book::CaseBook;
use crate::error::ExecutionError;

/// Successfully executed reversible commands, newest last.
///
/// Undo is strictly LIFO and one step per call. An undone command moves to a
/// read-only trail; it can never be re-applied.
#[derive(Debug, Default)]
pub struct CommandHistory {
    executed: Vec<Command>,
    reversed: Vec<Command>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an executed command. Irreversible commands are not kept.
    pub fn record(&mut self, command: Command) {
        if !command.is_reversible() {
            log::debug!("Not recording irreversible command '{}'", command.keyword());
            return;
        }
        log::debug!("Recording '{}' (depth {})", command.keyword(), self.executed.len() + 1);
        self.executed.push(command);
    }

    /// Reverses the newest recorded command. Fails with `NothingToUndo`, and
    /// leaves the book untouched, when there is nothing reversible to undo.
    pub fn undo_last(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        let Some(last) = self.executed.last_mut() else {
            return Err(ExecutionError::NothingToUndo);
        };
        if !last.is_reversible() {
            return Err(ExecutionError::NothingToUndo);
        }

        let message = last.undo(book)?;
        if let Some(undone) = self.executed.pop() {
            self.reversed.push(undone);
        }
        Ok(message)
    }

    pub fn len(&self) -> usize {
        self.executed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }

    /// Commands already undone, oldest first.
    pub fn reversed(&self) -> &[Command] {
        &self.reversed
    }
}
