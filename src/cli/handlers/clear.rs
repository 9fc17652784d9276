// src/cli/handlers/clear.rs

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::cli::handlers::commons;
use crate::core::case_book::{CaseBook, Removal};
use crate::error::{ExecutionError, ParseError};

/// Empties the whole book. Undo brings every person and appointment back.
#[derive(Debug)]
pub struct ClearBook {
    removal: Option<Removal>,
}

/// `clear`
pub fn parse(args: &str) -> Result<Command, ParseError> {
    commons::expect_no_args(args, t!("clear.usage"))?;
    Ok(Command::new("clear", Action::Clear(ClearBook { removal: None })))
}

impl Executable for ClearBook {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        self.removal = Some(ctx.book.clear());
        Ok(Feedback::new(t!("clear.success")))
    }

    fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        let Some(removal) = &self.removal else {
            return Err(ExecutionError::NothingToUndo);
        };
        book.restore(removal.clone())?;
        Ok(t!("clear.undo").to_string())
    }
}
