// src/cli/handlers/undo.rs

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::cli::handlers::commons;
use crate::error::{ExecutionError, ParseError};

/// Reverses the newest reversible command. Never recorded itself, so two
/// `undo`s in a row walk two steps back.
#[derive(Debug)]
pub struct UndoLast;

/// `undo`
pub fn parse(args: &str) -> Result<Command, ParseError> {
    commons::expect_no_args(args, t!("undo.usage"))?;
    Ok(Command::new("undo", Action::Undo(UndoLast)))
}

impl Executable for UndoLast {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let detail = ctx.history.undo_last(ctx.book)?;
        Ok(Feedback::new(format!(t!("undo.success"), detail = detail)))
    }
}
