// src/cli/handlers/help.rs

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback, Signal};
use crate::cli::handlers::commons;
use crate::error::{ExecutionError, ParseError};

#[derive(Debug)]
pub struct Help;

#[derive(Debug)]
pub struct Exit;

/// `help`. Trailing words are ignored.
pub fn parse_help(_args: &str) -> Result<Command, ParseError> {
    Ok(Command::new("help", Action::Help(Help)))
}

/// `exit`
pub fn parse_exit(args: &str) -> Result<Command, ParseError> {
    commons::expect_no_args(args, t!("exit.usage"))?;
    Ok(Command::new("exit", Action::Exit(Exit)))
}

impl Executable for Help {
    fn execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        Ok(Feedback::new(t!("help.text")).with_signal(Signal::ShowHelp))
    }
}

impl Executable for Exit {
    fn execute(&mut self, _ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        Ok(Feedback::new(t!("exit.message")).with_signal(Signal::Exit))
    }
}
