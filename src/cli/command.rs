// src/cli/command.rs

use crate::cli::handlers::{
    add::AddPerson,
    appointment::{AddAppointment, DeleteAppointment, EditAppointment, ListAppointments},
    archive::ToggleArchive,
    clear::ClearBook,
    delete::DeletePersons,
    edit::EditPerson,
    find::FindPersons,
    help::{Exit, Help},
    list::ListPersons,
    scheme::{AddScheme, DeleteSchemes, ViewSchemes},
    statistics::Statistics,
    undo::UndoLast,
};
use crate::core::case_book::CaseBook;
use crate::core::history::CommandHistory;
use crate::core::schemes::SchemeCatalog;
use crate::error::ExecutionError;

/// Lifecycle of a single command instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Created,
    Executed,
    Reversed,
}

impl CommandState {
    fn describe(self) -> &'static str {
        match self {
            Self::Created => "not yet executed",
            Self::Executed => "executed",
            Self::Reversed => "already undone",
        }
    }
}

/// What the presentation layer should do besides showing the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    #[default]
    None,
    ShowHelp,
    Exit,
}

/// The user-facing outcome of a successful execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub signal: Signal,
}

impl Feedback {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            signal: Signal::None,
        }
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = signal;
        self
    }
}

/// Everything a command may touch while executing.
#[derive(Debug)]
pub struct ExecutionContext<'a> {
    pub book: &'a mut CaseBook,
    pub history: &'a mut CommandHistory,
    pub schemes: &'a SchemeCatalog,
}

/// Implemented by every command variant. Only reversible variants override
/// `undo`; they must restore the book to its state before `execute`.
pub(crate) trait Executable {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError>;

    fn undo(&mut self, _book: &mut CaseBook) -> Result<String, ExecutionError> {
        Err(ExecutionError::NothingToUndo)
    }
}

/// Every command the engine understands, with its arguments and whatever it
/// captured while executing.
#[derive(Debug)]
pub enum Action {
    Add(AddPerson),
    Delete(DeletePersons),
    Edit(EditPerson),
    Archive(ToggleArchive),
    AddScheme(AddScheme),
    DeleteScheme(DeleteSchemes),
    AddAppointment(AddAppointment),
    DeleteAppointment(DeleteAppointment),
    EditAppointment(EditAppointment),
    Clear(ClearBook),
    List(ListPersons),
    Find(FindPersons),
    ListAppointments(ListAppointments),
    ViewSchemes(ViewSchemes),
    Statistics(Statistics),
    Undo(UndoLast),
    Help(Help),
    Exit(Exit),
}

/// A parsed command bound to its lifecycle state.
#[derive(Debug)]
pub struct Command {
    keyword: &'static str,
    action: Action,
    state: CommandState,
}

impl Command {
    pub fn new(keyword: &'static str, action: Action) -> Self {
        Self {
            keyword,
            action,
            state: CommandState::Created,
        }
    }

    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Whether a successful execution is recorded for undo.
    pub fn is_reversible(&self) -> bool {
        matches!(
            self.action,
            Action::Add(_)
                | Action::Delete(_)
                | Action::Edit(_)
                | Action::Archive(_)
                | Action::AddScheme(_)
                | Action::DeleteScheme(_)
                | Action::AddAppointment(_)
                | Action::DeleteAppointment(_)
                | Action::EditAppointment(_)
                | Action::Clear(_)
        )
    }

    /// Runs the command. On failure the book is unchanged and the command
    /// stays `Created`.
    pub fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        if self.state != CommandState::Created {
            return Err(self.illegal("execute"));
        }
        log::debug!("Executing '{}'", self.keyword);
        let feedback = self.executable().execute(ctx)?;
        self.state = CommandState::Executed;
        Ok(feedback)
    }

    /// Applies the inverse captured during `execute`.
    pub fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        if !self.is_reversible() {
            return Err(ExecutionError::NothingToUndo);
        }
        if self.state != CommandState::Executed {
            return Err(self.illegal("undo"));
        }
        log::debug!("Undoing '{}'", self.keyword);
        let message = self.executable().undo(book)?;
        self.state = CommandState::Reversed;
        Ok(message)
    }

    fn illegal(&self, operation: &'static str) -> ExecutionError {
        ExecutionError::IllegalState {
            keyword: self.keyword,
            operation,
            state: self.state.describe(),
        }
    }

    fn executable(&mut self) -> &mut dyn Executable {
        match &mut self.action {
            Action::Add(c) => c,
            Action::Delete(c) => c,
            Action::Edit(c) => c,
            Action::Archive(c) => c,
            Action::AddScheme(c) => c,
            Action::DeleteScheme(c) => c,
            Action::AddAppointment(c) => c,
            Action::DeleteAppointment(c) => c,
            Action::EditAppointment(c) => c,
            Action::Clear(c) => c,
            Action::List(c) => c,
            Action::Find(c) => c,
            Action::ListAppointments(c) => c,
            Action::ViewSchemes(c) => c,
            Action::Statistics(c) => c,
            Action::Undo(c) => c,
            Action::Help(c) => c,
            Action::Exit(c) => c,
        }
    }
}
