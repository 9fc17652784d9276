// src/cli/handlers/archive.rs

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::cli::handlers::commons;
use crate::core::case_book::CaseBook;
use crate::error::{DomainError, ExecutionError, ParseError};
use crate::models::{DisplayIndex, Person};

/// Archives or unarchives one displayed person.
#[derive(Debug)]
pub struct ToggleArchive {
    index: DisplayIndex,
    archive: bool,
    before: Option<Person>,
}

/// `archive INDEX`
pub fn parse_archive(args: &str) -> Result<Command, ParseError> {
    let index = commons::parse_index(args, "index", t!("archive.usage"))?;
    Ok(Command::new("archive", Action::Archive(ToggleArchive::new(index, true))))
}

/// `unarchive INDEX`
pub fn parse_unarchive(args: &str) -> Result<Command, ParseError> {
    let index = commons::parse_index(args, "index", t!("unarchive.usage"))?;
    Ok(Command::new(
        "unarchive",
        Action::Archive(ToggleArchive::new(index, false)),
    ))
}

impl ToggleArchive {
    fn new(index: DisplayIndex, archive: bool) -> Self {
        Self {
            index,
            archive,
            before: None,
        }
    }
}

impl Executable for ToggleArchive {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let target = ctx.book.displayed_person(self.index)?;
        let name = target.name.to_string();

        match (self.archive, target.archived) {
            (true, true) => return Err(DomainError::AlreadyArchived { name }.into()),
            (false, false) => return Err(DomainError::NotArchived { name }.into()),
            _ => {}
        }

        ctx.book
            .replace_person(&target.name, target.with_archived(self.archive))?;
        self.before = Some(target);

        let message = if self.archive {
            format!(t!("archive.success"), name = name)
        } else {
            format!(t!("unarchive.success"), name = name)
        };
        Ok(Feedback::new(message))
    }

    fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        let Some(before) = &self.before else {
            return Err(ExecutionError::NothingToUndo);
        };
        book.replace_person(&before.name, before.clone())?;
        let message = if self.archive {
            format!(t!("archive.undo"), name = before.name)
        } else {
            format!(t!("unarchive.undo"), name = before.name)
        };
        Ok(message)
    }
}
