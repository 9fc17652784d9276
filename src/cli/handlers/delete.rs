// src/cli/handlers/delete.rs

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::cli::handlers::commons;
use crate::core::case_book::{CaseBook, Removal};
use crate::error::{ExecutionError, ParseError};
use crate::models::{DisplayIndex, Name};

/// Deletes one or more displayed persons together with their appointments.
#[derive(Debug)]
pub struct DeletePersons {
    targets: Vec<DisplayIndex>,
    removal: Option<Removal>,
}

impl DeletePersons {
    /// Sorted, without duplicates.
    pub fn targets(&self) -> &[DisplayIndex] {
        &self.targets
    }
}

/// `delete INDEX[,INDEX]...`
pub fn parse(args: &str) -> Result<Command, ParseError> {
    let targets = commons::parse_index_list(args, "index", t!("delete.usage"))?;
    Ok(Command::new(
        "delete",
        Action::Delete(DeletePersons {
            targets,
            removal: None,
        }),
    ))
}

impl Executable for DeletePersons {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        // 1. Resolve every index first so a bad one deletes nothing.
        let names = self
            .targets
            .iter()
            .map(|&index| ctx.book.displayed_person(index).map(|p| p.name))
            .collect::<Result<Vec<Name>, _>>()?;

        // 2. Remove persons and their appointments in one step.
        let removal = ctx.book.remove_persons(&names)?;
        let listing = commons::numbered(removal.persons.iter().map(|(_, p)| p));
        let message = format!(
            t!("delete.success"),
            count = removal.persons.len(),
            appointments = removal.appointments.len(),
            persons = listing
        );
        self.removal = Some(removal);
        Ok(Feedback::new(message))
    }

    fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        let Some(removal) = &self.removal else {
            return Err(ExecutionError::NothingToUndo);
        };
        let count = removal.persons.len();
        book.restore(removal.clone())?;
        Ok(format!(t!("delete.undo"), count = count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(args: &str) -> Vec<usize> {
        match parse(args).unwrap().action() {
            Action::Delete(d) => d.targets().iter().map(|i| i.one_based()).collect(),
            other => unreachable!("delete parsed into {:?}", other),
        }
    }

    #[test]
    fn test_repeated_indices_collapse() {
        assert_eq!(targets("1,1,1,2"), targets("1,2"));
        assert_eq!(targets(" 3, 1 "), vec![1, 3]);
    }

    #[test]
    fn test_bad_indices_are_parse_errors() {
        assert!(matches!(parse("0"), Err(ParseError::InvalidFormat { .. })));
        assert!(matches!(parse("1,x"), Err(ParseError::InvalidFormat { .. })));
        assert!(matches!(parse(""), Err(ParseError::MissingField { .. })));
    }
}
