// src/cli/handlers/edit.rs

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::cli::handlers::commons::{self, PERSON_PREFIXES, PersonPatch, SINGLE_PERSON_PREFIXES};
use crate::core::arg_parser::ParsedArgs;
use crate::core::case_book::CaseBook;
use crate::error::{ExecutionError, ParseError};
use crate::models::{DisplayIndex, Person};

#[derive(Debug)]
pub struct EditPerson {
    index: DisplayIndex,
    patch: PersonPatch,
    /// (before, after) once executed.
    applied: Option<(Person, Person)>,
}

/// `edit INDEX [n/NAME] [p/PHONE] [e/EMAIL] [a/ADDRESS] [pri/..] [dob/..] [income/..] [fs/..] [r/..] [t/..]...`
pub fn parse(args: &str) -> Result<Command, ParseError> {
    let usage = t!("edit.usage");
    let parsed = ParsedArgs::new(args, PERSON_PREFIXES);
    let index = commons::parse_index(parsed.preamble(), "index", usage)?;
    parsed.ensure_single(SINGLE_PERSON_PREFIXES, usage)?;

    let patch = PersonPatch::from_args(&parsed)?;
    if patch.is_empty() {
        return Err(ParseError::MissingField {
            field: "field to edit",
            usage,
        });
    }

    Ok(Command::new(
        "edit",
        Action::Edit(EditPerson {
            index,
            patch,
            applied: None,
        }),
    ))
}

impl Executable for EditPerson {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let before = ctx.book.displayed_person(self.index)?;
        let after = self.patch.apply_to(&before);

        ctx.book.replace_person(&before.name, after.clone())?;

        let message = format!(t!("edit.success"), person = after);
        self.applied = Some((before, after));
        Ok(Feedback::new(message))
    }

    fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        let Some((before, after)) = &self.applied else {
            return Err(ExecutionError::NothingToUndo);
        };
        book.replace_person(&after.name, before.clone())?;
        Ok(format!(t!("edit.undo"), name = before.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_requires_index_and_a_field() {
        assert!(matches!(
            parse("n/Alex"),
            Err(ParseError::MissingField { field: "index", .. })
        ));
        assert!(matches!(
            parse("2"),
            Err(ParseError::MissingField {
                field: "field to edit",
                ..
            })
        ));
        assert!(parse("2 t/").is_ok());
    }

    #[test]
    fn test_edit_rejects_bad_index() {
        assert!(matches!(
            parse("-3 p/91234567"),
            Err(ParseError::InvalidFormat { .. })
        ));
    }
}
