// src/cli/handlers/scheme.rs

//! `scheme`, `addscheme` and `deletescheme`.

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::cli::handlers::commons;
use crate::core::arg_parser::ParsedArgs;
use crate::core::case_book::CaseBook;
use crate::error::{DomainError, ExecutionError, ParseError, ValidationError};
use crate::models::{DisplayIndex, Person};

const SCHEME_PREFIXES: &[&str] = &["i/"];

/// Lists the schemes a displayed person is eligible for.
#[derive(Debug)]
pub struct ViewSchemes {
    index: DisplayIndex,
}

/// `scheme INDEX`
pub fn parse_view(args: &str) -> Result<Command, ParseError> {
    let index = commons::parse_index(args, "index", t!("scheme.usage"))?;
    Ok(Command::new("scheme", Action::ViewSchemes(ViewSchemes { index })))
}

impl Executable for ViewSchemes {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let person = ctx.book.displayed_person(self.index)?;
        let eligible = ctx.schemes.eligible_for(&person);

        if eligible.is_empty() {
            return Ok(Feedback::new(format!(t!("scheme.none"), name = person.name)));
        }
        let listing = commons::numbered(eligible.iter().map(|s| s.name()));
        Ok(Feedback::new(format!(
            t!("scheme.success"),
            name = person.name,
            schemes = listing
        )))
    }
}

/// Enrols a displayed person in one of their eligible schemes.
#[derive(Debug)]
pub struct AddScheme {
    index: DisplayIndex,
    scheme: DisplayIndex,
    before: Option<Person>,
}

/// `addscheme INDEX i/SCHEME_INDEX`
pub fn parse_add(args: &str) -> Result<Command, ParseError> {
    let usage = t!("addscheme.usage");
    let parsed = ParsedArgs::new(args, SCHEME_PREFIXES);
    let index = commons::parse_index(parsed.preamble(), "index", usage)?;
    parsed.ensure_single(SCHEME_PREFIXES, usage)?;
    let scheme = commons::parse_index(
        parsed.require("i/", "scheme index (i/)", usage)?,
        "scheme index (i/)",
        usage,
    )?;

    Ok(Command::new(
        "addscheme",
        Action::AddScheme(AddScheme {
            index,
            scheme,
            before: None,
        }),
    ))
}

impl Executable for AddScheme {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let person = ctx.book.displayed_person(self.index)?;
        let eligible = ctx.schemes.eligible_for(&person);
        let scheme = eligible
            .get(self.scheme.zero_based())
            .ok_or(ValidationError::InvalidIndex {
                target: "scheme",
                index: self.scheme.one_based(),
                len: eligible.len(),
            })?
            .name()
            .to_string();

        if person.is_enrolled_in(&scheme) {
            return Err(DomainError::DuplicateScheme {
                name: person.name.to_string(),
                scheme,
            }
            .into());
        }

        let mut schemes = person.schemes.clone();
        schemes.push(scheme.clone());
        ctx.book
            .replace_person(&person.name, person.with_schemes(schemes))?;

        let message = format!(t!("addscheme.success"), scheme = scheme, name = person.name);
        self.before = Some(person);
        Ok(Feedback::new(message))
    }

    fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        let Some(before) = &self.before else {
            return Err(ExecutionError::NothingToUndo);
        };
        book.replace_person(&before.name, before.clone())?;
        Ok(format!(t!("addscheme.undo"), name = before.name))
    }
}

/// Removes schemes, by their position in the person's enrolment list.
#[derive(Debug)]
pub struct DeleteSchemes {
    index: DisplayIndex,
    schemes: Vec<DisplayIndex>,
    before: Option<Person>,
}

/// `deletescheme INDEX i/SCHEME_INDEX[,SCHEME_INDEX]...`
pub fn parse_delete(args: &str) -> Result<Command, ParseError> {
    let usage = t!("deletescheme.usage");
    let parsed = ParsedArgs::new(args, SCHEME_PREFIXES);
    let index = commons::parse_index(parsed.preamble(), "index", usage)?;
    parsed.ensure_single(SCHEME_PREFIXES, usage)?;
    let schemes = commons::parse_index_list(
        parsed.require("i/", "scheme index (i/)", usage)?,
        "scheme index (i/)",
        usage,
    )?;

    Ok(Command::new(
        "deletescheme",
        Action::DeleteScheme(DeleteSchemes {
            index,
            schemes,
            before: None,
        }),
    ))
}

impl Executable for DeleteSchemes {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let person = ctx.book.displayed_person(self.index)?;
        let enrolled = person.schemes.len();

        if let Some(bad) = self.schemes.iter().find(|i| i.zero_based() >= enrolled) {
            return Err(ValidationError::InvalidIndex {
                target: "scheme",
                index: bad.one_based(),
                len: enrolled,
            }
            .into());
        }

        let (removed, kept): (Vec<_>, Vec<_>) = person
            .schemes
            .iter()
            .cloned()
            .enumerate()
            .partition(|(i, _)| self.schemes.iter().any(|s| s.zero_based() == *i));
        let kept = kept.into_iter().map(|(_, s)| s).collect();
        let removed: Vec<String> = removed.into_iter().map(|(_, s)| s).collect();

        ctx.book
            .replace_person(&person.name, person.with_schemes(kept))?;

        let message = format!(
            t!("deletescheme.success"),
            schemes = removed.join(", "),
            name = person.name
        );
        self.before = Some(person);
        Ok(Feedback::new(message))
    }

    fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        let Some(before) = &self.before else {
            return Err(ExecutionError::NothingToUndo);
        };
        book.replace_person(&before.name, before.clone())?;
        Ok(format!(t!("deletescheme.undo"), name = before.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_parsers() {
        assert!(parse_view("1").is_ok());
        assert!(matches!(
            parse_add("1"),
            Err(ParseError::MissingField { .. })
        ));
        assert!(matches!(
            parse_add("1 i/1 i/2"),
            Err(ParseError::InvalidFormat { .. })
        ));
        assert!(parse_delete("1 i/2,1,2").is_ok());
        assert!(matches!(
            parse_delete("1 i/0"),
            Err(ParseError::InvalidFormat { .. })
        ));
    }
}
