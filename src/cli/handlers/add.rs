// src/cli/handlers/add.rs

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::cli::handlers::commons::{PERSON_PREFIXES, PersonPatch, SINGLE_PERSON_PREFIXES};
use crate::core::arg_parser::ParsedArgs;
use crate::core::case_book::CaseBook;
use crate::error::{ExecutionError, ParseError};
use crate::models::{Address, Email, Name, Person, PersonFilter, Phone};

#[derive(Debug)]
pub struct AddPerson {
    person: Person,
    /// The filter that hid the new person, if `execute` had to replace it.
    replaced_filter: Option<PersonFilter>,
}

impl AddPerson {
    pub fn person(&self) -> &Person {
        &self.person
    }
}

/// `add n/NAME p/PHONE e/EMAIL a/ADDRESS [pri/..] [dob/..] [income/..] [fs/..] [r/..] [t/..]...`
pub fn parse(args: &str) -> Result<Command, ParseError> {
    let usage = t!("add.usage");
    let parsed = ParsedArgs::new(args, PERSON_PREFIXES);

    if !parsed.preamble().is_empty() {
        return Err(ParseError::InvalidFormat {
            field: "arguments",
            detail: format!("unexpected '{}' before the first field", parsed.preamble()),
            usage,
        });
    }
    parsed.ensure_single(SINGLE_PERSON_PREFIXES, usage)?;

    // The four mandatory fields, reported in this order when missing.
    let name = Name::parse(parsed.require("n/", "name (n/)", usage)?)?;
    let phone = Phone::parse(parsed.require("p/", "phone (p/)", usage)?)?;
    let email = Email::parse(parsed.require("e/", "email (e/)", usage)?)?;
    let address = Address::parse(parsed.require("a/", "address (a/)", usage)?)?;

    let base = Person::new(name, phone, email, address);
    let person = PersonPatch::from_args(&parsed)?.apply_to(&base);

    Ok(Command::new(
        "add",
        Action::Add(AddPerson {
            person,
            replaced_filter: None,
        }),
    ))
}

impl Executable for AddPerson {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        ctx.book.add_person(self.person.clone())?;
        // Make sure the new entry is on screen.
        if !ctx.book.filter().matches(&self.person) {
            self.replaced_filter = Some(ctx.book.filter().clone());
            ctx.book.set_filter(PersonFilter::default());
        }
        Ok(Feedback::new(format!(t!("add.success"), person = self.person)))
    }

    fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        book.remove_person(&self.person.name)?;
        if let Some(filter) = &self.replaced_filter {
            book.set_filter(filter.clone());
        }
        Ok(format!(t!("add.undo"), name = self.person.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn parsed_person(args: &str) -> Person {
        match parse(args).unwrap().action() {
            Action::Add(add) => add.person().clone(),
            other => unreachable!("add parsed into {:?}", other),
        }
    }

    #[test]
    fn test_parse_full_add() {
        let person = parsed_person(
            " n/Alex Yeoh p/87438807 e/alexyeoh@example.com a/Blk 30 Geylang Street 29, #06-40 \
             pri/high dob/12 Mar 1985 income/1200 fs/3 r/Lives alone t/elderly t/priority",
        );

        assert_eq!(person.name.as_str(), "Alex Yeoh");
        assert_eq!(person.priority, Priority::High);
        assert_eq!(person.income.amount(), 1200.0);
        assert_eq!(person.family_size.members(), 3);
        assert_eq!(person.remark, "Lives alone");
        assert_eq!(person.tags.len(), 2);
        assert!(!person.archived);
    }

    #[test]
    fn test_missing_mandatory_field() {
        let err = parse("n/Alex Yeoh p/87438807 a/Somewhere").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingField {
                field: "email (e/)",
                ..
            }
        ));
    }

    #[test]
    fn test_repeated_name_is_rejected() {
        let err =
            parse("n/Alex n/Bernice p/87438807 e/alex@example.com a/Somewhere").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat { .. }));
    }

    #[test]
    fn test_preamble_is_rejected() {
        let err = parse("hello n/Alex p/87438807 e/alex@example.com a/Somewhere").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat { .. }));
    }
}
