// src/cli/handlers/find.rs

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::core::arg_parser::{ParsedArgs, Prefix};
use crate::error::{ExecutionError, ParseError, ValidationError};
use crate::models::{FindCriteria, PersonFilter, Priority};

const FIND_PREFIXES: &[Prefix] = &["n/", "a/", "pri/"];

/// Person prefixes that `find` recognises only to reject them.
const UNSEARCHABLE_PREFIXES: &[Prefix] = &["p/", "e/", "dob/", "income/", "fs/", "r/", "t/"];

#[derive(Debug)]
pub struct FindPersons {
    criteria: FindCriteria,
}

impl FindPersons {
    pub fn criteria(&self) -> &FindCriteria {
        &self.criteria
    }
}

/// Splits `Alice Tan | Bob` into trimmed, non-empty keywords.
fn keywords(values: &[String], field: &'static str, usage: &'static str) -> Result<Vec<String>, ParseError> {
    let mut out = Vec::new();
    for value in values {
        for keyword in value.split('|').map(str::trim) {
            if keyword.is_empty() {
                return Err(ParseError::InvalidFormat {
                    field,
                    detail: "keywords separated by '|' must not be blank".to_string(),
                    usage,
                });
            }
            out.push(keyword.to_string());
        }
    }
    Ok(out)
}

/// `find [n/NAME [| NAME]...]... [a/ADDRESS [| ADDRESS]...]... [pri/PRIORITY [PRIORITY]...]...`
pub fn parse(args: &str) -> Result<Command, ParseError> {
    let usage = t!("find.usage");
    let all_prefixes: Vec<Prefix> = FIND_PREFIXES
        .iter()
        .chain(UNSEARCHABLE_PREFIXES)
        .copied()
        .collect();
    let parsed = ParsedArgs::new(args, &all_prefixes);

    if let Some(unsupported) = UNSEARCHABLE_PREFIXES.iter().find(|p| parsed.has(**p)) {
        return Err(ParseError::InvalidFormat {
            field: "arguments",
            detail: format!("cannot search by {}", unsupported),
            usage,
        });
    }
    if !parsed.preamble().is_empty() {
        return Err(ParseError::InvalidFormat {
            field: "arguments",
            detail: format!("unexpected '{}' before the first field", parsed.preamble()),
            usage,
        });
    }

    let priorities = parsed
        .all_values("pri/")
        .iter()
        .flat_map(|v| v.split_whitespace())
        .map(str::parse::<Priority>)
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let criteria = FindCriteria {
        names: keywords(parsed.all_values("n/"), "name (n/)", usage)?,
        addresses: keywords(parsed.all_values("a/"), "address (a/)", usage)?,
        priorities,
    };
    if criteria.is_empty() {
        return Err(ParseError::MissingField {
            field: "search keywords",
            usage,
        });
    }

    Ok(Command::new("find", Action::Find(FindPersons { criteria })))
}

impl Executable for FindPersons {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        ctx.book
            .set_filter(PersonFilter::Matching(self.criteria.clone()));
        let count = ctx.book.view().person_count();
        Ok(Feedback::new(format!(t!("find.success"), count = count)))
    }
}
