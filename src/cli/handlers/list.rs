// src/cli/handlers/list.rs

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::core::arg_parser::{ParsedArgs, Prefix};
use crate::error::{ExecutionError, ParseError};
use crate::models::{ListMode, PersonFilter};

const LIST_PREFIXES: &[Prefix] = &["all/", "archive/"];

#[derive(Debug)]
pub struct ListPersons {
    mode: ListMode,
}

impl ListPersons {
    pub fn mode(&self) -> ListMode {
        self.mode
    }
}

/// `list`, `list all/` or `list archive/`
pub fn parse(args: &str) -> Result<Command, ParseError> {
    let usage = t!("list.usage");
    let parsed = ParsedArgs::new(args, LIST_PREFIXES);

    let stray = !parsed.preamble().is_empty()
        || LIST_PREFIXES
            .iter()
            .flat_map(|p| parsed.all_values(*p))
            .any(|v| !v.is_empty());
    if stray {
        return Err(ParseError::InvalidFormat {
            field: "arguments",
            detail: format!("unexpected '{}'", args.trim()),
            usage,
        });
    }

    let mode = match (parsed.has("all/"), parsed.has("archive/")) {
        (false, false) => ListMode::Unarchived,
        (true, false) => ListMode::All,
        (false, true) => ListMode::Archived,
        (true, true) => {
            return Err(ParseError::InvalidFormat {
                field: "arguments",
                detail: "all/ and archive/ cannot be combined".to_string(),
                usage,
            });
        }
    };

    Ok(Command::new("list", Action::List(ListPersons { mode })))
}

impl Executable for ListPersons {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        ctx.book.set_filter(PersonFilter::Listing(self.mode));
        let message = match self.mode {
            ListMode::Unarchived => t!("list.success.unarchived"),
            ListMode::Archived => t!("list.success.archived"),
            ListMode::All => t!("list.success.all"),
        };
        Ok(Feedback::new(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(args: &str) -> Result<ListMode, ParseError> {
        parse(args).map(|cmd| match cmd.action() {
            Action::List(list) => list.mode(),
            other => unreachable!("list parsed into {:?}", other),
        })
    }

    #[test]
    fn test_list_modes() {
        assert_eq!(mode(""), Ok(ListMode::Unarchived));
        assert_eq!(mode(" all/"), Ok(ListMode::All));
        assert_eq!(mode("archive/ "), Ok(ListMode::Archived));
    }

    #[test]
    fn test_list_rejects_extra_text() {
        assert!(mode("everyone").is_err());
        assert!(mode("all/ please").is_err());
        assert!(mode("all/ archive/").is_err());
    }
}
