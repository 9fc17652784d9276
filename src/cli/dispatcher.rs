// src/cli/dispatcher.rs

use crate::cli::command::Command;
use crate::cli::handlers;
use crate::error::ParseError;

// --- Command Definition and Registry ---

/// A command keyword, its aliases and the parser for its arguments.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    parser: fn(&str) -> Result<Command, ParseError>,
}

/// The single source of truth for every command the engine understands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "add",
        aliases: &[],
        parser: handlers::add::parse,
    },
    CommandDefinition {
        name: "edit",
        aliases: &[],
        parser: handlers::edit::parse,
    },
    CommandDefinition {
        name: "delete",
        aliases: &["del"],
        parser: handlers::delete::parse,
    },
    CommandDefinition {
        name: "archive",
        aliases: &[],
        parser: handlers::archive::parse_archive,
    },
    CommandDefinition {
        name: "unarchive",
        aliases: &[],
        parser: handlers::archive::parse_unarchive,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        parser: handlers::list::parse,
    },
    CommandDefinition {
        name: "find",
        aliases: &[],
        parser: handlers::find::parse,
    },
    CommandDefinition {
        name: "scheme",
        aliases: &[],
        parser: handlers::scheme::parse_view,
    },
    CommandDefinition {
        name: "addscheme",
        aliases: &[],
        parser: handlers::scheme::parse_add,
    },
    CommandDefinition {
        name: "deletescheme",
        aliases: &[],
        parser: handlers::scheme::parse_delete,
    },
    CommandDefinition {
        name: "addappt",
        aliases: &[],
        parser: handlers::appointment::parse_add,
    },
    CommandDefinition {
        name: "editappt",
        aliases: &[],
        parser: handlers::appointment::parse_edit,
    },
    CommandDefinition {
        name: "deleteappt",
        aliases: &[],
        parser: handlers::appointment::parse_delete,
    },
    CommandDefinition {
        name: "listappt",
        aliases: &[],
        parser: handlers::appointment::parse_list,
    },
    CommandDefinition {
        name: "statistics",
        aliases: &["stats"],
        parser: handlers::statistics::parse,
    },
    CommandDefinition {
        name: "clear",
        aliases: &[],
        parser: handlers::clear::parse,
    },
    CommandDefinition {
        name: "undo",
        aliases: &[],
        parser: handlers::undo::parse,
    },
    CommandDefinition {
        name: "help",
        aliases: &[],
        parser: handlers::help::parse_help,
    },
    CommandDefinition {
        name: "exit",
        aliases: &["quit"],
        parser: handlers::help::parse_exit,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Turns one line of user input into exactly one typed command.
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let input = input.trim();
    log::debug!("Parsing input: {:?}", input);

    if input.is_empty() {
        return Err(ParseError::InvalidFormat {
            field: "command",
            detail: "no command given".to_string(),
            usage: t!("help.usage"),
        });
    }

    let (keyword, args) = input
        .split_once(char::is_whitespace)
        .unwrap_or((input, ""));

    let definition = find_command(keyword).ok_or_else(|| ParseError::UnknownCommand {
        keyword: keyword.to_string(),
    })?;
    (definition.parser)(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command() {
        let err = parse_command("frobnicate 1").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownCommand {
                keyword: "frobnicate".to_string()
            }
        );
    }

    #[test]
    fn test_aliases_resolve_to_canonical_keyword() {
        assert_eq!(parse_command("del 1").unwrap().keyword(), "delete");
        assert_eq!(parse_command("  ls all/").unwrap().keyword(), "list");
        assert_eq!(parse_command("quit").unwrap().keyword(), "exit");
    }

    #[test]
    fn test_blank_input_is_a_parse_error() {
        assert!(matches!(
            parse_command("   "),
            Err(ParseError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_registry_names_are_unique() {
        let mut seen: Vec<&str> = Vec::new();
        for def in COMMAND_REGISTRY {
            for name in std::iter::once(&def.name).chain(def.aliases) {
                assert!(!seen.contains(name), "'{}' registered twice", name);
                seen.push(*name);
            }
        }
    }
}
