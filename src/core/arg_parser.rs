// src/core/arg_parser.rs

use crate::error::ParseError;
use std::collections::HashMap;

/// A `prefix/` marker introducing a flagged argument, e.g. `n/` or `date/`.
pub type Prefix = &'static str;

/// The arguments of one command split into the free-text preamble and the
/// values of each recognised prefix, in input order.
///
/// A prefix is only recognised when it starts the argument string or follows
/// whitespace, so `e/` inside `date/` or an address like `Blk 5/6` is left
/// as part of the surrounding value.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    preamble: String,
    named: HashMap<Prefix, Vec<String>>,
}

impl ParsedArgs {
    /// Tokenizes `args` against the prefixes a command understands.
    pub fn new(args: &str, prefixes: &[Prefix]) -> Self {
        let mut markers: Vec<(usize, Prefix)> = Vec::new();
        for &prefix in prefixes {
            for (pos, _) in args.match_indices(prefix) {
                let at_boundary = args
                    .get(..pos)
                    .is_some_and(|before| before.chars().next_back().is_none_or(char::is_whitespace));
                if at_boundary {
                    markers.push((pos, prefix));
                }
            }
        }
        markers.sort_by_key(|(pos, _)| *pos);

        let preamble_end = markers.first().map_or(args.len(), |(pos, _)| *pos);
        let preamble = args.get(..preamble_end).unwrap_or_default().trim().to_string();

        let mut named: HashMap<Prefix, Vec<String>> = HashMap::new();
        for (i, (pos, prefix)) in markers.iter().enumerate() {
            let value_start = pos + prefix.len();
            let value_end = markers.get(i + 1).map_or(args.len(), |(next, _)| *next);
            let value = args.get(value_start..value_end).unwrap_or_default();
            named.entry(*prefix).or_default().push(value.trim().to_string());
        }

        Self { preamble, named }
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn has(&self, prefix: Prefix) -> bool {
        self.named.contains_key(prefix)
    }

    /// The last value given for `prefix`.
    pub fn value(&self, prefix: Prefix) -> Option<&str> {
        self.named
            .get(prefix)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Every value given for `prefix`, in input order.
    pub fn all_values(&self, prefix: Prefix) -> &[String] {
        self.named
            .get(prefix)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Like [`Self::value`], but a missing prefix is a parse error.
    pub fn require(
        &self,
        prefix: Prefix,
        field: &'static str,
        usage: &'static str,
    ) -> Result<&str, ParseError> {
        self.value(prefix)
            .ok_or(ParseError::MissingField { field, usage })
    }

    /// Fails if any of `prefixes` was given more than once.
    pub fn ensure_single(&self, prefixes: &[Prefix], usage: &'static str) -> Result<(), ParseError> {
        let mut repeated: Vec<Prefix> = prefixes
            .iter()
            .copied()
            .filter(|p| self.named.get(p).is_some_and(|v| v.len() > 1))
            .collect();
        if repeated.is_empty() {
            return Ok(());
        }
        repeated.sort_unstable();
        Err(ParseError::InvalidFormat {
            field: "arguments",
            detail: format!(
                "multiple values given for single-valued fields {}",
                repeated.join(" ")
            ),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIXES: &[Prefix] = &["n/", "p/", "a/", "e/", "date/", "t/"];

    #[test]
    fn test_preamble_and_values() {
        let args = ParsedArgs::new(
            " 3 n/Alex Yeoh a/Blk 30 Geylang Street 29, #06-40 t/friends t/neighbours",
            PREFIXES,
        );

        assert_eq!(args.preamble(), "3");
        assert_eq!(args.value("n/"), Some("Alex Yeoh"));
        assert_eq!(args.value("a/"), Some("Blk 30 Geylang Street 29, #06-40"));
        assert_eq!(args.all_values("t/"), vec!["friends", "neighbours"]);
        assert!(args.value("p/").is_none());
    }

    #[test]
    fn test_prefix_must_follow_whitespace() {
        let args = ParsedArgs::new("1 date/2024-11-15 a/Unit 5/6 e/x@y.com", PREFIXES);

        assert_eq!(args.value("date/"), Some("2024-11-15"));
        assert_eq!(args.value("a/"), Some("Unit 5/6"));
        assert_eq!(args.value("e/"), Some("x@y.com"));
    }

    #[test]
    fn test_no_prefixes_means_everything_is_preamble() {
        let args = ParsedArgs::new("  1,2, 3 ", PREFIXES);
        assert_eq!(args.preamble(), "1,2, 3");
        assert!(!args.has("n/"));
    }

    #[test]
    fn test_duplicate_single_valued_prefix_is_rejected() {
        let args = ParsedArgs::new("n/Alex n/Bernice p/91234567 t/a t/b", PREFIXES);

        assert!(args.ensure_single(&["p/", "e/"], "usage").is_ok());
        let err = args.ensure_single(&["n/", "p/"], "usage").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat { .. }));
    }

    #[test]
    fn test_repeatable_prefix_is_only_checked_when_listed() {
        let args = ParsedArgs::new("n/Alex t/a t/b", PREFIXES);

        // Tags may repeat, so callers leave `t/` out of the single-valued list.
        assert!(args.ensure_single(&["n/", "p/"], "usage").is_ok());
        assert!(args.ensure_single(&["t/"], "usage").is_err());
        assert_eq!(args.all_values("t/"), vec!["a", "b"]);
    }

    #[test]
    fn test_require_reports_missing_field() {
        let args = ParsedArgs::new("n/Alex", PREFIXES);
        let err = args.require("p/", "phone", "usage").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                field: "phone",
                usage: "usage"
            }
        );
    }
}
