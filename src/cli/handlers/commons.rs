// src/cli/handlers/commons.rs

// Helpers shared by the command parsers.

use crate::core::arg_parser::{ParsedArgs, Prefix};
use crate::error::ParseError;
use crate::models::{
    Address, DateOfBirth, DisplayIndex, Email, FamilySize, Income, Name, Person, Phone, Priority, Tag,
};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Every prefix accepted by `add` and `edit`.
pub(crate) const PERSON_PREFIXES: &[Prefix] = &[
    "n/", "p/", "e/", "a/", "pri/", "dob/", "income/", "fs/", "r/", "t/",
];

/// The person prefixes that may appear at most once (all but `t/`).
pub(crate) const SINGLE_PERSON_PREFIXES: &[Prefix] =
    &["n/", "p/", "e/", "a/", "pri/", "dob/", "income/", "fs/", "r/"];

/// Parses a single 1-based index.
pub(crate) fn parse_index(
    raw: &str,
    field: &'static str,
    usage: &'static str,
) -> Result<DisplayIndex, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseError::MissingField { field, usage });
    }
    raw.parse::<usize>()
        .ok()
        .and_then(DisplayIndex::new)
        .ok_or_else(|| ParseError::InvalidFormat {
            field,
            detail: format!("'{}' is not a positive whole number", raw),
            usage,
        })
}

/// Parses `1,3, 2,3` into the sorted, de-duplicated indices `[1, 2, 3]`.
pub(crate) fn parse_index_list(
    raw: &str,
    field: &'static str,
    usage: &'static str,
) -> Result<Vec<DisplayIndex>, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::MissingField { field, usage });
    }
    let indices = raw
        .split(',')
        .map(|part| parse_index(part, field, usage))
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(indices.into_iter().collect())
}

/// For commands that take no arguments.
pub(crate) fn expect_no_args(args: &str, usage: &'static str) -> Result<(), ParseError> {
    let extra = args.trim();
    if extra.is_empty() {
        Ok(())
    } else {
        Err(ParseError::InvalidFormat {
            field: "arguments",
            detail: format!("unexpected '{}'", extra),
            usage,
        })
    }
}

/// Renders `items` as a 1-based numbered list, one per line.
pub(crate) fn numbered<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The person fields given to an `add` or `edit` command. Absent fields are
/// `None` and leave the base person untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonPatch {
    pub name: Option<Name>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub address: Option<Address>,
    pub priority: Option<Priority>,
    pub date_of_birth: Option<DateOfBirth>,
    pub income: Option<Income>,
    pub family_size: Option<FamilySize>,
    pub remark: Option<String>,
    /// `Some` replaces every tag; an empty set clears them.
    pub tags: Option<BTreeSet<Tag>>,
}

impl PersonPatch {
    pub(crate) fn from_args(args: &ParsedArgs) -> Result<Self, ParseError> {
        let tags = if args.has("t/") {
            let parsed = args
                .all_values("t/")
                .iter()
                .filter(|t| !t.is_empty())
                .map(|t| Tag::parse(t))
                .collect::<Result<BTreeSet<_>, _>>()?;
            Some(parsed)
        } else {
            None
        };

        Ok(Self {
            name: args.value("n/").map(Name::parse).transpose()?,
            phone: args.value("p/").map(Phone::parse).transpose()?,
            email: args.value("e/").map(Email::parse).transpose()?,
            address: args.value("a/").map(Address::parse).transpose()?,
            priority: args.value("pri/").map(str::parse).transpose()?,
            date_of_birth: args.value("dob/").map(DateOfBirth::parse).transpose()?,
            income: args.value("income/").map(str::parse).transpose()?,
            family_size: args.value("fs/").map(str::parse).transpose()?,
            remark: args.value("r/").map(str::to_string),
            tags,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// A new person with this patch laid over `base`.
    pub fn apply_to(&self, base: &Person) -> Person {
        Person {
            name: self.name.clone().unwrap_or_else(|| base.name.clone()),
            phone: self.phone.clone().unwrap_or_else(|| base.phone.clone()),
            email: self.email.clone().unwrap_or_else(|| base.email.clone()),
            address: self.address.clone().unwrap_or_else(|| base.address.clone()),
            priority: self.priority.unwrap_or(base.priority),
            date_of_birth: self.date_of_birth.or(base.date_of_birth),
            income: self.income.unwrap_or(base.income),
            family_size: self.family_size.unwrap_or(base.family_size),
            remark: self.remark.clone().unwrap_or_else(|| base.remark.clone()),
            tags: self.tags.clone().unwrap_or_else(|| base.tags.clone()),
            archived: base.archived,
            schemes: base.schemes.clone(),
        }
    }
}
