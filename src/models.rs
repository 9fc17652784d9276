// src/models.rs

use crate::constants::{APPOINTMENT_DATE_FORMAT, APPOINTMENT_TIME_FORMAT, DATE_OF_BIRTH_FORMAT};
use crate::error::ValidationError;
use chrono::{Local, NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

lazy_static! {
    static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ]*$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^[0-9]{3,}$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[A-Za-z0-9](?:[A-Za-z0-9+_.-]*[A-Za-z0-9])?@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)*[A-Za-z0-9][A-Za-z0-9-]*[A-Za-z0-9]$"
    )
    .unwrap();
    static ref TAG_RE: Regex = Regex::new(r"^[A-Za-z0-9]+$").unwrap();
}

/// Trims `raw` and checks it against `re`, producing a field error that names
/// the offending value.
fn validated(
    field: &'static str,
    raw: &str,
    re: &Regex,
    constraint: &'static str,
) -> Result<String, ValidationError> {
    let value = raw.trim();
    if re.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::InvalidField {
            field,
            value: value.to_string(),
            constraint,
        })
    }
}

// --- PERSON FIELDS ---

/// A person's full name. Identity comparisons ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validated(
            "name",
            raw,
            &NAME_RE,
            "names contain only letters, digits and spaces, and must not be blank",
        )
        .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn same_identity(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl TryFrom<String> for Name {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validated(
            "phone",
            raw,
            &PHONE_RE,
            "phone numbers contain only digits and are at least 3 digits long",
        )
        .map(Self)
    }
}

impl TryFrom<String> for Phone {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(value: Phone) -> Self {
        value.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validated(
            "email",
            raw,
            &EMAIL_RE,
            "emails look like local-part@domain, where the domain ends in a label of at least 2 characters",
        )
        .map(Self)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "address",
                value: value.to_string(),
                constraint: "addresses can take any value, but must not be blank",
            });
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validated("tag", raw, &TAG_RE, "tags are alphanumeric").map(Self)
    }
}

impl TryFrom<String> for Tag {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            _ => Err(ValidationError::InvalidField {
                field: "priority",
                value: s.trim().to_string(),
                constraint: "priority must be HIGH, MEDIUM or LOW",
            }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        })
    }
}

/// Monthly household income.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Income(f64);

impl Income {
    pub fn new(amount: f64) -> Result<Self, ValidationError> {
        if amount.is_finite() && amount >= 0.0 {
            Ok(Self(amount))
        } else {
            Err(ValidationError::InvalidField {
                field: "income",
                value: amount.to_string(),
                constraint: "income must be a non-negative number",
            })
        }
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

impl FromStr for Income {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidField {
            field: "income",
            value: s.trim().to_string(),
            constraint: "income must be a non-negative number",
        };
        let amount: f64 = s.trim().parse().map_err(|_| invalid())?;
        Self::new(amount).map_err(|_| invalid())
    }
}

impl TryFrom<f64> for Income {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Income> for f64 {
    fn from(value: Income) -> Self {
        value.0
    }
}

impl fmt::Display for Income {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FamilySize(u32);

impl FamilySize {
    pub fn new(members: u32) -> Result<Self, ValidationError> {
        if members == 0 {
            return Err(ValidationError::InvalidField {
                field: "family size",
                value: members.to_string(),
                constraint: "family size must be a positive whole number",
            });
        }
        Ok(Self(members))
    }

    pub fn members(self) -> u32 {
        self.0
    }
}

impl Default for FamilySize {
    fn default() -> Self {
        Self(1)
    }
}

impl FromStr for FamilySize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let members: u32 = s.trim().parse().map_err(|_| ValidationError::InvalidField {
            field: "family size",
            value: s.trim().to_string(),
            constraint: "family size must be a positive whole number",
        })?;
        Self::new(members)
    }
}

impl TryFrom<u32> for FamilySize {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FamilySize> for u32 {
    fn from(value: FamilySize) -> Self {
        value.0
    }
}

impl fmt::Display for FamilySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A date of birth, which must lie strictly in the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        let date = NaiveDate::parse_from_str(value, DATE_OF_BIRTH_FORMAT).map_err(|_| {
            ValidationError::InvalidDate {
                value: value.to_string(),
                reason: "dates of birth are written like '1 Jan 1999'",
            }
        })?;
        Self::new(date)
    }

    pub fn new(date: NaiveDate) -> Result<Self, ValidationError> {
        if date >= Local::now().date_naive() {
            return Err(ValidationError::InvalidDate {
                value: date.format(DATE_OF_BIRTH_FORMAT).to_string(),
                reason: "a date of birth must be before today",
            });
        }
        Ok(Self(date))
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl TryFrom<String> for DateOfBirth {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateOfBirth> for String {
    fn from(value: DateOfBirth) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%-d %b %Y"))
    }
}

// --- PERSON ---

/// One case in the book. Values are never mutated in place: every change
/// builds a new `Person` that replaces the old one at the same position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: Name,
    pub phone: Phone,
    pub email: Email,
    pub address: Address,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub date_of_birth: Option<DateOfBirth>,
    #[serde(default)]
    pub income: Income,
    #[serde(default)]
    pub family_size: FamilySize,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub schemes: Vec<String>,
}

impl Person {
    /// Builds a person with the four mandatory fields and defaults elsewhere.
    pub fn new(name: Name, phone: Phone, email: Email, address: Address) -> Self {
        Self {
            name,
            phone,
            email,
            address,
            priority: Priority::default(),
            remark: String::new(),
            date_of_birth: None,
            income: Income::default(),
            family_size: FamilySize::default(),
            tags: BTreeSet::new(),
            archived: false,
            schemes: Vec::new(),
        }
    }

    pub fn with_archived(&self, archived: bool) -> Self {
        Self {
            archived,
            ..self.clone()
        }
    }

    pub fn with_schemes(&self, schemes: Vec<String>) -> Self {
        Self {
            schemes,
            ..self.clone()
        }
    }

    pub fn is_enrolled_in(&self, scheme: &str) -> bool {
        self.schemes.iter().any(|s| s == scheme)
    }

    pub fn income_per_capita(&self) -> f64 {
        self.income.amount() / f64::from(self.family_size.members())
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; Phone: {}; Email: {}; Address: {}; Priority: {}; Income: {}; Family size: {}",
            self.name,
            self.phone,
            self.email,
            self.address,
            self.priority,
            self.income,
            self.family_size
        )?;
        if let Some(dob) = &self.date_of_birth {
            write!(f, "; Date of birth: {}", dob)?;
        }
        if !self.remark.is_empty() {
            write!(f, "; Remark: {}", self.remark)?;
        }
        if !self.tags.is_empty() {
            f.write_str("; Tags: ")?;
            for tag in &self.tags {
                write!(f, "{}", tag)?;
            }
        }
        if !self.schemes.is_empty() {
            write!(f, "; Schemes: {}", self.schemes.join(", "))?;
        }
        if self.archived {
            f.write_str(" (archived)")?;
        }
        Ok(())
    }
}

// --- APPOINTMENTS ---

/// A time slot booked for one person. `start < end` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AppointmentRecord", into = "AppointmentRecord")]
pub struct Appointment {
    owner: Name,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl Appointment {
    pub fn new(
        owner: Name,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidTimeRange {
                start: start.format(APPOINTMENT_TIME_FORMAT).to_string(),
                end: end.format(APPOINTMENT_TIME_FORMAT).to_string(),
            });
        }
        Ok(Self {
            owner,
            date,
            start,
            end,
        })
    }

    pub fn owner(&self) -> &Name {
        &self.owner
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn belongs_to(&self, name: &Name) -> bool {
        self.owner.same_identity(name)
    }

    /// Half-open interval overlap on the same date. Back-to-back slots do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    pub fn with_owner(&self, owner: Name) -> Self {
        Self {
            owner,
            ..self.clone()
        }
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {}-{}",
            self.owner,
            self.date.format(APPOINTMENT_DATE_FORMAT),
            self.start.format(APPOINTMENT_TIME_FORMAT),
            self.end.format(APPOINTMENT_TIME_FORMAT)
        )
    }
}

/// On-disk shape of an appointment; converted through `Appointment::new` so
/// every loaded value satisfies the same invariants as a typed one.
#[derive(Serialize, Deserialize)]
struct AppointmentRecord {
    owner: String,
    date: String,
    start: String,
    end: String,
}

impl TryFrom<AppointmentRecord> for Appointment {
    type Error = ValidationError;

    fn try_from(record: AppointmentRecord) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&record.date, APPOINTMENT_DATE_FORMAT).map_err(
            |_| ValidationError::InvalidDate {
                value: record.date.clone(),
                reason: "appointment dates are written as YYYY-MM-DD",
            },
        )?;
        let time = |value: &str| {
            NaiveTime::parse_from_str(value, APPOINTMENT_TIME_FORMAT).map_err(|_| {
                ValidationError::InvalidField {
                    field: "time",
                    value: value.to_string(),
                    constraint: "times are written as HH:MM",
                }
            })
        };
        Self::new(
            Name::parse(&record.owner)?,
            date,
            time(&record.start)?,
            time(&record.end)?,
        )
    }
}

impl From<Appointment> for AppointmentRecord {
    fn from(value: Appointment) -> Self {
        Self {
            owner: value.owner.into(),
            date: value.date.format(APPOINTMENT_DATE_FORMAT).to_string(),
            start: value.start.format(APPOINTMENT_TIME_FORMAT).to_string(),
            end: value.end.format(APPOINTMENT_TIME_FORMAT).to_string(),
        }
    }
}

// --- FILTERS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    #[default]
    Unarchived,
    Archived,
    All,
}

/// Keywords of a `find` command. Categories are combined with AND, keywords
/// within a category with OR; empty categories match everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FindCriteria {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<Priority>,
}

impl FindCriteria {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.addresses.is_empty() && self.priorities.is_empty()
    }

    pub fn matches(&self, person: &Person) -> bool {
        let contains_any = |keywords: &[String], haystack: &str| {
            let haystack = haystack.to_lowercase();
            keywords.is_empty()
                || keywords
                    .iter()
                    .any(|k| haystack.contains(&k.to_lowercase()))
        };

        contains_any(&self.names, person.name.as_str())
            && contains_any(&self.addresses, person.address.as_str())
            && (self.priorities.is_empty() || self.priorities.contains(&person.priority))
    }
}

/// Selects which persons the published view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonFilter {
    Listing(ListMode),
    /// Results of a search; only unarchived persons are considered.
    Matching(FindCriteria),
}

impl Default for PersonFilter {
    fn default() -> Self {
        Self::Listing(ListMode::Unarchived)
    }
}

impl PersonFilter {
    pub fn matches(&self, person: &Person) -> bool {
        match self {
            Self::Listing(ListMode::Unarchived) => !person.archived,
            Self::Listing(ListMode::Archived) => person.archived,
            Self::Listing(ListMode::All) => true,
            Self::Matching(criteria) => !person.archived && criteria.matches(person),
        }
    }
}

/// A 1-based position in a list shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayIndex(NonZeroUsize);

impl DisplayIndex {
    pub fn new(one_based: usize) -> Option<Self> {
        NonZeroUsize::new(one_based).map(Self)
    }

    pub fn one_based(self) -> usize {
        self.0.get()
    }

    pub fn zero_based(self) -> usize {
        self.0.get() - 1
    }
}

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- PREFERENCES ---

/// Stored in `preferences.toml`; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub persons_file: String,
    pub appointments_file: String,
    pub window: WindowSettings,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            persons_file: crate::constants::PERSONS_FILENAME.to_string(),
            appointments_file: crate::constants::APPOINTMENTS_FILENAME.to_string(),
            window: WindowSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 740,
            height: 600,
            x: None,
            y: None,
        }
    }
}
