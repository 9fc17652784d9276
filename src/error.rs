// src/error.rs

//! Error taxonomy shared by the parser, the case book, the command engine and
//! the persistence gateway.

use std::path::PathBuf;
use thiserror::Error;

/// Raised while turning a raw input line into a typed command.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unknown command '{keyword}'. Type 'help' to see every command.")]
    UnknownCommand { keyword: String },

    #[error("Missing {field}.\n{usage}")]
    MissingField {
        field: &'static str,
        usage: &'static str,
    },

    #[error("Invalid {field}: {detail}\n{usage}")]
    InvalidFormat {
        field: &'static str,
        detail: String,
        usage: &'static str,
    },

    /// A field was syntactically well-formed but its value is rejected.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Value-level problems: bad indices, clashing time slots, malformed field values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("The {target} index {index} is invalid: only {len} entries are displayed.")]
    InvalidIndex {
        target: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Appointment index {index} is out of range: there are {len} appointments.")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("This appointment ({requested}) clashes with an existing one ({existing}).")]
    ConflictingInterval { requested: String, existing: String },

    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: &'static str },

    #[error("The start time {start} must be before the end time {end}.")]
    InvalidTimeRange { start: String, end: String },

    #[error("Invalid {field} '{value}': {constraint}")]
    InvalidField {
        field: &'static str,
        value: String,
        constraint: &'static str,
    },

    #[error("No person named '{name}' exists to own this appointment.")]
    UnknownOwner { name: String },
}

/// Violations of the case book's entity rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("A person named '{name}' already exists in the case book.")]
    DuplicateEntity { name: String },

    #[error("No person named '{name}' exists in the case book.")]
    NotFound { name: String },

    #[error("{name} is already archived.")]
    AlreadyArchived { name: String },

    #[error("{name} is not archived.")]
    NotArchived { name: String },

    #[error("{name} is already enrolled in {scheme}.")]
    DuplicateScheme { name: String, scheme: String },
}

/// Everything that can stop a parsed command from running.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("There is no command to undo.")]
    NothingToUndo,

    #[error("Cannot {operation} '{keyword}' while it is {state}.")]
    IllegalState {
        keyword: &'static str,
        operation: &'static str,
        state: &'static str,
    },
}

/// Failures of the JSON and TOML stores.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Data file '{path}' is corrupted: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("Could not write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not encode data for '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode preferences: {0}")]
    Preferences(#[from] toml::ser::Error),
}

/// Startup failures while locating the data directory. These are fatal.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find the system data directory.")]
    DataDirNotFound,

    #[error("Could not expand data directory path '{path}': {reason}")]
    Expansion { path: String, reason: String },

    #[error("Could not create data directory at '{path}': {source}")]
    DataDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
