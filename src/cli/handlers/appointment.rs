// src/cli/handlers/appointment.rs

//! `addappt`, `editappt`, `deleteappt` and `listappt`.

use crate::cli::command::{Action, Command, Executable, ExecutionContext, Feedback};
use crate::cli::handlers::commons;
use crate::constants::{APPOINTMENT_DATE_FORMAT, APPOINTMENT_TIME_FORMAT};
use crate::core::arg_parser::{ParsedArgs, Prefix};
use crate::core::case_book::CaseBook;
use crate::error::{ExecutionError, ParseError, ValidationError};
use crate::models::{Appointment, DisplayIndex};
use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref TIME_RE: Regex = Regex::new(r"^\d{2}:\d{2}$").unwrap();
}

const APPOINTMENT_PREFIXES: &[Prefix] = &["date/", "from/", "to/"];

fn parse_date(raw: &str, usage: &'static str) -> Result<NaiveDate, ParseError> {
    let raw = raw.trim();
    if !DATE_RE.is_match(raw) {
        return Err(ParseError::InvalidFormat {
            field: "date (date/)",
            detail: format!("'{}' is not in YYYY-MM-DD form", raw),
            usage,
        });
    }
    NaiveDate::parse_from_str(raw, APPOINTMENT_DATE_FORMAT).map_err(|_| {
        ParseError::Invalid(ValidationError::InvalidDate {
            value: raw.to_string(),
            reason: "no such calendar date",
        })
    })
}

fn parse_time(raw: &str, field: &'static str, usage: &'static str) -> Result<NaiveTime, ParseError> {
    let raw = raw.trim();
    let invalid = || ParseError::InvalidFormat {
        field,
        detail: format!("'{}' is not a 24-hour HH:MM time", raw),
        usage,
    };
    if !TIME_RE.is_match(raw) {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(raw, APPOINTMENT_TIME_FORMAT).map_err(|_| invalid())
}

fn ensure_ordered(start: NaiveTime, end: NaiveTime) -> Result<(), ParseError> {
    if start >= end {
        return Err(ValidationError::InvalidTimeRange {
            start: start.format(APPOINTMENT_TIME_FORMAT).to_string(),
            end: end.format(APPOINTMENT_TIME_FORMAT).to_string(),
        }
        .into());
    }
    Ok(())
}

// --- addappt ---

/// Books a slot for a displayed person.
#[derive(Debug)]
pub struct AddAppointment {
    person: DisplayIndex,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    added: Option<Appointment>,
}

/// `addappt INDEX date/YYYY-MM-DD from/HH:MM to/HH:MM`
pub fn parse_add(args: &str) -> Result<Command, ParseError> {
    let usage = t!("addappt.usage");
    let parsed = ParsedArgs::new(args, APPOINTMENT_PREFIXES);
    let person = commons::parse_index(parsed.preamble(), "index", usage)?;
    parsed.ensure_single(APPOINTMENT_PREFIXES, usage)?;

    let date = parse_date(parsed.require("date/", "date (date/)", usage)?, usage)?;
    let start = parse_time(
        parsed.require("from/", "start time (from/)", usage)?,
        "start time (from/)",
        usage,
    )?;
    let end = parse_time(
        parsed.require("to/", "end time (to/)", usage)?,
        "end time (to/)",
        usage,
    )?;
    ensure_ordered(start, end)?;

    Ok(Command::new(
        "addappt",
        Action::AddAppointment(AddAppointment {
            person,
            date,
            start,
            end,
            added: None,
        }),
    ))
}

impl Executable for AddAppointment {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let owner = ctx.book.displayed_person(self.person)?.name;
        let appointment = Appointment::new(owner, self.date, self.start, self.end)?;

        ctx.book.add_appointment(appointment.clone())?;

        let message = format!(t!("addappt.success"), appointment = appointment);
        self.added = Some(appointment);
        Ok(Feedback::new(message))
    }

    fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        let Some(added) = &self.added else {
            return Err(ExecutionError::NothingToUndo);
        };
        // Slots never overlap, so equality pins down the single entry.
        let position = book
            .appointments()
            .iter()
            .position(|a| a == added)
            .ok_or(ValidationError::IndexOutOfRange {
                index: book.appointments().len() + 1,
                len: book.appointments().len(),
            })?;
        book.remove_appointment(position)?;
        Ok(format!(t!("addappt.undo"), appointment = added))
    }
}

// --- deleteappt ---

#[derive(Debug)]
pub struct DeleteAppointment {
    index: DisplayIndex,
    removed: Option<(usize, Appointment)>,
}

/// `deleteappt APPT_INDEX`
pub fn parse_delete(args: &str) -> Result<Command, ParseError> {
    let index = commons::parse_index(args, "appointment index", t!("deleteappt.usage"))?;
    Ok(Command::new(
        "deleteappt",
        Action::DeleteAppointment(DeleteAppointment {
            index,
            removed: None,
        }),
    ))
}

impl Executable for DeleteAppointment {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let position = self.index.zero_based();
        let removed = ctx.book.remove_appointment(position)?;
        let message = format!(t!("deleteappt.success"), appointment = removed);
        self.removed = Some((position, removed));
        Ok(Feedback::new(message))
    }

    fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        let Some((position, removed)) = &self.removed else {
            return Err(ExecutionError::NothingToUndo);
        };
        book.insert_appointment(*position, removed.clone())?;
        Ok(format!(t!("deleteappt.undo"), appointment = removed))
    }
}

// --- editappt ---

/// Moves an appointment to another date or time. The owner never changes.
#[derive(Debug)]
pub struct EditAppointment {
    index: DisplayIndex,
    date: Option<NaiveDate>,
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
    previous: Option<Appointment>,
}

/// `editappt APPT_INDEX [date/YYYY-MM-DD] [from/HH:MM] [to/HH:MM]`
pub fn parse_edit(args: &str) -> Result<Command, ParseError> {
    let usage = t!("editappt.usage");
    let parsed = ParsedArgs::new(args, APPOINTMENT_PREFIXES);
    let index = commons::parse_index(parsed.preamble(), "appointment index", usage)?;
    parsed.ensure_single(APPOINTMENT_PREFIXES, usage)?;

    let date = parsed
        .value("date/")
        .map(|raw| parse_date(raw, usage))
        .transpose()?;
    let start = parsed
        .value("from/")
        .map(|raw| parse_time(raw, "start time (from/)", usage))
        .transpose()?;
    let end = parsed
        .value("to/")
        .map(|raw| parse_time(raw, "end time (to/)", usage))
        .transpose()?;

    if date.is_none() && start.is_none() && end.is_none() {
        return Err(ParseError::MissingField {
            field: "field to edit",
            usage,
        });
    }
    if let (Some(start), Some(end)) = (start, end) {
        ensure_ordered(start, end)?;
    }

    Ok(Command::new(
        "editappt",
        Action::EditAppointment(EditAppointment {
            index,
            date,
            start,
            end,
            previous: None,
        }),
    ))
}

impl Executable for EditAppointment {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let position = self.index.zero_based();
        let current = ctx
            .book
            .appointments()
            .get(position)
            .cloned()
            .ok_or(ValidationError::IndexOutOfRange {
                index: self.index.one_based(),
                len: ctx.book.appointments().len(),
            })?;

        let edited = Appointment::new(
            current.owner().clone(),
            self.date.unwrap_or(current.date()),
            self.start.unwrap_or(current.start()),
            self.end.unwrap_or(current.end()),
        )?;
        let previous = ctx.book.replace_appointment(position, edited.clone())?;

        self.previous = Some(previous);
        Ok(Feedback::new(format!(
            t!("editappt.success"),
            appointment = edited
        )))
    }

    fn undo(&mut self, book: &mut CaseBook) -> Result<String, ExecutionError> {
        let Some(previous) = &self.previous else {
            return Err(ExecutionError::NothingToUndo);
        };
        book.replace_appointment(self.index.zero_based(), previous.clone())?;
        Ok(format!(t!("editappt.undo"), appointment = previous))
    }
}

// --- listappt ---

#[derive(Debug)]
pub struct ListAppointments;

/// `listappt`
pub fn parse_list(args: &str) -> Result<Command, ParseError> {
    commons::expect_no_args(args, t!("listappt.usage"))?;
    Ok(Command::new(
        "listappt",
        Action::ListAppointments(ListAppointments),
    ))
}

impl Executable for ListAppointments {
    fn execute(&mut self, ctx: &mut ExecutionContext<'_>) -> Result<Feedback, ExecutionError> {
        let appointments = ctx.book.appointments();
        if appointments.is_empty() {
            return Ok(Feedback::new(t!("listappt.empty")));
        }
        Ok(Feedback::new(format!(
            t!("listappt.success"),
            count = appointments.len(),
            appointments = commons::numbered(appointments)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addappt_parsing() {
        assert!(parse_add("1 date/2024-11-15 from/16:00 to/18:00").is_ok());

        assert!(matches!(
            parse_add("1 date/15-11-2024 from/16:00 to/18:00"),
            Err(ParseError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_add("1 date/2024-02-30 from/16:00 to/18:00"),
            Err(ParseError::Invalid(ValidationError::InvalidDate { .. }))
        ));
        assert!(matches!(
            parse_add("1 date/2024-11-15 from/4pm to/18:00"),
            Err(ParseError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_add("1 date/2024-11-15 from/18:00 to/16:00"),
            Err(ParseError::Invalid(ValidationError::InvalidTimeRange { .. }))
        ));
        assert!(matches!(
            parse_add("1 date/2024-11-15 from/16:00"),
            Err(ParseError::MissingField { .. })
        ));
    }

    #[test]
    fn test_editappt_needs_a_field() {
        assert!(matches!(
            parse_edit("1"),
            Err(ParseError::MissingField { .. })
        ));
        assert!(parse_edit("1 to/19:00").is_ok());
    }

    #[test]
    fn test_listappt_takes_no_arguments() {
        assert!(parse_list("").is_ok());
        assert!(parse_list("all").is_err());
    }
}
