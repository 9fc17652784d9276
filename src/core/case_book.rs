// src/core/case_book.rs

//! The in-memory case book: persons, appointments, the active list filter and
//! the user preferences. Commands mutate it only through the methods below,
//! and every successful mutation publishes a fresh [`FilteredView`].

use crate::error::{DomainError, ExecutionError, ValidationError};
use crate::models::{Appointment, DisplayIndex, Name, Person, PersonFilter, UserPreferences};
use crate::state::{FilteredView, ViewHandle, ViewPublisher};
use std::sync::Arc;

/// Entries taken out of the book together with their original positions, so
/// that [`CaseBook::restore`] can put them back exactly where they were.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Removal {
    pub persons: Vec<(usize, Person)>,
    pub appointments: Vec<(usize, Appointment)>,
}

#[derive(Debug)]
pub struct CaseBook {
    persons: Vec<Person>,
    appointments: Vec<Appointment>,
    filter: PersonFilter,
    preferences: UserPreferences,
    view: ViewPublisher,
}

impl CaseBook {
    /// An empty book.
    pub fn new(preferences: UserPreferences) -> Self {
        let book = Self {
            persons: Vec::new(),
            appointments: Vec::new(),
            filter: PersonFilter::default(),
            preferences,
            view: ViewPublisher::default(),
        };
        book.publish();
        book
    }

    /// Builds a book from previously stored data, enforcing the same rules as
    /// the individual mutators: unique names, known owners, no overlaps.
    pub fn from_parts(
        preferences: UserPreferences,
        persons: Vec<Person>,
        appointments: Vec<Appointment>,
        filter: PersonFilter,
    ) -> Result<Self, ExecutionError> {
        let mut book = Self {
            persons: Vec::with_capacity(persons.len()),
            appointments: Vec::with_capacity(appointments.len()),
            filter,
            preferences,
            view: ViewPublisher::default(),
        };
        for person in persons {
            book.ensure_unique(&person.name, None)?;
            book.persons.push(person);
        }
        for appointment in appointments {
            book.check_appointment(&appointment, None)?;
            book.appointments.push(appointment);
        }
        book.publish();
        Ok(book)
    }

    // --- Read access ---

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn filter(&self) -> &PersonFilter {
        &self.filter
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    /// Window geometry and file names are not case data: changing them does
    /// not publish a new view.
    pub fn set_preferences(&mut self, preferences: UserPreferences) {
        self.preferences = preferences;
    }

    pub fn view(&self) -> Arc<FilteredView> {
        self.view.current()
    }

    pub fn view_handle(&self) -> ViewHandle {
        self.view.handle()
    }

    /// The version of the last published view.
    pub fn version(&self) -> u64 {
        self.view.current().version
    }

    pub fn position_of(&self, name: &Name) -> Option<usize> {
        self.persons.iter().position(|p| p.name.same_identity(name))
    }

    pub fn person(&self, name: &Name) -> Option<&Person> {
        self.persons.iter().find(|p| p.name.same_identity(name))
    }

    /// Resolves a 1-based index against the persons currently displayed.
    pub fn displayed_person(&self, index: DisplayIndex) -> Result<Person, ValidationError> {
        let view = self.view.current();
        view.persons
            .get(index.zero_based())
            .cloned()
            .ok_or(ValidationError::InvalidIndex {
                target: "person",
                index: index.one_based(),
                len: view.persons.len(),
            })
    }

    // --- Persons ---

    pub fn add_person(&mut self, person: Person) -> Result<(), DomainError> {
        self.ensure_unique(&person.name, None)?;
        log::debug!("Adding person '{}'", person.name);
        self.persons.push(person);
        self.publish();
        Ok(())
    }

    /// Removes one person, returning where they were. Their appointments are
    /// left alone; use [`Self::remove_persons`] to cascade.
    pub fn remove_person(&mut self, name: &Name) -> Result<(usize, Person), DomainError> {
        let position = self.position_of(name).ok_or_else(|| DomainError::NotFound {
            name: name.to_string(),
        })?;
        let removed = self.persons.remove(position);
        log::debug!("Removed person '{}' from position {}", removed.name, position);
        self.publish();
        Ok((position, removed))
    }

    /// Swaps the person named `target` for `replacement` at the same position
    /// and returns the previous value. When the name changes, appointments of
    /// that person follow the new name.
    pub fn replace_person(&mut self, target: &Name, replacement: Person) -> Result<Person, DomainError> {
        let not_found = || DomainError::NotFound {
            name: target.to_string(),
        };
        let position = self.position_of(target).ok_or_else(not_found)?;
        self.ensure_unique(&replacement.name, Some(position))?;

        let slot = self.persons.get_mut(position).ok_or_else(not_found)?;
        let previous = std::mem::replace(slot, replacement);
        let current_name = slot.name.clone();
        if previous.name != current_name {
            for appointment in &mut self.appointments {
                if appointment.belongs_to(&previous.name) {
                    *appointment = appointment.with_owner(current_name.clone());
                }
            }
        }
        self.publish();
        Ok(previous)
    }

    /// Removes every named person together with their appointments, in one
    /// published step. Fails without changes if any name is unknown.
    pub fn remove_persons(&mut self, names: &[Name]) -> Result<Removal, DomainError> {
        if let Some(missing) = names.iter().find(|n| self.position_of(n).is_none()) {
            return Err(DomainError::NotFound {
                name: missing.to_string(),
            });
        }
        let doomed = |name: &Name| names.iter().any(|n| n.same_identity(name));

        let removal = Removal {
            persons: take_where(&mut self.persons, |p| doomed(&p.name)),
            appointments: take_where(&mut self.appointments, |a| doomed(a.owner())),
        };
        log::debug!(
            "Removed {} person(s) and {} appointment(s)",
            removal.persons.len(),
            removal.appointments.len()
        );
        self.publish();
        Ok(removal)
    }

    /// Reverses [`Self::remove_persons`] or [`Self::clear`]. Entries go back
    /// in ascending original position, which recreates the original order.
    pub fn restore(&mut self, removal: Removal) -> Result<(), DomainError> {
        if let Some((_, clash)) = removal
            .persons
            .iter()
            .find(|(_, p)| self.position_of(&p.name).is_some())
        {
            return Err(DomainError::DuplicateEntity {
                name: clash.name.to_string(),
            });
        }
        put_back(&mut self.persons, removal.persons);
        put_back(&mut self.appointments, removal.appointments);
        self.publish();
        Ok(())
    }

    /// Empties the book, returning everything that was in it.
    pub fn clear(&mut self) -> Removal {
        let removal = Removal {
            persons: std::mem::take(&mut self.persons).into_iter().enumerate().collect(),
            appointments: std::mem::take(&mut self.appointments)
                .into_iter()
                .enumerate()
                .collect(),
        };
        self.publish();
        removal
    }

    pub fn set_filter(&mut self, filter: PersonFilter) {
        self.filter = filter;
        self.publish();
    }

    // --- Appointments ---

    pub fn add_appointment(&mut self, appointment: Appointment) -> Result<(), ValidationError> {
        self.check_appointment(&appointment, None)?;
        log::debug!("Adding appointment {}", appointment);
        self.appointments.push(appointment);
        self.publish();
        Ok(())
    }

    pub fn insert_appointment(&mut self, position: usize, appointment: Appointment) -> Result<(), ValidationError> {
        self.check_appointment(&appointment, None)?;
        let at = position.min(self.appointments.len());
        self.appointments.insert(at, appointment);
        self.publish();
        Ok(())
    }

    /// Replaces the appointment at 0-based `index`; the old slot does not count
    /// as a conflict for the new one.
    pub fn replace_appointment(
        &mut self,
        index: usize,
        appointment: Appointment,
    ) -> Result<Appointment, ValidationError> {
        self.ensure_appointment_index(index)?;
        self.check_appointment(&appointment, Some(index))?;
        let len = self.appointments.len();
        let slot = self
            .appointments
            .get_mut(index)
            .ok_or(ValidationError::IndexOutOfRange {
                index: index + 1,
                len,
            })?;
        let previous = std::mem::replace(slot, appointment);
        self.publish();
        Ok(previous)
    }

    pub fn remove_appointment(&mut self, index: usize) -> Result<Appointment, ValidationError> {
        self.ensure_appointment_index(index)?;
        let removed = self.appointments.remove(index);
        self.publish();
        Ok(removed)
    }

    // --- Internals ---

    fn ensure_unique(&self, name: &Name, ignore: Option<usize>) -> Result<(), DomainError> {
        let taken = self
            .persons
            .iter()
            .enumerate()
            .any(|(i, p)| Some(i) != ignore && p.name.same_identity(name));
        if taken {
            return Err(DomainError::DuplicateEntity {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_appointment_index(&self, index: usize) -> Result<(), ValidationError> {
        if index >= self.appointments.len() {
            return Err(ValidationError::IndexOutOfRange {
                index: index + 1,
                len: self.appointments.len(),
            });
        }
        Ok(())
    }

    fn check_appointment(&self, appointment: &Appointment, ignore: Option<usize>) -> Result<(), ValidationError> {
        if self.position_of(appointment.owner()).is_none() {
            return Err(ValidationError::UnknownOwner {
                name: appointment.owner().to_string(),
            });
        }
        let clash = self
            .appointments
            .iter()
            .enumerate()
            .find(|(i, existing)| Some(*i) != ignore && existing.overlaps(appointment));
        if let Some((_, existing)) = clash {
            return Err(ValidationError::ConflictingInterval {
                requested: appointment.to_string(),
                existing: existing.to_string(),
            });
        }
        Ok(())
    }

    fn publish(&self) {
        let visible = self
            .persons
            .iter()
            .filter(|p| self.filter.matches(p))
            .cloned()
            .collect();
        self.view
            .publish(visible, self.appointments.clone(), self.filter.clone());
    }
}

/// Moves the matching items out of `items`, keeping their original indices.
fn take_where<T>(items: &mut Vec<T>, mut pred: impl FnMut(&T) -> bool) -> Vec<(usize, T)> {
    let mut taken = Vec::new();
    let mut kept = Vec::with_capacity(items.len());
    for (i, item) in std::mem::take(items).into_iter().enumerate() {
        if pred(&item) {
            taken.push((i, item));
        } else {
            kept.push(item);
        }
    }
    *items = kept;
    taken
}

fn put_back<T>(items: &mut Vec<T>, mut entries: Vec<(usize, T)>) {
    entries.sort_by_key(|(i, _)| *i);
    for (i, item) in entries {
        let at = i.min(items.len());
        items.insert(at, item);
    }
}
