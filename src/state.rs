// src/state.rs

//! The read side of the case book. The single writer builds a complete
//! [`FilteredView`] after every mutation and swaps it in; readers on any
//! thread clone the current `Arc` and never observe a half-applied change.

use crate::models::{Appointment, Person, PersonFilter};
use std::sync::{Arc, PoisonError, RwLock};

/// An immutable snapshot of what the presentation layer displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    /// Persons passing the active filter, in storage order.
    pub persons: Vec<Person>,
    pub appointments: Vec<Appointment>,
    pub filter: PersonFilter,
    /// Increases by one with every published snapshot.
    pub version: u64,
}

impl FilteredView {
    pub fn person_count(&self) -> usize {
        self.persons.len()
    }
}

/// Owned by the case book. Publishing is the only way to change the view.
#[derive(Debug, Default)]
pub struct ViewPublisher {
    slot: Arc<RwLock<Arc<FilteredView>>>,
}

impl ViewPublisher {
    pub fn publish(&self, persons: Vec<Person>, appointments: Vec<Appointment>, filter: PersonFilter) {
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        let version = guard.version + 1;
        *guard = Arc::new(FilteredView {
            persons,
            appointments,
            filter,
            version,
        });
    }

    pub fn current(&self) -> Arc<FilteredView> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A read-only handle that can be moved to other threads.
    pub fn handle(&self) -> ViewHandle {
        ViewHandle {
            slot: Arc::clone(&self.slot),
        }
    }
}

/// Cheap to clone; `Send + Sync`.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    slot: Arc<RwLock<Arc<FilteredView>>>,
}

impl ViewHandle {
    pub fn current(&self) -> Arc<FilteredView> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::person;
    use std::thread;

    #[test]
    fn test_readers_see_whole_snapshots() {
        let publisher = ViewPublisher::default();
        let handle = publisher.handle();
        let before = handle.current();

        publisher.publish(
            vec![person("Alex Yeoh"), person("Bernice Yu")],
            vec![],
            PersonFilter::default(),
        );

        // The old snapshot is untouched; the new one is complete.
        assert_eq!(before.version, 0);
        assert!(before.persons.is_empty());
        let after = thread::spawn(move || handle.current()).join().unwrap();
        assert_eq!(after.version, 1);
        assert_eq!(after.person_count(), 2);
    }
}
