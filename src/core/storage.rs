// src/core/storage.rs

//! JSON persistence for the case book.
//!
//! Persons (with the active filter) and appointments live in two independent
//! files. Each is written atomically and recovered independently, except that
//! discarding the persons also discards the appointments that point at them.

use crate::core::case_book::CaseBook;
use crate::core::config_loader;
use crate::core::sample_data;
use crate::error::PersistenceError;
use crate::models::{Appointment, Person, PersonFilter, UserPreferences};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// How one file was turned into in-memory data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// The file was read and every entry was valid.
    Loaded,
    /// The file did not exist; built-in defaults were used.
    Seeded,
    /// The file existed but could not be used; its data was dropped.
    Corrupted { reason: String },
}

impl RecoveryAction {
    pub fn is_corrupted(&self) -> bool {
        matches!(self, Self::Corrupted { .. })
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => f.write_str("loaded"),
            Self::Seeded => f.write_str("seeded"),
            Self::Corrupted { reason } => write!(f, "corrupted ({})", reason),
        }
    }
}

/// Contents of the persons file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonsDocument {
    pub persons: Vec<Person>,
    #[serde(default)]
    pub filter: PersonFilter,
}

/// Contents of the appointments file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentsDocument {
    pub appointments: Vec<Appointment>,
}

#[derive(Serialize)]
struct PersonsDocumentRef<'a> {
    persons: &'a [Person],
    filter: &'a PersonFilter,
}

#[derive(Serialize)]
struct AppointmentsDocumentRef<'a> {
    appointments: &'a [Appointment],
}

/// Writes `bytes` to a temporary file next to `path`, then renames it over
/// `path`. Readers see either the old or the new content, never a mix.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    let failed = |source: io::Error| PersistenceError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(failed)?;
    tmp.write_all(bytes).map_err(failed)?;
    tmp.as_file().sync_all().map_err(failed)?;
    tmp.persist(path).map_err(|e| failed(e.error))?;
    Ok(())
}

/// A single JSON file.
#[derive(Debug, Clone)]
pub struct JsonChannel {
    path: PathBuf,
}

impl JsonChannel {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist.
    pub fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.corrupted(e.to_string())),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| self.corrupted(e.to_string()))
    }

    pub fn write<T: Serialize + ?Sized>(&self, data: &T) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(data).map_err(|source| PersistenceError::Encode {
            path: self.path.clone(),
            source,
        })?;
        atomic_write(&self.path, &bytes)
    }

    fn corrupted(&self, reason: String) -> PersistenceError {
        PersistenceError::Corrupted {
            path: self.path.clone(),
            reason,
        }
    }
}

/// The write side used by the orchestrator after every command.
pub trait Storage: fmt::Debug + Send {
    fn save_persons(&self, book: &CaseBook) -> Result<(), PersistenceError>;

    fn save_appointments(&self, book: &CaseBook) -> Result<(), PersistenceError>;

    fn save_preferences(&self, preferences: &UserPreferences) -> Result<(), PersistenceError>;

    /// Saves both files. Both writes are attempted; the first error is returned.
    fn save(&self, book: &CaseBook) -> Result<(), PersistenceError> {
        let persons = self.save_persons(book);
        let appointments = self.save_appointments(book);
        persons.and(appointments)
    }
}

/// The result of reading both files at startup.
#[derive(Debug)]
pub struct LoadReport {
    pub book: CaseBook,
    pub persons: RecoveryAction,
    pub appointments: RecoveryAction,
}

/// File-backed storage in the data directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    data_dir: PathBuf,
    persons: JsonChannel,
    appointments: JsonChannel,
}

impl JsonStorage {
    /// File names come from the preferences.
    pub fn new(data_dir: &Path, preferences: &UserPreferences) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            persons: JsonChannel::new(data_dir.join(&preferences.persons_file)),
            appointments: JsonChannel::new(data_dir.join(&preferences.appointments_file)),
        }
    }

    pub fn persons_path(&self) -> &Path {
        self.persons.path()
    }

    pub fn appointments_path(&self) -> &Path {
        self.appointments.path()
    }

    /// Reads the persons file. Missing: sample persons. Unreadable: empty.
    pub fn load_persons(&self) -> (PersonsDocument, RecoveryAction) {
        match self.persons.read::<PersonsDocument>() {
            Ok(Some(doc)) => (doc, RecoveryAction::Loaded),
            Ok(None) => {
                log::info!(
                    "No data file at {}, starting with sample data",
                    self.persons.path().display()
                );
                let doc = PersonsDocument {
                    persons: sample_data::sample_persons(),
                    filter: PersonFilter::default(),
                };
                (doc, RecoveryAction::Seeded)
            }
            Err(e) => {
                log::warn!("{}. Starting with an empty case book.", e);
                (
                    PersonsDocument::default(),
                    RecoveryAction::Corrupted {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }

    /// Reads the appointments file. Missing or unreadable: empty.
    pub fn load_appointments(&self) -> (Vec<Appointment>, RecoveryAction) {
        match self.appointments.read::<AppointmentsDocument>() {
            Ok(Some(doc)) => (doc.appointments, RecoveryAction::Loaded),
            Ok(None) => (Vec::new(), RecoveryAction::Seeded),
            Err(e) => {
                log::warn!("{}. Starting with no appointments.", e);
                (
                    Vec::new(),
                    RecoveryAction::Corrupted {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }

    /// Loads both files and assembles the case book, applying the recovery
    /// rules for entries that parse but break the book's invariants.
    pub fn load(&self, preferences: UserPreferences) -> LoadReport {
        let (persons_doc, mut persons_action) = self.load_persons();
        let (appointments, mut appointments_action) = if persons_action.is_corrupted() {
            (Vec::new(), discarded_with_persons())
        } else {
            self.load_appointments()
        };

        let full = CaseBook::from_parts(
            preferences.clone(),
            persons_doc.persons.clone(),
            appointments,
            persons_doc.filter.clone(),
        );
        let book = match full {
            Ok(book) => book,
            Err(first) => match CaseBook::from_parts(
                preferences.clone(),
                persons_doc.persons,
                Vec::new(),
                persons_doc.filter,
            ) {
                Ok(book) => {
                    log::warn!(
                        "Appointments in {} are invalid ({}). Starting with no appointments.",
                        self.appointments.path().display(),
                        first
                    );
                    appointments_action = RecoveryAction::Corrupted {
                        reason: first.to_string(),
                    };
                    book
                }
                Err(e) => {
                    log::warn!(
                        "Persons in {} are invalid ({}). Starting with an empty case book.",
                        self.persons.path().display(),
                        e
                    );
                    persons_action = RecoveryAction::Corrupted {
                        reason: e.to_string(),
                    };
                    appointments_action = discarded_with_persons();
                    CaseBook::new(preferences)
                }
            },
        };

        log::info!(
            "Loaded {} person(s) [{}] and {} appointment(s) [{}]",
            book.persons().len(),
            persons_action,
            book.appointments().len(),
            appointments_action
        );
        LoadReport {
            book,
            persons: persons_action,
            appointments: appointments_action,
        }
    }
}

fn discarded_with_persons() -> RecoveryAction {
    RecoveryAction::Corrupted {
        reason: "discarded together with the unreadable person data".to_string(),
    }
}

impl Storage for JsonStorage {
    fn save_persons(&self, book: &CaseBook) -> Result<(), PersistenceError> {
        self.persons.write(&PersonsDocumentRef {
            persons: book.persons(),
            filter: book.filter(),
        })
    }

    fn save_appointments(&self, book: &CaseBook) -> Result<(), PersistenceError> {
        self.appointments.write(&AppointmentsDocumentRef {
            appointments: book.appointments(),
        })
    }

    fn save_preferences(&self, preferences: &UserPreferences) -> Result<(), PersistenceError> {
        config_loader::save_preferences(&self.data_dir, preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::{appointment, person};
    use crate::models::ListMode;

    fn storage(dir: &Path) -> JsonStorage {
        JsonStorage::new(dir, &UserPreferences::default())
    }

    fn saved_book(dir: &Path) -> CaseBook {
        let mut book = CaseBook::new(UserPreferences::default());
        book.add_person(person("Alex Yeoh")).unwrap();
        book.add_person(person("Bernice Yu").with_archived(true)).unwrap();
        book.add_appointment(appointment("Alex Yeoh", "2024-11-15", "16:00", "18:00"))
            .unwrap();
        book.set_filter(PersonFilter::Listing(ListMode::All));
        storage(dir).save(&book).unwrap();
        book
    }

    #[test]
    fn test_missing_files_seed_sample_persons_only() {
        let tmp = tempfile::tempdir().unwrap();

        let report = storage(tmp.path()).load(UserPreferences::default());

        assert_eq!(report.persons, RecoveryAction::Seeded);
        assert_eq!(report.appointments, RecoveryAction::Seeded);
        assert_eq!(report.book.persons().len(), 6);
        assert!(report.book.appointments().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        // --- Setup ---
        let tmp = tempfile::tempdir().unwrap();
        let book = saved_book(tmp.path());

        // --- Execute ---
        let report = storage(tmp.path()).load(UserPreferences::default());

        // --- Assert ---
        assert_eq!(report.persons, RecoveryAction::Loaded);
        assert_eq!(report.appointments, RecoveryAction::Loaded);
        assert_eq!(report.book.persons(), book.persons());
        assert_eq!(report.book.appointments(), book.appointments());
        assert_eq!(report.book.filter(), &PersonFilter::Listing(ListMode::All));
    }

    #[test]
    fn test_corrupted_persons_clear_both_channels() {
        let tmp = tempfile::tempdir().unwrap();
        let store = storage(tmp.path());
        saved_book(tmp.path());
        fs::write(store.persons_path(), "{ this is not json").unwrap();

        let report = store.load(UserPreferences::default());

        assert!(report.persons.is_corrupted());
        assert!(report.appointments.is_corrupted());
        assert!(report.book.persons().is_empty());
        assert!(report.book.appointments().is_empty());
    }

    #[test]
    fn test_corrupted_appointments_keep_persons() {
        let tmp = tempfile::tempdir().unwrap();
        let store = storage(tmp.path());
        saved_book(tmp.path());
        fs::write(store.appointments_path(), r#"{"appointments": [42]}"#).unwrap();

        let report = store.load(UserPreferences::default());

        assert_eq!(report.persons, RecoveryAction::Loaded);
        assert!(report.appointments.is_corrupted());
        assert_eq!(report.book.persons().len(), 2);
        assert!(report.book.appointments().is_empty());
    }

    #[test]
    fn test_invalid_field_value_counts_as_corruption() {
        let tmp = tempfile::tempdir().unwrap();
        let store = storage(tmp.path());
        saved_book(tmp.path());
        let content = fs::read_to_string(store.persons_path()).unwrap();
        fs::write(
            store.persons_path(),
            content.replace("someone@example.com", "not-an-email"),
        )
        .unwrap();

        let report = store.load(UserPreferences::default());

        assert!(report.persons.is_corrupted());
        assert!(report.book.persons().is_empty());
    }

    #[test]
    fn test_duplicate_persons_count_as_corruption() {
        let tmp = tempfile::tempdir().unwrap();
        let store = storage(tmp.path());
        let doc = PersonsDocument {
            persons: vec![person("Alex Yeoh"), person("alex yeoh")],
            filter: PersonFilter::default(),
        };
        JsonChannel::new(store.persons_path().to_path_buf())
            .write(&doc)
            .unwrap();

        let report = store.load(UserPreferences::default());

        assert!(report.persons.is_corrupted());
        assert!(report.appointments.is_corrupted());
        assert!(report.book.persons().is_empty());
    }

    #[test]
    fn test_appointment_with_unknown_owner_is_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let store = storage(tmp.path());
        saved_book(tmp.path());
        let doc = AppointmentsDocument {
            appointments: vec![appointment("Nobody Known", "2024-11-15", "09:00", "10:00")],
        };
        JsonChannel::new(store.appointments_path().to_path_buf())
            .write(&doc)
            .unwrap();

        let report = store.load(UserPreferences::default());

        assert_eq!(report.persons, RecoveryAction::Loaded);
        assert!(report.appointments.is_corrupted());
        assert!(report.book.appointments().is_empty());
    }

    #[test]
    fn test_save_leaves_no_temporary_files() {
        let tmp = tempfile::tempdir().unwrap();
        saved_book(tmp.path());

        let mut names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec!["appointments.json", "socialbook.json"]);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("gone");
        let book = CaseBook::new(UserPreferences::default());

        let err = storage(&gone).save(&book).unwrap_err();

        assert!(matches!(err, PersistenceError::WriteFailed { .. }));
    }
}
