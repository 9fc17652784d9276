// src/core/logic.rs

//! The execution orchestrator: parse, execute, record, save.

use crate::cli::command::{ExecutionContext, Signal};
use crate::cli::dispatcher;
use crate::core::case_book::CaseBook;
use crate::core::history::CommandHistory;
use crate::core::schemes::SchemeCatalog;
use crate::core::storage::Storage;
use crate::core::timing::CommandTimer;
use crate::error::PersistenceError;
use crate::models::UserPreferences;
use crate::state::{FilteredView, ViewHandle};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
    /// The command succeeded in memory but could not be saved.
    Warning,
}

/// What one submitted line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: Status,
    pub message: String,
    /// Whether the published view changed.
    pub model_changed: bool,
    pub signal: Signal,
}

impl CommandResult {
    fn failure(message: String) -> Self {
        Self {
            status: Status::Failure,
            message,
            model_changed: false,
            signal: Signal::None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Owns the case book, the undo history and the storage. The only writer.
#[derive(Debug)]
pub struct Logic {
    book: CaseBook,
    history: CommandHistory,
    storage: Box<dyn Storage>,
    schemes: SchemeCatalog,
}

impl Logic {
    pub fn new(book: CaseBook, storage: Box<dyn Storage>, schemes: SchemeCatalog) -> Self {
        Self {
            book,
            history: CommandHistory::new(),
            storage,
            schemes,
        }
    }

    /// Runs one line of user input to completion.
    pub fn submit(&mut self, input: &str) -> CommandResult {
        let _timer = CommandTimer::new(input.trim());

        let mut command = match dispatcher::parse_command(input) {
            Ok(command) => command,
            Err(e) => {
                log::debug!("Parse failed for '{}': {}", input.trim(), e);
                return CommandResult::failure(e.to_string());
            }
        };

        let version_before = self.book.version();
        let outcome = {
            let mut ctx = ExecutionContext {
                book: &mut self.book,
                history: &mut self.history,
                schemes: &self.schemes,
            };
            command.execute(&mut ctx)
        };
        let feedback = match outcome {
            Ok(feedback) => feedback,
            Err(e) => {
                log::debug!("'{}' failed: {}", command.keyword(), e);
                return CommandResult::failure(e.to_string());
            }
        };

        self.history.record(command);
        let model_changed = self.book.version() != version_before;

        match self.storage.save(&self.book) {
            Ok(()) => CommandResult {
                status: Status::Success,
                message: feedback.message,
                model_changed,
                signal: feedback.signal,
            },
            Err(e) => {
                log::error!("Save failed: {}", e);
                CommandResult {
                    status: Status::Warning,
                    message: format!(
                        t!("logic.save_warning"),
                        message = feedback.message,
                        error = e
                    ),
                    model_changed,
                    signal: feedback.signal,
                }
            }
        }
    }

    pub fn book(&self) -> &CaseBook {
        &self.book
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn view(&self) -> Arc<FilteredView> {
        self.book.view()
    }

    pub fn view_handle(&self) -> ViewHandle {
        self.book.view_handle()
    }

    pub fn preferences(&self) -> &UserPreferences {
        self.book.preferences()
    }

    pub fn set_preferences(&mut self, preferences: UserPreferences) {
        self.book.set_preferences(preferences);
    }

    /// Persists the preferences on exit.
    pub fn shutdown(&self) -> Result<(), PersistenceError> {
        self.storage.save_preferences(self.book.preferences())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExecutionError, ValidationError};
    use crate::models::tests::person;
    use crate::models::{Appointment, ListMode, Person, PersonFilter};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct MemoryStorage {
        saves: Arc<AtomicUsize>,
        preferences: Arc<Mutex<Option<UserPreferences>>>,
    }

    impl Storage for MemoryStorage {
        fn save_persons(&self, _book: &CaseBook) -> Result<(), PersistenceError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn save_appointments(&self, _book: &CaseBook) -> Result<(), PersistenceError> {
            Ok(())
        }

        fn save_preferences(&self, preferences: &UserPreferences) -> Result<(), PersistenceError> {
            *self.preferences.lock().unwrap() = Some(preferences.clone());
            Ok(())
        }
    }

    #[derive(Debug)]
    struct FailingStorage;

    impl Storage for FailingStorage {
        fn save_persons(&self, _book: &CaseBook) -> Result<(), PersistenceError> {
            Err(PersistenceError::WriteFailed {
                path: "socialbook.json".into(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn save_appointments(&self, _book: &CaseBook) -> Result<(), PersistenceError> {
            Ok(())
        }

        fn save_preferences(&self, _preferences: &UserPreferences) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    fn book_of(names: &[&str]) -> CaseBook {
        let mut book = CaseBook::new(UserPreferences::default());
        for name in names {
            book.add_person(person(name)).unwrap();
        }
        book
    }

    fn logic_with(names: &[&str]) -> (Logic, Arc<AtomicUsize>) {
        let storage = MemoryStorage::default();
        let saves = Arc::clone(&storage.saves);
        let logic = Logic::new(book_of(names), Box::new(storage), SchemeCatalog::default());
        (logic, saves)
    }

    const ADD_BOB: &str = "add n/Bob Tan p/91234567 e/bob@example.com a/Blk 1 Street 2";

    #[test]
    fn test_add_delete_undo_restores_store() {
        // --- Setup ---
        let (mut logic, _) = logic_with(&["Alex Yeoh"]);
        assert!(logic.submit(ADD_BOB).is_success());
        let before: Vec<_> = logic.book().persons().to_vec();

        // --- Execute ---
        let deleted = logic.submit("delete 2");
        let undone = logic.submit("undo");

        // --- Assert ---
        assert!(deleted.is_success(), "{}", deleted.message);
        assert!(undone.is_success(), "{}", undone.message);
        assert_eq!(logic.book().persons(), before.as_slice());
    }

    #[test]
    fn test_added_person_is_listed() {
        let (mut logic, _) = logic_with(&[]);

        logic.submit(ADD_BOB);
        let listed = logic.submit("list");

        assert!(listed.is_success());
        assert_eq!(logic.view().person_count(), 1);
        assert_eq!(logic.view().persons[0].name.as_str(), "Bob Tan");
    }

    #[test]
    fn test_archive_then_unarchive_round_trips() {
        let (mut logic, _) = logic_with(&["Alex Yeoh"]);
        let original = logic.book().persons()[0].clone();

        assert!(logic.submit("archive 1").is_success());
        assert!(logic.submit("list archive/").is_success());
        assert!(logic.submit("unarchive 1").is_success());

        assert_eq!(logic.book().persons()[0], original);
    }

    #[test]
    fn test_overlapping_appointment_fails_back_to_back_succeeds() {
        // --- Setup ---
        let (mut logic, _) = logic_with(&["Alex Yeoh", "Bernice Yu"]);
        assert!(
            logic
                .submit("addappt 1 date/2024-11-15 from/16:00 to/18:00")
                .is_success()
        );

        // --- Execute ---
        let clash = logic.submit("addappt 2 date/2024-11-15 from/17:00 to/19:00");
        let adjacent = logic.submit("addappt 2 date/2024-11-15 from/18:00 to/19:00");

        // --- Assert ---
        assert_eq!(clash.status, Status::Failure);
        assert!(clash.message.contains("clashes"));
        assert!(adjacent.is_success(), "{}", adjacent.message);
        assert_eq!(logic.book().appointments().len(), 2);
    }

    #[test]
    fn test_undo_with_nothing_reversible_fails() {
        let (mut logic, _) = logic_with(&["Alex Yeoh"]);
        logic.submit("list");
        logic.submit("find n/alex");
        let before = logic.book().persons().to_vec();

        let result = logic.submit("undo");

        assert_eq!(result.status, Status::Failure);
        assert_eq!(result.message, ExecutionError::NothingToUndo.to_string());
        assert_eq!(logic.book().persons(), before.as_slice());
    }

    #[test]
    fn test_repeated_delete_indices_collapse() {
        let names = ["A One", "B Two", "C Three", "D Four", "E Five"];
        let (mut repeated, _) = logic_with(&names);
        let (mut plain, _) = logic_with(&names);

        repeated.submit("delete 1,1,1,2");
        plain.submit("delete 1,2");

        assert_eq!(repeated.book().persons(), plain.book().persons());
        assert_eq!(repeated.book().persons().len(), 3);
    }

    #[test]
    fn test_delete_out_of_range_reports_index() {
        let (mut logic, _) = logic_with(&["Alex Yeoh"]);

        let result = logic.submit("delete 1,7");

        assert_eq!(result.status, Status::Failure);
        let expected = ValidationError::InvalidIndex {
            target: "person",
            index: 7,
            len: 1,
        };
        assert_eq!(result.message, expected.to_string());
        assert_eq!(logic.book().persons().len(), 1);
    }

    #[test]
    fn test_failures_are_not_recorded_or_saved() {
        let (mut logic, saves) = logic_with(&["Alex Yeoh"]);

        let unknown = logic.submit("frobnicate");
        let bad = logic.submit("delete 9");

        assert_eq!(unknown.status, Status::Failure);
        assert_eq!(bad.status, Status::Failure);
        assert!(logic.history().is_empty());
        assert_eq!(saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_every_success_is_saved() {
        let (mut logic, saves) = logic_with(&["Alex Yeoh"]);

        logic.submit("list");
        logic.submit("archive 1");

        assert_eq!(saves.load(Ordering::SeqCst), 2);
        assert_eq!(logic.history().len(), 1);
    }

    #[test]
    fn test_save_failure_is_a_warning() {
        let mut logic = Logic::new(
            book_of(&["Alex Yeoh"]),
            Box::new(FailingStorage),
            SchemeCatalog::default(),
        );

        let result = logic.submit("archive 1");

        assert_eq!(result.status, Status::Warning);
        assert!(result.model_changed);
        assert!(result.message.contains("disk full"));
        assert!(logic.book().persons()[0].archived);
    }

    #[test]
    fn test_statistics_count_displayed_persons() {
        let (mut logic, _) = logic_with(&["Alex Yeoh", "Bernice Yu", "Charlotte Oliveiro"]);
        logic.submit("edit 1 pri/HIGH");
        logic.submit("archive 3");

        let result = logic.submit("stats");

        assert!(result.is_success());
        assert!(result.message.contains("Persons shown: 2"));
        assert!(result.message.contains("High priority: 1"));
        assert!(result.message.contains("Medium priority: 1"));
        assert!(!result.model_changed);
    }

    #[test]
    fn test_clear_is_undoable() {
        let (mut logic, _) = logic_with(&["Alex Yeoh", "Bernice Yu"]);
        let before = logic.book().persons().to_vec();

        assert!(logic.submit("clear").is_success());
        assert!(logic.book().persons().is_empty());
        assert!(logic.submit("undo").is_success());

        assert_eq!(logic.book().persons(), before.as_slice());
    }

    fn snapshot(logic: &Logic) -> (Vec<Person>, Vec<Appointment>) {
        (
            logic.book().persons().to_vec(),
            logic.book().appointments().to_vec(),
        )
    }

    #[test]
    fn test_every_reversible_command_undoes_in_lifo_order() {
        // --- Setup ---
        let (mut logic, _) = logic_with(&["Alex Yeoh", "Bernice Yu"]);
        let steps = [
            "edit 1 n/Alexander Yeoh p/91234567",
            "addappt 1 date/2024-11-15 from/16:00 to/18:00",
            "editappt 1 date/2024-11-16 to/19:00",
            "addappt 2 date/2024-11-16 from/19:00 to/20:00",
            "deleteappt 1",
            "addscheme 1 i/1",
            "addscheme 1 i/2",
            "deletescheme 1 i/1",
            "archive 1",
            "delete 1",
            ADD_BOB,
            "clear",
        ];

        // --- Execute: forward ---
        let mut states = Vec::new();
        for step in steps {
            states.push(snapshot(&logic));
            let result = logic.submit(step);
            assert!(result.is_success(), "{}: {}", step, result.message);
        }
        assert_eq!(logic.history().len(), steps.len());

        // --- Assert: each undo steps back exactly one state ---
        while let Some(expected) = states.pop() {
            let result = logic.submit("undo");
            assert!(result.is_success(), "{}", result.message);
            assert_eq!(snapshot(&logic), expected);
        }
        assert_eq!(logic.submit("undo").status, Status::Failure);
        assert_eq!(logic.history().reversed().len(), steps.len());
    }

    #[test]
    fn test_undo_delete_restores_archived_person_with_schemes_and_appointments() {
        // --- Setup ---
        let (mut logic, _) = logic_with(&["Alex Yeoh", "Bernice Yu", "Charlotte Oliveiro"]);
        for step in [
            "addappt 2 date/2024-11-15 from/09:00 to/10:00",
            "addappt 1 date/2024-11-15 from/10:00 to/11:00",
            "addappt 2 date/2024-11-16 from/09:00 to/10:00",
            "addscheme 2 i/2",
            "archive 2",
            "list archive/",
        ] {
            let result = logic.submit(step);
            assert!(result.is_success(), "{}: {}", step, result.message);
        }
        let before = snapshot(&logic);

        // --- Execute ---
        let deleted = logic.submit("delete 1");
        assert!(deleted.is_success(), "{}", deleted.message);
        assert_eq!(logic.book().persons().len(), 2);
        assert_eq!(logic.book().appointments().len(), 1);
        let undone = logic.submit("undo");

        // --- Assert ---
        assert!(undone.is_success(), "{}", undone.message);
        assert_eq!(snapshot(&logic), before);
        let bernice = &logic.book().persons()[1];
        assert!(bernice.archived);
        assert_eq!(
            bernice.schemes,
            vec!["Student Care Fee Assistance (SCFA)".to_string()]
        );
        assert_eq!(logic.view().person_count(), 1);
    }

    #[test]
    fn test_undo_add_restores_the_filter_it_replaced() {
        let (mut logic, _) = logic_with(&["Alex Yeoh"]);
        logic.submit("archive 1");
        logic.submit("list archive/");

        assert!(logic.submit(ADD_BOB).is_success());
        assert_eq!(logic.book().filter(), &PersonFilter::default());
        assert_eq!(logic.view().persons[0].name.as_str(), "Bob Tan");

        assert!(logic.submit("undo").is_success());
        assert_eq!(
            logic.book().filter(),
            &PersonFilter::Listing(ListMode::Archived)
        );
        assert_eq!(logic.view().persons[0].name.as_str(), "Alex Yeoh");
    }

    #[test]
    fn test_exit_and_help_signal() {
        let (mut logic, _) = logic_with(&[]);

        assert_eq!(logic.submit("help").signal, Signal::ShowHelp);
        assert_eq!(logic.submit("exit").signal, Signal::Exit);
    }

    #[test]
    fn test_shutdown_saves_preferences() {
        let storage = MemoryStorage::default();
        let saved = Arc::clone(&storage.preferences);
        let mut logic = Logic::new(book_of(&[]), Box::new(storage), SchemeCatalog::default());
        let mut prefs = UserPreferences::default();
        prefs.window.width = 1024;

        logic.set_preferences(prefs.clone());
        logic.shutdown().unwrap();

        assert_eq!(saved.lock().unwrap().as_ref(), Some(&prefs));
    }
}
