// src/core/config_loader.rs

//! Loads and stores `preferences.toml`.

use crate::constants::PREFERENCES_FILENAME;
use crate::core::storage::atomic_write;
use crate::error::PersistenceError;
use crate::models::UserPreferences;
use std::fs;
use std::path::Path;

/// Reads the preferences from `data_dir`.
///
/// A missing file is created with the defaults. A file that cannot be read or
/// parsed is left alone and the defaults are used for this session.
pub fn load_preferences(data_dir: &Path) -> Result<UserPreferences, PersistenceError> {
    let path = data_dir.join(PREFERENCES_FILENAME);

    if !path.exists() {
        let defaults = UserPreferences::default();
        save_preferences(data_dir, &defaults)?;
        log::info!("Wrote default preferences to {}", path.display());
        return Ok(defaults);
    }

    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| toml::from_str(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(preferences) => Ok(preferences),
        Err(reason) => {
            log::warn!(
                "Ignoring unreadable preferences file {}: {}",
                path.display(),
                reason
            );
            Ok(UserPreferences::default())
        }
    }
}

pub fn save_preferences(data_dir: &Path, preferences: &UserPreferences) -> Result<(), PersistenceError> {
    let content = toml::to_string_pretty(preferences)?;
    atomic_write(&data_dir.join(PREFERENCES_FILENAME), content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let tmp = tempfile::tempdir().unwrap();

        let prefs = load_preferences(tmp.path()).unwrap();

        assert_eq!(prefs, UserPreferences::default());
        assert!(tmp.path().join(PREFERENCES_FILENAME).exists());
    }

    #[test]
    fn test_round_trip_keeps_window_geometry() {
        let tmp = tempfile::tempdir().unwrap();
        let mut prefs = UserPreferences::default();
        prefs.window.width = 1024;
        prefs.window.x = Some(40);

        save_preferences(tmp.path(), &prefs).unwrap();
        let loaded = load_preferences(tmp.path()).unwrap();

        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_garbage_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(PREFERENCES_FILENAME), "window = [[[").unwrap();

        let prefs = load_preferences(tmp.path()).unwrap();

        assert_eq!(prefs, UserPreferences::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(PREFERENCES_FILENAME),
            "[window]\nheight = 900\n",
        )
        .unwrap();

        let prefs = load_preferences(tmp.path()).unwrap();

        assert_eq!(prefs.window.height, 900);
        assert_eq!(prefs.window.width, 740);
        assert_eq!(prefs.persons_file, "socialbook.json");
    }
}
