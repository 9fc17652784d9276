// src/core/paths.rs

use crate::constants::{DATA_DIR_ENV, DATA_DIR_NAME};
use crate::error::PathError;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Resolves the directory holding `socialbook.json`, `appointments.json` and
/// `preferences.toml`, creating it if needed.
///
/// Precedence: the explicit `override_dir` (from `--data-dir`), then the
/// `SOCIALBOOK_DATA_DIR` variable, then `<platform data dir>/socialbook`.
/// `~` and `$VARS` are expanded in the first two.
pub fn resolve_data_dir(override_dir: Option<&str>) -> Result<PathBuf, PathError> {
    let from_env = env::var(DATA_DIR_ENV).ok().filter(|v| !v.trim().is_empty());

    let data_dir = match override_dir.map(str::to_string).or(from_env) {
        Some(template) => expand(&template)?,
        None => dirs::data_dir()
            .ok_or(PathError::DataDirNotFound)?
            .join(DATA_DIR_NAME),
    };

    if !data_dir.exists() {
        log::info!("Creating data directory at {}", data_dir.display());
        fs::create_dir_all(&data_dir).map_err(|e| PathError::DataDirCreation {
            path: data_dir.display().to_string(),
            source: e,
        })?;
    }

    Ok(data_dir)
}

fn expand(template: &str) -> Result<PathBuf, PathError> {
    shellexpand::full(template)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| PathError::Expansion {
            path: template.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_dir_is_created() {
        // --- Setup ---
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested").join("book");

        // --- Execute ---
        let resolved = resolve_data_dir(Some(target.to_str().unwrap())).unwrap();

        // --- Assert ---
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn test_creation_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let err = resolve_data_dir(Some(blocker.join("book").to_str().unwrap())).unwrap_err();
        assert!(matches!(err, PathError::DataDirCreation { .. }));
    }

    #[test]
    fn test_unknown_variable_fails_expansion() {
        let err = resolve_data_dir(Some("$SOCIALBOOK_SURELY_UNSET_VARIABLE/book")).unwrap_err();
        assert!(matches!(err, PathError::Expansion { .. }));
    }
}
