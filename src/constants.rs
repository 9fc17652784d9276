// src/constants.rs

use std::time::Duration;

/// The name of the data directory created under the platform data dir.
pub const DATA_DIR_NAME: &str = "socialbook";

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "SOCIALBOOK_DATA_DIR";

/// Default file holding persons and the active list filter.
pub const PERSONS_FILENAME: &str = "socialbook.json";

/// Default file holding appointments.
pub const APPOINTMENTS_FILENAME: &str = "appointments.json";

/// The user preferences file (inside the data directory).
pub const PREFERENCES_FILENAME: &str = "preferences.toml";

/// Commands slower than this are logged as a warning.
pub const COMMAND_TIME_BUDGET: Duration = Duration::from_secs(10);

/// How often the REPL's clock thread samples the published view.
pub const VIEW_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Input format for dates of birth, e.g. `1 Jan 1999`.
pub const DATE_OF_BIRTH_FORMAT: &str = "%d %b %Y";

/// Input format for appointment dates.
pub const APPOINTMENT_DATE_FORMAT: &str = "%Y-%m-%d";

pub const APPOINTMENT_TIME_FORMAT: &str = "%H:%M";
