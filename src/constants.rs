//! Constants used throughout the application.
//!
//! This module contains all constants used in the moodtab application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "moodtab";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A calendar mood journal: one mood and one note per day";

// Logging Configuration
/// Environment variable holding the tracing filter directive.
pub const ENV_VAR_MOODTAB_LOG: &str = "MOODTAB_LOG";
/// Environment variable selecting the log output format.
pub const ENV_VAR_MOODTAB_LOG_FORMAT: &str = "MOODTAB_LOG_FORMAT";
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "moodtab";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the data directory.
pub const ENV_VAR_MOODTAB_DIR: &str = "MOODTAB_DIR";
/// Environment variable for the connection pool size.
pub const ENV_VAR_MOODTAB_DB_POOL_SIZE: &str = "MOODTAB_DB_POOL_SIZE";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default data directory relative to the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".local/share/moodtab";
/// Database file name inside the data directory.
pub const DEFAULT_DB_FILE_NAME: &str = "moodtab.db";
/// Default number of pooled SQLite connections.
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
/// Upper bound accepted for the pool size.
pub const MAX_DB_POOL_SIZE: u32 = 16;
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Entry Constraints
/// Maximum number of characters in a note.
pub const MAX_NOTE_CHARS: usize = 500;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD). Also the stored key format.
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Days shown per calendar row.
pub const DAYS_PER_WEEK: usize = 7;

// Preference Keys
/// Key under which the theme mode is stored.
pub const PREF_THEME_MODE: &str = "theme_mode";
/// Key for the first-launch flag.
pub const PREF_FIRST_LAUNCH: &str = "is_first_launch";
/// Key for the welcome-completed flag.
pub const PREF_WELCOME_COMPLETED: &str = "welcome_completed";
/// Last step index of the welcome flow.
pub const WELCOME_LAST_STEP: u8 = 3;

// Live Subscriptions
/// Capacity of the store change feed before slow subscribers lag.
pub const CHANGE_FEED_CAPACITY: usize = 64;
