//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Timestamp format used in the record listing and for --start/--end bounds
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Compact timestamp embedded in export filenames
pub const EXPORT_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Default cap on listed records
pub const DEFAULT_LIMIT: usize = 10;

/// Directory under the user's home holding captured profiles
pub const PROFILE_DIR: &str = ".curlback/profiles";

/// Log file written to the working directory
pub const LOG_FILE: &str = "curlback.log";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
