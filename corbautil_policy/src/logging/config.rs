//! Logging settings
//!
//! The memory buffer size, message length cap and the least verbose level
//! allowed come from the build profile. Level, format and console output
//! are runtime preferences.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install the runtime logging preferences; call before
/// `init_global_logging`
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    validate_preferences(&preferences)?;

    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "logging preferences were already installed".to_string())
}

static DEFAULT_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Installed preferences, else the environment-derived defaults (read once)
fn preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES
        .get()
        .unwrap_or_else(|| DEFAULT_PREFERENCES.get_or_init(LoggingPreferences::default))
}

fn validate_preferences(preferences: &LoggingPreferences) -> Result<(), String> {
    match (preferences.enable_console_logging, preferences.use_structured_logging) {
        (false, true) => Err("use_structured_logging needs enable_console_logging".into()),
        _ => Ok(()),
    }
}

/// Most verbose level that is emitted; never below the build-profile floor
pub fn get_min_log_level() -> LogLevel {
    preferences()
        .min_log_level
        .max(get_security_log_level())
}

pub fn use_structured_logging() -> bool {
    preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    preferences().enable_console_logging
}

pub fn include_timestamps() -> bool {
    preferences().include_timestamps
}

/// Build-profile floor: events at or above this severity are never filtered
pub fn get_security_log_level() -> LogLevel {
    LogLevel::from_u8(SECURITY_MIN_LOG_LEVEL)
}

pub fn get_log_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Checked by `init_global_logging`
pub fn validate_config() -> Result<(), String> {
    if !(100..=100_000).contains(&LOG_BUFFER_SIZE) {
        return Err(format!(
            "Log buffer size {} outside 100..=100000",
            LOG_BUFFER_SIZE
        ));
    }

    if let Some(preferences) = RUNTIME_PREFERENCES.get() {
        validate_preferences(preferences)?;
    }

    Ok(())
}

/// Truncate a message to the compile-time maximum, on a char boundary
pub fn clamp_message(message: &str) -> &str {
    if message.len() <= MAX_LOG_MESSAGE_LENGTH {
        return message;
    }
    let mut end = MAX_LOG_MESSAGE_LENGTH;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}
