//! Coded event logging for the policy machinery
//!
//! Nothing is emitted until `init_global_logging()` installs a service; before
//! that the macros build no output and return immediately.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, Logger, LoggingService, MemoryLogger, MultiLogger, StructuredLogger,
};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Install the service described by the runtime logging preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config()?;

    let duplicates = codes::duplicate_codes();
    if !duplicates.is_empty() {
        return Err(format!("Event codes declared twice: {}", duplicates.join(", ")));
    }

    let service = Arc::new(service::create_configured_service());
    GLOBAL_LOGGER
        .set(service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Logging initialized",
    ));
    Ok(())
}

/// Install a caller-built service, e.g. one writing to a `MemoryLogger`
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(Arc::as_ref)
}

/// Whether an event at `level` would reach a logger
pub fn enabled(level: LogLevel) -> bool {
    try_get_global_logger().is_some_and(|service| service.enabled(level))
}

/// Attach `context`, clamp the message and hand the event to the global
/// service. Used by the logging macros.
pub fn dispatch(mut event: LogEvent, context: &[(&str, String)]) {
    let Some(service) = try_get_global_logger() else {
        return;
    };
    if !service.enabled(event.level) {
        return;
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }
    let keep = config::clamp_message(&event.message).len();
    event.message.truncate(keep);
    service.log_event(event);
}

/// Route every info-level and higher event into one shared `MemoryLogger`
///
/// Tests run in parallel against the same buffer, so callers must filter the
/// captured events by context unique to their own inputs.
#[cfg(test)]
pub(crate) fn capture_events() -> Arc<MemoryLogger> {
    static CAPTURE: OnceLock<Arc<MemoryLogger>> = OnceLock::new();
    CAPTURE
        .get_or_init(|| {
            let memory = Arc::new(MemoryLogger::with_capacity(100_000));
            let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Info));
            let _ = init_global_logging_with_service(service);
            memory
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_without_service_is_silent() {
        if !is_initialized() {
            assert!(!enabled(LogLevel::Error));
        }
        dispatch(
            LogEvent::error(codes::orb::SYSTEM_EXCEPTION, "system exception"),
            &[("poa", "Acme".to_string())],
        );
    }
}
