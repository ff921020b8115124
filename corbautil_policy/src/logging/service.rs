//! Loggers and the service that filters events before they reach one

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Drops events less severe than its level, passes the rest to one logger
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Logger and level chosen by the runtime logging preferences
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();

        let logger: Arc<dyn Logger> = if !config::use_console_logging() {
            Arc::new(MultiLogger::new())
        } else if config::use_structured_logging() {
            Arc::new(StructuredLogger)
        } else {
            Arc::new(ConsoleLogger::new().with_timestamps(config::include_timestamps()))
        };

        Self::new(logger, min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.enabled(event.level) {
            self.logger.log(&event);
        }
    }
}

/// Errors to stderr, everything else to stdout
#[derive(Debug, Default)]
pub struct ConsoleLogger {
    timestamps: bool,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        let line = if self.timestamps {
            format!("{} {}", event.timestamp.to_rfc3339(), event)
        } else {
            event.to_string()
        };

        if event.is_error() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// One JSON object per line
#[derive(Debug, Default)]
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        let line = event.to_json().unwrap_or_else(|_| event.to_string());
        if event.is_error() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Keeps the most recent events, up to the build-profile buffer size
pub struct MemoryLogger {
    events: Mutex<VecDeque<LogEvent>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_capacity(config::get_log_buffer_size())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn has_code(&self, code: Code) -> bool {
        self.events.lock().iter().any(|e| e.code == code)
    }

    pub fn count_at(&self, level: LogLevel) -> usize {
        self.events.lock().iter().filter(|e| e.level == level).count()
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.events.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

/// Fans each event out to every attached logger
#[derive(Default)]
pub struct MultiLogger {
    loggers: Vec<Arc<dyn Logger>>,
}

impl MultiLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, logger: Arc<dyn Logger>) -> Self {
        self.loggers.push(logger);
        self
    }
}

impl Logger for MultiLogger {
    fn log(&self, event: &LogEvent) {
        for logger in &self.loggers {
            logger.log(event);
        }
    }
}

pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger_drops_oldest() {
        let logger = MemoryLogger::with_capacity(2);
        logger.log(&LogEvent::info("first"));
        logger.log(&LogEvent::error(codes::lexical::INVALID_CHARACTER, "second"));
        logger.log(&LogEvent::info("third"));

        let messages: Vec<_> = logger.events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["second", "third"]);
        assert_eq!(logger.count_at(LogLevel::Error), 1);

        logger.clear();
        assert!(logger.is_empty());
    }

    #[test]
    fn test_service_filters_by_level() {
        let memory = Arc::new(MemoryLogger::with_capacity(16));
        let service = LoggingService::new(memory.clone(), LogLevel::Info);

        service.log_event(LogEvent::debug("hidden"));
        service.log_event(LogEvent::success(codes::success::POA_CREATED, "created"));
        service.log_event(LogEvent::error(codes::orb::SYSTEM_EXCEPTION, "failed"));

        assert_eq!(memory.len(), 2);
        assert!(memory.has_code(codes::success::POA_CREATED));
        assert!(memory.has_code(codes::orb::SYSTEM_EXCEPTION));
        assert!(!service.enabled(LogLevel::Debug));
    }

    #[test]
    fn test_multi_logger_fans_out() {
        let first = Arc::new(MemoryLogger::with_capacity(4));
        let second = Arc::new(MemoryLogger::with_capacity(4));
        let multi = MultiLogger::new().with(first.clone()).with(second.clone());

        multi.log(&LogEvent::warning("careful"));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }
}
