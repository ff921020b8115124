//! Logging macros
//!
//! Context pairs are written `"key" => value`, where `value` is anything that
//! implements `Display`. Errors also accept a leading `span = <Span>`.

#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::error($code, $message).with_span($span),
            &[$(($key, ::std::format!("{}", $value))),*],
        )
    };
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::error($code, $message),
            &[$(($key, ::std::format!("{}", $value))),*],
        )
    };
}

/// Info-level event carrying a success code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::success($code, $message),
            &[$(($key, ::std::format!("{}", $value))),*],
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::info($message),
            &[$(($key, ::std::format!("{}", $value))),*],
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::dispatch(
            $crate::logging::LogEvent::warning($message),
            &[$(($key, ::std::format!("{}", $value))),*],
        )
    };
}

/// Context values are only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::enabled($crate::logging::LogLevel::Debug) {
            $crate::logging::dispatch(
                $crate::logging::LogEvent::debug($message),
                &[$(($key, ::std::format!("{}", $value))),*],
            )
        }
    };
}
