//! Build-profile limits and runtime preferences
//!
//! `compile_time` is generated by `build.rs` from `config/<profile>.toml`;
//! `runtime` holds what a deployment may change without rebuilding.

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{ConfigError, LoggingPreferences, PolicyPreferences, RuntimeConfig};

/// Which profile produced `compile_time`
pub mod build_info {
    pub fn profile() -> &'static str {
        option_env!("CORBAUTIL_BUILD_PROFILE").unwrap_or("development")
    }

    pub fn config_dir() -> &'static str {
        option_env!("CORBAUTIL_CONFIG_DIR").unwrap_or("config")
    }

    /// e.g. `config/development.toml`
    pub fn source_info() -> String {
        format!("{}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(compile_time::lexical::MAX_IDENTIFIER_LENGTH > 0);
        assert!(
            compile_time::lexical::MAX_IDENTIFIER_LENGTH
                <= compile_time::lexical::MAX_POLICY_LIST_LENGTH
        );
        assert!(compile_time::syntax::MAX_POLICIES_PER_LIST > 0);
        assert!(compile_time::syntax::MAX_PARAMETERS_PER_POLICY > 0);
        assert!(compile_time::logging::SECURITY_MIN_LOG_LEVEL <= 2);
    }

    #[test]
    fn test_generated_log_buffer_size_is_accepted_at_runtime() {
        assert!((100..=100_000).contains(&compile_time::logging::LOG_BUFFER_SIZE));
        assert!(crate::logging::config::validate_config().is_ok());
    }

    #[test]
    fn test_build_info() {
        assert!(build_info::source_info().ends_with(".toml"));
        assert!(!build_info::profile().is_empty());
    }
}
