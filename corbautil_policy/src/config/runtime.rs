//! Preferences read at startup from a TOML file or the environment

use crate::logging::LogLevel;
use crate::poa::{DeploymentModel, VendorProfile};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in configuration file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyPreferences {
    /// Which ORB vendor's proprietary behavior PoaUtility emulates
    pub vendor_profile: VendorProfile,

    /// Deployment model used when a caller does not pick one
    pub default_deployment_model: DeploymentModel,

    /// Whether to emit a debug event for every policy the parser creates
    pub log_created_policies: bool,

    /// Whether to log the full POA path when a POA is created
    pub log_poa_creation: bool,
}

impl Default for PolicyPreferences {
    fn default() -> Self {
        Self {
            vendor_profile: from_env(env_vars::VENDOR_PROFILE, VendorProfile::Portable),
            default_deployment_model: from_env(
                env_vars::DEPLOYMENT_MODEL,
                DeploymentModel::RandomPortsNoImr,
            ),
            log_created_policies: from_env(env_vars::LOG_CREATED_POLICIES, false),
            log_poa_creation: from_env(env_vars::LOG_POA_CREATION, true),
        }
    }
}

/// Value of `var` parsed as `T`; unset or unparsable falls back to `fallback`
fn from_env<T: FromStr>(var: &str, fallback: T) -> T {
    env::var(var)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(fallback)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// One JSON object per line instead of plain text
    pub use_structured_logging: bool,

    /// When false, events are dropped
    pub enable_console_logging: bool,

    /// Minimum level that reaches the configured logger
    pub min_log_level: LogLevel,

    /// Whether console lines carry an RFC 3339 timestamp
    pub include_timestamps: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: from_env(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: from_env(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|value| parse_log_level(&value))
                .unwrap_or(LogLevel::Warning),
            include_timestamps: from_env(env_vars::LOGGING_TIMESTAMPS, false),
        }
    }
}

/// Accepts level names (any case) or their numbers 0 to 3
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub policy: PolicyPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Load preferences from a TOML file; missing keys fall back to the
    /// environment-derived defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

static POLICY_PREFERENCES: OnceLock<PolicyPreferences> = OnceLock::new();

/// Install the policy preferences for the process; may be called once
pub fn init_policy_preferences(preferences: PolicyPreferences) -> Result<(), String> {
    POLICY_PREFERENCES
        .set(preferences)
        .map_err(|_| "Policy preferences already initialized".to_string())
}

/// Installed policy preferences, or the environment-derived defaults
pub fn policy_preferences() -> PolicyPreferences {
    POLICY_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Variables consulted by the `Default` impls above
pub mod env_vars {
    pub const VENDOR_PROFILE: &str = "CORBAUTIL_VENDOR_PROFILE";
    pub const DEPLOYMENT_MODEL: &str = "CORBAUTIL_DEPLOYMENT_MODEL";
    pub const LOG_CREATED_POLICIES: &str = "CORBAUTIL_LOG_CREATED_POLICIES";
    pub const LOG_POA_CREATION: &str = "CORBAUTIL_LOG_POA_CREATION";

    pub const LOGGING_USE_STRUCTURED: &str = "CORBAUTIL_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "CORBAUTIL_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "CORBAUTIL_LOGGING_MIN_LEVEL";
    pub const LOGGING_TIMESTAMPS: &str = "CORBAUTIL_LOGGING_TIMESTAMPS";
}
