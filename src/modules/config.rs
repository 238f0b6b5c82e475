use std::path::PathBuf;

use crate::{DEFAULT_FROM_ADDRESS, DEFAULT_SITE_NAME, OPTIONS_FILE};

/// Runtime configuration picked up from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// JSON file holding the persisted settings and log entries
    pub options_file: PathBuf,
    /// Display name used as the default sender name
    pub site_name: String,
    /// Sender used when no from address is configured
    pub default_from: String,
    /// Operator log destination; stderr when unset
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            options_file: PathBuf::from(OPTIONS_FILE),
            site_name: DEFAULT_SITE_NAME.to_string(),
            default_from: DEFAULT_FROM_ADDRESS.to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Read `SMTP_MAILER_*` variables from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any variable source; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            options_file: get("SMTP_MAILER_OPTIONS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.options_file),
            site_name: get("SMTP_MAILER_SITE_NAME").unwrap_or(defaults.site_name),
            default_from: get("SMTP_MAILER_DEFAULT_FROM").unwrap_or(defaults.default_from),
            log_file: get("SMTP_MAILER_LOG_FILE").map(PathBuf::from),
        }
    }
}
