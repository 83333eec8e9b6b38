//! Settings of the `specred` command-line front end, loaded using Figment.
//!
//! Settings are merged from, in increasing priority:
//! 1. built-in defaults,
//! 2. an optional TOML file (`specred.toml` unless another path is given),
//! 3. environment variables prefixed with `SPECRED_`.
//!
//! # Example
//! ```no_run
//! use specred::settings::AppSettings;
//!
//! let settings = AppSettings::load()?;
//! println!("file check: {}", settings.file_check);
//! # Ok::<(), figment::Error>(())
//! ```

use crate::logging::OutputFormat;
use crate::reduction_file::{ParseOptions, SetupPolicy};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default settings file, looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "specred.toml";

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format
    #[serde(default)]
    pub log_format: OutputFormat,
    /// Require data files to exist when parsing reduction files
    #[serde(default = "default_file_check")]
    pub file_check: bool,
    /// How many setups a setup block may define
    #[serde(default)]
    pub setup_policy: SetupPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_file_check() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: OutputFormat::default(),
            file_check: default_file_check(),
            setup_policy: SetupPolicy::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from `specred.toml` and environment variables.
    ///
    /// Environment variables override the file, e.g. `SPECRED_LOG_LEVEL=debug`.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(DEFAULT_SETTINGS_FILE)
    }

    /// Load settings from a specific file path. A missing file leaves the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(AppSettings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("SPECRED_"))
            .extract()
    }

    /// Validate settings after loading
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }

    /// Parse options implied by these settings.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_file_check(self.file_check)
            .with_setup_policy(self.setup_policy)
    }
}
