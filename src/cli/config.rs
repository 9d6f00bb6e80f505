//! Configuration file
//!
//! JSON object; every key is optional:
//! - `schema_dir`: directory of extra `*.json` descriptors loaded on top of
//!   the built-in types
//! - `reject_undeclared_fields`: report keys the schema does not declare
//!   (default true)
//! - `log_level`: trace, info, warn or error (default info)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::observability::Severity;
use crate::schema::ValidationOptions;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Extra descriptor directory (optional)
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,

    /// Report undeclared document keys (optional, default true)
    #[serde(default = "default_reject_undeclared")]
    pub reject_undeclared_fields: bool,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_reject_undeclared() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_dir: None,
            reject_undeclared_fields: default_reject_undeclared(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> CliResult<()> {
        self.log_severity()?;

        if let Some(dir) = &self.schema_dir {
            if !dir.is_dir() {
                return Err(CliError::config_error(format!(
                    "schema_dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(CliError::config_error)
    }

    /// Validator options derived from this configuration
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            reject_undeclared_fields: self.reject_undeclared_fields,
        }
    }
}
