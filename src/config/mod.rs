// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for taskctl-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. taskctl.toml (cwd, optional)
//! 3. --config files
//! 4. TASKCTL_* env vars
//! 5. CLI overrides (--set)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! TASKCTL_GLOBAL__LOG_LEVEL=4           → global.log_level = 4
//! TASKCTL_ENVFILE__PATH=stage.env       → envfile.path = "stage.env"
//! TASKCTL_ENVFILE__INCLUDE=HOME,PATH    → envfile.include = ["HOME", "PATH"]
//! ```
//!
//! # Example
//!
//! ```toml
//! [global]
//! log_level = 3
//!
//! [envfile]
//! path = "stage.env"
//! quote = true
//!
//! [variables]
//! name = "world"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::envfile::Envfile;
use crate::error::Result;

pub use loader::ConfigLoader;
pub use types::GlobalConfig;

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "taskctl.toml";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "TASKCTL";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Envfile definition.
    pub envfile: Envfile,
    /// Template variables.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, Value>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use taskctl_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("ci/taskctl.toml")
    ///     .add_toml_file_optional("taskctl.toml")
    ///     .with_env_prefix("TASKCTL")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Template variables as a JSON object.
    #[must_use]
    pub fn template_variables(&self) -> Map<String, Value> {
        self.variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Format configuration options for display, one `key = value` per line,
    /// sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert("global.log_level".into(), self.global.log_level.as_u8().to_string());
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &self.global.log_file {
            options.insert("global.log_file".into(), log_file.display().to_string());
        }

        let envfile = &self.envfile;
        options.insert(
            "envfile.generated_dir".into(),
            envfile.generated_dir.display().to_string(),
        );
        options.insert("envfile.path".into(), envfile.path.display().to_string());
        options.insert("envfile.include".into(), envfile.include.join(","));
        options.insert("envfile.exclude".into(), envfile.exclude.join(","));
        for (i, rule) in envfile.modify.iter().enumerate() {
            options.insert(
                format!("envfile.modify.{i}"),
                format!("{} -> {}", rule.pattern, rule.operation),
            );
        }
        options.insert("envfile.quote".into(), envfile.quote.to_string());
        options.insert("envfile.delay".into(), format!("{}ms", envfile.delay.as_millis()));

        for (name, value) in &self.variables {
            options.insert(format!("variables.{name}"), value.to_string());
        }

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
