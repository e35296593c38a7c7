// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for taskctl-rs.

use crate::cli::global::GlobalOptions;
use crate::config::{Config, ConfigLoader, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::error::Result;

/// Display current configuration options.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded configuration files.
pub fn run_configs_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}

/// Assembles the loader for the global options, without overrides.
#[must_use]
pub fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

/// Loads the configuration with `--set` and logging flags applied on top.
///
/// # Errors
///
/// Returns an error if a config file is missing or invalid, or an override
/// does not fit the configuration structure.
pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    let mut loader = build_config_loader(global);
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(&key, value)?;
    }
    loader.build()
}
