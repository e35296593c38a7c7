// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE     ← Additional config files (can repeat)
//! --log-level N     ← Console verbosity (0-5)
//! --file-log-level  ← File verbosity (falls back to --log-level)
//! --log-file FILE   ← Also log to FILE
//! --set KEY=VAL     ← Direct config override, e.g. envfile.quote=true
//!
//! Precedence: CLI flags > --set > TASKCTL_* > --config > taskctl.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use super::parse_key_value;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Sets an option, such as 'envfile.path=stage.env'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value, action = clap::ArgAction::Append)]
    pub options: Vec<(String, String)>,

    /// Disables loading `taskctl.toml` from the current directory.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides, in the order
    /// they are applied.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(String, String)> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(("global.log_level".into(), level.to_string()));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("global.file_log_level".into(), level.to_string()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(("global.log_file".into(), path.display().to_string()));
        }

        overrides
    }
}
