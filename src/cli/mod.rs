// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for taskctl-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! taskctl [global options] <command>
//! render <TEMPLATE> [--var KEY=VALUE]...
//! envfile [--path P] [--generated-dir D] [--quote]
//! validate
//! options
//! configs
//! version
//! ```

pub mod envfile;
pub mod global;
pub mod render;

#[cfg(test)]
mod tests;

use crate::cli::envfile::EnvfileArgs;
use crate::cli::global::GlobalOptions;
use crate::cli::render::RenderArgs;
use clap::{Parser, Subcommand};

/// Template rendering and envfile generation for taskctl
#[derive(Debug, Parser)]
#[command(
    name = "taskctl",
    author,
    version,
    about = "Template rendering and envfile generation for taskctl",
    long_about = "taskctl-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Renders {{ .Var }} templates and writes filtered environment\n\
                  files for task runs. See `taskctl <command> --help` for more\n\
                  information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  taskctl reads `taskctl.toml` from the current directory if it\n\
                  exists, then every file given with --config, in order. Later\n\
                  files override earlier ones. TASKCTL_<SECTION>__<KEY> environment\n\
                  variables and --set options are applied last."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in use.
    Configs,

    /// Renders a template string.
    Render(RenderArgs),

    /// Writes the envfile described by the [envfile] section.
    Envfile(EnvfileArgs),

    /// Checks the [envfile] section without writing anything.
    Validate,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses a `KEY=VALUE` argument. The value may itself contain `=`.
///
/// # Errors
///
/// Returns a message if there is no `=` or the key is empty.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        Some(_) => Err(format!("empty key in '{s}'")),
        None => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
