// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Envfile command arguments.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the envfile command. Flags override `[envfile]` keys.
#[derive(Debug, Clone, Default, Args)]
pub struct EnvfileArgs {
    /// Output file, relative to the generated directory.
    #[arg(long, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Directory the envfile is written under.
    #[arg(long = "generated-dir", value_name = "DIR")]
    pub generated_dir: Option<PathBuf>,

    /// Wrap values in double quotes.
    #[arg(long)]
    pub quote: bool,

    /// Print the envfile to stdout instead of writing it.
    #[arg(long = "stdout")]
    pub stdout: bool,
}
