// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Render command arguments.

use clap::Args;

use super::parse_key_value;

/// Arguments for the render command.
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Template text, e.g. 'hello, {{ .Name | default "John" }}'
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Template variable, added to [variables] from the config.
    /// Can be specified multiple times.
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_value, action = clap::ArgAction::Append)]
    pub vars: Vec<(String, String)>,
}
