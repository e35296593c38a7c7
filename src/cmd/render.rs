// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Render command.

use anyhow::Context;
use serde_json::Value;
use tracing::debug;

use crate::cli::render::RenderArgs;
use crate::config::Config;
use crate::error::Result;
use crate::template::render_string;

/// Renders `args.template` against `[variables]` plus `--var` values.
///
/// # Errors
///
/// Returns the template error if parsing or rendering fails.
pub fn render_command_output(args: &RenderArgs, config: &Config) -> Result<String> {
    let mut variables = config.template_variables();
    for (key, value) in &args.vars {
        variables.insert(key.clone(), Value::String(value.clone()));
    }
    debug!(variables = variables.len(), "rendering template");

    render_string(&args.template, &variables).context("failed to render template")
}

/// Run the render command.
///
/// # Errors
///
/// See [`render_command_output`].
pub fn run_render_command(args: &RenderArgs, config: &Config) -> Result<()> {
    println!("{}", render_command_output(args, config)?);
    Ok(())
}
