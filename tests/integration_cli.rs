// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use clap::Parser;
use std::path::PathBuf;
use taskctl_rs::cli::{Cli, Command};

// =============================================================================
// Version Command
// =============================================================================

#[test]
fn cli_version_command() {
    let cli = Cli::try_parse_from(["taskctl", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["taskctl", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

// =============================================================================
// Render Command
// =============================================================================

#[test]
fn cli_render_requires_template() {
    assert!(Cli::try_parse_from(["taskctl", "render"]).is_err());
}

#[test]
fn cli_render_rejects_bad_var() {
    let result = Cli::try_parse_from(["taskctl", "render", "x", "--var", "novalue"]);
    assert!(result.is_err());
}

#[test]
fn cli_render_with_global_options_after_subcommand_rejected() {
    // Global options belong before the subcommand
    let result = Cli::try_parse_from(["taskctl", "render", "x", "-l", "3"]);
    assert!(result.is_err());
}

// =============================================================================
// Envfile / Validate Commands
// =============================================================================

#[test]
fn cli_envfile_defaults() {
    let cli = Cli::try_parse_from(["taskctl", "envfile"]).unwrap();
    let Some(Command::Envfile(args)) = cli.command else {
        panic!("expected envfile");
    };
    assert_eq!(args.path, None);
    assert_eq!(args.generated_dir, None);
    assert!(!args.quote);
    assert!(!args.stdout);
}

#[test]
fn cli_envfile_stdout() {
    let cli = Cli::try_parse_from(["taskctl", "envfile", "--stdout", "--path", "x.env"]).unwrap();
    let Some(Command::Envfile(args)) = cli.command else {
        panic!("expected envfile");
    };
    assert!(args.stdout);
    assert_eq!(args.path, Some(PathBuf::from("x.env")));
}

#[test]
fn cli_validate_with_configs() {
    let cli = Cli::try_parse_from([
        "taskctl",
        "--no-default-config",
        "-c",
        "ci.toml",
        "validate",
    ])
    .unwrap();
    assert!(matches!(cli.command, Some(Command::Validate)));
    assert!(cli.global.no_default_config);
    assert_eq!(cli.global.configs, vec![PathBuf::from("ci.toml")]);
}

// =============================================================================
// Global Options
// =============================================================================

#[test]
fn cli_file_log_level_overrides_log_level() {
    let cli = Cli::try_parse_from([
        "taskctl",
        "-l",
        "1",
        "--file-log-level",
        "5",
        "options",
    ])
    .unwrap();
    let overrides = cli.global.to_config_overrides();
    assert!(overrides.contains(&("global.log_level".to_string(), "1".to_string())));
    assert!(overrides.contains(&("global.file_log_level".to_string(), "5".to_string())));
}

#[test]
fn cli_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["taskctl", "deploy"]).is_err());
}
