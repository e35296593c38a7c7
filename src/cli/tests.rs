// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::{Cli, Command, parse_key_value};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["taskctl", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_no_command() {
    let cli = Cli::try_parse_from(["taskctl"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "taskctl",
        "-l",
        "4",
        "-c",
        "a.toml",
        "--config",
        "b.toml",
        "-s",
        "envfile.quote=true",
        "--log-file",
        "run.log",
        "validate",
    ])
    .unwrap();
    assert!(matches!(cli.command, Some(Command::Validate)));
    assert_eq!(cli.global.log_level, Some(4));
    assert_eq!(
        cli.global.configs,
        vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );

    let overrides = cli.global.to_config_overrides();
    assert_eq!(
        overrides,
        vec![
            ("envfile.quote".to_string(), "true".to_string()),
            ("global.log_level".to_string(), "4".to_string()),
            ("global.file_log_level".to_string(), "4".to_string()),
            ("global.log_file".to_string(), "run.log".to_string()),
        ]
    );
}

#[test]
fn test_parse_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["taskctl", "-l", "6", "version"]).is_err());
}

#[test]
fn test_parse_render() {
    let cli = Cli::try_parse_from([
        "taskctl",
        "render",
        "hello, {{ .Name }}",
        "--var",
        "Name=world",
        "--var",
        "Expr=a=b",
    ])
    .unwrap();
    let Some(Command::Render(args)) = cli.command else {
        panic!("expected render");
    };
    assert_eq!(args.template, "hello, {{ .Name }}");
    assert_eq!(
        args.vars,
        vec![
            ("Name".to_string(), "world".to_string()),
            ("Expr".to_string(), "a=b".to_string()),
        ]
    );
}

#[test]
fn test_parse_envfile() {
    let cli = Cli::try_parse_from([
        "taskctl",
        "envfile",
        "--path",
        "stage.env",
        "--generated-dir",
        "out",
        "--quote",
    ])
    .unwrap();
    let Some(Command::Envfile(args)) = cli.command else {
        panic!("expected envfile");
    };
    assert_eq!(args.path, Some(PathBuf::from("stage.env")));
    assert_eq!(args.generated_dir, Some(PathBuf::from("out")));
    assert!(args.quote);
    assert!(!args.stdout);
}

#[test]
fn test_parse_key_value() {
    assert_eq!(
        parse_key_value("a=1").unwrap(),
        ("a".to_string(), "1".to_string())
    );
    assert_eq!(
        parse_key_value("a=").unwrap(),
        ("a".to_string(), String::new())
    );
    insta::assert_snapshot!(parse_key_value("novalue").unwrap_err(), @"expected KEY=VALUE, got 'novalue'");
    insta::assert_snapshot!(parse_key_value("=1").unwrap_err(), @"empty key in '=1'");
}

#[test]
fn test_cli_debug_assert() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
