// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Render | Envfile | Validate | Options | Configs | Version
//! ```

use std::process::ExitCode;

use taskctl_rs::cli::{self, Command};
use taskctl_rs::cmd::config::{
    build_config_loader, load_config, run_configs_command, run_options_command,
};
use taskctl_rs::cmd::envfile::{run_envfile_command, run_validate_command};
use taskctl_rs::cmd::render::run_render_command;
use taskctl_rs::config::Config;
use taskctl_rs::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            return ExitCode::SUCCESS;
        }
        Some(Command::Configs) => {
            let loader = build_config_loader(&cli.global);
            run_configs_command(&loader.format_loaded_files());
            return ExitCode::SUCCESS;
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            return ExitCode::FAILURE;
        }
        Some(_) => {}
    }

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&LogConfig::from(&config.global)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Render(args)) => run_render_command(args, config),
        Some(Command::Envfile(args)) => run_envfile_command(args, config).await,
        Some(Command::Validate) => run_validate_command(config).map(drop),
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Version | Command::Configs) | None => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
