// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Envfile and validate commands.
//!
//! ```text
//! [envfile] + flags --> Envfile --> EnvfileGenerator
//!   --stdout   render to stdout
//!   otherwise  generate(current_env())
//!                Written    --> print path
//!                Scheduled  --> wait (Ctrl-C cancels) --> print path
//! ```

use std::path::PathBuf;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::envfile::EnvfileArgs;
use crate::config::Config;
use crate::core::env::current_env;
use crate::envfile::Envfile;
use crate::envfile::generator::{EnvfileGenerator, Generation};
use crate::error::Result;

/// Applies command-line flags on top of `[envfile]`.
#[must_use]
pub fn effective_envfile(args: &EnvfileArgs, config: &Config) -> Envfile {
    let mut envfile = config.envfile.clone();
    if let Some(path) = &args.path {
        envfile.path.clone_from(path);
    }
    if let Some(dir) = &args.generated_dir {
        envfile.generated_dir.clone_from(dir);
    }
    if args.quote {
        envfile.quote = true;
    }
    envfile.apply_defaults();
    envfile
}

/// Run the envfile command.
///
/// A deferred write is awaited before returning. Ctrl-C cancels it.
///
/// # Errors
///
/// Returns an error if the definition is invalid or the write fails.
pub async fn run_envfile_command(args: &EnvfileArgs, config: &Config) -> Result<()> {
    let envfile = effective_envfile(args, config);
    let generator = EnvfileGenerator::new(&envfile).context("invalid [envfile] section")?;
    let env = current_env();

    if args.stdout {
        print!("{}", generator.render(&env));
        return Ok(());
    }

    let token = CancellationToken::new();
    let generator = generator.with_cancellation(token.clone());

    let written = match generator.generate(&env).await? {
        Generation::Written(path) => Some(path),
        Generation::Scheduled(pending) => {
            info!(
                path = %pending.path().display(),
                delay_ms = envfile.delay.as_millis(),
                "envfile write scheduled"
            );
            let ctrl_c = tokio::spawn(cancel_on_ctrl_c(token.clone()));
            let written = pending.wait().await?;
            ctrl_c.abort();
            written
        }
    };

    match written {
        Some(path) => println!("{}", path.display()),
        None => warn!("envfile write cancelled"),
    }
    Ok(())
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        token.cancel();
    }
}

/// Run the validate command.
///
/// # Errors
///
/// Returns the first validation failure of `[envfile]`.
pub fn run_validate_command(config: &Config) -> Result<PathBuf> {
    config
        .envfile
        .validate()
        .context("invalid [envfile] section")?;
    let target = config.envfile.generated_dir.join(&config.envfile.path);
    println!("envfile ok: {}", target.display());
    Ok(target)
}
