// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Envfile rendering and writing.
//!
//! ```text
//! EnvfileGenerator::new(&Envfile)     validate + compile once
//!        |
//!        v
//! generate(&EnvSnapshot)
//!        |-- delay == 0 --> write now          --> Generation::Written(path)
//!        '-- delay  > 0 --> tokio task:
//!               select! { cancelled => skip, sleep(delay) => write }
//!                                              --> Generation::Scheduled(PendingWrite)
//! ```
//!
//! The scheduled task holds a child of the generator's cancellation token, so
//! cancelling the generator or a single [`PendingWrite`] drops the write, and
//! so does dropping the [`PendingWrite`]. If the runtime shuts down first the
//! write never happens.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, trace};

use super::filter::is_selected;
use super::{Compiled, Envfile};
use crate::core::env::convert_env;
use crate::core::env::snapshot::EnvSnapshot;
use crate::error::{ConfigError, TaskctlError, TaskctlResult, ValidationError};
use crate::template::quote;
use crate::utility::fs::write_atomic;

/// Outcome of [`EnvfileGenerator::generate`].
#[derive(Debug)]
pub enum Generation {
    /// The file was written before `generate` returned.
    Written(PathBuf),
    /// The write runs after the configured delay unless cancelled.
    Scheduled(PendingWrite),
}

/// Produces envfiles for one validated [`Envfile`] definition.
#[derive(Debug, Clone)]
pub struct EnvfileGenerator {
    output: PathBuf,
    compiled: Compiled,
    quote: bool,
    delay: Duration,
    token: CancellationToken,
}

impl EnvfileGenerator {
    /// Validates `envfile` and compiles its patterns.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] of [`Envfile::validate`].
    pub fn new(envfile: &Envfile) -> Result<Self, ValidationError> {
        let compiled = envfile.compile()?;
        let mut envfile = envfile.clone();
        envfile.apply_defaults();
        Ok(Self {
            output: envfile.generated_dir.join(&envfile.path),
            compiled,
            quote: envfile.quote,
            delay: envfile.delay,
            token: CancellationToken::new(),
        })
    }

    /// Ties scheduled writes to `token`. Cancelling it cancels every write
    /// this generator has scheduled and not yet performed.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Full path of the generated file.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Serializes the selected, transformed variables of `env`.
    ///
    /// One `NAME=VALUE` line per variable, in snapshot order, each terminated
    /// by `\n`. Line breaks inside a value are written as the two-character
    /// sequences `\n` and `\r`, so a value can never start a new assignment.
    /// An empty selection yields an empty string.
    #[must_use]
    pub fn render(&self, env: &EnvSnapshot) -> String {
        let Compiled {
            include,
            exclude,
            rules,
        } = &self.compiled;

        let mut modified = 0usize;
        let selected: Vec<(&str, String)> = env
            .iter()
            .filter(|(name, _)| is_selected(include, exclude, name))
            .map(|(name, value)| {
                trace!(name, "variable selected");
                let mut value = Cow::Borrowed(value);
                for rule in rules.iter().filter(|r| r.pattern.is_match(name)) {
                    trace!(name, operation = %rule.operation, "modify rule applied");
                    value = Cow::Owned(rule.operation.apply(&value));
                    modified += 1;
                }
                let value = if self.quote {
                    Cow::Owned(quote(&value))
                } else {
                    value
                };
                (name, escape_line_breaks(&value).into_owned())
            })
            .collect();

        debug!(
            total = env.len(),
            selected = selected.len(),
            modified,
            "envfile variables filtered"
        );

        convert_env(selected.iter().map(|(k, v)| (*k, v.as_str())))
            .into_iter()
            .fold(String::new(), |mut out, line| {
                out.push_str(&line);
                out.push('\n');
                out
            })
    }

    /// Renders `env` and writes it, now or after the configured delay.
    ///
    /// The content is rendered from `env` before this returns; later changes
    /// to the process environment do not affect a scheduled write.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if the output path is unset and
    /// [`crate::error::FsError`] if an immediate write fails.
    pub async fn generate(&self, env: &EnvSnapshot) -> TaskctlResult<Generation> {
        if self.output.file_name().is_none() {
            return Err(ConfigError::MissingKey {
                section: "envfile".to_string(),
                key: "path".to_string(),
            }
            .into());
        }

        let content = self.render(env);
        debug!(
            path = %self.output.display(),
            bytes = content.len(),
            delay_ms = self.delay.as_millis(),
            "envfile rendered"
        );

        if self.delay.is_zero() {
            write_envfile(self.output.clone(), content).await?;
            return Ok(Generation::Written(self.output.clone()));
        }

        Ok(Generation::Scheduled(PendingWrite::schedule(
            self.output.clone(),
            content,
            self.delay,
            self.token.child_token(),
        )))
    }
}

/// Handle to a delayed envfile write.
///
/// Dropping the handle cancels the write if it has not started, so a write
/// never outlives the task that scheduled it. Use [`PendingWrite::wait`] to
/// let it run.
#[derive(Debug)]
pub struct PendingWrite {
    path: PathBuf,
    token: CancellationToken,
    guard: DropGuard,
    handle: JoinHandle<TaskctlResult<bool>>,
}

impl PendingWrite {
    fn schedule(path: PathBuf, content: String, delay: Duration, token: CancellationToken) -> Self {
        let target = path.clone();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = task_token.cancelled() => {
                    debug!(path = %target.display(), "envfile write cancelled");
                    Ok(false)
                }
                () = tokio::time::sleep(delay) => {
                    write_envfile(target, content).await.map(|()| true)
                }
            }
        });
        Self {
            path,
            guard: token.clone().drop_guard(),
            token,
            handle,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cancels the write if it has not started yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the scheduled write.
    ///
    /// Returns the written path, or `None` if the write was cancelled.
    /// Dropping the returned future before it completes cancels the write.
    ///
    /// # Errors
    ///
    /// Returns the write error, or [`TaskctlError::Other`] if the task panicked.
    pub async fn wait(self) -> TaskctlResult<Option<PathBuf>> {
        let Self {
            path,
            guard,
            handle,
            ..
        } = self;
        let written = handle
            .await
            .map_err(|e| TaskctlError::other(format!("envfile write task failed: {e}")));
        guard.disarm();
        Ok(written??.then_some(path))
    }
}

/// Writes `\n` and `\r` inside a value as escape sequences.
fn escape_line_breaks(value: &str) -> Cow<'_, str> {
    if !value.contains(['\n', '\r']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace('\n', "\\n").replace('\r', "\\r"))
}

async fn write_envfile(path: PathBuf, content: String) -> TaskctlResult<()> {
    let target = path.clone();
    tokio::task::spawn_blocking(move || write_atomic(&target, content.as_bytes()))
        .await
        .map_err(|e| TaskctlError::other(format!("envfile write task failed: {e}")))??;
    info!(path = %path.display(), "envfile written");
    Ok(())
}
