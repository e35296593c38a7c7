// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            TaskctlError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+------+
//!   |      |      |       |      |      |
//!   v      v      v       v      v      v
//!  Cfg  Valid  Template   Fs   Proc   Other
//!  Box   Box     Box     Box   Box   Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Config      MissingKey, InvalidValue
//!   Validation  MissingPath, PathOutsideGeneratedDir, EmptyPattern,
//!               InvalidPattern, UnknownOperation, InvalidFilter
//!   Template    Parse, MissingKey, Function
//!   Fs          NotFound, IoError
//!   Process     NonZeroExit
//! ```
//!
//! Exit-status failures are carried by [`ProcessError::NonZeroExit`] and
//! classified by walking the `source()` chain with downcasts, see
//! [`is_exit_error`].

use std::error::Error as StdError;
use std::process::ExitStatus;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`TaskctlError`].
pub type TaskctlResult<T> = std::result::Result<T, TaskctlError>;

/// Top-level library error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum TaskctlError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Envfile definition failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] Box<ValidationError>),

    /// Template parsing or rendering failed.
    #[error("template error: {0}")]
    Template(#[from] Box<TemplateError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl TaskctlError {
    /// Creates a [`TaskctlError::Other`] from a message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into().into_boxed_str())
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for TaskctlError {
                fn from(err: $error) -> Self {
                    TaskctlError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ValidationError => Validation,
    TemplateError => Template,
    FsError => Fs,
    ProcessError => Process,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Validation Errors ---

/// Structural problems in an envfile definition.
///
/// Reported in check order: path, modify patterns, modify operations, filters.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// `path` is empty.
    #[error("envfile path is not set")]
    MissingPath,

    /// `path` is absolute or has a `..` component.
    #[error("envfile path '{path}' must be relative and stay inside the generated directory")]
    PathOutsideGeneratedDir { path: String },

    /// A modify rule has an empty pattern.
    #[error("modify rule #{index} has an empty pattern")]
    EmptyPattern { index: usize },

    /// A modify rule pattern is not a valid regular expression.
    #[error("modify rule #{index} pattern '{pattern}' is invalid: {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A modify rule names an operation that does not exist.
    #[error("modify rule #{index} has unknown operation '{operation}' (expected one of: {expected})")]
    UnknownOperation {
        index: usize,
        operation: String,
        expected: &'static str,
    },

    /// An include or exclude entry is not a valid regular expression.
    #[error("{list} pattern '{pattern}' is invalid: {source}")]
    InvalidFilter {
        list: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// --- Template Errors ---

/// Template parsing and rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template is syntactically malformed.
    #[error("parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// A field reference names a key that is not present.
    #[error("map has no entry for key \"{key}\"")]
    MissingKey { key: String },

    /// A helper function was called with unusable arguments.
    #[error("error calling {name}: {message}")]
    Function { name: String, message: String },
}

impl TemplateError {
    /// Returns true for [`TemplateError::Parse`].
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns true for [`TemplateError::MissingKey`].
    #[must_use]
    pub const fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey { .. })
    }
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Process exited with non-zero status. `code` is `None` when the
    /// process was terminated by a signal.
    #[error("process '{command}' exited with {}", fmt_exit_code(.code))]
    NonZeroExit { command: String, code: Option<i32> },
}

#[allow(clippy::ref_option)]
fn fmt_exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| format!("code {c}"))
}

impl ProcessError {
    /// Wraps an unsuccessful [`ExitStatus`] into [`ProcessError::NonZeroExit`].
    ///
    /// Returns `None` for a successful status.
    #[must_use]
    pub fn from_status(command: impl Into<String>, status: ExitStatus) -> Option<Self> {
        if status.success() {
            None
        } else {
            Some(Self::NonZeroExit {
                command: command.into(),
                code: status.code(),
            })
        }
    }

    /// Exit code carried by a [`ProcessError::NonZeroExit`].
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        let Self::NonZeroExit { code, .. } = self;
        *code
    }
}

/// Returns true if `err` or any error in its `source()` chain is an exit-status failure.
#[must_use]
pub fn is_exit_error(err: &(dyn StdError + 'static)) -> bool {
    std::iter::successors(Some(err), |&e| e.source()).any(is_exit_status)
}

/// [`is_exit_error`] for `anyhow` chains, which also see through `.context(..)` layers.
#[must_use]
pub fn is_exit_anyhow(err: &anyhow::Error) -> bool {
    err.chain().any(is_exit_status)
}

fn is_exit_status(err: &(dyn StdError + 'static)) -> bool {
    if let Some(process) = err.downcast_ref::<ProcessError>() {
        return matches!(process, ProcessError::NonZeroExit { .. });
    }
    if let Some(TaskctlError::Process(process)) = err.downcast_ref::<TaskctlError>() {
        return matches!(**process, ProcessError::NonZeroExit { .. });
    }
    false
}
