// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logging for the `taskctl` binary.
//!
//! ```text
//! [global] log_level / file_log_level / log_file
//!        |  LogConfig::from(&GlobalConfig)
//!        v
//! init_logging(&LogConfig)
//!    |                             |
//!    v                             v
//! stderr, human-readable        log_file, JSON lines (optional)
//! RUST_LOG overrides level      appended, non_blocking
//!    |                             |
//!    '-------------+---------------'
//!                  v
//!          LogGuard (flush on drop)
//!
//! LogLevel:  0=OFF  1=ERROR  2=WARN  3=INFO  4=DEBUG  5=TRACE
//! ```
//!
//! stdout is never written to, so `render` and `envfile --stdout` output
//! can be piped safely at any level.

use std::path::{Path, PathBuf};

use anyhow::Context;
use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::GlobalConfig;
use crate::error::{ConfigError, Result};

/// Verbosity from 0 (off) to 5 (trace). Stored in config as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LogLevel(u8);

impl Default for LogLevel {
    fn default() -> Self {
        Self::WARN
    }
}

impl LogLevel {
    pub const SILENT: Self = Self(0);
    pub const ERROR: Self = Self(1);
    pub const WARN: Self = Self(2);
    pub const INFO: Self = Self(3);
    pub const DEBUG: Self = Self(4);
    pub const TRACE: Self = Self(5);

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for levels above 5.
    pub fn new(level: u8) -> std::result::Result<Self, ConfigError> {
        Self::from_u8(level).ok_or_else(|| ConfigError::InvalidValue {
            section: "global".to_string(),
            key: "log_level".to_string(),
            message: format!("log level must be 0-5, got {level}"),
        })
    }

    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn from_u8(level: u8) -> Option<Self> {
        if level <= 5 { Some(Self(level)) } else { None }
    }

    #[must_use]
    pub const fn to_level_filter(self) -> LevelFilter {
        match self.0 {
            0 => LevelFilter::OFF,
            1 => LevelFilter::ERROR,
            2 => LevelFilter::WARN,
            3 => LevelFilter::INFO,
            4 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        level.to_level_filter()
    }
}

/// Where log events go and how verbose each sink is.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct LogConfig {
    #[builder(default = LogLevel::WARN)]
    pub console_level: LogLevel,
    #[builder(default = LogLevel::DEBUG)]
    pub file_level: LogLevel,
    #[builder(into)]
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&GlobalConfig> for LogConfig {
    fn from(global: &GlobalConfig) -> Self {
        Self::builder()
            .console_level(global.log_level)
            .file_level(global.file_log_level)
            .maybe_log_file(global.log_file.clone())
            .build()
    }
}

impl LogConfig {
    /// Console filter: `RUST_LOG` directives if set, else `console_level`.
    fn console_filter(&self) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(self.console_level.to_level_filter().into())
            .from_env_lossy()
    }
}

/// Keeps the non-blocking file writer alive. Dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Fails if the log file's directory cannot be created, the file name is
/// missing, or a subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use taskctl_rs::logging::{LogConfig, LogLevel, init_logging};
///
/// let config = LogConfig::builder()
///     .console_level(LogLevel::INFO)
///     .log_file("logs/taskctl.jsonl")
///     .build();
/// let _guard = init_logging(&config).expect("logging");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(config.console_filter());

    let (file_layer, file_guard) = match config.log_file.as_deref() {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(config.file_level.to_level_filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

/// Opens `path` for appending. Missing directories are created.
fn open_log_file(path: &Path) -> Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("log file {} has no usable file name", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
