// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for taskctl-rs.
//!
//! ```text
//! [global]     GlobalConfig  logging
//! [envfile]    Envfile       see crate::envfile
//! [variables]  free-form     template variables
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// `[global]` options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stderr output (0-5).
    pub log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Log file. No file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::WARN,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}
