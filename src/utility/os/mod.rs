// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process and platform probes.
//!
//! The `must_*` variants are for process bootstrap only, where an
//! unresolvable working or home directory leaves nothing sensible to do.

use std::path::PathBuf;

use url::Url;

use crate::error::{FsError, TaskctlResult};

/// Returns the current working directory.
///
/// # Errors
///
/// Returns [`FsError::IoError`] if the directory was removed or is not accessible.
pub fn getwd() -> TaskctlResult<PathBuf> {
    std::env::current_dir().map_err(|e| FsError::io(std::path::Path::new("."), e).into())
}

/// Returns the current working directory.
///
/// # Panics
///
/// Panics if the working directory cannot be resolved.
#[must_use]
pub fn must_getwd() -> PathBuf {
    getwd().unwrap_or_else(|e| panic!("cannot resolve working directory: {e}"))
}

/// Returns the current user's home directory (`$HOME` on Unix).
///
/// # Errors
///
/// Returns [`FsError::NotFound`] if no home directory can be determined.
pub fn user_home_dir() -> TaskctlResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| FsError::NotFound("user home directory".to_string()).into())
}

/// Returns the current user's home directory.
///
/// # Panics
///
/// Panics if the home directory cannot be resolved.
#[must_use]
pub fn must_get_user_home_dir() -> PathBuf {
    user_home_dir().unwrap_or_else(|e| panic!("cannot resolve home directory: {e}"))
}

/// Returns true if `s` is an absolute `http` or `https` URL with a host.
///
/// Drive-letter paths such as `C:\Windows` parse as a one-letter scheme and
/// `mailto:` has no host, so both are rejected.
#[must_use]
pub fn is_url(s: &str) -> bool {
    Url::parse(s).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
}
