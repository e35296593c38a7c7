// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem helpers safe under concurrent writers.
//!
//! ```text
//! write_atomic(path, bytes)
//!   ensure_dir(parent)           AlreadyExists is not an error
//!   NamedTempFile::new_in(parent)
//!   write + fsync
//!   persist(path)                atomic rename over the old file
//! ```
//!
//! Readers of `path` see either the previous complete file or the new one.

use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

use crate::error::{FsError, TaskctlResult};

/// Creates `dir` and its parents. Succeeds if another writer created it first.
///
/// # Errors
///
/// Returns [`FsError::IoError`] if the directory cannot be created or a
/// non-directory already occupies the path.
pub fn ensure_dir(dir: &Path) -> TaskctlResult<()> {
    match std::fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(FsError::io(dir, e).into()),
    }
}

/// Writes `contents` to `path` through a temporary file in the same directory
/// followed by a rename, so no partially written file is ever observable.
///
/// Missing parent directories are created. The temporary file is removed if
/// any step fails.
///
/// # Errors
///
/// Returns [`FsError::IoError`] naming the path that failed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> TaskctlResult<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_dir(parent)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| FsError::io(parent, e))?;
    trace!(tmp = %tmp.path().display(), target = %path.display(), "writing temp file");

    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| FsError::io(tmp.path(), e))?;

    tmp.persist(path).map_err(|e| FsError::io(path, e.error))?;
    Ok(())
}

/// Returns true if `path` exists. Errors while probing count as "does not exist".
#[must_use]
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().try_exists().unwrap_or(false)
}
