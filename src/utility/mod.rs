// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   ensure_dir()     idempotent create_dir_all
//!   write_atomic()   temp file in target dir + rename
//!   file_exists()
//! os
//!   getwd() / must_getwd()
//!   user_home_dir() / must_get_user_home_dir()
//!   is_url()         http/https only
//! text
//!   last_line()      last non-blank line of a reader
//!   map_keys()       keys of a JSON object, empty otherwise
//! ```

pub mod fs;
pub mod os;
pub mod text;
