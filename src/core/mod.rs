// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for environment handling.
//!
//! ```text
//!    core
//!     |
//!     v
//!    env
//!     |
//!   EnvSnapshot  current_env  convert_env
//! ```

pub mod env;
