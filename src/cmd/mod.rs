// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options, configs), envfile (envfile, validate), render
//! ```

pub mod config;
pub mod envfile;
pub mod render;
