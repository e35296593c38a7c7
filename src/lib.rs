// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |         render / envfile / validate
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              | TOML, TASKCTL_*, --set    |
//!              '-----+---------------+-----'
//!                    |               |
//!                    v               v
//!                template         envfile
//!             {{ .A | f }}    filter, modify, quote
//!                                    |
//!                          deferred atomic write
//!
//!   +-----------------------------------------+
//!   |  core   env snapshot                    |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod envfile;
pub mod error;
pub mod logging;
pub mod template;
pub mod utility;
