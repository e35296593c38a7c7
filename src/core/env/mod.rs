// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment variable capture and conversion.
//!
//! # Architecture
//!
//! ```text
//! current_env()  std::env::vars_os() --> EnvSnapshot (sorted by name)
//! convert_env()  map --> ["NAME=VALUE", ...]
//! ```
//!
//! - **Snapshot once**: a generation pass never re-reads the live environment
//! - **Lossy**: non UTF-8 names or values are converted lossily

pub mod snapshot;


use std::collections::BTreeMap;

use snapshot::EnvSnapshot;

/// Captures the current process environment, ordered by name.
#[must_use]
pub fn current_env() -> EnvSnapshot {
    let vars: BTreeMap<String, String> = std::env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect();
    EnvSnapshot::from_map(vars)
}

/// Converts a name to value mapping into `NAME=VALUE` strings, one per entry,
/// in the mapping's iteration order.
pub fn convert_env<'a, I>(env: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    env.into_iter().map(|(k, v)| format!("{k}={v}")).collect()
}
