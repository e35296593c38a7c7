// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Immutable environment snapshot.
//!
//! # Architecture
//!
//! ```text
//! EnvSnapshot
//! data: Arc<[(String, String)]>   ordered, never mutated
//! clone shares the Arc
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

/// An ordered, immutable sequence of `(name, value)` pairs.
///
/// Captured once and then only read, so a generation pass sees a consistent
/// view even if the live process environment changes concurrently.
///
/// # Thread Safety
/// `EnvSnapshot` is `Send` and `Sync` due to its use of `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: Arc<[(String, String)]>,
}

impl EnvSnapshot {
    /// Creates a snapshot preserving the order of `pairs`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Creates a snapshot from a map, ordered by name.
    #[must_use]
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self::from_pairs(vars)
    }

    /// Gets the value of the first variable called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns an iterator over variables in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns all variables as a map. Later duplicates win.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.vars.iter().cloned().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
