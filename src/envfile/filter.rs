// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Variable name patterns for include/exclude lists.
//!
//! ```text
//! "HOME"        exact name
//! "TF_VAR_.*"   regex, anchored: ^(?:TF_VAR_.*)$
//! ```

use regex::Regex;

/// One include/exclude entry.
#[derive(Debug, Clone)]
pub enum NamePattern {
    /// Entry made only of `[A-Za-z0-9_]`, compared literally.
    Exact(String),
    /// Any other entry, matched against the whole name.
    Regex(Regex),
}

impl NamePattern {
    /// Compiles one list entry.
    ///
    /// # Errors
    ///
    /// Returns the regex error for entries that are neither a plain name nor
    /// a valid regular expression.
    pub fn new(entry: &str) -> Result<Self, regex::Error> {
        if entry.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Ok(Self::Exact(entry.to_string()));
        }
        Regex::new(&format!("^(?:{entry})$")).map(Self::Regex)
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == name,
            Self::Regex(re) => re.is_match(name),
        }
    }
}

/// Include/exclude decision for one variable name.
///
/// An empty include list keeps everything; exclude always wins.
pub(crate) fn is_selected(include: &[NamePattern], exclude: &[NamePattern], name: &str) -> bool {
    let included = include.is_empty() || include.iter().any(|p| p.matches(name));
    included && !exclude.iter().any(|p| p.matches(name))
}
