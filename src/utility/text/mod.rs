// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Small text and value helpers.

use std::io::BufRead;

use serde_json::Value;
use tracing::debug;

/// Returns the last non-blank line of `reader`, trimmed of surrounding whitespace.
///
/// Empty or all-blank input yields an empty string. A read error ends the scan
/// and the last line seen so far is returned.
pub fn last_line<R: BufRead>(reader: R) -> String {
    let mut last = String::new();
    for line in reader.lines() {
        match line {
            Ok(line) => {
                let line = line.trim();
                if !line.is_empty() {
                    line.clone_into(&mut last);
                }
            }
            Err(e) => {
                debug!(error = %e, "stopped reading lines");
                break;
            }
        }
    }
    last
}

/// Returns the keys of a JSON object.
///
/// Any other shape (array, string, number, null) yields an empty list; this is
/// the supported contract, not an error.
#[must_use]
pub fn map_keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}
