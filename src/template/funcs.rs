// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Built-in helper functions.
//!
//! ```text
//! default FALLBACK VALUE   FALLBACK if VALUE == "" else VALUE
//! required MSG VALUE       error MSG if VALUE == "" else VALUE
//! lower / upper / trim     string transforms
//! quote VALUE              "VALUE" with \ and " escaped
//! ```
//!
//! In a pipeline the piped value becomes the last argument, so
//! `.Name | default "John"` calls `default "John" .Name`.

use std::fmt;

use serde_json::Value;

use crate::error::TemplateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Helper {
    Default,
    Required,
    Lower,
    Upper,
    Trim,
    Quote,
}

impl Helper {
    pub(super) fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "default" => Self::Default,
            "required" => Self::Required,
            "lower" => Self::Lower,
            "upper" => Self::Upper,
            "trim" => Self::Trim,
            "quote" => Self::Quote,
            _ => return None,
        })
    }

    pub(super) const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Required => "required",
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Trim => "trim",
            Self::Quote => "quote",
        }
    }

    /// Number of arguments, including a piped value.
    pub(super) const fn arity(self) -> usize {
        match self {
            Self::Default | Self::Required => 2,
            Self::Lower | Self::Upper | Self::Trim | Self::Quote => 1,
        }
    }

    /// Calls the helper. `args.len()` has been checked against [`Self::arity`] at parse time.
    pub(super) fn call(self, mut args: Vec<Value>) -> Result<Value, TemplateError> {
        let value = args.pop().unwrap_or(Value::Null);
        match self {
            Self::Default => {
                let fallback = args.pop().unwrap_or(Value::Null);
                Ok(if is_empty_string(&value) { fallback } else { value })
            }
            Self::Required => {
                if is_empty_string(&value) {
                    let message = args.pop().map_or_else(String::new, |m| to_text(&m));
                    Err(TemplateError::Function {
                        name: self.name().to_string(),
                        message,
                    })
                } else {
                    Ok(value)
                }
            }
            Self::Lower => Ok(Value::String(to_text(&value).to_lowercase())),
            Self::Upper => Ok(Value::String(to_text(&value).to_uppercase())),
            Self::Trim => Ok(Value::String(to_text(&value).trim().to_string())),
            Self::Quote => Ok(Value::String(quote(&to_text(&value)))),
        }
    }
}

impl fmt::Display for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_empty_string(value: &Value) -> bool {
    value.as_str().is_some_and(str::is_empty)
}

/// Renders a value as template output text.
///
/// Strings are written verbatim, null as nothing, containers as compact JSON.
pub(super) fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Wraps `s` in double quotes, escaping backslashes and double quotes.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
