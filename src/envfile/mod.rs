// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Envfile definition and validation.
//!
//! # Pipeline
//!
//! ```text
//! Envfile (config / builder, defaults applied)
//!    |
//!    v
//! validate()   path --> modify patterns --> modify operations --> filters
//!    |         first failure wins, no I/O
//!    v
//! EnvfileGenerator::new()
//!    |
//!    v
//! generate(&EnvSnapshot)
//!   filter     include (allow-list, if any) then exclude
//!   transform  every matching modify rule, in order, on the value
//!   quote      "VALUE" with \ and " escaped
//!   serialize  NAME=VALUE\n per variable, snapshot order, line breaks
//!              in values written as \n and \r
//!   write      generated_dir/path via temp file + rename
//!              delay > 0 --> scheduled, cancellable
//! ```
//!
//! # Example
//!
//! ```toml
//! [envfile]
//! generated_dir = ".taskctl"
//! path = "stage.env"
//! include = ["HOME", "TF_VAR_.*"]
//! exclude = ["TF_VAR_secret"]
//! modify = [{ pattern = "^TF_VAR_", operation = "lower" }]
//! quote = true
//! delay = 500  # milliseconds
//! ```

pub mod filter;
pub mod generator;

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::{Component, PathBuf};
use std::time::Duration;

use bon::Builder;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use filter::NamePattern;

/// Directory used when `generated_dir` is left empty.
pub const DEFAULT_GENERATED_DIR: &str = ".taskctl";

/// Declarative envfile configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default, deny_unknown_fields)]
pub struct Envfile {
    /// Directory the artifact is written under.
    #[builder(into, default = PathBuf::from(DEFAULT_GENERATED_DIR))]
    pub generated_dir: PathBuf,
    /// Output file, relative to `generated_dir`. Required; absolute paths and
    /// `..` components are rejected.
    #[builder(into, default)]
    pub path: PathBuf,
    /// Allow-list of variable names. Empty means everything.
    #[builder(default)]
    pub include: Vec<String>,
    /// Deny-list of variable names, applied after `include`.
    #[builder(default)]
    pub exclude: Vec<String>,
    /// Value transforms, applied in order.
    #[builder(default)]
    pub modify: Vec<ModifyRule>,
    /// Wrap values in double quotes.
    #[builder(default)]
    pub quote: bool,
    /// Defer the write by this long.
    #[serde(with = "delay_millis")]
    #[builder(default)]
    pub delay: Duration,
}

impl Default for Envfile {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Envfile {
    /// Fills in `generated_dir` if it was set to an empty value.
    pub fn apply_defaults(&mut self) -> &mut Self {
        if self.generated_dir.as_os_str().is_empty() {
            self.generated_dir = PathBuf::from(DEFAULT_GENERATED_DIR);
        }
        self
    }

    /// Checks the definition without touching the filesystem or environment.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// 1. `path` is set, relative, and free of `..`
    /// 2. every modify pattern is non-empty and a valid regex
    /// 3. every modify operation is known
    /// 4. every include/exclude entry is a valid name pattern
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.compile().map(drop)
    }

    /// Validates and compiles patterns for generation.
    pub(crate) fn compile(&self) -> Result<Compiled, ValidationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ValidationError::MissingPath);
        }
        if !self
            .path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ValidationError::PathOutsideGeneratedDir {
                path: self.path.display().to_string(),
            });
        }

        let patterns = self
            .modify
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                if rule.pattern.is_empty() {
                    return Err(ValidationError::EmptyPattern { index });
                }
                Regex::new(&rule.pattern).map_err(|source| ValidationError::InvalidPattern {
                    index,
                    pattern: rule.pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let operations = self
            .modify
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Operation::from_name(&rule.operation).ok_or_else(|| {
                    ValidationError::UnknownOperation {
                        index,
                        operation: rule.operation.clone(),
                        expected: Operation::EXPECTED,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rules = patterns
            .into_iter()
            .zip(operations)
            .map(|(pattern, operation)| CompiledRule { pattern, operation })
            .collect();

        Ok(Compiled {
            include: compile_filters("include", &self.include)?,
            exclude: compile_filters("exclude", &self.exclude)?,
            rules,
        })
    }
}

fn compile_filters(
    list: &'static str,
    entries: &[String],
) -> Result<Vec<NamePattern>, ValidationError> {
    entries
        .iter()
        .map(|entry| {
            NamePattern::new(entry).map_err(|source| ValidationError::InvalidFilter {
                list,
                pattern: entry.clone(),
                source,
            })
        })
        .collect()
}

/// One value transform: `operation` is applied to the value of every
/// variable whose name matches `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModifyRule {
    /// Regular expression searched in the variable name.
    pub pattern: String,
    /// Name of an [`Operation`].
    pub operation: String,
}

impl ModifyRule {
    pub fn new(pattern: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            operation: operation.into(),
        }
    }
}

/// Supported value transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Lower,
    Upper,
    Trim,
}

impl Operation {
    const EXPECTED: &'static str = "lower, upper, trim";

    /// Looks up an operation by its exact, lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lower" => Some(Self::Lower),
            "upper" => Some(Self::Upper),
            "trim" => Some(Self::Trim),
            _ => None,
        }
    }

    #[must_use]
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Lower => value.to_lowercase(),
            Self::Upper => value.to_uppercase(),
            Self::Trim => value.trim().to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Trim => "trim",
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) pattern: Regex,
    pub(crate) operation: Operation,
}

/// Compiled filters and rules of a validated [`Envfile`].
#[derive(Debug, Clone)]
pub(crate) struct Compiled {
    pub(crate) include: Vec<NamePattern>,
    pub(crate) exclude: Vec<NamePattern>,
    pub(crate) rules: Vec<CompiledRule>,
}

/// `delay` is stored as whole milliseconds in configuration files.
mod delay_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(delay: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
