// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! String templates with strict key lookup and pipeline helpers.
//!
//! ```text
//! "hello, {{ .Name | default \"John\" }}!"
//!        |
//!        v
//!   lexer::segments()     text / action split, {{- -}} trimming, comments
//!        |                unclosed action --> TemplateError::Parse
//!        v
//!   Template::parse()     action tokens --> Pipeline [Command, ...]
//!        |                unknown helper, bad arity --> TemplateError::Parse
//!        v
//!   Template::render()    .A.B lookup, helpers applied left to right
//!                         absent key --> TemplateError::MissingKey
//! ```
//!
//! Lookup is strict: a missing key is an error, and `default` only replaces an
//! empty string, never an absent key. Output is assembled in memory and only
//! returned when every action succeeded.

mod funcs;
mod lexer;


use serde_json::{Map, Value};
use tracing::trace;

use crate::error::TemplateError;
use funcs::Helper;
use lexer::{Segment, Spanned, Token};

pub(crate) use funcs::quote;

/// Operand of a command.
#[derive(Debug, Clone, PartialEq)]
enum Arg {
    Dot,
    Field(Vec<String>),
    Literal(Value),
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Operand(Arg),
    Call { helper: Helper, args: Vec<Arg> },
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Pipeline(Vec<Command>),
}

/// A parsed template, reusable across renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parses `src`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Parse`] for unterminated actions, strings or
    /// comments, empty actions or pipeline stages, unknown helper names, and
    /// helpers called with the wrong number of arguments.
    pub fn parse(src: &str) -> Result<Self, TemplateError> {
        let nodes = lexer::segments(src)?
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => Ok(Node::Text(text)),
                Segment::Action { offset, tokens } => parse_pipeline(offset, tokens).map(Node::Pipeline),
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { nodes })
    }

    /// Renders the template against `variables`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingKey`] when a field reference cannot be
    /// resolved and [`TemplateError::Function`] when a helper rejects its input.
    pub fn render(&self, variables: &Map<String, Value>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Pipeline(commands) => {
                    let value = eval_pipeline(commands, variables)?;
                    out.push_str(&funcs::to_text(&value));
                }
            }
        }
        Ok(out)
    }
}

/// Parses and renders `template` in one step.
///
/// # Errors
///
/// See [`Template::parse`] and [`Template::render`].
///
/// # Example
///
/// ```
/// use taskctl_rs::template::render_string;
///
/// let vars = serde_json::json!({"Name": ""});
/// let out = render_string(
///     "hello, {{ .Name | default \"John\" }}!",
///     vars.as_object().unwrap(),
/// )?;
/// assert_eq!(out, "hello, John!");
/// # Ok::<(), taskctl_rs::error::TemplateError>(())
/// ```
pub fn render_string(template: &str, variables: &Map<String, Value>) -> Result<String, TemplateError> {
    Template::parse(template)?.render(variables)
}

fn parse_error(offset: usize, message: impl Into<String>) -> TemplateError {
    TemplateError::Parse {
        offset,
        message: message.into(),
    }
}

fn parse_pipeline(offset: usize, tokens: Vec<Spanned>) -> Result<Vec<Command>, TemplateError> {
    let mut stages: Vec<Vec<Spanned>> = vec![Vec::new()];
    for spanned in tokens {
        if spanned.token == Token::Pipe {
            stages.push(Vec::new());
        } else if let Some(stage) = stages.last_mut() {
            stage.push(spanned);
        }
    }

    let mut commands = Vec::with_capacity(stages.len());
    for (index, stage) in stages.into_iter().enumerate() {
        let piped = index > 0;
        let command = parse_command(offset, stage, piped)?;
        if piped && matches!(command, Command::Operand(_)) {
            return Err(parse_error(
                offset,
                format!("non executable command in pipeline stage {}", index + 1),
            ));
        }
        commands.push(command);
    }
    Ok(commands)
}

fn parse_command(offset: usize, stage: Vec<Spanned>, piped: bool) -> Result<Command, TemplateError> {
    let mut tokens = stage.into_iter();
    let Some(first) = tokens.next() else {
        return Err(parse_error(offset, "missing command in pipeline"));
    };

    let name = match first.token {
        Token::Ident(name) => name,
        _ => {
            let arg = to_arg(first)?;
            if let Some(extra) = tokens.next() {
                return Err(parse_error(extra.offset, "can't give argument to non-function"));
            }
            return Ok(Command::Operand(arg));
        }
    };

    let helper = Helper::from_name(&name)
        .ok_or_else(|| parse_error(first.offset, format!("function {name:?} not defined")))?;
    let args = tokens.map(to_arg).collect::<Result<Vec<_>, _>>()?;

    let supplied = args.len() + usize::from(piped);
    if supplied != helper.arity() {
        return Err(parse_error(
            first.offset,
            format!(
                "wrong number of args for {helper}: want {} got {supplied}",
                helper.arity()
            ),
        ));
    }
    Ok(Command::Call { helper, args })
}

fn to_arg(spanned: Spanned) -> Result<Arg, TemplateError> {
    match spanned.token {
        Token::Dot => Ok(Arg::Dot),
        Token::Field(path) => Ok(Arg::Field(path)),
        Token::Literal(value) => Ok(Arg::Literal(value)),
        Token::Ident(name) => Err(parse_error(
            spanned.offset,
            format!("function {name:?} used as an argument"),
        )),
        Token::Pipe => Err(parse_error(spanned.offset, "unexpected pipe")),
    }
}

fn eval_pipeline(commands: &[Command], variables: &Map<String, Value>) -> Result<Value, TemplateError> {
    let mut piped: Option<Value> = None;
    for command in commands {
        let value = match command {
            Command::Operand(arg) => eval_arg(arg, variables)?,
            Command::Call { helper, args } => {
                let mut values = args
                    .iter()
                    .map(|a| eval_arg(a, variables))
                    .collect::<Result<Vec<_>, _>>()?;
                values.extend(piped.take());
                trace!(helper = %helper, "calling template helper");
                helper.call(values)?
            }
        };
        piped = Some(value);
    }
    Ok(piped.unwrap_or(Value::Null))
}

fn eval_arg(arg: &Arg, variables: &Map<String, Value>) -> Result<Value, TemplateError> {
    match arg {
        Arg::Dot => Ok(Value::Object(variables.clone())),
        Arg::Literal(value) => Ok(value.clone()),
        Arg::Field(path) => lookup(variables, path).cloned(),
    }
}

/// Case-sensitive dotted lookup. Every segment must name an existing key of an object.
fn lookup<'a>(variables: &'a Map<String, Value>, path: &[String]) -> Result<&'a Value, TemplateError> {
    let missing = || TemplateError::MissingKey { key: path.join(".") };

    let (first, rest) = path.split_first().ok_or_else(missing)?;
    let mut current = variables.get(first).ok_or_else(missing)?;
    for segment in rest {
        current = current
            .as_object()
            .and_then(|obj| obj.get(segment))
            .ok_or_else(missing)?;
    }
    Ok(current)
}
