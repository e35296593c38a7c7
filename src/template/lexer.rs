// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Splits template source into text and action segments and tokenizes actions.
//!
//! ```text
//! "a {{- .X | lower }} b"
//!   Segment::Text("a")              trailing space trimmed by "{{- "
//!   Segment::Action { tokens: [Field(X), Pipe, Ident(lower)] }
//!   Segment::Text(" b")
//! ```

use serde_json::Value;

use crate::error::TemplateError;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const LEFT_COMMENT: &str = "/*";
const RIGHT_COMMENT: &str = "*/";

/// One lexical unit inside an action.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    /// `.`
    Dot,
    /// `.A.B` as `["A", "B"]`.
    Field(Vec<String>),
    /// Bare identifier, a helper name.
    Ident(String),
    /// String, number, bool or nil constant.
    Literal(Value),
    /// `|`
    Pipe,
}

/// A token with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Spanned {
    pub(super) token: Token,
    pub(super) offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Segment {
    Text(String),
    Action { offset: usize, tokens: Vec<Spanned> },
}

fn parse_error(offset: usize, message: impl Into<String>) -> TemplateError {
    TemplateError::Parse {
        offset,
        message: message.into(),
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Splits `src` into text and tokenized actions.
pub(super) fn segments(src: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut out = Vec::new();
    let mut pos = 0;
    let mut trim_next_text = false;

    while pos < src.len() {
        let Some(rel) = src[pos..].find(LEFT_DELIM) else {
            push_text(&mut out, &src[pos..], trim_next_text, false);
            break;
        };
        let open = pos + rel;
        let mut inner_start = open + LEFT_DELIM.len();

        // "{{- " trims whitespace before the action
        let trim_left = src[inner_start..].starts_with('-')
            && src[inner_start + 1..].starts_with(is_space);
        if trim_left {
            inner_start += 1;
        }
        push_text(&mut out, &src[pos..open], trim_next_text, trim_left);

        let (inner_end, close_end, trim_right) = find_action_end(src, open, inner_start)?;
        let inner = &src[inner_start..inner_end];

        if !is_comment(inner) {
            let tokens = tokenize(inner, inner_start)?;
            if tokens.is_empty() {
                return Err(parse_error(open, "missing value for command"));
            }
            out.push(Segment::Action {
                offset: open,
                tokens,
            });
        }

        trim_next_text = trim_right;
        pos = close_end;
    }

    Ok(out)
}

fn push_text(out: &mut Vec<Segment>, text: &str, trim_start: bool, trim_end: bool) {
    let text = if trim_start { text.trim_start_matches(is_space) } else { text };
    let text = if trim_end { text.trim_end_matches(is_space) } else { text };
    if !text.is_empty() {
        out.push(Segment::Text(text.to_string()));
    }
}

fn is_comment(inner: &str) -> bool {
    let inner = inner.trim_matches(is_space);
    inner.starts_with(LEFT_COMMENT) && inner.ends_with(RIGHT_COMMENT)
}

/// Finds the closing delimiter of the action opened at `open`.
///
/// Returns `(inner_end, after_close, trim_right)`. Delimiters inside string
/// literals and comments do not close the action.
fn find_action_end(
    src: &str,
    open: usize,
    inner_start: usize,
) -> Result<(usize, usize, bool), TemplateError> {
    let bytes = src.as_bytes();
    let mut i = inner_start;

    let body = src[inner_start..].trim_start_matches(is_space);
    if body.starts_with(LEFT_COMMENT) {
        let comment_start = src.len() - body.len();
        let Some(rel) = src[comment_start + LEFT_COMMENT.len()..].find(RIGHT_COMMENT) else {
            return Err(parse_error(open, "unclosed comment"));
        };
        i = comment_start + LEFT_COMMENT.len() + rel + RIGHT_COMMENT.len();
        let rest = &src[i..];
        let after = rest.trim_start_matches(is_space);
        let skipped = rest.len() - after.len();
        if after.starts_with(RIGHT_DELIM) {
            return Ok((i, i + skipped + RIGHT_DELIM.len(), false));
        }
        if skipped > 0 && after.starts_with('-') && after[1..].starts_with(RIGHT_DELIM) {
            return Ok((i, i + skipped + 1 + RIGHT_DELIM.len(), true));
        }
        return Err(parse_error(i, "comment ends before closing delimiter"));
    }

    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(b'"') if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'`' => quote = Some(b),
            None if bytes[i..].starts_with(RIGHT_DELIM.as_bytes()) => {
                // " -}}" trims whitespace after the action
                if i >= inner_start + 2
                    && bytes[i - 1] == b'-'
                    && is_space(char::from(bytes[i - 2]))
                {
                    return Ok((i - 1, i + RIGHT_DELIM.len(), true));
                }
                return Ok((i, i + RIGHT_DELIM.len(), false));
            }
            None => {}
        }
        i += 1;
    }

    match quote {
        Some(_) => Err(parse_error(open, "unterminated quoted string")),
        None => Err(parse_error(open, "unclosed action")),
    }
}

/// Tokenizes the inside of an action. `base` is the byte offset of `inner` in the source.
fn tokenize(inner: &str, base: usize) -> Result<Vec<Spanned>, TemplateError> {
    let mut tokens = Vec::new();
    let mut chars = inner.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        let offset = base + i;
        let token = match c {
            c if is_space(c) => {
                chars.next();
                continue;
            }
            '|' => {
                chars.next();
                Token::Pipe
            }
            '"' => {
                chars.next();
                Token::Literal(Value::String(lex_quoted(&mut chars, offset)?))
            }
            '`' => {
                chars.next();
                let start = i + 1;
                let end = loop {
                    match chars.next() {
                        Some((j, '`')) => break j,
                        Some(_) => {}
                        None => return Err(parse_error(offset, "unterminated raw quoted string")),
                    }
                };
                Token::Literal(Value::String(inner[start..end].to_string()))
            }
            '.' => {
                chars.next();
                let first = take_ident(inner, &mut chars);
                if first.is_empty() {
                    Token::Dot
                } else {
                    let mut path = vec![first];
                    while chars.peek().is_some_and(|&(_, c)| c == '.') {
                        chars.next();
                        let name = take_ident(inner, &mut chars);
                        if name.is_empty() {
                            return Err(parse_error(offset, "bad field syntax"));
                        }
                        path.push(name);
                    }
                    Token::Field(path)
                }
            }
            c if c.is_ascii_digit() || c == '-' => lex_number(inner, &mut chars, offset)?,
            c if c.is_alphabetic() || c == '_' => match take_ident(inner, &mut chars).as_str() {
                "true" => Token::Literal(Value::Bool(true)),
                "false" => Token::Literal(Value::Bool(false)),
                "nil" => Token::Literal(Value::Null),
                name => Token::Ident(name.to_string()),
            },
            other => {
                return Err(parse_error(
                    offset,
                    format!("unexpected {other:?} in command"),
                ));
            }
        };

        // Operands must be separated by whitespace or a pipe
        if let Some(&(_, next)) = chars.peek()
            && !is_space(next)
            && next != '|'
            && token != Token::Pipe
        {
            return Err(parse_error(
                offset,
                format!("unexpected {next:?} after operand"),
            ));
        }

        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn take_ident(src: &str, chars: &mut Chars<'_>) -> String {
    let Some(&(start, c)) = chars.peek() else {
        return String::new();
    };
    if !(c.is_alphabetic() || c == '_') {
        return String::new();
    }
    let mut end = start;
    while let Some(&(j, c)) = chars.peek() {
        if c.is_alphanumeric() || c == '_' {
            end = j + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }
    src[start..end].to_string()
}

fn lex_quoted(chars: &mut Chars<'_>, offset: usize) -> Result<String, TemplateError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            Some((_, '"')) => return Ok(out),
            Some((_, '\\')) => match chars.next() {
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, other)) => {
                    return Err(parse_error(offset, format!("unknown escape sequence \\{other}")));
                }
                None => return Err(parse_error(offset, "unterminated quoted string")),
            },
            Some((_, c)) => out.push(c),
            None => return Err(parse_error(offset, "unterminated quoted string")),
        }
    }
}

fn lex_number(src: &str, chars: &mut Chars<'_>, offset: usize) -> Result<Token, TemplateError> {
    let Some(&(start, _)) = chars.peek() else {
        return Err(parse_error(offset, "bad number syntax"));
    };
    let mut end = start;
    while let Some(&(j, c)) = chars.peek() {
        if c.is_ascii_digit() || c == '.' || (j == start && c == '-') {
            end = j + 1;
            chars.next();
        } else {
            break;
        }
    }
    let text = &src[start..end];
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Token::Literal(Value::from(n)));
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(|n| Token::Literal(Value::Number(n)))
        .ok_or_else(|| parse_error(offset, format!("bad number syntax: {text:?}")))
}
