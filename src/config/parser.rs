// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/config/parser.rs
//!
//! Shortcut store file parser and writer
//!
//! The store is a line-oriented text file:
//!
//! ```text
//! # Sigil keyboard shortcuts
//! enable_altgr = false
//! action "MainWindow.Save" "Save" "Ctrl+S" "Save the current book"
//! bind "MainWindow.Save" "Ctrl+Shift+S"
//! ```
//!
//! - `action` lines declare an action: id, name, default sequence, description
//! - `bind` lines override the current sequence of an id (`""` = unbound)
//! - Strings are double-quoted; `\"` and `\\` are the only escapes
//!
//! Every field is quoted because any character, comma included, can be
//! a key.
//!
//! # Architecture
//! Each line is parsed with nom combinators. Sequences are then parsed
//! with `KeySequence::from_str` so the store only ever holds canonical
//! sequences.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, one_of, space0, space1},
    combinator::{eof, value},
    sequence::preceded,
    IResult, Parser,
};
use thiserror::Error;

use crate::core::types::{KeySequence, SequenceParseError};

/// Parse errors with line number context
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parse error on line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },

    #[error("Invalid key sequence on line {line}: {source}")]
    InvalidSequence {
        line: usize,
        #[source]
        source: SequenceParseError,
    },
}

/// One meaningful line of a store file
#[derive(Clone, Debug, PartialEq)]
pub enum StoreLine {
    EnableAltGr(bool),
    Action {
        id: String,
        name: String,
        default: KeySequence,
        description: String,
    },
    Bind {
        id: String,
        sequence: KeySequence,
    },
}

/// Parse a complete store file
///
/// Blank lines and `#` comments are skipped. The first malformed line
/// aborts the parse.
pub fn parse_store_file(content: &str) -> Result<Vec<StoreLine>, ParseError> {
    let mut lines = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1; // Human-readable numbers start at 1

        let line_trimmed = line.trim();
        if line_trimmed.is_empty() || line_trimmed.starts_with('#') {
            continue;
        }

        let parsed = match parse_line(line_trimmed) {
            Ok((_, parsed)) => parsed,
            Err(e) => {
                return Err(ParseError::InvalidSyntax {
                    line: line_num,
                    message: format!("{:?}", e),
                });
            }
        };

        let store_line = match parsed {
            RawLine::EnableAltGr(enabled) => StoreLine::EnableAltGr(enabled),
            RawLine::Action {
                id,
                name,
                default,
                description,
            } => StoreLine::Action {
                id,
                name,
                default: parse_sequence(&default, line_num)?,
                description,
            },
            RawLine::Bind { id, sequence } => StoreLine::Bind {
                id,
                sequence: parse_sequence(&sequence, line_num)?,
            },
        };
        lines.push(store_line);
    }

    Ok(lines)
}

fn parse_sequence(text: &str, line: usize) -> Result<KeySequence, ParseError> {
    text.parse()
        .map_err(|source| ParseError::InvalidSequence { line, source })
}

/// A line before its sequences have been parsed
#[derive(Clone, Debug, PartialEq)]
pub enum RawLine {
    EnableAltGr(bool),
    Action {
        id: String,
        name: String,
        default: String,
        description: String,
    },
    Bind {
        id: String,
        sequence: String,
    },
}

/// Parse a single trimmed, non-comment line
pub fn parse_line(input: &str) -> IResult<&str, RawLine> {
    let (input, line) = alt((parse_enable_altgr, parse_action, parse_bind)).parse(input)?;
    let (input, _) = (space0, eof).parse(input)?;
    Ok((input, line))
}

/// Parse `enable_altgr = true|false`
pub fn parse_enable_altgr(input: &str) -> IResult<&str, RawLine> {
    let (input, _) = (tag("enable_altgr"), space0, char('='), space0).parse(input)?;
    let (input, enabled) =
        alt((value(true, tag("true")), value(false, tag("false")))).parse(input)?;
    Ok((input, RawLine::EnableAltGr(enabled)))
}

/// Parse `action "<id>" "<name>" "<default>" "<description>"`
pub fn parse_action(input: &str) -> IResult<&str, RawLine> {
    let (input, _) = tag("action").parse(input)?;
    let (input, id) = preceded(space1, quoted).parse(input)?;
    let (input, name) = preceded(space1, quoted).parse(input)?;
    let (input, default) = preceded(space1, quoted).parse(input)?;
    let (input, description) = preceded(space1, quoted).parse(input)?;

    Ok((
        input,
        RawLine::Action {
            id,
            name,
            default,
            description,
        },
    ))
}

/// Parse `bind "<id>" "<sequence>"`
pub fn parse_bind(input: &str) -> IResult<&str, RawLine> {
    let (input, _) = tag("bind").parse(input)?;
    let (input, id) = preceded(space1, quoted).parse(input)?;
    let (input, sequence) = preceded(space1, quoted).parse(input)?;

    Ok((input, RawLine::Bind { id, sequence }))
}

/// Parse a double-quoted string with `\"` and `\\` escapes
pub fn quoted(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('"').parse(input)?;
    let mut out = String::new();

    loop {
        let (after, chunk) = take_while(|c: char| c != '"' && c != '\\').parse(rest)?;
        out.push_str(chunk);
        rest = after;

        if let Some(after) = rest.strip_prefix('"') {
            return Ok((after, out));
        }

        let (after, escaped) = preceded(char('\\'), one_of("\\\"")).parse(rest)?;
        out.push(escaped);
        rest = after;
    }
}

/// Quote a string for writing
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Render lines back into store file text
pub fn render_store_file(lines: &[StoreLine]) -> String {
    let mut out = String::from("# Sigil keyboard shortcuts\n");

    for line in lines {
        match line {
            StoreLine::EnableAltGr(enabled) => {
                out.push_str(&format!("enable_altgr = {}\n", enabled));
            }
            StoreLine::Action {
                id,
                name,
                default,
                description,
            } => {
                out.push_str(&format!(
                    "action {} {} {} {}\n",
                    quote(id),
                    quote(name),
                    quote(&default.to_string()),
                    quote(description),
                ));
            }
            StoreLine::Bind { id, sequence } => {
                out.push_str(&format!(
                    "bind {} {}\n",
                    quote(id),
                    quote(&sequence.to_string())
                ));
            }
        }
    }

    out
}
