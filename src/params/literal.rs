//! Typed parsing of literal values.
//!
//! Configuration values arrive as strings. This module recognises the literal forms a
//! value may take: integers, floats, booleans, `None`, quoted strings, tuples and lists,
//! nested arbitrarily. Anything else (bare words, calls, arithmetic) is rejected so the
//! caller can keep the original string.

use super::value::ParValue;
use std::fmt;

/// Deepest accepted nesting of tuples and lists.
pub const MAX_NESTING: usize = 64;

/// Why a string is not a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub position: usize,
    pub message: String,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.position)
    }
}

impl std::error::Error for LiteralError {}

/// Parse `text` as a single literal.
///
/// A top-level comma makes a tuple, so `"1, 2"` and `"(1, 2)"` both give a two-element
/// tuple.
pub fn parse_literal(text: &str) -> Result<ParValue, LiteralError> {
    let mut parser = Parser {
        src: text.as_bytes(),
        text,
        pos: 0,
        depth: 0,
    };
    parser.skip_ws();
    if parser.at_end() {
        return Err(parser.error("empty value"));
    }
    let value = parser.expr_list(None)?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a [u8],
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn error(&self, message: &str) -> LiteralError {
        LiteralError {
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        self.skip_ws();
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// `expr (',' expr)* [',']` up to `close` (or the end of input when `None`).
    ///
    /// Returns the items and whether any comma was seen.
    fn items(&mut self, close: Option<u8>) -> Result<(Vec<ParValue>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == close || (close.is_none() && self.at_end()) {
                break;
            }
            items.push(self.expr()?);
            if !self.eat(b',') {
                break;
            }
            saw_comma = true;
        }
        Ok((items, saw_comma))
    }

    /// A parenthesised group or the top level: one bare item is itself, anything else a tuple.
    fn expr_list(&mut self, close: Option<u8>) -> Result<ParValue, LiteralError> {
        let (mut items, saw_comma) = self.items(close)?;
        if items.len() == 1 && !saw_comma {
            return Ok(items.remove(0));
        }
        if items.is_empty() && close.is_none() {
            return Err(self.error("expected a value"));
        }
        Ok(ParValue::Tuple(items))
    }

    fn expr(&mut self) -> Result<ParValue, LiteralError> {
        self.skip_ws();
        match self.peek() {
            Some(open @ (b'(' | b'[')) => {
                if self.depth == MAX_NESTING {
                    return Err(self.error("nesting too deep"));
                }
                self.depth += 1;
                self.pos += 1;
                let group = if open == b'(' {
                    self.tuple_group()
                } else {
                    self.list_group()
                };
                self.depth -= 1;
                group
            }
            Some(q @ (b'\'' | b'"')) => self.string(q),
            Some(b'0'..=b'9' | b'+' | b'-' | b'.') => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => self.keyword(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of value")),
        }
    }

    fn tuple_group(&mut self) -> Result<ParValue, LiteralError> {
        let inner = self.expr_list(Some(b')'))?;
        if !self.eat(b')') {
            return Err(self.error("expected ')'"));
        }
        Ok(inner)
    }

    fn list_group(&mut self) -> Result<ParValue, LiteralError> {
        let (items, _) = self.items(Some(b']'))?;
        if !self.eat(b']') {
            return Err(self.error("expected ']'"));
        }
        Ok(ParValue::List(items))
    }

    fn string(&mut self, quote: u8) -> Result<ParValue, LiteralError> {
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.text[self.pos..].char_indices();
        while let Some((offset, c)) = chars.next() {
            match c {
                c if c as u32 == u32::from(quote) => {
                    self.pos += offset + 1;
                    return Ok(ParValue::Str(out));
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, other)) => out.push(other),
                    None => break,
                },
                other => out.push(other),
            }
        }
        self.pos = self.src.len();
        Err(self.error("unterminated string"))
    }

    fn keyword(&mut self) -> Result<ParValue, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        match &self.text[start..self.pos] {
            "True" | "true" => Ok(ParValue::Bool(true)),
            "False" | "false" => Ok(ParValue::Bool(false)),
            "None" => Ok(ParValue::None),
            _ => {
                self.pos = start;
                Err(self.error("not a literal"))
            }
        }
    }

    fn number(&mut self) -> Result<ParValue, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                b'0'..=b'9' | b'_' => self.pos += 1,
                b'.' => {
                    is_float = true;
                    self.pos += 1;
                }
                b'e' | b'E' => {
                    is_float = true;
                    self.pos += 1;
                    if matches!(self.peek(), Some(b'+' | b'-')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }

        let raw = &self.text[start..self.pos];
        if raw.starts_with('_') || raw.ends_with('_') || raw.contains("__") {
            return Err(self.error("misplaced underscore in number"));
        }
        let digits: String = raw.chars().filter(|&c| c != '_').collect();

        if is_float {
            digits
                .parse::<f64>()
                .map(ParValue::Float)
                .map_err(|_| self.error("invalid float"))
        } else {
            let unsigned = digits.trim_start_matches(['+', '-']);
            if unsigned.len() > 1 && unsigned.starts_with('0') && unsigned.bytes().any(|b| b != b'0') {
                return Err(self.error("leading zeros in integer"));
            }
            digits
                .parse::<i64>()
                .map(ParValue::Int)
                .map_err(|_| self.error("invalid integer"))
        }
    }
}
