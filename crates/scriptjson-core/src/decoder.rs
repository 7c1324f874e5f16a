//! Recursive-descent parser: token sequence to [`Value`].
//!
//! Grammar (after tokenizing):
//!
//! ```text
//! value  := object | array | string | number | true | false | null
//! object := '{' [ string ':' value { ',' string ':' value } ] '}'
//! array  := '[' [ value { ',' value } ] ']'
//! ```
//!
//! A comma always demands another element, so `[1,]` is rejected, and the
//! whole input must be exactly one value. Object keys must be quoted strings;
//! identifiers are tokenized but no rule accepts them. A repeated object key
//! replaces the earlier value in place.

use std::collections::HashMap;

use log::debug;

use crate::error::{Result, ScriptJsonError};
use crate::escape::unescape;
use crate::lexer::{tokenize_with_limits, Lexeme, Token};
use crate::limits::Limits;
use crate::types::Value;

/// Parse one value from `text` with default limits.
///
/// # Example
/// ```
/// use scriptjson_core::{parse, Value};
/// let v = parse(r#"{"a": [1, 2.5, undefined] /* note */}"#).unwrap();
/// assert_eq!(v.get("a").unwrap().as_array().unwrap()[2], Value::Null);
/// ```
pub fn parse(text: &str) -> Result<Value> {
    parse_with_limits(text, &Limits::default())
}

/// Parse one value from UTF-8 bytes.
pub fn parse_bytes(bytes: &[u8]) -> Result<Value> {
    parse(std::str::from_utf8(bytes)?)
}

/// Parse one value from `text`, enforcing `limits`.
pub fn parse_with_limits(text: &str, limits: &Limits) -> Result<Value> {
    let lexemes = tokenize_with_limits(text, limits)?;
    let mut parser = Parser {
        lexemes,
        pos: 0,
        depth: 0,
        end_offset: text.len(),
        max_depth: limits.max_depth,
    };
    let value = parser.parse_value()?;
    if let Some(extra) = parser.peek() {
        return Err(ScriptJsonError::parse(
            extra.offset,
            format!("Unexpected {} after end of value", extra.token),
        ));
    }
    debug!("parsed {} from {} bytes", value.kind(), text.len());
    Ok(value)
}

struct Parser<'a> {
    lexemes: Vec<Lexeme<'a>>,
    pos: usize,
    depth: usize,
    /// Reported as the offset of errors at end of input.
    end_offset: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Lexeme<'a>> {
        self.lexemes.get(self.pos)
    }

    /// Look at the next token, failing at end of input.
    fn lookahead(&self) -> Result<&Lexeme<'a>> {
        self.peek().ok_or_else(|| {
            ScriptJsonError::parse(self.end_offset, "Unexpected end of input")
        })
    }

    fn next(&mut self) -> Result<Lexeme<'a>> {
        self.lookahead()?;
        let lexeme = self.lexemes[self.pos].clone();
        self.pos += 1;
        Ok(lexeme)
    }

    /// Consume the next token, requiring it to be `want`.
    fn accept(&mut self, want: Token<'static>) -> Result<()> {
        let lexeme = match self.peek() {
            Some(l) => l,
            None => {
                return Err(ScriptJsonError::parse(
                    self.end_offset,
                    format!("Unexpected end of input, {want} expected"),
                ))
            }
        };
        if lexeme.token != want {
            return Err(ScriptJsonError::parse(
                lexeme.offset,
                format!("Unexpected {}, {want} expected", lexeme.token),
            ));
        }
        self.pos += 1;
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.lookahead()?.token {
            Token::ObjectOpen => return self.parse_object(),
            Token::ArrayOpen => return self.parse_array(),
            Token::String(_) => return self.parse_string().map(Value::String),
            _ => {}
        }
        let lexeme = self.next()?;
        match lexeme.token {
            Token::True => Ok(Value::Bool(true)),
            Token::False => Ok(Value::Bool(false)),
            Token::Null => Ok(Value::Null),
            Token::Integer(n) => Ok(Value::Integer(n)),
            Token::Float(f) => Ok(Value::Float(f)),
            other => Err(ScriptJsonError::parse(
                lexeme.offset,
                format!("Unexpected {other}"),
            )),
        }
    }

    /// Consume a string token and decode its escapes.
    fn parse_string(&mut self) -> Result<String> {
        let lexeme = self.next()?;
        match lexeme.token {
            Token::String(raw) => Ok(unescape(&raw[1..raw.len() - 1])),
            other => Err(ScriptJsonError::parse(
                lexeme.offset,
                format!("Unexpected {other}, string expected"),
            )),
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.enter()?;
        self.accept(Token::ArrayOpen)?;
        let mut items = Vec::new();
        while self.lookahead()?.token != Token::ArrayClose {
            if !items.is_empty() {
                self.accept(Token::Comma)?;
            }
            items.push(self.parse_value()?);
        }
        self.accept(Token::ArrayClose)?;
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.enter()?;
        self.accept(Token::ObjectOpen)?;
        let mut entries: Vec<(String, Value)> = Vec::new();
        // Key -> position in `entries`, so repeated keys are found in O(1).
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut first = true;
        while self.lookahead()?.token != Token::ObjectClose {
            if !first {
                self.accept(Token::Comma)?;
            }
            first = false;

            let key = self.parse_string()?;
            self.accept(Token::Colon)?;
            let value = self.parse_value()?;
            match index.get(&key) {
                Some(&slot) => entries[slot].1 = value,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }
        }
        self.accept(Token::ObjectClose)?;
        self.depth -= 1;
        Ok(Value::Object(entries))
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ScriptJsonError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }
}
