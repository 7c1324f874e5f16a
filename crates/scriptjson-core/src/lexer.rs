//! Tokenizer for the lenient JSON notation.
//!
//! The input is consumed by trying an ordered table of lexical rules at the
//! current offset; the first rule that matches wins. Order matters:
//!
//! - keywords (`true`, `false`, `null`, `undefined`) come before the generic
//!   identifier rule, and match as prefixes (`trueish` is `true` + `ish`);
//! - floats come before integers so `1.5` is not cut to `1`.
//!
//! Whitespace, `/* */` block comments and `//` line comments are matched by
//! the first rule and dropped. `undefined` produces the same token as `null`.
//!
//! Integer literals may carry an exponent (`12e3`); with a non-negative
//! exponent the value is expanded exactly as `mantissa * 10^exp`.

use std::fmt;

use log::debug;
use num_bigint::BigInt;

use crate::error::{Result, ScriptJsonError};
use crate::limits::Limits;

/// Characters of remaining input quoted in a lexical error.
const PREVIEW_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Colon,
    Comma,
    True,
    False,
    /// `null` or `undefined`.
    Null,
    /// Raw quoted string, quotes and escapes included.
    String(&'a str),
    /// Bare identifier. No grammar rule accepts one; the parser reports it.
    Identifier(&'a str),
    Float(f64),
    Integer(BigInt),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::ObjectOpen => f.write_str("'{'"),
            Token::ObjectClose => f.write_str("'}'"),
            Token::ArrayOpen => f.write_str("'['"),
            Token::ArrayClose => f.write_str("']'"),
            Token::Colon => f.write_str("':'"),
            Token::Comma => f.write_str("','"),
            Token::True => f.write_str("true"),
            Token::False => f.write_str("false"),
            Token::Null => f.write_str("null"),
            Token::String(raw) => f.write_str(raw),
            Token::Identifier(name) => write!(f, "identifier {name}"),
            Token::Float(x) => write!(f, "{x:?}"),
            Token::Integer(n) => write!(f, "{n}"),
        }
    }
}

/// A token together with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<'a> {
    pub token: Token<'a>,
    pub offset: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    Skip,
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    String,
    Colon,
    Comma,
    True,
    False,
    Null,
    Undefined,
    Identifier,
    Float,
    Integer,
}

/// Returns the byte length of the match at the start of the input, if any.
type Matcher = fn(&str) -> Option<usize>;

/// The ordered rule table. Immutable and shared by every call.
static RULES: &[(Rule, Matcher)] = &[
    (Rule::Skip, match_skip),
    (Rule::ObjectOpen, |s| match_literal(s, "{")),
    (Rule::ObjectClose, |s| match_literal(s, "}")),
    (Rule::ArrayOpen, |s| match_literal(s, "[")),
    (Rule::ArrayClose, |s| match_literal(s, "]")),
    (Rule::String, match_string),
    (Rule::Colon, |s| match_literal(s, ":")),
    (Rule::Comma, |s| match_literal(s, ",")),
    (Rule::True, |s| match_literal(s, "true")),
    (Rule::False, |s| match_literal(s, "false")),
    (Rule::Null, |s| match_literal(s, "null")),
    (Rule::Undefined, |s| match_literal(s, "undefined")),
    (Rule::Identifier, match_identifier),
    (Rule::Float, match_float),
    (Rule::Integer, match_integer),
];

/// Tokenize `text` with default limits.
pub fn tokenize(text: &str) -> Result<Vec<Lexeme<'_>>> {
    tokenize_with_limits(text, &Limits::default())
}

/// Tokenize `text`, dropping whitespace and comments.
pub fn tokenize_with_limits<'a>(text: &'a str, limits: &Limits) -> Result<Vec<Lexeme<'a>>> {
    let mut lexemes = Vec::new();
    let mut offset = 0;

    while offset < text.len() {
        let rest = &text[offset..];
        let Some((rule, len)) = RULES
            .iter()
            .find_map(|(rule, matcher)| matcher(rest).map(|len| (*rule, len)))
        else {
            if rest.starts_with('"') {
                return Err(ScriptJsonError::UnterminatedString { offset });
            }
            return Err(ScriptJsonError::Lex {
                offset,
                preview: rest.chars().take(PREVIEW_LEN).collect(),
            });
        };

        let matched = &rest[..len];
        if let Some(token) = build_token(rule, matched, offset, limits)? {
            lexemes.push(Lexeme { token, offset });
        }
        offset += len;
    }

    debug!("tokenized {} bytes into {} tokens", text.len(), lexemes.len());
    Ok(lexemes)
}

/// Turn a matched slice into a token. `Skip` matches produce nothing.
fn build_token<'a>(
    rule: Rule,
    matched: &'a str,
    offset: usize,
    limits: &Limits,
) -> Result<Option<Token<'a>>> {
    let token = match rule {
        Rule::Skip => return Ok(None),
        Rule::ObjectOpen => Token::ObjectOpen,
        Rule::ObjectClose => Token::ObjectClose,
        Rule::ArrayOpen => Token::ArrayOpen,
        Rule::ArrayClose => Token::ArrayClose,
        Rule::String => Token::String(matched),
        Rule::Colon => Token::Colon,
        Rule::Comma => Token::Comma,
        Rule::True => Token::True,
        Rule::False => Token::False,
        Rule::Null | Rule::Undefined => Token::Null,
        Rule::Identifier => Token::Identifier(matched),
        Rule::Float => Token::Float(parse_float(matched, offset)?),
        Rule::Integer => integer_token(matched, offset, limits)?,
    };
    Ok(Some(token))
}

/// Parse a float literal. Overflow to infinity is an error; underflow to
/// zero is not.
fn parse_float(text: &str, offset: usize) -> Result<f64> {
    let x = text.parse::<f64>().map_err(|_| ScriptJsonError::Lex {
        offset,
        preview: text.chars().take(PREVIEW_LEN).collect(),
    })?;
    if !x.is_finite() {
        return Err(ScriptJsonError::FloatOutOfRange {
            offset,
            literal: text.to_string(),
        });
    }
    Ok(x)
}

/// Expand an integer literal. `12e3` is exactly 12000; a negative exponent
/// cannot stay integral in general, so `5e-1` becomes the float 0.5.
fn integer_token<'a>(text: &str, offset: usize, limits: &Limits) -> Result<Token<'a>> {
    let bad_literal = || ScriptJsonError::Lex {
        offset,
        preview: text.chars().take(PREVIEW_LEN).collect(),
    };

    let Some(e_pos) = text.find(['e', 'E']) else {
        return text
            .parse::<BigInt>()
            .map(Token::Integer)
            .map_err(|_| bad_literal());
    };

    let exponent = &text[e_pos + 1..];
    if exponent.starts_with('-') {
        return Ok(Token::Float(parse_float(text, offset)?));
    }

    let too_large = ScriptJsonError::ExponentTooLarge {
        offset,
        limit: limits.max_exponent,
    };
    let exp: u32 = exponent
        .trim_start_matches('+')
        .parse()
        .map_err(|_| too_large)?;
    if exp > limits.max_exponent {
        return Err(ScriptJsonError::ExponentTooLarge {
            offset,
            limit: limits.max_exponent,
        });
    }

    let mantissa: BigInt = text[..e_pos].parse().map_err(|_| bad_literal())?;
    Ok(Token::Integer(mantissa * BigInt::from(10u8).pow(exp)))
}

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

fn match_literal(s: &str, lit: &str) -> Option<usize> {
    s.starts_with(lit).then_some(lit.len())
}

/// Whitespace run, block comment, or line comment (newline included).
fn match_skip(s: &str) -> Option<usize> {
    let ws = s
        .bytes()
        .take_while(|b| matches!(b, b'\r' | b'\n' | b'\t' | b' '))
        .count();
    if ws > 0 {
        return Some(ws);
    }
    if let Some(body) = s.strip_prefix("/*") {
        return body.find("*/").map(|end| end + 4);
    }
    if s.starts_with("//") {
        return Some(s.find('\n').map_or(s.len(), |nl| nl + 1));
    }
    None
}

/// A double-quoted string. A backslash always swallows the next character,
/// so `\"` and `\\` never end the string.
fn match_string(s: &str) -> Option<usize> {
    if !s.starts_with('"') {
        return None;
    }
    let mut chars = s.char_indices().skip(1);
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next()?;
            }
            '"' => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// `[A-Za-z_][A-Za-z_0-9]*`
fn match_identifier(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return None,
    }
    let len = bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    Some(len)
}

/// `-?(0|[1-9][0-9]*)\.[0-9]+([eE][-+]?[0-9]+)?`
fn match_float(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let int_end = scan_int_part(bytes)?;
    if bytes.get(int_end) != Some(&b'.') {
        return None;
    }
    let frac_end = scan_digits(bytes, int_end + 1);
    if frac_end == int_end + 1 {
        return None;
    }
    Some(scan_exponent(bytes, frac_end))
}

/// `-?(0|[1-9][0-9]*)([eE][-+]?[0-9]+)?`
fn match_integer(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let int_end = scan_int_part(bytes)?;
    Some(scan_exponent(bytes, int_end))
}

/// Optional minus, then `0` or a non-zero digit followed by digits.
fn scan_int_part(bytes: &[u8]) -> Option<usize> {
    let start = usize::from(bytes.first() == Some(&b'-'));
    match bytes.get(start)? {
        b'0' => Some(start + 1),
        b'1'..=b'9' => Some(scan_digits(bytes, start + 1)),
        _ => None,
    }
}

fn scan_digits(bytes: &[u8], from: usize) -> usize {
    from + bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Extend past an exponent suffix if a complete one follows `from`.
fn scan_exponent(bytes: &[u8], from: usize) -> usize {
    if !matches!(bytes.get(from), Some(b'e' | b'E')) {
        return from;
    }
    let mut i = from + 1;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }
    let end = scan_digits(bytes, i);
    if end == i {
        from
    } else {
        end
    }
}
