//! Error types for decoding and encoding operations.

use thiserror::Error;

/// Errors that can occur while decoding or encoding script-JSON.
#[derive(Error, Debug)]
pub enum ScriptJsonError {
    /// No lexical rule matches the input at `offset`.
    /// `preview` holds at most the first 10 characters found there.
    #[error("Invalid input at offset {offset}: {preview:?}")]
    Lex { offset: usize, preview: String },

    /// A quoted string was opened at `offset` but never closed.
    #[error("Unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    /// A float literal whose magnitude does not fit in an `f64`.
    #[error("Float literal at offset {offset} is out of range: {literal}")]
    FloatOutOfRange { offset: usize, literal: String },

    /// The token sequence does not match the grammar.
    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// Arrays/objects are nested deeper than the configured limit.
    #[error("Nesting depth exceeds limit of {limit}")]
    NestingTooDeep { limit: usize },

    /// An integer literal's exponent exceeds the configured limit.
    #[error("Exponent at offset {offset} exceeds limit of {limit}")]
    ExponentTooLarge { offset: usize, limit: u32 },

    /// Byte input was not valid UTF-8.
    #[error("Input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The encoder met a value it has no rendering for.
    #[error("Unsupported type {type_name}: {repr}")]
    Unsupported { type_name: String, repr: String },

    /// A container was reached again while it was still being written.
    #[error("Cycle detected while encoding {kind}")]
    Cycle { kind: &'static str },

    /// A `Renderable` failed to produce its markup.
    #[error("Render error: {0}")]
    Render(String),
}

impl ScriptJsonError {
    /// True for failures raised by the tokenizer.
    pub fn is_lex_error(&self) -> bool {
        matches!(
            self,
            Self::Lex { .. } | Self::UnterminatedString { .. } | Self::FloatOutOfRange { .. }
        )
    }

    /// True for failures raised by the parser after tokenizing succeeded.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::NestingTooDeep { .. } | Self::ExponentTooLarge { .. }
        )
    }

    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout scriptjson-core.
pub type Result<T> = std::result::Result<T, ScriptJsonError>;
