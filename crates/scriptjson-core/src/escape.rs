//! String escape codec shared by the decoder and the encoder.
//!
//! Decoding understands `\f \b \n \t \r \" \\`, two-digit `\xHH` and
//! four-digit `\uHHHH`. Any other backslash sequence is kept verbatim.
//!
//! Encoding is tuned for text that ends up inside a `<script>` block or an
//! `eval`: besides the usual JSON escapes, all C0 controls become `\xHH`,
//! and U+2028/U+2029 are escaped because a raw line or paragraph separator
//! terminates a JavaScript string literal.

use std::fmt;

/// Decode the body of a quoted string (quotes already stripped).
///
/// One left-to-right pass; decoded output is never rescanned, so `\\x41`
/// yields a backslash followed by `x41`.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match decode_escape(rest) {
            Some((ch, used)) => {
                out.push(ch);
                rest = &rest[used..];
            }
            None => {
                out.push('\\');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode one escape at the start of `s` (which begins with a backslash).
/// Returns the character and the number of bytes consumed.
fn decode_escape(s: &str) -> Option<(char, usize)> {
    let bytes = s.as_bytes();
    let ch = match bytes.get(1)? {
        b'f' => '\x0c',
        b'b' => '\x08',
        b'n' => '\n',
        b't' => '\t',
        b'r' => '\r',
        b'"' => '"',
        b'\\' => '\\',
        b'x' => {
            let code = hex_digits(bytes, 2, 2)?;
            return char::from_u32(code).map(|c| (c, 4));
        }
        b'u' => return decode_unicode_escape(bytes),
        _ => return None,
    };
    Some((ch, 2))
}

/// Decode `\uHHHH`, joining a high surrogate with an immediately following
/// `\uHHHH` low surrogate. Unpaired surrogates become U+FFFD.
fn decode_unicode_escape(bytes: &[u8]) -> Option<(char, usize)> {
    let code = hex_digits(bytes, 2, 4)?;
    if (0xD800..0xDC00).contains(&code) {
        if bytes.get(6) == Some(&b'\\') && bytes.get(7) == Some(&b'u') {
            if let Some(low) = hex_digits(bytes, 8, 4) {
                if (0xDC00..0xE000).contains(&low) {
                    let joined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(joined).map(|c| (c, 12));
                }
            }
        }
        return Some((char::REPLACEMENT_CHARACTER, 6));
    }
    if (0xDC00..0xE000).contains(&code) {
        return Some((char::REPLACEMENT_CHARACTER, 6));
    }
    char::from_u32(code).map(|c| (c, 6))
}

/// Read exactly `len` ASCII hex digits starting at `start`.
fn hex_digits(bytes: &[u8], start: usize, len: usize) -> Option<u32> {
    let digits = bytes.get(start..start + len)?;
    digits.iter().try_fold(0u32, |acc, &b| {
        let digit = (b as char).to_digit(16)?;
        Some(acc * 16 + digit)
    })
}

/// The short escape for `ch`, if it has one.
fn short_escape(ch: char) -> Option<&'static str> {
    Some(match ch {
        '\\' => "\\\\",
        '"' => "\\\"",
        '\x0c' => "\\f",
        '\x08' => "\\b",
        '\n' => "\\n",
        '\t' => "\\t",
        '\r' => "\\r",
        '\u{2028}' => "\\u2028",
        '\u{2029}' => "\\u2029",
        _ => return None,
    })
}

/// Write `s` to `out` with every unsafe character escaped.
pub fn write_escaped<W: fmt::Write + ?Sized>(s: &str, out: &mut W) -> fmt::Result {
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        let short = short_escape(ch);
        if short.is_none() && (ch as u32) >= 0x20 {
            continue;
        }
        out.write_str(&s[start..i])?;
        match short {
            Some(esc) => out.write_str(esc)?,
            None => write!(out, "\\x{:02x}", ch as u32)?,
        }
        start = i + ch.len_utf8();
    }
    out.write_str(&s[start..])
}

/// Append the escaped form of `s` to `out`.
pub fn escape_into(s: &str, out: &mut String) {
    // fmt::Write for String never fails.
    let _ = write_escaped(s, out);
}

/// Return the escaped form of `s` (without surrounding quotes).
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    escape_into(s, &mut out);
    out
}

/// A `fmt::Write` adapter that escapes everything written through it.
///
/// Renderers stream markup into this so that it lands in the output already
/// safe for a quoted string.
pub struct EscapingWriter<'a, W: fmt::Write + ?Sized> {
    inner: &'a mut W,
}

impl<'a, W: fmt::Write + ?Sized> EscapingWriter<'a, W> {
    pub fn new(inner: &'a mut W) -> Self {
        Self { inner }
    }
}

impl<W: fmt::Write + ?Sized> fmt::Write for EscapingWriter<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write_escaped(s, &mut *self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn unescape_short_escapes() {
        assert_eq!(unescape(r#"\n\t\\"#), "\n\t\\");
        assert_eq!(unescape(r#"\f\b\r\""#), "\x0c\x08\r\"");
    }

    #[test]
    fn unescape_hex_and_unicode() {
        assert_eq!(unescape(r"\x41\x7a"), "Az");
        assert_eq!(unescape(r"\u00e9\u4f60"), "\u{e9}\u{4f60}");
        assert_eq!(unescape(r"\u2028"), "\u{2028}");
    }

    #[test]
    fn unescape_surrogate_pair_joins() {
        assert_eq!(unescape(r"\ud83d\ude00"), "\u{1f600}");
    }

    #[test]
    fn unescape_lone_surrogate_is_replaced() {
        assert_eq!(unescape(r"a\ud83db"), "a\u{fffd}b");
        assert_eq!(unescape(r"\ude00"), "\u{fffd}");
    }

    #[test]
    fn unescape_unknown_sequences_pass_through() {
        assert_eq!(unescape(r"\/"), r"\/");
        assert_eq!(unescape(r"\q"), r"\q");
        assert_eq!(unescape(r"\x4"), r"\x4");
        assert_eq!(unescape(r"\u12g4"), r"\u12g4");
        assert_eq!(unescape("\\"), "\\");
    }

    #[test]
    fn unescape_is_single_pass() {
        // `\\` decodes to one backslash and the following `x41` stays literal.
        assert_eq!(unescape(r"\\x41"), r"\x41");
    }

    #[test]
    fn unescape_leaves_plain_text_alone() {
        assert_eq!(unescape("caf\u{e9} \u{4f60}"), "caf\u{e9} \u{4f60}");
    }

    #[test]
    fn escape_short_forms() {
        assert_eq!(escape("\n"), r"\n");
        assert_eq!(escape("a\"b\\c"), r#"a\"b\\c"#);
        assert_eq!(escape("\x0c\x08\t\r"), r"\f\b\t\r");
    }

    #[test]
    fn escape_other_controls_as_hex() {
        assert_eq!(escape("\x00\x01\x1f"), r"\x00\x01\x1f");
    }

    #[test]
    fn escape_line_separators() {
        assert_eq!(escape("a\u{2028}b\u{2029}c"), r"a\u2028b\u2029c");
    }

    #[test]
    fn escape_passes_other_text_through() {
        assert_eq!(escape("caf\u{e9} </ \u{7f}"), "caf\u{e9} </ \u{7f}");
    }

    #[test]
    fn escaping_writer_streams() {
        let mut out = String::new();
        {
            let mut w = EscapingWriter::new(&mut out);
            w.write_str("<p>\"hi\"").unwrap();
            write!(w, "{}", "\n</p>").unwrap();
        }
        assert_eq!(out, r#"<p>\"hi\"\n</p>"#);
    }
}
