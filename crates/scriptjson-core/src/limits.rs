//! Resource limits applied while decoding and encoding.
//!
//! Decoding recurses once per nesting level and expands integer exponents
//! exactly, so both are bounded to keep hostile input from exhausting the
//! stack or memory.

/// Limits shared by the decoder and the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of arrays/objects.
    pub max_depth: usize,
    /// Maximum exponent accepted on an integer literal such as `1e400`.
    pub max_exponent: u32,
}

impl Limits {
    /// Tight limits for untrusted input.
    pub const fn strict() -> Self {
        Self {
            max_depth: 64,
            max_exponent: 512,
        }
    }

    /// Generous limits for trusted input.
    pub const fn lenient() -> Self {
        Self {
            max_depth: 4096,
            max_exponent: 1 << 16,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_exponent: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sits_between_presets() {
        let d = Limits::default();
        assert!(Limits::strict().max_depth < d.max_depth);
        assert!(d.max_depth < Limits::lenient().max_depth);
        assert!(Limits::strict().max_exponent < d.max_exponent);
        assert!(d.max_exponent < Limits::lenient().max_exponent);
    }
}
