/// Property-based roundtrip tests.
///
/// Generates random [`Value`] trees and checks that `parse(serialize(v)) == v`
/// for every one of them, plus a few properties of the encoder output.
///
/// Strategies generate:
/// - Arbitrary Unicode strings, biased toward characters that need escaping
/// - Integers across and beyond the 64-bit range
/// - Finite floats (the encoder rejects NaN and infinities)
/// - Objects with unique keys (duplicate keys collapse on decode)
/// - Nested arrays and objects up to 4 levels deep
use std::collections::BTreeMap;

use num_bigint::BigInt;
use proptest::prelude::*;
use scriptjson_core::{escape::escape, escape::unescape, parse, serialize_value, Value};

// ============================================================================
// Strategies
// ============================================================================

/// Strings mixing plain text with quotes, backslashes, controls and line
/// separators.
fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,30}",
        prop::string::string_regex("[\"\\\\/\\x00-\\x1f\u{2028}\u{2029}a-z]{0,20}").unwrap(),
        any::<String>(),
        Just(String::new()),
        Just("undefined".to_string()),
        Just("/* not a comment */".to_string()),
    ]
}

fn arb_integer() -> impl Strategy<Value = BigInt> {
    prop_oneof![
        any::<i64>().prop_map(BigInt::from),
        any::<i128>().prop_map(BigInt::from),
        (any::<i64>(), 0u32..60).prop_map(|(m, e)| BigInt::from(m) * BigInt::from(10u8).pow(e)),
    ]
}

fn arb_float() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>().prop_filter("finite", |x| x.is_finite()),
        (-1_000_000i64..1_000_000).prop_map(|n| n as f64 / 8.0),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_integer().prop_map(Value::Integer),
        arb_float().prop_map(Value::Float),
        arb_string().prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map(arb_string(), inner, 0..8)
                .prop_map(|map: BTreeMap<String, Value>| Value::Object(map.into_iter().collect())),
        ]
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn value_roundtrips(value in arb_value()) {
        let text = serialize_value(&value).unwrap();
        let decoded = parse(&text).unwrap();
        prop_assert_eq!(decoded, value, "text: {}", text);
    }

    #[test]
    fn escape_then_unescape_is_identity(s in arb_string()) {
        prop_assert_eq!(unescape(&escape(&s)), s);
    }

    #[test]
    fn escaped_text_has_no_raw_controls(s in arb_string()) {
        let escaped = escape(&s);
        prop_assert!(
            !escaped.chars().any(|c| (c as u32) < 0x20),
            "raw control character in {:?}",
            escaped
        );
        prop_assert!(
            !escaped.contains(['\u{2028}', '\u{2029}']),
            "raw line separator in {:?}",
            escaped
        );
    }

    #[test]
    fn encoder_output_is_single_line(value in arb_value()) {
        let text = serialize_value(&value).unwrap();
        prop_assert!(!text.contains(['\n', '\r']), "line break in {:?}", text);
    }

    #[test]
    fn integers_are_exact(n in arb_integer()) {
        let text = serialize_value(&Value::Integer(n.clone())).unwrap();
        prop_assert_eq!(text.clone(), n.to_string());
        prop_assert_eq!(parse(&text).unwrap(), Value::Integer(n));
    }

    #[test]
    fn parser_never_panics(text in "[\\[\\]{}:,\"\\\\ a-z0-9.eE+-/*]{0,40}") {
        let _ = parse(&text);
    }
}
