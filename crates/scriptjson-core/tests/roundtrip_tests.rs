use num_bigint::BigInt;
use scriptjson_core::{parse, serialize, serialize_value, Node, Value};

/// Assert that serialize → parse returns the original value.
fn assert_roundtrip(value: Value) {
    let text = serialize_value(&value).expect("serialize failed");
    let decoded = parse(&text).expect("parse failed");
    assert_eq!(
        value, decoded,
        "Roundtrip failed:\n  value: {value:?}\n  text:  {text}\n  back:  {decoded:?}"
    );
}

/// Assert that strict JSON text survives parse → serialize unchanged in
/// meaning, using serde_json as the reference reader.
fn assert_json_roundtrip(json: &str) {
    let value = parse(json).expect("parse failed");
    let text = serialize_value(&value).expect("serialize failed");
    let original: serde_json::Value = serde_json::from_str(json).unwrap();
    let roundtripped: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        original, roundtripped,
        "Roundtrip failed:\n  input:  {json}\n  output: {text}"
    );
}

// ============================================================================
// Primitive Roundtrips
// ============================================================================

#[test]
fn roundtrip_null() {
    assert_roundtrip(Value::Null);
}

#[test]
fn roundtrip_bools() {
    assert_roundtrip(Value::Bool(true));
    assert_roundtrip(Value::Bool(false));
}

#[test]
fn roundtrip_integers() {
    assert_roundtrip(Value::from(0));
    assert_roundtrip(Value::from(-42));
    assert_roundtrip(Value::from(i64::MAX));
    assert_roundtrip(Value::from(i64::MIN));
}

#[test]
fn roundtrip_big_integers() {
    let big: BigInt = "-98765432109876543210987654321098765432109876543210".parse().unwrap();
    assert_roundtrip(Value::Integer(big));
}

#[test]
fn roundtrip_floats_stay_floats() {
    for x in [0.0, 1.0, -2.5, 0.1, 1e20, 1e-7, 123456.789, f64::MAX, f64::MIN_POSITIVE] {
        assert_roundtrip(Value::Float(x));
    }
}

#[test]
fn roundtrip_strings() {
    for s in [
        "",
        "plain",
        "quote \" and backslash \\",
        "lines\nand\ttabs\r",
        "\x00\x01\x1f\x7f",
        "form\x0cfeed\x08",
        "\u{2028}\u{2029}",
        "caf\u{e9} \u{4f60}\u{597d} \u{1f600}",
        "</script>",
    ] {
        assert_roundtrip(Value::from(s));
    }
}

// ============================================================================
// Container Roundtrips
// ============================================================================

#[test]
fn roundtrip_empty_containers() {
    assert_roundtrip(Value::Array(vec![]));
    assert_roundtrip(Value::Object(vec![]));
}

#[test]
fn roundtrip_nested() {
    let value = Value::Object(vec![
        (
            "users".to_string(),
            Value::Array(vec![Value::Object(vec![
                ("name".to_string(), Value::from("Alice")),
                ("score".to_string(), Value::Float(99.5)),
                ("tags".to_string(), Value::Array(vec![])),
            ])]),
        ),
        ("count".to_string(), Value::from(1)),
        ("key with \"quotes\"".to_string(), Value::Null),
    ]);
    assert_roundtrip(value);
}

#[test]
fn roundtrip_deep_nesting_within_limits() {
    let mut value = Value::from("leaf");
    for _ in 0..200 {
        value = Value::Array(vec![value]);
    }
    assert_roundtrip(value);
}

// ============================================================================
// Text Roundtrips
// ============================================================================

#[test]
fn json_documents_roundtrip() {
    assert_json_roundtrip(r#"{"a": [1, 2.5, "x"], "b": {"c": null, "d": false}}"#);
    assert_json_roundtrip(r#"[{"id": 1}, {"id": 2}, []]"#);
    assert_json_roundtrip(r#""Aé\n""#);
}

#[test]
fn commented_input_reserializes_compactly() {
    let value = parse("/* header */ { \"a\" : 1 , // note\n \"b\" : undefined }").unwrap();
    assert_eq!(serialize(&Node::from(&value)).unwrap(), r#"{"a":1,"b":null}"#);
}

#[test]
fn integer_exponent_reserializes_expanded() {
    let value = parse("12e3").unwrap();
    assert_eq!(value.to_script().unwrap(), "12000");
}
