/// Encoder contract tests: OrderedMap → JSON object text.
use jsons_core::{decode, encode, encode_pretty, JsonsError, OrderedMap, Value};

fn encode_str(map: &OrderedMap) -> String {
    String::from_utf8(encode(map).expect("encode failed")).expect("output is UTF-8")
}

/// Decode then encode, returning the compact text.
fn reencode(json: &str) -> String {
    encode_str(&decode(json).expect("decode failed"))
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn encode_empty_object() {
    assert_eq!(encode_str(&OrderedMap::new()), "{}");
}

#[test]
fn encode_follows_insertion_order() {
    let mut map = OrderedMap::new();
    map.set("z", Value::from(1));
    map.set("a", Value::from(2));
    map.set("m", Value::from(3));
    assert_eq!(encode_str(&map), r#"{"z":1,"a":2,"m":3}"#);
}

#[test]
fn overwrite_keeps_position_in_output() {
    let mut map = OrderedMap::new();
    map.set("a", Value::from(1));
    map.set("b", Value::from(2));
    map.set("a", Value::from(9));
    assert_eq!(encode_str(&map), r#"{"a":9,"b":2}"#);
}

#[test]
fn removed_key_is_absent_from_output() {
    let mut map = OrderedMap::new();
    map.set("a", Value::from(1));
    map.set("b", Value::from(2));
    map.remove("a");
    map.set("a", Value::from(3));
    assert_eq!(encode_str(&map), r#"{"b":2,"a":3}"#);
}

#[test]
fn nested_objects_and_arrays_keep_order() {
    assert_eq!(
        reencode(r#"{"b":{"y":[{"q":1,"p":2}],"x":null},"a":[]}"#),
        r#"{"b":{"y":[{"q":1,"p":2}],"x":null},"a":[]}"#
    );
}

#[test]
fn duplicate_key_is_written_at_last_position() {
    assert_eq!(reencode(r#"{"a":1,"b":2,"a":3}"#), r#"{"b":2,"a":3}"#);
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn integers_stay_integers() {
    assert_eq!(reencode(r#"{"a":1,"b":-42,"c":1.0,"d":0}"#), r#"{"a":1,"b":-42,"c":1,"d":0}"#);
}

#[test]
fn fractions_are_preserved() {
    assert_eq!(reencode(r#"{"a":3.14,"b":-0.5}"#), r#"{"a":3.14,"b":-0.5}"#);
}

#[test]
fn html_characters_are_not_escaped() {
    assert_eq!(
        reencode(r#"{"h":"<tag attr='v'>a & b</tag>"}"#),
        r#"{"h":"<tag attr='v'>a & b</tag>"}"#
    );
}

#[test]
fn required_escapes_are_applied() {
    let mut map = OrderedMap::new();
    map.set("s", Value::from("quote\" backslash\\ newline\n"));
    assert_eq!(encode_str(&map), r#"{"s":"quote\" backslash\\ newline\n"}"#);
}

#[test]
fn unicode_is_written_verbatim() {
    assert_eq!(reencode(r#"{"k":"你好 café"}"#), r#"{"k":"你好 café"}"#);
}

#[test]
fn keys_are_escaped_like_strings() {
    let mut map = OrderedMap::new();
    map.set("we\"ird", Value::Null);
    assert_eq!(encode_str(&map), r#"{"we\"ird":null}"#);
}

// ============================================================================
// Failures and pretty output
// ============================================================================

#[test]
fn infinite_number_fails_to_encode() {
    let mut map = OrderedMap::new();
    map.set("list", Value::Array(vec![Value::Number(f64::INFINITY)]));
    assert!(matches!(encode(&map), Err(JsonsError::Serialization(_))));
}

#[test]
fn pretty_output_with_custom_indent() {
    let map = decode(r#"{"a":{"b":1},"c":[true]}"#).unwrap();
    let out = String::from_utf8(encode_pretty(&map, "\t").unwrap()).unwrap();
    assert_eq!(out, "{\n\t\"a\": {\n\t\t\"b\": 1\n\t},\n\t\"c\": [\n\t\ttrue\n\t]\n}");
}

#[test]
fn pretty_output_decodes_back_to_same_tree() {
    let map = decode(r#"{"z":[1,{"y":2,"x":3}],"a":"s"}"#).unwrap();
    let pretty = encode_pretty(&map, "    ").unwrap();
    assert_eq!(decode(pretty).unwrap(), map);
}
