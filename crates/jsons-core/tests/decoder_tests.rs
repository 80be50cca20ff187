/// Decoder contract tests: JSON object text → OrderedMap.
///
/// Covers key-order capture, duplicate-key relocation at every depth, number
/// unification, top-level kind rejection and structural failures.
use jsons_core::{decode, JsonsError, Kind, OrderedMap, Value};

fn keys(map: &OrderedMap) -> Vec<&str> {
    map.keys().collect()
}

fn object_at<'a>(map: &'a OrderedMap, key: &str) -> &'a OrderedMap {
    map.get(key)
        .and_then(Value::as_object)
        .unwrap_or_else(|| panic!("{key} is not an object"))
}

fn not_an_object_kind(input: &str) -> Kind {
    match decode(input) {
        Err(JsonsError::NotAnObject { kind }) => kind,
        other => panic!("expected NotAnObject for {input:?}, got {other:?}"),
    }
}

// ============================================================================
// Key order
// ============================================================================

#[test]
fn decode_keeps_source_key_order() {
    let map = decode(r#"{"zeta":1,"alpha":2,"mid":3}"#).unwrap();
    assert_eq!(keys(&map), ["zeta", "alpha", "mid"]);
}

#[test]
fn decode_keeps_nested_key_order() {
    let map = decode(r#"{"outer":{"b":1,"a":{"y":1,"x":2}}}"#).unwrap();
    let outer = object_at(&map, "outer");
    assert_eq!(keys(outer), ["b", "a"]);
    assert_eq!(keys(object_at(outer, "a")), ["y", "x"]);
}

#[test]
fn decode_keeps_key_order_of_objects_in_arrays() {
    let map = decode(r#"{"list":[{"b":1,"a":2},[{"d":1,"c":2}]]}"#).unwrap();
    let list = map.get("list").and_then(Value::as_array).unwrap();
    assert_eq!(keys(list[0].as_object().unwrap()), ["b", "a"]);
    let inner = list[1].as_array().unwrap();
    assert_eq!(keys(inner[0].as_object().unwrap()), ["d", "c"]);
}

#[test]
fn decode_empty_object() {
    let map = decode("{}").unwrap();
    assert!(map.is_empty());
}

#[test]
fn decode_allows_surrounding_whitespace() {
    let map = decode("\n  {\"a\" : 1 }\n\t").unwrap();
    assert_eq!(map.get("a"), Some(&Value::Number(1.0)));
}

// ============================================================================
// Duplicate keys
// ============================================================================

#[test]
fn duplicate_key_moves_to_last_occurrence() {
    let map = decode(r#"{"a":1,"b":2,"a":3}"#).unwrap();
    assert_eq!(keys(&map), ["b", "a"]);
    assert_eq!(map.get("a"), Some(&Value::Number(3.0)));
    assert_eq!(map.get("b"), Some(&Value::Number(2.0)));
}

#[test]
fn duplicate_key_discards_earlier_value_even_if_different_kind() {
    let map = decode(r#"{"a":{"x":1},"a":"replaced"}"#).unwrap();
    assert_eq!(keys(&map), ["a"]);
    assert_eq!(map.get("a"), Some(&Value::from("replaced")));
}

#[test]
fn duplicate_keys_relocate_inside_nested_objects() {
    let map = decode(r#"{"n":{"x":1,"y":2,"x":3,"z":4,"y":5}}"#).unwrap();
    let nested = object_at(&map, "n");
    assert_eq!(keys(nested), ["x", "z", "y"]);
    assert_eq!(nested.get("x"), Some(&Value::Number(3.0)));
    assert_eq!(nested.get("y"), Some(&Value::Number(5.0)));
}

#[test]
fn duplicate_keys_relocate_inside_array_elements() {
    let map = decode(r#"{"l":[{"k":1,"j":0,"k":2}]}"#).unwrap();
    let element = map.get("l").and_then(Value::as_array).unwrap()[0]
        .as_object()
        .unwrap();
    assert_eq!(keys(element), ["j", "k"]);
    assert_eq!(element.get("k"), Some(&Value::Number(2.0)));
}

/// `{"k0":0,...,"k{n-1}":n-1}` followed by every key once more, in `second`
/// order, holding `n + i`.
fn doubled_keys(n: usize, second: impl Iterator<Item = usize>) -> String {
    let first = (0..n).map(|i| format!(r#""k{i}":{i}"#));
    let again = second.map(|i| format!(r#""k{i}":{}"#, n + i));
    format!("{{{}}}", first.chain(again).collect::<Vec<_>>().join(","))
}

#[test]
fn large_object_with_every_key_repeated() {
    let n = 50_000;
    let map = decode(doubled_keys(n, 0..n)).unwrap();
    assert_eq!(map.len(), n);
    for (i, (key, value)) in map.iter().enumerate() {
        assert_eq!(key, format!("k{i}"));
        assert_eq!(value, &Value::Number((n + i) as f64));
    }
}

#[test]
fn large_object_repeated_in_reverse_takes_reverse_order() {
    let n = 50_000;
    let map = decode(doubled_keys(n, (0..n).rev())).unwrap();
    assert_eq!(map.len(), n);
    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(keys.first(), Some(&format!("k{}", n - 1).as_str()));
    assert_eq!(keys.last(), Some(&"k0"));
    assert_eq!(map.get("k0"), Some(&Value::Number(n as f64)));
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn decode_scalars() {
    let map = decode(r#"{"n":null,"t":true,"f":false,"s":"str","e":"","u":"café"}"#).unwrap();
    assert_eq!(map.get("n"), Some(&Value::Null));
    assert_eq!(map.get("t"), Some(&Value::Bool(true)));
    assert_eq!(map.get("f"), Some(&Value::Bool(false)));
    assert_eq!(map.get("s"), Some(&Value::from("str")));
    assert_eq!(map.get("e"), Some(&Value::from("")));
    assert_eq!(map.get("u"), Some(&Value::from("café")));
}

#[test]
fn integers_and_floats_decode_to_one_number_kind() {
    let map = decode(r#"{"i":3,"f":3.0,"neg":-2,"exp":1e3,"frac":0.25}"#).unwrap();
    assert_eq!(map.get("i"), map.get("f"));
    assert_eq!(map.get("neg"), Some(&Value::Number(-2.0)));
    assert_eq!(map.get("exp"), Some(&Value::Number(1000.0)));
    assert_eq!(map.get("frac"), Some(&Value::Number(0.25)));
}

#[test]
fn decode_escape_sequences() {
    let map = decode(r#"{"s":"line\nbreak \"quoted\" \\ tab\t"}"#).unwrap();
    assert_eq!(
        map.get("s"),
        Some(&Value::from("line\nbreak \"quoted\" \\ tab\t"))
    );
}

// ============================================================================
// Top-level kind rejection
// ============================================================================

#[test]
fn top_level_array_is_rejected() {
    assert_eq!(not_an_object_kind("[1,2,3]"), Kind::Array);
}

#[test]
fn top_level_number_is_rejected() {
    assert_eq!(not_an_object_kind("1"), Kind::Number);
    assert_eq!(not_an_object_kind("-0.5"), Kind::Number);
}

#[test]
fn top_level_bool_is_rejected() {
    assert_eq!(not_an_object_kind("true"), Kind::Bool);
    assert_eq!(not_an_object_kind("false"), Kind::Bool);
}

#[test]
fn top_level_string_is_rejected() {
    assert_eq!(not_an_object_kind(r#""s""#), Kind::String);
}

#[test]
fn top_level_null_is_rejected() {
    assert_eq!(not_an_object_kind("null"), Kind::Null);
}

#[test]
fn rejected_kinds_are_all_distinct() {
    let kinds: Vec<Kind> = ["[1,2,3]", "1", "true", r#""s""#, "null"]
        .iter()
        .map(|input| not_an_object_kind(input))
        .collect();
    for (i, a) in kinds.iter().enumerate() {
        for b in &kinds[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn rejection_message_names_the_kind() {
    let err = decode("[1]").unwrap_err();
    assert_eq!(err.to_string(), "cannot decode array into an object");
}

// ============================================================================
// Structural errors
// ============================================================================

fn assert_structural(input: &str) {
    match decode(input) {
        Err(JsonsError::Structural(_)) => {}
        other => panic!("expected Structural for {input:?}, got {other:?}"),
    }
}

#[test]
fn empty_input_is_structural() {
    assert_structural("");
    assert_structural("   \n");
}

#[test]
fn missing_close_brace_is_structural() {
    assert_structural(r#"{"a":1"#);
    assert_structural(r#"{"a":{"b":1}"#);
}

#[test]
fn non_string_key_is_structural() {
    assert_structural(r#"{1:2}"#);
}

#[test]
fn trailing_data_is_structural() {
    assert_structural(r#"{"a":1} {"b":2}"#);
    assert_structural(r#"{"a":1},"#);
}

#[test]
fn malformed_non_object_is_structural_not_a_kind() {
    assert_structural("[1,2");
    assert_structural("tru");
    assert_structural("<html>");
}

#[test]
fn trailing_comma_is_structural() {
    assert_structural(r#"{"a":1,}"#);
}
