use fastjson::{parse, parse_with_config, ErrorKind, JsonValue, ParseConfig};

#[test]
fn document_with_mixed_values() {
    let value = parse(r#"{"a": 1, "b": [2, 3]}"#).unwrap();
    assert_eq!(value["a"], JsonValue::Number(1.0));
    assert_eq!(value["b"][0], JsonValue::Number(2.0));
    assert_eq!(value["b"][1], JsonValue::Number(3.0));
    match &value {
        JsonValue::Object(map) => assert_eq!(map.len(), 2),
        other => panic!("expected object, got {other:?}"),
    }
}

#[test]
fn truncated_object_reports_unexpected_end() {
    let err = parse(r#"{"a":"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnexpectedEnd);
}

#[test]
fn lone_quote_reports_invalid_string() {
    let err = parse("\"").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidString);
    assert_eq!(err.line, 1);
}

#[test]
fn depth_over_limit_rejected() {
    let deep = "[".repeat(1001) + &"]".repeat(1001);
    let err = parse(&deep).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MaxDepthExceeded);
}

#[test]
fn depth_at_limit_accepted() {
    let deep = "[".repeat(1000) + &"]".repeat(1000);
    assert!(parse(&deep).is_ok());
}

#[test]
fn whitespace_only_is_empty_input() {
    let err = parse(" \t\r\n ").unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmptyInput);
}

#[test]
fn trailing_tokens_rejected() {
    let err = parse("[1, 2] extra").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExtraTokens);
}

#[test]
fn duplicate_keys_last_wins() {
    let value = parse(r#"{"k": "first", "k": "second"}"#).unwrap();
    assert_eq!(value["k"], JsonValue::String("second".into()));
}

#[test]
fn surrogate_pair_round_trips() {
    let value = parse(r#""😀""#).unwrap();
    assert_eq!(value, JsonValue::String("\u{1F600}".into()));
}

#[test]
fn unpaired_surrogate_rejected() {
    let err = parse(r#""\uD83D""#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidUnicode);
}

#[test]
fn error_location_spans_lines() {
    let err = parse("{\n  \"a\": 1,\n  \"b\": @\n}").unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(err.column, 8);
}

#[test]
fn numbers_parse_to_f64() {
    let value = parse("[0, -0, 1e10, -2.5E-3, 123456789.0]").unwrap();
    let JsonValue::Array(items) = value else {
        panic!("expected array");
    };
    assert_eq!(items[2], JsonValue::Number(1e10));
    assert_eq!(items[3], JsonValue::Number(-2.5e-3));
}

#[test]
fn scalar_only_config_matches_default() {
    let scalar = ParseConfig::default().with_simd(false);
    let input = r#"{"text": "héllo\nworld", "nums": [1.5, 2e3], "flag": true}"#;
    assert_eq!(
        parse(input).unwrap(),
        parse_with_config(input, &scalar).unwrap()
    );
}

#[test]
fn empty_containers() {
    assert_eq!(parse("[]").unwrap(), JsonValue::Array(Vec::new()));
    assert_eq!(parse("[ ]").unwrap(), JsonValue::Array(Vec::new()));
    let value = parse("{ }").unwrap();
    match value {
        JsonValue::Object(map) => assert!(map.is_empty()),
        other => panic!("expected object, got {other:?}"),
    }
}

#[test]
fn index_misses_return_null() {
    let value = parse(r#"{"a": [1]}"#).unwrap();
    assert_eq!(value["missing"], JsonValue::Null);
    assert_eq!(value["a"][5], JsonValue::Null);
}
