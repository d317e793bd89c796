//! Parallel and sequential paths must produce identical trees and
//! equivalent errors.

use fastjson::{parse_with_config, ErrorKind, JsonValue, ParseConfig, ThreadCount};

fn big_array(len: usize) -> String {
    let items: Vec<String> = (0..len).map(|i| format!("{{\"i\": {i}}}")).collect();
    format!("[{}]", items.join(", "))
}

fn big_object(len: usize) -> String {
    let entries: Vec<String> = (0..len).map(|i| format!("\"k{i}\": [{i}, {}]", i * 2)).collect();
    format!("{{{}}}", entries.join(", "))
}

fn sequential_config() -> ParseConfig {
    ParseConfig::default().with_num_threads(ThreadCount::Disabled)
}

#[test]
fn large_array_parses_in_parallel() {
    let input = big_array(10_000);
    let config = ParseConfig::default().with_parallel_threshold(1_000);
    let value = parse_with_config(&input, &config).unwrap();
    let JsonValue::Array(items) = value else {
        panic!("expected array");
    };
    assert_eq!(items.len(), 10_000);
    assert_eq!(items[0]["i"], JsonValue::Number(0.0));
    assert_eq!(items[9_999]["i"], JsonValue::Number(9_999.0));
}

#[test]
fn parallel_and_sequential_trees_match() {
    let input = big_array(3_000);
    let parallel = ParseConfig::default().with_parallel_threshold(100);
    assert_eq!(
        parse_with_config(&input, &parallel).unwrap(),
        parse_with_config(&input, &sequential_config()).unwrap()
    );
}

#[test]
fn object_trees_match_across_paths() {
    let input = big_object(2_000);
    let parallel = ParseConfig::default().with_parallel_threshold(100);
    let a = parse_with_config(&input, &parallel).unwrap();
    let b = parse_with_config(&input, &sequential_config()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a["k0"][1], JsonValue::Number(0.0));
    assert_eq!(a["k1999"][0], JsonValue::Number(1999.0));
}

#[test]
fn element_order_is_preserved() {
    let input = big_array(5_000);
    let config = ParseConfig::default().with_parallel_threshold(100);
    let JsonValue::Array(items) = parse_with_config(&input, &config).unwrap() else {
        panic!("expected array");
    };
    for (index, item) in items.iter().enumerate() {
        assert_eq!(item["i"], JsonValue::Number(index as f64));
    }
}

#[test]
fn fixed_thread_count_parses() {
    let input = big_array(2_000);
    for threads in [1, 2, 8] {
        let config = ParseConfig::default()
            .with_num_threads(ThreadCount::Fixed(threads))
            .with_parallel_threshold(100);
        let JsonValue::Array(items) = parse_with_config(&input, &config).unwrap() else {
            panic!("expected array");
        };
        assert_eq!(items.len(), 2_000);
    }
}

#[test]
fn disabled_threads_still_parse_large_input() {
    let input = big_array(2_000);
    let JsonValue::Array(items) =
        parse_with_config(&input, &sequential_config()).unwrap() else {
        panic!("expected array");
    };
    assert_eq!(items.len(), 2_000);
}

#[test]
fn bad_element_fails_on_both_paths() {
    let mut items: Vec<String> = (0..2_000).map(|i| i.to_string()).collect();
    items[1_234] = "bogus".to_string();
    let input = format!("[{}]", items.join(","));

    let parallel = ParseConfig::default().with_parallel_threshold(100);
    let err = parse_with_config(&input, &parallel).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidSyntax);

    let err = parse_with_config(&input, &sequential_config()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidSyntax);
}

#[test]
fn first_error_by_position_wins() {
    // Two bad spans; the earlier one must be reported no matter which
    // worker finishes first.
    let mut items: Vec<String> = (0..2_000).map(|i| i.to_string()).collect();
    items[200] = "1.".to_string();
    items[1_900] = "@".to_string();
    let input = format!("[{}]", items.join(","));

    let config = ParseConfig::default().with_parallel_threshold(100);
    let err = parse_with_config(&input, &config).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidNumber);
}

#[test]
fn nested_large_arrays_parse() {
    // The outer array fans out; inner arrays stay on their worker.
    let inner = big_array(50);
    let items: Vec<String> = (0..1_000).map(|_| inner.clone()).collect();
    let input = format!("[{}]", items.join(","));
    let config = ParseConfig::default().with_parallel_threshold(100);
    let JsonValue::Array(outer) = parse_with_config(&input, &config).unwrap() else {
        panic!("expected array");
    };
    assert_eq!(outer.len(), 1_000);
    assert_eq!(outer[999][49]["i"], JsonValue::Number(49.0));
}

#[test]
fn parallel_error_positions_match_sequential() {
    let mut items: Vec<String> = (0..2_000).map(|i| i.to_string()).collect();
    items[500] = "tru".to_string();
    let input = format!("[{}]", items.join(",\n"));

    let parallel = ParseConfig::default().with_parallel_threshold(100);
    let seq_err = parse_with_config(&input, &sequential_config()).unwrap_err();
    let par_err = parse_with_config(&input, &parallel).unwrap_err();
    assert_eq!(par_err.kind, seq_err.kind);
    assert_eq!(par_err.line, seq_err.line);
    assert_eq!(par_err.column, seq_err.column);
}
