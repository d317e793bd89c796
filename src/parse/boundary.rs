//! Structural boundary scanning.
//!
//! Splits the body of an array or object into spans that can be parsed
//! independently, tracking string state, escapes, and nesting depth but
//! never validating value syntax. `None` means the splitter could not
//! find a well-formed shape; the caller then takes the sequential path,
//! which reports the precise error.

use smallvec::SmallVec;

use crate::simd::Backend;

/// Half-open byte range into the input buffer. Never owns bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
}

pub(crate) type SpanList = SmallVec<[Span; 16]>;
pub(crate) type EntryList = SmallVec<[(Span, Span); 16]>;

/// Element spans of an array body plus the offset of its `]`.
#[derive(Debug)]
pub(crate) struct ArrayLayout {
    pub elements: SpanList,
    pub close: usize,
}

/// Key/value span pairs of an object body plus the offset of its `}`.
/// Key spans cover the quoted key including both quotes.
#[derive(Debug)]
pub(crate) struct ObjectLayout {
    pub entries: EntryList,
    pub close: usize,
}

/// Jump from just after an opening quote to just after the closing quote,
/// honoring `\` escapes. Control bytes inside the string do not stop the
/// scan; the value parser rejects them later.
fn skip_string_body(input: &[u8], backend: Backend, mut pos: usize) -> Option<usize> {
    loop {
        let hit = backend.find_string_terminator(input, pos);
        if hit >= input.len() {
            return None;
        }
        match input[hit] {
            b'\\' => {
                if hit + 1 >= input.len() {
                    return None;
                }
                pos = hit + 2;
            }
            b'"' => return Some(hit + 1),
            _ => pos = hit + 1,
        }
    }
}

/// Scan an array body beginning just after its `[`. Emits one span per
/// top-level element; spans include surrounding whitespace.
pub(crate) fn scan_array(input: &[u8], start: usize, backend: Backend) -> Option<ArrayLayout> {
    let mut elements = SpanList::new();
    let mut pos = start;
    let mut element_start = start;
    let mut depth = 0usize;

    while pos < input.len() {
        match input[pos] {
            b'"' => pos = skip_string_body(input, backend, pos + 1)?,
            b'[' | b'{' => {
                depth += 1;
                pos += 1;
            }
            b']' => {
                if depth == 0 {
                    if element_start < pos {
                        elements.push(Span {
                            start: element_start,
                            end: pos,
                        });
                    }
                    return Some(ArrayLayout {
                        elements,
                        close: pos,
                    });
                }
                depth -= 1;
                pos += 1;
            }
            b'}' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                pos += 1;
            }
            b',' => {
                if depth == 0 {
                    elements.push(Span {
                        start: element_start,
                        end: pos,
                    });
                    element_start = pos + 1;
                }
                pos += 1;
            }
            _ => pos += 1,
        }
    }

    None
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ObjectState {
    NeedKey,
    NeedColon,
    NeedValue,
}

/// Scan an object body beginning just after its `{`. Emits one
/// `(key_span, value_span)` pair per top-level entry.
pub(crate) fn scan_object(input: &[u8], start: usize, backend: Backend) -> Option<ObjectLayout> {
    let mut entries = EntryList::new();
    let mut pos = start;
    let mut depth = 0usize;
    let mut state = ObjectState::NeedKey;
    let mut key = Span { start: 0, end: 0 };
    let mut value_start = 0usize;

    while pos < input.len() {
        let byte = input[pos];

        if matches!(byte, b' ' | b'\t' | b'\n' | b'\r') {
            pos += 1;
            continue;
        }

        match byte {
            b'"' => match state {
                ObjectState::NeedKey => {
                    let close = skip_string_body(input, backend, pos + 1)?;
                    key = Span {
                        start: pos,
                        end: close,
                    };
                    pos = close;
                    state = ObjectState::NeedColon;
                }
                ObjectState::NeedValue => {
                    pos = skip_string_body(input, backend, pos + 1)?;
                }
                ObjectState::NeedColon => return None,
            },
            b':' => {
                if state == ObjectState::NeedColon && depth == 0 {
                    value_start = pos + 1;
                    state = ObjectState::NeedValue;
                }
                pos += 1;
            }
            b'[' | b'{' => {
                if state != ObjectState::NeedValue {
                    return None;
                }
                depth += 1;
                pos += 1;
            }
            b']' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                pos += 1;
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    pos += 1;
                } else {
                    // Top-level close: only legal while finishing a value
                    // (a trailing comma or dangling key is malformed).
                    if state != ObjectState::NeedValue {
                        return None;
                    }
                    entries.push((
                        key,
                        Span {
                            start: value_start,
                            end: pos,
                        },
                    ));
                    return Some(ObjectLayout {
                        entries,
                        close: pos,
                    });
                }
            }
            b',' => {
                if depth == 0 {
                    if state != ObjectState::NeedValue {
                        return None;
                    }
                    entries.push((
                        key,
                        Span {
                            start: value_start,
                            end: pos,
                        },
                    ));
                    state = ObjectState::NeedKey;
                }
                pos += 1;
            }
            _ => {
                if state != ObjectState::NeedValue {
                    return None;
                }
                pos += 1;
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn backend() -> Backend {
        Backend::select(&crate::ParseConfig::default())
    }

    fn array_spans(body: &str) -> Option<(Vec<&str>, usize)> {
        let layout = scan_array(body.as_bytes(), 0, backend())?;
        let spans = layout
            .elements
            .iter()
            .map(|s| &body[s.start..s.end])
            .collect();
        Some((spans, layout.close))
    }

    fn object_entries(body: &str) -> Option<Vec<(&str, &str)>> {
        let layout = scan_object(body.as_bytes(), 0, backend())?;
        Some(
            layout
                .entries
                .iter()
                .map(|(k, v)| (&body[k.start..k.end], &body[v.start..v.end]))
                .collect(),
        )
    }

    #[test]
    fn splits_flat_array() {
        let (spans, close) = array_spans("1, 2, 3]").unwrap();
        assert_eq!(spans, vec!["1", " 2", " 3"]);
        assert_eq!(close, 7);
    }

    #[test]
    fn nested_containers_stay_whole() {
        let (spans, _) = array_spans("[1,2], {\"a\":3}, 4]").unwrap();
        assert_eq!(spans, vec!["[1,2]", " {\"a\":3}", " 4"]);
    }

    #[rstest]
    #[case("\"a,b\", \"c]d\"]", vec!["\"a,b\"", " \"c]d\""])]
    #[case("\"esc\\\"aped,\", 1]", vec!["\"esc\\\"aped,\"", " 1"])]
    fn commas_and_brackets_inside_strings_are_ignored(
        #[case] body: &str,
        #[case] expected: Vec<&str>,
    ) {
        let (spans, _) = array_spans(body).unwrap();
        assert_eq!(spans, expected);
    }

    #[test]
    fn unterminated_array_yields_none() {
        assert!(array_spans("1, 2").is_none());
        assert!(array_spans("\"open").is_none());
    }

    #[test]
    fn splits_object_pairs() {
        let entries = object_entries("\"a\": 1, \"b\": [2, 3]}").unwrap();
        assert_eq!(
            entries,
            vec![("\"a\"", " 1"), ("\"b\"", " [2, 3]")]
        );
    }

    #[test]
    fn object_key_spans_include_quotes() {
        let entries = object_entries("\"k\\\"ey\": null}").unwrap();
        assert_eq!(entries[0].0, "\"k\\\"ey\"");
    }

    #[test]
    fn malformed_object_yields_none() {
        assert!(object_entries("\"a\" 1}").is_none()); // missing colon
        assert!(object_entries("\"a\": 1,}").is_none()); // trailing comma
        assert!(object_entries("\"a\": 1").is_none()); // no close
        assert!(object_entries("1: 2}").is_none()); // unquoted key
    }

    #[test]
    fn deeply_nested_value_span() {
        let entries = object_entries("\"a\": {\"b\": {\"c\": [1, {\"d\": 2}]}}}").unwrap();
        assert_eq!(entries[0].1, " {\"b\": {\"c\": [1, {\"d\": 2}]}}");
    }
}
