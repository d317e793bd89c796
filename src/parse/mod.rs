//! Recursive descent parsing over a bounded byte slice.
//!
//! The same parser drives both the whole-document path and the per-span
//! workers: a span parser is seeded with the span's starting line and
//! column so its errors point into the original document.

#[cfg(feature = "parallel")]
pub(crate) mod boundary;
#[cfg(feature = "parallel")]
pub(crate) mod parallel;

use std::collections::HashMap;

use crate::config::ParseConfig;
#[cfg(feature = "parallel")]
use crate::config::ThreadCount;
use crate::error::{ErrorKind, ParseError};
#[cfg(feature = "parallel")]
use crate::simd::scalar;
use crate::simd::Backend;
use crate::unicode;
use crate::value::JsonValue;

#[cfg(feature = "parallel")]
use boundary::Span;

type Result<T> = std::result::Result<T, ParseError>;

/// Line and 1-based column of the byte at `offset`.
#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
pub(crate) fn line_col_at(input: &[u8], offset: usize) -> (usize, usize) {
    let prefix = &input[..offset];
    let line = memchr::memchr_iter(b'\n', prefix).count() + 1;
    let column = match memchr::memrchr(b'\n', prefix) {
        Some(newline) => offset - newline,
        None => offset + 1,
    };
    (line, column)
}

pub(crate) struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    end: usize,
    line: usize,
    column: usize,
    depth: usize,
    config: &'a ParseConfig,
    backend: Backend,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    nested: bool,
}

/// Parse a complete document: exactly one value, surrounded only by
/// whitespace.
pub(crate) fn parse_document(input: &[u8], config: &ParseConfig) -> Result<JsonValue> {
    let backend = Backend::select(config);
    let mut parser = Parser {
        input,
        pos: 0,
        end: input.len(),
        line: 1,
        column: 1,
        depth: 0,
        config,
        backend,
        nested: false,
    };
    parser.skip_ws();
    if parser.at_end() {
        return Err(parser.error(ErrorKind::EmptyInput, "empty input"));
    }
    let value = parser.parse_value()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error(ErrorKind::ExtraTokens, "unexpected characters after JSON value"));
    }
    Ok(value)
}

/// Parse one element span produced by the boundary scanner. The span must
/// contain exactly one value.
#[cfg(feature = "parallel")]
pub(crate) fn parse_span(
    input: &[u8],
    span: Span,
    config: &ParseConfig,
    backend: Backend,
    depth: usize,
) -> Result<JsonValue> {
    let trimmed = trim_span(input, span, backend);
    let mut parser = Parser::for_span(input, trimmed, config, backend, depth);
    let value = parser.parse_value()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error(ErrorKind::InvalidSyntax, "unexpected characters after value"));
    }
    Ok(value)
}

/// Parse an object key span. The span covers the quoted key exactly.
#[cfg(feature = "parallel")]
pub(crate) fn parse_key_span(
    input: &[u8],
    span: Span,
    config: &ParseConfig,
    backend: Backend,
    depth: usize,
) -> Result<String> {
    let mut parser = Parser::for_span(input, span, config, backend, depth);
    parser.parse_string()
}

#[cfg(feature = "parallel")]
fn trim_span(input: &[u8], span: Span, backend: Backend) -> Span {
    let start = backend.skip_whitespace(&input[..span.end], span.start);
    let mut end = span.end;
    while end > start && scalar::is_whitespace(input[end - 1]) {
        end -= 1;
    }
    Span { start, end }
}

impl<'a> Parser<'a> {
    #[cfg(feature = "parallel")]
    fn for_span(
        input: &'a [u8],
        span: Span,
        config: &'a ParseConfig,
        backend: Backend,
        depth: usize,
    ) -> Self {
        let (line, column) = line_col_at(input, span.start);
        Parser {
            input,
            pos: span.start,
            end: span.end,
            line,
            column,
            depth,
            config,
            backend,
            nested: true,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.end
    }

    fn peek(&self) -> Option<u8> {
        if self.pos < self.end {
            Some(self.input[self.pos])
        } else {
            None
        }
    }

    fn advance(&mut self) -> Option<u8> {
        if self.pos >= self.end {
            return None;
        }
        let byte = self.input[self.pos];
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(byte)
    }

    /// Jump to `next`, keeping line and column accurate across the
    /// skipped region.
    fn advance_to(&mut self, next: usize) {
        let region = &self.input[self.pos..next];
        let newlines = memchr::memchr_iter(b'\n', region).count();
        if newlines > 0 {
            self.line += newlines;
            if let Some(last) = memchr::memrchr(b'\n', region) {
                self.column = region.len() - last;
            }
        } else {
            self.column += region.len();
        }
        self.pos = next;
    }

    fn skip_ws(&mut self) {
        let next = self.backend.skip_whitespace(&self.input[..self.end], self.pos);
        self.advance_to(next);
    }

    fn error(&self, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, message, self.line, self.column)
    }

    fn parse_value(&mut self) -> Result<JsonValue> {
        if self.depth >= self.config.max_depth {
            return Err(self.error(ErrorKind::MaxDepthExceeded, "maximum nesting depth exceeded"));
        }
        self.skip_ws();
        let Some(byte) = self.peek() else {
            return Err(self.error(ErrorKind::UnexpectedEnd, "unexpected end of input"));
        };
        match byte {
            b'n' => self.parse_literal(b"null", JsonValue::Null, "invalid null literal"),
            b't' => self.parse_literal(b"true", JsonValue::Boolean(true), "invalid true literal"),
            b'f' => self.parse_literal(b"false", JsonValue::Boolean(false), "invalid false literal"),
            b'"' => self.parse_string().map(JsonValue::String),
            b'[' => self.parse_array(),
            b'{' => self.parse_object(),
            b'-' | b'0'..=b'9' => self.parse_number(),
            other => Err(self.error(
                ErrorKind::InvalidSyntax,
                format!("unexpected character '{}'", other.escape_ascii()),
            )),
        }
    }

    fn parse_literal(
        &mut self,
        literal: &'static [u8],
        value: JsonValue,
        message: &'static str,
    ) -> Result<JsonValue> {
        if self.backend.match_literal(&self.input[..self.end], self.pos, literal) {
            self.pos += literal.len();
            self.column += literal.len();
            Ok(value)
        } else {
            Err(self.error(ErrorKind::InvalidLiteral, message))
        }
    }

    fn parse_number(&mut self) -> Result<JsonValue> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.advance();
        }
        match self.peek() {
            Some(b'0') => {
                self.advance();
            }
            Some(b'1'..=b'9') => {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.advance();
                }
            }
            _ => return Err(self.error(ErrorKind::InvalidNumber, "invalid number format")),
        }
        if self.peek() == Some(b'.') {
            self.advance();
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error(ErrorKind::InvalidNumber, "expected digit after decimal point"));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.advance();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.advance();
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.error(ErrorKind::InvalidNumber, "expected digit in exponent"));
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.advance();
            }
        }
        if !self.backend.validate_number_chars(self.input, start, self.pos) {
            return Err(self.error(ErrorKind::InvalidNumber, "invalid character in number"));
        }
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error(ErrorKind::InvalidNumber, "invalid number format"))?;
        let number: f64 = text
            .parse()
            .map_err(|_| self.error(ErrorKind::InvalidNumber, "failed to parse number"))?;
        Ok(JsonValue::Number(number))
    }

    fn parse_string(&mut self) -> Result<String> {
        if self.advance() != Some(b'"') {
            return Err(self.error(ErrorKind::InvalidString, "expected opening quote"));
        }
        let mut out: Vec<u8> = Vec::new();
        loop {
            let special = self
                .backend
                .find_string_terminator(&self.input[..self.end], self.pos);
            if special > self.pos {
                out.extend_from_slice(&self.input[self.pos..special]);
                self.column += special - self.pos;
                self.pos = special;
            }
            if out.len() > self.config.max_string_length {
                return Err(self.error(ErrorKind::InvalidString, "string exceeds maximum length"));
            }
            if self.pos >= self.end {
                return Err(self.error(ErrorKind::InvalidString, "unterminated string"));
            }
            match self.input[self.pos] {
                b'"' => {
                    self.advance();
                    if !self.backend.validate_utf8(&out) {
                        return Err(self.error(
                            ErrorKind::InvalidString,
                            "invalid utf-8 encoding in string",
                        ));
                    }
                    return String::from_utf8(out).map_err(|_| {
                        self.error(ErrorKind::InvalidString, "invalid utf-8 encoding in string")
                    });
                }
                b'\\' => {
                    self.advance();
                    let Some(escaped) = self.advance() else {
                        return Err(
                            self.error(ErrorKind::InvalidString, "unterminated escape sequence")
                        );
                    };
                    match escaped {
                        b'"' => out.push(b'"'),
                        b'\\' => out.push(b'\\'),
                        b'/' => out.push(b'/'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0C),
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'u' => {
                            let consumed =
                                unicode::decode_escape(&self.input[..self.end], self.pos, &mut out)
                                    .map_err(|msg| self.error(ErrorKind::InvalidUnicode, msg))?;
                            self.pos += consumed;
                            self.column += consumed;
                        }
                        _ => {
                            return Err(
                                self.error(ErrorKind::InvalidEscape, "invalid escape sequence")
                            )
                        }
                    }
                }
                _ => {
                    return Err(self.error(ErrorKind::InvalidString, "control character in string"));
                }
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn parallel_allowed(&self) -> bool {
        !self.nested && self.config.num_threads != ThreadCount::Disabled
    }

    fn parse_array(&mut self) -> Result<JsonValue> {
        self.advance();
        self.depth += 1;
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.advance();
            self.depth -= 1;
            return Ok(JsonValue::Array(Vec::new()));
        }

        #[cfg(feature = "parallel")]
        if self.parallel_allowed() {
            if let Some(layout) =
                boundary::scan_array(&self.input[..self.end], self.pos, self.backend)
            {
                if layout.elements.len() >= self.config.span_threshold() {
                    let items = parallel::parse_array_spans(
                        self.input,
                        &layout.elements,
                        self.config,
                        self.backend,
                        self.depth,
                    )?;
                    self.advance_to(layout.close + 1);
                    self.depth -= 1;
                    return Ok(JsonValue::Array(items));
                }
            }
        }

        self.parse_array_sequential()
    }

    fn parse_array_sequential(&mut self) -> Result<JsonValue> {
        let mut items = Vec::new();
        loop {
            let value = self.parse_value()?;
            items.push(value);
            self.skip_ws();
            match self.peek() {
                Some(b']') => {
                    self.advance();
                    break;
                }
                Some(b',') => {
                    self.advance();
                }
                Some(_) => {
                    return Err(self.error(ErrorKind::InvalidSyntax, "expected ',' or ']' in array"))
                }
                None => {
                    return Err(
                        self.error(ErrorKind::UnexpectedEnd, "unexpected end of input in array")
                    )
                }
            }
        }
        self.depth -= 1;
        Ok(JsonValue::Array(items))
    }

    fn parse_object(&mut self) -> Result<JsonValue> {
        self.advance();
        self.depth += 1;
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.advance();
            self.depth -= 1;
            return Ok(JsonValue::Object(HashMap::new()));
        }

        #[cfg(feature = "parallel")]
        if self.parallel_allowed() {
            if let Some(layout) =
                boundary::scan_object(&self.input[..self.end], self.pos, self.backend)
            {
                if layout.entries.len() >= self.config.span_threshold() {
                    let map = parallel::parse_object_spans(
                        self.input,
                        &layout.entries,
                        self.config,
                        self.backend,
                        self.depth,
                    )?;
                    self.advance_to(layout.close + 1);
                    self.depth -= 1;
                    return Ok(JsonValue::Object(map));
                }
            }
        }

        self.parse_object_sequential()
    }

    fn parse_object_sequential(&mut self) -> Result<JsonValue> {
        let mut map = HashMap::new();
        loop {
            self.skip_ws();
            if self.peek() != Some(b'"') {
                return Err(self.error(ErrorKind::InvalidSyntax, "expected string key in object"));
            }
            let key = self.parse_string()?;
            self.skip_ws();
            if self.peek() != Some(b':') {
                return Err(self.error(ErrorKind::InvalidSyntax, "expected ':' after object key"));
            }
            self.advance();
            let value = self.parse_value()?;
            // Duplicate keys: last occurrence wins.
            map.insert(key, value);
            self.skip_ws();
            match self.peek() {
                Some(b'}') => {
                    self.advance();
                    break;
                }
                Some(b',') => {
                    self.advance();
                }
                Some(_) => {
                    return Err(
                        self.error(ErrorKind::InvalidSyntax, "expected ',' or '}' in object")
                    )
                }
                None => {
                    return Err(
                        self.error(ErrorKind::UnexpectedEnd, "unexpected end of input in object")
                    )
                }
            }
        }
        self.depth -= 1;
        Ok(JsonValue::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse(input: &str) -> Result<JsonValue> {
        parse_document(input.as_bytes(), &ParseConfig::default())
    }

    fn parse_err(input: &str) -> ParseError {
        parse(input).unwrap_err()
    }

    #[rstest]
    #[case("null", JsonValue::Null)]
    #[case("true", JsonValue::Boolean(true))]
    #[case("false", JsonValue::Boolean(false))]
    #[case("0", JsonValue::Number(0.0))]
    #[case("-0", JsonValue::Number(-0.0))]
    #[case("42", JsonValue::Number(42.0))]
    #[case("-17.5", JsonValue::Number(-17.5))]
    #[case("6.02e23", JsonValue::Number(6.02e23))]
    #[case("1E-3", JsonValue::Number(0.001))]
    #[case("\"\"", JsonValue::String(String::new()))]
    #[case("\"hi\"", JsonValue::String("hi".into()))]
    fn scalars(#[case] input: &str, #[case] expected: JsonValue) {
        assert_eq!(parse(input).unwrap(), expected);
    }

    #[rstest]
    #[case("\"a\\nb\"", "a\nb")]
    #[case("\"a\\\"b\"", "a\"b")]
    #[case("\"\\\\\"", "\\")]
    #[case("\"\\u0041\"", "A")]
    #[case("\"\\u00e9\"", "\u{e9}")]
    #[case("\"tab\\tend\"", "tab\tend")]
    fn string_escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse(input).unwrap(), JsonValue::String(expected.into()));
    }

    #[test]
    fn arrays_and_objects_nest() {
        let value = parse("{\"a\": 1, \"b\": [2, 3, {\"c\": null}]}").unwrap();
        assert_eq!(value["a"], JsonValue::Number(1.0));
        assert_eq!(value["b"][2]["c"], JsonValue::Null);
    }

    #[test]
    fn whitespace_everywhere() {
        let value = parse(" \t\n[ 1 ,\r\n 2 ] \n").unwrap();
        assert_eq!(
            value,
            JsonValue::Array(vec![JsonValue::Number(1.0), JsonValue::Number(2.0)])
        );
    }

    #[rstest]
    #[case("", ErrorKind::EmptyInput)]
    #[case("   \n\t ", ErrorKind::EmptyInput)]
    #[case("1 2", ErrorKind::ExtraTokens)]
    #[case("null null", ErrorKind::ExtraTokens)]
    #[case("nul", ErrorKind::InvalidLiteral)]
    #[case("tru", ErrorKind::InvalidLiteral)]
    #[case("falsy", ErrorKind::InvalidLiteral)]
    #[case("{\"a\":", ErrorKind::UnexpectedEnd)]
    #[case("[1,", ErrorKind::UnexpectedEnd)]
    #[case("\"", ErrorKind::InvalidString)]
    #[case("\"abc", ErrorKind::InvalidString)]
    #[case("\"bad\\q\"", ErrorKind::InvalidEscape)]
    #[case("\"\\uZZZZ\"", ErrorKind::InvalidUnicode)]
    #[case("01", ErrorKind::ExtraTokens)]
    #[case("1.", ErrorKind::InvalidNumber)]
    #[case("1e", ErrorKind::InvalidNumber)]
    #[case("-", ErrorKind::InvalidNumber)]
    #[case("@", ErrorKind::InvalidSyntax)]
    #[case("[1 2]", ErrorKind::InvalidSyntax)]
    #[case("{1: 2}", ErrorKind::InvalidSyntax)]
    #[case("{\"a\" 1}", ErrorKind::InvalidSyntax)]
    fn rejects(#[case] input: &str, #[case] kind: ErrorKind) {
        assert_eq!(parse_err(input).kind, kind);
    }

    #[test]
    fn error_positions_track_newlines() {
        let err = parse_err("[1,\n 2,\n @]");
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 2);
    }

    #[test]
    fn raw_control_byte_in_string_rejected() {
        let err = parse_document(b"\"a\x01b\"", &ParseConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidString);
    }

    #[test]
    fn invalid_utf8_in_string_rejected() {
        let err = parse_document(b"\"\xC0\xAF\"", &ParseConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidString);
    }

    #[test]
    fn surrogate_pair_escape_decodes() {
        let value = parse("\"\\uD83D\\uDE00\"").unwrap();
        assert_eq!(value, JsonValue::String("\u{1F600}".into()));
    }

    #[test]
    fn depth_limit_is_exact() {
        let config = ParseConfig::default().with_max_depth(4);
        let ok = "[".repeat(4) + &"]".repeat(4);
        assert!(parse_document(ok.as_bytes(), &config).is_ok());
        let deep = "[".repeat(5) + &"]".repeat(5);
        let err = parse_document(deep.as_bytes(), &config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MaxDepthExceeded);
    }

    #[test]
    fn duplicate_keys_keep_last() {
        let value = parse("{\"k\": 1, \"k\": 2}").unwrap();
        assert_eq!(value["k"], JsonValue::Number(2.0));
        match &value {
            JsonValue::Object(map) => assert_eq!(map.len(), 1),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn string_length_cap_enforced() {
        let config = ParseConfig::default().with_max_string_length(8);
        let input = format!("\"{}\"", "x".repeat(9));
        let err = parse_document(input.as_bytes(), &config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidString);
        let input = format!("\"{}\"", "x".repeat(8));
        assert!(parse_document(input.as_bytes(), &config).is_ok());
    }

    #[test]
    fn line_col_helper() {
        assert_eq!(line_col_at(b"abc", 2), (1, 3));
        assert_eq!(line_col_at(b"a\nbc", 2), (2, 1));
        assert_eq!(line_col_at(b"a\nb\nc", 4), (3, 1));
    }
}
