//! Portable reference implementations of the character-class scanners.
//!
//! Every vectorized backend must agree with these byte for byte; the
//! equivalence suite in `tests/backend_equivalence.rs` enforces it.

pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

pub(crate) fn is_number_char(byte: u8) -> bool {
    byte.is_ascii_digit() || matches!(byte, b'-' | b'+' | b'.' | b'e' | b'E')
}

/// Offset of the first non-whitespace byte at or after `start`.
pub fn skip_whitespace(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    while pos < input.len() && is_whitespace(input[pos]) {
        pos += 1;
    }
    pos
}

/// Offset of the first `"`, `\`, or control byte (`< 0x20`) at or after
/// `start`; `input.len()` when none remains.
pub fn find_string_terminator(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    while pos < input.len() {
        let byte = input[pos];
        if byte == b'"' || byte == b'\\' || byte < 0x20 {
            return pos;
        }
        pos += 1;
    }
    pos
}

/// Whether every byte in `[start, end)` belongs to the number alphabet
/// `0-9 - + . e E`.
pub fn validate_number_chars(input: &[u8], start: usize, end: usize) -> bool {
    input[start..end].iter().all(|&byte| is_number_char(byte))
}

/// Validate one UTF-8 sequence starting at `pos`, returning the offset of
/// the next sequence, or `None` if the bytes at `pos` are illegal. Rejects
/// overlong forms, surrogates, and code points above U+10FFFF.
///
/// The vectorized UTF-8 validators step through non-ASCII chunks with this
/// same function, so all backends share one set of legality rules.
pub(crate) fn utf8_step(input: &[u8], pos: usize) -> Option<usize> {
    let end = input.len();
    let c = input[pos];

    if c < 0x80 {
        Some(pos + 1)
    } else if (c & 0xE0) == 0xC0 {
        if pos + 1 >= end {
            return None;
        }
        let c2 = input[pos + 1];
        if (c2 & 0xC0) != 0x80 || c < 0xC2 {
            return None;
        }
        Some(pos + 2)
    } else if (c & 0xF0) == 0xE0 {
        if pos + 2 >= end {
            return None;
        }
        let c2 = input[pos + 1];
        let c3 = input[pos + 2];
        if (c2 & 0xC0) != 0x80 || (c3 & 0xC0) != 0x80 {
            return None;
        }
        if c == 0xE0 && c2 < 0xA0 {
            return None; // overlong
        }
        if c == 0xED && c2 >= 0xA0 {
            return None; // UTF-16 surrogate range
        }
        Some(pos + 3)
    } else if (c & 0xF8) == 0xF0 {
        if pos + 3 >= end {
            return None;
        }
        let c2 = input[pos + 1];
        let c3 = input[pos + 2];
        let c4 = input[pos + 3];
        if (c2 & 0xC0) != 0x80 || (c3 & 0xC0) != 0x80 || (c4 & 0xC0) != 0x80 {
            return None;
        }
        if c == 0xF0 && c2 < 0x90 {
            return None; // overlong
        }
        if c == 0xF4 && c2 >= 0x90 {
            return None; // above U+10FFFF
        }
        if c > 0xF4 {
            return None;
        }
        Some(pos + 4)
    } else {
        None
    }
}

/// UTF-8 legality check over the whole slice.
pub fn validate_utf8(input: &[u8]) -> bool {
    let mut pos = 0;
    while pos < input.len() {
        match utf8_step(input, pos) {
            Some(next) => pos = next,
            None => return false,
        }
    }
    true
}

/// Exact byte match of `literal` at `pos`.
pub fn match_literal(input: &[u8], pos: usize, literal: &[u8]) -> bool {
    input.len() - pos >= literal.len() && &input[pos..pos + literal.len()] == literal
}
