//! x86-64 scanner backends: SSE2, AVX2, and AVX-512.
//!
//! Each tier hands its tail bytes to the next-lower tier rather than
//! re-dispatching, so the per-call feature check happens exactly once.
//! Control-byte comparisons use unsigned arithmetic (saturating subtract
//! or `epu8` mask compares); a signed compare against 0x20 would also flag
//! bytes above 0x7F and diverge from the scalar reference.

#![allow(unsafe_op_in_unsafe_fn)]

use std::arch::x86_64::*;

use super::scalar;

// --- whitespace ----------------------------------------------------------

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn whitespace_mask_sse2(chunk: __m128i) -> u32 {
    let space = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b' ' as i8));
    let tab = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\t' as i8));
    let newline = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\n' as i8));
    let carriage = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'\r' as i8));
    let ws = _mm_or_si128(_mm_or_si128(space, tab), _mm_or_si128(newline, carriage));
    _mm_movemask_epi8(ws) as u32
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn skip_whitespace_sse2(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();

    while pos + 16 <= len {
        let chunk = _mm_loadu_si128(ptr.add(pos) as *const __m128i);
        let mask = whitespace_mask_sse2(chunk);
        if mask != 0xFFFF {
            return pos + (!mask & 0xFFFF).trailing_zeros() as usize;
        }
        pos += 16;
    }

    scalar::skip_whitespace(input, pos)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn whitespace_mask_avx2(chunk: __m256i) -> u32 {
    let space = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b' ' as i8));
    let tab = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'\t' as i8));
    let newline = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'\n' as i8));
    let carriage = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'\r' as i8));
    let ws = _mm256_or_si256(
        _mm256_or_si256(space, tab),
        _mm256_or_si256(newline, carriage),
    );
    _mm256_movemask_epi8(ws) as u32
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn skip_whitespace_avx2(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();

    // Four-register stride: 128 bytes per iteration while everything is
    // whitespace, dropping to per-register resolution on the first miss.
    while pos + 128 <= len {
        let m0 = whitespace_mask_avx2(_mm256_loadu_si256(ptr.add(pos) as *const __m256i));
        let m1 = whitespace_mask_avx2(_mm256_loadu_si256(ptr.add(pos + 32) as *const __m256i));
        let m2 = whitespace_mask_avx2(_mm256_loadu_si256(ptr.add(pos + 64) as *const __m256i));
        let m3 = whitespace_mask_avx2(_mm256_loadu_si256(ptr.add(pos + 96) as *const __m256i));

        if m0 & m1 & m2 & m3 == u32::MAX {
            pos += 128;
            continue;
        }
        if m0 != u32::MAX {
            return pos + (!m0).trailing_zeros() as usize;
        }
        if m1 != u32::MAX {
            return pos + 32 + (!m1).trailing_zeros() as usize;
        }
        if m2 != u32::MAX {
            return pos + 64 + (!m2).trailing_zeros() as usize;
        }
        return pos + 96 + (!m3).trailing_zeros() as usize;
    }

    while pos + 32 <= len {
        let mask = whitespace_mask_avx2(_mm256_loadu_si256(ptr.add(pos) as *const __m256i));
        if mask != u32::MAX {
            return pos + (!mask).trailing_zeros() as usize;
        }
        pos += 32;
    }

    skip_whitespace_sse2(input, pos)
}

#[target_feature(enable = "avx512f,avx512bw")]
pub(crate) unsafe fn skip_whitespace_avx512(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();

    while pos + 64 <= len {
        let chunk = _mm512_loadu_si512(ptr.add(pos) as *const _);
        let space = _mm512_cmpeq_epi8_mask(chunk, _mm512_set1_epi8(b' ' as i8));
        let tab = _mm512_cmpeq_epi8_mask(chunk, _mm512_set1_epi8(b'\t' as i8));
        let newline = _mm512_cmpeq_epi8_mask(chunk, _mm512_set1_epi8(b'\n' as i8));
        let carriage = _mm512_cmpeq_epi8_mask(chunk, _mm512_set1_epi8(b'\r' as i8));
        let ws = space | tab | newline | carriage;
        if ws != u64::MAX {
            return pos + (!ws).trailing_zeros() as usize;
        }
        pos += 64;
    }

    skip_whitespace_avx2(input, pos)
}

// --- string terminator ---------------------------------------------------

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn find_string_terminator_sse2(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();
    let quote = _mm_set1_epi8(b'"' as i8);
    let backslash = _mm_set1_epi8(b'\\' as i8);
    let ctl_max = _mm_set1_epi8(0x1F);
    let zero = _mm_setzero_si128();

    while pos + 16 <= len {
        let chunk = _mm_loadu_si128(ptr.add(pos) as *const __m128i);
        let is_quote = _mm_cmpeq_epi8(chunk, quote);
        let is_backslash = _mm_cmpeq_epi8(chunk, backslash);
        // byte <= 0x1F iff it saturating-subtracts 0x1F to zero
        let is_control = _mm_cmpeq_epi8(_mm_subs_epu8(chunk, ctl_max), zero);
        let special = _mm_or_si128(_mm_or_si128(is_quote, is_backslash), is_control);
        let mask = _mm_movemask_epi8(special) as u32;
        if mask != 0 {
            return pos + mask.trailing_zeros() as usize;
        }
        pos += 16;
    }

    scalar::find_string_terminator(input, pos)
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn find_string_terminator_avx2(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();
    let quote = _mm256_set1_epi8(b'"' as i8);
    let backslash = _mm256_set1_epi8(b'\\' as i8);
    let ctl_max = _mm256_set1_epi8(0x1F);
    let zero = _mm256_setzero_si256();

    while pos + 32 <= len {
        let chunk = _mm256_loadu_si256(ptr.add(pos) as *const __m256i);
        let is_quote = _mm256_cmpeq_epi8(chunk, quote);
        let is_backslash = _mm256_cmpeq_epi8(chunk, backslash);
        let is_control = _mm256_cmpeq_epi8(_mm256_subs_epu8(chunk, ctl_max), zero);
        let special = _mm256_or_si256(_mm256_or_si256(is_quote, is_backslash), is_control);
        let mask = _mm256_movemask_epi8(special) as u32;
        if mask != 0 {
            return pos + mask.trailing_zeros() as usize;
        }
        pos += 32;
    }

    find_string_terminator_sse2(input, pos)
}

#[target_feature(enable = "avx512f,avx512bw")]
pub(crate) unsafe fn find_string_terminator_avx512(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();

    while pos + 64 <= len {
        let chunk = _mm512_loadu_si512(ptr.add(pos) as *const _);
        let is_quote = _mm512_cmpeq_epi8_mask(chunk, _mm512_set1_epi8(b'"' as i8));
        let is_backslash = _mm512_cmpeq_epi8_mask(chunk, _mm512_set1_epi8(b'\\' as i8));
        let is_control = _mm512_cmplt_epu8_mask(chunk, _mm512_set1_epi8(0x20));
        let special = is_quote | is_backslash | is_control;
        if special != 0 {
            return pos + special.trailing_zeros() as usize;
        }
        pos += 64;
    }

    find_string_terminator_avx2(input, pos)
}

// --- number characters ---------------------------------------------------

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn number_mask_sse2(chunk: __m128i) -> u32 {
    let gt_before_zero = _mm_cmpgt_epi8(chunk, _mm_set1_epi8(b'0' as i8 - 1));
    let lt_after_nine = _mm_cmpgt_epi8(_mm_set1_epi8(b'9' as i8 + 1), chunk);
    let is_digit = _mm_and_si128(gt_before_zero, lt_after_nine);
    let is_minus = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'-' as i8));
    let is_plus = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'+' as i8));
    let is_dot = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'.' as i8));
    let is_e = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'e' as i8));
    let is_upper_e = _mm_cmpeq_epi8(chunk, _mm_set1_epi8(b'E' as i8));
    let valid = _mm_or_si128(
        is_digit,
        _mm_or_si128(
            _mm_or_si128(is_minus, is_plus),
            _mm_or_si128(_mm_or_si128(is_dot, is_e), is_upper_e),
        ),
    );
    _mm_movemask_epi8(valid) as u32
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn validate_number_chars_sse2(input: &[u8], start: usize, end: usize) -> bool {
    let mut pos = start;
    let ptr = input.as_ptr();

    while pos + 16 <= end {
        let chunk = _mm_loadu_si128(ptr.add(pos) as *const __m128i);
        if number_mask_sse2(chunk) != 0xFFFF {
            return false;
        }
        pos += 16;
    }

    scalar::validate_number_chars(input, pos, end)
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn validate_number_chars_avx2(input: &[u8], start: usize, end: usize) -> bool {
    let mut pos = start;
    let ptr = input.as_ptr();

    while pos + 32 <= end {
        let chunk = _mm256_loadu_si256(ptr.add(pos) as *const __m256i);
        let gt_before_zero = _mm256_cmpgt_epi8(chunk, _mm256_set1_epi8(b'0' as i8 - 1));
        let lt_after_nine = _mm256_cmpgt_epi8(_mm256_set1_epi8(b'9' as i8 + 1), chunk);
        let is_digit = _mm256_and_si256(gt_before_zero, lt_after_nine);
        let is_minus = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'-' as i8));
        let is_plus = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'+' as i8));
        let is_dot = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'.' as i8));
        let is_e = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'e' as i8));
        let is_upper_e = _mm256_cmpeq_epi8(chunk, _mm256_set1_epi8(b'E' as i8));
        let valid = _mm256_or_si256(
            is_digit,
            _mm256_or_si256(
                _mm256_or_si256(is_minus, is_plus),
                _mm256_or_si256(_mm256_or_si256(is_dot, is_e), is_upper_e),
            ),
        );
        if _mm256_movemask_epi8(valid) as u32 != u32::MAX {
            return false;
        }
        pos += 32;
    }

    validate_number_chars_sse2(input, pos, end)
}

// --- UTF-8 ---------------------------------------------------------------

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn validate_utf8_sse2(input: &[u8], start: usize) -> bool {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();

    while pos + 16 <= len {
        let chunk = _mm_loadu_si128(ptr.add(pos) as *const __m128i);
        if _mm_movemask_epi8(chunk) == 0 {
            // all high bits clear: pure ASCII
            pos += 16;
            continue;
        }
        // Non-ASCII somewhere in this chunk: step sequences one at a time
        // until we are past it. Sequences may cross the chunk boundary.
        let chunk_end = pos + 16;
        while pos < chunk_end && pos < len {
            match scalar::utf8_step(input, pos) {
                Some(next) => pos = next,
                None => return false,
            }
        }
    }

    while pos < len {
        match scalar::utf8_step(input, pos) {
            Some(next) => pos = next,
            None => return false,
        }
    }

    true
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn validate_utf8_avx2(input: &[u8], start: usize) -> bool {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();

    while pos + 32 <= len {
        let chunk = _mm256_loadu_si256(ptr.add(pos) as *const __m256i);
        if _mm256_movemask_epi8(chunk) == 0 {
            pos += 32;
            continue;
        }
        let chunk_end = pos + 32;
        while pos < chunk_end && pos < len {
            match scalar::utf8_step(input, pos) {
                Some(next) => pos = next,
                None => return false,
            }
        }
    }

    validate_utf8_sse2(input, pos)
}

// --- literals ------------------------------------------------------------

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn match_literal_sse2(input: &[u8], pos: usize, literal: &[u8]) -> bool {
    if pos >= input.len() || input.len() - pos < literal.len() {
        return false;
    }

    // 16-byte load requires 16 readable bytes; near the end of the buffer
    // fall back to a plain comparison.
    if literal.len() <= 16 && pos + 16 <= input.len() {
        let chunk = _mm_loadu_si128(input.as_ptr().add(pos) as *const __m128i);
        let mut padded = [0u8; 16];
        padded[..literal.len()].copy_from_slice(literal);
        let expected = _mm_loadu_si128(padded.as_ptr() as *const __m128i);
        let mask = _mm_movemask_epi8(_mm_cmpeq_epi8(chunk, expected)) as u32;
        let len_mask = (1u32 << literal.len()) - 1;
        return mask & len_mask == len_mask;
    }

    scalar::match_literal(input, pos, literal)
}
