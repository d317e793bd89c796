//! AArch64 NEON scanner backends.
//!
//! NEON has no movemask; chunk verdicts come from reinterpreting the
//! comparison vector as two u64 lanes, with a short byte scan locating the
//! exact offset once a chunk is known to contain a hit.

#![allow(unsafe_op_in_unsafe_fn)]

use std::arch::aarch64::*;

use super::scalar;

#[inline]
unsafe fn any_lane_set(mask: uint8x16_t) -> bool {
    let lanes = vreinterpretq_u64_u8(mask);
    vgetq_lane_u64::<0>(lanes) != 0 || vgetq_lane_u64::<1>(lanes) != 0
}

#[inline]
unsafe fn all_lanes_set(mask: uint8x16_t) -> bool {
    let lanes = vreinterpretq_u64_u8(mask);
    vgetq_lane_u64::<0>(lanes) == u64::MAX && vgetq_lane_u64::<1>(lanes) == u64::MAX
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn skip_whitespace_neon(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();

    while pos + 16 <= len {
        let chunk = vld1q_u8(ptr.add(pos));
        let space = vceqq_u8(chunk, vdupq_n_u8(b' '));
        let tab = vceqq_u8(chunk, vdupq_n_u8(b'\t'));
        let newline = vceqq_u8(chunk, vdupq_n_u8(b'\n'));
        let carriage = vceqq_u8(chunk, vdupq_n_u8(b'\r'));
        let ws = vorrq_u8(vorrq_u8(space, tab), vorrq_u8(newline, carriage));

        if !all_lanes_set(ws) {
            return scalar::skip_whitespace(input, pos);
        }
        pos += 16;
    }

    scalar::skip_whitespace(input, pos)
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn find_string_terminator_neon(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();

    while pos + 16 <= len {
        let chunk = vld1q_u8(ptr.add(pos));
        let is_quote = vceqq_u8(chunk, vdupq_n_u8(b'"'));
        let is_backslash = vceqq_u8(chunk, vdupq_n_u8(b'\\'));
        let is_control = vcltq_u8(chunk, vdupq_n_u8(0x20));
        let special = vorrq_u8(vorrq_u8(is_quote, is_backslash), is_control);

        if any_lane_set(special) {
            return scalar::find_string_terminator(input, pos);
        }
        pos += 16;
    }

    scalar::find_string_terminator(input, pos)
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn validate_number_chars_neon(input: &[u8], start: usize, end: usize) -> bool {
    let mut pos = start;
    let ptr = input.as_ptr();

    while pos + 16 <= end {
        let chunk = vld1q_u8(ptr.add(pos));
        let ge_zero = vcgeq_u8(chunk, vdupq_n_u8(b'0'));
        let le_nine = vcleq_u8(chunk, vdupq_n_u8(b'9'));
        let is_digit = vandq_u8(ge_zero, le_nine);
        let is_minus = vceqq_u8(chunk, vdupq_n_u8(b'-'));
        let is_plus = vceqq_u8(chunk, vdupq_n_u8(b'+'));
        let is_dot = vceqq_u8(chunk, vdupq_n_u8(b'.'));
        let is_e = vceqq_u8(chunk, vdupq_n_u8(b'e'));
        let is_upper_e = vceqq_u8(chunk, vdupq_n_u8(b'E'));
        let valid = vorrq_u8(
            is_digit,
            vorrq_u8(
                vorrq_u8(is_minus, is_plus),
                vorrq_u8(vorrq_u8(is_dot, is_e), is_upper_e),
            ),
        );

        if !all_lanes_set(valid) {
            return false;
        }
        pos += 16;
    }

    scalar::validate_number_chars(input, pos, end)
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn validate_utf8_neon(input: &[u8], start: usize) -> bool {
    let mut pos = start;
    let len = input.len();
    let ptr = input.as_ptr();

    while pos + 16 <= len {
        let chunk = vld1q_u8(ptr.add(pos));
        if vmaxvq_u8(chunk) < 0x80 {
            // pure ASCII chunk
            pos += 16;
            continue;
        }
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
