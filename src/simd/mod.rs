//! Runtime-dispatched character-class scanners.
//!
//! Four scan primitives (whitespace skip, string-terminator search, number
//! alphabet validation, UTF-8 validation) each exist in one form per
//! instruction-set tier plus a portable scalar reference. A [`Backend`] is
//! selected once per parse from the cached [`Capabilities`] and the
//! [`ParseConfig`](crate::ParseConfig) toggles; all backends produce
//! identical results on every input.

pub mod caps;
pub(crate) mod scalar;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "x86_64")]
mod x86;

pub use caps::{detect, Capabilities};

use crate::config::ParseConfig;

/// One instruction-set-specific implementation tier of the scanners.
///
/// Wider tiers hand their tail bytes to the next-lower tier internally, so
/// choosing a backend is a one-time decision per parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Avx512,
    Avx2,
    Sse2,
    Neon,
    Scalar,
}

impl Backend {
    /// The most capable backend that is both enabled by `config` and
    /// available on this machine.
    pub fn select(config: &ParseConfig) -> Backend {
        if !config.enable_simd {
            return Backend::Scalar;
        }
        let caps = caps::detect();
        if config.enable_avx512 && caps.has_avx512() {
            Backend::Avx512
        } else if config.enable_avx2 && caps.has_avx2() {
            Backend::Avx2
        } else if config.enable_sse && caps.has_sse2() {
            Backend::Sse2
        } else if config.enable_neon && caps.has_neon() {
            Backend::Neon
        } else {
            Backend::Scalar
        }
    }

    /// Every backend the current machine can execute, scalar included.
    pub fn available() -> Vec<Backend> {
        let caps = caps::detect();
        let mut backends = vec![Backend::Scalar];
        if caps.has_sse2() {
            backends.push(Backend::Sse2);
        }
        if caps.has_avx2() {
            backends.push(Backend::Avx2);
        }
        if caps.has_avx512() {
            backends.push(Backend::Avx512);
        }
        if caps.has_neon() {
            backends.push(Backend::Neon);
        }
        backends
    }

    /// Offset of the first byte at or after `start` that is not JSON
    /// whitespace (space, tab, newline, carriage return).
    pub fn skip_whitespace(self, input: &[u8], start: usize) -> usize {
        debug_assert!(start <= input.len());
        #[cfg(target_arch = "x86_64")]
        {
            let caps = caps::detect();
            match self {
                // SAFETY: the feature gate was confirmed by the runtime probe.
                Backend::Avx512 if caps.has_avx512() => {
                    return unsafe { x86::skip_whitespace_avx512(input, start) };
                }
                Backend::Avx2 if caps.has_avx2() => {
                    return unsafe { x86::skip_whitespace_avx2(input, start) };
                }
                Backend::Sse2 if caps.has_sse2() => {
                    return unsafe { x86::skip_whitespace_sse2(input, start) };
                }
                _ => {}
            }
        }
        #[cfg(target_arch = "aarch64")]
        if self == Backend::Neon && caps::detect().has_neon() {
            // SAFETY: NEON support confirmed by the runtime probe.
            return unsafe { neon::skip_whitespace_neon(input, start) };
        }
        scalar::skip_whitespace(input, start)
    }

    /// Offset of the first `"`, `\`, or control byte (`< 0x20`) at or
    /// after `start`; `input.len()` if none remains.
    pub fn find_string_terminator(self, input: &[u8], start: usize) -> usize {
        debug_assert!(start <= input.len());
        #[cfg(target_arch = "x86_64")]
        {
            let caps = caps::detect();
            match self {
                // SAFETY: the feature gate was confirmed by the runtime probe.
                Backend::Avx512 if caps.has_avx512() => {
                    return unsafe { x86::find_string_terminator_avx512(input, start) };
                }
                Backend::Avx2 if caps.has_avx2() => {
                    return unsafe { x86::find_string_terminator_avx2(input, start) };
                }
                Backend::Sse2 if caps.has_sse2() => {
                    return unsafe { x86::find_string_terminator_sse2(input, start) };
                }
                _ => {}
            }
        }
        #[cfg(target_arch = "aarch64")]
        if self == Backend::Neon && caps::detect().has_neon() {
            // SAFETY: NEON support confirmed by the runtime probe.
            return unsafe { neon::find_string_terminator_neon(input, start) };
        }
        scalar::find_string_terminator(input, start)
    }

    /// Whether every byte of `[start, end)` belongs to the number alphabet
    /// `0-9 - + . e E`.
    pub fn validate_number_chars(self, input: &[u8], start: usize, end: usize) -> bool {
        debug_assert!(start <= end && end <= input.len());
        #[cfg(target_arch = "x86_64")]
        {
            let caps = caps::detect();
            match self {
                // The 64-byte tier gains nothing on short number tokens;
                // AVX-512 shares the AVX2 kernel here.
                Backend::Avx512 | Backend::Avx2 if caps.has_avx2() => {
                    // SAFETY: AVX2 support confirmed by the runtime probe.
                    return unsafe { x86::validate_number_chars_avx2(input, start, end) };
                }
                Backend::Avx512 | Backend::Avx2 | Backend::Sse2 if caps.has_sse2() => {
                    // SAFETY: SSE2 support confirmed by the runtime probe.
                    return unsafe { x86::validate_number_chars_sse2(input, start, end) };
                }
                _ => {}
            }
        }
        #[cfg(target_arch = "aarch64")]
        if self == Backend::Neon && caps::detect().has_neon() {
            // SAFETY: NEON support confirmed by the runtime probe.
            return unsafe { neon::validate_number_chars_neon(input, start, end) };
        }
        scalar::validate_number_chars(input, start, end)
    }

    /// UTF-8 legality of the whole slice: overlong forms, surrogate code
    /// points, and values above U+10FFFF are rejected.
    pub fn validate_utf8(self, input: &[u8]) -> bool {
        #[cfg(target_arch = "x86_64")]
        {
            let caps = caps::detect();
            match self {
                Backend::Avx512 | Backend::Avx2 if caps.has_avx2() => {
                    // SAFETY: AVX2 support confirmed by the runtime probe.
                    return unsafe { x86::validate_utf8_avx2(input, 0) };
                }
                Backend::Avx512 | Backend::Avx2 | Backend::Sse2 if caps.has_sse2() => {
                    // SAFETY: SSE2 support confirmed by the runtime probe.
                    return unsafe { x86::validate_utf8_sse2(input, 0) };
                }
                _ => {}
            }
        }
        #[cfg(target_arch = "aarch64")]
        if self == Backend::Neon && caps::detect().has_neon() {
            // SAFETY: NEON support confirmed by the runtime probe.
            return unsafe { neon::validate_utf8_neon(input, 0) };
        }
        scalar::validate_utf8(input)
    }

    /// Exact byte match of `literal` at `pos`.
    pub fn match_literal(self, input: &[u8], pos: usize, literal: &[u8]) -> bool {
        debug_assert!(pos <= input.len());
        #[cfg(target_arch = "x86_64")]
        if self != Backend::Scalar && caps::detect().has_sse2() {
            // SAFETY: SSE2 support confirmed by the runtime probe.
            return unsafe { x86::match_literal_sse2(input, pos, literal) };
        }
        scalar::match_literal(input, pos, literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_honors_simd_toggle() {
        let config = ParseConfig::new().with_simd(false);
        assert_eq!(Backend::select(&config), Backend::Scalar);
    }

    #[test]
    fn select_respects_isa_toggles() {
        let config = ParseConfig::new()
            .with_avx512(false)
            .with_avx2(false)
            .with_sse(false)
            .with_neon(false);
        assert_eq!(Backend::select(&config), Backend::Scalar);
    }

    #[test]
    fn available_always_includes_scalar() {
        assert!(Backend::available().contains(&Backend::Scalar));
    }

    #[test]
    fn default_selection_is_available() {
        let selected = Backend::select(&ParseConfig::default());
        assert!(Backend::available().contains(&selected));
    }
}
