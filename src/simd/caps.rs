use std::sync::OnceLock;

/// Instruction-set features discovered at runtime.
///
/// Probed once per process and cached; every later caller observes the
/// same value. Unknown platforms report the all-false set, which forces
/// the scalar fallback everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Capabilities {
    pub(crate) sse2: bool,
    pub(crate) sse42: bool,
    pub(crate) avx2: bool,
    pub(crate) avx512f: bool,
    pub(crate) avx512bw: bool,
    pub(crate) neon: bool,
}

impl Capabilities {
    #[cfg(target_arch = "x86_64")]
    fn probe() -> Self {
        Self {
            sse2: is_x86_feature_detected!("sse2"),
            sse42: is_x86_feature_detected!("sse4.2"),
            avx2: is_x86_feature_detected!("avx2"),
            avx512f: is_x86_feature_detected!("avx512f"),
            avx512bw: is_x86_feature_detected!("avx512bw"),
            neon: false,
        }
    }

    #[cfg(target_arch = "aarch64")]
    fn probe() -> Self {
        Self {
            neon: std::arch::is_aarch64_feature_detected!("neon"),
            ..Self::default()
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    fn probe() -> Self {
        Self::default()
    }

    pub fn has_sse2(&self) -> bool {
        self.sse2
    }

    pub fn has_sse42(&self) -> bool {
        self.sse42
    }

    pub fn has_avx2(&self) -> bool {
        self.avx2
    }

    /// Both the foundation and byte/word subsets are required by the
    /// 64-byte scanners.
    pub fn has_avx512(&self) -> bool {
        self.avx512f && self.avx512bw
    }

    pub fn has_neon(&self) -> bool {
        self.neon
    }

    /// Bytes per multi-register scan iteration for the widest usable tier:
    /// 8x64 under AVX-512, 4x32 under AVX2, one 16-byte register otherwise.
    pub fn optimal_chunk_size(&self) -> usize {
        if self.has_avx512() {
            512
        } else if self.avx2 {
            128
        } else {
            16
        }
    }
}

static CAPS: OnceLock<Capabilities> = OnceLock::new();

/// The process-wide capability set, probed on first use.
pub fn detect() -> &'static Capabilities {
    CAPS.get_or_init(Capabilities::probe)
}
