/// Worker pool sizing for the parallel parse path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadCount {
    /// Use the runtime's default pool size (one worker per logical core).
    #[default]
    Auto,
    /// Never parallelize, regardless of thresholds.
    Disabled,
    /// Use exactly this many workers.
    Fixed(usize),
}

/// Per-call parse options.
///
/// Passed by reference into every entry point; a single parse never
/// mutates its configuration. ISA toggles only restrict what the runtime
/// capability probe already allows, so enabling an instruction set the
/// host lacks is harmless.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseConfig {
    pub num_threads: ThreadCount,
    /// Minimum element count (scaled by 1/100 against scanned spans) before
    /// an array or object is parsed in parallel.
    pub parallel_threshold: usize,
    pub enable_simd: bool,
    pub enable_avx512: bool,
    pub enable_avx2: bool,
    pub enable_sse: bool,
    pub enable_neon: bool,
    pub max_depth: usize,
    pub max_string_length: usize,
    /// Spans handed to one worker at a time.
    pub chunk_size: usize,
}

impl ParseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_threads(mut self, num_threads: ThreadCount) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    pub fn with_simd(mut self, enable: bool) -> Self {
        self.enable_simd = enable;
        self
    }

    pub fn with_avx512(mut self, enable: bool) -> Self {
        self.enable_avx512 = enable;
        self
    }

    pub fn with_avx2(mut self, enable: bool) -> Self {
        self.enable_avx2 = enable;
        self
    }

    pub fn with_sse(mut self, enable: bool) -> Self {
        self.enable_sse = enable;
        self
    }

    pub fn with_neon(mut self, enable: bool) -> Self {
        self.enable_neon = enable;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Span count at or above which the orchestrator fans out.
    pub(crate) fn span_threshold(&self) -> usize {
        (self.parallel_threshold / 100).max(1)
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            num_threads: ThreadCount::Auto,
            parallel_threshold: 1000,
            enable_simd: true,
            enable_avx512: true,
            enable_avx2: true,
            enable_sse: true,
            enable_neon: true,
            max_depth: 1000,
            max_string_length: 10 * 1024 * 1024,
            chunk_size: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ParseConfig::default();
        assert_eq!(config.num_threads, ThreadCount::Auto);
        assert_eq!(config.parallel_threshold, 1000);
        assert_eq!(config.max_depth, 1000);
        assert_eq!(config.max_string_length, 10 * 1024 * 1024);
        assert_eq!(config.chunk_size, 100);
        assert!(config.enable_simd);
    }

    #[test]
    fn builder_chains() {
        let config = ParseConfig::new()
            .with_num_threads(ThreadCount::Fixed(4))
            .with_parallel_threshold(200)
            .with_simd(false)
            .with_max_depth(32);
        assert_eq!(config.num_threads, ThreadCount::Fixed(4));
        assert_eq!(config.parallel_threshold, 200);
        assert!(!config.enable_simd);
        assert_eq!(config.max_depth, 32);
    }

    #[test]
    fn span_threshold_never_zero() {
        assert_eq!(ParseConfig::default().span_threshold(), 10);
        let tiny = ParseConfig::new().with_parallel_threshold(0);
        assert_eq!(tiny.span_threshold(), 1);
    }

    #[test]
    fn chunk_size_clamped_to_one() {
        let config = ParseConfig::new().with_chunk_size(0);
        assert_eq!(config.chunk_size, 1);
    }
}
