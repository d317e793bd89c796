//! Parallel span parsing on the rayon pool.
//!
//! Every worker parses its spans sequentially; there is no nested
//! fan-out. `collect` keeps results index-addressed, so the merge loop
//! reports the first error by document position regardless of which
//! worker hit it first.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::{ParseConfig, ThreadCount};
use crate::error::ParseError;
use crate::numa;
use crate::simd::Backend;
use crate::value::JsonValue;

use super::boundary::Span;
use super::{parse_key_span, parse_span};

type Result<T> = std::result::Result<T, ParseError>;

/// Run `job` on a dedicated pool when a fixed thread count was asked
/// for, otherwise on the caller's pool. Pool construction failure falls
/// back to the caller's pool.
fn run_in_pool<R: Send>(config: &ParseConfig, job: impl FnOnce() -> R + Send) -> R {
    match config.num_threads {
        ThreadCount::Fixed(count) => {
            match rayon::ThreadPoolBuilder::new().num_threads(count).build() {
                Ok(pool) => pool.install(job),
                Err(_) => job(),
            }
        }
        _ => job(),
    }
}

pub(crate) fn parse_array_spans(
    input: &[u8],
    spans: &[Span],
    config: &ParseConfig,
    backend: Backend,
    depth: usize,
) -> Result<Vec<JsonValue>> {
    let min_len = config.chunk_size.max(1);
    let results: Vec<Result<JsonValue>> = run_in_pool(config, || {
        spans
            .par_iter()
            .with_min_len(min_len)
            .map(|&span| {
                numa::bind_current_worker();
                parse_span(input, span, config, backend, depth)
            })
            .collect()
    });
    let mut items = Vec::with_capacity(results.len());
    for result in results {
        items.push(result?);
    }
    Ok(items)
}

pub(crate) fn parse_object_spans(
    input: &[u8],
    entries: &[(Span, Span)],
    config: &ParseConfig,
    backend: Backend,
    depth: usize,
) -> Result<HashMap<String, JsonValue>> {
    let min_len = config.chunk_size.max(1);
    let results: Vec<Result<(String, JsonValue)>> = run_in_pool(config, || {
        entries
            .par_iter()
            .with_min_len(min_len)
            .map(|&(key_span, value_span)| {
                numa::bind_current_worker();
                let key = parse_key_span(input, key_span, config, backend, depth)?;
                let value = parse_span(input, value_span, config, backend, depth)?;
                Ok((key, value))
            })
            .collect()
    });
    let mut map = HashMap::with_capacity(results.len());
    for result in results {
        let (key, value) = result?;
        // Inserting in span order keeps last-occurrence-wins for
        // duplicate keys.
        map.insert(key, value);
    }
    Ok(map)
}
