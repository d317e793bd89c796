pub mod config;
pub mod error;
pub mod numa;
mod parse;
pub mod simd;
mod unicode;
pub mod value;

pub use config::{ParseConfig, ThreadCount};
pub use error::{ErrorKind, ParseError};
pub use simd::{detect, Backend, Capabilities};
pub use value::JsonValue;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse a JSON document with the default configuration.
pub fn parse(input: &str) -> Result<JsonValue> {
    parse_with_config(input, &ParseConfig::default())
}

/// Parse a JSON document with an explicit configuration.
///
/// The configuration is read for this call only; concurrent calls with
/// different configurations do not interfere.
pub fn parse_with_config(input: &str, config: &ParseConfig) -> Result<JsonValue> {
    parse::parse_document(input.as_bytes(), config)
}

/// Parse raw bytes. The bytes need not be valid UTF-8 outside string
/// values; strings themselves are still validated.
pub fn parse_bytes(input: &[u8], config: &ParseConfig) -> Result<JsonValue> {
    parse::parse_document(input, config)
}
