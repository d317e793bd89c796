//! `\uXXXX` escape decoding with UTF-16 surrogate-pair combination.

const SURROGATE_HIGH_START: u32 = 0xD800;
const SURROGATE_HIGH_END: u32 = 0xDBFF;
const SURROGATE_LOW_START: u32 = 0xDC00;
const SURROGATE_LOW_END: u32 = 0xDFFF;
const SURROGATE_OFFSET: u32 = 0x10000;

fn is_high_surrogate(code: u32) -> bool {
    (SURROGATE_HIGH_START..=SURROGATE_HIGH_END).contains(&code)
}

fn is_low_surrogate(code: u32) -> bool {
    (SURROGATE_LOW_START..=SURROGATE_LOW_END).contains(&code)
}

fn read_hex4(input: &[u8], pos: usize) -> Result<u32, &'static str> {
    if pos + 4 > input.len() {
        return Err("truncated unicode escape");
    }
    let mut code = 0u32;
    for &byte in &input[pos..pos + 4] {
        let digit = match byte {
            b'0'..=b'9' => u32::from(byte - b'0'),
            b'a'..=b'f' => u32::from(byte - b'a') + 10,
            b'A'..=b'F' => u32::from(byte - b'A') + 10,
            _ => return Err("invalid hex digit in unicode escape"),
        };
        code = (code << 4) | digit;
    }
    Ok(code)
}

fn encode_utf8(code: u32, out: &mut Vec<u8>) -> Result<(), &'static str> {
    let ch = char::from_u32(code).ok_or("invalid unicode code point")?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    Ok(())
}

/// Decode one `\uXXXX` escape whose hex digits begin at `pos` (the `\u`
/// prefix has already been consumed), appending the UTF-8 encoding of the
/// resulting code point to `out`. A high surrogate must be followed by a
/// `\uXXXX` low surrogate; the pair is combined into one code point.
///
/// Returns the number of input bytes consumed: 4 for a BMP escape, 10 for
/// a surrogate pair.
pub(crate) fn decode_escape(
    input: &[u8],
    pos: usize,
    out: &mut Vec<u8>,
) -> Result<usize, &'static str> {
    let code = read_hex4(input, pos)?;

    if is_high_surrogate(code) {
        if pos + 6 > input.len() || input[pos + 4] != b'\\' || input[pos + 5] != b'u' {
            return Err("unpaired high surrogate");
        }
        let low = read_hex4(input, pos + 6)?;
        if !is_low_surrogate(low) {
            return Err("invalid low surrogate");
        }
        let combined =
            ((code - SURROGATE_HIGH_START) << 10) + (low - SURROGATE_LOW_START) + SURROGATE_OFFSET;
        encode_utf8(combined, out)?;
        return Ok(10);
    }

    if is_low_surrogate(code) {
        return Err("unpaired low surrogate");
    }

    encode_utf8(code, out)?;
    Ok(4)
}
