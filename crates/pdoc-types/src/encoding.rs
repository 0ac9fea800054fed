//! Hex and base64 helpers for blob values.
//!
//! Both decoders check the input against an explicit character class
//! before decoding, so a stray character is reported as malformed input
//! instead of surfacing whatever the underlying decoder makes of it.

use crate::error::{TypeError, TypeResult};

/// Characters per line when a blob is written as wrapped base64.
pub const BASE64_LINE_WIDTH: usize = 36;

/// Decode a hex string into bytes.
///
/// Angle brackets and whitespace are decoration (`<68656c6c 6f>`) and are
/// stripped before decoding.
pub fn decode_hex(text: &str) -> TypeResult<Vec<u8>> {
    let digits: String = text
        .chars()
        .filter(|c| *c != '<' && *c != '>' && !c.is_whitespace())
        .collect();

    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(TypeError::malformed(
            "hex",
            format!("invalid character {bad:?}"),
        ));
    }
    if digits.len() % 2 != 0 {
        return Err(TypeError::malformed("hex", "odd number of digits"));
    }

    hex::decode(&digits).map_err(|e| TypeError::malformed("hex", e.to_string()))
}

/// Decode base64 text into bytes. Whitespace (including line breaks) is
/// insignificant.
pub fn decode_base64(text: &str) -> TypeResult<Vec<u8>> {
    let payload: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(bad) = payload
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '+' || *c == '/' || *c == '='))
    {
        return Err(TypeError::malformed(
            "base64",
            format!("invalid character {bad:?}"),
        ));
    }

    base64::decode(&payload).map_err(|e| TypeError::malformed("base64", e.to_string()))
}

/// Encode bytes as a single line of base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    base64::encode(bytes)
}

/// Encode bytes as base64 split into lines of at most `width` characters.
pub fn encode_base64_lines(bytes: &[u8], width: usize) -> Vec<String> {
    let encoded = base64::encode(bytes);
    if width == 0 {
        return vec![encoded];
    }
    // base64 output is pure ASCII, so byte chunks are char boundaries.
    encoded
        .as_bytes()
        .chunks(width)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

/// Re-encode a hex string as base64.
pub fn hex_to_base64(hex: &str) -> TypeResult<String> {
    Ok(encode_base64(&decode_hex(hex)?))
}

/// Re-encode base64 text as a lowercase hex string.
pub fn base64_to_hex(text: &str) -> TypeResult<String> {
    Ok(hex::encode(decode_base64(text)?))
}
