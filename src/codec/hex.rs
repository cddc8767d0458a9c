//! Fixed-length hexadecimal fields
//!
//! Hex is emitted uppercase and accepted in either case.

use crate::errors::{Field, MetaError, MetaResult};

/// Decodes exactly `N` bytes from a hex string.
pub fn decode_fixed<const N: usize>(text: &str, field: Field) -> MetaResult<[u8; N]> {
    if text.len() != N * 2 {
        return Err(MetaError::malformed(
            field,
            format!("expected {} hex digits, got {}", N * 2, text.len()),
        ));
    }
    let mut out = [0u8; N];
    ::hex::decode_to_slice(text, &mut out)
        .map_err(|e| MetaError::malformed(field, format!("invalid hex: {}", e)))?;
    Ok(out)
}

pub fn encode_upper(bytes: &[u8]) -> String {
    ::hex::encode_upper(bytes)
}
