//! Strict parsing of text fields
//!
//! Decimal literals must be canonical: ASCII digits only, no sign (except a
//! minus where negatives are allowed), no leading zero, no whitespace.

use std::str::FromStr;

use crate::errors::{Field, MetaError, MetaResult};

/// Returns the value of a required field.
pub(crate) fn required(value: &Option<String>, field: Field) -> MetaResult<&str> {
    value.as_deref().ok_or(MetaError::MissingField(field))
}

fn check_canonical(text: &str, field: Field, allow_negative: bool) -> MetaResult<()> {
    let digits = match text.strip_prefix('-') {
        Some(rest) if allow_negative => rest,
        Some(_) => {
            return Err(MetaError::malformed(
                field,
                format!("'{}' must not be negative", text),
            ))
        }
        None => text,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MetaError::malformed(
            field,
            format!("'{}' is not a decimal integer", text),
        ));
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(MetaError::malformed(
            field,
            format!("'{}' has a leading zero", text),
        ));
    }
    if digits == "0" && text.starts_with('-') {
        return Err(MetaError::malformed(field, "'-0' is not canonical"));
    }
    Ok(())
}

fn parse_number<T: FromStr>(text: &str, field: Field, allow_negative: bool) -> MetaResult<T> {
    check_canonical(text, field, allow_negative)?;
    text.parse::<T>()
        .map_err(|_| MetaError::malformed(field, format!("'{}' is out of range", text)))
}

pub(crate) fn parse_u32(text: &str, field: Field) -> MetaResult<u32> {
    parse_number(text, field, false)
}

/// Parses a non-negative 64-bit size.
pub(crate) fn parse_size(text: &str, field: Field) -> MetaResult<i64> {
    parse_number(text, field, false)
}

pub(crate) fn parse_i64(text: &str, field: Field) -> MetaResult<i64> {
    parse_number(text, field, true)
}

/// Parses an optional u32, absent meaning 0.
pub(crate) fn parse_flags(value: &Option<String>) -> MetaResult<u32> {
    match value.as_deref() {
        Some(text) => parse_u32(text, Field::Flags),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_values() {
        assert_eq!(parse_u32("0", Field::Position).unwrap(), 0);
        assert_eq!(parse_u32("4294967295", Field::Position).unwrap(), u32::MAX);
        assert_eq!(parse_size("1048576", Field::Size).unwrap(), 1_048_576);
        assert_eq!(parse_i64("-17", Field::Version).unwrap(), -17);
    }

    #[test]
    fn test_non_canonical_rejected() {
        for text in ["", "+1", "01", " 1", "1 ", "1e3", "0x10", "-0"] {
            let err = parse_i64(text, Field::Version).unwrap_err();
            assert_eq!(err.code(), "META_MALFORMED_VALUE", "accepted {:?}", text);
        }
    }

    #[test]
    fn test_negative_rejected_where_disallowed() {
        let err = parse_size("-1", Field::Size).unwrap_err();
        assert_eq!(err.field(), Some(Field::Size));
        assert!(err.to_string().contains("must not be negative"));
    }

    #[test]
    fn test_overflow_rejected() {
        let err = parse_u32("4294967296", Field::Position).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_required_and_flags() {
        assert_eq!(
            required(&None, Field::Hash).unwrap_err(),
            MetaError::MissingField(Field::Hash)
        );
        assert_eq!(parse_flags(&None).unwrap(), 0);
        assert_eq!(parse_flags(&Some("8".into())).unwrap(), 8);
    }
}
