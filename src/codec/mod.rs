//! Binary framing for raw records
//!
//! Every raw record is framed as:
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Body             | (record specific)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 over length + body)
//! +------------------+
//! ```
//!
//! Integers are little-endian. Strings are u32 length-prefixed UTF-8.

mod checksum;
pub mod hex;

pub use checksum::{compute_checksum, verify_checksum};

use crate::errors::{MetaError, MetaResult};

/// Length prefix plus checksum
pub const FRAME_OVERHEAD: usize = 8;

/// Appends fields of a record body.
#[derive(Debug, Default)]
pub struct BodyWriter {
    buf: Vec<u8>,
}

impl BodyWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn put_str(&mut self, value: &str) {
        self.put_u32(value.len() as u32);
        self.buf.extend_from_slice(value.as_bytes());
    }

    /// Wraps the body in length prefix and checksum.
    pub fn finish(self) -> Vec<u8> {
        let record_length = (FRAME_OVERHEAD + self.buf.len()) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&self.buf);
        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());
        record
    }
}

/// Reads fields of a record body, tracking the absolute offset for errors.
#[derive(Debug)]
pub struct BodyReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> BodyReader<'a> {
    /// Returns the offset of the next unread byte, relative to the outermost record.
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, len: usize, what: &str) -> MetaResult<&'a [u8]> {
        let remaining = self.data.len() - self.pos;
        if len > remaining {
            return Err(MetaError::corrupted(
                self.offset(),
                format!("truncated {}: need {} bytes, {} left", what, len, remaining),
            ));
        }
        let data: &'a [u8] = self.data;
        let slice = &data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn get_u8(&mut self, what: &str) -> MetaResult<u8> {
        Ok(self.take(1, what)?[0])
    }

    pub fn get_u32(&mut self, what: &str) -> MetaResult<u32> {
        let bytes = self.take(4, what)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn get_i64(&mut self, what: &str) -> MetaResult<i64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8, what)?);
        Ok(i64::from_le_bytes(buf))
    }

    pub fn get_fixed<const N: usize>(&mut self, what: &str) -> MetaResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N, what)?);
        Ok(buf)
    }

    pub fn get_str(&mut self, what: &str) -> MetaResult<String> {
        let len = self.get_u32(what)? as usize;
        let start = self.offset();
        let bytes = self.take(len, what)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| MetaError::corrupted(start, format!("{} is not UTF-8: {}", what, e)))
    }

    /// Reads a complete nested record and returns a reader over its body.
    pub fn get_record(&mut self, what: &str) -> MetaResult<BodyReader<'a>> {
        let start = self.offset();
        let data: &'a [u8] = self.data;
        let rest = &data[self.pos..];
        let (body, consumed) = unframe_at(rest, start, what)?;
        self.pos += consumed;
        Ok(body)
    }
}

/// Verifies the frame of the record at the start of `data`.
///
/// Returns a reader over the body and the number of bytes the record occupies.
pub fn unframe<'a>(data: &'a [u8], what: &str) -> MetaResult<(BodyReader<'a>, usize)> {
    unframe_at(data, 0, what)
}

fn unframe_at<'a>(
    data: &'a [u8],
    base: usize,
    what: &str,
) -> MetaResult<(BodyReader<'a>, usize)> {
    if data.len() < FRAME_OVERHEAD {
        return Err(MetaError::corrupted(
            base,
            format!("{} too short: {} bytes", what, data.len()),
        ));
    }

    let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if record_length < FRAME_OVERHEAD {
        return Err(MetaError::corrupted(
            base,
            format!("invalid {} length: {}", what, record_length),
        ));
    }
    if data.len() < record_length {
        return Err(MetaError::corrupted(
            base,
            format!(
                "{} truncated: expected {} bytes, got {}",
                what,
                record_length,
                data.len()
            ),
        ));
    }

    let checksum_offset = record_length - 4;
    let stored = u32::from_le_bytes([
        data[checksum_offset],
        data[checksum_offset + 1],
        data[checksum_offset + 2],
        data[checksum_offset + 3],
    ]);
    if !verify_checksum(&data[..checksum_offset], stored) {
        return Err(MetaError::corrupted(
            base + checksum_offset,
            format!(
                "{} checksum mismatch: computed {:08x}, stored {:08x}",
                what,
                compute_checksum(&data[..checksum_offset]),
                stored
            ),
        ));
    }

    Ok((
        BodyReader {
            data: &data[4..checksum_offset],
            pos: 0,
            base: base + 4,
        },
        record_length,
    ))
}
