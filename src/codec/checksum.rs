//! CRC32 checksum for framed raw records
//!
//! Uses CRC32 (IEEE polynomial), the same checksum the storage records use.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_deterministic() {
        let data = b"chunk metadata";
        assert_eq!(compute_checksum(data), compute_checksum(data));
    }

    #[test]
    fn test_checksum_detects_single_bit_flip() {
        let mut data = b"0123456789ABCDEF".to_vec();
        let original = compute_checksum(&data);
        data[7] ^= 0x01;
        assert_ne!(original, compute_checksum(&data));
        assert!(!verify_checksum(&data, original));
    }
}
