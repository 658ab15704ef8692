//! Bit level helpers shared by the DMR codecs.
//!
//! All conversions are big endian within a byte: bit 0 of a bit slice is the
//! most significant bit of the first byte, matching the on-air bit order.

/// Stamps `pattern` into `target` through `mask`: `(byte & !mask) | pattern`.
///
/// Only the first `min(target, mask, pattern)` bytes are touched. Pattern bits
/// outside the mask are expected to be zero, exactly as in the sync tables.
pub fn apply_overlay(target: &mut [u8], mask: &[u8], pattern: &[u8]) {
    for ((byte, m), p) in target.iter_mut().zip(mask).zip(pattern) {
        *byte = (*byte & !*m) | *p;
    }
}

/// Returns `true` if `data` equals `pattern` on every bit selected by `mask`.
pub fn matches_masked(data: &[u8], mask: &[u8], pattern: &[u8]) -> bool {
    data.len() >= mask.len()
        && data
            .iter()
            .zip(mask)
            .zip(pattern)
            .all(|((d, m), p)| (d & m) == (p & m))
}

/// Expands `bytes` into `bits`, most significant bit first.
pub(crate) fn bytes_to_bits(bytes: &[u8], bits: &mut [bool]) {
    for (i, bit) in bits.iter_mut().enumerate().take(bytes.len() * 8) {
        *bit = (bytes[i / 8] >> (7 - (i % 8))) & 1 == 1;
    }
}

/// Packs `bits` into `bytes`, most significant bit first.
pub(crate) fn bits_to_bytes(bits: &[bool], bytes: &mut [u8]) {
    for (n, byte) in bytes.iter_mut().enumerate() {
        *byte = bits_to_byte(&bits[n * 8..n * 8 + 8]);
    }
}

/// Packs eight bits into one byte, most significant bit first.
pub(crate) fn bits_to_byte(bits: &[bool]) -> u8 {
    bits.iter()
        .take(8)
        .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit))
}

/// Number of differing bits between two code words.
pub(crate) fn distance(a: u32, b: u32) -> u32 {
    (a ^ b).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_keeps_unmasked_bits() {
        let mut data = [0xFF, 0x00, 0xA5];
        apply_overlay(&mut data, &[0x0F, 0xF0, 0x00], &[0x03, 0x50, 0x00]);
        assert_eq!(data, [0xF3, 0x50, 0xA5]);
    }

    #[test]
    fn test_overlay_stops_at_shortest_slice() {
        let mut data = [0xFF, 0xFF];
        apply_overlay(&mut data, &[0xFF], &[0x00]);
        assert_eq!(data, [0x00, 0xFF]);
    }

    #[test]
    fn test_masked_compare() {
        assert!(matches_masked(&[0x1F, 0x22], &[0x0F, 0x00], &[0x0F, 0x00]));
        assert!(!matches_masked(&[0x1E, 0x22], &[0x0F, 0x00], &[0x0F, 0x00]));
        assert!(!matches_masked(&[0x1F], &[0x0F, 0x00], &[0x0F, 0x00]));
    }

    #[test]
    fn test_bit_order_is_msb_first() {
        let mut bits = [false; 16];
        bytes_to_bits(&[0x80, 0x01], &mut bits);
        assert!(bits[0]);
        assert!(bits[15]);
        assert_eq!(bits.iter().filter(|b| **b).count(), 2);

        let mut bytes = [0u8; 2];
        bits_to_bytes(&bits, &mut bytes);
        assert_eq!(bytes, [0x80, 0x01]);
    }
}
