//! Checksums over link control data.

use crate::consts::LC_LENGTH_BYTES;

/// Five bit checksum of an embedded LC: the byte sum modulo 31.
pub(crate) fn five_bit_checksum(lc: &[u8; LC_LENGTH_BYTES]) -> u8 {
    let total: u16 = lc.iter().map(|b| u16::from(*b)).sum();
    (total % 31) as u8
}

/// Returns `true` if `checksum` matches [`five_bit_checksum`] of `lc`.
pub(crate) fn check_five_bit(lc: &[u8; LC_LENGTH_BYTES], checksum: u8) -> bool {
    five_bit_checksum(lc) == checksum
}
