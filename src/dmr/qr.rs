//! Quadratic residue QR(16,7,6) code protecting the EMB field.
//!
//! Seven data bits are followed by the eight bit remainder of `data * x^8`
//! modulo `0x139` and an overall even parity bit. Minimum distance is six, so
//! nearest code word decoding fixes two bit errors.

use super::bits::distance;

const GENERATOR: u16 = 0x139;

/// Encodes the low seven bits of `value` into a 16 bit code word.
pub fn encode(value: u8) -> u16 {
    let data = u16::from(value & 0x7F);
    let mut rem = data << 8;
    for bit in (8..15).rev() {
        if rem >> bit & 1 == 1 {
            rem ^= GENERATOR << (bit - 8);
        }
    }
    let word = (data << 8) | rem;
    (word << 1) | (word.count_ones() & 1) as u16
}

/// Decodes a received 16 bit word to the nearest code word's seven data bits.
///
/// Returns `None` when more than two bits are in error.
pub fn decode(received: u16) -> Option<u8> {
    (0..0x80u8)
        .map(|value| (value, distance(u32::from(encode(value)), u32::from(received))))
        .min_by_key(|&(_, d)| d)
        .filter(|&(_, d)| d <= 2)
        .map(|(value, _)| value)
}
