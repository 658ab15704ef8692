//! Golay(20,8) code protecting the slot type field.
//!
//! The twelve parity bits are the remainder of `data * x^11` modulo the
//! generator `0xC75`, followed by one overall even parity bit.

use super::bits::distance;

const GENERATOR: u32 = 0xC75;

/// Twelve parity bits for `data`.
pub fn parity(data: u8) -> u16 {
    let mut rem = u32::from(data) << 11;
    for bit in (11..19).rev() {
        if rem >> bit & 1 == 1 {
            rem ^= GENERATOR << (bit - 11);
        }
    }
    let word = (u32::from(data) << 11) | rem;
    ((rem << 1) | (word.count_ones() & 1)) as u16
}

/// Full 20 bit code word: data in the top 8 bits, parity below.
pub fn encode(data: u8) -> u32 {
    (u32::from(data) << 12) | u32::from(parity(data))
}

/// Decodes a received 20 bit word to the nearest code word's data byte.
///
/// Returns `None` when more than three bits are in error.
pub fn decode(received: u32) -> Option<u8> {
    let received = received & 0xF_FFFF;
    (0..=u8::MAX)
        .map(|data| (data, distance(encode(data), received)))
        .min_by_key(|&(_, d)| d)
        .filter(|&(_, d)| d <= 3)
        .map(|(data, _)| data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_parities() {
        assert_eq!(parity(0x01), 0x8EB);
        assert_eq!(parity(0x02), 0x93E);
        assert_eq!(parity(0x10), 0x367);
        assert_eq!(parity(0x00), 0);
    }

    #[test]
    fn test_linear() {
        assert_eq!(parity(0x11), parity(0x10) ^ parity(0x01));
    }

    #[test]
    fn test_corrects_three_errors() {
        let word = encode(0x12);
        assert_eq!(decode(word), Some(0x12));
        assert_eq!(decode(word ^ 0b1000_0000_0100_0000_0001), Some(0x12));
    }
}
