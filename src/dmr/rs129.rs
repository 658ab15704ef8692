//! Reed-Solomon (12,9) checksum of the full link control.
//!
//! Arithmetic is in GF(2^8) with field polynomial `0x11D`; the generator is
//! `x^3 + 14x^2 + 56x + 64`. Only encoding and checking are needed: the
//! BPTC layer already corrects bit errors.

const FIELD_POLY: u16 = 0x11D;
const POLY: [u8; 4] = [64, 56, 14, 1];

/// Number of parity bytes.
pub const PARITY_LEN: usize = 3;

fn gmul(a: u8, b: u8) -> u8 {
    let mut a = u16::from(a);
    let mut b = b;
    let mut product = 0u16;
    while b != 0 {
        if b & 1 == 1 {
            product ^= a;
        }
        a <<= 1;
        if a & 0x100 != 0 {
            a ^= FIELD_POLY;
        }
        b >>= 1;
    }
    product as u8
}

/// Computes the three parity bytes of `msg`, lowest order first.
pub fn parity(msg: &[u8]) -> [u8; PARITY_LEN] {
    let mut parity = [0u8; PARITY_LEN];
    for &byte in msg {
        let feedback = byte ^ parity[PARITY_LEN - 1];
        for j in (1..PARITY_LEN).rev() {
            parity[j] = parity[j - 1] ^ gmul(POLY[j], feedback);
        }
        parity[0] = gmul(POLY[0], feedback);
    }
    parity
}

/// Returns `true` if the last three bytes of a 12 byte block are the parity
/// of the first nine, transmitted highest order first.
pub fn check(block: &[u8; 12]) -> bool {
    let parity = parity(&block[..9]);
    block[9] == parity[2] && block[10] == parity[1] && block[11] == parity[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_multiplication() {
        assert_eq!(gmul(0, 0x53), 0);
        assert_eq!(gmul(1, 0x53), 0x53);
        // x^7 * x = x^8 = x^4 + x^3 + x^2 + 1
        assert_eq!(gmul(0x80, 0x02), 0x1D);
        assert_eq!(gmul(0x53, 0xCA), gmul(0xCA, 0x53));
    }

    #[test]
    fn test_zero_message_has_zero_parity() {
        assert_eq!(parity(&[0u8; 9]), [0, 0, 0]);
    }

    #[test]
    fn test_check_detects_corruption() {
        let mut block = [0u8; 12];
        block[..9].copy_from_slice(&[0x00, 0x00, 0x20, 0x00, 0x0C, 0x30, 0x2F, 0x9B, 0xE5]);
        let p = parity(&block[..9]);
        block[9] = p[2];
        block[10] = p[1];
        block[11] = p[0];
        assert!(check(&block));
        block[4] ^= 0x01;
        assert!(!check(&block));
    }
}
