//! BPTC(196,96) block product turbo code.
//!
//! 96 payload bits are laid out in a 13 x 15 matrix, protected by
//! Hamming(15,11,3) on the nine data rows and Hamming(13,9,3) on every column,
//! then interleaved over the 196 info bits of a burst. The info bits surround
//! the 68 bit sync/slot type field: bursts bytes 0..12 plus the top two bits of
//! byte 12, then the low two bits of byte 20 plus bytes 21..33.

use super::bits::{bits_to_bytes, bytes_to_bits};
use super::hamming::{Correction, HAMMING_13_9_3, HAMMING_15_11_3};

const TOTAL_BITS: usize = 196;
const ROW_LEN: usize = 15;
const COLUMN_LEN: usize = 13;
const DATA_ROWS: usize = 9;
const MAX_PASSES: usize = 5;

/// Positions in the deinterleaved matrix that carry payload bits, in order.
fn data_positions() -> impl Iterator<Item = usize> {
    (4..=11).chain((1..DATA_ROWS).flat_map(|r| (r * ROW_LEN + 1)..=(r * ROW_LEN + 11)))
}

fn interleave_index(a: usize) -> usize {
    (a * 181) % TOTAL_BITS
}

fn read_info_bits(burst: &[u8], raw: &mut [bool; TOTAL_BITS]) {
    bytes_to_bits(&burst[..12], &mut raw[..96]);
    raw[96] = burst[12] & 0x80 != 0;
    raw[97] = burst[12] & 0x40 != 0;
    raw[98] = burst[20] & 0x02 != 0;
    raw[99] = burst[20] & 0x01 != 0;
    bytes_to_bits(&burst[21..33], &mut raw[100..]);
}

fn write_info_bits(raw: &[bool; TOTAL_BITS], burst: &mut [u8]) {
    bits_to_bytes(&raw[..96], &mut burst[..12]);
    burst[12] = (burst[12] & 0x3F) | (u8::from(raw[96]) << 7) | (u8::from(raw[97]) << 6);
    burst[20] = (burst[20] & 0xFC) | (u8::from(raw[98]) << 1) | u8::from(raw[99]);
    bits_to_bytes(&raw[100..], &mut burst[21..33]);
}

fn column(matrix: &[bool; TOTAL_BITS], c: usize) -> [bool; COLUMN_LEN] {
    let mut col = [false; COLUMN_LEN];
    for (a, bit) in col.iter_mut().enumerate() {
        *bit = matrix[c + 1 + a * ROW_LEN];
    }
    col
}

fn store_column(matrix: &mut [bool; TOTAL_BITS], c: usize, col: &[bool; COLUMN_LEN]) {
    for (a, bit) in col.iter().enumerate() {
        matrix[c + 1 + a * ROW_LEN] = *bit;
    }
}

/// Encodes 12 payload bytes into the info bits of `burst` (33 bytes).
///
/// Bits belonging to the sync and slot type field are left untouched.
pub fn encode(payload: &[u8; 12], burst: &mut [u8]) {
    let mut bits = [false; 96];
    bytes_to_bits(payload, &mut bits);

    let mut matrix = [false; TOTAL_BITS];
    for (pos, bit) in data_positions().zip(bits) {
        matrix[pos] = bit;
    }
    for r in 0..DATA_ROWS {
        let start = r * ROW_LEN + 1;
        HAMMING_15_11_3.encode(&mut matrix[start..start + ROW_LEN]);
    }
    for c in 0..ROW_LEN {
        let mut col = column(&matrix, c);
        HAMMING_13_9_3.encode(&mut col);
        store_column(&mut matrix, c, &col);
    }

    let mut raw = [false; TOTAL_BITS];
    for (a, bit) in matrix.iter().enumerate() {
        raw[interleave_index(a)] = *bit;
    }
    write_info_bits(&raw, burst);
}

/// Decodes the info bits of `burst` (33 bytes) into 12 payload bytes,
/// correcting what the row and column codes can.
pub fn decode(burst: &[u8]) -> [u8; 12] {
    let mut raw = [false; TOTAL_BITS];
    read_info_bits(burst, &mut raw);

    let mut matrix = [false; TOTAL_BITS];
    for (a, bit) in matrix.iter_mut().enumerate() {
        *bit = raw[interleave_index(a)];
    }

    for _ in 0..MAX_PASSES {
        let mut fixing = false;
        for c in 0..ROW_LEN {
            let mut col = column(&matrix, c);
            if let Correction::Corrected(_) = HAMMING_13_9_3.decode(&mut col) {
                store_column(&mut matrix, c, &col);
                fixing = true;
            }
        }
        for r in 0..DATA_ROWS {
            let start = r * ROW_LEN + 1;
            if let Correction::Corrected(_) =
                HAMMING_15_11_3.decode(&mut matrix[start..start + ROW_LEN])
            {
                fixing = true;
            }
        }
        if !fixing {
            break;
        }
    }

    let mut bits = [false; 96];
    for (bit, pos) in bits.iter_mut().zip(data_positions()) {
        *bit = matrix[pos];
    }
    let mut payload = [0u8; 12];
    bits_to_bytes(&bits, &mut payload);
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: [u8; 12] = [
        0x00, 0x00, 0x20, 0x00, 0x0C, 0x30, 0x2F, 0x9B, 0xE5, 0xDA, 0xD4, 0x5A,
    ];

    #[test]
    fn test_ninety_six_data_positions() {
        assert_eq!(data_positions().count(), 96);
        assert!(data_positions().all(|p| p < TOTAL_BITS));
    }

    #[test]
    fn test_interleave_is_a_permutation() {
        let mut seen = [false; TOTAL_BITS];
        for a in 0..TOTAL_BITS {
            seen[interleave_index(a)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_sync_field_is_untouched() {
        let mut burst = [0u8; 33];
        burst[12] = 0x3F;
        burst[13..20].fill(0xFF);
        burst[20] = 0xFC;
        encode(&PAYLOAD, &mut burst);
        assert_eq!(burst[12] & 0x3F, 0x3F);
        assert!(burst[13..20].iter().all(|b| *b == 0xFF));
        assert_eq!(burst[20] & 0xFC, 0xFC);
    }

    #[test]
    fn test_round_trip_with_bit_errors() {
        let mut burst = [0u8; 33];
        encode(&PAYLOAD, &mut burst);
        assert_eq!(decode(&burst), PAYLOAD);

        burst[2] ^= 0x10;
        burst[25] ^= 0x01;
        assert_eq!(decode(&burst), PAYLOAD);
    }
}
