//! Embedded link control, spread over voice bursts B to E.
//!
//! The 72 LC bits plus a five bit checksum are placed in a 16 x 8 bit matrix.
//! Rows 0..7 are Hamming(16,11,4) code words and row 7 holds column parity.
//! The matrix is transmitted column wise as four 32 bit fragments, tagged by
//! the EMB LCSS values 1, 3, 3, 2.
//!
//! [`EmbeddedLc`] works in both directions: [`set_lc`](EmbeddedLc::set_lc)
//! followed by [`fragment`](EmbeddedLc::fragment) produces the fragments for
//! outgoing bursts, [`add_fragment`](EmbeddedLc::add_fragment) reassembles
//! incoming ones.

use super::bits::{bits_to_bytes, bytes_to_bits};
use super::crc::{check_five_bit, five_bit_checksum};
use super::emb::{LCSS_CONTINUATION, LCSS_FIRST, LCSS_LAST};
use super::hamming::{Correction, HAMMING_16_11_4};
use super::lc::LinkControl;
use crate::consts::LC_LENGTH_BYTES;

const MATRIX_BITS: usize = 128;
const FRAGMENT_BITS: usize = 32;
const ROW_BITS: usize = 16;
const PARITY_ROW: usize = 112;

/// LC bit ranges inside the matrix, in transmission order.
const LC_RANGES: [(usize, usize); 7] = [
    (0, 11),
    (16, 27),
    (32, 42),
    (48, 58),
    (64, 74),
    (80, 90),
    (96, 106),
];

/// Matrix positions of the checksum bits, most significant first.
const CHECKSUM_BITS: [usize; 5] = [42, 58, 74, 90, 106];

fn lc_positions() -> impl Iterator<Item = usize> {
    LC_RANGES.iter().flat_map(|&(start, end)| start..end)
}

/// Matrix index for each transmitted bit: columns are sent top to bottom.
fn column_order() -> impl Iterator<Item = usize> {
    (0..MATRIX_BITS).scan(0usize, |b, _| {
        let current = *b;
        *b += ROW_BITS;
        if *b > MATRIX_BITS - 1 {
            *b -= MATRIX_BITS - 1;
        }
        Some(current)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assembly {
    Idle,
    First,
    Second,
    Third,
}

/// Encoder and reassembler for embedded LC.
#[derive(Debug, Clone)]
pub struct EmbeddedLc {
    raw: [bool; MATRIX_BITS],
    lc: Option<[u8; LC_LENGTH_BYTES]>,
    assembly: Assembly,
}

impl Default for EmbeddedLc {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedLc {
    /// An empty instance holding no LC.
    pub const fn new() -> Self {
        Self {
            raw: [false; MATRIX_BITS],
            lc: None,
            assembly: Assembly::Idle,
        }
    }

    /// Forgets the current LC and any partial assembly.
    pub fn reset(&mut self) {
        self.raw = [false; MATRIX_BITS];
        self.lc = None;
        self.assembly = Assembly::Idle;
    }

    /// `true` while fragments of an LC have been seen but not completed.
    pub fn is_assembling(&self) -> bool {
        self.assembly != Assembly::Idle
    }

    /// Loads `lc` and encodes its transmit matrix.
    pub fn set_lc(&mut self, lc: &LinkControl) {
        self.set_raw_lc(&lc.raw());
    }

    /// Loads a raw LC block and encodes its transmit matrix.
    pub fn set_raw_lc(&mut self, raw: &[u8; LC_LENGTH_BYTES]) {
        self.lc = Some(*raw);
        self.assembly = Assembly::Idle;
        self.encode_matrix();
    }

    /// The last LC loaded or successfully reassembled.
    pub fn raw_lc(&self) -> Option<[u8; LC_LENGTH_BYTES]> {
        self.lc
    }

    /// [`raw_lc`](Self::raw_lc) as a structured [`LinkControl`].
    pub fn link_control(&self) -> Option<LinkControl> {
        self.lc.as_ref().map(LinkControl::from_raw)
    }

    fn encode_matrix(&mut self) {
        let Some(lc) = self.lc else {
            return;
        };
        let mut lc_bits = [false; LC_LENGTH_BYTES * 8];
        bytes_to_bits(&lc, &mut lc_bits);

        let mut data = [false; MATRIX_BITS];
        for (pos, bit) in lc_positions().zip(lc_bits) {
            data[pos] = bit;
        }
        let checksum = five_bit_checksum(&lc);
        for (i, pos) in CHECKSUM_BITS.iter().enumerate() {
            data[*pos] = checksum >> (4 - i) & 1 == 1;
        }
        for row in (0..PARITY_ROW).step_by(ROW_BITS) {
            HAMMING_16_11_4.encode(&mut data[row..row + ROW_BITS]);
        }
        for c in 0..ROW_BITS {
            data[PARITY_ROW + c] = (0..PARITY_ROW)
                .step_by(ROW_BITS)
                .fold(false, |acc, row| acc ^ data[row + c]);
        }

        for (a, b) in column_order().enumerate() {
            self.raw[a] = data[b];
        }
    }

    /// Embedded signalling bits for voice burst `n` (1..=4), aligned to burst
    /// bytes 13..20 for use with
    /// [`DMR_EMBED_SEQ_MASK`](super::sync::DMR_EMBED_SEQ_MASK).
    ///
    /// Any other `n`, or no LC loaded, gives the null fragment.
    pub fn fragment(&self, n: u8) -> [u8; 7] {
        let mut out = [0u8; 7];
        if !(1..=4).contains(&n) || self.lc.is_none() {
            return out;
        }
        let start = usize::from(n - 1) * FRAGMENT_BITS;
        let mut bits = [false; 40];
        bits[4..36].copy_from_slice(&self.raw[start..start + FRAGMENT_BITS]);
        let mut bytes = [0u8; 5];
        bits_to_bytes(&bits, &mut bytes);

        out[1] = bytes[0] & 0x0F;
        out[2] = bytes[1];
        out[3] = bytes[2];
        out[4] = bytes[3];
        out[5] = bytes[4] & 0xF0;
        out
    }

    /// Adds the fragment carried by `burst` (33 bytes) with the EMB's `lcss`.
    ///
    /// Returns `true` exactly once per complete, valid 1, 3, 3, 2 sequence.
    /// A fragment out of that order aborts the assembly in progress.
    pub fn add_fragment(&mut self, burst: &[u8], lcss: u8) -> bool {
        let mut bits = [false; 40];
        bytes_to_bits(&burst[14..19], &mut bits);
        let fragment = &bits[4..36];

        let slot = match (lcss, self.assembly) {
            (LCSS_FIRST, _) => 0,
            (LCSS_CONTINUATION, Assembly::First) => 1,
            (LCSS_CONTINUATION, Assembly::Second) => 2,
            (LCSS_LAST, Assembly::Third) => 3,
            _ => {
                if self.assembly != Assembly::Idle {
                    trace!("embedded LC assembly aborted by lcss {}", lcss);
                }
                self.assembly = Assembly::Idle;
                return false;
            }
        };
        let start = slot * FRAGMENT_BITS;
        self.raw[start..start + FRAGMENT_BITS].copy_from_slice(fragment);

        self.assembly = match slot {
            0 => Assembly::First,
            1 => Assembly::Second,
            2 => Assembly::Third,
            _ => Assembly::Idle,
        };
        if slot < 3 {
            return false;
        }

        match self.decode_matrix() {
            Some(lc) => {
                self.lc = Some(lc);
                self.encode_matrix();
                true
            }
            None => {
                debug!("embedded LC failed its checks");
                false
            }
        }
    }

    fn decode_matrix(&self) -> Option<[u8; LC_LENGTH_BYTES]> {
        let mut data = [false; MATRIX_BITS];
        for (a, b) in column_order().enumerate() {
            data[b] = self.raw[a];
        }

        for row in (0..PARITY_ROW).step_by(ROW_BITS) {
            if HAMMING_16_11_4.decode(&mut data[row..row + ROW_BITS]) == Correction::Uncorrectable {
                return None;
            }
        }
        for c in 0..ROW_BITS {
            let parity = (0..MATRIX_BITS)
                .step_by(ROW_BITS)
                .fold(false, |acc, row| acc ^ data[row + c]);
            if parity {
                return None;
            }
        }

        let mut lc_bits = [false; LC_LENGTH_BYTES * 8];
        for (bit, pos) in lc_bits.iter_mut().zip(lc_positions()) {
            *bit = data[pos];
        }
        let mut lc = [0u8; LC_LENGTH_BYTES];
        bits_to_bytes(&lc_bits, &mut lc);

        let checksum = CHECKSUM_BITS
            .iter()
            .fold(0u8, |acc, pos| (acc << 1) | u8::from(data[*pos]));
        check_five_bit(&lc, checksum).then_some(lc)
    }
}
