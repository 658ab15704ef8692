//! Hamming block codes used by DMR.
//!
//! Each code is described by a table of parity equations: parity bit `k`
//! (stored right after the data bits) is the XOR of the data bits selected by
//! `parity[k]`. Decoding computes the syndrome and flips the single bit whose
//! column matches it.

/// Result of checking one code word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Syndrome was zero.
    Clean,
    /// One bit at the given index was flipped.
    Corrected(usize),
    /// The syndrome matches no single bit error.
    Uncorrectable,
}

/// A systematic Hamming code defined by its parity equations.
#[derive(Debug)]
pub struct HammingCode {
    data_bits: usize,
    parity: &'static [u16],
}

/// Hamming(15,11,3), the row code of BPTC(196,96).
pub const HAMMING_15_11_3: HammingCode = HammingCode {
    data_bits: 11,
    parity: &[0x1AF, 0x35E, 0x6BC, 0x4D7],
};

/// Hamming(13,9,3), the column code of BPTC(196,96).
pub const HAMMING_13_9_3: HammingCode = HammingCode {
    data_bits: 9,
    parity: &[0x06B, 0x0D7, 0x1AF, 0x135],
};

/// Hamming(16,11,4), the row code of the embedded LC matrix.
pub const HAMMING_16_11_4: HammingCode = HammingCode {
    data_bits: 11,
    parity: &[0x1AF, 0x35E, 0x6BC, 0x4D7, 0x765],
};

impl HammingCode {
    /// Total code word length in bits.
    pub const fn word_len(&self) -> usize {
        self.data_bits + self.parity.len()
    }

    fn data_word(&self, bits: &[bool]) -> u16 {
        bits[..self.data_bits]
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, &b)| acc | (u16::from(b) << i))
    }

    fn column(&self, index: usize) -> u8 {
        if index < self.data_bits {
            self.parity
                .iter()
                .enumerate()
                .fold(0u8, |acc, (k, eq)| acc | (u8::from(eq >> index & 1 == 1) << k))
        } else {
            1 << (index - self.data_bits)
        }
    }

    /// Writes the parity bits of `bits[..len]`.
    pub fn encode(&self, bits: &mut [bool]) {
        let word = self.data_word(bits);
        for (k, eq) in self.parity.iter().enumerate() {
            bits[self.data_bits + k] = (word & eq).count_ones() % 2 == 1;
        }
    }

    fn syndrome(&self, bits: &[bool]) -> u8 {
        let word = self.data_word(bits);
        self.parity.iter().enumerate().fold(0u8, |acc, (k, eq)| {
            let expected = (word & eq).count_ones() % 2 == 1;
            acc | (u8::from(expected != bits[self.data_bits + k]) << k)
        })
    }

    /// Checks `bits[..len]` and corrects a single bit error in place.
    pub fn decode(&self, bits: &mut [bool]) -> Correction {
        let syndrome = self.syndrome(bits);
        if syndrome == 0 {
            return Correction::Clean;
        }
        match (0..self.word_len()).find(|&i| self.column(i) == syndrome) {
            Some(i) => {
                bits[i] = !bits[i];
                Correction::Corrected(i)
            }
            None => Correction::Uncorrectable,
        }
    }
}
