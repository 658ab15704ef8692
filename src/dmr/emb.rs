//! EMB field of voice bursts B to F.
//!
//! Seven bits (colour code, privacy indicator, LCSS) are QR(16,7,6) encoded
//! and split around the embedded signalling fragment: the first byte of the
//! code word sits in the low nibble of burst byte 13 and the high nibble of
//! byte 14, the second in the low nibble of byte 18 and the high nibble of
//! byte 19.

use super::qr;

/// Link control start/stop value: a single fragment LC.
pub const LCSS_SINGLE: u8 = 0;
/// Link control start/stop value: first fragment.
pub const LCSS_FIRST: u8 = 1;
/// Link control start/stop value: last fragment.
pub const LCSS_LAST: u8 = 2;
/// Link control start/stop value: continuation fragment.
pub const LCSS_CONTINUATION: u8 = 3;

/// Decoded EMB field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Emb {
    /// Colour code, 0..=15.
    pub colour_code: u8,
    /// Privacy indicator.
    pub pi: bool,
    /// Link control start/stop, 0..=3.
    pub lcss: u8,
}

impl Emb {
    /// Seven bit value protected by the QR code.
    pub fn value(&self) -> u8 {
        ((self.colour_code & 0x0F) << 3) | (u8::from(self.pi) << 2) | (self.lcss & 0x03)
    }

    /// Reads and corrects the EMB of `burst` (at least 20 bytes).
    pub fn read(burst: &[u8]) -> Option<Emb> {
        let e0 = (burst[13] << 4) | (burst[14] >> 4);
        let e1 = (burst[18] << 4) | (burst[19] >> 4);
        qr::decode(u16::from_be_bytes([e0, e1])).map(|value| Emb {
            colour_code: value >> 3,
            pi: value & 0x04 != 0,
            lcss: value & 0x03,
        })
    }

    /// Writes the encoded EMB into `burst` (at least 20 bytes).
    pub fn write(&self, burst: &mut [u8]) {
        let [e0, e1] = qr::encode(self.value()).to_be_bytes();
        burst[13] = (burst[13] & 0xF0) | (e0 >> 4);
        burst[14] = (burst[14] & 0x0F) | (e0 << 4);
        burst[18] = (burst[18] & 0xF0) | (e1 >> 4);
        burst[19] = (burst[19] & 0x0F) | (e1 << 4);
    }
}
