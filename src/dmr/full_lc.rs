//! Full link control carried by Voice LC Header and Terminator with LC bursts.
//!
//! The nine LC bytes get three Reed-Solomon (12,9) parity bytes, XORed with a
//! mask specific to the burst type, and the twelve bytes are BPTC(196,96)
//! encoded into the info bits of the burst. The sync and slot type field is
//! not written here.

use super::lc::LinkControl;
use super::slot_type::DataType;
use super::{bptc, rs129};
use crate::consts::{DMR_FRAME_LENGTH_BYTES, LC_LENGTH_BYTES};

/// Burst types that carry a full LC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum FullLcType {
    /// Voice LC header.
    VoiceLcHeader,
    /// Terminator with LC.
    TerminatorWithLc,
}

impl FullLcType {
    /// Mask XORed onto the Reed-Solomon parity bytes.
    pub fn crc_mask(self) -> u8 {
        match self {
            FullLcType::VoiceLcHeader => 0x96,
            FullLcType::TerminatorWithLc => 0x99,
        }
    }

    /// The slot type data type of this burst.
    pub fn data_type(self) -> DataType {
        match self {
            FullLcType::VoiceLcHeader => DataType::VoiceLcHeader,
            FullLcType::TerminatorWithLc => DataType::TerminatorWithLc,
        }
    }
}

/// Encodes `lc` into a fresh burst, with the sync field left zero.
pub fn encode(lc: &LinkControl, kind: FullLcType) -> [u8; DMR_FRAME_LENGTH_BYTES] {
    let mut burst = [0u8; DMR_FRAME_LENGTH_BYTES];
    encode_into(lc, kind, &mut burst);
    burst
}

/// Encodes `lc` into the info bits of an existing burst.
pub fn encode_into(lc: &LinkControl, kind: FullLcType, burst: &mut [u8]) {
    let mut block = [0u8; 12];
    block[..LC_LENGTH_BYTES].copy_from_slice(&lc.raw());
    let parity = rs129::parity(&block[..LC_LENGTH_BYTES]);
    let mask = kind.crc_mask();
    block[9] = parity[2] ^ mask;
    block[10] = parity[1] ^ mask;
    block[11] = parity[0] ^ mask;
    bptc::encode(&block, burst);
}

/// Decodes the full LC of `burst`, checking it as a `kind` burst.
///
/// Returns `None` if the Reed-Solomon check fails, which includes a burst of
/// the other type.
pub fn decode(burst: &[u8], kind: FullLcType) -> Option<LinkControl> {
    if burst.len() < DMR_FRAME_LENGTH_BYTES {
        return None;
    }
    let mut block = bptc::decode(burst);
    let mask = kind.crc_mask();
    for byte in &mut block[LC_LENGTH_BYTES..] {
        *byte ^= mask;
    }
    if !rs129::check(&block) {
        return None;
    }
    let mut raw = [0u8; LC_LENGTH_BYTES];
    raw.copy_from_slice(&block[..LC_LENGTH_BYTES]);
    Some(LinkControl::from_raw(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmr::lc::Flco;

    #[test]
    fn test_round_trip_preserves_ids_and_call_format() {
        for (flco, src, dst) in [
            (Flco::Group, 2_345_678u32, 91u32),
            (Flco::UserUser, 1, 0xFF_FFFF),
            (Flco::Group, 0x12_3456, 0x65_4321),
        ] {
            let lc = LinkControl::new(flco, src, dst);
            for kind in [FullLcType::VoiceLcHeader, FullLcType::TerminatorWithLc] {
                let burst = encode(&lc, kind);
                let decoded = decode(&burst, kind);
                assert_eq!(decoded.map(|d| (d.src_id, d.dst_id, d.flco)), Some((src, dst, flco)));
            }
        }
    }

    #[test]
    fn test_wrong_type_fails_the_check() {
        let lc = LinkControl::new(Flco::Group, 1234, 9);
        let burst = encode(&lc, FullLcType::VoiceLcHeader);
        assert_eq!(decode(&burst, FullLcType::TerminatorWithLc), None);
    }

    #[test]
    fn test_corrects_a_bit_error() {
        let lc = LinkControl::new(Flco::UserUser, 3_100_001, 3_100_002);
        let mut burst = encode(&lc, FullLcType::VoiceLcHeader);
        burst[5] ^= 0x04;
        assert_eq!(decode(&burst, FullLcType::VoiceLcHeader), Some(lc));
    }

    #[test]
    fn test_short_burst_is_rejected() {
        assert_eq!(decode(&[0u8; 20], FullLcType::VoiceLcHeader), None);
    }
}
