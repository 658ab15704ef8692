//! Slot type field: colour code and data type, Golay(20,8) protected.
//!
//! The 20 bit code word straddles the sync field: ten bits before it (burst
//! byte 12 low six bits, byte 13 high four bits) and ten bits after it (byte
//! 19 low four bits, byte 20 bits 7..2).

use super::golay;

/// Data type carried in a slot type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DataType {
    /// Privacy indicator header.
    VoicePiHeader,
    /// Voice LC header.
    VoiceLcHeader,
    /// Terminator with LC.
    TerminatorWithLc,
    /// Control signalling block.
    Csbk,
    /// Data header.
    DataHeader,
    /// Rate 1/2 data.
    Rate12Data,
    /// Rate 3/4 data.
    Rate34Data,
    /// Idle burst.
    Idle,
    /// Any other four bit value.
    Other(u8),
}

impl From<u8> for DataType {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0 => DataType::VoicePiHeader,
            1 => DataType::VoiceLcHeader,
            2 => DataType::TerminatorWithLc,
            3 => DataType::Csbk,
            6 => DataType::DataHeader,
            7 => DataType::Rate12Data,
            8 => DataType::Rate34Data,
            9 => DataType::Idle,
            other => DataType::Other(other),
        }
    }
}

impl From<DataType> for u8 {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::VoicePiHeader => 0,
            DataType::VoiceLcHeader => 1,
            DataType::TerminatorWithLc => 2,
            DataType::Csbk => 3,
            DataType::DataHeader => 6,
            DataType::Rate12Data => 7,
            DataType::Rate34Data => 8,
            DataType::Idle => 9,
            DataType::Other(value) => value & 0x0F,
        }
    }
}

/// Colour code and data type of a data burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct SlotType {
    /// Colour code, 0..=15.
    pub colour_code: u8,
    /// Burst data type.
    pub data_type: DataType,
}

impl SlotType {
    /// Writes the encoded slot type into `burst` (at least 21 bytes).
    pub fn write(&self, burst: &mut [u8]) {
        let data = ((self.colour_code & 0x0F) << 4) | u8::from(self.data_type);
        let parity = golay::parity(data);
        let s0 = data;
        let s1 = (parity >> 4) as u8;
        let s2 = ((parity & 0x0F) << 4) as u8;

        burst[12] = (burst[12] & 0xC0) | ((s0 >> 2) & 0x3F);
        burst[13] = (burst[13] & 0x0F) | ((s0 << 6) & 0xC0) | ((s1 >> 2) & 0x30);
        burst[19] = (burst[19] & 0xF0) | ((s1 >> 2) & 0x0F);
        burst[20] = (burst[20] & 0x03) | ((s1 << 6) & 0xC0) | ((s2 >> 2) & 0x3C);
    }

    /// Reads and corrects the slot type of `burst` (at least 21 bytes).
    pub fn read(burst: &[u8]) -> Option<SlotType> {
        let s0 = ((burst[12] << 2) & 0xFC) | ((burst[13] >> 6) & 0x03);
        let s1 = ((burst[13] << 2) & 0xC0) | ((burst[19] << 2) & 0x3C) | ((burst[20] >> 6) & 0x03);
        let s2 = (burst[20] << 2) & 0xF0;
        let word = (u32::from(s0) << 12) | (u32::from(s1) << 4) | (u32::from(s2) >> 4);
        golay::decode(word).map(|data| SlotType {
            colour_code: data >> 4,
            data_type: DataType::from(data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmr::bits::matches_masked;
    use crate::dmr::sync::{LC_SYNC_MASK_FULL, TERMINATOR_LC_SYNC_FULL, VOICE_LC_SYNC_FULL};

    const SLOT_TYPE_MASK: [u8; 9] = [0x3F, 0xF0, 0, 0, 0, 0, 0, 0x0F, 0xFC];

    #[test]
    fn test_matches_golden_sync_for_colour_code_one() {
        let mut burst = [0u8; 33];
        SlotType { colour_code: 1, data_type: DataType::VoiceLcHeader }.write(&mut burst);
        let mut mask = SLOT_TYPE_MASK;
        for (m, full) in mask.iter_mut().zip(&LC_SYNC_MASK_FULL) {
            *m &= full;
        }
        assert!(matches_masked(&burst[12..21], &mask, &VOICE_LC_SYNC_FULL));

        SlotType { colour_code: 1, data_type: DataType::TerminatorWithLc }.write(&mut burst);
        assert!(matches_masked(&burst[12..21], &mask, &TERMINATOR_LC_SYNC_FULL));
    }

    #[test]
    fn test_read_back_with_errors() {
        let mut burst = [0xA5u8; 33];
        let slot = SlotType { colour_code: 7, data_type: DataType::TerminatorWithLc };
        slot.write(&mut burst);
        assert_eq!(SlotType::read(&burst), Some(slot));
        burst[12] ^= 0x01;
        burst[20] ^= 0x40;
        assert_eq!(SlotType::read(&burst), Some(slot));
    }
}
