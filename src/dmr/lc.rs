//! DMR link control.
//!
//! [`LinkControl`] is a structured view of the nine byte LC block carried by
//! voice headers, terminators and embedded signalling. The raw wire form
//! returned by [`LinkControl::raw`] is authoritative; conversion in both
//! directions is lossless.
//!
//! ## Wire layout
//!
//! | Byte | Content |
//! |------|---------|
//! | 0    | `PF << 7 \| R << 6 \| FLCO` |
//! | 1    | Feature set id |
//! | 2    | Service options |
//! | 3..6 | Destination id, big endian |
//! | 6..9 | Source id, big endian |

use crate::consts::LC_LENGTH_BYTES;

/// Full link control opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Flco {
    /// Group voice call.
    Group,
    /// Unit to unit (private) voice call.
    UserUser,
    /// Talker alias header.
    TalkerAliasHeader,
    /// Talker alias block 1.
    TalkerAliasBlock1,
    /// Talker alias block 2.
    TalkerAliasBlock2,
    /// Talker alias block 3.
    TalkerAliasBlock3,
    /// GPS information.
    GpsInfo,
    /// Any other six bit opcode, preserved as received.
    Other(u8),
}

impl From<u8> for Flco {
    fn from(value: u8) -> Self {
        match value & 0x3F {
            0 => Flco::Group,
            3 => Flco::UserUser,
            4 => Flco::TalkerAliasHeader,
            5 => Flco::TalkerAliasBlock1,
            6 => Flco::TalkerAliasBlock2,
            7 => Flco::TalkerAliasBlock3,
            8 => Flco::GpsInfo,
            other => Flco::Other(other),
        }
    }
}

impl From<Flco> for u8 {
    fn from(flco: Flco) -> Self {
        match flco {
            Flco::Group => 0,
            Flco::UserUser => 3,
            Flco::TalkerAliasHeader => 4,
            Flco::TalkerAliasBlock1 => 5,
            Flco::TalkerAliasBlock2 => 6,
            Flco::TalkerAliasBlock3 => 7,
            Flco::GpsInfo => 8,
            Flco::Other(value) => value & 0x3F,
        }
    }
}

/// Decoded link control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct LinkControl {
    /// Protect flag.
    pub pf: bool,
    /// Reserved bit.
    pub r: bool,
    /// Opcode.
    pub flco: Flco,
    /// Feature set id.
    pub fid: u8,
    /// Service options.
    pub options: u8,
    /// Destination id (24 bit).
    pub dst_id: u32,
    /// Source id (24 bit).
    pub src_id: u32,
}

impl LinkControl {
    /// A voice call LC with no feature set or options.
    pub fn new(flco: Flco, src_id: u32, dst_id: u32) -> Self {
        Self {
            pf: false,
            r: false,
            flco,
            fid: 0,
            options: 0,
            dst_id: dst_id & 0xFF_FFFF,
            src_id: src_id & 0xFF_FFFF,
        }
    }

    /// Builds the structured view of a raw LC block.
    pub fn from_raw(raw: &[u8; LC_LENGTH_BYTES]) -> Self {
        Self {
            pf: raw[0] & 0x80 != 0,
            r: raw[0] & 0x40 != 0,
            flco: Flco::from(raw[0]),
            fid: raw[1],
            options: raw[2],
            dst_id: read_u24(&raw[3..6]),
            src_id: read_u24(&raw[6..9]),
        }
    }

    /// The nine byte wire form.
    pub fn raw(&self) -> [u8; LC_LENGTH_BYTES] {
        let mut raw = [0u8; LC_LENGTH_BYTES];
        raw[0] = (u8::from(self.pf) << 7) | (u8::from(self.r) << 6) | u8::from(self.flco);
        raw[1] = self.fid;
        raw[2] = self.options;
        write_u24(&mut raw[3..6], self.dst_id);
        write_u24(&mut raw[6..9], self.src_id);
        raw
    }

    /// `true` for a group call.
    pub fn is_group(&self) -> bool {
        self.flco == Flco::Group
    }
}

pub(crate) fn read_u24(bytes: &[u8]) -> u32 {
    (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2])
}

fn write_u24(bytes: &mut [u8], value: u32) {
    bytes[0] = (value >> 16) as u8;
    bytes[1] = (value >> 8) as u8;
    bytes[2] = value as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_layout() {
        let lc = LinkControl::new(Flco::UserUser, 2_345_678, 91);
        assert_eq!(lc.raw(), [0x03, 0x00, 0x00, 0x00, 0x00, 0x5B, 0x23, 0xCA, 0xCE]);
    }

    #[test]
    fn test_raw_round_trip_keeps_flags_and_unknown_opcodes() {
        let raw = [0xFF, 0x10, 0x20, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let lc = LinkControl::from_raw(&raw);
        assert!(lc.pf);
        assert!(lc.r);
        assert_eq!(lc.flco, Flco::Other(0x3F));
        assert_eq!(lc.dst_id, 0x010203);
        assert_eq!(lc.src_id, 0x040506);
        assert_eq!(lc.raw(), raw);
    }

    #[test]
    fn test_flco_codes() {
        for code in 0..0x40u8 {
            assert_eq!(u8::from(Flco::from(code)), code);
        }
        assert_eq!(Flco::from(0x80), Flco::Group);
    }
}
