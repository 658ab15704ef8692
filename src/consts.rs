//! Constants used across the hotspot protocol implementation.
//!
//! This module defines the MMDVM serial protocol command identifiers, frame
//! layout sizes and buffer capacities shared by the dispatcher, the RF
//! pipeline and the gateway state machine.
//!
//! ## Key Concepts
//!
//! - **Frames**: every serial frame starts with [`MMDVM_FRAME_START`], followed
//!   by a total length byte and a command byte.
//! - **DMR bursts**: a DMR air burst is [`DMR_FRAME_LENGTH_BYTES`] long; it is
//!   carried behind a 4-byte header ([`MMDVM_HEADER_LENGTH`]) whose last byte
//!   is the sync/sequence control byte.
//! - **Buffer sizing**: the RF inbound ring and the net audio ring share the
//!   same entry count, which is also reported to the host as free space.

/// Start marker of every MMDVM serial frame.
pub const MMDVM_FRAME_START: u8 = 0xE0;

/// Request the firmware description and protocol version.
pub const MMDVM_GET_VERSION: u8 = 0x00;
/// Request the modem status block.
pub const MMDVM_GET_STATUS: u8 = 0x01;
/// Configure TX delay, modem mode and colour code.
pub const MMDVM_SET_CONFIG: u8 = 0x02;
/// Change the modem mode.
pub const MMDVM_SET_MODE: u8 = 0x03;
/// Set RX/TX frequencies and RF power.
pub const MMDVM_SET_FREQ: u8 = 0x04;
/// Calibration data (accepted, ignored).
pub const MMDVM_CAL_DATA: u8 = 0x08;
/// RSSI data (accepted, ignored).
pub const MMDVM_RSSI_DATA: u8 = 0x09;
/// Send a CW identification (accepted, ignored).
pub const MMDVM_SEND_CWID: u8 = 0x0A;

/// D-STAR header (accepted, ignored).
pub const MMDVM_DSTAR_HEADER: u8 = 0x10;
/// D-STAR data (accepted, ignored).
pub const MMDVM_DSTAR_DATA: u8 = 0x11;
/// D-STAR lost (accepted, ignored).
pub const MMDVM_DSTAR_LOST: u8 = 0x12;
/// D-STAR end of transmission (accepted, ignored).
pub const MMDVM_DSTAR_EOT: u8 = 0x13;

/// DMR data on timeslot 1.
pub const MMDVM_DMR_DATA1: u8 = 0x18;
/// DMR lost on timeslot 1.
pub const MMDVM_DMR_LOST1: u8 = 0x19;
/// DMR data on timeslot 2.
pub const MMDVM_DMR_DATA2: u8 = 0x1A;
/// DMR lost on timeslot 2.
pub const MMDVM_DMR_LOST2: u8 = 0x1B;
/// DMR short LC (CACH) update.
pub const MMDVM_DMR_SHORTLC: u8 = 0x1C;
/// DMR duplex start.
pub const MMDVM_DMR_START: u8 = 0x1D;
/// DMR abort.
pub const MMDVM_DMR_ABORT: u8 = 0x1E;

/// YSF data (accepted, ignored).
pub const MMDVM_YSF_DATA: u8 = 0x20;
/// YSF lost (accepted, ignored).
pub const MMDVM_YSF_LOST: u8 = 0x21;
/// P25 header (accepted, ignored).
pub const MMDVM_P25_HDR: u8 = 0x30;
/// P25 LDU (accepted, ignored).
pub const MMDVM_P25_LDU: u8 = 0x31;
/// P25 lost (accepted, ignored).
pub const MMDVM_P25_LOST: u8 = 0x32;
/// NXDN data (accepted, ignored).
pub const MMDVM_NXDN_DATA: u8 = 0x40;
/// NXDN lost (accepted, ignored).
pub const MMDVM_NXDN_LOST: u8 = 0x41;
/// POCSAG data (accepted, ignored).
pub const MMDVM_POCSAG_DATA: u8 = 0x50;

/// Positive acknowledge.
pub const MMDVM_ACK: u8 = 0x70;
/// Negative acknowledge.
pub const MMDVM_NAK: u8 = 0x7F;
/// Serial pass-through (accepted, ignored).
pub const MMDVM_SERIAL: u8 = 0x80;
/// Transparent data (accepted, ignored).
pub const MMDVM_TRANSPARENT: u8 = 0x90;
/// QSO information (accepted, ignored).
pub const MMDVM_QSO_INFO: u8 = 0x91;
/// Debug channel 1 (accepted, ignored).
pub const MMDVM_DEBUG1: u8 = 0xF1;
/// Debug channel 2 (accepted, ignored).
pub const MMDVM_DEBUG2: u8 = 0xF2;
/// Debug channel 3 (accepted, ignored).
pub const MMDVM_DEBUG3: u8 = 0xF3;
/// Debug channel 4 (accepted, ignored).
pub const MMDVM_DEBUG4: u8 = 0xF4;
/// Debug channel 5 (accepted, ignored).
pub const MMDVM_DEBUG5: u8 = 0xF5;

/// Protocol version reported by `GET_VERSION`.
pub const PROTOCOL_VERSION: u8 = 1;

/// NAK reason: an argument was out of range.
pub const NAK_INVALID_ARGUMENT: u8 = 4;

/// Length of the `start, length, command, control` header in front of a DMR burst.
pub const MMDVM_HEADER_LENGTH: usize = 4;

/// Smallest frame the host may send (`start, length, command`).
pub const MMDVM_MIN_REQUEST_LEN: usize = 3;

/// Largest serial frame handled in either direction.
pub const MMDVM_MAX_FRAME_LEN: usize = 64;

/// Length of one DMR air burst in bytes (264 bits).
pub const DMR_FRAME_LENGTH_BYTES: usize = 33;

/// Length of a serial frame carrying one DMR burst.
pub const DMR_DATA_FRAME_LEN: usize = DMR_FRAME_LENGTH_BYTES + MMDVM_HEADER_LENGTH;

/// Control byte flag: the burst carries a data sync.
pub const DMR_SYNC_DATA: u8 = 0x40;

/// Control byte flag: the burst carries a voice sync.
pub const DMR_SYNC_AUDIO: u8 = 0x20;

/// Control byte value for a voice burst that carries the voice sync (sequence 0).
pub const MMDVM_VOICE_SYNC_PATTERN: u8 = 0x20;

/// Number of entries in the RF inbound ring and the net audio ring.
pub const HOTSPOT_BUFFER_COUNT: usize = 48;

/// Capacity in bytes of the host transmit byte queue.
pub const COM_BUFFER_SIZE: usize = 1024;

/// Length of one RF inbound entry: 12 LC bytes, 27 air bytes and 2 signalling bytes.
pub const RF_FRAME_LEN: usize = 12 + 27 + 2;

/// Bytes of voice payload in a DMR burst once sync/EMB are removed (216 bits).
pub const DMR_AUDIO_BYTES: usize = 27;

/// Offset of the sync / embedded signalling field inside a DMR burst.
pub const EMBEDDED_DATA_OFFSET: usize = 13;

/// Length of the raw link control block.
pub const LC_LENGTH_BYTES: usize = 9;
