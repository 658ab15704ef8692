//! MMDVM serial framing.
//!
//! A serial frame is `[0xE0, length, command, payload…]` where `length` counts
//! the whole frame. This module holds the command table, the modem modes, a
//! parser for complete requests, a byte-wise [`FrameAssembler`] for links that
//! deliver a stream, and builders for every reply the gateway sends.

use crate::consts::*;
use crate::error::ProtocolError;
use heapless::Vec;

/// A serial frame of at most [`MMDVM_MAX_FRAME_LEN`] bytes.
pub type Frame = Vec<u8, MMDVM_MAX_FRAME_LEN>;

macro_rules! commands {
    ( $( $(#[$doc:meta])* $name:ident = $id:ident ),* $(,)? ) => {
        /// Commands of the MMDVM protocol.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
        pub enum Command {
            $( $(#[$doc])* $name, )*
        }

        impl Command {
            /// Looks up the command with wire id `id`.
            pub fn from_id(id: u8) -> Option<Command> {
                match id {
                    $( $id => Some(Command::$name), )*
                    _ => None,
                }
            }

            /// The wire id of this command.
            pub fn id(self) -> u8 {
                match self {
                    $( Command::$name => $id, )*
                }
            }
        }
    };
}

commands! {
    /// Firmware description request.
    GetVersion = MMDVM_GET_VERSION,
    /// Status request.
    GetStatus = MMDVM_GET_STATUS,
    /// Modem configuration.
    SetConfig = MMDVM_SET_CONFIG,
    /// Modem mode change.
    SetMode = MMDVM_SET_MODE,
    /// RX/TX frequencies and power.
    SetFreq = MMDVM_SET_FREQ,
    /// Calibration data.
    CalData = MMDVM_CAL_DATA,
    /// RSSI report.
    RssiData = MMDVM_RSSI_DATA,
    /// CW id transmission.
    SendCwid = MMDVM_SEND_CWID,
    /// D-STAR header.
    DStarHeader = MMDVM_DSTAR_HEADER,
    /// D-STAR data.
    DStarData = MMDVM_DSTAR_DATA,
    /// D-STAR lost.
    DStarLost = MMDVM_DSTAR_LOST,
    /// D-STAR end of transmission.
    DStarEot = MMDVM_DSTAR_EOT,
    /// DMR burst for slot 1.
    DmrData1 = MMDVM_DMR_DATA1,
    /// DMR slot 1 lost.
    DmrLost1 = MMDVM_DMR_LOST1,
    /// DMR burst for slot 2.
    DmrData2 = MMDVM_DMR_DATA2,
    /// DMR slot 2 lost.
    DmrLost2 = MMDVM_DMR_LOST2,
    /// DMR short LC.
    DmrShortLc = MMDVM_DMR_SHORTLC,
    /// DMR start.
    DmrStart = MMDVM_DMR_START,
    /// DMR abort.
    DmrAbort = MMDVM_DMR_ABORT,
    /// YSF data.
    YsfData = MMDVM_YSF_DATA,
    /// YSF lost.
    YsfLost = MMDVM_YSF_LOST,
    /// P25 header.
    P25Hdr = MMDVM_P25_HDR,
    /// P25 LDU.
    P25Ldu = MMDVM_P25_LDU,
    /// P25 lost.
    P25Lost = MMDVM_P25_LOST,
    /// NXDN data.
    NxdnData = MMDVM_NXDN_DATA,
    /// NXDN lost.
    NxdnLost = MMDVM_NXDN_LOST,
    /// POCSAG data.
    PocsagData = MMDVM_POCSAG_DATA,
    /// Acknowledgement.
    Ack = MMDVM_ACK,
    /// Negative acknowledgement.
    Nak = MMDVM_NAK,
    /// Serial passthrough.
    Serial = MMDVM_SERIAL,
    /// Transparent data.
    Transparent = MMDVM_TRANSPARENT,
    /// QSO information.
    QsoInfo = MMDVM_QSO_INFO,
    /// Debug message.
    Debug1 = MMDVM_DEBUG1,
    /// Debug message.
    Debug2 = MMDVM_DEBUG2,
    /// Debug message.
    Debug3 = MMDVM_DEBUG3,
    /// Debug message.
    Debug4 = MMDVM_DEBUG4,
    /// Debug message.
    Debug5 = MMDVM_DEBUG5,
}

/// Modem modes reported in `GET_STATUS` and set by `SET_CONFIG`/`SET_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum ModemMode {
    /// No mode active.
    #[default]
    Idle = 0,
    /// D-STAR.
    DStar = 1,
    /// DMR.
    Dmr = 2,
    /// System Fusion.
    Ysf = 3,
    /// P25.
    P25 = 4,
    /// NXDN.
    Nxdn = 5,
    /// POCSAG.
    Pocsag = 6,
    /// DMR DMO 1 kHz test tone.
    DmrDmo1k = 92,
    /// RSSI calibration.
    RssiCal = 96,
    /// CW id.
    CwId = 97,
    /// DMR calibration.
    DmrCal = 98,
    /// D-STAR calibration.
    DStarCal = 99,
    /// Internal calibration.
    IntCal = 100,
    /// POCSAG calibration.
    PocsagCal = 101,
}

impl ModemMode {
    /// Looks up a mode by its wire value.
    pub fn from_u8(value: u8) -> Option<ModemMode> {
        Some(match value {
            0 => ModemMode::Idle,
            1 => ModemMode::DStar,
            2 => ModemMode::Dmr,
            3 => ModemMode::Ysf,
            4 => ModemMode::P25,
            5 => ModemMode::Nxdn,
            6 => ModemMode::Pocsag,
            92 => ModemMode::DmrDmo1k,
            96 => ModemMode::RssiCal,
            97 => ModemMode::CwId,
            98 => ModemMode::DmrCal,
            99 => ModemMode::DStarCal,
            100 => ModemMode::IntCal,
            101 => ModemMode::PocsagCal,
            _ => return None,
        })
    }

    /// Only idle and DMR can be selected on this hotspot.
    pub fn is_supported(self) -> bool {
        matches!(self, ModemMode::Idle | ModemMode::Dmr)
    }
}

impl From<ModemMode> for u8 {
    fn from(mode: ModemMode) -> u8 {
        mode as u8
    }
}

/// A complete, framed host request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// Raw command id, which may not be in the [`Command`] table.
    pub command: u8,
    /// Bytes after the command byte, up to the announced length.
    pub payload: &'a [u8],
    /// The frame itself, up to the announced length.
    pub frame: &'a [u8],
}

impl<'a> Request<'a> {
    /// Parses one frame. Trailing bytes past the announced length are ignored.
    pub fn parse(frame: &'a [u8]) -> Result<Request<'a>, ProtocolError> {
        let (&start, _) = frame.split_first().ok_or(ProtocolError::Truncated)?;
        if start != MMDVM_FRAME_START {
            return Err(ProtocolError::BadStartMarker(start));
        }
        if frame.len() < MMDVM_MIN_REQUEST_LEN {
            return Err(ProtocolError::Truncated);
        }
        let length = usize::from(frame[1]);
        if length > MMDVM_MAX_FRAME_LEN {
            return Err(ProtocolError::TooLong);
        }
        if length < MMDVM_MIN_REQUEST_LEN || frame.len() < length {
            return Err(ProtocolError::Truncated);
        }
        Ok(Request {
            command: frame[2],
            payload: &frame[MMDVM_MIN_REQUEST_LEN..length],
            frame: &frame[..length],
        })
    }

    /// The command, if `command` is a known id.
    pub fn kind(&self) -> Option<Command> {
        Command::from_id(self.command)
    }
}

/// Reassembles frames from a byte stream.
///
/// Bytes before a start marker are skipped, and an impossible length byte
/// drops the partial frame.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buf: Frame,
}

impl FrameAssembler {
    /// An empty assembler.
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Discards any partial frame.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Adds one byte; returns the frame it completes, if any.
    pub fn feed(&mut self, byte: u8) -> Option<Frame> {
        if self.buf.is_empty() && byte != MMDVM_FRAME_START {
            trace!("skipping {} before frame start", byte);
            return None;
        }
        if self.buf.push(byte).is_err() {
            self.buf.clear();
            return None;
        }
        if self.buf.len() == 2 {
            let length = usize::from(byte);
            if !(MMDVM_MIN_REQUEST_LEN..=MMDVM_MAX_FRAME_LEN).contains(&length) {
                debug!("dropping frame with length {}", length);
                self.buf.clear();
                return None;
            }
        }
        if self.buf.len() >= MMDVM_MIN_REQUEST_LEN && self.buf.len() == usize::from(self.buf[1]) {
            return Some(core::mem::take(&mut self.buf));
        }
        None
    }
}

/// `ACK` for `command`.
pub fn ack(command: u8) -> [u8; 4] {
    [MMDVM_FRAME_START, 4, MMDVM_ACK, command]
}

/// `NAK` for `command` with error `code`.
pub fn nak(command: u8, code: u8) -> [u8; 5] {
    [MMDVM_FRAME_START, 5, MMDVM_NAK, command, code]
}

/// `GET_VERSION` reply carrying `description`, cut to fit one frame.
pub fn version_frame(description: &str) -> Frame {
    let text = description.as_bytes();
    let text = &text[..text.len().min(MMDVM_MAX_FRAME_LEN - MMDVM_HEADER_LENGTH)];
    let mut frame = Frame::new();
    // Fits: header plus at most MMDVM_MAX_FRAME_LEN - MMDVM_HEADER_LENGTH bytes.
    let _ = frame.extend_from_slice(&[
        MMDVM_FRAME_START,
        (MMDVM_HEADER_LENGTH + text.len()) as u8,
        MMDVM_GET_VERSION,
        PROTOCOL_VERSION,
    ]);
    let _ = frame.extend_from_slice(text);
    frame
}

/// Values reported by `GET_STATUS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Status {
    /// Current modem mode.
    pub mode: ModemMode,
    /// A transmission is being buffered, sent or shut down.
    pub tx_busy: bool,
    /// Free entries in the audio queue.
    pub dmr_space: u8,
}

/// Length of the `GET_STATUS` reply.
pub const STATUS_FRAME_LEN: usize = 13;

const STATUS_DMR_ENABLED: u8 = 0x02;
const STATUS_TX_BUSY: u8 = 0x01;
const DMR_SLOT1_SPACE: u8 = 10;

/// `GET_STATUS` reply.
pub fn status_frame(status: &Status) -> [u8; STATUS_FRAME_LEN] {
    let mut frame = [0u8; STATUS_FRAME_LEN];
    frame[0] = MMDVM_FRAME_START;
    frame[1] = STATUS_FRAME_LEN as u8;
    frame[2] = MMDVM_GET_STATUS;
    frame[3] = STATUS_DMR_ENABLED;
    frame[4] = status.mode.into();
    // RX and TX overflow (0x04, 0x08) are never reported.
    frame[5] = if status.tx_busy { STATUS_TX_BUSY } else { 0 };
    frame[7] = DMR_SLOT1_SPACE;
    frame[8] = status.dmr_space;
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_table_round_trips() {
        for id in 0..=u8::MAX {
            if let Some(command) = Command::from_id(id) {
                assert_eq!(command.id(), id);
            }
        }
        assert_eq!(Command::from_id(0x18), Some(Command::DmrData1));
        assert_eq!(Command::from_id(0x55), None);
    }

    #[test]
    fn test_parses_header_only_request() {
        let request = Request::parse(&[0xE0, 0x03, 0x00]).unwrap();
        assert_eq!(request.kind(), Some(Command::GetVersion));
        assert!(request.payload.is_empty());
    }

    #[test]
    fn test_payload_stops_at_announced_length() {
        let request = Request::parse(&[0xE0, 0x04, 0x03, 0x02, 0xAA, 0xBB]).unwrap();
        assert_eq!(request.payload, &[0x02]);
        assert_eq!(request.frame.len(), 4);
    }

    #[test]
    fn test_framing_errors() {
        assert_eq!(Request::parse(&[]), Err(ProtocolError::Truncated));
        assert_eq!(Request::parse(&[0x12, 0x03, 0x00]), Err(ProtocolError::BadStartMarker(0x12)));
        assert_eq!(Request::parse(&[0xE0, 0x05, 0x00]), Err(ProtocolError::Truncated));
        assert_eq!(Request::parse(&[0xE0, 0x02, 0x00]), Err(ProtocolError::Truncated));
        assert_eq!(Request::parse(&[0xE0, 65, 0x00]), Err(ProtocolError::TooLong));
    }

    #[test]
    fn test_assembler_resyncs_on_garbage() {
        let mut assembler = FrameAssembler::new();
        let mut frames = vec![];
        for byte in [0x00, 0x42, 0xE0, 0x01, 0xE0, 0x04, 0x03, 0x02, 0xE0, 0x03, 0x01] {
            if let Some(frame) = assembler.feed(byte) {
                frames.push(frame.to_vec());
            }
        }
        assert_eq!(frames, vec![vec![0xE0, 0x04, 0x03, 0x02], vec![0xE0, 0x03, 0x01]]);
    }

    #[test]
    fn test_replies() {
        assert_eq!(ack(0x02), [0xE0, 0x04, 0x70, 0x02]);
        assert_eq!(nak(0x04, 4), [0xE0, 0x05, 0x7F, 0x04, 0x04]);

        let version = version_frame("DMR Hotspot");
        assert_eq!(&version[..4], &[0xE0, 15, 0x00, 1]);
        assert_eq!(&version[4..], b"DMR Hotspot");

        let long = version_frame(core::str::from_utf8(&[b'x'; 80]).unwrap());
        assert_eq!(long.len(), MMDVM_MAX_FRAME_LEN);
        assert_eq!(usize::from(long[1]), MMDVM_MAX_FRAME_LEN);
    }

    #[test]
    fn test_status_layout() {
        let frame = status_frame(&Status {
            mode: ModemMode::Dmr,
            tx_busy: true,
            dmr_space: 44,
        });
        assert_eq!(frame, [0xE0, 13, 0x01, 0x02, 2, 0x01, 0, 10, 44, 0, 0, 0, 0]);
    }

    #[test]
    fn test_only_idle_and_dmr_are_supported() {
        assert!(ModemMode::Idle.is_supported());
        assert!(ModemMode::Dmr.is_supported());
        assert!(!ModemMode::from_u8(1).unwrap().is_supported());
        assert_eq!(ModemMode::from_u8(7), None);
    }
}
