//! Error types for the host protocol.
//!
//! Every variant is recoverable: the dispatcher turns [`ProtocolError`] into a
//! NAK frame (or drops the request for framing errors) and the gateway keeps
//! running.

use crate::consts::NAK_INVALID_ARGUMENT;

/// A failure while parsing or validating one host request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ProtocolError {
    /// An argument was missing or out of range.
    #[error("invalid argument")]
    InvalidArgument,
    /// The command id is not part of the protocol table.
    #[error("unknown command {0:#04x}")]
    UnknownCommand(u8),
    /// The first byte was not the frame start marker.
    #[error("bad start marker {0:#04x}")]
    BadStartMarker(u8),
    /// Fewer bytes than the frame header announces.
    #[error("truncated frame")]
    Truncated,
    /// The frame is longer than the largest supported frame.
    #[error("frame too long")]
    TooLong,
}

impl ProtocolError {
    /// Error code carried in the NAK for this error, if the host should see one.
    ///
    /// Framing errors return `None`: the request is dropped without a reply.
    pub fn nak_code(&self) -> Option<u8> {
        match self {
            ProtocolError::InvalidArgument => Some(NAK_INVALID_ARGUMENT),
            ProtocolError::UnknownCommand(id) => Some(*id),
            ProtocolError::BadStartMarker(_) | ProtocolError::Truncated | ProtocolError::TooLong => {
                None
            }
        }
    }
}
