//! Frames received over the air, on their way to the host.
//!
//! The radio's receive interrupt hands every decoded DMR frame to
//! [`RfInboundQueue::push_from_isr`] as a 41 byte [`RfFrame`]:
//!
//! | Bytes    | Content |
//! |----------|---------|
//! | `0..12`  | LC: FLCO, FID, options, destination, source, padding |
//! | `12..39` | 27 bytes of vocoder payload |
//! | `39`     | [`RxTag`] |
//! | `40`     | Position in the voice superframe, plus one |
//!
//! The gateway pops one frame per pass and turns it into a `DMR_DATA2` frame
//! for the host with [`voice_header_frame`], [`voice_frame`] or
//! [`terminator_frame`].

use crate::consts::{
    DMR_AUDIO_BYTES, DMR_DATA_FRAME_LEN, DMR_FRAME_LENGTH_BYTES, DMR_SYNC_DATA,
    EMBEDDED_DATA_OFFSET, HOTSPOT_BUFFER_COUNT, LC_LENGTH_BYTES, MMDVM_DMR_DATA2,
    MMDVM_FRAME_START, MMDVM_HEADER_LENGTH, MMDVM_VOICE_SYNC_PATTERN, RF_FRAME_LEN,
};
use crate::dmr::bits::apply_overlay;
use crate::dmr::sync::{
    DMR_AUDIO_SEQ_MASK, DMR_AUDIO_SEQ_SYNC, DMR_EMBED_SEQ_MASK, EMBEDDED_LCSS, LC_SYNC_MASK_FULL,
    LC_SYNC_OFFSET, MS_SOURCED_AUDIO_SYNC, SYNC_MASK, TERMINATOR_LC_SYNC_FULL, VOICE_LC_SYNC_FULL,
};
use crate::dmr::{Emb, EmbeddedLc, FullLcType, LinkControl, SlotType, full_lc};
use crate::ring::SharedRing;

const AUDIO_OFFSET: usize = 12;
const TAG_OFFSET: usize = AUDIO_OFFSET + DMR_AUDIO_BYTES;
const POSITION_OFFSET: usize = TAG_OFFSET + 1;

/// Highest voice burst sequence number (burst F).
pub const MAX_VOICE_SEQUENCE: u8 = 5;

/// What the receiver saw, as tagged by the RF interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RxTag {
    /// Nothing.
    Idle,
    /// A voice header started a call.
    Start,
    /// A call was joined without its header.
    StartLate,
    /// A voice burst.
    AudioFrame,
    /// The call ended.
    Stop,
    /// Idle or repeated burst.
    IdleOrRepeat,
    /// Unknown tag value.
    Other(u8),
}

impl From<u8> for RxTag {
    fn from(value: u8) -> Self {
        match value {
            0 => RxTag::Idle,
            1 => RxTag::Start,
            2 => RxTag::StartLate,
            3 => RxTag::AudioFrame,
            4 => RxTag::Stop,
            5 => RxTag::IdleOrRepeat,
            other => RxTag::Other(other),
        }
    }
}

/// One received frame in the RF interrupt's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfFrame(pub [u8; RF_FRAME_LEN]);

impl RfFrame {
    /// Copies a frame out of `bytes`, which must be exactly [`RF_FRAME_LEN`] long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(RfFrame)
    }

    /// The raw LC block.
    pub fn lc_raw(&self) -> [u8; LC_LENGTH_BYTES] {
        let mut raw = [0u8; LC_LENGTH_BYTES];
        raw.copy_from_slice(&self.0[..LC_LENGTH_BYTES]);
        raw
    }

    /// The LC block as a [`LinkControl`].
    pub fn link_control(&self) -> LinkControl {
        LinkControl::from_raw(&self.lc_raw())
    }

    /// The vocoder payload.
    pub fn audio(&self) -> &[u8] {
        &self.0[AUDIO_OFFSET..TAG_OFFSET]
    }

    /// The receiver's tag.
    pub fn tag(&self) -> RxTag {
        RxTag::from(self.0[TAG_OFFSET])
    }

    /// Voice burst sequence number, 0 for the sync burst.
    ///
    /// `None` when the position byte is 0 or past burst F.
    pub fn sequence(&self) -> Option<u8> {
        self.0[POSITION_OFFSET]
            .checked_sub(1)
            .filter(|seq| *seq <= MAX_VOICE_SEQUENCE)
    }
}

/// Frames from the RF interrupt waiting for the main loop.
///
/// # Example
/// ```rust
/// use dmr_hotspot::rf::RfInboundQueue;
///
/// static FROM_RF: RfInboundQueue = RfInboundQueue::new();
///
/// // in the receive interrupt
/// assert!(FROM_RF.push_from_isr(&[0u8; 41]));
/// assert!(!FROM_RF.push_from_isr(&[0u8; 12]));
/// ```
#[derive(Debug, Default)]
pub struct RfInboundQueue {
    ring: SharedRing<RfFrame, HOTSPOT_BUFFER_COUNT>,
}

impl RfInboundQueue {
    /// An empty queue, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            ring: SharedRing::new(),
        }
    }

    /// Copies one frame in. A full queue drops its oldest frame.
    ///
    /// # Arguments
    /// * `bytes` - One frame as read by the RF interrupt
    ///
    /// # Returns
    /// `false` if `bytes` is not a whole frame.
    pub fn push_from_isr(&self, bytes: &[u8]) -> bool {
        let Some(frame) = RfFrame::from_slice(bytes) else {
            return false;
        };
        // No logging here, this runs in interrupt context.
        let _ = self.ring.push_overwrite(frame);
        true
    }

    /// Takes the oldest frame.
    pub fn pop(&self) -> Option<RfFrame> {
        self.ring.pop()
    }

    /// Tag of the oldest frame, without taking it.
    pub fn peek_tag(&self) -> Option<RxTag> {
        self.ring.peek().map(|frame| frame.tag())
    }

    /// Number of queued frames.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// `true` when no frame is waiting.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Drops all waiting frames.
    pub fn clear(&self) {
        self.ring.clear();
    }
}

/// A `DMR_DATA2` frame for the host.
pub type HostDmrFrame = [u8; DMR_DATA_FRAME_LEN];

fn host_frame(control: u8, burst: &[u8; DMR_FRAME_LENGTH_BYTES]) -> HostDmrFrame {
    let mut frame = [0u8; DMR_DATA_FRAME_LEN];
    frame[..MMDVM_HEADER_LENGTH].copy_from_slice(&[
        MMDVM_FRAME_START,
        DMR_DATA_FRAME_LEN as u8,
        MMDVM_DMR_DATA2,
        control,
    ]);
    frame[MMDVM_HEADER_LENGTH..].copy_from_slice(burst);
    frame
}

fn full_lc_frame(lc: &LinkControl, kind: FullLcType, colour_code: u8) -> HostDmrFrame {
    let mut burst = full_lc::encode(lc, kind);
    let sync = match kind {
        FullLcType::VoiceLcHeader => &VOICE_LC_SYNC_FULL,
        FullLcType::TerminatorWithLc => &TERMINATOR_LC_SYNC_FULL,
    };
    apply_overlay(&mut burst[LC_SYNC_OFFSET..], &LC_SYNC_MASK_FULL, sync);
    SlotType {
        colour_code,
        data_type: kind.data_type(),
    }
    .write(&mut burst);
    host_frame(DMR_SYNC_DATA | u8::from(kind.data_type()), &burst)
}

/// Voice LC header frame for `lc`.
pub fn voice_header_frame(lc: &LinkControl, colour_code: u8) -> HostDmrFrame {
    full_lc_frame(lc, FullLcType::VoiceLcHeader, colour_code)
}

/// Terminator with LC frame for `lc`.
pub fn terminator_frame(lc: &LinkControl, colour_code: u8) -> HostDmrFrame {
    full_lc_frame(lc, FullLcType::TerminatorWithLc, colour_code)
}

/// Voice burst frame for `frame`, with embedded signalling from `embedded`.
///
/// Returns `None` for a malformed sequence number.
pub fn voice_frame(frame: &RfFrame, embedded: &EmbeddedLc, colour_code: u8) -> Option<HostDmrFrame> {
    let seq = frame.sequence()?;
    let audio = frame.audio();
    let mut burst = [0u8; DMR_FRAME_LENGTH_BYTES];
    burst[..14].copy_from_slice(&audio[..14]);
    burst[EMBEDDED_DATA_OFFSET + 6..].copy_from_slice(&audio[EMBEDDED_DATA_OFFSET..]);

    let field = &mut burst[EMBEDDED_DATA_OFFSET..EMBEDDED_DATA_OFFSET + 7];
    let control = if seq == 0 {
        apply_overlay(field, &SYNC_MASK, &MS_SOURCED_AUDIO_SYNC);
        MMDVM_VOICE_SYNC_PATTERN
    } else {
        let seq_index = usize::from(seq);
        apply_overlay(field, &DMR_AUDIO_SEQ_MASK, &DMR_AUDIO_SEQ_SYNC[seq_index]);
        apply_overlay(field, &DMR_EMBED_SEQ_MASK, &embedded.fragment(seq));
        Emb {
            colour_code,
            pi: false,
            lcss: EMBEDDED_LCSS[seq_index],
        }
        .write(&mut burst);
        seq
    };
    Some(host_frame(control, &burst))
}
