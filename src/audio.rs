//! Voice frames from the host waiting to be transmitted.
//!
//! The gateway extracts the 27 vocoder bytes of each DMR voice burst the host
//! sends and queues them, tagged with the LC in force, in an [`AudioQueue`].
//! The transmit side of the radio pops them at the air rate.

use crate::consts::{DMR_AUDIO_BYTES, DMR_FRAME_LENGTH_BYTES, HOTSPOT_BUFFER_COUNT, LC_LENGTH_BYTES};
use crate::ring::SharedRing;

/// One voice burst's worth of audio and the LC to embed with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetVoiceFrame {
    /// Raw LC of the call, used for the embedded signalling on air.
    pub lc: [u8; LC_LENGTH_BYTES],
    /// Vocoder payload.
    pub audio: [u8; DMR_AUDIO_BYTES],
}

impl NetVoiceFrame {
    /// Takes the audio out of a 33 byte voice `burst`.
    ///
    /// The 108 bits either side of the sync field are joined; byte 13 of the
    /// audio is split over burst bytes 13 and 19.
    pub fn from_burst(lc: [u8; LC_LENGTH_BYTES], burst: &[u8; DMR_FRAME_LENGTH_BYTES]) -> Self {
        let mut audio = [0u8; DMR_AUDIO_BYTES];
        audio[..13].copy_from_slice(&burst[..13]);
        audio[13] = (burst[13] & 0xF0) | (burst[19] & 0x0F);
        audio[14..].copy_from_slice(&burst[20..]);
        Self { lc, audio }
    }
}

/// Ring of [`HOTSPOT_BUFFER_COUNT`] voice frames shared with the transmitter.
///
/// A full queue overwrites its oldest frame.
#[derive(Debug, Default)]
pub struct AudioQueue {
    ring: SharedRing<NetVoiceFrame, HOTSPOT_BUFFER_COUNT>,
}

impl AudioQueue {
    /// An empty queue, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            ring: SharedRing::new(),
        }
    }

    /// Queues `frame`, logging when the oldest frame had to be dropped.
    pub fn push(&self, frame: NetVoiceFrame) {
        if self.ring.push_overwrite(frame) {
            warn!("audio queue overflow, oldest frame dropped");
        }
    }

    /// Takes the oldest frame, for the transmitter.
    pub fn pop(&self) -> Option<NetVoiceFrame> {
        self.ring.pop()
    }

    /// Number of queued frames.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// `true` when no audio is queued.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Free frames, as reported to the host.
    pub fn space(&self) -> usize {
        self.ring.capacity() - self.ring.len()
    }

    /// Drops all queued audio.
    pub fn clear(&self) {
        self.ring.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: u8) -> NetVoiceFrame {
        NetVoiceFrame {
            lc: [tag; LC_LENGTH_BYTES],
            audio: [tag; DMR_AUDIO_BYTES],
        }
    }

    #[test]
    fn test_audio_skips_the_sync_field() {
        let mut burst = [0u8; DMR_FRAME_LENGTH_BYTES];
        for (i, byte) in burst.iter_mut().enumerate() {
            *byte = i as u8;
        }
        burst[13] = 0xAB;
        burst[19] = 0xCD;
        let voice = NetVoiceFrame::from_burst([0; LC_LENGTH_BYTES], &burst);
        assert_eq!(voice.audio[..13], burst[..13]);
        assert_eq!(voice.audio[13], 0xAD);
        assert_eq!(voice.audio[14], 20);
        assert_eq!(voice.audio[26], 32);
    }

    #[test]
    fn test_overflow_keeps_newest() {
        let queue = AudioQueue::new();
        for i in 0..(HOTSPOT_BUFFER_COUNT + 2) {
            queue.push(frame(i as u8));
        }
        assert_eq!(queue.len(), HOTSPOT_BUFFER_COUNT);
        assert_eq!(queue.space(), 0);
        assert_eq!(queue.pop(), Some(frame(2)));
    }

    #[test]
    fn test_space_tracks_len() {
        let queue = AudioQueue::new();
        assert_eq!(queue.space(), HOTSPOT_BUFFER_COUNT);
        queue.push(frame(1));
        assert_eq!(queue.space(), HOTSPOT_BUFFER_COUNT - 1);
        queue.clear();
        assert!(queue.is_empty());
    }
}
