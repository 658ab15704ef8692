//! Sync and signalling patterns stamped into DMR bursts.
//!
//! These are golden tables: each pattern is applied with
//! [`apply_overlay`](super::bits::apply_overlay) through its matching mask.
//! The `*_FULL` patterns start at burst byte 12, the seven byte patterns at
//! burst byte [`EMBEDDED_DATA_OFFSET`](crate::consts::EMBEDDED_DATA_OFFSET).

/// Burst byte where the nine byte LC sync overlays start.
pub const LC_SYNC_OFFSET: usize = 12;

/// Slot type (colour code 1) and data sync of a Voice LC Header burst.
pub const VOICE_LC_SYNC_FULL: [u8; 9] = [0x04, 0x6D, 0x5D, 0x7F, 0x77, 0xFD, 0x75, 0x7E, 0x30];

/// Slot type (colour code 1) and data sync of a Terminator with LC burst.
pub const TERMINATOR_LC_SYNC_FULL: [u8; 9] =
    [0x04, 0xAD, 0x5D, 0x7F, 0x77, 0xFD, 0x75, 0x79, 0x60];

/// Bits covered by the LC sync overlays.
pub const LC_SYNC_MASK_FULL: [u8; 9] = [0x0F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xF0];

/// EMB patterns (colour code 1) for voice bursts A to F.
///
/// Index 0 is the voice sync burst and is never used with
/// [`DMR_AUDIO_SEQ_MASK`].
pub const DMR_AUDIO_SEQ_SYNC: [[u8; 7]; 6] = [
    [0x07, 0xF0, 0x00, 0x00, 0x00, 0x0F, 0xD0],
    [0x01, 0x30, 0x00, 0x00, 0x00, 0x09, 0x10],
    [0x01, 0x70, 0x00, 0x00, 0x00, 0x07, 0x40],
    [0x01, 0x70, 0x00, 0x00, 0x00, 0x07, 0x40],
    [0x01, 0x50, 0x00, 0x00, 0x00, 0x00, 0x70],
    [0x01, 0x10, 0x00, 0x00, 0x00, 0x0E, 0x20],
];

/// Bits of the EMB field.
pub const DMR_AUDIO_SEQ_MASK: [u8; 7] = [0x0F, 0xF0, 0x00, 0x00, 0x00, 0x0F, 0xF0];

/// Bits of the embedded signalling fragment.
pub const DMR_EMBED_SEQ_MASK: [u8; 7] = [0x00, 0x0F, 0xFF, 0xFF, 0xFF, 0xF0, 0x00];

/// Mobile station sourced voice sync.
pub const MS_SOURCED_AUDIO_SYNC: [u8; 7] = [0x07, 0xF7, 0xD5, 0xDD, 0x57, 0xDF, 0xD0];

/// Base station sourced voice sync.
pub const BS_SOURCED_AUDIO_SYNC: [u8; 7] = [0x07, 0x55, 0xFD, 0x7D, 0xF7, 0x5F, 0x70];

/// Base station sourced data sync.
pub const BS_SOURCED_DATA_SYNC: [u8; 7] = [0x0D, 0xFF, 0x57, 0xD7, 0x5D, 0xF5, 0xD0];

/// Mobile station sourced data sync.
pub const MS_SOURCED_DATA_SYNC: [u8; 7] = [0x0D, 0x5D, 0x7F, 0x77, 0xFD, 0x75, 0x70];

/// Bits of the 48 bit sync field.
pub const SYNC_MASK: [u8; 7] = [0x0F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xF0];

/// Burst byte where the stream marker patterns start.
pub const STREAM_MARKER_OFFSET: usize = 14;

/// Marker the host sends at the start of a stream.
pub const START_FRAME_PATTERN: [u8; 6] = [0xFF, 0x57, 0xD7, 0x5D, 0xF5, 0xD9];

/// Marker the host sends at the end of a stream.
pub const END_FRAME_PATTERN: [u8; 6] = [0x5D, 0x7F, 0x77, 0xFD, 0x75, 0x79];

/// Link control start/stop signalling value carried in the EMB of voice
/// bursts B to F, indexed by sequence number.
pub const EMBEDDED_LCSS: [u8; 6] = [0, 1, 3, 3, 2, 0];

/// Returns `true` if `burst` carries the host's start or end of stream marker.
pub fn is_stream_marker(burst: &[u8]) -> bool {
    burst
        .get(STREAM_MARKER_OFFSET..STREAM_MARKER_OFFSET + 6)
        .is_some_and(|field| field == &START_FRAME_PATTERN[..] || field == &END_FRAME_PATTERN[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_stay_inside_masks() {
        for (p, m) in VOICE_LC_SYNC_FULL.iter().zip(&LC_SYNC_MASK_FULL) {
            assert_eq!(p & !m, 0);
        }
        for (p, m) in TERMINATOR_LC_SYNC_FULL.iter().zip(&LC_SYNC_MASK_FULL) {
            assert_eq!(p & !m, 0);
        }
        for row in &DMR_AUDIO_SEQ_SYNC[1..] {
            for (p, m) in row.iter().zip(&DMR_AUDIO_SEQ_MASK) {
                assert_eq!(p & !m, 0);
            }
        }
        for (p, m) in MS_SOURCED_AUDIO_SYNC.iter().zip(&SYNC_MASK) {
            assert_eq!(p & !m, 0);
        }
    }

    #[test]
    fn test_emb_and_embedded_masks_are_disjoint() {
        for (a, b) in DMR_AUDIO_SEQ_MASK.iter().zip(&DMR_EMBED_SEQ_MASK) {
            assert_eq!(a & b, 0);
        }
    }

    #[test]
    fn test_stream_markers() {
        let mut burst = [0u8; 33];
        assert!(!is_stream_marker(&burst));
        burst[14..20].copy_from_slice(&END_FRAME_PATTERN);
        assert!(is_stream_marker(&burst));
        burst[14..20].copy_from_slice(&START_FRAME_PATTERN);
        assert!(is_stream_marker(&burst));
        assert!(!is_stream_marker(&burst[..18]));
    }
}
