//! DMR air interface codecs.
//!
//! Everything needed to turn link control data into the 33 byte bursts the
//! host expects and back:
//!
//! - [`full_lc`]: Voice LC Header / Terminator with LC payloads
//!   (Reed-Solomon (12,9) + BPTC(196,96)).
//! - [`embedded`]: LC fragments carried in voice bursts B to E.
//! - [`emb`] and [`slot_type`]: the short fields around the sync, QR(16,7,6)
//!   and Golay(20,8) protected.
//! - [`sync`]: golden sync and signalling patterns, applied with
//!   [`bits::apply_overlay`].
//!
//! A burst is 264 bits: 108 info bits, 48 bits of sync (or EMB plus embedded
//! signalling), 108 info bits. Voice bursts carry 216 bits of vocoder payload
//! in the info bits.

pub mod bits;
pub mod bptc;
pub(crate) mod crc;
pub mod emb;
pub mod embedded;
pub mod full_lc;
pub mod golay;
pub mod hamming;
pub mod lc;
pub mod qr;
pub mod rs129;
pub mod slot_type;
pub mod sync;

pub use emb::Emb;
pub use embedded::EmbeddedLc;
pub use full_lc::FullLcType;
pub use lc::{Flco, LinkControl};
pub use slot_type::{DataType, SlotType};
