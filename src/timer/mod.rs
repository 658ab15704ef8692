//! Main loop pacing for the hotspot gateway.
//!
//! The gateway has no clock of its own: its timeouts are counted in main loop
//! passes (see [`HotspotConfig`](crate::config::HotspotConfig)). The helpers
//! here convert between passes and wall time for a given pass length, and the
//! `delay-loop` feature adds a blocking loop that paces the passes with an
//! `embedded_hal::delay::DelayNs`.
//!
//! | Pass length | 5000 passes |
//! |-------------|-------------|
//! |      500 µs |       2.5 s |
//! |     1000 µs |         5 s |
//! |     2000 µs |        10 s |

use crate::config::HotspotConfig;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

/// Pass length the [`HotspotConfig::default`] counts are tuned for, in µs.
pub const DEFAULT_PASS_US: u32 = 1_000;

/// Number of passes of `pass_us` microseconds covering `ms` milliseconds.
///
/// Rounds up, never returns 0 and saturates at `u16::MAX`.
pub const fn passes_for_ms(ms: u32, pass_us: u32) -> u16 {
    let pass_us = if pass_us == 0 { 1 } else { pass_us as u64 };
    let passes = (ms as u64 * 1_000).div_ceil(pass_us);
    if passes == 0 {
        1
    } else if passes > u16::MAX as u64 {
        u16::MAX
    } else {
        passes as u16
    }
}

/// Wall time of `passes` passes of `pass_us` microseconds, in milliseconds.
pub const fn ms_for_passes(passes: u16, pass_us: u32) -> u32 {
    let ms = passes as u64 * pass_us as u64 / 1_000;
    if ms > u32::MAX as u64 { u32::MAX } else { ms as u32 }
}

impl HotspotConfig {
    /// Sets the buffering timeout and TX linger from wall times, for a main
    /// loop running one pass every `pass_us` microseconds.
    ///
    /// ```rust
    /// use dmr_hotspot::config::HotspotConfig;
    ///
    /// let config = HotspotConfig::default().with_timings(250, 5_000, 0);
    /// assert_eq!(config.tx_buffering_timeout, 20_000);
    /// assert_eq!(config.tx_linger_passes, 0);
    /// ```
    pub fn with_timings(mut self, pass_us: u32, buffering_ms: u32, linger_ms: u32) -> Self {
        self.tx_buffering_timeout = passes_for_ms(buffering_ms, pass_us);
        self.tx_linger_passes = if linger_ms == 0 {
            0
        } else {
            passes_for_ms(linger_ms, pass_us)
        };
        self
    }
}
