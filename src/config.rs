//! Runtime configuration of the hotspot gateway.
//!
//! [`HotspotConfig`] collects the tunables of the state machine that are
//! counted in main loop passes, plus the strings and defaults reported to the
//! host. `HotspotConfig::default()` reproduces the firmware defaults.

/// Tunables for one [`Gateway`](crate::gateway::Gateway) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotspotConfig {
    /// Passes spent in `TxStartBuffering` before the call is abandoned.
    pub tx_buffering_timeout: u16,
    /// Transmission starts once the audio queue holds more frames than this.
    pub tx_prebuffer_frames: usize,
    /// Passes spent in `TxShutdown` waiting for more audio before returning to RX.
    pub tx_linger_passes: u16,
    /// First LC bytes which, seen in a completed embedded LC from the host,
    /// start a transmission that began mid-stream.
    pub late_start_lc_codes: &'static [u8],
    /// Firmware description returned by `GET_VERSION`.
    pub description: &'static str,
    /// Frequency (10 Hz units) shown before the host configures one.
    pub default_frequency: u32,
    /// `SET_FREQ` values are divided by this to get 10 Hz units.
    ///
    /// 1 when the host already sends 10 Hz units, 10 for a host sending Hz.
    pub frequency_divisor: u32,
}

impl HotspotConfig {
    /// Firmware description used by [`HotspotConfig::default`].
    pub const DEFAULT_DESCRIPTION: &'static str =
        concat!("DMR Hotspot v", env!("CARGO_PKG_VERSION"));

    /// Late start LC codes used by [`HotspotConfig::default`]: group and private voice.
    pub const DEFAULT_LATE_START_LC_CODES: &'static [u8] = &[0x00, 0x03];

    /// Returns `true` if a completed embedded LC starting with `first_byte`
    /// should start a transmission.
    pub fn is_late_start_code(&self, first_byte: u8) -> bool {
        self.late_start_lc_codes.contains(&first_byte)
    }
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            tx_buffering_timeout: 5000,
            tx_prebuffer_frames: 4,
            tx_linger_passes: 0,
            late_start_lc_codes: Self::DEFAULT_LATE_START_LC_CODES,
            description: Self::DEFAULT_DESCRIPTION,
            default_frequency: 43_000_000,
            frequency_divisor: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_late_start_policy() {
        let config = HotspotConfig::default();
        assert!(config.is_late_start_code(0x00));
        assert!(config.is_late_start_code(0x03));
        assert!(!config.is_late_start_code(0x04));
        assert!(config.description.starts_with("DMR Hotspot v"));
    }
}
