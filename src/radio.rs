//! Seams to the radio hardware and the persisted settings.
//!
//! The gateway never touches the RF chip or the codeplug directly. It drives
//! a [`Transceiver`] and reads defaults from a [`SettingsStore`], both
//! implemented by the firmware around it. Frequencies are in 10 Hz units
//! (43000000 = 430.000 MHz) and power is a level index into
//! [`POWER_LEVELS`].

/// Display labels of the transmit power levels, indexed by level.
pub const POWER_LEVELS: [&str; 8] = ["250mW", "500mW", "750mW", "1W", "2W", "3W", "4W", "5W"];

/// Power byte meaning "use the configured level".
pub const POWER_UNSET: u8 = 255;

/// Frequency ranges (inclusive, 10 Hz units) reserved for satellites, on
/// which the hotspot never transmits.
pub const SATELLITE_BANDS: [(u32, u32); 2] = [(14_580_000, 14_600_000), (43_500_000, 43_800_000)];

/// The RF side of the hotspot.
pub trait Transceiver {
    /// Switches the RF chip to receive.
    fn activate_rx(&mut self);
    /// Keys the transmitter.
    fn start_tx(&mut self);
    /// Requests the end of the current transmission.
    fn stop_tx(&mut self);
    /// `true` once the transmitter has finished sending.
    fn is_tx_idle(&self) -> bool;
    /// Tunes to `rx` and `tx` (10 Hz units) in DMR mode.
    fn set_frequency(&mut self, rx: u32, tx: u32);
    /// Sets the transmit power level.
    fn set_power_level(&mut self, level: u8);
    /// The current transmit power level.
    fn power_level(&self) -> u8;
    /// Sets the DMR colour code.
    fn set_colour_code(&mut self, colour_code: u8);
    /// The current DMR colour code.
    fn colour_code(&self) -> u8;
    /// `true` if `freq` (10 Hz units) lies in a band the radio may use.
    fn is_in_amateur_band(&self, freq: u32) -> bool;
}

/// Persistent user settings.
pub trait SettingsStore {
    /// The transmit power level configured for normal operation.
    fn power_level(&self) -> u8;
    /// The user's own DMR id.
    fn user_dmr_id(&self) -> u32;
}

/// `true` if `freq` is inside one of the [`SATELLITE_BANDS`].
pub fn is_satellite_band(freq: u32) -> bool {
    SATELLITE_BANDS
        .iter()
        .any(|&(low, high)| (low..=high).contains(&freq))
}

/// Maps the MMDVM power byte to a power level.
///
/// Returns `None` for [`POWER_UNSET`], meaning the configured level stays.
pub fn power_level_from_rf_power(rf_power: u8) -> Option<u8> {
    match rf_power {
        POWER_UNSET => None,
        p if p < 50 => Some(p / 16),
        p => Some(p / 50 + 2),
    }
}

/// Display label of power `level`; out of range levels show the highest.
pub fn power_label(level: u8) -> &'static str {
    POWER_LEVELS[usize::from(level).min(POWER_LEVELS.len() - 1)]
}
