//! Status screen contents.
//!
//! The gateway does not draw anything. It fills a [`StatusScreen`] with the
//! text to show and passes it to a [`StatusDisplay`], which also supplies the
//! battery level and contact names from the radio's own tables.

use core::fmt::Write;
use heapless::String;

/// Characters per status line.
pub const LINE_LEN: usize = 16;

/// One line of status text.
pub type Line = String<LINE_LEN>;

/// Title line of the hotspot screen.
pub const TITLE: &str = "DMR Hotspot";

/// The display and the lookups behind it.
pub trait StatusDisplay {
    /// Battery charge, 0..=100.
    fn battery_percent(&mut self) -> u8;
    /// Name of the contact with `dmr_id`, if known.
    fn contact_name(&mut self, dmr_id: u32) -> Option<Line>;
    /// Shows `screen`.
    fn render(&mut self, screen: &StatusScreen);
}

/// Text of the hotspot status screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusScreen {
    /// Always [`TITLE`].
    pub title: Line,
    /// Battery percentage, e.g. `87%`.
    pub battery: Line,
    /// Caller name or id, empty when idle.
    pub caller: Line,
    /// `TG n` or `PC n` during a call, `CC:n` when idle.
    pub target: Line,
    /// Power label shown next to the colour code when idle.
    pub power: Option<&'static str>,
    /// `T fff.ffff MHz` while transmitting, `R fff.ffff MHz` otherwise.
    pub frequency: Line,
}

/// What the screen is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ScreenMode {
    /// Sending a call from the network.
    Transmitting {
        /// Caller id.
        src_id: u32,
        /// Destination id, with the FLCO in the top byte.
        target: u32,
        /// TX frequency, 10 Hz units.
        tx_freq: u32,
    },
    /// A call from the air was just picked up.
    RxCall {
        /// Caller id.
        src_id: u32,
        /// Destination id.
        dst_id: u32,
        /// `true` for a group call.
        group: bool,
        /// RX frequency, 10 Hz units.
        rx_freq: u32,
    },
    /// Nothing going on.
    Idle {
        /// Current colour code.
        colour_code: u8,
        /// Label of the current power level.
        power: &'static str,
        /// RX frequency, 10 Hz units.
        rx_freq: u32,
    },
}

impl StatusScreen {
    /// Builds the screen for `mode`, looking names and battery up on `display`.
    pub fn build<D: StatusDisplay + ?Sized>(display: &mut D, mode: &ScreenMode) -> Self {
        let mut screen = StatusScreen::default();
        let _ = screen.title.push_str(TITLE);
        let _ = write!(screen.battery, "{}%", display.battery_percent().min(100));

        match *mode {
            ScreenMode::Transmitting {
                src_id,
                target,
                tx_freq,
            } => {
                screen.caller = caller_line(display, src_id & 0xFF_FFFF);
                screen.target = target_line(target & 0xFF_FFFF, target & 0xFF00_0000 == 0);
                screen.frequency = frequency_line('T', tx_freq);
            }
            ScreenMode::RxCall {
                src_id,
                dst_id,
                group,
                rx_freq,
            } => {
                screen.caller = caller_line(display, src_id);
                screen.target = target_line(dst_id, group);
                screen.frequency = frequency_line('R', rx_freq);
            }
            ScreenMode::Idle {
                colour_code,
                power,
                rx_freq,
            } => {
                let _ = write!(screen.target, "CC:{}", colour_code);
                screen.power = Some(power);
                screen.frequency = frequency_line('R', rx_freq);
            }
        }
        screen
    }
}

fn caller_line<D: StatusDisplay + ?Sized>(display: &mut D, src_id: u32) -> Line {
    display.contact_name(src_id).unwrap_or_else(|| {
        let mut line = Line::new();
        let _ = write!(line, "ID {}", src_id);
        line
    })
}

fn target_line(id: u32, group: bool) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "{} {}", if group { "TG" } else { "PC" }, id);
    line
}

/// `R 430.1250 MHz` style line for a frequency in 10 Hz units.
pub fn frequency_line(prefix: char, freq: u32) -> Line {
    let mut line = Line::new();
    let _ = write!(
        line,
        "{} {}.{:04} MHz",
        prefix,
        freq / 100_000,
        (freq % 100_000) / 10
    );
    line
}
