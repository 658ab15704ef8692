//! Test doubles shared by the gateway tests.

use crate::audio::AudioQueue;
use crate::config::HotspotConfig;
use crate::consts::{DMR_AUDIO_BYTES, LC_LENGTH_BYTES, RF_FRAME_LEN};
use crate::dmr::LinkControl;
use crate::gateway::{Gateway, HotspotQueues, NoLed};
use crate::radio::{SettingsStore, Transceiver};
use crate::rf::RfInboundQueue;
use crate::transport::{ByteQueue, HostLink};
use crate::ui::{Line, StatusDisplay, StatusScreen};
use core::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioCall {
    ActivateRx,
    StartTx,
    StopTx,
    SetFrequency(u32, u32),
    SetPower(u8),
    SetColourCode(u8),
}

#[derive(Debug)]
pub struct FakeRadio {
    pub calls: Vec<RadioCall>,
    pub power: u8,
    pub colour_code: u8,
    pub tx_busy: bool,
}

impl Default for FakeRadio {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            power: 3,
            colour_code: 1,
            tx_busy: false,
        }
    }
}

impl Transceiver for FakeRadio {
    fn activate_rx(&mut self) {
        self.calls.push(RadioCall::ActivateRx);
    }

    fn start_tx(&mut self) {
        self.tx_busy = true;
        self.calls.push(RadioCall::StartTx);
    }

    fn stop_tx(&mut self) {
        self.tx_busy = false;
        self.calls.push(RadioCall::StopTx);
    }

    fn is_tx_idle(&self) -> bool {
        !self.tx_busy
    }

    fn set_frequency(&mut self, rx: u32, tx: u32) {
        self.calls.push(RadioCall::SetFrequency(rx, tx));
    }

    fn set_power_level(&mut self, level: u8) {
        self.power = level;
        self.calls.push(RadioCall::SetPower(level));
    }

    fn power_level(&self) -> u8 {
        self.power
    }

    fn set_colour_code(&mut self, colour_code: u8) {
        self.colour_code = colour_code;
        self.calls.push(RadioCall::SetColourCode(colour_code));
    }

    fn colour_code(&self) -> u8 {
        self.colour_code
    }

    fn is_in_amateur_band(&self, freq: u32) -> bool {
        (14_400_000..=14_800_000).contains(&freq) || (42_000_000..=45_000_000).contains(&freq)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FakeSettings {
    pub power: u8,
    pub user_id: u32,
}

impl Default for FakeSettings {
    fn default() -> Self {
        Self {
            power: 4,
            user_id: 2_345_000,
        }
    }
}

impl SettingsStore for FakeSettings {
    fn power_level(&self) -> u8 {
        self.power
    }

    fn user_dmr_id(&self) -> u32 {
        self.user_id
    }
}

#[derive(Debug, Default)]
pub struct FakeDisplay {
    pub screens: Vec<StatusScreen>,
}

impl StatusDisplay for FakeDisplay {
    fn battery_percent(&mut self) -> u8 {
        80
    }

    fn contact_name(&mut self, _dmr_id: u32) -> Option<Line> {
        None
    }

    fn render(&mut self, screen: &StatusScreen) {
        self.screens.push(screen.clone());
    }
}

#[derive(Debug, Default)]
pub struct CaptureLink {
    pub frames: Vec<Vec<u8>>,
}

impl HostLink for CaptureLink {
    type Error = Infallible;

    fn send(&mut self, frame: &[u8]) -> nb::Result<(), Infallible> {
        self.frames.push(frame.to_vec());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Queues {
    pub to_host: ByteQueue,
    pub rf_inbound: RfInboundQueue,
    pub audio: AudioQueue,
}

impl Queues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hotspot(&self) -> HotspotQueues<'_> {
        HotspotQueues {
            to_host: &self.to_host,
            rf_inbound: &self.rf_inbound,
            audio: &self.audio,
        }
    }

    /// Drains everything queued for the host.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        let mut link = CaptureLink::default();
        while self.to_host.pending() > 0 {
            let _ = self.to_host.drain_one(&mut link);
        }
        link.frames
    }
}

pub type TestGateway<'q> = Gateway<'q, FakeRadio, FakeSettings, FakeDisplay, NoLed, NoLed>;

pub fn gateway(queues: &Queues) -> TestGateway<'_> {
    Gateway::new(
        HotspotConfig::default(),
        queues.hotspot(),
        FakeRadio::default(),
        FakeSettings::default(),
        FakeDisplay::default(),
        None,
        None,
    )
}

/// An RF interrupt frame carrying `lc`.
pub fn rf_frame(lc: &LinkControl, tag: u8, position: u8) -> [u8; RF_FRAME_LEN] {
    let mut bytes = [0u8; RF_FRAME_LEN];
    bytes[..LC_LENGTH_BYTES].copy_from_slice(&lc.raw());
    for (i, byte) in bytes[12..12 + DMR_AUDIO_BYTES].iter_mut().enumerate() {
        *byte = 0x80 | i as u8;
    }
    bytes[12 + DMR_AUDIO_BYTES] = tag;
    bytes[13 + DMR_AUDIO_BYTES] = position;
    bytes
}
