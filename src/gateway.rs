//! The hotspot gateway.
//!
//! [`Gateway`] owns the radio-facing collaborators and the state machine, and
//! shares three queues with the rest of the firmware:
//!
//! - a [`ByteQueue`] of frames for the host, drained by [`Gateway::poll`],
//! - an [`RfInboundQueue`] filled by the RF receive interrupt,
//! - an [`AudioQueue`] emptied by the RF transmit side.
//!
//! The main loop calls [`Gateway::receive_host_bytes`] with whatever arrived
//! from the host and [`Gateway::poll`] once per pass.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dmr_hotspot::audio::AudioQueue;
//! use dmr_hotspot::config::HotspotConfig;
//! use dmr_hotspot::gateway::{Gateway, HotspotQueues};
//! use dmr_hotspot::rf::RfInboundQueue;
//! use dmr_hotspot::transport::ByteQueue;
//!
//! static TO_HOST: ByteQueue = ByteQueue::new();
//! static FROM_RF: RfInboundQueue = RfInboundQueue::new();
//! static AUDIO: AudioQueue = AudioQueue::new();
//!
//! let queues = HotspotQueues { to_host: &TO_HOST, rf_inbound: &FROM_RF, audio: &AUDIO };
//! let mut gateway = Gateway::new(
//!     HotspotConfig::default(), queues, radio, settings, display, Some(green), Some(red),
//! );
//! gateway.enter();
//! loop {
//!     while let Some(byte) = usb.read_byte() {
//!         gateway.receive_host_bytes(&[byte]);
//!     }
//!     gateway.poll(&mut usb);
//! }
//! ```

use crate::audio::{AudioQueue, NetVoiceFrame};
use crate::config::HotspotConfig;
use crate::consts::{DMR_DATA_FRAME_LEN, DMR_FRAME_LENGTH_BYTES, DMR_SYNC_AUDIO, DMR_SYNC_DATA, LC_LENGTH_BYTES, MMDVM_HEADER_LENGTH};
use crate::dmr::sync::is_stream_marker;
use crate::dmr::{Emb, EmbeddedLc, FullLcType, LinkControl, full_lc};
use crate::protocol::{FrameAssembler, ModemMode};
use crate::radio::{SettingsStore, Transceiver, power_label};
use crate::rf::{self, RfInboundQueue, RxTag};
use crate::state::{self, Action, GatewayState, StepInputs};
use crate::transport::{ByteQueue, HostLink};
use crate::ui::{ScreenMode, StatusDisplay, StatusScreen};
use core::convert::Infallible;
use embedded_hal::digital::{ErrorType, OutputPin};

/// The queues a gateway shares with interrupt handlers and the host link.
#[derive(Debug, Clone, Copy)]
pub struct HotspotQueues<'q> {
    /// Frames for the host.
    pub to_host: &'q ByteQueue,
    /// Frames from the RF receive interrupt.
    pub rf_inbound: &'q RfInboundQueue,
    /// Voice frames for the transmitter.
    pub audio: &'q AudioQueue,
}

/// Who is talking to whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct CallInfo {
    /// Caller id.
    pub src_id: u32,
    /// Destination id in the low 24 bits, FLCO in the top byte
    /// (0 for a talkgroup).
    pub target: u32,
}

impl CallInfo {
    /// Call info of `lc`.
    pub fn from_lc(lc: &LinkControl) -> Self {
        Self {
            src_id: lc.src_id,
            target: lc.dst_id | (u32::from(u8::from(lc.flco)) << 24),
        }
    }
}

/// Stand-in for a missing status LED.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLed;

impl ErrorType for NoLed {
    type Error = Infallible;
}

impl OutputPin for NoLed {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// MMDVM hotspot: bridges the host protocol and the radio.
///
/// ## Type Parameters
///
/// - `T`: the radio, a [`Transceiver`]
/// - `S`: persistent settings, a [`SettingsStore`]
/// - `D`: the status display, a [`StatusDisplay`]
/// - `G`, `R`: green (receive) and red (transmit) LEDs
#[derive(Debug)]
pub struct Gateway<'q, T, S, D, G = NoLed, R = NoLed>
where
    T: Transceiver,
    S: SettingsStore,
    D: StatusDisplay,
    G: OutputPin,
    R: OutputPin,
{
    pub(crate) config: HotspotConfig,
    pub(crate) state: GatewayState,
    pub(crate) queues: HotspotQueues<'q>,
    pub(crate) radio: T,
    pub(crate) settings: S,
    pub(crate) display: D,
    green: Option<G>,
    red: Option<R>,
    /// Encodes the embedded LC of calls received over the air.
    rx_embedded: EmbeddedLc,
    /// Reassembles the embedded LC of calls from the host.
    net_embedded: EmbeddedLc,
    pub(crate) tx_lc: [u8; LC_LENGTH_BYTES],
    pub(crate) call: CallInfo,
    saved_target: u32,
    pub(crate) modem_mode: ModemMode,
    pub(crate) rx_freq: u32,
    pub(crate) tx_freq: u32,
    pub(crate) power_level: u8,
    pub(crate) saved_power_level: Option<u8>,
    tx_active: bool,
    pub(crate) host_error: bool,
    pub(crate) host_error_count: u32,
    pub(crate) host_error_pending: bool,
    assembler: FrameAssembler,
}

impl<'q, T, S, D, G, R> Gateway<'q, T, S, D, G, R>
where
    T: Transceiver,
    S: SettingsStore,
    D: StatusDisplay,
    G: OutputPin,
    R: OutputPin,
{
    /// Creates a gateway in [`GatewayState::NotConnected`].
    ///
    /// # Arguments
    /// * `config` - Timeouts, prebuffer depth and host-facing settings
    /// * `queues` - Rings shared with the interrupt handlers and the host link
    /// * `radio` - The transceiver to key and tune
    /// * `settings` - Stored radio settings (power level, DMR ID)
    /// * `display` - Status screen sink
    /// * `green` - Optional LED lit while receiving
    /// * `red` - Optional LED lit while transmitting
    pub fn new(
        config: HotspotConfig,
        queues: HotspotQueues<'q>,
        radio: T,
        settings: S,
        display: D,
        green: Option<G>,
        red: Option<R>,
    ) -> Self {
        let call = CallInfo {
            src_id: settings.user_dmr_id(),
            target: 0,
        };
        let power_level = radio.power_level();
        Self {
            rx_freq: config.default_frequency,
            tx_freq: config.default_frequency,
            config,
            state: GatewayState::NotConnected,
            queues,
            radio,
            settings,
            display,
            green,
            red,
            rx_embedded: EmbeddedLc::new(),
            net_embedded: EmbeddedLc::new(),
            tx_lc: [0; LC_LENGTH_BYTES],
            call,
            saved_target: 0,
            modem_mode: ModemMode::Idle,
            power_level,
            saved_power_level: None,
            tx_active: false,
            host_error: false,
            host_error_count: 0,
            host_error_pending: false,
            assembler: FrameAssembler::new(),
        }
    }

    /// Hands back the collaborators.
    pub fn release(self) -> (T, S, D, Option<G>, Option<R>) {
        (self.radio, self.settings, self.display, self.green, self.red)
    }

    /// Current state.
    pub fn state(&self) -> GatewayState {
        self.state
    }

    /// Current modem mode.
    pub fn modem_mode(&self) -> ModemMode {
        self.modem_mode
    }

    /// Call shown on the transmit screen.
    pub fn call_info(&self) -> CallInfo {
        self.call
    }

    /// RX and TX frequencies, 10 Hz units.
    pub fn frequencies(&self) -> (u32, u32) {
        (self.rx_freq, self.tx_freq)
    }

    /// Power level in use.
    pub fn power_level(&self) -> u8 {
        self.power_level
    }

    /// Raw LC that goes out with host audio.
    pub fn tx_lc(&self) -> [u8; LC_LENGTH_BYTES] {
        self.tx_lc
    }

    /// `true` once the host has sent a NAK.
    pub fn host_error(&self) -> bool {
        self.host_error
    }

    /// Number of NAKs received from the host.
    pub fn host_error_count(&self) -> u32 {
        self.host_error_count
    }

    /// `true` while the transmitter is keyed.
    pub fn is_transmitting(&self) -> bool {
        self.tx_active
    }

    /// The radio.
    pub fn radio(&self) -> &T {
        &self.radio
    }

    /// The display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Starts hotspot mode.
    pub fn enter(&mut self) {
        info!("entering hotspot mode");
        self.saved_target = self.call.target;
        self.call = CallInfo::default();
        self.rx_freq = self.config.default_frequency;
        self.tx_freq = self.config.default_frequency;
        self.power_level = self.radio.power_level();
        self.saved_power_level = None;
        self.tx_active = false;
        self.host_error = false;
        self.host_error_count = 0;
        self.host_error_pending = false;
        self.rx_embedded.reset();
        self.net_embedded.reset();
        self.assembler.reset();
        self.set_state(GatewayState::Initialise);
        self.refresh_screen();
    }

    /// Leaves hotspot mode, dropping any transmission at once.
    pub fn exit(&mut self) {
        info!("leaving hotspot mode");
        if self.tx_active {
            self.tx_active = false;
            self.radio.stop_tx();
        }
        self.radio.activate_rx();
        if let Some(green) = self.green.as_mut() {
            let _ = green.set_low();
        }
        if let Some(red) = self.red.as_mut() {
            let _ = red.set_low();
        }
        if let Some(level) = self.saved_power_level.take() {
            self.radio.set_power_level(level);
            self.power_level = level;
        }
        self.call = CallInfo {
            src_id: self.settings.user_dmr_id(),
            target: self.saved_target,
        };
        self.queues.audio.clear();
        self.set_state(GatewayState::NotConnected);
    }

    /// Feeds bytes from the host link, handling every frame they complete.
    pub fn receive_host_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if let Some(frame) = self.assembler.feed(byte) {
                self.handle_request(&frame);
            }
        }
    }

    /// One main loop pass: sends one queued frame to the host, then advances
    /// the state machine.
    pub fn poll<L: HostLink>(&mut self, link: &mut L) {
        match self.queues.to_host.drain_one(link) {
            Ok(_) | Err(nb::Error::WouldBlock) => {}
            Err(nb::Error::Other(_)) => warn!("host link error, retrying"),
        }
        self.tick();
    }

    /// Advances the state machine by one step.
    pub fn tick(&mut self) {
        let inputs = StepInputs {
            config: &self.config,
            audio_count: self.queues.audio.len(),
            rf_head: self.queues.rf_inbound.peek_tag(),
            host_error: self.host_error_pending,
            modem_mode: self.modem_mode,
            tx_active: self.tx_active,
            tx_idle: self.radio.is_tx_idle(),
        };
        let transition = state::step(self.state, &inputs);
        for action in transition.actions {
            self.apply(action);
        }
        self.set_state(transition.next);
    }

    pub(crate) fn set_state(&mut self, next: GatewayState) {
        if next != self.state {
            debug!("hotspot {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::ClearAudio => self.queues.audio.clear(),
            Action::ProcessRfFrame => self.forward_rf_frame(),
            Action::ClearHostError => self.host_error_pending = false,
            Action::SetModemDmr => self.modem_mode = ModemMode::Dmr,
            Action::EnableTx => {
                if let Some(green) = self.green.as_mut() {
                    let _ = green.set_low();
                }
                if let Some(red) = self.red.as_mut() {
                    let _ = red.set_high();
                }
                self.tx_active = true;
                self.radio.start_tx();
            }
            Action::StopTx => {
                self.tx_active = false;
                self.radio.stop_tx();
            }
            Action::DisableTx => {
                if let Some(red) = self.red.as_mut() {
                    let _ = red.set_low();
                }
                self.radio.activate_rx();
            }
            Action::RefreshScreen => self.refresh_screen(),
        }
    }

    fn forward_rf_frame(&mut self) {
        let Some(frame) = self.queues.rf_inbound.pop() else {
            return;
        };
        let colour_code = self.radio.colour_code();
        match frame.tag() {
            RxTag::Start | RxTag::StartLate => {
                let lc = frame.link_control();
                debug!("RF call {} -> {}", lc.src_id, lc.dst_id);
                self.rx_embedded.set_lc(&lc);
                self.call = CallInfo::from_lc(&lc);
                self.render(ScreenMode::RxCall {
                    src_id: lc.src_id,
                    dst_id: lc.dst_id,
                    group: lc.is_group(),
                    rx_freq: self.rx_freq,
                });
                let _ = self.queues.to_host.enqueue(&rf::voice_header_frame(&lc, colour_code));
            }
            RxTag::AudioFrame => match rf::voice_frame(&frame, &self.rx_embedded, colour_code) {
                Some(voice) => {
                    let _ = self.queues.to_host.enqueue(&voice);
                }
                None => debug!("dropping RF voice frame with a bad position"),
            },
            RxTag::Stop => {
                let lc = frame.link_control();
                self.refresh_screen();
                let _ = self.queues.to_host.enqueue(&rf::terminator_frame(&lc, colour_code));
            }
            RxTag::Idle | RxTag::IdleOrRepeat | RxTag::Other(_) => {}
        }
    }

    /// Handles a `DMR_DATA1`/`DMR_DATA2` frame (header included) from the host.
    ///
    /// # Arguments
    /// * `frame` - The whole serial frame, `E0 len cmd control burst…`
    /// * `slot` - Timeslot the host addressed, 1 or 2
    pub fn receive_net_frame(&mut self, frame: &[u8], slot: u8) {
        if self.state == GatewayState::NotConnected {
            return;
        }
        let Some(burst) = frame
            .get(MMDVM_HEADER_LENGTH..DMR_DATA_FRAME_LEN)
            .and_then(|b| <&[u8; DMR_FRAME_LENGTH_BYTES]>::try_from(b).ok())
        else {
            debug!("short net frame for slot {}", slot);
            return;
        };
        let control = frame[MMDVM_HEADER_LENGTH - 1];

        let header = full_lc::decode(burst, FullLcType::VoiceLcHeader)
            .filter(|lc| lc.src_id != 0 && lc.dst_id != 0);
        if let Some(lc) = header {
            self.call = CallInfo::from_lc(&lc);
            if !matches!(self.state, GatewayState::TxStartBuffering { .. }) {
                info!("net call {} -> {} on slot {}", lc.src_id, lc.dst_id, slot);
                self.tx_lc = lc.raw();
                self.start_buffering();
            }
            return;
        }
        self.store_net_frame(control, burst);
    }

    fn start_buffering(&mut self) {
        self.set_state(GatewayState::TxStartBuffering {
            timeout: self.config.tx_buffering_timeout,
        });
    }

    fn store_net_frame(&mut self, control: u8, burst: &[u8; DMR_FRAME_LENGTH_BYTES]) {
        if is_stream_marker(burst) {
            trace!("net stream marker");
            return;
        }
        if control & DMR_SYNC_DATA != 0 {
            self.net_embedded.reset();
            return;
        }
        if control & DMR_SYNC_AUDIO == 0 {
            self.collect_embedded(burst);
        }
        self.queues.audio.push(NetVoiceFrame::from_burst(self.tx_lc, burst));
    }

    fn collect_embedded(&mut self, burst: &[u8; DMR_FRAME_LENGTH_BYTES]) {
        let Some(emb) = Emb::read(burst) else {
            trace!("net EMB failed to decode");
            self.net_embedded.reset();
            return;
        };
        if !self.net_embedded.add_fragment(burst, emb.lcss) {
            return;
        }
        let Some(raw) = self.net_embedded.raw_lc() else {
            return;
        };
        if !self.config.is_late_start_code(raw[0]) {
            trace!("embedded LC {} ignored", raw[0]);
            return;
        }
        self.tx_lc = raw;
        if !self.state.is_starting_or_transmitting() {
            let lc = LinkControl::from_raw(&raw);
            info!("late start {} -> {}", lc.src_id, lc.dst_id);
            self.call = CallInfo::from_lc(&lc);
            self.start_buffering();
        }
    }

    /// Builds the screen for the current state without rendering it.
    pub fn status_screen(&mut self) -> StatusScreen {
        let mode = self.screen_mode();
        StatusScreen::build(&mut self.display, &mode)
    }

    fn screen_mode(&self) -> ScreenMode {
        if self.tx_active {
            ScreenMode::Transmitting {
                src_id: self.call.src_id,
                target: self.call.target,
                tx_freq: self.tx_freq,
            }
        } else {
            ScreenMode::Idle {
                colour_code: self.radio.colour_code(),
                power: power_label(self.power_level),
                rx_freq: self.rx_freq,
            }
        }
    }

    pub(crate) fn refresh_screen(&mut self) {
        let mode = self.screen_mode();
        self.render(mode);
    }

    fn render(&mut self, mode: ScreenMode) {
        let screen = StatusScreen::build(&mut self.display, &mode);
        self.display.render(&screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MMDVM_DMR_DATA1, MMDVM_SET_MODE};
    use crate::dmr::bits::apply_overlay;
    use crate::dmr::sync::{
        DMR_AUDIO_SEQ_MASK, DMR_AUDIO_SEQ_SYNC, DMR_EMBED_SEQ_MASK, EMBEDDED_LCSS, END_FRAME_PATTERN,
        STREAM_MARKER_OFFSET,
    };
    use crate::dmr::Flco;
    use crate::testing::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    fn net_frame(control: u8, burst: &[u8; DMR_FRAME_LENGTH_BYTES]) -> Vec<u8> {
        let mut frame = vec![0xE0, DMR_DATA_FRAME_LEN as u8, MMDVM_DMR_DATA1, control];
        frame.extend_from_slice(burst);
        frame
    }

    fn header_frame(lc: &LinkControl) -> Vec<u8> {
        net_frame(0x41, &full_lc::encode(lc, FullLcType::VoiceLcHeader))
    }

    fn voice_burst(source: &EmbeddedLc, seq: u8) -> [u8; DMR_FRAME_LENGTH_BYTES] {
        let mut burst = [0x33u8; DMR_FRAME_LENGTH_BYTES];
        let field = &mut burst[13..20];
        let seq_index = usize::from(seq);
        apply_overlay(field, &DMR_AUDIO_SEQ_MASK, &DMR_AUDIO_SEQ_SYNC[seq_index]);
        apply_overlay(field, &DMR_EMBED_SEQ_MASK, &source.fragment(seq));
        Emb {
            colour_code: 1,
            pi: false,
            lcss: EMBEDDED_LCSS[seq_index],
        }
        .write(&mut burst);
        burst
    }

    fn connected(queues: &Queues) -> TestGateway<'_> {
        let mut gateway = gateway(queues);
        gateway.enter();
        gateway.tick();
        gateway.tick();
        assert_eq!(gateway.state(), GatewayState::RxProcess);
        gateway
    }

    #[test]
    fn test_enter_and_exit() {
        let queues = Queues::new();
        let mut gateway = gateway(&queues);
        assert_eq!(gateway.state(), GatewayState::NotConnected);

        gateway.enter();
        assert_eq!(gateway.state(), GatewayState::Initialise);
        assert_eq!(gateway.call_info(), call);
        assert_eq!(gateway.frequencies(), (43_000_000, 43_000_000));
        let screen = gateway.display().screens.last().cloned().unwrap();
        assert_eq!(screen.frequency.as_str(), "R 430.0000 MHz");

        gateway.saved_power_level = Some(2);
        gateway.exit();
        assert_eq!(gateway.state(), GatewayState::NotConnected);
        assert_eq!(gateway.call_info().src_id, FakeSettings::default().user_id);
        assert_eq!(gateway.power_level(), 2);
        assert_eq!(gateway.radio().calls.last(), Some(&RadioCall::SetPower(2)));
    }

    #[test]
    fn test_rf_call_is_forwarded_to_host() {
        let queues = Queues::new();
        let mut gateway = connected(&queues);
        let lc = LinkControl::new(Flco::Group, 2_345_678, 91);

        assert!(queues.rf_inbound.push_from_isr(&rf_frame(&lc, 1, 0)));
        for position in 1..=6 {
            assert!(queues.rf_inbound.push_from_isr(&rf_frame(&lc, 3, position)));
        }
        assert!(queues.rf_inbound.push_from_isr(&rf_frame(&lc, 4, 0)));

        for _ in 0..8 {
            gateway.tick();
        }
        assert_eq!(gateway.state(), GatewayState::RxEnd);
        let sent = queues.sent();
        assert_eq!(sent.len(), 8);
        assert_eq!(&sent[0][..4], &[0xE0, 0x25, 0x1A, 0x41]);
        assert_eq!(
            full_lc::decode(&sent[0][4..], FullLcType::VoiceLcHeader),
            Some(lc)
        );
        assert_eq!(sent[1][3], 0x20);
        for (i, frame) in sent[2..7].iter().enumerate() {
            assert_eq!(usize::from(frame[3]), i + 1);
        }
        assert_eq!(&sent[7][..4], &[0xE0, 0x25, 0x1A, 0x42]);
        assert_eq!(gateway.call_info(), CallInfo::from_lc(&lc));

        let rx_screen = &gateway.display().screens[gateway.display().screens.len() - 2];
        assert_eq!(rx_screen.target.as_str(), "TG 91");
    }

    #[test]
    fn test_idle_rf_frames_are_dropped() {
        let queues = Queues::new();
        let mut gateway = connected(&queues);
        let lc = LinkControl::new(Flco::Group, 1, 2);
        assert!(queues.rf_inbound.push_from_isr(&rf_frame(&lc, 5, 0)));
        assert!(queues.rf_inbound.push_from_isr(&rf_frame(&lc, 3, 9)));
        gateway.tick();
        gateway.tick();
        assert!(queues.rf_inbound.is_empty());
        assert!(queues.sent().is_empty());
        assert_eq!(gateway.state(), GatewayState::RxProcess);
    }

    #[test]
    fn test_net_header_starts_buffering() {
        let queues = Queues::new();
        let mut gateway = connected(&queues);
        let lc = LinkControl::new(Flco::UserUser, 3_100_001, 3_100_002);

        gateway.receive_net_frame(&header_frame(&lc), 1);
        assert_eq!(
            gateway.state(),
            GatewayState::TxStartBuffering {
                timeout: gateway.config.tx_buffering_timeout
            }
        );
        assert_eq!(gateway.tx_lc(), lc.raw());
        assert_eq!(gateway.call_info().target, 3_100_002 | (3 << 24));
        assert!(queues.audio.is_empty());
    }

    #[test]
    fn test_net_call_is_transmitted_and_shut_down() {
        let queues = Queues::new();
        let green = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let red = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut gateway = Gateway::new(
            HotspotConfig::default(),
            queues.hotspot(),
            FakeRadio::default(),
            FakeSettings::default(),
            FakeDisplay::default(),
            Some(green),
            Some(red),
        );
        gateway.enter();
        gateway.tick();
        gateway.tick();
        gateway.handle_request(&[0xE0, 0x04, MMDVM_SET_MODE, 2]);
        assert_eq!(gateway.modem_mode(), ModemMode::Dmr);

        let lc = LinkControl::new(Flco::Group, 2_345_678, 91);
        let mut source = EmbeddedLc::new();
        source.set_lc(&lc);
        gateway.receive_net_frame(&header_frame(&lc), 2);
        gateway.receive_net_frame(&net_frame(0x20, &[0x11; DMR_FRAME_LENGTH_BYTES]), 2);
        for seq in 1..=5 {
            gateway.receive_net_frame(&net_frame(seq, &voice_burst(&source, seq)), 2);
        }
        assert_eq!(queues.audio.len(), 6);

        gateway.tick();
        assert_eq!(gateway.state(), GatewayState::Transmitting);
        assert!(gateway.is_transmitting());
        let screen = gateway.display().screens.last().cloned().unwrap();
        assert_eq!(screen.target.as_str(), "TG 91");
        assert_eq!(screen.frequency.as_str(), "T 430.0000 MHz");

        while queues.audio.pop().is_some() {}
        gateway.tick();
        assert_eq!(gateway.state(), GatewayState::TxShutdown { linger: 0 });
        assert!(!gateway.is_transmitting());

        gateway.tick();
        assert_eq!(gateway.state(), GatewayState::RxStart);

        let (radio, _, _, green, red) = gateway.release();
        assert!(radio.calls.contains(&RadioCall::StartTx));
        assert!(radio.calls.contains(&RadioCall::StopTx));
        assert_eq!(radio.calls.last(), Some(&RadioCall::ActivateRx));
        green.unwrap().done();
        red.unwrap().done();
    }

    #[test]
    fn test_late_start_from_embedded_lc() {
        let queues = Queues::new();
        let mut gateway = connected(&queues);
        let lc = LinkControl::new(Flco::Group, 2_345_678, 91);
        let mut source = EmbeddedLc::new();
        source.set_lc(&lc);

        for seq in 1..=4 {
            gateway.receive_net_frame(&net_frame(seq, &voice_burst(&source, seq)), 2);
            if seq < 4 {
                assert_eq!(gateway.state(), GatewayState::RxProcess);
            }
        }
        assert!(matches!(gateway.state(), GatewayState::TxStartBuffering { .. }));
        assert_eq!(gateway.tx_lc(), lc.raw());
        assert_eq!(gateway.call_info(), CallInfo::from_lc(&lc));
        assert_eq!(queues.audio.len(), 4);
    }

    #[test]
    fn test_other_embedded_lc_does_not_start() {
        let queues = Queues::new();
        let mut gateway = connected(&queues);
        let mut alias = LinkControl::new(Flco::TalkerAliasHeader, 0, 0);
        alias.fid = 0x10;
        let mut source = EmbeddedLc::new();
        source.set_lc(&alias);

        for seq in 1..=4 {
            gateway.receive_net_frame(&net_frame(seq, &voice_burst(&source, seq)), 2);
        }
        assert_eq!(gateway.state(), GatewayState::RxProcess);
        assert_eq!(gateway.tx_lc(), [0; LC_LENGTH_BYTES]);
    }

    #[test]
    fn test_stream_markers_are_discarded() {
        let queues = Queues::new();
        let mut gateway = connected(&queues);
        let mut burst = [0u8; DMR_FRAME_LENGTH_BYTES];
        burst[STREAM_MARKER_OFFSET..STREAM_MARKER_OFFSET + 6].copy_from_slice(&END_FRAME_PATTERN);
        gateway.receive_net_frame(&net_frame(0x00, &burst), 2);
        assert!(queues.audio.is_empty());
        assert_eq!(gateway.state(), GatewayState::RxProcess);
    }

    #[test]
    fn test_short_net_frames_are_dropped() {
        let queues = Queues::new();
        let mut gateway = connected(&queues);
        let call = gateway.call_info();
        let mut short = vec![0xE0, 14, MMDVM_DMR_DATA1, 0x20];
        short.extend_from_slice(&[0u8; 10]);
        gateway.receive_net_frame(&short, 1);
        gateway.receive_net_frame(&short[..3], 1);
        assert!(queues.audio.is_empty());
        assert_eq!(gateway.state(), GatewayState::RxProcess);
        assert_eq!(gateway.call_info(), call);
    }

    #[test]
    fn test_idle_modem_abandons_buffering() {
        let queues = Queues::new();
        let mut gateway = connected(&queues);
        let lc = LinkControl::new(Flco::Group, 2_345_678, 91);
        gateway.receive_net_frame(&header_frame(&lc), 2);
        for _ in 0..6 {
            gateway.receive_net_frame(&net_frame(0x20, &[0x11; DMR_FRAME_LENGTH_BYTES]), 2);
        }
        assert_eq!(gateway.modem_mode(), ModemMode::Idle);

        gateway.tick();
        assert_eq!(gateway.state(), GatewayState::TxShutdown { linger: 0 });
        assert_eq!(gateway.modem_mode(), ModemMode::Dmr);
        assert!(queues.audio.is_empty());
        assert!(!gateway.is_transmitting());
        assert!(!gateway.radio().calls.contains(&RadioCall::StartTx));
    }

    #[test]
    fn test_nothing_happens_when_not_connected() {
        let queues = Queues::new();
        let mut gateway = gateway(&queues);
        let lc = LinkControl::new(Flco::Group, 2_345_678, 91);
        gateway.receive_net_frame(&header_frame(&lc), 1);
        gateway.tick();
        assert_eq!(gateway.state(), GatewayState::NotConnected);
        assert!(queues.audio.is_empty());
    }

    #[test]
    fn test_poll_drains_one_frame_per_pass() {
        let queues = Queues::new();
        let mut gateway = connected(&queues);
        let mut link = CaptureLink::default();
        assert!(queues.to_host.enqueue(&[0xE0, 0x04, 0x70, 0x01]));
        assert!(queues.to_host.enqueue(&[0xE0, 0x04, 0x70, 0x02]));
        gateway.poll(&mut link);
        assert_eq!(link.frames.len(), 1);
        gateway.poll(&mut link);
        assert_eq!(link.frames.len(), 2);
    }
}
