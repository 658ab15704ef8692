//! Host command handling for [`Gateway`].

use crate::error::ProtocolError;
use crate::gateway::Gateway;
use crate::protocol::{self, Command, ModemMode, Request, Status};
use crate::radio::{POWER_UNSET, SettingsStore, Transceiver, is_satellite_band, power_level_from_rf_power};
use crate::state::GatewayState;
use crate::ui::StatusDisplay;
use embedded_hal::digital::OutputPin;

const SET_CONFIG_MIN_LEN: usize = 7;
const SET_FREQ_MIN_LEN: usize = 9;
const MAX_TX_DELAY: u8 = 50;
const MAX_COLOUR_CODE: u8 = 15;

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn supported_mode(value: u8) -> Result<ModemMode, ProtocolError> {
    ModemMode::from_u8(value)
        .filter(|mode| mode.is_supported())
        .ok_or(ProtocolError::InvalidArgument)
}

impl<T, S, D, G, R> Gateway<'_, T, S, D, G, R>
where
    T: Transceiver,
    S: SettingsStore,
    D: StatusDisplay,
    G: OutputPin,
    R: OutputPin,
{
    /// Handles one complete frame from the host, queueing the reply.
    ///
    /// Malformed frames are dropped without a reply, as is everything while
    /// the gateway is not connected.
    pub fn handle_request(&mut self, frame: &[u8]) {
        let request = match Request::parse(frame) {
            Ok(request) => request,
            Err(err) => {
                debug!("dropping host frame: {:?}", err);
                return;
            }
        };
        if self.state == GatewayState::NotConnected {
            return;
        }
        let id = request.command;
        let Some(command) = request.kind() else {
            warn!("unknown host command {}", id);
            self.reply(id, Err(ProtocolError::UnknownCommand(id)));
            return;
        };
        trace!("host command {:?}", command);

        match command {
            Command::GetVersion => {
                self.send_reply(id, &protocol::version_frame(self.config.description));
            }
            Command::GetStatus => self.send_reply(id, &protocol::status_frame(&self.status())),
            Command::SetConfig => {
                let result = self.set_config(request.payload);
                self.reply(id, result);
                if result.is_ok() {
                    self.refresh_screen();
                }
            }
            Command::SetMode => {
                let result = self.set_mode(request.payload);
                self.reply(id, result);
            }
            Command::SetFreq => {
                let result = self.set_freq(request.payload);
                self.reply(id, result);
                if result.is_ok() {
                    self.refresh_screen();
                }
            }
            Command::DmrData1 => {
                self.receive_net_frame(request.frame, 1);
                self.reply(id, Ok(()));
            }
            Command::DmrData2 => {
                self.receive_net_frame(request.frame, 2);
                self.reply(id, Ok(()));
            }
            Command::Ack => {}
            Command::Nak => self.host_nak(request.payload),
            _ => self.reply(id, Ok(())),
        }
    }

    /// What `GET_STATUS` reports right now.
    pub fn status(&self) -> Status {
        Status {
            mode: self.modem_mode,
            tx_busy: self.state.is_tx_busy(),
            dmr_space: u8::try_from(self.queues.audio.space()).unwrap_or(u8::MAX),
        }
    }

    fn reply(&self, command: u8, result: Result<(), ProtocolError>) {
        match result {
            Ok(()) => self.send_reply(command, &protocol::ack(command)),
            Err(err) => {
                if let Some(code) = err.nak_code() {
                    debug!("NAK {} for command {}", code, command);
                    self.send_reply(command, &protocol::nak(command, code));
                }
            }
        }
    }

    fn send_reply(&self, command: u8, frame: &[u8]) {
        if !self.queues.to_host.enqueue(frame) {
            debug!("reply to {} not queued", command);
        }
    }

    fn host_nak(&mut self, payload: &[u8]) {
        let (command, code) = match payload {
            [command, code, ..] => (*command, *code),
            [command] => (*command, 0),
            [] => (0, 0),
        };
        warn!("host NAKed command {} with {}", command, code);
        self.host_error = true;
        self.host_error_pending = true;
        self.host_error_count = self.host_error_count.saturating_add(1);
    }

    fn set_config(&mut self, payload: &[u8]) -> Result<(), ProtocolError> {
        if payload.len() < SET_CONFIG_MIN_LEN {
            return Err(ProtocolError::InvalidArgument);
        }
        if payload[2] > MAX_TX_DELAY {
            return Err(ProtocolError::InvalidArgument);
        }
        let mode = supported_mode(payload[3])?;
        let colour_code = payload[6];
        if colour_code > MAX_COLOUR_CODE {
            return Err(ProtocolError::InvalidArgument);
        }

        debug!("config: mode {:?}, colour code {}", mode, colour_code);
        self.modem_mode = mode;
        self.radio.set_colour_code(colour_code);
        Ok(())
    }

    fn set_mode(&mut self, payload: &[u8]) -> Result<(), ProtocolError> {
        let (&value, padding) = payload.split_first().ok_or(ProtocolError::InvalidArgument)?;
        let mode = supported_mode(value)?;
        if mode == self.modem_mode {
            return Ok(());
        }
        if mode == ModemMode::Idle || padding.is_empty() {
            debug!("modem mode {:?}", mode);
            self.modem_mode = mode;
        }
        Ok(())
    }

    fn set_freq(&mut self, payload: &[u8]) -> Result<(), ProtocolError> {
        if payload.len() < SET_FREQ_MIN_LEN {
            return Err(ProtocolError::InvalidArgument);
        }
        let divisor = self.config.frequency_divisor.max(1);
        let rx_freq = le_u32(&payload[1..5]) / divisor;
        let tx_freq = le_u32(&payload[5..9]) / divisor;
        if is_satellite_band(tx_freq) {
            warn!("refusing to transmit on satellite frequency {}", tx_freq);
            return Err(ProtocolError::InvalidArgument);
        }
        if !self.radio.is_in_amateur_band(rx_freq) || !self.radio.is_in_amateur_band(tx_freq) {
            warn!("frequencies {} / {} out of band", rx_freq, tx_freq);
            return Err(ProtocolError::InvalidArgument);
        }
        let rf_power = payload.get(SET_FREQ_MIN_LEN).copied().unwrap_or(POWER_UNSET);

        info!("rx {} tx {} power {}", rx_freq, tx_freq, rf_power);
        self.rx_freq = rx_freq;
        self.tx_freq = tx_freq;
        self.radio.set_frequency(rx_freq, tx_freq);
        self.set_state(GatewayState::Initialise);

        let configured = self.settings.power_level();
        self.power_level = configured;
        if let Some(level) = power_level_from_rf_power(rf_power) {
            self.saved_power_level = Some(configured);
            self.power_level = level;
            self.radio.set_power_level(level);
        }
        Ok(())
    }
}
