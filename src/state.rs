//! The hotspot state machine as a pure transition function.
//!
//! [`step`] looks at the current [`GatewayState`] and a snapshot of
//! everything it depends on ([`StepInputs`]) and returns the next state with
//! the [`Action`]s to perform, in order. It has no side effects; the
//! [`Gateway`](crate::gateway::Gateway) samples the inputs, calls `step` once
//! per main loop pass and applies the actions.
//!
//! ```text
//! NotConnected ──enter()──► Initialise ──► RxStart ──► RxProcess ◄──┐
//!                               ▲             ▲           │ Stop    │
//!                               │             │           ▼         │
//!                               │             └──────── RxEnd       │
//!                     timeout   │                                   │
//!   net LC ──► TxStartBuffering ┴─► Transmitting ─► TxShutdown ─────┘
//!                     ▲                                  │
//!                     └────────── audio resumes ─────────┘
//! ```

use crate::config::HotspotConfig;
use crate::protocol::ModemMode;
use crate::rf::RxTag;
use heapless::Vec;

/// State of one gateway instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum GatewayState {
    /// Hotspot mode is not active.
    #[default]
    NotConnected,
    /// Reset buffers before receiving.
    Initialise,
    /// Make sure the transmitter is off.
    RxStart,
    /// Forward received frames to the host.
    RxProcess,
    /// A received call ended.
    RxEnd,
    /// Waiting for enough host audio to start transmitting.
    TxStartBuffering {
        /// Passes left before giving up.
        timeout: u16,
    },
    /// Sending host audio.
    Transmitting,
    /// Audio ran out; waiting for more or for the transmitter to finish.
    TxShutdown {
        /// Passes left to wait for more audio.
        linger: u16,
    },
}

impl GatewayState {
    /// `true` while a transmission is being buffered, sent or shut down.
    pub fn is_tx_busy(self) -> bool {
        matches!(
            self,
            GatewayState::TxStartBuffering { .. }
                | GatewayState::Transmitting
                | GatewayState::TxShutdown { .. }
        )
    }

    /// `true` while buffering or sending, the states a late start must not
    /// interrupt.
    pub fn is_starting_or_transmitting(self) -> bool {
        matches!(
            self,
            GatewayState::TxStartBuffering { .. } | GatewayState::Transmitting
        )
    }
}

/// Side effects requested by [`step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Action {
    /// Empty the audio queue.
    ClearAudio,
    /// Pop one RF frame and forward it to the host.
    ProcessRfFrame,
    /// Consume the pending host error.
    ClearHostError,
    /// Put the modem back into DMR mode.
    SetModemDmr,
    /// Key the transmitter and switch the LEDs to transmit.
    EnableTx,
    /// Mark the transmission as finished and tell the radio to stop.
    StopTx,
    /// Turn the transmit LED off and return the radio to receive.
    DisableTx,
    /// Redraw the status screen.
    RefreshScreen,
}

/// Most actions a single step produces.
pub const MAX_ACTIONS: usize = 4;

/// Next state and the actions leading to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the actions are applied.
    pub next: GatewayState,
    /// Actions to apply, in order.
    pub actions: Vec<Action, MAX_ACTIONS>,
}

impl Transition {
    fn to(next: GatewayState, actions: &[Action]) -> Self {
        let mut list = Vec::new();
        // Every call site passes at most MAX_ACTIONS actions.
        let _ = list.extend_from_slice(actions);
        Self { next, actions: list }
    }
}

/// Everything [`step`] depends on, sampled at the start of a pass.
#[derive(Debug, Clone, Copy)]
pub struct StepInputs<'a> {
    /// Tunables.
    pub config: &'a HotspotConfig,
    /// Frames in the audio queue.
    pub audio_count: usize,
    /// Tag of the oldest waiting RF frame, if any.
    pub rf_head: Option<RxTag>,
    /// The host sent a NAK that has not been acted on.
    pub host_error: bool,
    /// Current modem mode.
    pub modem_mode: ModemMode,
    /// The gateway has keyed the transmitter.
    pub tx_active: bool,
    /// The radio has finished transmitting.
    pub tx_idle: bool,
}

/// Computes the transition out of `state`.
///
/// # Arguments
/// * `state` - The current gateway state
/// * `inputs` - What the gateway observed during this pass
///
/// # Returns
/// The next state and the actions to apply, in order.
pub fn step(state: GatewayState, inputs: &StepInputs<'_>) -> Transition {
    use Action::*;
    use GatewayState::*;

    let config = inputs.config;
    match state {
        NotConnected => Transition::to(NotConnected, &[]),
        Initialise => Transition::to(RxStart, &[ClearAudio]),
        RxStart if inputs.tx_active => Transition::to(RxProcess, &[StopTx, DisableTx, ClearAudio]),
        RxStart => Transition::to(RxProcess, &[ClearAudio]),
        RxProcess => match inputs.rf_head {
            None => Transition::to(RxProcess, &[]),
            Some(_) if inputs.host_error => Transition::to(RxEnd, &[ClearHostError]),
            Some(RxTag::Stop) => Transition::to(RxEnd, &[ProcessRfFrame]),
            Some(_) => Transition::to(RxProcess, &[ProcessRfFrame]),
        },
        RxEnd => Transition::to(RxStart, &[]),
        TxStartBuffering { .. } if inputs.modem_mode == ModemMode::Idle => Transition::to(
            TxShutdown {
                linger: config.tx_linger_passes,
            },
            &[SetModemDmr, ClearAudio],
        ),
        TxStartBuffering { .. } if inputs.audio_count > config.tx_prebuffer_frames => {
            Transition::to(Transmitting, &[EnableTx, RefreshScreen])
        }
        TxStartBuffering { timeout } if timeout <= 1 => Transition::to(Initialise, &[]),
        TxStartBuffering { timeout } => Transition::to(
            TxStartBuffering {
                timeout: timeout - 1,
            },
            &[],
        ),
        Transmitting if inputs.audio_count == 0 || inputs.modem_mode == ModemMode::Idle => {
            Transition::to(
                TxShutdown {
                    linger: config.tx_linger_passes,
                },
                &[StopTx],
            )
        }
        Transmitting => Transition::to(Transmitting, &[]),
        TxShutdown { linger } if linger > 0 && inputs.audio_count > 0 => Transition::to(
            TxStartBuffering {
                timeout: config.tx_buffering_timeout,
            },
            &[EnableTx],
        ),
        TxShutdown { linger } if linger > 0 => {
            Transition::to(TxShutdown { linger: linger - 1 }, &[])
        }
        TxShutdown { .. } if inputs.tx_idle => Transition::to(RxStart, &[DisableTx, RefreshScreen]),
        TxShutdown { linger } => Transition::to(TxShutdown { linger }, &[]),
    }
}
