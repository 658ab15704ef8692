//! # dmr-hotspot
//!
//! A portable, no_std core for turning a handheld DMR radio into an MMDVM
//! hotspot: a PC running MMDVMHost talks to it over a serial link as if it were
//! a modem, and the radio relays calls between the network and the air.
//!
//! This crate implements the radio side of that bridge using:
//! - the MMDVM serial protocol (framing, command dispatch, ACK/NAK replies)
//! - a bit-exact DMR codec for Full LC, embedded LC, slot type and EMB fields
//! - interrupt-safe rings built on `critical-section`
//! - `embedded-hal` pins for the status LEDs and delays for loop pacing
//!
//! ## Crate features
//! | Feature      | Description |
//! |--------------|-------------|
//! | `std`        | Builds against `std` instead of `#![no_std]` |
//! | `delay-loop` | Adds `timer::run_hotspot_loop`, paced by `embedded_hal::delay::DelayNs` |
//! | `defmt-0-3`  | Uses `defmt` logging |
//! | `log`        | Uses `log` logging |
//!
//! ## Architecture
//!
//! - [`transport`]: framed byte queue towards the host and the [`transport::HostLink`] seam
//! - [`protocol`] and [`Gateway::handle_request`](gateway::Gateway::handle_request): host requests and replies
//! - [`dmr`]: DMR air format codecs
//! - [`rf`]: frames from the RF receive interrupt and their conversion for the host
//! - [`audio`]: host voice frames waiting for the transmitter
//! - [`state`]: the pure gateway state machine
//! - [`gateway`]: ties the above to a [`radio::Transceiver`] and a [`ui::StatusDisplay`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dmr_hotspot::gateway::{Gateway, HotspotQueues};
//!
//! let mut gateway = Gateway::new(config, queues, radio, settings, display, Some(green), Some(red));
//! gateway.enter();
//! loop {
//!     gateway.receive_host_bytes(usb.read());
//!     gateway.poll(&mut usb); // once per main loop pass
//! }
//! ```
//!
//! The RF receive interrupt feeds frames with
//! [`RfInboundQueue::push_from_isr`](rf::RfInboundQueue::push_from_isr) and
//! the transmit interrupt takes audio with
//! [`AudioQueue::pop`](audio::AudioQueue::pop).
//!
//! ## Integration Notes
//!
//! - Timeouts are counted in main loop passes; see [`timer`] to derive them from wall time
//! - Only DMR is supported; other modes' commands are acknowledged and ignored

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
mod fmt;

pub use critical_section;
pub use heapless;

pub mod audio;
pub mod config;
pub mod consts;
mod dispatch;
pub mod dmr;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod radio;
pub mod rf;
pub mod ring;
pub mod state;
pub mod timer;
pub mod transport;
pub mod ui;

#[cfg(test)]
mod testing;
