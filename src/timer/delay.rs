use crate::gateway::Gateway;
use crate::radio::{SettingsStore, Transceiver};
use crate::transport::HostLink;
use crate::ui::StatusDisplay;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Bytes read from the host per pass.
pub const HOST_READ_CHUNK: usize = 64;

/// Runs one paced main loop pass: hands whatever `read_host` returns to the
/// gateway, polls it, then waits `pass_us` microseconds.
///
/// `read_host` fills the buffer it is given and returns the number of bytes
/// written, 0 when nothing arrived.
pub fn run_hotspot_pass<T, S, D, G, R, L, W, F>(
    gateway: &mut Gateway<'_, T, S, D, G, R>,
    link: &mut L,
    delay: &mut W,
    pass_us: u32,
    read_host: &mut F,
) where
    T: Transceiver,
    S: SettingsStore,
    D: StatusDisplay,
    G: OutputPin,
    R: OutputPin,
    L: HostLink,
    W: DelayNs,
    F: FnMut(&mut [u8]) -> usize,
{
    let mut buf = [0u8; HOST_READ_CHUNK];
    let read = read_host(&mut buf).min(HOST_READ_CHUNK);
    if read > 0 {
        gateway.receive_host_bytes(&buf[..read]);
    }
    gateway.poll(link);
    delay.delay_us(pass_us);
}

/// Runs the hotspot forever, one pass every `pass_us` microseconds.
///
/// Enters hotspot mode first. Intended for firmware whose main loop does
/// nothing else while the hotspot is up.
///
/// # Example
/// ```rust,ignore
/// use dmr_hotspot::timer::{DEFAULT_PASS_US, run_hotspot_loop};
///
/// run_hotspot_loop(&mut gateway, &mut usb, &mut delay, DEFAULT_PASS_US, |buf| usb.read(buf));
/// ```
pub fn run_hotspot_loop<T, S, D, G, R, L, W, F>(
    gateway: &mut Gateway<'_, T, S, D, G, R>,
    link: &mut L,
    delay: &mut W,
    pass_us: u32,
    mut read_host: F,
) -> !
where
    T: Transceiver,
    S: SettingsStore,
    D: StatusDisplay,
    G: OutputPin,
    R: OutputPin,
    L: HostLink,
    W: DelayNs,
    F: FnMut(&mut [u8]) -> usize,
{
    gateway.enter();
    loop {
        run_hotspot_pass(gateway, link, delay, pass_us, &mut read_host);
    }
}
