//! Length-prefixed byte queue towards the host.
//!
//! Every frame sent to the host goes through a [`ByteQueue`]: a flat ring of
//! `CAP` bytes holding `[len, payload…]` entries. An entry is never split
//! across the end of the buffer; when it would not fit, a `0` length byte is
//! written as a wrap sentinel and the entry starts again at index 0.
//!
//! A pending entry count, rather than comparing cursors, tells an empty queue
//! from a full one, so the writer can never overtake unread data.
//!
//! The main loop hands one entry per pass to a [`HostLink`] with
//! [`ByteQueue::drain_one`]. A busy or failing link leaves the entry queued.

use crate::consts::{COM_BUFFER_SIZE, MMDVM_MAX_FRAME_LEN};
use core::cell::RefCell;
use core::fmt::{self, Debug};
use critical_section::Mutex;

/// The serial connection to the host.
pub trait HostLink {
    /// Link specific error.
    type Error: Debug;

    /// Sends one complete frame.
    ///
    /// Returns `nb::Error::WouldBlock` while the link cannot accept it.
    fn send(&mut self, frame: &[u8]) -> nb::Result<(), Self::Error>;
}

struct Cursors<const CAP: usize> {
    buf: [u8; CAP],
    write: usize,
    read: usize,
    count: usize,
    generation: u32,
}

impl<const CAP: usize> Cursors<CAP> {
    const fn new() -> Self {
        Self {
            buf: [0; CAP],
            write: 0,
            read: 0,
            count: 0,
            generation: 0,
        }
    }

    fn has_room(&self, len: usize) -> bool {
        let needed = len + 1;
        if self.count == 0 {
            return true;
        }
        if self.write >= self.read {
            self.write + needed <= CAP - 1 || needed < self.read
        } else {
            self.write + needed < self.read
        }
    }

    fn push(&mut self, payload: &[u8]) {
        let needed = payload.len() + 1;
        if self.count == 0 {
            self.write = 0;
            self.read = 0;
        }
        if self.write + needed > CAP - 1 {
            self.buf[self.write] = 0;
            self.write = 0;
        }
        self.buf[self.write] = payload.len() as u8;
        self.buf[self.write + 1..self.write + needed].copy_from_slice(payload);
        self.write += needed;
        self.count += 1;
    }

    /// Read index of the oldest entry, following a wrap sentinel.
    fn head(&mut self) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        if self.read >= CAP - 1 || self.buf[self.read] == 0 {
            self.read = 0;
        }
        Some(self.read)
    }
}

/// Byte ring of `CAP` bytes shared between producers and the drain loop.
///
/// # Example
/// ```rust
/// use dmr_hotspot::transport::ByteQueue;
///
/// static TO_HOST: ByteQueue = ByteQueue::new();
///
/// assert!(TO_HOST.enqueue(&[0xE0, 0x04, 0x70, 0x02]));
/// assert_eq!(TO_HOST.pending(), 1);
/// ```
pub struct ByteQueue<const CAP: usize = COM_BUFFER_SIZE> {
    inner: Mutex<RefCell<Cursors<CAP>>>,
}

impl<const CAP: usize> Debug for ByteQueue<CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteQueue")
            .field("pending", &self.pending())
            .field("capacity", &CAP)
            .finish()
    }
}

impl<const CAP: usize> Default for ByteQueue<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> ByteQueue<CAP> {
    /// An empty queue, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Cursors::new())),
        }
    }

    /// Appends `payload` as one entry.
    ///
    /// Empty payloads and payloads longer than a serial frame are rejected.
    /// Returns `false`, and logs, when there is no room even after wrapping.
    pub fn enqueue(&self, payload: &[u8]) -> bool {
        if payload.is_empty() || payload.len() > MMDVM_MAX_FRAME_LEN || payload.len() + 2 > CAP {
            warn!("byte queue rejected a {} byte entry", payload.len());
            return false;
        }
        let queued = critical_section::with(|cs| {
            let mut cursors = self.inner.borrow_ref_mut(cs);
            if !cursors.has_room(payload.len()) {
                return false;
            }
            cursors.push(payload);
            true
        });
        if !queued {
            warn!("byte queue full, dropped {} bytes", payload.len());
        }
        queued
    }

    /// Hands the oldest entry to `link`.
    ///
    /// # Returns
    /// `Ok(true)` when an entry was sent and removed, `Ok(false)` when
    /// nothing was queued. On `WouldBlock` or a link error the entry stays
    /// queued for the next pass.
    pub fn drain_one<L: HostLink>(&self, link: &mut L) -> nb::Result<bool, L::Error> {
        let mut frame = [0u8; MMDVM_MAX_FRAME_LEN];
        let entry = critical_section::with(|cs| {
            let mut cursors = self.inner.borrow_ref_mut(cs);
            let head = cursors.head()?;
            let len = usize::from(cursors.buf[head]);
            frame[..len].copy_from_slice(&cursors.buf[head + 1..head + 1 + len]);
            Some((head, len, cursors.generation))
        });
        let Some((head, len, generation)) = entry else {
            return Ok(false);
        };

        link.send(&frame[..len])?;

        critical_section::with(|cs| {
            let mut cursors = self.inner.borrow_ref_mut(cs);
            // clear() may have run while sending
            if cursors.generation == generation && cursors.count > 0 && cursors.read == head {
                cursors.read = head + len + 1;
                cursors.count -= 1;
            }
        });
        trace!("sent {} bytes to host", len);
        Ok(true)
    }

    /// Number of queued entries.
    pub fn pending(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).count)
    }

    /// Drops every queued entry.
    pub fn clear(&self) {
        critical_section::with(|cs| {
            let mut cursors = self.inner.borrow_ref_mut(cs);
            cursors.write = 0;
            cursors.read = 0;
            cursors.count = 0;
            cursors.generation = cursors.generation.wrapping_add(1);
        });
    }
}
