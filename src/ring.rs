//! Interrupt-safe fixed capacity ring.
//!
//! [`SharedRing`] is the building block of every queue shared between an
//! interrupt handler and the main loop. All access goes through
//! `critical_section::with`, so a `static` ring can be filled from an ISR and
//! drained from the cooperative loop through `&self`.

use core::cell::RefCell;
use core::fmt;
use critical_section::Mutex;
use heapless::Deque;

/// A bounded FIFO of `N` copyable entries behind a critical section mutex.
///
/// When full, [`push_overwrite`](SharedRing::push_overwrite) drops the oldest
/// entry, so the length never exceeds `N`.
///
/// # Example
/// ```rust
/// use dmr_hotspot::ring::SharedRing;
///
/// static RING: SharedRing<u8, 2> = SharedRing::new();
///
/// assert!(!RING.push_overwrite(1));
/// assert!(!RING.push_overwrite(2));
/// assert!(RING.push_overwrite(3));
/// assert_eq!(RING.pop(), Some(2));
/// ```
pub struct SharedRing<T: Copy, const N: usize> {
    inner: Mutex<RefCell<Deque<T, N>>>,
}

impl<T: Copy, const N: usize> fmt::Debug for SharedRing<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRing")
            .field("len", &self.len())
            .field("capacity", &N)
            .finish()
    }
}

impl<T: Copy, const N: usize> Default for SharedRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> SharedRing<T, N> {
    /// An empty ring, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Appends `item`, dropping the oldest entry when full.
    ///
    /// Returns `true` if an entry was overwritten.
    pub fn push_overwrite(&self, item: T) -> bool {
        critical_section::with(|cs| {
            let mut ring = self.inner.borrow_ref_mut(cs);
            let overwrote = ring.is_full();
            if overwrote {
                let _ = ring.pop_front();
            }
            // Cannot fail: a slot was freed above when full.
            let _ = ring.push_back(item);
            overwrote
        })
    }

    /// Removes and returns the oldest entry.
    pub fn pop(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).pop_front())
    }

    /// Returns a copy of the oldest entry without removing it.
    pub fn peek(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref(cs).front().copied())
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).len())
    }

    /// `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every queued entry.
    pub fn clear(&self) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).clear());
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let ring: SharedRing<u8, 4> = SharedRing::new();
        assert!(ring.is_empty());
        for i in 0..3 {
            assert!(!ring.push_overwrite(i));
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.peek(), Some(0));
        assert_eq!(ring.pop(), Some(0));
        assert_eq!(ring.pop(), Some(1));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let ring: SharedRing<u16, 3> = SharedRing::new();
        for i in 0..3 {
            assert!(!ring.push_overwrite(i));
        }
        assert!(ring.push_overwrite(3));
        assert!(ring.push_overwrite(4));
        assert_eq!(ring.len(), ring.capacity());
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), Some(4));
    }

    #[test]
    fn test_clear_empties() {
        let ring: SharedRing<u8, 2> = SharedRing::new();
        let _ = ring.push_overwrite(7);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.pop(), None);
    }
}
