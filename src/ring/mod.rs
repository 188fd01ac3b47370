mod raw;
mod typed;

use core::ops::Range;

pub use self::raw::{RawRing, RingBufferHandle};
pub use self::typed::RingBuffer;

/// The whole mutable state of a ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Cursors {
    pub(crate) read: usize,
    pub(crate) write: usize,
    pub(crate) level: usize,
}

/// Index bookkeeping shared by [`RingBuffer`] and [`RawRing`].
///
/// Implementors only describe where their cursors live and how to swap two
/// slots; every cursor update is done here, so both rings move the same way.
/// Returned slot indices are always masked.
pub(crate) trait Ring {
    fn slot_mask(&self) -> usize;

    fn cursors(&self) -> Cursors;

    fn set_cursors(&mut self, cursors: Cursors);

    fn swap_slots(&mut self, a: usize, b: usize);

    fn slots(&self) -> usize {
        self.slot_mask() + 1
    }

    fn wrap(&self, idx: usize) -> usize {
        idx & self.slot_mask()
    }

    fn occupied(&self) -> usize {
        self.cursors().level
    }

    fn vacant(&self) -> usize {
        self.slots().saturating_sub(self.occupied())
    }

    fn at_capacity(&self) -> bool {
        self.occupied() >= self.slots()
    }

    fn next_write_slot(&mut self) -> Option<usize> {
        if self.at_capacity() {
            None
        } else {
            Some(self.next_write_slot_lite())
        }
    }

    fn next_write_slot_lite(&mut self) -> usize {
        let now = self.cursors();
        debug_assert!(now.level < self.slots(), "write_lite on a full ring");
        self.set_cursors(Cursors {
            read: now.read,
            write: self.wrap(now.write + 1),
            level: now.level.wrapping_add(1),
        });
        now.write
    }

    fn next_read_slot(&mut self) -> Option<usize> {
        if self.occupied() == 0 {
            None
        } else {
            Some(self.next_read_slot_lite())
        }
    }

    fn next_read_slot_lite(&mut self) -> usize {
        let now = self.cursors();
        debug_assert!(now.level > 0, "read_lite on an empty ring");
        self.set_cursors(Cursors {
            read: self.wrap(now.read + 1),
            write: now.write,
            level: now.level.wrapping_sub(1),
        });
        now.read
    }

    /// Physical slot of the element `offset` places behind the head.
    ///
    /// Offsets past the fill level still land inside the storage.
    fn slot_at(&self, offset: usize) -> usize {
        self.wrap(self.cursors().read.wrapping_add(offset))
    }

    fn discard(&mut self, amount: usize) -> usize {
        let amount = amount.min(self.occupied());
        self.discard_lite(amount);
        amount
    }

    fn discard_lite(&mut self, amount: usize) {
        let now = self.cursors();
        debug_assert!(amount <= now.level, "remove_lite past the fill level");
        self.set_cursors(Cursors {
            read: self.wrap(now.read.wrapping_add(amount)),
            write: now.write,
            level: now.level.wrapping_sub(amount),
        });
    }

    fn rewind(&mut self) {
        self.set_cursors(Cursors::default());
    }

    /// Rotates the storage left by `read` so the head sits at slot 0.
    ///
    /// Reverse `[0, read)`, reverse `[read, slots)`, reverse everything.
    fn rotate_to_origin(&mut self) {
        let now = self.cursors();
        if now.read == 0 {
            return;
        }

        tracing::trace!(read = now.read, level = now.level, "rebasing ring");

        let slots = self.slots();
        self.reverse_slots(0, now.read);
        self.reverse_slots(now.read, slots);
        self.reverse_slots(0, slots);

        self.set_cursors(Cursors {
            read: 0,
            write: self.wrap(now.level),
            level: now.level,
        });
    }

    fn reverse_slots(&mut self, mut lo: usize, mut hi: usize) {
        while lo + 1 < hi {
            hi -= 1;
            self.swap_slots(lo, hi);
            lo += 1;
        }
    }

    /// Occupied slots in logical order, split where they wrap.
    fn occupied_ranges(&self) -> (Range<usize>, Range<usize>) {
        let now = self.cursors();
        let slots = self.slots();
        let level = now.level.min(slots);
        if now.read + level <= slots {
            (now.read..now.read + level, 0..0)
        } else {
            (now.read..slots, 0..now.read + level - slots)
        }
    }
}
