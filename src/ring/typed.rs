use super::{Cursors, Ring};
use crate::error::TryWriteError;
use crate::layout::{IndexWidth, MAX_DEPTH, MIN_DEPTH};
use core::fmt;
use core::mem;
use core::ops::{Index, IndexMut};

/// A FIFO of `N` elements of `T`, stored inline.
///
/// Elements must be `Copy`: reads copy a slot out and leave the stale value
/// behind, the way plain data is moved through the buffer.
///
/// `N` must be a power of two in `4..=32768`; use [`depth`](crate::depth) to
/// round an arbitrary request. The ring never allocates and every operation
/// takes `&mut self`, so sharing one between normal code and an interrupt
/// handler needs an outside critical section.
///
/// ```
/// use fifofast::RingBuffer;
///
/// let mut ring = RingBuffer::<u8, 4>::new();
/// for v in 0x73..=0x77 {
///     let _ = ring.write(v);
/// }
/// assert!(ring.is_full());
/// assert_eq!(ring.read(), Some(0x73));
/// assert_eq!(ring[0], 0x74);
/// ```
#[derive(Clone, Copy)]
pub struct RingBuffer<T, const N: usize> {
    read: u16,
    write: u16,
    level: u16,
    storage: [T; N],
}

impl<T: Copy, const N: usize> Ring for RingBuffer<T, N> {
    fn slot_mask(&self) -> usize {
        Self::MASK
    }

    fn cursors(&self) -> Cursors {
        Cursors {
            read: self.read as usize,
            write: self.write as usize,
            level: self.level as usize,
        }
    }

    fn set_cursors(&mut self, cursors: Cursors) {
        self.read = cursors.read as u16;
        self.write = cursors.write as u16;
        self.level = cursors.level as u16;
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.storage.swap(a & Self::MASK, b & Self::MASK);
    }
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    const VALID: () = assert!(
        N.is_power_of_two() && N >= MIN_DEPTH && N <= MAX_DEPTH,
        "ring capacity must be a power of two in 4..=32768"
    );

    const MASK: usize = N - 1;

    /// Width `read` and `write` need for this capacity.
    pub const INDEX_WIDTH: IndexWidth = IndexWidth::for_max(N - 1);

    /// Width `level` needs for this capacity.
    pub const LEVEL_WIDTH: IndexWidth = IndexWidth::for_max(N);

    /// Creates an empty ring whose slots all hold `fill`.
    ///
    /// Usable in `const` and `static` items, and for arrays of rings:
    ///
    /// ```
    /// use fifofast::RingBuffer;
    ///
    /// static EMPTY: RingBuffer<u16, 8> = RingBuffer::with_fill(0);
    ///
    /// let mut channels = [EMPTY; 3];
    /// channels[1].write(7).unwrap();
    /// assert_eq!(channels[1].level(), 1);
    /// assert!(channels[0].is_empty());
    /// ```
    pub const fn with_fill(fill: T) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        Self {
            read: 0,
            write: 0,
            level: 0,
            storage: [fill; N],
        }
    }

    pub fn new() -> Self
    where
        T: Default,
    {
        Self::with_fill(T::default())
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub const fn mask(&self) -> usize {
        Self::MASK
    }

    pub const fn element_size(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Number of stored elements.
    pub fn level(&self) -> usize {
        self.occupied()
    }

    /// Number of elements that can still be written.
    pub fn free(&self) -> usize {
        self.vacant()
    }

    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    pub fn is_full(&self) -> bool {
        self.at_capacity()
    }

    /// Physical index of the next element to be read.
    pub fn read_index(&self) -> usize {
        self.read as usize
    }

    /// Physical index of the next slot to be written.
    pub fn write_index(&self) -> usize {
        self.write as usize
    }

    /// Appends `value`, or hands it back if the ring is full.
    pub fn write(&mut self, value: T) -> Result<(), TryWriteError<T>> {
        match self.next_write_slot() {
            Some(idx) => {
                *self.slot_mut(idx) = value;
                Ok(())
            }
            None => Err(TryWriteError::full(value)),
        }
    }

    /// Appends `value` without checking for space.
    ///
    /// The caller must know the ring is not full. Otherwise the oldest
    /// element is overwritten and the level is wrong from then on.
    pub fn write_lite(&mut self, value: T) {
        let idx = self.next_write_slot_lite();
        *self.slot_mut(idx) = value;
    }

    pub fn read(&mut self) -> Option<T> {
        self.next_read_slot().map(|idx| *self.slot(idx))
    }

    /// Removes the head without checking that there is one.
    ///
    /// On an empty ring this returns a stale slot and corrupts the level.
    pub fn read_lite(&mut self) -> T {
        let idx = self.next_read_slot_lite();
        *self.slot(idx)
    }

    /// The element `offset` places behind the head.
    ///
    /// Offsets at or past [`level`](Self::level) are masked back into the
    /// storage: the reference is always valid, its value is whatever the slot
    /// last held.
    pub fn peek(&self, offset: usize) -> &T {
        self.slot(self.slot_at(offset))
    }

    pub fn peek_mut(&mut self, offset: usize) -> &mut T {
        let idx = self.slot_at(offset);
        self.slot_mut(idx)
    }

    /// Reserves the next slot and returns it for in-place construction.
    ///
    /// The slot counts as written as soon as this returns.
    ///
    /// ```
    /// use fifofast::RingBuffer;
    ///
    /// let mut ring = RingBuffer::<[u8; 2], 4>::new();
    /// if let Some(slot) = ring.add() {
    ///     slot[0] = 1;
    ///     slot[1] = 2;
    /// }
    /// assert_eq!(ring.read(), Some([1, 2]));
    /// ```
    pub fn add(&mut self) -> Option<&mut T> {
        let idx = self.next_write_slot()?;
        Some(self.slot_mut(idx))
    }

    pub fn add_lite(&mut self) -> &mut T {
        let idx = self.next_write_slot_lite();
        self.slot_mut(idx)
    }

    /// Drops up to `amount` elements from the head, returning how many were
    /// dropped.
    pub fn remove(&mut self, amount: usize) -> usize {
        self.discard(amount)
    }

    /// Drops exactly `amount` elements; `amount` must not exceed the level.
    pub fn remove_lite(&mut self, amount: usize) {
        self.discard_lite(amount)
    }

    /// Empties the ring. Stored values are left in place.
    pub fn reset(&mut self) {
        self.rewind()
    }

    /// Appends as many of `values` as fit, in order, and returns the count.
    pub fn write_multiple(&mut self, values: &[T]) -> usize {
        let count = values.len().min(self.free());
        for value in &values[..count] {
            self.write_lite(*value);
        }
        count
    }

    /// Moves up to `out.len()` elements into `out`, returning the count.
    pub fn read_multiple(&mut self, out: &mut [T]) -> usize {
        let count = out.len().min(self.level());
        for dst in &mut out[..count] {
            *dst = self.read_lite();
        }
        count
    }

    /// Rotates the storage so the head lives at index 0.
    ///
    /// Afterwards the stored elements are `storage[..level]`.
    pub fn rebase(&mut self) {
        self.rotate_to_origin()
    }

    /// Rebases and returns the stored elements as one slice.
    pub fn make_contiguous(&mut self) -> &mut [T] {
        self.rebase();
        let level = self.level().min(N);
        &mut self.storage[..level]
    }

    /// The stored elements in order, split where they wrap.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (head, tail) = self.occupied_ranges();
        (&self.storage[head], &self.storage[tail])
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        let (head, tail) = self.as_slices();
        head.iter().chain(tail)
    }

    fn slot(&self, idx: usize) -> &T {
        &self.storage[idx & Self::MASK]
    }

    fn slot_mut(&mut self, idx: usize) -> &mut T {
        &mut self.storage[idx & Self::MASK]
    }
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> Index<usize> for RingBuffer<T, N> {
    type Output = T;

    fn index(&self, offset: usize) -> &T {
        self.peek(offset)
    }
}

impl<T: Copy, const N: usize> IndexMut<usize> for RingBuffer<T, N> {
    fn index_mut(&mut self, offset: usize) -> &mut T {
        self.peek_mut(offset)
    }
}

impl<T: Copy + fmt::Debug, const N: usize> fmt::Debug for RingBuffer<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &N)
            .field("read", &self.read)
            .field("write", &self.write)
            .field("level", &self.level)
            .field("elements", &DebugElements(self))
            .finish()
    }
}

struct DebugElements<'a, T, const N: usize>(&'a RingBuffer<T, N>);

impl<T: Copy + fmt::Debug, const N: usize> fmt::Debug for DebugElements<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
