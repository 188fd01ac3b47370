use super::{Cursors, Ring};
use crate::error::{LayoutError, ReadError, WriteError};
use crate::layout::{HandleIndex, HANDLE_MAX_DEPTH, MIN_DEPTH};
use core::fmt;
use core::ops::{Deref, DerefMut};

/// A byte ring described at runtime.
///
/// The header is laid out in C order (element size, mask, read, write,
/// level) and followed by the element storage, so a debugger can read a
/// ring's state directly. Create one with a fixed storage array and hand it
/// around as `&mut RingBufferHandle`: every function taking a handle works
/// for any element size and depth.
///
/// ```
/// use fifofast::{raw_storage_len, RawRing, RingBufferHandle};
///
/// fn push_sample(ring: &mut RingBufferHandle, sample: u16) -> bool {
///     ring.write(&sample.to_le_bytes()).is_ok()
/// }
///
/// let mut ring = RawRing::<[u8; raw_storage_len(2, 4)]>::new(2).unwrap();
/// assert!(push_sample(&mut ring, 0x1234));
/// assert_eq!(ring.peek(0), &[0x34, 0x12]);
/// ```
#[repr(C)]
pub struct RawRing<S: ?Sized> {
    element_size: HandleIndex,
    mask: HandleIndex,
    read: HandleIndex,
    write: HandleIndex,
    level: HandleIndex,
    data: S,
}

/// The unsized view of any [`RawRing`].
pub type RingBufferHandle = RawRing<[u8]>;

fn validate(element_size: usize, bytes: usize) -> Result<usize, LayoutError> {
    if element_size == 0 {
        return Err(LayoutError::ZeroElementSize);
    }
    if element_size > HandleIndex::MAX as usize {
        return Err(LayoutError::ElementTooLarge {
            size: element_size,
            max: HandleIndex::MAX as usize,
        });
    }
    if bytes % element_size != 0 {
        return Err(LayoutError::Misaligned {
            bytes,
            element_size,
        });
    }

    let depth = bytes / element_size;
    if !(MIN_DEPTH..=HANDLE_MAX_DEPTH).contains(&depth) {
        return Err(LayoutError::DepthOutOfRange {
            depth,
            min: MIN_DEPTH,
            max: HANDLE_MAX_DEPTH,
        });
    }
    if !depth.is_power_of_two() {
        return Err(LayoutError::NotPowerOfTwo { depth });
    }
    Ok(depth - 1)
}

impl<const B: usize> RawRing<[u8; B]> {
    /// Creates an empty ring of `B / element_size` elements.
    ///
    /// Fails unless `B` is a whole, power-of-two number of elements within
    /// `4..=HANDLE_MAX_DEPTH`; [`raw_storage_len`](crate::raw_storage_len)
    /// computes a valid `B`.
    pub fn new(element_size: usize) -> Result<Self, LayoutError> {
        let mask = validate(element_size, B).inspect_err(|err| {
            tracing::debug!(%err, element_size, bytes = B, "rejected byte ring layout");
        })?;

        tracing::trace!(element_size, capacity = mask + 1, "created byte ring");

        Ok(Self {
            element_size: element_size as HandleIndex,
            mask: mask as HandleIndex,
            read: 0,
            write: 0,
            level: 0,
            data: [0; B],
        })
    }

    pub fn handle(&mut self) -> &mut RingBufferHandle {
        self
    }
}

impl<const B: usize> Deref for RawRing<[u8; B]> {
    type Target = RingBufferHandle;

    fn deref(&self) -> &RingBufferHandle {
        self
    }
}

impl<const B: usize> DerefMut for RawRing<[u8; B]> {
    fn deref_mut(&mut self) -> &mut RingBufferHandle {
        self
    }
}

impl<const B: usize> Clone for RawRing<[u8; B]> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<const B: usize> Copy for RawRing<[u8; B]> {}

impl Ring for RingBufferHandle {
    fn slot_mask(&self) -> usize {
        self.mask as usize
    }

    fn cursors(&self) -> Cursors {
        Cursors {
            read: self.read as usize,
            write: self.write as usize,
            level: self.level as usize,
        }
    }

    fn set_cursors(&mut self, cursors: Cursors) {
        self.read = cursors.read as HandleIndex;
        self.write = cursors.write as HandleIndex;
        self.level = cursors.level as HandleIndex;
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        let (lo, hi) = (self.wrap(a.min(b)), self.wrap(a.max(b)));
        if lo == hi {
            return;
        }
        let size = self.element_size();
        let (left, right) = self.data.split_at_mut(hi * size);
        left[lo * size..][..size].swap_with_slice(&mut right[..size]);
    }
}

impl RingBufferHandle {
    /// Bytes per element.
    pub fn element_size(&self) -> usize {
        self.element_size as usize
    }

    pub fn capacity(&self) -> usize {
        self.slots()
    }

    pub fn mask(&self) -> usize {
        self.slot_mask()
    }

    pub fn level(&self) -> usize {
        self.occupied()
    }

    pub fn free(&self) -> usize {
        self.vacant()
    }

    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    pub fn is_full(&self) -> bool {
        self.at_capacity()
    }

    pub fn read_index(&self) -> usize {
        self.read as usize
    }

    pub fn write_index(&self) -> usize {
        self.write as usize
    }

    /// Appends one element of exactly [`element_size`](Self::element_size)
    /// bytes.
    pub fn write(&mut self, element: &[u8]) -> Result<(), WriteError> {
        self.check_write_len(element.len())?;
        let idx = self.next_write_slot().ok_or(WriteError::Full)?;
        self.slot_mut(idx).copy_from_slice(element);
        Ok(())
    }

    /// Appends one element without checking for space.
    ///
    /// # Panics
    ///
    /// Panics if `element` is not exactly `element_size` bytes.
    pub fn write_lite(&mut self, element: &[u8]) {
        let idx = self.next_write_slot_lite();
        self.slot_mut(idx).copy_from_slice(element);
    }

    /// Moves the head element into `out`, which must be exactly
    /// `element_size` bytes.
    pub fn read(&mut self, out: &mut [u8]) -> Result<(), ReadError> {
        self.check_read_len(out.len())?;
        let idx = self.next_read_slot().ok_or(ReadError::Empty)?;
        out.copy_from_slice(self.slot(idx));
        Ok(())
    }

    /// Moves the head element into `out` without checking that there is one.
    ///
    /// # Panics
    ///
    /// Panics if `out` is not exactly `element_size` bytes.
    pub fn read_lite(&mut self, out: &mut [u8]) {
        let idx = self.next_read_slot_lite();
        out.copy_from_slice(self.slot(idx));
    }

    /// The element `offset` places behind the head, masked into the storage
    /// like [`RingBuffer::peek`](crate::RingBuffer::peek).
    pub fn peek(&self, offset: usize) -> &[u8] {
        self.slot(self.slot_at(offset))
    }

    pub fn peek_mut(&mut self, offset: usize) -> &mut [u8] {
        let idx = self.slot_at(offset);
        self.slot_mut(idx)
    }

    /// Reserves the next slot and returns its bytes.
    pub fn add(&mut self) -> Option<&mut [u8]> {
        let idx = self.next_write_slot()?;
        Some(self.slot_mut(idx))
    }

    pub fn add_lite(&mut self) -> &mut [u8] {
        let idx = self.next_write_slot_lite();
        self.slot_mut(idx)
    }

    pub fn remove(&mut self, amount: usize) -> usize {
        self.discard(amount)
    }

    pub fn remove_lite(&mut self, amount: usize) {
        self.discard_lite(amount)
    }

    pub fn reset(&mut self) {
        self.rewind()
    }

    /// Appends as many whole elements of `elements` as fit, returning the
    /// number of elements written.
    ///
    /// `elements` must be a whole number of elements long.
    pub fn write_multiple(&mut self, elements: &[u8]) -> Result<usize, WriteError> {
        let size = self.element_size();
        let trailing = elements.len() % size;
        if trailing != 0 {
            return Err(WriteError::ElementSize {
                expected: size,
                actual: trailing,
            });
        }

        let count = (elements.len() / size).min(self.free());
        for element in elements.chunks_exact(size).take(count) {
            self.write_lite(element);
        }
        Ok(count)
    }

    /// Moves as many elements as fit into `out`, returning the number of
    /// elements read.
    pub fn read_multiple(&mut self, out: &mut [u8]) -> Result<usize, ReadError> {
        let size = self.element_size();
        let trailing = out.len() % size;
        if trailing != 0 {
            return Err(ReadError::ElementSize {
                expected: size,
                actual: trailing,
            });
        }

        let count = (out.len() / size).min(self.level());
        for dst in out.chunks_exact_mut(size).take(count) {
            self.read_lite(dst);
        }
        Ok(count)
    }

    pub fn rebase(&mut self) {
        self.rotate_to_origin()
    }

    /// Rebases and returns the stored elements as one byte slice.
    pub fn make_contiguous(&mut self) -> &mut [u8] {
        self.rebase();
        let len = self.level().min(self.capacity()) * self.element_size();
        &mut self.data[..len]
    }

    /// The stored bytes in order, split where they wrap.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        let size = self.element_size();
        let (head, tail) = self.occupied_ranges();
        (
            &self.data[head.start * size..head.end * size],
            &self.data[tail.start * size..tail.end * size],
        )
    }

    fn check_write_len(&self, len: usize) -> Result<(), WriteError> {
        if len == self.element_size() {
            Ok(())
        } else {
            Err(WriteError::ElementSize {
                expected: self.element_size(),
                actual: len,
            })
        }
    }

    fn check_read_len(&self, len: usize) -> Result<(), ReadError> {
        if len == self.element_size() {
            Ok(())
        } else {
            Err(ReadError::ElementSize {
                expected: self.element_size(),
                actual: len,
            })
        }
    }

    fn slot(&self, idx: usize) -> &[u8] {
        let size = self.element_size();
        &self.data[self.wrap(idx) * size..][..size]
    }

    fn slot_mut(&mut self, idx: usize) -> &mut [u8] {
        let size = self.element_size();
        let start = self.wrap(idx) * size;
        &mut self.data[start..][..size]
    }
}

impl fmt::Debug for RingBufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (head, tail) = self.as_slices();
        f.debug_struct("RawRing")
            .field("element_size", &self.element_size)
            .field("mask", &self.mask)
            .field("read", &self.read)
            .field("write", &self.write)
            .field("level", &self.level)
            .field("head", &head)
            .field("tail", &tail)
            .finish()
    }
}

impl<const B: usize> fmt::Debug for RawRing<[u8; B]> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}
