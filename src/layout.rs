//! Capacity rounding and derived index widths.
//!
//! Every ring in this crate has a power-of-two number of slots so that
//! wrap-around is a single `& mask`. Callers ask for a depth, this module
//! decides the real one.

use core::fmt;

/// Smallest capacity a ring can have.
pub const MIN_DEPTH: usize = 4;

/// Largest capacity of a [`RingBuffer`](crate::RingBuffer).
///
/// The typed ring keeps its cursors in `u16`, and `level` has to be able to
/// hold the capacity itself.
pub const MAX_DEPTH: usize = 1 << 15;

#[cfg(feature = "wide-handle")]
mod inner {
    /// Integer type of every header field of a [`RawRing`](crate::RawRing).
    pub type HandleIndex = u16;

    pub const HANDLE_MAX_DEPTH: usize = 1 << 15;
}

#[cfg(not(feature = "wide-handle"))]
mod inner {
    /// Integer type of every header field of a [`RawRing`](crate::RawRing).
    pub type HandleIndex = u8;

    pub const HANDLE_MAX_DEPTH: usize = 1 << 7;
}

pub use self::inner::HandleIndex;

/// Largest capacity of a [`RawRing`](crate::RawRing).
///
/// 128 by default, 2^15 with the `wide-handle` feature.
pub const HANDLE_MAX_DEPTH: usize = inner::HANDLE_MAX_DEPTH;

/// Rounds `requested` up to a valid [`RingBuffer`](crate::RingBuffer)
/// capacity.
///
/// ```
/// use fifofast::{depth, RingBuffer};
///
/// assert_eq!(depth(1), 4);
/// assert_eq!(depth(5), 8);
/// assert_eq!(depth(8), 8);
///
/// let ring = RingBuffer::<u8, { depth(6) }>::new();
/// assert_eq!(ring.capacity(), 8);
/// ```
pub const fn depth(requested: usize) -> usize {
    clamp_depth(requested, MAX_DEPTH)
}

/// Rounds `requested` up to a valid [`RawRing`](crate::RawRing) capacity.
pub const fn handle_depth(requested: usize) -> usize {
    clamp_depth(requested, HANDLE_MAX_DEPTH)
}

/// Number of storage bytes a [`RawRing`](crate::RawRing) needs for
/// `requested` elements of `element_size` bytes.
///
/// ```
/// use fifofast::{raw_storage_len, RawRing};
///
/// let ring = RawRing::<[u8; raw_storage_len(2, 5)]>::new(2).unwrap();
/// assert_eq!(ring.capacity(), 8);
/// ```
pub const fn raw_storage_len(element_size: usize, requested: usize) -> usize {
    element_size * handle_depth(requested)
}

const fn clamp_depth(requested: usize, max: usize) -> usize {
    if requested <= MIN_DEPTH {
        MIN_DEPTH
    } else if requested >= max {
        max
    } else {
        requested.next_power_of_two()
    }
}

/// Unsigned integer width able to hold a given value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexWidth {
    U8,
    U16,
    U32,
    U64,
}

impl IndexWidth {
    /// Narrowest width whose maximum is at least `value`.
    pub const fn for_max(value: usize) -> Self {
        if value <= u8::MAX as usize {
            IndexWidth::U8
        } else if value <= u16::MAX as usize {
            IndexWidth::U16
        } else if value as u64 <= u32::MAX as u64 {
            IndexWidth::U32
        } else {
            IndexWidth::U64
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            IndexWidth::U8 => 8,
            IndexWidth::U16 => 16,
            IndexWidth::U32 => 32,
            IndexWidth::U64 => 64,
        }
    }
}

impl fmt::Display for IndexWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.bits())
    }
}

/// Resolved geometry of a ring.
///
/// Built from a requested depth; the widths are derived from the capacity and
/// cannot be set on their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    capacity: usize,
}

impl Layout {
    /// Layout of a [`RingBuffer`](crate::RingBuffer) asked to hold
    /// `requested` elements.
    pub const fn new(requested: usize) -> Self {
        Self {
            capacity: depth(requested),
        }
    }

    /// Layout of a [`RawRing`](crate::RawRing) asked to hold `requested`
    /// elements.
    pub const fn handle(requested: usize) -> Self {
        Self {
            capacity: handle_depth(requested),
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub const fn mask(&self) -> usize {
        self.capacity - 1
    }

    /// Width needed by `read` and `write`, which range over `0..capacity`.
    pub const fn index_width(&self) -> IndexWidth {
        IndexWidth::for_max(self.mask())
    }

    /// Width needed by `level`, which ranges over `0..=capacity`.
    ///
    /// One bit wider than [`index_width`](Self::index_width) whenever the
    /// capacity is the first value that no longer fits, e.g. 256.
    pub const fn level_width(&self) -> IndexWidth {
        IndexWidth::for_max(self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_up_to_power_of_two() {
        assert_eq!(depth(0), 4);
        assert_eq!(depth(3), 4);
        assert_eq!(depth(4), 4);
        assert_eq!(depth(6), 8);
        assert_eq!(depth(200), 256);
        assert_eq!(depth(usize::MAX), MAX_DEPTH);
        assert_eq!(handle_depth(usize::MAX), HANDLE_MAX_DEPTH);
        assert_eq!(handle_depth(HANDLE_MAX_DEPTH + 1), HANDLE_MAX_DEPTH);
        assert_eq!(handle_depth(HANDLE_MAX_DEPTH / 2 + 1), HANDLE_MAX_DEPTH);
    }

    #[test]
    fn resolving_twice_is_noop() {
        for d in 1..2048 {
            assert_eq!(depth(depth(d)), depth(d));
            assert_eq!(handle_depth(handle_depth(d)), handle_depth(d));
        }
    }

    #[test]
    fn level_needs_an_extra_bit_at_256() {
        let layout = Layout::new(256);
        assert_eq!(layout.mask(), 255);
        assert_eq!(layout.index_width(), IndexWidth::U8);
        assert_eq!(layout.level_width(), IndexWidth::U16);

        let layout = Layout::new(100);
        assert_eq!(layout.capacity(), 128);
        assert_eq!(layout.index_width(), IndexWidth::U8);
        assert_eq!(layout.level_width(), IndexWidth::U8);
    }

    #[test]
    fn handle_fields_hold_max_level() {
        assert!(HANDLE_MAX_DEPTH <= HandleIndex::MAX as usize);
        assert!(HANDLE_MAX_DEPTH.is_power_of_two());
        assert_eq!(std::string::ToString::to_string(&IndexWidth::U16), "u16");
    }
}
