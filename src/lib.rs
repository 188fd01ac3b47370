#![no_std]

//! Fixed-capacity FIFOs that never allocate.
//!
//! Two flavours share one implementation of the index arithmetic:
//!
//! - [`RingBuffer<T, N>`] stores `N` values of `T` inline; `N` is a power of
//!   two checked at compile time.
//! - [`RawRing`] stores raw bytes and keeps its element size and mask in a
//!   `#[repr(C)]` header, so any ring can be handed to non-generic code as a
//!   `&mut` [`RingBufferHandle`].
//!
//! Every operation has a checked form and a `_lite` form that skips the
//! full/empty check for hot paths where the caller already knows the answer.
//! Out-of-range offsets are masked back into the storage, so even misuse of
//! the `_lite` forms never touches memory outside the ring.
//!
//! There is no locking. If a ring is shared with an interrupt handler, all
//! access from normal code has to happen inside a critical section.

#[cfg(test)]
extern crate std;

pub mod error;
mod layout;
mod ring;
pub mod wrapper;

pub use self::layout::{
    depth, handle_depth, raw_storage_len, HandleIndex, IndexWidth, Layout, HANDLE_MAX_DEPTH,
    MAX_DEPTH, MIN_DEPTH,
};
pub use self::ring::{RawRing, RingBuffer, RingBufferHandle};
pub use self::wrapper::RingWrapper;
