use core::fmt;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("write failed because the ring is full")]
    Full,
    #[error("write failed because the element is {actual} bytes, expected {expected}")]
    ElementSize { expected: usize, actual: usize },
}

impl WriteError {
    pub fn is_full(&self) -> bool {
        matches!(&self, WriteError::Full)
    }
}

/// A rejected typed write, handing the value back to the caller.
#[derive(Clone, PartialEq, Eq, Error)]
#[error("{err}")]
pub struct TryWriteError<T> {
    pub(crate) err: WriteError,
    pub(crate) val: T,
}

impl<T> fmt::Debug for TryWriteError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryWriteError")
            .field("kind", &self.err)
            .finish()
    }
}

impl<T> TryWriteError<T> {
    pub(crate) fn full(val: T) -> Self {
        Self {
            err: WriteError::Full,
            val,
        }
    }

    pub fn is_full(&self) -> bool {
        self.err.is_full()
    }

    pub fn into_inner(self) -> T {
        self.val
    }

    pub fn into_write_error(self) -> WriteError {
        self.err
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("reading from an empty ring")]
    Empty,
    #[error("read buffer is {actual} bytes, expected {expected}")]
    ElementSize { expected: usize, actual: usize },
}

impl ReadError {
    pub fn is_empty(&self) -> bool {
        matches!(&self, ReadError::Empty)
    }
}

/// Why a byte buffer cannot back a [`RawRing`](crate::RawRing).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("element size must not be zero")]
    ZeroElementSize,
    #[error("element size {size} does not fit the handle header (max {max})")]
    ElementTooLarge { size: usize, max: usize },
    #[error("{bytes} storage bytes are not a whole number of {element_size}-byte elements")]
    Misaligned { bytes: usize, element_size: usize },
    #[error("depth {depth} is not a power of two")]
    NotPowerOfTwo { depth: usize },
    #[error("depth {depth} is outside {min}..={max}")]
    DepthOutOfRange { depth: usize, min: usize, max: usize },
}
