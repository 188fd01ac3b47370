use crate::error::{TryWriteError, WriteError};
use crate::RingBuffer;
use futures_sink::Sink;
use futures_util::Stream;
use core::pin::Pin;
use core::task::{Context, Poll};

/// Borrows a [`RingBuffer`] as a [`Sink`] and a [`Stream`].
///
/// Nothing here ever waits: a full ring makes the sink fail with
/// [`WriteError::Full`], an empty ring ends the stream.
pub struct RingWrapper<'a, T, const N: usize> {
    inner: &'a mut RingBuffer<T, N>,
}

impl<'a, T, const N: usize> RingWrapper<'a, T, N> {
    pub fn new(ring: &'a mut RingBuffer<T, N>) -> Self {
        Self { inner: ring }
    }

    pub fn into_inner(self) -> &'a mut RingBuffer<T, N> {
        self.inner
    }
}

impl<T: Copy, const N: usize> Sink<T> for RingWrapper<'_, T, N> {
    type Error = WriteError;

    fn poll_ready(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        if self.inner.is_full() {
            Poll::Ready(Err(WriteError::Full))
        } else {
            Poll::Ready(Ok(()))
        }
    }

    fn start_send(mut self: Pin<&mut Self>, item: T) -> Result<(), Self::Error> {
        self.inner
            .write(item)
            .map_err(TryWriteError::into_write_error)
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }
}

impl<T: Copy, const N: usize> Stream for RingWrapper<'_, T, N> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Option<T>> {
        Poll::Ready(self.inner.read())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let level = self.inner.level();
        (level, Some(level))
    }
}
