//! Minimal abstraction for the receive side of an asynchronous CAN bus.
//! Receive only: a listen-only node never emits frames.
use crate::protocol::transport::can_frame::CanFrame;

/// Contract to receive CAN frames asynchronously from a listen-only controller.
pub trait CanListener {
    /// Controller-level fault (bus-off, driver error...). Always fatal to the observer.
    type Error: core::fmt::Debug;
    /// Retrieve the next available frame. Asynchronously waits until data arrives.
    ///
    /// The returned future must be cancel-safe: the observer drops it when the
    /// receive window elapses, and a frame must not be lost by doing so.
    fn recv<'a>(
        &'a mut self,
    ) -> impl core::future::Future<Output = Result<CanFrame, Self::Error>> + 'a;
}
