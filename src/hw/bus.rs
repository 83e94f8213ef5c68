// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Non-blocking bus transfer primitive.
//!
//! Drivers that must never stall the caller talk to the bus through [`Transmit`]. A transfer either
//! completes (`Ok`), is still in flight (`WouldBlock`), or fails (`Other`). On `WouldBlock` the
//! caller re-issues the *same* frame later; the implementation keeps whatever progress it made.

/// Write a complete frame to the bus without blocking.
pub trait Transmit {
    type Error;

    /// Push `frame` onto the bus.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` until every byte of the frame has been clocked out.
    fn transmit(&mut self, frame: &[u8]) -> nb::Result<(), Self::Error>;
}

impl<T: Transmit + ?Sized> Transmit for &mut T {
    type Error = T::Error;

    #[inline]
    fn transmit(&mut self, frame: &[u8]) -> nb::Result<(), Self::Error> {
        (**self).transmit(frame)
    }
}
