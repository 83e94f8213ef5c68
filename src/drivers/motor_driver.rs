// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Generic motor-driver interface.
//!
//! Any chip that can be brought up and commanded to spin at a given speed implements
//! [`MotorDriver`]. Both operations are non-blocking: `Err(nb::Error::WouldBlock)` means the
//! operation is still in progress and must be called again to continue.

use core::fmt;

/// Rotation direction of the motor shaft.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

/// Error type for motor-driver operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// No driver was given to a dispatch call.
    MissingDriver,
    /// The bus reported a failed transfer. The chip has been deselected.
    Bus(E),
    /// An operation's progress cursor was outside its step table. The chip has been deselected
    /// and the cursor reset.
    InvalidState,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingDriver => f.write_str("no motor driver"),
            Error::Bus(e) => write!(f, "bus transfer failed: {:?}", e),
            Error::InvalidState => f.write_str("driver state machine in invalid state"),
        }
    }
}

/// A motor driver that can be initialized and given a target velocity.
pub trait MotorDriver {
    /// Error reported by the underlying bus.
    type BusError;

    /// Bring the driver chip into a known operating configuration.
    fn initialize(&mut self) -> nb::Result<(), Error<Self::BusError>>;

    /// Command a constant velocity of `rpm` revolutions per minute in `direction`.
    fn set_velocity(
        &mut self,
        rpm: i16,
        direction: Direction,
    ) -> nb::Result<(), Error<Self::BusError>>;
}

/// Initialize `driver`, or fail with [`Error::MissingDriver`] if there is none.
pub fn initialize<D>(driver: Option<&mut D>) -> nb::Result<(), Error<D::BusError>>
where
    D: MotorDriver + ?Sized,
{
    match driver {
        Some(driver) => driver.initialize(),
        None => Err(nb::Error::Other(Error::MissingDriver)),
    }
}

/// Set the velocity of `driver`, or fail with [`Error::MissingDriver`] if there is none.
pub fn set_velocity<D>(
    driver: Option<&mut D>,
    rpm: i16,
    direction: Direction,
) -> nb::Result<(), Error<D::BusError>>
where
    D: MotorDriver + ?Sized,
{
    match driver {
        Some(driver) => driver.set_velocity(rpm, direction),
        None => Err(nb::Error::Other(Error::MissingDriver)),
    }
}
