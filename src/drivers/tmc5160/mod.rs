// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Trinamic TMC5160 stepper driver over SPI.
//!
//! Register writes are issued through a non-blocking [`Transmit`] bus, so each operation is a
//! resumable state machine. A call runs every step it can (pin writes, telegram encoding) and stops
//! at the first transfer that is still in flight, returning `WouldBlock`. The next call to the same
//! operation resumes at exactly that transfer.
//!
//! Operations:
//! - `initialize`: SD_MODE low (SPI mode) -> CS low -> IHOLD_IRUN -> GSTAT clear -> CS high
//! - `set_velocity`: CS low -> VACTUAL -> CS high
//!
//! The two operations keep independent cursors but share one telegram buffer and one CS line. The
//! caller must not interleave them on the same driver while either is mid-transaction.

pub mod reg;
pub mod state;
pub mod telegram;

#[cfg(test)]
mod tests;

use embedded_hal::digital::OutputPin;
use log::{error, trace, warn};

use crate::drivers::motor_driver::{Direction, Error, MotorDriver};
use crate::hw::Transmit;

pub use reg::{Current, CurrentControl, HoldDelay};
pub use state::{Outcome, State};
pub use telegram::Telegram;

use state::{Operation, Write};

/// TMC5160 driver bound to a bus, an active-low chip-select line and the SD_MODE line.
pub struct Tmc5160<SPI, CS, MODE> {
    spi: SPI,
    cs: CS,
    mode: MODE,
    init_state: State,
    velocity_state: State,
    /// Valid only between building a telegram and its transfer completing.
    telegram: Telegram,
    config: CurrentControl,
    direction: Direction,
}

impl<SPI, CS, MODE> Tmc5160<SPI, CS, MODE>
where
    SPI: Transmit,
    CS: OutputPin,
    MODE: OutputPin,
{
    /// Create a driver. No pins are touched and nothing is sent until the first operation call.
    pub fn new(spi: SPI, cs: CS, mode: MODE, config: CurrentControl) -> Self {
        Self {
            spi,
            cs,
            mode,
            init_state: State::Idle,
            velocity_state: State::Idle,
            telegram: Telegram::default(),
            config,
            direction: Direction::Clockwise,
        }
    }

    /// Release the bus and both control lines.
    pub fn free(self) -> (SPI, CS, MODE) {
        (self.spi, self.cs, self.mode)
    }

    #[inline]
    pub fn config(&self) -> CurrentControl {
        self.config
    }

    /// Direction of the most recent `set_velocity` call.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn init_state(&self) -> State {
        self.init_state
    }

    #[inline]
    pub fn velocity_state(&self) -> State {
        self.velocity_state
    }

    fn cursor_mut(&mut self, op: Operation) -> &mut State {
        match op {
            Operation::Initialize => &mut self.init_state,
            Operation::SetVelocity { .. } => &mut self.velocity_state,
        }
    }

    fn payload(&self, write: Write, op: Operation) -> u32 {
        match write {
            Write::CurrentControl => self.config.to_bits(),
            Write::ClearStatus => reg::gstat::CLEAR_ALL,
            Write::Velocity => {
                let rpm = match op {
                    Operation::SetVelocity { rpm } => rpm,
                    Operation::Initialize => 0,
                };
                let velocity = reg::vactual(rpm, self.direction);
                if !reg::vactual_fits(velocity) {
                    warn!(
                        "tmc5160: {} rpm gives VACTUAL {} outside 24-bit range, sending unclamped",
                        rpm, velocity
                    );
                }
                velocity as u32
            }
        }
    }

    /// Run `op` from its saved cursor until it finishes or blocks on a transfer.
    fn poll(&mut self, op: Operation) -> nb::Result<(), Error<SPI::Error>> {
        let writes = op.writes();
        let mut state = *self.cursor_mut(op);
        let mut failure = None;

        loop {
            state = match state {
                State::Idle => {
                    if op.selects_mode() {
                        // SD_MODE low: internal ramp generator, SPI register access
                        let _ = self.mode.set_low();
                    }
                    State::AcquiringBus
                }
                State::AcquiringBus => {
                    let _ = self.cs.set_low();
                    State::ComputingPayload(0)
                }
                State::ComputingPayload(step) => match writes.get(step) {
                    Some(&write) => {
                        let value = self.payload(write, op);
                        self.telegram = Telegram::write(write.address(), value);
                        trace!(
                            "tmc5160: {:?} write {:#04x} <- {:#010x}",
                            op,
                            write.address(),
                            value
                        );
                        State::AwaitingTransfer(step)
                    }
                    None => return self.recover(op, state),
                },
                State::AwaitingTransfer(step) if step < writes.len() => {
                    match self.spi.transmit(self.telegram.as_bytes()) {
                        Ok(()) if step + 1 < writes.len() => State::ComputingPayload(step + 1),
                        Ok(()) => State::ReleaseBus(Outcome::Success),
                        Err(nb::Error::WouldBlock) => {
                            *self.cursor_mut(op) = state;
                            return Err(nb::Error::WouldBlock);
                        }
                        Err(nb::Error::Other(e)) => {
                            warn!(
                                "tmc5160: {:?} transfer to {:#04x} failed",
                                op,
                                writes[step].address()
                            );
                            failure = Some(e);
                            State::ReleaseBus(Outcome::Failure)
                        }
                    }
                }
                State::AwaitingTransfer(_) => return self.recover(op, state),
                State::ReleaseBus(outcome) => {
                    let _ = self.cs.set_high();
                    *self.cursor_mut(op) = State::Idle;
                    return match (outcome, failure) {
                        (Outcome::Success, _) => Ok(()),
                        (Outcome::Failure, Some(e)) => Err(nb::Error::Other(Error::Bus(e))),
                        (Outcome::Failure, None) => Err(nb::Error::Other(Error::InvalidState)),
                    };
                }
            };
        }
    }

    /// Fail-safe exit for a cursor outside the step table: deselect, reset, report.
    fn recover(&mut self, op: Operation, state: State) -> nb::Result<(), Error<SPI::Error>> {
        error!("tmc5160: {:?} cursor at unreachable {:?}, releasing bus", op, state);
        let _ = self.cs.set_high();
        *self.cursor_mut(op) = State::Idle;
        Err(nb::Error::Other(Error::InvalidState))
    }
}

impl<SPI, CS, MODE> MotorDriver for Tmc5160<SPI, CS, MODE>
where
    SPI: Transmit,
    CS: OutputPin,
    MODE: OutputPin,
{
    type BusError = SPI::Error;

    fn initialize(&mut self) -> nb::Result<(), Error<SPI::Error>> {
        self.poll(Operation::Initialize)
    }

    fn set_velocity(
        &mut self,
        rpm: i16,
        direction: Direction,
    ) -> nb::Result<(), Error<SPI::Error>> {
        self.direction = direction;
        self.poll(Operation::SetVelocity { rpm })
    }
}
