// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Progress cursor and step tables for the TMC5160 driver operations.

use super::reg;

/// Saved progress of one driver operation.
///
/// Every operation starts and ends at `Idle`. Any other value means a transaction is in progress
/// and the operation must be called again to resume it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Idle,
    /// Chip select about to be asserted.
    AcquiringBus,
    /// Telegram for register write `n` about to be built.
    ComputingPayload(usize),
    /// Register write `n` issued to the bus, not yet acknowledged.
    AwaitingTransfer(usize),
    /// About to deassert chip select and report the outcome.
    ReleaseBus(Outcome),
}

impl State {
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, State::Idle)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// One of the two driver operations, with the arguments of the current call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Operation {
    Initialize,
    SetVelocity { rpm: i16 },
}

/// Source of the payload for one register write.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Write {
    CurrentControl,
    ClearStatus,
    Velocity,
}

impl Write {
    pub(crate) fn address(self) -> u8 {
        match self {
            Write::CurrentControl => reg::IHOLD_IRUN,
            Write::ClearStatus => reg::GSTAT,
            Write::Velocity => reg::VACTUAL,
        }
    }
}

const INITIALIZE_WRITES: &[Write] = &[Write::CurrentControl, Write::ClearStatus];
const SET_VELOCITY_WRITES: &[Write] = &[Write::Velocity];

impl Operation {
    /// Register writes issued, in order, while the chip is selected.
    pub(crate) fn writes(self) -> &'static [Write] {
        match self {
            Operation::Initialize => INITIALIZE_WRITES,
            Operation::SetVelocity { .. } => SET_VELOCITY_WRITES,
        }
    }

    /// Whether the operation drives the SD_MODE line before selecting the chip.
    pub(crate) fn selects_mode(self) -> bool {
        matches!(self, Operation::Initialize)
    }
}
