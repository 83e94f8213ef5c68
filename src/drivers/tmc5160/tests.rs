// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};

use super::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Event {
    ModeLow,
    ModeHigh,
    CsLow,
    CsHigh,
    Transmit([u8; 5]),
}

type Log = Rc<RefCell<Vec<Event>>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct BusFault;

/// Scripted answer of the mock bus to one `transmit` call.
#[derive(Copy, Clone, Debug)]
enum Reply {
    Done,
    Busy,
    Fail,
}

use Reply::{Busy, Done, Fail};

/// Records every frame it is handed; answers `Done` once the script runs out.
struct MockBus {
    log: Log,
    replies: VecDeque<Reply>,
}

impl Transmit for MockBus {
    type Error = BusFault;

    fn transmit(&mut self, frame: &[u8]) -> nb::Result<(), BusFault> {
        let mut bytes = [0u8; 5];
        bytes.copy_from_slice(frame);
        self.log.borrow_mut().push(Event::Transmit(bytes));

        match self.replies.pop_front().unwrap_or(Done) {
            Done => Ok(()),
            Busy => Err(nb::Error::WouldBlock),
            Fail => Err(nb::Error::Other(BusFault)),
        }
    }
}

struct MockPin {
    log: Log,
    low: Event,
    high: Event,
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push(self.low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push(self.high);
        Ok(())
    }
}

type Driver = Tmc5160<MockBus, MockPin, MockPin>;

fn driver(replies: &[Reply]) -> (Driver, Log) {
    let log = Log::default();
    let bus = MockBus {
        log: log.clone(),
        replies: replies.iter().copied().collect(),
    };
    let cs = MockPin {
        log: log.clone(),
        low: Event::CsLow,
        high: Event::CsHigh,
    };
    let mode = MockPin {
        log: log.clone(),
        low: Event::ModeLow,
        high: Event::ModeHigh,
    };
    let config = CurrentControl::new(Current::new(0x00), Current::new(0x1F), HoldDelay::new(0x0A));

    (Tmc5160::new(bus, cs, mode, config), log)
}

/// Drain and return everything recorded so far.
fn take(log: &Log) -> Vec<Event> {
    log.borrow_mut().drain(..).collect()
}

const IHOLD_IRUN_FRAME: Event = Event::Transmit([0x90, 0x00, 0x0A, 0x1F, 0x00]);
const GSTAT_CLEAR_FRAME: Event = Event::Transmit([0x81, 0x00, 0x00, 0x00, 0x07]);
const VACTUAL_60_CW_FRAME: Event = Event::Transmit([0xA2, 0x00, 0x00, 0xC8, 0x00]);
const VACTUAL_60_CCW_FRAME: Event = Event::Transmit([0xA2, 0xFF, 0xFF, 0x38, 0x00]);

#[test]
fn construction_is_silent() {
    let (drv, log) = driver(&[]);
    assert!(take(&log).is_empty());
    assert!(drv.init_state().is_idle());
    assert!(drv.velocity_state().is_idle());
    assert_eq!(drv.config().to_bits(), 0x000A_1F00);
}

#[test]
fn initialize_selects_spi_mode_and_writes_registers_in_order() {
    let (mut drv, log) = driver(&[]);

    assert_eq!(drv.initialize(), Ok(()));
    assert_eq!(
        take(&log),
        [
            Event::ModeLow,
            Event::CsLow,
            IHOLD_IRUN_FRAME,
            GSTAT_CLEAR_FRAME,
            Event::CsHigh,
        ]
    );
    assert_eq!(drv.init_state(), State::Idle);
}

#[test]
fn set_velocity_writes_signed_vactual() {
    let (mut drv, log) = driver(&[]);

    assert_eq!(drv.set_velocity(60, Direction::Clockwise), Ok(()));
    assert_eq!(take(&log), [Event::CsLow, VACTUAL_60_CW_FRAME, Event::CsHigh]);

    assert_eq!(drv.set_velocity(60, Direction::CounterClockwise), Ok(()));
    assert_eq!(take(&log), [Event::CsLow, VACTUAL_60_CCW_FRAME, Event::CsHigh]);
    assert_eq!(drv.direction(), Direction::CounterClockwise);
}

#[test]
fn zero_rpm_stops_the_motor() {
    let (mut drv, log) = driver(&[]);

    assert_eq!(drv.set_velocity(0, Direction::CounterClockwise), Ok(()));
    assert_eq!(
        take(&log),
        [
            Event::CsLow,
            Event::Transmit([0xA2, 0x00, 0x00, 0x00, 0x00]),
            Event::CsHigh,
        ]
    );
}

#[test]
fn busy_transfer_resumes_at_the_same_write() {
    let (mut drv, log) = driver(&[Busy]);

    assert_eq!(drv.initialize(), Err(nb::Error::WouldBlock));
    assert_eq!(take(&log), [Event::ModeLow, Event::CsLow, IHOLD_IRUN_FRAME]);
    assert_eq!(drv.init_state(), State::AwaitingTransfer(0));

    // No second mode select or chip select on resume.
    assert_eq!(drv.initialize(), Ok(()));
    assert_eq!(take(&log), [IHOLD_IRUN_FRAME, GSTAT_CLEAR_FRAME, Event::CsHigh]);
    assert!(drv.init_state().is_idle());
}

#[test]
fn busy_on_second_write_does_not_repeat_the_first() {
    let (mut drv, log) = driver(&[Done, Busy, Busy]);

    assert_eq!(drv.initialize(), Err(nb::Error::WouldBlock));
    assert_eq!(
        take(&log),
        [
            Event::ModeLow,
            Event::CsLow,
            IHOLD_IRUN_FRAME,
            GSTAT_CLEAR_FRAME,
        ]
    );
    assert_eq!(drv.init_state(), State::AwaitingTransfer(1));

    assert_eq!(drv.initialize(), Err(nb::Error::WouldBlock));
    assert_eq!(take(&log), [GSTAT_CLEAR_FRAME]);

    assert_eq!(drv.initialize(), Ok(()));
    assert_eq!(take(&log), [GSTAT_CLEAR_FRAME, Event::CsHigh]);
}

#[test]
fn transfer_error_releases_chip_and_restarts_from_scratch() {
    let (mut drv, log) = driver(&[Done, Fail]);

    assert_eq!(drv.initialize(), Err(nb::Error::Other(Error::Bus(BusFault))));
    assert_eq!(
        take(&log),
        [
            Event::ModeLow,
            Event::CsLow,
            IHOLD_IRUN_FRAME,
            GSTAT_CLEAR_FRAME,
            Event::CsHigh,
        ]
    );
    assert!(drv.init_state().is_idle());

    assert_eq!(drv.initialize(), Ok(()));
    assert_eq!(
        take(&log),
        [
            Event::ModeLow,
            Event::CsLow,
            IHOLD_IRUN_FRAME,
            GSTAT_CLEAR_FRAME,
            Event::CsHigh,
        ]
    );
}

#[test]
fn transfer_error_after_busy_releases_chip() {
    let (mut drv, log) = driver(&[Busy, Fail]);

    assert_eq!(drv.set_velocity(60, Direction::Clockwise), Err(nb::Error::WouldBlock));
    assert_eq!(
        drv.set_velocity(60, Direction::Clockwise),
        Err(nb::Error::Other(Error::Bus(BusFault)))
    );
    assert_eq!(
        take(&log),
        [
            Event::CsLow,
            VACTUAL_60_CW_FRAME,
            VACTUAL_60_CW_FRAME,
            Event::CsHigh,
        ]
    );
    assert!(drv.velocity_state().is_idle());
}

#[test]
fn resumed_velocity_write_keeps_the_telegram_built_before_blocking() {
    let (mut drv, log) = driver(&[Busy]);

    assert_eq!(drv.set_velocity(60, Direction::Clockwise), Err(nb::Error::WouldBlock));
    assert_eq!(drv.set_velocity(120, Direction::Clockwise), Ok(()));
    assert_eq!(
        take(&log),
        [
            Event::CsLow,
            VACTUAL_60_CW_FRAME,
            VACTUAL_60_CW_FRAME,
            Event::CsHigh,
        ]
    );
}

#[test]
fn unreachable_transfer_step_fails_safe() {
    let (mut drv, log) = driver(&[]);
    drv.init_state = State::AwaitingTransfer(5);

    assert_eq!(drv.initialize(), Err(nb::Error::Other(Error::InvalidState)));
    assert_eq!(take(&log), [Event::CsHigh]);
    assert!(drv.init_state().is_idle());

    // Next call is a normal, complete initialization.
    assert_eq!(drv.initialize(), Ok(()));
    assert_eq!(take(&log).first(), Some(&Event::ModeLow));
}

#[test]
fn unreachable_payload_step_fails_safe() {
    let (mut drv, log) = driver(&[]);
    drv.velocity_state = State::ComputingPayload(1);

    assert_eq!(
        drv.set_velocity(60, Direction::Clockwise),
        Err(nb::Error::Other(Error::InvalidState))
    );
    assert_eq!(take(&log), [Event::CsHigh]);
    assert!(drv.velocity_state().is_idle());
}

#[test]
fn failure_release_without_a_bus_error_reports_invalid_state() {
    let (mut drv, log) = driver(&[]);
    drv.init_state = State::ReleaseBus(Outcome::Failure);

    assert_eq!(drv.initialize(), Err(nb::Error::Other(Error::InvalidState)));
    assert_eq!(take(&log), [Event::CsHigh]);
    assert!(drv.init_state().is_idle());
}

#[test]
fn operations_keep_independent_cursors() {
    let (mut drv, _log) = driver(&[Busy, Busy]);

    assert_eq!(drv.initialize(), Err(nb::Error::WouldBlock));
    assert_eq!(drv.init_state(), State::AwaitingTransfer(0));
    assert_eq!(drv.velocity_state(), State::Idle);

    assert_eq!(drv.set_velocity(60, Direction::Clockwise), Err(nb::Error::WouldBlock));
    assert_eq!(drv.init_state(), State::AwaitingTransfer(0));
    assert_eq!(drv.velocity_state(), State::AwaitingTransfer(0));

    assert_eq!(drv.set_velocity(60, Direction::Clockwise), Ok(()));
    assert_eq!(drv.init_state(), State::AwaitingTransfer(0));
    assert_eq!(drv.velocity_state(), State::Idle);

    assert_eq!(drv.initialize(), Ok(()));
    assert_eq!(drv.init_state(), State::Idle);
    assert_eq!(drv.velocity_state(), State::Idle);
}

#[test]
fn free_returns_the_bus_and_lines() {
    let (mut drv, _log) = driver(&[Busy]);
    assert_eq!(drv.initialize(), Err(nb::Error::WouldBlock));

    let (bus, cs, mode) = drv.free();
    assert!(bus.replies.is_empty());
    assert_eq!(cs.low, Event::CsLow);
    assert_eq!(mode.low, Event::ModeLow);
}
