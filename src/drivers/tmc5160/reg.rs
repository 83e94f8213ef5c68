// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TMC5160 register map and payload packing.

use crate::drivers::motor_driver::Direction;

// Register addresses
pub const GCONF: u8 = 0x00;
pub const GSTAT: u8 = 0x01;
pub const IHOLD_IRUN: u8 = 0x10;
pub const VACTUAL: u8 = 0x22;

/// GSTAT flags. Each is cleared by writing 1.
pub mod gstat {
    /// The chip has been reset since the last GSTAT read.
    pub const RESET: u32 = 1 << 0;
    /// Driver shut down on overtemperature or short.
    pub const DRV_ERR: u32 = 1 << 1;
    /// Charge pump undervoltage.
    pub const UV_CP: u32 = 1 << 2;

    pub const CLEAR_ALL: u32 = RESET | DRV_ERR | UV_CP;
}

/// A contiguous bit field inside a 32-bit register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    shift: u32,
    width: u32,
}

impl Field {
    /// Panics at compile time when used in a `const` with a field that does not fit in 32 bits.
    pub const fn new(shift: u32, width: u32) -> Self {
        assert!(width > 0 && shift + width <= 32);
        Self { shift, width }
    }

    /// Unshifted mask covering `width` bits.
    #[inline]
    pub const fn mask(self) -> u32 {
        u32::MAX >> (32 - self.width)
    }

    /// Replace this field in `word` with `value`, truncated to the field width.
    #[inline]
    pub const fn insert(self, word: u32, value: u32) -> u32 {
        (word & !(self.mask() << self.shift)) | ((value & self.mask()) << self.shift)
    }

    #[inline]
    pub const fn extract(self, word: u32) -> u32 {
        (word >> self.shift) & self.mask()
    }

    const fn end(self) -> u32 {
        self.shift + self.width
    }
}

// IHOLD_IRUN fields, one per byte.
pub const IHOLD: Field = Field::new(0, 5);
pub const IRUN: Field = Field::new(8, 5);
pub const IHOLDDELAY: Field = Field::new(16, 4);

const _: () = assert!(IHOLD.end() <= IRUN.shift && IRUN.end() <= IHOLDDELAY.shift);

/// Coil current scale, `(level + 1) / 32` of full scale.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Current(u8);

impl Current {
    pub const MAX_LEVEL: u8 = IHOLD.mask() as u8;

    pub const ONE_32: Current = Current(0x00);
    pub const TWO_32: Current = Current(0x01);
    pub const THIRTY_ONE_32: Current = Current(0x1E);
    pub const FULL: Current = Current(0x1F);

    /// Current level, clamped to `0..=31`.
    #[inline]
    pub const fn new(level: u8) -> Self {
        if level > Self::MAX_LEVEL {
            Self(Self::MAX_LEVEL)
        } else {
            Self(level)
        }
    }

    #[inline]
    pub const fn level(self) -> u8 {
        self.0
    }
}

/// Delay before the motor current drops from run to hold level after motion stops, in units of
/// 2^18 clock cycles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HoldDelay(u8);

impl HoldDelay {
    pub const MAX_LEVEL: u8 = IHOLDDELAY.mask() as u8;

    /// Instant power down.
    pub const INSTANT: HoldDelay = HoldDelay(0x00);
    pub const ONE: HoldDelay = HoldDelay(0x01);
    pub const TEN: HoldDelay = HoldDelay(0x0A);
    pub const MAX: HoldDelay = HoldDelay(0x0F);

    /// Delay level, clamped to `0..=15`.
    #[inline]
    pub const fn new(level: u8) -> Self {
        if level > Self::MAX_LEVEL {
            Self(Self::MAX_LEVEL)
        } else {
            Self(level)
        }
    }

    #[inline]
    pub const fn level(self) -> u8 {
        self.0
    }
}

/// Contents of the IHOLD_IRUN register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CurrentControl {
    pub hold: Current,
    pub run: Current,
    pub hold_delay: HoldDelay,
}

impl CurrentControl {
    pub const fn new(hold: Current, run: Current, hold_delay: HoldDelay) -> Self {
        Self {
            hold,
            run,
            hold_delay,
        }
    }

    pub fn with_hold(mut self, hold: Current) -> Self {
        self.hold = hold;
        self
    }

    pub fn with_run(mut self, run: Current) -> Self {
        self.run = run;
        self
    }

    pub fn with_hold_delay(mut self, hold_delay: HoldDelay) -> Self {
        self.hold_delay = hold_delay;
        self
    }

    /// Pack into the 32-bit register word. Unused bits are zero.
    pub const fn to_bits(self) -> u32 {
        let word = IHOLD.insert(0, self.hold.0 as u32);
        let word = IRUN.insert(word, self.run.0 as u32);
        IHOLDDELAY.insert(word, self.hold_delay.0 as u32)
    }

    pub const fn from_bits(word: u32) -> Self {
        Self {
            hold: Current(IHOLD.extract(word) as u8),
            run: Current(IRUN.extract(word) as u8),
            hold_delay: HoldDelay(IHOLDDELAY.extract(word) as u8),
        }
    }
}

impl Default for CurrentControl {
    /// Low standstill current, full run current, moderate power-down delay.
    fn default() -> Self {
        Self::new(Current::ONE_32, Current::FULL, HoldDelay::TEN)
    }
}

// Motion constants
/// 1.8° motor.
pub const FULL_STEPS_PER_REV: i32 = 200;
/// MRES = 0 (native 256 microstep resolution).
pub const MICROSTEPS_PER_FULL_STEP: i32 = 256;
pub const MICROSTEPS_PER_REV: i32 = FULL_STEPS_PER_REV * MICROSTEPS_PER_FULL_STEP;
const SECONDS_PER_MINUTE: i32 = 60;

/// VACTUAL is a 24-bit signed field.
pub const VACTUAL_MAX: i32 = (1 << 23) - 1;
pub const VACTUAL_MIN: i32 = -(1 << 23);

/// Signed VACTUAL value for `rpm` in `direction`, in microsteps per second.
///
/// Division truncates toward zero. The result is not clamped to the register width; see
/// [`vactual_fits`].
pub fn vactual(rpm: i16, direction: Direction) -> i32 {
    // |i16::MIN| * 51200 < 2^31
    let velocity = MICROSTEPS_PER_REV * i32::from(rpm) / SECONDS_PER_MINUTE;
    match direction {
        Direction::Clockwise => velocity,
        Direction::CounterClockwise => -velocity,
    }
}

/// Whether `velocity` is representable in the VACTUAL field.
#[inline]
pub fn vactual_fits(velocity: i32) -> bool {
    (VACTUAL_MIN..=VACTUAL_MAX).contains(&velocity)
}
