// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! application logic.
//!
//! ## Existing drivers
//!
//! - [`motor_driver`] – Generic non-blocking motor-driver interface
//! - [`tmc5160`] – Trinamic TMC5160 stepper driver over SPI

pub mod motor_driver;
pub mod tmc5160;

pub use motor_driver::{Direction, Error, MotorDriver};
pub use tmc5160::Tmc5160;
