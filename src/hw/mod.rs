// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Layer
//!
//! [`bus`] defines the non-blocking transfer primitive drivers are written against and is always
//! available. The remaining modules wrap STM32F7 peripherals and are only built with the `board`
//! feature.

pub mod bus;

#[cfg(feature = "board")]
pub mod gpio;
#[cfg(feature = "board")]
pub mod pins;
#[cfg(feature = "board")]
pub mod spi;
#[cfg(feature = "board")]
pub mod usart;

pub use bus::Transmit;

#[cfg(feature = "board")]
pub use gpio::OutputLine;
#[cfg(feature = "board")]
pub use pins::BoardPins;
#[cfg(feature = "board")]
pub use spi::{ChipSelect, SpiBus};
#[cfg(feature = "board")]
pub use usart::{Usart, UsartLogger};
