// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # TMC5160 Stepper Driver Firmware
//!
//! This crate drives a Trinamic TMC5160 stepper-motor controller over SPI, written in Rust,
//! targeting an STM32F777 MCU.
//!
//! Every register write goes through a non-blocking bus transfer, so both driver operations
//! (initialize and set-velocity) are resumable state machines: each call makes as much progress as
//! it can, returns `WouldBlock` while a transfer is in flight, and picks up at the same step on the
//! next call.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Bus primitive trait, plus MCU-level wrappers around SPI, GPIO and USART (`board`) |
//! | [`drivers`] | Generic motor-driver interface and the TMC5160 driver |
//!
//! ## Getting Started
//!
//! Run the host-side tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features board
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod drivers;
pub mod hw;
