// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer and `log` backend.
//!
//! `Usart` writes to an attached debug terminal. `UsartLogger` owns one and prints every `log`
//! record to it as `[LEVEL] message`.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::cell::RefCell;
use core::fmt::{self, Write};

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record};
use nb::block;
use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

/// `log` backend printing to a debug USART.
///
/// Declare as a `static` and call [`UsartLogger::init`] once the USART is configured. Records
/// emitted before that are dropped.
pub struct UsartLogger<U: Instance> {
    usart: Mutex<RefCell<Option<Usart<U>>>>,
}

impl<U: Instance> UsartLogger<U> {
    pub const fn new() -> Self {
        Self {
            usart: Mutex::new(RefCell::new(None)),
        }
    }
}

impl<U: Instance + Send> UsartLogger<U> {
    /// Hand the USART to the logger and register it as the global `log` backend.
    pub fn init(&'static self, usart: Usart<U>, level: LevelFilter) {
        interrupt::free(|cs| {
            self.usart.borrow(cs).replace(Some(usart));
        });
        if log::set_logger(self).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl<U: Instance + Send> Log for UsartLogger<U> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(usart, "[{}] {}\r\n", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                usart.flush();
            }
        });
    }
}
