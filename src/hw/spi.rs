// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial Peripheral Interface (SPI) abstraction layer.
//!
//! - `SpiBus` wraps a configured HAL SPI instance with 8-bit words and transmits frames without
//!   blocking.
//! - `ChipSelect` is an active-low GPIO output wrapper for manual CS control.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use stm32f7xx_hal::{
    gpio::{self, Output, PinState, PushPull},
    prelude::*,
    spi::{self, Enabled, Spi},
};

use super::bus::Transmit;

/// Position inside the frame currently being transmitted.
#[derive(Copy, Clone, Debug, Default)]
struct Progress {
    sent: usize,
    received: usize,
}

/// Wrapper around an enabled HAL SPI instance (8-bit words).
pub struct SpiBus<I, P> {
    spi: Spi<I, P, Enabled<u8>>,
    progress: Option<Progress>,
}

impl<I, P> SpiBus<I, P>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    pub fn new(spi: Spi<I, P, Enabled<u8>>) -> Self {
        Self {
            spi,
            progress: None,
        }
    }

    /// Whether a frame is partially clocked out.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.progress.is_some()
    }

    pub fn free(self) -> Spi<I, P, Enabled<u8>> {
        self.spi
    }

    /// Clock out as much of `frame` as the peripheral accepts right now.
    ///
    /// One byte is in flight at a time; its echo is drained before the next is sent so the RX FIFO
    /// never overruns.
    fn pump(&mut self, frame: &[u8], progress: &mut Progress) -> nb::Result<(), spi::Error> {
        while progress.received < frame.len() {
            if progress.sent == progress.received {
                self.spi.send(frame[progress.sent])?;
                progress.sent += 1;
            }
            let _ = self.spi.read()?;
            progress.received += 1;
        }
        Ok(())
    }
}

impl<I, P> Transmit for SpiBus<I, P>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    type Error = spi::Error;

    fn transmit(&mut self, frame: &[u8]) -> nb::Result<(), spi::Error> {
        let mut progress = self.progress.take().unwrap_or_default();
        match self.pump(frame, &mut progress) {
            Err(nb::Error::WouldBlock) => {
                self.progress = Some(progress);
                Err(nb::Error::WouldBlock)
            }
            // Done or failed: the next call starts a fresh frame.
            result => result,
        }
    }
}

/// Manual chip-select line, active-low, generic over any GPIO pin.
pub struct ChipSelect<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> ChipSelect<P, N> {
    /// Create an active-low chip select and set to the inactive state (i.e., high).
    pub fn active_low<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut pin = pin.into_push_pull_output();
        pin.set_state(PinState::High);
        Self { pin }
    }

    /// Assert the chip select.
    #[inline]
    pub fn select(&mut self) {
        self.pin.set_low();
    }

    /// Deassert the chip select.
    #[inline]
    pub fn deselect(&mut self) {
        self.pin.set_high();
    }

    pub fn free(self) -> gpio::Pin<P, N, Output<PushPull>> {
        self.pin
    }
}

impl<const P: char, const N: u8> ErrorType for ChipSelect<P, N> {
    type Error = Infallible;
}

/// Raw line levels: `set_low` selects the chip.
impl<const P: char, const N: u8> OutputPin for ChipSelect<P, N> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.select();
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.deselect();
        Ok(())
    }
}
