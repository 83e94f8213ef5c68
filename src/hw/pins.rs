// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 TMC5160 controller board.

use stm32f7xx_hal::{
    gpio::{gpioa, Alternate, PinState},
    pac,
    prelude::*,
};

use super::{ChipSelect, OutputLine};

/// All board pins. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub spi1: Spi1Pins,
    pub tmc: TmcPins,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// SPI1 SCK/MISO/MOSI
pub struct Spi1Pins {
    pub sck: gpioa::PA5<Alternate<5>>,
    pub miso: gpioa::PA6<Alternate<5>>,
    pub mosi: gpioa::PA7<Alternate<5>>,
}

/// TMC5160 control lines
pub struct TmcPins {
    /// nCS, idles high.
    pub cs: ChipSelect<'A', 4>,
    /// SD_MODE, idles high (step/dir mode) until the driver selects SPI mode.
    pub sd_mode: OutputLine<'B', 0>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            spi1: Spi1Pins {
                sck: gpioa.pa5.into_alternate::<5>(),
                miso: gpioa.pa6.into_alternate::<5>(),
                mosi: gpioa.pa7.into_alternate::<5>(),
            },

            tmc: TmcPins {
                cs: ChipSelect::active_low(gpioa.pa4),
                sd_mode: OutputLine::new(gpiob.pb0, PinState::High),
            },
        }
    }
}
