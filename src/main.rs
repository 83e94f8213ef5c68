// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use log::{error, info, LevelFilter};
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
    spi::{Mode, Phase, Polarity, Spi},
};
use stm32f7xx_hal as hal;

use tmc5160_driver::drivers::tmc5160::{Current, CurrentControl, HoldDelay};
use tmc5160_driver::drivers::{Direction, MotorDriver, Tmc5160};
use tmc5160_driver::hw::{BoardPins, SpiBus, Usart, UsartLogger};

static LOGGER: UsartLogger<pac::USART1> = UsartLogger::new();

/// TMC5160 samples on the rising edge with SCK idle high (SPI mode 3).
const TMC_SPI_MODE: Mode = Mode {
    polarity: Polarity::IdleHigh,
    phase: Phase::CaptureOnSecondTransition,
};

const RUN_RPM: i16 = 60;

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb2 = rcc.apb2;

    // GPIO
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB);

    // USART1 (DBG)
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    LOGGER.init(Usart::new(serial), LevelFilter::Info);

    // SPI1
    let spi1 = Spi::new(dp.SPI1, (pins.spi1.sck, pins.spi1.miso, pins.spi1.mosi)).enable::<u8>(
        TMC_SPI_MODE,
        1.MHz(),
        &clocks,
        &mut apb2,
    );

    let current = CurrentControl::new(Current::ONE_32, Current::FULL, HoldDelay::TEN);
    let mut tmc = Tmc5160::new(SpiBus::new(spi1), pins.tmc.cs, pins.tmc.sd_mode, current);

    match nb::block!(tmc.initialize()) {
        Ok(()) => info!("TMC5160 initialized, IHOLD_IRUN = {:#010x}", current.to_bits()),
        Err(e) => error!("TMC5160 init failed: {}", e),
    }

    // Poll the velocity write alongside other work; retry from scratch on a bus error.
    let mut commanded = false;
    loop {
        if !commanded {
            match tmc.set_velocity(RUN_RPM, Direction::Clockwise) {
                Ok(()) => {
                    info!("TMC5160 running at {} rpm", RUN_RPM);
                    commanded = true;
                }
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(e)) => error!("TMC5160 set_velocity failed: {}", e),
            }
        }
        cortex_m::asm::nop();
    }
}
