//! STM32F401 Nucleo-64 board support.
//!
//! Everything that knows about the MCU's peripherals lives here. The
//! application only sees logical pin ids and a byte transmitter.
//!
//! Pin Map:
//!  Pin |   Function    |      Notes
//!  PA5 | LD2 user LED  | push-pull output, active high
//!  PA2 | USART2 TX     | AF7, routed to the ST-LINK virtual COM port
//!
//! The core runs from the 16 MHz HSI, which is what `config` assumes for
//! the SysTick reload.

use stm32f4xx_hal::gpio::{Output, PushPull, PA5};
use stm32f4xx_hal::pac::{self, USART2};
use stm32f4xx_hal::prelude::*;
use stm32f4xx_hal::serial::{config::Config, Tx};

use crate::config::{SYSTEM_CLOCK_HZ, UART_BAUD};
use crate::hal::{ByteTx, PinTable};

/// Logical GPIO ids. The discriminant is the index into [`Board::pins`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gpio {
    Led = 0,
}

impl From<Gpio> for usize {
    fn from(id: Gpio) -> usize {
        id as usize
    }
}

/// Number of entries in the logical pin table.
pub const GPIO_COUNT: usize = 1;

pub type LedPin = PA5<Output<PushPull>>;

pub type BoardPins = PinTable<Gpio, LedPin, GPIO_COUNT>;

/// USART2, transmit only, 8N1.
pub struct Usart2Tx {
    tx: Tx<USART2>,
}

impl ByteTx for Usart2Tx {
    fn send_byte(&mut self, byte: u8) {
        // Blocks until the data register is free; TX errors are not reported.
        nb::block!(embedded_hal_nb::serial::Write::write(&mut self.tx, byte)).ok();
    }
}

/// The board's peripherals, handed out once.
pub struct Board {
    pub pins: BoardPins,
    pub uart: Usart2Tx,
}

impl Board {
    /// Claim and configure the board.
    ///
    /// Returns `None` on every call after the first, or if USART2 cannot
    /// reach `UART_BAUD` from the core clock.
    pub fn take() -> Option<Self> {
        let dp = pac::Peripherals::take()?;

        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(SYSTEM_CLOCK_HZ.Hz()).freeze();

        let gpioa = dp.GPIOA.split();
        let led = gpioa.pa5.into_push_pull_output();

        let tx = dp
            .USART2
            .tx(gpioa.pa2, Config::default().baudrate(UART_BAUD.bps()), &clocks)
            .ok()?;

        Some(Self {
            pins: PinTable::new([led]),
            uart: Usart2Tx { tx },
        })
    }
}
