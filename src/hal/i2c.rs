//! I2C Bus Abstractions
//!
//! Async I2C for the OLED display, on the embassy-stm32 driver with DMA.

use embassy_stm32::i2c::{Error as I2cError, I2c};
use embassy_stm32::mode::Async;
use embedded_hal_async::i2c::I2c as AsyncI2c;

use crate::config::DISPLAY_I2C_ADDR;

/// I2C operation result
pub type I2cResult<T> = Result<T, I2cError>;

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// SSD1306 OLED display address
    pub const SSD1306: Self = Self(DISPLAY_I2C_ADDR);

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// I2C bus wrapper
pub struct I2cBus<'d> {
    i2c: I2c<'d, Async>,
}

impl<'d> I2cBus<'d> {
    /// Create a new I2C bus wrapper
    #[must_use]
    pub fn new(i2c: I2c<'d, Async>) -> Self {
        Self { i2c }
    }

    /// Write bytes to a device
    pub async fn write(&mut self, addr: I2cAddress, data: &[u8]) -> I2cResult<()> {
        AsyncI2c::write(&mut self.i2c, addr.addr(), data).await
    }

    /// Scan the bus for devices
    pub async fn scan(&mut self) -> heapless::Vec<I2cAddress, 16> {
        let mut devices = heapless::Vec::new();

        for addr in 0x08..0x78 {
            let mut buf = [0u8; 1];
            if AsyncI2c::read(&mut self.i2c, addr, &mut buf).await.is_ok() {
                let _ = devices.push(I2cAddress::new(addr));
            }
        }

        devices
    }
}
