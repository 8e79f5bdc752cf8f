//! Two-wire Bus Transport
//!
//! The Si4703 speaks a simplified I2C-like protocol with no register pointer:
//! reads always begin at STATUSRSSI and writes always begin at POWERCFG. The
//! register shadow therefore needs only the four primitive bus operations
//! defined by [`BusTransport`], which keeps it testable against a simulated chip.
//!
//! [`BitBangBus`] implements the transport over two `embedded-hal` pins.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{BUS_HALF_PERIOD_NS, SI4703_ADDR};

/// Acknowledge bit sent or received after each byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ack {
    /// Receiver pulled SDIO low
    Ack,
    /// Receiver left SDIO high
    Nack,
}

impl Ack {
    /// True if this is an acknowledge
    #[must_use]
    pub const fn is_ack(self) -> bool {
        matches!(self, Self::Ack)
    }
}

/// Bus-level failures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusError {
    /// A byte was not acknowledged (device absent or busy)
    NoAck,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoAck => f.write_str("no acknowledge"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BusError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::NoAck => defmt::write!(f, "NoAck"),
        }
    }
}

/// Bus operation result
pub type BusResult<T> = Result<T, BusError>;

/// 7-bit device address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    /// Si4703 FM tuner
    pub const SI4703: Self = Self(SI4703_ADDR);

    /// Create from a 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }

    /// Address byte for a write transaction
    #[must_use]
    pub const fn write_byte(self) -> u8 {
        self.0 << 1
    }

    /// Address byte for a read transaction
    #[must_use]
    pub const fn read_byte(self) -> u8 {
        (self.0 << 1) | 1
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DeviceAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// Primitive two-wire operations
pub trait BusTransport {
    /// Issue a start condition
    fn start(&mut self);

    /// Clock out one byte and sample the receiver's acknowledge
    fn write_byte(&mut self, byte: u8) -> Ack;

    /// Clock in one byte, then send `ack`
    fn read_byte(&mut self, ack: Ack) -> u8;

    /// Issue a stop condition
    fn stop(&mut self);

    /// Check whether a device acknowledges its address
    fn probe(&mut self, addr: DeviceAddress) -> bool {
        self.start();
        let ack = self.write_byte(addr.write_byte());
        self.stop();
        ack.is_ack()
    }

    /// Scan the bus for responding devices
    fn scan(&mut self) -> heapless::Vec<DeviceAddress, 16> {
        let mut devices = heapless::Vec::new();

        for addr in 0x08..0x78 {
            let addr = DeviceAddress::new(addr);
            if self.probe(addr) && devices.push(addr).is_err() {
                break;
            }
        }

        devices
    }
}

/// Bit-banged two-wire master
///
/// SDIO must be an open-drain line that can be read back while released
/// (embassy's `OutputOpenDrain` or an equivalent). Pin errors are folded into
/// the protocol: a failed write reads as NACK and a failed read as all ones,
/// which is what an idle pulled-up bus looks like.
pub struct BitBangBus<SCL, SDA, D> {
    scl: SCL,
    sda: SDA,
    delay: D,
    half_period_ns: u32,
}

impl<SCL, SDA, D> BitBangBus<SCL, SDA, D>
where
    SCL: OutputPin,
    SDA: InputPin + OutputPin,
    D: DelayNs,
{
    /// Create a bus with the default ~100 kHz clock
    pub fn new(scl: SCL, sda: SDA, delay: D) -> Self {
        Self::with_half_period(scl, sda, delay, BUS_HALF_PERIOD_NS)
    }

    /// Create a bus with a custom clock half-period in nanoseconds
    pub fn with_half_period(mut scl: SCL, mut sda: SDA, delay: D, half_period_ns: u32) -> Self {
        // Idle bus high (released)
        let _ = scl.set_high();
        let _ = sda.set_high();
        Self {
            scl,
            sda,
            delay,
            half_period_ns,
        }
    }

    /// Release the pins and delay provider
    pub fn release(self) -> (SCL, SDA, D) {
        (self.scl, self.sda, self.delay)
    }

    fn wait(&mut self) {
        self.delay.delay_ns(self.half_period_ns);
    }

    fn sda_level(&mut self) -> bool {
        self.sda.is_high().unwrap_or(true)
    }

    fn clock_bit_out(&mut self, high: bool) {
        let _ = if high { self.sda.set_high() } else { self.sda.set_low() };
        self.wait();
        let _ = self.scl.set_high();
        self.wait();
        let _ = self.scl.set_low();
    }

    fn clock_bit_in(&mut self) -> bool {
        let _ = self.sda.set_high();
        self.wait();
        let _ = self.scl.set_high();
        self.wait();
        let level = self.sda_level();
        let _ = self.scl.set_low();
        level
    }
}

impl<SCL, SDA, D> BusTransport for BitBangBus<SCL, SDA, D>
where
    SCL: OutputPin,
    SDA: InputPin + OutputPin,
    D: DelayNs,
{
    fn start(&mut self) {
        let _ = self.sda.set_high();
        let _ = self.scl.set_high();
        self.wait();
        let _ = self.sda.set_low();
        self.wait();
        let _ = self.scl.set_low();
        self.wait();
    }

    fn write_byte(&mut self, byte: u8) -> Ack {
        for bit in (0..8).rev() {
            self.clock_bit_out(byte & (1 << bit) != 0);
        }

        // ACK phase: sample SDIO while SCLK is high
        if self.clock_bit_in() {
            Ack::Nack
        } else {
            Ack::Ack
        }
    }

    fn read_byte(&mut self, ack: Ack) -> u8 {
        let mut data = 0u8;
        for _ in 0..8 {
            data = (data << 1) | u8::from(self.clock_bit_in());
        }

        self.clock_bit_out(!ack.is_ack());
        let _ = self.sda.set_high();
        data
    }

    fn stop(&mut self) {
        let _ = self.sda.set_low();
        self.wait();
        let _ = self.scl.set_high();
        self.wait();
        let _ = self.sda.set_high();
        self.wait();
    }
}
