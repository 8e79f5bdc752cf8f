//! Register shadow
//!
//! The Si4703 has no register pointer. A read transaction always starts at
//! STATUSRSSI (0x0A) and wraps through 0x0F back to 0x00; a write always
//! starts at POWERCFG (0x02). [`RegisterShadow`] keeps an address-indexed copy
//! of all sixteen registers and hides that ordering from the rest of the crate.
//!
//! A failed transaction leaves the shadow exactly as it was.

use crate::bus::{Ack, BusError, BusResult, BusTransport, DeviceAddress};
use crate::registers::{Register, RegisterFile};

/// Highest register written by default (TEST1)
pub const DEFAULT_WRITE_LIMIT: Register = Register::Test1;

/// In-memory mirror of the device registers
pub struct RegisterShadow<B> {
    bus: B,
    addr: DeviceAddress,
    regs: RegisterFile,
}

impl<B: BusTransport> RegisterShadow<B> {
    /// Create a shadow for the Si4703 at its fixed address
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, DeviceAddress::SI4703)
    }

    /// Create a shadow for a device at another address
    pub fn with_address(bus: B, addr: DeviceAddress) -> Self {
        Self {
            bus,
            addr,
            regs: RegisterFile::new(),
        }
    }

    /// Current register values
    #[must_use]
    pub const fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// Mutable register values (staged until the next [`write_all`](Self::write_all))
    pub fn regs_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    /// Underlying bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Release the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Read all sixteen registers
    ///
    /// # Errors
    ///
    /// `BusError::NoAck` if the device does not acknowledge its address.
    pub fn read_all(&mut self) -> BusResult<()> {
        self.read_from_status(Register::COUNT)
    }

    /// Read only STATUSRSSI
    ///
    /// # Errors
    ///
    /// `BusError::NoAck` if the device does not acknowledge its address.
    pub fn read_status(&mut self) -> BusResult<()> {
        self.read_from_status(1)
    }

    /// Read STATUSRSSI and READCHAN
    ///
    /// # Errors
    ///
    /// `BusError::NoAck` if the device does not acknowledge its address.
    pub fn read_status_and_channel(&mut self) -> BusResult<()> {
        self.read_from_status(2)
    }

    /// Read STATUSRSSI through RDSD (the RDS blocks and their error levels)
    ///
    /// # Errors
    ///
    /// `BusError::NoAck` if the device does not acknowledge its address.
    pub fn read_sideband(&mut self) -> BusResult<()> {
        self.read_from_status(6)
    }

    /// Write POWERCFG through `upper` in ascending order
    ///
    /// `upper` below POWERCFG writes nothing.
    ///
    /// # Errors
    ///
    /// `BusError::NoAck` if the address or any data byte is not acknowledged.
    pub fn write_all(&mut self, upper: Register) -> BusResult<()> {
        if upper < Register::FIRST_WRITABLE {
            return Ok(());
        }

        self.bus.start();
        let result = self.write_range(upper);
        self.bus.stop();

        if result.is_err() {
            trace!("si4703 write to 0x{:02X} not acknowledged", upper.addr());
        }

        result
    }

    fn write_range(&mut self, upper: Register) -> BusResult<()> {
        if !self.bus.write_byte(self.addr.write_byte()).is_ack() {
            return Err(BusError::NoAck);
        }

        for addr in Register::FIRST_WRITABLE.addr()..=upper.addr() {
            let value = self.regs.raw()[addr as usize];
            let [high, low] = value.to_be_bytes();
            if !self.bus.write_byte(high).is_ack() || !self.bus.write_byte(low).is_ack() {
                return Err(BusError::NoAck);
            }
        }

        Ok(())
    }

    /// Read `count` registers starting at STATUSRSSI, wrapping past 0x0F
    fn read_from_status(&mut self, count: usize) -> BusResult<()> {
        let mut values = [0u16; Register::COUNT];

        self.bus.start();
        if !self.bus.write_byte(self.addr.read_byte()).is_ack() {
            self.bus.stop();
            return Err(BusError::NoAck);
        }

        for (i, value) in values.iter_mut().take(count).enumerate() {
            let high = self.bus.read_byte(Ack::Ack);
            let last = i + 1 == count;
            let low = self.bus.read_byte(if last { Ack::Nack } else { Ack::Ack });
            *value = u16::from_be_bytes([high, low]);
        }
        self.bus.stop();

        let first = Register::FIRST_READ.index();
        for (i, &value) in values.iter().take(count).enumerate() {
            let index = (first + i) % Register::COUNT;
            self.regs.store(Register::ALL[index], value);
        }

        Ok(())
    }
}
