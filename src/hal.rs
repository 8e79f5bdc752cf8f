//! Hardware Abstraction Layer
//!
//! Thin wrappers over the STM32G474 peripherals the receiver board uses.
//! The Si4703 itself sits on a bit-banged bus (see [`crate::bus`]); only the
//! OLED uses the hardware I2C peripheral.

pub mod gpio;
pub mod i2c;
