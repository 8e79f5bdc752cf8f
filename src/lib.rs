//! Si4703 FM Receiver Firmware Library
//!
//! This library drives an Si4703 FM tuner over its two-wire bus: power
//! sequencing, direct tuning and seeking, and decoding of the RDS sideband
//! (station name, radio text and clock time). The board firmware runs on an
//! STM32G474 with a rotary encoder for preset selection and an SSD1306 OLED.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │   Polling loop (app)  │  Screen model (ui)  │  Input         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      DEVICE LAYER                            │
//! │  Si4703 facade  │  Tune controller  │  RDS decoder           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   REGISTER / BUS LAYER                       │
//! │  Register map  │  Register shadow  │  Power sequencer        │
//! │  BusTransport (bit-banged two-wire over embedded-hal pins)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 HAL / DRIVERS (embedded only)                │
//! │        OLED display  │  Encoder  │  Buttons  │  I2C          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Single owner**: shadow registers and decode buffers live inside one
//!   [`device::Si4703`] value, no global mutable state
//! - **Explicit bitfields**: every register field is a mask/shift accessor
//! - **Best effort on the bus**: an absent or silent chip leaves the shadow
//!   untouched instead of failing the caller
//! - **Bounded waits**: tune/seek polling always terminates
//! - **Functional core, imperative shell**: decoding and frequency math are
//!   pure and host-testable

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Async I2C wrapper and GPIO helpers for the STM32G474.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral Drivers
///
/// OLED display and rotary encoder wiring.
#[cfg(feature = "embedded")]
pub mod drivers;

/// Two-wire bus transport
///
/// Primitive start/write/read/stop operations and a bit-banged master.
pub mod bus;

/// Si4703 register map and bitfield accessors
pub mod registers;

/// Register shadow
///
/// In-memory mirror of the 16 device registers kept in sync over the bus.
pub mod shadow;

/// Power Sequencing
///
/// Reset into two-wire mode, power-up and power-down.
pub mod power;

/// Radio Control Logic
///
/// Band plan arithmetic, cached device state and the tune/seek state machine.
pub mod radio;

/// RDS Sideband Decoding
///
/// Group parsing, text reassembly and clock-time decoding.
pub mod rds;

/// Si4703 device facade
pub mod device;

/// User input
///
/// Preset table handoff between interrupt context and the polling loop.
pub mod input;

/// User Interface
///
/// Scrolling screen model fed by the polling loop.
pub mod ui;

/// Application polling loop
pub mod app;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Error types
pub mod error;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::{InputPin, OutputPin};
    pub use embedded_hal_async::i2c::I2c;

    // Embassy
    pub use embassy_time::{Duration, Instant, Ticker, Timer};

    // Error handling
    pub use crate::error::{Error, Result};

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
