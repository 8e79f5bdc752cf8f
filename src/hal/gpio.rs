//! GPIO Abstractions
//!
//! Status LED and front-panel buttons.

use embassy_stm32::gpio::{Input, Output};

use crate::input::{ButtonState, Debouncer};

/// Status LED state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LedState {
    /// LED is off
    #[default]
    Off,
    /// LED is on
    On,
}

impl defmt::Format for LedState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::On => defmt::write!(f, "ON"),
        }
    }
}

/// Status LED driver
pub struct StatusLed<'d> {
    pin: Output<'d>,
    state: LedState,
}

impl<'d> StatusLed<'d> {
    /// Create a new status LED (initially off)
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        Self {
            pin,
            state: LedState::Off,
        }
    }

    /// Turn LED on
    pub fn on(&mut self) {
        self.pin.set_high();
        self.state = LedState::On;
    }

    /// Turn LED off
    pub fn off(&mut self) {
        self.pin.set_low();
        self.state = LedState::Off;
    }

    /// Toggle LED state
    pub fn toggle(&mut self) {
        match self.state {
            LedState::Off => self.on(),
            LedState::On => self.off(),
        }
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> LedState {
        self.state
    }
}

/// Push button to ground with internal pull-up
pub struct Button<'d> {
    pin: Input<'d>,
    debouncer: Debouncer,
}

impl<'d> Button<'d> {
    /// Wrap an input pin (active low)
    #[must_use]
    pub fn new(pin: Input<'d>) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(),
        }
    }

    /// Sample the pin (call periodically)
    /// Returns true once per debounced press
    pub fn update(&mut self) -> bool {
        self.debouncer.update(self.pin.is_low())
    }

    /// Check if pressed
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.debouncer.state() == ButtonState::Pressed
    }
}
