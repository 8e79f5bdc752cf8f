//! User input
//!
//! The rotary encoder runs in interrupt context (an EXTI task on target) and
//! owns all edge-tracking state in an [`EncoderTracker`]. The only thing it
//! shares with the polling loop is the selected preset index, published
//! through a single atomic [`SelectedIndex`]. Buttons are debounced by the
//! polling side and turned into [`InputEvent`]s.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::config::{ENCODER_EDGES_PER_STEP, PRESETS};
use crate::types::{Frequency, StepDirection};

/// Events consumed by the polling loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Tune preset by index
    Preset(usize),
    /// Step one channel
    Step(StepDirection),
    /// Volume one step up
    VolumeUp,
    /// Volume one step down
    VolumeDown,
    /// Seek to the next station up
    SeekUp,
    /// Seek to the next station down
    SeekDown,
}

#[cfg(feature = "embedded")]
impl defmt::Format for InputEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Preset(i) => defmt::write!(f, "Preset({})", i),
            Self::Step(StepDirection::Up) => defmt::write!(f, "Step(Up)"),
            Self::Step(StepDirection::Down) => defmt::write!(f, "Step(Down)"),
            Self::VolumeUp => defmt::write!(f, "VolumeUp"),
            Self::VolumeDown => defmt::write!(f, "VolumeDown"),
            Self::SeekUp => defmt::write!(f, "SeekUp"),
            Self::SeekDown => defmt::write!(f, "SeekDown"),
        }
    }
}

/// Preset index shared between interrupt context and the polling loop
///
/// Single writer (the encoder), single reader (the loop). The reader does one
/// atomic load per pass.
#[derive(Debug)]
pub struct SelectedIndex {
    index: AtomicUsize,
    len: usize,
}

impl SelectedIndex {
    /// Index into a table of `len` entries, starting at `initial`
    #[must_use]
    pub const fn new(initial: usize, len: usize) -> Self {
        let len = if len == 0 { 1 } else { len };
        let initial = if initial < len { initial } else { 0 };
        Self {
            index: AtomicUsize::new(initial),
            len,
        }
    }

    /// Number of entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false; a table has at least one entry
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Current index
    #[must_use]
    pub fn load(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    /// Move one entry, wrapping at both ends (writer side only)
    pub fn step(&self, direction: StepDirection) -> usize {
        let current = self.index.load(Ordering::Relaxed);
        let next = match direction {
            StepDirection::Up => (current + 1) % self.len,
            StepDirection::Down => current.checked_sub(1).unwrap_or(self.len - 1),
        };
        self.index.store(next, Ordering::Release);
        next
    }
}

/// Edge tracker for a two-phase rotary encoder
///
/// Counts rising edges on phase A; every `edges_per_step` of them moves the
/// selection one entry. Phase B low at the edge means clockwise (up).
#[derive(Clone, Copy, Debug)]
pub struct EncoderTracker {
    last_a: bool,
    edges: u8,
    edges_per_step: u8,
}

impl EncoderTracker {
    /// Tracker with the board's detent ratio
    #[must_use]
    pub const fn new(initial_a: bool) -> Self {
        Self::with_edges_per_step(initial_a, ENCODER_EDGES_PER_STEP)
    }

    /// Tracker with a custom number of edges per step
    #[must_use]
    pub const fn with_edges_per_step(initial_a: bool, edges_per_step: u8) -> Self {
        Self {
            last_a: initial_a,
            edges: 0,
            edges_per_step: if edges_per_step == 0 { 1 } else { edges_per_step },
        }
    }

    /// Handle a pin change; publishes to `selected` when a step completes
    pub fn on_pin_change(&mut self, a: bool, b: bool, selected: &SelectedIndex) -> Option<StepDirection> {
        let rising = a && !self.last_a;
        self.last_a = a;
        if !rising {
            return None;
        }

        self.edges += 1;
        if self.edges < self.edges_per_step {
            return None;
        }
        self.edges = 0;

        let direction = if b { StepDirection::Down } else { StepDirection::Up };
        selected.step(direction);
        Some(direction)
    }
}

/// Button state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    /// Button is released
    Released,
    /// Button is pressed
    Pressed,
}

#[cfg(feature = "embedded")]
impl defmt::Format for ButtonState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Released => defmt::write!(f, "Released"),
            Self::Pressed => defmt::write!(f, "Pressed"),
        }
    }
}

/// Counter-based debouncer fed with raw "pressed" samples
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    state: ButtonState,
    last_raw: bool,
    count: u8,
}

impl Debouncer {
    /// Required consecutive equal samples
    pub const THRESHOLD: u8 = 3;

    /// Debouncer starting released
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ButtonState::Released,
            last_raw: false,
            count: 0,
        }
    }

    /// Feed one sample; returns true on a debounced press
    pub fn update(&mut self, pressed: bool) -> bool {
        if pressed == self.last_raw {
            if self.count < Self::THRESHOLD {
                self.count += 1;
            }
        } else {
            self.count = 0;
            self.last_raw = pressed;
        }

        if self.count >= Self::THRESHOLD {
            let new_state = if pressed {
                ButtonState::Pressed
            } else {
                ButtonState::Released
            };
            if new_state != self.state {
                self.state = new_state;
                return new_state == ButtonState::Pressed;
            }
        }

        false
    }

    /// Current debounced state
    #[must_use]
    pub const fn state(&self) -> ButtonState {
        self.state
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// Preset frequency by index
#[must_use]
pub fn preset(index: usize) -> Option<Frequency> {
    PRESETS.get(index).and_then(|&khz| Frequency::from_khz(khz))
}

/// Index of the preset closest to `frequency`
#[must_use]
pub fn nearest_preset(frequency: Frequency) -> usize {
    PRESETS
        .iter()
        .enumerate()
        .min_by_key(|(_, khz)| khz.abs_diff(frequency.as_khz()))
        .map_or(0, |(i, _)| i)
}
