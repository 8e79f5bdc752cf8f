//! Shared types used across the FM receiver firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

/// Frequency in kilohertz
///
/// Integer kHz is the single frequency representation used throughout
/// the crate. Values are limited to the widest band the chip supports.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u32);

impl Frequency {
    /// Lowest frequency any band can reach (64 MHz)
    pub const MIN_KHZ: u32 = 64_000;

    /// Highest frequency any band can reach (108 MHz)
    pub const MAX_KHZ: u32 = 108_000;

    /// Create a new Frequency from kHz, returns None if out of range
    #[must_use]
    pub const fn from_khz(khz: u32) -> Option<Self> {
        if khz >= Self::MIN_KHZ && khz <= Self::MAX_KHZ {
            Some(Self(khz))
        } else {
            None
        }
    }

    /// Create a frequency at compile time (panics if out of range)
    #[must_use]
    pub const fn from_khz_const(khz: u32) -> Self {
        match Self::from_khz(khz) {
            Some(f) => f,
            None => panic!("Frequency out of range"),
        }
    }

    /// Create a frequency from tens of kHz (the "10650 = 106.5 MHz" convention)
    #[must_use]
    pub const fn from_10khz(units: u32) -> Option<Self> {
        Self::from_khz(units * 10)
    }

    /// Get the frequency in kHz
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0
    }

    /// Whole megahertz part
    #[must_use]
    pub const fn mhz(self) -> u32 {
        self.0 / 1000
    }

    /// Fractional part in tens of kHz (two decimal digits of MHz)
    #[must_use]
    pub const fn centi_mhz(self) -> u32 {
        (self.0 % 1000) / 10
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({} kHz)", self.0)
    }
}

/// Formats as MHz with two decimals, e.g. `106.50`
impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.mhz(), self.centi_mhz())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} kHz", self.0);
    }
}

/// FM band selection (BAND field of SYSCONFIG2)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Band {
    /// 87.5 - 108 MHz (USA, Europe)
    #[default]
    UsaEurope,
    /// 76 - 108 MHz (Japan wide band)
    JapanWide,
    /// 76 - 90 MHz (Japan)
    Japan,
    /// 64 - 108 MHz (reserved setting, extended range)
    Extended,
}

impl Band {
    /// All bands in register order
    pub const ALL: [Self; 4] = [Self::UsaEurope, Self::JapanWide, Self::Japan, Self::Extended];

    /// Decode from the 2-bit register field
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Self::UsaEurope,
            1 => Self::JapanWide,
            2 => Self::Japan,
            _ => Self::Extended,
        }
    }

    /// Value of the 2-bit register field
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::UsaEurope => 0,
            Self::JapanWide => 1,
            Self::Japan => 2,
            Self::Extended => 3,
        }
    }

    /// Band start frequency in kHz
    #[must_use]
    pub const fn start_khz(self) -> u32 {
        match self {
            Self::UsaEurope => 87_500,
            Self::JapanWide | Self::Japan => 76_000,
            Self::Extended => 64_000,
        }
    }

    /// Band end frequency in kHz
    #[must_use]
    pub const fn end_khz(self) -> u32 {
        match self {
            Self::UsaEurope | Self::JapanWide | Self::Extended => 108_000,
            Self::Japan => 90_000,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Band {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::UsaEurope => defmt::write!(f, "87.5-108"),
            Self::JapanWide => defmt::write!(f, "76-108"),
            Self::Japan => defmt::write!(f, "76-90"),
            Self::Extended => defmt::write!(f, "64-108"),
        }
    }
}

/// Channel spacing (SPACE field of SYSCONFIG2)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Spacing {
    /// 200 kHz (USA, Australia)
    Khz200,
    /// 100 kHz (Europe, Japan)
    #[default]
    Khz100,
    /// 50 kHz
    Khz50,
    /// 10 kHz (reserved setting)
    Khz10,
}

impl Spacing {
    /// All spacings in register order
    pub const ALL: [Self; 4] = [Self::Khz200, Self::Khz100, Self::Khz50, Self::Khz10];

    /// Decode from the 2-bit register field
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Self::Khz200,
            1 => Self::Khz100,
            2 => Self::Khz50,
            _ => Self::Khz10,
        }
    }

    /// Value of the 2-bit register field
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Khz200 => 0,
            Self::Khz100 => 1,
            Self::Khz50 => 2,
            Self::Khz10 => 3,
        }
    }

    /// Step size in kHz
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        match self {
            Self::Khz200 => 200,
            Self::Khz100 => 100,
            Self::Khz50 => 50,
            Self::Khz10 => 10,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Spacing {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} kHz", self.as_khz());
    }
}

/// Audio volume (0 = minimum, 15 = maximum)
///
/// Construction clamps, so an out-of-range request saturates at 15.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Volume(u8);

impl Volume {
    /// Minimum volume
    pub const MIN: Self = Self(0);

    /// Maximum volume
    pub const MAX: Self = Self(15);

    /// Create a volume, clamping to 15
    #[must_use]
    pub const fn new(level: u8) -> Self {
        if level > 15 {
            Self::MAX
        } else {
            Self(level)
        }
    }

    /// Raw level 0-15
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// One step louder (saturating)
    #[must_use]
    pub const fn up(self) -> Self {
        Self::new(self.0 + 1)
    }

    /// One step quieter (saturating)
    #[must_use]
    pub const fn down(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Volume {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "vol {}", self.0);
    }
}

/// Seek direction (SEEKUP bit)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SeekDirection {
    /// Seek toward lower frequencies
    Down,
    /// Seek toward higher frequencies
    #[default]
    Up,
}

/// Behaviour at the band edge during seek (SKMODE bit)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SeekMode {
    /// Wrap around to the other band edge and continue
    #[default]
    Wrap,
    /// Stop at the band edge
    Stop,
}

/// Manual step direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDirection {
    /// One channel up
    Up,
    /// One channel down
    Down,
}

#[cfg(feature = "embedded")]
impl defmt::Format for StepDirection {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Up => defmt::write!(f, "Up"),
            Self::Down => defmt::write!(f, "Down"),
        }
    }
}

/// Reference oscillator fitted to the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OscillatorType {
    /// 32.768 kHz crystal driven by the internal oscillator (XOSCEN = 1)
    #[default]
    Crystal,
    /// External reference clock on RCLK (XOSCEN = 0)
    ReferenceClock,
}

/// FM de-emphasis time constant (DE bit)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeEmphasis {
    /// 75 µs (USA)
    Us75,
    /// 50 µs (Europe, Australia, Japan)
    #[default]
    Us50,
}

/// RDS reporting mode (RDSM bit)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RdsMode {
    /// Only error-free groups are reported
    #[default]
    Standard,
    /// Groups are reported with per-block error levels
    Verbose,
}
