//! Receiver State
//!
//! Cached view of what the chip has been told to do.
//! Implements immutable state transitions for predictable behavior.

use super::frequency::FrequencyMapper;
use crate::config::RadioConfig;
use crate::types::{Band, Frequency, Spacing, Volume};

/// Cached receiver state (immutable)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceState {
    /// Tuned frequency, always on the band grid
    frequency: Frequency,
    /// Band plan and spacing
    mapper: FrequencyMapper,
    /// Audio volume
    volume: Volume,
    /// Audio muted
    mute: bool,
    /// Forced mono
    mono: bool,
    /// RDS decoder enabled
    rds_enabled: bool,
}

impl DeviceState {
    /// State matching a freshly powered-up chip
    #[must_use]
    pub fn new(config: &RadioConfig) -> Self {
        let mapper = FrequencyMapper::new(config.band, config.spacing);
        Self {
            frequency: mapper.to_frequency(mapper.snap(config.initial_frequency)),
            mapper,
            volume: config.volume,
            mute: false,
            mono: false,
            rds_enabled: config.rds,
        }
    }

    /// Get tuned frequency
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Get band plan
    #[must_use]
    pub const fn mapper(&self) -> &FrequencyMapper {
        &self.mapper
    }

    /// Get band
    #[must_use]
    pub const fn band(&self) -> Band {
        self.mapper.band()
    }

    /// Get spacing
    #[must_use]
    pub const fn spacing(&self) -> Spacing {
        self.mapper.spacing()
    }

    /// Get volume
    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.volume
    }

    /// Check if muted
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.mute
    }

    /// Check if mono is forced
    #[must_use]
    pub const fn is_mono(&self) -> bool {
        self.mono
    }

    /// Check if RDS is enabled
    #[must_use]
    pub const fn rds_enabled(&self) -> bool {
        self.rds_enabled
    }

    /// Set frequency, snapped onto the grid (returns new state)
    #[must_use]
    pub fn with_frequency(self, frequency: Frequency) -> Self {
        Self {
            frequency: self.mapper.to_frequency(self.mapper.snap(frequency)),
            ..self
        }
    }

    /// Set frequency from a channel number (returns new state)
    #[must_use]
    pub fn with_channel(self, channel: u16) -> Self {
        Self {
            frequency: self.mapper.to_frequency(channel),
            ..self
        }
    }

    /// Set band; the frequency is re-snapped into it (returns new state)
    #[must_use]
    pub fn with_band(self, band: Band) -> Self {
        Self {
            mapper: self.mapper.with_band(band),
            ..self
        }
        .with_frequency(self.frequency)
    }

    /// Set spacing; the frequency is re-snapped onto it (returns new state)
    #[must_use]
    pub fn with_spacing(self, spacing: Spacing) -> Self {
        Self {
            mapper: self.mapper.with_spacing(spacing),
            ..self
        }
        .with_frequency(self.frequency)
    }

    /// Set volume (returns new state)
    #[must_use]
    pub const fn with_volume(self, volume: Volume) -> Self {
        Self { volume, ..self }
    }

    /// Set mute (returns new state)
    #[must_use]
    pub const fn with_mute(self, mute: bool) -> Self {
        Self { mute, ..self }
    }

    /// Set mono (returns new state)
    #[must_use]
    pub const fn with_mono(self, mono: bool) -> Self {
        Self { mono, ..self }
    }

    /// Enable or disable RDS (returns new state)
    #[must_use]
    pub const fn with_rds(self, rds_enabled: bool) -> Self {
        Self { rds_enabled, ..self }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new(&RadioConfig::new())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DeviceState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "DeviceState {{ {}, band {}, {}, {}, mute: {}, mono: {} }}",
            self.frequency,
            self.band(),
            self.spacing(),
            self.volume,
            self.mute,
            self.mono
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_change_resnaps_frequency() {
        let state = DeviceState::default().with_frequency(Frequency::from_khz(106_500).unwrap());
        let japan = state.with_band(Band::Japan);
        assert_eq!(japan.frequency().as_khz(), 90_000);
        assert!(japan.mapper().is_on_grid(japan.frequency()));
    }

    #[test]
    fn off_grid_frequency_snapped() {
        let state = DeviceState::default()
            .with_spacing(Spacing::Khz200)
            .with_frequency(Frequency::from_khz(100_050).unwrap());
        assert_eq!(state.frequency().as_khz(), 100_100);
    }
}
