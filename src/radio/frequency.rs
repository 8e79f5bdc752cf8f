//! Band plan arithmetic
//!
//! Converts between frequencies and the chip's channel numbers for the active
//! band and spacing. A channel is `(f - band_start) / spacing`.

use crate::registers::CHAN;
use crate::types::{Band, Frequency, Spacing};

/// Highest value the 10-bit CHAN field can hold
pub const MAX_CHANNEL: u16 = CHAN.max();

/// Channel/frequency conversion for one band and spacing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrequencyMapper {
    band: Band,
    spacing: Spacing,
}

impl FrequencyMapper {
    /// Create a mapper
    #[must_use]
    pub const fn new(band: Band, spacing: Spacing) -> Self {
        Self { band, spacing }
    }

    /// Active band
    #[must_use]
    pub const fn band(&self) -> Band {
        self.band
    }

    /// Active spacing
    #[must_use]
    pub const fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// Same spacing, different band
    #[must_use]
    pub const fn with_band(self, band: Band) -> Self {
        Self { band, ..self }
    }

    /// Same band, different spacing
    #[must_use]
    pub const fn with_spacing(self, spacing: Spacing) -> Self {
        Self { spacing, ..self }
    }

    /// Channel number for a frequency
    ///
    /// Frequencies below the band start map to channel 0. No grid or
    /// field-width clamping is applied; see [`snap`](Self::snap).
    #[must_use]
    pub fn to_channel(&self, frequency: Frequency) -> u16 {
        let offset = frequency.as_khz().saturating_sub(self.band.start_khz());
        u16::try_from(offset / self.spacing.as_khz()).unwrap_or(u16::MAX)
    }

    /// Frequency in kHz for a channel number (unclamped)
    #[must_use]
    pub fn to_khz(&self, channel: u16) -> u32 {
        u32::from(channel) * self.spacing.as_khz() + self.band.start_khz()
    }

    /// Frequency for a channel number, clamped to the top grid channel
    #[must_use]
    pub fn to_frequency(&self, channel: u16) -> Frequency {
        let khz = self.to_khz(channel.min(self.top_channel()));
        Frequency::from_khz(khz).unwrap_or(Frequency::from_khz_const(Frequency::MAX_KHZ))
    }

    /// Highest channel that lies in the band and fits the CHAN field
    #[must_use]
    pub fn top_channel(&self) -> u16 {
        let span = self.band.end_khz() - self.band.start_khz();
        let channels = span / self.spacing.as_khz();
        u16::try_from(channels).map_or(MAX_CHANNEL, |c| c.min(MAX_CHANNEL))
    }

    /// Highest frequency reachable on the grid
    #[must_use]
    pub fn top_frequency(&self) -> Frequency {
        self.to_frequency(self.top_channel())
    }

    /// Lowest frequency of the band
    #[must_use]
    pub fn bottom_frequency(&self) -> Frequency {
        self.to_frequency(0)
    }

    /// True if `frequency` is inside the band and on the spacing grid
    #[must_use]
    pub fn is_on_grid(&self, frequency: Frequency) -> bool {
        let khz = frequency.as_khz();
        khz >= self.band.start_khz()
            && khz <= self.band.end_khz()
            && (khz - self.band.start_khz()) % self.spacing.as_khz() == 0
    }

    /// Nearest valid channel for an arbitrary frequency
    ///
    /// Clamps into the band, rounds to the nearest grid point and limits the
    /// result to what the CHAN field can hold.
    #[must_use]
    pub fn snap(&self, frequency: Frequency) -> u16 {
        let start = self.band.start_khz();
        let step = self.spacing.as_khz();
        let khz = frequency.as_khz().clamp(start, self.band.end_khz());
        let nearest = (khz - start + step / 2) / step;
        u16::try_from(nearest).map_or(MAX_CHANNEL, |c| c.min(self.top_channel()))
    }

    /// Next grid frequency up, wrapping to the band start
    #[must_use]
    pub fn step_up(&self, current: Frequency) -> Frequency {
        let next = current.as_khz() + self.spacing.as_khz();
        if next > self.top_frequency().as_khz() {
            self.bottom_frequency()
        } else {
            self.to_frequency(self.snap(Frequency::from_khz(next).unwrap_or(current)))
        }
    }

    /// Next grid frequency down, wrapping to the highest grid point
    #[must_use]
    pub fn step_down(&self, current: Frequency) -> Frequency {
        let start = self.band.start_khz();
        if current.as_khz() < start + self.spacing.as_khz() {
            self.top_frequency()
        } else {
            let prev = current.as_khz() - self.spacing.as_khz();
            self.to_frequency(self.snap(Frequency::from_khz(prev).unwrap_or(current)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn khz(v: u32) -> Frequency {
        Frequency::from_khz(v).unwrap()
    }

    #[test]
    fn europe_100k_channels() {
        let m = FrequencyMapper::new(Band::UsaEurope, Spacing::Khz100);
        assert_eq!(m.to_channel(khz(106_500)), 190);
        assert_eq!(m.to_frequency(190), khz(106_500));
        assert_eq!(m.top_channel(), 205);
    }

    #[test]
    fn snap_rounds_and_clamps() {
        let m = FrequencyMapper::new(Band::UsaEurope, Spacing::Khz200);
        assert_eq!(m.snap(khz(87_590)), 0);
        assert_eq!(m.snap(khz(87_600)), 1);
        assert_eq!(m.snap(khz(64_000)), 0);
        assert_eq!(m.snap(khz(108_000)), m.top_channel());
    }

    #[test]
    fn narrow_spacing_limited_by_field_width() {
        let m = FrequencyMapper::new(Band::Extended, Spacing::Khz10);
        assert_eq!(m.top_channel(), MAX_CHANNEL);
        assert_eq!(m.top_frequency(), khz(64_000 + 1023 * 10));
    }

    #[test]
    fn channel_past_band_end_stays_on_grid() {
        let m = FrequencyMapper::new(Band::UsaEurope, Spacing::Khz200);
        assert_eq!(m.to_frequency(103), khz(107_900));
        assert!(m.is_on_grid(m.to_frequency(MAX_CHANNEL)));
    }

    #[test]
    fn stepping_wraps() {
        let m = FrequencyMapper::new(Band::UsaEurope, Spacing::Khz200);
        assert_eq!(m.step_up(khz(107_900)), khz(87_500));
        assert_eq!(m.step_down(khz(87_500)), khz(107_900));
        assert_eq!(m.step_up(khz(87_500)), khz(87_700));
    }
}
