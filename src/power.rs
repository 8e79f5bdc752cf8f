//! Power Sequencing
//!
//! Reset into two-wire mode, oscillator start-up, and power-down.
//!
//! The Si4703 samples SDIO on the rising edge of RST: holding SDIO low selects
//! the two-wire bus. After reset the chip is unpowered until the crystal
//! oscillator has been enabled, allowed to stabilise, and ENABLE written.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::bus::{BusResult, BusTransport};
use crate::config::{
    RadioConfig, POWERDOWN_SETTLE_MS, POWERUP_SETTLE_MS, RESET_HOLD_MS, RESET_RELEASE_MS,
};
use crate::error::{Error, Result};
use crate::registers::{self as reg, RegisterFile};
use crate::shadow::{RegisterShadow, DEFAULT_WRITE_LIMIT};
use crate::types::{DeEmphasis, OscillatorType, RdsMode};

/// Chip power state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PowerState {
    /// Nothing has been done yet
    #[default]
    Unpowered,
    /// Reset pulse issued, waiting for power-up
    Resetting,
    /// Oscillator enabled, waiting for it to stabilise
    OscillatorWarmup,
    /// Chip enabled and configured
    PoweredUp,
    /// Chip disabled, audio outputs high impedance
    PoweredDown,
}

impl PowerState {
    /// True if the chip accepts tune and seek requests
    #[must_use]
    pub const fn is_powered(self) -> bool {
        matches!(self, Self::PoweredUp)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PowerState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Unpowered => defmt::write!(f, "Unpowered"),
            Self::Resetting => defmt::write!(f, "Resetting"),
            Self::OscillatorWarmup => defmt::write!(f, "OscillatorWarmup"),
            Self::PoweredUp => defmt::write!(f, "PoweredUp"),
            Self::PoweredDown => defmt::write!(f, "PoweredDown"),
        }
    }
}

/// Reset and power-up/power-down sequencing
#[derive(Clone, Copy, Debug)]
pub struct PowerSequencer {
    state: PowerState,
    config: RadioConfig,
}

impl PowerSequencer {
    /// Create a sequencer that powers up with `config`
    #[must_use]
    pub const fn new(config: RadioConfig) -> Self {
        Self {
            state: PowerState::Unpowered,
            config,
        }
    }

    /// Current power state
    #[must_use]
    pub const fn state(&self) -> PowerState {
        self.state
    }

    /// Settings applied at power-up
    #[must_use]
    pub const fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// Pulse reset with SDIO held low to select two-wire mode
    ///
    /// Must run before the bus takes ownership of SDIO. SDIO is released
    /// (driven high on an open-drain line) when this returns.
    ///
    /// # Errors
    ///
    /// `Error::Pin` if either GPIO cannot be driven.
    pub fn reset<RST, SDIO, D>(&mut self, rst: &mut RST, sdio: &mut SDIO, delay: &mut D) -> Result<()>
    where
        RST: OutputPin,
        SDIO: OutputPin,
        D: DelayNs,
    {
        self.state = PowerState::Resetting;

        sdio.set_low().map_err(|_| Error::Pin)?;
        rst.set_low().map_err(|_| Error::Pin)?;
        delay.delay_ms(RESET_HOLD_MS);

        rst.set_high().map_err(|_| Error::Pin)?;
        delay.delay_ms(RESET_RELEASE_MS);

        sdio.set_high().map_err(|_| Error::Pin)?;
        debug!("si4703 reset into two-wire mode");
        Ok(())
    }

    /// Enable the oscillator, then power up with the configured defaults
    ///
    /// Every step runs even if the bus is silent; the first bus error is
    /// returned after the sequence completes.
    ///
    /// # Errors
    ///
    /// `BusError::NoAck` if any transaction went unacknowledged.
    pub fn power_up<B, D>(&mut self, shadow: &mut RegisterShadow<B>, delay: &mut D) -> BusResult<()>
    where
        B: BusTransport,
        D: DelayNs,
    {
        let mut result = shadow.read_all();

        let regs = shadow.regs_mut();
        regs.set_flag(reg::XOSCEN, self.config.oscillator == OscillatorType::Crystal);
        regs.set_flag(reg::AHIZEN, false);
        result = result.and(shadow.write_all(DEFAULT_WRITE_LIMIT));

        self.state = PowerState::OscillatorWarmup;
        delay.delay_ms(self.config.warmup_ms);

        result = result.and(shadow.read_all());
        self.apply_defaults(shadow.regs_mut());
        result = result.and(shadow.write_all(DEFAULT_WRITE_LIMIT));
        delay.delay_ms(POWERUP_SETTLE_MS);
        result = result.and(shadow.read_all());

        self.state = PowerState::PoweredUp;
        info!(
            "si4703 powered up (device 0x{:04X}, chip 0x{:04X})",
            shadow.regs().get(reg::Register::DeviceId),
            shadow.regs().get(reg::Register::ChipId)
        );
        result
    }

    /// Disable the chip and put the audio outputs in high impedance
    ///
    /// # Errors
    ///
    /// `BusError::NoAck` if any transaction went unacknowledged.
    pub fn power_down<B, D>(&mut self, shadow: &mut RegisterShadow<B>, delay: &mut D) -> BusResult<()>
    where
        B: BusTransport,
        D: DelayNs,
    {
        let mut result = shadow.read_all();

        let regs = shadow.regs_mut();
        regs.set_flag(reg::AHIZEN, true);
        regs.set_field(reg::GPIO1, 0);
        regs.set_field(reg::GPIO2, 0);
        regs.set_field(reg::GPIO3, 0);
        regs.set_flag(reg::ENABLE, false);
        regs.set_flag(reg::DISABLE, true);
        result = result.and(shadow.write_all(DEFAULT_WRITE_LIMIT));
        delay.delay_ms(POWERDOWN_SETTLE_MS);

        self.state = PowerState::PoweredDown;
        info!("si4703 powered down");
        result
    }

    /// Power-up register defaults
    fn apply_defaults(&self, regs: &mut RegisterFile) {
        let config = &self.config;

        // POWERCFG: audio on, stereo, softmute off, seek wraps
        regs.set_flag(reg::DSMUTE, true);
        regs.set_flag(reg::DMUTE, true);
        regs.set_flag(reg::MONO, false);
        regs.set_flag(reg::RDSM, config.rds_mode == RdsMode::Verbose);
        regs.set_flag(reg::SKMODE, false);
        regs.set_flag(reg::SEEKUP, false);
        regs.set_flag(reg::SEEK, false);
        regs.set_flag(reg::DISABLE, false);
        regs.set_flag(reg::ENABLE, true);

        // SYSCONFIG1: no interrupts, GPIOs high impedance
        regs.set_flag(reg::RDSIEN, false);
        regs.set_flag(reg::STCIEN, false);
        regs.set_flag(reg::RDS, config.rds);
        regs.set_flag(reg::DE, config.de_emphasis == DeEmphasis::Us50);
        regs.set_flag(reg::AGCD, false);
        regs.set_field(reg::BLNDADJ, 1);
        regs.set_field(reg::GPIO1, 0);
        regs.set_field(reg::GPIO2, 0);
        regs.set_field(reg::GPIO3, 0);

        // SYSCONFIG2
        regs.set_field(reg::SEEKTH, u16::from(config.seek_threshold));
        regs.set_field(reg::BAND, u16::from(config.band.index()));
        regs.set_field(reg::SPACE, u16::from(config.spacing.index()));
        regs.set_field(reg::VOLUME, u16::from(config.volume.level()));

        // SYSCONFIG3
        regs.set_field(reg::SMUTER, 0);
        regs.set_field(reg::SMUTEA, 0);
        regs.set_flag(reg::VOLEXT, false);
        regs.set_field(reg::SKSNR, u16::from(config.seek_snr));
        regs.set_field(reg::SKCNT, u16::from(config.seek_impulse));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Band, Spacing, Volume};

    #[test]
    fn defaults_follow_config() {
        let config = RadioConfig::new()
            .with_band(Band::Japan)
            .with_spacing(Spacing::Khz50)
            .with_volume(Volume::new(9))
            .with_de_emphasis(DeEmphasis::Us75)
            .with_rds(true, RdsMode::Verbose);
        let seq = PowerSequencer::new(config);
        let mut regs = RegisterFile::new();
        seq.apply_defaults(&mut regs);

        assert!(regs.flag(reg::ENABLE));
        assert!(regs.flag(reg::DMUTE));
        assert!(!regs.flag(reg::MONO));
        assert!(!regs.flag(reg::SKMODE));
        assert!(regs.flag(reg::RDSM));
        assert!(regs.flag(reg::RDS));
        assert!(!regs.flag(reg::DE));
        assert_eq!(regs.field(reg::BAND), 2);
        assert_eq!(regs.field(reg::SPACE), 2);
        assert_eq!(regs.field(reg::VOLUME), 9);
    }

    #[test]
    fn only_powered_up_is_powered() {
        assert!(PowerState::PoweredUp.is_powered());
        assert!(!PowerState::PoweredDown.is_powered());
        assert!(!PowerState::OscillatorWarmup.is_powered());
    }
}
