//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the FM receiver hardware
//! and the [`RadioConfig`] value the device is powered up with.
//! All pin mappings, timing parameters, and chip defaults are centralized here.

use crate::types::{Band, DeEmphasis, Frequency, OscillatorType, RdsMode, Spacing, Volume};

/// Si4703 7-bit two-wire address
pub const SI4703_ADDR: u8 = 0x10;

/// Half-period of the bit-banged two-wire clock in nanoseconds (~100 kHz)
pub const BUS_HALF_PERIOD_NS: u32 = 5_000;

/// I2C bus frequency for the display
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// SSD1306 OLED I2C address
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;

/// Display width in pixels
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT: u32 = 64;

/// Reset pulse low time in milliseconds
pub const RESET_HOLD_MS: u32 = 1;

/// Time after raising reset before SDIO is released, in milliseconds
pub const RESET_RELEASE_MS: u32 = 1;

/// Crystal oscillator warm-up time in milliseconds
pub const OSCILLATOR_WARMUP_MS: u32 = 500;

/// Power-up settle time after enabling the chip, in milliseconds
pub const POWERUP_SETTLE_MS: u32 = 60;

/// Power-down settle time in milliseconds
pub const POWERDOWN_SETTLE_MS: u32 = 100;

/// Delay after starting a tune or seek before polling STC, in milliseconds
pub const TUNE_SETTLE_MS: u32 = 60;

/// Sleep between STC polls, in milliseconds
pub const TUNE_POLL_INTERVAL_MS: u32 = 5;

/// Maximum STC polls before a tune or seek is forced to completion
pub const TUNE_POLL_LIMIT: u16 = 200;

/// Default seek RSSI threshold (SEEKTH)
pub const DEFAULT_SEEK_THRESHOLD: u8 = 0x19;

/// Default seek SNR threshold (SKSNR)
pub const DEFAULT_SEEK_SNR: u8 = 0x04;

/// Default seek FM impulse detection threshold (SKCNT)
pub const DEFAULT_SEEK_IMPULSE: u8 = 0x08;

/// Default startup frequency (106.5 MHz)
pub const DEFAULT_FREQUENCY: Frequency = Frequency::from_khz_const(106_500);

/// Default startup volume
pub const DEFAULT_VOLUME: Volume = Volume::new(5);

/// Highest tolerated RDS block-B error level (0 = none, 3 = uncorrectable)
pub const DEFAULT_RDS_ERROR_LIMIT: u8 = 2;

/// Button debounce time in milliseconds
pub const BUTTON_DEBOUNCE_MS: u32 = 30;

/// Polling loop period in milliseconds
pub const POLL_PERIOD_MS: u64 = 20;

/// Display scroll period in polling ticks
pub const SCROLL_TICKS: u8 = 10;

/// Encoder edges needed per preset step
pub const ENCODER_EDGES_PER_STEP: u8 = 2;

/// Preset stations in kHz
pub const PRESETS: [u32; 40] = [
    87_600, 88_200, 88_900, 89_500, 89_900, 90_400, 91_000, 92_000, 92_600, 93_100,
    93_600, 94_600, 95_100, 95_500, 96_400, 96_800, 97_600, 97_900, 98_100, 99_000,
    99_400, 99_900, 100_200, 100_400, 100_800, 101_300, 102_000, 102_500, 103_000, 103_400,
    103_800, 104_100, 104_500, 105_100, 105_500, 105_800, 106_200, 106_500, 107_000, 107_500,
];

/// Preset selected at startup (matches `DEFAULT_FREQUENCY`)
pub const DEFAULT_PRESET: usize = 37;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic
    //!
    //! `main.rs` takes the matching `embassy_stm32` peripherals and logs this
    //! table at startup.

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// Si4703 reset (active low)
    pub const SI4703_RST: &str = "PB4";

    /// Si4703 SCLK (bit-banged, open drain)
    pub const SI4703_SCLK: &str = "PB8";

    /// Si4703 SDIO (bit-banged, open drain)
    pub const SI4703_SDIO: &str = "PB9";

    /// I2C1 SCL (display)
    pub const I2C1_SCL: &str = "PB6";

    /// I2C1 SDA (display)
    pub const I2C1_SDA: &str = "PB7";

    /// Encoder A input
    pub const ENCODER_A: &str = "PA0";

    /// Encoder B input
    pub const ENCODER_B: &str = "PA1";

    /// Volume up button (active low)
    pub const VOL_UP: &str = "PC0";

    /// Volume down button (active low)
    pub const VOL_DOWN: &str = "PC1";

    /// Seek up button (active low)
    pub const SEEK_UP: &str = "PC2";

    /// Seek down button (active low)
    pub const SEEK_DOWN: &str = "PC3";

    /// Every assignment above
    pub const ALL: [&str; 12] = [
        LED_STATUS,
        SI4703_RST,
        SI4703_SCLK,
        SI4703_SDIO,
        I2C1_SCL,
        I2C1_SDA,
        ENCODER_A,
        ENCODER_B,
        VOL_UP,
        VOL_DOWN,
        SEEK_UP,
        SEEK_DOWN,
    ];
}

/// Chip settings applied at power-up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioConfig {
    /// Reference oscillator fitted to the board
    pub oscillator: OscillatorType,
    /// Oscillator warm-up wait in milliseconds
    pub warmup_ms: u32,
    /// Band plan
    pub band: Band,
    /// Channel spacing
    pub spacing: Spacing,
    /// Initial volume
    pub volume: Volume,
    /// De-emphasis time constant
    pub de_emphasis: DeEmphasis,
    /// Enable the RDS decoder
    pub rds: bool,
    /// RDS reporting mode
    pub rds_mode: RdsMode,
    /// Seek RSSI threshold
    pub seek_threshold: u8,
    /// Seek SNR threshold (4 bits)
    pub seek_snr: u8,
    /// Seek impulse count threshold (4 bits)
    pub seek_impulse: u8,
    /// Frequency tuned after power-up
    pub initial_frequency: Frequency,
    /// Highest accepted block-B error level for RDS groups
    pub rds_error_limit: u8,
}

impl RadioConfig {
    /// Board defaults: crystal, Europe band, 100 kHz spacing, RDS on
    #[must_use]
    pub const fn new() -> Self {
        Self {
            oscillator: OscillatorType::Crystal,
            warmup_ms: OSCILLATOR_WARMUP_MS,
            band: Band::UsaEurope,
            spacing: Spacing::Khz100,
            volume: DEFAULT_VOLUME,
            de_emphasis: DeEmphasis::Us50,
            rds: true,
            rds_mode: RdsMode::Standard,
            seek_threshold: DEFAULT_SEEK_THRESHOLD,
            seek_snr: DEFAULT_SEEK_SNR,
            seek_impulse: DEFAULT_SEEK_IMPULSE,
            initial_frequency: DEFAULT_FREQUENCY,
            rds_error_limit: DEFAULT_RDS_ERROR_LIMIT,
        }
    }

    /// Set the oscillator type
    #[must_use]
    pub const fn with_oscillator(mut self, oscillator: OscillatorType) -> Self {
        self.oscillator = oscillator;
        self
    }

    /// Set the oscillator warm-up time
    #[must_use]
    pub const fn with_warmup_ms(mut self, warmup_ms: u32) -> Self {
        self.warmup_ms = warmup_ms;
        self
    }

    /// Set the band plan
    #[must_use]
    pub const fn with_band(mut self, band: Band) -> Self {
        self.band = band;
        self
    }

    /// Set the channel spacing
    #[must_use]
    pub const fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the initial volume
    #[must_use]
    pub const fn with_volume(mut self, volume: Volume) -> Self {
        self.volume = volume;
        self
    }

    /// Set the de-emphasis time constant
    #[must_use]
    pub const fn with_de_emphasis(mut self, de_emphasis: DeEmphasis) -> Self {
        self.de_emphasis = de_emphasis;
        self
    }

    /// Enable or disable RDS
    #[must_use]
    pub const fn with_rds(mut self, enabled: bool, mode: RdsMode) -> Self {
        self.rds = enabled;
        self.rds_mode = mode;
        self
    }

    /// Set the three seek thresholds (RSSI, SNR, impulse count)
    #[must_use]
    pub const fn with_seek_thresholds(mut self, rssi: u8, snr: u8, impulse: u8) -> Self {
        self.seek_threshold = rssi;
        self.seek_snr = snr & 0x0F;
        self.seek_impulse = impulse & 0x0F;
        self
    }

    /// Set the frequency tuned after power-up
    #[must_use]
    pub const fn with_initial_frequency(mut self, frequency: Frequency) -> Self {
        self.initial_frequency = frequency;
        self
    }

    /// Set the highest accepted RDS block-B error level
    #[must_use]
    pub const fn with_rds_error_limit(mut self, limit: u8) -> Self {
        self.rds_error_limit = if limit > 3 { 3 } else { limit };
        self
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "RadioConfig {{ band: {}, spacing: {}, {}, rds: {} }}",
            self.band,
            self.spacing,
            self.volume,
            self.rds
        );
    }
}
