//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --no-default-features --features std --test config_tests

use si4703_radio::config::*;
use si4703_radio::input;
use si4703_radio::types::{Band, DeEmphasis, Frequency, OscillatorType, RdsMode, Spacing, Volume};

// =============================================================================
// Pin and Bus Tests
// =============================================================================

#[test]
fn pin_assignments_are_distinct() {
    for (i, a) in pins::ALL.iter().enumerate() {
        assert!(a.starts_with('P') && a.len() >= 3, "bad pin name {a}");
        assert!(!pins::ALL[i + 1..].contains(a), "{a} assigned twice");
    }
}

#[test]
fn bus_timing_reasonable() {
    assert_eq!(SI4703_ADDR, 0x10);
    // half period of 5 µs keeps the bit-banged bus at or below 100 kHz
    assert!(BUS_HALF_PERIOD_NS >= 5_000);
    assert!(I2C_FREQUENCY_HZ <= 400_000);
}

// =============================================================================
// Timing Tests
// =============================================================================

#[test]
fn power_timing_matches_datasheet() {
    assert!(OSCILLATOR_WARMUP_MS >= 500);
    assert!(POWERUP_SETTLE_MS >= 60);
    assert!(RESET_HOLD_MS >= 1);
}

#[test]
fn tune_poll_budget_covers_a_full_seek() {
    // a full band seek can take a few seconds
    let budget_ms = u32::from(TUNE_POLL_LIMIT) * TUNE_POLL_INTERVAL_MS;
    assert!(budget_ms >= 1_000);
}

#[test]
fn debounce_fits_poll_period() {
    assert!(u64::from(BUTTON_DEBOUNCE_MS) >= POLL_PERIOD_MS);
    assert!(SCROLL_TICKS > 0);
    assert!(ENCODER_EDGES_PER_STEP > 0);
}

// =============================================================================
// Preset Tests
// =============================================================================

#[test]
fn presets_are_valid_and_ascending() {
    for khz in PRESETS {
        let f = Frequency::from_khz(khz).expect("preset in range");
        assert!(khz >= Band::UsaEurope.start_khz());
        assert_eq!(khz % 100, 0, "{f} off the 100 kHz grid");
    }
    assert!(PRESETS.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn every_preset_reachable() {
    for i in 0..PRESETS.len() {
        assert_eq!(input::preset(i).map(Frequency::as_khz), Some(PRESETS[i]));
    }
    assert_eq!(input::preset(PRESETS.len()), None);
}

#[test]
fn default_preset_matches_default_frequency() {
    assert_eq!(PRESETS[DEFAULT_PRESET], DEFAULT_FREQUENCY.as_khz());
    assert_eq!(input::nearest_preset(DEFAULT_FREQUENCY), DEFAULT_PRESET);
}

// =============================================================================
// Radio Config Tests
// =============================================================================

#[test]
fn radio_config_defaults() {
    let config = RadioConfig::default();
    assert_eq!(config.oscillator, OscillatorType::Crystal);
    assert_eq!(config.band, Band::UsaEurope);
    assert_eq!(config.spacing, Spacing::Khz100);
    assert_eq!(config.volume, DEFAULT_VOLUME);
    assert_eq!(config.de_emphasis, DeEmphasis::Us50);
    assert!(config.rds);
    assert_eq!(config.rds_mode, RdsMode::Standard);
    assert_eq!(config.seek_threshold, DEFAULT_SEEK_THRESHOLD);
    assert_eq!(config.initial_frequency, DEFAULT_FREQUENCY);
    assert_eq!(config.rds_error_limit, DEFAULT_RDS_ERROR_LIMIT);
}

#[test]
fn radio_config_builders() {
    let config = RadioConfig::new()
        .with_oscillator(OscillatorType::ReferenceClock)
        .with_warmup_ms(0)
        .with_band(Band::Japan)
        .with_spacing(Spacing::Khz50)
        .with_volume(Volume::new(12))
        .with_de_emphasis(DeEmphasis::Us75)
        .with_rds(false, RdsMode::Verbose)
        .with_seek_thresholds(0x10, 2, 3)
        .with_initial_frequency(Frequency::from_khz(80_000).unwrap())
        .with_rds_error_limit(0);

    assert_eq!(config.oscillator, OscillatorType::ReferenceClock);
    assert_eq!(config.warmup_ms, 0);
    assert_eq!(config.band, Band::Japan);
    assert_eq!(config.spacing, Spacing::Khz50);
    assert_eq!(config.volume.level(), 12);
    assert_eq!(config.de_emphasis, DeEmphasis::Us75);
    assert!(!config.rds);
    assert_eq!(config.rds_mode, RdsMode::Verbose);
    assert_eq!(
        (config.seek_threshold, config.seek_snr, config.seek_impulse),
        (0x10, 2, 3)
    );
    assert_eq!(config.initial_frequency.as_khz(), 80_000);
    assert_eq!(config.rds_error_limit, 0);
}

// =============================================================================
// Display Tests
// =============================================================================

#[test]
fn display_geometry() {
    assert_eq!(DISPLAY_WIDTH, 128);
    assert_eq!(DISPLAY_HEIGHT, 64);
    assert_eq!(DISPLAY_I2C_ADDR, 0x3C);
}
