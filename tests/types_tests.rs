//! Types Module Tests
//!
//! Tests for domain types (Frequency, Band, Spacing, Volume, etc.)
//! Run with: cargo test --no-default-features --features std --test types_tests

use si4703_radio::types::{
    Band, DeEmphasis, Frequency, OscillatorType, RdsMode, SeekDirection, SeekMode, Spacing,
    Volume,
};

// =============================================================================
// Frequency Tests
// =============================================================================

#[test]
fn test_frequency_range() {
    assert!(Frequency::from_khz(64_000).is_some()); // Min
    assert!(Frequency::from_khz(108_000).is_some()); // Max
    assert!(Frequency::from_khz(106_500).is_some());
    assert!(Frequency::from_khz(63_999).is_none());
    assert!(Frequency::from_khz(108_001).is_none());
    assert!(Frequency::from_khz(0).is_none());
}

#[test]
fn test_frequency_from_10khz() {
    assert_eq!(Frequency::from_10khz(10_650), Frequency::from_khz(106_500));
    assert_eq!(Frequency::from_10khz(100), None);
}

#[test]
fn test_frequency_display() {
    let f = |khz| Frequency::from_khz(khz).unwrap().to_string();
    assert_eq!(f(106_500), "106.50");
    assert_eq!(f(98_100), "98.10");
    assert_eq!(f(87_500), "87.50");
    assert_eq!(f(64_000), "64.00");
    // 10 kHz spacing shows the second decimal
    assert_eq!(f(99_010), "99.01");
}

#[test]
fn test_frequency_parts() {
    let f = Frequency::from_khz(101_370).unwrap();
    assert_eq!(f.mhz(), 101);
    assert_eq!(f.centi_mhz(), 37);
    assert_eq!(f.as_khz(), 101_370);
}

#[test]
fn test_frequency_ordering() {
    let low = Frequency::from_khz(88_000).unwrap();
    let high = Frequency::from_khz(99_000).unwrap();
    assert!(low < high);
    assert_eq!(format!("{low:?}"), "Frequency(88000 kHz)");
}

// =============================================================================
// Band Tests
// =============================================================================

#[test]
fn test_band_edges() {
    assert_eq!(Band::UsaEurope.start_khz(), 87_500);
    assert_eq!(Band::UsaEurope.end_khz(), 108_000);
    assert_eq!(Band::JapanWide.start_khz(), 76_000);
    assert_eq!(Band::JapanWide.end_khz(), 108_000);
    assert_eq!(Band::Japan.start_khz(), 76_000);
    assert_eq!(Band::Japan.end_khz(), 90_000);
    assert_eq!(Band::Extended.start_khz(), 64_000);
}

#[test]
fn test_band_register_index() {
    for (i, band) in Band::ALL.into_iter().enumerate() {
        assert_eq!(usize::from(band.index()), i);
        assert_eq!(Band::from_index(band.index()), band);
    }
    // only the low two bits count
    assert_eq!(Band::from_index(0x06), Band::Japan);
}

#[test]
fn test_band_default() {
    assert_eq!(Band::default(), Band::UsaEurope);
}

// =============================================================================
// Spacing Tests
// =============================================================================

#[test]
fn test_spacing_khz() {
    assert_eq!(Spacing::Khz200.as_khz(), 200);
    assert_eq!(Spacing::Khz100.as_khz(), 100);
    assert_eq!(Spacing::Khz50.as_khz(), 50);
    assert_eq!(Spacing::Khz10.as_khz(), 10);
}

#[test]
fn test_spacing_register_index() {
    for (i, spacing) in Spacing::ALL.into_iter().enumerate() {
        assert_eq!(usize::from(spacing.index()), i);
        assert_eq!(Spacing::from_index(spacing.index()), spacing);
    }
}

// =============================================================================
// Volume Tests
// =============================================================================

#[test]
fn test_volume_clamps() {
    assert_eq!(Volume::new(0).level(), 0);
    assert_eq!(Volume::new(15).level(), 15);
    assert_eq!(Volume::new(16), Volume::MAX);
    assert_eq!(Volume::new(255), Volume::MAX);
}

#[test]
fn test_volume_steps_saturate() {
    assert_eq!(Volume::MAX.up(), Volume::MAX);
    assert_eq!(Volume::MIN.down(), Volume::MIN);
    assert_eq!(Volume::new(7).up().level(), 8);
    assert_eq!(Volume::new(7).down().level(), 6);
}

// =============================================================================
// Option Enum Defaults
// =============================================================================

#[test]
fn test_option_defaults() {
    assert_eq!(SeekDirection::default(), SeekDirection::Up);
    assert_eq!(SeekMode::default(), SeekMode::Wrap);
    assert_eq!(OscillatorType::default(), OscillatorType::Crystal);
    assert_eq!(DeEmphasis::default(), DeEmphasis::Us50);
    assert_eq!(RdsMode::default(), RdsMode::Standard);
}
