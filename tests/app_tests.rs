//! Polling Loop Tests
//!
//! Tests for the application pass: preset handoff, input events, RDS text
//! forwarding and change-only updates to the display sink.
//! Run with: cargo test --no-default-features --features std --test app_tests

mod common;

use common::{block_b, FakeDelay, SimChip};
use si4703_radio::app::{rds_line, DisplaySink, RadioApp};
use si4703_radio::config::{RadioConfig, DEFAULT_PRESET, PRESETS};
use si4703_radio::device::Si4703;
use si4703_radio::input::{InputEvent, SelectedIndex};
use si4703_radio::rds::{RdsDecoder, SidebandGroup};
use si4703_radio::types::{Frequency, SeekMode, StepDirection, Volume};
use si4703_radio::ui::Screen;

// =============================================================================
// Recording sink
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Frequency(u32),
    Text(String),
    Volume(u8),
    Update,
}

#[derive(Default)]
struct RecordingSink {
    calls: Vec<Call>,
}

impl RecordingSink {
    fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    fn frequencies(calls: &[Call]) -> Vec<u32> {
        calls
            .iter()
            .filter_map(|c| match c {
                Call::Frequency(khz) => Some(*khz),
                _ => None,
            })
            .collect()
    }
}

impl DisplaySink for RecordingSink {
    fn set_frequency(&mut self, frequency: Frequency) {
        self.calls.push(Call::Frequency(frequency.as_khz()));
    }

    fn set_rds_text(&mut self, text: &str) {
        self.calls.push(Call::Text(text.to_string()));
    }

    fn set_volume(&mut self, volume: Volume) {
        self.calls.push(Call::Volume(volume.level()));
    }

    fn update(&mut self) {
        self.calls.push(Call::Update);
    }
}

fn radio() -> Si4703<SimChip, FakeDelay> {
    let mut radio = Si4703::new(SimChip::new(), FakeDelay::new(), RadioConfig::new());
    radio.setup();
    radio
}

fn no_events() -> std::iter::Empty<InputEvent> {
    std::iter::empty()
}

fn station(address: u16, text: &[u8; 2]) -> [u16; 4] {
    [
        0xC201,
        block_b(0, false, false, address),
        0,
        u16::from_be_bytes(*text),
    ]
}

// =============================================================================
// First pass and change tracking
// =============================================================================

#[test]
fn first_pass_sends_everything() {
    let mut radio = radio();
    let selected = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());
    let mut app = RadioApp::new(&selected);
    let mut sink = RecordingSink::default();

    app.poll(&mut radio, &selected, no_events(), &mut sink);

    assert_eq!(
        sink.take(),
        vec![
            Call::Frequency(106_500),
            Call::Volume(5),
            Call::Text(String::new()),
            Call::Update,
        ]
    );
}

#[test]
fn quiet_pass_only_updates() {
    let mut radio = radio();
    let selected = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());
    let mut app = RadioApp::new(&selected);
    let mut sink = RecordingSink::default();
    app.poll(&mut radio, &selected, no_events(), &mut sink);
    sink.take();

    app.poll(&mut radio, &selected, no_events(), &mut sink);

    assert_eq!(sink.take(), vec![Call::Update]);
}

// =============================================================================
// Preset handoff
// =============================================================================

#[test]
fn encoder_selection_tunes_preset() {
    let mut radio = radio();
    let selected = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());
    let mut app = RadioApp::new(&selected);
    let mut sink = RecordingSink::default();
    app.poll(&mut radio, &selected, no_events(), &mut sink);
    sink.take();

    // the encoder side publishes a new index
    selected.step(StepDirection::Up);
    app.poll(&mut radio, &selected, no_events(), &mut sink);

    assert_eq!(app.preset(), DEFAULT_PRESET + 1);
    assert_eq!(radio.frequency().as_khz(), PRESETS[DEFAULT_PRESET + 1]);
    let calls = sink.take();
    assert_eq!(RecordingSink::frequencies(&calls), vec![PRESETS[DEFAULT_PRESET + 1]]);
    assert!(calls.iter().any(|c| matches!(c, Call::Text(_))));
    assert!(!calls.iter().any(|c| matches!(c, Call::Volume(_))));
}

#[test]
fn preset_event_tunes_directly() {
    let mut radio = radio();
    let selected = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());
    let mut app = RadioApp::new(&selected);
    let mut sink = RecordingSink::default();

    app.poll(&mut radio, &selected, [InputEvent::Preset(18)], &mut sink);

    assert_eq!(radio.frequency().as_khz(), 98_100);
}

#[test]
fn out_of_range_preset_is_ignored() {
    let mut radio = radio();
    let selected = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());
    let mut app = RadioApp::new(&selected);
    let mut sink = RecordingSink::default();

    app.poll(&mut radio, &selected, [InputEvent::Preset(400)], &mut sink);

    assert_eq!(radio.frequency().as_khz(), 106_500);
}

// =============================================================================
// Input events
// =============================================================================

#[test]
fn volume_events_forwarded_once() {
    let mut radio = radio();
    let selected = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());
    let mut app = RadioApp::new(&selected);
    let mut sink = RecordingSink::default();
    app.poll(&mut radio, &selected, no_events(), &mut sink);
    sink.take();

    let events = [InputEvent::VolumeUp, InputEvent::VolumeUp, InputEvent::VolumeDown];
    app.poll(&mut radio, &selected, events, &mut sink);

    assert_eq!(radio.volume().level(), 6);
    assert_eq!(sink.take(), vec![Call::Volume(6), Call::Update]);
}

#[test]
fn step_event_moves_one_channel() {
    let mut radio = radio();
    let selected = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());
    let mut app = RadioApp::new(&selected);
    let mut sink = RecordingSink::default();

    app.poll(
        &mut radio,
        &selected,
        [InputEvent::Step(StepDirection::Down)],
        &mut sink,
    );

    assert_eq!(radio.frequency().as_khz(), 106_400);
    assert_eq!(RecordingSink::frequencies(&sink.take()), vec![106_400]);
}

#[test]
fn seek_shows_progress_then_result() {
    let mut radio = radio();
    radio.bus_mut().seek_target = Some(200);
    radio.bus_mut().reads_to_complete = 4;
    let selected = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());
    let mut app = RadioApp::new(&selected).with_seek_mode(SeekMode::Stop);
    let mut sink = RecordingSink::default();
    app.poll(&mut radio, &selected, no_events(), &mut sink);
    sink.take();

    app.poll(&mut radio, &selected, [InputEvent::SeekUp], &mut sink);

    let calls = sink.take();
    let seen = RecordingSink::frequencies(&calls);
    assert!(seen.len() >= 2, "expected progress before the result: {seen:?}");
    assert_eq!(seen.last(), Some(&107_500));
    // each progress report is followed by a redraw
    let first = calls.iter().position(|c| matches!(c, Call::Frequency(_))).unwrap();
    assert_eq!(calls[first + 1], Call::Update);
    assert_eq!(radio.bus_mut().reg(0x02) & (1 << 10), 1 << 10);
}

// =============================================================================
// RDS text
// =============================================================================

#[test]
fn decoded_station_name_reaches_sink() {
    let mut radio = radio();
    let selected = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());
    let mut app = RadioApp::new(&selected);
    let mut sink = RecordingSink::default();
    app.poll(&mut radio, &selected, no_events(), &mut sink);
    sink.take();

    radio.bus_mut().push_rds(station(0, b"JA"));
    radio.bus_mut().push_rds(station(1, b"ZZ"));
    app.poll(&mut radio, &selected, no_events(), &mut sink);
    app.poll(&mut radio, &selected, no_events(), &mut sink);

    let texts: Vec<Call> = sink
        .take()
        .into_iter()
        .filter(|c| matches!(c, Call::Text(_)))
        .collect();
    assert_eq!(
        texts,
        vec![Call::Text("JA".into()), Call::Text("JAZZ".into())]
    );
}

#[test]
fn radio_text_preferred_over_station_name() {
    let mut dec = RdsDecoder::new();
    dec.ingest(&SidebandGroup::new(0, block_b(0, false, false, 0), 0, 0x4142));
    assert_eq!(rds_line(&dec), "AB");

    dec.ingest(&SidebandGroup::new(0, block_b(2, true, false, 0), 0, 0x4344));
    assert_eq!(rds_line(&dec), "CD");

    dec.ingest(&SidebandGroup::new(0, block_b(2, false, false, 0), 0x4546, 0x4748));
    assert_eq!(rds_line(&dec), "EFGH");
}

#[test]
fn blank_text_falls_back() {
    let mut dec = RdsDecoder::new();
    assert_eq!(rds_line(&dec), "");
    dec.ingest(&SidebandGroup::new(0, block_b(2, false, false, 0), 0x2020, 0x2020));
    dec.ingest(&SidebandGroup::new(0, block_b(0, false, false, 0), 0, 0x4142));
    assert_eq!(rds_line(&dec), "AB");
}

// =============================================================================
// Screen as sink
// =============================================================================

#[test]
fn screen_follows_the_loop() {
    let mut radio = radio();
    let selected = SelectedIndex::new(DEFAULT_PRESET, PRESETS.len());
    let mut app = RadioApp::new(&selected);
    let mut screen = Screen::new();

    app.poll(&mut radio, &selected, no_events(), &mut screen);
    assert!(screen.needs_update());
    assert_eq!(screen.frequency_line().as_str(), "106.50 MHz");
    assert_eq!(screen.volume_line().as_str(), "VOL 05");
    screen.mark_updated();

    radio.bus_mut().push_rds(station(0, b"FM"));
    app.poll(&mut radio, &selected, no_events(), &mut screen);

    assert!(screen.needs_update());
    assert_eq!(screen.text(), "FM");
}
