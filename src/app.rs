//! Polling loop
//!
//! One [`RadioApp::poll`] pass applies pending input to the receiver, decodes
//! a waiting RDS group and forwards whatever changed to a [`DisplaySink`].
//! The loop never blocks on the display; sinks only record values.

use embedded_hal::delay::DelayNs;

use crate::bus::BusTransport;
use crate::device::Si4703;
use crate::input::{self, InputEvent, SelectedIndex};
use crate::rds::{RdsDecoder, RdsUpdate};
use crate::types::{Frequency, SeekDirection, SeekMode, Volume};

/// Consumer of decoded, validated receiver state
pub trait DisplaySink {
    /// Show the tuned (or currently searched) frequency
    fn set_frequency(&mut self, frequency: Frequency);

    /// Show a line of RDS text
    fn set_rds_text(&mut self, text: &str);

    /// Show the volume level
    fn set_volume(&mut self, volume: Volume);

    /// Called once per pass after all setters
    fn update(&mut self);
}

/// Text the screen shows for the current RDS state
///
/// Radio text wins over the shorter variants; the station name is the
/// fallback.
#[must_use]
pub fn rds_line(decoder: &RdsDecoder) -> &str {
    [decoder.radio_text(), decoder.radio_text_b(), decoder.station_name()]
        .into_iter()
        .find(|s| !s.trim().is_empty())
        .unwrap_or("")
}

/// Application state carried between passes
#[derive(Clone, Copy, Debug)]
pub struct RadioApp {
    preset: usize,
    seek_mode: SeekMode,
    shown_frequency: Option<Frequency>,
    shown_volume: Option<Volume>,
    text_dirty: bool,
}

impl RadioApp {
    /// Start tracking `selected` from its current value
    #[must_use]
    pub fn new(selected: &SelectedIndex) -> Self {
        Self {
            preset: selected.load(),
            seek_mode: SeekMode::Wrap,
            shown_frequency: None,
            shown_volume: None,
            text_dirty: true,
        }
    }

    /// Seek mode used for seek events
    #[must_use]
    pub const fn with_seek_mode(mut self, mode: SeekMode) -> Self {
        self.seek_mode = mode;
        self
    }

    /// Preset index applied last
    #[must_use]
    pub const fn preset(&self) -> usize {
        self.preset
    }

    /// Run one pass of the loop
    pub fn poll<B, D, S, I>(
        &mut self,
        radio: &mut Si4703<B, D>,
        selected: &SelectedIndex,
        events: I,
        sink: &mut S,
    ) where
        B: BusTransport,
        D: DelayNs,
        S: DisplaySink,
        I: IntoIterator<Item = InputEvent>,
    {
        let index = selected.load();
        if index != self.preset {
            self.preset = index;
            self.tune_preset(radio, index);
        }

        for event in events {
            debug!("input {}", event);
            self.apply(radio, event, sink);
        }

        if let Some(update) = radio.poll_rds() {
            match update {
                RdsUpdate::StationName | RdsUpdate::RadioText | RdsUpdate::RadioTextB => {
                    self.text_dirty = true;
                }
                RdsUpdate::Clock(time) => {
                    debug!("rds clock {}", time);
                }
            }
        }

        self.forward(radio, sink);
        sink.update();
    }

    fn apply<B, D, S>(&mut self, radio: &mut Si4703<B, D>, event: InputEvent, sink: &mut S)
    where
        B: BusTransport,
        D: DelayNs,
        S: DisplaySink,
    {
        let result = match event {
            InputEvent::Preset(index) => {
                self.tune_preset(radio, index);
                Ok(())
            }
            InputEvent::Step(direction) => {
                self.text_dirty = true;
                radio.step(direction).map(drop)
            }
            InputEvent::VolumeUp => {
                radio.volume_up();
                Ok(())
            }
            InputEvent::VolumeDown => {
                radio.volume_down();
                Ok(())
            }
            InputEvent::SeekUp => self.seek(radio, SeekDirection::Up, sink),
            InputEvent::SeekDown => self.seek(radio, SeekDirection::Down, sink),
        };

        if let Err(e) = result {
            warn!("input {} rejected: {}", event, e);
        }
    }

    fn tune_preset<B: BusTransport, D: DelayNs>(&mut self, radio: &mut Si4703<B, D>, index: usize) {
        let Some(frequency) = input::preset(index) else {
            return;
        };
        self.text_dirty = true;
        if let Err(e) = radio.set_frequency(frequency) {
            warn!("preset {} rejected: {}", index, e);
        }
    }

    fn seek<B, D, S>(
        &mut self,
        radio: &mut Si4703<B, D>,
        direction: SeekDirection,
        sink: &mut S,
    ) -> crate::error::Result<()>
    where
        B: BusTransport,
        D: DelayNs,
        S: DisplaySink,
    {
        radio.seek_with_progress(direction, self.seek_mode, |frequency| {
            sink.set_frequency(frequency);
            sink.update();
        })?;
        // the sink saw intermediate frequencies
        self.shown_frequency = None;
        self.text_dirty = true;
        Ok(())
    }

    fn forward<B: BusTransport, D: DelayNs, S: DisplaySink>(&mut self, radio: &Si4703<B, D>, sink: &mut S) {
        let frequency = radio.frequency();
        if self.shown_frequency != Some(frequency) {
            self.shown_frequency = Some(frequency);
            sink.set_frequency(frequency);
            // a retune cleared the decoder
            self.text_dirty = true;
        }

        let volume = radio.volume();
        if self.shown_volume != Some(volume) {
            self.shown_volume = Some(volume);
            sink.set_volume(volume);
        }

        if self.text_dirty {
            self.text_dirty = false;
            sink.set_rds_text(rds_line(radio.rds()));
        }
    }
}
