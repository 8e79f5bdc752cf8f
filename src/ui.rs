//! Screen Model
//!
//! Pure screen state for the receiver: frequency, volume and a scrolling RDS
//! text line. The polling loop feeds it through [`DisplaySink`]; the embedded
//! build renders it on the OLED whenever [`Screen::needs_update`] is set.

use core::fmt::Write;

use heapless::String;

use crate::app::DisplaySink;
use crate::config::{DISPLAY_WIDTH, SCROLL_TICKS};
use crate::rds::decoder::RADIO_TEXT_LEN;
use crate::types::{Frequency, Volume};

/// Glyph width of the display font in pixels
pub const GLYPH_WIDTH: u32 = 6;

/// Characters that fit on one text line
#[allow(clippy::cast_possible_truncation)]
pub const VISIBLE_CHARS: usize = (DISPLAY_WIDTH / GLYPH_WIDTH) as usize;

/// Screen state
#[derive(Clone, Debug)]
pub struct Screen {
    frequency: Option<Frequency>,
    volume: Option<Volume>,
    text: String<RADIO_TEXT_LEN>,
    scroll: usize,
    ticks: u8,
    scroll_ticks: u8,
    needs_update: bool,
}

impl Screen {
    /// Blank screen scrolling once every `SCROLL_TICKS` updates
    #[must_use]
    pub const fn new() -> Self {
        Self::with_scroll_ticks(SCROLL_TICKS)
    }

    /// Blank screen with a custom scroll rate
    #[must_use]
    pub const fn with_scroll_ticks(scroll_ticks: u8) -> Self {
        Self {
            frequency: None,
            volume: None,
            text: String::new(),
            scroll: 0,
            ticks: 0,
            scroll_ticks: if scroll_ticks == 0 { 1 } else { scroll_ticks },
            needs_update: true,
        }
    }

    /// Displayed frequency
    #[must_use]
    pub const fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Displayed volume
    #[must_use]
    pub const fn volume(&self) -> Option<Volume> {
        self.volume
    }

    /// Full RDS text line
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Current scroll offset in characters
    #[must_use]
    pub const fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// The part of the text line currently on screen
    #[must_use]
    pub fn visible_text(&self) -> &str {
        let end = (self.scroll + VISIBLE_CHARS).min(self.text.len());
        // text is ASCII only, so any byte offset is a char boundary
        self.text.get(self.scroll..end).unwrap_or("")
    }

    /// Frequency line, e.g. "106.50 MHz"
    #[must_use]
    pub fn frequency_line(&self) -> String<12> {
        let mut s = String::new();
        match self.frequency {
            Some(f) => {
                let _ = write!(s, "{f} MHz");
            }
            None => {
                let _ = s.push_str("---.-- MHz");
            }
        }
        s
    }

    /// Volume line, e.g. "VOL 05"
    #[must_use]
    pub fn volume_line(&self) -> String<8> {
        let mut s = String::new();
        let _ = write!(s, "VOL {:02}", self.volume.map_or(0, Volume::level));
        s
    }

    /// Check if the display needs redrawing
    #[must_use]
    pub const fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Mark as drawn
    pub fn mark_updated(&mut self) {
        self.needs_update = false;
    }

    /// Force a redraw
    pub fn invalidate(&mut self) {
        self.needs_update = true;
    }

    fn max_scroll(&self) -> usize {
        self.text.len().saturating_sub(VISIBLE_CHARS)
    }

    fn advance_scroll(&mut self) {
        if self.max_scroll() == 0 {
            return;
        }
        self.ticks += 1;
        if self.ticks < self.scroll_ticks {
            return;
        }
        self.ticks = 0;
        self.scroll = if self.scroll >= self.max_scroll() {
            0
        } else {
            self.scroll + 1
        };
        self.needs_update = true;
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for Screen {
    fn set_frequency(&mut self, frequency: Frequency) {
        if self.frequency != Some(frequency) {
            self.frequency = Some(frequency);
            self.needs_update = true;
        }
    }

    fn set_rds_text(&mut self, text: &str) {
        let text = text.trim_end();
        if self.text.as_str() == text {
            return;
        }
        self.text.clear();
        for c in text.chars().take(RADIO_TEXT_LEN) {
            let c = if c.is_ascii() && !c.is_ascii_control() { c } else { ' ' };
            let _ = self.text.push(c);
        }
        if self.scroll > self.max_scroll() {
            self.scroll = 0;
        }
        self.ticks = 0;
        self.needs_update = true;
    }

    fn set_volume(&mut self, volume: Volume) {
        if self.volume != Some(volume) {
            self.volume = Some(volume);
            self.needs_update = true;
        }
    }

    fn update(&mut self) {
        self.advance_scroll();
    }
}
