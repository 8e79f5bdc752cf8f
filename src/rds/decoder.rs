//! RDS group decoder
//!
//! Segments arrive out of order and repeat; each group overwrites its slice of
//! the matching buffer. Group types handled:
//!
//! | Type | Payload                 | Buffer            |
//! |------|-------------------------|-------------------|
//! | 0A/B | block D, 2 chars        | station name (8)  |
//! | 2A   | blocks C+D, 4 chars     | radio text (64)   |
//! | 2B   | block D, 2 chars        | radio text B (32) |
//! | 4A   | clock time              | clock (12)        |

use super::clock::ClockTime;
use super::group::{GroupVersion, SidebandGroup};
use super::text::TextBuffer;
use crate::config::DEFAULT_RDS_ERROR_LIMIT;

/// Station name length
pub const STATION_NAME_LEN: usize = 8;

/// Radio text length (type 2A)
pub const RADIO_TEXT_LEN: usize = 64;

/// Radio text length (type 2B)
pub const RADIO_TEXT_B_LEN: usize = 32;

/// Formatted clock length ("HH:MM +hh:mm")
pub const CLOCK_TEXT_LEN: usize = 12;

/// What a group changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RdsUpdate {
    /// Station name segment written
    StationName,
    /// Radio text (2A) segment written
    RadioText,
    /// Radio text (2B) segment written
    RadioTextB,
    /// Valid clock time received
    Clock(ClockTime),
}

/// Reassembles RDS groups into text buffers
#[derive(Clone, Debug)]
pub struct RdsDecoder {
    station: TextBuffer<STATION_NAME_LEN>,
    text_a: TextBuffer<RADIO_TEXT_LEN>,
    text_b: TextBuffer<RADIO_TEXT_B_LEN>,
    clock_text: TextBuffer<CLOCK_TEXT_LEN>,
    clock: Option<ClockTime>,
    ab_flag_a: Option<bool>,
    ab_flag_b: Option<bool>,
    program_id: Option<u16>,
    program_type: u8,
    error_limit: u8,
}

impl RdsDecoder {
    /// Decoder with the default block error limit
    #[must_use]
    pub const fn new() -> Self {
        Self::with_error_limit(DEFAULT_RDS_ERROR_LIMIT)
    }

    /// Decoder that drops groups whose block B error level exceeds `limit`
    ///
    /// Text and clock segments are also dropped when a block they are read
    /// from exceeds the limit.
    #[must_use]
    pub const fn with_error_limit(limit: u8) -> Self {
        Self {
            station: TextBuffer::new(),
            text_a: TextBuffer::new(),
            text_b: TextBuffer::new(),
            clock_text: TextBuffer::new(),
            clock: None,
            ab_flag_a: None,
            ab_flag_b: None,
            program_id: None,
            program_type: 0,
            error_limit: limit,
        }
    }

    /// Decode one group
    ///
    /// Returns `None` if the group was dropped or carried nothing handled here.
    pub fn ingest(&mut self, group: &SidebandGroup) -> Option<RdsUpdate> {
        if group.error_level(1) > self.error_limit {
            trace!("rds group dropped, block B error level {}", group.error_level(1));
            return None;
        }

        if group.error_level(0) <= self.error_limit {
            self.program_id = Some(group.pi());
        }
        self.program_type = group.program_type();

        let payload = match (group.group_type(), group.version()) {
            (2 | 4, GroupVersion::A) => group.error_level(2).max(group.error_level(3)),
            _ => group.error_level(3),
        };
        if payload > self.error_limit {
            trace!("rds segment dropped, payload error level {}", payload);
            return None;
        }

        let address = usize::from(group.address());
        match (group.group_type(), group.version()) {
            (0, _) => {
                let offset = address * 2;
                self.station
                    .write(offset, &group.block_d().to_be_bytes())
                    .then_some(RdsUpdate::StationName)
            }
            (2, GroupVersion::A) => {
                Self::track_ab(&mut self.ab_flag_a, group.text_ab(), &mut self.text_a);
                let [c_hi, c_lo] = group.block_c().to_be_bytes();
                let [d_hi, d_lo] = group.block_d().to_be_bytes();
                self.text_a
                    .write(address * 4, &[c_hi, c_lo, d_hi, d_lo])
                    .then_some(RdsUpdate::RadioText)
            }
            (2, GroupVersion::B) => {
                Self::track_ab(&mut self.ab_flag_b, group.text_ab(), &mut self.text_b);
                self.text_b
                    .write(address * 2, &group.block_d().to_be_bytes())
                    .then_some(RdsUpdate::RadioTextB)
            }
            (4, GroupVersion::A) => {
                let time = ClockTime::decode(group.block_b(), group.block_c(), group.block_d())?;
                self.clock = Some(time);
                self.clock_text.clear();
                self.clock_text.write(0, time.with_offset_string().as_bytes());
                Some(RdsUpdate::Clock(time))
            }
            _ => None,
        }
    }

    /// A toggled A/B flag means the broadcaster started a new message
    fn track_ab<const N: usize>(last: &mut Option<bool>, flag: bool, buffer: &mut TextBuffer<N>) {
        if last.is_some_and(|prev| prev != flag) {
            buffer.clear();
        }
        *last = Some(flag);
    }

    /// Station name (up to 8 chars)
    #[must_use]
    pub fn station_name(&self) -> &str {
        self.station.as_str()
    }

    /// Radio text from type 2A groups (up to 64 chars)
    #[must_use]
    pub fn radio_text(&self) -> &str {
        self.text_a.as_str()
    }

    /// Radio text from type 2B groups (up to 32 chars)
    #[must_use]
    pub fn radio_text_b(&self) -> &str {
        self.text_b.as_str()
    }

    /// Last valid clock time
    #[must_use]
    pub const fn clock(&self) -> Option<ClockTime> {
        self.clock
    }

    /// Last clock time as "HH:MM +hh:mm"
    #[must_use]
    pub fn clock_text(&self) -> &str {
        self.clock_text.as_str()
    }

    /// Program identification of the last group with a clean block A
    #[must_use]
    pub const fn program_id(&self) -> Option<u16> {
        self.program_id
    }

    /// Program type of the last accepted group
    #[must_use]
    pub const fn program_type(&self) -> u8 {
        self.program_type
    }

    /// Forget everything decoded so far (e.g. after retuning)
    pub fn clear(&mut self) {
        *self = Self::with_error_limit(self.error_limit);
    }
}

impl Default for RdsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ab_toggle_clears_text() {
        let mut dec = RdsDecoder::new();
        dec.ingest(&SidebandGroup::new(0, 0x2000, 0x4142, 0x4344));
        assert_eq!(dec.radio_text(), "ABCD");

        // same flag, next segment
        dec.ingest(&SidebandGroup::new(0, 0x2001, 0x4546, 0x4748));
        assert_eq!(dec.radio_text(), "ABCDEFGH");

        // flag toggles: old message discarded
        dec.ingest(&SidebandGroup::new(0, 0x2011, 0x5859, 0x5A5A));
        assert_eq!(dec.radio_text(), "    XYZZ");
    }

    #[test]
    fn noisy_block_b_dropped() {
        let mut dec = RdsDecoder::with_error_limit(1);
        let g = SidebandGroup::new(0, 0x0000, 0, 0x4142).with_errors([0, 2, 0, 0]);
        assert_eq!(dec.ingest(&g), None);
        assert!(dec.station_name().is_empty());
    }

    #[test]
    fn noisy_payload_block_dropped() {
        let mut dec = RdsDecoder::new();
        let g = SidebandGroup::new(0x1234, 0x0000, 0, 0x5A5A).with_errors([0, 0, 0, 3]);
        assert_eq!(dec.ingest(&g), None);
        assert!(dec.station_name().is_empty());
        assert_eq!(dec.program_id(), Some(0x1234));
    }

    #[test]
    fn clear_keeps_limit() {
        let mut dec = RdsDecoder::with_error_limit(0);
        dec.ingest(&SidebandGroup::new(0x1234, 0x0000, 0, 0x4142));
        dec.clear();
        assert!(dec.station_name().is_empty());
        assert_eq!(dec.program_id(), None);
        let g = SidebandGroup::new(0, 0x0000, 0, 0x4142).with_errors([0, 1, 0, 0]);
        assert_eq!(dec.ingest(&g), None);
    }
}
