//! Clock-time groups (type 4A)
//!
//! ```text
//!  block B  [1:0]   MJD bits 16..15
//!  block C  [15:1]  MJD bits 14..0
//!           [0]     hour bit 4
//!  block D  [15:12] hour bits 3..0
//!           [11:6]  minute
//!           [5]     offset sense (0 = +, 1 = -)
//!           [4:0]   local offset in half hours
//! ```

use core::fmt::Write;

use heapless::String;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Decoded clock-time group
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTime {
    mjd: u32,
    hour: u8,
    minute: u8,
    /// Signed local offset in half hours
    offset: i8,
}

/// Calendar date
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
    /// Year
    pub year: i32,
    /// Month 1..=12
    pub month: u8,
    /// Day of month 1..=31
    pub day: u8,
}

impl ClockTime {
    /// Decode blocks B, C and D of a 4A group
    ///
    /// Returns `None` for implausible fields (hour >= 24, minute >= 60,
    /// offset beyond 12 hours).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn decode(b: u16, c: u16, d: u16) -> Option<Self> {
        let mjd = (u32::from(b & 0x03) << 15) | u32::from(c >> 1);
        let hour = (((c & 0x01) << 4) | (d >> 12)) as u8;
        let minute = ((d >> 6) & 0x3F) as u8;
        let negative = d & (1 << 5) != 0;
        let half_hours = d & 0x1F;

        if hour >= 24 || minute >= 60 || (half_hours * 30) / 60 > 12 {
            return None;
        }

        let half_hours = half_hours as i8;

        Some(Self {
            mjd,
            hour,
            minute,
            offset: if negative { -half_hours } else { half_hours },
        })
    }

    /// Modified Julian Day of the UTC date
    #[must_use]
    pub const fn mjd(&self) -> u32 {
        self.mjd
    }

    /// UTC hour
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// UTC minute
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Local offset in minutes
    #[must_use]
    pub fn offset_minutes(&self) -> i32 {
        i32::from(self.offset) * 30
    }

    /// Local time as (hour, minute)
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn local(&self) -> (u8, u8) {
        let utc = i32::from(self.hour) * 60 + i32::from(self.minute);
        let local = (utc + self.offset_minutes()).rem_euclid(MINUTES_PER_DAY);
        ((local / 60) as u8, (local % 60) as u8)
    }

    /// UTC time as "HH:MM"
    #[must_use]
    pub fn utc_string(&self) -> String<5> {
        hh_mm(self.hour, self.minute)
    }

    /// Local time as "HH:MM"
    #[must_use]
    pub fn local_string(&self) -> String<5> {
        let (hour, minute) = self.local();
        hh_mm(hour, minute)
    }

    /// UTC time with offset, "HH:MM +hh:mm"
    #[must_use]
    pub fn with_offset_string(&self) -> String<12> {
        let mut s = String::new();
        let sign = if self.offset < 0 { '-' } else { '+' };
        let minutes = self.offset_minutes().unsigned_abs();
        let _ = write!(
            s,
            "{:02}:{:02} {}{:02}:{:02}",
            self.hour,
            self.minute,
            sign,
            minutes / 60,
            minutes % 60
        );
        s
    }

    /// UTC calendar date
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn date(&self) -> Date {
        // Days since 1970-01-01, then the civil-from-days algorithm
        let z = i64::from(self.mjd) - 40_587 + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
        let year = (yoe + era * 400) as i32 + i32::from(month <= 2);
        Date { year, month, day }
    }

    /// Day of week, 1 = Monday .. 7 = Sunday
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn weekday(&self) -> u8 {
        ((self.mjd + 2) % 7) as u8 + 1
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ClockTime {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{:02}:{:02} UTC ({} min) MJD {}",
            self.hour,
            self.minute,
            self.offset_minutes(),
            self.mjd
        );
    }
}

fn hh_mm(hour: u8, minute: u8) -> String<5> {
    let mut s = String::new();
    let _ = write!(s, "{hour:02}:{minute:02}");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(mjd: u32, hour: u16, minute: u16, negative: bool, half_hours: u16) -> (u16, u16, u16) {
        let b = (4 << 12) | ((mjd >> 15) as u16 & 0x03);
        let c = (((mjd & 0x7FFF) as u16) << 1) | (hour >> 4);
        let d = ((hour & 0x0F) << 12) | (minute << 6) | (u16::from(negative) << 5) | half_hours;
        (b, c, d)
    }

    #[test]
    fn local_time_wraps_midnight() {
        let (b, c, d) = blocks(60_000, 23, 45, false, 2);
        let t = ClockTime::decode(b, c, d).unwrap();
        assert_eq!(t.local(), (0, 45));

        let (b, c, d) = blocks(60_000, 0, 15, true, 3);
        let t = ClockTime::decode(b, c, d).unwrap();
        assert_eq!(t.local_string().as_str(), "22:45");
        assert_eq!(t.with_offset_string().as_str(), "00:15 -01:30");
    }

    #[test]
    fn mjd_to_date() {
        let (b, c, d) = blocks(51_544, 12, 0, false, 0);
        let t = ClockTime::decode(b, c, d).unwrap();
        assert_eq!(t.mjd(), 51_544);
        assert_eq!(
            t.date(),
            Date {
                year: 2000,
                month: 1,
                day: 1
            }
        );
        assert_eq!(t.weekday(), 6);
    }

    #[test]
    fn implausible_offset_rejected() {
        let (b, c, d) = blocks(60_000, 10, 0, false, 26);
        assert!(ClockTime::decode(b, c, d).is_none());
    }
}
