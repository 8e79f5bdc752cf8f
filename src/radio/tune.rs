//! Tune and seek state machine
//!
//! The chip signals completion of a tune or seek by raising STC. The host must
//! then clear TUNE/SEEK and wait for STC to drop again before the next
//! operation. Both waits are bounded: a chip that never raises or lowers STC
//! is treated as done once the poll limit is reached.
//!
//! ```text
//!   Idle ──begin──▶ Tuning ──write + settle──▶ AwaitingComplete
//!    ▲                                              │ STC or limit
//!    │                                              ▼
//!   AwaitingClear ◀──clear TUNE/SEEK + write──── Clearing
//!    │ STC low or limit
//!    └──▶ Idle (frequency recomputed from READCHAN)
//! ```

use embedded_hal::delay::DelayNs;

use super::frequency::FrequencyMapper;
use crate::bus::{BusResult, BusTransport};
use crate::config::{TUNE_POLL_INTERVAL_MS, TUNE_POLL_LIMIT, TUNE_SETTLE_MS};
use crate::error::{Error, Result};
use crate::registers as reg;
use crate::shadow::{RegisterShadow, DEFAULT_WRITE_LIMIT};
use crate::types::{Frequency, SeekDirection, SeekMode};

/// Operation requested of the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuneRequest {
    /// Tune directly to a channel number
    Tune {
        /// Channel (already snapped into the CHAN field range)
        channel: u16,
    },
    /// Search for the next station above the RSSI threshold
    Seek {
        /// Search direction
        direction: SeekDirection,
        /// Band-edge behaviour
        mode: SeekMode,
    },
}

impl TuneRequest {
    /// True for seek requests
    #[must_use]
    pub const fn is_seek(&self) -> bool {
        matches!(self, Self::Seek { .. })
    }
}

/// Controller state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TunePhase {
    /// No operation in flight
    #[default]
    Idle,
    /// Request accepted, registers not yet written
    Tuning,
    /// Polling for STC
    AwaitingComplete,
    /// STC seen, TUNE/SEEK not yet cleared
    Clearing,
    /// Polling for STC to drop
    AwaitingClear,
}

/// How an operation ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuneStatus {
    /// Tune finished or seek found a station
    Tuned,
    /// Seek reached the band limit or found nothing (SF/BL)
    NotFound,
}

/// Result of a completed tune or seek
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuneOutcome {
    /// Completion status
    pub status: TuneStatus,
    /// Channel reported by READCHAN
    pub channel: u16,
    /// Frequency of that channel
    pub frequency: Frequency,
    /// STC never asserted within the poll limit
    pub timed_out: bool,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuneOutcome {
    fn format(&self, f: defmt::Formatter) {
        let found = matches!(self.status, TuneStatus::Tuned);
        defmt::write!(
            f,
            "TuneOutcome {{ found: {}, {}, timed_out: {} }}",
            found,
            self.frequency,
            self.timed_out
        );
    }
}

/// What one [`TuneController::step`] achieved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuneProgress {
    /// Nothing in flight
    Idle,
    /// Still working
    Pending,
    /// Seek still searching, currently at this frequency
    Searching(Frequency),
    /// Operation finished and the controller is idle again
    Done(TuneOutcome),
}

/// Tune/seek state machine
#[derive(Clone, Copy, Debug)]
pub struct TuneController {
    phase: TunePhase,
    request: Option<TuneRequest>,
    polls: u16,
    poll_limit: u16,
    seek_failed: bool,
    timed_out: bool,
}

impl TuneController {
    /// Create an idle controller with the default poll limit
    #[must_use]
    pub const fn new() -> Self {
        Self::with_poll_limit(TUNE_POLL_LIMIT)
    }

    /// Create an idle controller with a custom poll limit
    #[must_use]
    pub const fn with_poll_limit(poll_limit: u16) -> Self {
        Self {
            phase: TunePhase::Idle,
            request: None,
            polls: 0,
            poll_limit,
            seek_failed: false,
            timed_out: false,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> TunePhase {
        self.phase
    }

    /// True if no operation is in flight
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, TunePhase::Idle)
    }

    /// Request in flight, if any
    #[must_use]
    pub const fn request(&self) -> Option<TuneRequest> {
        self.request
    }

    /// Accept a new request
    ///
    /// # Errors
    ///
    /// `Error::Busy` if an operation is already in flight.
    pub fn begin(&mut self, request: TuneRequest) -> Result<()> {
        if !self.is_idle() {
            return Err(Error::Busy);
        }
        self.request = Some(request);
        self.phase = TunePhase::Tuning;
        self.polls = 0;
        self.seek_failed = false;
        self.timed_out = false;
        Ok(())
    }

    /// Advance the state machine by one phase or poll
    ///
    /// Bus errors are tolerated: a silent chip simply never raises STC and the
    /// poll limit completes the operation.
    pub fn step<B, D>(
        &mut self,
        shadow: &mut RegisterShadow<B>,
        delay: &mut D,
        mapper: &FrequencyMapper,
    ) -> TuneProgress
    where
        B: BusTransport,
        D: DelayNs,
    {
        let Some(request) = self.request else {
            self.phase = TunePhase::Idle;
            return TuneProgress::Idle;
        };

        match self.phase {
            TunePhase::Idle => TuneProgress::Idle,
            TunePhase::Tuning => {
                Self::start(request, shadow);
                delay.delay_ms(TUNE_SETTLE_MS);
                self.polls = 0;
                self.phase = TunePhase::AwaitingComplete;
                TuneProgress::Pending
            }
            TunePhase::AwaitingComplete => {
                let result = if request.is_seek() {
                    shadow.read_status_and_channel()
                } else {
                    shadow.read_status()
                };
                log_bus("status poll", result);
                delay.delay_ms(TUNE_POLL_INTERVAL_MS);
                self.polls += 1;

                let complete = shadow.regs().flag(reg::STC);
                if complete || self.polls >= self.poll_limit {
                    self.timed_out = !complete;
                    if request.is_seek() {
                        self.seek_failed = shadow.regs().flag(reg::SFBL);
                    }
                    if self.timed_out {
                        warn!("si4703 STC not seen after {} polls", self.polls);
                    }
                    self.phase = TunePhase::Clearing;
                    TuneProgress::Pending
                } else if request.is_seek() {
                    let channel = shadow.regs().field(reg::READCHAN);
                    TuneProgress::Searching(mapper.to_frequency(channel))
                } else {
                    TuneProgress::Pending
                }
            }
            TunePhase::Clearing => {
                log_bus("register read", shadow.read_all());
                let regs = shadow.regs_mut();
                regs.set_flag(reg::SEEK, false);
                regs.set_flag(reg::TUNE, false);
                log_bus("handshake clear", shadow.write_all(DEFAULT_WRITE_LIMIT));
                self.polls = 0;
                self.phase = TunePhase::AwaitingClear;
                TuneProgress::Pending
            }
            TunePhase::AwaitingClear => {
                log_bus("status poll", shadow.read_status());
                delay.delay_ms(TUNE_POLL_INTERVAL_MS);
                self.polls += 1;

                if shadow.regs().flag(reg::STC) && self.polls < self.poll_limit {
                    return TuneProgress::Pending;
                }

                TuneProgress::Done(self.finish(shadow, mapper))
            }
        }
    }

    /// Drive an accepted request to completion
    ///
    /// # Errors
    ///
    /// `Error::Busy` if an operation is already in flight.
    pub fn run<B, D>(
        &mut self,
        request: TuneRequest,
        shadow: &mut RegisterShadow<B>,
        delay: &mut D,
        mapper: &FrequencyMapper,
    ) -> Result<TuneOutcome>
    where
        B: BusTransport,
        D: DelayNs,
    {
        self.run_with_progress(request, shadow, delay, mapper, |_| {})
    }

    /// Like [`run`](Self::run), reporting the live frequency while a seek searches
    ///
    /// # Errors
    ///
    /// `Error::Busy` if an operation is already in flight.
    pub fn run_with_progress<B, D, F>(
        &mut self,
        request: TuneRequest,
        shadow: &mut RegisterShadow<B>,
        delay: &mut D,
        mapper: &FrequencyMapper,
        mut on_progress: F,
    ) -> Result<TuneOutcome>
    where
        B: BusTransport,
        D: DelayNs,
        F: FnMut(Frequency),
    {
        self.begin(request)?;
        loop {
            match self.step(shadow, delay, mapper) {
                TuneProgress::Done(outcome) => return Ok(outcome),
                TuneProgress::Searching(frequency) => on_progress(frequency),
                TuneProgress::Pending => {}
                // Only reachable if the request vanished mid-flight
                TuneProgress::Idle => return Err(Error::Busy),
            }
        }
    }

    /// Write the registers that start the request
    fn start<B: BusTransport>(request: TuneRequest, shadow: &mut RegisterShadow<B>) {
        match request {
            TuneRequest::Tune { channel } => {
                let regs = shadow.regs_mut();
                regs.set_field(reg::CHAN, channel);
                regs.set_flag(reg::TUNE, true);
                debug!("si4703 tune to channel {}", channel);
            }
            TuneRequest::Seek { direction, mode } => {
                log_bus("register read", shadow.read_all());
                let regs = shadow.regs_mut();
                regs.set_flag(reg::SEEK, true);
                regs.set_flag(reg::SEEKUP, direction == SeekDirection::Up);
                regs.set_flag(reg::SKMODE, mode == SeekMode::Stop);
                debug!("si4703 seek up: {}", direction == SeekDirection::Up);
            }
        }
        log_bus("start write", shadow.write_all(DEFAULT_WRITE_LIMIT));
    }

    /// Refresh READCHAN and return to idle
    fn finish<B: BusTransport>(
        &mut self,
        shadow: &mut RegisterShadow<B>,
        mapper: &FrequencyMapper,
    ) -> TuneOutcome {
        log_bus("channel refresh", shadow.read_all());
        let channel = shadow.regs().field(reg::READCHAN);

        let status = if self.seek_failed {
            TuneStatus::NotFound
        } else {
            TuneStatus::Tuned
        };
        let outcome = TuneOutcome {
            status,
            channel,
            frequency: mapper.to_frequency(channel),
            timed_out: self.timed_out,
        };

        self.phase = TunePhase::Idle;
        self.request = None;
        outcome
    }
}

/// Bus failures mid-tune are not fatal; STC polling is bounded
fn log_bus(what: &str, result: BusResult<()>) {
    if let Err(e) = result {
        trace!("si4703 tune {} failed: {}", what, e);
    }
}

impl Default for TuneController {
    fn default() -> Self {
        Self::new()
    }
}
