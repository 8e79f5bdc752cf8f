//! Si4703 device facade
//!
//! [`Si4703`] owns everything the receiver needs: the register shadow, the
//! power sequencer, the tune controller, the RDS decoder and the cached
//! [`DeviceState`]. Every setter stages its change in the shadow and writes
//! POWERCFG..TEST1 in one transaction.
//!
//! Bus failures are logged and otherwise ignored; an absent chip behaves like
//! one that never changes its registers.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;

use crate::bus::{BusResult, BusTransport};
use crate::config::RadioConfig;
use crate::error::Result;
use crate::power::{PowerSequencer, PowerState};
use crate::radio::{DeviceState, TuneController, TuneOutcome, TuneProgress, TuneRequest, TuneStatus};
use crate::rds::{RdsDecoder, RdsUpdate, SidebandGroup};
use crate::registers::{self as reg, Field, RegisterFile};
use crate::shadow::{RegisterShadow, DEFAULT_WRITE_LIMIT};
use crate::types::{
    Band, DeEmphasis, Frequency, RdsMode, SeekDirection, SeekMode, Spacing, StepDirection, Volume,
};

/// Si4703 FM receiver
pub struct Si4703<B, D> {
    shadow: RegisterShadow<B>,
    delay: D,
    power: PowerSequencer,
    tuner: TuneController,
    decoder: RdsDecoder,
    state: DeviceState,
    last_outcome: Option<TuneOutcome>,
}

impl<B: BusTransport, D: DelayNs> Si4703<B, D> {
    /// Create a receiver; call [`setup`](Self::setup) to power it up
    pub fn new(bus: B, delay: D, config: RadioConfig) -> Self {
        Self::with_sequencer(bus, delay, PowerSequencer::new(config))
    }

    /// Create a receiver from a sequencer that has already pulsed reset
    pub fn with_sequencer(bus: B, delay: D, power: PowerSequencer) -> Self {
        let config = *power.config();
        Self {
            shadow: RegisterShadow::new(bus),
            delay,
            power,
            tuner: TuneController::new(),
            decoder: RdsDecoder::with_error_limit(config.rds_error_limit),
            state: DeviceState::new(&config),
            last_outcome: None,
        }
    }

    /// Power up with the configured defaults and tune the initial frequency
    pub fn setup(&mut self) {
        let config = *self.power.config();
        let result = self.power.power_up(&mut self.shadow, &mut self.delay);
        Self::log_bus("power-up", result);

        self.state = DeviceState::new(&config);
        self.decoder = RdsDecoder::with_error_limit(config.rds_error_limit);
        let _ = self.set_frequency(config.initial_frequency);
    }

    /// Put the chip into its low-power state
    pub fn power_down(&mut self) {
        let result = self.power.power_down(&mut self.shadow, &mut self.delay);
        Self::log_bus("power-down", result);
    }

    /// Current power state
    #[must_use]
    pub const fn power_state(&self) -> PowerState {
        self.power.state()
    }

    /// Release the bus and delay provider
    pub fn release(self) -> (B, D) {
        (self.shadow.release(), self.delay)
    }

    /// Direct access to the bus, bypassing the shadow
    pub fn bus_mut(&mut self) -> &mut B {
        self.shadow.bus_mut()
    }

    // ========================================================================
    // Tuning
    // ========================================================================

    /// Tune to the grid point nearest `frequency`
    ///
    /// # Errors
    ///
    /// `Error::Busy` if a cooperative tune started with [`begin`](Self::begin)
    /// has not finished.
    pub fn set_frequency(&mut self, frequency: Frequency) -> Result<TuneOutcome> {
        let channel = self.state.mapper().snap(frequency);
        self.set_channel(channel)
    }

    /// Tune to a channel number
    ///
    /// # Errors
    ///
    /// `Error::Busy` if another tune or seek is in flight.
    pub fn set_channel(&mut self, channel: u16) -> Result<TuneOutcome> {
        let channel = channel.min(self.state.mapper().top_channel());
        self.run(TuneRequest::Tune { channel }, |_| {})
    }

    /// Step one channel up or down, wrapping at the band edges
    ///
    /// # Errors
    ///
    /// `Error::Busy` if another tune or seek is in flight.
    pub fn step(&mut self, direction: StepDirection) -> Result<TuneOutcome> {
        let mapper = *self.state.mapper();
        let next = match direction {
            StepDirection::Up => mapper.step_up(self.state.frequency()),
            StepDirection::Down => mapper.step_down(self.state.frequency()),
        };
        self.set_frequency(next)
    }

    /// Step one channel up
    ///
    /// # Errors
    ///
    /// `Error::Busy` if another tune or seek is in flight.
    pub fn frequency_up(&mut self) -> Result<TuneOutcome> {
        self.step(StepDirection::Up)
    }

    /// Step one channel down
    ///
    /// # Errors
    ///
    /// `Error::Busy` if another tune or seek is in flight.
    pub fn frequency_down(&mut self) -> Result<TuneOutcome> {
        self.step(StepDirection::Down)
    }

    /// Seek to the next station
    ///
    /// # Errors
    ///
    /// `Error::Busy` if another tune or seek is in flight.
    pub fn seek(&mut self, direction: SeekDirection, mode: SeekMode) -> Result<TuneOutcome> {
        self.run(TuneRequest::Seek { direction, mode }, |_| {})
    }

    /// Seek, reporting the frequency being examined while the chip searches
    ///
    /// # Errors
    ///
    /// `Error::Busy` if another tune or seek is in flight.
    pub fn seek_with_progress<F>(
        &mut self,
        direction: SeekDirection,
        mode: SeekMode,
        on_progress: F,
    ) -> Result<TuneOutcome>
    where
        F: FnMut(Frequency),
    {
        self.run(TuneRequest::Seek { direction, mode }, on_progress)
    }

    /// Start a tune or seek without waiting for it
    ///
    /// Drive it with [`poll_tune`](Self::poll_tune).
    ///
    /// # Errors
    ///
    /// `Error::Busy` if another tune or seek is in flight.
    pub fn begin(&mut self, request: TuneRequest) -> Result<()> {
        let request = match request {
            TuneRequest::Tune { channel } => TuneRequest::Tune {
                channel: channel.min(self.state.mapper().top_channel()),
            },
            seek @ TuneRequest::Seek { .. } => seek,
        };
        self.tuner.begin(request)
    }

    /// Advance a tune or seek started with [`begin`](Self::begin)
    pub fn poll_tune(&mut self) -> TuneProgress {
        let mapper = *self.state.mapper();
        let progress = self.tuner.step(&mut self.shadow, &mut self.delay, &mapper);
        if let TuneProgress::Done(outcome) = progress {
            self.complete(outcome);
        }
        progress
    }

    /// True if no tune or seek is in flight
    #[must_use]
    pub const fn is_tune_idle(&self) -> bool {
        self.tuner.is_idle()
    }

    /// Outcome of the most recent tune or seek
    #[must_use]
    pub const fn last_outcome(&self) -> Option<TuneOutcome> {
        self.last_outcome
    }

    /// Cached tuned frequency
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.state.frequency()
    }

    /// Frequency the chip reports right now (reads READCHAN)
    pub fn real_frequency(&mut self) -> Frequency {
        self.refresh();
        self.state
            .mapper()
            .to_frequency(self.shadow.regs().field(reg::READCHAN))
    }

    /// Cached frequency formatted as MHz, e.g. "106.50"
    #[must_use]
    pub fn frequency_string(&self) -> heapless::String<8> {
        let mut s = heapless::String::new();
        let _ = write!(s, "{}", self.state.frequency());
        s
    }

    fn run<F>(&mut self, request: TuneRequest, on_progress: F) -> Result<TuneOutcome>
    where
        F: FnMut(Frequency),
    {
        let mapper = *self.state.mapper();
        let outcome = self.tuner.run_with_progress(
            request,
            &mut self.shadow,
            &mut self.delay,
            &mapper,
            on_progress,
        )?;
        self.complete(outcome);
        Ok(outcome)
    }

    fn complete(&mut self, outcome: TuneOutcome) {
        self.state = self.state.with_channel(outcome.channel);
        self.last_outcome = Some(outcome);
        self.decoder.clear();

        if outcome.status == TuneStatus::NotFound {
            info!("seek found nothing, at {}", self.state.frequency());
        } else {
            info!("tuned to {}", self.state.frequency());
        }
    }

    // ========================================================================
    // Audio
    // ========================================================================

    /// Current volume
    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.state.volume()
    }

    /// Set the volume; levels above 15 are clamped
    pub fn set_volume(&mut self, level: u8) {
        let volume = Volume::new(level);
        self.update_field(reg::VOLUME, u16::from(volume.level()));
        self.state = self.state.with_volume(volume);
    }

    /// One step louder
    pub fn volume_up(&mut self) {
        self.set_volume(self.state.volume().up().level());
    }

    /// One step quieter
    pub fn volume_down(&mut self) {
        self.set_volume(self.state.volume().down().level());
    }

    /// Extend the volume range downward by 30 dB
    pub fn set_extended_volume(&mut self, enabled: bool) {
        self.update_flag(reg::VOLEXT, enabled);
    }

    /// Mute or unmute the audio
    pub fn set_mute(&mut self, mute: bool) {
        self.update_flag(reg::DMUTE, !mute);
        self.state = self.state.with_mute(mute);
    }

    /// Check if muted
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.state.is_muted()
    }

    /// Force mono output
    pub fn set_mono(&mut self, mono: bool) {
        self.update_flag(reg::MONO, mono);
        self.state = self.state.with_mono(mono);
    }

    /// Check if mono is forced
    #[must_use]
    pub const fn is_mono(&self) -> bool {
        self.state.is_mono()
    }

    /// Enable soft muting on weak signals
    pub fn set_softmute(&mut self, enabled: bool) {
        self.update_flag(reg::DSMUTE, !enabled);
    }

    /// Soft mute attack/recover rate (0 = fastest .. 3 = slowest)
    pub fn set_softmute_rate(&mut self, rate: u8) {
        self.update_field(reg::SMUTER, u16::from(rate));
    }

    /// Soft mute attenuation (0 = 16 dB .. 3 = 10 dB)
    pub fn set_softmute_attenuation(&mut self, attenuation: u8) {
        self.update_field(reg::SMUTEA, u16::from(attenuation));
    }

    /// Enable automatic gain control
    pub fn set_agc(&mut self, enabled: bool) {
        self.update_flag(reg::AGCD, !enabled);
    }

    /// Select the de-emphasis time constant
    pub fn set_de_emphasis(&mut self, de_emphasis: DeEmphasis) {
        self.update_flag(reg::DE, de_emphasis == DeEmphasis::Us50);
    }

    // ========================================================================
    // Band plan and seek tuning
    // ========================================================================

    /// Current band
    #[must_use]
    pub const fn band(&self) -> Band {
        self.state.band()
    }

    /// Change band and retune to the nearest frequency in it
    pub fn set_band(&mut self, band: Band) {
        self.update_field(reg::BAND, u16::from(band.index()));
        self.state = self.state.with_band(band);
        let _ = self.set_frequency(self.state.frequency());
    }

    /// Current channel spacing
    #[must_use]
    pub const fn spacing(&self) -> Spacing {
        self.state.spacing()
    }

    /// Change spacing and retune to the nearest grid point
    pub fn set_spacing(&mut self, spacing: Spacing) {
        self.update_field(reg::SPACE, u16::from(spacing.index()));
        self.state = self.state.with_spacing(spacing);
        let _ = self.set_frequency(self.state.frequency());
    }

    /// Minimum RSSI for a seek to stop on a station
    pub fn set_seek_threshold(&mut self, threshold: u8) {
        self.update_field(reg::SEEKTH, u16::from(threshold));
    }

    /// Seek SNR and impulse-count thresholds (4 bits each, 0 disables)
    pub fn set_seek_quality(&mut self, snr: u8, impulse: u8) {
        self.shadow.regs_mut().set_field(reg::SKSNR, u16::from(snr));
        self.update_field(reg::SKCNT, u16::from(impulse));
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Received signal strength in dBµV
    #[allow(clippy::cast_possible_truncation)]
    pub fn rssi(&mut self) -> u8 {
        self.refresh_status();
        self.shadow.regs().field(reg::RSSI) as u8
    }

    /// True if the chip is decoding stereo
    pub fn is_stereo(&mut self) -> bool {
        self.refresh_status();
        self.shadow.regs().flag(reg::ST)
    }

    /// Cached receiver state
    #[must_use]
    pub const fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Register shadow contents
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        self.shadow.regs()
    }

    // ========================================================================
    // RDS
    // ========================================================================

    /// Enable or disable the RDS decoder
    pub fn set_rds(&mut self, enabled: bool) {
        self.update_flag(reg::RDS, enabled);
        self.state = self.state.with_rds(enabled);
        if !enabled {
            self.decoder.clear();
        }
    }

    /// Select standard or verbose RDS reporting
    pub fn set_rds_mode(&mut self, mode: RdsMode) {
        self.update_flag(reg::RDSM, mode == RdsMode::Verbose);
    }

    /// True if a new RDS group is waiting
    pub fn rds_ready(&mut self) -> bool {
        self.refresh_status();
        self.shadow.regs().flag(reg::RDSR)
    }

    /// True if the RDS decoder is synchronized (verbose mode only)
    pub fn rds_synchronized(&mut self) -> bool {
        self.refresh_status();
        self.shadow.regs().flag(reg::RDSS)
    }

    /// Decode the waiting RDS group, if any
    pub fn poll_rds(&mut self) -> Option<RdsUpdate> {
        if !self.state.rds_enabled() || !self.rds_ready() {
            return None;
        }
        if let Err(e) = self.shadow.read_sideband() {
            Self::log_bus("rds read", Err(e));
            return None;
        }
        let group = SidebandGroup::from_registers(self.shadow.regs());
        self.decoder.ingest(&group)
    }

    /// Decoded RDS data
    #[must_use]
    pub const fn rds(&self) -> &RdsDecoder {
        &self.decoder
    }

    /// Forget all decoded RDS data
    pub fn clear_rds(&mut self) {
        self.decoder.clear();
    }

    // ========================================================================
    // Identification
    // ========================================================================

    /// Part number (DEVICEID.PN)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn part_number(&self) -> u8 {
        self.shadow.regs().field(reg::PN) as u8
    }

    /// Manufacturer ID (DEVICEID.MFGID)
    #[must_use]
    pub const fn manufacturer_id(&self) -> u16 {
        self.shadow.regs().field(reg::MFGID)
    }

    /// Firmware version (CHIPID.FIRMWARE)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn firmware_version(&self) -> u8 {
        self.shadow.regs().field(reg::FIRMWARE) as u8
    }

    /// Device (CHIPID.DEV)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn device_id(&self) -> u8 {
        self.shadow.regs().field(reg::DEV) as u8
    }

    /// Chip revision (CHIPID.REV)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn chip_version(&self) -> u8 {
        self.shadow.regs().field(reg::REV) as u8
    }

    /// True if the chip acknowledges its address
    pub fn is_present(&mut self) -> bool {
        self.shadow.read_status().is_ok()
    }

    // ========================================================================
    // Shadow helpers
    // ========================================================================

    fn update_field(&mut self, field: Field, value: u16) {
        self.shadow.regs_mut().set_field(field, value);
        self.commit();
    }

    fn update_flag(&mut self, field: Field, on: bool) {
        self.shadow.regs_mut().set_flag(field, on);
        self.commit();
    }

    fn commit(&mut self) {
        let result = self.shadow.write_all(DEFAULT_WRITE_LIMIT);
        Self::log_bus("register write", result);
    }

    fn refresh(&mut self) {
        let result = self.shadow.read_all();
        Self::log_bus("register read", result);
    }

    fn refresh_status(&mut self) {
        let result = self.shadow.read_status();
        Self::log_bus("status read", result);
    }

    fn log_bus(what: &str, result: BusResult<()>) {
        if let Err(e) = result {
            debug!("si4703 {} failed: {}", what, e);
        }
    }
}
