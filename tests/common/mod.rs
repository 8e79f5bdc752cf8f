//! Shared test fixtures
//!
//! `SimChip` is a register-level model of the Si4703 behind a `BusTransport`:
//! writes land at POWERCFG and up, reads start at STATUSRSSI and wrap past
//! RDSD, and TUNE/SEEK complete after a configurable number of status reads.
//! `FakeDelay` records every wait instead of sleeping.

#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use si4703_radio::bus::{Ack, BusTransport};

pub const DEVICE_ID: u16 = 0x1242;
pub const CHIP_ID: u16 = 0x1253;

const STATUS: usize = 0x0A;
const READCHAN: usize = 0x0B;

const STC: u16 = 1 << 14;
const SF_BL: u16 = 1 << 13;
const RDSR: u16 = 1 << 15;
const ST: u16 = 1 << 8;
const TUNE: u16 = 1 << 15;
const SEEK: u16 = 1 << 8;
const CHAN_MASK: u16 = 0x03FF;

/// Where an RDS group lands: blocks A..D plus BLERA..BLERD
#[derive(Clone, Copy, Debug)]
pub struct RdsInjection {
    pub blocks: [u16; 4],
    pub errors: [u8; 4],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Address,
    Write { reg: usize, high: Option<u8>, bytes: usize },
    Read { reg: usize, high_next: bool, words: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Tune(u16),
    Seek,
}

/// Simulated Si4703
#[derive(Debug)]
pub struct SimChip {
    pub regs: [u16; 16],
    /// Chip answers its address
    pub present: bool,
    /// NACK the data byte with this index in every write (0 = first data byte)
    pub nack_data_byte: Option<usize>,
    /// STC never asserts
    pub never_complete: bool,
    /// Status reads before STC asserts after a tune or seek starts
    pub reads_to_complete: u32,
    /// Channel a seek stops at; `None` makes the seek fail
    pub seek_target: Option<u16>,
    /// READCHAN reported after a failed seek
    pub seek_fail_channel: u16,
    /// Acknowledge bits the master sent while reading, per transaction
    pub read_acks: Vec<Vec<Ack>>,
    /// Register words received per write transaction
    pub write_log: Vec<Vec<u16>>,
    /// Number of words clocked out per read transaction
    pub read_log: Vec<usize>,
    /// Tune/seek commands observed
    pub commands: Vec<&'static str>,
    rds_queue: VecDeque<RdsInjection>,
    phase: Phase,
    pending: Option<Pending>,
    countdown: u32,
    current_write: Vec<u16>,
    current_acks: Vec<Ack>,
}

impl SimChip {
    pub fn new() -> Self {
        let mut regs = [0u16; 16];
        regs[0x00] = DEVICE_ID;
        regs[0x01] = CHIP_ID;
        regs[0x07] = 0x0100;
        Self {
            regs,
            present: true,
            nack_data_byte: None,
            never_complete: false,
            reads_to_complete: 1,
            seek_target: None,
            seek_fail_channel: 0,
            read_acks: Vec::new(),
            write_log: Vec::new(),
            read_log: Vec::new(),
            commands: Vec::new(),
            rds_queue: VecDeque::new(),
            phase: Phase::Idle,
            pending: None,
            countdown: 0,
            current_write: Vec::new(),
            current_acks: Vec::new(),
        }
    }

    pub fn absent() -> Self {
        Self {
            present: false,
            ..Self::new()
        }
    }

    pub fn reg(&self, addr: usize) -> u16 {
        self.regs[addr]
    }

    pub fn set_reg(&mut self, addr: usize, value: u16) {
        self.regs[addr] = value;
    }

    pub fn set_rssi(&mut self, rssi: u8, stereo: bool) {
        let status = self.regs[STATUS] & !0x01FF;
        self.regs[STATUS] = status | u16::from(rssi) | if stereo { ST } else { 0 };
    }

    /// Queue an RDS group; RDSR stays set while groups are waiting
    pub fn push_rds(&mut self, blocks: [u16; 4]) {
        self.push_rds_with_errors(blocks, [0; 4]);
    }

    pub fn push_rds_with_errors(&mut self, blocks: [u16; 4], errors: [u8; 4]) {
        self.rds_queue.push_back(RdsInjection { blocks, errors });
        if self.rds_queue.len() == 1 {
            self.load_rds();
        }
    }

    pub fn rds_pending(&self) -> usize {
        self.rds_queue.len()
    }

    fn load_rds(&mut self) {
        match self.rds_queue.front() {
            Some(group) => {
                self.regs[0x0C..=0x0F].copy_from_slice(&group.blocks);
                let [a, b, c, d] = group.errors.map(|e| u16::from(e & 0x03));
                self.regs[STATUS] = (self.regs[STATUS] & !(0x03 << 9)) | (a << 9) | RDSR;
                self.regs[READCHAN] =
                    (self.regs[READCHAN] & CHAN_MASK) | (b << 14) | (c << 12) | (d << 10);
            }
            None => self.regs[STATUS] &= !RDSR,
        }
    }

    fn status_read_done(&mut self, words: usize) {
        if words >= 6 && self.regs[STATUS] & RDSR != 0 {
            self.rds_queue.pop_front();
            self.load_rds();
        }

        let Some(pending) = self.pending else {
            return;
        };
        if self.never_complete {
            if pending == Pending::Seek {
                // the chip keeps searching
                self.advance_search();
            }
            return;
        }
        if self.countdown > 1 {
            self.countdown -= 1;
            if pending == Pending::Seek {
                self.advance_search();
            }
            return;
        }

        self.pending = None;
        match pending {
            Pending::Tune(channel) => self.set_readchan(channel),
            Pending::Seek => match self.seek_target {
                Some(channel) => self.set_readchan(channel),
                None => {
                    self.set_readchan(self.seek_fail_channel);
                    self.regs[STATUS] |= SF_BL;
                }
            },
        }
        self.regs[STATUS] |= STC;
    }

    fn advance_search(&mut self) {
        let channel = (self.regs[READCHAN] & CHAN_MASK) + 1;
        self.set_readchan(channel & CHAN_MASK);
    }

    fn set_readchan(&mut self, channel: u16) {
        self.regs[READCHAN] = (self.regs[READCHAN] & !CHAN_MASK) | (channel & CHAN_MASK);
    }

    fn write_done(&mut self) {
        let tune = self.regs[0x03] & TUNE != 0;
        let seek = self.regs[0x02] & SEEK != 0;

        if !tune && !seek {
            self.pending = None;
            self.regs[STATUS] &= !(STC | SF_BL);
            return;
        }
        if self.pending.is_some() || self.regs[STATUS] & STC != 0 {
            return;
        }

        self.regs[STATUS] &= !SF_BL;
        self.countdown = self.reads_to_complete.max(1);
        if tune {
            self.commands.push("tune");
            self.pending = Some(Pending::Tune(self.regs[0x03] & CHAN_MASK));
        } else {
            self.commands.push("seek");
            self.pending = Some(Pending::Seek);
        }
    }
}

impl Default for SimChip {
    fn default() -> Self {
        Self::new()
    }
}

impl BusTransport for SimChip {
    fn start(&mut self) {
        self.phase = Phase::Address;
    }

    fn write_byte(&mut self, byte: u8) -> Ack {
        match self.phase {
            Phase::Address => {
                if !self.present || byte >> 1 != 0x10 {
                    self.phase = Phase::Idle;
                    return Ack::Nack;
                }
                self.phase = if byte & 1 == 1 {
                    self.current_acks.clear();
                    Phase::Read {
                        reg: STATUS,
                        high_next: true,
                        words: 0,
                    }
                } else {
                    self.current_write.clear();
                    Phase::Write {
                        reg: 0x02,
                        high: None,
                        bytes: 0,
                    }
                };
                Ack::Ack
            }
            Phase::Write { reg, high, bytes } => {
                if self.nack_data_byte == Some(bytes) || reg > 0x0F {
                    self.write_log.push(std::mem::take(&mut self.current_write));
                    self.phase = Phase::Idle;
                    return Ack::Nack;
                }
                self.phase = match high {
                    None => Phase::Write {
                        reg,
                        high: Some(byte),
                        bytes: bytes + 1,
                    },
                    Some(h) => {
                        let value = u16::from_be_bytes([h, byte]);
                        // status and RDS registers are read-only
                        if reg < STATUS {
                            self.regs[reg] = value;
                        }
                        self.current_write.push(value);
                        Phase::Write {
                            reg: reg + 1,
                            high: None,
                            bytes: bytes + 1,
                        }
                    }
                };
                Ack::Ack
            }
            _ => Ack::Nack,
        }
    }

    fn read_byte(&mut self, ack: Ack) -> u8 {
        let Phase::Read {
            reg,
            high_next,
            words,
        } = self.phase
        else {
            return 0xFF;
        };
        self.current_acks.push(ack);
        let [high, low] = self.regs[reg].to_be_bytes();
        if high_next {
            self.phase = Phase::Read {
                reg,
                high_next: false,
                words,
            };
            high
        } else {
            self.phase = Phase::Read {
                reg: (reg + 1) % 16,
                high_next: true,
                words: words + 1,
            };
            low
        }
    }

    fn stop(&mut self) {
        match self.phase {
            Phase::Write { .. } => {
                self.write_log.push(std::mem::take(&mut self.current_write));
                self.write_done();
            }
            Phase::Read { words, .. } => {
                self.read_acks.push(std::mem::take(&mut self.current_acks));
                self.read_log.push(words);
                self.status_read_done(words);
            }
            _ => {}
        }
        self.phase = Phase::Idle;
    }
}

/// Delay provider that only keeps count
#[derive(Clone, Copy, Debug, Default)]
pub struct FakeDelay {
    pub total_ns: u64,
    pub calls: usize,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }
}

/// Build a STATUSRSSI-relative block B for an RDS group
pub fn block_b(group_type: u16, version_b: bool, text_ab: bool, address: u16) -> u16 {
    (group_type << 12) | (u16::from(version_b) << 11) | (u16::from(text_ab) << 4) | address
}
