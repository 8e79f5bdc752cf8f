//! Si4703 register map
//!
//! Sixteen 16-bit registers, 0x00 through 0x0F. Every named bitfield is a
//! [`Field`] constant (register, shift, width) so the rest of the crate never
//! handles raw masks.

/// Register address
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Register {
    /// Part number and manufacturer ID (read-only)
    DeviceId = 0x00,
    /// Revision, device and firmware (read-only)
    ChipId = 0x01,
    /// Power configuration
    PowerCfg = 0x02,
    /// Channel and tune bit
    Channel = 0x03,
    /// System configuration 1
    SysConfig1 = 0x04,
    /// System configuration 2
    SysConfig2 = 0x05,
    /// System configuration 3
    SysConfig3 = 0x06,
    /// Oscillator and audio high-Z control
    Test1 = 0x07,
    /// Reserved test register
    Test2 = 0x08,
    /// Reserved boot configuration
    BootConfig = 0x09,
    /// Status and RSSI
    StatusRssi = 0x0A,
    /// Current channel and block error levels
    ReadChan = 0x0B,
    /// RDS block A
    RdsA = 0x0C,
    /// RDS block B
    RdsB = 0x0D,
    /// RDS block C
    RdsC = 0x0E,
    /// RDS block D
    RdsD = 0x0F,
}

impl Register {
    /// Number of registers
    pub const COUNT: usize = 16;

    /// First register a write transaction lands on
    pub const FIRST_WRITABLE: Self = Self::PowerCfg;

    /// First register a read transaction returns
    pub const FIRST_READ: Self = Self::StatusRssi;

    /// All registers in address order
    pub const ALL: [Self; 16] = [
        Self::DeviceId,
        Self::ChipId,
        Self::PowerCfg,
        Self::Channel,
        Self::SysConfig1,
        Self::SysConfig2,
        Self::SysConfig3,
        Self::Test1,
        Self::Test2,
        Self::BootConfig,
        Self::StatusRssi,
        Self::ReadChan,
        Self::RdsA,
        Self::RdsB,
        Self::RdsC,
        Self::RdsD,
    ];

    /// Register for an address, if in range
    #[must_use]
    pub const fn from_addr(addr: u8) -> Option<Self> {
        if (addr as usize) < Self::COUNT {
            Some(Self::ALL[addr as usize])
        } else {
            None
        }
    }

    /// Register address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Index into a register array
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Identification registers cannot be written
    #[must_use]
    pub const fn is_writable(self) -> bool {
        self.addr() >= Self::FIRST_WRITABLE.addr()
    }
}

/// A bitfield within one register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// Register holding the field
    pub reg: Register,
    /// Position of the least significant bit
    pub shift: u8,
    /// Width in bits
    pub width: u8,
}

impl Field {
    /// Define a multi-bit field
    #[must_use]
    pub const fn new(reg: Register, shift: u8, width: u8) -> Self {
        Self { reg, shift, width }
    }

    /// Define a single-bit flag
    #[must_use]
    pub const fn bit(reg: Register, bit: u8) -> Self {
        Self::new(reg, bit, 1)
    }

    /// Unshifted mask (`width` ones)
    #[must_use]
    pub const fn max(self) -> u16 {
        if self.width >= 16 {
            u16::MAX
        } else {
            (1u16 << self.width) - 1
        }
    }

    /// Mask in register position
    #[must_use]
    pub const fn mask(self) -> u16 {
        self.max() << self.shift
    }

    /// Extract the field from a register value
    #[must_use]
    pub const fn extract(self, value: u16) -> u16 {
        (value >> self.shift) & self.max()
    }

    /// Replace the field in a register value; excess bits are truncated
    #[must_use]
    pub const fn insert(self, value: u16, field: u16) -> u16 {
        (value & !self.mask()) | ((field & self.max()) << self.shift)
    }
}

// DEVICEID
/// Part number
pub const PN: Field = Field::new(Register::DeviceId, 12, 4);
/// Manufacturer ID
pub const MFGID: Field = Field::new(Register::DeviceId, 0, 12);

// CHIPID
/// Chip revision
pub const REV: Field = Field::new(Register::ChipId, 10, 6);
/// Device (Si4700/01/02/03)
pub const DEV: Field = Field::new(Register::ChipId, 6, 4);
/// Firmware version
pub const FIRMWARE: Field = Field::new(Register::ChipId, 0, 6);

// POWERCFG
/// Softmute disable
pub const DSMUTE: Field = Field::bit(Register::PowerCfg, 15);
/// Mute disable
pub const DMUTE: Field = Field::bit(Register::PowerCfg, 14);
/// Force mono
pub const MONO: Field = Field::bit(Register::PowerCfg, 13);
/// RDS verbose mode
pub const RDSM: Field = Field::bit(Register::PowerCfg, 11);
/// Seek mode (1 = stop at band limit)
pub const SKMODE: Field = Field::bit(Register::PowerCfg, 10);
/// Seek direction (1 = up)
pub const SEEKUP: Field = Field::bit(Register::PowerCfg, 9);
/// Start seek
pub const SEEK: Field = Field::bit(Register::PowerCfg, 8);
/// Power-down request
pub const DISABLE: Field = Field::bit(Register::PowerCfg, 6);
/// Power-up enable
pub const ENABLE: Field = Field::bit(Register::PowerCfg, 0);

// CHANNEL
/// Start tune
pub const TUNE: Field = Field::bit(Register::Channel, 15);
/// Channel select
pub const CHAN: Field = Field::new(Register::Channel, 0, 10);

// SYSCONFIG1
/// RDS interrupt enable
pub const RDSIEN: Field = Field::bit(Register::SysConfig1, 15);
/// Seek/tune complete interrupt enable
pub const STCIEN: Field = Field::bit(Register::SysConfig1, 14);
/// RDS enable
pub const RDS: Field = Field::bit(Register::SysConfig1, 12);
/// De-emphasis (1 = 50 µs)
pub const DE: Field = Field::bit(Register::SysConfig1, 11);
/// AGC disable
pub const AGCD: Field = Field::bit(Register::SysConfig1, 10);
/// Stereo/mono blend level adjustment
pub const BLNDADJ: Field = Field::new(Register::SysConfig1, 6, 2);
/// GPIO3 function
pub const GPIO3: Field = Field::new(Register::SysConfig1, 4, 2);
/// GPIO2 function
pub const GPIO2: Field = Field::new(Register::SysConfig1, 2, 2);
/// GPIO1 function
pub const GPIO1: Field = Field::new(Register::SysConfig1, 0, 2);

// SYSCONFIG2
/// RSSI seek threshold
pub const SEEKTH: Field = Field::new(Register::SysConfig2, 8, 8);
/// Band select
pub const BAND: Field = Field::new(Register::SysConfig2, 6, 2);
/// Channel spacing
pub const SPACE: Field = Field::new(Register::SysConfig2, 4, 2);
/// Volume
pub const VOLUME: Field = Field::new(Register::SysConfig2, 0, 4);

// SYSCONFIG3
/// Softmute attack/recover rate
pub const SMUTER: Field = Field::new(Register::SysConfig3, 14, 2);
/// Softmute attenuation
pub const SMUTEA: Field = Field::new(Register::SysConfig3, 12, 2);
/// Extended volume range
pub const VOLEXT: Field = Field::bit(Register::SysConfig3, 8);
/// Seek SNR threshold
pub const SKSNR: Field = Field::new(Register::SysConfig3, 4, 4);
/// Seek FM impulse detection threshold
pub const SKCNT: Field = Field::new(Register::SysConfig3, 0, 4);

// TEST1
/// Crystal oscillator enable
pub const XOSCEN: Field = Field::bit(Register::Test1, 15);
/// Audio high-Z enable
pub const AHIZEN: Field = Field::bit(Register::Test1, 14);

// STATUSRSSI
/// RDS group ready
pub const RDSR: Field = Field::bit(Register::StatusRssi, 15);
/// Seek/tune complete
pub const STC: Field = Field::bit(Register::StatusRssi, 14);
/// Seek fail / band limit
pub const SFBL: Field = Field::bit(Register::StatusRssi, 13);
/// AFC rail
pub const AFCRL: Field = Field::bit(Register::StatusRssi, 12);
/// RDS synchronized
pub const RDSS: Field = Field::bit(Register::StatusRssi, 11);
/// RDS block A errors
pub const BLERA: Field = Field::new(Register::StatusRssi, 9, 2);
/// Stereo indicator
pub const ST: Field = Field::bit(Register::StatusRssi, 8);
/// Received signal strength (dBµV)
pub const RSSI: Field = Field::new(Register::StatusRssi, 0, 8);

// READCHAN
/// RDS block B errors
pub const BLERB: Field = Field::new(Register::ReadChan, 14, 2);
/// RDS block C errors
pub const BLERC: Field = Field::new(Register::ReadChan, 12, 2);
/// RDS block D errors
pub const BLERD: Field = Field::new(Register::ReadChan, 10, 2);
/// Channel currently tuned
pub const READCHAN: Field = Field::new(Register::ReadChan, 0, 10);

/// Address-indexed register values
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RegisterFile([u16; Register::COUNT]);

impl RegisterFile {
    /// All registers zero
    #[must_use]
    pub const fn new() -> Self {
        Self([0; Register::COUNT])
    }

    /// Build from raw values (e.g. a bus read)
    #[must_use]
    pub const fn from_raw(values: [u16; Register::COUNT]) -> Self {
        Self(values)
    }

    /// Raw values in address order
    #[must_use]
    pub const fn raw(&self) -> &[u16; Register::COUNT] {
        &self.0
    }

    /// Register value
    #[must_use]
    pub const fn get(&self, reg: Register) -> u16 {
        self.0[reg.index()]
    }

    /// Set a writable register; identification registers are left untouched
    pub fn set(&mut self, reg: Register, value: u16) {
        if reg.is_writable() {
            self.0[reg.index()] = value;
        }
    }

    /// Store a value read back from the device, including read-only registers
    pub(crate) fn store(&mut self, reg: Register, value: u16) {
        self.0[reg.index()] = value;
    }

    /// Field value
    #[must_use]
    pub const fn field(&self, field: Field) -> u16 {
        field.extract(self.get(field.reg))
    }

    /// Single-bit flag value
    #[must_use]
    pub const fn flag(&self, field: Field) -> bool {
        self.field(field) != 0
    }

    /// Replace a field, truncating `value` to the field width
    pub fn set_field(&mut self, field: Field, value: u16) {
        let current = self.get(field.reg);
        self.set(field.reg, field.insert(current, value));
    }

    /// Set or clear a single-bit flag
    pub fn set_flag(&mut self, field: Field, on: bool) {
        self.set_field(field, u16::from(on));
    }
}
