//! RDS group fields
//!
//! Block B layout (all group types):
//!
//! ```text
//!  15..12  11   10   9..5   4..0
//!  type    B0   TP   PTY    type-specific (A/B flag, segment address)
//! ```

use crate::registers::{self as reg, Register, RegisterFile};

/// Group version (B0 bit)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupVersion {
    /// Version A: block C carries data
    A,
    /// Version B: block C repeats the PI code
    B,
}

/// One received RDS group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SidebandGroup {
    blocks: [u16; 4],
    errors: [u8; 4],
}

impl SidebandGroup {
    /// Group from four error-free blocks
    #[must_use]
    pub const fn new(a: u16, b: u16, c: u16, d: u16) -> Self {
        Self {
            blocks: [a, b, c, d],
            errors: [0; 4],
        }
    }

    /// Attach per-block error levels (0 = none .. 3 = uncorrectable)
    #[must_use]
    pub const fn with_errors(mut self, errors: [u8; 4]) -> Self {
        self.errors = errors;
        self
    }

    /// Group currently held in the register shadow
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_registers(regs: &RegisterFile) -> Self {
        Self {
            blocks: [
                regs.get(Register::RdsA),
                regs.get(Register::RdsB),
                regs.get(Register::RdsC),
                regs.get(Register::RdsD),
            ],
            errors: [
                regs.field(reg::BLERA) as u8,
                regs.field(reg::BLERB) as u8,
                regs.field(reg::BLERC) as u8,
                regs.field(reg::BLERD) as u8,
            ],
        }
    }

    /// Program identification (block A)
    #[must_use]
    pub const fn pi(&self) -> u16 {
        self.blocks[0]
    }

    /// Block B
    #[must_use]
    pub const fn block_b(&self) -> u16 {
        self.blocks[1]
    }

    /// Block C
    #[must_use]
    pub const fn block_c(&self) -> u16 {
        self.blocks[2]
    }

    /// Block D
    #[must_use]
    pub const fn block_d(&self) -> u16 {
        self.blocks[3]
    }

    /// Error level of block `index` (0 = A .. 3 = D)
    #[must_use]
    pub const fn error_level(&self, index: usize) -> u8 {
        if index < 4 {
            self.errors[index]
        } else {
            0
        }
    }

    /// Group type code (0..=15)
    #[must_use]
    pub const fn group_type(&self) -> u8 {
        (self.blocks[1] >> 12) as u8
    }

    /// Group version
    #[must_use]
    pub const fn version(&self) -> GroupVersion {
        if self.blocks[1] & (1 << 11) == 0 {
            GroupVersion::A
        } else {
            GroupVersion::B
        }
    }

    /// Traffic program flag
    #[must_use]
    pub const fn traffic_program(&self) -> bool {
        self.blocks[1] & (1 << 10) != 0
    }

    /// Program type (0..=31)
    #[must_use]
    pub const fn program_type(&self) -> u8 {
        ((self.blocks[1] >> 5) & 0x1F) as u8
    }

    /// Radio text A/B flag (type 2 groups)
    #[must_use]
    pub const fn text_ab(&self) -> bool {
        self.blocks[1] & (1 << 4) != 0
    }

    /// Segment address: 2 bits for type 0, 4 bits for type 2
    #[must_use]
    pub const fn address(&self) -> u8 {
        match self.group_type() {
            0 => (self.blocks[1] & 0x03) as u8,
            _ => (self.blocks[1] & 0x0F) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_b_fields() {
        // type 2, version B, TP, PTY 10, A/B set, address 5
        let b = (2 << 12) | (1 << 11) | (1 << 10) | (10 << 5) | (1 << 4) | 5;
        let g = SidebandGroup::new(0x2203, b, 0, 0);
        assert_eq!(g.group_type(), 2);
        assert_eq!(g.version(), GroupVersion::B);
        assert!(g.traffic_program());
        assert_eq!(g.program_type(), 10);
        assert!(g.text_ab());
        assert_eq!(g.address(), 5);
        assert_eq!(g.pi(), 0x2203);
    }

    #[test]
    fn type_zero_address_is_two_bits() {
        let g = SidebandGroup::new(0, 0x000F, 0, 0);
        assert_eq!(g.address(), 3);
    }
}
