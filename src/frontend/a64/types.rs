use std::fmt;

use serde::{Deserialize, Serialize};

/// A64 integer register index (R0-R30, R31 = SP or ZR depending on operand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Reg {
    R0 = 0, R1, R2, R3, R4, R5, R6, R7,
    R8, R9, R10, R11, R12, R13, R14, R15,
    R16, R17, R18, R19, R20, R21, R22, R23,
    R24, R25, R26, R27, R28, R29, R30, R31,
}

const ALL_REGS: [Reg; 32] = [
    Reg::R0, Reg::R1, Reg::R2, Reg::R3, Reg::R4, Reg::R5, Reg::R6, Reg::R7,
    Reg::R8, Reg::R9, Reg::R10, Reg::R11, Reg::R12, Reg::R13, Reg::R14, Reg::R15,
    Reg::R16, Reg::R17, Reg::R18, Reg::R19, Reg::R20, Reg::R21, Reg::R22, Reg::R23,
    Reg::R24, Reg::R25, Reg::R26, Reg::R27, Reg::R28, Reg::R29, Reg::R30, Reg::R31,
];

impl Reg {
    pub const SP: Reg = Reg::R31;
    pub const ZR: Reg = Reg::R31;

    pub fn number(self) -> usize {
        self as usize
    }

    /// Build a register from a 5-bit field. Upper bits are ignored.
    pub fn from_u32(val: u32) -> Self {
        ALL_REGS[(val & 0x1F) as usize]
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reg::R31 => write!(f, "SP/ZR"),
            Reg::R30 => write!(f, "LR"),
            _ => write!(f, "X{}", self.number()),
        }
    }
}

/// A register operand together with the role R31 takes in its position.
///
/// `sp_eligible` is fixed by the instruction form, never by register contents:
/// R31 names the stack pointer when it is set and the zero register otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegRef {
    pub reg: Reg,
    pub sp_eligible: bool,
}

impl RegRef {
    pub fn gpr_or_sp(reg: Reg) -> Self {
        Self { reg, sp_eligible: true }
    }

    pub fn gpr_or_zr(reg: Reg) -> Self {
        Self { reg, sp_eligible: false }
    }

    pub fn is_sp(self) -> bool {
        self.sp_eligible && self.reg == Reg::SP
    }

    pub fn is_zr(self) -> bool {
        !self.sp_eligible && self.reg == Reg::ZR
    }
}

/// Operating width of a data processing instruction, selected by `sf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datasize {
    W32,
    W64,
}

impl Datasize {
    pub fn from_sf(sf: bool) -> Self {
        if sf { Datasize::W64 } else { Datasize::W32 }
    }
}

/// Shift type for data processing instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ShiftType {
    LSL = 0,
    LSR = 1,
    ASR = 2,
    ROR = 3,
}

impl ShiftType {
    pub fn from_u32(val: u32) -> Self {
        match val & 3 {
            0 => ShiftType::LSL,
            1 => ShiftType::LSR,
            2 => ShiftType::ASR,
            _ => ShiftType::ROR,
        }
    }
}

/// Extend type for extended-register operands (`option` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExtendType {
    UXTB = 0,
    UXTH = 1,
    UXTW = 2,
    UXTX = 3,
    SXTB = 4,
    SXTH = 5,
    SXTW = 6,
    SXTX = 7,
}

impl ExtendType {
    pub fn from_u32(val: u32) -> Self {
        match val & 7 {
            0 => ExtendType::UXTB,
            1 => ExtendType::UXTH,
            2 => ExtendType::UXTW,
            3 => ExtendType::UXTX,
            4 => ExtendType::SXTB,
            5 => ExtendType::SXTH,
            6 => ExtendType::SXTW,
            _ => ExtendType::SXTX,
        }
    }

    pub fn is_signed(self) -> bool {
        (self as u8) & 4 != 0
    }
}

/// A64 exception types raised by the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exception {
    UnallocatedEncoding,
    ReservedValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reg_from_field() {
        assert_eq!(Reg::from_u32(0), Reg::R0);
        assert_eq!(Reg::from_u32(31), Reg::SP);
        assert_eq!(Reg::from_u32(0x3F), Reg::R31);
        assert_eq!(Reg::from_u32(17).number(), 17);
    }

    #[test]
    fn test_reg_ref_roles() {
        assert!(RegRef::gpr_or_sp(Reg::R31).is_sp());
        assert!(!RegRef::gpr_or_sp(Reg::R31).is_zr());
        assert!(RegRef::gpr_or_zr(Reg::R31).is_zr());
        assert!(!RegRef::gpr_or_sp(Reg::R5).is_sp());
    }

    #[test]
    fn test_extend_type_properties() {
        assert!(ExtendType::SXTB.is_signed());
        assert!(!ExtendType::UXTX.is_signed());
        for option in 0..8 {
            assert_eq!(ExtendType::from_u32(option) as u32, option);
        }
    }

    #[test]
    fn test_datasize() {
        assert_eq!(Datasize::from_sf(false), Datasize::W32);
        assert_eq!(Datasize::from_sf(true), Datasize::W64);
    }
}
