use std::fmt;

use crate::frontend::a64::imm::Imm;
use crate::frontend::a64::types::Reg;

/// A64 instruction names handled by this translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum A64InstructionName {
    ADD_imm,
    ADDS_imm,
    SUB_imm,
    SUBS_imm,
    ADD_shift,
    ADDS_shift,
    SUB_shift,
    SUBS_shift,
    ADD_ext,
    ADDS_ext,
    SUB_ext,
    SUBS_ext,
    ADC,
    ADCS,
    SBC,
    SBCS,
}

impl fmt::Display for A64InstructionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Decoded instruction with name and raw encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInst {
    pub name: A64InstructionName,
    pub raw: u32,
}

struct PatternEntry {
    mask: u32,
    expect: u32,
    name: A64InstructionName,
}

// Bitstrings follow the A64 encoding index:
//   imm:   z{op}{S}10001 ss iiiiiiiiiiii nnnnn ddddd
//   shift: z{op}{S}01011 ss 0 mmmmm iiiiii nnnnn ddddd
//   ext:   z{op}{S}01011 00 1 mmmmm xxx iii nnnnn ddddd
//   carry: z{op}{S}11010000 mmmmm 000000 nnnnn ddddd
static PATTERNS: &[PatternEntry] = &[
    PatternEntry { mask: 0x7F00_0000, expect: 0x1100_0000, name: A64InstructionName::ADD_imm },
    PatternEntry { mask: 0x7F00_0000, expect: 0x3100_0000, name: A64InstructionName::ADDS_imm },
    PatternEntry { mask: 0x7F00_0000, expect: 0x5100_0000, name: A64InstructionName::SUB_imm },
    PatternEntry { mask: 0x7F00_0000, expect: 0x7100_0000, name: A64InstructionName::SUBS_imm },
    PatternEntry { mask: 0x7F20_0000, expect: 0x0B00_0000, name: A64InstructionName::ADD_shift },
    PatternEntry { mask: 0x7F20_0000, expect: 0x2B00_0000, name: A64InstructionName::ADDS_shift },
    PatternEntry { mask: 0x7F20_0000, expect: 0x4B00_0000, name: A64InstructionName::SUB_shift },
    PatternEntry { mask: 0x7F20_0000, expect: 0x6B00_0000, name: A64InstructionName::SUBS_shift },
    PatternEntry { mask: 0x7FE0_0000, expect: 0x0B20_0000, name: A64InstructionName::ADD_ext },
    PatternEntry { mask: 0x7FE0_0000, expect: 0x2B20_0000, name: A64InstructionName::ADDS_ext },
    PatternEntry { mask: 0x7FE0_0000, expect: 0x4B20_0000, name: A64InstructionName::SUB_ext },
    PatternEntry { mask: 0x7FE0_0000, expect: 0x6B20_0000, name: A64InstructionName::SUBS_ext },
    PatternEntry { mask: 0x7FE0_FC00, expect: 0x1A00_0000, name: A64InstructionName::ADC },
    PatternEntry { mask: 0x7FE0_FC00, expect: 0x3A00_0000, name: A64InstructionName::ADCS },
    PatternEntry { mask: 0x7FE0_FC00, expect: 0x5A00_0000, name: A64InstructionName::SBC },
    PatternEntry { mask: 0x7FE0_FC00, expect: 0x7A00_0000, name: A64InstructionName::SBCS },
];

/// Decode a 32-bit A64 instruction.
/// Returns None for encodings outside the add/subtract family.
pub fn decode(insn: u32) -> Option<DecodedInst> {
    PATTERNS
        .iter()
        .find(|pat| insn & pat.mask == pat.expect)
        .map(|pat| DecodedInst { name: pat.name, raw: insn })
}

/// Field accessors. Each returns the field typed at its encoded width.
impl DecodedInst {
    /// Extract a range of bits from the raw instruction.
    pub fn bits(&self, hi: u32, lo: u32) -> u32 {
        let width = hi - lo + 1;
        let mask = if width >= 32 { u32::MAX } else { (1u32 << width) - 1 };
        (self.raw >> lo) & mask
    }

    pub fn bit(&self, pos: u32) -> bool {
        (self.raw >> pos) & 1 != 0
    }

    /// sf (bit 31): 1 for 64-bit, 0 for 32-bit.
    pub fn sf(&self) -> bool { self.bit(31) }

    /// Rd (bits [4:0]).
    pub fn rd(&self) -> Reg { Reg::from_u32(self.bits(4, 0)) }

    /// Rn (bits [9:5]).
    pub fn rn(&self) -> Reg { Reg::from_u32(self.bits(9, 5)) }

    /// Rm (bits [20:16]).
    pub fn rm(&self) -> Reg { Reg::from_u32(self.bits(20, 16)) }

    /// shift (bits [23:22]).
    pub fn shift(&self) -> Imm<2> { Imm::new(self.bits(23, 22)) }

    /// imm12 (bits [21:10]).
    pub fn imm12(&self) -> Imm<12> { Imm::new(self.bits(21, 10)) }

    /// imm6 (bits [15:10]), shift amount of the shifted-register forms.
    pub fn imm6(&self) -> Imm<6> { Imm::new(self.bits(15, 10)) }

    /// option (bits [15:13]), extend type of the extended-register forms.
    pub fn option(&self) -> Imm<3> { Imm::new(self.bits(15, 13)) }

    /// imm3 (bits [12:10]), left shift applied after extension.
    pub fn imm3(&self) -> Imm<3> { Imm::new(self.bits(12, 10)) }
}

impl fmt::Display for DecodedInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#010x})", self.name, self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_add_imm() {
        // ADD X1, X2, #5 => 0x91001441
        let inst = decode(0x91001441).expect("ADD X1, X2, #5");
        assert_eq!(inst.name, A64InstructionName::ADD_imm);
        assert!(inst.sf());
        assert_eq!(inst.rd(), Reg::R1);
        assert_eq!(inst.rn(), Reg::R2);
        assert_eq!(inst.imm12(), Imm::<12>::new(5));
        assert_eq!(inst.shift().bits(), 0);
    }

    #[test]
    fn test_decode_flag_setting_imm() {
        // CMP W3, #1 (SUBS WZR, W3, #1) => 0x7100047F
        let inst = decode(0x7100047F).expect("CMP W3, #1");
        assert_eq!(inst.name, A64InstructionName::SUBS_imm);
        assert!(!inst.sf());
        assert_eq!(inst.rd(), Reg::ZR);
        assert_eq!(inst.rn(), Reg::R3);
    }

    #[test]
    fn test_decode_shift_and_ext() {
        // ADD X0, X1, X2, LSL #3 => 0x8B020C20
        let inst = decode(0x8B020C20).expect("ADD (shifted)");
        assert_eq!(inst.name, A64InstructionName::ADD_shift);
        assert_eq!(inst.shift().bits(), 0);
        assert!(inst.imm6().bits() == 3);
        assert_eq!(inst.rm(), Reg::R2);

        // ADD X0, SP, W2, UXTW #2 => 0x8B224BE0
        let inst = decode(0x8B224BE0).expect("ADD (extended)");
        assert_eq!(inst.name, A64InstructionName::ADD_ext);
        assert_eq!(inst.option().bits(), 0b010);
        assert!(inst.imm3().bits() == 2);
        assert_eq!(inst.rn(), Reg::SP);

        // SUBS X3, X4, X5, ASR #7 => 0xEB851C83
        let inst = decode(0xEB851C83).expect("SUBS (shifted)");
        assert_eq!(inst.name, A64InstructionName::SUBS_shift);
        assert_eq!(inst.shift().bits(), 0b10);
    }

    #[test]
    fn test_decode_carry_forms() {
        // ADC X0, X1, X2 => 0x9A020020
        assert_eq!(decode(0x9A020020).map(|i| i.name), Some(A64InstructionName::ADC));
        // ADCS W0, W1, W2 => 0x3A020020
        assert_eq!(decode(0x3A020020).map(|i| i.name), Some(A64InstructionName::ADCS));
        // SBC X0, X1, X2 => 0xDA020020
        assert_eq!(decode(0xDA020020).map(|i| i.name), Some(A64InstructionName::SBC));
        // SBCS X0, X1, X2 => 0xFA020020
        assert_eq!(decode(0xFA020020).map(|i| i.name), Some(A64InstructionName::SBCS));
    }

    #[test]
    fn test_decode_rejects_other_families() {
        // MOVZ X0, #1
        assert!(decode(0xD2800020).is_none());
        // RET
        assert!(decode(0xD65F03C0).is_none());
        // ADD (extended) with opt != 00 is unallocated
        assert!(decode(0x8B624BE0).is_none());
        // ADC with non-zero bits [15:10] is not an ADC
        assert!(decode(0x9A020420).is_none());
    }
}
