use crate::frontend::a64::imm::Imm;
use crate::frontend::a64::translate::error::ReservedValue;
use crate::frontend::a64::translate::visitor::TranslatorVisitor;
use crate::frontend::a64::types::{Datasize, ExtendType, Reg, RegRef, ShiftType};
use crate::ir::value::Value;

/// Second source operand of an add/subtract instruction, already validated.
///
/// Built only by the `decode_*` validators and [`Operand2::register`], so a
/// lowered operand never carries a reserved shift or extend.
///
/// ```compile_fail
/// use a64_addsub::frontend::a64::translate::Operand2;
/// use a64_addsub::frontend::a64::types::{Reg, ShiftType};
///
/// let _ = Operand2::Shifted { rm: Reg::R1, shift: ShiftType::ROR, amount: 0 };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand2(Kind);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// Zero-extended imm12, with the optional `LSL #12` already applied.
    Imm(u64),
    /// `Rm` shifted by a constant. Never `ROR`.
    Shifted { rm: Reg, shift: ShiftType, amount: u8 },
    /// `Rm` narrowed and extended per `extend`, then shifted left by 0..=4.
    Extended { rm: Reg, extend: ExtendType, lsl: u8 },
    /// `Rm` as-is (add/subtract with carry).
    Register(Reg),
}

impl Operand2 {
    /// `Rm` used unmodified, as the with-carry forms do.
    pub fn register(rm: Reg) -> Self {
        Self(Kind::Register(rm))
    }
}

/// Decode the immediate-form operand. `shift` selects `LSL #0` or `LSL #12`.
pub fn decode_imm_operand(shift: Imm<2>, imm12: Imm<12>) -> Result<Operand2, ReservedValue> {
    let imm = imm12.zero_extend();
    match shift.bits() {
        0b00 => Ok(Operand2(Kind::Imm(imm))),
        0b01 => Ok(Operand2(Kind::Imm(imm << 12))),
        selector => Err(ReservedValue::ImmediateShift { selector }),
    }
}

pub fn decode_shifted_operand(
    datasize: Datasize,
    shift: Imm<2>,
    rm: Reg,
    imm6: Imm<6>,
) -> Result<Operand2, ReservedValue> {
    if shift.bits() == 0b11 {
        return Err(ReservedValue::RotateShift);
    }
    if datasize == Datasize::W32 && imm6.bit(5) {
        return Err(ReservedValue::ShiftAmountOutOfRange { amount: imm6.bits() });
    }
    Ok(Operand2(Kind::Shifted {
        rm,
        shift: ShiftType::from_u32(shift.bits()),
        amount: imm6.bits() as u8,
    }))
}

pub fn decode_extended_operand(option: Imm<3>, rm: Reg, imm3: Imm<3>) -> Result<Operand2, ReservedValue> {
    let lsl = imm3.bits();
    if lsl > 4 {
        return Err(ReservedValue::ExtendShiftOutOfRange { amount: lsl });
    }
    Ok(Operand2(Kind::Extended {
        rm,
        extend: ExtendType::from_u32(option.bits()),
        lsl: lsl as u8,
    }))
}

impl<'a> TranslatorVisitor<'a> {
    /// Lower a validated operand to IR at the given width. `Rm` is never SP.
    pub fn operand2(&mut self, datasize: Datasize, operand: Operand2) -> Value {
        match operand.0 {
            Kind::Imm(imm) => self.i(datasize, imm),
            Kind::Shifted { rm, shift, amount } => {
                let rm_val = self.reg(datasize, RegRef::gpr_or_zr(rm));
                self.shift_reg(datasize, rm_val, shift, amount)
            }
            Kind::Extended { rm, extend, lsl } => {
                let rm_val = self.reg(datasize, RegRef::gpr_or_zr(rm));
                self.extend_reg(datasize, rm_val, extend, lsl)
            }
            Kind::Register(rm) => self.reg(datasize, RegRef::gpr_or_zr(rm)),
        }
    }

    /// Apply a constant shift to a register value.
    /// Used by data processing (shifted register) instructions.
    pub fn shift_reg(&mut self, datasize: Datasize, reg_val: Value, shift: ShiftType, amount: u8) -> Value {
        let amount = self.ir.ir().imm8(amount);
        let carry_in = self.ir.ir().imm1(false);
        match (datasize, shift) {
            (Datasize::W32, ShiftType::LSL) => self.ir.ir().logical_shift_left_32(reg_val, amount, carry_in),
            (Datasize::W64, ShiftType::LSL) => self.ir.ir().logical_shift_left_64(reg_val, amount),
            (Datasize::W32, ShiftType::LSR) => self.ir.ir().logical_shift_right_32(reg_val, amount, carry_in),
            (Datasize::W64, ShiftType::LSR) => self.ir.ir().logical_shift_right_64(reg_val, amount),
            (Datasize::W32, ShiftType::ASR) => self.ir.ir().arithmetic_shift_right_32(reg_val, amount, carry_in),
            (Datasize::W64, ShiftType::ASR) => self.ir.ir().arithmetic_shift_right_64(reg_val, amount),
            (_, ShiftType::ROR) => unreachable!("ROR is rejected by decode_shifted_operand"),
        }
    }

    /// Narrow a register value to the extend's source width, extend it back
    /// to `datasize`, then shift left by `lsl`.
    /// Used by ADD_ext, SUB_ext, etc.
    pub fn extend_reg(&mut self, datasize: Datasize, reg_val: Value, extend: ExtendType, lsl: u8) -> Value {
        use ExtendType::*;

        // 32-bit operands arrive as U32; only 64-bit ones need narrowing to a word first.
        let word = |v: &mut Self| match datasize {
            Datasize::W32 => reg_val,
            Datasize::W64 => v.ir.ir().least_significant_word(reg_val),
        };

        let extended = match (datasize, extend) {
            (Datasize::W32, UXTW | SXTW | UXTX | SXTX) => reg_val,
            (Datasize::W64, UXTX | SXTX) => reg_val,
            (Datasize::W64, UXTW) => {
                let w = word(self);
                self.ir.ir().zero_extend_word_to_long(w)
            }
            (Datasize::W64, SXTW) => {
                let w = word(self);
                self.ir.ir().sign_extend_word_to_long(w)
            }
            (_, UXTB | SXTB) => {
                let w = word(self);
                let byte = self.ir.ir().least_significant_byte(w);
                match (datasize, extend.is_signed()) {
                    (Datasize::W32, false) => self.ir.ir().zero_extend_byte_to_word(byte),
                    (Datasize::W32, true) => self.ir.ir().sign_extend_byte_to_word(byte),
                    (Datasize::W64, false) => self.ir.ir().zero_extend_byte_to_long(byte),
                    (Datasize::W64, true) => self.ir.ir().sign_extend_byte_to_long(byte),
                }
            }
            (_, UXTH | SXTH) => {
                let w = word(self);
                let half = self.ir.ir().least_significant_half(w);
                match (datasize, extend.is_signed()) {
                    (Datasize::W32, false) => self.ir.ir().zero_extend_half_to_word(half),
                    (Datasize::W32, true) => self.ir.ir().sign_extend_half_to_word(half),
                    (Datasize::W64, false) => self.ir.ir().zero_extend_half_to_long(half),
                    (Datasize::W64, true) => self.ir.ir().sign_extend_half_to_long(half),
                }
            }
        };

        if lsl == 0 {
            return extended;
        }
        let shift_val = self.ir.ir().imm8(lsl);
        match datasize {
            Datasize::W32 => {
                let carry_in = self.ir.ir().imm1(false);
                self.ir.ir().logical_shift_left_32(extended, shift_val, carry_in)
            }
            Datasize::W64 => self.ir.ir().logical_shift_left_64(extended, shift_val),
        }
    }
}
