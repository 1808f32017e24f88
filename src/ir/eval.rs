//! Reference evaluator for IR blocks.
//!
//! Executes the instructions of a single block against an `A64State`. It exists
//! to check what translated IR means; terminals are not followed.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frontend::a64::types::{Exception, Reg};
use crate::ir::block::Block;
use crate::ir::opcode::Opcode;
use crate::ir::value::{InstRef, Value};

bitflags! {
    /// Condition flags, laid out as in the A64 NZCV system register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Nzcv: u32 {
        const N = 1 << 31;
        const Z = 1 << 30;
        const C = 1 << 29;
        const V = 1 << 28;
    }
}

/// Guest-visible integer state touched by add/subtract blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct A64State {
    /// X0..X30.
    pub reg: [u64; 31],
    pub sp: u64,
    pub pc: u64,
    pub nzcv: Nzcv,
    /// Set by `A64ExceptionRaised`.
    pub exception: Option<Exception>,
}

impl A64State {
    pub fn x(&self, reg: Reg) -> u64 {
        self.reg.get(reg.number()).copied().unwrap_or(0)
    }

    pub fn w(&self, reg: Reg) -> u32 {
        self.x(reg) as u32
    }

    pub fn set_x(&mut self, reg: Reg, value: u64) {
        if let Some(slot) = self.reg.get_mut(reg.number()) {
            *slot = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("{inst}: argument {arg} has no value")]
    Undefined { inst: InstRef, arg: usize },

    #[error("{inst}: {opcode} used on a result that carries no flags")]
    MissingFlags { inst: InstRef, opcode: Opcode },

    #[error("{inst}: register {reg} is not a general-purpose register here")]
    InvalidRegister { inst: InstRef, reg: Reg },

    #[error("{inst}: argument {arg} is {value}, expected a register")]
    NotARegister { inst: InstRef, arg: usize, value: Value },

    #[error("{inst}: unknown exception code {code}")]
    UnknownException { inst: InstRef, code: u64 },
}

/// AddWithCarry at `bits` width. Returns the truncated result and its flags.
pub fn add_with_carry(bits: u32, a: u64, b: u64, carry_in: bool) -> (u64, Nzcv) {
    let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
    let sign = 1u64 << (bits - 1);
    let (a, b) = (a & mask, b & mask);

    let unsigned_sum = a as u128 + b as u128 + carry_in as u128;
    let result = unsigned_sum as u64 & mask;

    let mut flags = Nzcv::empty();
    flags.set(Nzcv::N, result & sign != 0);
    flags.set(Nzcv::Z, result == 0);
    flags.set(Nzcv::C, unsigned_sum > mask as u128);
    flags.set(Nzcv::V, (a ^ result) & (b ^ result) & sign != 0);
    (result, flags)
}

struct Evaluator<'b> {
    block: &'b Block,
    results: Vec<Option<u64>>,
    flags: Vec<Option<Nzcv>>,
}

impl<'b> Evaluator<'b> {
    fn arg(&self, inst: InstRef, idx: usize) -> Result<u64, EvalError> {
        let value = self.block.get(inst).arg(idx);
        let resolved = match value {
            Value::Inst(r) => self.results.get(r.index()).copied().flatten(),
            other => other.imm_as_u64(),
        };
        resolved.ok_or(EvalError::Undefined { inst, arg: idx })
    }

    fn flags_of(&self, inst: InstRef) -> Result<Nzcv, EvalError> {
        let source = self.block.get(inst);
        source
            .arg(0)
            .as_inst()
            .and_then(|r| self.flags.get(r.index()).copied().flatten())
            .ok_or(EvalError::MissingFlags { inst, opcode: source.opcode })
    }

    fn gpr(&self, inst: InstRef) -> Result<Reg, EvalError> {
        let value = self.block.get(inst).arg(0);
        let reg = value
            .as_a64_reg()
            .ok_or(EvalError::NotARegister { inst, arg: 0, value })?;
        if reg == Reg::R31 {
            return Err(EvalError::InvalidRegister { inst, reg });
        }
        Ok(reg)
    }
}

/// Execute every live instruction of `block` in order, updating `state`.
pub fn evaluate(block: &Block, state: &mut A64State) -> Result<(), EvalError> {
    use Opcode::*;

    let mut ev = Evaluator {
        block,
        results: vec![None; block.inst_count()],
        flags: vec![None; block.inst_count()],
    };

    for (r, inst) in block.iter() {
        let mut flags = None;
        let result: Option<u64> = match inst.opcode {
            A64GetCFlag => Some(state.nzcv.contains(Nzcv::C) as u64),
            A64SetNZCV => {
                state.nzcv = Nzcv::from_bits_truncate(ev.arg(r, 0)? as u32);
                None
            }
            A64GetW => Some(state.w(ev.gpr(r)?) as u64),
            A64GetX => Some(state.x(ev.gpr(r)?)),
            A64GetSP => Some(state.sp),
            A64SetW => {
                let reg = ev.gpr(r)?;
                state.set_x(reg, ev.arg(r, 1)? & 0xFFFF_FFFF);
                None
            }
            A64SetX => {
                let reg = ev.gpr(r)?;
                state.set_x(reg, ev.arg(r, 1)?);
                None
            }
            A64SetSP => {
                state.sp = ev.arg(r, 0)?;
                None
            }
            A64SetPC => {
                state.pc = ev.arg(r, 0)?;
                None
            }
            A64ExceptionRaised => {
                state.pc = ev.arg(r, 0)?;
                let code = ev.arg(r, 1)?;
                state.exception = Some(match code {
                    c if c == Exception::UnallocatedEncoding as u64 => Exception::UnallocatedEncoding,
                    c if c == Exception::ReservedValue as u64 => Exception::ReservedValue,
                    _ => return Err(EvalError::UnknownException { inst: r, code }),
                });
                None
            }

            GetNZCVFromOp => Some(ev.flags_of(r)?.bits() as u64),

            LeastSignificantWord => Some(ev.arg(r, 0)? & 0xFFFF_FFFF),
            LeastSignificantHalf => Some(ev.arg(r, 0)? & 0xFFFF),
            LeastSignificantByte => Some(ev.arg(r, 0)? & 0xFF),

            LogicalShiftLeft32 => {
                let v = ev.arg(r, 0)? as u32;
                Some(v.checked_shl(ev.arg(r, 1)? as u32).unwrap_or(0) as u64)
            }
            LogicalShiftLeft64 => Some(ev.arg(r, 0)?.checked_shl(ev.arg(r, 1)? as u32).unwrap_or(0)),
            LogicalShiftRight32 => {
                let v = ev.arg(r, 0)? as u32;
                Some(v.checked_shr(ev.arg(r, 1)? as u32).unwrap_or(0) as u64)
            }
            LogicalShiftRight64 => Some(ev.arg(r, 0)?.checked_shr(ev.arg(r, 1)? as u32).unwrap_or(0)),
            ArithmeticShiftRight32 => {
                let v = ev.arg(r, 0)? as u32 as i32;
                let amount = (ev.arg(r, 1)? as u32).min(31);
                Some((v >> amount) as u32 as u64)
            }
            ArithmeticShiftRight64 => {
                let v = ev.arg(r, 0)? as i64;
                let amount = (ev.arg(r, 1)? as u32).min(63);
                Some((v >> amount) as u64)
            }

            Add32 | Add64 | Sub32 | Sub64 => {
                let bits = if matches!(inst.opcode, Add32 | Sub32) { 32 } else { 64 };
                let a = ev.arg(r, 0)?;
                let mut b = ev.arg(r, 1)?;
                if matches!(inst.opcode, Sub32 | Sub64) {
                    b = !b;
                }
                let (value, nzcv) = add_with_carry(bits, a, b, ev.arg(r, 2)? != 0);
                flags = Some(nzcv);
                Some(value)
            }

            SignExtendByteToWord => Some(ev.arg(r, 0)? as u8 as i8 as i32 as u32 as u64),
            SignExtendHalfToWord => Some(ev.arg(r, 0)? as u16 as i16 as i32 as u32 as u64),
            SignExtendByteToLong => Some(ev.arg(r, 0)? as u8 as i8 as i64 as u64),
            SignExtendHalfToLong => Some(ev.arg(r, 0)? as u16 as i16 as i64 as u64),
            SignExtendWordToLong => Some(ev.arg(r, 0)? as u32 as i32 as i64 as u64),
            ZeroExtendByteToWord | ZeroExtendByteToLong => Some(ev.arg(r, 0)? & 0xFF),
            ZeroExtendHalfToWord | ZeroExtendHalfToLong => Some(ev.arg(r, 0)? & 0xFFFF),
            ZeroExtendWordToLong => Some(ev.arg(r, 0)? & 0xFFFF_FFFF),
        };
        ev.results[r.index()] = result;
        ev.flags[r.index()] = flags;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::location::LocationDescriptor;

    #[test]
    fn test_add_with_carry_flags() {
        let (v, f) = add_with_carry(32, 0xFFFF_FFFF, 0, true);
        assert_eq!(v, 0);
        assert_eq!(f, Nzcv::Z | Nzcv::C);

        let (v, f) = add_with_carry(32, 0x7FFF_FFFF, 1, false);
        assert_eq!(v, 0x8000_0000);
        assert_eq!(f, Nzcv::N | Nzcv::V);

        // 5 - 3 as 5 + !3 + 1
        let (v, f) = add_with_carry(64, 5, !3, true);
        assert_eq!(v, 2);
        assert_eq!(f, Nzcv::C);

        // 3 - 5 borrows: C clear, N set
        let (v, f) = add_with_carry(64, 3, !5, true);
        assert_eq!(v, (-2i64) as u64);
        assert_eq!(f, Nzcv::N);
    }

    #[test]
    fn test_evaluate_sub_sets_flags_and_writes() {
        let mut block = Block::new(LocationDescriptor(0));
        let x2 = block.append(Opcode::A64GetX, &[Value::ImmA64Reg(Reg::R2)]);
        let sub = block.append(Opcode::Sub64, &[Value::Inst(x2), Value::ImmU64(7), Value::ImmU1(true)]);
        let nzcv = block.append(Opcode::GetNZCVFromOp, &[Value::Inst(sub)]);
        block.append(Opcode::A64SetNZCV, &[Value::Inst(nzcv)]);
        block.append(Opcode::A64SetX, &[Value::ImmA64Reg(Reg::R1), Value::Inst(sub)]);

        let mut state = A64State::default();
        state.set_x(Reg::R2, 7);
        evaluate(&block, &mut state).unwrap();

        assert_eq!(state.x(Reg::R1), 0);
        assert_eq!(state.nzcv, Nzcv::Z | Nzcv::C);
    }

    #[test]
    fn test_evaluate_set_w_zeroes_upper_half() {
        let mut block = Block::new(LocationDescriptor(0));
        block.append(Opcode::A64SetW, &[Value::ImmA64Reg(Reg::R3), Value::ImmU32(0xDEAD_BEEF)]);

        let mut state = A64State::default();
        state.set_x(Reg::R3, u64::MAX);
        evaluate(&block, &mut state).unwrap();

        assert_eq!(state.x(Reg::R3), 0xDEAD_BEEF);
    }

    #[test]
    fn test_evaluate_rejects_flags_from_non_arith() {
        let mut block = Block::new(LocationDescriptor(0));
        let sp = block.append(Opcode::A64GetSP, &[]);
        block.append(Opcode::GetNZCVFromOp, &[Value::Inst(sp)]);

        let mut state = A64State::default();
        assert!(matches!(
            evaluate(&block, &mut state),
            Err(EvalError::MissingFlags { .. })
        ));
    }

    #[test]
    fn test_evaluate_rejects_non_register_operand() {
        let mut block = Block::new(LocationDescriptor(0));
        block.append(Opcode::A64GetX, &[Value::ImmU64(2)]);

        let mut state = A64State::default();
        assert_eq!(
            evaluate(&block, &mut state),
            Err(EvalError::NotARegister { inst: InstRef(0), arg: 0, value: Value::ImmU64(2) })
        );
    }

    #[test]
    fn test_evaluate_rejects_sp_as_gpr() {
        let mut block = Block::new(LocationDescriptor(0));
        block.append(Opcode::A64SetX, &[Value::ImmA64Reg(Reg::R31), Value::ImmU64(1)]);

        let mut state = A64State::default();
        assert!(matches!(
            evaluate(&block, &mut state),
            Err(EvalError::InvalidRegister { reg: Reg::R31, .. })
        ));
    }

    #[test]
    fn test_evaluate_exception() {
        let mut block = Block::new(LocationDescriptor(0));
        block.append(Opcode::A64SetPC, &[Value::ImmU64(0x40)]);
        block.append(Opcode::A64ExceptionRaised, &[
            Value::ImmU64(0x40),
            Value::ImmU64(Exception::ReservedValue as u64),
        ]);

        let mut state = A64State::default();
        evaluate(&block, &mut state).unwrap();
        assert_eq!(state.pc, 0x40);
        assert_eq!(state.exception, Some(Exception::ReservedValue));
    }
}
