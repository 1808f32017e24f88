use std::collections::HashMap;

use thiserror::Error;

use crate::ir::block::Block;
use crate::ir::opcode::Opcode;
use crate::ir::types::Type;
use crate::ir::value::{InstRef, Value};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("{inst}: arg {arg} has type {actual}, expected {expected} ({opcode})")]
    ArgType {
        inst: InstRef,
        opcode: Opcode,
        arg: usize,
        actual: Type,
        expected: Type,
    },

    #[error("{inst}: arg {arg} refers to {target}, which is not defined before it")]
    ForwardReference { inst: InstRef, arg: usize, target: InstRef },

    #[error("{inst}: {opcode} must consume an add/subtract result, got {target_opcode}")]
    PseudoOpTarget {
        inst: InstRef,
        opcode: Opcode,
        target_opcode: Opcode,
    },

    #[error("{inst}: use_count is {recorded} but {actual} uses were found ({opcode})")]
    UseCount {
        inst: InstRef,
        opcode: Opcode,
        recorded: u32,
        actual: u32,
    },
}

/// Checks IR block invariants.
///
/// 1. Each argument's type matches the opcode's expected arg type. Instruction
///    references are checked against the referenced instruction's return type.
/// 2. Instruction references point backwards.
/// 3. Flag pseudo-operations consume an add/subtract result.
/// 4. Actual use counts match the `use_count` field on each instruction.
pub fn verification_pass(block: &Block) -> Result<(), VerificationError> {
    let mut actual_uses: HashMap<usize, u32> = HashMap::new();

    for (inst_ref, inst) in block.iter() {
        for (j, (arg, expected)) in inst.arg_values().zip(inst.opcode.arg_types()).enumerate() {
            let actual = match arg {
                Value::Inst(target) => {
                    if target.index() >= inst_ref.index() {
                        return Err(VerificationError::ForwardReference { inst: inst_ref, arg: j, target: *target });
                    }
                    *actual_uses.entry(target.index()).or_insert(0) += 1;
                    block.get(*target).return_type()
                }
                other => other.get_type(),
            };
            if !actual.is_compatible_with(*expected) {
                return Err(VerificationError::ArgType {
                    inst: inst_ref,
                    opcode: inst.opcode,
                    arg: j,
                    actual,
                    expected: *expected,
                });
            }
        }

        if inst.opcode.is_pseudo_operation() {
            if let Some(target) = inst.arg(0).as_inst() {
                let target_opcode = block.get(target).opcode;
                if !target_opcode.is_add_sub() {
                    return Err(VerificationError::PseudoOpTarget {
                        inst: inst_ref,
                        opcode: inst.opcode,
                        target_opcode,
                    });
                }
            }
        }
    }

    for (inst_ref, inst) in block.iter() {
        let actual = actual_uses.get(&inst_ref.index()).copied().unwrap_or(0);
        if inst.use_count != actual {
            return Err(VerificationError::UseCount {
                inst: inst_ref,
                opcode: inst.opcode,
                recorded: inst.use_count,
                actual,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::a64::types::Reg;
    use crate::ir::location::LocationDescriptor;

    #[test]
    fn test_verification_passes_valid_block() {
        let mut block = Block::new(LocationDescriptor(0));
        let x = block.append(Opcode::A64GetX, &[Value::ImmA64Reg(Reg::R2)]);
        let a = block.append(Opcode::Add64, &[
            Value::Inst(x), Value::ImmU64(2), Value::ImmU1(false),
        ]);
        let nzcv = block.append(Opcode::GetNZCVFromOp, &[Value::Inst(a)]);
        block.append(Opcode::A64SetNZCV, &[Value::Inst(nzcv)]);
        block.append(Opcode::A64SetX, &[Value::ImmA64Reg(Reg::R1), Value::Inst(a)]);

        assert_eq!(verification_pass(&block), Ok(()));
    }

    #[test]
    fn test_verification_detects_use_count_mismatch() {
        let mut block = Block::new(LocationDescriptor(0));
        let a = block.append(Opcode::Add64, &[
            Value::ImmU64(1), Value::ImmU64(2), Value::ImmU1(false),
        ]);
        block.append(Opcode::A64SetX, &[Value::ImmA64Reg(Reg::R1), Value::Inst(a)]);

        // Corrupt use count
        block.instructions[a.index()].use_count = 5;

        assert!(matches!(
            verification_pass(&block),
            Err(VerificationError::UseCount { recorded: 5, actual: 1, .. })
        ));
    }

    #[test]
    fn test_verification_checks_referenced_types() {
        let mut block = Block::new(LocationDescriptor(0));
        let w = block.append(Opcode::A64GetW, &[Value::ImmA64Reg(Reg::R2)]);
        // LeastSignificantWord takes a U64.
        block.append(Opcode::LeastSignificantWord, &[Value::Inst(w)]);

        assert!(matches!(
            verification_pass(&block),
            Err(VerificationError::ArgType { actual: Type::U32, expected: Type::U64, .. })
        ));
    }

    #[test]
    fn test_verification_checks_flag_source() {
        let mut block = Block::new(LocationDescriptor(0));
        let x = block.append(Opcode::A64GetX, &[Value::ImmA64Reg(Reg::R2)]);
        block.append(Opcode::GetNZCVFromOp, &[Value::Inst(x)]);

        assert!(matches!(
            verification_pass(&block),
            Err(VerificationError::PseudoOpTarget { target_opcode: Opcode::A64GetX, .. })
        ));
    }
}
