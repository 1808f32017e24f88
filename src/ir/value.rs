use std::fmt;

use crate::frontend::a64::types::Reg as A64Reg;
use crate::ir::types::Type;

/// Index into a Block's instruction arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstRef(pub u32);

impl InstRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// An IR value: either an immediate or a reference to an instruction's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Void,
    Inst(InstRef),
    ImmU1(bool),
    ImmU8(u8),
    ImmU32(u32),
    ImmU64(u64),
    ImmA64Reg(A64Reg),
}

impl Value {
    /// Get the IR type of this value.
    pub fn get_type(&self) -> Type {
        match self {
            Value::Void => Type::Void,
            Value::Inst(_) => Type::Opaque,
            Value::ImmU1(_) => Type::U1,
            Value::ImmU8(_) => Type::U8,
            Value::ImmU32(_) => Type::U32,
            Value::ImmU64(_) => Type::U64,
            Value::ImmA64Reg(_) => Type::A64Reg,
        }
    }

    /// The referenced instruction, if this value is one.
    pub fn as_inst(&self) -> Option<InstRef> {
        match self {
            Value::Inst(r) => Some(*r),
            _ => None,
        }
    }

    /// The register operand, if this value is one.
    pub fn as_a64_reg(&self) -> Option<A64Reg> {
        match self {
            Value::ImmA64Reg(r) => Some(*r),
            _ => None,
        }
    }

    /// Get any integer immediate as u64 (zero-extends smaller types).
    pub fn imm_as_u64(&self) -> Option<u64> {
        match self {
            Value::ImmU1(v) => Some(*v as u64),
            Value::ImmU8(v) => Some(*v as u64),
            Value::ImmU32(v) => Some(*v as u64),
            Value::ImmU64(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Inst(r) => write!(f, "{}", r),
            Value::ImmU1(v) => write!(f, "#{}", *v as u8),
            Value::ImmU8(v) => write!(f, "#{:#x}", v),
            Value::ImmU32(v) => write!(f, "#{:#x}", v),
            Value::ImmU64(v) => write!(f, "#{:#x}", v),
            Value::ImmA64Reg(r) => write!(f, "{}", r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert_eq!(Value::ImmU32(7).get_type(), Type::U32);
        assert_eq!(Value::Inst(InstRef(3)).get_type(), Type::Opaque);
        assert_eq!(Value::ImmA64Reg(A64Reg::R4).get_type(), Type::A64Reg);
    }

    #[test]
    fn test_value_immediates() {
        assert_eq!(Value::ImmU1(true).imm_as_u64(), Some(1));
        assert_eq!(Value::ImmU8(0x80).imm_as_u64(), Some(0x80));
        assert_eq!(Value::Inst(InstRef(0)).imm_as_u64(), None);
        assert_eq!(Value::ImmA64Reg(A64Reg::R9).as_a64_reg(), Some(A64Reg::R9));
        assert_eq!(Value::ImmU64(9).as_a64_reg(), None);
        assert_eq!(Value::Inst(InstRef(2)).as_inst(), Some(InstRef(2)));
        assert_eq!(Value::ImmU8(2).as_inst(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::ImmU32(0x1000).to_string(), "#0x1000");
        assert_eq!(Value::ImmU1(true).to_string(), "#1");
        assert_eq!(Value::Inst(InstRef(5)).to_string(), "%5");
    }
}
