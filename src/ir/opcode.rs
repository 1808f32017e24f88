use std::fmt;
use crate::ir::types::Type;

/// IR opcodes emitted by the A64 add/subtract translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Opcode {
    // --- A64 context getters/setters ---
    A64GetCFlag,
    A64SetNZCV,
    A64GetW,
    A64GetX,
    A64GetSP,
    A64SetW,
    A64SetX,
    A64SetSP,
    A64SetPC,
    A64ExceptionRaised,

    // --- Flags ---
    GetNZCVFromOp,

    // --- Extraction ---
    LeastSignificantWord,
    LeastSignificantHalf,
    LeastSignificantByte,

    // --- Shifts ---
    LogicalShiftLeft32,
    LogicalShiftLeft64,
    LogicalShiftRight32,
    LogicalShiftRight64,
    ArithmeticShiftRight32,
    ArithmeticShiftRight64,

    // --- ALU ---
    // Add: a + b + carry_in. Sub: a + NOT(b) + carry_in.
    Add32,
    Add64,
    Sub32,
    Sub64,

    // --- Extension ---
    SignExtendByteToWord,
    SignExtendHalfToWord,
    SignExtendByteToLong,
    SignExtendHalfToLong,
    SignExtendWordToLong,
    ZeroExtendByteToWord,
    ZeroExtendHalfToWord,
    ZeroExtendByteToLong,
    ZeroExtendHalfToLong,
    ZeroExtendWordToLong,
}

/// Opcode metadata: return type and argument types.
struct OpcodeInfo {
    ret: Type,
    args: &'static [Type],
}

impl Opcode {
    /// Returns the return type of this opcode.
    pub fn return_type(self) -> Type {
        self.info().ret
    }

    /// Returns the argument types of this opcode.
    pub fn arg_types(self) -> &'static [Type] {
        self.info().args
    }

    /// Returns the number of arguments this opcode takes.
    pub fn num_args(self) -> usize {
        self.info().args.len()
    }

    /// Returns true for the add/subtract ALU operations whose flags
    /// `GetNZCVFromOp` may observe.
    pub fn is_add_sub(self) -> bool {
        use Opcode::*;
        matches!(self, Add32 | Add64 | Sub32 | Sub64)
    }

    /// Returns true for pseudo-operations that read flags of their argument.
    pub fn is_pseudo_operation(self) -> bool {
        matches!(self, Opcode::GetNZCVFromOp)
    }

    fn info(self) -> OpcodeInfo {
        use Opcode::*;
        const V: Type = Type::Void;
        const U1: Type = Type::U1;
        const U8: Type = Type::U8;
        const U16: Type = Type::U16;
        const U32: Type = Type::U32;
        const U64: Type = Type::U64;
        const NZCV: Type = Type::NZCVFlags;
        const A64R: Type = Type::A64Reg;
        const OPQ: Type = Type::Opaque;
        match self {
            A64GetCFlag => OpcodeInfo { ret: U1, args: &[] },
            A64SetNZCV => OpcodeInfo { ret: V, args: &[NZCV] },
            A64GetW => OpcodeInfo { ret: U32, args: &[A64R] },
            A64GetX => OpcodeInfo { ret: U64, args: &[A64R] },
            A64GetSP => OpcodeInfo { ret: U64, args: &[] },
            A64SetW => OpcodeInfo { ret: V, args: &[A64R, U32] },
            A64SetX => OpcodeInfo { ret: V, args: &[A64R, U64] },
            A64SetSP => OpcodeInfo { ret: V, args: &[U64] },
            A64SetPC => OpcodeInfo { ret: V, args: &[U64] },
            A64ExceptionRaised => OpcodeInfo { ret: V, args: &[U64, U64] },

            GetNZCVFromOp => OpcodeInfo { ret: NZCV, args: &[OPQ] },

            LeastSignificantWord => OpcodeInfo { ret: U32, args: &[U64] },
            LeastSignificantHalf => OpcodeInfo { ret: U16, args: &[U32] },
            LeastSignificantByte => OpcodeInfo { ret: U8, args: &[U32] },

            LogicalShiftLeft32 => OpcodeInfo { ret: U32, args: &[U32, U8, U1] },
            LogicalShiftLeft64 => OpcodeInfo { ret: U64, args: &[U64, U8] },
            LogicalShiftRight32 => OpcodeInfo { ret: U32, args: &[U32, U8, U1] },
            LogicalShiftRight64 => OpcodeInfo { ret: U64, args: &[U64, U8] },
            ArithmeticShiftRight32 => OpcodeInfo { ret: U32, args: &[U32, U8, U1] },
            ArithmeticShiftRight64 => OpcodeInfo { ret: U64, args: &[U64, U8] },

            Add32 => OpcodeInfo { ret: U32, args: &[U32, U32, U1] },
            Add64 => OpcodeInfo { ret: U64, args: &[U64, U64, U1] },
            Sub32 => OpcodeInfo { ret: U32, args: &[U32, U32, U1] },
            Sub64 => OpcodeInfo { ret: U64, args: &[U64, U64, U1] },

            SignExtendByteToWord => OpcodeInfo { ret: U32, args: &[U8] },
            SignExtendHalfToWord => OpcodeInfo { ret: U32, args: &[U16] },
            SignExtendByteToLong => OpcodeInfo { ret: U64, args: &[U8] },
            SignExtendHalfToLong => OpcodeInfo { ret: U64, args: &[U16] },
            SignExtendWordToLong => OpcodeInfo { ret: U64, args: &[U32] },
            ZeroExtendByteToWord => OpcodeInfo { ret: U32, args: &[U8] },
            ZeroExtendHalfToWord => OpcodeInfo { ret: U32, args: &[U16] },
            ZeroExtendByteToLong => OpcodeInfo { ret: U64, args: &[U8] },
            ZeroExtendHalfToLong => OpcodeInfo { ret: U64, args: &[U16] },
            ZeroExtendWordToLong => OpcodeInfo { ret: U64, args: &[U32] },
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_metadata() {
        assert_eq!(Opcode::A64GetSP.num_args(), 0);

        assert_eq!(Opcode::Add32.return_type(), Type::U32);
        assert_eq!(Opcode::Add32.num_args(), 3);
        assert_eq!(Opcode::Add32.arg_types(), &[Type::U32, Type::U32, Type::U1]);

        assert_eq!(Opcode::A64GetX.return_type(), Type::U64);
        assert_eq!(Opcode::A64GetX.arg_types(), &[Type::A64Reg]);

        assert_eq!(Opcode::A64SetW.return_type(), Type::Void);
        assert_eq!(Opcode::A64SetW.num_args(), 2);

        assert_eq!(Opcode::GetNZCVFromOp.return_type(), Type::NZCVFlags);
    }

    #[test]
    fn test_opcode_classification() {
        assert!(Opcode::Sub64.is_add_sub());
        assert!(!Opcode::LogicalShiftLeft64.is_add_sub());
        assert!(Opcode::GetNZCVFromOp.is_pseudo_operation());
        assert!(!Opcode::A64GetCFlag.is_pseudo_operation());
    }
}
