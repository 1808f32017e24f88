//! A64 add/subtract instruction translation into an SSA IR.
//!
//! The sixteen add/subtract encodings (immediate, shifted register, extended
//! register and with-carry forms) are decoded, validated and lowered into
//! [`ir::Block`]s. [`ir::eval`] runs a block against a register file so the
//! translation can be checked end to end.

pub mod frontend;
pub mod ir;

pub use frontend::a64::translate::{translate, MemoryReadCodeFn};
pub use frontend::a64::{
    decode, A64InstructionName, DecodedInst, ReservedValue, ReservedValuePolicy, TranslationOptions,
};
pub use ir::eval::{evaluate, A64State, EvalError, Nzcv};
pub use ir::opt::{verification_pass, VerificationError};
pub use ir::{A64LocationDescriptor, Block};
