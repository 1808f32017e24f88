pub mod types;
pub mod imm;
pub mod decoder;
pub mod translate;

pub use types::{Datasize, ExtendType, Exception, Reg, RegRef, ShiftType};
pub use imm::Imm;
pub use decoder::{decode, DecodedInst, A64InstructionName};
pub use translate::{translate as translate_block, ReservedValue, ReservedValuePolicy, TranslatorVisitor, TranslationOptions};
