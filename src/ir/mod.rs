pub mod types;
pub mod value;
pub mod opcode;
pub mod inst;
pub mod block;
pub mod terminal;
pub mod location;
pub mod emitter;
pub mod a64_emitter;
pub mod eval;
pub mod opt;

pub use block::Block;
pub use inst::Inst;
pub use location::{A64LocationDescriptor, LocationDescriptor};
pub use opcode::Opcode;
pub use terminal::Terminal;
pub use types::Type;
pub use value::{InstRef, Value};
