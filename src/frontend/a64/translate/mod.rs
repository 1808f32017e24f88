mod helpers;
mod visitor;
mod error;
mod data_processing_addsub;

pub use data_processing_addsub::AddSubOp;
pub use error::ReservedValue;
pub use helpers::{decode_extended_operand, decode_imm_operand, decode_shifted_operand, Operand2};
pub use visitor::{ReservedValuePolicy, TranslationOptions, TranslatorVisitor};

use tracing::{debug, trace};

use crate::frontend::a64::decoder::decode;
use crate::ir::block::Block;
use crate::ir::location::A64LocationDescriptor;
use crate::ir::terminal::Terminal;

/// Callback for reading instruction memory.
pub type MemoryReadCodeFn = dyn Fn(u64) -> Option<u32>;

/// Translate a block of A64 instructions into IR.
pub fn translate(
    descriptor: A64LocationDescriptor,
    memory_read_code: &MemoryReadCodeFn,
    options: TranslationOptions,
) -> Block {
    let single_step = descriptor.single_stepping();
    let max_instructions = options.max_instructions.max(1);

    let mut block = Block::new(descriptor.to_location());
    let mut visitor = TranslatorVisitor::new(&mut block, descriptor, options);

    let mut translated = 0usize;
    let mut should_continue = true;
    while should_continue {
        let pc = visitor.ir.pc();

        match memory_read_code(pc).map(|word| (word, decode(word))) {
            Some((_, Some(decoded))) => {
                trace!(
                    pc = format_args!("{:#x}", pc),
                    name = %decoded.name,
                    raw = format_args!("{:#010x}", decoded.raw),
                    "translating"
                );
                should_continue = visitor.dispatch(&decoded);
            }
            Some((word, None)) => {
                debug!(pc = format_args!("{:#x}", pc), raw = format_args!("{:#010x}", word), "undecodable instruction");
                should_continue = visitor.unallocated_encoding();
            }
            None => {
                debug!(pc = format_args!("{:#x}", pc), "instruction fetch failed");
                should_continue = visitor.unallocated_encoding();
            }
        }

        if should_continue {
            visitor.ir.current_location = visitor.ir.current_location.advance_pc(4);
            visitor.ir.base.block.cycle_count += 1;
            translated += 1;
        }

        if single_step || translated >= max_instructions {
            break;
        }
    }

    let final_loc = visitor.ir.current_location;

    // If no terminal was set (e.g., single step), set a default
    if block.terminal.is_invalid() {
        block.set_terminal(Terminal::link_block(final_loc.to_location()));
    }

    block
}
