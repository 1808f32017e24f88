use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::frontend::a64::decoder::{A64InstructionName, DecodedInst};
use crate::frontend::a64::translate::error::ReservedValue;
use crate::frontend::a64::types::{Datasize, Exception, Reg, RegRef};
use crate::ir::a64_emitter::A64IREmitter;
use crate::ir::block::Block;
use crate::ir::location::A64LocationDescriptor;
use crate::ir::terminal::Terminal;
use crate::ir::value::Value;

/// What the dispatcher does with an encoding a handler rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedValuePolicy {
    /// End the block with an `Interpret` terminal at the rejected instruction.
    #[default]
    Interpret,
    /// Set PC, raise `Exception::ReservedValue` and check for halt.
    RaiseException,
}

/// Options controlling translation behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationOptions {
    pub reserved_value: ReservedValuePolicy,
    /// Upper bound on guest instructions per block.
    pub max_instructions: usize,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            reserved_value: ReservedValuePolicy::Interpret,
            max_instructions: 32,
        }
    }
}

/// Translator visitor: translates decoded A64 instructions into IR.
pub struct TranslatorVisitor<'a> {
    pub ir: A64IREmitter<'a>,
    pub options: TranslationOptions,
}

impl<'a> TranslatorVisitor<'a> {
    pub fn new(
        block: &'a mut Block,
        location: A64LocationDescriptor,
        options: TranslationOptions,
    ) -> Self {
        Self {
            ir: A64IREmitter::with_location(block, location),
            options,
        }
    }

    // --- Register access helpers ---

    /// Read a register operand, routing R31 to SP or ZR by its role.
    pub fn reg(&mut self, datasize: Datasize, r: RegRef) -> Value {
        if r.is_sp() {
            self.sp(datasize)
        } else {
            self.x(datasize, r.reg)
        }
    }

    /// Write a register operand, routing R31 to SP or ZR by its role.
    pub fn set_reg(&mut self, datasize: Datasize, r: RegRef, value: Value) {
        if r.is_sp() {
            self.set_sp(datasize, value);
        } else {
            self.set_x(datasize, r.reg, value);
        }
    }

    /// Read a general-purpose register (32 or 64 bit).
    /// R31 reads as zero register (XZR/WZR).
    pub fn x(&mut self, datasize: Datasize, reg: Reg) -> Value {
        match (datasize, reg == Reg::ZR) {
            (Datasize::W32, true) => self.ir.ir().imm32(0),
            (Datasize::W64, true) => self.ir.ir().imm64(0),
            (Datasize::W32, false) => self.ir.get_w(reg),
            (Datasize::W64, false) => self.ir.get_x(reg),
        }
    }

    /// Write a general-purpose register (32 or 64 bit).
    /// R31 writes are discarded (XZR/WZR).
    pub fn set_x(&mut self, datasize: Datasize, reg: Reg, value: Value) {
        if reg == Reg::ZR {
            return;
        }
        match datasize {
            Datasize::W32 => self.ir.set_w(reg, value),
            Datasize::W64 => self.ir.set_x(reg, value),
        }
    }

    /// Read the stack pointer (R31 as SP, not ZR).
    pub fn sp(&mut self, datasize: Datasize) -> Value {
        let sp64 = self.ir.get_sp();
        match datasize {
            Datasize::W32 => self.ir.ir().least_significant_word(sp64),
            Datasize::W64 => sp64,
        }
    }

    /// Write the stack pointer. 32-bit results are zero-extended.
    pub fn set_sp(&mut self, datasize: Datasize, value: Value) {
        match datasize {
            Datasize::W32 => {
                let ext = self.ir.ir().zero_extend_word_to_long(value);
                self.ir.set_sp(ext);
            }
            Datasize::W64 => self.ir.set_sp(value),
        }
    }

    /// Create an immediate of the given datasize.
    pub fn i(&mut self, datasize: Datasize, imm: u64) -> Value {
        match datasize {
            Datasize::W32 => self.ir.ir().imm32(imm as u32),
            Datasize::W64 => self.ir.ir().imm64(imm),
        }
    }

    // --- Flag helpers ---

    /// Current value of the C flag.
    pub fn carry_flag(&mut self) -> Value {
        self.ir.get_c_flag()
    }

    /// Set NZCV from the flags produced by an add/sub `result`.
    pub fn set_nzcv_from(&mut self, result: Value) {
        let nzcv = self.ir.ir().get_nzcv_from_op(result);
        self.ir.set_nzcv(nzcv);
    }

    // --- Error handlers ---

    /// Fallback: interpret this instruction.
    pub fn interpret_this_instruction(&mut self) -> bool {
        let loc = self.ir.current_location;
        self.ir.set_term(Terminal::interpret(loc.to_location()));
        false
    }

    /// Raise an exception at the current instruction.
    pub fn raise_exception(&mut self, exception: Exception) -> bool {
        let pc = self.ir.pc();
        self.ir.base.block.cycle_count += 1;
        let pc_val = self.ir.ir().imm64(pc);
        self.ir.set_pc(pc_val);
        self.ir.exception_raised(exception);
        self.ir.set_term(Terminal::check_halt(Terminal::ReturnToDispatch));
        false
    }

    /// Reserved value in instruction encoding.
    pub fn reserved_value(&mut self) -> bool {
        match self.options.reserved_value {
            ReservedValuePolicy::Interpret => self.interpret_this_instruction(),
            ReservedValuePolicy::RaiseException => self.raise_exception(Exception::ReservedValue),
        }
    }

    /// Unallocated encoding.
    pub fn unallocated_encoding(&mut self) -> bool {
        self.raise_exception(Exception::UnallocatedEncoding)
    }

    // --- Instruction dispatch ---

    /// Run the handler for `inst`. On error nothing has been emitted.
    pub fn handle(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        use A64InstructionName::*;
        match inst.name {
            // Data processing - Add/Sub immediate
            ADD_imm => self.add_imm(inst),
            ADDS_imm => self.adds_imm(inst),
            SUB_imm => self.sub_imm(inst),
            SUBS_imm => self.subs_imm(inst),

            // Data processing - Add/Sub shifted register
            ADD_shift => self.add_shift(inst),
            ADDS_shift => self.adds_shift(inst),
            SUB_shift => self.sub_shift(inst),
            SUBS_shift => self.subs_shift(inst),

            // Data processing - Add/Sub extended register
            ADD_ext => self.add_ext(inst),
            ADDS_ext => self.adds_ext(inst),
            SUB_ext => self.sub_ext(inst),
            SUBS_ext => self.subs_ext(inst),

            // Data processing - Add/Sub with carry
            ADC => self.adc(inst),
            ADCS => self.adcs(inst),
            SBC => self.sbc(inst),
            SBCS => self.sbcs(inst),
        }
    }

    /// Dispatch a decoded instruction to the appropriate handler.
    /// Returns true to continue translation, false to terminate the block.
    pub fn dispatch(&mut self, inst: &DecodedInst) -> bool {
        match self.handle(inst) {
            Ok(()) => true,
            Err(reason) => {
                debug!(
                    pc = format_args!("{:#x}", self.ir.pc()),
                    name = %inst.name,
                    raw = format_args!("{:#010x}", inst.raw),
                    %reason,
                    "rejected encoding"
                );
                self.reserved_value()
            }
        }
    }
}
