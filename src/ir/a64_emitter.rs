use crate::frontend::a64::types::{Exception, Reg};
use crate::ir::block::Block;
use crate::ir::emitter::IREmitter;
use crate::ir::location::A64LocationDescriptor;
use crate::ir::opcode::Opcode;
use crate::ir::terminal::Terminal;
use crate::ir::value::Value;

/// A64-specific IR emitter. Extends IREmitter with A64 register and flag operations.
pub struct A64IREmitter<'a> {
    pub base: IREmitter<'a>,
    pub current_location: A64LocationDescriptor,
}

impl<'a> A64IREmitter<'a> {
    pub fn with_location(block: &'a mut Block, location: A64LocationDescriptor) -> Self {
        Self {
            base: IREmitter::new(block),
            current_location: location,
        }
    }

    pub fn pc(&self) -> u64 {
        self.current_location.pc()
    }

    /// Access the underlying base emitter for generic operations.
    pub fn ir(&mut self) -> &mut IREmitter<'a> {
        &mut self.base
    }

    pub fn set_term(&mut self, terminal: Terminal) {
        self.base.set_term(terminal);
    }

    fn emit(&mut self, opcode: Opcode, args: &[Value]) -> Value {
        let r = self.base.block.append(opcode, args);
        Value::Inst(r)
    }

    fn emit_void(&mut self, opcode: Opcode, args: &[Value]) {
        self.base.block.append(opcode, args);
    }

    // --- A64 register getters ---

    pub fn get_w(&mut self, reg: Reg) -> Value {
        self.emit(Opcode::A64GetW, &[Value::ImmA64Reg(reg)])
    }

    pub fn get_x(&mut self, reg: Reg) -> Value {
        self.emit(Opcode::A64GetX, &[Value::ImmA64Reg(reg)])
    }

    pub fn get_sp(&mut self) -> Value {
        self.emit(Opcode::A64GetSP, &[])
    }

    // --- A64 register setters ---

    /// Write the low word of `reg`; the upper 32 bits become zero.
    pub fn set_w(&mut self, reg: Reg, value: Value) {
        self.emit_void(Opcode::A64SetW, &[Value::ImmA64Reg(reg), value]);
    }

    pub fn set_x(&mut self, reg: Reg, value: Value) {
        self.emit_void(Opcode::A64SetX, &[Value::ImmA64Reg(reg), value]);
    }

    pub fn set_sp(&mut self, value: Value) {
        self.emit_void(Opcode::A64SetSP, &[value]);
    }

    pub fn set_pc(&mut self, value: Value) {
        self.emit_void(Opcode::A64SetPC, &[value]);
    }

    // --- Flags ---

    pub fn get_c_flag(&mut self) -> Value {
        self.emit(Opcode::A64GetCFlag, &[])
    }

    pub fn set_nzcv(&mut self, nzcv: Value) {
        self.emit_void(Opcode::A64SetNZCV, &[nzcv]);
    }

    // --- System ---

    pub fn exception_raised(&mut self, exception: Exception) {
        let pc = Value::ImmU64(self.pc());
        let exc = Value::ImmU64(exception as u64);
        self.emit_void(Opcode::A64ExceptionRaised, &[pc, exc]);
    }
}
