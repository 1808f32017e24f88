use crate::ir::block::Block;
use crate::ir::opcode::Opcode;
use crate::ir::terminal::Terminal;
use crate::ir::value::Value;

/// Base IR emitter. The builder API for constructing IR blocks.
/// Wraps a Block and appends instructions to it.
pub struct IREmitter<'a> {
    pub block: &'a mut Block,
}

impl<'a> IREmitter<'a> {
    pub fn new(block: &'a mut Block) -> Self {
        Self { block }
    }

    /// Internal: emit an instruction and return its Value as an InstRef.
    fn emit(&mut self, opcode: Opcode, args: &[Value]) -> Value {
        let r = self.block.append(opcode, args);
        Value::Inst(r)
    }

    pub fn set_term(&mut self, terminal: Terminal) {
        self.block.set_terminal(terminal);
    }

    // --- Immediates ---

    pub fn imm1(&self, value: bool) -> Value { Value::ImmU1(value) }
    pub fn imm8(&self, value: u8) -> Value { Value::ImmU8(value) }
    pub fn imm32(&self, value: u32) -> Value { Value::ImmU32(value) }
    pub fn imm64(&self, value: u64) -> Value { Value::ImmU64(value) }

    // --- Extract ---

    pub fn least_significant_word(&mut self, value: Value) -> Value {
        self.emit(Opcode::LeastSignificantWord, &[value])
    }

    pub fn least_significant_half(&mut self, value: Value) -> Value {
        self.emit(Opcode::LeastSignificantHalf, &[value])
    }

    pub fn least_significant_byte(&mut self, value: Value) -> Value {
        self.emit(Opcode::LeastSignificantByte, &[value])
    }

    // --- Shifts (32-bit with carry) ---

    pub fn logical_shift_left_32(&mut self, value: Value, shift: Value, carry_in: Value) -> Value {
        self.emit(Opcode::LogicalShiftLeft32, &[value, shift, carry_in])
    }

    pub fn logical_shift_left_64(&mut self, value: Value, shift: Value) -> Value {
        self.emit(Opcode::LogicalShiftLeft64, &[value, shift])
    }

    pub fn logical_shift_right_32(&mut self, value: Value, shift: Value, carry_in: Value) -> Value {
        self.emit(Opcode::LogicalShiftRight32, &[value, shift, carry_in])
    }

    pub fn logical_shift_right_64(&mut self, value: Value, shift: Value) -> Value {
        self.emit(Opcode::LogicalShiftRight64, &[value, shift])
    }

    pub fn arithmetic_shift_right_32(&mut self, value: Value, shift: Value, carry_in: Value) -> Value {
        self.emit(Opcode::ArithmeticShiftRight32, &[value, shift, carry_in])
    }

    pub fn arithmetic_shift_right_64(&mut self, value: Value, shift: Value) -> Value {
        self.emit(Opcode::ArithmeticShiftRight64, &[value, shift])
    }

    // --- ALU ---

    pub fn add_32(&mut self, a: Value, b: Value, carry_in: Value) -> Value {
        self.emit(Opcode::Add32, &[a, b, carry_in])
    }

    pub fn add_64(&mut self, a: Value, b: Value, carry_in: Value) -> Value {
        self.emit(Opcode::Add64, &[a, b, carry_in])
    }

    pub fn sub_32(&mut self, a: Value, b: Value, carry_in: Value) -> Value {
        self.emit(Opcode::Sub32, &[a, b, carry_in])
    }

    pub fn sub_64(&mut self, a: Value, b: Value, carry_in: Value) -> Value {
        self.emit(Opcode::Sub64, &[a, b, carry_in])
    }

    // --- Extension ---

    pub fn sign_extend_byte_to_word(&mut self, a: Value) -> Value {
        self.emit(Opcode::SignExtendByteToWord, &[a])
    }

    pub fn sign_extend_half_to_word(&mut self, a: Value) -> Value {
        self.emit(Opcode::SignExtendHalfToWord, &[a])
    }

    pub fn sign_extend_byte_to_long(&mut self, a: Value) -> Value {
        self.emit(Opcode::SignExtendByteToLong, &[a])
    }

    pub fn sign_extend_half_to_long(&mut self, a: Value) -> Value {
        self.emit(Opcode::SignExtendHalfToLong, &[a])
    }

    pub fn sign_extend_word_to_long(&mut self, a: Value) -> Value {
        self.emit(Opcode::SignExtendWordToLong, &[a])
    }

    pub fn zero_extend_byte_to_word(&mut self, a: Value) -> Value {
        self.emit(Opcode::ZeroExtendByteToWord, &[a])
    }

    pub fn zero_extend_half_to_word(&mut self, a: Value) -> Value {
        self.emit(Opcode::ZeroExtendHalfToWord, &[a])
    }

    pub fn zero_extend_byte_to_long(&mut self, a: Value) -> Value {
        self.emit(Opcode::ZeroExtendByteToLong, &[a])
    }

    pub fn zero_extend_half_to_long(&mut self, a: Value) -> Value {
        self.emit(Opcode::ZeroExtendHalfToLong, &[a])
    }

    pub fn zero_extend_word_to_long(&mut self, a: Value) -> Value {
        self.emit(Opcode::ZeroExtendWordToLong, &[a])
    }

    // --- Flags ---

    pub fn get_nzcv_from_op(&mut self, value: Value) -> Value {
        self.emit(Opcode::GetNZCVFromOp, &[value])
    }
}
