use crate::frontend::a64::decoder::DecodedInst;
use crate::frontend::a64::translate::error::ReservedValue;
use crate::frontend::a64::translate::helpers::{
    decode_extended_operand, decode_imm_operand, decode_shifted_operand, Operand2,
};
use crate::frontend::a64::translate::visitor::TranslatorVisitor;
use crate::frontend::a64::types::{Datasize, Reg, RegRef};
use crate::ir::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddSubOp {
    Add,
    Sub,
}

/// Encoding group, which fixes how operand 2 is decoded and where R31 means SP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperandForm {
    Immediate,
    ShiftedRegister,
    ExtendedRegister,
    WithCarry,
}

impl OperandForm {
    fn rn_is_sp_eligible(self) -> bool {
        matches!(self, OperandForm::Immediate | OperandForm::ExtendedRegister)
    }

    /// Only the non-flag-setting immediate and extended forms may write SP.
    fn rd_is_sp_eligible(self, sets_flags: bool) -> bool {
        !sets_flags && self.rn_is_sp_eligible()
    }
}

fn reg_ref(reg: Reg, sp_eligible: bool) -> RegRef {
    if sp_eligible {
        RegRef::gpr_or_sp(reg)
    } else {
        RegRef::gpr_or_zr(reg)
    }
}

impl<'a> TranslatorVisitor<'a> {
    /// Emit `a + b + carry_in` (ADD) or `a + !b + carry_in` (SUB) at `datasize`.
    pub fn add_sub_op(&mut self, op: AddSubOp, datasize: Datasize, a: Value, b: Value, carry_in: Value) -> Value {
        match (op, datasize) {
            (AddSubOp::Add, Datasize::W32) => self.ir.ir().add_32(a, b, carry_in),
            (AddSubOp::Add, Datasize::W64) => self.ir.ir().add_64(a, b, carry_in),
            (AddSubOp::Sub, Datasize::W32) => self.ir.ir().sub_32(a, b, carry_in),
            (AddSubOp::Sub, Datasize::W64) => self.ir.ir().sub_64(a, b, carry_in),
        }
    }

    fn add_sub(
        &mut self,
        inst: &DecodedInst,
        op: AddSubOp,
        sets_flags: bool,
        form: OperandForm,
    ) -> Result<(), ReservedValue> {
        let datasize = Datasize::from_sf(inst.sf());

        // Everything that can reject the encoding runs before the first emit.
        let operand2 = match form {
            OperandForm::Immediate => decode_imm_operand(inst.shift(), inst.imm12())?,
            OperandForm::ShiftedRegister => {
                decode_shifted_operand(datasize, inst.shift(), inst.rm(), inst.imm6())?
            }
            OperandForm::ExtendedRegister => decode_extended_operand(inst.option(), inst.rm(), inst.imm3())?,
            OperandForm::WithCarry => Operand2::register(inst.rm()),
        };
        let rn = reg_ref(inst.rn(), form.rn_is_sp_eligible());
        let rd = reg_ref(inst.rd(), form.rd_is_sp_eligible(sets_flags));

        let operand1 = self.reg(datasize, rn);
        let operand2 = self.operand2(datasize, operand2);
        let carry_in = match (form, op) {
            (OperandForm::WithCarry, _) => self.carry_flag(),
            (_, AddSubOp::Add) => self.ir.ir().imm1(false),
            (_, AddSubOp::Sub) => self.ir.ir().imm1(true),
        };
        let result = self.add_sub_op(op, datasize, operand1, operand2, carry_in);

        if sets_flags {
            self.set_nzcv_from(result);
        }
        self.set_reg(datasize, rd, result);
        Ok(())
    }

    // --- ADD/SUB immediate ---

    pub fn add_imm(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Add, false, OperandForm::Immediate)
    }

    pub fn adds_imm(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Add, true, OperandForm::Immediate)
    }

    pub fn sub_imm(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Sub, false, OperandForm::Immediate)
    }

    pub fn subs_imm(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Sub, true, OperandForm::Immediate)
    }

    // --- ADD/SUB shifted register ---

    pub fn add_shift(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Add, false, OperandForm::ShiftedRegister)
    }

    pub fn adds_shift(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Add, true, OperandForm::ShiftedRegister)
    }

    pub fn sub_shift(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Sub, false, OperandForm::ShiftedRegister)
    }

    pub fn subs_shift(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Sub, true, OperandForm::ShiftedRegister)
    }

    // --- ADD/SUB extended register ---

    pub fn add_ext(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Add, false, OperandForm::ExtendedRegister)
    }

    pub fn adds_ext(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Add, true, OperandForm::ExtendedRegister)
    }

    pub fn sub_ext(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Sub, false, OperandForm::ExtendedRegister)
    }

    pub fn subs_ext(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Sub, true, OperandForm::ExtendedRegister)
    }

    // --- ADD/SUB with carry ---

    pub fn adc(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Add, false, OperandForm::WithCarry)
    }

    pub fn adcs(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Add, true, OperandForm::WithCarry)
    }

    pub fn sbc(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Sub, false, OperandForm::WithCarry)
    }

    pub fn sbcs(&mut self, inst: &DecodedInst) -> Result<(), ReservedValue> {
        self.add_sub(inst, AddSubOp::Sub, true, OperandForm::WithCarry)
    }
}
