use std::fmt;

use crate::ir::inst::Inst;
use crate::ir::location::LocationDescriptor;
use crate::ir::opcode::Opcode;
use crate::ir::terminal::Terminal;
use crate::ir::types::Type;
use crate::ir::value::{InstRef, Value};

/// An IR basic block: a sequence of instructions followed by a terminal.
/// Instructions are stored in a `Vec<Inst>` arena, indexed by `InstRef(u32)`.
#[derive(Debug, Clone)]
pub struct Block {
    /// The location this block represents.
    pub location: LocationDescriptor,
    /// Arena of instructions.
    pub instructions: Vec<Inst>,
    /// Block terminator.
    pub terminal: Terminal,
    /// Number of guest instructions this block represents.
    pub cycle_count: u64,
}

impl Block {
    /// Create a new empty block at the given location.
    pub fn new(location: LocationDescriptor) -> Self {
        Self {
            location,
            instructions: Vec::new(),
            terminal: Terminal::Invalid,
            cycle_count: 0,
        }
    }

    /// Append a new instruction with the given opcode and args, return its InstRef.
    /// Also increments use_count for any InstRef arguments.
    pub fn append(&mut self, opcode: Opcode, args: &[Value]) -> InstRef {
        for arg in args {
            if let Value::Inst(ref_) = arg {
                self.instructions[ref_.index()].use_count += 1;
            }
        }
        let idx = self.instructions.len();
        self.instructions.push(Inst::new(opcode, args));
        InstRef(idx as u32)
    }

    /// Get an instruction by reference.
    pub fn get(&self, r: InstRef) -> &Inst {
        &self.instructions[r.index()]
    }

    /// Set the terminal instruction.
    pub fn set_terminal(&mut self, terminal: Terminal) {
        self.terminal = terminal;
    }

    /// Returns the number of instructions.
    pub fn inst_count(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the block has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterate over all instructions in program order with their InstRefs.
    pub fn iter(&self) -> impl Iterator<Item = (InstRef, &Inst)> {
        self.instructions.iter().enumerate()
            .map(|(i, inst)| (InstRef(i as u32), inst))
    }

    /// Instructions with the given opcode, in program order.
    pub fn find_opcode(&self, opcode: Opcode) -> impl Iterator<Item = (InstRef, &Inst)> {
        self.iter().filter(move |(_, inst)| inst.opcode == opcode)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block {} (cycles: {}):", self.location, self.cycle_count)?;
        for (ref_, inst) in self.iter() {
            if inst.return_type() != Type::Void {
                writeln!(f, "  {} = {}", ref_, inst)?;
            } else {
                writeln!(f, "  {}", inst)?;
            }
        }
        writeln!(f, "  terminal: {}", self.terminal)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::a64::types::Reg;

    #[test]
    fn test_block_creation_and_append() {
        let mut block = Block::new(LocationDescriptor(0x1000));

        let get_x2 = block.append(Opcode::A64GetX, &[Value::ImmA64Reg(Reg::R2)]);
        let get_x3 = block.append(Opcode::A64GetX, &[Value::ImmA64Reg(Reg::R3)]);
        let add = block.append(
            Opcode::Add64,
            &[Value::Inst(get_x2), Value::Inst(get_x3), Value::ImmU1(false)],
        );
        block.append(Opcode::A64SetX, &[Value::ImmA64Reg(Reg::R1), Value::Inst(add)]);

        assert_eq!(block.inst_count(), 4);

        assert_eq!(block.get(get_x2).use_count, 1);
        assert_eq!(block.get(get_x3).use_count, 1);
        assert_eq!(block.get(add).use_count, 1);

        let s = format!("{}", block);
        assert!(s.contains("%2 = Add64 %0, %1, #0"));
        assert!(s.contains("A64SetX X1, %2"));
        assert_eq!(block.find_opcode(Opcode::A64GetX).count(), 2);
    }

    #[test]
    fn test_block_display_with_terminal() {
        let mut block = Block::new(LocationDescriptor(0x40));
        assert!(block.is_empty());
        block.append(Opcode::A64SetSP, &[Value::ImmU64(0x8000)]);
        block.cycle_count = 1;
        block.set_terminal(Terminal::ReturnToDispatch);

        assert_eq!(
            block.to_string(),
            "Block loc:0x0000000000000040 (cycles: 1):\n  A64SetSP #0x8000\n  terminal: ReturnToDispatch\n"
        );
    }
}
