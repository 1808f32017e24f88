use std::fmt;
use crate::ir::location::LocationDescriptor;

/// Terminal instruction for an IR block.
/// Determines control flow after the block's instructions execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Invalid/unset terminal.
    Invalid,

    /// Fall back to interpreter starting at `next` for `num_instructions` instructions.
    Interpret {
        next: LocationDescriptor,
        num_instructions: usize,
    },

    /// Return control to the dispatcher (which reads current CPU state).
    ReturnToDispatch,

    /// Jump to block at `next` if cycles remain, else return to dispatch.
    LinkBlock {
        next: LocationDescriptor,
    },

    /// Check if halt was requested. If not halted, execute `else_`.
    CheckHalt {
        else_: Box<Terminal>,
    },
}

impl Terminal {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Terminal::Invalid)
    }

    pub fn interpret(next: LocationDescriptor) -> Self {
        Terminal::Interpret { next, num_instructions: 1 }
    }

    pub fn link_block(next: LocationDescriptor) -> Self {
        Terminal::LinkBlock { next }
    }

    pub fn check_halt(else_: Terminal) -> Self {
        Terminal::CheckHalt {
            else_: Box::new(else_),
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Invalid => write!(f, "Invalid"),
            Terminal::Interpret { next, num_instructions } => {
                write!(f, "Interpret({}, n={})", next, num_instructions)
            }
            Terminal::ReturnToDispatch => write!(f, "ReturnToDispatch"),
            Terminal::LinkBlock { next } => write!(f, "LinkBlock({})", next),
            Terminal::CheckHalt { else_ } => write!(f, "CheckHalt({})", else_),
        }
    }
}
