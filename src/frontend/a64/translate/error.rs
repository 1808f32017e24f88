use thiserror::Error;

/// Why an add/subtract encoding was rejected.
///
/// A handler that returns one of these has appended nothing to the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ReservedValue {
    /// Immediate form with a shift selector of `10` or `11`.
    #[error("reserved immediate shift selector {selector:#04b}")]
    ImmediateShift { selector: u32 },

    /// Shifted-register form with shift type `11` (ROR).
    #[error("rotate is not a valid shift for add/subtract")]
    RotateShift,

    /// 32-bit shifted-register form with a shift amount of 32 or more.
    #[error("shift amount {amount} out of range for a 32-bit operation")]
    ShiftAmountOutOfRange { amount: u32 },

    /// Extended-register form with a left shift greater than 4.
    #[error("extended register shift {amount} exceeds 4")]
    ExtendShiftOutOfRange { amount: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_value_messages() {
        assert_eq!(
            ReservedValue::ImmediateShift { selector: 2 }.to_string(),
            "reserved immediate shift selector 0b10"
        );
        assert_eq!(
            ReservedValue::ExtendShiftOutOfRange { amount: 5 }.to_string(),
            "extended register shift 5 exceeds 4"
        );
    }
}
