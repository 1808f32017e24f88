use std::fmt;

/// Generic location descriptor: a unique u64 hash identifying a block's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationDescriptor(pub u64);

impl fmt::Display for LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loc:{:#018x}", self.0)
    }
}

/// A64-specific location descriptor.
/// Encodes: PC (56 bits), single_stepping (bit 57).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct A64LocationDescriptor {
    pc: u64,
    single_stepping: bool,
}

impl A64LocationDescriptor {
    const PC_BIT_COUNT: u32 = 56;
    const PC_MASK: u64 = (1u64 << Self::PC_BIT_COUNT) - 1;
    const SINGLE_STEPPING_BIT: u32 = 57;

    pub fn new(pc: u64, single_stepping: bool) -> Self {
        Self {
            pc: pc & Self::PC_MASK,
            single_stepping,
        }
    }

    /// Get PC, sign-extended from 56 bits.
    pub fn pc(self) -> u64 {
        let shift = 64 - Self::PC_BIT_COUNT;
        ((self.pc as i64) << shift >> shift) as u64
    }

    pub fn single_stepping(self) -> bool {
        self.single_stepping
    }

    pub fn advance_pc(self, amount: i64) -> Self {
        Self::new(self.pc.wrapping_add(amount as u64), self.single_stepping)
    }

    pub fn unique_hash(self) -> u64 {
        let ss_u64 = (self.single_stepping as u64) << Self::SINGLE_STEPPING_BIT;
        self.pc | ss_u64
    }

    pub fn to_location(self) -> LocationDescriptor {
        LocationDescriptor(self.unique_hash())
    }
}

impl fmt::Display for A64LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(pc:{:#x} ss:{})", self.pc(), self.single_stepping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a64_location_hash() {
        let loc = A64LocationDescriptor::new(0x1234_5678, true);
        assert_eq!(loc.to_location(), LocationDescriptor(0x0200_0000_1234_5678));
        assert_eq!(loc.pc(), 0x1234_5678);
        assert!(loc.single_stepping());
        assert_eq!(loc.to_string(), "(pc:0x12345678 ss:true)");
    }

    #[test]
    fn test_a64_location_advance_and_sign_extension() {
        let loc = A64LocationDescriptor::new(0x1000, false).advance_pc(4);
        assert_eq!(loc.pc(), 0x1004);

        let high = A64LocationDescriptor::new(0xFFFF_FFFF_FFFF_FFF0, false);
        assert_eq!(high.pc(), 0xFFFF_FFFF_FFFF_FFF0);
    }
}
