/// An `N`-bit unsigned field extracted from an instruction encoding.
///
/// The stored value never exceeds `2^N - 1`. Field boundaries are the
/// decoder's contract; values wider than `N` bits are masked on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Imm<const N: usize> {
    value: u32,
}

impl<const N: usize> Imm<N> {
    const MASK: u32 = if N >= 32 { u32::MAX } else { (1u32 << N) - 1 };

    pub fn new(value: u32) -> Self {
        debug_assert!(
            value & !Self::MASK == 0,
            "value {value:#x} does not fit in a {N}-bit field"
        );
        Self { value: value & Self::MASK }
    }

    pub fn zero_extend(self) -> u64 {
        self.value as u64
    }

    pub fn bit(self, index: usize) -> bool {
        assert!(index < N, "bit {index} out of range for Imm<{N}>");
        (self.value >> index) & 1 != 0
    }

    pub fn bits(self) -> u32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_extend() {
        assert_eq!(Imm::<12>::new(0xFFF).zero_extend(), 0xFFF);
        assert_eq!(Imm::<2>::new(0b01).zero_extend(), 1);
    }

    #[test]
    fn test_bit() {
        let imm6 = Imm::<6>::new(0b10_0001);
        assert!(imm6.bit(5));
        assert!(!imm6.bit(4));
        assert!(imm6.bit(0));
    }

    #[test]
    fn test_bits() {
        assert_eq!(Imm::<2>::new(0b11).bits(), 0b11);
        assert_eq!(Imm::<3>::new(0b101).bits(), 0b101);
    }
}
