use std::fmt;

/// IR type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Type {
    Void = 0,
    A64Reg = 1 << 0,
    Opaque = 1 << 1,
    U1 = 1 << 2,
    U8 = 1 << 3,
    U16 = 1 << 4,
    U32 = 1 << 5,
    U64 = 1 << 6,
    NZCVFlags = 1 << 7,
}

impl Type {
    /// Check if two types are compatible.
    /// Opaque is compatible with any non-Void type.
    pub fn is_compatible_with(self, other: Type) -> bool {
        if self == other {
            return true;
        }
        if self == Type::Opaque && other != Type::Void {
            return true;
        }
        if other == Type::Opaque && self != Type::Void {
            return true;
        }
        false
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Type::Void => "Void",
            Type::A64Reg => "A64Reg",
            Type::Opaque => "Opaque",
            Type::U1 => "U1",
            Type::U8 => "U8",
            Type::U16 => "U16",
            Type::U32 => "U32",
            Type::U64 => "U64",
            Type::NZCVFlags => "NZCVFlags",
        };
        f.write_str(s)
    }
}
