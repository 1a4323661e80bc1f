//! Type index handle.
//!
//! Every type the generator sees, named or anonymous, lives in the
//! [`Universe`](crate::Universe) arena and is referenced by a 32-bit `TypeId`.
//!
//! # Design
//!
//! - Predeclared Go types have fixed indices for O(1) access
//! - Type identity is index equality (anonymous shapes are interned)
//! - Copy, lightweight passing

use std::fmt;

/// A 32-bit index into the type arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // === Predeclared Types (indices 0-20) ===
    // Interned when the universe is created.

    pub const BOOL: Self = Self(0);
    pub const STRING: Self = Self(1);
    pub const INT: Self = Self(2);
    pub const INT8: Self = Self(3);
    pub const INT16: Self = Self(4);
    pub const INT32: Self = Self(5);
    pub const INT64: Self = Self(6);
    pub const UINT: Self = Self(7);
    pub const UINT8: Self = Self(8);
    pub const UINT16: Self = Self(9);
    pub const UINT32: Self = Self(10);
    pub const UINT64: Self = Self(11);
    pub const UINTPTR: Self = Self(12);
    pub const FLOAT32: Self = Self(13);
    pub const FLOAT64: Self = Self(14);
    pub const COMPLEX64: Self = Self(15);
    pub const COMPLEX128: Self = Self(16);
    pub const BYTE: Self = Self(17);
    pub const RUNE: Self = Self(18);
    /// The predeclared `error` interface.
    pub const ERROR: Self = Self(19);
    /// The empty interface, `interface{}` (also spelled `any`).
    pub const EMPTY_INTERFACE: Self = Self(20);

    /// Number of predeclared types; the first dynamic index.
    pub const PREDECLARED_COUNT: u32 = 21;

    /// Names of the predeclared builtin (non-interface) types, by index.
    pub(crate) const BUILTIN_NAMES: [&'static str; 19] = [
        "bool",
        "string",
        "int",
        "int8",
        "int16",
        "int32",
        "int64",
        "uint",
        "uint8",
        "uint16",
        "uint32",
        "uint64",
        "uintptr",
        "float32",
        "float64",
        "complex64",
        "complex128",
        "byte",
        "rune",
    ];

    /// Create an index from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position of this type in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the predeclared types.
    #[inline]
    pub const fn is_predeclared(self) -> bool {
        self.0 < Self::PREDECLARED_COUNT
    }

    /// Look up a predeclared type by its Go spelling.
    pub fn predeclared(name: &str) -> Option<Self> {
        match name {
            "error" => return Some(Self::ERROR),
            "any" | "interface{}" => return Some(Self::EMPTY_INTERFACE),
            _ => {}
        }
        Self::BUILTIN_NAMES
            .iter()
            .position(|&builtin| builtin == name)
            .and_then(|pos| u32::try_from(pos).ok())
            .map(Self)
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Self::BUILTIN_NAMES.get(self.index()) {
            Some(name) => write!(f, "TypeId::{}", name.to_uppercase()),
            None if *self == Self::ERROR => write!(f, "TypeId::ERROR"),
            None if *self == Self::EMPTY_INTERFACE => write!(f, "TypeId::EMPTY_INTERFACE"),
            None => write!(f, "TypeId({})", self.0),
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

const _: () = assert!(std::mem::size_of::<TypeId>() == 4);

#[cfg(test)]
mod tests;
