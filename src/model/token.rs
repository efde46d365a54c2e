//! Compact type handles.
//!
//! A [`TypeToken`] is the engine's stable identity for one registered type
//! descriptor: a descriptor-family tag in the high byte and a registration
//! index in the low 24 bits. Tokens are cheap to copy, hash, and compare, and
//! are the keys used throughout configuration and construction.

use std::fmt;

/// An opaque identity for a registered type descriptor.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the descriptor family
/// - The low 24 bits (bits 0-23) indicate the registration index within that family
///
/// Tokens are assigned by the [`crate::model::registry::TypeRegistry`] on registration
/// and remain stable for the process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeToken(pub u32);

impl TypeToken {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        TypeToken(value)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the descriptor family from the token (high byte)
    #[must_use]
    pub fn family(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the registration index from the token (low 24 bits)
    #[must_use]
    pub fn index(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for TypeToken {
    fn from(value: u32) -> Self {
        TypeToken(value)
    }
}

impl From<TypeToken> for u32 {
    fn from(token: TypeToken) -> Self {
        token.0
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TypeToken(0x{:08x}, family: 0x{:02x}, index: {})",
            self.0,
            self.family(),
            self.index()
        )
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
