//! Classification of registered types and their members.
//!
//! Every [`crate::model::descriptor::TypeDescriptor`] carries a [`FixtureKind`] that
//! decides how the instance builder realizes it: base values come from the unique
//! value generator, containers are built empty, mock candidates become recording
//! adapters, and classes are constructed through a selected constructor.

use bitflags::bitflags;
use strum::{Display, EnumCount, EnumIter};

/// The base value kinds the engine can generate directly.
///
/// Each kind has a bounded or unbounded cardinality which limits how many
/// pairwise-distinct values the unique generator can promise before it may
/// repeat (see [`PrimitiveKind::cardinality`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[repr(u8)]
pub enum PrimitiveKind {
    /// Boolean value
    Bool = 0,
    /// Unicode scalar value
    Char = 1,
    /// 8-bit signed integer
    I1 = 2,
    /// 8-bit unsigned integer
    U1 = 3,
    /// 16-bit signed integer
    I2 = 4,
    /// 16-bit unsigned integer
    U2 = 5,
    /// 32-bit signed integer
    I4 = 6,
    /// 32-bit unsigned integer
    U4 = 7,
    /// 64-bit signed integer
    I8 = 8,
    /// 64-bit unsigned integer
    U8 = 9,
    /// 32-bit floating point
    R4 = 10,
    /// 64-bit floating point
    R8 = 11,
    /// String value
    String = 12,
}

impl PrimitiveKind {
    /// Number of distinct values of this kind, or `None` when the value
    /// space is unbounded for practical purposes (strings).
    ///
    /// The unique generator guarantees pairwise-distinct values for the
    /// first N requests whenever N does not exceed this cardinality.
    #[must_use]
    pub fn cardinality(&self) -> Option<u128> {
        match self {
            PrimitiveKind::Bool => Some(2),
            // Unicode scalar values minus the surrogate range
            PrimitiveKind::Char => Some(0x11_0000 - 0x800),
            PrimitiveKind::I1 | PrimitiveKind::U1 => Some(1 << 8),
            PrimitiveKind::I2 | PrimitiveKind::U2 => Some(1 << 16),
            PrimitiveKind::I4 | PrimitiveKind::U4 => Some(1 << 32),
            PrimitiveKind::I8 | PrimitiveKind::U8 => Some(1 << 64),
            // Non-negative finite values only; infinities, NaNs, and negative
            // values are never generated
            PrimitiveKind::R4 => Some(0x7F80_0000),
            PrimitiveKind::R8 => Some(0x7FF0_0000_0000_0000),
            PrimitiveKind::String => None,
        }
    }

    /// The canonical registry name of this kind.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::I1 => "i8",
            PrimitiveKind::U1 => "u8",
            PrimitiveKind::I2 => "i16",
            PrimitiveKind::U2 => "u16",
            PrimitiveKind::I4 => "i32",
            PrimitiveKind::U4 => "u32",
            PrimitiveKind::I8 => "i64",
            PrimitiveKind::U8 => "u64",
            PrimitiveKind::R4 => "f32",
            PrimitiveKind::R8 => "f64",
            PrimitiveKind::String => "string",
        }
    }
}

/// The container shapes the engine can realize.
///
/// Containers always build as fresh, empty, independently mutable instances,
/// regardless of their element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ContainerKind {
    /// Fixed-shape sequence of elements
    Array,
    /// Growable sequence of elements
    List,
    /// Key/value association
    Map,
}

/// Structural classification of a registered type.
///
/// The kind decides the realization path taken by the instance builder:
///
/// - [`FixtureKind::Base`] - generated by the unique value generator
/// - [`FixtureKind::Nullable`] - generated as a present inner value unless configured null
/// - [`FixtureKind::Enum`] - base-like for defaults, keeps its own member identity
/// - [`FixtureKind::Container`] - built as an empty container, never recursively populated
/// - [`FixtureKind::Mock`] - interfaces and abstract classes, realized as recording adapters
/// - [`FixtureKind::Class`] - everything else (structs included), constructed via a selected constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    /// A directly generatable base value
    Base(PrimitiveKind),
    /// A nullable wrapper around another type (inner type in `generic_args[0]`)
    Nullable,
    /// An enumeration with declaration-ordered members
    Enum,
    /// An array, list, or map shape (element types in `generic_args`)
    Container(ContainerKind),
    /// An interface or abstract class, realized via a recording adapter
    Mock,
    /// A concrete class or struct, constructed through a constructor
    Class,
}

impl FixtureKind {
    /// Returns `true` if this kind is realized by the unique value generator.
    #[must_use]
    pub fn is_generatable(&self) -> bool {
        matches!(
            self,
            FixtureKind::Base(_) | FixtureKind::Nullable | FixtureKind::Enum
        )
    }

    /// Returns `true` if this kind is realized as a recording adapter.
    #[must_use]
    pub fn is_mock(&self) -> bool {
        matches!(self, FixtureKind::Mock)
    }
}

bitflags! {
    /// Visibility and access attributes of a declared member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u32 {
        /// Member is publicly visible
        const PUBLIC = 0x0001;
        /// Property value can be read
        const READ = 0x0002;
        /// Property value can be written
        const WRITE = 0x0004;
        /// Member is declared static
        const STATIC = 0x0008;
    }
}

impl Default for MemberFlags {
    fn default() -> Self {
        MemberFlags::PUBLIC | MemberFlags::READ | MemberFlags::WRITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_primitive_cardinality() {
        assert_eq!(PrimitiveKind::Bool.cardinality(), Some(2));
        assert_eq!(PrimitiveKind::U1.cardinality(), Some(256));
        assert_eq!(PrimitiveKind::I1.cardinality(), Some(256));
        assert_eq!(PrimitiveKind::U2.cardinality(), Some(65536));
        assert_eq!(PrimitiveKind::R4.cardinality(), Some(0x7F80_0000));
        assert_eq!(PrimitiveKind::R8.cardinality(), Some(0x7FF0_0000_0000_0000));
        assert_eq!(PrimitiveKind::String.cardinality(), None);
    }

    #[test]
    fn test_primitive_names_are_distinct() {
        let names: Vec<&str> = PrimitiveKind::iter().map(|k| k.type_name()).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }

    #[test]
    fn test_fixture_kind_classification() {
        assert!(FixtureKind::Base(PrimitiveKind::I4).is_generatable());
        assert!(FixtureKind::Enum.is_generatable());
        assert!(FixtureKind::Nullable.is_generatable());
        assert!(!FixtureKind::Class.is_generatable());
        assert!(FixtureKind::Mock.is_mock());
        assert!(!FixtureKind::Container(ContainerKind::List).is_mock());
    }

    #[test]
    fn test_member_flags_default() {
        let flags = MemberFlags::default();
        assert!(flags.contains(MemberFlags::PUBLIC));
        assert!(flags.contains(MemberFlags::READ));
        assert!(flags.contains(MemberFlags::WRITE));
        assert!(!flags.contains(MemberFlags::STATIC));
    }
}
