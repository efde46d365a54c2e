//! Type model: tokens, classification, descriptors, and the process-wide registry.
//!
//! The engine has no runtime reflection to lean on, so callers describe their
//! types once through the [`DescriptorBuilder`] fluent API. The resulting
//! [`TypeDescriptor`]s are immutable, cached in the [`TypeRegistry`] for the
//! process lifetime, and shared read-only between all build calls.
//!
//! # Key Components
//!
//! - [`TypeToken`] - Opaque identity of a registered type
//! - [`FixtureKind`] / [`PrimitiveKind`] / [`ContainerKind`] - Structural classification
//! - [`TypeDescriptor`] - Immutable structural facts about one type
//! - [`TypeRegistry`] - Concurrent, append-only descriptor store
//! - [`DescriptorBuilder`] - Fluent descriptor construction

pub mod builder;
pub mod descriptor;
pub mod kind;
pub mod registry;
pub mod token;

pub use builder::DescriptorBuilder;
pub use descriptor::{
    ConstructorDesc, EnumMemberDesc, FieldDesc, MethodDesc, ParamDesc, PropertyDesc,
    TypeDescriptor,
};
pub use kind::{ContainerKind, FixtureKind, MemberFlags, PrimitiveKind};
pub use registry::TypeRegistry;
pub use token::TypeToken;
