//! # specimen Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! from the specimen library. Import this module to get quick access to the
//! essential types for fixture construction and verification.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all specimen operations
pub use crate::Error;

/// The result type used throughout specimen
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Configurable build request for one root type
pub use crate::fixture::{Behavior, Fixture};

/// Member path addressing for configuration
pub use crate::path::selector::{Selector, SelectorStep};

// ================================================================================================
// Type Model
// ================================================================================================

/// Descriptor registration and lookup
pub use crate::model::{
    builder::DescriptorBuilder,
    descriptor::{
        ConstructorDesc, EnumMemberDesc, FieldDesc, MethodDesc, ParamDesc, PropertyDesc,
        TypeDescriptor,
    },
    kind::{ContainerKind, FixtureKind, MemberFlags, PrimitiveKind},
    registry::TypeRegistry,
    token::TypeToken,
};

// ================================================================================================
// Values and Construction
// ================================================================================================

/// Runtime values and built instances
pub use crate::build::value::{ObjectInstance, Value};

/// Recording mock adapters
pub use crate::build::mock::MockInstance;

/// Constructor selection
pub use crate::build::strategy::{ConstructorStrategy, MaxParamsPublicPreferred};

/// Unique value generation
pub use crate::unique::UniqueSource;

/// Member configuration primitives
pub use crate::config::{CallbackFn, GeneratorFn};

// ================================================================================================
// Verification
// ================================================================================================

/// Invocation recording and query
pub use crate::verify::{
    query::{VerificationScope, VerifyQuery},
    record::{AccessKind, InvocationEntry, InvocationRecord},
};
