//! Immutable structural descriptions of registered types.
//!
//! A [`TypeDescriptor`] captures everything the engine needs to know about a type:
//! its [`FixtureKind`](crate::model::kind::FixtureKind), base type, implemented
//! interfaces, generic arguments, and the declared constructors, properties,
//! fields, methods, and enum members.
//!
//! Descriptors are computed once per type identity, wrapped in an [`std::sync::Arc`],
//! and cached in the [`TypeRegistry`](crate::model::registry::TypeRegistry) for the
//! process lifetime. They are strictly read-only after creation, which makes them
//! safe to share between concurrent build calls without locking.

use std::fmt;

use crate::model::{
    kind::{FixtureKind, MemberFlags, PrimitiveKind},
    token::TypeToken,
};

/// A named, typed parameter of a constructor or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDesc {
    /// Parameter name as declared
    pub name: String,
    /// Token of the parameter type
    pub ty: TypeToken,
}

impl ParamDesc {
    /// Create a new parameter description.
    #[must_use]
    pub fn new(name: &str, ty: TypeToken) -> Self {
        ParamDesc {
            name: name.to_string(),
            ty,
        }
    }
}

/// A declared constructor of a class descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDesc {
    /// Visibility flags of the constructor
    pub flags: MemberFlags,
    /// Declared parameters in order
    pub params: Vec<ParamDesc>,
}

impl ConstructorDesc {
    /// Returns `true` if the constructor is publicly visible.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags.contains(MemberFlags::PUBLIC)
    }
}

/// A declared property of a class or mock descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDesc {
    /// Property name as declared
    pub name: String,
    /// Token of the property type
    pub ty: TypeToken,
    /// Access flags (read/write/visibility)
    pub flags: MemberFlags,
}

/// A declared field of a class descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDesc {
    /// Field name as declared
    pub name: String,
    /// Token of the field type
    pub ty: TypeToken,
    /// Visibility flags
    pub flags: MemberFlags,
}

/// A declared method of a mock descriptor.
///
/// Overloads share a name and are distinguished by their parameter-type
/// signature; generic methods additionally carry a generic arity and can
/// declare that their return type is one of the generic arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDesc {
    /// Method name as declared
    pub name: String,
    /// Declared parameters in order
    pub params: Vec<ParamDesc>,
    /// Token of the declared return type, if the method returns a value
    /// of a concrete type
    pub returns: Option<TypeToken>,
    /// Number of generic type arguments the method declares
    pub generic_arity: u8,
    /// When set, the return type is the generic argument at this index and
    /// is only known from the actual bindings of each call
    pub generic_return: Option<u8>,
    /// Visibility flags
    pub flags: MemberFlags,
}

impl MethodDesc {
    /// The overload signature of this method, unique within its declaring type.
    ///
    /// Format: `name(param_tokens)` with a backtick-arity suffix for generic
    /// methods, e.g. `find(0x01000007,0x0100000d)` or `get_value()\`1`.
    #[must_use]
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| p.ty.to_string())
            .collect::<Vec<_>>()
            .join(",");
        if self.generic_arity > 0 {
            format!("{}({})`{}", self.name, params, self.generic_arity)
        } else {
            format!("{}({})", self.name, params)
        }
    }

    /// Look up a declared parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamDesc> {
        self.params.iter().find(|p| p.name == name)
    }

    /// The effective return type for a call with the given actual generic
    /// bindings.
    ///
    /// For a generic-return method this resolves against `type_args`; for
    /// everything else it is the declared return type. Returns `None` for
    /// void methods or when the bindings do not cover the declared index.
    #[must_use]
    pub fn effective_return(&self, type_args: &[TypeToken]) -> Option<TypeToken> {
        match self.generic_return {
            Some(index) => type_args.get(index as usize).copied(),
            None => self.returns,
        }
    }
}

/// A declared member of an enumeration, in source declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberDesc {
    /// Member name as declared
    pub name: String,
    /// Underlying numeric value
    pub value: i64,
}

/// Immutable structural facts about a registered type.
///
/// Computed once per distinct type identity and cached for the process
/// lifetime; shared read-only between all build calls.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Registry-assigned identity of this type
    pub token: TypeToken,
    /// Type name, unique within the registry
    pub name: String,
    /// Structural classification
    pub kind: FixtureKind,
    /// Token of the base type, if any
    pub base: Option<TypeToken>,
    /// Tokens of implemented interfaces
    pub interfaces: Vec<TypeToken>,
    /// Generic type arguments: element types for containers, the inner
    /// type for nullable wrappers
    pub generic_args: Vec<TypeToken>,
    /// Declared constructors in declaration order
    pub constructors: Vec<ConstructorDesc>,
    /// Declared properties in declaration order
    pub properties: Vec<PropertyDesc>,
    /// Declared fields in declaration order
    pub fields: Vec<FieldDesc>,
    /// Declared methods in declaration order
    pub methods: Vec<MethodDesc>,
    /// Declared enum members in source declaration order
    pub enum_members: Vec<EnumMemberDesc>,
}

impl TypeDescriptor {
    /// The base value kind of this type, if it is one.
    #[must_use]
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self.kind {
            FixtureKind::Base(kind) => Some(kind),
            _ => None,
        }
    }

    /// Look up a declared property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDesc> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Look up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All method overloads declared under the given name, in declaration order.
    #[must_use]
    pub fn methods_named(&self, name: &str) -> Vec<&MethodDesc> {
        self.methods.iter().filter(|m| m.name == name).collect()
    }

    /// Find the method overload with the exact parameter-type signature.
    #[must_use]
    pub fn find_method(&self, name: &str, param_types: &[TypeToken]) -> Option<&MethodDesc> {
        self.methods.iter().find(|m| {
            m.name == name
                && m.params.len() == param_types.len()
                && m.params
                    .iter()
                    .zip(param_types)
                    .all(|(p, ty)| p.ty == *ty)
        })
    }

    /// Returns `true` if any overload of `name` (or a property/field of that
    /// name) is declared on this type.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.property(name).is_some()
            || self.field(name).is_some()
            || self.methods.iter().any(|m| m.name == name)
    }

    /// Returns `true` if this type is realized as a recording adapter.
    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.kind.is_mock()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.token)
    }
}
