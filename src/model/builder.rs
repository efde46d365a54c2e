//! Builder for type descriptors.
//!
//! This module provides the [`DescriptorBuilder`], a fluent API for describing the
//! structure of classes, interfaces, abstract classes, and enumerations to the
//! engine. A finished builder registers its descriptor in the
//! [`TypeRegistry`](crate::model::registry::TypeRegistry) and returns the assigned
//! [`TypeToken`].
//!
//! # Example
//!
//! ```rust
//! use specimen::prelude::*;
//!
//! let registry = TypeRegistry::new();
//! let string = registry.primitive(PrimitiveKind::String);
//! let i32_t = registry.primitive(PrimitiveKind::I4);
//!
//! let person = DescriptorBuilder::class(&registry, "Person")
//!     .ctor(&[("name", string), ("age", i32_t)])
//!     .property("Name", string)
//!     .field("tag", i32_t)
//!     .finish()?;
//! # Ok::<(), specimen::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    model::{
        descriptor::{
            ConstructorDesc, EnumMemberDesc, FieldDesc, MethodDesc, ParamDesc, PropertyDesc,
            TypeDescriptor,
        },
        kind::{FixtureKind, MemberFlags},
        registry::{family, TypeRegistry},
        token::TypeToken,
    },
    Result,
};

/// Provides a fluent API for describing and registering types.
pub struct DescriptorBuilder {
    /// Registry the finished descriptor is inserted into
    registry: Arc<TypeRegistry>,
    /// Descriptor family used for token allocation
    family: u8,
    /// Type name
    name: String,
    /// Structural classification
    kind: FixtureKind,
    /// Base type, if any
    base: Option<TypeToken>,
    /// Implemented interfaces
    interfaces: Vec<TypeToken>,
    /// Declared constructors
    constructors: Vec<ConstructorDesc>,
    /// Declared properties
    properties: Vec<PropertyDesc>,
    /// Declared fields
    fields: Vec<FieldDesc>,
    /// Declared methods
    methods: Vec<MethodDesc>,
    /// Declared enum members, in declaration order
    enum_members: Vec<EnumMemberDesc>,
}

impl DescriptorBuilder {
    fn new(registry: &Arc<TypeRegistry>, name: &str, family: u8, kind: FixtureKind) -> Self {
        DescriptorBuilder {
            registry: registry.clone(),
            family,
            name: name.to_string(),
            kind,
            base: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            enum_members: Vec::new(),
        }
    }

    /// Start describing a concrete class (or struct) with the given name.
    #[must_use]
    pub fn class(registry: &Arc<TypeRegistry>, name: &str) -> Self {
        Self::new(registry, name, family::CLASS, FixtureKind::Class)
    }

    /// Start describing an interface with the given name.
    ///
    /// Interfaces are mock candidates: they are realized as recording
    /// adapters rather than constructed directly.
    #[must_use]
    pub fn interface(registry: &Arc<TypeRegistry>, name: &str) -> Self {
        Self::new(registry, name, family::MOCK, FixtureKind::Mock)
    }

    /// Start describing an abstract class with the given name.
    ///
    /// Abstract classes classify as mock candidates, same as interfaces.
    #[must_use]
    pub fn abstract_class(registry: &Arc<TypeRegistry>, name: &str) -> Self {
        Self::new(registry, name, family::MOCK, FixtureKind::Mock)
    }

    /// Start describing an enumeration with the given name.
    ///
    /// Members are added with [`DescriptorBuilder::member`]; their order of
    /// addition is the source declaration order the unique generator honors.
    #[must_use]
    pub fn enumeration(registry: &Arc<TypeRegistry>, name: &str) -> Self {
        Self::new(registry, name, family::ENUM, FixtureKind::Enum)
    }

    /// Set the base type.
    #[must_use]
    pub fn base(mut self, base: TypeToken) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented interface.
    #[must_use]
    pub fn implements(mut self, interface: TypeToken) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add a public constructor with the given named parameters.
    #[must_use]
    pub fn ctor(mut self, params: &[(&str, TypeToken)]) -> Self {
        self.constructors.push(ConstructorDesc {
            flags: MemberFlags::PUBLIC,
            params: params.iter().map(|(n, t)| ParamDesc::new(n, *t)).collect(),
        });
        self
    }

    /// Add a non-public constructor with the given named parameters.
    #[must_use]
    pub fn private_ctor(mut self, params: &[(&str, TypeToken)]) -> Self {
        self.constructors.push(ConstructorDesc {
            flags: MemberFlags::empty(),
            params: params.iter().map(|(n, t)| ParamDesc::new(n, *t)).collect(),
        });
        self
    }

    /// Add a public read/write property.
    #[must_use]
    pub fn property(mut self, name: &str, ty: TypeToken) -> Self {
        self.properties.push(PropertyDesc {
            name: name.to_string(),
            ty,
            flags: MemberFlags::default(),
        });
        self
    }

    /// Add a public read-only property.
    #[must_use]
    pub fn readonly_property(mut self, name: &str, ty: TypeToken) -> Self {
        self.properties.push(PropertyDesc {
            name: name.to_string(),
            ty,
            flags: MemberFlags::PUBLIC | MemberFlags::READ,
        });
        self
    }

    /// Add a public field.
    #[must_use]
    pub fn field(mut self, name: &str, ty: TypeToken) -> Self {
        self.fields.push(FieldDesc {
            name: name.to_string(),
            ty,
            flags: MemberFlags::PUBLIC | MemberFlags::READ | MemberFlags::WRITE,
        });
        self
    }

    /// Add a method overload with the given named parameters and return type.
    ///
    /// Pass `None` for void methods. Overloads of the same name are
    /// distinguished by their parameter-type signature.
    #[must_use]
    pub fn method(
        mut self,
        name: &str,
        params: &[(&str, TypeToken)],
        returns: Option<TypeToken>,
    ) -> Self {
        self.methods.push(MethodDesc {
            name: name.to_string(),
            params: params.iter().map(|(n, t)| ParamDesc::new(n, *t)).collect(),
            returns,
            generic_arity: 0,
            generic_return: None,
            flags: MemberFlags::PUBLIC,
        });
        self
    }

    /// Add a generic method overload whose return type is the generic
    /// argument at `return_arg`.
    ///
    /// The actual return type of each call is only known from the type
    /// arguments the caller binds at the call site.
    #[must_use]
    pub fn generic_method(
        mut self,
        name: &str,
        params: &[(&str, TypeToken)],
        arity: u8,
        return_arg: u8,
    ) -> Self {
        self.methods.push(MethodDesc {
            name: name.to_string(),
            params: params.iter().map(|(n, t)| ParamDesc::new(n, *t)).collect(),
            returns: None,
            generic_arity: arity,
            generic_return: Some(return_arg),
            flags: MemberFlags::PUBLIC,
        });
        self
    }

    /// Add an enumeration member.
    ///
    /// The order of `member` calls is the declaration order, which the
    /// unique generator honors regardless of numeric values.
    #[must_use]
    pub fn member(mut self, name: &str, value: i64) -> Self {
        self.enum_members.push(EnumMemberDesc {
            name: name.to_string(),
            value,
        });
        self
    }

    /// Register the described type and return its token.
    ///
    /// # Errors
    /// Returns [`crate::Error::DuplicateType`] if a type with the same name
    /// is already registered.
    pub fn finish(self) -> Result<TypeToken> {
        let token = self.registry.alloc_token(self.family);
        self.registry.insert(TypeDescriptor {
            token,
            name: self.name,
            kind: self.kind,
            base: self.base,
            interfaces: self.interfaces,
            generic_args: Vec::new(),
            constructors: self.constructors,
            properties: self.properties,
            fields: self.fields,
            methods: self.methods,
            enum_members: self.enum_members,
        })
    }
}
