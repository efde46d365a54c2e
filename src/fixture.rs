//! The fixture facade: configure, build, verify.
//!
//! A [`Fixture`] owns everything one root build request needs: the path tree,
//! the member configuration store, the unique value source, and the constructor
//! selection strategy. Configuration is declared against member [`Selector`]s
//! with a [`Behavior`] verb, then one or more instances are realized with
//! [`Fixture::build`] / [`Fixture::build_many`], or with
//! [`Fixture::build_with_scope`] when the root is a mock and its invocations
//! are to be verified afterwards.
//!
//! # Examples
//!
//! ```rust
//! use specimen::prelude::*;
//!
//! let registry = TypeRegistry::new();
//! let string = registry.primitive(PrimitiveKind::String);
//! let i32_t = registry.primitive(PrimitiveKind::I4);
//! let person = DescriptorBuilder::class(&registry, "Person")
//!     .ctor(&[("name", string), ("age", i32_t)])
//!     .finish()?;
//!
//! let mut fixture = Fixture::new(registry, person)?;
//! fixture.with(&Selector::member("age"), Behavior::value(Value::I4(30)))?;
//!
//! let built = fixture.build()?;
//! let object = built.as_object().unwrap();
//! assert_eq!(object.get("age"), Some(Value::I4(30)));
//! assert!(!object.get("name").unwrap().is_null());
//! # Ok::<(), specimen::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    build::{
        strategy::{ConstructorStrategy, MaxParamsPublicPreferred},
        value::Value,
        Realizer,
    },
    config::{CallbackFn, ConfigStore, GeneratorFn, MemberConfig},
    model::{registry::TypeRegistry, token::TypeToken},
    path::{selector::Selector, tree::PathTree},
    unique::UniqueSource,
    verify::query::VerificationScope,
    Error::{InvalidCount, NotAMock},
    Result,
};

/// The configured behavior of one selected member.
///
/// Constructed through the associated verbs; applied with [`Fixture::with`].
pub enum Behavior {
    /// Use this exact value
    Value(Value),
    /// Force a null value, observably distinct from leaving the member
    /// unconfigured
    Null,
    /// Force unique-value generation
    Unique,
    /// Use the kind's zero/empty default instead of a unique value
    Undefined,
    /// Substitute a registered concrete type for the declared member type
    InstanceOf(TypeToken),
    /// Produce the value through a factory
    FromFn(GeneratorFn),
    /// Observe interceptions of this member without changing its result
    Callback(CallbackFn),
    /// Share the realized value of another member path
    Linked(Selector),
}

impl Behavior {
    /// Use this exact value.
    #[must_use]
    pub fn value(value: Value) -> Self {
        Behavior::Value(value)
    }

    /// Force a null value.
    #[must_use]
    pub fn null() -> Self {
        Behavior::Null
    }

    /// Force unique-value generation.
    #[must_use]
    pub fn unique() -> Self {
        Behavior::Unique
    }

    /// Use the kind's zero/empty default.
    #[must_use]
    pub fn undefined() -> Self {
        Behavior::Undefined
    }

    /// Substitute a registered concrete type.
    #[must_use]
    pub fn instance_of(ty: TypeToken) -> Self {
        Behavior::InstanceOf(ty)
    }

    /// Produce the value through a factory.
    pub fn from_fn<F>(factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Behavior::FromFn(Arc::new(factory))
    }

    /// Observe interceptions of this member.
    pub fn callback<F>(hook: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        Behavior::Callback(Arc::new(hook))
    }

    /// Share the realized value of another member path.
    #[must_use]
    pub fn linked(selector: Selector) -> Self {
        Behavior::Linked(selector)
    }
}

/// A configurable build request for one root type.
pub struct Fixture {
    registry: Arc<TypeRegistry>,
    root: TypeToken,
    tree: PathTree,
    store: ConfigStore,
    unique: Arc<UniqueSource>,
    strategy: Arc<dyn ConstructorStrategy>,
}

impl Fixture {
    /// Create a fixture for a registered root type.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if `root` is not registered.
    pub fn new(registry: Arc<TypeRegistry>, root: TypeToken) -> Result<Self> {
        let strategy: Arc<dyn ConstructorStrategy> = Arc::new(MaxParamsPublicPreferred);
        let tree = PathTree::new(registry.clone(), strategy.clone(), root)?;
        Ok(Fixture {
            registry,
            root,
            tree,
            store: ConfigStore::new(),
            unique: Arc::new(UniqueSource::new()),
            strategy,
        })
    }

    /// Create a fixture for a type registered in the global registry, by name.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownTypeName`] if no type of that name is
    /// registered globally.
    pub fn of(name: &str) -> Result<Self> {
        let registry = TypeRegistry::global().clone();
        let root = registry.token_of(name)?;
        Self::new(registry, root)
    }

    /// Replace the constructor selection strategy.
    ///
    /// Takes effect for nodes not yet expanded; call before configuring
    /// members of the affected classes.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn ConstructorStrategy>) -> Self {
        self.tree.set_strategy(strategy.clone());
        self.strategy = strategy;
        self
    }

    /// Token of the root type.
    #[must_use]
    pub fn root(&self) -> TypeToken {
        self.root
    }

    /// Configure a member, overwriting any prior configuration for the same
    /// path.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownMember`] / [`crate::Error::AmbiguousMember`]
    /// when the selector does not resolve.
    pub fn with(&mut self, selector: &Selector, behavior: Behavior) -> Result<&mut Self> {
        let node = self.tree.resolve(selector)?;
        let config = match behavior {
            Behavior::Value(value) => MemberConfig::Fixed(value),
            Behavior::Null => MemberConfig::ExplicitNull,
            Behavior::Unique => MemberConfig::Unique,
            Behavior::Undefined => MemberConfig::Undefined,
            Behavior::InstanceOf(ty) => MemberConfig::Instance(ty),
            Behavior::FromFn(factory) => MemberConfig::Generator(factory),
            Behavior::Callback(hook) => MemberConfig::Callback(hook),
            Behavior::Linked(target) => {
                let target_node = self.tree.resolve(&target)?;
                MemberConfig::Link(target_node)
            }
        };
        self.store.set(node, config);
        Ok(self)
    }

    /// Realize one instance of the root type.
    ///
    /// # Errors
    /// Returns a build error ([`crate::Error::NoUsableConstructor`],
    /// [`crate::Error::CyclicGraph`]) when the object graph cannot be
    /// constructed.
    pub fn build(&mut self) -> Result<Value> {
        let root = self.tree.root();
        Realizer::new(
            &self.registry,
            &mut self.tree,
            &self.store,
            &self.unique,
            &self.strategy,
        )
        .realize(root)
    }

    /// Realize `count` independent instances of the root type.
    ///
    /// A count of zero yields an empty sequence. Unique values stay distinct
    /// across the whole batch.
    ///
    /// # Errors
    /// Returns [`InvalidCount`] for a negative count, before any instance is
    /// constructed; build errors propagate as for [`Fixture::build`].
    pub fn build_many(&mut self, count: i64) -> Result<Vec<Value>> {
        if count < 0 {
            return Err(InvalidCount(count));
        }
        let count = usize::try_from(count).map_err(|_| InvalidCount(count))?;
        let mut instances = Vec::with_capacity(count);
        for _ in 0..count {
            instances.push(self.build()?);
        }
        Ok(instances)
    }

    /// Realize one instance and a verification scope bound to its
    /// invocation record.
    ///
    /// # Errors
    /// Returns [`NotAMock`] if the root type is not a mock candidate; build
    /// errors propagate as for [`Fixture::build`].
    pub fn build_with_scope(&mut self) -> Result<(Value, VerificationScope)> {
        let value = self.build()?;
        match value.as_mock() {
            Some(mock) => {
                let scope = VerificationScope::from_mock(mock);
                Ok((value, scope))
            }
            None => Err(NotAMock(self.tree.type_name(self.tree.root()))),
        }
    }
}

impl std::fmt::Debug for Fixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fixture")
            .field("root", &self.root)
            .field("configured", &self.store.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{builder::DescriptorBuilder, kind::PrimitiveKind};

    #[test]
    fn test_build_generates_unconfigured_members() {
        let registry = TypeRegistry::new();
        let string = registry.primitive(PrimitiveKind::String);
        let person = DescriptorBuilder::class(&registry, "Person")
            .ctor(&[("name", string)])
            .finish()
            .unwrap();

        let mut fixture = Fixture::new(registry, person).unwrap();
        let built = fixture.build().unwrap();
        let object = built.as_object().unwrap();
        assert!(!object.get("name").unwrap().is_null());
    }

    #[test]
    fn test_build_many_counts() {
        let registry = TypeRegistry::new();
        let i4 = registry.primitive(PrimitiveKind::I4);
        let widget = DescriptorBuilder::class(&registry, "Widget")
            .ctor(&[("id", i4)])
            .finish()
            .unwrap();

        let mut fixture = Fixture::new(registry, widget).unwrap();
        assert!(matches!(fixture.build_many(-1), Err(InvalidCount(-1))));
        assert!(fixture.build_many(0).unwrap().is_empty());
        assert_eq!(fixture.build_many(3).unwrap().len(), 3);
    }

    #[test]
    fn test_scope_requires_mock_root() {
        let registry = TypeRegistry::new();
        let i4 = registry.primitive(PrimitiveKind::I4);
        let widget = DescriptorBuilder::class(&registry, "Widget")
            .ctor(&[("id", i4)])
            .finish()
            .unwrap();

        let mut fixture = Fixture::new(registry, widget).unwrap();
        assert!(matches!(fixture.build_with_scope(), Err(NotAMock(_))));
    }

    #[test]
    fn test_fixture_of_global_registry() {
        let registry = TypeRegistry::global();
        let i4 = registry.primitive(PrimitiveKind::I4);
        // Unique name, the global registry is shared between tests
        let token = DescriptorBuilder::class(registry, "FixtureOfGlobalWidget")
            .ctor(&[("id", i4)])
            .finish()
            .unwrap();

        let mut fixture = Fixture::of("FixtureOfGlobalWidget").unwrap();
        assert_eq!(fixture.root(), token);
        assert!(fixture.build().is_ok());

        assert!(matches!(
            Fixture::of("NoSuchTypeAnywhere"),
            Err(crate::Error::UnknownTypeName(_))
        ));
    }
}
