//! Instance construction: values, constructor strategies, mock adapters, and
//! the recursive realizer.
//!
//! The realizer walks the path tree depth-first, consulting the configuration
//! store and the unique value generator at each node:
//!
//! 1. `Fixed` / `ExplicitNull` / `Generator` configuration is used directly.
//! 2. Base, enum, and nullable nodes take unique generation, unless flagged
//!    `Undefined` (then the kind's zero default).
//! 3. Container nodes become fresh, empty, independently mutable containers.
//! 4. Mock nodes become recording adapters with the member configuration
//!    captured at build time.
//! 5. Class nodes realize their selected constructor's arguments depth-first,
//!    construct the instance, then realize properties and fields.
//!
//! The in-progress construction stack is explicit: re-entering a type that is
//! already being constructed along the current path fails fast with
//! [`crate::Error::CyclicGraph`] instead of recursing unboundedly.

pub mod mock;
pub mod strategy;
pub mod value;

use std::{collections::HashMap, sync::Arc};

use crate::{
    build::{
        mock::{MockBehavior, MockInstance},
        strategy::ConstructorStrategy,
        value::{ObjectInstance, Value},
    },
    config::{ConfigStore, MemberConfig},
    model::{descriptor::TypeDescriptor, kind::FixtureKind, registry::TypeRegistry, token::TypeToken},
    path::tree::{ChildKey, NodeId, PathTree},
    unique::UniqueSource,
    Error::CyclicGraph,
    Result,
};

/// One depth-first realization pass over a fixture's path tree.
///
/// Short-lived: created per build call, discarded when the root value is
/// produced. The configuration store is read-only for the whole walk.
pub(crate) struct Realizer<'a> {
    registry: &'a Arc<TypeRegistry>,
    tree: &'a mut PathTree,
    store: &'a ConfigStore,
    unique: &'a Arc<UniqueSource>,
    strategy: &'a Arc<dyn ConstructorStrategy>,
    /// Types currently under construction along this path
    stack: Vec<TypeToken>,
    /// Values already realized in this pass; a node is realized at most once,
    /// so a `Link` target and its structural visit yield the same value
    realized: HashMap<NodeId, Value>,
}

impl<'a> Realizer<'a> {
    pub(crate) fn new(
        registry: &'a Arc<TypeRegistry>,
        tree: &'a mut PathTree,
        store: &'a ConfigStore,
        unique: &'a Arc<UniqueSource>,
        strategy: &'a Arc<dyn ConstructorStrategy>,
    ) -> Self {
        Realizer {
            registry,
            tree,
            store,
            unique,
            strategy,
            stack: Vec::new(),
            realized: HashMap::new(),
        }
    }

    /// Realize the value of one path node.
    ///
    /// Memoized per pass: realizing the same node twice (a `Link` target
    /// followed by its own structural visit, in either order) returns the
    /// value produced the first time.
    pub(crate) fn realize(&mut self, node: NodeId) -> Result<Value> {
        if let Some(value) = self.realized.get(&node) {
            return Ok(value.clone());
        }
        let value = self.realize_node(node)?;
        self.realized.insert(node, value.clone());
        Ok(value)
    }

    fn realize_node(&mut self, node: NodeId) -> Result<Value> {
        match self.store.get(node).cloned() {
            Some(MemberConfig::Fixed(value)) => Ok(value),
            Some(MemberConfig::ExplicitNull) => Ok(Value::Null),
            Some(MemberConfig::Generator(factory)) => Ok(factory()),
            Some(MemberConfig::Link(target)) => self.realize(target),
            Some(MemberConfig::Instance(substitute)) => {
                self.tree.retype(node, substitute);
                self.realize_default(node)
            }
            Some(MemberConfig::Undefined) => {
                let descriptor = self.descriptor_of(node)?;
                Ok(Value::default_for(&descriptor))
            }
            // Unique forces the default generation path it would take anyway;
            // callbacks only fire on mock interception
            Some(MemberConfig::Unique | MemberConfig::Callback(_)) | None => {
                self.realize_default(node)
            }
        }
    }

    /// The unconfigured realization of a node, by descriptor kind.
    fn realize_default(&mut self, node: NodeId) -> Result<Value> {
        let ty = self.tree.node(node).ty;
        if ty.is_null() {
            // Generic method return with no closed binding yet
            return Ok(Value::Null);
        }

        let descriptor = self.registry.descriptor_of(ty)?;
        match descriptor.kind {
            FixtureKind::Base(_) | FixtureKind::Enum | FixtureKind::Nullable => {
                self.unique.next_for(&descriptor, self.registry)
            }
            FixtureKind::Container(kind) => Ok(Value::empty_container(kind)),
            FixtureKind::Mock => self.realize_mock(node, &descriptor),
            FixtureKind::Class => self.realize_class(node, &descriptor),
        }
    }

    /// Construct a class instance: constructor arguments first, then
    /// properties and fields.
    fn realize_class(&mut self, node: NodeId, descriptor: &Arc<TypeDescriptor>) -> Result<Value> {
        if self.stack.contains(&descriptor.token) {
            return Err(CyclicGraph(descriptor.name.clone()));
        }
        self.stack.push(descriptor.token);
        let result = self.realize_class_members(node, descriptor);
        self.stack.pop();
        result
    }

    fn realize_class_members(
        &mut self,
        node: NodeId,
        descriptor: &Arc<TypeDescriptor>,
    ) -> Result<Value> {
        self.tree.ensure_children(node)?;
        let ctor = self.strategy.select(descriptor)?.clone();

        let object = ObjectInstance::new(descriptor.token);
        for param in &ctor.params {
            let child = self.member_child(node, &param.name)?;
            let value = self.realize(child)?;
            object.set(&param.name, value);
        }

        for property in &descriptor.properties {
            // A constructor parameter of the same name already owns the slot
            if object.has(&property.name) {
                continue;
            }
            let child = self.member_child(node, &property.name)?;
            let value = self.realize(child)?;
            object.set(&property.name, value);
        }
        for field in &descriptor.fields {
            if object.has(&field.name) {
                continue;
            }
            let child = self.member_child(node, &field.name)?;
            let value = self.realize(child)?;
            object.set(&field.name, value);
        }

        Ok(Value::Object(Arc::new(object)))
    }

    /// Create a recording adapter, capturing the member configuration
    /// declared against this node's children.
    fn realize_mock(&mut self, node: NodeId, descriptor: &Arc<TypeDescriptor>) -> Result<Value> {
        self.tree.ensure_children(node)?;

        let children: Vec<(ChildKey, NodeId)> = self
            .tree
            .node(node)
            .children
            .iter()
            .map(|(key, id)| (key.clone(), *id))
            .collect();

        let mut behaviors = HashMap::new();
        for (key, child) in children {
            let mut behavior = MockBehavior::default();
            if let Some(config) = self.store.get(child) {
                behavior.open = Some(config.clone());
            }

            // Closed generic bindings configured under a method node
            let grandchildren: Vec<(ChildKey, NodeId)> = self
                .tree
                .node(child)
                .children
                .iter()
                .map(|(key, id)| (key.clone(), *id))
                .collect();
            for (grand_key, grand_id) in grandchildren {
                if let ChildKey::Binding(args) = grand_key {
                    if let Some(config) = self.store.get(grand_id) {
                        behavior.bindings.insert(args, config.clone());
                    }
                }
            }

            if behavior.open.is_some() || !behavior.bindings.is_empty() {
                behaviors.insert(key, behavior);
            }
        }

        Ok(Value::Mock(Arc::new(MockInstance::new(
            descriptor.clone(),
            self.registry.clone(),
            self.unique.clone(),
            behaviors,
        ))))
    }

    fn member_child(&mut self, node: NodeId, name: &str) -> Result<NodeId> {
        self.tree
            .child(node, &ChildKey::Member(name.to_string()))?
            .ok_or_else(|| {
                internal_error!(
                    "member '{}' missing from expanded node {}",
                    name,
                    node
                )
            })
    }

    fn descriptor_of(&self, node: NodeId) -> Result<Arc<TypeDescriptor>> {
        self.registry.descriptor_of(self.tree.node(node).ty)
    }
}
