//! Arena-style member path tree.
//!
//! A [`PathTree`] holds the navigable member tree of one fixture root: every node
//! is an addressable point of the root's object graph (constructor parameter,
//! property, field, method overload, generic binding). Nodes own their children by
//! [`ChildKey`]; parents are held as non-owning [`NodeId`] back-references into the
//! arena.
//!
//! The tree is lazy: a node's children are only materialized when first referenced,
//! either by configuration resolution or by the instance builder's walk. Trees are
//! built fresh per fixture and discarded with it; nothing is shared across builds
//! except the descriptor registry.
//!
//! # Expansion Rules
//!
//! - **Class** nodes expand to the selected constructor's parameters plus all
//!   read/write properties and fields. A class with no usable constructor still
//!   expands its properties and fields; the missing constructor only fails the
//!   build itself.
//! - **Mock** nodes expand to all properties and every method overload, each
//!   overload keyed by its parameter-type signature. Generic methods gain
//!   per-binding children on demand, one per closed set of type arguments.
//! - **Container**, base, enum, and nullable nodes expand no children.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    build::strategy::ConstructorStrategy,
    model::{registry::TypeRegistry, token::TypeToken},
    path::selector::{Selector, SelectorStep},
    Error::{AmbiguousMember, UnknownMember},
    Result,
};

/// Index of a node within its [`PathTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of addressable point a path node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// The fixture root itself
    Root,
    /// A parameter of the selected constructor
    CtorParam,
    /// A declared property
    Property,
    /// A declared field
    Field,
    /// The return value of one method overload
    MethodReturn,
    /// A generic method narrowed to one closed set of type arguments
    GenericBinding,
    /// An element slot of a container
    Element,
}

/// Key of a child node under its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChildKey {
    /// Constructor parameter, property, or field, by name
    Member(String),
    /// Method overload, by full signature
    Method(String),
    /// Generic binding, by closed type arguments
    Binding(Vec<TypeToken>),
}

/// One node of the path tree.
#[derive(Debug)]
pub(crate) struct PathNode {
    /// Non-owning back-reference to the parent
    pub parent: Option<NodeId>,
    /// Node classification
    pub kind: PathKind,
    /// Member name (type name for the root)
    pub name: String,
    /// Declared type of the member; null token when only known per call
    /// (generic method returns)
    pub ty: TypeToken,
    /// Overload signature, for method-return nodes
    pub signature: Option<String>,
    /// Materialized children
    pub children: HashMap<ChildKey, NodeId>,
    /// Whether declared children have been materialized
    pub expanded: bool,
}

/// The lazily built member tree of one fixture root.
pub struct PathTree {
    /// Arena storage; `NodeId` indexes into this
    nodes: Vec<PathNode>,
    /// Descriptor lookups during expansion
    registry: Arc<TypeRegistry>,
    /// Constructor selection for class node expansion
    strategy: Arc<dyn ConstructorStrategy>,
}

impl PathTree {
    /// Create a tree with a single root node for the given type.
    pub fn new(
        registry: Arc<TypeRegistry>,
        strategy: Arc<dyn ConstructorStrategy>,
        root: TypeToken,
    ) -> Result<Self> {
        let descriptor = registry.descriptor_of(root)?;
        Ok(PathTree {
            nodes: vec![PathNode {
                parent: None,
                kind: PathKind::Root,
                name: descriptor.name.clone(),
                ty: root,
                signature: None,
                children: HashMap::new(),
                expanded: false,
            }],
            registry,
            strategy,
        })
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Replace the constructor strategy used for class node expansion.
    ///
    /// Affects nodes not yet expanded only.
    pub(crate) fn set_strategy(&mut self, strategy: Arc<dyn ConstructorStrategy>) {
        self.strategy = strategy;
    }

    /// Borrow a node by id.
    pub(crate) fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id.0 as usize]
    }

    /// Number of materialized nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// The display name of a node's type, for diagnostics.
    pub(crate) fn type_name(&self, id: NodeId) -> String {
        let ty = self.node(id).ty;
        match self.registry.get(&ty) {
            Some(descriptor) => descriptor.name.clone(),
            None => ty.to_string(),
        }
    }

    /// Materialize the declared children of a node, once.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the node's type has been
    /// retyped to an unregistered token.
    pub fn ensure_children(&mut self, id: NodeId) -> Result<()> {
        if self.node(id).expanded {
            return Ok(());
        }

        let ty = self.node(id).ty;
        if ty.is_null() {
            self.nodes[id.0 as usize].expanded = true;
            return Ok(());
        }

        let descriptor = self.registry.descriptor_of(ty)?;
        if descriptor.kind.is_mock() {
            for property in &descriptor.properties {
                self.add_child(
                    id,
                    ChildKey::Member(property.name.clone()),
                    PathKind::Property,
                    &property.name,
                    property.ty,
                    None,
                );
            }
            for method in &descriptor.methods {
                let signature = method.signature();
                self.add_child(
                    id,
                    ChildKey::Method(signature.clone()),
                    PathKind::MethodReturn,
                    &method.name,
                    method.returns.unwrap_or(TypeToken::new(0)),
                    Some(signature),
                );
            }
        } else if descriptor.kind == crate::model::kind::FixtureKind::Class {
            // A class with no declared constructor still exposes its
            // properties and fields; the missing constructor only fails
            // the build itself.
            if let Ok(ctor) = self.strategy.select(&descriptor) {
                for param in &ctor.params {
                    self.add_child(
                        id,
                        ChildKey::Member(param.name.clone()),
                        PathKind::CtorParam,
                        &param.name,
                        param.ty,
                        None,
                    );
                }
            }
            for property in &descriptor.properties {
                self.add_child(
                    id,
                    ChildKey::Member(property.name.clone()),
                    PathKind::Property,
                    &property.name,
                    property.ty,
                    None,
                );
            }
            for field in &descriptor.fields {
                self.add_child(
                    id,
                    ChildKey::Member(field.name.clone()),
                    PathKind::Field,
                    &field.name,
                    field.ty,
                    None,
                );
            }
        }

        self.nodes[id.0 as usize].expanded = true;
        Ok(())
    }

    /// Look up a materialized child, expanding the parent first.
    pub fn child(&mut self, parent: NodeId, key: &ChildKey) -> Result<Option<NodeId>> {
        self.ensure_children(parent)?;
        Ok(self.node(parent).children.get(key).copied())
    }

    /// Get or create the generic-binding child of a method-return node for
    /// one closed set of type arguments.
    ///
    /// # Errors
    /// Returns an internal error if `method_node` is not a method-return node.
    pub fn binding_child(&mut self, method_node: NodeId, args: &[TypeToken]) -> Result<NodeId> {
        if self.node(method_node).kind != PathKind::MethodReturn {
            return Err(internal_error!(
                "generic binding requested on non-method node {}",
                method_node
            ));
        }

        let key = ChildKey::Binding(args.to_vec());
        if let Some(existing) = self.node(method_node).children.get(&key) {
            return Ok(*existing);
        }

        // The bound node's type is the effective return type of the call
        let ty = self.effective_return(method_node, args);
        let name = format!("{}<{}>", self.node(method_node).name, args.len());
        Ok(self.add_child(method_node, key, PathKind::GenericBinding, &name, ty, None))
    }

    /// Resolve a caller selector to a node, materializing children on the way.
    ///
    /// # Errors
    /// Returns [`UnknownMember`] for names the owning type does not declare
    /// and [`AmbiguousMember`] when a bare name matches several overloads.
    pub fn resolve(&mut self, selector: &Selector) -> Result<NodeId> {
        let mut current = self.root();
        for step in &selector.steps {
            current = self.resolve_step(current, step)?;
        }
        Ok(current)
    }

    fn resolve_step(&mut self, current: NodeId, step: &SelectorStep) -> Result<NodeId> {
        self.ensure_children(current)?;
        match step {
            SelectorStep::Member(name) => {
                if let Some(child) = self.node(current).children.get(&ChildKey::Member(name.clone()))
                {
                    return Ok(*child);
                }

                // A bare name may still address a method, as long as only
                // one overload carries it
                let matches: Vec<NodeId> = self
                    .node(current)
                    .children
                    .iter()
                    .filter(|(key, id)| {
                        matches!(key, ChildKey::Method(_))
                            && self.node(**id).name == *name
                    })
                    .map(|(_, id)| *id)
                    .collect();

                match matches.len() {
                    1 => Ok(matches[0]),
                    0 => Err(UnknownMember {
                        ty: self.type_name(current),
                        member: name.clone(),
                    }),
                    _ => Err(AmbiguousMember {
                        ty: self.type_name(current),
                        member: name.clone(),
                    }),
                }
            }
            SelectorStep::Method { name, params } => {
                let ty = self.node(current).ty;
                let descriptor = self.registry.descriptor_of(ty)?;
                let method = descriptor.find_method(name, params).ok_or(UnknownMember {
                    ty: descriptor.name.clone(),
                    member: name.clone(),
                })?;
                let key = ChildKey::Method(method.signature());
                self.node(current)
                    .children
                    .get(&key)
                    .copied()
                    .ok_or(UnknownMember {
                        ty: descriptor.name.clone(),
                        member: name.clone(),
                    })
            }
            SelectorStep::Binding(args) => {
                if self.node(current).kind != PathKind::MethodReturn {
                    return Err(UnknownMember {
                        ty: self.type_name(current),
                        member: "<generic binding>".to_string(),
                    });
                }
                self.binding_child(current, args)
            }
        }
    }

    /// Substitute the node's type, discarding any materialized children.
    ///
    /// Used by `InstanceOf` configuration: subsequent expansion follows the
    /// substitute type's structure.
    pub(crate) fn retype(&mut self, id: NodeId, ty: TypeToken) {
        let node = &mut self.nodes[id.0 as usize];
        if node.ty == ty {
            return;
        }
        node.ty = ty;
        node.children.clear();
        node.expanded = false;
    }

    /// Resolve the effective return type for a method-return node and one
    /// set of actual type arguments.
    fn effective_return(&self, method_node: NodeId, args: &[TypeToken]) -> TypeToken {
        let node = self.node(method_node);
        let owner = node.parent.map(|p| self.node(p).ty);
        let (Some(owner), Some(signature)) = (owner, node.signature.as_ref()) else {
            return node.ty;
        };
        let Some(descriptor) = self.registry.get(&owner) else {
            return node.ty;
        };
        descriptor
            .methods
            .iter()
            .find(|m| m.signature() == *signature)
            .and_then(|m| m.effective_return(args))
            .unwrap_or(node.ty)
    }

    fn add_child(
        &mut self,
        parent: NodeId,
        key: ChildKey,
        kind: PathKind,
        name: &str,
        ty: TypeToken,
        signature: Option<String>,
    ) -> NodeId {
        if let Some(existing) = self.nodes[parent.0 as usize].children.get(&key) {
            return *existing;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(PathNode {
            parent: Some(parent),
            kind,
            name: name.to_string(),
            ty,
            signature,
            children: HashMap::new(),
            expanded: false,
        });
        self.nodes[parent.0 as usize].children.insert(key, id);
        id
    }
}

impl fmt::Debug for PathTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTree")
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        build::strategy::MaxParamsPublicPreferred,
        model::{builder::DescriptorBuilder, kind::PrimitiveKind},
    };

    fn tree_for(registry: &Arc<TypeRegistry>, root: TypeToken) -> PathTree {
        PathTree::new(
            registry.clone(),
            Arc::new(MaxParamsPublicPreferred),
            root,
        )
        .unwrap()
    }

    #[test]
    fn test_root_is_lazy() {
        let registry = TypeRegistry::new();
        let string = registry.primitive(PrimitiveKind::String);
        let person = DescriptorBuilder::class(&registry, "Person")
            .ctor(&[("name", string)])
            .property("Name", string)
            .finish()
            .unwrap();

        let tree = tree_for(&registry, person);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_class_expansion() {
        let registry = TypeRegistry::new();
        let string = registry.primitive(PrimitiveKind::String);
        let i4 = registry.primitive(PrimitiveKind::I4);
        let person = DescriptorBuilder::class(&registry, "Person")
            .ctor(&[("name", string), ("age", i4)])
            .property("Name", string)
            .field("tag", i4)
            .finish()
            .unwrap();

        let mut tree = tree_for(&registry, person);
        let root = tree.root();
        tree.ensure_children(root).unwrap();

        let name_param = tree
            .child(root, &ChildKey::Member("name".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(tree.node(name_param).kind, PathKind::CtorParam);

        let prop = tree
            .child(root, &ChildKey::Member("Name".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(tree.node(prop).kind, PathKind::Property);

        let field = tree
            .child(root, &ChildKey::Member("tag".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(tree.node(field).kind, PathKind::Field);
    }

    #[test]
    fn test_resolve_selector() {
        let registry = TypeRegistry::new();
        let string = registry.primitive(PrimitiveKind::String);
        let person = DescriptorBuilder::class(&registry, "Person")
            .ctor(&[("name", string)])
            .finish()
            .unwrap();

        let mut tree = tree_for(&registry, person);
        let node = tree.resolve(&Selector::member("name")).unwrap();
        assert_eq!(tree.node(node).kind, PathKind::CtorParam);

        let missing = tree.resolve(&Selector::member("missing"));
        assert!(matches!(missing, Err(UnknownMember { .. })));
    }

    #[test]
    fn test_resolve_nested_selector() {
        let registry = TypeRegistry::new();
        let string = registry.primitive(PrimitiveKind::String);
        let address = DescriptorBuilder::class(&registry, "Address")
            .ctor(&[("street", string)])
            .finish()
            .unwrap();
        let person = DescriptorBuilder::class(&registry, "Person")
            .ctor(&[("home", address)])
            .finish()
            .unwrap();

        let mut tree = tree_for(&registry, person);
        let node = tree
            .resolve(&Selector::member("home").then("street"))
            .unwrap();
        assert_eq!(tree.node(node).kind, PathKind::CtorParam);
        assert_eq!(tree.node(node).ty, string);
    }

    #[test]
    fn test_method_overloads_are_distinct_children() {
        let registry = TypeRegistry::new();
        let i4 = registry.primitive(PrimitiveKind::I4);
        let string = registry.primitive(PrimitiveKind::String);
        let repo = DescriptorBuilder::interface(&registry, "IRepository")
            .method("find", &[("id", i4)], Some(string))
            .method("find", &[("name", string)], Some(string))
            .finish()
            .unwrap();

        let mut tree = tree_for(&registry, repo);
        let by_id = tree.resolve(&Selector::method("find", &[i4])).unwrap();
        let by_name = tree.resolve(&Selector::method("find", &[string])).unwrap();
        assert_ne!(by_id, by_name);

        // A bare name cannot address either overload
        let bare = tree.resolve(&Selector::member("find"));
        assert!(matches!(bare, Err(AmbiguousMember { .. })));
    }

    #[test]
    fn test_generic_binding_children_on_demand() {
        let registry = TypeRegistry::new();
        let i4 = registry.primitive(PrimitiveKind::I4);
        let u1 = registry.primitive(PrimitiveKind::U1);
        let provider = DescriptorBuilder::interface(&registry, "IProvider")
            .generic_method("get_value", &[], 1, 0)
            .finish()
            .unwrap();

        let mut tree = tree_for(&registry, provider);
        let bound_i4 = tree
            .resolve(&Selector::member("get_value").bound(&[i4]))
            .unwrap();
        let bound_u1 = tree
            .resolve(&Selector::member("get_value").bound(&[u1]))
            .unwrap();
        assert_ne!(bound_i4, bound_u1);
        assert_eq!(tree.node(bound_i4).ty, i4);
        assert_eq!(tree.node(bound_i4).kind, PathKind::GenericBinding);

        // Same binding resolves to the same node
        let again = tree
            .resolve(&Selector::member("get_value").bound(&[i4]))
            .unwrap();
        assert_eq!(bound_i4, again);
    }

    #[test]
    fn test_containers_expand_no_children() {
        let registry = TypeRegistry::new();
        let i4 = registry.primitive(PrimitiveKind::I4);
        let ints = registry.list_of(i4).unwrap();

        let mut tree = tree_for(&registry, ints);
        let root = tree.root();
        tree.ensure_children(root).unwrap();
        assert!(tree.node(root).children.is_empty());
    }
}
