//! Member configuration store.
//!
//! Configuration maps path-node identity to a configured behavior. The store is
//! populated by the caller before a build and is logically frozen for the duration
//! of the walk: the last write for a given node wins, and configuring a descendant
//! never clobbers configuration on a sibling or ancestor node.
//!
//! [`MemberConfig::ExplicitNull`] is observably distinct from "never configured":
//! the former forces a null value even where default generation would produce a
//! unique instance, the latter defers to default generation entirely.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    build::value::Value,
    model::token::TypeToken,
    path::tree::NodeId,
};

/// A caller-supplied value factory.
pub type GeneratorFn = Arc<dyn Fn() -> Value + Send + Sync>;
/// A caller-supplied interception hook, invoked with the actual call arguments.
pub type CallbackFn = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// The configured behavior of one path node.
#[derive(Clone)]
pub enum MemberConfig {
    /// Use this exact value
    Fixed(Value),
    /// Invoke the factory for the value (once per structural realization,
    /// once per call for mock members)
    Generator(GeneratorFn),
    /// Invoke the hook on every interception, then fall through to the
    /// default return
    Callback(CallbackFn),
    /// Share the realized value of another path node
    Link(NodeId),
    /// Substitute a registered concrete type for the declared member type
    Instance(TypeToken),
    /// Force a null value, even where generation would produce one
    ExplicitNull,
    /// Force unique-value generation
    Unique,
    /// Force the kind's zero/empty default instead of a unique value
    Undefined,
}

impl fmt::Debug for MemberConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberConfig::Fixed(value) => write!(f, "Fixed({value})"),
            MemberConfig::Generator(_) => write!(f, "Generator(..)"),
            MemberConfig::Callback(_) => write!(f, "Callback(..)"),
            MemberConfig::Link(node) => write!(f, "Link({node})"),
            MemberConfig::Instance(token) => write!(f, "Instance({token})"),
            MemberConfig::ExplicitNull => write!(f, "ExplicitNull"),
            MemberConfig::Unique => write!(f, "Unique"),
            MemberConfig::Undefined => write!(f, "Undefined"),
        }
    }
}

/// Ordered registry of member configuration, keyed by node identity.
#[derive(Debug, Default)]
pub struct ConfigStore {
    entries: HashMap<NodeId, MemberConfig>,
}

impl ConfigStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        ConfigStore {
            entries: HashMap::new(),
        }
    }

    /// Configure a node, overwriting any prior configuration for that exact
    /// node.
    pub fn set(&mut self, node: NodeId, config: MemberConfig) {
        self.entries.insert(node, config);
    }

    /// The configured behavior of a node, or `None` when never configured.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&MemberConfig> {
        self.entries.get(&node)
    }

    /// Number of configured nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
