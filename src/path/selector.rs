//! Strongly-typed member path selectors.
//!
//! A [`Selector`] names one reachable member of a root type: a constructor
//! parameter, property, field, method overload, or a generic-binding child of a
//! method. Selectors are plain data; they are resolved against a
//! [`PathTree`](crate::path::tree::PathTree) when configuration is applied.

use std::fmt;

use crate::model::token::TypeToken;

/// One navigation step of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorStep {
    /// Navigate to a named member (parameter, property, field, or a
    /// uniquely named method)
    Member(String),
    /// Navigate to a method overload by name and exact parameter types
    Method {
        /// Method name
        name: String,
        /// Parameter types of the overload
        params: Vec<TypeToken>,
    },
    /// Narrow a generic method to one closed set of type arguments
    Binding(Vec<TypeToken>),
}

/// A path from a fixture root to one of its reachable members.
///
/// # Examples
///
/// ```rust
/// use specimen::prelude::*;
///
/// let registry = TypeRegistry::new();
/// let i32_t = registry.primitive(PrimitiveKind::I4);
///
/// // The `Name` property of the root
/// let name = Selector::member("Name");
///
/// // The `find(i32)` overload, bound to i32
/// let find = Selector::method("find", &[i32_t]).bound(&[i32_t]);
///
/// // The `Age` property of the object behind the `owner` constructor parameter
/// let nested = Selector::member("owner").then("Age");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Navigation steps from the root, in order
    pub(crate) steps: Vec<SelectorStep>,
}

impl Selector {
    /// A selector starting at the named member of the root.
    #[must_use]
    pub fn member(name: &str) -> Self {
        Selector {
            steps: vec![SelectorStep::Member(name.to_string())],
        }
    }

    /// A selector starting at a method overload of the root.
    #[must_use]
    pub fn method(name: &str, params: &[TypeToken]) -> Self {
        Selector {
            steps: vec![SelectorStep::Method {
                name: name.to_string(),
                params: params.to_vec(),
            }],
        }
    }

    /// Continue to a named member of the current step's type.
    #[must_use]
    pub fn then(mut self, name: &str) -> Self {
        self.steps.push(SelectorStep::Member(name.to_string()));
        self
    }

    /// Continue to a method overload of the current step's type.
    #[must_use]
    pub fn then_method(mut self, name: &str, params: &[TypeToken]) -> Self {
        self.steps.push(SelectorStep::Method {
            name: name.to_string(),
            params: params.to_vec(),
        });
        self
    }

    /// Narrow the current generic method step to one closed set of type
    /// arguments.
    ///
    /// Configuration applied through the narrowed selector only matches
    /// calls whose actual type arguments equal `args`; an unnarrowed
    /// selector configures the open binding that every call falls back to.
    #[must_use]
    pub fn bound(mut self, args: &[TypeToken]) -> Self {
        self.steps.push(SelectorStep::Binding(args.to_vec()));
        self
    }

    /// Number of navigation steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the selector has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A bare string converts to a single-member selector, so APIs taking
/// `impl Into<Selector>` accept a plain member name.
impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::member(name)
    }
}

impl From<&Selector> for Selector {
    fn from(selector: &Selector) -> Self {
        selector.clone()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match step {
                SelectorStep::Member(name) => write!(f, "{name}")?,
                SelectorStep::Method { name, params } => {
                    let params = params
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(",");
                    write!(f, "{name}({params})")?;
                }
                SelectorStep::Binding(args) => {
                    let args = args
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(",");
                    write!(f, "<{args}>")?;
                }
            }
        }
        Ok(())
    }
}
