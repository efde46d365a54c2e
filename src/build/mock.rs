//! Recording mock adapters for interface and abstract types.
//!
//! A [`MockInstance`] is the engine's stand-in for a mock-candidate type: an
//! explicit adapter that records every member access into its own
//! [`InvocationRecord`](crate::verify::record::InvocationRecord) and answers from
//! the member configuration captured when the instance was built.
//!
//! Interception resolves generic methods against the *actual* type arguments of
//! each call: a configuration bound to an exact closed binding takes precedence
//! over the open (unbound) configuration, and a call whose bindings match neither
//! falls through to recording plus the return kind's own default. A configuration
//! that is well-typed but bound to different type arguments is not an error; it
//! simply fails to match.

use std::{collections::HashMap, sync::Arc};

use crate::{
    build::value::Value,
    config::MemberConfig,
    model::{
        descriptor::{MethodDesc, TypeDescriptor},
        registry::TypeRegistry,
        token::TypeToken,
    },
    path::tree::ChildKey,
    unique::UniqueSource,
    verify::record::{AccessKind, InvocationRecord},
    Error::{AmbiguousMember, UnknownMember},
    Result,
};

/// The captured configuration of one mock member.
///
/// `open` answers calls with any (or no) generic bindings; `bindings` holds
/// exact-match configurations per closed set of type arguments, consulted
/// first.
#[derive(Debug, Default, Clone)]
pub(crate) struct MockBehavior {
    /// Configuration of the open/unbound member path
    pub open: Option<MemberConfig>,
    /// Exact-binding configurations, keyed by closed type arguments
    pub bindings: HashMap<Vec<TypeToken>, MemberConfig>,
}

/// A built mock: an adapter recording invocations against one
/// [`InvocationRecord`].
#[derive(Debug)]
pub struct MockInstance {
    /// Structural description of the mocked type
    descriptor: Arc<TypeDescriptor>,
    /// Registry for return-type defaults
    registry: Arc<TypeRegistry>,
    /// Unique generation for members configured `Unique`
    unique: Arc<UniqueSource>,
    /// Captured member configuration, keyed the same way as path children
    behaviors: HashMap<ChildKey, MockBehavior>,
    /// The adapter's own invocation log
    record: Arc<InvocationRecord>,
}

impl MockInstance {
    pub(crate) fn new(
        descriptor: Arc<TypeDescriptor>,
        registry: Arc<TypeRegistry>,
        unique: Arc<UniqueSource>,
        behaviors: HashMap<ChildKey, MockBehavior>,
    ) -> Self {
        MockInstance {
            descriptor,
            registry,
            unique,
            behaviors,
            record: Arc::new(InvocationRecord::new()),
        }
    }

    /// Token of the mocked type.
    #[must_use]
    pub fn ty(&self) -> TypeToken {
        self.descriptor.token
    }

    /// Name of the mocked type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Structural description of the mocked type.
    #[must_use]
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// The invocation log of this adapter.
    #[must_use]
    pub fn record(&self) -> &Arc<InvocationRecord> {
        &self.record
    }

    /// Invoke a non-generic method with the given arguments.
    ///
    /// The access is recorded, then answered from configuration or the
    /// return kind's default.
    ///
    /// # Errors
    /// Returns [`UnknownMember`] if no overload of `method` accepts this
    /// argument count, or [`AmbiguousMember`] when several do and the
    /// argument kinds cannot disambiguate them.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.call_generic(method, &[], args)
    }

    /// Invoke a method with explicit generic type arguments.
    ///
    /// Behavior resolution is exact-binding-first: a configuration stored
    /// for exactly `type_args` wins over the open configuration; with
    /// neither present the call records and returns the effective return
    /// kind's default.
    ///
    /// # Errors
    /// Returns [`UnknownMember`] / [`AmbiguousMember`] as for
    /// [`MockInstance::call`].
    pub fn call_generic(
        &self,
        method: &str,
        type_args: &[TypeToken],
        args: &[Value],
    ) -> Result<Value> {
        let desc = self.resolve_overload(method, type_args, args)?;
        let signature = desc.signature();

        let named_args: Vec<(String, Value)> = desc
            .params
            .iter()
            .zip(args)
            .map(|(param, value)| (param.name.clone(), value.clone()))
            .collect();
        self.record.append(
            method,
            &signature,
            AccessKind::Call,
            named_args,
            type_args.to_vec(),
        );

        let return_ty = desc.effective_return(type_args);
        let key = ChildKey::Method(signature);
        match self.configured(&key, type_args) {
            Some(config) => Ok(self.apply(config, args, return_ty)),
            None => Ok(self.default_value(return_ty)),
        }
    }

    /// Read a property, recording the access.
    ///
    /// # Errors
    /// Returns [`UnknownMember`] if the property is not declared.
    pub fn get(&self, property: &str) -> Result<Value> {
        let desc = self
            .descriptor
            .property(property)
            .ok_or_else(|| UnknownMember {
                ty: self.descriptor.name.clone(),
                member: property.to_string(),
            })?;

        self.record
            .append(property, property, AccessKind::Get, Vec::new(), Vec::new());

        let key = ChildKey::Member(property.to_string());
        match self.configured(&key, &[]) {
            Some(config) => Ok(self.apply(config, &[], Some(desc.ty))),
            None => Ok(self.default_value(Some(desc.ty))),
        }
    }

    /// Write a property, recording the access and the assigned value.
    ///
    /// # Errors
    /// Returns [`UnknownMember`] if the property is not declared.
    pub fn set(&self, property: &str, value: Value) -> Result<()> {
        if self.descriptor.property(property).is_none() {
            return Err(UnknownMember {
                ty: self.descriptor.name.clone(),
                member: property.to_string(),
            });
        }

        let args = vec![("value".to_string(), value)];
        self.record
            .append(property, property, AccessKind::Set, args.clone(), Vec::new());

        // A configured callback observes the assignment
        let key = ChildKey::Member(property.to_string());
        if let Some(MemberConfig::Callback(hook)) = self.configured(&key, &[]) {
            let values: Vec<Value> = args.into_iter().map(|(_, v)| v).collect();
            hook(&values);
        }
        Ok(())
    }

    /// Find the overload a call addresses, by name, arity, and argument count.
    fn resolve_overload(
        &self,
        method: &str,
        type_args: &[TypeToken],
        args: &[Value],
    ) -> Result<&MethodDesc> {
        let candidates: Vec<&MethodDesc> = self
            .descriptor
            .methods_named(method)
            .into_iter()
            .filter(|m| {
                m.params.len() == args.len() && usize::from(m.generic_arity) == type_args.len()
            })
            .collect();

        match candidates.len() {
            0 => Err(UnknownMember {
                ty: self.descriptor.name.clone(),
                member: method.to_string(),
            }),
            1 => Ok(candidates[0]),
            _ => {
                // Disambiguate by the base kinds of the actual arguments
                let exact: Vec<&MethodDesc> = candidates
                    .iter()
                    .copied()
                    .filter(|m| {
                        m.params.iter().zip(args).all(|(param, arg)| {
                            match arg.primitive_kind() {
                                Some(kind) => param.ty == TypeRegistry::primitive_token(kind),
                                None => true,
                            }
                        })
                    })
                    .collect();
                match exact.len() {
                    1 => Ok(exact[0]),
                    _ => Err(AmbiguousMember {
                        ty: self.descriptor.name.clone(),
                        member: method.to_string(),
                    }),
                }
            }
        }
    }

    /// The configuration answering a member access, exact binding first.
    fn configured(&self, key: &ChildKey, type_args: &[TypeToken]) -> Option<&MemberConfig> {
        let behavior = self.behaviors.get(key)?;
        if !type_args.is_empty() {
            if let Some(exact) = behavior.bindings.get(type_args) {
                return Some(exact);
            }
        }
        behavior.open.as_ref()
    }

    /// Produce the answer a configuration dictates for one interception.
    fn apply(&self, config: &MemberConfig, args: &[Value], return_ty: Option<TypeToken>) -> Value {
        match config {
            MemberConfig::Fixed(value) => value.clone(),
            MemberConfig::Generator(factory) => factory(),
            MemberConfig::Callback(hook) => {
                hook(args);
                self.default_value(return_ty)
            }
            MemberConfig::ExplicitNull => Value::Null,
            MemberConfig::Undefined => self.default_value(return_ty),
            MemberConfig::Unique => match return_ty.and_then(|ty| self.registry.get(&ty)) {
                Some(desc) if desc.kind.is_generatable() => self
                    .unique
                    .next_for(&desc, &self.registry)
                    .unwrap_or(Value::Null),
                _ => self.default_value(return_ty),
            },
            // Structural configuration has no call-time meaning here; fall
            // through to the default path
            MemberConfig::Link(_) | MemberConfig::Instance(_) => self.default_value(return_ty),
        }
    }

    /// The kind default of a return type; null for void and unregistered types.
    fn default_value(&self, ty: Option<TypeToken>) -> Value {
        match ty.and_then(|ty| self.registry.get(&ty)) {
            Some(descriptor) => Value::default_for(&descriptor),
            None => Value::Null,
        }
    }
}
