//! Verification scopes and the invocation query chain.
//!
//! A [`VerificationScope`] binds to one built mock's invocation record. Its
//! [`verify`](VerificationScope::verify) method opens a [`VerifyQuery`] over one
//! member path: a property, a single method overload (a bare name suffices only
//! when it is unambiguous, otherwise the overload is addressed with
//! [`Selector::method`]), optionally narrowed to one closed generic binding. The
//! query filters the recorded entries through `where_*`, access-kind, and
//! generic-binding filters before a terminal assertion:
//!
//! - [`VerifyQuery::called`] fails with [`crate::Error::VerificationFailed`]
//!   unless the filtered count equals the expectation exactly
//! - [`VerifyQuery::called_at_least_once`] requires a count of at least one
//!
//! Narrowing never fails on a type mismatch; a non-matching entry is simply
//! excluded. Referencing a parameter name the member does not declare at all,
//! however, is an immediate [`crate::Error::UnknownParameter`], independent of
//! invocation history.

use std::sync::Arc;

use crate::{
    build::{mock::MockInstance, value::Value},
    model::{descriptor::TypeDescriptor, token::TypeToken},
    path::selector::{Selector, SelectorStep},
    verify::record::{AccessKind, InvocationEntry, InvocationRecord},
    Error::{AmbiguousMember, NotAMock, UnknownMember, UnknownParameter, VerificationFailed},
    Result,
};

/// The verification entry point bound to one built mock instance.
pub struct VerificationScope {
    /// Structural description of the mocked type
    descriptor: Arc<TypeDescriptor>,
    /// The instance's invocation log
    record: Arc<InvocationRecord>,
}

impl VerificationScope {
    pub(crate) fn from_mock(mock: &MockInstance) -> Self {
        VerificationScope {
            descriptor: mock.descriptor().clone(),
            record: mock.record().clone(),
        }
    }

    /// Bind a scope to a built value.
    ///
    /// # Errors
    /// Returns [`NotAMock`] if the value carries no invocation record.
    pub fn of(value: &Value) -> Result<Self> {
        match value.as_mock() {
            Some(mock) => Ok(Self::from_mock(mock)),
            None => Err(NotAMock(value.to_string())),
        }
    }

    /// The underlying invocation record.
    #[must_use]
    pub fn record(&self) -> &Arc<InvocationRecord> {
        &self.record
    }

    /// Open a query over one member path.
    ///
    /// A bare string addresses a property or a method whose name has exactly
    /// one overload; [`Selector::method`] addresses one overload of several,
    /// and a trailing [`Selector::bound`] step restricts the query to calls
    /// made with those exact type arguments. Counts never merge across
    /// overloads that happen to share a name.
    ///
    /// # Errors
    /// Returns [`UnknownMember`] if the selector names no declared member
    /// path of the mocked type, or [`AmbiguousMember`] when a bare name
    /// addresses an overloaded method.
    pub fn verify<S: Into<Selector>>(&self, selector: S) -> Result<VerifyQuery> {
        let selector = selector.into();
        let (member, signature, binding) = self.resolve(&selector)?;
        let query = VerifyQuery {
            descriptor: self.descriptor.clone(),
            record: self.record.clone(),
            member,
            signature,
            access: None,
            filters: Vec::new(),
            narrowed: Vec::new(),
        };
        Ok(match binding {
            Some(args) => query.with_type_args(&args),
            None => query,
        })
    }

    /// Resolve a selector to the member name, its unique overload signature,
    /// and an optional closed generic binding.
    fn resolve(&self, selector: &Selector) -> Result<(String, String, Option<Vec<TypeToken>>)> {
        let unresolvable = || UnknownMember {
            ty: self.descriptor.name.clone(),
            member: selector.to_string(),
        };

        let mut steps = selector.steps.iter();
        let (member, signature) = match steps.next() {
            Some(SelectorStep::Member(name)) => {
                if self.descriptor.property(name).is_some() {
                    (name.clone(), name.clone())
                } else {
                    let overloads = self.descriptor.methods_named(name);
                    match overloads.len() {
                        0 => {
                            return Err(UnknownMember {
                                ty: self.descriptor.name.clone(),
                                member: name.clone(),
                            })
                        }
                        1 => (name.clone(), overloads[0].signature()),
                        _ => {
                            return Err(AmbiguousMember {
                                ty: self.descriptor.name.clone(),
                                member: name.clone(),
                            })
                        }
                    }
                }
            }
            Some(SelectorStep::Method { name, params }) => {
                let method = self
                    .descriptor
                    .find_method(name, params)
                    .ok_or_else(unresolvable)?;
                (name.clone(), method.signature())
            }
            _ => return Err(unresolvable()),
        };

        let binding = match steps.next() {
            Some(SelectorStep::Binding(args)) => Some(args.clone()),
            Some(_) => return Err(unresolvable()),
            None => None,
        };
        if steps.next().is_some() {
            return Err(unresolvable());
        }
        Ok((member, signature, binding))
    }
}

/// A filtered query over the invocations of one member path.
///
/// Filters compose; each `where_*`/access call returns the narrowed query.
pub struct VerifyQuery {
    descriptor: Arc<TypeDescriptor>,
    record: Arc<InvocationRecord>,
    member: String,
    /// Resolved overload signature; entries of same-named overloads never match
    signature: String,
    /// Restrict to one access stream (calls, gets, or sets)
    access: Option<AccessKind>,
    /// Entry predicates, all of which must hold
    filters: Vec<Box<dyn Fn(&InvocationEntry) -> bool>>,
    /// Human-readable filter descriptions for assertion messages
    narrowed: Vec<String>,
}

impl VerifyQuery {
    /// Narrow to invocations whose argument for `param` equals `value`.
    ///
    /// A recorded argument of a different type never matches and is simply
    /// excluded.
    ///
    /// # Errors
    /// Returns [`UnknownParameter`] if the queried overload declares no
    /// parameter of that name.
    pub fn where_is(self, param: &str, value: Value) -> Result<Self> {
        let param = param.to_string();
        self.check_parameter(&param)?;
        let description = format!("{param} == {value}");
        let matcher = move |entry: &InvocationEntry| entry.arg(&param) == Some(&value);
        Ok(self.push_filter(description, matcher))
    }

    /// Narrow to invocations whose argument for `param` satisfies the
    /// predicate.
    ///
    /// # Errors
    /// Returns [`UnknownParameter`] if the queried overload declares no
    /// parameter of that name.
    pub fn where_matches<F>(self, param: &str, predicate: F) -> Result<Self>
    where
        F: Fn(&Value) -> bool + 'static,
    {
        let param = param.to_string();
        self.check_parameter(&param)?;
        let description = format!("{param} matches predicate");
        let matcher =
            move |entry: &InvocationEntry| entry.arg(&param).is_some_and(&predicate);
        Ok(self.push_filter(description, matcher))
    }

    /// Narrow to invocations whose actual generic bindings equal `args`.
    #[must_use]
    pub fn with_type_args(self, args: &[TypeToken]) -> Self {
        let args = args.to_vec();
        let description = format!(
            "bound to <{}>",
            args.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        );
        let matcher = move |entry: &InvocationEntry| entry.type_args == args;
        self.push_filter(description, matcher)
    }

    /// Restrict a property query to the getter invocation stream.
    #[must_use]
    pub fn getter(mut self) -> Self {
        self.access = Some(AccessKind::Get);
        self
    }

    /// Restrict a property query to the setter invocation stream.
    #[must_use]
    pub fn setter(mut self) -> Self {
        self.access = Some(AccessKind::Set);
        self
    }

    /// Restrict to setter invocations that assigned exactly `value`.
    #[must_use]
    pub fn setter_of(self, value: Value) -> Self {
        let description = format!("assigned {value}");
        let matcher = move |entry: &InvocationEntry| entry.arg("value") == Some(&value);
        let mut query = self.push_filter(description, matcher);
        query.access = Some(AccessKind::Set);
        query
    }

    /// Number of recorded invocations matching all filters.
    #[must_use]
    pub fn count(&self) -> usize {
        self.record
            .iter()
            .filter(|entry| self.matches(entry))
            .count()
    }

    /// Assert that exactly `expected` matching invocations were recorded.
    ///
    /// # Errors
    /// Returns [`VerificationFailed`] when the actual count differs; the
    /// message states expected vs. actual and the owning type name.
    pub fn called(self, expected: usize) -> Result<()> {
        let actual = self.count();
        if actual == expected {
            Ok(())
        } else {
            Err(VerificationFailed(format!(
                "expected {expected} invocation(s) of {}::{}{}, observed {actual}",
                self.descriptor.name,
                self.member,
                self.narrowed_suffix(),
            )))
        }
    }

    /// Assert that at least one matching invocation was recorded.
    ///
    /// # Errors
    /// Returns [`VerificationFailed`] when no invocation matches.
    pub fn called_at_least_once(self) -> Result<()> {
        let actual = self.count();
        if actual >= 1 {
            Ok(())
        } else {
            Err(VerificationFailed(format!(
                "expected at least one invocation of {}::{}{}, observed none",
                self.descriptor.name,
                self.member,
                self.narrowed_suffix(),
            )))
        }
    }

    fn matches(&self, entry: &InvocationEntry) -> bool {
        entry.signature == self.signature
            && self.access.map_or(true, |access| entry.access == access)
            && self.filters.iter().all(|filter| filter(entry))
    }

    /// Fail fast when a filter names a parameter the resolved overload does
    /// not declare.
    fn check_parameter(&self, param: &str) -> Result<()> {
        let declared = if self.descriptor.property(&self.member).is_some() {
            // Property sets expose exactly one parameter: the assigned value
            param == "value"
        } else {
            self.descriptor
                .methods_named(&self.member)
                .iter()
                .find(|m| m.signature() == self.signature)
                .is_some_and(|m| m.param(param).is_some())
        };
        if declared {
            Ok(())
        } else {
            Err(UnknownParameter {
                member: self.member.clone(),
                parameter: param.to_string(),
            })
        }
    }

    fn push_filter<F>(mut self, description: String, matcher: F) -> Self
    where
        F: Fn(&InvocationEntry) -> bool + 'static,
    {
        self.filters.push(Box::new(matcher));
        self.narrowed.push(description);
        self
    }

    fn narrowed_suffix(&self) -> String {
        if self.narrowed.is_empty() {
            String::new()
        } else {
            format!(" where {}", self.narrowed.join(" and "))
        }
    }
}
