//! Append-only invocation recording.
//!
//! Every mock adapter owns exactly one [`InvocationRecord`]. The adapter appends
//! one [`InvocationEntry`] per intercepted call, property get, or property set,
//! preserving call order. Appends are lock-free (`boxcar::Vec`), so calls from
//! more than one thread are never lost or corrupted; the total count observed
//! after all calls complete is always correct.

use strum::Display;

use crate::{build::value::Value, model::token::TypeToken};

/// How a member was accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AccessKind {
    /// A method invocation
    Call,
    /// A property read
    Get,
    /// A property write
    Set,
}

/// One observed member access on a mock adapter.
#[derive(Debug, Clone)]
pub struct InvocationEntry {
    /// Name of the accessed member
    pub member: String,
    /// Overload signature of the accessed member
    /// ([`MethodDesc::signature`](crate::model::descriptor::MethodDesc::signature)
    /// for methods, the member name itself for properties). Distinguishes
    /// overloads that share a name.
    pub signature: String,
    /// Kind of access
    pub access: AccessKind,
    /// Actual argument values, paired with their declared parameter names.
    /// Property sets carry a single `value` argument.
    pub args: Vec<(String, Value)>,
    /// Actual generic type arguments of the call, empty for non-generic members
    pub type_args: Vec<TypeToken>,
    /// Zero-based position in the record
    pub sequence: u64,
}

impl InvocationEntry {
    /// The recorded argument for a named parameter.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }
}

/// The ordered log of member accesses observed on one mock adapter.
///
/// Exclusively owned by one built instance; never shared between instances.
#[derive(Debug, Default)]
pub struct InvocationRecord {
    entries: boxcar::Vec<InvocationEntry>,
    next_sequence: std::sync::atomic::AtomicU64,
}

impl InvocationRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        InvocationRecord {
            entries: boxcar::Vec::new(),
            next_sequence: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Append one entry, returning its sequence number.
    pub(crate) fn append(
        &self,
        member: &str,
        signature: &str,
        access: AccessKind,
        args: Vec<(String, Value)>,
        type_args: Vec<TypeToken>,
    ) -> u64 {
        let sequence = self
            .next_sequence
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.entries.push(InvocationEntry {
            member: member.to_string(),
            signature: signature.to_string(),
            access,
            args,
            type_args,
            sequence,
        });
        sequence
    }

    /// Number of recorded accesses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.count()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.count() == 0
    }

    /// Iterate over all recorded entries in call order.
    pub fn iter(&self) -> impl Iterator<Item = &InvocationEntry> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    /// The entry at a given sequence position.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&InvocationEntry> {
        self.entries.get(index)
    }
}
