//! Invocation recording and verification.
//!
//! Mocks append every intercepted access to their own [`InvocationRecord`];
//! a [`VerificationScope`] queries that record after the instance has been
//! exercised, through a filter chain ending in a count assertion.

pub mod query;
pub mod record;

pub use query::{VerificationScope, VerifyQuery};
pub use record::{AccessKind, InvocationEntry, InvocationRecord};
