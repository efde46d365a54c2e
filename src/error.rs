use thiserror::Error;

use crate::model::token::TypeToken;

macro_rules! internal_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Internal {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Internal {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all possible error conditions that can occur while describing types,
/// configuring fixture members, constructing instances, and verifying recorded invocations.
/// Each variant provides specific context about the failure mode to enable appropriate
/// error handling.
///
/// # Error Categories
///
/// ## Configuration Errors
/// Signal a mistake by the test author; raised immediately at the offending call and
/// never retried.
/// - [`Error::InvalidCount`] - Negative count passed to a bulk build
/// - [`Error::UnknownMember`] - A selector referenced a member the type does not declare
/// - [`Error::AmbiguousMember`] - A selector matched more than one method overload
/// - [`Error::UnknownParameter`] - A verification filter named a parameter the member does not declare
/// - [`Error::TypeNotFound`] / [`Error::UnknownTypeName`] - Registry lookup failed
/// - [`Error::DuplicateType`] - A descriptor with the same name is already registered
/// - [`Error::NotAMock`] - A verification scope was requested for a non-mock instance
///
/// ## Build Errors
/// Raised synchronously from a build call; fatal for that build attempt only.
/// - [`Error::NoUsableConstructor`] - A class descriptor declares no constructor
/// - [`Error::CyclicGraph`] - Object graph construction re-entered an in-progress type
///
/// ## Verification Errors
/// - [`Error::VerificationFailed`] - An invocation-count assertion did not hold; intended
///   to propagate uncaught into the calling test framework
///
/// ## Internal Errors
/// - [`Error::Internal`] - A structural inconsistency inside the engine; never silently swallowed
///
/// # Examples
///
/// ```rust
/// use specimen::prelude::*;
///
/// let registry = TypeRegistry::new();
/// let person = DescriptorBuilder::class(&registry, "Person").finish()?;
///
/// let mut fixture = Fixture::new(registry.clone(), person)?;
/// match fixture.build_many(-1) {
///     Err(Error::InvalidCount(n)) => assert_eq!(n, -1),
///     other => panic!("expected InvalidCount, got {other:?}"),
/// }
/// # Ok::<(), specimen::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    /// A bulk build was requested with a negative count.
    ///
    /// Raised before any instance is constructed. A count of zero is valid
    /// and yields an empty sequence.
    #[error("Build count must be non-negative, got {0}")]
    InvalidCount(i64),

    /// A selector referenced a member that the owning type does not declare.
    ///
    /// This covers constructor parameters, properties, fields, and methods.
    /// The member name is matched exactly, including case.
    #[error("Type '{ty}' declares no member '{member}'")]
    UnknownMember {
        /// Name of the type the selector was resolved against
        ty: String,
        /// The member name that failed to resolve
        member: String,
    },

    /// A selector matched more than one method overload.
    ///
    /// Occurs when a member name alone is used to address an overloaded
    /// method. Disambiguate with an explicit parameter-type signature.
    #[error("Member '{member}' is ambiguous on '{ty}', specify the overload signature")]
    AmbiguousMember {
        /// Name of the type the selector was resolved against
        ty: String,
        /// The ambiguous member name
        member: String,
    },

    /// A verification filter named a parameter the member does not declare.
    ///
    /// Unlike a type mismatch (which silently excludes non-matching entries),
    /// a non-existent parameter name is always a programmer error and fails
    /// immediately, independent of invocation history.
    #[error("Member '{member}' declares no parameter named '{parameter}'")]
    UnknownParameter {
        /// The member the filter was bound to
        member: String,
        /// The parameter name that does not exist
        parameter: String,
    },

    /// Failed to find a type descriptor in the registry by token.
    #[error("Failed to find type in registry - {0}")]
    TypeNotFound(TypeToken),

    /// Failed to find a type descriptor in the registry by name.
    #[error("Failed to find type in registry - '{0}'")]
    UnknownTypeName(String),

    /// A descriptor with the same name is already registered.
    ///
    /// Type names are unique per registry; re-registering a name is treated
    /// as a configuration mistake rather than silently replacing the
    /// existing descriptor.
    #[error("A type named '{0}' is already registered")]
    DuplicateType(String),

    /// A verification scope was requested for an instance that carries no
    /// invocation record.
    ///
    /// Only mock-candidate types (interfaces and abstract classes) record
    /// invocations; concrete classes, containers, and base values do not.
    #[error("'{0}' is not a mock candidate and carries no invocation record")]
    NotAMock(String),

    // Build errors
    /// A class descriptor declares no constructor at all.
    ///
    /// The constructor selection strategy found an empty candidate pool.
    /// The associated value names the offending type.
    #[error("No usable constructor declared on '{0}'")]
    NoUsableConstructor(String),

    /// Object graph construction re-entered a type that is already being
    /// constructed along the current path.
    ///
    /// The engine fails fast on cycles instead of substituting placeholders;
    /// the associated value names the type that closed the cycle.
    #[error("Cyclic object graph detected while constructing '{0}'")]
    CyclicGraph(String),

    // Verification errors
    /// An invocation-count assertion did not hold.
    ///
    /// The message always states the expected and actual invocation counts
    /// and the owning type name, so the failure is readable without further
    /// context when surfaced by a test framework.
    #[error("{0}")]
    VerificationFailed(String),

    // Internal errors
    /// A structural inconsistency was detected inside the engine.
    ///
    /// This indicates a bug in the engine or a descriptor that disagrees
    /// with the constructed value, not a caller mistake. The error includes
    /// the source location where the inconsistency was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the inconsistency
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Internal - {file}:{line}: {message}")]
    Internal {
        /// The message to be printed for the Internal error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}
