// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(dead_code)]

//! # specimen
//!
//! [![Crates.io](https://img.shields.io/crates/v/specimen.svg)](https://crates.io/crates/specimen)
//! [![Documentation](https://docs.rs/specimen/badge.svg)](https://docs.rs/specimen)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/specimen/blob/main/LICENSE-APACHE)
//!
//! A model-driven test fixture engine. `specimen` constructs fully populated object
//! graphs from registered type descriptions: every unconfigured value is generated
//! unique, abstract members become recording mock adapters, and the invocations made
//! against those adapters can be verified afterwards through a filtered query chain.
//!
//! ## Features
//!
//! - **🏗️ One-call construction** - Realize a whole object graph, constructor arguments
//!   first, properties and fields after
//! - **🔢 Unique value generation** - Per-kind monotonic counters; no two generated
//!   values of one kind collide within a process
//! - **🎭 Recording mocks** - Interfaces and abstract classes become adapters that log
//!   every call, get, and set
//! - **🔍 Invocation verification** - Exact-count and at-least-once assertions, narrowed
//!   by argument values, predicates, and generic bindings
//! - **🧵 Thread safe** - Registry and generators are lock-free or sharded; fixtures
//!   build concurrently
//! - **🧩 Explicit type model** - No runtime reflection; descriptors are registered once
//!   and shared read-only
//!
//! ## Quick Start
//!
//! Add `specimen` to your `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! specimen = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use specimen::prelude::*;
//!
//! let registry = TypeRegistry::new();
//! let string = registry.primitive(PrimitiveKind::String);
//! let person = DescriptorBuilder::class(&registry, "Person")
//!     .ctor(&[("name", string)])
//!     .finish()?;
//!
//! let mut fixture = Fixture::new(registry, person)?;
//! let built = fixture.build()?;
//! assert!(!built.as_object().unwrap().get("name").unwrap().is_null());
//! # Ok::<(), specimen::Error>(())
//! ```
//!
//! ### Configuring Members
//!
//! Members are addressed by [`Selector`] paths and configured with a [`Behavior`]:
//!
//! ```rust
//! use specimen::prelude::*;
//!
//! let registry = TypeRegistry::new();
//! let i4 = registry.primitive(PrimitiveKind::I4);
//! let string = registry.primitive(PrimitiveKind::String);
//! let order = DescriptorBuilder::class(&registry, "Order")
//!     .ctor(&[("id", i4), ("note", string)])
//!     .finish()?;
//!
//! let mut fixture = Fixture::new(registry, order)?;
//! fixture
//!     .with(&Selector::member("id"), Behavior::value(Value::I4(42)))?
//!     .with(&Selector::member("note"), Behavior::null())?;
//!
//! let built = fixture.build()?;
//! let order = built.as_object().unwrap();
//! assert_eq!(order.get("id"), Some(Value::I4(42)));
//! assert_eq!(order.get("note"), Some(Value::Null));
//! # Ok::<(), specimen::Error>(())
//! ```
//!
//! ### Mocking and Verification
//!
//! Interface-typed roots build as recording mocks; a [`VerificationScope`] queries
//! the record after the code under test ran:
//!
//! ```rust
//! use specimen::prelude::*;
//!
//! let registry = TypeRegistry::new();
//! let i4 = registry.primitive(PrimitiveKind::I4);
//! let counter = DescriptorBuilder::interface(&registry, "ICounter")
//!     .method("increment", &[("by", i4)], None)
//!     .finish()?;
//!
//! let mut fixture = Fixture::new(registry, counter)?;
//! let (built, scope) = fixture.build_with_scope()?;
//!
//! let mock = built.as_mock().unwrap();
//! mock.call("increment", &[Value::I4(5)])?;
//!
//! scope.verify("increment")?
//!     .where_is("by", Value::I4(5))?
//!     .called(1)?;
//! # Ok::<(), specimen::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `specimen` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`model`] - Type descriptors, tokens, and the shared [`TypeRegistry`](model::registry::TypeRegistry)
//! - [`path`] - Member selectors and the lazily expanded path tree
//! - [`build`] - Values, constructor strategies, mock adapters, and the realizer
//! - [`verify`] - Invocation records and the verification query chain
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ### Type Model
//!
//! Types are described once, up front, through the
//! [`DescriptorBuilder`](model::builder::DescriptorBuilder) and held in a
//! [`TypeRegistry`](model::registry::TypeRegistry). A descriptor records everything
//! construction needs: constructors with their parameters, properties, fields, method
//! overloads with generic arity, and enum members in declaration order. Registries are
//! append-only and safe to populate concurrently; [`Fixture::of`] resolves names
//! against a shared process-wide registry.
//!
//! ### Construction
//!
//! A [`Fixture`] realizes its root depth-first: the selected constructor's arguments
//! are built first, the instance is assembled, then remaining properties and fields
//! are populated. Unconfigured values come from the per-process
//! [`UniqueSource`](unique::UniqueSource); containers always start empty; object
//! cycles fail fast rather than recurse.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result) with detailed error information:
//!
//! ```rust
//! use specimen::{Error, prelude::*};
//!
//! match Fixture::of("NoSuchType") {
//!     Ok(_) => println!("resolved"),
//!     Err(Error::UnknownTypeName(name)) => println!("not registered: {name}"),
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test
//! cargo bench  # Criterion benchmarks for generation and construction
//! ```

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the specimen library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use specimen::prelude::*;
///
/// let registry = TypeRegistry::new();
/// let token = registry.primitive(PrimitiveKind::Bool);
/// assert!(registry.get(&token).is_some());
/// ```
pub mod prelude;

/// Type descriptors, tokens, and the descriptor registry.
///
/// This module implements the explicit type model that drives construction. It
/// provides:
///
/// - [`model::token::TypeToken`] - Compact type handles with a family tag and index
/// - [`model::descriptor::TypeDescriptor`] - Structural description of one type
/// - [`model::registry::TypeRegistry`] - Thread-safe descriptor storage and lookup
/// - [`model::builder::DescriptorBuilder`] - Fluent descriptor registration
///
/// # Examples
///
/// ```rust
/// use specimen::prelude::*;
///
/// let registry = TypeRegistry::new();
/// let i4 = registry.primitive(PrimitiveKind::I4);
/// let widget = DescriptorBuilder::class(&registry, "Widget")
///     .ctor(&[("id", i4)])
///     .finish()?;
/// assert_eq!(registry.get(&widget).unwrap().name, "Widget");
/// # Ok::<(), specimen::Error>(())
/// ```
pub mod model;

/// Member selectors and the lazily expanded path tree.
///
/// Configuration addresses members through [`path::selector::Selector`] paths;
/// each fixture resolves them against its own [`path::tree::PathTree`], an arena
/// of addressable points in the root's object graph.
pub mod path;

/// Values, constructor strategies, mock adapters, and the instance realizer.
///
/// # Key Types
///
/// - [`build::value::Value`] - The runtime value representation of built instances
/// - [`build::value::ObjectInstance`] - A realized class instance with named members
/// - [`build::mock::MockInstance`] - A recording adapter for interfaces and
///   abstract classes
/// - [`build::strategy::ConstructorStrategy`] - Pluggable constructor selection
pub mod build;

/// Invocation recording and verification queries.
///
/// Every mock adapter logs its interceptions to an append-only
/// [`verify::record::InvocationRecord`]; a [`verify::query::VerificationScope`]
/// opens filtered count assertions over that log.
pub mod verify;

/// Member configuration storage.
pub mod config;

/// Deterministic unique value generation.
pub mod unique;

/// The fixture facade tying configuration, construction, and verification together.
pub mod fixture;

/// `specimen` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. This is used consistently throughout the crate for all fallible
/// operations.
///
/// # Examples
///
/// ```rust
/// use specimen::{Result, prelude::*};
///
/// fn build_named(name: &str) -> Result<Value> {
///     Fixture::of(name)?.build()
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `specimen` Error type
///
/// The main error type for all operations in this crate. Provides detailed error
/// information for descriptor registration, member resolution, construction, and
/// verification.
///
/// # Examples
///
/// ```rust
/// use specimen::{Error, prelude::*};
///
/// let registry = TypeRegistry::new();
/// match registry.token_of("Missing") {
///     Err(Error::UnknownTypeName(name)) => assert_eq!(name, "Missing"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub use error::Error;

/// Main entry point for building configured test instances.
///
/// See [`fixture::Fixture`] for configuration and construction.
///
/// # Example
///
/// ```rust
/// use specimen::prelude::*;
///
/// let registry = TypeRegistry::new();
/// let i4 = registry.primitive(PrimitiveKind::I4);
/// let widget = DescriptorBuilder::class(&registry, "Widget")
///     .ctor(&[("id", i4)])
///     .finish()?;
///
/// let instances = Fixture::new(registry, widget)?.build_many(3)?;
/// assert_eq!(instances.len(), 3);
/// # Ok::<(), specimen::Error>(())
/// ```
pub use fixture::{Behavior, Fixture};

/// Member path addressing for configuration and verification.
pub use path::selector::Selector;

/// The runtime value representation of built instances.
pub use build::value::Value;

/// Thread-safe descriptor registry, shared between fixtures.
pub use model::registry::TypeRegistry;
