//! Central type registry for fixture construction.
//!
//! This module provides the [`TypeRegistry`], a thread-safe, process-wide registry for
//! all type descriptors known to the engine. It is the single shared state between
//! independent build calls: populated on first use, append-only, never evicted, and
//! safe to read from many call sites simultaneously.
//!
//! # Registry Architecture
//!
//! The registry uses a multi-index approach for efficient descriptor lookup:
//!
//! - **Token-based lookup**: Primary index using [`TypeToken`] keys (`SkipMap`)
//! - **Name-based lookup**: Secondary index from type names to tokens (`DashMap`)
//! - **Atomic token allocation**: Registration indices from an `AtomicU32`
//!
//! # Thread Safety
//!
//! The registry is designed for concurrent population:
//! - Lock-free data structures for primary storage (`SkipMap`)
//! - Concurrent hash map for the name index (`DashMap`)
//! - Atomic operations for token generation
//! - No blocking operations during normal lookup/insertion
//!
//! # Examples
//!
//! ```rust
//! use specimen::prelude::*;
//!
//! let registry = TypeRegistry::new();
//!
//! // Primitive descriptors are seeded on construction
//! let i32_token = registry.primitive(PrimitiveKind::I4);
//! assert!(registry.get(&i32_token).is_some());
//!
//! // Container descriptors are created on demand and deduplicated
//! let ints = registry.array_of(i32_token)?;
//! assert_eq!(registry.array_of(i32_token)?, ints);
//! # Ok::<(), specimen::Error>(())
//! ```

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, OnceLock,
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use strum::IntoEnumIterator;

use crate::{
    model::{
        descriptor::TypeDescriptor,
        kind::{ContainerKind, FixtureKind, PrimitiveKind},
        token::TypeToken,
    },
    Error::{DuplicateType, TypeNotFound, UnknownTypeName},
    Result,
};

/// Descriptor family tags encoded in the high byte of a [`TypeToken`].
pub mod family {
    /// Base value kinds seeded at registry construction
    pub const PRIMITIVE: u8 = 0x01;
    /// Concrete classes and structs
    pub const CLASS: u8 = 0x02;
    /// Interfaces and abstract classes
    pub const MOCK: u8 = 0x03;
    /// Enumerations
    pub const ENUM: u8 = 0x04;
    /// Arrays, lists, and maps
    pub const CONTAINER: u8 = 0x05;
    /// Nullable wrappers
    pub const NULLABLE: u8 = 0x06;
}

/// The process-wide registry shared by [`crate::Fixture::of`].
static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

/// Central registry of all type descriptors known to the engine.
///
/// Descriptors are registered once, assigned a stable [`TypeToken`], and shared
/// read-only for the process lifetime. See the [module documentation](self) for
/// the index architecture and thread-safety guarantees.
pub struct TypeRegistry {
    /// Primary storage: token -> descriptor
    types: SkipMap<TypeToken, Arc<TypeDescriptor>>,
    /// Name index: type name -> token
    names: DashMap<String, TypeToken>,
    /// Next registration index to hand out
    next_index: AtomicU32,
}

impl TypeRegistry {
    /// Create a new registry seeded with all primitive descriptors.
    #[must_use]
    pub fn new() -> Arc<Self> {
        let registry = TypeRegistry {
            types: SkipMap::new(),
            names: DashMap::new(),
            next_index: AtomicU32::new(PrimitiveKind::iter().count() as u32 + 1),
        };

        for kind in PrimitiveKind::iter() {
            let token = Self::primitive_token(kind);
            let descriptor = Arc::new(TypeDescriptor {
                token,
                name: kind.type_name().to_string(),
                kind: FixtureKind::Base(kind),
                base: None,
                interfaces: Vec::new(),
                generic_args: Vec::new(),
                constructors: Vec::new(),
                properties: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                enum_members: Vec::new(),
            });
            registry.names.insert(descriptor.name.clone(), token);
            registry.types.insert(token, descriptor);
        }

        Arc::new(registry)
    }

    /// The shared process-wide registry.
    ///
    /// Populated on first use and never torn down. All fixtures created
    /// through [`crate::Fixture::of`] resolve names against this registry.
    #[must_use]
    pub fn global() -> &'static Arc<TypeRegistry> {
        GLOBAL.get_or_init(TypeRegistry::new)
    }

    /// The fixed token of a primitive kind.
    ///
    /// Primitive tokens are stable across all registries.
    #[must_use]
    pub fn primitive_token(kind: PrimitiveKind) -> TypeToken {
        TypeToken::new((u32::from(family::PRIMITIVE) << 24) | (kind as u32 + 1))
    }

    /// The token of a primitive kind in this registry.
    #[must_use]
    pub fn primitive(&self, kind: PrimitiveKind) -> TypeToken {
        Self::primitive_token(kind)
    }

    /// Look up a descriptor by token.
    #[must_use]
    pub fn get(&self, token: &TypeToken) -> Option<Arc<TypeDescriptor>> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up a descriptor by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.names
            .get(name)
            .and_then(|token| self.get(token.value()))
    }

    /// Look up a descriptor by token, failing with [`TypeNotFound`] when absent.
    ///
    /// # Errors
    /// Returns [`TypeNotFound`] if no descriptor is registered under `token`.
    pub fn descriptor_of(&self, token: TypeToken) -> Result<Arc<TypeDescriptor>> {
        self.get(&token).ok_or(TypeNotFound(token))
    }

    /// Resolve a type name to its token, failing with [`UnknownTypeName`] when absent.
    ///
    /// # Errors
    /// Returns [`UnknownTypeName`] if no descriptor is registered under `name`.
    pub fn token_of(&self, name: &str) -> Result<TypeToken> {
        self.names
            .get(name)
            .map(|token| *token.value())
            .ok_or_else(|| UnknownTypeName(name.to_string()))
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the registry holds no descriptors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Allocate a fresh token in the given descriptor family.
    pub(crate) fn alloc_token(&self, family: u8) -> TypeToken {
        let index = self.next_index.fetch_add(1, Ordering::SeqCst);
        TypeToken::new((u32::from(family) << 24) | (index & 0x00FF_FFFF))
    }

    /// Register a fully built descriptor under its own token.
    ///
    /// # Errors
    /// Returns [`DuplicateType`] if a descriptor with the same name is
    /// already registered.
    pub fn insert(&self, descriptor: TypeDescriptor) -> Result<TypeToken> {
        let token = descriptor.token;
        match self.names.entry(descriptor.name.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(DuplicateType(descriptor.name)),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(token);
                self.types.insert(token, Arc::new(descriptor));
                Ok(token)
            }
        }
    }

    /// Get or create the array descriptor for the given element type.
    ///
    /// # Errors
    /// Returns [`TypeNotFound`] if `element` is not registered.
    pub fn array_of(&self, element: TypeToken) -> Result<TypeToken> {
        let element_desc = self.descriptor_of(element)?;
        let name = format!("[{}]", element_desc.name);
        Ok(self.get_or_create_shape(
            &name,
            family::CONTAINER,
            FixtureKind::Container(ContainerKind::Array),
            vec![element],
        ))
    }

    /// Get or create the list descriptor for the given element type.
    ///
    /// # Errors
    /// Returns [`TypeNotFound`] if `element` is not registered.
    pub fn list_of(&self, element: TypeToken) -> Result<TypeToken> {
        let element_desc = self.descriptor_of(element)?;
        let name = format!("List<{}>", element_desc.name);
        Ok(self.get_or_create_shape(
            &name,
            family::CONTAINER,
            FixtureKind::Container(ContainerKind::List),
            vec![element],
        ))
    }

    /// Get or create the map descriptor for the given key and value types.
    ///
    /// # Errors
    /// Returns [`TypeNotFound`] if `key` or `value` is not registered.
    pub fn map_of(&self, key: TypeToken, value: TypeToken) -> Result<TypeToken> {
        let key_desc = self.descriptor_of(key)?;
        let value_desc = self.descriptor_of(value)?;
        let name = format!("Map<{},{}>", key_desc.name, value_desc.name);
        Ok(self.get_or_create_shape(
            &name,
            family::CONTAINER,
            FixtureKind::Container(ContainerKind::Map),
            vec![key, value],
        ))
    }

    /// Get or create the nullable wrapper descriptor for the given inner type.
    ///
    /// # Errors
    /// Returns [`TypeNotFound`] if `inner` is not registered.
    pub fn nullable_of(&self, inner: TypeToken) -> Result<TypeToken> {
        let inner_desc = self.descriptor_of(inner)?;
        let name = format!("Option<{}>", inner_desc.name);
        Ok(self.get_or_create_shape(&name, family::NULLABLE, FixtureKind::Nullable, vec![inner]))
    }

    /// Get-or-create for structural shapes (containers, nullable wrappers)
    /// that are fully determined by their name.
    ///
    /// The name-index entry is taken first, so concurrent callers racing on
    /// the same shape observe one winner and share its token.
    fn get_or_create_shape(
        &self,
        name: &str,
        family: u8,
        kind: FixtureKind,
        generic_args: Vec<TypeToken>,
    ) -> TypeToken {
        let entry = self.names.entry(name.to_string()).or_insert_with(|| {
            let token = self.alloc_token(family);
            let descriptor = Arc::new(TypeDescriptor {
                token,
                name: name.to_string(),
                kind,
                base: None,
                interfaces: Vec::new(),
                generic_args,
                constructors: Vec::new(),
                properties: Vec::new(),
                fields: Vec::new(),
                methods: Vec::new(),
                enum_members: Vec::new(),
            });
            self.types.insert(token, descriptor);
            token
        });
        *entry.value()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .finish_non_exhaustive()
    }
}
