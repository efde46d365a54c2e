//! Unique value generation for base kinds.
//!
//! A [`UniqueSource`] produces leaf values with a distinctness guarantee bounded by
//! each kind's cardinality: for the first N requests of a kind, where N does not
//! exceed the number of distinct values of that kind, all N returned values are
//! pairwise distinct. Once a kind's value space is exhausted the counters wrap and
//! values repeat in the same order.
//!
//! Per-kind contracts:
//!
//! - **bool**: always `true` (cardinality 2, no distinctness contract)
//! - **integral kinds**: sequential values derived from a per-kind counter
//! - **floating point**: distinct finite values derived from the counter's bit
//!   pattern, starting at 1.0 and stepping through successive representable values
//! - **char**: distinct Unicode scalars, skipping the surrogate range
//! - **string**: a freshly generated token that parses as a valid GUID string, never empty
//! - **enum**: the first request returns the first member in *declaration order*
//!   (not numeric order), subsequent requests cycle through the remaining members
//! - **nullable**: always a present inner value; null only when explicitly configured
//!
//! One `UniqueSource` belongs to one fixture, so distinctness spans all instances
//! produced by that fixture, including bulk builds. Counters are atomic: the source
//! can be shared with the mock adapters a build emits.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    OnceLock,
};

use dashmap::DashMap;
use strum::EnumCount;

use crate::{
    build::value::Value,
    model::{
        descriptor::TypeDescriptor,
        kind::{FixtureKind, PrimitiveKind},
        registry::TypeRegistry,
        token::TypeToken,
    },
    Result,
};

/// First generated char; keeps early values in the printable ASCII range.
const CHAR_BASE: u32 = 0x21;
/// Number of generatable scalar values starting at `CHAR_BASE`, surrogates excluded.
const CHAR_SPAN: u64 = (0x11_0000 - 0x800 - CHAR_BASE) as u64;

/// Number of non-negative finite f32 bit patterns; patterns at and above this
/// encode infinities and NaNs.
const R4_FINITE: u64 = 0x7F80_0000;
/// Bit pattern of 1.0f32, the first generated f32.
const R4_ONE: u64 = 0x3F80_0000;
/// Number of non-negative finite f64 bit patterns.
const R8_FINITE: u64 = 0x7FF0_0000_0000_0000;
/// Bit pattern of 1.0f64, the first generated f64.
const R8_ONE: u64 = 0x3FF0_0000_0000_0000;

/// Process-wide entropy mixed into every generated GUID string.
static PROCESS_SEED: OnceLock<u64> = OnceLock::new();
/// Distinguishes sources created within the same process.
static SOURCE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn process_seed() -> u64 {
    *PROCESS_SEED.get_or_init(|| {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        splitmix64(nanos ^ u64::from(std::process::id()))
    })
}

/// One round of the splitmix64 mixing function.
fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Per-fixture generator of unique leaf values.
///
/// See the [module documentation](self) for the per-kind contracts.
pub struct UniqueSource {
    /// One counter per base kind
    counters: [AtomicU64; PrimitiveKind::COUNT],
    /// One counter per enum type observed by this source
    enum_counters: DashMap<TypeToken, AtomicU64>,
    /// Entropy folded into generated GUID strings
    seed: u64,
}

impl UniqueSource {
    /// Create a fresh source with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        let instance = SOURCE_COUNTER.fetch_add(1, Ordering::SeqCst);
        UniqueSource {
            counters: std::array::from_fn(|_| AtomicU64::new(0)),
            enum_counters: DashMap::new(),
            seed: splitmix64(process_seed() ^ instance),
        }
    }

    /// Produce the next unique value of the given base kind.
    pub fn next_primitive(&self, kind: PrimitiveKind) -> Value {
        let n = self.counters[kind as usize].fetch_add(1, Ordering::SeqCst);
        match kind {
            PrimitiveKind::Bool => Value::Bool(true),
            PrimitiveKind::Char => {
                let mut code = CHAR_BASE + (n % CHAR_SPAN) as u32;
                if code >= 0xD800 {
                    code += 0x800;
                }
                Value::Char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
            }
            PrimitiveKind::I1 => Value::I1(n as u8 as i8),
            PrimitiveKind::U1 => Value::U1(n as u8),
            PrimitiveKind::I2 => Value::I2(n as u16 as i16),
            PrimitiveKind::U2 => Value::U2(n as u16),
            PrimitiveKind::I4 => Value::I4(n as u32 as i32),
            PrimitiveKind::U4 => Value::U4(n as u32),
            PrimitiveKind::I8 => Value::I8(n as i64),
            PrimitiveKind::U8 => Value::U8(n),
            // Counter-to-bit-pattern mapping; injective over the finite range
            PrimitiveKind::R4 => {
                Value::R4(f32::from_bits((n.wrapping_add(R4_ONE) % R4_FINITE) as u32))
            }
            PrimitiveKind::R8 => Value::R8(f64::from_bits(n.wrapping_add(R8_ONE) % R8_FINITE)),
            PrimitiveKind::String => Value::String(self.next_guid_string(n)),
        }
    }

    /// Produce the next unique value for a generatable descriptor.
    ///
    /// Handles base kinds, enumerations (declaration-order cycling), and
    /// nullable wrappers (always a present inner value).
    ///
    /// # Errors
    /// Returns an internal error when called for a descriptor kind that is
    /// not generatable (classes, mocks, containers), or when a nullable
    /// wrapper's inner type is not registered.
    pub fn next_for(&self, descriptor: &TypeDescriptor, registry: &TypeRegistry) -> Result<Value> {
        match descriptor.kind {
            FixtureKind::Base(kind) => Ok(self.next_primitive(kind)),
            FixtureKind::Enum => self.next_enum(descriptor),
            FixtureKind::Nullable => {
                let inner = descriptor.generic_args.first().copied().ok_or_else(|| {
                    internal_error!("Nullable descriptor '{}' has no inner type", descriptor.name)
                })?;
                let inner_desc = registry.descriptor_of(inner)?;
                self.next_for(&inner_desc, registry)
            }
            _ => Err(internal_error!(
                "'{}' is not a generatable kind",
                descriptor.name
            )),
        }
    }

    /// Cycle through an enumeration's members in declaration order.
    fn next_enum(&self, descriptor: &TypeDescriptor) -> Result<Value> {
        if descriptor.enum_members.is_empty() {
            return Err(internal_error!(
                "Enum '{}' declares no members",
                descriptor.name
            ));
        }

        let counter = self
            .enum_counters
            .entry(descriptor.token)
            .or_insert_with(|| AtomicU64::new(0));
        let n = counter.fetch_add(1, Ordering::SeqCst) as usize;
        let member = &descriptor.enum_members[n % descriptor.enum_members.len()];
        Ok(Value::Enum {
            ty: descriptor.token,
            member: member.name.clone(),
            value: member.value,
        })
    }

    /// Format counter `n` as a GUID string, mixing in the source seed.
    fn next_guid_string(&self, n: u64) -> String {
        let hi = splitmix64(self.seed ^ n);
        let lo = splitmix64(hi ^ n.rotate_left(32));

        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&hi.to_le_bytes());
        bytes[8..].copy_from_slice(&lo.to_le_bytes());
        uguid::Guid::from_bytes(bytes).to_string()
    }
}

impl Default for UniqueSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UniqueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniqueSource").finish_non_exhaustive()
    }
}
