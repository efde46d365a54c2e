//! Dynamic values produced by the instance builder.
//!
//! [`Value`] is the engine's runtime representation of everything it can construct:
//! base values, enum members, containers, constructed objects, and mock adapters.
//! Containers and objects use shared interior mutability (`Arc<RwLock<..>>`) so a
//! built instance stays independently mutable after the build call returns, while
//! cloning a `Value` shares rather than duplicates the underlying instance.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock},
};

use crate::{
    build::mock::MockInstance,
    model::{
        descriptor::TypeDescriptor,
        kind::{ContainerKind, FixtureKind, PrimitiveKind},
        token::TypeToken,
    },
};

/// A growable, shared sequence of values.
pub type ValueList = Arc<RwLock<Vec<Value>>>;
/// A shared association of key/value pairs.
pub type ValueMap = Arc<RwLock<Vec<(Value, Value)>>>;

/// A constructed class instance: a bag of named member values.
///
/// Constructor arguments and realized properties/fields all land here, keyed
/// by their declared names.
#[derive(Debug)]
pub struct ObjectInstance {
    /// Token of the constructed type
    ty: TypeToken,
    /// Realized member values by name
    members: RwLock<HashMap<String, Value>>,
}

impl ObjectInstance {
    /// Create an empty instance of the given type.
    #[must_use]
    pub(crate) fn new(ty: TypeToken) -> Self {
        ObjectInstance {
            ty,
            members: RwLock::new(HashMap::new()),
        }
    }

    /// Token of the constructed type.
    #[must_use]
    pub fn ty(&self) -> TypeToken {
        self.ty
    }

    /// Read a member value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        read_lock!(self.members).get(name).cloned()
    }

    /// Returns `true` if the instance holds a member of that name.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        read_lock!(self.members).contains_key(name)
    }

    /// Assign a member value by name.
    pub fn set(&self, name: &str, value: Value) {
        write_lock!(self.members).insert(name.to_string(), value);
    }

    /// Names of all realized members.
    #[must_use]
    pub fn member_names(&self) -> Vec<String> {
        read_lock!(self.members).keys().cloned().collect()
    }
}

/// A dynamically typed value realized by the instance builder.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Explicit null / absent value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Unicode scalar value
    Char(char),
    /// 8-bit signed integer
    I1(i8),
    /// 8-bit unsigned integer
    U1(u8),
    /// 16-bit signed integer
    I2(i16),
    /// 16-bit unsigned integer
    U2(u16),
    /// 32-bit signed integer
    I4(i32),
    /// 32-bit unsigned integer
    U4(u32),
    /// 64-bit signed integer
    I8(i64),
    /// 64-bit unsigned integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// String value
    String(String),
    /// A member of a registered enumeration
    Enum {
        /// Token of the enum type
        ty: TypeToken,
        /// Declared member name
        member: String,
        /// Underlying numeric value
        value: i64,
    },
    /// A fixed-shape sequence, built empty
    Array(ValueList),
    /// A growable sequence, built empty
    List(ValueList),
    /// A key/value association, built empty
    Map(ValueMap),
    /// A constructed class instance
    Object(Arc<ObjectInstance>),
    /// A recording mock adapter
    Mock(Arc<MockInstance>),
}

impl Value {
    /// The zero/empty default of a base kind, used for `Undefined` members
    /// and unconfigured mock returns.
    #[must_use]
    pub fn default_of(kind: PrimitiveKind) -> Value {
        match kind {
            PrimitiveKind::Bool => Value::Bool(false),
            PrimitiveKind::Char => Value::Char('\0'),
            PrimitiveKind::I1 => Value::I1(0),
            PrimitiveKind::U1 => Value::U1(0),
            PrimitiveKind::I2 => Value::I2(0),
            PrimitiveKind::U2 => Value::U2(0),
            PrimitiveKind::I4 => Value::I4(0),
            PrimitiveKind::U4 => Value::U4(0),
            PrimitiveKind::I8 => Value::I8(0),
            PrimitiveKind::U8 => Value::U8(0),
            PrimitiveKind::R4 => Value::R4(0.0),
            PrimitiveKind::R8 => Value::R8(0.0),
            PrimitiveKind::String => Value::String(String::new()),
        }
    }

    /// The kind-appropriate default for any descriptor.
    ///
    /// Base kinds take their zero default, enums take the zero-valued member
    /// (or the first declared one when no member is zero), containers take a
    /// fresh empty instance, everything else is null.
    #[must_use]
    pub fn default_for(descriptor: &TypeDescriptor) -> Value {
        match descriptor.kind {
            FixtureKind::Base(kind) => Value::default_of(kind),
            FixtureKind::Enum => {
                let member = descriptor
                    .enum_members
                    .iter()
                    .find(|m| m.value == 0)
                    .or_else(|| descriptor.enum_members.first());
                match member {
                    Some(m) => Value::Enum {
                        ty: descriptor.token,
                        member: m.name.clone(),
                        value: m.value,
                    },
                    None => Value::Null,
                }
            }
            FixtureKind::Container(kind) => Value::empty_container(kind),
            FixtureKind::Nullable | FixtureKind::Mock | FixtureKind::Class => Value::Null,
        }
    }

    /// A fresh, empty, independently mutable container of the given shape.
    #[must_use]
    pub fn empty_container(kind: ContainerKind) -> Value {
        match kind {
            ContainerKind::Array => Value::Array(Arc::new(RwLock::new(Vec::new()))),
            ContainerKind::List => Value::List(Arc::new(RwLock::new(Vec::new()))),
            ContainerKind::Map => Value::Map(Arc::new(RwLock::new(Vec::new()))),
        }
    }

    /// Returns `true` if this is the null value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to convert to a boolean value
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            Value::I4(value) => Some(*value != 0),
            Value::I8(value) => Some(*value != 0),
            _ => None,
        }
    }

    /// Try to convert to a char value
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(value) => Some(*value),
            _ => None,
        }
    }

    /// Try to convert to a 32-bit integer value
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Bool(value) => Some(i32::from(*value)),
            Value::I1(value) => Some(i32::from(*value)),
            Value::U1(value) => Some(i32::from(*value)),
            Value::I2(value) => Some(i32::from(*value)),
            Value::U2(value) => Some(i32::from(*value)),
            Value::I4(value) => Some(*value),
            Value::U4(value) => i32::try_from(*value).ok(),
            Value::I8(value) => i32::try_from(*value).ok(),
            Value::U8(value) => i32::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Try to convert to a 64-bit integer value
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(value) => Some(i64::from(*value)),
            Value::I1(value) => Some(i64::from(*value)),
            Value::U1(value) => Some(i64::from(*value)),
            Value::I2(value) => Some(i64::from(*value)),
            Value::U2(value) => Some(i64::from(*value)),
            Value::I4(value) => Some(i64::from(*value)),
            Value::U4(value) => Some(i64::from(*value)),
            Value::I8(value) => Some(*value),
            Value::U8(value) => i64::try_from(*value).ok(),
            Value::Enum { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Try to convert to a floating point value
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I1(value) => Some(f64::from(*value)),
            Value::U1(value) => Some(f64::from(*value)),
            Value::I2(value) => Some(f64::from(*value)),
            Value::U2(value) => Some(f64::from(*value)),
            Value::I4(value) => Some(f64::from(*value)),
            Value::U4(value) => Some(f64::from(*value)),
            Value::R4(value) => Some(f64::from(*value)),
            Value::R8(value) => Some(*value),
            _ => None,
        }
    }

    /// Try to view as a string slice
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Try to view as a constructed object
    #[must_use]
    pub fn as_object(&self) -> Option<&Arc<ObjectInstance>> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Try to view as a mock adapter
    #[must_use]
    pub fn as_mock(&self) -> Option<&Arc<MockInstance>> {
        match self {
            Value::Mock(instance) => Some(instance),
            _ => None,
        }
    }

    /// Try to view as a sequence container (array or list)
    #[must_use]
    pub fn as_sequence(&self) -> Option<&ValueList> {
        match self {
            Value::Array(list) | Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to view as a map container
    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Element count for containers, `None` for non-container values.
    #[must_use]
    pub fn container_len(&self) -> Option<usize> {
        match self {
            Value::Array(list) | Value::List(list) => Some(read_lock!(list).len()),
            Value::Map(map) => Some(read_lock!(map).len()),
            _ => None,
        }
    }

    /// The base kind this value carries, if any.
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Bool(_) => Some(PrimitiveKind::Bool),
            Value::Char(_) => Some(PrimitiveKind::Char),
            Value::I1(_) => Some(PrimitiveKind::I1),
            Value::U1(_) => Some(PrimitiveKind::U1),
            Value::I2(_) => Some(PrimitiveKind::I2),
            Value::U2(_) => Some(PrimitiveKind::U2),
            Value::I4(_) => Some(PrimitiveKind::I4),
            Value::U4(_) => Some(PrimitiveKind::U4),
            Value::I8(_) => Some(PrimitiveKind::I8),
            Value::U8(_) => Some(PrimitiveKind::U8),
            Value::R4(_) => Some(PrimitiveKind::R4),
            Value::R8(_) => Some(PrimitiveKind::R8),
            Value::String(_) => Some(PrimitiveKind::String),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I1(a), Value::I1(b)) => a == b,
            (Value::U1(a), Value::U1(b)) => a == b,
            (Value::I2(a), Value::I2(b)) => a == b,
            (Value::U2(a), Value::U2(b)) => a == b,
            (Value::I4(a), Value::I4(b)) => a == b,
            (Value::U4(a), Value::U4(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::R4(a), Value::R4(b)) => a == b,
            (Value::R8(a), Value::R8(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (
                Value::Enum {
                    ty: ta,
                    member: ma,
                    ..
                },
                Value::Enum {
                    ty: tb,
                    member: mb,
                    ..
                },
            ) => ta == tb && ma == mb,
            (Value::Array(a), Value::Array(b)) | (Value::List(a), Value::List(b)) => {
                Arc::ptr_eq(a, b) || *read_lock!(a) == *read_lock!(b)
            }
            (Value::Map(a), Value::Map(b)) => {
                Arc::ptr_eq(a, b) || *read_lock!(a) == *read_lock!(b)
            }
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Mock(a), Value::Mock(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "'{v}'"),
            Value::I1(v) => write!(f, "{v}"),
            Value::U1(v) => write!(f, "{v}"),
            Value::I2(v) => write!(f, "{v}"),
            Value::U2(v) => write!(f, "{v}"),
            Value::I4(v) => write!(f, "{v}"),
            Value::U4(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::R4(v) => write!(f, "{v}"),
            Value::R8(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Enum { member, value, .. } => write!(f, "{member}({value})"),
            Value::Array(list) => write!(f, "array[{}]", read_lock!(list).len()),
            Value::List(list) => write!(f, "list[{}]", read_lock!(list).len()),
            Value::Map(map) => write!(f, "map[{}]", read_lock!(map).len()),
            Value::Object(instance) => write!(f, "object({})", instance.ty()),
            Value::Mock(instance) => write!(f, "mock({})", instance.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_zero_like() {
        assert_eq!(Value::default_of(PrimitiveKind::Bool), Value::Bool(false));
        assert_eq!(Value::default_of(PrimitiveKind::I4), Value::I4(0));
        assert_eq!(
            Value::default_of(PrimitiveKind::String),
            Value::String(String::new())
        );
        assert_eq!(Value::default_of(PrimitiveKind::Char), Value::Char('\0'));
    }

    #[test]
    fn test_container_independence() {
        let a = Value::empty_container(ContainerKind::List);
        let b = Value::empty_container(ContainerKind::List);

        let list = a.as_sequence().unwrap();
        write_lock!(list).push(Value::I4(1));

        assert_eq!(a.container_len(), Some(1));
        assert_eq!(b.container_len(), Some(0));
    }

    #[test]
    fn test_clone_shares_container() {
        let a = Value::empty_container(ContainerKind::Array);
        let b = a.clone();

        write_lock!(a.as_sequence().unwrap()).push(Value::Bool(true));
        assert_eq!(b.container_len(), Some(1));
    }

    #[test]
    fn test_equality_by_content() {
        assert_eq!(Value::I4(7), Value::I4(7));
        assert_ne!(Value::I4(7), Value::I8(7));
        assert_eq!(
            Value::String("a\"b\\c".to_string()),
            Value::String("a\"b\\c".to_string())
        );
        assert_ne!(Value::Null, Value::I4(0));
    }

    #[test]
    fn test_object_equality_is_identity() {
        let a = Arc::new(ObjectInstance::new(TypeToken::new(0x02000001)));
        let b = Arc::new(ObjectInstance::new(TypeToken::new(0x02000001)));
        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
    }

    #[test]
    fn test_object_members() {
        let instance = ObjectInstance::new(TypeToken::new(0x02000001));
        instance.set("Name", Value::String("x".to_string()));
        assert!(instance.has("Name"));
        assert_eq!(instance.get("Name"), Some(Value::String("x".to_string())));
        assert_eq!(instance.get("Missing"), None);
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Value::U1(200).as_i32(), Some(200));
        assert_eq!(Value::I8(i64::MAX).as_i32(), None);
        assert_eq!(Value::I4(-5).as_i64(), Some(-5));
        assert_eq!(Value::R4(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::String("x".to_string()).as_str(), Some("x"));
    }
}
