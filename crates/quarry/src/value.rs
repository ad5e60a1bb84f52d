//! Runtime value types produced by attribute resolution.
//!
//! The [`Value`] enum is what an [`Attributes`](crate::Attributes)
//! implementation hands back for a field or accessor. The evaluator and
//! the ordering engine match on it exhaustively; every type without
//! dedicated semantics collapses into [`Value::Other`].

use std::borrow::Cow;
use std::cmp::Ordering;

/// Runtime value of an attribute, borrowed from the target where possible.
///
/// # Example
///
/// ```
/// use quarry::{Attributes, IntoValue, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Attributes for Task {
///     fn target_name(&self) -> &'static str {
///         "Task"
///     }
///
///     fn field(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "name" => Some(self.name.as_str().into_value()),
///             "priority" => Some(self.priority.into_value()),
///             _ => None,
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Signed or unsigned integer of a fixed width.
    Integer(Integer),
    /// 32- or 64-bit float.
    Float(Float),
    /// Boolean value.
    Bool(bool),
    /// String value (borrowed or computed).
    Text(Cow<'a, str>),
    /// Timestamp value (milliseconds since Unix epoch). Orderable, but has
    /// no literal syntax in conditions.
    Timestamp(Timestamp),
    /// A value of a type quarry has no semantics for, carrying its type name.
    Other(&'static str),
}

impl<'a> Value<'a> {
    /// Returns the type this value was produced from.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(n) => n.value_type(),
            Value::Float(x) => x.value_type(),
            Value::Bool(_) => ValueType::Bool,
            Value::Text(_) => ValueType::Text,
            Value::Timestamp(_) => ValueType::Timestamp,
            Value::Other(name) => ValueType::Other(name),
        }
    }

    /// An opaque value naming the type `T` of the referenced value.
    pub fn opaque<T: ?Sized>(_value: &T) -> Value<'static> {
        Value::Other(std::any::type_name::<T>())
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the integer value, if present.
    pub fn as_integer(&self) -> Option<Integer> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the float value, if present.
    pub fn as_float(&self) -> Option<Float> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n.value()),
            Value::Float(Float::F32(x)) => write!(f, "{x}"),
            Value::Float(Float::F64(x)) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Timestamp(t) => write!(f, "{}ms", t.as_millis()),
            Value::Other(name) => write!(f, "<{name}>"),
        }
    }
}

/// Integer value that remembers the width it was read from.
///
/// The width bounds the literals a condition may compare it against:
/// `byte_field>300` is an invalid literal for an `i8`, not a silent `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Integer {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl Integer {
    /// Widens the value for comparison.
    pub fn value(self) -> i128 {
        match self {
            Integer::I8(n) => n as i128,
            Integer::I16(n) => n as i128,
            Integer::I32(n) => n as i128,
            Integer::I64(n) => n as i128,
            Integer::U8(n) => n as i128,
            Integer::U16(n) => n as i128,
            Integer::U32(n) => n as i128,
            Integer::U64(n) => n as i128,
        }
    }

    /// The declared type of this integer.
    pub fn value_type(self) -> ValueType {
        match self {
            Integer::I8(_) => ValueType::I8,
            Integer::I16(_) => ValueType::I16,
            Integer::I32(_) => ValueType::I32,
            Integer::I64(_) => ValueType::I64,
            Integer::U8(_) => ValueType::U8,
            Integer::U16(_) => ValueType::U16,
            Integer::U32(_) => ValueType::U32,
            Integer::U64(_) => ValueType::U64,
        }
    }

    /// Inclusive range representable at this integer's width.
    pub fn bounds(self) -> (i128, i128) {
        match self {
            Integer::I8(_) => (i8::MIN as i128, i8::MAX as i128),
            Integer::I16(_) => (i16::MIN as i128, i16::MAX as i128),
            Integer::I32(_) => (i32::MIN as i128, i32::MAX as i128),
            Integer::I64(_) => (i64::MIN as i128, i64::MAX as i128),
            Integer::U8(_) => (0, u8::MAX as i128),
            Integer::U16(_) => (0, u16::MAX as i128),
            Integer::U32(_) => (0, u32::MAX as i128),
            Integer::U64(_) => (0, u64::MAX as i128),
        }
    }

    /// Returns `true` if `n` is representable at this integer's width.
    pub fn fits(self, n: i128) -> bool {
        let (min, max) = self.bounds();
        (min..=max).contains(&n)
    }
}

macro_rules! integer_from {
    ($($ty:ty => $variant:ident as $cast:ty),* $(,)?) => {
        $(
            impl From<$ty> for Integer {
                fn from(n: $ty) -> Self {
                    Integer::$variant(n as $cast)
                }
            }
        )*
    };
}

integer_from! {
    i8 => I8 as i8,
    i16 => I16 as i16,
    i32 => I32 as i32,
    i64 => I64 as i64,
    isize => I64 as i64,
    u8 => U8 as u8,
    u16 => U16 as u16,
    u32 => U32 as u32,
    u64 => U64 as u64,
    usize => U64 as u64,
}

/// Floating point value that remembers its width.
///
/// Literals are parsed at the value's width so `f32` fields compare equal
/// to the literal that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Float {
    F32(f32),
    F64(f64),
}

impl Float {
    /// Converts the value to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Float::F32(x) => x as f64,
            Float::F64(x) => x,
        }
    }

    /// The declared type of this float.
    pub fn value_type(self) -> ValueType {
        match self {
            Float::F32(_) => ValueType::F32,
            Float::F64(_) => ValueType::F64,
        }
    }

    /// Total order used when sorting: `-0.0 < 0.0` and NaN sorts last.
    pub fn total_cmp(self, other: Float) -> Ordering {
        self.to_f64().total_cmp(&other.to_f64())
    }
}

impl From<f32> for Float {
    fn from(x: f32) -> Self {
        Float::F32(x)
    }
}

impl From<f64> for Float {
    fn from(x: f64) -> Self {
        Float::F64(x)
    }
}

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// Timestamps take part in orderings but not in conditions. Users can
/// convert from their preferred datetime type.
///
/// ```
/// use quarry::Timestamp;
///
/// assert!(Timestamp(1000) < Timestamp(2000));
/// assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs * 1000)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch.
    pub fn as_secs(self) -> i64 {
        self.0 / 1000
    }
}

/// Declared type of an attribute, available without an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Text,
    Timestamp,
    /// Any other type, by name.
    Other(&'static str),
}

impl ValueType {
    /// Returns `true` if conditions can compare values of this type.
    pub fn supports_conditions(self) -> bool {
        !matches!(self, ValueType::Timestamp | ValueType::Other(_))
    }

    /// Returns `true` if values of this type have a natural ordering.
    pub fn is_orderable(self) -> bool {
        !matches!(self, ValueType::Other(_))
    }

    /// Returns the display name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::I8 => "i8",
            ValueType::I16 => "i16",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::U8 => "u8",
            ValueType::U16 => "u16",
            ValueType::U32 => "u32",
            ValueType::U64 => "u64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::Bool => "bool",
            ValueType::Text => "string",
            ValueType::Timestamp => "timestamp",
            ValueType::Other(name) => name,
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion into a [`Value`], used by hand-written and derived
/// [`Attributes`](crate::Attributes) implementations.
///
/// Implemented for the supported scalar types both by value (accessor
/// return values) and by reference (stored fields).
pub trait IntoValue<'a> {
    fn into_value(self) -> Value<'a>;
}

/// Type-level counterpart of [`IntoValue`], used by
/// [`Describe`](crate::Describe) implementations.
pub trait Typed {
    fn value_type() -> ValueType;
}

macro_rules! scalar_values {
    ($($ty:ty => $variant:ident($wrap:expr), $value_type:expr;)*) => {
        $(
            impl<'a> IntoValue<'a> for $ty {
                fn into_value(self) -> Value<'a> {
                    Value::$variant($wrap(self))
                }
            }

            impl<'a> IntoValue<'a> for &'a $ty {
                fn into_value(self) -> Value<'a> {
                    Value::$variant($wrap(*self))
                }
            }

            impl Typed for $ty {
                fn value_type() -> ValueType {
                    $value_type
                }
            }
        )*
    };
}

scalar_values! {
    i8 => Integer(Integer::from), ValueType::I8;
    i16 => Integer(Integer::from), ValueType::I16;
    i32 => Integer(Integer::from), ValueType::I32;
    i64 => Integer(Integer::from), ValueType::I64;
    isize => Integer(Integer::from), ValueType::I64;
    u8 => Integer(Integer::from), ValueType::U8;
    u16 => Integer(Integer::from), ValueType::U16;
    u32 => Integer(Integer::from), ValueType::U32;
    u64 => Integer(Integer::from), ValueType::U64;
    usize => Integer(Integer::from), ValueType::U64;
    f32 => Float(Float::from), ValueType::F32;
    f64 => Float(Float::from), ValueType::F64;
    bool => Bool(std::convert::identity), ValueType::Bool;
    Timestamp => Timestamp(std::convert::identity), ValueType::Timestamp;
}

impl<'a> IntoValue<'a> for &'a str {
    fn into_value(self) -> Value<'a> {
        Value::Text(Cow::Borrowed(self))
    }
}

impl<'a, 'b: 'a> IntoValue<'a> for &'a &'b str {
    fn into_value(self) -> Value<'a> {
        Value::Text(Cow::Borrowed(*self))
    }
}

impl<'a> IntoValue<'a> for String {
    fn into_value(self) -> Value<'a> {
        Value::Text(Cow::Owned(self))
    }
}

impl<'a> IntoValue<'a> for &'a String {
    fn into_value(self) -> Value<'a> {
        Value::Text(Cow::Borrowed(self.as_str()))
    }
}

impl<'a> IntoValue<'a> for Cow<'a, str> {
    fn into_value(self) -> Value<'a> {
        Value::Text(self)
    }
}

impl<'a, 'b: 'a> IntoValue<'a> for &'a Cow<'b, str> {
    fn into_value(self) -> Value<'a> {
        Value::Text(Cow::Borrowed(self.as_ref()))
    }
}

impl<'a> IntoValue<'a> for Value<'a> {
    fn into_value(self) -> Value<'a> {
        self
    }
}

impl Typed for str {
    fn value_type() -> ValueType {
        ValueType::Text
    }
}

impl Typed for String {
    fn value_type() -> ValueType {
        ValueType::Text
    }
}

impl Typed for Cow<'_, str> {
    fn value_type() -> ValueType {
        ValueType::Text
    }
}

impl<T: Typed + ?Sized> Typed for &T {
    fn value_type() -> ValueType {
        T::value_type()
    }
}
