//! Property values stored on nodes and relationships
//!
//! The engine stores values untyped. Callers that expect a particular shape
//! decode through [`FromPropertyValue`], which fails with a [`DecodeError`]
//! instead of casting blindly.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Tagged property value
///
/// Supports:
/// - String
/// - Integer (i64)
/// - Float (f64)
/// - Boolean
/// - DateTime (Unix milliseconds)
/// - Array (Vec<PropertyValue>)
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(i64),
    Array(Vec<PropertyValue>),
    Null,
}

impl PropertyValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            PropertyValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Boolean(_) => "Boolean",
            PropertyValue::DateTime(_) => "DateTime",
            PropertyValue::Array(_) => "Array",
            PropertyValue::Null => "Null",
        }
    }

    /// Decode into the caller's expected type
    pub fn decode<T: FromPropertyValue>(self) -> Result<T, DecodeError> {
        let found = self.type_name();
        T::from_property_value(self).ok_or(DecodeError {
            expected: T::TYPE_NAME,
            found,
        })
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::DateTime(dt) => write!(f, "DateTime({})", dt),
            PropertyValue::Array(arr) => {
                write!(f, "[")?;
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            PropertyValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(arr: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(arr)
    }
}

/// Point in time as Unix milliseconds, stored as [`PropertyValue::DateTime`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl From<Timestamp> for PropertyValue {
    fn from(ts: Timestamp) -> Self {
        PropertyValue::DateTime(ts.0)
    }
}

/// Hashable form of a [`PropertyValue`], used to index unique values
///
/// Floats compare by bit pattern with `-0.0` folded into `0.0`, so two NaNs
/// with the same bits count as equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey {
    String(String),
    Integer(i64),
    Float(u64),
    Boolean(bool),
    DateTime(i64),
    Array(Vec<ValueKey>),
    Null,
}

impl From<&PropertyValue> for ValueKey {
    fn from(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::String(s) => ValueKey::String(s.clone()),
            PropertyValue::Integer(i) => ValueKey::Integer(*i),
            PropertyValue::Float(f) if *f == 0.0 => ValueKey::Float(0.0f64.to_bits()),
            PropertyValue::Float(f) => ValueKey::Float(f.to_bits()),
            PropertyValue::Boolean(b) => ValueKey::Boolean(*b),
            PropertyValue::DateTime(dt) => ValueKey::DateTime(*dt),
            PropertyValue::Array(arr) => ValueKey::Array(arr.iter().map(ValueKey::from).collect()),
            PropertyValue::Null => ValueKey::Null,
        }
    }
}

/// Stored value does not have the shape the reader asked for
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected}, found {found}")]
pub struct DecodeError {
    pub expected: &'static str,
    pub found: &'static str,
}

/// Types a [`PropertyValue`] can be decoded into
pub trait FromPropertyValue: Sized {
    /// Name reported in decode errors
    const TYPE_NAME: &'static str;

    /// `None` when the value has another shape
    fn from_property_value(value: PropertyValue) -> Option<Self>;
}

impl FromPropertyValue for PropertyValue {
    const TYPE_NAME: &'static str = "Any";

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        Some(value)
    }
}

impl FromPropertyValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromPropertyValue for i64 {
    const TYPE_NAME: &'static str = "Integer";

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        value.as_integer()
    }
}

impl FromPropertyValue for i32 {
    const TYPE_NAME: &'static str = "Integer(i32)";

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        value.as_integer().and_then(|i| i32::try_from(i).ok())
    }
}

impl FromPropertyValue for f64 {
    const TYPE_NAME: &'static str = "Float";

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromPropertyValue for bool {
    const TYPE_NAME: &'static str = "Boolean";

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        value.as_boolean()
    }
}

impl FromPropertyValue for Timestamp {
    const TYPE_NAME: &'static str = "DateTime";

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        value.as_datetime().map(Timestamp)
    }
}

impl FromPropertyValue for Vec<PropertyValue> {
    const TYPE_NAME: &'static str = "Array";

    fn from_property_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

/// Property map for storing node and edge properties
pub type PropertyMap = HashMap<String, PropertyValue>;
