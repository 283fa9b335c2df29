//! Dynamic values carried by ad-hoc members and property accessors.
//!
//! A [`Value`] is what flows through `get`/`set` on a mixin. A [`ValueKind`]
//! is the declared type of a backing-object property; values are coerced to
//! it on write-through. [`PropertyValue`] maps concrete Rust field types onto
//! kinds so that accessors can be generated for plain structs.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

use crate::core::coerce::coerce;
use crate::core::error::CoercionError;

/// An exact decimal number kept in its canonical text form (e.g. `-12.50`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(pub(crate) String);

impl Decimal {
    /// Parses `[-+]digits[.digits]`. Exponents are not accepted.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (sign, unsigned) = match text.as_bytes().first()? {
            b'-' => ("-", &text[1..]),
            b'+' => ("", &text[1..]),
            _ => ("", text),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(int_part) || frac_part.is_some_and(|f| !digits(f)) {
            return None;
        }
        Some(Decimal(format!("{sign}{unsigned}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.bytes().all(|b| matches!(b, b'0' | b'.' | b'-'))
    }

    /// Integer part and whether the fractional digits are all zero
    pub(crate) fn split_integral(&self) -> (&str, bool) {
        match self.0.split_once('.') {
            Some((int_part, frac)) => (int_part, frac.bytes().all(|b| b == b'0')),
            None => (&self.0, true),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dynamically typed member value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    DateTime(DateTime<Utc>),
    Uuid(Uuid),
    /// Variant name of an enumeration
    Enum(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Scalar-like values are exported as a single named element
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the kind name of this value.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::UInt(_) => "UInt",
            Value::Float(_) => "Float",
            Value::Decimal(_) => "Decimal",
            Value::Text(_) => "Text",
            Value::DateTime(_) => "DateTime",
            Value::Uuid(_) => "Uuid",
            Value::Enum(_) => "Enum",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
        }
    }

    /// True when the value can be stored in a property of `kind` without conversion
    pub fn conforms_to(&self, kind: &ValueKind) -> bool {
        match (self, kind) {
            (_, ValueKind::Any) => true,
            (Value::Bool(_), ValueKind::Bool)
            | (Value::Int(_), ValueKind::Int)
            | (Value::UInt(_), ValueKind::UInt)
            | (Value::Float(_), ValueKind::Float)
            | (Value::Decimal(_), ValueKind::Decimal)
            | (Value::Text(_), ValueKind::Text)
            | (Value::DateTime(_), ValueKind::DateTime)
            | (Value::Uuid(_), ValueKind::Uuid)
            | (Value::List(_), ValueKind::List)
            | (Value::Map(_), ValueKind::Map) => true,
            (Value::Enum(variant), ValueKind::Enum(variants)) => {
                variants.is_empty() || variants.contains(&variant.as_str())
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Uuid(id) => write!(f, "{}", id.hyphenated()),
            Value::Enum(variant) => f.write_str(variant),
            Value::List(_) | Value::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            scalar => serializer.serialize_str(&scalar.to_string()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(value: IndexMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::Text(s),
            toml::Value::Integer(i) => Value::Int(i),
            toml::Value::Float(x) => Value::Float(x),
            toml::Value::Boolean(b) => Value::Bool(b),
            // Local dates and times carry no offset; keep them as text
            toml::Value::Datetime(dt) => {
                let text = dt.to_string();
                DateTime::parse_from_rfc3339(&text)
                    .map(|parsed| Value::DateTime(parsed.with_timezone(&Utc)))
                    .unwrap_or(Value::Text(text))
            }
            toml::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            toml::Value::Table(table) => Value::Map(
                table
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Declared type of a backing-object property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    UInt,
    Float,
    Decimal,
    Text,
    DateTime,
    Uuid,
    /// Enumeration with the listed variant names (empty means any name)
    Enum(&'static [&'static str]),
    List,
    Map,
    /// Accepts every value unchanged
    Any,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => write!(f, "Bool"),
            ValueKind::Int => write!(f, "Int"),
            ValueKind::UInt => write!(f, "UInt"),
            ValueKind::Float => write!(f, "Float"),
            ValueKind::Decimal => write!(f, "Decimal"),
            ValueKind::Text => write!(f, "Text"),
            ValueKind::DateTime => write!(f, "DateTime"),
            ValueKind::Uuid => write!(f, "Uuid"),
            ValueKind::Enum(variants) if variants.is_empty() => write!(f, "Enum"),
            ValueKind::Enum(variants) => write!(f, "Enum({})", variants.join("|")),
            ValueKind::List => write!(f, "List"),
            ValueKind::Map => write!(f, "Map"),
            ValueKind::Any => write!(f, "Any"),
        }
    }
}

/// Conversion between a concrete field type and [`Value`]
///
/// `from_value` accepts any value that coerces to [`Self::KIND`] and then
/// narrows it to the field type, failing when it does not fit.
pub trait PropertyValue: Sized {
    const KIND: ValueKind;
    const NULLABLE: bool = false;

    fn into_value(self) -> Value;

    fn from_value(value: Value) -> Result<Self, CoercionError>;
}

fn unexpected(value: &Value, kind: &ValueKind) -> CoercionError {
    CoercionError::new(value.kind_name(), kind, "unexpected value after conversion")
}

macro_rules! signed_property_value {
    ($($ty:ty),*) => {$(
        impl PropertyValue for $ty {
            const KIND: ValueKind = ValueKind::Int;

            fn into_value(self) -> Value {
                Value::Int(i64::from(self))
            }

            fn from_value(value: Value) -> Result<Self, CoercionError> {
                match coerce(value, &ValueKind::Int)? {
                    Value::Int(i) => <$ty>::try_from(i).map_err(|_| {
                        CoercionError::new(
                            "Int",
                            &ValueKind::Int,
                            format!("{i} is out of range for {}", stringify!($ty)),
                        )
                    }),
                    other => Err(unexpected(&other, &ValueKind::Int)),
                }
            }
        }
    )*};
}

macro_rules! unsigned_property_value {
    ($($ty:ty),*) => {$(
        impl PropertyValue for $ty {
            const KIND: ValueKind = ValueKind::UInt;

            fn into_value(self) -> Value {
                Value::UInt(u64::from(self))
            }

            fn from_value(value: Value) -> Result<Self, CoercionError> {
                match coerce(value, &ValueKind::UInt)? {
                    Value::UInt(u) => <$ty>::try_from(u).map_err(|_| {
                        CoercionError::new(
                            "UInt",
                            &ValueKind::UInt,
                            format!("{u} is out of range for {}", stringify!($ty)),
                        )
                    }),
                    other => Err(unexpected(&other, &ValueKind::UInt)),
                }
            }
        }
    )*};
}

signed_property_value!(i8, i16, i32, i64);
unsigned_property_value!(u8, u16, u32, u64);

impl PropertyValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &ValueKind::Float)? {
            Value::Float(x) => Ok(x),
            other => Err(unexpected(&other, &ValueKind::Float)),
        }
    }
}

impl PropertyValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        let x = f64::from_value(value)?;
        if x.is_finite() && x.abs() > f64::from(f32::MAX) {
            return Err(CoercionError::new(
                "Float",
                &ValueKind::Float,
                format!("{x} is out of range for f32"),
            ));
        }
        Ok(x as f32)
    }
}

impl PropertyValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &ValueKind::Bool)? {
            Value::Bool(b) => Ok(b),
            other => Err(unexpected(&other, &ValueKind::Bool)),
        }
    }
}

impl PropertyValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &ValueKind::Text)? {
            Value::Text(s) => Ok(s),
            other => Err(unexpected(&other, &ValueKind::Text)),
        }
    }
}

impl PropertyValue for Decimal {
    const KIND: ValueKind = ValueKind::Decimal;

    fn into_value(self) -> Value {
        Value::Decimal(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &ValueKind::Decimal)? {
            Value::Decimal(d) => Ok(d),
            other => Err(unexpected(&other, &ValueKind::Decimal)),
        }
    }
}

impl PropertyValue for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::DateTime;

    fn into_value(self) -> Value {
        Value::DateTime(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &ValueKind::DateTime)? {
            Value::DateTime(dt) => Ok(dt),
            other => Err(unexpected(&other, &ValueKind::DateTime)),
        }
    }
}

impl PropertyValue for Uuid {
    const KIND: ValueKind = ValueKind::Uuid;

    fn into_value(self) -> Value {
        Value::Uuid(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &ValueKind::Uuid)? {
            Value::Uuid(id) => Ok(id),
            other => Err(unexpected(&other, &ValueKind::Uuid)),
        }
    }
}

impl PropertyValue for Vec<Value> {
    const KIND: ValueKind = ValueKind::List;

    fn into_value(self) -> Value {
        Value::List(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &ValueKind::List)? {
            Value::List(items) => Ok(items),
            other => Err(unexpected(&other, &ValueKind::List)),
        }
    }
}

impl PropertyValue for IndexMap<String, Value> {
    const KIND: ValueKind = ValueKind::Map;

    fn into_value(self) -> Value {
        Value::Map(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &ValueKind::Map)? {
            Value::Map(entries) => Ok(entries),
            other => Err(unexpected(&other, &ValueKind::Map)),
        }
    }
}

impl PropertyValue for Value {
    const KIND: ValueKind = ValueKind::Any;
    const NULLABLE: bool = true;

    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        Ok(value)
    }
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    const KIND: ValueKind = T::KIND;
    const NULLABLE: bool = true;

    fn into_value(self) -> Value {
        self.map_or(Value::Null, T::into_value)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}
