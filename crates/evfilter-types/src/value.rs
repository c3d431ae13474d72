//! Runtime values - the variant result of every evaluation
//!
//! Epoch-millisecond timestamps are carried as `Value::Long`, the same way event
//! producers and the logical clock hand them in. The remaining date representations
//! live in [`DateTimeValue`].

use crate::{DateRepr, DateTimeValue, TimePeriod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The primary value type for evaluation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// Null value (missing/unknown)
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer, also the epoch-millisecond representation
    Long(i64),
    /// Double-precision float
    Double(f64),
    /// Arbitrary precision decimal
    Decimal(Decimal),
    /// String value
    String(String),
    /// Calendar, zoned, local or boxed-date value
    DateTime(DateTimeValue),
    /// Evaluated time period
    Duration(TimePeriod),
}

impl Value {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if value is boolean true
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Boolean(true))
    }

    /// Name of the runtime type, used in fault messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Long(_) => "Long",
            Self::Double(_) => "Double",
            Self::Decimal(_) => "Decimal",
            Self::String(_) => "String",
            Self::DateTime(dt) => dt.repr().name(),
            Self::Duration(_) => "Duration",
        }
    }

    /// The declared type this value belongs to, `None` for null
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(ValueType::Boolean),
            Self::Integer(_) => Some(ValueType::Integer),
            Self::Long(_) => Some(ValueType::Long),
            Self::Double(_) => Some(ValueType::Double),
            Self::Decimal(_) => Some(ValueType::Decimal),
            Self::String(_) => Some(ValueType::String),
            Self::DateTime(_) => Some(ValueType::DateTime),
            Self::Duration(_) => Some(ValueType::Duration),
        }
    }

    /// The date representation this value carries, if it can receive `plus`/`minus`
    pub fn date_repr(&self) -> Option<DateRepr> {
        match self {
            Self::Long(_) => Some(DateRepr::EpochMillis),
            Self::DateTime(dt) => Some(dt.repr()),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i as i64),
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTimeValue> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Long(l) => write!(f, "{}L", l),
            Self::Double(d) => write!(f, "{:?}", d),
            Self::Decimal(d) => write!(f, "{}", d),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Self::DateTime(dt) => write!(f, "{}", dt),
            Self::Duration(p) => write!(f, "{}", p),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTimeValue> for Value {
    fn from(value: DateTimeValue) -> Self {
        Self::DateTime(value)
    }
}

impl From<TimePeriod> for Value {
    fn from(value: TimePeriod) -> Self {
        Self::Duration(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Declared type of a variable or an expected operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// Accepts any value
    Any,
    Boolean,
    Integer,
    Long,
    Double,
    Decimal,
    String,
    DateTime,
    Duration,
}

impl ValueType {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Duration => "Duration",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "Null");
        assert_eq!(Value::Long(1).type_name(), "Long");
        assert_eq!(Value::from("x").type_name(), "String");
    }

    #[test]
    fn test_date_repr_of_long() {
        assert_eq!(Value::Long(0).date_repr(), Some(DateRepr::EpochMillis));
        assert_eq!(Value::Integer(0).date_repr(), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(5i64)), Value::Long(5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Long(1000).to_string(), "1000L");
        assert_eq!(Value::Double(1.0).to_string(), "1.0");
        assert_eq!(Value::string("it's").to_string(), "'it\\'s'");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&Value::Long(1000)).unwrap();
        assert_eq!(json, r#"{"type":"Long","value":1000}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Long(1000));
        let null: Value = serde_json::from_str(r#"{"type":"Null"}"#).unwrap();
        assert!(null.is_null());
    }
}
