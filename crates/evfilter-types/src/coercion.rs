//! Numeric promotion rules
//!
//! Binary numeric operators promote both operands to the widest kind among them:
//! - Integer -> Long
//! - Long -> Double
//! - Double -> Decimal
//!
//! The same widening is applied when a value is written to a typed variable.

use crate::{Value, ValueType};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Numeric kinds ordered from narrowest to widest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericKind {
    Integer,
    Long,
    Double,
    Decimal,
}

/// A numeric operand after promotion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Integer(i32),
    Long(i64),
    Double(f64),
    Decimal(Decimal),
}

impl Numeric {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(Self::Integer(*i)),
            Value::Long(l) => Some(Self::Long(*l)),
            Value::Double(d) => Some(Self::Double(*d)),
            Value::Decimal(d) => Some(Self::Decimal(*d)),
            _ => None,
        }
    }

    pub fn kind(&self) -> NumericKind {
        match self {
            Self::Integer(_) => NumericKind::Integer,
            Self::Long(_) => NumericKind::Long,
            Self::Double(_) => NumericKind::Double,
            Self::Decimal(_) => NumericKind::Decimal,
        }
    }

    /// Widen to `kind`; `None` when narrowing or when a double has no decimal form
    pub fn promote(self, kind: NumericKind) -> Option<Self> {
        if kind < self.kind() {
            return None;
        }
        let promoted = match (self, kind) {
            (n, k) if n.kind() == k => n,
            (Self::Integer(i), NumericKind::Long) => Self::Long(i as i64),
            (Self::Integer(i), NumericKind::Double) => Self::Double(i as f64),
            (Self::Integer(i), NumericKind::Decimal) => Self::Decimal(Decimal::from(i)),
            (Self::Long(l), NumericKind::Double) => Self::Double(l as f64),
            (Self::Long(l), NumericKind::Decimal) => Self::Decimal(Decimal::from(l)),
            (Self::Double(d), NumericKind::Decimal) => Self::Decimal(Decimal::from_f64(d)?),
            _ => return None,
        };
        Some(promoted)
    }

    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Long(l) => Some(*l as f64),
            Self::Double(d) => Some(*d),
            Self::Decimal(d) => d.to_f64(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Integer(i) => Value::Integer(i),
            Self::Long(l) => Value::Long(l),
            Self::Double(d) => Value::Double(d),
            Self::Decimal(d) => Value::Decimal(d),
        }
    }
}

/// Promote two numeric values to their widest kind.
///
/// A double with no decimal form (NaN, infinities, magnitudes past the decimal range)
/// meets a decimal as a pair of doubles. Returns `None` when either value is not numeric.
pub fn promote_pair(left: &Value, right: &Value) -> Option<(Numeric, Numeric)> {
    let left = Numeric::from_value(left)?;
    let right = Numeric::from_value(right)?;
    let kind = left.kind().max(right.kind());
    match (left.promote(kind), right.promote(kind)) {
        (Some(l), Some(r)) => Some((l, r)),
        _ => Some((Numeric::Double(left.to_f64()?), Numeric::Double(right.to_f64()?))),
    }
}

impl ValueType {
    fn numeric_kind(&self) -> Option<NumericKind> {
        match self {
            Self::Integer => Some(NumericKind::Integer),
            Self::Long => Some(NumericKind::Long),
            Self::Double => Some(NumericKind::Double),
            Self::Decimal => Some(NumericKind::Decimal),
            _ => None,
        }
    }

    /// Check if a value of `from` may be assigned to this type
    pub fn can_assign(&self, from: ValueType) -> bool {
        if *self == from || *self == ValueType::Any {
            return true;
        }
        match (from.numeric_kind(), self.numeric_kind()) {
            (Some(from), Some(to)) => from < to,
            _ => false,
        }
    }

    /// Coerce a value for assignment to this type; null is always assignable
    pub fn coerce(&self, value: Value) -> Option<Value> {
        let Some(from) = value.value_type() else {
            return Some(Value::Null);
        };
        if !self.can_assign(from) {
            return None;
        }
        match (self.numeric_kind(), Numeric::from_value(&value)) {
            (Some(kind), Some(numeric)) => numeric.promote(kind).map(Numeric::into_value),
            _ => Some(value),
        }
    }
}
