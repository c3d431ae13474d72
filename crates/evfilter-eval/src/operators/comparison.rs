//! Comparison operators
//!
//! Implements: Equal, NotEqual, Less, LessOrEqual, Greater, GreaterOrEqual.
//! Numeric operands are promoted to their widest kind before comparing. A null operand
//! yields null.

use crate::context::EvaluationContext;
use crate::engine::ExprEvaluator;
use crate::error::{EvalError, EvalResult};
use evfilter_expr::{CompareOp, ExprNode};
use evfilter_types::{DateTimeValue, Numeric, Value, promote_pair};
use std::cmp::Ordering;

impl ExprEvaluator {
    pub fn eval_compare(
        &self,
        op: CompareOp,
        left: &ExprNode,
        right: &ExprNode,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let left = self.evaluate(left, ctx)?;
        let right = self.evaluate(right, ctx)?;
        compare(op, &left, &right)
    }
}

/// Apply a comparison operator to two evaluated operands
pub fn compare(op: CompareOp, left: &Value, right: &Value) -> EvalResult<Value> {
    let result = match op {
        CompareOp::Equal => values_equal(left, right)?,
        CompareOp::NotEqual => values_equal(left, right)?.map(|eq| !eq),
        _ => ordering_of(op, left, right)?.map(|ordering| match op {
            CompareOp::Less => ordering == Ordering::Less,
            CompareOp::LessOrEqual => ordering != Ordering::Greater,
            CompareOp::Greater => ordering == Ordering::Greater,
            _ => ordering != Ordering::Less,
        }),
    };
    Ok(result.map_or(Value::Null, Value::Boolean))
}

/// Equality of two values; `None` when either is null
pub fn values_equal(left: &Value, right: &Value) -> EvalResult<Option<bool>> {
    match (left, right) {
        (Value::Duration(a), Value::Duration(b)) => Ok(Some(a == b)),
        _ => Ok(ordering_of(CompareOp::Equal, left, right)?
            .map(|ordering| ordering == Ordering::Equal)),
    }
}

/// Order two values; `None` when either is null or the pair is unordered (NaN)
pub fn compare_values(left: &Value, right: &Value) -> EvalResult<Option<Ordering>> {
    ordering_of(CompareOp::Less, left, right)
}

fn ordering_of(op: CompareOp, left: &Value, right: &Value) -> EvalResult<Option<Ordering>> {
    if left.is_null() || right.is_null() {
        return Ok(None);
    }
    if let Some(pair) = promote_pair(left, right) {
        return Ok(compare_numeric(pair));
    }
    let ordering = match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => a.compare(b),
        (Value::Long(millis), Value::DateTime(dt)) => instant_millis(dt).map(|b| millis.cmp(&b)),
        (Value::DateTime(dt), Value::Long(millis)) => instant_millis(dt).map(|a| a.cmp(millis)),
        _ => None,
    };
    ordering
        .map(Some)
        .ok_or_else(|| EvalError::type_coercion(op.symbol(), left.type_name(), right.type_name()))
}

fn compare_numeric(pair: (Numeric, Numeric)) -> Option<Ordering> {
    match pair {
        (Numeric::Integer(a), Numeric::Integer(b)) => Some(a.cmp(&b)),
        (Numeric::Long(a), Numeric::Long(b)) => Some(a.cmp(&b)),
        (Numeric::Double(a), Numeric::Double(b)) => a.partial_cmp(&b),
        (Numeric::Decimal(a), Numeric::Decimal(b)) => Some(a.cmp(&b)),
        _ => None,
    }
}

/// Epoch millis of instant-based representations; local values carry no instant
fn instant_millis(value: &DateTimeValue) -> Option<i64> {
    match value {
        DateTimeValue::Date(dt) => Some(dt.timestamp_millis()),
        DateTimeValue::Calendar(cal) => Some(cal.time_in_millis()),
        DateTimeValue::Zoned(dt) => Some(dt.timestamp_millis()),
        DateTimeValue::Local(_) => None,
    }
}
