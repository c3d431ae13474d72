//! Arithmetic operators
//!
//! Implements: Add, Subtract, Multiply, Divide, Modulo.
//! - Operands are promoted to their widest numeric kind
//! - Integer and long overflow is a fault, never a wrap-around
//! - Division of integer kinds yields a double
//! - Division or modulo by zero yields null

use crate::context::EvaluationContext;
use crate::engine::ExprEvaluator;
use crate::error::{EvalError, EvalResult};
use evfilter_expr::{ArithOp, ExprNode};
use evfilter_types::{Numeric, NumericKind, Value, promote_pair};
use rust_decimal::Decimal;

impl ExprEvaluator {
    pub fn eval_arithmetic(
        &self,
        op: ArithOp,
        left: &ExprNode,
        right: &ExprNode,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let left = self.evaluate(left, ctx)?;
        let right = self.evaluate(right, ctx)?;
        arithmetic(op, &left, &right)
    }
}

/// Apply an arithmetic operator to two evaluated operands
pub fn arithmetic(op: ArithOp, left: &Value, right: &Value) -> EvalResult<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    let (mut l, mut r) = promote_pair(left, right)
        .ok_or_else(|| EvalError::type_coercion(op.symbol(), left.type_name(), right.type_name()))?;

    if op == ArithOp::Divide && l.kind() < NumericKind::Double {
        // Both operands share a kind, so promotion cannot fail here
        l = l.promote(NumericKind::Double).unwrap_or(l);
        r = r.promote(NumericKind::Double).unwrap_or(r);
    }

    let overflow = || EvalError::overflow(format!("{} {} {}", left, op.symbol(), right));
    let result = match (l, r) {
        (Numeric::Integer(a), Numeric::Integer(b)) => {
            integer_op(op, a, b).map(|v| v.map(Value::Integer)).ok_or_else(overflow)?
        }
        (Numeric::Long(a), Numeric::Long(b)) => {
            long_op(op, a, b).map(|v| v.map(Value::Long)).ok_or_else(overflow)?
        }
        (Numeric::Double(a), Numeric::Double(b)) => double_op(op, a, b).map(Value::Double),
        (Numeric::Decimal(a), Numeric::Decimal(b)) => {
            decimal_op(op, a, b).map(|v| v.map(Value::Decimal)).ok_or_else(overflow)?
        }
        _ => return Err(EvalError::internal("numeric promotion produced mixed kinds")),
    };
    Ok(result.unwrap_or(Value::Null))
}

// Each helper returns `None` on overflow and `Some(None)` for a null result.

fn integer_op(op: ArithOp, a: i32, b: i32) -> Option<Option<i32>> {
    match op {
        ArithOp::Add => a.checked_add(b).map(Some),
        ArithOp::Subtract => a.checked_sub(b).map(Some),
        ArithOp::Multiply => a.checked_mul(b).map(Some),
        ArithOp::Divide | ArithOp::Modulo if b == 0 => Some(None),
        ArithOp::Divide => a.checked_div(b).map(Some),
        ArithOp::Modulo => a.checked_rem(b).map(Some),
    }
}

fn long_op(op: ArithOp, a: i64, b: i64) -> Option<Option<i64>> {
    match op {
        ArithOp::Add => a.checked_add(b).map(Some),
        ArithOp::Subtract => a.checked_sub(b).map(Some),
        ArithOp::Multiply => a.checked_mul(b).map(Some),
        ArithOp::Divide | ArithOp::Modulo if b == 0 => Some(None),
        ArithOp::Divide => a.checked_div(b).map(Some),
        ArithOp::Modulo => a.checked_rem(b).map(Some),
    }
}

fn double_op(op: ArithOp, a: f64, b: f64) -> Option<f64> {
    match op {
        ArithOp::Add => Some(a + b),
        ArithOp::Subtract => Some(a - b),
        ArithOp::Multiply => Some(a * b),
        ArithOp::Divide | ArithOp::Modulo if b == 0.0 => None,
        ArithOp::Divide => Some(a / b),
        ArithOp::Modulo => Some(a % b),
    }
}

fn decimal_op(op: ArithOp, a: Decimal, b: Decimal) -> Option<Option<Decimal>> {
    match op {
        ArithOp::Add => a.checked_add(b).map(Some),
        ArithOp::Subtract => a.checked_sub(b).map(Some),
        ArithOp::Multiply => a.checked_mul(b).map(Some),
        ArithOp::Divide | ArithOp::Modulo if b.is_zero() => Some(None),
        ArithOp::Divide => a.checked_div(b).map(Some),
        ArithOp::Modulo => a.checked_rem(b).map(Some),
    }
}
