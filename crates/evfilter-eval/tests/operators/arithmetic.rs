//! Arithmetic Operator Tests
//!
//! Tests for: Add, Subtract, Multiply, Divide, Modulo
//! Checked integer arithmetic; division by zero yields null

use evfilter_diagnostics::FaultKind;
use evfilter_eval::{EvalResult, EvaluationContext, ExprEvaluator, ExprEvaluatorContext};
use evfilter_expr::{ArithOp, ExprNode};
use evfilter_types::Value;
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;

// ============================================================================
// Test Helpers
// ============================================================================

fn eval(node: &ExprNode) -> EvalResult<Value> {
    let context = ExprEvaluatorContext::default();
    let ctx = EvaluationContext::new(&context, &[]);
    ExprEvaluator::new().evaluate(node, &ctx)
}

fn arith(op: ArithOp, left: impl Into<Value>, right: impl Into<Value>) -> EvalResult<Value> {
    eval(&ExprNode::arithmetic(
        op,
        ExprNode::literal(left),
        ExprNode::literal(right),
    ))
}

// ============================================================================
// Promotion
// ============================================================================

#[rstest]
#[case(ArithOp::Add, Value::Integer(1), Value::Integer(2), Value::Integer(3))]
#[case(ArithOp::Add, Value::Integer(1), Value::Long(2), Value::Long(3))]
#[case(ArithOp::Subtract, Value::Long(5), Value::Double(0.5), Value::Double(4.5))]
#[case(ArithOp::Multiply, Value::Integer(3), Value::Decimal(Decimal::new(15, 1)), Value::Decimal(Decimal::new(45, 1)))]
#[case(ArithOp::Divide, Value::Long(9), Value::Long(3), Value::Double(3.0))]
#[case(ArithOp::Modulo, Value::Integer(9), Value::Integer(4), Value::Integer(1))]
fn test_widest_type_result(
    #[case] op: ArithOp,
    #[case] left: Value,
    #[case] right: Value,
    #[case] expected: Value,
) {
    assert_eq!(arith(op, left, right), Ok(expected));
}

#[test]
fn test_non_finite_double_with_decimal() {
    match arith(ArithOp::Add, f64::NAN, Value::Decimal(Decimal::ONE)) {
        Ok(Value::Double(sum)) => assert!(sum.is_nan()),
        other => panic!("expected a NaN double, got {other:?}"),
    }
    assert_eq!(
        arith(ArithOp::Multiply, Value::Decimal(Decimal::TWO), f64::INFINITY),
        Ok(Value::Double(f64::INFINITY))
    );
}

// ============================================================================
// Nulls and Zero Divisors
// ============================================================================

#[rstest]
#[case(ArithOp::Add)]
#[case(ArithOp::Subtract)]
#[case(ArithOp::Multiply)]
#[case(ArithOp::Divide)]
#[case(ArithOp::Modulo)]
fn test_null_operand_yields_null(#[case] op: ArithOp) {
    assert_eq!(arith(op, Value::Null, 1), Ok(Value::Null));
    assert_eq!(arith(op, 1i64, Value::Null), Ok(Value::Null));
}

#[test]
fn test_division_by_zero_is_null() {
    assert_eq!(arith(ArithOp::Divide, 1, 0), Ok(Value::Null));
    assert_eq!(arith(ArithOp::Divide, 1.0, 0.0), Ok(Value::Null));
    assert_eq!(arith(ArithOp::Modulo, 5i64, 0i64), Ok(Value::Null));
}

// ============================================================================
// Faults
// ============================================================================

#[test]
fn test_overflow_is_a_fault() {
    let err = arith(ArithOp::Add, i64::MAX, 1i64).unwrap_err();
    assert_eq!(err.kind(), FaultKind::Overflow);
    let err = arith(ArithOp::Multiply, i32::MAX, 2).unwrap_err();
    assert_eq!(err.kind(), FaultKind::Overflow);
}

#[test]
fn test_non_numeric_operand_is_a_coercion_fault() {
    let err = arith(ArithOp::Add, "a", 1).unwrap_err();
    assert_eq!(err.kind(), FaultKind::TypeCoercion);
}
