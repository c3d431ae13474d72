//! Comparison Operator Tests
//!
//! Tests for: Equal, NotEqual, Less, LessOrEqual, Greater, GreaterOrEqual
//! Numeric operands are promoted to the widest kind among them

use chrono::{FixedOffset, Offset, Utc};
use evfilter_eval::{EvalResult, EvaluationContext, ExprEvaluator, ExprEvaluatorContext};
use evfilter_expr::{CompareOp, ExprNode};
use evfilter_types::{DateRepr, DateTimeValue, Value, parse_local};
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

fn cmp(op: CompareOp, left: impl Into<Value>, right: impl Into<Value>) -> EvalResult<Value> {
    eval(&ExprNode::compare(
        op,
        ExprNode::literal(left),
        ExprNode::literal(right),
    ))
}

fn datetime(text: &str, repr: DateRepr, offset: FixedOffset) -> Value {
    DateTimeValue::coerce(parse_local(text).unwrap(), repr, offset).unwrap()
}

// ============================================================================
// Numeric Promotion
// ============================================================================

#[rstest]
#[case(CompareOp::Equal, Value::Integer(2), Value::Long(2), true)]
#[case(CompareOp::Equal, Value::Long(2), Value::Double(2.0), true)]
#[case(CompareOp::NotEqual, Value::Integer(2), Value::Double(2.5), true)]
#[case(CompareOp::Less, Value::Integer(2), Value::Double(2.5), true)]
#[case(CompareOp::LessOrEqual, Value::Long(3), Value::Integer(3), true)]
#[case(CompareOp::Greater, Value::Decimal(Decimal::new(25, 1)), Value::Integer(2), true)]
#[case(CompareOp::GreaterOrEqual, Value::Integer(1), Value::Long(2), false)]
fn test_numeric_comparisons(
    #[case] op: CompareOp,
    #[case] left: Value,
    #[case] right: Value,
    #[case] expected: bool,
) {
    assert_eq!(cmp(op, left, right), Ok(Value::Boolean(expected)));
}

#[test]
fn test_nan_is_unordered() {
    assert_eq!(cmp(CompareOp::Less, f64::NAN, 1.0), Ok(Value::Null));
}

#[rstest]
#[case(CompareOp::Less, f64::NAN, Value::Null)]
#[case(CompareOp::Equal, f64::NAN, Value::Null)]
#[case(CompareOp::Greater, f64::INFINITY, Value::Boolean(true))]
#[case(CompareOp::Less, f64::NEG_INFINITY, Value::Boolean(true))]
#[case(CompareOp::Greater, 1e30, Value::Boolean(true))]
fn test_double_outside_decimal_range(
    #[case] op: CompareOp,
    #[case] left: f64,
    #[case] expected: Value,
) {
    assert_eq!(cmp(op, left, Value::Decimal(Decimal::ONE)), Ok(expected));
}

// ============================================================================
// Null Propagation
// ============================================================================

#[rstest]
#[case(CompareOp::Equal)]
#[case(CompareOp::NotEqual)]
#[case(CompareOp::Less)]
#[case(CompareOp::GreaterOrEqual)]
fn test_null_operand_yields_null(#[case] op: CompareOp) {
    assert_eq!(cmp(op, Value::Null, 1), Ok(Value::Null));
    assert_eq!(cmp(op, "a", Value::Null), Ok(Value::Null));
}

// ============================================================================
// Other Types
// ============================================================================

#[test]
fn test_strings_and_booleans() {
    assert_eq!(cmp(CompareOp::Equal, "IBM", "IBM"), Ok(Value::Boolean(true)));
    assert_eq!(cmp(CompareOp::Less, "a", "b"), Ok(Value::Boolean(true)));
    assert_eq!(cmp(CompareOp::NotEqual, true, false), Ok(Value::Boolean(true)));
}

#[test]
fn test_incompatible_types_fault() {
    let err = cmp(CompareOp::Equal, "1", 1).unwrap_err();
    assert_eq!(err.kind(), evfilter_diagnostics::FaultKind::TypeCoercion);
}

#[test]
fn test_instants_compare_across_representations() {
    let utc = Utc.fix();
    let date = datetime("2002-05-30T09:00:00", DateRepr::Date, utc);
    let zoned = datetime(
        "2002-05-30T11:00:00",
        DateRepr::Zoned,
        FixedOffset::east_opt(2 * 3600).unwrap(),
    );
    assert_eq!(cmp(CompareOp::Equal, date.clone(), zoned), Ok(Value::Boolean(true)));

    let millis = datetime("2002-05-30T09:00:01", DateRepr::EpochMillis, utc);
    assert_eq!(cmp(CompareOp::Greater, millis, date), Ok(Value::Boolean(true)));
}

#[test]
fn test_local_only_compares_with_local() {
    let utc = Utc.fix();
    let local = datetime("2002-05-30T09:00:00", DateRepr::Local, utc);
    let later = datetime("2002-05-30T10:00:00", DateRepr::Local, utc);
    assert_eq!(cmp(CompareOp::Less, local.clone(), later), Ok(Value::Boolean(true)));

    let zoned = datetime("2002-05-30T09:00:00", DateRepr::Zoned, utc);
    assert!(cmp(CompareOp::Equal, local, zoned).is_err());
}
