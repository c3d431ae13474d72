//! DateTime Operator Tests
//!
//! Tests for: plus, minus, time-period literals
//! Field rollover, offset preservation and duration operand kinds

use chrono::{FixedOffset, Offset, Utc};
use evfilter_diagnostics::FaultKind;
use evfilter_eval::{EvalResult, EvaluationContext, ExprEvaluator, ExprEvaluatorContext};
use evfilter_expr::ExprNode;
use evfilter_types::{DateRepr, DateTimeValue, TimePeriod, TimeUnit, Value, parse_local};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ============================================================================
// Test Helpers
// ============================================================================

fn eval(node: &ExprNode) -> EvalResult<Value> {
    let context = ExprEvaluatorContext::default();
    let ctx = EvaluationContext::new(&context, &[]);
    ExprEvaluator::new().evaluate(node, &ctx)
}

fn value(text: &str, repr: DateRepr) -> Value {
    DateTimeValue::coerce(parse_local(text).unwrap(), repr, Utc.fix()).unwrap()
}

fn plus(receiver: Value, parts: &[(i64, TimeUnit)]) -> EvalResult<Value> {
    eval(&ExprNode::plus(
        ExprNode::literal(receiver),
        ExprNode::period_literal(parts),
    ))
}

fn minus(receiver: Value, parts: &[(i64, TimeUnit)]) -> EvalResult<Value> {
    eval(&ExprNode::minus(
        ExprNode::literal(receiver),
        ExprNode::period_literal(parts),
    ))
}

// ============================================================================
// Rollover
// ============================================================================

#[rstest]
#[case(DateRepr::EpochMillis)]
#[case(DateRepr::Date)]
#[case(DateRepr::Calendar)]
#[case(DateRepr::Zoned)]
#[case(DateRepr::Local)]
fn test_year_rollover(#[case] repr: DateRepr) {
    let receiver = value("2002-12-31T23:59:59.999", repr);
    assert_eq!(
        plus(receiver, &[(1, TimeUnit::Millisecond)]),
        Ok(value("2003-01-01T00:00:00.000", repr))
    );
}

#[rstest]
#[case(DateRepr::EpochMillis)]
#[case(DateRepr::Calendar)]
#[case(DateRepr::Local)]
fn test_month_and_year_units(#[case] repr: DateRepr) {
    let receiver = value("2002-05-30T09:00:00", repr);
    assert_eq!(
        plus(receiver.clone(), &[(1, TimeUnit::Year), (2, TimeUnit::Month)]),
        Ok(value("2003-07-30T09:00:00", repr))
    );
    assert_eq!(
        minus(receiver, &[(3, TimeUnit::Month)]),
        Ok(value("2002-02-28T09:00:00", repr))
    );
}

#[rstest]
#[case(DateRepr::EpochMillis)]
#[case(DateRepr::Date)]
#[case(DateRepr::Calendar)]
#[case(DateRepr::Zoned)]
#[case(DateRepr::Local)]
fn test_minus_applies_months_before_days(#[case] repr: DateRepr) {
    let receiver = value("2002-03-01T00:00:00", repr);
    let expected = Ok(value("2002-01-31T00:00:00", repr));
    assert_eq!(
        minus(receiver.clone(), &[(1, TimeUnit::Month), (1, TimeUnit::Day)]),
        expected
    );
    let stepwise = minus(receiver, &[(1, TimeUnit::Month)])
        .and_then(|first| minus(first, &[(1, TimeUnit::Day)]));
    assert_eq!(stepwise, expected);
}

#[test]
fn test_leap_day() {
    let receiver = value("2004-02-28T12:00:00", DateRepr::Local);
    assert_eq!(
        plus(receiver, &[(1, TimeUnit::Day)]),
        Ok(value("2004-02-29T12:00:00", DateRepr::Local))
    );
}

#[test]
fn test_calendar_keeps_its_offset() {
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let receiver =
        DateTimeValue::coerce(parse_local("2002-05-30T20:00:00").unwrap(), DateRepr::Calendar, tokyo)
            .unwrap();
    let expected =
        DateTimeValue::coerce(parse_local("2002-05-31T02:00:00").unwrap(), DateRepr::Calendar, tokyo)
            .unwrap();
    assert_eq!(plus(receiver, &[(6, TimeUnit::Hour)]), Ok(expected));
}

// ============================================================================
// Durations
// ============================================================================

#[test]
fn test_time_period_literal_value() {
    let period = eval(&ExprNode::period_literal(&[
        (1, TimeUnit::Week),
        (3, TimeUnit::Minute),
    ]));
    assert_eq!(
        period,
        Ok(Value::Duration(TimePeriod {
            months: 0,
            days: 7,
            millis: 180_000
        }))
    );
}

#[test]
fn test_null_count_yields_null() {
    let tree = ExprNode::plus(
        ExprNode::literal(0i64),
        ExprNode::time_period([
            (ExprNode::literal(1), TimeUnit::Hour),
            (ExprNode::null(), TimeUnit::Second),
        ]),
    );
    assert_eq!(eval(&tree), Ok(Value::Null));
}

#[test]
fn test_fractional_count() {
    let tree = ExprNode::time_period([(ExprNode::literal(1.5), TimeUnit::Second)]);
    assert_eq!(eval(&tree), Ok(Value::Duration(TimePeriod::from_millis(1_500))));
}

#[test]
fn test_integer_duration_is_milliseconds() {
    let tree = ExprNode::minus(ExprNode::literal(10_000i64), ExprNode::literal(1_000));
    assert_eq!(eval(&tree), Ok(Value::Long(9_000)));
}

#[test]
fn test_null_duration_yields_null() {
    let tree = ExprNode::plus(ExprNode::literal(10_000i64), ExprNode::null());
    assert_eq!(eval(&tree), Ok(Value::Null));
}

// ============================================================================
// Faults
// ============================================================================

#[test]
fn test_string_receiver_is_a_fault() {
    let err = plus(Value::from("2002-05-30"), &[(1, TimeUnit::Day)]).unwrap_err();
    assert_eq!(err.kind(), FaultKind::TypeCoercion);
}

#[test]
fn test_out_of_range_is_a_fault() {
    let err = plus(Value::Long(i64::MAX), &[(1, TimeUnit::Millisecond)]).unwrap_err();
    assert_eq!(err.kind(), FaultKind::InvalidDateTime);
}

#[test]
fn test_boolean_duration_is_a_fault() {
    let tree = ExprNode::plus(ExprNode::literal(0i64), ExprNode::literal(true));
    assert_eq!(eval(&tree).unwrap_err().kind(), FaultKind::TypeCoercion);
}
