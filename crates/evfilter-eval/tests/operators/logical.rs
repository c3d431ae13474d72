//! Logical Operator Tests
//!
//! Tests for: And, Or, Not, IsNull, IsNotNull
//! Connectives short-circuit left to right

use evfilter_eval::{
    EvalError, EvalResult, EvaluationContext, ExprEvaluator, ExprEvaluatorContext,
    FunctionRegistry,
};
use evfilter_expr::ExprNode;
use evfilter_types::Value;
use pretty_assertions::assert_eq;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

/// Context whose `boom()` function always fails, to prove operands were skipped
fn context() -> ExprEvaluatorContext {
    let mut functions = FunctionRegistry::standard();
    functions.register("boom", |_: &[Value]| {
        Err(EvalError::function_failed("boom", "evaluated"))
    });
    ExprEvaluatorContext::builder()
        .functions(Arc::new(functions))
        .build()
}

fn eval(node: &ExprNode) -> EvalResult<Value> {
    let context = context();
    let ctx = EvaluationContext::new(&context, &[]);
    ExprEvaluator::new().evaluate(node, &ctx)
}

fn t() -> ExprNode {
    ExprNode::literal(true)
}

fn f() -> ExprNode {
    ExprNode::literal(false)
}

fn null() -> ExprNode {
    ExprNode::null()
}

fn boom() -> ExprNode {
    ExprNode::Function {
        name: "boom".to_string(),
        args: vec![],
    }
}

// ============================================================================
// And Tests
// ============================================================================

#[test]
fn test_and_all_true() {
    assert_eq!(eval(&ExprNode::and([t(), t(), t()])), Ok(Value::Boolean(true)));
}

#[test]
fn test_and_false_wins() {
    assert_eq!(eval(&ExprNode::and([t(), f()])), Ok(Value::Boolean(false)));
}

#[test]
fn test_and_true_null_is_null() {
    assert_eq!(eval(&ExprNode::and([t(), null()])), Ok(Value::Null));
}

#[test]
fn test_and_stops_at_false() {
    assert_eq!(eval(&ExprNode::and([f(), boom()])), Ok(Value::Boolean(false)));
}

#[test]
fn test_and_stops_at_null() {
    assert_eq!(eval(&ExprNode::and([null(), boom()])), Ok(Value::Null));
}

#[test]
fn test_and_evaluates_past_true() {
    let err = eval(&ExprNode::and([t(), boom()])).unwrap_err();
    assert_eq!(err, EvalError::function_failed("boom", "evaluated"));
}

#[test]
fn test_and_rejects_non_boolean() {
    let err = eval(&ExprNode::and([t(), ExprNode::literal(1)])).unwrap_err();
    assert_eq!(err, EvalError::type_mismatch("Boolean", "Integer"));
}

// ============================================================================
// Or Tests
// ============================================================================

#[test]
fn test_or_stops_at_true() {
    assert_eq!(eval(&ExprNode::or([f(), t(), boom()])), Ok(Value::Boolean(true)));
}

#[test]
fn test_or_all_false() {
    assert_eq!(eval(&ExprNode::or([f(), f()])), Ok(Value::Boolean(false)));
}

#[test]
fn test_or_null_then_true() {
    assert_eq!(eval(&ExprNode::or([null(), t()])), Ok(Value::Boolean(true)));
}

#[test]
fn test_or_false_null_is_null() {
    assert_eq!(eval(&ExprNode::or([f(), null()])), Ok(Value::Null));
}

// ============================================================================
// Not / IsNull Tests
// ============================================================================

#[test]
fn test_not() {
    assert_eq!(eval(&ExprNode::not(t())), Ok(Value::Boolean(false)));
    assert_eq!(eval(&ExprNode::not(null())), Ok(Value::Null));
}

#[test]
fn test_is_null_never_null() {
    assert_eq!(eval(&ExprNode::is_null(null())), Ok(Value::Boolean(true)));
    assert_eq!(eval(&ExprNode::is_null(t())), Ok(Value::Boolean(false)));
    assert_eq!(eval(&ExprNode::is_not_null(null())), Ok(Value::Boolean(false)));
    assert_eq!(
        eval(&ExprNode::is_not_null(ExprNode::literal("x"))),
        Ok(Value::Boolean(true))
    );
}
