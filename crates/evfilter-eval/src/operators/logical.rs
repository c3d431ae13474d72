//! Logical operators
//!
//! Implements: And, Or, Not, IsNull with three-valued logic. Connectives evaluate their
//! operands left to right and stop as soon as the result is decided.

use crate::context::EvaluationContext;
use crate::engine::ExprEvaluator;
use crate::error::{EvalError, EvalResult};
use evfilter_expr::ExprNode;
use evfilter_types::Value;

impl ExprEvaluator {
    /// Evaluate And, stopping at the first false or null operand
    ///
    /// | A     | B     | A and B |
    /// |-------|-------|---------|
    /// | true  | true  | true    |
    /// | true  | false | false   |
    /// | true  | null  | null    |
    /// | false | any   | false   |
    /// | null  | any   | null    |
    pub fn eval_and(&self, operands: &[ExprNode], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        for operand in operands {
            match self.evaluate(operand, ctx)? {
                Value::Boolean(true) => {}
                value @ (Value::Boolean(false) | Value::Null) => return Ok(value),
                other => return Err(EvalError::type_mismatch("Boolean", other.type_name())),
            }
        }
        Ok(Value::Boolean(true))
    }

    /// Evaluate Or, stopping at the first true operand
    ///
    /// | A     | B     | A or B |
    /// |-------|-------|--------|
    /// | true  | any   | true   |
    /// | false | true  | true   |
    /// | false | false | false  |
    /// | false | null  | null   |
    /// | null  | true  | true   |
    /// | null  | false | null   |
    /// | null  | null  | null   |
    pub fn eval_or(&self, operands: &[ExprNode], ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        let mut saw_null = false;
        for operand in operands {
            match self.evaluate(operand, ctx)? {
                Value::Boolean(true) => return Ok(Value::Boolean(true)),
                Value::Boolean(false) => {}
                Value::Null => saw_null = true,
                other => return Err(EvalError::type_mismatch("Boolean", other.type_name())),
            }
        }
        Ok(if saw_null {
            Value::Null
        } else {
            Value::Boolean(false)
        })
    }

    pub fn eval_not(&self, operand: &ExprNode, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        match self.evaluate(operand, ctx)? {
            Value::Null => Ok(Value::Null),
            Value::Boolean(b) => Ok(Value::Boolean(!b)),
            other => Err(EvalError::type_mismatch("Boolean", other.type_name())),
        }
    }

    /// IsNull / IsNotNull never yield null
    pub fn eval_is_null(
        &self,
        operand: &ExprNode,
        negated: bool,
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let value = self.evaluate(operand, ctx)?;
        Ok(Value::Boolean(value.is_null() != negated))
    }
}
