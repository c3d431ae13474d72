//! Expression tree evaluator
//!
//! This module provides the `ExprEvaluator`, which evaluates compiled expression trees
//! depth-first, left to right, against one evaluation pass.

use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use evfilter_expr::ExprNode;
use evfilter_types::Value;

/// The expression tree evaluator
///
/// The evaluator is stateless; everything a pass may read comes through the
/// `EvaluationContext`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprEvaluator;

impl ExprEvaluator {
    pub const fn new() -> Self {
        Self
    }

    /// Main evaluation dispatcher
    pub fn evaluate(&self, node: &ExprNode, ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
        match node {
            // === Operands ===
            ExprNode::Literal { value } => Ok(value.clone()),
            ExprNode::Property { stream, name } => ctx.read_property(*stream, name),
            ExprNode::Variable { name } => ctx.read_variable(name),
            ExprNode::CurrentTimestamp => Ok(Value::Long(ctx.evaluator().clock().now())),

            // === Operators ===
            ExprNode::Compare { op, left, right } => self.eval_compare(*op, left, right, ctx),
            ExprNode::Arithmetic { op, left, right } => {
                self.eval_arithmetic(*op, left, right, ctx)
            }
            ExprNode::And { operands } => self.eval_and(operands, ctx),
            ExprNode::Or { operands } => self.eval_or(operands, ctx),
            ExprNode::Not { operand } => self.eval_not(operand, ctx),
            ExprNode::IsNull { operand, negated } => self.eval_is_null(operand, *negated, ctx),
            ExprNode::Function { name, args } => self.eval_function(name, args, ctx),

            // === Date-time ===
            ExprNode::TimePeriod { parts } => self.eval_time_period(parts, ctx),
            ExprNode::DateTimeMethod {
                method,
                receiver,
                duration,
            } => self.eval_datetime_method(*method, receiver, duration, ctx),
        }
    }

    /// Evaluate a predicate; null means no match
    pub fn evaluate_boolean(&self, node: &ExprNode, ctx: &EvaluationContext<'_>) -> EvalResult<bool> {
        match self.evaluate(node, ctx)? {
            Value::Boolean(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(EvalError::type_mismatch("Boolean", other.type_name())),
        }
    }

    fn eval_function(
        &self,
        name: &str,
        args: &[ExprNode],
        ctx: &EvaluationContext<'_>,
    ) -> EvalResult<Value> {
        let functions = ctx.evaluator().functions();
        let function = functions
            .get(name)
            .ok_or_else(|| EvalError::undefined_function(name))?;
        let args = args
            .iter()
            .map(|arg| self.evaluate(arg, ctx))
            .collect::<EvalResult<Vec<_>>>()?;
        function(&args)
    }
}
