//! Evaluation contexts
//!
//! `ExprEvaluatorContext` is built once per statement and carries the long-lived
//! capabilities: the logical clock, the function registry and the engine time zone.
//! `EvaluationContext` lives for one evaluation pass and binds the row of events, the
//! variable store and the version pin taken for that pass.

use crate::clock::LogicalClock;
use crate::error::{EvalError, EvalResult};
use crate::registry::FunctionRegistry;
use crate::variables::{VariableStore, VersionPin};
use chrono::{FixedOffset, Offset, Utc};
use evfilter_types::{EventBean, Value};
use std::sync::Arc;

/// Statement-level evaluation capabilities
#[derive(Debug, Clone)]
pub struct ExprEvaluatorContext {
    clock: Arc<LogicalClock>,
    functions: Arc<FunctionRegistry>,
    time_zone: FixedOffset,
}

impl Default for ExprEvaluatorContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ExprEvaluatorContext {
    pub fn builder() -> ExprEvaluatorContextBuilder {
        ExprEvaluatorContextBuilder::default()
    }

    pub fn clock(&self) -> &LogicalClock {
        &self.clock
    }

    pub fn shared_clock(&self) -> Arc<LogicalClock> {
        Arc::clone(&self.clock)
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Zone used for epoch conversions of calendar fields
    pub fn time_zone(&self) -> FixedOffset {
        self.time_zone
    }
}

/// Builder for `ExprEvaluatorContext`
#[derive(Debug, Default)]
pub struct ExprEvaluatorContextBuilder {
    clock: Option<Arc<LogicalClock>>,
    functions: Option<Arc<FunctionRegistry>>,
    time_zone: Option<FixedOffset>,
}

impl ExprEvaluatorContextBuilder {
    /// Share an engine clock; defaults to a fresh clock at time zero
    pub fn clock(mut self, clock: Arc<LogicalClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the function registry; defaults to the standard functions
    pub fn functions(mut self, functions: Arc<FunctionRegistry>) -> Self {
        self.functions = Some(functions);
        self
    }

    /// Set the engine time zone; defaults to UTC
    pub fn time_zone(mut self, time_zone: FixedOffset) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    pub fn build(self) -> ExprEvaluatorContext {
        ExprEvaluatorContext {
            clock: self.clock.unwrap_or_default(),
            functions: self
                .functions
                .unwrap_or_else(|| Arc::new(FunctionRegistry::standard())),
            time_zone: self.time_zone.unwrap_or_else(|| Utc.fix()),
        }
    }
}

/// State of one evaluation pass
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    evaluator: &'a ExprEvaluatorContext,
    variables: Option<(&'a VariableStore, VersionPin)>,
    events: &'a [&'a dyn EventBean],
}

impl<'a> EvaluationContext<'a> {
    /// Context without variable access
    pub fn new(evaluator: &'a ExprEvaluatorContext, events: &'a [&'a dyn EventBean]) -> Self {
        Self {
            evaluator,
            variables: None,
            events,
        }
    }

    /// Bind a variable store and the pin taken for this pass
    pub fn with_variables(mut self, variables: &'a VariableStore, pin: VersionPin) -> Self {
        self.variables = Some((variables, pin));
        self
    }

    pub fn evaluator(&self) -> &'a ExprEvaluatorContext {
        self.evaluator
    }

    pub fn events(&self) -> &'a [&'a dyn EventBean] {
        self.events
    }

    pub fn pin(&self) -> Option<VersionPin> {
        self.variables.map(|(_, pin)| pin)
    }

    /// Read a variable through the pin of this pass
    pub fn read_variable(&self, name: &str) -> EvalResult<Value> {
        match self.variables {
            Some((store, pin)) => store.read(name, pin),
            None => Err(EvalError::unknown_variable(name)),
        }
    }

    /// Read a property from the event of `stream`
    pub fn read_property(&self, stream: usize, name: &str) -> EvalResult<Value> {
        let event = self
            .events
            .get(stream)
            .ok_or(EvalError::StreamOutOfRange {
                stream,
                streams: self.events.len(),
            })?;
        event
            .get(name)
            .ok_or_else(|| EvalError::unknown_property(name, event.event_type()))
    }
}
