//! Filter adapter
//!
//! Binds one compiled predicate to its filter parameter identity and evaluates it per
//! arriving event. When the tree reads variables the adapter takes exactly one version
//! pin per evaluation, before anything is evaluated; all variable reads of that pass go
//! through the pin.
//!
//! Faults are never caught here. They leave the adapter tagged with the
//! `(filterSpecId, paramPathNum)` identity so the statement-management layer can
//! deactivate the owning statement.

use crate::context::{EvaluationContext, ExprEvaluatorContext};
use crate::engine::ExprEvaluator;
use crate::error::{EvalError, EvalResult, FilterFault};
use crate::variables::{VariableStore, VersionPin};
use evfilter_diagnostics::{DiagnosticsConfig, FilterParamId};
use evfilter_expr::ExprNode;
use evfilter_types::{EventBean, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Log target of audit records
pub const AUDIT_TARGET: &str = "evfilter::audit";

/// Snapshot of an adapter's profiling counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationProfile {
    pub evaluations: u64,
    pub matches: u64,
    pub faults: u64,
    pub total_nanos: u64,
}

impl EvaluationProfile {
    /// Mean evaluation time, `None` before the first evaluation
    pub fn mean_nanos(&self) -> Option<u64> {
        self.total_nanos.checked_div(self.evaluations)
    }
}

#[derive(Debug, Default)]
struct ProfileCounters {
    evaluations: AtomicU64,
    matches: AtomicU64,
    faults: AtomicU64,
    total_nanos: AtomicU64,
}

impl ProfileCounters {
    fn snapshot(&self) -> EvaluationProfile {
        EvaluationProfile {
            evaluations: self.evaluations.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            total_nanos: self.total_nanos.load(Ordering::Relaxed),
        }
    }
}

/// A compiled predicate bound to one filter parameter.
pub struct ExprNodeAdapter {
    id: FilterParamId,
    node: Arc<ExprNode>,
    context: Arc<ExprEvaluatorContext>,
    variables: Option<Arc<VariableStore>>,
    diagnostics: DiagnosticsConfig,
    uses_variables: bool,
    evaluator: ExprEvaluator,
    profile: ProfileCounters,
}

impl fmt::Debug for ExprNodeAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprNodeAdapter")
            .field("id", &self.id)
            .field("node", &self.node.to_string())
            .field("uses_variables", &self.uses_variables)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

impl ExprNodeAdapter {
    /// Bind a tree to a filter parameter.
    ///
    /// Fails when the tree reads variables but no store is supplied, reads a variable
    /// the store never declared, or calls a function missing from the registry.
    pub fn new(
        id: FilterParamId,
        node: Arc<ExprNode>,
        context: Arc<ExprEvaluatorContext>,
        variables: Option<Arc<VariableStore>>,
        diagnostics: DiagnosticsConfig,
    ) -> Result<Self, FilterFault> {
        validate(&node, &context, variables.as_deref()).map_err(|e| FilterFault::new(id, e))?;
        let uses_variables = node.references_variables();
        Ok(Self {
            id,
            node,
            context,
            variables: if uses_variables { variables } else { None },
            diagnostics,
            uses_variables,
            evaluator: ExprEvaluator::new(),
            profile: ProfileCounters::default(),
        })
    }

    pub fn id(&self) -> FilterParamId {
        self.id
    }

    pub fn node(&self) -> &ExprNode {
        &self.node
    }

    pub fn uses_variables(&self) -> bool {
        self.uses_variables
    }

    pub fn diagnostics(&self) -> DiagnosticsConfig {
        self.diagnostics
    }

    /// Match one event
    pub fn evaluate(&self, event: &dyn EventBean) -> Result<bool, FilterFault> {
        self.evaluate_per_stream(&[event])
    }

    /// Match a row of per-stream events, taking a fresh pin when variables are read
    pub fn evaluate_per_stream(&self, events: &[&dyn EventBean]) -> Result<bool, FilterFault> {
        let pin = self.take_pin();
        self.matches(events, pin)
    }

    /// Match a row under a pin the caller took for the whole event.
    ///
    /// Lets several filter parameters of one event share a single snapshot. The pin is
    /// ignored when the tree reads no variables.
    pub fn evaluate_pinned(
        &self,
        events: &[&dyn EventBean],
        pin: VersionPin,
    ) -> Result<bool, FilterFault> {
        self.matches(events, Some(pin))
    }

    /// Evaluate the tree to a typed value, for projections
    pub fn evaluate_value(&self, events: &[&dyn EventBean]) -> Result<Value, FilterFault> {
        let pin = self.take_pin();
        self.run(events, pin, |evaluator, node, ctx| evaluator.evaluate(node, ctx))
    }

    /// Evaluate the tree to a typed value under the event's pin
    pub fn evaluate_value_pinned(
        &self,
        events: &[&dyn EventBean],
        pin: VersionPin,
    ) -> Result<Value, FilterFault> {
        self.run(events, Some(pin), |evaluator, node, ctx| evaluator.evaluate(node, ctx))
    }

    /// Profiling counters, `None` when profiling is disabled
    pub fn profile(&self) -> Option<EvaluationProfile> {
        self.diagnostics
            .profiling_enabled
            .then(|| self.profile.snapshot())
    }

    fn matches(
        &self,
        events: &[&dyn EventBean],
        pin: Option<VersionPin>,
    ) -> Result<bool, FilterFault> {
        let matched = self.run(events, pin, |evaluator, node, ctx| {
            evaluator.evaluate_boolean(node, ctx)
        })?;
        if matched && self.diagnostics.profiling_enabled {
            self.profile.matches.fetch_add(1, Ordering::Relaxed);
        }
        Ok(matched)
    }

    fn take_pin(&self) -> Option<VersionPin> {
        self.variables.as_ref().map(|store| store.set_local_version())
    }

    fn run<T, F>(
        &self,
        events: &[&dyn EventBean],
        pin: Option<VersionPin>,
        eval: F,
    ) -> Result<T, FilterFault>
    where
        T: fmt::Debug,
        F: FnOnce(&ExprEvaluator, &ExprNode, &EvaluationContext<'_>) -> EvalResult<T>,
    {
        let started = self.diagnostics.profiling_enabled.then(Instant::now);

        let mut ctx = EvaluationContext::new(&self.context, events);
        if let (Some(store), Some(pin)) = (self.variables.as_deref(), pin) {
            ctx = ctx.with_variables(store, pin);
        }
        let result = eval(&self.evaluator, &self.node, &ctx);

        if let Some(started) = started {
            let nanos = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
            self.profile.evaluations.fetch_add(1, Ordering::Relaxed);
            self.profile.total_nanos.fetch_add(nanos, Ordering::Relaxed);
            if result.is_err() {
                self.profile.faults.fetch_add(1, Ordering::Relaxed);
            }
        }
        if self.diagnostics.audit_enabled {
            log::info!(
                target: AUDIT_TARGET,
                "filter {} [{}] pin={:?} result={:?}",
                self.id,
                self.node,
                pin.map(|p| p.version()),
                result
            );
        }

        result.map_err(|source| {
            log::debug!("Filter {} raised {}", self.id, source);
            FilterFault::new(self.id, source)
        })
    }
}

fn validate(
    node: &ExprNode,
    context: &ExprEvaluatorContext,
    variables: Option<&VariableStore>,
) -> EvalResult<()> {
    if node.references_variables() {
        let store = variables.ok_or_else(|| EvalError::missing_capability("variable store"))?;
        if let Some(name) = node.variable_names().into_iter().find(|n| !store.contains(n)) {
            return Err(EvalError::unknown_variable(name));
        }
    }
    let mut functions = Vec::new();
    node.walk(&mut |n| {
        if let ExprNode::Function { name, .. } = n {
            functions.push(name.as_str());
        }
    });
    match functions
        .into_iter()
        .find(|name| !context.functions().contains(name))
    {
        Some(name) => Err(EvalError::undefined_function(name)),
        None => Ok(()),
    }
}
