//! Variable-aware filter predicate evaluation for complex event processing
//!
//! This crate bundles the evfilter engine core:
//! - Runtime values, date representations and time periods
//! - Compiled expression trees
//! - A logical clock and a versioned variable store
//! - Predicate evaluation with three-valued logic and date-time arithmetic
//! - Filter adapters binding trees to filter parameters
//!
//! # Example
//!
//! ```
//! use evfilter::{DiagnosticsConfig, ExprEvaluatorContext, ExprNode, ExprNodeAdapter};
//! use evfilter::{FilterParamId, MapEvent};
//! use std::sync::Arc;
//!
//! let tree = ExprNode::equal(ExprNode::property("symbol"), ExprNode::literal("IBM"));
//! let adapter = ExprNodeAdapter::new(
//!     FilterParamId::new(1, 0),
//!     Arc::new(tree),
//!     Arc::new(ExprEvaluatorContext::default()),
//!     None,
//!     DiagnosticsConfig::disabled(),
//! )
//! .unwrap();
//!
//! assert!(adapter.evaluate(&MapEvent::new("Tick").with("symbol", "IBM")).unwrap());
//! ```

// Re-export all public APIs from internal crates
pub use evfilter_diagnostics as diagnostics;
pub use evfilter_eval as eval;
pub use evfilter_expr as expr;
pub use evfilter_types as types;

// Convenience re-exports
pub use evfilter_diagnostics::{DiagnosticsConfig, FaultKind, FaultReport, FilterParamId};
pub use evfilter_eval::{
    ClockPolicy, EvalError, ExprEvaluatorContext, ExprNodeAdapter, FilterFault, LogicalClock,
    TimeAdvance, VariableStore, VersionPin,
};
pub use evfilter_expr::ExprNode;
pub use evfilter_types::{DateRepr, EventBean, MapEvent, TimePeriod, TimeUnit, Value, ValueType};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
