//! evfilter evaluation engine
//!
//! This crate evaluates compiled predicate trees against incoming events:
//!
//! - **Logical Clock**: the engine's virtual "now", moved only by time-advance signals
//! - **Variable Store**: versioned variables with snapshot-pinned reads
//! - **Evaluator**: depth-first evaluation of `ExprNode` trees with three-valued logic
//! - **DateTime Arithmetic**: `plus`/`minus` over the five date representations
//! - **Filter Adapter**: binds a tree to a filter parameter and evaluates it per event
//!
//! # Example
//!
//! ```
//! use evfilter_diagnostics::{DiagnosticsConfig, FilterParamId};
//! use evfilter_eval::{ExprEvaluatorContext, ExprNodeAdapter, VariableStore};
//! use evfilter_expr::{CompareOp, ExprNode};
//! use evfilter_types::{MapEvent, Value, ValueType};
//! use std::sync::Arc;
//!
//! let store = Arc::new(VariableStore::new());
//! store.declare("threshold", ValueType::Long, Value::Long(10)).unwrap();
//!
//! let tree = ExprNode::compare(
//!     CompareOp::Greater,
//!     ExprNode::property("price"),
//!     ExprNode::variable("threshold"),
//! );
//! let adapter = ExprNodeAdapter::new(
//!     FilterParamId::new(1, 0),
//!     Arc::new(tree),
//!     Arc::new(ExprEvaluatorContext::default()),
//!     Some(Arc::clone(&store)),
//!     DiagnosticsConfig::disabled(),
//! )
//! .unwrap();
//!
//! let event = MapEvent::new("Tick").with("price", 12i64);
//! assert!(adapter.evaluate(&event).unwrap());
//! store.write("threshold", Value::Long(20)).unwrap();
//! assert!(!adapter.evaluate(&event).unwrap());
//! ```
//!
//! # Three-Valued Logic
//!
//! - Any operator receiving a null operand yields null, never a fault
//! - `And` stops at the first false or null operand, `Or` at the first true one
//! - At the filter boundary a null result is a non-match

pub mod adapter;
pub mod clock;
pub mod context;
pub mod engine;
pub mod error;
pub mod operators;
pub mod registry;
pub mod variables;

pub use adapter::{AUDIT_TARGET, EvaluationProfile, ExprNodeAdapter};
pub use clock::{ClockPolicy, LogicalClock, TimeAdvance};
pub use context::{EvaluationContext, ExprEvaluatorContext, ExprEvaluatorContextBuilder};
pub use engine::ExprEvaluator;
pub use error::{EvalError, EvalResult, FilterFault};
pub use registry::{FunctionFn, FunctionRegistry};
pub use variables::{DEFAULT_MAX_VERSIONS, VariableStore, Version, VersionPin};
