//! Evaluation errors for the evfilter engine

use evfilter_diagnostics::{FaultKind, FaultReport, FilterParamId};
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while evaluating a tree, publishing variables or advancing the clock.
///
/// Null operands are never errors; they propagate as null results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// Operator applied to operands of incompatible types
    #[error("Cannot apply {operator} to {left} and {right}")]
    TypeCoercion {
        operator: String,
        left: String,
        right: String,
    },

    /// Value of the wrong type for its destination
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Reference to a variable that was never declared
    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    /// Property missing from the event
    #[error("Unknown property '{property}' on event type {event_type}")]
    UnknownProperty {
        property: String,
        event_type: String,
    },

    /// Property read from a stream the row does not supply
    #[error("Stream {stream} out of range for row of {streams} event(s)")]
    StreamOutOfRange { stream: usize, streams: usize },

    /// Call to a function missing from the registry
    #[error("Undefined function: {name}")]
    UndefinedFunction { name: String },

    /// Registered function returned an error
    #[error("Function {name} failed: {message}")]
    FunctionFailed { name: String, message: String },

    /// Checked arithmetic overflowed
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: String },

    /// Date-time arithmetic left the representable range
    #[error("Invalid date-time: {message}")]
    InvalidDateTime { message: String },

    /// Time-advance signal earlier than the current logical time
    #[error("Clock regression: current time {current}, requested {requested}")]
    ClockRegression { current: i64, requested: i64 },

    /// Variable declared twice
    #[error("Variable already declared: {name}")]
    DuplicateVariable { name: String },

    /// Adapter built without a capability its tree needs
    #[error("Missing capability: {capability}")]
    MissingCapability { capability: String },

    /// Internal error (should not happen)
    #[error("Internal evaluation error: {message}")]
    Internal { message: String },
}

impl EvalError {
    /// Create a type coercion error for an operator and its operand types
    pub fn type_coercion(
        operator: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self::TypeCoercion {
            operator: operator.into(),
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unknown variable error
    pub fn unknown_variable(name: impl Into<String>) -> Self {
        Self::UnknownVariable { name: name.into() }
    }

    /// Create an unknown property error
    pub fn unknown_property(property: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self::UnknownProperty {
            property: property.into(),
            event_type: event_type.into(),
        }
    }

    /// Create an undefined function error
    pub fn undefined_function(name: impl Into<String>) -> Self {
        Self::UndefinedFunction { name: name.into() }
    }

    /// Create a function failure error
    pub fn function_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FunctionFailed {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an overflow error
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    /// Create an invalid date-time error
    pub fn invalid_datetime(message: impl Into<String>) -> Self {
        Self::InvalidDateTime {
            message: message.into(),
        }
    }

    /// Create a missing capability error
    pub fn missing_capability(capability: impl Into<String>) -> Self {
        Self::MissingCapability {
            capability: capability.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Fault kind reported to the statement-management layer
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::TypeCoercion { .. } | Self::TypeMismatch { .. } => FaultKind::TypeCoercion,
            Self::UnknownVariable { .. } => FaultKind::UnknownVariable,
            Self::UnknownProperty { .. } => FaultKind::UnknownProperty,
            Self::StreamOutOfRange { .. } => FaultKind::StreamOutOfRange,
            Self::UndefinedFunction { .. } => FaultKind::UndefinedFunction,
            Self::FunctionFailed { .. } => FaultKind::FunctionFailed,
            Self::Overflow { .. } => FaultKind::Overflow,
            Self::InvalidDateTime { .. } => FaultKind::InvalidDateTime,
            Self::ClockRegression { .. } => FaultKind::ClockRegression,
            Self::DuplicateVariable { .. } => FaultKind::DuplicateVariable,
            Self::MissingCapability { .. } => FaultKind::MissingCapability,
            Self::Internal { .. } => FaultKind::Internal,
        }
    }

    /// Build a fault report attributed to a filter parameter
    pub fn report(&self, id: FilterParamId) -> FaultReport {
        FaultReport::new(id, self.kind(), self.to_string())
    }
}

/// An evaluation error tagged with the filter parameter that raised it.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("filter {id}: {source}")]
pub struct FilterFault {
    pub id: FilterParamId,
    #[source]
    pub source: EvalError,
}

impl FilterFault {
    pub fn new(id: FilterParamId, source: EvalError) -> Self {
        Self { id, source }
    }

    pub fn kind(&self) -> FaultKind {
        self.source.kind()
    }

    pub fn report(&self) -> FaultReport {
        self.source.report(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evfilter_diagnostics::EVF0002;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            EvalError::type_mismatch("Long", "String").kind(),
            FaultKind::TypeCoercion
        );
        assert_eq!(
            EvalError::ClockRegression {
                current: 10,
                requested: 5
            }
            .kind(),
            FaultKind::ClockRegression
        );
    }

    #[test]
    fn test_filter_fault_report() {
        let fault = FilterFault::new(FilterParamId::new(7, 2), EvalError::unknown_variable("x"));
        assert_eq!(fault.to_string(), "filter 7/2: Unknown variable: x");
        let report = fault.report();
        assert_eq!(report.code, EVF0002);
        assert_eq!(report.filter_param(), FilterParamId::new(7, 2));
        assert_eq!(report.message, "Unknown variable: x");
    }
}
