//! Fault taxonomy and fault reports

use crate::{
    ErrorCode, EVF0001, EVF0002, EVF0003, EVF0004, EVF0005, EVF0006, EVF0007, EVF0008, EVF0100,
    EVF0200, EVF0201, EVF0400,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of fault raised while evaluating or declaring filter state.
///
/// Null propagation is not a fault and has no kind here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    /// Operator applied to operands of incompatible types
    TypeCoercion,
    /// Reference to an undeclared variable
    UnknownVariable,
    /// Property not present on the supplied event
    UnknownProperty,
    /// Property accessor addressed a stream that was not supplied
    StreamOutOfRange,
    /// Function name not present in the registry
    UndefinedFunction,
    /// A registered function returned an error
    FunctionFailed,
    /// Integer or date-time arithmetic overflowed
    Overflow,
    /// Date-time value could not be constructed
    InvalidDateTime,
    /// Time-advance signal moved the clock backwards under the reject policy
    ClockRegression,
    /// Variable declared twice
    DuplicateVariable,
    /// Adapter constructed without a capability the tree needs
    MissingCapability,
    /// Anything else
    Internal,
}

impl FaultKind {
    /// The structured code for this kind
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::TypeCoercion => EVF0001,
            Self::UnknownVariable => EVF0002,
            Self::UnknownProperty => EVF0003,
            Self::StreamOutOfRange => EVF0004,
            Self::UndefinedFunction => EVF0005,
            Self::FunctionFailed => EVF0006,
            Self::Overflow => EVF0007,
            Self::InvalidDateTime => EVF0008,
            Self::ClockRegression => EVF0100,
            Self::DuplicateVariable => EVF0200,
            Self::MissingCapability => EVF0201,
            Self::Internal => EVF0400,
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TypeCoercion => "type coercion",
            Self::UnknownVariable => "unknown variable",
            Self::UnknownProperty => "unknown property",
            Self::StreamOutOfRange => "stream out of range",
            Self::UndefinedFunction => "undefined function",
            Self::FunctionFailed => "function failed",
            Self::Overflow => "overflow",
            Self::InvalidDateTime => "invalid date-time",
            Self::ClockRegression => "clock regression",
            Self::DuplicateVariable => "duplicate variable",
            Self::MissingCapability => "missing capability",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Identity of one predicate parameter within a statement's filter criteria.
///
/// Used for attribution only, never for control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParamId {
    pub filter_spec_id: u32,
    pub param_path_num: u32,
}

impl FilterParamId {
    pub const fn new(filter_spec_id: u32, param_path_num: u32) -> Self {
        Self {
            filter_spec_id,
            param_path_num,
        }
    }
}

impl fmt::Display for FilterParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.filter_spec_id, self.param_path_num)
    }
}

/// Fault report handed to the statement-management layer, which decides
/// whether to deactivate the owning statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultReport {
    pub filter_spec_id: u32,
    pub param_path_num: u32,
    pub kind: FaultKind,
    pub code: ErrorCode,
    pub message: String,
}

impl FaultReport {
    /// Create a report for the given filter parameter
    pub fn new(id: FilterParamId, kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            filter_spec_id: id.filter_spec_id,
            param_path_num: id.param_path_num,
            kind,
            code: kind.code(),
            message: message.into(),
        }
    }

    /// The filter parameter this report is attributed to
    pub fn filter_param(&self) -> FilterParamId {
        FilterParamId::new(self.filter_spec_id, self.param_path_num)
    }
}

impl fmt::Display for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] in filter {}: {}",
            self.code,
            self.kind,
            self.filter_param(),
            self.message
        )
    }
}
