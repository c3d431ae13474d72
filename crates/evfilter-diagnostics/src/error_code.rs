//! Fault codes following a structured numbering system
//!
//! Code ranges:
//! - EVF0001-EVF0099: Evaluation faults (raised while evaluating a tree)
//! - EVF0100-EVF0199: Time faults (logical clock)
//! - EVF0200-EVF0299: Declaration faults (variables, adapter construction)
//! - EVF0400-EVF0499: System faults

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Fault code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get the static information registered for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is an evaluation fault (0001-0099)
    pub const fn is_evaluation_fault(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a time fault (0100-0199)
    pub const fn is_time_fault(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a declaration fault (0200-0299)
    pub const fn is_declaration_fault(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a system fault (0400-0499)
    pub const fn is_system_fault(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EVF{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the fault
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown fault");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Evaluation faults (0001-0099)
    map.insert(1, ErrorInfo::new("Type coercion failed")
        .with_help("The operator does not accept operands of these types"));
    map.insert(2, ErrorInfo::new("Unknown variable")
        .with_help("Declare the variable before compiling statements that reference it"));
    map.insert(3, ErrorInfo::new("Unknown event property"));
    map.insert(4, ErrorInfo::new("Stream index out of range"));
    map.insert(5, ErrorInfo::new("Undefined function"));
    map.insert(6, ErrorInfo::new("Function invocation failed"));
    map.insert(7, ErrorInfo::new("Arithmetic overflow"));
    map.insert(8, ErrorInfo::new("Invalid date/time operation"));

    // Time faults (0100-0199)
    map.insert(100, ErrorInfo::new("Logical clock regression")
        .with_help("Time-advance signals must be non-decreasing under the reject policy"));

    // Declaration faults (0200-0299)
    map.insert(200, ErrorInfo::new("Duplicate variable declaration"));
    map.insert(201, ErrorInfo::new("Missing capability")
        .with_help("A tree referencing variables needs a variable store"));

    // System faults (0400-0499)
    map.insert(400, ErrorInfo::new("Internal error"));

    map
});

// Evaluation faults
pub const EVF0001: ErrorCode = ErrorCode::new(1);
pub const EVF0002: ErrorCode = ErrorCode::new(2);
pub const EVF0003: ErrorCode = ErrorCode::new(3);
pub const EVF0004: ErrorCode = ErrorCode::new(4);
pub const EVF0005: ErrorCode = ErrorCode::new(5);
pub const EVF0006: ErrorCode = ErrorCode::new(6);
pub const EVF0007: ErrorCode = ErrorCode::new(7);
pub const EVF0008: ErrorCode = ErrorCode::new(8);

// Time faults
pub const EVF0100: ErrorCode = ErrorCode::new(100);

// Declaration faults
pub const EVF0200: ErrorCode = ErrorCode::new(200);
pub const EVF0201: ErrorCode = ErrorCode::new(201);

// System faults
pub const EVF0400: ErrorCode = ErrorCode::new(400);
