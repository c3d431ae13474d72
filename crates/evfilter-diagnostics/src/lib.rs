//! evfilter diagnostics
//!
//! This crate provides the fault-reporting infrastructure shared by the evaluation
//! crates: structured error codes, the fault taxonomy handed to the statement-management
//! layer, the identity of a filter parameter, and the explicit diagnostics configuration
//! that replaces annotation-driven instrumentation.

mod config;
mod error_code;
mod fault;

pub use config::*;
pub use error_code::*;
pub use fault::*;
