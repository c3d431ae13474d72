//! Compiled expression trees
//!
//! This crate provides:
//! - `ExprNode`: the tagged-union tree produced by the statement compiler and shared
//!   read-only by every evaluation of a filter parameter
//! - Static analysis helpers (referenced variables, stream count, clock use)
//! - A textual rendering used in audit records
//! - JSON loading for trees handed over outside the process

mod display;
pub mod node;

pub use node::*;

/// Parse a compiled tree from its JSON form
pub fn from_json(json: &str) -> serde_json::Result<ExprNode> {
    serde_json::from_str(json)
}

/// Serialize a compiled tree to JSON
pub fn to_json(node: &ExprNode) -> serde_json::Result<String> {
    serde_json::to_string(node)
}
