//! Operator implementations
//!
//! Operators are organized by category:
//! - Logical connectives with three-valued logic (And, Or, Not, IsNull)
//! - Comparisons with widest-type numeric promotion
//! - Checked arithmetic
//! - Date-time `plus`/`minus` over the five date representations

pub mod arithmetic;
pub mod comparison;
pub mod datetime;
pub mod logical;

pub use arithmetic::arithmetic;
pub use comparison::{compare, compare_values, values_equal};
pub use datetime::{duration_value, minus, plus};
