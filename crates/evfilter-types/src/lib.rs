//! evfilter type system
//!
//! This crate provides the runtime value model shared by the expression tree and the
//! evaluator:
//! - `Value`: the variant result type of every evaluation
//! - `DateTimeValue`: the calendar, zoned, local and boxed-date representations
//!   (epoch milliseconds travel as plain `Value::Long`)
//! - `TimePeriod` / `TimeUnit`: durations and compound time-period literals
//! - `Numeric`: widest-type numeric promotion
//! - `EventBean` / `MapEvent`: the read-only property bag handed in per arrival

pub mod coercion;
pub mod datetime;
pub mod duration;
pub mod event;
pub mod value;

pub use coercion::{Numeric, NumericKind, promote_pair};
pub use datetime::{CalendarDateTime, DateRepr, DateTimeValue, parse_default_msec, parse_local};
pub use duration::{TimePeriod, TimeUnit};
pub use event::{EventBean, MapEvent};
pub use value::{Value, ValueType};
