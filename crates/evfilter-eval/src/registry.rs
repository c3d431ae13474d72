//! Function registry for expression function calls
//!
//! Function names are matched case-insensitively. Registered functions run on the
//! evaluating thread and must not block: a blocking function stalls the evaluation of
//! the event that called it.

use crate::error::{EvalError, EvalResult};
use crate::operators::comparison::compare_values;
use evfilter_types::Value;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Type alias for function implementations
pub type FunctionFn = Arc<dyn Fn(&[Value]) -> EvalResult<Value> + Send + Sync>;

/// Registry mapping lower-cased function names to implementations
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, FunctionFn>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FunctionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `coalesce`, `abs`, `min` and `max`
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("coalesce", coalesce);
        registry.register("abs", abs);
        registry.register("min", |args: &[Value]| extremum("min", args, Ordering::Less));
        registry.register("max", |args: &[Value]| extremum("max", args, Ordering::Greater));
        registry
    }

    /// Register a function, replacing any previous one of the same name
    pub fn register<F>(&mut self, name: impl AsRef<str>, implementation: F)
    where
        F: Fn(&[Value]) -> EvalResult<Value> + Send + Sync + 'static,
    {
        self.functions
            .insert(name.as_ref().to_lowercase(), Arc::new(implementation));
    }

    /// Get a function implementation
    pub fn get(&self, name: &str) -> Option<&FunctionFn> {
        self.functions.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Invoke `name` with already evaluated arguments
    pub fn call(&self, name: &str, args: &[Value]) -> EvalResult<Value> {
        let function = self
            .get(name)
            .ok_or_else(|| EvalError::undefined_function(name))?;
        function(args)
    }
}

// === Standard functions ===

fn coalesce(args: &[Value]) -> EvalResult<Value> {
    Ok(args
        .iter()
        .find(|value| !value.is_null())
        .cloned()
        .unwrap_or(Value::Null))
}

fn abs(args: &[Value]) -> EvalResult<Value> {
    let [value] = args else {
        return Err(EvalError::function_failed(
            "abs",
            format!("expects 1 argument, got {}", args.len()),
        ));
    };
    match value {
        Value::Null => Ok(Value::Null),
        Value::Integer(i) => i
            .checked_abs()
            .map(Value::Integer)
            .ok_or_else(|| EvalError::overflow("abs")),
        Value::Long(l) => l
            .checked_abs()
            .map(Value::Long)
            .ok_or_else(|| EvalError::overflow("abs")),
        Value::Double(d) => Ok(Value::Double(d.abs())),
        Value::Decimal(d) => Ok(Value::Decimal(d.abs())),
        other => Err(EvalError::type_mismatch("numeric", other.type_name())),
    }
}

/// Smallest or largest argument; null when any argument is null
fn extremum(name: &str, args: &[Value], keep: Ordering) -> EvalResult<Value> {
    if args.is_empty() {
        return Err(EvalError::function_failed(name, "expects at least 1 argument"));
    }
    if args.iter().any(Value::is_null) {
        return Ok(Value::Null);
    }
    let mut best = &args[0];
    for candidate in &args[1..] {
        match compare_values(candidate, best)? {
            Some(ordering) if ordering == keep => best = candidate,
            Some(_) => {}
            None => return Ok(Value::Null),
        }
    }
    Ok(best.clone())
}
