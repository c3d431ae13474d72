//! Scenario files
//!
//! A scenario declares variables, filters and projections, then replays a list of steps
//! against them. Every `event` step is matched by all filters under one shared version
//! pin and reported together with the projection values.
//!
//! ```json
//! {
//!   "timeZone": "+00:00",
//!   "startTime": "2002-05-30T09:00:00.000",
//!   "variables": [{ "name": "threshold", "type": "Long", "initial": 100 }],
//!   "filters": [{ "id": { "filterSpecId": 1, "paramPathNum": 0 }, "expression": { ... } }],
//!   "steps": [
//!     { "type": "event", "eventType": "Tick", "properties": { "price": 150 } },
//!     { "type": "setVariable", "name": "threshold", "value": 200 },
//!     { "type": "advanceTime", "to": "2002-05-30T09:00:01.000" }
//!   ]
//! }
//! ```

use anyhow::{Context, Result, bail};
use chrono::{FixedOffset, Offset, Utc};
use evfilter_diagnostics::{DiagnosticsConfig, FaultReport, FilterParamId};
use evfilter_eval::{
    ClockPolicy, EvaluationProfile, ExprEvaluatorContext, ExprNodeAdapter, LogicalClock,
    TimeAdvance, VariableStore,
};
use evfilter_expr::ExprNode;
use evfilter_types::{
    DateRepr, DateTimeValue, EventBean, MapEvent, Value, ValueType, parse_default_msec,
    parse_local,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Filter spec id under which projections are reported
pub const PROJECTION_SPEC_ID: u32 = u32::MAX;

// ============================================================================
// Scenario File
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Engine time zone as a fixed offset such as `+09:00`, UTC when absent
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub clock_policy: ClockPolicy,
    #[serde(default)]
    pub start_time: Option<TimeSpec>,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    #[serde(default)]
    pub variables: Vec<VariableDecl>,
    #[serde(default)]
    pub filters: Vec<FilterDecl>,
    #[serde(default)]
    pub projections: Vec<ProjectionDecl>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid scenario")
    }

    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse scenario file: {}", path.display()))
    }

    /// The engine time zone
    pub fn zone(&self) -> Result<FixedOffset> {
        match &self.time_zone {
            Some(text) => text
                .parse()
                .with_context(|| format!("Invalid time zone offset: {}", text)),
            None => Ok(Utc.fix()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub initial: ValueSpec,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterDecl {
    pub id: FilterParamId,
    pub expression: ExprNode,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectionDecl {
    pub name: String,
    pub expression: ExprNode,
}

/// One replayed step
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Step {
    /// Time-advance signal for the logical clock
    AdvanceTime { to: TimeSpec },
    SetVariable { name: String, value: ValueSpec },
    /// Several variables published at one version
    SetVariables { values: IndexMap<String, ValueSpec> },
    Event {
        #[serde(rename = "eventType")]
        event_type: String,
        #[serde(default)]
        properties: IndexMap<String, ValueSpec>,
    },
}

/// A point in time, as epoch milliseconds or default-format text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeSpec {
    Millis(i64),
    Text(String),
}

impl TimeSpec {
    pub fn resolve(&self, zone: FixedOffset) -> Result<i64> {
        match self {
            Self::Millis(millis) => Ok(*millis),
            Self::Text(text) => parse_default_msec(text, zone)
                .with_context(|| format!("Invalid timestamp: {}", text)),
        }
    }
}

/// A value as written in a scenario file.
///
/// Plain JSON scalars map to `Boolean`, `Long`, `Double` and `String`; `{"at", "repr"}`
/// builds a date in one of the five representations; anything else must be a tagged
/// `Value`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ValueSpec {
    DateTime { at: String, repr: DateRepr },
    Typed(Value),
    Plain(JsonValue),
}

impl Default for ValueSpec {
    fn default() -> Self {
        Self::Plain(JsonValue::Null)
    }
}

impl ValueSpec {
    pub fn resolve(&self, zone: FixedOffset) -> Result<Value> {
        match self {
            Self::DateTime { at, repr } => {
                let local = parse_local(at).with_context(|| format!("Invalid date-time: {}", at))?;
                DateTimeValue::coerce(local, *repr, zone)
                    .with_context(|| format!("{} is not representable as {}", at, repr.name()))
            }
            Self::Typed(value) => Ok(value.clone()),
            Self::Plain(json) => plain_value(json),
        }
    }
}

fn plain_value(json: &JsonValue) -> Result<Value> {
    let value = match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(long) => Value::Long(long),
            None => Value::Double(
                n.as_f64()
                    .with_context(|| format!("Number out of range: {}", n))?,
            ),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        other => bail!("Unsupported value: {}", other),
    };
    Ok(value)
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub events: Vec<EventReport>,
    /// Logical time after the last step
    pub final_time: i64,
    /// Variable version after the last step
    pub final_version: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<ProfileEntry>,
}

impl ScenarioReport {
    /// Number of (event, filter) pairs that matched
    pub fn match_count(&self) -> usize {
        self.events
            .iter()
            .flat_map(|event| &event.filters)
            .filter(|outcome| outcome.matched == Some(true))
            .count()
    }

    /// Number of faults raised by filters and projections
    pub fn fault_count(&self) -> usize {
        self.events
            .iter()
            .map(|event| {
                let filters = event.filters.iter().filter(|o| o.fault.is_some()).count();
                let projections = event.projections.iter().filter(|o| o.fault.is_some()).count();
                filters + projections
            })
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReport {
    /// One-based step number
    pub step: usize,
    pub event_type: String,
    /// Logical time the event was evaluated at
    pub time: i64,
    /// Variable version the event was evaluated under
    pub version: u64,
    pub filters: Vec<FilterOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projections: Vec<ProjectionOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOutcome {
    pub filter: FilterParamId,
    /// `None` when the filter raised a fault
    pub matched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionOutcome {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Rendered value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    pub filter: FilterParamId,
    #[serde(flatten)]
    pub profile: EvaluationProfile,
}

// ============================================================================
// Runner
// ============================================================================

/// Engine state built from a scenario's declarations
#[derive(Debug)]
pub struct ScenarioRunner {
    zone: FixedOffset,
    context: Arc<ExprEvaluatorContext>,
    store: Arc<VariableStore>,
    filters: Vec<ExprNodeAdapter>,
    projections: Vec<(String, ExprNodeAdapter)>,
}

impl ScenarioRunner {
    /// Declare variables and bind every filter and projection
    pub fn new(scenario: &Scenario) -> Result<Self> {
        let zone = scenario.zone()?;
        let start = match &scenario.start_time {
            Some(time) => time.resolve(zone)?,
            None => 0,
        };
        let clock = Arc::new(LogicalClock::with_policy(start, scenario.clock_policy));
        let context = Arc::new(
            ExprEvaluatorContext::builder()
                .clock(clock)
                .time_zone(zone)
                .build(),
        );

        let store = Arc::new(VariableStore::new());
        for decl in &scenario.variables {
            let initial = decl
                .initial
                .resolve(zone)
                .with_context(|| format!("Invalid initial value of variable '{}'", decl.name))?;
            store.declare(decl.name.as_str(), decl.value_type, initial)?;
        }

        let bind = |id: FilterParamId, expression: &ExprNode| {
            ExprNodeAdapter::new(
                id,
                Arc::new(expression.clone()),
                Arc::clone(&context),
                Some(Arc::clone(&store)),
                scenario.diagnostics,
            )
        };
        let filters = scenario
            .filters
            .iter()
            .map(|decl| {
                bind(decl.id, &decl.expression)
                    .with_context(|| format!("Invalid filter {}", decl.id))
            })
            .collect::<Result<Vec<_>>>()?;
        let projections = scenario
            .projections
            .iter()
            .enumerate()
            .map(|(index, decl)| -> Result<(String, ExprNodeAdapter)> {
                let id = FilterParamId::new(PROJECTION_SPEC_ID, u32::try_from(index)?);
                let adapter = bind(id, &decl.expression)
                    .with_context(|| format!("Invalid projection '{}'", decl.name))?;
                Ok((decl.name.clone(), adapter))
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Scenario bound {} filter(s) and {} projection(s) over {} variable(s)",
            filters.len(),
            projections.len(),
            scenario.variables.len()
        );

        Ok(Self {
            zone,
            context,
            store,
            filters,
            projections,
        })
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn context(&self) -> &ExprEvaluatorContext {
        &self.context
    }

    /// Replay `steps` in order; the first failing step aborts the run
    pub fn run(&self, steps: &[Step]) -> Result<ScenarioReport> {
        let mut events = Vec::new();
        for (index, step) in steps.iter().enumerate() {
            self.apply(index, step, &mut events)
                .with_context(|| format!("Step {} failed", index + 1))?;
        }
        let profiles = self
            .filters
            .iter()
            .filter_map(|adapter| {
                adapter.profile().map(|profile| ProfileEntry {
                    filter: adapter.id(),
                    profile,
                })
            })
            .collect();
        Ok(ScenarioReport {
            events,
            final_time: self.context.clock().now(),
            final_version: self.store.current_version(),
            profiles,
        })
    }

    fn apply(&self, index: usize, step: &Step, events: &mut Vec<EventReport>) -> Result<()> {
        match step {
            Step::AdvanceTime { to } => {
                let target = to.resolve(self.zone)?;
                self.context.clock().apply(&TimeAdvance::to(target))?;
            }
            Step::SetVariable { name, value } => {
                self.store.write(name, value.resolve(self.zone)?)?;
            }
            Step::SetVariables { values } => {
                let writes = values
                    .iter()
                    .map(|(name, value)| -> Result<(&str, Value)> {
                        Ok((name.as_str(), value.resolve(self.zone)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                self.store.write_all(writes)?;
            }
            Step::Event {
                event_type,
                properties,
            } => {
                let mut event = MapEvent::new(event_type.as_str());
                for (name, value) in properties {
                    let value = value
                        .resolve(self.zone)
                        .with_context(|| format!("Invalid property '{}'", name))?;
                    event = event.with(name.as_str(), value);
                }
                events.push(self.evaluate(index + 1, &event));
            }
        }
        Ok(())
    }

    /// Match one event against every filter under a single pin and compute projections
    pub fn evaluate(&self, step: usize, event: &MapEvent) -> EventReport {
        let row: [&dyn EventBean; 1] = [event];
        let pin = self.store.set_local_version();

        let filters = self
            .filters
            .iter()
            .map(|adapter| match adapter.evaluate_pinned(&row, pin) {
                Ok(matched) => FilterOutcome {
                    filter: adapter.id(),
                    matched: Some(matched),
                    fault: None,
                },
                Err(fault) => {
                    log::warn!("{}", fault);
                    FilterOutcome {
                        filter: adapter.id(),
                        matched: None,
                        fault: Some(fault.report()),
                    }
                }
            })
            .collect();

        let projections = self
            .projections
            .iter()
            .map(|(name, adapter)| match adapter.evaluate_value_pinned(&row, pin) {
                Ok(value) => ProjectionOutcome {
                    name: name.clone(),
                    text: Some(value.to_string()),
                    value: Some(value),
                    fault: None,
                },
                Err(fault) => ProjectionOutcome {
                    name: name.clone(),
                    value: None,
                    text: None,
                    fault: Some(fault.report()),
                },
            })
            .collect();

        EventReport {
            step,
            event_type: event.event_type().to_string(),
            time: self.context.clock().now(),
            version: pin.version(),
            filters,
            projections,
        }
    }
}

/// Build a runner for `scenario` and replay its steps
pub fn run_scenario(scenario: &Scenario) -> Result<ScenarioReport> {
    ScenarioRunner::new(scenario)?.run(&scenario.steps)
}
