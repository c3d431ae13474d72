//! plus/minus scenario tests
//!
//! Replays the date-time arithmetic scenarios against every date representation:
//! - a millisecond duration read from a variable
//! - a `2 days` time period
//! - the compound literal `1 hour 10 sec 20 msec`
//! - a null receiver next to the clock-derived `current_timestamp`

use chrono::{Offset, Utc};
use evfilter_diagnostics::{DiagnosticsConfig, FilterParamId};
use evfilter_eval::{
    ExprEvaluatorContext, ExprNodeAdapter, LogicalClock, TimeAdvance, VariableStore,
};
use evfilter_expr::ExprNode;
use evfilter_types::{
    DateRepr, DateTimeValue, MapEvent, TimeUnit, Value, ValueType, parse_default_msec,
    parse_local,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

const START: &str = "2002-05-30T09:00:00.000";

// ============================================================================
// Test Helpers
// ============================================================================

struct Engine {
    context: Arc<ExprEvaluatorContext>,
    store: Arc<VariableStore>,
}

impl Engine {
    fn new() -> Self {
        let clock = Arc::new(LogicalClock::new(0));
        let start = parse_default_msec(START, Utc.fix()).unwrap();
        clock.apply(&TimeAdvance::to(start)).unwrap();

        let store = Arc::new(VariableStore::new());
        store.declare("varmsec", ValueType::Long, Value::Null).unwrap();
        store.write("varmsec", Value::Long(1_000)).unwrap();

        let context = ExprEvaluatorContext::builder().clock(clock).build();
        Self {
            context: Arc::new(context),
            store,
        }
    }

    fn project(&self, tree: ExprNode, event: &MapEvent) -> Value {
        let adapter = ExprNodeAdapter::new(
            FilterParamId::new(1, 0),
            Arc::new(tree),
            Arc::clone(&self.context),
            Some(Arc::clone(&self.store)),
            DiagnosticsConfig::disabled(),
        )
        .unwrap();
        adapter.evaluate_value(&[event]).unwrap()
    }
}

fn property(repr: DateRepr) -> &'static str {
    match repr {
        DateRepr::EpochMillis => "msecdate",
        DateRepr::Date => "utildate",
        DateRepr::Calendar => "caldate",
        DateRepr::Local => "localdate",
        DateRepr::Zoned => "zoneddate",
    }
}

fn value(text: &str, repr: DateRepr) -> Value {
    DateTimeValue::coerce(parse_local(text).unwrap(), repr, Utc.fix()).unwrap()
}

/// Event carrying `start` in every representation, or nulls
fn event(start: Option<&str>) -> MapEvent {
    DateRepr::ALL
        .into_iter()
        .fold(MapEvent::new("SupportDateTime"), |event, repr| {
            let v = start.map_or(Value::Null, |text| value(text, repr));
            event.with(property(repr), v)
        })
}

fn millis(text: &str) -> Value {
    Value::Long(parse_default_msec(text, Utc.fix()).unwrap())
}

fn compound() -> ExprNode {
    ExprNode::period_literal(&[
        (1, TimeUnit::Hour),
        (10, TimeUnit::Second),
        (20, TimeUnit::Millisecond),
    ])
}

// ============================================================================
// Scenario A: duration from a variable
// ============================================================================

#[rstest]
#[case(DateRepr::EpochMillis)]
#[case(DateRepr::Date)]
#[case(DateRepr::Calendar)]
#[case(DateRepr::Zoned)]
#[case(DateRepr::Local)]
fn test_variable_duration(#[case] repr: DateRepr) {
    let engine = Engine::new();
    let event = event(Some(START));
    let receiver = || ExprNode::property(property(repr));

    let plus = engine.project(ExprNode::plus(receiver(), ExprNode::variable("varmsec")), &event);
    let minus = engine.project(ExprNode::minus(receiver(), ExprNode::variable("varmsec")), &event);

    assert_eq!(plus, value("2002-05-30T09:00:01.000", repr));
    assert_eq!(minus, value("2002-05-30T08:59:59.000", repr));
    assert_eq!(plus.date_repr(), Some(repr));
}

#[test]
fn test_variable_duration_on_clock() {
    let engine = Engine::new();
    let event = event(Some(START));
    let plus = ExprNode::plus(ExprNode::CurrentTimestamp, ExprNode::variable("varmsec"));
    let minus = ExprNode::minus(ExprNode::CurrentTimestamp, ExprNode::variable("varmsec"));
    assert_eq!(engine.project(plus, &event), millis("2002-05-30T09:00:01.000"));
    assert_eq!(engine.project(minus, &event), millis("2002-05-30T08:59:59.000"));
}

// ============================================================================
// Scenario B: 2 days
// ============================================================================

#[rstest]
#[case(DateRepr::EpochMillis)]
#[case(DateRepr::Date)]
#[case(DateRepr::Calendar)]
#[case(DateRepr::Zoned)]
#[case(DateRepr::Local)]
fn test_two_days(#[case] repr: DateRepr) {
    let engine = Engine::new();
    let event = event(Some(START));
    let days = || ExprNode::period_literal(&[(2, TimeUnit::Day)]);
    let receiver = || ExprNode::property(property(repr));

    assert_eq!(
        engine.project(ExprNode::plus(receiver(), days()), &event),
        value("2002-06-01T09:00:00.000", repr)
    );
    assert_eq!(
        engine.project(ExprNode::minus(receiver(), days()), &event),
        value("2002-05-28T09:00:00.000", repr)
    );
}

// ============================================================================
// Scenario C: 1 hour 10 sec 20 msec
// ============================================================================

#[rstest]
#[case(DateRepr::EpochMillis)]
#[case(DateRepr::Date)]
#[case(DateRepr::Calendar)]
#[case(DateRepr::Zoned)]
#[case(DateRepr::Local)]
fn test_compound_literal(#[case] repr: DateRepr) {
    let engine = Engine::new();
    let event = event(Some(START));
    let receiver = || ExprNode::property(property(repr));

    assert_eq!(
        engine.project(ExprNode::plus(receiver(), compound()), &event),
        value("2002-05-30T10:00:10.020", repr)
    );
    assert_eq!(
        engine.project(ExprNode::minus(receiver(), compound()), &event),
        value("2002-05-30T07:59:49.980", repr)
    );
}

#[test]
fn test_compound_literal_on_clock() {
    let engine = Engine::new();
    let event = event(Some(START));
    assert_eq!(
        engine.project(ExprNode::plus(ExprNode::CurrentTimestamp, compound()), &event),
        millis("2002-05-30T10:00:10.020")
    );
    assert_eq!(
        engine.project(ExprNode::minus(ExprNode::CurrentTimestamp, compound()), &event),
        millis("2002-05-30T07:59:49.980")
    );
}

// ============================================================================
// Scenario D: null receiver
// ============================================================================

#[rstest]
#[case(DateRepr::EpochMillis)]
#[case(DateRepr::Date)]
#[case(DateRepr::Calendar)]
#[case(DateRepr::Zoned)]
#[case(DateRepr::Local)]
fn test_null_receiver(#[case] repr: DateRepr) {
    let engine = Engine::new();
    let event = event(None);
    let receiver = || ExprNode::property(property(repr));

    assert_eq!(
        engine.project(ExprNode::plus(receiver(), ExprNode::variable("varmsec")), &event),
        Value::Null
    );
    assert_eq!(
        engine.project(ExprNode::minus(receiver(), compound()), &event),
        Value::Null
    );
}

#[test]
fn test_clock_result_ignores_null_receiver() {
    let engine = Engine::new();
    let event = event(None);
    assert_eq!(
        engine.project(
            ExprNode::plus(ExprNode::CurrentTimestamp, ExprNode::variable("varmsec")),
            &event
        ),
        millis("2002-05-30T09:00:01.000")
    );
}

#[test]
fn test_clock_advance_moves_current_timestamp() {
    let engine = Engine::new();
    let event = event(None);
    let later = parse_default_msec("2002-05-30T10:00:00.000", Utc.fix()).unwrap();
    engine.context.clock().advance(later).unwrap();
    assert_eq!(
        engine.project(ExprNode::minus(ExprNode::CurrentTimestamp, compound()), &event),
        millis("2002-05-30T08:59:49.980")
    );
}
