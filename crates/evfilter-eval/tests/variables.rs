//! Variable snapshot tests
//!
//! Readers evaluating through filter adapters while writers publish new values must
//! always observe one consistent snapshot per evaluation pass.

use evfilter_diagnostics::{DiagnosticsConfig, FilterParamId};
use evfilter_eval::{ExprEvaluatorContext, ExprNodeAdapter, VariableStore};
use evfilter_expr::{ArithOp, ExprNode};
use evfilter_types::{MapEvent, Value, ValueType};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

const TOTAL: i64 = 1_000;

fn balanced_store() -> Arc<VariableStore> {
    let store = VariableStore::with_max_versions(16_384);
    store.declare("left", ValueType::Long, Value::Long(TOTAL)).unwrap();
    store.declare("right", ValueType::Long, Value::Long(0)).unwrap();
    Arc::new(store)
}

/// `left + right = TOTAL`, true in every committed snapshot
fn balanced(store: &Arc<VariableStore>) -> ExprNodeAdapter {
    let tree = ExprNode::equal(
        ExprNode::arithmetic(
            ArithOp::Add,
            ExprNode::variable("left"),
            ExprNode::variable("right"),
        ),
        ExprNode::literal(TOTAL),
    );
    ExprNodeAdapter::new(
        FilterParamId::new(1, 0),
        Arc::new(tree),
        Arc::new(ExprEvaluatorContext::default()),
        Some(Arc::clone(store)),
        DiagnosticsConfig::disabled().with_profiling(true),
    )
    .unwrap()
}

#[test]
fn test_readers_never_see_torn_writes() {
    let store = balanced_store();
    let adapter = Arc::new(balanced(&store));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let adapter = Arc::clone(&adapter);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let event = MapEvent::new("Tick");
                let mut passes = 0u64;
                while !done.load(Ordering::Acquire) || passes == 0 {
                    assert!(adapter.evaluate(&event).unwrap());
                    passes += 1;
                }
                passes
            })
        })
        .collect();

    for moved in 1..=TOTAL {
        store
            .write_all([
                ("left", Value::Long(TOTAL - moved)),
                ("right", Value::Long(moved)),
            ])
            .unwrap();
    }
    done.store(true, Ordering::Release);

    let passes: u64 = readers.into_iter().map(|r| r.join().unwrap()).sum();
    let profile = adapter.profile().unwrap();
    assert_eq!(profile.evaluations, passes);
    assert_eq!(profile.matches, passes);
    assert_eq!(profile.faults, 0);
}

#[test]
fn test_old_pin_survives_later_writes() {
    let store = balanced_store();
    let pin = store.set_local_version();
    for moved in 1..=10 {
        store
            .write_all([
                ("left", Value::Long(TOTAL - moved)),
                ("right", Value::Long(moved)),
            ])
            .unwrap();
    }
    assert_eq!(store.read("left", pin), Ok(Value::Long(TOTAL)));
    assert_eq!(store.read("right", pin), Ok(Value::Long(0)));

    let latest = store.set_local_version();
    assert_eq!(latest.version(), pin.version() + 10);
    assert_eq!(store.read("right", latest), Ok(Value::Long(10)));
}

#[test]
fn test_rejected_batch_publishes_nothing() {
    let store = balanced_store();
    let before = store.current_version();
    let result = store.write_all([
        ("left", Value::Long(1)),
        ("right", Value::from("many")),
    ]);
    assert!(result.is_err());
    assert_eq!(store.current_version(), before);

    let adapter = balanced(&store);
    assert!(adapter.evaluate(&MapEvent::new("Tick")).unwrap());
}
