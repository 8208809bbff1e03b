use org_ascent::domain::{BooleanParam, CategoricalParam, ContinuousParam};
use org_ascent::{
    ConfigHash, DomainRegistry, Error, EvaluationResult, GradientAscent, OptimizerState,
    ParamValue, PointId, Status,
};

use super::{engine, float, results_for};

fn gain_engine() -> GradientAscent {
    let registry = DomainRegistry::builder()
        .domain(ContinuousParam::new("gain", 0.0, 1.0).step(0.1))
        .domain(BooleanParam::new("flag"))
        .domain(CategoricalParam::new("graph", ["top-down", "teams", "matrix"]))
        .build()
        .unwrap();
    engine(registry, 0.01)
}

fn start(engine: &GradientAscent) -> OptimizerState {
    let x = engine
        .registry()
        .defaults()
        .with("gain", 0.3)
        .with("graph", "top-down");
    engine.initialise_at(x).unwrap()
}

#[test]
fn test_missing_result_leaves_state_untouched() {
    let engine = gain_engine();
    let mut state = start(&engine);
    let before = state.clone();

    let mut results = results_for(&state, |_| 1.0);
    let dropped = results.remove(2);

    let err = engine.update(&mut state, &results).unwrap_err();
    match err {
        Error::MissingResult { hash, .. } => assert_eq!(hash, dropped.hash),
        other => panic!("expected MissingResult, got {other:?}"),
    }
    assert_eq!(state, before);
}

#[test]
fn test_partial_results_report_running() {
    let engine = gain_engine();
    let mut state = start(&engine);
    let x_hash = state.x().unwrap().hash();

    let results: Vec<_> = state
        .requests()
        .iter()
        .map(|r| {
            if r.hash == x_hash {
                EvaluationResult::completed(r.hash, 10.0)
            } else {
                EvaluationResult::running(r.hash)
            }
        })
        .collect();

    assert_eq!(engine.update(&mut state, &results).unwrap(), Status::Running);
    assert_eq!(state.status(), Status::Running);
    assert_eq!(state.performance(), Some(10.0));
    assert!(state.gradient().all(|p| p.outputs().performance.is_none()));
    assert!(!state.converged());
    assert!(state.ended_at().is_none());
    assert!(state.progress() > 0.0 && state.progress() < 1.0);
}

#[test]
fn test_pending_results_keep_state_pending() {
    let engine = gain_engine();
    let mut state = start(&engine);
    let results: Vec<_> = state
        .requests()
        .iter()
        .map(|r| EvaluationResult::pending(r.hash))
        .collect();

    assert_eq!(engine.update(&mut state, &results).unwrap(), Status::Pending);
    assert!(state.performance().is_none());
}

#[test]
fn test_failed_result_surfaces_evaluation_failed() {
    let engine = gain_engine();
    let mut state = start(&engine);
    let flag_hash = state.points_for("flag").next().unwrap().hash();

    let results: Vec<_> = state
        .requests()
        .iter()
        .map(|r| {
            if r.hash == flag_hash {
                EvaluationResult::failed(r.hash)
            } else {
                EvaluationResult::completed(r.hash, 5.0)
            }
        })
        .collect();

    let err = engine.update(&mut state, &results).unwrap_err();
    match err {
        Error::EvaluationFailed { id, hash } => {
            assert_eq!(id, PointId::Domain("flag".into()));
            assert_eq!(hash, flag_hash);
        }
        other => panic!("expected EvaluationFailed, got {other:?}"),
    }
    assert_eq!(state.status(), Status::Failed);
    assert!(matches!(engine.step(&state), Err(Error::NotInitialised { .. })));
}

#[test]
fn test_completed_results_fill_metrics() {
    let engine = gain_engine();
    let mut state = start(&engine);

    let results = results_for(&state, |c| {
        let teams = c.get("graph").and_then(ParamValue::as_category) == Some("teams");
        let flag = c.get("flag").and_then(ParamValue::as_bool) == Some(true);
        10.0 * float(c, "gain") + if teams { 4.0 } else { 0.0 } - if flag { 1.0 } else { 0.0 }
    });

    assert_eq!(engine.update(&mut state, &results).unwrap(), Status::Completed);
    assert_eq!(state.progress(), 1.0);
    assert!(state.ended_at().is_some());
    assert!(state.duration().is_some());

    let x = state.x().unwrap();
    assert!((x.outputs().performance.unwrap() - 3.0).abs() < 1e-9);
    assert!(x.outputs().slope.is_none());

    let gain = state.points_for("gain").next().unwrap().outputs();
    assert!((gain.performance_delta.unwrap() - 1.0).abs() < 1e-9);
    assert!((gain.slope.unwrap() - 10.0).abs() < 1e-6);
    assert!(gain.chosen_value.is_none());

    let flag = state.points_for("flag").next().unwrap().outputs();
    assert!((flag.slope.unwrap() + 1.0).abs() < 1e-9);
    assert_eq!(flag.chosen_value, Some(ParamValue::Bool(false)));

    for point in state.points_for("graph") {
        let outputs = point.outputs();
        assert!(outputs.slope.is_none());
        let alternative = outputs.x_plus_delta.as_ref().unwrap().as_category().unwrap();
        let expected = if alternative == "teams" { "teams" } else { "top-down" };
        assert_eq!(
            outputs.chosen_value,
            Some(ParamValue::Categorical(expected.into()))
        );
    }
}

#[test]
fn test_update_is_idempotent() {
    let engine = gain_engine();
    let mut state = start(&engine);
    let results = results_for(&state, |c| float(c, "gain") * 7.0);

    engine.update(&mut state, &results).unwrap();
    let once = state.clone();
    engine.update(&mut state, &results).unwrap();

    assert_eq!(state, once);
}

#[test]
fn test_unfinished_results_reopen_a_completed_state() {
    let engine = gain_engine();
    let mut state = start(&engine);

    let flat = results_for(&state, |_| 1.0);
    assert_eq!(engine.update(&mut state, &flat).unwrap(), Status::Completed);
    assert!(state.converged());
    assert!(state.ended_at().is_some());

    let running: Vec<_> = state
        .requests()
        .iter()
        .map(|r| EvaluationResult::running(r.hash))
        .collect();
    assert_eq!(engine.update(&mut state, &running).unwrap(), Status::Running);

    assert!(!state.converged());
    assert!(state.performance().is_none());
    assert!(state.ended_at().is_none());
    assert!(state.duration().is_none());
    for point in state.gradient() {
        let outputs = point.outputs();
        assert!(outputs.performance.is_none());
        assert!(outputs.performance_delta.is_none());
        assert!(outputs.slope.is_none());
        assert!(outputs.chosen_value.is_none());
        assert!(outputs.x_plus_delta.is_some());
    }
}

#[test]
fn test_first_duplicate_result_wins_and_extras_are_ignored() {
    let engine = gain_engine();
    let mut state = start(&engine);
    let x_hash = state.x().unwrap().hash();

    let mut results = results_for(&state, |_| 2.0);
    results.push(EvaluationResult::completed(x_hash, 100.0));
    results.push(EvaluationResult::completed(ConfigHash::from_raw(7), 50.0));

    engine.update(&mut state, &results).unwrap();
    assert_eq!(state.performance(), Some(2.0));
}
