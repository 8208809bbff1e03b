use org_ascent::domain::{BooleanParam, CategoricalParam, ContinuousParam, DiscreteParam};
use org_ascent::{ConvergencePolicy, DomainRegistry, GradientAscent, OptimizerState, ParamValue};

use super::{float, results_for};

fn registry() -> DomainRegistry {
    DomainRegistry::builder()
        .domain(ContinuousParam::new("gain", 0.0, 1.0).step(0.1))
        .domain(DiscreteParam::new("layers", 1, 6))
        .domain(BooleanParam::new("flag"))
        .domain(CategoricalParam::new("graph", ["top-down", "teams"]))
        .build()
        .unwrap()
}

fn with_policy(tolerance: f64, policy: ConvergencePolicy) -> GradientAscent {
    GradientAscent::builder()
        .tolerance(tolerance)
        .convergence_policy(policy)
        .build(registry())
        .unwrap()
}

fn completed(
    engine: &GradientAscent,
    gain: f64,
    score: impl Fn(&org_ascent::ConfigurationVector) -> f64,
) -> OptimizerState {
    let x = engine
        .registry()
        .defaults()
        .with("gain", gain)
        .with("layers", 3_i64);
    let mut state = engine.initialise_at(x).unwrap();
    let results = results_for(&state, score);
    engine.update(&mut state, &results).unwrap();
    state
}

#[test]
fn test_flat_landscape_converges_for_any_tolerance() {
    for tolerance in [1e-12, 1e-4, 1.0] {
        let engine = with_policy(tolerance, ConvergencePolicy::default());
        let state = completed(&engine, 0.5, |_| 42.0);
        assert!(state.converged(), "tolerance {tolerance}");
        assert_eq!(engine.improvement_signal(&state).unwrap(), 0.0);
    }
}

#[test]
fn test_non_improving_alternatives_still_converge() {
    let engine = with_policy(1e-6, ConvergencePolicy::default());
    let state = completed(&engine, 0.5, |c| {
        let teams = c.get("graph").and_then(ParamValue::as_category) == Some("teams");
        let flag = c.get("flag").and_then(ParamValue::as_bool) == Some(true);
        10.0 - if teams { 3.0 } else { 0.0 } - if flag { 1.0 } else { 0.0 }
    });
    assert!(state.converged());
}

#[test]
fn test_improving_category_blocks_convergence() {
    let engine = with_policy(1e-3, ConvergencePolicy::default());
    let state = completed(&engine, 0.5, |c| {
        if c.get("graph").and_then(ParamValue::as_category) == Some("teams") {
            10.5
        } else {
            10.0
        }
    });
    assert!(!state.converged());
    // unsquared delta
    let signal = engine.improvement_signal(&state).unwrap();
    assert!((signal - 0.5_f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_slope_contributes_its_square() {
    let engine = with_policy(1e-3, ConvergencePolicy::default());
    let state = completed(&engine, 0.5, |c| 3.0 * float(c, "gain"));
    let signal = engine.improvement_signal(&state).unwrap();
    assert!((signal - 3.0).abs() < 1e-6);
    assert!(!state.converged());
}

#[test]
fn test_positive_slope_at_max_is_ignored() {
    let engine = with_policy(1e-3, ConvergencePolicy::default());
    let state = completed(&engine, 1.0, |c| 3.0 * float(c, "gain"));

    let slope = state.points_for("gain").next().unwrap().outputs().slope.unwrap();
    assert!(slope > 0.0);
    assert!(state.converged());
}

#[test]
fn test_negative_slope_at_min_counts_by_default() {
    let score = |c: &org_ascent::ConfigurationVector| -3.0 * float(c, "gain");

    let engine = with_policy(1e-3, ConvergencePolicy::default());
    let state = completed(&engine, 0.0, score);
    assert!(!state.converged());

    let symmetric = with_policy(1e-3, ConvergencePolicy::symmetric());
    let state = completed(&symmetric, 0.0, score);
    assert!(state.converged());
}

#[test]
fn test_converged_is_only_set_on_completion() {
    let engine = with_policy(1.0, ConvergencePolicy::default());
    let x = engine.registry().defaults();
    let mut state = engine.initialise_at(x).unwrap();
    let results: Vec<_> = state
        .requests()
        .iter()
        .map(|r| org_ascent::EvaluationResult::running(r.hash))
        .collect();
    engine.update(&mut state, &results).unwrap();
    assert!(!state.converged());
}
