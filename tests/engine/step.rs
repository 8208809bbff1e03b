use org_ascent::domain::{BooleanParam, CategoricalParam, ContinuousParam, DiscreteParam};
use org_ascent::{DomainRegistry, Error, EvaluationResult, ParamValue, Status};

use super::{engine, float, results_for};

#[test]
fn test_step_requires_completed_state() {
    let registry = DomainRegistry::builder()
        .domain(ContinuousParam::new("gain", 0.0, 1.0).step(0.1))
        .build()
        .unwrap();
    let engine = engine(registry, 0.01);
    let state = engine.initialise().unwrap();

    let err = engine.step(&state).unwrap_err();
    assert!(matches!(
        err,
        Error::NotInitialised {
            status: Status::Pending
        }
    ));
}

#[test]
fn test_gain_scenario_moves_by_slope_times_learning_rate() {
    let registry = DomainRegistry::builder()
        .domain(ContinuousParam::new("gain", 0.0, 1.0).step(0.1))
        .build()
        .unwrap();
    let engine = engine(registry, 0.01);

    let mut state = engine.initialise().unwrap();
    let x_gain = float(state.x().unwrap().config(), "gain");
    assert!((0.0..=1.0).contains(&x_gain));
    assert_eq!(state.gradient().count(), 1);

    let neighbor = state.gradient().next().unwrap();
    let x_delta = neighbor.outputs().x_delta.unwrap();
    assert!((x_delta - 0.1_f64.min(1.0 - x_gain)).abs() < 1e-12);

    let x_hash = state.x().unwrap().hash();
    let results = vec![
        EvaluationResult::completed(x_hash, 10.0),
        EvaluationResult::completed(neighbor.hash(), 12.0),
    ];
    engine.update(&mut state, &results).unwrap();

    let slope = state.gradient().next().unwrap().outputs().slope.unwrap();
    assert!((slope - 2.0 / x_delta).abs() < 1e-9);

    let next = engine.step(&state).unwrap();
    let expected = (x_gain + slope * 0.01).clamp(0.0, 1.0);
    assert!((float(next.x().unwrap().config(), "gain") - expected).abs() < 1e-12);
    assert_eq!(next.step_count(), 1);
    assert_eq!(next.status(), Status::Pending);
    assert!(!next.converged());
}

#[test]
fn test_gain_scenario_from_a_known_point() {
    let registry = DomainRegistry::builder()
        .domain(ContinuousParam::new("gain", 0.0, 1.0).step(0.1))
        .build()
        .unwrap();
    let engine = engine(registry, 0.01);
    let mut state = engine
        .initialise_at([("gain", 0.3)].into_iter().collect())
        .unwrap();

    let results = results_for(&state, |c| if float(c, "gain") > 0.35 { 12.0 } else { 10.0 });
    engine.update(&mut state, &results).unwrap();

    let slope = state.gradient().next().unwrap().outputs().slope.unwrap();
    assert!((slope - 20.0).abs() < 1e-9);

    let next = engine.step(&state).unwrap();
    assert!((float(next.x().unwrap().config(), "gain") - 0.5).abs() < 1e-9);
}

#[test]
fn test_numeric_step_clamps_and_rounds() {
    let registry = DomainRegistry::builder()
        .domain(DiscreteParam::new("spans", 1, 10))
        .domain(ContinuousParam::new("gain", 0.0, 1.0).step(0.1))
        .build()
        .unwrap();

    let start = [("spans", ParamValue::Int(3)), ("gain", ParamValue::Float(0.5))];
    let score = |c: &org_ascent::ConfigurationVector| {
        c.get("spans").and_then(ParamValue::as_f64).unwrap() * 2.0 + float(c, "gain") * 50.0
    };

    // spans slope 2: 3 + 2 * 0.4 = 3.8 rounds to 4
    let small = engine(registry.clone(), 0.4);
    let mut state = small.initialise_at(start.clone().into_iter().collect()).unwrap();
    engine_update(&small, &mut state, score);
    let next = small.step(&state).unwrap();
    assert_eq!(next.x().unwrap().config().get("spans"), Some(&ParamValue::Int(4)));
    assert_eq!(float(next.x().unwrap().config(), "gain"), 1.0);

    // a large rate overshoots and is clamped
    let large = engine(registry, 10.0);
    let mut state = large.initialise_at(start.into_iter().collect()).unwrap();
    engine_update(&large, &mut state, score);
    let next = large.step(&state).unwrap();
    assert_eq!(next.x().unwrap().config().get("spans"), Some(&ParamValue::Int(10)));
    assert_eq!(float(next.x().unwrap().config(), "gain"), 1.0);
}

fn engine_update(
    engine: &org_ascent::GradientAscent,
    state: &mut org_ascent::OptimizerState,
    score: impl Fn(&org_ascent::ConfigurationVector) -> f64,
) {
    let results = results_for(state, score);
    assert_eq!(engine.update(state, &results).unwrap(), Status::Completed);
}

#[test]
fn test_zero_slope_leaves_value_unchanged() {
    let registry = DomainRegistry::builder()
        .domain(ContinuousParam::new("gain", 0.0, 1.0).step(0.1))
        .build()
        .unwrap();
    let engine = engine(registry, 0.5);
    let mut state = engine
        .initialise_at([("gain", 0.25)].into_iter().collect())
        .unwrap();
    engine_update(&engine, &mut state, |_| 4.0);

    let next = engine.step(&state).unwrap();
    assert_eq!(float(next.x().unwrap().config(), "gain"), 0.25);
}

#[test]
fn test_boolean_without_improvement_stays() {
    let registry = DomainRegistry::builder()
        .domain(BooleanParam::new("board.controlStep"))
        .build()
        .unwrap();
    let engine = engine(registry, 0.01);
    let mut state = engine
        .initialise_at([("board.controlStep", false)].into_iter().collect())
        .unwrap();

    let results = results_for(&state, |c| {
        if c.get("board.controlStep") == Some(&ParamValue::Bool(true)) {
            9.0
        } else {
            10.0
        }
    });
    engine.update(&mut state, &results).unwrap();

    let next = engine.step(&state).unwrap();
    assert_eq!(
        next.x().unwrap().config().get("board.controlStep"),
        Some(&ParamValue::Bool(false))
    );
}

#[test]
fn test_boolean_with_improvement_flips() {
    let registry = DomainRegistry::builder()
        .domain(BooleanParam::new("board.controlStep"))
        .build()
        .unwrap();
    let engine = engine(registry, 0.01);
    let mut state = engine
        .initialise_at([("board.controlStep", false)].into_iter().collect())
        .unwrap();

    let results = results_for(&state, |c| {
        if c.get("board.controlStep") == Some(&ParamValue::Bool(true)) {
            11.0
        } else {
            10.0
        }
    });
    engine.update(&mut state, &results).unwrap();

    let next = engine.step(&state).unwrap();
    assert_eq!(
        next.x().unwrap().config().get("board.controlStep"),
        Some(&ParamValue::Bool(true))
    );
}

#[test]
fn test_categorical_picks_the_best_improving_alternative() {
    let registry = DomainRegistry::builder()
        .domain(CategoricalParam::new("graph", ["a", "b", "c", "d"]))
        .build()
        .unwrap();
    let engine = engine(registry, 0.01);
    let mut state = engine
        .initialise_at([("graph", "a")].into_iter().collect())
        .unwrap();

    let results = results_for(&state, |c| {
        match c.get("graph").and_then(ParamValue::as_category) {
            Some("b") => 12.0,
            Some("c") => 15.0,
            Some("d") => 3.0,
            _ => 10.0,
        }
    });
    engine.update(&mut state, &results).unwrap();

    let next = engine.step(&state).unwrap();
    assert_eq!(
        next.x().unwrap().config().get("graph"),
        Some(&ParamValue::Categorical("c".into()))
    );
    assert_eq!(next.points_for("graph").count(), 3);
}

#[test]
fn test_fixed_domains_are_carried_over() {
    let registry = DomainRegistry::builder()
        .domain(ContinuousParam::new("gain", 0.0, 1.0).step(0.1))
        .domain(ContinuousParam::new("reporting.unitPrice", 0.0, 5.0).default(1.0).fixed())
        .build()
        .unwrap();
    let engine = engine(registry, 0.01);
    let mut state = engine.initialise().unwrap();
    engine_update(&engine, &mut state, |c| float(c, "gain"));

    let next = engine.step(&state).unwrap();
    assert_eq!(float(next.x().unwrap().config(), "reporting.unitPrice"), 1.0);
}
