use org_ascent::domain::{BooleanParam, CategoricalParam, ContinuousParam, DiscreteParam};
use org_ascent::{ConfigurationVector, DomainRegistry, Error, ParamValue, Status};

use super::engine;

fn registry() -> DomainRegistry {
    DomainRegistry::builder()
        .domain(ContinuousParam::new("gains.influence", 0.0, 1.0).step(0.1))
        .domain(DiscreteParam::new("spans", 2, 6))
        .domain(BooleanParam::new("board.controlStep"))
        .domain(
            CategoricalParam::new("matrixInit.judgment", ["random", "purposeful", "null"])
                .stochastic(["random"])
                .default("purposeful")
                .fixed(),
        )
        .domain(
            ContinuousParam::new("actionStateProbability", 0.05, 0.95)
                .probability()
                .default(0.85)
                .fixed(),
        )
        .build()
        .unwrap()
}

#[test]
fn test_initialise_produces_pending_state() {
    let state = engine(registry(), 0.01).initialise().unwrap();

    assert_eq!(state.step_count(), 0);
    assert_eq!(state.status(), Status::Pending);
    assert!(!state.converged());
    assert!(state.performance().is_none());
    assert!(state.ended_at().is_none());
    assert!(state.data_points().iter().all(|p| p.status() == Status::Pending));
    assert_eq!(state.progress(), 0.0);
}

#[test]
fn test_initialise_samples_within_domains_and_keeps_fixed_defaults() {
    let registry = registry();
    for seed in 0..50 {
        let engine = org_ascent::GradientAscent::builder()
            .seed(seed)
            .build(registry.clone())
            .unwrap();
        let state = engine.initialise().unwrap();
        let x = state.x().unwrap().config();

        registry.validate_configuration(x).unwrap();
        assert_eq!(
            x.get("matrixInit.judgment"),
            Some(&ParamValue::Categorical("purposeful".into()))
        );
        assert_eq!(x.get("actionStateProbability"), Some(&ParamValue::Float(0.85)));
    }
}

#[test]
fn test_initialise_x_comes_first_with_one_neighbor_per_numeric_domain() {
    let state = engine(registry(), 0.01).initialise().unwrap();

    assert!(state.data_points()[0].id().is_x());
    // gain, spans, controlStep; fixed domains are not perturbed
    assert_eq!(state.gradient().count(), 3);
    assert_eq!(state.points_for("gains.influence").count(), 1);
    assert_eq!(state.points_for("matrixInit.judgment").count(), 0);
}

#[test]
fn test_seeded_initialise_is_reproducible() {
    let a = engine(registry(), 0.01).initialise().unwrap();
    let b = engine(registry(), 0.01).initialise().unwrap();
    assert_eq!(a.x().unwrap().config(), b.x().unwrap().config());
}

#[test]
fn test_initialise_at_uses_the_given_point() {
    let engine = engine(registry(), 0.01);
    let x = registry()
        .defaults()
        .with("gains.influence", 0.4)
        .with("spans", 5_i64);
    let state = engine.initialise_at(x.clone()).unwrap();

    assert_eq!(state.x().unwrap().config(), &x);
    assert_eq!(state.x().unwrap().hash(), x.hash());
}

#[test]
fn test_initialise_at_rejects_bad_points() {
    let engine = engine(registry(), 0.01);

    let unknown = registry().defaults().with("layers", 3_i64);
    assert!(matches!(engine.initialise_at(unknown), Err(Error::NotFound(_))));

    let out_of_range = registry().defaults().with("spans", 7_i64);
    assert!(matches!(
        engine.initialise_at(out_of_range),
        Err(Error::InvalidConfiguration { .. })
    ));

    let missing: ConfigurationVector = [("spans", 3_i64)].into_iter().collect();
    assert!(matches!(
        engine.initialise_at(missing),
        Err(Error::InvalidConfiguration { .. })
    ));

    let moved_fixed = registry().defaults().with("actionStateProbability", 0.5);
    assert!(matches!(
        engine.initialise_at(moved_fixed),
        Err(Error::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_stochastic_category_marks_points_repeated() {
    let registry = DomainRegistry::builder()
        .domain(
            CategoricalParam::new("matrixInit.influence", ["random", "purposeful"])
                .stochastic(["random"]),
        )
        .build()
        .unwrap();
    let engine = engine(registry, 0.01);
    let x: ConfigurationVector = [("matrixInit.influence", "random")].into_iter().collect();
    let state = engine.initialise_at(x).unwrap();

    assert!(state.x().unwrap().inputs().repeated);
    let neighbor = state.points_for("matrixInit.influence").next().unwrap();
    assert!(!neighbor.inputs().repeated);

    let requests = state.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].repeated);
    assert!(!requests[1].repeated);
}
