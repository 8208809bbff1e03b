//! The gradient-ascent step engine.

use crate::config::ConfigurationVector;
use crate::data_point::DataPoint;
use crate::domain::DomainKind;
use crate::error::{Error, Result};
use crate::registry::DomainRegistry;
use crate::sampler::Sampler;
use crate::state::OptimizerState;
use crate::types::Status;
use crate::value::ParamValue;

mod builder;
mod convergence;
mod gradient;
mod merge;
mod optimize;

pub use builder::GradientAscentBuilder;
pub use convergence::ConvergencePolicy;
pub use optimize::OptimizationOutcome;

/// Finite-difference gradient ascent over a [`DomainRegistry`].
///
/// The engine itself is synchronous and never performs I/O. It hands out
/// [`OptimizerState`] values whose data points are evaluation requests; the
/// caller evaluates them however it likes, feeds the results back through
/// [`update`](Self::update), and asks for the next iteration with
/// [`step`](Self::step).
///
/// # Examples
///
/// ```
/// use org_ascent::domain::ContinuousParam;
/// use org_ascent::{DomainRegistry, EvaluationResult, GradientAscent, Status};
///
/// let registry = DomainRegistry::builder()
///     .domain(ContinuousParam::new("gain", 0.0, 1.0).step(0.1))
///     .build()
///     .unwrap();
/// let engine = GradientAscent::builder()
///     .learning_rate(0.05)
///     .seed(7)
///     .build(registry)
///     .unwrap();
///
/// let mut state = engine.initialise().unwrap();
/// let results: Vec<_> = state
///     .requests()
///     .iter()
///     .map(|r| {
///         let gain = r.config.get("gain").and_then(|v| v.as_f64()).unwrap();
///         EvaluationResult::completed(r.hash, 10.0 * gain)
///     })
///     .collect();
///
/// assert_eq!(engine.update(&mut state, &results).unwrap(), Status::Completed);
/// let next = engine.step(&state).unwrap();
/// assert_eq!(next.step_count(), 1);
/// ```
pub struct GradientAscent {
    registry: DomainRegistry,
    learning_rate: f64,
    tolerance: f64,
    policy: ConvergencePolicy,
    sampler: Box<dyn Sampler>,
}

impl GradientAscent {
    /// Creates an engine with default settings (learning rate `0.01`,
    /// tolerance `1e-4`, unseeded random initialisation).
    #[must_use]
    pub fn new(registry: DomainRegistry) -> Self {
        Self {
            registry,
            learning_rate: builder::DEFAULT_LEARNING_RATE,
            tolerance: builder::DEFAULT_TOLERANCE,
            policy: ConvergencePolicy::default(),
            sampler: Box::new(crate::sampler::RandomSampler::new()),
        }
    }

    /// Returns a [`GradientAscentBuilder`] for configuring the engine.
    #[must_use]
    pub fn builder() -> GradientAscentBuilder {
        GradientAscentBuilder::new()
    }

    /// The declared domains.
    #[must_use]
    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    /// Multiplier applied to slopes when moving numeric domains.
    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Threshold on the improvement signal below which a state converges.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Boundary handling in the convergence test.
    #[must_use]
    pub fn convergence_policy(&self) -> ConvergencePolicy {
        self.policy
    }

    /// Creates the first state from a random point in the domain space.
    ///
    /// Fixed domains take their default; optimised domains are drawn by the
    /// configured [`Sampler`].
    ///
    /// # Errors
    ///
    /// Returns an error if the sampler produces a value outside its domain.
    pub fn initialise(&self) -> Result<OptimizerState> {
        let x: ConfigurationVector = self
            .registry
            .iter()
            .map(|d| {
                let value = if d.optimise() {
                    self.sampler.sample(d)
                } else {
                    d.default_value().clone()
                };
                (d.path(), value)
            })
            .collect();
        self.registry.validate_configuration(&x)?;
        self.assemble(x, 0)
    }

    /// Creates the first state from a caller-chosen starting point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::InvalidConfiguration`] if
    /// `x` does not fit the registry, including a fixed domain holding
    /// anything but its default.
    pub fn initialise_at(&self, x: ConfigurationVector) -> Result<OptimizerState> {
        self.registry.validate_configuration(&x)?;
        for domain in self.registry.iter().filter(|d| !d.optimise()) {
            if x.get(domain.path()) != Some(domain.default_value()) {
                return Err(Error::invalid_configuration(
                    domain.path(),
                    "fixed domain must hold its default",
                ));
            }
        }
        self.assemble(x, 0)
    }

    /// Produces the next state from a completed one.
    ///
    /// Numeric domains move by `slope × learning_rate`, clamped to their
    /// bounds (and rounded for discrete domains); a missing or zero slope
    /// leaves the value unchanged. Boolean and categorical domains switch to
    /// the best alternative that strictly beat `x`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialised`] unless `state` is `Completed`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn step(&self, state: &OptimizerState) -> Result<OptimizerState> {
        if state.status() != Status::Completed {
            return Err(Error::NotInitialised {
                status: state.status(),
            });
        }
        let x = &state.data_points()[state.x_index()?];
        let x_performance = x.outputs().performance;
        let mut next = x.config().clone();

        for domain in self.registry.optimised() {
            let path = domain.path();
            let current = next
                .get(path)
                .ok_or_else(|| Error::invalid_configuration(path, "value is missing"))?;
            let slope = state
                .points_for(path)
                .find_map(|p| p.outputs().slope)
                .filter(|s| s.is_finite() && *s != 0.0);

            let moved = match (domain.kind(), current) {
                (DomainKind::Continuous(d), ParamValue::Float(v)) => slope
                    .map(|s| ParamValue::Float((v + s * self.learning_rate).clamp(d.min, d.max))),
                (DomainKind::Discrete(d), ParamValue::Int(v)) => slope.map(|s| {
                    let raw = (*v as f64 + s * self.learning_rate).round();
                    ParamValue::Int(raw.clamp(d.min as f64, d.max as f64) as i64)
                }),
                (DomainKind::Boolean | DomainKind::Categorical(_), _) => {
                    best_alternative(state, path, x_performance)
                }
                _ => {
                    return Err(Error::invalid_configuration(
                        path,
                        format!("unexpected {} value", current.type_name()),
                    ));
                }
            };
            if let Some(value) = moved {
                next = next.with(path, value);
            }
        }

        let next_state = self.assemble(next, state.step_count() + 1)?;
        trace_info!(
            step = next_state.step_count(),
            points = next_state.data_points().len(),
            "optimizer stepped"
        );
        Ok(next_state)
    }

    /// Builds a pending state around `x`.
    fn assemble(&self, x: ConfigurationVector, step_count: u64) -> Result<OptimizerState> {
        let mut points = vec![DataPoint::x(x.clone(), self.is_repeated(&x))];
        points.extend(self.gradient_points(&x)?);
        let state = OptimizerState::new(step_count, points);
        trace_debug!(
            step = step_count,
            points = state.data_points().len(),
            "optimizer state assembled"
        );
        Ok(state)
    }

    /// Whether `config` selects any stochastic category.
    fn is_repeated(&self, config: &ConfigurationVector) -> bool {
        self.registry.iter().any(|d| {
            config
                .get(d.path())
                .is_some_and(|value| d.is_stochastic(value))
        })
    }
}

/// The alternative value with the highest performance strictly above `x`'s.
fn best_alternative(
    state: &OptimizerState,
    path: &str,
    x_performance: Option<f64>,
) -> Option<ParamValue> {
    let baseline = x_performance?;
    state
        .points_for(path)
        .filter_map(|p| {
            let performance = p.outputs().performance?;
            (performance > baseline).then_some((performance, p.outputs().x_plus_delta.as_ref()?))
        })
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, value)| value.clone())
}

impl core::fmt::Debug for GradientAscent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GradientAscent")
            .field("domains", &self.registry.len())
            .field("learning_rate", &self.learning_rate)
            .field("tolerance", &self.tolerance)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
