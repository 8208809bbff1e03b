use super::{ConvergencePolicy, GradientAscent};
use crate::error::{Error, Result};
use crate::registry::DomainRegistry;
use crate::sampler::{RandomSampler, Sampler};

pub(super) const DEFAULT_LEARNING_RATE: f64 = 0.01;
pub(super) const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Builder for [`GradientAscent`].
///
/// # Examples
///
/// ```
/// use org_ascent::domain::DiscreteParam;
/// use org_ascent::{ConvergencePolicy, DomainRegistry, GradientAscent};
///
/// let registry = DomainRegistry::builder()
///     .domain(DiscreteParam::new("layers", 1, 6))
///     .build()
///     .unwrap();
///
/// let engine = GradientAscent::builder()
///     .learning_rate(0.5)
///     .tolerance(1e-3)
///     .convergence_policy(ConvergencePolicy::symmetric())
///     .seed(42)
///     .build(registry)
///     .unwrap();
/// assert_eq!(engine.learning_rate(), 0.5);
/// ```
pub struct GradientAscentBuilder {
    learning_rate: f64,
    tolerance: f64,
    policy: ConvergencePolicy,
    sampler: Option<Box<dyn Sampler>>,
    seed: Option<u64>,
}

impl GradientAscentBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            tolerance: DEFAULT_TOLERANCE,
            policy: ConvergencePolicy::default(),
            sampler: None,
            seed: None,
        }
    }

    /// Sets the multiplier applied to slopes. Default: `0.01`.
    #[must_use]
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the convergence threshold. Default: `1e-4`.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets how saturated domains count toward convergence.
    #[must_use]
    pub fn convergence_policy(mut self, policy: ConvergencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Seeds the default [`RandomSampler`]. Ignored when a custom sampler is
    /// set.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the sampler used by [`GradientAscent::initialise`].
    #[must_use]
    pub fn sampler(mut self, sampler: impl Sampler + 'static) -> Self {
        self.sampler = Some(Box::new(sampler));
        self
    }

    /// Builds the engine over `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLearningRate`] or [`Error::InvalidTolerance`]
    /// if either setting is not a positive finite number.
    pub fn build(self, registry: DomainRegistry) -> Result<GradientAscent> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidLearningRate(self.learning_rate));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidTolerance(self.tolerance));
        }

        let sampler: Box<dyn Sampler> = match (self.sampler, self.seed) {
            (Some(sampler), _) => sampler,
            (None, Some(seed)) => Box::new(RandomSampler::with_seed(seed)),
            (None, None) => Box::new(RandomSampler::new()),
        };

        trace_info!(
            domains = registry.len(),
            learning_rate = self.learning_rate,
            tolerance = self.tolerance,
            "gradient ascent engine built"
        );

        Ok(GradientAscent {
            registry,
            learning_rate: self.learning_rate,
            tolerance: self.tolerance,
            policy: self.policy,
            sampler,
        })
    }
}

impl Default for GradientAscentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for GradientAscentBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GradientAscentBuilder")
            .field("learning_rate", &self.learning_rate)
            .field("tolerance", &self.tolerance)
            .field("policy", &self.policy)
            .field("seed", &self.seed)
            .field("custom_sampler", &self.sampler.is_some())
            .finish()
    }
}
