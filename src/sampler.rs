//! Initial-point sampling.

use parking_lot::Mutex;

use crate::domain::{DomainKind, ParameterDomain};
use crate::value::ParamValue;

/// Strategy for drawing the starting value of an optimised domain.
///
/// The trait requires `Send + Sync` so an engine can be shared across
/// threads.
pub trait Sampler: Send + Sync {
    /// Draws a value from `domain`. The value must lie inside the domain.
    fn sample(&self, domain: &ParameterDomain) -> ParamValue;
}

/// Draws starting points uniformly from each domain.
///
/// Continuous domains are drawn from `[min, max)`, discrete domains from
/// `[min, max]`, booleans by a fair coin flip and categories uniformly.
/// Seed it when an optimization run has to be replayed:
///
/// ```
/// use org_ascent::domain::{DiscreteParam, ParameterDomain};
/// use org_ascent::sampler::{RandomSampler, Sampler};
///
/// let spans: ParameterDomain = DiscreteParam::new("spans", 1, 10).into();
/// let a = RandomSampler::with_seed(3);
/// let b = RandomSampler::with_seed(3);
/// assert_eq!(a.sample(&spans), b.sample(&spans));
/// ```
#[derive(Default)]
pub struct RandomSampler {
    rng: Mutex<fastrand::Rng>,
}

impl RandomSampler {
    /// Seeded from the process-wide generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reproducible sequence of starting points for `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }
}

fn uniform(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

impl Sampler for RandomSampler {
    fn sample(&self, domain: &ParameterDomain) -> ParamValue {
        let mut rng = self.rng.lock();

        match domain.kind() {
            DomainKind::Continuous(d) => {
                // rounding can land on max + ulp for wide ranges
                let v = uniform(&mut rng, d.min, d.max).clamp(d.min, d.max);
                ParamValue::Float(v)
            }
            DomainKind::Discrete(d) => ParamValue::Int(rng.i64(d.min..=d.max)),
            DomainKind::Boolean => ParamValue::Bool(rng.bool()),
            DomainKind::Categorical(d) => match d.categories.len() {
                0 => domain.default_value().clone(),
                n => ParamValue::Categorical(d.categories[rng.usize(0..n)].clone()),
            },
        }
    }
}
