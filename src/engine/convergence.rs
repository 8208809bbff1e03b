//! The convergence test.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::GradientAscent;
use crate::domain::DomainKind;
use crate::error::{Error, Result};
use crate::state::OptimizerState;

/// How domains pinned at a bound count toward convergence.
///
/// A numeric domain whose `x` sits at `max` with a positive slope cannot
/// improve further, so by default that slope is left out of the signal.
/// The mirror case at `min` is counted unless `skip_saturated_min` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConvergencePolicy {
    /// Ignore positive slopes of domains whose value equals `max`.
    pub skip_saturated_max: bool,
    /// Ignore negative slopes of domains whose value equals `min`.
    pub skip_saturated_min: bool,
}

impl ConvergencePolicy {
    /// Ignores saturated slopes at both bounds.
    #[must_use]
    pub fn symmetric() -> Self {
        Self {
            skip_saturated_max: true,
            skip_saturated_min: true,
        }
    }
}

impl Default for ConvergencePolicy {
    fn default() -> Self {
        Self {
            skip_saturated_max: true,
            skip_saturated_min: false,
        }
    }
}

impl GradientAscent {
    /// The improvement signal of a completed state.
    ///
    /// Square root of the sum of squared numeric slopes (minus saturated
    /// ones, per [`ConvergencePolicy`]) plus every positive performance
    /// delta of a boolean or categorical neighbor. The state is converged
    /// when this falls below the tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialised`] if the state has no `x`, or
    /// [`Error::NotFound`] if a neighbor names an undeclared domain.
    #[allow(clippy::cast_precision_loss)]
    pub fn improvement_signal(&self, state: &OptimizerState) -> Result<f64> {
        let x = &state.data_points()[state.x_index()?];
        let mut sum = 0.0;

        for point in state.gradient() {
            let path = point.id().path().ok_or(Error::Internal("neighbor without a path"))?;
            let domain = self.registry.resolve(path)?;
            let outputs = point.outputs();

            let bounds = match domain.kind() {
                DomainKind::Continuous(d) => Some((d.min, d.max)),
                DomainKind::Discrete(d) => Some((d.min as f64, d.max as f64)),
                DomainKind::Boolean | DomainKind::Categorical(_) => None,
            };

            match bounds {
                Some((min, max)) => {
                    let Some(slope) = outputs.slope else { continue };
                    let value = x.config().get(path).and_then(crate::ParamValue::as_f64);
                    let at_max = value.is_some_and(|v| v >= max);
                    let at_min = value.is_some_and(|v| v <= min);
                    if self.policy.skip_saturated_max && at_max && slope > 0.0 {
                        continue;
                    }
                    if self.policy.skip_saturated_min && at_min && slope < 0.0 {
                        continue;
                    }
                    sum += slope * slope;
                }
                None => {
                    if let Some(delta) = outputs.performance_delta
                        && delta > 0.0
                    {
                        sum += delta;
                    }
                }
            }
        }

        Ok(f64::sqrt(sum))
    }

    pub(crate) fn is_converged(&self, state: &OptimizerState) -> Result<bool> {
        let signal = self.improvement_signal(state)?;
        trace_debug!(signal, tolerance = self.tolerance, "convergence checked");
        Ok(signal < self.tolerance)
    }
}
