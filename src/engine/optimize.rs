//! A synchronous driver for in-process evaluators.

use std::collections::HashMap;

use super::GradientAscent;
use crate::error::Result;
use crate::evaluation::{EvaluationRequest, EvaluationResult};
use crate::evaluator::Evaluator;
use crate::hash::ConfigHash;
use crate::state::OptimizerState;
use crate::types::Status;

/// What [`GradientAscent::optimize`] ran into.
#[derive(Clone, Debug)]
pub struct OptimizationOutcome {
    /// The last state; completed unless the iteration budget was zero.
    pub state: OptimizerState,
    /// Number of states evaluated.
    pub iterations: usize,
    /// Whether the last state passed the convergence test.
    pub converged: bool,
}

impl GradientAscent {
    /// Runs initialise, evaluate, update and step until the state converges,
    /// `max_iterations` states have been evaluated, or the evaluator's
    /// [`after_step`](Evaluator::after_step) hook breaks.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`initialise`](Self::initialise),
    /// [`update`](Self::update) (including [`Error::EvaluationFailed`] once
    /// retries are exhausted) and [`step`](Self::step).
    ///
    /// [`Error::EvaluationFailed`]: crate::Error::EvaluationFailed
    pub fn optimize<E: Evaluator>(
        &self,
        max_iterations: usize,
        evaluator: E,
    ) -> Result<OptimizationOutcome> {
        let state = self.initialise()?;
        self.optimize_from(state, max_iterations, evaluator)
    }

    /// Like [`optimize`](Self::optimize), but continues from an existing
    /// state, such as one built by [`initialise_at`](Self::initialise_at) or
    /// one loaded from disk.
    ///
    /// A state that has already completed is not evaluated again.
    ///
    /// # Errors
    ///
    /// See [`optimize`](Self::optimize).
    pub fn optimize_from<E: Evaluator>(
        &self,
        mut state: OptimizerState,
        max_iterations: usize,
        evaluator: E,
    ) -> Result<OptimizationOutcome> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("optimize", max_iterations).entered();

        let mut cache: HashMap<ConfigHash, f64> = HashMap::new();
        let mut iterations = 0;

        while iterations < max_iterations {
            if state.status() != Status::Completed {
                let results: Vec<EvaluationResult> = state
                    .requests()
                    .iter()
                    .map(|request| evaluate_cached(&evaluator, request, &mut cache))
                    .collect();
                self.update(&mut state, &results)?;
                iterations += 1;
            }

            if state.converged()
                || iterations >= max_iterations
                || evaluator.after_step(&state).is_break()
            {
                break;
            }
            state = self.step(&state)?;
        }

        trace_info!(
            iterations,
            converged = state.converged(),
            performance = ?state.performance(),
            "optimization finished"
        );

        Ok(OptimizationOutcome {
            converged: state.converged(),
            state,
            iterations,
        })
    }
}

/// Evaluates `request`, reusing an earlier completed result for the same
/// configuration.
fn evaluate_cached<E: Evaluator>(
    evaluator: &E,
    request: &EvaluationRequest,
    cache: &mut HashMap<ConfigHash, f64>,
) -> EvaluationResult {
    if let Some(&performance) = cache.get(&request.hash) {
        return EvaluationResult::completed(request.hash, performance);
    }

    for _ in 0..=evaluator.max_retries() {
        match evaluator.evaluate(request) {
            Ok(performance) => {
                cache.insert(request.hash, performance);
                return EvaluationResult::completed(request.hash, performance);
            }
            Err(e) => {
                trace_debug!(hash = %request.hash, error = %e.to_string(), "evaluation failed");
                #[cfg(not(feature = "tracing"))]
                drop(e);
            }
        }
    }
    EvaluationResult::failed(request.hash)
}
