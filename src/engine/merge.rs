//! Folding evaluation results into a state.

use std::collections::HashMap;

use super::GradientAscent;
use crate::domain::ParameterDomain;
use crate::error::{Error, Result};
use crate::evaluation::EvaluationResult;
use crate::hash::ConfigHash;
use crate::state::OptimizerState;
use crate::types::Status;

impl GradientAscent {
    /// Merges evaluation results into `state` and returns its new aggregate
    /// status.
    ///
    /// Results are matched to data points by configuration hash; extra
    /// results are ignored and, for duplicated hashes, the first one wins.
    /// Metrics are derived only from completed results: `x`'s performance,
    /// then each neighbor's performance delta and slope. Once every point has
    /// completed, the convergence test runs and the end time is stamped.
    ///
    /// Applying the same results twice leaves the state as after the first
    /// application. Every derived field reflects the latest result set, so a
    /// completed state merged with unfinished results is no longer converged
    /// or ended.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingResult`] if any data point has no result; the state
    ///   is left untouched.
    /// - [`Error::EvaluationFailed`] if any result failed; point statuses are
    ///   recorded and the state is marked `Failed`.
    pub fn update(&self, state: &mut OptimizerState, results: &[EvaluationResult]) -> Result<Status> {
        let x_index = state.x_index()?;

        let mut by_hash: HashMap<ConfigHash, &EvaluationResult> = HashMap::with_capacity(results.len());
        for result in results {
            by_hash.entry(result.hash).or_insert(result);
        }

        // Resolve everything before touching the state.
        let matched = state
            .data_points()
            .iter()
            .map(|p| {
                by_hash.get(&p.hash()).copied().ok_or_else(|| Error::MissingResult {
                    id: p.id().clone(),
                    hash: p.hash(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let domains = state
            .data_points()
            .iter()
            .map(|p| p.id().path().map(|path| self.registry.resolve(path)).transpose())
            .collect::<Result<Vec<Option<&ParameterDomain>>>>()?;

        for (point, result) in state.data_points_mut().iter_mut().zip(&matched) {
            point.set_status(result.status);
        }

        let status = Status::aggregate(matched.iter().map(|r| r.status));
        if status == Status::Failed {
            state.set_status(Status::Failed);
            let failed = state
                .data_points()
                .iter()
                .find(|p| p.status() == Status::Failed)
                .ok_or(Error::Internal("failed status without a failed point"))?;
            trace_info!(id = %failed.id(), hash = %failed.hash(), "evaluation failed");
            return Err(Error::EvaluationFailed {
                id: failed.id().clone(),
                hash: failed.hash(),
            });
        }

        let x_result = matched[x_index];
        let x_performance =
            (x_result.status == Status::Completed).then_some(x_result.avg_performance);
        state.data_points_mut()[x_index].outputs_mut().performance = x_performance;
        state.set_performance(x_performance);
        let x_config = state.data_points()[x_index].config().clone();

        for (i, (result, domain)) in matched.iter().zip(&domains).enumerate() {
            let Some(domain) = domain else { continue };
            let outputs = state.data_points_mut()[i].outputs_mut();
            outputs.clear_metrics();
            if result.status != Status::Completed {
                continue;
            }
            outputs.performance = Some(result.avg_performance);

            let Some(baseline) = x_performance else { continue };
            let delta = result.avg_performance - baseline;
            outputs.performance_delta = Some(delta);
            outputs.slope = outputs.x_delta.filter(|dx| *dx != 0.0).map(|dx| delta / dx);
            if !domain.kind().is_numeric() {
                outputs.chosen_value = if delta > 0.0 {
                    outputs.x_plus_delta.clone()
                } else {
                    x_config.get(domain.path()).cloned()
                };
            }
        }

        state.set_status(status);
        if status == Status::Completed {
            let converged = self.is_converged(state)?;
            state.set_converged(converged);
            state.mark_ended();
            trace_info!(
                step = state.step_count(),
                performance = ?state.performance(),
                converged,
                "optimizer state completed"
            );
        } else {
            state.reopen();
            trace_debug!(status = %status, progress = state.progress(), "results merged");
        }

        Ok(status)
    }
}
