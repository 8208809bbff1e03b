//! Optimizer state: `x` plus its gradient neighbors for one iteration.

use std::collections::HashSet;
use std::time::{Duration, SystemTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::data_point::{DataPoint, PointId};
use crate::error::{Error, Result};
use crate::evaluation::EvaluationRequest;
use crate::hash::ConfigHash;
use crate::types::Status;

/// One iteration of the optimizer.
///
/// A state is produced by [`GradientAscent::initialise`] or
/// [`GradientAscent::step`], filled in place by [`GradientAscent::update`],
/// and never shares data with other states, so it can be moved to another
/// thread or (with the `serde` feature) another process.
///
/// [`GradientAscent::initialise`]: crate::GradientAscent::initialise
/// [`GradientAscent::step`]: crate::GradientAscent::step
/// [`GradientAscent::update`]: crate::GradientAscent::update
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizerState {
    step_count: u64,
    status: Status,
    converged: bool,
    performance: Option<f64>,
    data_points: Vec<DataPoint>,
    started_at: SystemTime,
    ended_at: Option<SystemTime>,
    duration: Option<Duration>,
}

impl OptimizerState {
    pub(crate) fn new(step_count: u64, data_points: Vec<DataPoint>) -> Self {
        Self {
            step_count,
            status: Status::Pending,
            converged: false,
            performance: None,
            data_points,
            started_at: SystemTime::now(),
            ended_at: None,
            duration: None,
        }
    }

    /// Number of steps taken before this state; `0` after `initialise`.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Aggregate status over every data point.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the convergence test passed once the state completed.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Performance of `x`, once evaluated.
    #[must_use]
    pub fn performance(&self) -> Option<f64> {
        self.performance
    }

    /// `x` followed by its gradient neighbors.
    #[must_use]
    pub fn data_points(&self) -> &[DataPoint] {
        &self.data_points
    }

    /// The current best estimate.
    #[must_use]
    pub fn x(&self) -> Option<&DataPoint> {
        self.data_points.iter().find(|p| p.id().is_x())
    }

    /// Every gradient neighbor.
    pub fn gradient(&self) -> impl Iterator<Item = &DataPoint> {
        self.data_points.iter().filter(|p| !p.id().is_x())
    }

    /// The neighbors perturbing the domain at `path`.
    pub fn points_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a DataPoint> {
        self.data_points
            .iter()
            .filter(move |p| p.id().path() == Some(path))
    }

    /// The data point requesting the configuration with `hash`.
    #[must_use]
    pub fn data_point(&self, hash: ConfigHash) -> Option<&DataPoint> {
        self.data_points.iter().find(|p| p.hash() == hash)
    }

    /// When the state was created.
    #[must_use]
    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// When the state first became `Completed`.
    #[must_use]
    pub fn ended_at(&self) -> Option<SystemTime> {
        self.ended_at
    }

    /// Time from creation to completion.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Fraction of data points whose evaluation has completed, in `[0, 1]`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.data_points.is_empty() {
            return 0.0;
        }
        let done = self
            .data_points
            .iter()
            .filter(|p| p.status() == Status::Completed)
            .count();
        done as f64 / self.data_points.len() as f64
    }

    /// One evaluation request per distinct configuration, `x` first.
    #[must_use]
    pub fn requests(&self) -> Vec<EvaluationRequest> {
        let mut seen = HashSet::new();
        self.data_points
            .iter()
            .filter(|p| seen.insert(p.hash()))
            .map(|p| EvaluationRequest {
                hash: p.hash(),
                config: p.config().clone(),
                repeated: p.inputs().repeated,
            })
            .collect()
    }

    pub(crate) fn x_index(&self) -> Result<usize> {
        self.data_points
            .iter()
            .position(|p| *p.id() == PointId::X)
            .ok_or(Error::NotInitialised {
                status: self.status,
            })
    }

    pub(crate) fn data_points_mut(&mut self) -> &mut [DataPoint] {
        &mut self.data_points
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub(crate) fn set_performance(&mut self, performance: Option<f64>) {
        self.performance = performance;
    }

    pub(crate) fn set_converged(&mut self, converged: bool) {
        self.converged = converged;
    }

    /// Undoes completion after results were withdrawn.
    pub(crate) fn reopen(&mut self) {
        self.converged = false;
        self.ended_at = None;
        self.duration = None;
    }

    /// Stamps the completion time, once.
    pub(crate) fn mark_ended(&mut self) {
        if self.ended_at.is_some() {
            return;
        }
        let now = SystemTime::now();
        self.ended_at = Some(now);
        self.duration = Some(now.duration_since(self.started_at).unwrap_or_default());
    }
}
