//! The request/response contract with the external simulation harness.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ConfigurationVector;
use crate::hash::ConfigHash;
use crate::types::Status;

/// A configuration the harness should evaluate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvaluationRequest {
    /// Content hash; the matching [`EvaluationResult`] must carry it.
    pub hash: ConfigHash,
    /// The configuration to hand to the configurator.
    pub config: ConfigurationVector,
    /// Whether the configuration is stochastic and should be averaged over
    /// several simulation runs.
    pub repeated: bool,
}

/// The harness's answer for one requested configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvaluationResult {
    /// Hash of the evaluated configuration.
    pub hash: ConfigHash,
    /// Where the evaluation is in its lifecycle.
    pub status: Status,
    /// Performance averaged over every run of the configuration. Only read
    /// when `status` is [`Status::Completed`].
    pub avg_performance: f64,
}

impl EvaluationResult {
    /// A finished evaluation.
    #[must_use]
    pub fn completed(hash: ConfigHash, avg_performance: f64) -> Self {
        Self {
            hash,
            status: Status::Completed,
            avg_performance,
        }
    }

    /// An evaluation still in progress.
    #[must_use]
    pub fn running(hash: ConfigHash) -> Self {
        Self {
            hash,
            status: Status::Running,
            avg_performance: 0.0,
        }
    }

    /// An evaluation not yet started.
    #[must_use]
    pub fn pending(hash: ConfigHash) -> Self {
        Self {
            hash,
            status: Status::Pending,
            avg_performance: 0.0,
        }
    }

    /// A failed evaluation.
    #[must_use]
    pub fn failed(hash: ConfigHash) -> Self {
        Self {
            hash,
            status: Status::Failed,
            avg_performance: 0.0,
        }
    }
}
