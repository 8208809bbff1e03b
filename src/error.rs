use crate::data_point::PointId;
use crate::hash::ConfigHash;
use crate::types::Status;

/// Errors returned by the optimizer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a domain declaration is malformed (bad bounds, step,
    /// categories, default, or a duplicate path).
    #[error("invalid domain '{path}': {reason}")]
    InvalidDomain {
        /// The dotted path of the offending domain.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Returned when a path does not name a declared domain.
    #[error("no domain declared for path '{0}'")]
    NotFound(String),

    /// Returned when a configuration value is missing, has the wrong type,
    /// or lies outside its domain.
    #[error("invalid configuration value for '{path}': {reason}")]
    InvalidConfiguration {
        /// The dotted path of the offending value.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Returned when the learning rate is not a positive finite number.
    #[error("invalid learning rate: {0} must be positive and finite")]
    InvalidLearningRate(f64),

    /// Returned when the convergence tolerance is not a positive finite number.
    #[error("invalid tolerance: {0} must be positive and finite")]
    InvalidTolerance(f64),

    /// Returned by `update` when no result was supplied for a requested
    /// configuration. The state is left untouched.
    #[error("missing evaluation result for data point '{id}' (hash {hash})")]
    MissingResult {
        /// The data point whose result is missing.
        id: PointId,
        /// The configuration hash that was requested.
        hash: ConfigHash,
    },

    /// Returned by `update` when an evaluation reported failure.
    #[error("evaluation failed for data point '{id}' (hash {hash})")]
    EvaluationFailed {
        /// The first data point whose evaluation failed.
        id: PointId,
        /// The configuration hash of that evaluation.
        hash: ConfigHash,
    },

    /// Returned when an operation needs an initialised, fully evaluated
    /// state and got something else.
    #[error("optimizer state is not initialised or not completed (status: {status})")]
    NotInitialised {
        /// The status the state was in.
        status: Status,
    },

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl Error {
    pub(crate) fn invalid_domain(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDomain {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_configuration(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
