//! Data points: one configuration with its evaluation status and metrics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ConfigurationVector;
use crate::hash::ConfigHash;
use crate::types::Status;
use crate::value::ParamValue;

/// Identifies a data point within an [`OptimizerState`](crate::OptimizerState).
///
/// The current best estimate is `X`; every gradient neighbor is identified
/// by the path of the domain it perturbs. Categorical domains produce several
/// neighbors sharing one id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointId {
    /// The current best estimate.
    X,
    /// A neighbor perturbing the domain at this path.
    Domain(String),
}

impl PointId {
    /// Returns `true` for the current best estimate.
    #[must_use]
    pub fn is_x(&self) -> bool {
        matches!(self, PointId::X)
    }

    /// The perturbed domain path, or `None` for `x`.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            PointId::X => None,
            PointId::Domain(path) => Some(path),
        }
    }
}

impl core::fmt::Display for PointId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PointId::X => f.write_str("x"),
            PointId::Domain(path) => f.write_str(path),
        }
    }
}

/// What was requested: the configuration and its content hash.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataPointInputs {
    /// The full configuration to evaluate.
    pub config: ConfigurationVector,
    /// Content hash of `config`.
    pub hash: ConfigHash,
    /// Whether `config` selects a stochastic category, so the harness should
    /// average several simulation runs.
    pub repeated: bool,
}

/// Metrics filled in as results are merged.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataPointOutputs {
    /// Average performance reported by the harness.
    pub performance: Option<f64>,
    /// `performance - x.performance`; unset for `x` itself.
    pub performance_delta: Option<f64>,
    /// Signed size of the perturbation (numeric and boolean domains).
    pub x_delta: Option<f64>,
    /// The perturbed field's value in this point's configuration.
    pub x_plus_delta: Option<ParamValue>,
    /// `performance_delta / x_delta` when `x_delta` is non-zero.
    pub slope: Option<f64>,
    /// For boolean and categorical neighbors: the value the next step should
    /// pick, i.e. the alternative if it beat `x`, otherwise `x`'s own value.
    pub chosen_value: Option<ParamValue>,
}

impl DataPointOutputs {
    /// Drops everything derived from a result, keeping the perturbation.
    pub(crate) fn clear_metrics(&mut self) {
        self.performance = None;
        self.performance_delta = None;
        self.slope = None;
        self.chosen_value = None;
    }
}

/// One configuration together with its evaluation status and metrics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataPoint {
    id: PointId,
    inputs: DataPointInputs,
    status: Status,
    outputs: DataPointOutputs,
}

impl DataPoint {
    pub(crate) fn x(config: ConfigurationVector, repeated: bool) -> Self {
        Self::pending(PointId::X, config, repeated, DataPointOutputs::default())
    }

    pub(crate) fn neighbor(
        path: &str,
        config: ConfigurationVector,
        x_delta: Option<f64>,
        x_plus_delta: ParamValue,
        repeated: bool,
    ) -> Self {
        let outputs = DataPointOutputs {
            x_delta,
            x_plus_delta: Some(x_plus_delta),
            ..DataPointOutputs::default()
        };
        Self::pending(PointId::Domain(path.to_string()), config, repeated, outputs)
    }

    fn pending(
        id: PointId,
        config: ConfigurationVector,
        repeated: bool,
        outputs: DataPointOutputs,
    ) -> Self {
        let hash = config.hash();
        Self {
            id,
            inputs: DataPointInputs {
                config,
                hash,
                repeated,
            },
            status: Status::Pending,
            outputs,
        }
    }

    /// `x` or the perturbed domain path.
    #[must_use]
    pub fn id(&self) -> &PointId {
        &self.id
    }

    /// The requested configuration and its hash.
    #[must_use]
    pub fn inputs(&self) -> &DataPointInputs {
        &self.inputs
    }

    /// Shorthand for `inputs().config`.
    #[must_use]
    pub fn config(&self) -> &ConfigurationVector {
        &self.inputs.config
    }

    /// Shorthand for `inputs().hash`.
    #[must_use]
    pub fn hash(&self) -> ConfigHash {
        self.inputs.hash
    }

    /// Evaluation status of this point.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Metrics merged so far.
    #[must_use]
    pub fn outputs(&self) -> &DataPointOutputs {
        &self.outputs
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub(crate) fn outputs_mut(&mut self) -> &mut DataPointOutputs {
        &mut self.outputs
    }
}
