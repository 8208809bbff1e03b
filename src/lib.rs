#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Finite-difference gradient ascent over mixed parameter domains, built to
//! tune organisation designs evaluated by an external simulation harness.
//!
//! The optimizer never runs a simulation itself. Each iteration is an
//! [`OptimizerState`]: the current best configuration `x` plus one neighbor
//! per tunable parameter. The caller evaluates every configuration, merges
//! the results back, and steps to the next state until it converges.
//!
//! # Getting Started
//!
//! ```
//! use org_ascent::domain::{CategoricalParam, ContinuousParam, DiscreteParam};
//! use org_ascent::prelude::*;
//!
//! let registry = DomainRegistry::builder()
//!     .domain(DiscreteParam::new("spans", 1, 8))
//!     .domain(ContinuousParam::new("gains.influence", 0.0, 1.0).step(0.1))
//!     .domain(CategoricalParam::new("graph", ["top-down", "teams"]))
//!     .build()
//!     .unwrap();
//!
//! let engine = GradientAscent::builder()
//!     .learning_rate(0.1)
//!     .seed(42)
//!     .build(registry)
//!     .unwrap();
//!
//! let outcome = engine
//!     .optimize(50, |request: &EvaluationRequest| {
//!         let c = &request.config;
//!         let spans = c.get("spans").and_then(ParamValue::as_f64).unwrap_or(0.0);
//!         let gain = c.get("gains.influence").and_then(ParamValue::as_f64).unwrap_or(0.0);
//!         let teams = c.get("graph").and_then(ParamValue::as_category) == Some("teams");
//!         Ok::<_, Error>(gain * 10.0 - (spans - 4.0).abs() + if teams { 1.0 } else { 0.0 })
//!     })
//!     .unwrap();
//!
//! println!("best: {:?}", outcome.state.x().map(|x| x.config()));
//! ```
//!
//! # Driving the engine by hand
//!
//! When evaluations run elsewhere (a job queue, another process), use the
//! state machine directly:
//!
//! 1. [`GradientAscent::initialise`] returns a pending state.
//! 2. [`OptimizerState::requests`] lists the configurations to evaluate.
//! 3. [`GradientAscent::update`] merges [`EvaluationResult`]s back; call it as
//!    often as results trickle in.
//! 4. Once the state is [`Status::Completed`], check
//!    [`OptimizerState::converged`] and call [`GradientAscent::step`].
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`DomainRegistry`] | The declared parameters: bounds, steps, categories, which are tuned. |
//! | [`ConfigurationVector`] | One value per declared parameter, with a stable [`ConfigHash`]. |
//! | [`OptimizerState`] | One iteration: `x` and its gradient neighbors as [`DataPoint`]s. |
//! | [`GradientAscent`] | Builds, merges into and steps states. |
//! | [`Evaluator`] | In-process evaluation for [`GradientAscent::optimize`]. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on public types, [`ConfigurationVector::to_nested_json`] | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at key optimization points | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod config;
mod data_point;
pub mod domain;
mod engine;
mod error;
mod evaluation;
pub mod evaluator;
mod hash;
pub mod presets;
mod registry;
pub mod sampler;
mod state;
mod types;
mod value;

pub use config::ConfigurationVector;
pub use data_point::{DataPoint, DataPointInputs, DataPointOutputs, PointId};
pub use engine::{ConvergencePolicy, GradientAscent, GradientAscentBuilder, OptimizationOutcome};
pub use error::{Error, Result};
pub use evaluation::{EvaluationRequest, EvaluationResult};
pub use evaluator::Evaluator;
pub use hash::ConfigHash;
pub use registry::{DomainRegistry, DomainRegistryBuilder};
pub use state::OptimizerState;
pub use types::Status;
pub use value::ParamValue;

/// Convenient wildcard import for the most common types.
///
/// ```
/// use org_ascent::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::ConfigurationVector;
    pub use crate::domain::{
        BooleanParam, CategoricalParam, ContinuousParam, DiscreteParam, DomainKind,
        ParameterDomain,
    };
    pub use crate::engine::{
        ConvergencePolicy, GradientAscent, GradientAscentBuilder, OptimizationOutcome,
    };
    pub use crate::error::{Error, Result};
    pub use crate::evaluation::{EvaluationRequest, EvaluationResult};
    pub use crate::evaluator::Evaluator;
    pub use crate::registry::DomainRegistry;
    pub use crate::sampler::{RandomSampler, Sampler};
    pub use crate::state::OptimizerState;
    pub use crate::types::Status;
    pub use crate::value::ParamValue;
}
