//! The [`Evaluator`] trait connects the optimizer to a simulation harness.
//!
//! For simple evaluations, pass a closure directly to
//! [`GradientAscent::optimize`](crate::GradientAscent::optimize):
//!
//! ```
//! use org_ascent::domain::ContinuousParam;
//! use org_ascent::{DomainRegistry, EvaluationRequest, GradientAscent};
//!
//! let registry = DomainRegistry::builder()
//!     .domain(ContinuousParam::new("gain", 0.0, 1.0).step(0.05))
//!     .build()
//!     .unwrap();
//! let engine = GradientAscent::builder()
//!     .learning_rate(0.05)
//!     .seed(3)
//!     .build(registry)
//!     .unwrap();
//!
//! let outcome = engine
//!     .optimize(100, |request: &EvaluationRequest| {
//!         let gain = request.config.get("gain").and_then(|v| v.as_f64()).unwrap_or(0.0);
//!         Ok::<_, String>(20.0 * gain)
//!     })
//!     .unwrap();
//!
//! let best = outcome.state.x().unwrap().config().get("gain").unwrap().as_f64().unwrap();
//! assert!((best - 1.0).abs() < 1e-9);
//! ```
//!
//! For early stopping or retries, implement [`Evaluator`] on a struct:
//!
//! ```
//! use std::ops::ControlFlow;
//!
//! use org_ascent::domain::DiscreteParam;
//! use org_ascent::{DomainRegistry, EvaluationRequest, Evaluator, GradientAscent, OptimizerState};
//!
//! struct Headcount {
//!     target: f64,
//! }
//!
//! impl Evaluator for Headcount {
//!     type Error = String;
//!
//!     fn evaluate(&self, request: &EvaluationRequest) -> Result<f64, String> {
//!         let spans = request.config.get("spans").and_then(|v| v.as_f64()).ok_or("no spans")?;
//!         Ok(spans * 100.0)
//!     }
//!
//!     fn after_step(&self, state: &OptimizerState) -> ControlFlow<()> {
//!         if state.performance().unwrap_or(0.0) >= self.target {
//!             ControlFlow::Break(())
//!         } else {
//!             ControlFlow::Continue(())
//!         }
//!     }
//! }
//!
//! let registry = DomainRegistry::builder()
//!     .domain(DiscreteParam::new("spans", 1, 10))
//!     .build()
//!     .unwrap();
//! let engine = GradientAscent::builder().learning_rate(0.01).build(registry).unwrap();
//! let outcome = engine.optimize(50, Headcount { target: 500.0 }).unwrap();
//! assert!(outcome.state.performance().unwrap() >= 500.0);
//! ```

use core::ops::ControlFlow;

use crate::evaluation::EvaluationRequest;
use crate::state::OptimizerState;

/// Evaluates configurations on behalf of the optimization driver.
///
/// The only required method is [`evaluate`](Evaluator::evaluate). The
/// optional hooks provide early stopping
/// ([`after_step`](Evaluator::after_step)) and retries of failed
/// evaluations ([`max_retries`](Evaluator::max_retries)).
///
/// Every `Fn(&EvaluationRequest) -> Result<f64, E>` closure is an
/// evaluator.
pub trait Evaluator {
    /// The error type returned by [`evaluate`](Evaluator::evaluate).
    type Error: ToString;

    /// Evaluates one configuration and returns its average performance.
    ///
    /// When `request.repeated` is set the configuration is stochastic and
    /// the returned value should average several runs.
    ///
    /// # Errors
    ///
    /// Any error whose type implements `ToString`. Once retries are
    /// exhausted the evaluation is reported as failed.
    fn evaluate(&self, request: &EvaluationRequest) -> Result<f64, Self::Error>;

    /// Called after each state completes, before the next step.
    ///
    /// Return `ControlFlow::Break(())` to stop the optimization loop.
    ///
    /// Default: always continues.
    fn after_step(&self, _state: &OptimizerState) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Maximum number of retries for a failed evaluation. Default: `0`.
    fn max_retries(&self) -> usize {
        0
    }
}

impl<F, E> Evaluator for F
where
    F: Fn(&EvaluationRequest) -> Result<f64, E>,
    E: ToString,
{
    type Error = E;

    fn evaluate(&self, request: &EvaluationRequest) -> Result<f64, E> {
        self(request)
    }
}
