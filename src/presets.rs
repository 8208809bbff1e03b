//! The organisation-design domain space as a ready-made registry.
//!
//! [`OrganisationSpace`] declares the parameters of the organisation model:
//! structure (`spans`, `layers`), the three behavioural gains, the action
//! state probability, the reporting graph, the matrix initialisation of each
//! gain and the board and reporting settings. Its fields choose bounds,
//! steps and which parameters are tuned; [`OrganisationSpace::registry`]
//! turns it into a [`DomainRegistry`].
//!
//! ```
//! use org_ascent::presets::{OrganisationSpace, paths};
//!
//! let registry = OrganisationSpace::default().registry().unwrap();
//! assert!(registry.resolve(paths::INFLUENCE_GAIN).unwrap().optimise());
//! assert!(!registry.resolve(paths::UNIT_PRICE).unwrap().optimise());
//! ```

use crate::domain::{BooleanParam, CategoricalParam, ContinuousParam, DiscreteParam};
use crate::error::Result;
use crate::registry::DomainRegistry;

/// Dotted paths of the organisation parameters.
pub mod paths {
    /// Span of control of every manager.
    pub const SPANS: &str = "spans";
    /// Number of management layers.
    pub const LAYERS: &str = "layers";
    /// Weight of peer influence on an agent's action.
    pub const INFLUENCE_GAIN: &str = "gains.influence";
    /// Weight of an agent's own judgment.
    pub const JUDGMENT_GAIN: &str = "gains.judgment";
    /// Weight of the incentive signal.
    pub const INCENTIVE_GAIN: &str = "gains.incentive";
    /// Probability that an action resolves to the favourable state.
    pub const ACTION_STATE_PROBABILITY: &str = "actionStateProbability";
    /// Reporting graph shape.
    pub const GRAPH: &str = "graph";
    /// Initialisation of the influence matrix.
    pub const INFLUENCE_MATRIX_INIT: &str = "matrixInit.influence";
    /// Initialisation of the judgment matrix.
    pub const JUDGMENT_MATRIX_INIT: &str = "matrixInit.judgment";
    /// Initialisation of the incentive matrix.
    pub const INCENTIVE_MATRIX_INIT: &str = "matrixInit.incentive";
    /// Whether the board intervenes every control step.
    pub const BOARD_CONTROL_STEP: &str = "board.controlStep";
    /// Cost of one unit of payroll.
    pub const UNIT_PAYROLL: &str = "reporting.unitPayroll";
    /// Revenue of one unit of output.
    pub const UNIT_PRICE: &str = "reporting.unitPrice";
}

/// Strict top-down reporting lines.
pub const GRAPH_TOP_DOWN: &str = "top-down";
/// Cross-functional teams.
pub const GRAPH_TEAMS: &str = "teams";

/// No matrix; the gain is disabled.
pub const INIT_NULL: &str = "null";
/// Random weights. Makes an evaluation stochastic.
pub const INIT_RANDOM: &str = "random";
/// Half random, half purposeful.
pub const INIT_HYBRID: &str = "hybrid";
/// Weights derived from the reporting structure.
pub const INIT_PURPOSEFUL: &str = "purposeful";

const MATRIX_INITS: [&str; 4] = [INIT_NULL, INIT_RANDOM, INIT_HYBRID, INIT_PURPOSEFUL];

/// Inclusive bounds and neighbor step of a numeric parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<T> {
    /// Lowest allowed value.
    pub min: T,
    /// Highest allowed value.
    pub max: T,
    /// Neighbor distance.
    pub step: T,
}

impl<T> Bounds<T> {
    /// Shorthand constructor.
    #[must_use]
    pub const fn new(min: T, max: T, step: T) -> Self {
        Self { min, max, step }
    }
}

/// Matrix initialisation of each gain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixInit {
    /// Influence matrix initialisation.
    pub influence: String,
    /// Judgment matrix initialisation.
    pub judgment: String,
    /// Incentive matrix initialisation.
    pub incentive: String,
}

impl Default for MatrixInit {
    fn default() -> Self {
        Self {
            influence: INIT_PURPOSEFUL.to_string(),
            judgment: INIT_RANDOM.to_string(),
            incentive: INIT_PURPOSEFUL.to_string(),
        }
    }
}

/// Which organisation parameters are tuned, and over what range.
///
/// By default the structure, the gains, the action state probability and
/// the graph are tuned; matrix initialisation, the board flag and the
/// reporting units stay at their defaults.
#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct OrganisationSpace {
    /// Span of control.
    pub spans: Bounds<i64>,
    /// Span of control used when `spans` is not tuned.
    pub default_spans: i64,
    /// Management layers.
    pub layers: Bounds<i64>,
    /// Layers used when `layers` is not tuned.
    pub default_layers: i64,
    /// Whether `spans` and `layers` are tuned.
    pub optimise_structure: bool,
    /// Influence gain.
    pub influence_gain: Bounds<f64>,
    /// Judgment gain.
    pub judgment_gain: Bounds<f64>,
    /// Incentive gain.
    pub incentive_gain: Bounds<f64>,
    /// Action state probability; must stay strictly inside `(0, 1)`.
    pub action_state_probability: Bounds<f64>,
    /// Probability used when it is not tuned.
    pub default_action_state_probability: f64,
    /// Whether the action state probability is tuned.
    pub optimise_action_state_probability: bool,
    /// Whether the graph shape is tuned.
    pub optimise_graph: bool,
    /// Matrix initialisation used when it is not tuned.
    pub matrix_init: MatrixInit,
    /// Whether matrix initialisation is tuned.
    pub optimise_matrix_init: bool,
    /// Board control step flag used when it is not tuned.
    pub control_step: bool,
    /// Whether the board control step flag is tuned.
    pub optimise_control_step: bool,
    /// Payroll cost per unit.
    pub unit_payroll: f64,
    /// Price per unit of output.
    pub unit_price: f64,
}

impl Default for OrganisationSpace {
    fn default() -> Self {
        Self {
            spans: Bounds::new(1, 10, 1),
            default_spans: 3,
            layers: Bounds::new(1, 6, 1),
            default_layers: 2,
            optimise_structure: true,
            influence_gain: Bounds::new(0.0, 1.0, 0.05),
            judgment_gain: Bounds::new(0.0, 1.0, 0.05),
            incentive_gain: Bounds::new(0.0, 1.0, 0.05),
            action_state_probability: Bounds::new(0.05, 0.95, 0.01),
            default_action_state_probability: 0.85,
            optimise_action_state_probability: true,
            optimise_graph: true,
            matrix_init: MatrixInit::default(),
            optimise_matrix_init: false,
            control_step: false,
            optimise_control_step: false,
            unit_payroll: 1.0,
            unit_price: 1.0,
        }
    }
}

impl OrganisationSpace {
    /// Declares every organisation parameter.
    ///
    /// `matrixInit.*` = `"random"` is declared stochastic, so configurations
    /// selecting it are flagged for repeated evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`](crate::Error::InvalidDomain) if any
    /// bound, step or default is inconsistent.
    pub fn registry(&self) -> Result<DomainRegistry> {
        let structure = |path: &str, b: Bounds<i64>, default: i64| {
            let param = DiscreteParam::new(path, b.min, b.max).step(b.step).default(default);
            if self.optimise_structure { param } else { param.fixed() }
        };
        let gain = |path: &str, b: Bounds<f64>| {
            ContinuousParam::new(path, b.min, b.max)
                .step(b.step)
                .default(b.min)
        };
        let matrix = |path: &str, default: &str| {
            let param = CategoricalParam::new(path, MATRIX_INITS)
                .stochastic([INIT_RANDOM])
                .default(default);
            if self.optimise_matrix_init { param } else { param.fixed() }
        };

        let probability = {
            let b = self.action_state_probability;
            let param = ContinuousParam::new(paths::ACTION_STATE_PROBABILITY, b.min, b.max)
                .step(b.step)
                .probability()
                .default(self.default_action_state_probability);
            if self.optimise_action_state_probability {
                param
            } else {
                param.fixed()
            }
        };
        let graph = {
            let param = CategoricalParam::new(paths::GRAPH, [GRAPH_TOP_DOWN, GRAPH_TEAMS])
                .default(GRAPH_TOP_DOWN);
            if self.optimise_graph { param } else { param.fixed() }
        };
        let control_step = {
            let param = BooleanParam::new(paths::BOARD_CONTROL_STEP).default(self.control_step);
            if self.optimise_control_step { param } else { param.fixed() }
        };

        DomainRegistry::builder()
            .domain(structure(paths::SPANS, self.spans, self.default_spans))
            .domain(structure(paths::LAYERS, self.layers, self.default_layers))
            .domain(gain(paths::INFLUENCE_GAIN, self.influence_gain))
            .domain(gain(paths::JUDGMENT_GAIN, self.judgment_gain))
            .domain(gain(paths::INCENTIVE_GAIN, self.incentive_gain))
            .domain(probability)
            .domain(graph)
            .domain(matrix(paths::INFLUENCE_MATRIX_INIT, &self.matrix_init.influence))
            .domain(matrix(paths::JUDGMENT_MATRIX_INIT, &self.matrix_init.judgment))
            .domain(matrix(paths::INCENTIVE_MATRIX_INIT, &self.matrix_init.incentive))
            .domain(control_step)
            .domain(reporting(paths::UNIT_PAYROLL, self.unit_payroll))
            .domain(reporting(paths::UNIT_PRICE, self.unit_price))
            .build()
    }
}

/// A fixed, non-negative reporting unit.
fn reporting(path: &str, value: f64) -> ContinuousParam {
    ContinuousParam::new(path, 0.0, value.max(0.0))
        .default(value)
        .fixed()
}
