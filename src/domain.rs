//! Domain declarations for tunable configuration fields.
//!
//! Every field the optimizer knows about is declared once as a
//! [`ParameterDomain`]: a dotted path into the configuration, the shape of
//! its value space, whether it takes part in the optimisation, and the value
//! to use when it does not. Domains are usually built with the typed
//! builders and collected into a [`DomainRegistry`](crate::DomainRegistry).
//!
//! # Example
//!
//! ```
//! use org_ascent::domain::{BooleanParam, CategoricalParam, ContinuousParam, DiscreteParam};
//! use org_ascent::DomainRegistry;
//!
//! let registry = DomainRegistry::builder()
//!     .domain(ContinuousParam::new("gains.influence", 0.0, 1.0).step(0.05))
//!     .domain(DiscreteParam::new("spans", 1, 8))
//!     .domain(BooleanParam::new("board.controlStep").fixed())
//!     .domain(CategoricalParam::new("graph", ["top-down", "teams"]))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(registry.optimised().count(), 3);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::ParamValue;

/// Value space of a continuous domain.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContinuousDomain {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
    /// Finite-difference step. Required when the domain is optimised.
    pub step: Option<f64>,
    /// Whether the bounds must sit strictly inside `(0, 1)`.
    pub probability: bool,
}

/// Value space of a discrete (integer) domain.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiscreteDomain {
    /// Lower bound (inclusive).
    pub min: i64,
    /// Upper bound (inclusive).
    pub max: i64,
    /// Finite-difference step.
    pub step: i64,
}

/// Value space of a categorical domain.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoricalDomain {
    /// Category labels, in declaration order.
    pub categories: Vec<String>,
    /// Categories whose selection makes an evaluation stochastic.
    pub stochastic: Vec<String>,
}

/// Enum wrapping all domain shapes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DomainKind {
    /// Real-valued range.
    Continuous(ContinuousDomain),
    /// Integer range.
    Discrete(DiscreteDomain),
    /// `true` / `false`.
    Boolean,
    /// Unordered set of labels.
    Categorical(CategoricalDomain),
}

impl DomainKind {
    /// Returns `true` for continuous and discrete domains.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, DomainKind::Continuous(_) | DomainKind::Discrete(_))
    }
}

/// One declared, tunable configuration field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterDomain {
    path: String,
    kind: DomainKind,
    optimise: bool,
    default: ParamValue,
}

impl ParameterDomain {
    /// Dotted path of the field, e.g. `gains.influence`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The shape of the value space.
    #[must_use]
    pub fn kind(&self) -> &DomainKind {
        &self.kind
    }

    /// Whether the optimizer moves this field.
    #[must_use]
    pub fn optimise(&self) -> bool {
        self.optimise
    }

    /// The value used verbatim when the field is not optimised.
    #[must_use]
    pub fn default_value(&self) -> &ParamValue {
        &self.default
    }

    /// Checks that `value` has the right type and lies inside this domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if it does not.
    pub fn check(&self, value: &ParamValue) -> Result<()> {
        let path = self.path.as_str();
        match (&self.kind, value) {
            (DomainKind::Continuous(d), ParamValue::Float(v)) => {
                if !v.is_finite() || *v < d.min || *v > d.max {
                    return Err(Error::invalid_configuration(
                        path,
                        format!("{v} is outside [{}, {}]", d.min, d.max),
                    ));
                }
                Ok(())
            }
            (DomainKind::Discrete(d), ParamValue::Int(v)) => {
                if *v < d.min || *v > d.max {
                    return Err(Error::invalid_configuration(
                        path,
                        format!("{v} is outside [{}, {}]", d.min, d.max),
                    ));
                }
                Ok(())
            }
            (DomainKind::Boolean, ParamValue::Bool(_)) => Ok(()),
            (DomainKind::Categorical(d), ParamValue::Categorical(c)) => {
                if d.categories.iter().any(|x| x == c) {
                    Ok(())
                } else {
                    Err(Error::invalid_configuration(
                        path,
                        format!("'{c}' is not one of {:?}", d.categories),
                    ))
                }
            }
            (_, other) => Err(Error::invalid_configuration(
                path,
                format!("unexpected {} value", other.type_name()),
            )),
        }
    }

    /// Returns `true` if selecting `value` makes an evaluation stochastic.
    #[must_use]
    pub fn is_stochastic(&self, value: &ParamValue) -> bool {
        match (&self.kind, value) {
            (DomainKind::Categorical(d), ParamValue::Categorical(c)) => {
                d.stochastic.iter().any(|s| s == c)
            }
            _ => false,
        }
    }

    /// Validates the declaration itself.
    pub(crate) fn validate(&self) -> Result<()> {
        let path = self.path.as_str();
        if path.is_empty() {
            return Err(Error::invalid_domain(path, "path must not be empty"));
        }
        match &self.kind {
            DomainKind::Continuous(d) => {
                if !d.min.is_finite() || !d.max.is_finite() {
                    return Err(Error::invalid_domain(path, "bounds must be finite"));
                }
                if d.max < d.min {
                    return Err(Error::invalid_domain(
                        path,
                        format!("max ({}) must be >= min ({})", d.max, d.min),
                    ));
                }
                if d.probability && (d.min <= 0.0 || d.max >= 1.0) {
                    return Err(Error::invalid_domain(
                        path,
                        "probability bounds must lie inside (0, 1)",
                    ));
                }
                if self.optimise {
                    match d.step {
                        Some(step) if step.is_finite() && step > 0.0 => {}
                        Some(step) => {
                            return Err(Error::invalid_domain(
                                path,
                                format!("step ({step}) must be positive and finite"),
                            ));
                        }
                        None => {
                            return Err(Error::invalid_domain(
                                path,
                                "optimised continuous domain needs a derivative step size",
                            ));
                        }
                    }
                }
            }
            DomainKind::Discrete(d) => {
                if d.max < d.min {
                    return Err(Error::invalid_domain(
                        path,
                        format!("max ({}) must be >= min ({})", d.max, d.min),
                    ));
                }
                if self.optimise && d.step < 1 {
                    return Err(Error::invalid_domain(
                        path,
                        format!("step ({}) must be at least 1", d.step),
                    ));
                }
            }
            DomainKind::Boolean => {}
            DomainKind::Categorical(d) => {
                if d.categories.is_empty() {
                    return Err(Error::invalid_domain(path, "categories cannot be empty"));
                }
                if self.optimise && d.categories.len() < 2 {
                    return Err(Error::invalid_domain(
                        path,
                        "optimised categorical domain needs at least 2 categories",
                    ));
                }
                for (i, c) in d.categories.iter().enumerate() {
                    if d.categories[..i].contains(c) {
                        return Err(Error::invalid_domain(
                            path,
                            format!("duplicate category '{c}'"),
                        ));
                    }
                }
                if let Some(s) = d.stochastic.iter().find(|s| !d.categories.contains(s)) {
                    return Err(Error::invalid_domain(
                        path,
                        format!("stochastic category '{s}' is not declared"),
                    ));
                }
            }
        }
        self.check(&self.default).map_err(|e| match e {
            Error::InvalidConfiguration { path, reason } => Error::InvalidDomain {
                path,
                reason: format!("default: {reason}"),
            },
            other => other,
        })
    }
}

/// Builder for a continuous domain.
///
/// # Example
///
/// ```
/// use org_ascent::domain::{ContinuousParam, DomainKind, ParameterDomain};
///
/// let domain: ParameterDomain = ContinuousParam::new("actionStateProbability", 0.05, 0.95)
///     .probability()
///     .step(0.01)
///     .default(0.85)
///     .into();
///
/// assert!(matches!(domain.kind(), DomainKind::Continuous(_)));
/// ```
#[derive(Clone, Debug)]
pub struct ContinuousParam {
    path: String,
    min: f64,
    max: f64,
    step: Option<f64>,
    probability: bool,
    optimise: bool,
    default: Option<f64>,
}

impl ContinuousParam {
    /// Creates an optimised continuous domain over `[min, max]`.
    #[must_use]
    pub fn new(path: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            path: path.into(),
            min,
            max,
            step: None,
            probability: false,
            optimise: true,
            default: None,
        }
    }

    /// Sets the finite-difference step size.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Constrains the bounds to the open interval `(0, 1)`.
    #[must_use]
    pub fn probability(mut self) -> Self {
        self.probability = true;
        self
    }

    /// Sets the default value (defaults to `min`).
    #[must_use]
    pub fn default(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }

    /// Excludes the field from optimisation; its default is used verbatim.
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.optimise = false;
        self
    }
}

impl From<ContinuousParam> for ParameterDomain {
    fn from(p: ContinuousParam) -> Self {
        ParameterDomain {
            path: p.path,
            kind: DomainKind::Continuous(ContinuousDomain {
                min: p.min,
                max: p.max,
                step: p.step,
                probability: p.probability,
            }),
            optimise: p.optimise,
            default: ParamValue::Float(p.default.unwrap_or(p.min)),
        }
    }
}

/// Builder for a discrete (integer) domain. The step defaults to `1`.
#[derive(Clone, Debug)]
pub struct DiscreteParam {
    path: String,
    min: i64,
    max: i64,
    step: i64,
    optimise: bool,
    default: Option<i64>,
}

impl DiscreteParam {
    /// Creates an optimised discrete domain over `[min, max]`.
    #[must_use]
    pub fn new(path: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            path: path.into(),
            min,
            max,
            step: 1,
            optimise: true,
            default: None,
        }
    }

    /// Sets the finite-difference step size.
    #[must_use]
    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    /// Sets the default value (defaults to `min`).
    #[must_use]
    pub fn default(mut self, value: i64) -> Self {
        self.default = Some(value);
        self
    }

    /// Excludes the field from optimisation.
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.optimise = false;
        self
    }
}

impl From<DiscreteParam> for ParameterDomain {
    fn from(p: DiscreteParam) -> Self {
        ParameterDomain {
            path: p.path,
            kind: DomainKind::Discrete(DiscreteDomain {
                min: p.min,
                max: p.max,
                step: p.step,
            }),
            optimise: p.optimise,
            default: ParamValue::Int(p.default.unwrap_or(p.min)),
        }
    }
}

/// Builder for a boolean domain. The default is `false`.
#[derive(Clone, Debug)]
pub struct BooleanParam {
    path: String,
    optimise: bool,
    default: bool,
}

impl BooleanParam {
    /// Creates an optimised boolean domain.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            optimise: true,
            default: false,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: bool) -> Self {
        self.default = value;
        self
    }

    /// Excludes the field from optimisation.
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.optimise = false;
        self
    }
}

impl From<BooleanParam> for ParameterDomain {
    fn from(p: BooleanParam) -> Self {
        ParameterDomain {
            path: p.path,
            kind: DomainKind::Boolean,
            optimise: p.optimise,
            default: ParamValue::Bool(p.default),
        }
    }
}

/// Builder for a categorical domain. The default is the first category.
///
/// # Example
///
/// ```
/// use org_ascent::domain::{CategoricalParam, ParameterDomain};
/// use org_ascent::ParamValue;
///
/// let domain: ParameterDomain =
///     CategoricalParam::new("matrixInit.judgment", ["null", "random", "hybrid", "purposeful"])
///         .stochastic(["random"])
///         .default("purposeful")
///         .fixed()
///         .into();
///
/// assert!(domain.is_stochastic(&ParamValue::from("random")));
/// assert!(!domain.optimise());
/// ```
#[derive(Clone, Debug)]
pub struct CategoricalParam {
    path: String,
    categories: Vec<String>,
    stochastic: Vec<String>,
    optimise: bool,
    default: Option<String>,
}

impl CategoricalParam {
    /// Creates an optimised categorical domain over `categories`.
    #[must_use]
    pub fn new<I, S>(path: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            categories: categories.into_iter().map(Into::into).collect(),
            stochastic: Vec::new(),
            optimise: true,
            default: None,
        }
    }

    /// Marks categories whose selection requires repeated, averaged
    /// evaluations.
    #[must_use]
    pub fn stochastic<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stochastic = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default category.
    #[must_use]
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Excludes the field from optimisation.
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.optimise = false;
        self
    }
}

impl From<CategoricalParam> for ParameterDomain {
    fn from(p: CategoricalParam) -> Self {
        let default = p
            .default
            .or_else(|| p.categories.first().cloned())
            .unwrap_or_default();
        ParameterDomain {
            path: p.path,
            kind: DomainKind::Categorical(CategoricalDomain {
                categories: p.categories,
                stochastic: p.stochastic,
            }),
            optimise: p.optimise,
            default: ParamValue::Categorical(default),
        }
    }
}
