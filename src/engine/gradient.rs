//! Neighbor generation around `x`.

use super::GradientAscent;
use crate::config::ConfigurationVector;
use crate::data_point::DataPoint;
use crate::domain::{DomainKind, ParameterDomain};
use crate::error::{Error, Result};
use crate::value::ParamValue;

impl GradientAscent {
    /// One neighbor per numeric or boolean domain and `k - 1` per categorical
    /// domain, each differing from `x` in exactly one field.
    ///
    /// Numeric neighbors step up by `min(step, max - v)`, or down by
    /// `min(step, v - min)` when `x` already sits at `max`. A domain with no
    /// room to move in either direction contributes nothing, and so does a
    /// continuous step too small to change `v` at its magnitude. `x_delta`
    /// holds the distance actually moved.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn gradient_points(&self, x: &ConfigurationVector) -> Result<Vec<DataPoint>> {
        let mut points = Vec::new();

        for domain in self.registry.optimised() {
            let path = domain.path();
            let current = x
                .get(path)
                .ok_or_else(|| Error::invalid_configuration(path, "value is missing"))?;

            match (domain.kind(), current) {
                (DomainKind::Continuous(d), ParamValue::Float(v)) => {
                    let step = d
                        .step
                        .ok_or_else(|| Error::invalid_domain(path, "optimised without a step"))?;
                    let delta = if *v < d.max {
                        step.min(d.max - v)
                    } else {
                        -step.min(v - d.min)
                    };
                    // the step may vanish in rounding next to a large value
                    let moved = (v + delta).clamp(d.min, d.max);
                    let delta = moved - v;
                    if delta == 0.0 {
                        continue;
                    }
                    points.push(self.neighbor(domain, x, Some(delta), ParamValue::Float(moved)));
                }
                (DomainKind::Discrete(d), ParamValue::Int(v)) => {
                    let delta = if *v < d.max {
                        d.step.min(d.max.saturating_sub(*v))
                    } else {
                        -d.step.min(v.saturating_sub(d.min))
                    };
                    if delta == 0 {
                        continue;
                    }
                    points.push(self.neighbor(
                        domain,
                        x,
                        Some(delta as f64),
                        ParamValue::Int(v + delta),
                    ));
                }
                (DomainKind::Boolean, ParamValue::Bool(b)) => {
                    let flipped = !b;
                    let delta = if flipped { 1.0 } else { -1.0 };
                    points.push(self.neighbor(domain, x, Some(delta), ParamValue::Bool(flipped)));
                }
                (DomainKind::Categorical(d), ParamValue::Categorical(c)) => {
                    for alternative in d.categories.iter().filter(|a| *a != c) {
                        points.push(self.neighbor(
                            domain,
                            x,
                            None,
                            ParamValue::Categorical(alternative.clone()),
                        ));
                    }
                }
                (_, other) => {
                    return Err(Error::invalid_configuration(
                        path,
                        format!("unexpected {} value", other.type_name()),
                    ));
                }
            }
        }

        Ok(points)
    }

    fn neighbor(
        &self,
        domain: &ParameterDomain,
        x: &ConfigurationVector,
        x_delta: Option<f64>,
        value: ParamValue,
    ) -> DataPoint {
        let config = x.with(domain.path(), value.clone());
        let repeated = self.is_repeated(&config);
        DataPoint::neighbor(domain.path(), config, x_delta, value, repeated)
    }
}
