//! Configuration vectors: one concrete value per declared domain.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::hash::{ConfigHash, Fnv1a};
use crate::value::ParamValue;

/// A full assignment of values to domain paths.
///
/// Vectors have value semantics: deriving a neighbor or the next `x`
/// produces a fresh vector via [`with`](Self::with) and never touches the
/// original. Entries are kept in path order so the
/// [content hash](Self::hash) is canonical.
///
/// # Example
///
/// ```
/// use org_ascent::ConfigurationVector;
///
/// let a = ConfigurationVector::default()
///     .with("gains.influence", 0.5)
///     .with("graph", "teams");
/// let b = a.with("gains.influence", 0.6);
///
/// assert_ne!(a.hash(), b.hash());
/// assert_eq!(a.get("graph").and_then(|v| v.as_category()), Some("teams"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConfigurationVector {
    values: BTreeMap<String, ParamValue>,
}

impl ConfigurationVector {
    /// Returns the value at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ParamValue> {
        self.values.get(path)
    }

    /// Returns a copy of this vector with `path` set to `value`.
    #[must_use]
    pub fn with(&self, path: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let mut values = self.values.clone();
        values.insert(path.into(), value.into());
        Self { values }
    }

    /// Iterates over `(path, value)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of assigned paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no path is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Content hash over every path and value.
    #[must_use]
    pub fn hash(&self) -> ConfigHash {
        let mut h = Fnv1a::new();
        for (path, value) in &self.values {
            h.str(path);
            h.value(value);
        }
        h.finish()
    }

    /// Renders the dotted paths as the nested object consumed by the
    /// configurator, e.g. `gains.influence` becomes `{"gains": {"influence": ..}}`.
    ///
    /// Non-finite floats render as `null`.
    #[cfg(feature = "serde")]
    #[must_use]
    pub fn to_nested_json(&self) -> serde_json::Value {
        use serde_json::{Map, Value};

        let mut root = Map::new();
        for (path, value) in &self.values {
            let leaf = match value {
                ParamValue::Float(v) => {
                    serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number)
                }
                ParamValue::Int(v) => Value::from(*v),
                ParamValue::Bool(v) => Value::Bool(*v),
                ParamValue::Categorical(v) => Value::String(v.clone()),
            };
            let segments: Vec<&str> = path.split('.').collect();
            insert_nested(&mut root, &segments, leaf);
        }
        Value::Object(root)
    }
}

/// Registry validation rules out a path that is also a prefix of another,
/// so a non-object on the way down is never overwritten.
#[cfg(feature = "serde")]
fn insert_nested(
    node: &mut serde_json::Map<String, serde_json::Value>,
    segments: &[&str],
    leaf: serde_json::Value,
) {
    use serde_json::{Map, Value};

    match segments {
        [] => {}
        [last] => {
            node.insert((*last).to_string(), leaf);
        }
        [head, rest @ ..] => {
            let entry = node
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = entry {
                insert_nested(child, rest, leaf);
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigurationVector
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
