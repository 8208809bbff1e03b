//! The domain registry: the validated, read-only set of declared domains.

use std::collections::HashMap;

use crate::config::ConfigurationVector;
use crate::domain::ParameterDomain;
use crate::error::{Error, Result};

/// All declared domains, in declaration order, with lookup by path.
///
/// Construction validates every declaration; afterwards the registry is
/// immutable. It is handed to the engine explicitly rather than living in a
/// process-wide instance.
///
/// # Example
///
/// ```
/// use org_ascent::domain::ContinuousParam;
/// use org_ascent::{DomainRegistry, Error};
///
/// let registry = DomainRegistry::new([ContinuousParam::new("gain", 0.0, 1.0).step(0.1).into()])
///     .unwrap();
///
/// assert_eq!(registry.resolve("gain").unwrap().path(), "gain");
/// assert!(matches!(registry.resolve("loss"), Err(Error::NotFound(_))));
/// ```
#[derive(Clone, Debug)]
pub struct DomainRegistry {
    domains: Vec<ParameterDomain>,
    index: HashMap<String, usize>,
}

impl DomainRegistry {
    /// Builds a registry from a list of declarations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] if any declaration is malformed, if
    /// two declarations share a path, or if one path is a dotted prefix of
    /// another (`gains` and `gains.influence`).
    pub fn new(domains: impl IntoIterator<Item = ParameterDomain>) -> Result<Self> {
        let domains: Vec<ParameterDomain> = domains.into_iter().collect();
        let mut index = HashMap::with_capacity(domains.len());
        for (i, domain) in domains.iter().enumerate() {
            domain.validate()?;
            if index.insert(domain.path().to_string(), i).is_some() {
                return Err(Error::invalid_domain(domain.path(), "declared more than once"));
            }
        }
        for domain in &domains {
            let path = domain.path();
            if let Some(other) = domains
                .iter()
                .map(ParameterDomain::path)
                .find(|other| is_dotted_prefix(path, other))
            {
                return Err(Error::invalid_domain(
                    path,
                    format!("path is a prefix of '{other}'"),
                ));
            }
        }
        Ok(Self { domains, index })
    }

    /// Returns a [`DomainRegistryBuilder`] for declaring domains fluently.
    #[must_use]
    pub fn builder() -> DomainRegistryBuilder {
        DomainRegistryBuilder {
            domains: Vec::new(),
        }
    }

    /// Looks up the domain declared at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no domain is declared there.
    pub fn resolve(&self, path: &str) -> Result<&ParameterDomain> {
        self.index
            .get(path)
            .map(|&i| &self.domains[i])
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    /// Iterates over all domains in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterDomain> {
        self.domains.iter()
    }

    /// Iterates over the domains subject to optimisation.
    pub fn optimised(&self) -> impl Iterator<Item = &ParameterDomain> {
        self.domains.iter().filter(|d| d.optimise())
    }

    /// Number of declared domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// A configuration holding every domain's default value.
    #[must_use]
    pub fn defaults(&self) -> ConfigurationVector {
        self.domains
            .iter()
            .map(|d| (d.path(), d.default_value().clone()))
            .collect()
    }

    /// Checks that `config` assigns exactly the declared paths, each with a
    /// value inside its domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an undeclared path and
    /// [`Error::InvalidConfiguration`] for a missing or out-of-domain value.
    pub fn validate_configuration(&self, config: &ConfigurationVector) -> Result<()> {
        for (path, _) in config.iter() {
            self.resolve(path)?;
        }
        for domain in &self.domains {
            let value = config
                .get(domain.path())
                .ok_or_else(|| Error::invalid_configuration(domain.path(), "value is missing"))?;
            domain.check(value)?;
        }
        Ok(())
    }
}

fn is_dotted_prefix(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Fluent builder for a [`DomainRegistry`].
#[derive(Clone, Debug)]
pub struct DomainRegistryBuilder {
    domains: Vec<ParameterDomain>,
}

impl DomainRegistryBuilder {
    /// Declares one more domain.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<ParameterDomain>) -> Self {
        self.domains.push(domain.into());
        self
    }

    /// Validates the declarations and builds the registry.
    ///
    /// # Errors
    ///
    /// See [`DomainRegistry::new`].
    pub fn build(self) -> Result<DomainRegistry> {
        DomainRegistry::new(self.domains)
    }
}
