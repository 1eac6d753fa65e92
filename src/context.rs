//! The dependency bag handed to every module and command factory
//!
//! A [`Context`] pairs the typed, externally seeded [`Services`] with the capabilities that
//! modules contribute while the manifest is loaded. Capabilities are append-only: the loader
//! is the only writer, and nothing it has written can be replaced.

use std::any::{Any, type_name};
use std::sync::Arc;

use crate::loader::LoadError;
use crate::services::Services;

/// A value produced by a module factory
pub type Capability = Arc<dyn Any + Send + Sync>;

pub struct Context {
    services: Services,
    capabilities: Vec<(String, Capability)>,
}

impl Context {
    #[must_use]
    pub fn new(services: Services) -> Self {
        Context {
            services,
            capabilities: Vec::new(),
        }
    }

    #[must_use]
    pub fn services(&self) -> &Services {
        &self.services
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Registered capability keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.capabilities.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Capability> {
        self.capabilities
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| c)
    }

    /// Fetch a capability with its concrete type.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::MissingCapability` if `key` is not registered, or
    /// `LoadError::CapabilityType` if it holds a different type.
    pub fn require<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, LoadError> {
        let capability = self
            .get(key)
            .ok_or_else(|| LoadError::MissingCapability(key.to_string()))?;
        Arc::clone(capability)
            .downcast::<T>()
            .map_err(|_| LoadError::CapabilityType {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub(crate) fn insert(&mut self, key: String, capability: Capability) {
        debug_assert!(!self.contains(&key), "capability '{key}' registered twice");
        self.capabilities.push((key, capability));
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("services", &self.services)
            .field("capabilities", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A module factory's view of the [`Context`]: the whole bag is visible, but only the
/// capabilities the module declared up front can be taken out of it.
pub struct Deps<'a> {
    context: &'a Context,
    unit: &'a str,
    declared: &'a [String],
}

impl<'a> Deps<'a> {
    pub(crate) fn new(context: &'a Context, unit: &'a str, declared: &'a [String]) -> Self {
        Deps {
            context,
            unit,
            declared,
        }
    }

    #[must_use]
    pub fn services(&self) -> &'a Services {
        self.context.services()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.context.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.context.keys()
    }

    /// Fetch a declared capability with its concrete type.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Undeclared` if the module did not list `key` in its requirements,
    /// otherwise the errors of [`Context::require`].
    pub fn require<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, LoadError> {
        if !self.declared.iter().any(|d| d == key) {
            return Err(LoadError::Undeclared {
                unit: self.unit.to_string(),
                key: key.to_string(),
            });
        }
        self.context.require(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_services;

    #[test]
    fn test_require_checks_type() {
        let mut ctx = Context::new(test_services().0);
        ctx.insert("answer".into(), Arc::new(42_u32));

        assert_eq!(*ctx.require::<u32>("answer").unwrap(), 42);
        match ctx.require::<String>("answer") {
            Err(LoadError::CapabilityType { key, .. }) => assert_eq!(key, "answer"),
            other => panic!("Expected CapabilityType, got: {other:?}"),
        }
        match ctx.require::<u32>("question") {
            Err(LoadError::MissingCapability(key)) => assert_eq!(key, "question"),
            other => panic!("Expected MissingCapability, got: {other:?}"),
        }
    }

    #[test]
    fn test_keys_keep_registration_order() {
        let mut ctx = Context::new(test_services().0);
        ctx.insert("zeta".into(), Arc::new(()));
        ctx.insert("alpha".into(), Arc::new(()));
        assert_eq!(ctx.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_deps_rejects_undeclared_keys() {
        let mut ctx = Context::new(test_services().0);
        ctx.insert("log".into(), Arc::new(1_u8));
        ctx.insert("pipes".into(), Arc::new(2_u8));
        let declared = vec!["log".to_string()];
        let deps = Deps::new(&ctx, "demo", &declared);

        assert!(deps.require::<u8>("log").is_ok());
        assert!(deps.contains("pipes"));
        match deps.require::<u8>("pipes") {
            Err(LoadError::Undeclared { unit, key }) => {
                assert_eq!(unit, "demo");
                assert_eq!(key, "pipes");
            }
            other => panic!("Expected Undeclared, got: {other:?}"),
        }
    }
}
