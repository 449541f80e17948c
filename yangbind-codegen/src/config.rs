//! Reactor configuration.

use yangbind_core::naming::DEFAULT_PACKAGE_PREFIX;

/// Settings controlling how bindings are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactorConfig {
    package_prefix: String,
    compat_services: bool,
    strict_leafrefs: bool,
}

impl ReactorConfig {
    /// Returns a builder with default settings.
    #[must_use]
    pub fn builder() -> ReactorConfigBuilder {
        ReactorConfigBuilder::new()
    }

    /// Returns the prefix of every module package.
    #[must_use]
    pub fn package_prefix(&self) -> &str {
        &self.package_prefix
    }

    /// Returns true if RPC services and notification listeners are generated.
    #[must_use]
    pub fn compat_services(&self) -> bool {
        self.compat_services
    }

    /// Returns true if unresolvable leafrefs in groupings and typedefs are fatal.
    #[must_use]
    pub fn strict_leafrefs(&self) -> bool {
        self.strict_leafrefs
    }
}

impl Default for ReactorConfig {
    fn default() -> Self {
        ReactorConfigBuilder::new().build()
    }
}

/// Builder for [`ReactorConfig`].
#[derive(Debug, Clone)]
pub struct ReactorConfigBuilder {
    package_prefix: String,
    compat_services: bool,
    strict_leafrefs: bool,
}

impl ReactorConfigBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
            compat_services: true,
            strict_leafrefs: false,
        }
    }

    /// Sets the prefix of every module package.
    #[must_use]
    pub fn package_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.package_prefix = prefix.into();
        self
    }

    /// Enables or disables RPC services and notification listeners.
    #[must_use]
    pub fn compat_services(mut self, enabled: bool) -> Self {
        self.compat_services = enabled;
        self
    }

    /// Makes unresolvable leafrefs in groupings and typedefs fatal.
    #[must_use]
    pub fn strict_leafrefs(mut self, strict: bool) -> Self {
        self.strict_leafrefs = strict;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ReactorConfig {
        ReactorConfig {
            package_prefix: self.package_prefix,
            compat_services: self.compat_services,
            strict_leafrefs: self.strict_leafrefs,
        }
    }
}

impl Default for ReactorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReactorConfig::default();
        assert_eq!(config.package_prefix(), "org.opendaylight.yang.gen.v1");
        assert!(config.compat_services());
        assert!(!config.strict_leafrefs());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ReactorConfig::builder()
            .package_prefix("com.example.gen")
            .compat_services(false)
            .strict_leafrefs(true)
            .build();
        assert_eq!(config.package_prefix(), "com.example.gen");
        assert!(!config.compat_services());
        assert!(config.strict_leafrefs());
    }
}
