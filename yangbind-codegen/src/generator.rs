//! One-shot binding generation over a schema tree.

use yangbind_core::{
    CodegenTypeBuilderFactory, GeneratedType, RuntimeType, RuntimeTypeBuilderFactory,
};
use yangbind_schema::SchemaTree;

use crate::config::ReactorConfig;
use crate::error::CodegenError;
use crate::reactor::GeneratorReactor;

/// Drives a fresh [`GeneratorReactor`] for each request.
#[derive(Debug, Clone, Default)]
pub struct BindingGenerator {
    config: ReactorConfig,
}

impl BindingGenerator {
    /// Creates a generator with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with the given settings.
    #[must_use]
    pub fn with_config(config: ReactorConfig) -> Self {
        Self { config }
    }

    /// Returns the settings used for every run.
    #[must_use]
    pub fn config(&self) -> &ReactorConfig {
        &self.config
    }

    /// Generates the top-level binding types of every module in the tree.
    ///
    /// Types are returned in forest pre-order; nested types are reachable
    /// through [`GeneratedType::enclosed`].
    ///
    /// # Errors
    /// Returns `CodegenError::Reactor` if the tree cannot be bound.
    pub fn generate(&self, tree: &SchemaTree) -> Result<Vec<GeneratedType>, CodegenError> {
        let mut reactor = GeneratorReactor::with_config(tree, self.config.clone());
        reactor.execute(&mut CodegenTypeBuilderFactory)?;
        let types: Vec<GeneratedType> = reactor.generated_types().into_iter().cloned().collect();
        tracing::debug!(types = types.len(), "Generated binding types");
        Ok(types)
    }

    /// Builds the runtime view of every module in the tree.
    ///
    /// # Errors
    /// Returns `CodegenError::Reactor` if the tree cannot be bound.
    pub fn runtime_types(&self, tree: &SchemaTree) -> Result<Vec<RuntimeType>, CodegenError> {
        let mut reactor = GeneratorReactor::with_config(tree, self.config.clone());
        let modules: Vec<_> = reactor
            .execute(&mut RuntimeTypeBuilderFactory)?
            .values()
            .copied()
            .collect();
        Ok(modules
            .into_iter()
            .filter_map(|id| reactor.runtime_type(id).cloned())
            .collect())
    }
}
