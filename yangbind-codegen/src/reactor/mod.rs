//! The generator reactor.
//!
//! A reactor turns a [`SchemaTree`] into a forest of [`Generator`]s, one tree
//! per module, and drives them through linkage, naming and materialization:
//!
//! 1. typedefs and identities are linked to their bases
//! 2. leaf and leaf-list types are linked
//! 3. leafrefs and identityrefs are bound, cascading through typedef chains
//! 4. `uses` find their groupings, augments their targets, copies their
//!    original definitions
//! 5. `ChildOf` and `ChoiceIn` parents are settled
//! 6. collision domains are solved and Java names assigned
//! 7. generated types are built through a [`TypeBuilderFactory`]
//!
//! Execution is single-shot: a reactor which finished hands back the same
//! forest, and one which failed part way refuses to run again.

mod assign;
pub(crate) mod collision;
mod construct;
mod generator;
mod hierarchy;
mod linkage;
mod materialize;
pub mod naming;
mod original;
mod runtime;
mod uses;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashMap};

use yangbind_core::{BuiltinType, GeneratedType, JavaTypeName, TypeBuilderFactory};
use yangbind_schema::{QName, QNameModule, SchemaTree, StmtId};

use crate::config::ReactorConfig;
use crate::error::ReactorError;
use crate::reactor::collision::CollisionDomains;
use crate::reactor::generator::{AugmentState, CompositeState, TypeBase, TypeState};

pub use generator::{
    ClassPlacement, Generator, GeneratorId, GeneratorKind, GeneratorResult, TypeReference,
};

/// Lifecycle of a reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactorState {
    /// Forest built, nothing linked yet.
    Initialized,
    /// Execution started and did not complete.
    Executing,
    /// Every phase completed.
    Finished,
}

/// Drives binding generation for one schema tree.
#[derive(Debug)]
pub struct GeneratorReactor<'a> {
    tree: &'a SchemaTree,
    config: ReactorConfig,
    generators: Vec<Generator>,
    modules: BTreeMap<QNameModule, GeneratorId>,
    by_statement: HashMap<StmtId, GeneratorId>,
    /// Generators in pre-order, modules in namespace order.
    order: Vec<GeneratorId>,
    domains: CollisionDomains,
    state: ReactorState,
}

impl<'a> GeneratorReactor<'a> {
    /// Builds the generator forest with the default configuration.
    #[must_use]
    pub fn new(tree: &'a SchemaTree) -> Self {
        Self::with_config(tree, ReactorConfig::default())
    }

    /// Builds the generator forest.
    #[must_use]
    pub fn with_config(tree: &'a SchemaTree, config: ReactorConfig) -> Self {
        let mut reactor = Self {
            tree,
            config,
            generators: Vec::new(),
            modules: BTreeMap::new(),
            by_statement: HashMap::new(),
            order: Vec::new(),
            domains: CollisionDomains::default(),
            state: ReactorState::Initialized,
        };
        reactor.build_forest();
        tracing::debug!(
            modules = reactor.modules.len(),
            generators = reactor.generators.len(),
            "Built generator forest"
        );
        reactor
    }

    /// Runs every phase and returns the module generators.
    ///
    /// Calling this again after success returns the same forest without
    /// touching the factory.
    ///
    /// # Errors
    /// Returns the first linkage or naming failure. The reactor is then left
    /// in [`ReactorState::Executing`] and further calls return
    /// [`ReactorError::PartialExecution`].
    pub fn execute(
        &mut self,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<&BTreeMap<QNameModule, GeneratorId>, ReactorError> {
        match self.state {
            ReactorState::Finished => return Ok(&self.modules),
            ReactorState::Executing => return Err(ReactorError::PartialExecution),
            ReactorState::Initialized => {}
        }
        self.state = ReactorState::Executing;
        tracing::info!(
            modules = self.modules.len(),
            generators = self.generators.len(),
            "Executing generator reactor"
        );

        self.link_typedefs()?;
        self.link_types()?;
        self.bind_type_references()?;
        self.link_uses()?;
        self.link_augment_targets()?;
        self.link_originals()?;
        self.link_hierarchy();
        self.assign_names()?;
        self.create_types(factory)?;

        self.state = ReactorState::Finished;
        tracing::info!(
            types = self.generated_types().len(),
            "Generator reactor finished"
        );
        Ok(&self.modules)
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ReactorState {
        self.state
    }

    /// Returns the configuration in effect.
    #[must_use]
    pub fn config(&self) -> &ReactorConfig {
        &self.config
    }

    /// Returns the module generators keyed by namespace and revision.
    #[must_use]
    pub fn modules(&self) -> &BTreeMap<QNameModule, GeneratorId> {
        &self.modules
    }

    /// Returns the number of generators in the forest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Returns true if no module was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Returns a generator.
    ///
    /// # Panics
    /// Panics if the handle belongs to another reactor.
    #[must_use]
    pub fn generator(&self, id: GeneratorId) -> &Generator {
        &self.generators[id.0]
    }

    /// Returns the generator created for a schema statement.
    #[must_use]
    pub fn generator_for(&self, statement: StmtId) -> Option<GeneratorId> {
        self.by_statement.get(&statement).copied()
    }

    /// Finds a generator by module name and a path of local names.
    ///
    /// Steps match schema-tree children, groupings, typedefs and identities
    /// alike; the first match wins.
    #[must_use]
    pub fn find(&self, module: &str, path: &[&str]) -> Option<GeneratorId> {
        let stmt = self.tree.module_by_name(module)?;
        let mut current = self.generator_for(stmt)?;
        for step in path {
            current = self.child_named(current, step)?;
        }
        Some(current)
    }

    /// Returns the named child of a generator, skipping synthetic ones.
    #[must_use]
    pub fn child_named(&self, id: GeneratorId, local_name: &str) -> Option<GeneratorId> {
        self.generators[id.0].children.iter().copied().find(|child| {
            let g = &self.generators[child.0];
            !matches!(
                g.kind,
                GeneratorKind::Key
                    | GeneratorKind::ModuleAugment
                    | GeneratorKind::UsesAugment
                    | GeneratorKind::RpcService
                    | GeneratorKind::NotificationService
            ) && self.qname_of(*child).is_some_and(|q| q.local_name() == local_name)
        })
    }

    /// Returns the augments attached to a composite, shortest target first.
    #[must_use]
    pub fn augments(&self, id: GeneratorId) -> &[GeneratorId] {
        self.generators[id.0]
            .composite
            .as_ref()
            .map_or(&[][..], |c| c.augments.as_slice())
    }

    /// Returns the groupings a composite uses.
    #[must_use]
    pub fn groupings(&self, id: GeneratorId) -> &[GeneratorId] {
        self.generators[id.0]
            .composite
            .as_ref()
            .map_or(&[][..], |c| c.groupings.as_slice())
    }

    /// Returns every generator instantiating a grouping, directly or through
    /// other groupings.
    #[must_use]
    pub fn grouping_users(&self, grouping: GeneratorId) -> Vec<GeneratorId> {
        let mut result: Vec<GeneratorId> = Vec::new();
        let mut pending = vec![grouping];
        while let Some(current) = pending.pop() {
            let Some(composite) = self.generators[current.0].composite.as_ref() else {
                continue;
            };
            for user in &composite.users {
                if !result.contains(user) {
                    result.push(*user);
                    if self.generators[user.0].kind == GeneratorKind::Grouping {
                        pending.push(*user);
                    }
                }
            }
        }
        result
    }

    /// Returns the generator an augment was attached to.
    #[must_use]
    pub fn augment_target(&self, id: GeneratorId) -> Option<GeneratorId> {
        self.generators[id.0].augment.as_ref().and_then(|a| a.target)
    }

    /// Returns the original definition of a generator, once linked.
    #[must_use]
    pub fn original(&self, id: GeneratorId) -> Option<GeneratorId> {
        self.generators[id.0].orig
    }

    /// Returns the built-in type at the root of a type-aware generator's
    /// derivation chain, following copies to their original.
    #[must_use]
    pub fn resolved_base_type(&self, id: GeneratorId) -> Option<BuiltinType> {
        self.type_state(self.original_or_self(id))
            .and_then(|state| state.root)
    }

    /// Returns the bound leafref or identityref of a type-aware generator.
    #[must_use]
    pub fn type_reference(&self, id: GeneratorId) -> Option<&TypeReference> {
        self.type_state(self.original_or_self(id))
            .and_then(|state| state.reference.as_ref())
    }

    /// Returns the Java type name, once names have been assigned.
    #[must_use]
    pub fn type_name(&self, id: GeneratorId) -> Option<&JavaTypeName> {
        self.generators[id.0].type_name.get().and_then(Option::as_ref)
    }

    /// Returns the Java package holding a generator's children.
    #[must_use]
    pub fn java_package(&self, id: GeneratorId) -> Option<&str> {
        self.generators[id.0]
            .java_package
            .get()
            .and_then(|p| p.as_deref())
    }

    /// Returns the materialization result, once built.
    #[must_use]
    pub fn result(&self, id: GeneratorId) -> Option<&GeneratorResult> {
        self.generators[id.0].result.get()
    }

    /// Returns the generated type of a generator, once built.
    #[must_use]
    pub fn generated_type(&self, id: GeneratorId) -> Option<&GeneratedType> {
        self.result(id).and_then(GeneratorResult::generated_type)
    }

    /// Returns all top-level generated types in forest pre-order.
    #[must_use]
    pub fn generated_types(&self) -> Vec<&GeneratedType> {
        self.order
            .iter()
            .filter_map(|id| self.result(*id).and_then(GeneratorResult::top_level))
            .collect()
    }

    /// Returns `(node, canonical class name)` for every named generator in
    /// forest pre-order.
    #[must_use]
    pub fn name_assignments(&self) -> Vec<(String, String)> {
        self.order
            .iter()
            .filter_map(|id| {
                self.type_name(*id)
                    .map(|name| (self.describe(*id), name.canonical_name()))
            })
            .collect()
    }

    /// Returns a human readable description of a generator.
    #[must_use]
    pub fn describe(&self, id: GeneratorId) -> String {
        let g = &self.generators[id.0];
        let node = self.tree.describe(g.statement);
        match g.kind {
            GeneratorKind::Key => format!("key of {node}"),
            GeneratorKind::RpcService => format!("rpc service of {node}"),
            GeneratorKind::NotificationService => format!("notification listener of {node}"),
            _ => node,
        }
    }

    fn type_state(&self, id: GeneratorId) -> Option<&TypeState> {
        self.generators[id.0].type_state.as_ref()
    }

    fn type_state_mut(&mut self, id: GeneratorId) -> Option<&mut TypeState> {
        self.generators[id.0].type_state.as_mut()
    }

    fn composite_mut(&mut self, id: GeneratorId) -> Option<&mut CompositeState> {
        self.generators[id.0].composite.as_mut()
    }

    fn augment_state(&self, id: GeneratorId) -> Option<&AugmentState> {
        self.generators[id.0].augment.as_ref()
    }

    fn original_or_self(&self, id: GeneratorId) -> GeneratorId {
        self.generators[id.0].orig.unwrap_or(id)
    }

    /// Returns the name of the statement behind a generator.
    fn qname_of(&self, id: GeneratorId) -> Option<&QName> {
        self.tree.statement(self.generators[id.0].statement).qname()
    }

    /// Returns the namespace of the module enclosing a generator.
    fn namespace_of(&self, id: GeneratorId) -> Option<&QNameModule> {
        self.tree.module_namespace(self.generators[id.0].statement)
    }

    /// Returns the YANG name of the module enclosing a generator.
    fn module_name_of(&self, id: GeneratorId) -> String {
        let module = self.tree.enclosing_module(self.generators[id.0].statement);
        self.tree
            .module_info(module)
            .map_or_else(String::new, |info| info.name.clone())
    }

    fn has_ancestor(&self, id: GeneratorId, kind: GeneratorKind) -> bool {
        let mut current = self.generators[id.0].parent;
        while let Some(parent) = current {
            if self.generators[parent.0].kind == kind {
                return true;
            }
            current = self.generators[parent.0].parent;
        }
        false
    }

    fn type_base(&self, id: GeneratorId) -> TypeBase {
        self.type_state(id).map_or(TypeBase::Unlinked, |s| s.base)
    }
}
