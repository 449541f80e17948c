//! Class placement and Java name assignment.

use yangbind_core::naming::{
    normalize_package_name, package_string, root_package_name, INPUT_SUFFIX, KEY_SUFFIX,
    OUTPUT_SUFFIX,
};
use yangbind_core::JavaTypeName;
use yangbind_schema::Revision;

use crate::error::ReactorError;
use crate::reactor::collision::{DomainId, MemberId, SecondaryPackage};
use crate::reactor::generator::{ClassPlacement, GeneratorId, GeneratorKind, TypeBase};
use crate::reactor::naming::{ClassNamingStrategy, StatementNamespace};
use crate::reactor::GeneratorReactor;

impl GeneratorReactor<'_> {
    /// Registers members, solves collision domains and assigns packages and
    /// type names, outermost generators first.
    pub(super) fn assign_names(&mut self) -> Result<(), ReactorError> {
        for id in self.order.clone() {
            self.ensure_member(id);
        }

        let mut renamed = 0usize;
        for id in self.order.clone() {
            let Some(domain) = self.generators[id.0].composite.as_ref().map(|c| c.domain) else {
                continue;
            };
            if self.domains.find_solution(domain)? {
                renamed += 1;
            }
        }
        tracing::debug!(domains = renamed, "Solved collision domains");

        for id in self.order.clone() {
            if self.generators[id.0].composite.is_some() {
                let _ = self.java_package_of(id);
            }
            let _ = self.type_name_of(id);
        }
        Ok(())
    }

    /// Returns the class placement of a generator.
    pub(super) fn placement_of(&self, id: GeneratorId) -> ClassPlacement {
        *self.generators[id.0]
            .placement
            .get_or_init(|| self.compute_placement(id))
    }

    fn compute_placement(&self, id: GeneratorId) -> ClassPlacement {
        let g = &self.generators[id.0];
        if !g.provenance.is_original() {
            return ClassPlacement::None;
        }
        match g.kind {
            GeneratorKind::Leaf | GeneratorKind::LeafList => match self.type_base(id) {
                TypeBase::Builtin(builtin) if builtin.needs_generated_class() => {
                    ClassPlacement::Member
                }
                _ => ClassPlacement::None,
            },
            GeneratorKind::Typedef => {
                let reference = self
                    .type_state(id)
                    .and_then(|state| state.root)
                    .is_some_and(|root| root.is_reference());
                if reference {
                    ClassPlacement::None
                } else {
                    ClassPlacement::TopLevel
                }
            }
            GeneratorKind::Action if self.has_ancestor(id, GeneratorKind::Grouping) => {
                ClassPlacement::Phantom
            }
            _ => ClassPlacement::TopLevel,
        }
    }

    fn member_of(&self, id: GeneratorId) -> Option<MemberId> {
        self.generators[id.0].member.get().copied().flatten()
    }

    fn ensure_member(&mut self, id: GeneratorId) -> Option<MemberId> {
        if let Some(member) = self.generators[id.0].member.get() {
            return *member;
        }
        let member = self.create_member(id);
        let _ = self.generators[id.0].member.set(member);
        member
    }

    fn create_member(&mut self, id: GeneratorId) -> Option<MemberId> {
        if self.placement_of(id) == ClassPlacement::None {
            return None;
        }
        let kind = self.generators[id.0].kind;
        let parent = self.generators[id.0].parent;
        let owner = self.describe(id);

        let member = match kind {
            GeneratorKind::Module => {
                let domain = self.generators[id.0].composite.as_ref()?.domain;
                let name = format!("{}-data", self.module_name_of(id));
                let strategy = ClassNamingStrategy::camel_case(StatementNamespace::DataRoot, name);
                self.domains.add_primary(domain, strategy, false, owner)
            }
            GeneratorKind::Key => {
                let list = parent?;
                let primary = self.ensure_member(list)?;
                let domain = self.parent_domain(list)?;
                self.domains
                    .add_secondary(domain, primary, KEY_SUFFIX, SecondaryPackage::None, owner)
            }
            GeneratorKind::Input | GeneratorKind::Output => {
                let operation = parent?;
                let primary = self.ensure_member(operation)?;
                let domain = self.parent_domain(operation)?;
                let (suffix, package) = if kind == GeneratorKind::Input {
                    (INPUT_SUFFIX, "input")
                } else {
                    (OUTPUT_SUFFIX, "output")
                };
                self.domains.add_secondary(
                    domain,
                    primary,
                    suffix,
                    SecondaryPackage::Suffix(package.to_string()),
                    owner,
                )
            }
            GeneratorKind::ModuleAugment | GeneratorKind::UsesAugment => {
                let target = self.augment_target(id)?;
                let target_name = self.qname_of(target)?.local_name().to_string();
                let namespace = statement_namespace(self.generators[target.0].kind)?;
                let ordinal = self.augment_ordinal(id, &target_name);
                let segments = self.augment_segments(id);
                let domain = self.parent_domain(id)?;
                let prefix = self.domains.add_prefix(
                    ClassNamingStrategy::camel_case(namespace, target_name),
                    owner.clone(),
                );
                self.domains.add_secondary(
                    domain,
                    prefix,
                    ordinal.to_string(),
                    SecondaryPackage::Augment(segments),
                    owner,
                )
            }
            GeneratorKind::RpcService | GeneratorKind::NotificationService => {
                let suffix = if kind == GeneratorKind::RpcService {
                    "service"
                } else {
                    "listener"
                };
                let name = format!("{}-{suffix}", self.module_name_of(id));
                let domain = self.parent_domain(id)?;
                let strategy = ClassNamingStrategy::camel_case(StatementNamespace::Service, name);
                self.domains.add_primary(domain, strategy, false, owner)
            }
            _ => {
                let namespace = statement_namespace(kind)?;
                let local = self.qname_of(id)?.local_name().to_string();
                let domain = self.parent_domain(id)?;
                let strategy = ClassNamingStrategy::camel_case(namespace, local);
                self.domains
                    .add_primary(domain, strategy, kind.is_composite(), owner)
            }
        };
        Some(member)
    }

    fn parent_domain(&self, id: GeneratorId) -> Option<DomainId> {
        let parent = self.generators[id.0].parent?;
        self.generators[parent.0].composite.as_ref().map(|c| c.domain)
    }

    /// Returns the 1-based position of an augment among its siblings
    /// augmenting nodes with the same local name.
    fn augment_ordinal(&self, id: GeneratorId, target_name: &str) -> usize {
        let Some(parent) = self.generators[id.0].parent else {
            return 1;
        };
        let mut ordinal = 0;
        for sibling in &self.generators[parent.0].children {
            if !self.generators[sibling.0].kind.is_augment() {
                continue;
            }
            let same = self
                .augment_target(*sibling)
                .and_then(|target| self.qname_of(target))
                .is_some_and(|name| name.local_name() == target_name);
            if same {
                ordinal += 1;
            }
            if *sibling == id {
                break;
            }
        }
        ordinal.max(1)
    }

    fn augment_segments(&self, id: GeneratorId) -> Vec<String> {
        self.tree
            .statement(self.generators[id.0].statement)
            .argument()
            .as_schema_node_id()
            .map(|target| {
                target
                    .steps()
                    .iter()
                    .map(|step| normalize_package_name(&package_string(step.local_name())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the generator whose package holds this generator's class.
    fn package_parent(&self, id: GeneratorId) -> Option<GeneratorId> {
        let parent = self.generators[id.0].parent?;
        match self.generators[id.0].kind {
            GeneratorKind::Key | GeneratorKind::Input | GeneratorKind::Output => {
                self.generators[parent.0].parent
            }
            _ => Some(parent),
        }
    }

    /// Returns the package holding a generator's children.
    pub(super) fn java_package_of(&self, id: GeneratorId) -> Option<String> {
        self.generators[id.0]
            .java_package
            .get_or_init(|| self.compute_package(id))
            .clone()
    }

    fn compute_package(&self, id: GeneratorId) -> Option<String> {
        if self.generators[id.0].kind == GeneratorKind::Module {
            let namespace = self.namespace_of(id)?;
            return Some(root_package_name(
                self.config.package_prefix(),
                namespace.namespace(),
                namespace.revision().map(Revision::as_str),
            ));
        }
        let member = self.member_of(id)?;
        let base = self.java_package_of(self.package_parent(id)?)?;
        match self.domains.package_segment(member) {
            Some(segment) => Some(format!("{base}.{segment}")),
            None => Some(base),
        }
    }

    /// Returns the Java type name of a generator.
    pub(super) fn type_name_of(&self, id: GeneratorId) -> Option<JavaTypeName> {
        self.generators[id.0]
            .type_name
            .get_or_init(|| self.compute_type_name(id))
            .clone()
    }

    fn compute_type_name(&self, id: GeneratorId) -> Option<JavaTypeName> {
        let member = self.member_of(id)?;
        let class = self.domains.class_name(member);
        match self.placement_of(id) {
            ClassPlacement::None => None,
            ClassPlacement::Member => {
                let parent = self.generators[id.0].parent?;
                Some(self.type_name_of(parent)?.create_enclosed(class))
            }
            ClassPlacement::TopLevel | ClassPlacement::Phantom => {
                let package = if self.generators[id.0].kind == GeneratorKind::Module {
                    self.java_package_of(id)?
                } else {
                    self.java_package_of(self.package_parent(id)?)?
                };
                let name = JavaTypeName::new(package, class);
                tracing::trace!(node = %self.describe(id), name = %name, "Assigned type name");
                Some(name)
            }
        }
    }
}

/// Maps a generator kind to the YANG namespace its name lives in.
fn statement_namespace(kind: GeneratorKind) -> Option<StatementNamespace> {
    let namespace = match kind {
        GeneratorKind::Module => StatementNamespace::DataRoot,
        GeneratorKind::Container => StatementNamespace::Container,
        GeneratorKind::List => StatementNamespace::List,
        GeneratorKind::Key => StatementNamespace::Key,
        GeneratorKind::Choice => StatementNamespace::Choice,
        GeneratorKind::Case => StatementNamespace::Case,
        GeneratorKind::Grouping => StatementNamespace::Grouping,
        GeneratorKind::Typedef => StatementNamespace::Typedef,
        GeneratorKind::Identity => StatementNamespace::Identity,
        GeneratorKind::Leaf => StatementNamespace::Leaf,
        GeneratorKind::LeafList => StatementNamespace::LeafList,
        GeneratorKind::Opaque => StatementNamespace::Anydata,
        GeneratorKind::Rpc => StatementNamespace::Rpc,
        GeneratorKind::Action => StatementNamespace::Action,
        GeneratorKind::Input => StatementNamespace::Input,
        GeneratorKind::Output => StatementNamespace::Output,
        GeneratorKind::Notification => StatementNamespace::Notification,
        GeneratorKind::RpcService | GeneratorKind::NotificationService => {
            StatementNamespace::Service
        }
        GeneratorKind::ModuleAugment | GeneratorKind::UsesAugment => return None,
    };
    Some(namespace)
}
