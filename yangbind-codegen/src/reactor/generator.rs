//! Generator nodes.
//!
//! The reactor keeps one [`Generator`] per schema construct that may need a
//! Java class, in an arena addressed by [`GeneratorId`]. Parents own their
//! children; every other relation (parent, grouping users, augment targets,
//! original definitions) is an index into the same arena.

use std::cell::OnceCell;
use std::fmt;

use yangbind_core::{BuiltinType, GeneratedType, JavaTypeName, RuntimeType};
use yangbind_schema::{Provenance, StmtId};

use crate::reactor::collision::{DomainId, MemberId};

/// Handle of a generator in a reactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(pub(crate) usize);

impl GeneratorId {
    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Kind of schema construct a generator stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// `module`.
    Module,
    /// `container`.
    Container,
    /// `list`.
    List,
    /// Key of a keyed list.
    Key,
    /// `choice`.
    Choice,
    /// `case`.
    Case,
    /// `grouping`.
    Grouping,
    /// `typedef`.
    Typedef,
    /// `identity`.
    Identity,
    /// `leaf`.
    Leaf,
    /// `leaf-list`.
    LeafList,
    /// `anydata` or `anyxml`.
    Opaque,
    /// `rpc`.
    Rpc,
    /// `action`.
    Action,
    /// `input`.
    Input,
    /// `output`.
    Output,
    /// `notification`.
    Notification,
    /// Top-level `augment`.
    ModuleAugment,
    /// `augment` inside `uses`.
    UsesAugment,
    /// Compatibility RPC service of a module.
    RpcService,
    /// Compatibility notification listener of a module.
    NotificationService,
}

impl GeneratorKind {
    /// Returns true for generators owning children and a collision domain.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Module
                | Self::Container
                | Self::List
                | Self::Choice
                | Self::Case
                | Self::Grouping
                | Self::Rpc
                | Self::Action
                | Self::Input
                | Self::Output
                | Self::Notification
                | Self::ModuleAugment
                | Self::UsesAugment
        )
    }

    /// Returns true for generators standing for a schema-tree node.
    #[must_use]
    pub const fn is_schema_tree(&self) -> bool {
        matches!(
            self,
            Self::Container
                | Self::List
                | Self::Choice
                | Self::Case
                | Self::Leaf
                | Self::LeafList
                | Self::Opaque
                | Self::Rpc
                | Self::Action
                | Self::Input
                | Self::Output
                | Self::Notification
        )
    }

    /// Returns true for generators carrying a `type` statement.
    #[must_use]
    pub const fn is_type_aware(&self) -> bool {
        matches!(self, Self::Leaf | Self::LeafList | Self::Typedef)
    }

    /// Returns true for augment generators.
    #[must_use]
    pub const fn is_augment(&self) -> bool {
        matches!(self, Self::ModuleAugment | Self::UsesAugment)
    }
}

/// Where a generator's class ends up, if it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassPlacement {
    /// No class at all.
    None,
    /// A class nested inside the parent's class.
    Member,
    /// A class of its own.
    TopLevel,
    /// No class, but a reserved name for the children's namespace.
    Phantom,
}

/// Outcome of materializing a generator.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorResult {
    /// Nothing generated.
    Empty,
    /// A type nested inside the parent's type.
    Member(GeneratedType),
    /// A top-level type.
    TopLevel(GeneratedType),
}

impl GeneratorResult {
    /// Returns the generated type, if any.
    #[must_use]
    pub fn generated_type(&self) -> Option<&GeneratedType> {
        match self {
            Self::Empty => None,
            Self::Member(ty) | Self::TopLevel(ty) => Some(ty),
        }
    }

    /// Returns the type only if it is a top-level one.
    #[must_use]
    pub fn top_level(&self) -> Option<&GeneratedType> {
        match self {
            Self::TopLevel(ty) => Some(ty),
            _ => None,
        }
    }
}

/// Result of following a type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeReference {
    /// The type refers to nothing.
    Plain,
    /// Leafref target, `None` while unresolved.
    Leafref(Option<GeneratorId>),
    /// Identityref bases.
    Identityref(Vec<GeneratorId>),
}

/// Immediate base of a type-aware generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeBase {
    Unlinked,
    Builtin(BuiltinType),
    Typedef(GeneratorId),
}

/// Type linkage of a leaf, leaf-list or typedef.
#[derive(Debug, Clone)]
pub(crate) struct TypeState {
    pub(crate) type_stmt: StmtId,
    pub(crate) base: TypeBase,
    /// Built-in type at the root of the derivation chain, once settled.
    pub(crate) root: Option<BuiltinType>,
    /// `type` statement of the root, holding leafref paths and bases.
    pub(crate) root_stmt: Option<StmtId>,
    pub(crate) reference: Option<TypeReference>,
    /// Generators deriving from this typedef.
    pub(crate) derived: Vec<GeneratorId>,
}

impl TypeState {
    pub(crate) fn new(type_stmt: StmtId) -> Self {
        Self {
            type_stmt,
            base: TypeBase::Unlinked,
            root: None,
            root_stmt: None,
            reference: None,
            derived: Vec::new(),
        }
    }
}

/// Linkage of a composite generator.
#[derive(Debug, Clone)]
pub(crate) struct CompositeState {
    pub(crate) domain: DomainId,
    pub(crate) groupings: Vec<GeneratorId>,
    pub(crate) augments: Vec<GeneratorId>,
    /// Direct users, for groupings only.
    pub(crate) users: Vec<GeneratorId>,
}

impl CompositeState {
    pub(crate) fn new(domain: DomainId) -> Self {
        Self {
            domain,
            groupings: Vec::new(),
            augments: Vec::new(),
            users: Vec::new(),
        }
    }
}

/// Linkage of an augment generator.
#[derive(Debug, Clone)]
pub(crate) struct AugmentState {
    /// Enclosing `uses`, for uses-augments.
    pub(crate) uses: Option<StmtId>,
    pub(crate) grouping: Option<GeneratorId>,
    pub(crate) target: Option<GeneratorId>,
    pub(crate) path_len: usize,
}

/// Position of a data node in the `ChildOf`/`ChoiceIn` hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Hierarchy {
    pub(crate) child_of: Option<GeneratorId>,
    pub(crate) choice: Option<GeneratorId>,
}

/// One node of the generator forest.
#[derive(Debug)]
pub struct Generator {
    pub(crate) kind: GeneratorKind,
    pub(crate) statement: StmtId,
    pub(crate) parent: Option<GeneratorId>,
    pub(crate) children: Vec<GeneratorId>,
    pub(crate) provenance: Provenance,
    pub(crate) composite: Option<CompositeState>,
    pub(crate) type_state: Option<TypeState>,
    pub(crate) augment: Option<AugmentState>,
    pub(crate) bases: Vec<GeneratorId>,
    pub(crate) prev: Option<GeneratorId>,
    pub(crate) orig: Option<GeneratorId>,
    pub(crate) hierarchy: Option<Hierarchy>,
    pub(crate) placement: OnceCell<ClassPlacement>,
    pub(crate) member: OnceCell<Option<MemberId>>,
    pub(crate) java_package: OnceCell<Option<String>>,
    pub(crate) type_name: OnceCell<Option<JavaTypeName>>,
    pub(crate) result: OnceCell<GeneratorResult>,
    pub(crate) runtime: OnceCell<Option<RuntimeType>>,
}

impl Generator {
    pub(crate) fn new(
        kind: GeneratorKind,
        statement: StmtId,
        parent: Option<GeneratorId>,
        provenance: Provenance,
    ) -> Self {
        Self {
            kind,
            statement,
            parent,
            children: Vec::new(),
            provenance,
            composite: None,
            type_state: None,
            augment: None,
            bases: Vec::new(),
            prev: None,
            orig: None,
            hierarchy: None,
            placement: OnceCell::new(),
            member: OnceCell::new(),
            java_package: OnceCell::new(),
            type_name: OnceCell::new(),
            result: OnceCell::new(),
            runtime: OnceCell::new(),
        }
    }

    /// Returns the generator kind.
    #[must_use]
    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    /// Returns the schema statement behind this generator.
    ///
    /// Synthetic generators share the statement of their owner.
    #[must_use]
    pub fn statement(&self) -> StmtId {
        self.statement
    }

    /// Returns the parent generator. Modules have none.
    #[must_use]
    pub fn parent(&self) -> Option<GeneratorId> {
        self.parent
    }

    /// Returns the children in declaration order, augments last.
    #[must_use]
    pub fn children(&self) -> &[GeneratorId] {
        &self.children
    }

    /// Returns how the underlying statement came to be here.
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Returns the class placement, once names have been assigned.
    #[must_use]
    pub fn placement(&self) -> Option<ClassPlacement> {
        self.placement.get().copied()
    }

    /// Returns true if this generator was declared where it appears.
    #[must_use]
    pub fn is_original(&self) -> bool {
        self.provenance.is_original()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_flags() {
        assert!(GeneratorKind::UsesAugment.is_composite());
        assert!(GeneratorKind::UsesAugment.is_augment());
        assert!(!GeneratorKind::UsesAugment.is_schema_tree());
        assert!(GeneratorKind::Opaque.is_schema_tree());
        assert!(!GeneratorKind::Key.is_schema_tree());
        assert!(GeneratorKind::Typedef.is_type_aware());
        assert!(!GeneratorKind::Leaf.is_composite());
    }

    #[test]
    fn test_result_accessors() {
        assert!(GeneratorResult::Empty.generated_type().is_none());
        assert!(GeneratorResult::Empty.top_level().is_none());
    }
}
