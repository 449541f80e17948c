//! Type and identity linkage.
//!
//! Typedefs and identities are linked first so that leaf types can find
//! them. Leafrefs and identityrefs are then bound on every generator whose
//! type is a built-in, and the outcome cascades to every typedef, leaf and
//! leaf-list deriving from it, in whatever order they were declared.

use std::collections::VecDeque;

use yangbind_core::BuiltinType;
use yangbind_schema::{
    QName, SchemaError, SchemaInferenceStack, StatementKind, StmtId, TypeName,
};

use crate::error::ReactorError;
use crate::reactor::generator::{GeneratorId, GeneratorKind, TypeBase, TypeReference};
use crate::reactor::GeneratorReactor;

impl GeneratorReactor<'_> {
    /// Links typedefs to their base types and identities to their bases.
    pub(super) fn link_typedefs(&mut self) -> Result<(), ReactorError> {
        for id in self.order.clone() {
            let g = &self.generators[id.0];
            if !g.provenance.is_original() {
                continue;
            }
            match g.kind {
                GeneratorKind::Typedef => self.link_type_base(id)?,
                GeneratorKind::Identity => self.link_identity_bases(id)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Links leaves and leaf-lists to their types.
    ///
    /// Copies are skipped; they share the linkage of their original.
    pub(super) fn link_types(&mut self) -> Result<(), ReactorError> {
        for id in self.order.clone() {
            let g = &self.generators[id.0];
            if g.provenance.is_original()
                && matches!(g.kind, GeneratorKind::Leaf | GeneratorKind::LeafList)
            {
                self.link_type_base(id)?;
            }
        }
        Ok(())
    }

    fn link_type_base(&mut self, id: GeneratorId) -> Result<(), ReactorError> {
        let Some(type_stmt) = self.type_state(id).map(|state| state.type_stmt) else {
            return Err(SchemaError::MissingType {
                node: self.describe(id),
                found: 0,
            }
            .into());
        };

        let base = match self.tree.statement(type_stmt).argument().as_type() {
            Some(TypeName::Builtin(builtin)) => TypeBase::Builtin(*builtin),
            Some(TypeName::Typedef(qname)) => {
                let typedef = self
                    .resolve_scoped(id, GeneratorKind::Typedef, qname)
                    .ok_or_else(|| ReactorError::TypedefNotFound {
                        type_name: qname.to_string(),
                        node: self.describe(id),
                    })?;
                if let Some(state) = self.type_state_mut(typedef) {
                    state.derived.push(id);
                }
                TypeBase::Typedef(typedef)
            }
            None => {
                return Err(SchemaError::invalid_argument(self.describe(id), "a type name").into());
            }
        };

        tracing::trace!(node = %self.describe(id), base = ?base, "Linked type");
        if let Some(state) = self.type_state_mut(id) {
            state.base = base;
        }
        Ok(())
    }

    fn link_identity_bases(&mut self, id: GeneratorId) -> Result<(), ReactorError> {
        let stmt = self.generators[id.0].statement;
        let names: Vec<QName> = self
            .tree
            .children_of_kind(stmt, &StatementKind::Base)
            .filter_map(|base| self.tree.statement(base).qname().cloned())
            .collect();
        let mut bases = Vec::with_capacity(names.len());
        for name in &names {
            bases.push(self.resolve_identity(id, name)?);
        }
        self.generators[id.0].bases = bases;
        Ok(())
    }

    fn resolve_identity(&self, from: GeneratorId, qname: &QName) -> Result<GeneratorId, ReactorError> {
        self.modules
            .get(qname.module())
            .and_then(|module| self.find_definition(*module, GeneratorKind::Identity, qname))
            .ok_or_else(|| ReactorError::IdentityNotFound {
                identity: qname.to_string(),
                node: self.describe(from),
            })
    }

    /// Binds leafrefs and identityrefs and settles the root built-in type of
    /// every original type-aware generator.
    ///
    /// # Errors
    /// Returns [`ReactorError::UnresolvedTypes`] if some derivation chain
    /// never reaches a built-in type.
    pub(super) fn bind_type_references(&mut self) -> Result<(), ReactorError> {
        let mut queue = VecDeque::new();
        for id in self.order.clone() {
            let g = &self.generators[id.0];
            if !g.provenance.is_original() || !g.kind.is_type_aware() {
                continue;
            }
            let TypeBase::Builtin(builtin) = self.type_base(id) else {
                continue;
            };
            let Some(type_stmt) = self.type_state(id).map(|s| s.type_stmt) else {
                continue;
            };
            let reference = self.bind_reference(id, builtin, type_stmt)?;
            if let Some(state) = self.type_state_mut(id) {
                state.root = Some(builtin);
                state.root_stmt = Some(type_stmt);
                state.reference = Some(reference);
            }
            queue.push_back(id);
        }

        while let Some(from) = queue.pop_front() {
            let Some(state) = self.type_state(from) else {
                continue;
            };
            let (root, root_stmt, reference) =
                (state.root, state.root_stmt, state.reference.clone());
            for derived in state.derived.clone() {
                if self.type_state(derived).is_some_and(|s| s.root.is_some()) {
                    continue;
                }
                let reference = match (&reference, root_stmt) {
                    (Some(TypeReference::Leafref(None)), Some(stmt))
                        if self.generators[derived.0].kind != GeneratorKind::Typedef =>
                    {
                        Some(TypeReference::Leafref(self.resolve_leafref(derived, stmt)?))
                    }
                    _ => reference.clone(),
                };
                if let Some(state) = self.type_state_mut(derived) {
                    state.root = root;
                    state.root_stmt = root_stmt;
                    state.reference = reference;
                }
                tracing::trace!(
                    node = %self.describe(derived),
                    from = %self.describe(from),
                    "Cascaded type resolution"
                );
                queue.push_back(derived);
            }
        }

        let unresolved: Vec<String> = self
            .order
            .iter()
            .filter(|id| {
                let g = &self.generators[id.0];
                g.provenance.is_original()
                    && g.kind.is_type_aware()
                    && self.type_state(**id).is_some_and(|s| s.root.is_none())
            })
            .map(|id| self.describe(*id))
            .collect();
        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(ReactorError::UnresolvedTypes {
                nodes: unresolved.join(", "),
            })
        }
    }

    fn bind_reference(
        &self,
        id: GeneratorId,
        builtin: BuiltinType,
        type_stmt: StmtId,
    ) -> Result<TypeReference, ReactorError> {
        match builtin {
            BuiltinType::Leafref => Ok(TypeReference::Leafref(self.resolve_leafref(id, type_stmt)?)),
            BuiltinType::Identityref => {
                let names: Vec<QName> = self
                    .tree
                    .children_of_kind(type_stmt, &StatementKind::Base)
                    .filter_map(|base| self.tree.statement(base).qname().cloned())
                    .collect();
                let mut bases = Vec::with_capacity(names.len());
                for name in &names {
                    bases.push(self.resolve_identity(id, name)?);
                }
                Ok(TypeReference::Identityref(bases))
            }
            _ => Ok(TypeReference::Plain),
        }
    }

    /// Resolves the leafref path held by `type_stmt` as seen from `id`.
    ///
    /// Outside instantiated contexts a missing target leaves the reference
    /// unresolved, unless strict leafrefs are configured.
    fn resolve_leafref(
        &self,
        id: GeneratorId,
        type_stmt: StmtId,
    ) -> Result<Option<GeneratorId>, ReactorError> {
        let Some(path) = self
            .tree
            .find_child(type_stmt, &StatementKind::Path)
            .and_then(|p| self.tree.statement(p).argument().as_path())
        else {
            return Err(SchemaError::invalid_argument(self.describe(id), "a leafref path").into());
        };

        let mut stack = SchemaInferenceStack::new(self.tree);
        let resolved = self
            .push_to_inference(id, &mut stack)
            .and_then(|()| stack.resolve_path_expression(path));
        let instantiated = stack.in_instantiated_context()
            && !self.has_ancestor(id, GeneratorKind::Grouping)
            && self.generators[id.0].kind != GeneratorKind::Typedef;

        let failure = match resolved {
            Ok(target) => match self.generator_for(target) {
                Some(found) => {
                    tracing::trace!(
                        node = %self.describe(id),
                        path = %path,
                        target = %self.describe(found),
                        "Resolved leafref"
                    );
                    return Ok(Some(found));
                }
                None => format!("{} has no generator", self.tree.describe(target)),
            },
            Err(err) => err.to_string(),
        };

        if instantiated || self.config.strict_leafrefs() {
            return Err(ReactorError::LeafrefTargetNotFound {
                path: path.to_string(),
                node: self.describe(id),
                reason: failure,
            });
        }
        tracing::warn!(
            node = %self.describe(id),
            path = %path,
            reason = %failure,
            "Leaving leafref unresolved outside instantiated context"
        );
        Ok(None)
    }

    /// Positions an inference stack at a generator's statement.
    ///
    /// Augments contribute their target path, other ancestors themselves.
    fn push_to_inference(
        &self,
        id: GeneratorId,
        stack: &mut SchemaInferenceStack<'_>,
    ) -> Result<(), SchemaError> {
        let mut chain = vec![id];
        let mut current = self.generators[id.0].parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.generators[parent.0].parent;
        }

        for step in chain.into_iter().rev() {
            let g = &self.generators[step.0];
            match g.kind {
                GeneratorKind::Module
                | GeneratorKind::Key
                | GeneratorKind::RpcService
                | GeneratorKind::NotificationService => {}
                GeneratorKind::ModuleAugment | GeneratorKind::UsesAugment => {
                    if let Some(target) = self.tree.statement(g.statement).argument().as_schema_node_id() {
                        stack.enter_schema_node_id(target)?;
                    }
                }
                _ => stack.enter_statement(g.statement),
            }
        }
        Ok(())
    }

    /// Looks up a grouping or typedef by name, the way YANG scopes them.
    ///
    /// Names from the local module are searched outward from `scope`; names
    /// from other modules among that module's top-level definitions.
    pub(super) fn resolve_scoped(
        &self,
        scope: GeneratorId,
        kind: GeneratorKind,
        qname: &QName,
    ) -> Option<GeneratorId> {
        if self.namespace_of(scope) == Some(qname.module()) {
            let mut current = Some(scope);
            while let Some(id) = current {
                if let Some(found) = self.find_definition(id, kind, qname) {
                    return Some(found);
                }
                current = self.generators[id.0].parent;
            }
            None
        } else {
            let module = self.modules.get(qname.module())?;
            self.find_definition(*module, kind, qname)
        }
    }

    fn find_definition(
        &self,
        parent: GeneratorId,
        kind: GeneratorKind,
        qname: &QName,
    ) -> Option<GeneratorId> {
        self.generators[parent.0].children.iter().copied().find(|child| {
            let g = &self.generators[child.0];
            g.kind == kind && g.provenance.is_original() && self.qname_of(*child) == Some(qname)
        })
    }
}
