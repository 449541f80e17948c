//! Grouping and augment linkage.

use yangbind_schema::{QName, QNameModule, SchemaError, StatementKind};

use crate::error::ReactorError;
use crate::reactor::generator::{GeneratorId, GeneratorKind};
use crate::reactor::GeneratorReactor;

impl GeneratorReactor<'_> {
    /// Links every `uses` in an original composite to its grouping.
    ///
    /// The grouping records the composite as a user, and augments nested in
    /// the `uses` learn which grouping they apply to.
    pub(super) fn link_uses(&mut self) -> Result<(), ReactorError> {
        let tree = self.tree;
        for id in self.order.clone() {
            let g = &self.generators[id.0];
            if !g.provenance.is_original() || g.composite.is_none() {
                continue;
            }
            let statement = g.statement;
            for uses in tree.children_of_kind(statement, &StatementKind::Uses) {
                let Some(qname) = tree.statement(uses).qname() else {
                    return Err(
                        SchemaError::invalid_argument(tree.describe(uses), "a grouping name").into(),
                    );
                };
                let grouping = self
                    .resolve_scoped(id, GeneratorKind::Grouping, qname)
                    .ok_or_else(|| ReactorError::GroupingNotFound {
                        grouping: qname.to_string(),
                        node: tree.describe(uses),
                    })?;

                if let Some(composite) = self.composite_mut(id) {
                    composite.groupings.push(grouping);
                }
                if let Some(composite) = self.composite_mut(grouping) {
                    composite.users.push(id);
                }
                for child in self.generators[id.0].children.clone() {
                    if let Some(augment) = self.generators[child.0].augment.as_mut() {
                        if augment.uses == Some(uses) {
                            augment.grouping = Some(grouping);
                        }
                    }
                }
                tracing::trace!(
                    node = %self.describe(id),
                    grouping = %self.describe(grouping),
                    "Linked uses"
                );
            }
        }
        Ok(())
    }

    /// Attaches every augment to its target.
    ///
    /// Targets may be introduced by other augments, so unresolved augments
    /// are retried until a sweep makes no progress.
    ///
    /// # Errors
    /// Returns [`ReactorError::AugmentTargetNotFound`] for the first augment
    /// left over, or [`ReactorError::InvalidAugmentTarget`] if a target
    /// cannot hold children.
    pub(super) fn link_augment_targets(&mut self) -> Result<(), ReactorError> {
        let mut pending: Vec<GeneratorId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.generators[id.0].kind.is_augment())
            .collect();

        while !pending.is_empty() {
            let before = pending.len();
            let mut remaining = Vec::new();
            for augment in pending {
                match self.find_augment_target(augment) {
                    Some(target) => self.attach_augment(augment, target)?,
                    None => remaining.push(augment),
                }
            }

            if remaining.len() == before {
                let augment = remaining[0];
                let target = self
                    .tree
                    .statement(self.generators[augment.0].statement)
                    .argument()
                    .as_schema_node_id()
                    .map_or_else(String::new, ToString::to_string);
                return Err(ReactorError::AugmentTargetNotFound {
                    target,
                    node: self.describe(augment),
                });
            }
            if !remaining.is_empty() {
                tracing::debug!(remaining = remaining.len(), "Retrying augment targets");
            }
            pending = remaining;
        }

        for id in self.order.clone() {
            let mut augments = match self.generators[id.0].composite.as_ref() {
                Some(composite) if composite.augments.len() > 1 => composite.augments.clone(),
                _ => continue,
            };
            augments.sort_by_key(|a| self.augment_state(*a).map_or(0, |s| s.path_len));
            if let Some(composite) = self.composite_mut(id) {
                composite.augments = augments;
            }
        }
        Ok(())
    }

    fn find_augment_target(&self, augment: GeneratorId) -> Option<GeneratorId> {
        let g = &self.generators[augment.0];
        let state = g.augment.as_ref()?;
        let target = self.tree.statement(g.statement).argument().as_schema_node_id()?;
        let steps = target.steps();

        if state.uses.is_none() {
            let module = self.modules.get(steps.first()?.module())?;
            return self.walk_schema_path(*module, steps);
        }

        let grouping = state.grouping?;
        let namespace = self.namespace_of(grouping)?;
        let in_grouping: Vec<QName> = steps.iter().map(|step| step.bind_to(namespace)).collect();
        let template = self.walk_schema_path(grouping, &in_grouping)?;
        let parent = g.parent?;
        self.walk_schema_path(parent, steps).or(Some(template))
    }

    fn attach_augment(&mut self, augment: GeneratorId, target: GeneratorId) -> Result<(), ReactorError> {
        if self.generators[target.0].composite.is_none() {
            return Err(ReactorError::InvalidAugmentTarget {
                target: self.describe(target),
                node: self.describe(augment),
            });
        }
        if let Some(state) = self.generators[augment.0].augment.as_mut() {
            state.target = Some(target);
        }
        if let Some(composite) = self.composite_mut(target) {
            composite.augments.push(augment);
        }
        tracing::trace!(
            augment = %self.describe(augment),
            target = %self.describe(target),
            "Attached augment"
        );
        Ok(())
    }

    /// Follows a path of schema-tree names from `start`.
    pub(super) fn walk_schema_path(&self, start: GeneratorId, steps: &[QName]) -> Option<GeneratorId> {
        let mut current = start;
        let mut rebound: Option<QNameModule> = None;
        for step in steps {
            let step = match &rebound {
                Some(namespace) => step.bind_to(namespace),
                None => step.clone(),
            };
            let (found, namespace) = self.find_schema_tree_generator(current, &step)?;
            if namespace.is_some() {
                rebound = namespace;
            }
            current = found;
        }
        Some(current)
    }

    /// Finds a schema-tree child of a composite, looking through its
    /// groupings and augments as well.
    ///
    /// A match inside a grouping also returns the grouping's namespace,
    /// which the remaining steps of a walk must use.
    pub(super) fn find_schema_tree_generator(
        &self,
        parent: GeneratorId,
        qname: &QName,
    ) -> Option<(GeneratorId, Option<QNameModule>)> {
        let mut seen = Vec::new();
        self.find_schema_tree_in(parent, qname, true, &mut seen)
    }

    /// Like [`Self::find_schema_tree_generator`], skipping local children.
    pub(super) fn find_inferred_generator(
        &self,
        parent: GeneratorId,
        qname: &QName,
    ) -> Option<GeneratorId> {
        let mut seen = Vec::new();
        self.find_schema_tree_in(parent, qname, false, &mut seen)
            .map(|(found, _)| found)
    }

    fn find_schema_tree_in(
        &self,
        parent: GeneratorId,
        qname: &QName,
        local: bool,
        seen: &mut Vec<GeneratorId>,
    ) -> Option<(GeneratorId, Option<QNameModule>)> {
        if seen.contains(&parent) {
            return None;
        }
        seen.push(parent);

        if local {
            let found = self.generators[parent.0].children.iter().copied().find(|child| {
                self.generators[child.0].kind.is_schema_tree()
                    && self.qname_of(*child) == Some(qname)
            });
            if let Some(found) = found {
                return Some((found, None));
            }
        }

        let composite = self.generators[parent.0].composite.as_ref()?;
        for grouping in &composite.groupings {
            let Some(namespace) = self.namespace_of(*grouping) else {
                continue;
            };
            let bound = qname.bind_to(namespace);
            if let Some((found, _)) = self.find_schema_tree_in(*grouping, &bound, true, seen) {
                return Some((found, Some(namespace.clone())));
            }
        }
        for augment in &composite.augments {
            if let Some(found) = self.find_schema_tree_in(*augment, qname, true, seen) {
                return Some(found);
            }
        }
        None
    }
}
