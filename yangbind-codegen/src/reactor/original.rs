//! Original definition linkage.
//!
//! A copy introduced by `uses` or `augment` carries no Java identity of its
//! own. Each copy is linked to the previous incarnation it was copied from,
//! and through that chain to the original definition whose class it reuses.

use yangbind_schema::QName;

use crate::error::ReactorError;
use crate::reactor::generator::GeneratorId;
use crate::reactor::GeneratorReactor;

impl GeneratorReactor<'_> {
    /// Links every generator to its original definition.
    ///
    /// A copy can only be linked once its previous incarnation is, so the
    /// forest is swept until nothing is left or a sweep makes no progress.
    pub(super) fn link_originals(&mut self) -> Result<(), ReactorError> {
        let mut pending = self.order.clone();
        let mut sweeps = 0usize;
        loop {
            let before = pending.len();
            pending.retain(|id| !self.link_original(*id));
            sweeps += 1;
            if pending.is_empty() {
                tracing::debug!(sweeps, "Linked original definitions");
                return Ok(());
            }
            if pending.len() == before {
                let nodes: Vec<String> = pending.iter().map(|id| self.describe(*id)).collect();
                return Err(ReactorError::UnresolvedOriginals {
                    nodes: nodes.join(", "),
                });
            }
            tracing::trace!(remaining = pending.len(), "Retrying original linkage");
        }
    }

    /// Attempts to link a generator to its original definition.
    ///
    /// Returns `true` once the generator is linked; calling it again is a
    /// no-op returning `true`.
    pub fn link_original(&mut self, id: GeneratorId) -> bool {
        if self.generators[id.0].orig.is_some() {
            return true;
        }

        if self.generators[id.0].prev.is_none() {
            if self.generators[id.0].provenance.is_original() {
                let g = &mut self.generators[id.0];
                g.prev = Some(id);
                g.orig = Some(id);
                return true;
            }
            let Some(parent) = self.generators[id.0].parent else {
                return false;
            };
            let Some(qname) = self.qname_of(id).cloned() else {
                return false;
            };
            let Some(prev) = self.original_child(parent, &qname) else {
                return false;
            };
            self.generators[id.0].prev = Some(prev);
        }

        let Some(prev) = self.generators[id.0].prev else {
            return false;
        };
        match self.generators[prev.0].orig {
            Some(orig) => {
                self.generators[id.0].orig = Some(orig);
                tracing::trace!(
                    node = %self.describe(id),
                    original = %self.describe(orig),
                    "Linked original definition"
                );
                true
            }
            None => false,
        }
    }

    /// Finds the previous incarnation of a copied child of `parent`.
    fn original_child(&self, parent: GeneratorId, qname: &QName) -> Option<GeneratorId> {
        if let Some(found) = self.find_inferred_generator(parent, qname) {
            return Some(found);
        }

        let previous = self.generators[parent.0].prev.filter(|prev| *prev != parent)?;
        let shares_namespace = self
            .qname_of(parent)
            .is_some_and(|parent_name| parent_name.module() == qname.module());
        let bound = match self.qname_of(previous) {
            Some(previous_name) if shares_namespace => qname.bind_to(previous_name.module()),
            _ => qname.clone(),
        };
        self.find_schema_tree_generator(previous, &bound)
            .map(|(found, _)| found)
    }
}
