//! `ChildOf` and `ChoiceIn` parents.

use crate::reactor::generator::{GeneratorId, GeneratorKind, Hierarchy};
use crate::reactor::GeneratorReactor;

impl GeneratorReactor<'_> {
    /// Records the data parent of every original data node and the choice
    /// of every original case.
    pub(super) fn link_hierarchy(&mut self) {
        for id in self.order.clone() {
            let g = &self.generators[id.0];
            if !g.provenance.is_original() {
                continue;
            }
            let hierarchy = match g.kind {
                GeneratorKind::Container
                | GeneratorKind::List
                | GeneratorKind::Choice
                | GeneratorKind::Opaque => Hierarchy {
                    child_of: self.child_of_ancestor(id),
                    choice: None,
                },
                GeneratorKind::Case => Hierarchy {
                    child_of: None,
                    choice: self.enclosing_choice(id),
                },
                _ => continue,
            };
            self.generators[id.0].hierarchy = Some(hierarchy);
        }
    }

    /// Returns the closest ancestor a data node is a child of.
    ///
    /// Choices and cases do not appear in data, and an augment stands for
    /// the original definition of its target.
    pub(super) fn child_of_ancestor(&self, id: GeneratorId) -> Option<GeneratorId> {
        let mut ancestor = self.generators[id.0].parent?;
        loop {
            match self.generators[ancestor.0].kind {
                GeneratorKind::Choice | GeneratorKind::Case => {
                    ancestor = self.generators[ancestor.0].parent?;
                }
                GeneratorKind::ModuleAugment | GeneratorKind::UsesAugment => {
                    let target = self.augment_target(ancestor)?;
                    ancestor = self.original_or_self(target);
                }
                _ => return Some(ancestor),
            }
        }
    }

    fn enclosing_choice(&self, id: GeneratorId) -> Option<GeneratorId> {
        let parent = self.generators[id.0].parent?;
        let choice = match self.generators[parent.0].kind {
            GeneratorKind::Choice => parent,
            GeneratorKind::ModuleAugment | GeneratorKind::UsesAugment => {
                self.original_or_self(self.augment_target(parent)?)
            }
            _ => return None,
        };
        (self.generators[choice.0].kind == GeneratorKind::Choice).then_some(choice)
    }

    /// Returns the recorded `ChildOf` parent.
    pub(super) fn child_of(&self, id: GeneratorId) -> Option<GeneratorId> {
        self.generators[id.0].hierarchy.and_then(|h| h.child_of)
    }

    /// Returns the recorded `ChoiceIn` choice.
    pub(super) fn choice_of(&self, id: GeneratorId) -> Option<GeneratorId> {
        self.generators[id.0].hierarchy.and_then(|h| h.choice)
    }
}
