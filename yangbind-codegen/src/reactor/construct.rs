//! Forest construction.
//!
//! Walks the schema tree once and creates a generator for every construct
//! that may contribute to the Java mapping. Copies introduced by `uses` and
//! `augment` get generators too, so that their Java identity can later be
//! borrowed from the original definition.

use yangbind_schema::{Provenance, StatementKind, StmtId};

use crate::reactor::generator::{
    AugmentState, CompositeState, Generator, GeneratorId, GeneratorKind, TypeState,
};
use crate::reactor::GeneratorReactor;

impl GeneratorReactor<'_> {
    pub(super) fn build_forest(&mut self) {
        let modules: Vec<_> = self
            .tree
            .modules()
            .map(|(module, stmt)| (module.clone(), stmt))
            .collect();

        for (module, stmt) in modules {
            let id = self.create_generator(GeneratorKind::Module, stmt, None, Provenance::Original);
            self.create_children(id, stmt);
            if self.config.compat_services() {
                self.add_services(id, stmt);
            }
            tracing::trace!(module = %module, generator = %id, "Created module generator");
            self.modules.insert(module, id);
        }

        let mut order = Vec::with_capacity(self.generators.len());
        let mut stack: Vec<GeneratorId> = self.modules.values().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.generators[id.0].children.iter().rev().copied());
        }
        self.order = order;
    }

    fn create_generator(
        &mut self,
        kind: GeneratorKind,
        statement: StmtId,
        parent: Option<GeneratorId>,
        provenance: Provenance,
    ) -> GeneratorId {
        let id = GeneratorId(self.generators.len());
        let mut generator = Generator::new(kind, statement, parent, provenance);
        if kind.is_composite() {
            let domain = self.domains.new_domain(self.tree.describe(statement));
            generator.composite = Some(CompositeState::new(domain));
        }
        if kind.is_type_aware() {
            generator.type_state = self
                .tree
                .find_child(statement, &StatementKind::Type)
                .map(TypeState::new);
        }
        self.generators.push(generator);
        self.by_statement.entry(statement).or_insert(id);
        id
    }

    fn create_children(&mut self, parent: GeneratorId, statement: StmtId) {
        let tree = self.tree;
        let parent_copied = !self.generators[parent.0].provenance.is_original();
        let parent_kind = self.generators[parent.0].kind;
        let mut children = Vec::new();
        let mut augments = Vec::new();

        for &child in tree.children(statement) {
            let stmt = tree.statement(child);
            let kind = match stmt.kind() {
                StatementKind::Container => GeneratorKind::Container,
                StatementKind::List => GeneratorKind::List,
                StatementKind::Leaf => GeneratorKind::Leaf,
                StatementKind::LeafList => GeneratorKind::LeafList,
                StatementKind::Choice => GeneratorKind::Choice,
                StatementKind::Case => GeneratorKind::Case,
                StatementKind::Anydata | StatementKind::Anyxml => GeneratorKind::Opaque,
                StatementKind::Rpc => GeneratorKind::Rpc,
                StatementKind::Action => GeneratorKind::Action,
                StatementKind::Input => GeneratorKind::Input,
                StatementKind::Output => GeneratorKind::Output,
                StatementKind::Notification => GeneratorKind::Notification,
                StatementKind::Grouping | StatementKind::Typedef | StatementKind::Identity
                    if parent_copied =>
                {
                    continue;
                }
                StatementKind::Grouping => GeneratorKind::Grouping,
                StatementKind::Typedef => GeneratorKind::Typedef,
                StatementKind::Identity => GeneratorKind::Identity,
                StatementKind::Augment => {
                    if parent_kind == GeneratorKind::Module {
                        augments.push(self.create_augment(parent, child, None));
                    }
                    continue;
                }
                StatementKind::Uses => {
                    if !parent_copied {
                        let nested: Vec<_> = self
                            .tree
                            .children_of_kind(child, &StatementKind::Augment)
                            .collect();
                        for augment in nested {
                            augments.push(self.create_augment(parent, augment, Some(child)));
                        }
                    }
                    continue;
                }
                StatementKind::Unknown(keyword) => {
                    tracing::debug!(
                        keyword = %keyword,
                        node = %tree.describe(child),
                        "Skipping unsupported statement"
                    );
                    continue;
                }
                StatementKind::Module
                | StatementKind::Type
                | StatementKind::Base
                | StatementKind::Path
                | StatementKind::Key
                | StatementKind::Enum
                | StatementKind::Bit => continue,
            };

            let provenance = stmt.provenance();
            let id = self.create_generator(kind, child, Some(parent), provenance);
            if kind.is_composite() {
                self.create_children(id, child);
            }
            if kind == GeneratorKind::List
                && provenance.is_original()
                && tree.find_child(child, &StatementKind::Key).is_some()
            {
                let key = self.create_generator(GeneratorKind::Key, child, Some(id), provenance);
                self.generators[id.0].children.push(key);
            }
            children.push(id);
        }

        augments.sort_by_key(|id| {
            self.generators[id.0]
                .augment
                .as_ref()
                .map_or(0, |a| a.path_len)
        });
        children.extend(augments);
        self.generators[parent.0].children = children;
    }

    fn create_augment(
        &mut self,
        parent: GeneratorId,
        statement: StmtId,
        uses: Option<StmtId>,
    ) -> GeneratorId {
        let kind = if uses.is_some() {
            GeneratorKind::UsesAugment
        } else {
            GeneratorKind::ModuleAugment
        };
        let path_len = self
            .tree
            .statement(statement)
            .argument()
            .as_schema_node_id()
            .map_or(0, |target| target.len());
        let provenance = self.tree.statement(statement).provenance();
        let id = self.create_generator(kind, statement, Some(parent), provenance);
        self.generators[id.0].augment = Some(AugmentState {
            uses,
            grouping: None,
            target: None,
            path_len,
        });
        self.create_children(id, statement);
        id
    }

    /// Adds the compatibility service and listener of a module.
    fn add_services(&mut self, module: GeneratorId, statement: StmtId) {
        let has = |kind: &StatementKind| {
            self.tree.children_of_kind(statement, kind).any(|child| {
                self.tree.statement(child).provenance().is_original()
            })
        };
        let rpcs = has(&StatementKind::Rpc);
        let notifications = has(&StatementKind::Notification);

        if rpcs {
            let id = self.create_generator(
                GeneratorKind::RpcService,
                statement,
                Some(module),
                Provenance::Original,
            );
            self.generators[module.0].children.push(id);
        }
        if notifications {
            let id = self.create_generator(
                GeneratorKind::NotificationService,
                statement,
                Some(module),
                Provenance::Original,
            );
            self.generators[module.0].children.push(id);
        }
    }
}
