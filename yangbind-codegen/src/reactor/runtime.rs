//! Runtime type views.

use yangbind_core::types::binding;
use yangbind_core::{RuntimeType, RuntimeTypeKind, Type};

use crate::reactor::generator::{GeneratorId, GeneratorKind};
use crate::reactor::{GeneratorReactor, ReactorState};

impl GeneratorReactor<'_> {
    /// Returns the runtime view of a generator.
    ///
    /// Views are built on first request and memoized. Copies reuse the Java
    /// type of their original definition. Returns `None` before the reactor
    /// finished.
    #[must_use]
    pub fn runtime_type(&self, id: GeneratorId) -> Option<&RuntimeType> {
        if self.state != ReactorState::Finished {
            return None;
        }
        self.generators[id.0]
            .runtime
            .get_or_init(|| self.build_runtime(id))
            .as_ref()
    }

    fn build_runtime(&self, id: GeneratorId) -> Option<RuntimeType> {
        let g = &self.generators[id.0];
        let kind = runtime_kind(g.kind);
        let schema_name = match g.kind {
            GeneratorKind::Module => self.module_name_of(id),
            GeneratorKind::RpcService | GeneratorKind::NotificationService => {
                self.type_name(id)?.simple_name().to_string()
            }
            GeneratorKind::ModuleAugment | GeneratorKind::UsesAugment => self
                .tree
                .statement(g.statement)
                .argument()
                .as_schema_node_id()?
                .to_string(),
            _ => self.qname_of(id)?.local_name().to_string(),
        };

        let java_type = match g.kind {
            GeneratorKind::Leaf => Some(self.leaf_value_type(id, 0)),
            GeneratorKind::LeafList => Some(binding::collection(
                "Set",
                vec![self.leaf_value_type(id, 0)],
            )),
            _ => self
                .type_name(self.original_or_self(id))
                .or_else(|| self.type_name(id))
                .map(|name| Type::named(name.clone())),
        };

        let mut runtime = RuntimeType::new(kind, schema_name, java_type);
        for child in &g.children {
            if self.generators[child.0].kind.is_schema_tree()
                || self.generators[child.0].kind == GeneratorKind::Grouping
            {
                if let Some(view) = self.runtime_type_unchecked(*child) {
                    runtime.children.push(view.clone());
                }
            }
        }
        runtime.augments = self
            .augments(id)
            .iter()
            .filter_map(|augment| self.type_name(*augment).cloned())
            .collect();
        if g.kind == GeneratorKind::Grouping {
            runtime.instantiations = self
                .grouping_users(id)
                .into_iter()
                .filter_map(|user| {
                    self.type_name(self.original_or_self(user))
                        .or_else(|| self.type_name(user))
                        .cloned()
                })
                .collect();
        }
        Some(runtime)
    }

    fn runtime_type_unchecked(&self, id: GeneratorId) -> Option<&RuntimeType> {
        self.generators[id.0]
            .runtime
            .get_or_init(|| self.build_runtime(id))
            .as_ref()
    }
}

fn runtime_kind(kind: GeneratorKind) -> RuntimeTypeKind {
    match kind {
        GeneratorKind::Module => RuntimeTypeKind::Module,
        GeneratorKind::Container => RuntimeTypeKind::Container,
        GeneratorKind::List => RuntimeTypeKind::List,
        GeneratorKind::Key => RuntimeTypeKind::Key,
        GeneratorKind::Choice => RuntimeTypeKind::Choice,
        GeneratorKind::Case => RuntimeTypeKind::Case,
        GeneratorKind::Grouping => RuntimeTypeKind::Grouping,
        GeneratorKind::Typedef => RuntimeTypeKind::Typedef,
        GeneratorKind::Identity => RuntimeTypeKind::Identity,
        GeneratorKind::Leaf => RuntimeTypeKind::Leaf,
        GeneratorKind::LeafList => RuntimeTypeKind::LeafList,
        GeneratorKind::Opaque => RuntimeTypeKind::Opaque,
        GeneratorKind::Rpc => RuntimeTypeKind::Rpc,
        GeneratorKind::Action => RuntimeTypeKind::Action,
        GeneratorKind::Input => RuntimeTypeKind::Input,
        GeneratorKind::Output => RuntimeTypeKind::Output,
        GeneratorKind::Notification => RuntimeTypeKind::Notification,
        GeneratorKind::ModuleAugment | GeneratorKind::UsesAugment => {
            RuntimeTypeKind::Augmentation
        }
        GeneratorKind::RpcService | GeneratorKind::NotificationService => {
            RuntimeTypeKind::Service
        }
    }
}
