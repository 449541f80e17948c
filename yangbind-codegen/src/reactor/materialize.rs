//! Type materialization.
//!
//! Each generator with a class builds exactly one [`GeneratedType`] through
//! the factory handed to the reactor. Enclosed types are built on demand by
//! their parent, so the factory sees them before the type enclosing them.

use yangbind_core::naming::{
    getter_name, listener_method_name, nonnull_name, property_name, require_name,
};
use yangbind_core::types::binding;
use yangbind_core::{
    Annotation, BuiltinType, GeneratedType, GeneratedTypeBuilder, GeneratedTypeKind, JavaTypeName,
    Type, TypeBuilderFactory, ValueMechanics,
};
use yangbind_schema::{StatementKind, Status, StmtId, TypeName};

use crate::error::ReactorError;
use crate::reactor::generator::{
    ClassPlacement, GeneratorId, GeneratorKind, GeneratorResult, TypeBase, TypeReference,
};
use crate::reactor::GeneratorReactor;

/// Leafref chains longer than this are mapped to `Object`.
const MAX_LEAFREF_DEPTH: usize = 16;

impl GeneratorReactor<'_> {
    pub(super) fn create_types(
        &mut self,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<(), ReactorError> {
        let mut built = 0usize;
        for id in self.order.clone() {
            if self.ensure_type(id, factory)?.generated_type().is_some() {
                built += 1;
            }
        }
        tracing::debug!(types = built, "Materialized generated types");
        Ok(())
    }

    /// Returns the materialized type of a generator, building it first if
    /// needed.
    ///
    /// The factory is asked for a builder at most once per generator.
    ///
    /// # Errors
    /// Returns [`ReactorError::NotExecuted`] before names are assigned, or a
    /// descriptor error if the built type is inconsistent.
    pub fn ensure_type(
        &self,
        id: GeneratorId,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<&GeneratorResult, ReactorError> {
        let g = &self.generators[id.0];
        if g.type_name.get().is_none() {
            return Err(ReactorError::NotExecuted);
        }
        if g.result.get().is_none() {
            let result = self.build_result(id, factory)?;
            let _ = g.result.set(result);
        }
        g.result.get().ok_or(ReactorError::NotExecuted)
    }

    fn build_result(
        &self,
        id: GeneratorId,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratorResult, ReactorError> {
        let placement = self.placement_of(id);
        let name = match (placement, self.type_name(id)) {
            (ClassPlacement::Member | ClassPlacement::TopLevel, Some(name)) => name.clone(),
            _ => return Ok(GeneratorResult::Empty),
        };

        let ty = match self.generators[id.0].kind {
            GeneratorKind::Module => self.build_module(id, name, factory)?,
            GeneratorKind::Container
            | GeneratorKind::List
            | GeneratorKind::Case
            | GeneratorKind::Grouping
            | GeneratorKind::Notification
            | GeneratorKind::Input
            | GeneratorKind::Output => self.build_data_object(id, name, factory)?,
            GeneratorKind::ModuleAugment | GeneratorKind::UsesAugment => {
                self.build_augmentation(id, name, factory)?
            }
            GeneratorKind::Choice => self.build_choice(id, name, factory)?,
            GeneratorKind::Opaque => self.build_opaque(id, name, factory)?,
            GeneratorKind::Identity => self.build_identity(id, name, factory)?,
            GeneratorKind::Typedef | GeneratorKind::Leaf | GeneratorKind::LeafList => {
                self.build_type_definition(id, name, factory)?
            }
            GeneratorKind::Key => self.build_key(id, name, factory)?,
            GeneratorKind::Rpc => self.build_rpc(id, name, factory)?,
            GeneratorKind::Action => self.build_action(id, name, factory)?,
            GeneratorKind::RpcService => self.build_rpc_service(id, name, factory)?,
            GeneratorKind::NotificationService => self.build_listener(id, name, factory)?,
        };
        tracing::trace!(node = %self.describe(id), name = %ty.name, "Built type");

        Ok(match placement {
            ClassPlacement::Member => GeneratorResult::Member(ty),
            _ => GeneratorResult::TopLevel(ty),
        })
    }

    fn build_module(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name);
        builder.add_implements_type(binding::data_root());
        self.add_groupings(&mut builder, id);
        self.add_members(&mut builder, id, factory)?;
        self.annotate(&mut builder, id);
        Ok(builder.build()?)
    }

    fn build_data_object(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let kind = self.generators[id.0].kind;
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name.clone());
        match kind {
            GeneratorKind::Container | GeneratorKind::List => {
                match self.child_of(id).and_then(|parent| self.type_name(parent)) {
                    Some(parent) => builder.add_implements_type(binding::child_of(parent)),
                    None => builder.add_implements_type(binding::data_object()),
                };
            }
            GeneratorKind::Case => {
                if let Some(choice) = self.choice_of(id).and_then(|c| self.type_name(c)) {
                    builder.add_implements_type(Type::named(choice.clone()));
                }
                builder.add_implements_type(binding::data_object());
            }
            GeneratorKind::Notification => {
                builder.add_implements_type(binding::notification(&name));
            }
            GeneratorKind::Input => {
                builder.add_implements_type(binding::rpc_input());
            }
            GeneratorKind::Output => {
                builder.add_implements_type(binding::rpc_output());
            }
            _ => {
                builder.add_implements_type(binding::data_object());
            }
        }
        if kind != GeneratorKind::Grouping {
            builder.add_implements_type(binding::augmentable(&name));
        }
        self.add_groupings(&mut builder, id);

        if kind == GeneratorKind::List {
            if let Some(key) = self.key_type_name(id) {
                builder.add_implements_type(binding::identifiable(&key));
                builder.add_method("key").set_return_type(Type::named(key));
            }
        }
        self.add_members(&mut builder, id, factory)?;
        if kind != GeneratorKind::Grouping {
            add_binding_methods(&mut builder, &name);
        }
        self.annotate(&mut builder, id);
        Ok(builder.build()?)
    }

    fn build_augmentation(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name.clone());
        let target = self.augment_target(id).and_then(|target| {
            self.type_name(self.original_or_self(target))
                .or_else(|| self.type_name(target))
        });
        match target {
            Some(target) => builder.add_implements_type(binding::augmentation(target)),
            None => builder.add_implements_type(binding::data_object()),
        };
        self.add_groupings(&mut builder, id);
        self.add_members(&mut builder, id, factory)?;
        add_binding_methods(&mut builder, &name);
        self.annotate(&mut builder, id);
        Ok(builder.build()?)
    }

    fn build_choice(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name);
        match self.child_of(id).and_then(|parent| self.type_name(parent)) {
            Some(parent) => builder.add_implements_type(binding::choice_in(parent)),
            None => builder.add_implements_type(binding::data_object()),
        };
        self.annotate(&mut builder, id);
        Ok(builder.build()?)
    }

    fn build_opaque(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name.clone());
        builder.add_implements_type(binding::opaque_object(&name));
        if let Some(parent) = self.child_of(id).and_then(|parent| self.type_name(parent)) {
            builder.add_implements_type(binding::child_of(parent));
        }
        self.annotate(&mut builder, id);
        Ok(builder.build()?)
    }

    fn build_identity(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name);
        let bases: Vec<&JavaTypeName> = self.generators[id.0]
            .bases
            .iter()
            .filter_map(|base| self.type_name(*base))
            .collect();
        if bases.is_empty() {
            builder.add_implements_type(binding::base_identity());
        }
        for base in bases {
            builder.add_implements_type(Type::named(base.clone()));
        }
        self.annotate(&mut builder, id);
        Ok(builder.build()?)
    }

    /// Builds the class of a typedef, or the enclosed class of a leaf with
    /// an inline enumeration, bits or union type.
    fn build_type_definition(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let base = self.type_base(id);
        let type_stmt = self.type_state(id).map(|state| state.type_stmt);
        let kind = if base == TypeBase::Builtin(BuiltinType::Enumeration) {
            GeneratedTypeKind::Enumeration
        } else {
            GeneratedTypeKind::TransferObject
        };
        let mut builder = factory.new_type_builder(kind, name);

        match (base, type_stmt) {
            (TypeBase::Typedef(parent), _) => match self.type_name(parent) {
                Some(parent) => {
                    builder.set_extends(Type::named(parent.clone()));
                }
                None => {
                    builder.add_property("value", self.leaf_value_type(id, 0));
                }
            },
            (TypeBase::Builtin(BuiltinType::Enumeration), Some(stmt)) => {
                for (value, member) in self.tree.children_of_kind(stmt, &StatementKind::Enum).enumerate() {
                    if let Some(label) = self.tree.statement(member).argument().as_text() {
                        builder.add_enum_value(label, i64::try_from(value).unwrap_or(i64::MAX));
                    }
                }
            }
            (TypeBase::Builtin(BuiltinType::Bits), Some(stmt)) => {
                for bit in self.tree.children_of_kind(stmt, &StatementKind::Bit) {
                    if let Some(label) = self.tree.statement(bit).argument().as_text() {
                        builder.add_property(property_name(label), boolean_type());
                    }
                }
            }
            (TypeBase::Builtin(BuiltinType::Union), Some(stmt)) => {
                for (property, ty) in self.union_members(id, stmt) {
                    builder.add_property(property, ty);
                }
            }
            _ => {
                builder.add_property("value", self.leaf_value_type(id, 0));
            }
        }
        self.annotate(&mut builder, id);
        Ok(builder.build()?)
    }

    /// Returns one property per distinct union member type.
    fn union_members(&self, owner: GeneratorId, type_stmt: StmtId) -> Vec<(String, Type)> {
        let mut members: Vec<(String, Type)> = Vec::new();
        for member in self.tree.children_of_kind(type_stmt, &StatementKind::Type) {
            let (label, ty) = match self.tree.statement(member).argument().as_type() {
                Some(TypeName::Builtin(builtin)) => (
                    builtin.yang_name().to_string(),
                    match builtin {
                        BuiltinType::Identityref => binding::class_of(binding::base_identity()),
                        _ => builtin.java_type().unwrap_or_else(binding::object),
                    },
                ),
                Some(TypeName::Typedef(qname)) => (
                    qname.local_name().to_string(),
                    self.resolve_scoped(owner, GeneratorKind::Typedef, qname)
                        .and_then(|typedef| self.type_name(typedef))
                        .map_or_else(binding::object, |name| Type::named(name.clone())),
                ),
                None => continue,
            };
            let property = property_name(&label);
            if !members.iter().any(|(existing, _)| *existing == property) {
                members.push((property, ty));
            }
        }
        members
    }

    fn build_key(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let mut builder = factory.new_type_builder(GeneratedTypeKind::TransferObject, name);
        if let Some(list) = self.generators[id.0].parent {
            if let Some(list_name) = self.type_name(list) {
                builder.add_implements_type(binding::key(list_name));
            }
            let keys = self
                .tree
                .find_child(self.generators[list.0].statement, &StatementKind::Key)
                .and_then(|key| self.tree.statement(key).argument().as_keys())
                .unwrap_or_default();
            for key in keys {
                let leaf = self.generators[list.0].children.iter().copied().find(|child| {
                    self.generators[child.0].kind == GeneratorKind::Leaf
                        && self.qname_of(*child) == Some(key)
                });
                let ty = leaf.map_or_else(binding::object, |leaf| self.leaf_value_type(leaf, 0));
                builder.add_property(property_name(key.local_name()), ty);
            }
        }
        Ok(builder.build()?)
    }

    fn build_rpc(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name);
        if let (Some(input), Some(output)) = self.operation_types(id) {
            builder.add_implements_type(binding::rpc(&input, &output));
        }
        self.annotate(&mut builder, id);
        Ok(builder.build()?)
    }

    fn build_action(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name);
        let parent = self
            .child_of_ancestor(id)
            .and_then(|parent| self.type_name(parent));
        match (parent, self.operation_types(id)) {
            (Some(parent), (Some(input), Some(output))) => {
                builder.add_implements_type(binding::action(parent, &input, &output));
            }
            _ => {
                builder.add_implements_type(binding::data_object());
            }
        }
        self.annotate(&mut builder, id);
        Ok(builder.build()?)
    }

    fn operation_types(&self, id: GeneratorId) -> (Option<JavaTypeName>, Option<JavaTypeName>) {
        let find = |kind: GeneratorKind| {
            self.generators[id.0]
                .children
                .iter()
                .find(|child| self.generators[child.0].kind == kind)
                .and_then(|child| self.type_name(*child))
                .cloned()
        };
        (find(GeneratorKind::Input), find(GeneratorKind::Output))
    }

    fn build_rpc_service(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name);
        builder.add_implements_type(binding::rpc_service());
        builder.add_annotation(Annotation::new(binding::deprecated()));
        for rpc in self.module_children(id, GeneratorKind::Rpc) {
            let Some(local) = self.qname_of(rpc).map(|q| q.local_name().to_string()) else {
                continue;
            };
            if let (Some(input), Some(output)) = self.operation_types(rpc) {
                builder
                    .add_method(property_name(&local))
                    .add_parameter("input", Type::named(input))
                    .set_return_type(binding::rpc_result_future(&output));
            }
        }
        Ok(builder.build()?)
    }

    fn build_listener(
        &self,
        id: GeneratorId,
        name: JavaTypeName,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<GeneratedType, ReactorError> {
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name);
        builder.add_implements_type(binding::notification_listener());
        builder.add_annotation(Annotation::new(binding::deprecated()));
        for notification in self.module_children(id, GeneratorKind::Notification) {
            let (Some(local), Some(ty)) = (
                self.qname_of(notification).map(|q| q.local_name().to_string()),
                self.type_name(notification),
            ) else {
                continue;
            };
            builder
                .add_method(listener_method_name(&local))
                .add_parameter("notification", Type::named(ty.clone()));
        }
        Ok(builder.build()?)
    }

    /// Returns the original children of a kind of the module owning a
    /// service generator.
    fn module_children(&self, service: GeneratorId, kind: GeneratorKind) -> Vec<GeneratorId> {
        let Some(module) = self.generators[service.0].parent else {
            return Vec::new();
        };
        self.generators[module.0]
            .children
            .iter()
            .copied()
            .filter(|child| {
                let g = &self.generators[child.0];
                g.kind == kind && g.provenance.is_original()
            })
            .collect()
    }

    fn add_groupings(&self, builder: &mut GeneratedTypeBuilder, id: GeneratorId) {
        for grouping in self.groupings(id) {
            if let Some(name) = self.type_name(*grouping) {
                builder.add_implements_type(Type::named(name.clone()));
            }
        }
    }

    /// Adds accessors for original data children and encloses member types.
    fn add_members(
        &self,
        builder: &mut GeneratedTypeBuilder,
        id: GeneratorId,
        factory: &mut dyn TypeBuilderFactory,
    ) -> Result<(), ReactorError> {
        for child in self.generators[id.0].children.clone() {
            let g = &self.generators[child.0];
            if !g.provenance.is_original() {
                continue;
            }
            if self.placement_of(child) == ClassPlacement::Member {
                if let Some(enclosed) = self.ensure_type(child, factory)?.generated_type() {
                    builder.add_enclosed(enclosed.clone());
                }
            }

            let Some(local) = self.qname_of(child).map(|q| q.local_name().to_string()) else {
                continue;
            };
            let comment = self.tree.statement(g.statement).description();
            match g.kind {
                GeneratorKind::Container => {
                    if let Some(name) = self.type_name(child) {
                        let ty = Type::named(name.clone());
                        add_getter(builder, &local, ty.clone(), comment);
                        add_nonnull(builder, &local, ty);
                    }
                }
                GeneratorKind::List => {
                    if let Some(name) = self.type_name(child) {
                        let ty = match self.key_type_name(child) {
                            Some(key) => binding::collection(
                                "Map",
                                vec![Type::named(key), Type::named(name.clone())],
                            ),
                            None => binding::collection("List", vec![Type::named(name.clone())]),
                        };
                        add_getter(builder, &local, ty.clone(), comment);
                        add_nonnull(builder, &local, ty);
                    }
                }
                GeneratorKind::Choice => {
                    if let Some(name) = self.type_name(child) {
                        add_getter(builder, &local, Type::named(name.clone()), comment);
                    }
                }
                GeneratorKind::Leaf | GeneratorKind::Opaque => {
                    let ty = if g.kind == GeneratorKind::Opaque {
                        self.type_name(child)
                            .map_or_else(binding::object, |name| Type::named(name.clone()))
                    } else {
                        self.leaf_value_type(child, 0)
                    };
                    add_getter(builder, &local, ty.clone(), comment);
                    add_require(builder, &local, ty);
                }
                GeneratorKind::LeafList => {
                    let ty = binding::collection("Set", vec![self.leaf_value_type(child, 0)]);
                    add_getter(builder, &local, ty.clone(), comment);
                    add_require(builder, &local, ty);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn key_type_name(&self, list: GeneratorId) -> Option<JavaTypeName> {
        self.generators[list.0]
            .children
            .iter()
            .find(|child| self.generators[child.0].kind == GeneratorKind::Key)
            .and_then(|key| self.type_name(*key))
            .cloned()
    }

    /// Returns the Java type of values held by a leaf or leaf-list.
    pub(super) fn leaf_value_type(&self, id: GeneratorId, depth: usize) -> Type {
        let original = self.original_or_self(id);
        let Some(state) = self.type_state(original) else {
            return binding::object();
        };
        if let TypeBase::Typedef(typedef) = state.base {
            if let Some(name) = self.type_name(typedef) {
                return Type::named(name.clone());
            }
        }
        match state.root {
            Some(BuiltinType::Leafref) => match &state.reference {
                Some(TypeReference::Leafref(Some(target))) if depth < MAX_LEAFREF_DEPTH => {
                    self.leaf_value_type(*target, depth + 1)
                }
                _ => binding::object(),
            },
            Some(BuiltinType::Identityref) => {
                let identity = match &state.reference {
                    Some(TypeReference::Identityref(bases)) if bases.len() == 1 => self
                        .type_name(bases[0])
                        .map_or_else(binding::base_identity, |name| Type::named(name.clone())),
                    _ => binding::base_identity(),
                };
                binding::class_of(identity)
            }
            Some(builtin) if builtin.needs_generated_class() => self
                .type_name(original)
                .map_or_else(binding::object, |name| Type::named(name.clone())),
            Some(builtin) => builtin.java_type().unwrap_or_else(binding::object),
            None => binding::object(),
        }
    }

    fn annotate(&self, builder: &mut GeneratedTypeBuilder, id: GeneratorId) {
        let stmt = self.tree.statement(self.generators[id.0].statement);
        if let Some(description) = stmt.description() {
            builder.set_comment(description);
        }
        match stmt.status() {
            Status::Current => {}
            Status::Deprecated => {
                builder.add_annotation(Annotation::new(binding::deprecated()));
            }
            Status::Obsolete => {
                builder.add_annotation(
                    Annotation::new(binding::deprecated()).with_parameter("forRemoval", "true"),
                );
            }
        }
    }
}

fn boolean_type() -> Type {
    Type::named(JavaTypeName::new("java.lang", "Boolean"))
}

fn add_getter(builder: &mut GeneratedTypeBuilder, local: &str, ty: Type, comment: Option<&str>) {
    let method = builder.add_method(getter_name(local));
    method.set_return_type(ty);
    if let Some(comment) = comment {
        method.set_comment(comment);
    }
}

fn add_nonnull(builder: &mut GeneratedTypeBuilder, local: &str, ty: Type) {
    builder
        .add_method(nonnull_name(local))
        .set_return_type(ty)
        .set_default(true)
        .set_mechanics(ValueMechanics::NonNull);
}

fn add_require(builder: &mut GeneratedTypeBuilder, local: &str, ty: Type) {
    builder
        .add_method(require_name(local))
        .set_return_type(ty)
        .set_default(true)
        .set_mechanics(ValueMechanics::NonNull);
}

/// Adds the methods every concrete data object carries.
fn add_binding_methods(builder: &mut GeneratedTypeBuilder, name: &JavaTypeName) {
    let this = Type::named(name.clone());
    builder
        .add_method("implementedInterface")
        .set_return_type(Type::parameterized(
            JavaTypeName::new("java.lang", "Class"),
            vec![this.clone()],
        ))
        .set_default(true);
    builder
        .add_method("bindingHashCode")
        .add_parameter("obj", this.clone())
        .set_return_type(Type::Primitive("int"))
        .set_static(true);
    builder
        .add_method("bindingEquals")
        .add_parameter("thisObj", this.clone())
        .add_parameter("obj", binding::object())
        .set_return_type(Type::Primitive("boolean"))
        .set_static(true);
    builder
        .add_method("bindingToString")
        .add_parameter("obj", this)
        .set_return_type(Type::named(JavaTypeName::new("java.lang", "String")))
        .set_static(true);
}
