//! The effective schema tree.

use std::collections::{BTreeMap, HashMap};

use crate::error::SchemaError;
use crate::qname::{QName, QNameModule};
use crate::statement::{Argument, Provenance, Statement, StatementKind, Status, StmtId};
use crate::validation::validate_tree;

/// Identity of a loaded module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Module name.
    pub name: String,
    /// Namespace and revision.
    pub module: QNameModule,
    /// Prefix declared by the module.
    pub prefix: String,
}

/// Fully resolved schema of a set of modules.
///
/// Statements live in a single arena. Modules are kept ordered by namespace
/// and revision so that every traversal is deterministic.
#[derive(Debug, Clone, Default)]
pub struct SchemaTree {
    statements: Vec<Statement>,
    modules: BTreeMap<QNameModule, StmtId>,
    infos: HashMap<StmtId, ModuleInfo>,
}

impl SchemaTree {
    /// Returns the statement behind a handle.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this tree.
    #[must_use]
    pub fn statement(&self, id: StmtId) -> &Statement {
        &self.statements[id.index()]
    }

    /// Returns the number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns true if the tree has no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Iterates modules in namespace and revision order.
    pub fn modules(&self) -> impl Iterator<Item = (&QNameModule, StmtId)> {
        self.modules.iter().map(|(module, id)| (module, *id))
    }

    /// Returns the module statement for a namespace and revision.
    #[must_use]
    pub fn module(&self, module: &QNameModule) -> Option<StmtId> {
        self.modules.get(module).copied()
    }

    /// Returns the module statement with the given name.
    #[must_use]
    pub fn module_by_name(&self, name: &str) -> Option<StmtId> {
        self.modules
            .values()
            .copied()
            .find(|id| self.infos.get(id).is_some_and(|info| info.name == name))
    }

    /// Returns module information for a module statement.
    #[must_use]
    pub fn module_info(&self, module: StmtId) -> Option<&ModuleInfo> {
        self.infos.get(&module)
    }

    /// Returns the module statement enclosing `id`.
    #[must_use]
    pub fn enclosing_module(&self, id: StmtId) -> StmtId {
        let mut current = id;
        while let Some(parent) = self.statement(current).parent {
            current = parent;
        }
        current
    }

    /// Returns the namespace of the module enclosing `id`.
    #[must_use]
    pub fn module_namespace(&self, id: StmtId) -> Option<&QNameModule> {
        self.infos
            .get(&self.enclosing_module(id))
            .map(|info| &info.module)
    }

    /// Returns the children of a statement.
    #[must_use]
    pub fn children(&self, id: StmtId) -> &[StmtId] {
        &self.statement(id).children
    }

    /// Returns the parent of a statement.
    #[must_use]
    pub fn parent(&self, id: StmtId) -> Option<StmtId> {
        self.statement(id).parent
    }

    /// Iterates children of a given kind.
    pub fn children_of_kind<'a>(
        &'a self,
        id: StmtId,
        kind: &'a StatementKind,
    ) -> impl Iterator<Item = StmtId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |child| self.statement(*child).kind == *kind)
    }

    /// Returns the first child of a given kind.
    #[must_use]
    pub fn find_child(&self, id: StmtId, kind: &StatementKind) -> Option<StmtId> {
        self.children_of_kind(id, kind).next()
    }

    /// Returns the schema-tree child with the given name.
    #[must_use]
    pub fn schema_tree_child(&self, id: StmtId, qname: &QName) -> Option<StmtId> {
        self.children(id).iter().copied().find(|child| {
            let stmt = self.statement(*child);
            stmt.kind.is_schema_tree() && stmt.qname() == Some(qname)
        })
    }

    /// Returns the data-tree child with the given name.
    ///
    /// Choices and cases are transparent: the lookup descends through them.
    #[must_use]
    pub fn data_tree_child(&self, id: StmtId, qname: &QName) -> Option<StmtId> {
        for child in self.children(id).iter().copied() {
            let stmt = self.statement(child);
            if !stmt.kind.is_schema_tree() {
                continue;
            }
            if stmt.kind.is_data_transparent() {
                if let Some(found) = self.data_tree_child(child, qname) {
                    return Some(found);
                }
            } else if stmt.qname() == Some(qname) {
                return Some(child);
            }
        }
        None
    }

    /// Describes a statement for diagnostics, e.g. `container /foo:top/inner`.
    #[must_use]
    pub fn describe(&self, id: StmtId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(stmt_id) = current {
            let stmt = self.statement(stmt_id);
            match &stmt.argument {
                _ if stmt.kind == StatementKind::Module => {
                    let name = self
                        .infos
                        .get(&stmt_id)
                        .map_or("?", |info| info.name.as_str());
                    segments.push(format!("{name}:"));
                }
                Argument::QName(qname) => segments.push(qname.local_name().to_string()),
                Argument::Text(text) => segments.push(text.clone()),
                Argument::SchemaNodeId(target) => segments.push(format!("augment({target})")),
                Argument::Type(name) => segments.push(format!("type({name})")),
                _ => segments.push(stmt.kind.keyword().to_string()),
            }
            current = stmt.parent;
        }
        segments.reverse();

        let mut path = String::from("/");
        for (i, segment) in segments.iter().enumerate() {
            path.push_str(segment);
            if i > 0 && i + 1 < segments.len() {
                path.push('/');
            }
        }
        format!("{} {}", self.statement(id).kind, path)
    }
}

/// Incremental builder of a [`SchemaTree`].
///
/// Statements are appended under an existing parent; the finished tree is
/// validated by [`SchemaTreeBuilder::build`].
#[derive(Debug, Default)]
pub struct SchemaTreeBuilder {
    tree: SchemaTree,
}

impl SchemaTreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module.
    ///
    /// # Errors
    /// Returns [`SchemaError::DuplicateModule`] if the module identity is
    /// already present.
    pub fn module(
        &mut self,
        name: impl Into<String>,
        module: QNameModule,
        prefix: impl Into<String>,
    ) -> Result<StmtId, SchemaError> {
        if self.tree.modules.contains_key(&module) {
            return Err(SchemaError::DuplicateModule {
                module: module.to_string(),
            });
        }

        let name = name.into();
        let id = self.push(None, StatementKind::Module, Argument::Text(name.clone()));
        self.tree.modules.insert(module.clone(), id);
        self.tree.infos.insert(
            id,
            ModuleInfo {
                name,
                module,
                prefix: prefix.into(),
            },
        );
        Ok(id)
    }

    /// Appends a statement under `parent`.
    pub fn statement(&mut self, parent: StmtId, kind: StatementKind, argument: Argument) -> StmtId {
        self.push(Some(parent), kind, argument)
    }

    /// Appends a named statement whose QName is bound to the enclosing module.
    pub fn named(&mut self, parent: StmtId, kind: StatementKind, local_name: &str) -> StmtId {
        let qname = self.qname(parent, local_name);
        self.push(Some(parent), kind, Argument::QName(qname))
    }

    /// Binds a local name to the module enclosing `context`.
    #[must_use]
    pub fn qname(&self, context: StmtId, local_name: &str) -> QName {
        let module = self
            .tree
            .module_namespace(context)
            .cloned()
            .unwrap_or_else(|| QNameModule::new("", None));
        QName::new(module, local_name)
    }

    /// Sets the provenance of a statement.
    pub fn set_provenance(&mut self, id: StmtId, provenance: Provenance) -> &mut Self {
        self.tree.statements[id.index()].provenance = provenance;
        self
    }

    /// Sets the status of a statement.
    pub fn set_status(&mut self, id: StmtId, status: Status) -> &mut Self {
        self.tree.statements[id.index()].status = status;
        self
    }

    /// Sets the description of a statement.
    pub fn set_description(&mut self, id: StmtId, description: impl Into<String>) -> &mut Self {
        self.tree.statements[id.index()].description = Some(description.into());
        self
    }

    /// Returns the tree built so far.
    #[must_use]
    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    /// Validates and returns the finished tree.
    ///
    /// # Errors
    /// Returns `SchemaError` if the tree is structurally inconsistent.
    pub fn build(self) -> Result<SchemaTree, SchemaError> {
        validate_tree(&self.tree)?;
        Ok(self.tree)
    }

    fn push(&mut self, parent: Option<StmtId>, kind: StatementKind, argument: Argument) -> StmtId {
        let id = StmtId(self.tree.statements.len() as u32);
        self.tree.statements.push(Statement {
            kind,
            argument,
            parent,
            children: Vec::new(),
            provenance: Provenance::Original,
            status: Status::Current,
            description: None,
        });
        if let Some(parent) = parent {
            self.tree.statements[parent.index()].children.push(id);
        }
        id
    }
}
