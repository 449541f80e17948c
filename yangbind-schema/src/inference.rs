//! Schema inference stack.
//!
//! Tracks a position in the schema tree while walking it, the same way a
//! YANG compiler does when it interprets relative paths. The binding
//! generator uses it to resolve leafref paths from the context of the node
//! that declares them.

use crate::error::SchemaError;
use crate::qname::{PathExpression, QName, SchemaNodeIdentifier};
use crate::statement::{StatementKind, StmtId};
use crate::tree::SchemaTree;

/// Stack of statements describing the current position in a schema tree.
#[derive(Debug, Clone)]
pub struct SchemaInferenceStack<'a> {
    tree: &'a SchemaTree,
    stack: Vec<StmtId>,
}

impl<'a> SchemaInferenceStack<'a> {
    /// Creates an empty stack positioned at the schema root.
    #[must_use]
    pub fn new(tree: &'a SchemaTree) -> Self {
        Self {
            tree,
            stack: Vec::new(),
        }
    }

    /// Returns true if the stack is positioned at the schema root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Returns the current depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Resets the stack to the schema root.
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Returns the statement at the top of the stack.
    #[must_use]
    pub fn current(&self) -> Option<StmtId> {
        self.stack.last().copied()
    }

    /// Pushes a statement without checking it against the current position.
    pub fn enter_statement(&mut self, id: StmtId) {
        self.stack.push(id);
    }

    /// Enters the schema-tree child with the given name.
    ///
    /// At the root the child is looked up among the top-level statements of
    /// the module named by the QName.
    ///
    /// # Errors
    /// Returns [`SchemaError::NodeNotFound`] if there is no such child.
    pub fn enter_schema_tree(&mut self, qname: &QName) -> Result<StmtId, SchemaError> {
        let found = match self.current() {
            Some(current) => self.tree.schema_tree_child(current, qname),
            None => self
                .tree
                .module(qname.module())
                .and_then(|module| self.tree.schema_tree_child(module, qname)),
        };
        let found = found.ok_or_else(|| SchemaError::not_found(qname.to_string(), self.location()))?;
        self.stack.push(found);
        Ok(found)
    }

    /// Enters every step of a schema node identifier.
    ///
    /// Absolute identifiers reset the stack first.
    ///
    /// # Errors
    /// Returns [`SchemaError::NodeNotFound`] if any step is missing.
    pub fn enter_schema_node_id(&mut self, id: &SchemaNodeIdentifier) -> Result<StmtId, SchemaError> {
        if id.is_absolute() {
            self.clear();
        }
        let mut last = self.current();
        for step in id.steps() {
            last = Some(self.enter_schema_tree(step)?);
        }
        last.ok_or_else(|| SchemaError::not_found(id.to_string(), self.location()))
    }

    /// Leaves the current statement.
    pub fn exit(&mut self) -> Option<StmtId> {
        self.stack.pop()
    }

    /// Returns true unless the stack passes through a grouping.
    ///
    /// Statements inside groupings are templates; paths in them can only be
    /// interpreted once the grouping is instantiated.
    #[must_use]
    pub fn in_instantiated_context(&self) -> bool {
        !self
            .stack
            .iter()
            .any(|id| self.tree.statement(*id).kind() == &StatementKind::Grouping)
    }

    /// Resolves a leafref path from the current position.
    ///
    /// The current statement is the node holding the path. `..` steps leave
    /// data-tree nodes, skipping choices and cases; child steps descend the
    /// data tree. On success the stack is positioned at the target.
    ///
    /// # Errors
    /// Returns [`SchemaError::NodeNotFound`] if any step cannot be resolved.
    pub fn resolve_path_expression(&mut self, path: &PathExpression) -> Result<StmtId, SchemaError> {
        if path.is_absolute() {
            self.clear();
        } else {
            for _ in 0..path.parent_steps() {
                if self.exit().is_none() {
                    return Err(self.path_not_found(path));
                }
                while self
                    .current()
                    .is_some_and(|id| self.tree.statement(id).kind().is_data_transparent())
                {
                    self.exit();
                }
            }
        }

        for step in path.steps() {
            let found = match self.current() {
                Some(current) => self.tree.data_tree_child(current, step),
                None => self
                    .tree
                    .module(step.module())
                    .and_then(|module| self.tree.data_tree_child(module, step)),
            };
            match found {
                Some(found) => self.stack.push(found),
                None => return Err(self.path_not_found(path)),
            }
        }

        self.current().ok_or_else(|| self.path_not_found(path))
    }

    fn path_not_found(&self, path: &PathExpression) -> SchemaError {
        SchemaError::not_found(path.to_string(), self.location())
    }

    /// Describes the current position for diagnostics.
    #[must_use]
    pub fn location(&self) -> String {
        match self.current() {
            Some(current) => self.tree.describe(current),
            None => "schema root".to_string(),
        }
    }
}
