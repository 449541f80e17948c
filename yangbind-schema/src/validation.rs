//! Schema tree validation.
//!
//! The binding generator assumes a consistent effective tree. These checks
//! turn structural mistakes into errors up front instead of failures deep in
//! the linkage passes.

use std::collections::HashSet;

use yangbind_core::BuiltinType;

use crate::error::SchemaError;
use crate::statement::{Argument, StatementKind, StmtId, TypeName};
use crate::tree::SchemaTree;

/// Validates a schema tree for structural consistency.
///
/// # Arguments
/// * `tree` - The tree to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the issue.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_tree(tree: &SchemaTree) -> Result<(), SchemaError> {
    for (_, module) in tree.modules() {
        validate_statement(tree, module)?;
    }
    Ok(())
}

fn validate_statement(tree: &SchemaTree, id: StmtId) -> Result<(), SchemaError> {
    let stmt = tree.statement(id);
    match stmt.kind() {
        kind if kind.is_schema_tree() => validate_named(tree, id)?,
        StatementKind::Grouping | StatementKind::Typedef | StatementKind::Identity => {
            validate_named(tree, id)?;
        }
        StatementKind::Uses => validate_named(tree, id)?,
        StatementKind::Augment => validate_augment(tree, id)?,
        StatementKind::Type => validate_type(tree, id)?,
        StatementKind::Key => validate_key(tree, id)?,
        _ => {}
    }

    if stmt.kind().is_type_aware() {
        let found = tree.children_of_kind(id, &StatementKind::Type).count();
        if found != 1 {
            return Err(SchemaError::MissingType {
                node: tree.describe(id),
                found,
            });
        }
    }

    validate_unique_children(tree, id)?;
    for child in tree.children(id) {
        validate_statement(tree, *child)?;
    }
    Ok(())
}

/// Validates that a statement carries a QName argument.
fn validate_named(tree: &SchemaTree, id: StmtId) -> Result<(), SchemaError> {
    match tree.statement(id).argument() {
        Argument::QName(_) => Ok(()),
        _ => Err(SchemaError::invalid_argument(tree.describe(id), "a qualified name")),
    }
}

/// Validates the target shape of an augment.
fn validate_augment(tree: &SchemaTree, id: StmtId) -> Result<(), SchemaError> {
    let Some(target) = tree.statement(id).argument().as_schema_node_id() else {
        return Err(SchemaError::invalid_argument(tree.describe(id), "a schema node identifier"));
    };

    let parent_kind = tree.parent(id).map(|p| tree.statement(p).kind());
    match parent_kind {
        Some(StatementKind::Module) if target.is_absolute() => Ok(()),
        Some(StatementKind::Uses) if !target.is_absolute() => Ok(()),
        Some(StatementKind::Module) => Err(SchemaError::invalid_argument(
            tree.describe(id),
            "an absolute target",
        )),
        Some(StatementKind::Uses) => Err(SchemaError::invalid_argument(
            tree.describe(id),
            "a descendant target",
        )),
        _ => Err(SchemaError::Validation {
            message: format!("{} must appear in a module or uses", tree.describe(id)),
        }),
    }
}

/// Validates the substatements required by reference types.
fn validate_type(tree: &SchemaTree, id: StmtId) -> Result<(), SchemaError> {
    let Some(name) = tree.statement(id).argument().as_type() else {
        return Err(SchemaError::invalid_argument(tree.describe(id), "a type name"));
    };

    match name {
        TypeName::Builtin(BuiltinType::Leafref) => {
            let has_path = tree
                .find_child(id, &StatementKind::Path)
                .is_some_and(|p| tree.statement(p).argument().as_path().is_some());
            if !has_path {
                return Err(SchemaError::invalid_argument(tree.describe(id), "a path"));
            }
        }
        TypeName::Builtin(BuiltinType::Identityref) => {
            if tree.find_child(id, &StatementKind::Base).is_none() {
                return Err(SchemaError::invalid_argument(tree.describe(id), "a base"));
            }
        }
        TypeName::Builtin(BuiltinType::Union) => {
            if tree.find_child(id, &StatementKind::Type).is_none() {
                return Err(SchemaError::invalid_argument(
                    tree.describe(id),
                    "member types",
                ));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Validates that every key names a child leaf of the list.
fn validate_key(tree: &SchemaTree, id: StmtId) -> Result<(), SchemaError> {
    let Some(list) = tree.parent(id) else {
        return Err(SchemaError::invalid_argument(tree.describe(id), "a parent list"));
    };
    let Some(keys) = tree.statement(id).argument().as_keys() else {
        return Err(SchemaError::invalid_argument(tree.describe(id), "key names"));
    };

    for key in keys {
        let is_leaf = tree
            .data_tree_child(list, key)
            .is_some_and(|child| tree.statement(child).kind() == &StatementKind::Leaf);
        if !is_leaf {
            return Err(SchemaError::InvalidKey {
                node: tree.describe(list),
                key: key.local_name().to_string(),
            });
        }
    }
    Ok(())
}

/// Validates that no two schema-tree children share a name.
fn validate_unique_children(tree: &SchemaTree, id: StmtId) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for child in tree.children(id) {
        let stmt = tree.statement(*child);
        if !stmt.kind().is_schema_tree() {
            continue;
        }
        if let Some(qname) = stmt.qname() {
            if !seen.insert(qname) {
                return Err(SchemaError::Validation {
                    message: format!("duplicate schema node {}", tree.describe(*child)),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema_tree;

    fn wrap(body: &str) -> String {
        format!(
            r#"<schema><module name="m" namespace="urn:m" prefix="m">{body}</module></schema>"#
        )
    }

    #[test]
    fn test_valid_tree() {
        let xml = wrap(
            r#"<list name="l" key="k"><leaf name="k"><type name="string"/></leaf></list>
               <augment target="/m:l"><leaf name="x"><type name="empty"/></leaf></augment>"#,
        );
        assert!(parse_schema_tree(&xml).is_ok());
    }

    #[test]
    fn test_missing_type() {
        let err = parse_schema_tree(&wrap(r#"<leaf name="x"/>"#)).unwrap_err();
        assert!(matches!(err, SchemaError::MissingType { found: 0, .. }));
    }

    #[test]
    fn test_invalid_key() {
        let xml = wrap(r#"<list name="l" key="k"><container name="k"/></list>"#);
        let err = parse_schema_tree(&xml).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidKey { .. }));
    }

    #[test]
    fn test_augment_target_shape() {
        let xml = wrap(
            r#"<container name="c"/><augment target="m:c"><leaf name="x"><type name="empty"/></leaf></augment>"#,
        );
        let err = parse_schema_tree(&xml).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidArgument { .. }));
    }

    #[test]
    fn test_leafref_requires_path() {
        let xml = wrap(r#"<leaf name="x"><type name="leafref"/></leaf>"#);
        let err = parse_schema_tree(&xml).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidArgument { .. }));
    }

    #[test]
    fn test_duplicate_children() {
        let xml = wrap(r#"<container name="c"/><container name="c"/>"#);
        let err = parse_schema_tree(&xml).unwrap_err();
        assert!(matches!(err, SchemaError::Validation { .. }));
    }
}
