//! Runtime type descriptors.
//!
//! A runtime type links a schema node to the Java type which represents it at
//! run time. Unlike generated types, every schema node has one, including
//! leaves and nodes copied in by `uses` or `augment`.

use crate::types::{JavaTypeName, Type};

/// Kind of schema node a runtime type describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeTypeKind {
    /// Module data root.
    Module,
    /// Container.
    Container,
    /// List.
    List,
    /// List key.
    Key,
    /// Choice.
    Choice,
    /// Case.
    Case,
    /// Grouping.
    Grouping,
    /// Augmentation.
    Augmentation,
    /// Leaf.
    Leaf,
    /// Leaf-list.
    LeafList,
    /// Typedef.
    Typedef,
    /// Identity.
    Identity,
    /// RPC.
    Rpc,
    /// Action.
    Action,
    /// Operation input.
    Input,
    /// Operation output.
    Output,
    /// Notification.
    Notification,
    /// Anydata or anyxml.
    Opaque,
    /// Compatibility service or listener.
    Service,
}

/// Runtime view of one schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeType {
    /// Node kind.
    pub kind: RuntimeTypeKind,
    /// YANG local name of the node.
    pub schema_name: String,
    /// Java type carrying values of this node, if any.
    pub java_type: Option<Type>,
    /// Runtime types of schema-tree children.
    pub children: Vec<RuntimeType>,
    /// Augmentations applied to this node.
    pub augments: Vec<JavaTypeName>,
    /// Types instantiating this grouping.
    pub instantiations: Vec<JavaTypeName>,
}

impl RuntimeType {
    /// Creates a runtime type without children.
    #[must_use]
    pub fn new(kind: RuntimeTypeKind, schema_name: impl Into<String>, java_type: Option<Type>) -> Self {
        Self {
            kind,
            schema_name: schema_name.into(),
            java_type,
            children: Vec::new(),
            augments: Vec::new(),
            instantiations: Vec::new(),
        }
    }

    /// Returns the child with the given schema name.
    #[must_use]
    pub fn child(&self, schema_name: &str) -> Option<&RuntimeType> {
        self.children.iter().find(|c| c.schema_name == schema_name)
    }

    /// Returns the raw Java class name of this node, if it has one.
    #[must_use]
    pub fn java_type_name(&self) -> Option<&JavaTypeName> {
        self.java_type.as_ref().and_then(Type::raw_name)
    }
}
