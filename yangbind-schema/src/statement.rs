//! Effective statements.
//!
//! Every node of the effective schema tree is a [`Statement`] stored in the
//! [`SchemaTree`](crate::SchemaTree) arena and addressed by a [`StmtId`].

use std::fmt;

use yangbind_core::BuiltinType;

use crate::qname::{PathExpression, QName, SchemaNodeIdentifier};

/// Handle of a statement in a schema tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(pub(crate) u32);

impl StmtId {
    /// Returns the arena index of this statement.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// YANG statement keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `module`.
    Module,
    /// `container`.
    Container,
    /// `list`.
    List,
    /// `leaf`.
    Leaf,
    /// `leaf-list`.
    LeafList,
    /// `choice`.
    Choice,
    /// `case`.
    Case,
    /// `grouping`.
    Grouping,
    /// `uses`.
    Uses,
    /// `augment`.
    Augment,
    /// `typedef`.
    Typedef,
    /// `type`.
    Type,
    /// `identity`.
    Identity,
    /// `base`.
    Base,
    /// `rpc`.
    Rpc,
    /// `action`.
    Action,
    /// `input`.
    Input,
    /// `output`.
    Output,
    /// `notification`.
    Notification,
    /// `anydata`.
    Anydata,
    /// `anyxml`.
    Anyxml,
    /// `path`.
    Path,
    /// `key`.
    Key,
    /// `enum`.
    Enum,
    /// `bit`.
    Bit,
    /// Any other keyword, including extensions.
    Unknown(String),
}

impl StatementKind {
    /// Parses a statement keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "module" => Self::Module,
            "container" => Self::Container,
            "list" => Self::List,
            "leaf" => Self::Leaf,
            "leaf-list" => Self::LeafList,
            "choice" => Self::Choice,
            "case" => Self::Case,
            "grouping" => Self::Grouping,
            "uses" => Self::Uses,
            "augment" => Self::Augment,
            "typedef" => Self::Typedef,
            "type" => Self::Type,
            "identity" => Self::Identity,
            "base" => Self::Base,
            "rpc" => Self::Rpc,
            "action" => Self::Action,
            "input" => Self::Input,
            "output" => Self::Output,
            "notification" => Self::Notification,
            "anydata" => Self::Anydata,
            "anyxml" => Self::Anyxml,
            "path" => Self::Path,
            "key" => Self::Key,
            "enum" => Self::Enum,
            "bit" => Self::Bit,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Returns the statement keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        match self {
            Self::Module => "module",
            Self::Container => "container",
            Self::List => "list",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::Choice => "choice",
            Self::Case => "case",
            Self::Grouping => "grouping",
            Self::Uses => "uses",
            Self::Augment => "augment",
            Self::Typedef => "typedef",
            Self::Type => "type",
            Self::Identity => "identity",
            Self::Base => "base",
            Self::Rpc => "rpc",
            Self::Action => "action",
            Self::Input => "input",
            Self::Output => "output",
            Self::Notification => "notification",
            Self::Anydata => "anydata",
            Self::Anyxml => "anyxml",
            Self::Path => "path",
            Self::Key => "key",
            Self::Enum => "enum",
            Self::Bit => "bit",
            Self::Unknown(keyword) => keyword,
        }
    }

    /// Returns true for nodes of the schema tree.
    #[must_use]
    pub const fn is_schema_tree(&self) -> bool {
        matches!(
            self,
            Self::Container
                | Self::List
                | Self::Leaf
                | Self::LeafList
                | Self::Choice
                | Self::Case
                | Self::Rpc
                | Self::Action
                | Self::Input
                | Self::Output
                | Self::Notification
                | Self::Anydata
                | Self::Anyxml
        )
    }

    /// Returns true for schema-tree nodes which are not part of the data tree.
    #[must_use]
    pub const fn is_data_transparent(&self) -> bool {
        matches!(self, Self::Choice | Self::Case)
    }

    /// Returns true for statements carrying a `type` substatement.
    #[must_use]
    pub const fn is_type_aware(&self) -> bool {
        matches!(self, Self::Leaf | Self::LeafList | Self::Typedef)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How a statement came to exist in the effective tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provenance {
    /// Declared at this location.
    #[default]
    Original,
    /// Introduced by an `augment`.
    Augmentation,
    /// Copied from a grouping by `uses`.
    Uses,
    /// Introduced by an `augment` nested inside `uses`.
    UsesAugmentation,
}

impl Provenance {
    /// Parses the serialized form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "original" => Some(Self::Original),
            "augmentation" => Some(Self::Augmentation),
            "uses" => Some(Self::Uses),
            "uses-augmentation" => Some(Self::UsesAugmentation),
            _ => None,
        }
    }

    /// Returns true if the statement was declared where it appears.
    #[must_use]
    pub const fn is_original(&self) -> bool {
        matches!(self, Self::Original)
    }

    /// Returns true if the statement was copied in by `uses`.
    #[must_use]
    pub const fn is_added_by_uses(&self) -> bool {
        matches!(self, Self::Uses | Self::UsesAugmentation)
    }

    /// Returns true if the statement was introduced by an augmentation.
    #[must_use]
    pub const fn is_augmenting(&self) -> bool {
        matches!(self, Self::Augmentation | Self::UsesAugmentation)
    }
}

/// Definition status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// In use.
    #[default]
    Current,
    /// Still valid, but discouraged.
    Deprecated,
    /// No longer valid.
    Obsolete,
}

impl Status {
    /// Parses the YANG status keyword.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "current" => Some(Self::Current),
            "deprecated" => Some(Self::Deprecated),
            "obsolete" => Some(Self::Obsolete),
            _ => None,
        }
    }
}

/// Name of a type, as used by a `type` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// RFC 6020 built-in type.
    Builtin(BuiltinType),
    /// Reference to a typedef.
    Typedef(QName),
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(builtin) => write!(f, "{builtin}"),
            Self::Typedef(qname) => write!(f, "{qname}"),
        }
    }
}

/// Statement argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Argument {
    /// No argument.
    None,
    /// Node or definition name.
    QName(QName),
    /// Free text, such as a module or enum name.
    Text(String),
    /// `augment` target.
    SchemaNodeId(SchemaNodeIdentifier),
    /// Leafref `path`.
    Path(PathExpression),
    /// `type` name.
    Type(TypeName),
    /// List `key` leaf names.
    Keys(Vec<QName>),
}

impl Argument {
    /// Returns the QName argument, if this is one.
    #[must_use]
    pub fn as_qname(&self) -> Option<&QName> {
        match self {
            Self::QName(qname) => Some(qname),
            _ => None,
        }
    }

    /// Returns the text argument, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the schema node identifier, if this is one.
    #[must_use]
    pub fn as_schema_node_id(&self) -> Option<&SchemaNodeIdentifier> {
        match self {
            Self::SchemaNodeId(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the path expression, if this is one.
    #[must_use]
    pub fn as_path(&self) -> Option<&PathExpression> {
        match self {
            Self::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Returns the type name, if this is one.
    #[must_use]
    pub fn as_type(&self) -> Option<&TypeName> {
        match self {
            Self::Type(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the key names, if this is a key list.
    #[must_use]
    pub fn as_keys(&self) -> Option<&[QName]> {
        match self {
            Self::Keys(keys) => Some(keys),
            _ => None,
        }
    }
}

/// One node of the effective schema tree.
#[derive(Debug, Clone)]
pub struct Statement {
    pub(crate) kind: StatementKind,
    pub(crate) argument: Argument,
    pub(crate) parent: Option<StmtId>,
    pub(crate) children: Vec<StmtId>,
    pub(crate) provenance: Provenance,
    pub(crate) status: Status,
    pub(crate) description: Option<String>,
}

impl Statement {
    /// Returns the keyword.
    #[must_use]
    pub fn kind(&self) -> &StatementKind {
        &self.kind
    }

    /// Returns the argument.
    #[must_use]
    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    /// Returns the QName argument, if any.
    #[must_use]
    pub fn qname(&self) -> Option<&QName> {
        self.argument.as_qname()
    }

    /// Returns the parent statement. Modules have none.
    #[must_use]
    pub fn parent(&self) -> Option<StmtId> {
        self.parent
    }

    /// Returns substatements in declaration order.
    #[must_use]
    pub fn children(&self) -> &[StmtId] {
        &self.children
    }

    /// Returns how the statement came to be here.
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Returns the definition status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
