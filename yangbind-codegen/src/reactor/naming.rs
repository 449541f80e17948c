//! Class naming strategies.
//!
//! Each named generator starts with the plain camel-case strategy. When its
//! name collides with a sibling, the strategy falls back to a namespaced
//! variant and finally to a lossless escape which cannot collide.

use yangbind_core::naming::{class_name, escape_identifier, normalize_package_name, package_string};

/// YANG namespace a named statement lives in.
///
/// Statements in different namespaces may legally share a local name; the
/// namespace suffix tells them apart once plain names collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatementNamespace {
    /// `action`.
    Action,
    /// `anydata`.
    Anydata,
    /// `anyxml`.
    Anyxml,
    /// `case`.
    Case,
    /// `choice`.
    Choice,
    /// `container`.
    Container,
    /// Module data root.
    DataRoot,
    /// `grouping`.
    Grouping,
    /// `identity`.
    Identity,
    /// `input`.
    Input,
    /// List key.
    Key,
    /// `leaf`.
    Leaf,
    /// `leaf-list`.
    LeafList,
    /// `list`.
    List,
    /// `notification`.
    Notification,
    /// `output`.
    Output,
    /// `rpc`.
    Rpc,
    /// Compatibility service or listener.
    Service,
    /// `typedef`.
    Typedef,
}

impl StatementNamespace {
    /// Returns the suffix appended by namespaced strategies.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Action => "$AC",
            Self::Anydata => "$AD",
            Self::Anyxml => "$AX",
            Self::Case => "$CA",
            Self::Choice => "$CH",
            Self::Container => "$CO",
            Self::DataRoot => "$YD",
            Self::Grouping => "$GR",
            Self::Identity => "$IY",
            Self::Input => "$IP",
            Self::Key => "$KE",
            Self::Leaf => "$LF",
            Self::LeafList => "$LL",
            Self::List => "$LI",
            Self::Notification => "$NO",
            Self::Output => "$OP",
            Self::Rpc => "$RP",
            Self::Service => "$SV",
            Self::Typedef => "$TD",
        }
    }
}

/// Position of a strategy in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamingStage {
    /// `foo-bar` becomes `FooBar`.
    CamelCase,
    /// `foo-bar` becomes `FooBar$CO`.
    CamelCaseWithNamespace,
    /// `foo-bar` becomes `foo$2dbar$CO`.
    Bijective,
}

/// Strategy deriving a class name and package segment from a YANG name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassNamingStrategy {
    namespace: StatementNamespace,
    local_name: String,
    stage: NamingStage,
}

impl ClassNamingStrategy {
    /// Creates the initial camel-case strategy.
    pub fn camel_case(namespace: StatementNamespace, local_name: impl Into<String>) -> Self {
        Self {
            namespace,
            local_name: local_name.into(),
            stage: NamingStage::CamelCase,
        }
    }

    /// Returns the current stage.
    #[must_use]
    pub fn stage(&self) -> NamingStage {
        self.stage
    }

    /// Returns the YANG name being mapped.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns the simple class name.
    #[must_use]
    pub fn simple_class_name(&self) -> String {
        match self.stage {
            NamingStage::CamelCase => class_name(&self.local_name),
            NamingStage::CamelCaseWithNamespace => {
                format!("{}{}", class_name(&self.local_name), self.namespace.suffix())
            }
            NamingStage::Bijective => {
                format!("{}{}", escape_identifier(&self.local_name), self.namespace.suffix())
            }
        }
    }

    /// Returns the package segment holding this member's children.
    ///
    /// The bijective segment keeps its case so that it stays lossless.
    #[must_use]
    pub fn package_segment(&self) -> String {
        match self.stage {
            NamingStage::CamelCase => normalize_package_name(&package_string(&self.local_name)),
            NamingStage::CamelCaseWithNamespace => format!(
                "{}{}",
                normalize_package_name(&package_string(&self.local_name)),
                self.namespace.suffix().to_ascii_lowercase()
            ),
            NamingStage::Bijective => {
                format!("{}{}", escape_identifier(&self.local_name), self.namespace.suffix())
            }
        }
    }

    /// Returns the next strategy in the chain, or `None` once exhausted.
    #[must_use]
    pub fn fallback(&self) -> Option<Self> {
        let stage = match self.stage {
            NamingStage::CamelCase => NamingStage::CamelCaseWithNamespace,
            NamingStage::CamelCaseWithNamespace => NamingStage::Bijective,
            NamingStage::Bijective => return None,
        };
        Some(Self {
            stage,
            ..self.clone()
        })
    }
}
