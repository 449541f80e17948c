//! Error types for schema loading and validation.

use thiserror::Error;

/// Error type for schema loading operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Unknown element encountered where a fixed structure is expected.
    #[error("unknown element '{element}' in context '{context}'")]
    UnknownElement {
        /// Element name.
        element: String,
        /// Parent context.
        context: String,
    },

    /// Prefix not bound to any module.
    #[error("unknown prefix '{prefix}' in module '{module}'")]
    UnknownPrefix {
        /// The prefix.
        prefix: String,
        /// Module in which the prefix was used.
        module: String,
    },

    /// Invalid document structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Error type for schema tree consistency.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Two modules share a namespace and revision.
    #[error("duplicate module '{module}'")]
    DuplicateModule {
        /// Module identity.
        module: String,
    },

    /// A type-bearing statement lacks its `type` substatement.
    #[error("{node} must have exactly one type statement, found {found}")]
    MissingType {
        /// Offending node.
        node: String,
        /// Number of type statements found.
        found: usize,
    },

    /// A statement has an argument of the wrong shape.
    #[error("{node} has an invalid argument: expected {expected}")]
    InvalidArgument {
        /// Offending node.
        node: String,
        /// Description of the expected argument.
        expected: String,
    },

    /// A list key names something other than a child leaf.
    #[error("{node} declares key '{key}' which is not a child leaf")]
    InvalidKey {
        /// Offending list.
        node: String,
        /// Key name.
        key: String,
    },

    /// A schema node could not be found.
    #[error("schema node '{target}' not found from {context}")]
    NodeNotFound {
        /// Name or path being looked up.
        target: String,
        /// Where the lookup started.
        context: String,
    },

    /// Validation error.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown element error.
    pub fn unknown_element(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Creates an invalid structure error.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}

impl SchemaError {
    /// Creates a node-not-found error.
    pub fn not_found(target: impl Into<String>, context: impl Into<String>) -> Self {
        Self::NodeNotFound {
            target: target.into(),
            context: context.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(node: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidArgument {
            node: node.into(),
            expected: expected.into(),
        }
    }
}
