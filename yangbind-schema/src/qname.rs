//! Qualified names and schema paths.

use std::fmt;

use crate::error::ParseError;

/// Module revision date, `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision(String);

impl Revision {
    /// Parses a revision date.
    ///
    /// # Errors
    /// Returns `ParseError` if the value is not of the form `YYYY-MM-DD`.
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let bytes = value.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if well_formed {
            Ok(Self(value.to_string()))
        } else {
            Err(ParseError::invalid_attr("module", "revision", value))
        }
    }

    /// Returns the revision as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Namespace and optional revision identifying a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QNameModule {
    namespace: String,
    revision: Option<Revision>,
}

impl QNameModule {
    /// Creates a module identity.
    pub fn new(namespace: impl Into<String>, revision: Option<Revision>) -> Self {
        Self {
            namespace: namespace.into(),
            revision,
        }
    }

    /// Returns the namespace URI.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the revision, if any.
    #[must_use]
    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }
}

impl fmt::Display for QNameModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revision {
            Some(rev) => write!(f, "{}?revision={}", self.namespace, rev),
            None => f.write_str(&self.namespace),
        }
    }
}

/// Name qualified by the module which defines it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    module: QNameModule,
    local_name: String,
}

impl QName {
    /// Creates a qualified name.
    pub fn new(module: QNameModule, local_name: impl Into<String>) -> Self {
        Self {
            module,
            local_name: local_name.into(),
        }
    }

    /// Returns the defining module.
    #[must_use]
    pub fn module(&self) -> &QNameModule {
        &self.module
    }

    /// Returns the local name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns the same local name in another module's namespace.
    #[must_use]
    pub fn bind_to(&self, module: &QNameModule) -> Self {
        Self {
            module: module.clone(),
            local_name: self.local_name.clone(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.module, self.local_name)
    }
}

/// Absolute or descendant schema node identifier, as used by `augment`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaNodeIdentifier {
    absolute: bool,
    steps: Vec<QName>,
}

impl SchemaNodeIdentifier {
    /// Creates an absolute identifier, rooted at a module.
    #[must_use]
    pub fn absolute(steps: Vec<QName>) -> Self {
        Self {
            absolute: true,
            steps,
        }
    }

    /// Creates a descendant identifier, relative to the enclosing node.
    #[must_use]
    pub fn descendant(steps: Vec<QName>) -> Self {
        Self {
            absolute: false,
            steps,
        }
    }

    /// Returns true for absolute identifiers.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Returns the path steps.
    #[must_use]
    pub fn steps(&self) -> &[QName] {
        &self.steps
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the identifier has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the last step.
    #[must_use]
    pub fn last(&self) -> Option<&QName> {
        self.steps.last()
    }
}

impl fmt::Display for SchemaNodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 || self.absolute {
                f.write_str("/")?;
            }
            f.write_str(step.local_name())?;
        }
        Ok(())
    }
}

/// Leafref path expression.
///
/// Only the location-path subset is supported: an absolute path, or a
/// relative path made of leading `..` steps followed by child steps.
/// Predicates are not part of the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    absolute: bool,
    parent_steps: usize,
    steps: Vec<QName>,
    text: String,
}

impl PathExpression {
    /// Creates an absolute path.
    pub fn absolute(steps: Vec<QName>, text: impl Into<String>) -> Self {
        Self {
            absolute: true,
            parent_steps: 0,
            steps,
            text: text.into(),
        }
    }

    /// Creates a relative path with `parent_steps` leading `..` steps.
    pub fn relative(parent_steps: usize, steps: Vec<QName>, text: impl Into<String>) -> Self {
        Self {
            absolute: false,
            parent_steps,
            steps,
            text: text.into(),
        }
    }

    /// Returns true for absolute paths.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Returns the number of leading `..` steps.
    #[must_use]
    pub fn parent_steps(&self) -> usize {
        self.parent_steps
    }

    /// Returns the child steps.
    #[must_use]
    pub fn steps(&self) -> &[QName] {
        &self.steps
    }

    /// Returns the source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
