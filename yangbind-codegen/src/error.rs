//! Error types for binding generation.

use thiserror::Error;

/// Fatal linkage or naming failure inside the generator reactor.
///
/// Every variant names the offending schema node so that the failure can be
/// traced back to the model.
#[derive(Debug, Error)]
pub enum ReactorError {
    /// A `uses` names a grouping which is not in scope.
    #[error("{node}: grouping '{grouping}' not found")]
    GroupingNotFound {
        /// Grouping name.
        grouping: String,
        /// The `uses` statement.
        node: String,
    },

    /// A `type` names a typedef which is not in scope.
    #[error("{node}: typedef '{type_name}' not found")]
    TypedefNotFound {
        /// Typedef name.
        type_name: String,
        /// The type-bearing node.
        node: String,
    },

    /// A `base` names an identity which does not exist.
    #[error("{node}: identity '{identity}' not found")]
    IdentityNotFound {
        /// Identity name.
        identity: String,
        /// The referencing node.
        node: String,
    },

    /// An augment target could not be found.
    #[error("{node}: augment target '{target}' not found")]
    AugmentTargetNotFound {
        /// Target path.
        target: String,
        /// The augment.
        node: String,
    },

    /// An augment target exists but cannot be augmented.
    #[error("{node}: augment target '{target}' is not a data node container")]
    InvalidAugmentTarget {
        /// Description of the target.
        target: String,
        /// The augment.
        node: String,
    },

    /// A leafref path does not resolve in an instantiated context.
    #[error("{node}: leafref path '{path}' cannot be resolved: {reason}")]
    LeafrefTargetNotFound {
        /// The path expression.
        path: String,
        /// The leafref node.
        node: String,
        /// Underlying lookup failure.
        reason: String,
    },

    /// Type chains could not be resolved, typically a typedef cycle.
    #[error("unresolvable type definitions: {nodes}")]
    UnresolvedTypes {
        /// The affected nodes.
        nodes: String,
    },

    /// The original-definition sweep stopped making progress.
    #[error("cannot link original definitions of: {nodes}")]
    UnresolvedOriginals {
        /// The affected nodes.
        nodes: String,
    },

    /// Two members of one collision domain ran out of naming strategies.
    #[error("{domain}: name '{name}' collides between {members} and cannot be resolved")]
    CollisionExhausted {
        /// Owner of the collision domain.
        domain: String,
        /// The colliding class name.
        name: String,
        /// The exhausted members.
        members: String,
    },

    /// A previous execution failed part way and left the reactor unusable.
    #[error("reactor cannot resume a partial execution")]
    PartialExecution,

    /// Results were requested before the reactor ran.
    #[error("reactor has not been executed")]
    NotExecuted,

    /// Schema navigation error.
    #[error("schema error: {0}")]
    Schema(#[from] yangbind_schema::SchemaError),

    /// Generated type descriptor error.
    #[error("type descriptor error: {0}")]
    Descriptor(#[from] yangbind_core::Error),
}

/// Error type for binding generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema loading error.
    #[error("schema parse error: {0}")]
    Parse(#[from] yangbind_schema::ParseError),

    /// Schema validation error.
    #[error("schema error: {0}")]
    Schema(#[from] yangbind_schema::SchemaError),

    /// Reactor error.
    #[error("generation error: {0}")]
    Reactor(#[from] ReactorError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
