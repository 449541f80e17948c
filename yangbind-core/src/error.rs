//! Error types for binding descriptors.

use thiserror::Error;

/// Core error type for descriptor construction.
#[derive(Debug, Error)]
pub enum Error {
    /// Two methods with the same signature were declared on one type.
    #[error("duplicate method '{method}' on type '{type_name}'")]
    DuplicateMethod {
        /// Canonical name of the type.
        type_name: String,
        /// Method name.
        method: String,
    },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
