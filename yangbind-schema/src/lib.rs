//! # YangBind Schema
//!
//! Effective YANG schema tree model and loader.
//!
//! This crate provides:
//! - Qualified names, module identities and schema paths
//! - An arena-backed effective statement tree with provenance tracking
//! - A schema inference stack for resolving leafref paths
//! - Structural validation
//! - An XML loader for serialized effective trees

pub mod error;
pub mod inference;
pub mod parser;
pub mod qname;
pub mod statement;
pub mod tree;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use inference::SchemaInferenceStack;
pub use parser::{parse_schema_file, parse_schema_tree};
pub use qname::{PathExpression, QName, QNameModule, Revision, SchemaNodeIdentifier};
pub use statement::{Argument, Provenance, Statement, StatementKind, Status, StmtId, TypeName};
pub use tree::{ModuleInfo, SchemaTree, SchemaTreeBuilder};
pub use validation::validate_tree;
