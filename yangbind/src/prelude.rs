//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use yangbind::prelude::*;
//! ```

// Core types
pub use yangbind_core::error::{Error as CoreError, Result as CoreResult};
pub use yangbind_core::{
    BuiltinType, CodegenTypeBuilderFactory, GeneratedType, GeneratedTypeBuilder,
    GeneratedTypeKind, JavaTypeName, RuntimeType, RuntimeTypeBuilderFactory, RuntimeTypeKind,
    Type, TypeBuilderFactory,
};

// Schema types
pub use yangbind_schema::{
    ParseError, QName, QNameModule, SchemaError, SchemaTree, StatementKind, parse_schema_file,
    parse_schema_tree,
};

// Generation types
pub use yangbind_codegen::{
    BindingGenerator, ClassPlacement, CodegenError, GeneratorId, GeneratorKind, GeneratorReactor,
    ReactorConfig, ReactorError, ReactorState, generate_from_file, generate_from_xml,
};
