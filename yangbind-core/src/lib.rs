//! # YangBind Core
//!
//! Binding vocabulary shared by the YANG-to-Java binding generator.
//!
//! This crate provides:
//! - RFC 6020 built-in types and their Java mapping
//! - Java type names and type references
//! - Naming rules for classes, methods and packages
//! - Generated-type descriptors, builders and builder factories
//! - Runtime type descriptors

pub mod error;
pub mod generated;
pub mod naming;
pub mod runtime;
pub mod types;

pub use error::{Error, Result};
pub use generated::{
    Annotation, CodegenTypeBuilderFactory, Constant, EnumValue, GeneratedType,
    GeneratedTypeBuilder, GeneratedTypeKind, MethodSignature, Property,
    RuntimeTypeBuilderFactory, TypeBuilderFactory, ValueMechanics,
};
pub use runtime::{RuntimeType, RuntimeTypeKind};
pub use types::{BuiltinType, JavaTypeName, Type};
