//! # YangBind Codegen
//!
//! Java binding generation from effective YANG schema trees.
//!
//! This crate provides:
//! - The generator reactor, which maps schema statements to binding classes
//! - Naming strategies and collision resolution for generated classes
//! - Typedef, grouping, augment and original-definition linkage
//! - Generated-type materialization and runtime type views
//!
//! ```ignore
//! use yangbind_codegen::{generate_from_xml, BindingGenerator};
//!
//! let types = generate_from_xml(xml)?;
//! for ty in &types {
//!     println!("{}", ty.name);
//! }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod reactor;

pub use config::{ReactorConfig, ReactorConfigBuilder};
pub use error::{CodegenError, ReactorError};
pub use generator::BindingGenerator;
pub use reactor::{
    ClassPlacement, Generator, GeneratorId, GeneratorKind, GeneratorReactor, GeneratorResult,
    ReactorState, TypeReference,
};

use yangbind_core::GeneratedType;

/// Generates binding types from a serialized effective schema tree.
///
/// # Arguments
/// * `xml` - Schema tree XML content
///
/// # Returns
/// Top-level generated types in forest pre-order.
///
/// # Errors
/// Returns `CodegenError` if loading or generation fails.
pub fn generate_from_xml(xml: &str) -> Result<Vec<GeneratedType>, CodegenError> {
    let tree = yangbind_schema::parse_schema_tree(xml)?;
    BindingGenerator::new().generate(&tree)
}

/// Generates binding types from a schema tree XML file.
///
/// # Arguments
/// * `path` - Path to the schema tree XML file
///
/// # Returns
/// Top-level generated types in forest pre-order.
///
/// # Errors
/// Returns `CodegenError` if reading, loading, or generation fails.
pub fn generate_from_file(path: &std::path::Path) -> Result<Vec<GeneratedType>, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCHEMA: &str = r#"<schema>
  <module name="toaster" namespace="urn:example:toaster" prefix="t">
    <container name="toaster">
      <leaf name="darkness"><type name="uint32"/></leaf>
    </container>
  </module>
</schema>"#;

    #[test]
    fn test_generate_from_xml() {
        let types = generate_from_xml(SCHEMA).expect("Failed to generate bindings");
        let names: Vec<_> = types.iter().map(|t| t.name.canonical_name()).collect();
        assert_eq!(
            names,
            vec![
                "org.opendaylight.yang.gen.v1.urn.example.toaster.norev.ToasterData",
                "org.opendaylight.yang.gen.v1.urn.example.toaster.norev.Toaster",
            ]
        );
    }

    #[test]
    fn test_generate_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(SCHEMA.as_bytes())
            .expect("Failed to write schema");
        let types = generate_from_file(file.path()).expect("Failed to generate bindings");
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn test_generate_from_missing_file() {
        let err = generate_from_file(std::path::Path::new("/nonexistent/schema.xml")).unwrap_err();
        assert!(matches!(err, CodegenError::Io(_)));
    }

    #[test]
    fn test_invalid_xml_is_reported() {
        let err = generate_from_xml("<schema><module").unwrap_err();
        assert!(matches!(err, CodegenError::Schema(_) | CodegenError::Parse(_)));
    }
}
