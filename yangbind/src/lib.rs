//! # YangBind
//!
//! Generates Java binding descriptors from effective YANG schema trees.
//!
//! YangBind loads a serialized effective model, runs the generator reactor
//! over it and hands back one descriptor per generated class, with stable
//! and collision-free names.
//!
//! ## Features
//!
//! - **Deterministic naming** - The same model always yields the same classes
//! - **Grouping and augment aware** - Copies link back to their definitions
//! - **Pluggable sinks** - Codegen and runtime type builder factories
//!
//! ## Quick Start
//!
//! ```ignore
//! use yangbind::prelude::*;
//!
//! let tree = parse_schema_file("model.xml")?;
//! let types = BindingGenerator::new().generate(&tree)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Java type names, generated-type descriptors, naming rules
//! - [`schema`] - Effective schema tree, inference stack and XML loader
//! - [`codegen`] - The generator reactor and binding generator

pub mod prelude;

/// Binding vocabulary and type descriptors.
pub mod core {
    pub use yangbind_core::*;
}

/// Effective schema tree model.
pub mod schema {
    pub use yangbind_schema::*;
}

/// Binding generation.
pub mod codegen {
    pub use yangbind_codegen::*;
}

// Re-export commonly used items at the crate root
pub use yangbind_codegen::{
    BindingGenerator, CodegenError, GeneratorReactor, ReactorConfig, ReactorError,
    generate_from_file, generate_from_xml,
};
pub use yangbind_core::{GeneratedType, JavaTypeName, RuntimeType};
pub use yangbind_schema::{SchemaTree, parse_schema_file, parse_schema_tree};

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_prelude_drives_reactor() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let tree = parse_schema_tree(
            r#"<schema>
  <module name="acme" namespace="urn:acme" prefix="a">
    <container name="widget"/>
  </module>
</schema>"#,
        )
        .expect("Failed to parse schema");

        let mut reactor = GeneratorReactor::new(&tree);
        reactor
            .execute(&mut CodegenTypeBuilderFactory)
            .expect("Failed to execute reactor");
        assert_eq!(reactor.state(), ReactorState::Finished);
        let widget = reactor.find("acme", &["widget"]).expect("widget generator");
        assert_eq!(
            reactor.type_name(widget).map(JavaTypeName::simple_name),
            Some("Widget")
        );
    }
}
