//! Synthetic schema models.

use std::fmt::Write;

/// Shape of a generated model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelShape {
    /// Number of modules.
    pub modules: usize,
    /// Top-level containers per module.
    pub containers: usize,
    /// Leaves per container.
    pub leaves: usize,
}

impl ModelShape {
    /// Creates a new model shape.
    #[must_use]
    pub const fn new(modules: usize, containers: usize, leaves: usize) -> Self {
        Self {
            modules,
            containers,
            leaves,
        }
    }
}

/// Builds schema tree XML for a synthetic model.
///
/// Every module declares a typedef and a grouping, and each container
/// instantiates the grouping, holds a keyed list and one leaf per
/// `shape.leaves` typed through the typedef. Modules after the first also
/// augment the first container of the previous module.
#[must_use]
pub fn synthetic_model(shape: ModelShape) -> String {
    let mut xml = String::from("<schema>\n");
    for m in 0..shape.modules {
        let _ = writeln!(
            xml,
            r#"  <module name="bench-{m}" namespace="urn:bench:{m}" revision="2024-01-01" prefix="b{m}">"#
        );
        if m > 0 {
            let prev = m - 1;
            let _ = writeln!(xml, r#"    <import module="bench-{prev}" prefix="b{prev}"/>"#);
        }
        xml.push_str(r#"    <typedef name="counter"><type name="uint64"/></typedef>"#);
        xml.push('\n');
        xml.push_str(
            r#"    <grouping name="stamped"><leaf name="stamp"><type name="string"/></leaf></grouping>"#,
        );
        xml.push('\n');
        for c in 0..shape.containers {
            let _ = writeln!(xml, r#"    <container name="box-{c}">"#);
            xml.push_str(r#"      <uses grouping="stamped"/>"#);
            xml.push('\n');
            xml.push_str(r#"      <leaf name="stamp" provenance="uses"><type name="string"/></leaf>"#);
            xml.push('\n');
            for l in 0..shape.leaves {
                let _ = writeln!(xml, r#"      <leaf name="value-{l}"><type name="counter"/></leaf>"#);
            }
            xml.push_str(r#"      <list name="entry" key="id"><leaf name="id"><type name="uint32"/></leaf></list>"#);
            xml.push('\n');
            xml.push_str("    </container>\n");
        }
        if m > 0 && shape.containers > 0 {
            let prev = m - 1;
            let _ = writeln!(xml, r#"    <augment target="/b{prev}:box-0">"#);
            xml.push_str(r#"      <leaf name="extra"><type name="boolean"/></leaf>"#);
            xml.push('\n');
            xml.push_str("    </augment>\n");
        }
        xml.push_str("  </module>\n");
    }
    xml.push_str("</schema>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use yangbind_codegen::BindingGenerator;
    use yangbind_schema::parse_schema_tree;

    #[test]
    fn test_synthetic_model_generates() {
        let xml = synthetic_model(ModelShape::new(3, 2, 4));
        let tree = parse_schema_tree(&xml).expect("Failed to parse synthetic model");
        let types = BindingGenerator::new()
            .generate(&tree)
            .expect("Failed to generate bindings");

        // Per module: data root, typedef, grouping, and per container the
        // container, list and key. One augmentation per module after the first.
        assert_eq!(types.len(), 3 * (3 + 2 * 3) + 2);
    }

    #[test]
    fn test_empty_model() {
        let xml = synthetic_model(ModelShape::new(0, 0, 0));
        let tree = parse_schema_tree(&xml).expect("Failed to parse synthetic model");
        assert!(tree.modules().next().is_none());
    }
}
