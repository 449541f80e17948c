//! XML loader for serialized effective schema trees.
//!
//! The document mirrors the effective model directly: every element is a
//! YANG keyword, and copies produced by `uses` or `augment` are written out
//! at their effective location with a `provenance` attribute.
//!
//! ```xml
//! <schema>
//!   <module name="foo" namespace="urn:foo" revision="2024-01-31" prefix="f">
//!     <import module="bar" prefix="b"/>
//!     <container name="top">
//!       <uses grouping="b:grp"/>
//!       <leaf name="id" provenance="uses"><type name="string"/></leaf>
//!     </container>
//!   </module>
//! </schema>
//! ```

use std::collections::HashMap;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use yangbind_core::BuiltinType;

use crate::error::{ParseError, SchemaError};
use crate::qname::{PathExpression, QName, QNameModule, Revision, SchemaNodeIdentifier};
use crate::statement::{Argument, Provenance, StatementKind, Status, StmtId, TypeName};
use crate::tree::{SchemaTree, SchemaTreeBuilder};

/// Parses an effective schema tree from a string.
///
/// # Arguments
/// * `xml` - serialized schema tree
///
/// # Returns
/// The validated schema tree.
///
/// # Errors
/// Returns `SchemaError` if the XML is malformed, names cannot be resolved,
/// or the resulting tree fails validation.
pub fn parse_schema_tree(xml: &str) -> Result<SchemaTree, SchemaError> {
    let root = read_document(xml)?;
    build_tree(&root)
}

/// Parses an effective schema tree from a file.
///
/// # Errors
/// Returns `SchemaError` if the file cannot be read or parsed.
pub fn parse_schema_file(path: impl AsRef<Path>) -> Result<SchemaTree, SchemaError> {
    let xml = std::fs::read_to_string(path).map_err(ParseError::from)?;
    parse_schema_tree(&xml)
}

/// Element as read from the document, before name resolution.
#[derive(Debug, Default)]
struct RawElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<RawElement>,
    text: String,
}

impl RawElement {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, ParseError> {
        let name = std::str::from_utf8(e.name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attr in e.attributes().flatten() {
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = std::str::from_utf8(&attr.value)?;
            attributes.push((key.to_string(), value.to_string()));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn require(&self, name: &str) -> Result<&str, ParseError> {
        self.attr(name)
            .ok_or_else(|| ParseError::missing_attr(&self.name, name))
    }
}

/// Reads the whole document into a raw element tree.
fn read_document(xml: &str) -> Result<RawElement, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<RawElement> = Vec::new();
    let mut root: Option<RawElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => stack.push(RawElement::from_start(e)?),
            Ok(Event::Empty(ref e)) => {
                let element = RawElement::from_start(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ParseError::structure("unbalanced end tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref t)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(std::str::from_utf8(t.as_ref())?.trim());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ParseError::structure("unterminated element"));
    }
    root.ok_or_else(|| ParseError::structure("No schema element found"))
}

fn attach(
    stack: &mut [RawElement],
    root: &mut Option<RawElement>,
    element: RawElement,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(ParseError::structure("multiple root elements")),
    }
    Ok(())
}

/// Name resolution context of one module.
struct ModuleContext<'a> {
    name: &'a str,
    module: &'a QNameModule,
    prefixes: HashMap<&'a str, &'a QNameModule>,
    global: &'a HashMap<String, QNameModule>,
}

impl ModuleContext<'_> {
    fn resolve_prefix(&self, prefix: &str) -> Result<QNameModule, ParseError> {
        self.prefixes
            .get(prefix)
            .map(|module| (*module).clone())
            .or_else(|| self.global.get(prefix).cloned())
            .ok_or_else(|| ParseError::UnknownPrefix {
                prefix: prefix.to_string(),
                module: self.name.to_string(),
            })
    }

    fn qname(&self, element: &str, attribute: &str, value: &str) -> Result<QName, ParseError> {
        let (module, local) = match value.split_once(':') {
            Some((prefix, local)) => (self.resolve_prefix(prefix)?, local),
            None => (self.module.clone(), value),
        };
        if !is_identifier(local) {
            return Err(ParseError::invalid_attr(element, attribute, value));
        }
        Ok(QName::new(module, local))
    }

    fn schema_node_id(&self, value: &str) -> Result<SchemaNodeIdentifier, ParseError> {
        let absolute = value.starts_with('/');
        let steps = value
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|step| self.qname("augment", "target", step))
            .collect::<Result<Vec<_>, _>>()?;
        if steps.is_empty() {
            return Err(ParseError::invalid_attr("augment", "target", value));
        }
        Ok(if absolute {
            SchemaNodeIdentifier::absolute(steps)
        } else {
            SchemaNodeIdentifier::descendant(steps)
        })
    }

    fn path(&self, value: &str) -> Result<PathExpression, ParseError> {
        let text = value.trim();
        if text.contains('[') {
            return Err(ParseError::invalid_attr("path", "value", value));
        }

        let absolute = text.starts_with('/');
        let mut parent_steps = 0;
        let mut steps = Vec::new();
        for step in text.split('/').filter(|s| !s.is_empty()) {
            if step == ".." {
                if absolute || !steps.is_empty() {
                    return Err(ParseError::invalid_attr("path", "value", value));
                }
                parent_steps += 1;
            } else {
                steps.push(self.qname("path", "value", step)?);
            }
        }

        Ok(if absolute {
            PathExpression::absolute(steps, text)
        } else {
            PathExpression::relative(parent_steps, steps, text)
        })
    }

    fn type_name(&self, value: &str) -> Result<TypeName, ParseError> {
        if !value.contains(':') {
            if let Some(builtin) = BuiltinType::from_yang_name(value) {
                return Ok(TypeName::Builtin(builtin));
            }
        }
        Ok(TypeName::Typedef(self.qname("type", "name", value)?))
    }

    fn keys(&self, value: &str) -> Result<Vec<QName>, ParseError> {
        value
            .split_whitespace()
            .map(|key| self.qname("list", "key", key))
            .collect()
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Declared identity of a module element.
struct ModuleDecl<'a> {
    element: &'a RawElement,
    name: &'a str,
    module: QNameModule,
    prefix: &'a str,
}

fn build_tree(root: &RawElement) -> Result<SchemaTree, SchemaError> {
    if root.name != "schema" {
        return Err(ParseError::unknown_element(&root.name, "document").into());
    }

    let mut decls = Vec::new();
    for element in &root.children {
        if element.name != "module" {
            return Err(ParseError::unknown_element(&element.name, "schema").into());
        }
        let name = element.require("name")?;
        let revision = element.attr("revision").map(Revision::parse).transpose()?;
        decls.push(ModuleDecl {
            element,
            name,
            module: QNameModule::new(element.require("namespace")?, revision),
            prefix: element.attr("prefix").unwrap_or(name),
        });
    }

    let global: HashMap<String, QNameModule> = decls
        .iter()
        .map(|decl| (decl.prefix.to_string(), decl.module.clone()))
        .collect();
    let by_name: HashMap<&str, &QNameModule> =
        decls.iter().map(|decl| (decl.name, &decl.module)).collect();

    let mut builder = SchemaTreeBuilder::new();
    for decl in &decls {
        let module = builder.module(decl.name, decl.module.clone(), decl.prefix)?;

        let mut prefixes = HashMap::new();
        prefixes.insert(decl.prefix, &decl.module);
        for import in decl.element.children.iter().filter(|c| c.name == "import") {
            let imported = import.require("module")?;
            let target = by_name
                .get(imported)
                .ok_or_else(|| ParseError::invalid_attr("import", "module", imported))?;
            prefixes.insert(import.require("prefix")?, *target);
        }

        let ctx = ModuleContext {
            name: decl.name,
            module: &decl.module,
            prefixes,
            global: &global,
        };
        apply_common(&mut builder, module, decl.element)?;
        for child in &decl.element.children {
            match child.name.as_str() {
                "import" => {}
                "description" => {
                    builder.set_description(module, child.text.clone());
                }
                _ => convert(&mut builder, &ctx, module, child)?,
            }
        }
    }

    builder.build()
}

/// Converts one element and its subtree into statements.
fn convert(
    builder: &mut SchemaTreeBuilder,
    ctx: &ModuleContext<'_>,
    parent: StmtId,
    element: &RawElement,
) -> Result<(), SchemaError> {
    let kind = StatementKind::from_keyword(&element.name);
    let name = element.name.as_str();

    let argument = match &kind {
        StatementKind::Container
        | StatementKind::List
        | StatementKind::Leaf
        | StatementKind::LeafList
        | StatementKind::Choice
        | StatementKind::Case
        | StatementKind::Grouping
        | StatementKind::Typedef
        | StatementKind::Identity
        | StatementKind::Rpc
        | StatementKind::Action
        | StatementKind::Notification
        | StatementKind::Anydata
        | StatementKind::Anyxml
        | StatementKind::Base => {
            Argument::QName(ctx.qname(name, "name", element.require("name")?)?)
        }
        StatementKind::Input | StatementKind::Output => {
            let local = element.attr("name").unwrap_or(kind.keyword());
            Argument::QName(ctx.qname(name, "name", local)?)
        }
        StatementKind::Uses => {
            Argument::QName(ctx.qname(name, "grouping", element.require("grouping")?)?)
        }
        StatementKind::Augment => {
            Argument::SchemaNodeId(ctx.schema_node_id(element.require("target")?)?)
        }
        StatementKind::Type => Argument::Type(ctx.type_name(element.require("name")?)?),
        StatementKind::Path => Argument::Path(ctx.path(element.require("value")?)?),
        StatementKind::Key => Argument::Keys(ctx.keys(element.require("value")?)?),
        StatementKind::Enum | StatementKind::Bit => {
            Argument::Text(element.require("name")?.to_string())
        }
        StatementKind::Module => {
            return Err(ParseError::unknown_element(name, "module").into());
        }
        StatementKind::Unknown(_) => element
            .attr("name")
            .map_or(Argument::None, |value| Argument::Text(value.to_string())),
    };

    let id = builder.statement(parent, kind.clone(), argument);
    apply_common(builder, id, element)?;

    if kind == StatementKind::List {
        if let Some(keys) = element.attr("key") {
            builder.statement(id, StatementKind::Key, Argument::Keys(ctx.keys(keys)?));
        }
    }

    for child in &element.children {
        if child.name == "description" {
            builder.set_description(id, child.text.clone());
        } else {
            convert(builder, ctx, id, child)?;
        }
    }
    Ok(())
}

/// Applies `provenance`, `status` and `description` attributes.
fn apply_common(
    builder: &mut SchemaTreeBuilder,
    id: StmtId,
    element: &RawElement,
) -> Result<(), ParseError> {
    if let Some(value) = element.attr("provenance") {
        let provenance = Provenance::parse(value)
            .ok_or_else(|| ParseError::invalid_attr(&element.name, "provenance", value))?;
        builder.set_provenance(id, provenance);
    }
    if let Some(value) = element.attr("status") {
        let status = Status::parse(value)
            .ok_or_else(|| ParseError::invalid_attr(&element.name, "status", value))?;
        builder.set_status(id, status);
    }
    if let Some(value) = element.attr("description") {
        builder.set_description(id, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SIMPLE_SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<schema>
  <module name="base" namespace="urn:base" revision="2024-01-31" prefix="b">
    <typedef name="percent"><type name="uint8"/></typedef>
    <grouping name="named">
      <leaf name="name"><type name="string"/></leaf>
    </grouping>
  </module>
  <module name="app" namespace="urn:app" prefix="a">
    <import module="base" prefix="bs"/>
    <container name="top" status="deprecated">
      <description>Top-level settings.</description>
      <uses grouping="bs:named"/>
      <leaf name="name" provenance="uses"><type name="string"/></leaf>
      <leaf name="load"><type name="bs:percent"/></leaf>
      <list name="entry" key="id">
        <leaf name="id"><type name="uint32"/></leaf>
      </list>
      <ext:annotation xmlns:ext="urn:ext" name="ignored"/>
    </container>
  </module>
</schema>"#;

    #[test]
    fn test_parse_simple_schema() {
        let tree = parse_schema_tree(SIMPLE_SCHEMA).expect("Failed to parse schema");
        let modules: Vec<_> = tree.modules().map(|(m, _)| m.namespace().to_string()).collect();
        assert_eq!(modules, vec!["urn:app", "urn:base"]);

        let app = tree.module_by_name("app").expect("app module");
        let top = tree
            .find_child(app, &StatementKind::Container)
            .expect("top container");
        let stmt = tree.statement(top);
        assert_eq!(stmt.status(), Status::Deprecated);
        assert_eq!(stmt.description(), Some("Top-level settings."));

        let uses = tree
            .find_child(top, &StatementKind::Uses)
            .expect("uses statement");
        let grouping = tree.statement(uses).qname().expect("grouping name");
        assert_eq!(grouping.module().namespace(), "urn:base");
        assert_eq!(grouping.local_name(), "named");
    }

    #[test]
    fn test_parse_provenance_and_types() {
        let tree = parse_schema_tree(SIMPLE_SCHEMA).expect("Failed to parse schema");
        let app = tree.module_by_name("app").expect("app module");
        let top = tree
            .find_child(app, &StatementKind::Container)
            .expect("top container");
        let leaves: Vec<_> = tree.children_of_kind(top, &StatementKind::Leaf).collect();
        assert_eq!(tree.statement(leaves[0]).provenance(), Provenance::Uses);
        assert_eq!(tree.statement(leaves[1]).provenance(), Provenance::Original);

        let load_type = tree
            .find_child(leaves[1], &StatementKind::Type)
            .expect("load has a type");
        match tree.statement(load_type).argument().as_type() {
            Some(TypeName::Typedef(qname)) => {
                assert_eq!(qname.module().namespace(), "urn:base");
                assert_eq!(qname.local_name(), "percent");
            }
            other => panic!("unexpected type argument {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_key_and_unknown() {
        let tree = parse_schema_tree(SIMPLE_SCHEMA).expect("Failed to parse schema");
        let app = tree.module_by_name("app").expect("app module");
        let top = tree
            .find_child(app, &StatementKind::Container)
            .expect("top container");
        let list = tree
            .find_child(top, &StatementKind::List)
            .expect("entry list");
        let key = tree.find_child(list, &StatementKind::Key).expect("list key");
        assert_eq!(tree.statement(key).argument().as_keys().map(<[QName]>::len), Some(1));

        let unknown = tree
            .children(top)
            .iter()
            .any(|c| matches!(tree.statement(*c).kind(), StatementKind::Unknown(_)));
        assert!(unknown);
    }

    #[test]
    fn test_parse_paths() {
        let xml = r#"<schema>
  <module name="m" namespace="urn:m" prefix="m">
    <container name="c">
      <leaf name="a"><type name="string"/></leaf>
      <leaf name="b"><type name="leafref"><path value="../a/../a"/></type></leaf>
    </container>
  </module>
</schema>"#;
        let err = parse_schema_tree(xml).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Parse(ParseError::InvalidAttribute { .. })
        ));

        let xml = xml.replace("../a/../a", "/m:c/a");
        let tree = parse_schema_tree(&xml).expect("Failed to parse schema");
        assert_eq!(tree.modules().count(), 1);
    }

    #[test]
    fn test_parse_errors() {
        let missing = r#"<schema><module name="m" prefix="m"/></schema>"#;
        assert!(matches!(
            parse_schema_tree(missing).unwrap_err(),
            SchemaError::Parse(ParseError::MissingAttribute { .. })
        ));

        let prefix = r#"<schema><module name="m" namespace="urn:m" prefix="m">
            <container name="x:c"/></module></schema>"#;
        assert!(matches!(
            parse_schema_tree(prefix).unwrap_err(),
            SchemaError::Parse(ParseError::UnknownPrefix { .. })
        ));

        assert!(parse_schema_tree("<modules/>").is_err());
    }

    #[test]
    fn test_parse_schema_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(SIMPLE_SCHEMA.as_bytes())
            .expect("Failed to write schema");

        let tree = parse_schema_file(file.path()).expect("Failed to parse schema file");
        assert_eq!(tree.modules().count(), 2);
    }
}
