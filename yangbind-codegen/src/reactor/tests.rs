use std::collections::{HashMap, HashSet};

use yangbind_core::types::binding;
use yangbind_core::{
    BuiltinType, CodegenTypeBuilderFactory, GeneratedTypeBuilder, GeneratedTypeKind,
    JavaTypeName, RuntimeTypeKind, Type, TypeBuilderFactory, ValueMechanics,
};
use yangbind_schema::{parse_schema_tree, SchemaTree};

use super::*;
use crate::config::ReactorConfig;

const DEMO_PACKAGE: &str = "org.opendaylight.yang.gen.v1.urn.test.yang.data.demo.rev200324";

const DEMO: &str = r#"<schema>
  <module name="yang-data-demo" namespace="urn:test:yang:data:demo" revision="2020-03-24" prefix="demo">
    <description>Demo module.</description>
    <container name="grp-for-container">
      <leaf name="name"><type name="string"/></leaf>
      <leaf-list name="tags"><type name="string"/></leaf-list>
      <leaf name="mode">
        <type name="enumeration"><enum name="fast"/><enum name="slow"/></type>
      </leaf>
      <list name="entry" key="id">
        <leaf name="id"><type name="uint32"/></leaf>
      </list>
      <list name="item">
        <leaf name="v"><type name="int8"/></leaf>
      </list>
      <choice name="shape">
        <case name="round">
          <leaf name="radius"><type name="decimal64"/></leaf>
        </case>
      </choice>
    </container>
    <container name="legacy" status="obsolete"/>
  </module>
</schema>"#;

const CROSS_MODULE_USES: &str = r#"<schema>
  <module name="a" namespace="urn:a" prefix="a">
    <grouping name="g">
      <container name="c">
        <leaf name="x"><type name="string"/></leaf>
      </container>
    </grouping>
  </module>
  <module name="b" namespace="urn:b" prefix="b">
    <import module="a" prefix="a"/>
    <container name="top">
      <uses grouping="a:g">
        <augment target="c">
          <leaf name="extra"><type name="string"/></leaf>
        </augment>
      </uses>
      <container name="c" provenance="uses">
        <leaf name="x" provenance="uses"><type name="string"/></leaf>
        <leaf name="extra" provenance="augmentation"><type name="string"/></leaf>
      </container>
    </container>
  </module>
</schema>"#;

const AUGMENTS: &str = r#"<schema>
  <module name="m" namespace="urn:m" prefix="m">
    <container name="foo">
      <container name="bar"/>
      <leaf name="a:shallow" provenance="augmentation"><type name="string"/></leaf>
    </container>
  </module>
  <module name="aug" namespace="urn:aug" prefix="a">
    <import module="m" prefix="m"/>
    <augment target="/m:foo/m:bar">
      <leaf name="deep"><type name="string"/></leaf>
    </augment>
    <augment target="/m:foo">
      <leaf name="shallow"><type name="string"/></leaf>
    </augment>
    <augment target="/m:foo">
      <leaf name="other"><type name="string"/></leaf>
    </augment>
  </module>
</schema>"#;

const TYPEDEFS: &str = r#"<schema>
  <module name="types" namespace="urn:types" prefix="t">
    <typedef name="second"><type name="first"/></typedef>
    <typedef name="first"><type name="int32"/></typedef>
    <typedef name="id-ref">
      <type name="leafref"><path value="/t:data/t:id"/></type>
    </typedef>
    <container name="data">
      <leaf name="id"><type name="uint32"/></leaf>
      <leaf name="value"><type name="second"/></leaf>
      <leaf name="ref"><type name="id-ref"/></leaf>
      <leaf name="local-ref"><type name="leafref"><path value="../id"/></type></leaf>
    </container>
  </module>
</schema>"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn parse(xml: &str) -> SchemaTree {
    parse_schema_tree(xml).expect("Failed to parse schema")
}

fn executed(tree: &SchemaTree) -> GeneratorReactor<'_> {
    let mut reactor = GeneratorReactor::new(tree);
    reactor
        .execute(&mut CodegenTypeBuilderFactory)
        .expect("Failed to execute reactor");
    reactor
}

fn string_type() -> Type {
    Type::named(JavaTypeName::new("java.lang", "String"))
}

#[derive(Default)]
struct CountingFactory {
    calls: HashMap<String, usize>,
}

impl TypeBuilderFactory for CountingFactory {
    fn new_type_builder(&mut self, kind: GeneratedTypeKind, name: JavaTypeName) -> GeneratedTypeBuilder {
        *self.calls.entry(name.canonical_name()).or_default() += 1;
        GeneratedTypeBuilder::new(kind, name)
    }
}

#[test]
fn test_module_and_container_names() {
    let tree = parse(DEMO);
    let reactor = executed(&tree);
    assert_eq!(reactor.state(), ReactorState::Finished);

    let module = reactor.find("yang-data-demo", &[]).expect("module generator");
    let module_name = reactor.type_name(module).expect("module type name");
    assert_eq!(module_name.package_name(), DEMO_PACKAGE);
    assert_eq!(module_name.simple_name(), "YangDataDemoData");

    let container = reactor
        .find("yang-data-demo", &["grp-for-container"])
        .expect("container generator");
    assert_eq!(
        reactor.type_name(container).map(JavaTypeName::canonical_name),
        Some(format!("{DEMO_PACKAGE}.GrpForContainer"))
    );
    assert_eq!(
        reactor.java_package(container),
        Some(format!("{DEMO_PACKAGE}.grp._for.container").as_str())
    );
}

#[test]
fn test_container_type_shape() {
    let tree = parse(DEMO);
    let reactor = executed(&tree);
    let container = reactor
        .find("yang-data-demo", &["grp-for-container"])
        .expect("container generator");
    let ty = reactor.generated_type(container).expect("container type");
    let package = format!("{DEMO_PACKAGE}.grp._for.container");

    assert!(ty.implements_raw("ChildOf"));
    assert!(ty.implements_raw("Augmentable"));
    assert_eq!(
        ty.method("getName").and_then(|m| m.return_type.clone()),
        Some(string_type())
    );
    let require = ty.method("requireName").expect("require accessor");
    assert!(require.is_default);
    assert_eq!(require.mechanics, ValueMechanics::NonNull);
    assert_eq!(
        ty.method("getTags").and_then(|m| m.return_type.clone()),
        Some(binding::collection("Set", vec![string_type()]))
    );
    assert_eq!(
        ty.method("getEntry").and_then(|m| m.return_type.clone()),
        Some(binding::collection(
            "Map",
            vec![
                Type::named(JavaTypeName::new(package.as_str(), "EntryKey")),
                Type::named(JavaTypeName::new(package.as_str(), "Entry")),
            ]
        ))
    );
    assert!(ty.method("nonnullEntry").is_some());
    assert_eq!(
        ty.method("getItem").and_then(|m| m.return_type.clone()),
        Some(binding::collection(
            "List",
            vec![Type::named(JavaTypeName::new(package.as_str(), "Item"))]
        ))
    );
    assert!(ty.method("getShape").is_some());
    assert!(ty.method("implementedInterface").is_some());
    assert!(ty.method("bindingEquals").is_some_and(|m| m.is_static));
}

#[test]
fn test_inline_enumeration_is_enclosed() {
    let tree = parse(DEMO);
    let reactor = executed(&tree);
    let mode = reactor
        .find("yang-data-demo", &["grp-for-container", "mode"])
        .expect("mode leaf");
    assert_eq!(reactor.generator(mode).placement(), Some(ClassPlacement::Member));

    let container = reactor
        .find("yang-data-demo", &["grp-for-container"])
        .expect("container generator");
    let ty = reactor.generated_type(container).expect("container type");
    assert_eq!(ty.enclosed.len(), 1);
    let enclosed = &ty.enclosed[0];
    assert_eq!(enclosed.kind, GeneratedTypeKind::Enumeration);
    assert!(enclosed.name.is_nested());
    let values: Vec<_> = enclosed.enum_values.iter().map(|v| v.mapped_name.as_str()).collect();
    assert_eq!(values, vec!["Fast", "Slow"]);
    assert_eq!(
        ty.method("getMode").and_then(|m| m.return_type.clone()),
        Some(Type::named(enclosed.name.clone()))
    );
}

#[test]
fn test_list_key_and_choice_hierarchy() {
    let tree = parse(DEMO);
    let reactor = executed(&tree);

    let entry = reactor
        .find("yang-data-demo", &["grp-for-container", "entry"])
        .expect("entry list");
    let entry_type = reactor.generated_type(entry).expect("entry type");
    assert!(entry_type.implements_raw("Identifiable"));
    assert!(entry_type.method("key").is_some());

    let key = reactor
        .generator(entry)
        .children()
        .iter()
        .copied()
        .find(|c| reactor.generator(*c).kind() == GeneratorKind::Key)
        .expect("key generator");
    let key_type = reactor.generated_type(key).expect("key type");
    assert_eq!(key_type.kind, GeneratedTypeKind::TransferObject);
    assert_eq!(key_type.properties.len(), 1);
    assert_eq!(key_type.properties[0].name, "id");

    let shape = reactor
        .find("yang-data-demo", &["grp-for-container", "shape"])
        .expect("shape choice");
    assert!(reactor
        .generated_type(shape)
        .expect("choice type")
        .implements_raw("ChoiceIn"));

    let round = reactor
        .find("yang-data-demo", &["grp-for-container", "shape", "round"])
        .expect("round case");
    let round_type = reactor.generated_type(round).expect("case type");
    assert!(round_type.implements_raw("Shape"));
}

#[test]
fn test_status_and_description() {
    let tree = parse(DEMO);
    let reactor = executed(&tree);

    let legacy = reactor.find("yang-data-demo", &["legacy"]).expect("legacy container");
    let ty = reactor.generated_type(legacy).expect("legacy type");
    assert!(ty.is_deprecated());
    assert_eq!(
        ty.annotations[0].parameters,
        vec![("forRemoval".to_string(), "true".to_string())]
    );

    let module = reactor.find("yang-data-demo", &[]).expect("module generator");
    let module_type = reactor.generated_type(module).expect("module type");
    assert_eq!(module_type.comment.as_deref(), Some("Demo module."));
    assert!(module_type.implements_raw("DataRoot"));
}

#[test]
fn test_execution_is_deterministic() {
    init_tracing();
    let first_tree = parse(CROSS_MODULE_USES);
    let second_tree = parse(CROSS_MODULE_USES);
    let first = executed(&first_tree);
    let second = executed(&second_tree);
    assert_eq!(first.name_assignments(), second.name_assignments());
    assert!(!first.name_assignments().is_empty());
}

#[test]
fn test_assigned_names_are_unique() {
    for xml in [DEMO, CROSS_MODULE_USES, AUGMENTS, TYPEDEFS] {
        let tree = parse(xml);
        let reactor = executed(&tree);
        let names: Vec<_> = reactor.name_assignments().into_iter().map(|(_, n)| n).collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len(), "duplicate names in {names:?}");
    }
}

#[test]
fn test_colliding_names_fall_back() {
    let xml = r#"<schema>
  <module name="m" namespace="urn:m" prefix="m">
    <typedef name="foo"><type name="string"/></typedef>
    <container name="foo"/>
    <container name="bar"/>
  </module>
</schema>"#;
    let tree = parse(xml);
    let reactor = executed(&tree);
    let module = reactor.find("m", &[]).expect("module generator");

    let mut simple: Vec<_> = reactor
        .generator(module)
        .children()
        .iter()
        .filter_map(|c| reactor.type_name(*c))
        .map(|n| n.simple_name().to_string())
        .collect();
    simple.sort();
    assert_eq!(simple, vec!["Bar", "Foo$CO", "Foo$TD"]);
}

#[test]
fn test_uses_augment_across_modules() {
    let tree = parse(CROSS_MODULE_USES);
    let reactor = executed(&tree);

    let top = reactor.find("b", &["top"]).expect("top container");
    let copy = reactor.find("b", &["top", "c"]).expect("copied container");
    let template = reactor.find("a", &["g", "c"]).expect("grouping container");
    assert_eq!(reactor.original(copy), Some(template));
    assert_eq!(reactor.generator(copy).placement(), Some(ClassPlacement::None));
    assert!(reactor.type_name(copy).is_none());

    let extra = reactor.find("b", &["top", "c", "extra"]).expect("augmented leaf");
    assert!(reactor.generator(extra).provenance().is_augmenting());
    let extra_original = reactor.original(extra).expect("extra original");
    assert_ne!(extra_original, extra);

    let augment = reactor
        .generator(top)
        .children()
        .iter()
        .copied()
        .find(|c| reactor.generator(*c).kind() == GeneratorKind::UsesAugment)
        .expect("uses augment");
    assert_eq!(reactor.augment_target(augment), Some(copy));
    assert_eq!(reactor.generator(extra_original).parent(), Some(augment));

    let augment_type = reactor.generated_type(augment).expect("augmentation type");
    let template_name = reactor.type_name(template).expect("grouping container name");
    assert!(augment_type
        .implements
        .contains(&binding::augmentation(template_name)));
    assert!(augment_type.method("getExtra").is_some());

    let grouping = reactor.find("a", &["g"]).expect("grouping");
    let top_type = reactor.generated_type(top).expect("top type");
    let grouping_name = reactor.type_name(grouping).expect("grouping name");
    assert!(top_type.implements.contains(&Type::named(grouping_name.clone())));
    assert!(top_type.method("getC").is_none());
    assert_eq!(reactor.grouping_users(grouping), vec![top]);
}

#[test]
fn test_leaf_only_container_has_package() {
    let xml = r#"<schema>
  <module name="m" namespace="urn:m" prefix="m">
    <container name="foo">
      <leaf name="x"><type name="string"/></leaf>
    </container>
  </module>
</schema>"#;
    let tree = parse(xml);
    let reactor = executed(&tree);

    let foo = reactor.find("m", &["foo"]).expect("foo container");
    assert_eq!(
        reactor.java_package(foo),
        Some("org.opendaylight.yang.gen.v1.urn.m.norev.foo")
    );
}

#[test]
fn test_augment_package_does_not_clash_with_local_container() {
    let xml = r#"<schema>
  <module name="m" namespace="urn:m" prefix="m">
    <container name="foo"/>
  </module>
  <module name="aug" namespace="urn:aug" prefix="a">
    <import module="m" prefix="m"/>
    <container name="foo">
      <container name="bar"/>
    </container>
    <augment target="/m:foo">
      <container name="bar"/>
    </augment>
  </module>
</schema>"#;
    let tree = parse(xml);
    let reactor = executed(&tree);

    let names: Vec<_> = reactor.name_assignments().into_iter().map(|(_, n)| n).collect();
    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), names.len(), "duplicate names in {names:?}");

    let root = "org.opendaylight.yang.gen.v1.urn.aug.norev";
    let local = reactor.find("aug", &["foo"]).expect("local container");
    assert_eq!(reactor.java_package(local), Some(format!("{root}.foo$co").as_str()));
    let local_bar = reactor.find("aug", &["foo", "bar"]).expect("local bar");
    assert_eq!(
        reactor.type_name(local_bar).map(JavaTypeName::canonical_name),
        Some(format!("{root}.foo$co.Bar"))
    );

    let module = reactor.find("aug", &[]).expect("aug module");
    let augment = reactor
        .generator(module)
        .children()
        .iter()
        .copied()
        .find(|c| reactor.generator(*c).kind() == GeneratorKind::ModuleAugment)
        .expect("module augment");
    assert_eq!(reactor.java_package(augment), Some(format!("{root}.foo").as_str()));
    let augment_bar = reactor.child_named(augment, "bar").expect("augmented bar");
    assert_eq!(
        reactor.type_name(augment_bar).map(JavaTypeName::canonical_name),
        Some(format!("{root}.foo.Bar"))
    );
}

#[test]
fn test_augments_sorted_by_target_depth() {
    let tree = parse(AUGMENTS);
    let reactor = executed(&tree);

    let module = reactor.find("aug", &[]).expect("aug module");
    let augments: Vec<_> = reactor.generator(module).children().to_vec();
    let names: Vec<_> = augments
        .iter()
        .filter_map(|a| reactor.type_name(*a))
        .map(|n| n.simple_name().to_string())
        .collect();
    assert_eq!(names, vec!["Foo1", "Foo2", "Bar1"]);

    let foo = reactor.find("m", &["foo"]).expect("foo container");
    let bar = reactor.find("m", &["foo", "bar"]).expect("bar container");
    assert_eq!(reactor.augments(foo), &augments[..2]);
    assert_eq!(reactor.augments(bar), &augments[2..]);
    assert_eq!(
        reactor.java_package(augments[0]),
        Some("org.opendaylight.yang.gen.v1.urn.aug.norev.foo")
    );

    let copy = reactor.find("m", &["foo", "shallow"]).expect("augmented copy");
    let shallow = reactor.generator(augments[0]).children().first().copied();
    assert_eq!(reactor.original(copy), shallow);
}

#[test]
fn test_nested_augment_targets_node_from_shallower_augment() {
    let xml = r#"<schema>
  <module name="m" namespace="urn:m" prefix="m">
    <container name="foo"/>
  </module>
  <module name="aug" namespace="urn:aug" prefix="a">
    <import module="m" prefix="m"/>
    <augment target="/m:foo/a:bar">
      <leaf name="deep"><type name="string"/></leaf>
    </augment>
    <augment target="/m:foo">
      <container name="bar"/>
    </augment>
  </module>
</schema>"#;
    let tree = parse(xml);
    let reactor = executed(&tree);

    let module = reactor.find("aug", &[]).expect("aug module");
    let augments = reactor.generator(module).children().to_vec();
    assert_eq!(augments.len(), 2);
    let (shallow, deep) = (augments[0], augments[1]);
    let bar = reactor.child_named(shallow, "bar").expect("augmented container");
    assert_eq!(reactor.augment_target(deep), Some(bar));
    assert_eq!(reactor.augments(bar), &[deep]);

    let foo = reactor.find("m", &["foo"]).expect("foo container");
    let bar_type = reactor.generated_type(bar).expect("bar type");
    let foo_name = reactor.type_name(foo).expect("foo name");
    assert!(bar_type.implements.contains(&binding::child_of(foo_name)));
    assert_eq!(
        bar_type.name.canonical_name(),
        "org.opendaylight.yang.gen.v1.urn.aug.norev.foo.Bar"
    );
}

#[test]
fn test_original_linkage_is_idempotent() {
    let tree = parse(CROSS_MODULE_USES);
    let mut reactor = executed(&tree);
    let copy = reactor.find("b", &["top", "c", "x"]).expect("copied leaf");
    let before = reactor.original(copy);
    assert!(before.is_some());
    assert!(reactor.link_original(copy));
    assert!(reactor.link_original(copy));
    assert_eq!(reactor.original(copy), before);
    assert_eq!(before, reactor.find("a", &["g", "c", "x"]));
}

#[test]
fn test_typedef_cascade_ignores_declaration_order() {
    let tree = parse(TYPEDEFS);
    let reactor = executed(&tree);

    let second = reactor.find("types", &["second"]).expect("second typedef");
    let value = reactor.find("types", &["data", "value"]).expect("value leaf");
    assert_eq!(reactor.resolved_base_type(second), Some(BuiltinType::Int32));
    assert_eq!(reactor.resolved_base_type(value), Some(BuiltinType::Int32));

    let second_type = reactor.generated_type(second).expect("second type");
    let first = reactor.find("types", &["first"]).expect("first typedef");
    let first_name = reactor.type_name(first).expect("first name");
    assert_eq!(second_type.extends, Some(Type::named(first_name.clone())));

    let data = reactor.find("types", &["data"]).expect("data container");
    let data_type = reactor.generated_type(data).expect("data type");
    assert_eq!(
        data_type.method("getValue").and_then(|m| m.return_type.clone()),
        Some(Type::named(reactor.type_name(second).expect("second name").clone()))
    );
}

#[test]
fn test_typedef_cascade_with_base_declared_first() {
    let xml = r#"<schema>
  <module name="types" namespace="urn:types" prefix="t">
    <typedef name="first"><type name="int32"/></typedef>
    <typedef name="second"><type name="first"/></typedef>
    <container name="data">
      <leaf name="value"><type name="second"/></leaf>
    </container>
  </module>
</schema>"#;
    let tree = parse(xml);
    let reactor = executed(&tree);

    let second = reactor.find("types", &["second"]).expect("second typedef");
    let value = reactor.find("types", &["data", "value"]).expect("value leaf");
    assert_eq!(reactor.resolved_base_type(second), Some(BuiltinType::Int32));
    assert_eq!(reactor.resolved_base_type(value), Some(BuiltinType::Int32));

    let first = reactor.find("types", &["first"]).expect("first typedef");
    let first_name = reactor.type_name(first).expect("first name");
    let second_type = reactor.generated_type(second).expect("second type");
    assert_eq!(second_type.extends, Some(Type::named(first_name.clone())));
}

#[test]
fn test_leafrefs_follow_their_target() {
    let tree = parse(TYPEDEFS);
    let reactor = executed(&tree);

    let id = reactor.find("types", &["data", "id"]).expect("id leaf");
    let id_ref = reactor.find("types", &["id-ref"]).expect("id-ref typedef");
    assert_eq!(reactor.generator(id_ref).placement(), Some(ClassPlacement::None));
    assert!(reactor.generated_type(id_ref).is_none());

    for path in [["data", "ref"], ["data", "local-ref"]] {
        let leaf = reactor.find("types", &path).expect("leafref leaf");
        assert_eq!(
            reactor.type_reference(leaf),
            Some(&TypeReference::Leafref(Some(id)))
        );
    }

    let data = reactor.find("types", &["data"]).expect("data container");
    let data_type = reactor.generated_type(data).expect("data type");
    assert_eq!(
        data_type.method("getRef").and_then(|m| m.return_type.clone()),
        BuiltinType::Uint32.java_type()
    );
}

#[test]
fn test_grouping_leafref_is_lenient() {
    init_tracing();
    let xml = r#"<schema>
  <module name="m" namespace="urn:m" prefix="m">
    <grouping name="g">
      <leaf name="r"><type name="leafref"><path value="../missing"/></type></leaf>
    </grouping>
  </module>
</schema>"#;
    let tree = parse(xml);
    let reactor = executed(&tree);
    let leaf = reactor.find("m", &["g", "r"]).expect("grouping leaf");
    assert_eq!(reactor.type_reference(leaf), Some(&TypeReference::Leafref(None)));

    let strict = ReactorConfig::builder().strict_leafrefs(true).build();
    let mut reactor = GeneratorReactor::with_config(&tree, strict);
    let err = reactor.execute(&mut CodegenTypeBuilderFactory).unwrap_err();
    assert!(matches!(err, ReactorError::LeafrefTargetNotFound { .. }));
}

#[test]
fn test_instantiated_leafref_must_resolve() {
    let xml = r#"<schema>
  <module name="m" namespace="urn:m" prefix="m">
    <container name="c">
      <leaf name="r"><type name="leafref"><path value="../missing"/></type></leaf>
    </container>
  </module>
</schema>"#;
    let tree = parse(xml);
    let mut reactor = GeneratorReactor::new(&tree);
    let err = reactor.execute(&mut CodegenTypeBuilderFactory).unwrap_err();
    assert!(matches!(err, ReactorError::LeafrefTargetNotFound { .. }));
}

#[test]
fn test_factory_called_once_per_type() {
    let tree = parse(DEMO);
    let mut reactor = GeneratorReactor::new(&tree);
    let mut factory = CountingFactory::default();
    reactor.execute(&mut factory).expect("Failed to execute reactor");

    assert!(factory.calls.values().all(|count| *count == 1));
    let built = (0..reactor.len())
        .filter(|i| reactor.generated_type(GeneratorId(*i)).is_some())
        .count();
    assert_eq!(factory.calls.len(), built);

    let calls = factory.calls.clone();
    let modules = reactor.execute(&mut factory).expect("Failed to re-execute").len();
    assert_eq!(modules, 1);
    assert_eq!(factory.calls, calls);

    let container = reactor
        .find("yang-data-demo", &["grp-for-container"])
        .expect("container generator");
    reactor
        .ensure_type(container, &mut factory)
        .expect("Failed to ensure type");
    assert_eq!(factory.calls, calls);
}

#[test]
fn test_failed_execution_is_not_resumable() {
    let xml = r#"<schema>
  <module name="m" namespace="urn:m" prefix="m">
    <container name="c"><uses grouping="missing"/></container>
  </module>
</schema>"#;
    let tree = parse(xml);
    let mut reactor = GeneratorReactor::new(&tree);
    let err = reactor.execute(&mut CodegenTypeBuilderFactory).unwrap_err();
    assert!(matches!(err, ReactorError::GroupingNotFound { .. }));
    assert_eq!(reactor.state(), ReactorState::Executing);

    let err = reactor.execute(&mut CodegenTypeBuilderFactory).unwrap_err();
    assert!(matches!(err, ReactorError::PartialExecution));
}

#[test]
fn test_typedef_cycle_is_fatal() {
    let xml = r#"<schema>
  <module name="m" namespace="urn:m" prefix="m">
    <typedef name="a"><type name="b"/></typedef>
    <typedef name="b"><type name="a"/></typedef>
  </module>
</schema>"#;
    let tree = parse(xml);
    let mut reactor = GeneratorReactor::new(&tree);
    let err = reactor.execute(&mut CodegenTypeBuilderFactory).unwrap_err();
    assert!(matches!(err, ReactorError::UnresolvedTypes { .. }));
}

#[test]
fn test_ensure_type_requires_execution() {
    let tree = parse(DEMO);
    let reactor = GeneratorReactor::new(&tree);
    let module = reactor.find("yang-data-demo", &[]).expect("module generator");
    let err = reactor
        .ensure_type(module, &mut CodegenTypeBuilderFactory)
        .unwrap_err();
    assert!(matches!(err, ReactorError::NotExecuted));
    assert!(reactor.runtime_type(module).is_none());
}

#[test]
fn test_operations_and_services() {
    let xml = r#"<schema>
  <module name="ops" namespace="urn:ops" prefix="o">
    <rpc name="reset-all">
      <input><leaf name="force"><type name="boolean"/></leaf></input>
      <output><leaf name="count"><type name="uint32"/></leaf></output>
    </rpc>
    <notification name="link-down">
      <leaf name="port"><type name="string"/></leaf>
    </notification>
    <grouping name="g">
      <action name="restart"/>
    </grouping>
  </module>
</schema>"#;
    let tree = parse(xml);
    let config = ReactorConfig::builder().compat_services(true).build();
    let mut reactor = GeneratorReactor::with_config(&tree, config);
    reactor
        .execute(&mut CodegenTypeBuilderFactory)
        .expect("Failed to execute reactor");

    let root = "org.opendaylight.yang.gen.v1.urn.ops.norev";
    let input = reactor.find("ops", &["reset-all", "input"]).expect("rpc input");
    assert_eq!(
        reactor.type_name(input).map(JavaTypeName::canonical_name),
        Some(format!("{root}.ResetAllInput"))
    );
    assert_eq!(
        reactor.java_package(input),
        Some(format!("{root}.reset.all.input").as_str())
    );
    assert!(reactor
        .generated_type(input)
        .expect("input type")
        .implements_raw("RpcInput"));

    let rpc = reactor.find("ops", &["reset-all"]).expect("rpc");
    assert!(reactor.generated_type(rpc).expect("rpc type").implements_raw("Rpc"));

    let module = reactor.find("ops", &[]).expect("module generator");
    let services: Vec<_> = reactor
        .generator(module)
        .children()
        .iter()
        .copied()
        .filter(|c| {
            matches!(
                reactor.generator(*c).kind(),
                GeneratorKind::RpcService | GeneratorKind::NotificationService
            )
        })
        .collect();
    assert_eq!(services.len(), 2);
    let service = reactor.generated_type(services[0]).expect("service type");
    assert_eq!(service.name.simple_name(), "OpsService");
    assert!(service.is_deprecated());
    assert!(service.method("resetAll").is_some());
    let listener = reactor.generated_type(services[1]).expect("listener type");
    assert_eq!(listener.name.simple_name(), "OpsListener");
    assert!(listener.method("onLinkDown").is_some());

    let action = reactor.find("ops", &["g", "restart"]).expect("grouping action");
    assert_eq!(reactor.generator(action).placement(), Some(ClassPlacement::Phantom));
    assert!(reactor.type_name(action).is_some());
    assert!(reactor.generated_type(action).is_none());
}

#[test]
fn test_runtime_views() {
    let tree = parse(CROSS_MODULE_USES);
    let reactor = executed(&tree);

    let module = reactor.find("b", &[]).expect("module generator");
    let view = reactor.runtime_type(module).expect("module view");
    assert_eq!(view.kind, RuntimeTypeKind::Module);
    let top = view.child("top").expect("top view");
    let copy = top.child("c").expect("copied container view");

    let template = reactor.find("a", &["g", "c"]).expect("grouping container");
    assert_eq!(copy.java_type_name(), reactor.type_name(template));
    assert_eq!(copy.augments.len(), 1);

    let grouping = reactor.find("a", &["g"]).expect("grouping");
    let grouping_view = reactor.runtime_type(grouping).expect("grouping view");
    let top_name = reactor
        .find("b", &["top"])
        .and_then(|t| reactor.type_name(t))
        .cloned()
        .expect("top name");
    assert_eq!(grouping_view.instantiations, vec![top_name]);
}
