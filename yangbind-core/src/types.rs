//! Built-in YANG types and Java type references.
//!
//! This module maps RFC 6020 built-in types onto their Java binding types and
//! provides the type reference vocabulary used by generated-type descriptors.

use std::fmt;

/// Package holding the YANG common value classes (`Uint8`, `Empty`, ...).
pub const YANG_COMMON_PACKAGE: &str = "org.opendaylight.yangtools.yang.common";

/// Package holding the binding contract interfaces.
pub const BINDING_PACKAGE: &str = "org.opendaylight.yangtools.yang.binding";

/// RFC 6020 built-in type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinType {
    /// Arbitrary binary data.
    Binary,
    /// Set of named bits.
    Bits,
    /// Boolean value.
    Boolean,
    /// Fixed-point decimal.
    Decimal64,
    /// Leaf without a value.
    Empty,
    /// Enumerated string values.
    Enumeration,
    /// Reference to an identity.
    Identityref,
    /// Instance identifier.
    InstanceIdentifier,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Reference to another leaf.
    Leafref,
    /// Character string.
    String,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// Choice of member types.
    Union,
}

impl BuiltinType {
    /// All built-in types, in RFC order.
    pub const ALL: [Self; 19] = [
        Self::Binary,
        Self::Bits,
        Self::Boolean,
        Self::Decimal64,
        Self::Empty,
        Self::Enumeration,
        Self::Identityref,
        Self::InstanceIdentifier,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Leafref,
        Self::String,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Union,
    ];

    /// Parses a YANG built-in type name.
    #[must_use]
    pub fn from_yang_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.yang_name() == name)
    }

    /// Returns the YANG keyword of this type.
    #[must_use]
    pub const fn yang_name(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Bits => "bits",
            Self::Boolean => "boolean",
            Self::Decimal64 => "decimal64",
            Self::Empty => "empty",
            Self::Enumeration => "enumeration",
            Self::Identityref => "identityref",
            Self::InstanceIdentifier => "instance-identifier",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Leafref => "leafref",
            Self::String => "string",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Union => "union",
        }
    }

    /// Returns true if values of this type need a generated class.
    ///
    /// Enumerations, bits and unions cannot be expressed by a library type and
    /// produce their own enclosed or top-level class.
    #[must_use]
    pub const fn needs_generated_class(&self) -> bool {
        matches!(self, Self::Enumeration | Self::Bits | Self::Union)
    }

    /// Returns true if this type refers to another schema construct.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Leafref | Self::Identityref)
    }

    /// Returns the Java type used for values of this built-in type.
    ///
    /// Returns `None` for types whose Java representation depends on the
    /// schema (`enumeration`, `bits`, `union`, `leafref`, `identityref`).
    #[must_use]
    pub fn java_type(&self) -> Option<Type> {
        let ty = match self {
            Self::Binary => Type::Array(Box::new(Type::Primitive("byte"))),
            Self::Boolean => Type::named(JavaTypeName::new("java.lang", "Boolean")),
            Self::Decimal64 => Type::named(JavaTypeName::new(YANG_COMMON_PACKAGE, "Decimal64")),
            Self::Empty => Type::named(JavaTypeName::new(YANG_COMMON_PACKAGE, "Empty")),
            Self::InstanceIdentifier => {
                Type::named(JavaTypeName::new(BINDING_PACKAGE, "InstanceIdentifier"))
            }
            Self::Int8 => Type::named(JavaTypeName::new("java.lang", "Byte")),
            Self::Int16 => Type::named(JavaTypeName::new("java.lang", "Short")),
            Self::Int32 => Type::named(JavaTypeName::new("java.lang", "Integer")),
            Self::Int64 => Type::named(JavaTypeName::new("java.lang", "Long")),
            Self::String => Type::named(JavaTypeName::new("java.lang", "String")),
            Self::Uint8 => Type::named(JavaTypeName::new(YANG_COMMON_PACKAGE, "Uint8")),
            Self::Uint16 => Type::named(JavaTypeName::new(YANG_COMMON_PACKAGE, "Uint16")),
            Self::Uint32 => Type::named(JavaTypeName::new(YANG_COMMON_PACKAGE, "Uint32")),
            Self::Uint64 => Type::named(JavaTypeName::new(YANG_COMMON_PACKAGE, "Uint64")),
            Self::Bits | Self::Enumeration | Self::Identityref | Self::Leafref | Self::Union => {
                return None;
            }
        };
        Some(ty)
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.yang_name())
    }
}

/// Fully-qualified Java type name, possibly nested inside other classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JavaTypeName {
    package: String,
    simple_names: Vec<String>,
}

impl JavaTypeName {
    /// Creates a top-level type name.
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            simple_names: vec![simple_name.into()],
        }
    }

    /// Creates a type name nested inside this one.
    #[must_use]
    pub fn create_enclosed(&self, simple_name: impl Into<String>) -> Self {
        let mut simple_names = self.simple_names.clone();
        simple_names.push(simple_name.into());
        Self {
            package: self.package.clone(),
            simple_names,
        }
    }

    /// Creates a sibling type name in the same package.
    #[must_use]
    pub fn create_sibling(&self, simple_name: impl Into<String>) -> Self {
        Self::new(self.package.clone(), simple_name)
    }

    /// Returns the package name.
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package
    }

    /// Returns the innermost simple name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.simple_names.last().map_or("", String::as_str)
    }

    /// Returns the enclosing type name, if this is a nested type.
    #[must_use]
    pub fn enclosing(&self) -> Option<Self> {
        (self.simple_names.len() > 1).then(|| Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..self.simple_names.len() - 1].to_vec(),
        })
    }

    /// Returns true if this name is nested inside another class.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.simple_names.len() > 1
    }

    /// Returns the canonical name, e.g. `org.example.Outer.Inner`.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        let nested = self.simple_names.join(".");
        if self.package.is_empty() {
            nested
        } else {
            format!("{}.{}", self.package, nested)
        }
    }
}

impl fmt::Display for JavaTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

/// Reference to a Java type, as used in method signatures and properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Plain reference to a named class or interface.
    Named(JavaTypeName),
    /// Generic type with arguments, e.g. `ChildOf<Foo>`.
    Parameterized {
        /// Raw type.
        raw: JavaTypeName,
        /// Type arguments.
        arguments: Vec<Type>,
    },
    /// Upper-bounded wildcard, `? extends T`.
    WildcardExtends(Box<Type>),
    /// Java primitive, e.g. `int`.
    Primitive(&'static str),
    /// Array of a component type.
    Array(Box<Type>),
}

impl Type {
    /// Creates a plain named type reference.
    #[must_use]
    pub fn named(name: JavaTypeName) -> Self {
        Self::Named(name)
    }

    /// Creates a parameterized type reference.
    #[must_use]
    pub fn parameterized(raw: JavaTypeName, arguments: Vec<Type>) -> Self {
        Self::Parameterized { raw, arguments }
    }

    /// Returns the raw type name, if this reference names a class.
    #[must_use]
    pub fn raw_name(&self) -> Option<&JavaTypeName> {
        match self {
            Self::Named(name) | Self::Parameterized { raw: name, .. } => Some(name),
            Self::WildcardExtends(inner) | Self::Array(inner) => inner.raw_name(),
            Self::Primitive(_) => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Parameterized { raw, arguments } => {
                write!(f, "{raw}<")?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::WildcardExtends(inner) => write!(f, "? extends {inner}"),
            Self::Primitive(name) => f.write_str(name),
            Self::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}

/// Well-known binding contract types.
pub mod binding {
    use super::{BINDING_PACKAGE, JavaTypeName, Type};

    fn binding(name: &str) -> JavaTypeName {
        JavaTypeName::new(BINDING_PACKAGE, name)
    }

    fn generic(name: &str, arguments: Vec<Type>) -> Type {
        Type::parameterized(binding(name), arguments)
    }

    /// `DataObject`.
    #[must_use]
    pub fn data_object() -> Type {
        Type::named(binding("DataObject"))
    }

    /// `DataRoot`.
    #[must_use]
    pub fn data_root() -> Type {
        Type::named(binding("DataRoot"))
    }

    /// `ChildOf<parent>`.
    #[must_use]
    pub fn child_of(parent: &JavaTypeName) -> Type {
        generic("ChildOf", vec![Type::named(parent.clone())])
    }

    /// `ChoiceIn<parent>`.
    #[must_use]
    pub fn choice_in(parent: &JavaTypeName) -> Type {
        generic("ChoiceIn", vec![Type::named(parent.clone())])
    }

    /// `Augmentable<owner>`.
    #[must_use]
    pub fn augmentable(owner: &JavaTypeName) -> Type {
        generic("Augmentable", vec![Type::named(owner.clone())])
    }

    /// `Augmentation<target>`.
    #[must_use]
    pub fn augmentation(target: &JavaTypeName) -> Type {
        generic("Augmentation", vec![Type::named(target.clone())])
    }

    /// `Identifiable<key>`.
    #[must_use]
    pub fn identifiable(key: &JavaTypeName) -> Type {
        generic("Identifiable", vec![Type::named(key.clone())])
    }

    /// `Key<list>`.
    #[must_use]
    pub fn key(list: &JavaTypeName) -> Type {
        generic("Key", vec![Type::named(list.clone())])
    }

    /// `BaseIdentity`.
    #[must_use]
    pub fn base_identity() -> Type {
        Type::named(binding("BaseIdentity"))
    }

    /// `Notification<owner>`.
    #[must_use]
    pub fn notification(owner: &JavaTypeName) -> Type {
        generic("Notification", vec![Type::named(owner.clone())])
    }

    /// `OpaqueObject<owner>`.
    #[must_use]
    pub fn opaque_object(owner: &JavaTypeName) -> Type {
        generic("OpaqueObject", vec![Type::named(owner.clone())])
    }

    /// `RpcInput`.
    #[must_use]
    pub fn rpc_input() -> Type {
        Type::named(binding("RpcInput"))
    }

    /// `RpcOutput`.
    #[must_use]
    pub fn rpc_output() -> Type {
        Type::named(binding("RpcOutput"))
    }

    /// `Rpc<input, output>`.
    #[must_use]
    pub fn rpc(input: &JavaTypeName, output: &JavaTypeName) -> Type {
        generic(
            "Rpc",
            vec![Type::named(input.clone()), Type::named(output.clone())],
        )
    }

    /// `Action<InstanceIdentifier<parent>, input, output>`.
    #[must_use]
    pub fn action(parent: &JavaTypeName, input: &JavaTypeName, output: &JavaTypeName) -> Type {
        generic(
            "Action",
            vec![
                instance_identifier(parent),
                Type::named(input.clone()),
                Type::named(output.clone()),
            ],
        )
    }

    /// `InstanceIdentifier<target>`.
    #[must_use]
    pub fn instance_identifier(target: &JavaTypeName) -> Type {
        generic("InstanceIdentifier", vec![Type::named(target.clone())])
    }

    /// `RpcService`.
    #[must_use]
    pub fn rpc_service() -> Type {
        Type::named(binding("RpcService"))
    }

    /// `NotificationListener`.
    #[must_use]
    pub fn notification_listener() -> Type {
        Type::named(binding("NotificationListener"))
    }

    /// `ListenableFuture<RpcResult<output>>`.
    #[must_use]
    pub fn rpc_result_future(output: &JavaTypeName) -> Type {
        Type::parameterized(
            JavaTypeName::new("com.google.common.util.concurrent", "ListenableFuture"),
            vec![Type::parameterized(
                JavaTypeName::new(super::YANG_COMMON_PACKAGE, "RpcResult"),
                vec![Type::named(output.clone())],
            )],
        )
    }

    /// `Class<? extends target>`.
    #[must_use]
    pub fn class_of(target: Type) -> Type {
        Type::parameterized(
            JavaTypeName::new("java.lang", "Class"),
            vec![Type::WildcardExtends(Box::new(target))],
        )
    }

    /// `java.util.<collection><element>`.
    #[must_use]
    pub fn collection(collection: &str, arguments: Vec<Type>) -> Type {
        Type::parameterized(JavaTypeName::new("java.util", collection), arguments)
    }

    /// `java.lang.Object`.
    #[must_use]
    pub fn object() -> Type {
        Type::named(JavaTypeName::new("java.lang", "Object"))
    }

    /// `java.lang.Deprecated`.
    #[must_use]
    pub fn deprecated() -> JavaTypeName {
        JavaTypeName::new("java.lang", "Deprecated")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_from_yang_name() {
        assert_eq!(BuiltinType::from_yang_name("uint8"), Some(BuiltinType::Uint8));
        assert_eq!(
            BuiltinType::from_yang_name("instance-identifier"),
            Some(BuiltinType::InstanceIdentifier)
        );
        assert_eq!(BuiltinType::from_yang_name("my-type"), None);
    }

    #[test]
    fn test_builtin_java_type() {
        let ty = BuiltinType::Uint8.java_type().expect("uint8 maps to a class");
        assert_eq!(ty.to_string(), "org.opendaylight.yangtools.yang.common.Uint8");
        assert_eq!(
            BuiltinType::Binary.java_type().map(|t| t.to_string()),
            Some("byte[]".to_string())
        );
        assert!(BuiltinType::Enumeration.java_type().is_none());
        assert!(BuiltinType::Leafref.java_type().is_none());
    }

    #[test]
    fn test_builtin_flags() {
        assert!(BuiltinType::Union.needs_generated_class());
        assert!(!BuiltinType::String.needs_generated_class());
        assert!(BuiltinType::Identityref.is_reference());
        assert!(!BuiltinType::Bits.is_reference());
    }

    #[test]
    fn test_java_type_name_nesting() {
        let outer = JavaTypeName::new("org.example", "Outer");
        let inner = outer.create_enclosed("Inner");

        assert_eq!(inner.canonical_name(), "org.example.Outer.Inner");
        assert_eq!(inner.simple_name(), "Inner");
        assert!(inner.is_nested());
        assert_eq!(inner.enclosing(), Some(outer.clone()));
        assert_eq!(outer.enclosing(), None);
        assert_eq!(
            inner.create_sibling("Other").canonical_name(),
            "org.example.Other"
        );
    }

    #[test]
    fn test_type_display() {
        let foo = JavaTypeName::new("org.example", "Foo");
        assert_eq!(
            binding::child_of(&foo).to_string(),
            "org.opendaylight.yangtools.yang.binding.ChildOf<org.example.Foo>"
        );
        assert_eq!(
            binding::class_of(Type::named(foo.clone())).to_string(),
            "java.lang.Class<? extends org.example.Foo>"
        );
        assert_eq!(binding::child_of(&foo).raw_name().map(JavaTypeName::simple_name), Some("ChildOf"));
    }
}
