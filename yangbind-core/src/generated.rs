//! Generated-type descriptors and the builders which produce them.
//!
//! The binding generator never writes source code itself. It describes each
//! class through a [`GeneratedTypeBuilder`] obtained from a
//! [`TypeBuilderFactory`], and hands the finished [`GeneratedType`] to
//! whatever backend renders or inspects it.

use crate::error::{Error, Result};
use crate::types::{JavaTypeName, Type};

/// Shape of a generated class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratedTypeKind {
    /// A Java interface.
    Interface,
    /// A transfer object class holding properties.
    TransferObject,
    /// A Java enum.
    Enumeration,
}

/// How a getter treats absent values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueMechanics {
    /// Returns `null` for absent values.
    #[default]
    Normal,
    /// Returns an empty value instead of `null`.
    NonNull,
}

/// Annotation attached to a type or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Annotation type.
    pub name: JavaTypeName,
    /// Named parameters with their literal values.
    pub parameters: Vec<(String, String)>,
}

impl Annotation {
    /// Creates an annotation without parameters.
    #[must_use]
    pub fn new(name: JavaTypeName) -> Self {
        Self {
            name,
            parameters: Vec::new(),
        }
    }

    /// Adds a named parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }
}

/// Method declared on a generated type.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    /// Method name.
    pub name: String,
    /// Return type, `None` for `void`.
    pub return_type: Option<Type>,
    /// Parameters as name and type.
    pub parameters: Vec<(String, Type)>,
    /// True for interface default methods.
    pub is_default: bool,
    /// True for static methods.
    pub is_static: bool,
    /// Null-handling of the returned value.
    pub mechanics: ValueMechanics,
    /// Method annotations.
    pub annotations: Vec<Annotation>,
    /// Documentation comment.
    pub comment: Option<String>,
}

impl MethodSignature {
    fn new(name: String) -> Self {
        Self {
            name,
            return_type: None,
            parameters: Vec::new(),
            is_default: false,
            is_static: false,
            mechanics: ValueMechanics::Normal,
            annotations: Vec::new(),
            comment: None,
        }
    }

    /// Sets the return type.
    pub fn set_return_type(&mut self, return_type: Type) -> &mut Self {
        self.return_type = Some(return_type);
        self
    }

    /// Appends a parameter.
    pub fn add_parameter(&mut self, name: impl Into<String>, ty: Type) -> &mut Self {
        self.parameters.push((name.into(), ty));
        self
    }

    /// Marks the method as an interface default method.
    pub fn set_default(&mut self, is_default: bool) -> &mut Self {
        self.is_default = is_default;
        self
    }

    /// Marks the method as static.
    pub fn set_static(&mut self, is_static: bool) -> &mut Self {
        self.is_static = is_static;
        self
    }

    /// Sets the value mechanics.
    pub fn set_mechanics(&mut self, mechanics: ValueMechanics) -> &mut Self {
        self.mechanics = mechanics;
        self
    }

    /// Adds an annotation.
    pub fn add_annotation(&mut self, annotation: Annotation) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    /// Sets the documentation comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Property of a transfer object.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Property type.
    pub return_type: Type,
    /// True if the property has no setter.
    pub read_only: bool,
}

/// Constant declared on a generated type.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    /// Constant name.
    pub name: String,
    /// Constant type.
    pub ty: Type,
    /// Literal value.
    pub value: String,
}

/// Value of a generated enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// YANG name of the value.
    pub name: String,
    /// Java constant name.
    pub mapped_name: String,
    /// Ordinal value.
    pub value: i64,
}

/// Finished description of one generated class.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedType {
    /// Fully-qualified name.
    pub name: JavaTypeName,
    /// Class shape.
    pub kind: GeneratedTypeKind,
    /// Superclass of transfer objects.
    pub extends: Option<Type>,
    /// Implemented (or extended, for interfaces) types.
    pub implements: Vec<Type>,
    /// Declared methods.
    pub methods: Vec<MethodSignature>,
    /// Transfer object properties.
    pub properties: Vec<Property>,
    /// Declared constants.
    pub constants: Vec<Constant>,
    /// Enumeration values.
    pub enum_values: Vec<EnumValue>,
    /// Nested types.
    pub enclosed: Vec<GeneratedType>,
    /// Type annotations.
    pub annotations: Vec<Annotation>,
    /// Documentation comment.
    pub comment: Option<String>,
}

impl GeneratedType {
    /// Returns the method with the given name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Returns true if this type implements or extends `raw`.
    #[must_use]
    pub fn implements_raw(&self, raw: &str) -> bool {
        self.implements
            .iter()
            .filter_map(Type::raw_name)
            .any(|name| name.simple_name() == raw)
    }

    /// Returns true if this type carries a `@Deprecated` annotation.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| a.name.simple_name() == "Deprecated")
    }
}

/// Mutable builder for a [`GeneratedType`].
#[derive(Debug, Clone)]
pub struct GeneratedTypeBuilder {
    ty: GeneratedType,
    retain_comments: bool,
}

impl GeneratedTypeBuilder {
    /// Creates a builder for a type of the given shape.
    #[must_use]
    pub fn new(kind: GeneratedTypeKind, name: JavaTypeName) -> Self {
        Self {
            ty: GeneratedType {
                name,
                kind,
                extends: None,
                implements: Vec::new(),
                methods: Vec::new(),
                properties: Vec::new(),
                constants: Vec::new(),
                enum_values: Vec::new(),
                enclosed: Vec::new(),
                annotations: Vec::new(),
                comment: None,
            },
            retain_comments: true,
        }
    }

    /// Controls whether comments are kept in the built type.
    #[must_use]
    pub fn retain_comments(mut self, retain: bool) -> Self {
        self.retain_comments = retain;
        self
    }

    /// Returns the name of the type being built.
    #[must_use]
    pub fn name(&self) -> &JavaTypeName {
        &self.ty.name
    }

    /// Adds an implemented type, ignoring duplicates.
    pub fn add_implements_type(&mut self, ty: Type) -> &mut Self {
        if !self.ty.implements.contains(&ty) {
            self.ty.implements.push(ty);
        }
        self
    }

    /// Sets the superclass.
    pub fn set_extends(&mut self, ty: Type) -> &mut Self {
        self.ty.extends = Some(ty);
        self
    }

    /// Starts a new method and returns it for configuration.
    pub fn add_method(&mut self, name: impl Into<String>) -> &mut MethodSignature {
        self.ty.methods.push(MethodSignature::new(name.into()));
        let last = self.ty.methods.len() - 1;
        &mut self.ty.methods[last]
    }

    /// Adds a property.
    pub fn add_property(&mut self, name: impl Into<String>, ty: Type) -> &mut Self {
        self.ty.properties.push(Property {
            name: name.into(),
            return_type: ty,
            read_only: true,
        });
        self
    }

    /// Adds a constant.
    pub fn add_constant(
        &mut self,
        name: impl Into<String>,
        ty: Type,
        value: impl Into<String>,
    ) -> &mut Self {
        self.ty.constants.push(Constant {
            name: name.into(),
            ty,
            value: value.into(),
        });
        self
    }

    /// Adds an enumeration value.
    pub fn add_enum_value(&mut self, name: impl Into<String>, value: i64) -> &mut Self {
        let name = name.into();
        let mapped_name = crate::naming::class_name(&name);
        self.ty.enum_values.push(EnumValue {
            name,
            mapped_name,
            value,
        });
        self
    }

    /// Adds a nested type.
    pub fn add_enclosed(&mut self, ty: GeneratedType) -> &mut Self {
        self.ty.enclosed.push(ty);
        self
    }

    /// Adds a type annotation.
    pub fn add_annotation(&mut self, annotation: Annotation) -> &mut Self {
        self.ty.annotations.push(annotation);
        self
    }

    /// Sets the documentation comment.
    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.ty.comment = Some(comment.into());
        self
    }

    /// Finishes the type.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateMethod`] if two methods share a name and
    /// parameter list.
    pub fn build(mut self) -> Result<GeneratedType> {
        for (i, method) in self.ty.methods.iter().enumerate() {
            let duplicate = self.ty.methods[..i]
                .iter()
                .any(|m| m.name == method.name && m.parameters == method.parameters);
            if duplicate {
                return Err(Error::DuplicateMethod {
                    type_name: self.ty.name.canonical_name(),
                    method: method.name.clone(),
                });
            }
        }

        if !self.retain_comments {
            self.ty.comment = None;
            for method in &mut self.ty.methods {
                method.comment = None;
            }
        }
        Ok(self.ty)
    }
}

/// Source of type builders.
///
/// The reactor asks the factory for a builder exactly once per generator.
pub trait TypeBuilderFactory {
    /// Returns a fresh builder for a type with the given shape and name.
    fn new_type_builder(&mut self, kind: GeneratedTypeKind, name: JavaTypeName)
    -> GeneratedTypeBuilder;
}

/// Factory for types which are rendered to source code.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodegenTypeBuilderFactory;

impl TypeBuilderFactory for CodegenTypeBuilderFactory {
    fn new_type_builder(
        &mut self,
        kind: GeneratedTypeKind,
        name: JavaTypeName,
    ) -> GeneratedTypeBuilder {
        GeneratedTypeBuilder::new(kind, name)
    }
}

/// Factory for types used only as runtime descriptors.
///
/// Comments are dropped since nothing renders them.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuntimeTypeBuilderFactory;

impl TypeBuilderFactory for RuntimeTypeBuilderFactory {
    fn new_type_builder(
        &mut self,
        kind: GeneratedTypeKind,
        name: JavaTypeName,
    ) -> GeneratedTypeBuilder {
        GeneratedTypeBuilder::new(kind, name).retain_comments(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::binding;

    fn name() -> JavaTypeName {
        JavaTypeName::new("org.example", "Foo")
    }

    #[test]
    fn test_builder_collects_members() {
        let mut builder = GeneratedTypeBuilder::new(GeneratedTypeKind::Interface, name());
        builder.add_implements_type(binding::data_object());
        builder.add_implements_type(binding::data_object());
        builder
            .add_method("getBar")
            .set_return_type(binding::object())
            .set_comment("bar");
        builder.add_annotation(Annotation::new(binding::deprecated()));

        let ty = builder.build().expect("Failed to build type");
        assert_eq!(ty.implements.len(), 1);
        assert!(ty.implements_raw("DataObject"));
        assert_eq!(
            ty.method("getBar").and_then(|m| m.comment.as_deref()),
            Some("bar")
        );
        assert!(ty.is_deprecated());
    }

    #[test]
    fn test_builder_rejects_duplicate_methods() {
        let mut builder = GeneratedTypeBuilder::new(GeneratedTypeKind::Interface, name());
        builder.add_method("getBar");
        builder.add_method("getBar");

        let err = builder.build().unwrap_err();
        assert!(matches!(err, Error::DuplicateMethod { .. }));
    }

    #[test]
    fn test_runtime_factory_drops_comments() {
        let mut factory = RuntimeTypeBuilderFactory;
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Interface, name());
        builder.set_comment("doc");
        builder.add_method("getBar").set_comment("bar");

        let ty = builder.build().expect("Failed to build type");
        assert!(ty.comment.is_none());
        assert!(ty.methods[0].comment.is_none());
    }

    #[test]
    fn test_enum_values_are_mapped() {
        let mut factory = CodegenTypeBuilderFactory;
        let mut builder = factory.new_type_builder(GeneratedTypeKind::Enumeration, name());
        builder.add_enum_value("link-up", 0).add_enum_value("link-down", 1);

        let ty = builder.build().expect("Failed to build type");
        assert_eq!(ty.enum_values[1].mapped_name, "LinkDown");
        assert_eq!(ty.enum_values[1].value, 1);
    }
}
