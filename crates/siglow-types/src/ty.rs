//! Core type definitions for value-type lowering

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in value types every target understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 8-bit unsigned integer
    Byte,
    /// IEEE 754 double precision float
    Float,
    /// IEEE 754 single precision float
    Single,
    /// Boolean
    Bool,
    /// UTF-16 code unit
    Char,
}

impl PrimitiveType {
    /// Every primitive, in declaration order
    pub const ALL: [PrimitiveType; 7] = [
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Byte,
        PrimitiveType::Float,
        PrimitiveType::Single,
        PrimitiveType::Bool,
        PrimitiveType::Char,
    ];

    /// Resolve a source-level spelling to a primitive
    pub fn from_source_name(name: &str) -> Option<Self> {
        match name {
            "Int" | "int" | "Int32" => Some(PrimitiveType::Int),
            "Long" | "long" | "Int64" => Some(PrimitiveType::Long),
            "Byte" | "byte" | "UInt8" => Some(PrimitiveType::Byte),
            "Float" | "double" | "Double" => Some(PrimitiveType::Float),
            "Single" | "float" => Some(PrimitiveType::Single),
            "Bool" | "bool" | "Boolean" => Some(PrimitiveType::Bool),
            "Char" | "char" => Some(PrimitiveType::Char),
            _ => None,
        }
    }

    /// Spelling in target signatures
    pub fn target_name(self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Float => "double",
            PrimitiveType::Single => "float",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Char => "char",
        }
    }

    /// Whether numeric literals may be stored in this type
    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Bool | PrimitiveType::Char)
    }

    /// Whether this is a floating point type
    pub fn is_floating(self) -> bool {
        matches!(self, PrimitiveType::Float | PrimitiveType::Single)
    }

    /// Inclusive range of integer literals the type can hold
    pub fn integer_range(self) -> Option<(i64, i64)> {
        match self {
            PrimitiveType::Int => Some((i32::MIN as i64, i32::MAX as i64)),
            PrimitiveType::Long => Some((i64::MIN, i64::MAX)),
            PrimitiveType::Byte => Some((0, u8::MAX as i64)),
            PrimitiveType::Float | PrimitiveType::Single => Some((i64::MIN, i64::MAX)),
            PrimitiveType::Bool | PrimitiveType::Char => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target_name())
    }
}

/// A value type as it appears in target signatures
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum TargetValueType {
    /// Built-in primitive
    Primitive(PrimitiveType),
    /// User-declared struct or enum registered as a value type
    User(String),
}

impl TargetValueType {
    /// Spelling in target signatures
    pub fn name(&self) -> &str {
        match self {
            TargetValueType::Primitive(p) => p.target_name(),
            TargetValueType::User(name) => name,
        }
    }

    /// The primitive, if this is one
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            TargetValueType::Primitive(p) => Some(*p),
            TargetValueType::User(_) => None,
        }
    }
}

impl fmt::Display for TargetValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a source declaration, as handed over by the front end
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum DeclaredType {
    /// Value type: primitive, struct or enum
    Value(String),
    /// Reference type; passes through lowering untouched
    Reference(String),
}

impl DeclaredType {
    /// Declared type name
    pub fn name(&self) -> &str {
        match self {
            DeclaredType::Value(name) | DeclaredType::Reference(name) => name,
        }
    }

    /// Whether this is a reference type
    pub fn is_reference(&self) -> bool {
        matches!(self, DeclaredType::Reference(_))
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a wrapped nullable value type is spelled in the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullableStyle {
    /// `int?`
    #[default]
    Suffix,
    /// `Nullable<int>`
    Generic,
}

/// Representation chosen for one value-typed declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "repr", content = "ty", rename_all = "snake_case")]
pub enum TargetTypeDecision {
    /// The bare value type; absence is impossible at the storage level
    Bare(TargetValueType),
    /// The value type inside an explicit "may be absent" wrapper
    WrappedNullable(TargetValueType),
}

impl TargetTypeDecision {
    /// The underlying value type
    pub fn value_type(&self) -> &TargetValueType {
        match self {
            TargetTypeDecision::Bare(ty) | TargetTypeDecision::WrappedNullable(ty) => ty,
        }
    }

    /// Whether the declaration is wrapped
    pub fn is_wrapped(&self) -> bool {
        matches!(self, TargetTypeDecision::WrappedNullable(_))
    }

    /// Spell the decision in target syntax
    pub fn render(&self, style: NullableStyle) -> String {
        match (self, style) {
            (TargetTypeDecision::Bare(ty), _) => ty.name().to_string(),
            (TargetTypeDecision::WrappedNullable(ty), NullableStyle::Suffix) => {
                format!("{}?", ty.name())
            }
            (TargetTypeDecision::WrappedNullable(ty), NullableStyle::Generic) => {
                format!("Nullable<{}>", ty.name())
            }
        }
    }
}

impl fmt::Display for TargetTypeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(NullableStyle::Suffix))
    }
}

/// Set of value-type names the mapper recognizes
///
/// Primitive spellings are always recognized; user structs and enums must be
/// registered explicitly.
#[derive(Debug, Clone, Default)]
pub struct ValueTypeRegistry {
    user: FxHashSet<String>,
}

impl ValueTypeRegistry {
    /// Registry that knows only the primitives
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with additional user value types
    pub fn with_user_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for name in types {
            registry.register(name);
        }
        registry
    }

    /// Register a user value type. Returns false if it was already known.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if PrimitiveType::from_source_name(&name).is_some() {
            return false;
        }
        self.user.insert(name)
    }

    /// Resolve a declared value-type name
    pub fn resolve(&self, name: &str) -> Option<TargetValueType> {
        if let Some(primitive) = PrimitiveType::from_source_name(name) {
            return Some(TargetValueType::Primitive(primitive));
        }
        self.user
            .get(name)
            .map(|name| TargetValueType::User(name.clone()))
    }

    /// Whether the name resolves to a value type
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Number of registered user value types
    pub fn user_type_count(&self) -> usize {
        self.user.len()
    }
}
