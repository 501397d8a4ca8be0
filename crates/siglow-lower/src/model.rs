//! Input model
//!
//! Declarations handed over by semantic analysis: already type-checked, with
//! defaults evaluated to literals. Everything here is read-only to lowering.

use serde::{Deserialize, Serialize};
use siglow_types::{Declaration, DeclaredType, Literal, PrimitiveType};
use std::path::PathBuf;

/// Byte range into the original source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    /// The target's implicit member visibility; rendered without a keyword
    #[default]
    Private,
}

impl Visibility {
    /// Keyword to print, if any
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Visibility::Public => Some("public"),
            Visibility::Protected => Some("protected"),
            Visibility::Internal => Some("internal"),
            Visibility::Private => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

impl Modifiers {
    pub fn public() -> Self {
        Self {
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: DeclaredType,
    /// Explicit nullable annotation
    #[serde(default)]
    pub nullable: bool,
    /// Evaluated default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            default: None,
            span: None,
        }
    }

    /// Value-typed parameter
    pub fn value(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Value(ty.into()))
    }

    /// Reference-typed parameter
    pub fn reference(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Reference(ty.into()))
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, literal: Literal) -> Self {
        self.default = Some(literal);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl Declaration for ParameterSpec {
    fn declared_type(&self) -> &DeclaredType {
        &self.ty
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn default_literal(&self) -> Option<&Literal> {
        self.default.as_ref()
    }
}

/// Declared return type; `None` on a method means void
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnType {
    #[serde(rename = "type")]
    pub ty: DeclaredType,
    #[serde(default)]
    pub nullable: bool,
}

impl ReturnType {
    pub fn value(ty: impl Into<String>) -> Self {
        Self {
            ty: DeclaredType::Value(ty.into()),
            nullable: false,
        }
    }

    pub fn reference(ty: impl Into<String>) -> Self {
        Self {
            ty: DeclaredType::Reference(ty.into()),
            nullable: false,
        }
    }
}

impl Declaration for ReturnType {
    fn declared_type(&self) -> &DeclaredType {
        &self.ty
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    #[default]
    Method,
    Constructor,
}

/// One argument of a forwarding call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ForwardArg {
    /// Pass a parameter of the calling overload through unchanged
    Param { name: String },
    /// Pass a literal
    Literal {
        literal: Literal,
        /// The receiving slot is a nullable wrapper; the literal converts implicitly
        #[serde(default)]
        wraps_into_nullable: bool,
        /// Primitive of the receiving slot, when known
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slot: Option<PrimitiveType>,
    },
}

impl ForwardArg {
    pub fn param(name: impl Into<String>) -> Self {
        ForwardArg::Param { name: name.into() }
    }

    pub fn literal(literal: Literal) -> Self {
        ForwardArg::Literal {
            literal,
            wraps_into_nullable: false,
            slot: None,
        }
    }

    /// Spell the argument in target syntax
    pub fn render(&self) -> String {
        match self {
            ForwardArg::Param { name } => name.clone(),
            ForwardArg::Literal { literal, slot, .. } => literal.render(*slot),
        }
    }
}

/// A call whose result is the whole body of an overload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardingCall {
    pub target: String,
    pub args: Vec<ForwardArg>,
}

impl ForwardingCall {
    pub fn new(target: impl Into<String>, args: Vec<ForwardArg>) -> Self {
        Self {
            target: target.into(),
            args,
        }
    }

    /// Number of literal arguments
    pub fn literal_count(&self) -> usize {
        self.args
            .iter()
            .filter(|arg| matches!(arg, ForwardArg::Literal { .. }))
            .count()
    }

    pub fn render_args(&self) -> String {
        self.args
            .iter()
            .map(ForwardArg::render)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Body of a source method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MethodBody {
    /// Already generated target statements, one per line
    Block(Vec<String>),
    /// A hand-written overload whose body is one call to a sibling
    Forward(ForwardingCall),
}

impl Default for MethodBody {
    fn default() -> Self {
        MethodBody::Block(Vec::new())
    }
}

/// One source method declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParameterSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<ReturnType>,
    #[serde(default)]
    pub kind: MethodKind,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub body: MethodBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl MethodSpec {
    /// Public void method with an empty body
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            kind: MethodKind::Method,
            modifiers: Modifiers::public(),
            body: MethodBody::default(),
            span: None,
        }
    }

    /// Public constructor of `owner`
    pub fn constructor(owner: impl Into<String>) -> Self {
        Self {
            kind: MethodKind::Constructor,
            ..Self::new(owner)
        }
    }

    pub fn param(mut self, param: ParameterSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ret: ReturnType) -> Self {
        self.return_type = Some(ret);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn body_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body = MethodBody::Block(lines.into_iter().map(Into::into).collect());
        self
    }

    pub fn forwarding_body(mut self, call: ForwardingCall) -> Self {
        self.body = MethodBody::Forward(call);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// One field declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: DeclaredType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Literal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            modifiers: Modifiers::default(),
            initializer: None,
            span: None,
        }
    }

    pub fn value(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, DeclaredType::Value(ty.into()))
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    pub fn with_initializer(mut self, literal: Literal) -> Self {
        self.initializer = Some(literal);
        self
    }
}

impl Declaration for FieldSpec {
    fn declared_type(&self) -> &DeclaredType {
        &self.ty
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn default_literal(&self) -> Option<&Literal> {
        self.initializer.as_ref()
    }
}

/// An owning type with its members in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }
}

/// Everything a whole-program lowering run consumes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgramSpec {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub types: Vec<TypeSpec>,
    /// Source file the spans point into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl ProgramSpec {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            types: Vec::new(),
            source: None,
        }
    }

    pub fn with_type(mut self, ty: TypeSpec) -> Self {
        self.types.push(ty);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
