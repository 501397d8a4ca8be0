//! Lowering output
//!
//! Owned by the emission stage that follows lowering.

use serde::{Deserialize, Serialize};
use siglow_types::{NullableStyle, PrimitiveType, TargetTypeDecision};
use std::fmt;

use crate::model::{ForwardingCall, MethodBody, MethodKind, Modifiers};

/// Target type of one emitted slot (parameter, field or return)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ty", rename_all = "lowercase")]
pub enum LoweredTy {
    /// Value type with its bare/wrapped decision
    Value(TargetTypeDecision),
    /// Reference type, passed through untouched
    Reference(String),
    /// Value type with no known representation; needs manual resolution
    Unresolved(String),
}

impl LoweredTy {
    /// Spell the type in target syntax
    pub fn render(&self, style: NullableStyle, placeholder: &str) -> String {
        match self {
            LoweredTy::Value(decision) => decision.render(style),
            LoweredTy::Reference(name) => name.clone(),
            LoweredTy::Unresolved(name) => format!("{}<{}>", placeholder, name),
        }
    }

    /// Primitive behind the slot, if any
    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            LoweredTy::Value(decision) => decision.value_type().as_primitive(),
            _ => None,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, LoweredTy::Value(decision) if decision.is_wrapped())
    }
}

impl fmt::Display for LoweredTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoweredTy::Value(decision) => write!(f, "{}", decision),
            LoweredTy::Reference(name) => f.write_str(name),
            LoweredTy::Unresolved(name) => write!(f, "<unresolved {}>", name),
        }
    }
}

/// One parameter of an emitted overload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmittedParam {
    pub name: String,
    pub ty: LoweredTy,
    /// Default kept as a native trailing-optional annotation (canonical only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum OverloadBody {
    /// The source method's own body; carried by the canonical overload only
    Original(MethodBody),
    /// A single call to the canonical overload
    Forward(ForwardingCall),
}

/// One target-level method declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmittedOverload {
    pub name: String,
    pub kind: MethodKind,
    pub modifiers: Modifiers,
    pub params: Vec<EmittedParam>,
    /// `None` for void and constructors
    pub return_type: Option<LoweredTy>,
    pub body: OverloadBody,
}

impl EmittedOverload {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self.body, OverloadBody::Original(_))
    }

    pub fn forwarding_call(&self) -> Option<&ForwardingCall> {
        match &self.body {
            OverloadBody::Forward(call) => Some(call),
            OverloadBody::Original(_) => None,
        }
    }

    /// Emitted parameter-type sequence
    pub fn param_types(&self) -> Vec<LoweredTy> {
        self.params.iter().map(|p| p.ty.clone()).collect()
    }

    /// `name(T1, T2)` with suffix-style nullable spelling
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.params.iter().map(|p| p.ty.to_string()).collect();
        format!("{}({})", self.name, types.join(", "))
    }
}

/// All overloads produced for one source method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoweredMethod {
    pub name: String,
    /// Position of the source declaration inside its owning type
    pub index: usize,
    /// Canonical first, forwarding overloads after by descending arity
    pub overloads: Vec<EmittedOverload>,
}

impl LoweredMethod {
    pub fn canonical(&self) -> Option<&EmittedOverload> {
        self.overloads.first().filter(|o| o.is_canonical())
    }

    pub fn forwarding(&self) -> impl Iterator<Item = &EmittedOverload> {
        self.overloads.iter().filter(|o| !o.is_canonical())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoweredField {
    pub name: String,
    pub modifiers: Modifiers,
    pub ty: LoweredTy,
    /// Initializer in target syntax
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<String>,
}

/// An owning type after lowering; skipped methods are absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoweredTypeDecl {
    pub name: String,
    pub fields: Vec<LoweredField>,
    pub methods: Vec<LoweredMethod>,
}

impl LoweredTypeDecl {
    pub fn overloads(&self) -> impl Iterator<Item = &EmittedOverload> {
        self.methods.iter().flat_map(|m| m.overloads.iter())
    }

    pub fn overloads_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s EmittedOverload> {
        self.overloads().filter(move |o| o.name == name)
    }

    /// Whether another method emits an overload with the same kind, name
    /// and arity as the canonical overload of the method at `position`
    pub fn has_rival(&self, position: usize) -> bool {
        let Some(canonical) = self.methods.get(position).and_then(LoweredMethod::canonical) else {
            return false;
        };
        self.methods
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != position)
            .flat_map(|(_, method)| method.overloads.iter())
            .any(|o| o.kind == canonical.kind && o.name == canonical.name && o.arity() == canonical.arity())
    }
}
