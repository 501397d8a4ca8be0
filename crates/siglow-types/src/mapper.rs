//! Nullable type mapper
//!
//! Decides whether a value-typed declaration is emitted bare or wrapped in an
//! explicit nullable container. The decision depends on the nullable
//! annotation alone: a default value only supplies a literal for forwarding
//! overloads and never forces a wrapper.

use tracing::trace;

use crate::error::TypeError;
use crate::literal::Literal;
use crate::ty::{DeclaredType, TargetTypeDecision, ValueTypeRegistry};

/// Anything that declares a typed slot: parameter, field, local
pub trait Declaration {
    /// Declared type of the slot
    fn declared_type(&self) -> &DeclaredType;

    /// Whether the declaration carries an explicit nullable annotation
    fn is_nullable(&self) -> bool;

    /// Evaluated default value, if any
    fn default_literal(&self) -> Option<&Literal> {
        None
    }
}

/// A local variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDecl {
    /// Local name
    pub name: String,
    /// Declared type
    pub ty: DeclaredType,
    /// Explicit nullable annotation
    pub nullable: bool,
}

impl LocalDecl {
    /// Create a local declaration
    pub fn new(name: impl Into<String>, ty: DeclaredType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable,
        }
    }
}

impl Declaration for LocalDecl {
    fn declared_type(&self) -> &DeclaredType {
        &self.ty
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// Maps value-typed declarations to their target representation
#[derive(Debug, Clone, Copy)]
pub struct NullableTypeMapper<'a> {
    registry: &'a ValueTypeRegistry,
}

impl<'a> NullableTypeMapper<'a> {
    /// Create a mapper over the given value-type registry
    pub fn new(registry: &'a ValueTypeRegistry) -> Self {
        Self { registry }
    }

    /// Decide the representation of one declaration.
    ///
    /// Fails with [`TypeError::UnsupportedType`] when the declared type is not
    /// a value type known to the registry. Reference types are not handled
    /// here; callers pass them through unchanged.
    pub fn map_type<D: Declaration + ?Sized>(
        &self,
        decl: &D,
    ) -> Result<TargetTypeDecision, TypeError> {
        let declared = decl.declared_type();
        let value = match declared {
            DeclaredType::Value(name) => self.registry.resolve(name),
            DeclaredType::Reference(_) => None,
        }
        .ok_or_else(|| TypeError::UnsupportedType {
            name: declared.name().to_string(),
        })?;

        let decision = if decl.is_nullable() {
            TargetTypeDecision::WrappedNullable(value)
        } else {
            TargetTypeDecision::Bare(value)
        };

        trace!(
            ty = %declared,
            nullable = decl.is_nullable(),
            has_default = decl.default_literal().is_some(),
            decision = %decision,
            "mapped value type"
        );

        Ok(decision)
    }
}
