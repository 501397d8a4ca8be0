//! Siglow Type Layer
//!
//! Value-type representation, the nullable type mapper and default-literal
//! rendering used by the signature lowering pipeline.

#![warn(missing_docs)]

pub mod error;
pub mod literal;
pub mod mapper;
pub mod ty;

pub use error::TypeError;
pub use literal::Literal;
pub use mapper::{Declaration, LocalDecl, NullableTypeMapper};
pub use ty::{
    DeclaredType, NullableStyle, PrimitiveType, TargetTypeDecision, TargetValueType,
    ValueTypeRegistry,
};
