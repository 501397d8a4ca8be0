//! Type layer errors

use thiserror::Error;

/// Errors raised while mapping declarations to target value types
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// The declared type has no known target value-type representation
    #[error("Unsupported type: '{name}' has no target value-type representation")]
    UnsupportedType {
        /// Declared type name
        name: String,
    },

    /// A literal cannot be stored in the given slot
    #[error("Literal {literal} is not assignable to '{target}'")]
    IncompatibleLiteral {
        /// Rendered literal
        literal: String,
        /// Rendered target slot type
        target: String,
    },
}
