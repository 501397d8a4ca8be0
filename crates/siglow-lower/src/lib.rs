//! Signature lowering for optional, default and nullable parameters
//!
//! Source methods with trailing default values are expanded into an overload
//! set for a target that only supports positional, fixed-arity calls:
//!
//! - the canonical overload keeps the full parameter list and the body
//! - each forwarding overload drops one more trailing defaulted parameter and
//!   calls the canonical overload with the default filled in
//!
//! Value types are emitted bare or wrapped in a nullable container depending
//! only on their nullable annotation (see [`siglow_types::NullableTypeMapper`]).
//!
//! [`LoweringPass`] runs the whole program and collects [`Diagnostic`]s;
//! [`render_program`] prints the result.

pub mod collision;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod lower;
pub mod model;
pub mod overload;
pub mod pass;
pub mod render;
pub mod stats;

pub use collision::{CollisionDetector, CollisionReport};
pub use config::{LoweringConfig, LoweringOptions, TypesConfig, CONFIG_FILE_NAME};
pub use diagnostic::{create_files, Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
pub use error::{ConfigError, LowerError, LowerResult};
pub use lower::{MethodLowering, SignatureLowerer, TypeLowerer, TypeLowering};
pub use model::{
    FieldSpec, ForwardArg, ForwardingCall, MethodBody, MethodKind, MethodSpec, Modifiers,
    ParameterSpec, ProgramSpec, ReturnType, Span, TypeSpec, Visibility,
};
pub use overload::{
    EmittedOverload, EmittedParam, LoweredField, LoweredMethod, LoweredTy, LoweredTypeDecl,
    OverloadBody,
};
pub use pass::{LoweredProgram, LoweringPass};
pub use render::{render_program, render_type, RenderOptions};
pub use stats::LoweringStats;
