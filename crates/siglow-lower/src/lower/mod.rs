//! Signature lowering
//!
//! Turns one source method into its ordered overload set: the canonical
//! full-arity overload carrying the original body, then one forwarding
//! overload per omittable trailing default, longest first.

mod forward;
mod type_decl;

pub use forward::trailing_default_start;
pub use type_decl::{TypeLowerer, TypeLowering};

use siglow_types::{Declaration, DeclaredType, NullableTypeMapper, TypeError};
use tracing::{debug, trace};

use crate::config::LoweringOptions;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::{LowerError, LowerResult};
use crate::model::{MethodSpec, Span};
use crate::overload::{EmittedOverload, EmittedParam, LoweredTy, OverloadBody};

/// Overloads for one method plus the recoverable diagnostics raised on the way
#[derive(Debug, Clone, PartialEq)]
pub struct MethodLowering {
    pub overloads: Vec<EmittedOverload>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lowers method signatures
#[derive(Debug, Clone, Copy)]
pub struct SignatureLowerer<'a> {
    mapper: NullableTypeMapper<'a>,
    options: &'a LoweringOptions,
}

impl<'a> SignatureLowerer<'a> {
    pub fn new(mapper: NullableTypeMapper<'a>, options: &'a LoweringOptions) -> Self {
        Self { mapper, options }
    }

    pub fn mapper(&self) -> NullableTypeMapper<'a> {
        self.mapper
    }

    /// Lower one method declared in `owner`.
    ///
    /// Unmappable value types become [`LoweredTy::Unresolved`] and are
    /// reported in the returned diagnostics. A default literal that does not
    /// fit its parameter fails the whole method.
    pub fn lower(&self, owner: &str, method: &MethodSpec) -> LowerResult<MethodLowering> {
        let mut diagnostics = Vec::new();
        let run_start = trailing_default_start(&method.params);

        let mut params = Vec::with_capacity(method.params.len());
        for (index, spec) in method.params.iter().enumerate() {
            let ty = lower_slot(self.mapper, spec).unwrap_or_else(|err| {
                diagnostics.push(unsupported(owner, &method.name, &spec.name, &err, spec.span));
                LoweredTy::Unresolved(spec.ty.name().to_string())
            });

            let mut native_default = None;
            if let Some(literal) = &spec.default {
                if index < run_start {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::NonTrailingDefault,
                            owner,
                            &method.name,
                            format!(
                                "default value of parameter '{}' is ignored: parameter '{}' after it is required",
                                spec.name,
                                method.params[run_start - 1].name
                            ),
                        )
                        .with_span(spec.span.or(method.span)),
                    );
                } else {
                    check_default(&ty, literal).map_err(|err| match err {
                        TypeError::IncompatibleLiteral { literal, target } => {
                            LowerError::IncompatibleDefault {
                                param: spec.name.clone(),
                                literal,
                                target,
                            }
                        }
                        TypeError::UnsupportedType { name } => LowerError::IncompatibleDefault {
                            param: spec.name.clone(),
                            literal: literal.to_string(),
                            target: name,
                        },
                    })?;
                    if self.options.emit_native_defaults {
                        native_default = Some(literal.render(ty.primitive()));
                    }
                }
            }

            params.push(EmittedParam {
                name: spec.name.clone(),
                ty,
                native_default,
            });
        }

        let return_type = match &method.return_type {
            Some(ret) => Some(lower_slot(self.mapper, ret).unwrap_or_else(|err| {
                diagnostics.push(unsupported(owner, &method.name, "return", &err, method.span));
                LoweredTy::Unresolved(ret.ty.name().to_string())
            })),
            None => None,
        };

        let canonical = EmittedOverload {
            name: method.name.clone(),
            kind: method.kind,
            modifiers: method.modifiers,
            params: params.clone(),
            return_type,
            body: OverloadBody::Original(method.body.clone()),
        };

        let mut overloads = Vec::with_capacity(method.params.len() - run_start + 1);
        for keep in (run_start..method.params.len()).rev() {
            let overload = forward::forwarding_overload(method, &params, keep, &canonical);
            trace!(
                owner,
                method = %method.name,
                signature = %overload.signature(),
                "synthesized forwarding overload"
            );
            overloads.push(overload);
        }
        overloads.insert(0, canonical);

        debug!(
            owner,
            method = %method.name,
            overloads = overloads.len(),
            "lowered method"
        );

        Ok(MethodLowering {
            overloads,
            diagnostics,
        })
    }
}

/// Lower the type of any declaration. Reference types pass through.
pub fn lower_slot<D: Declaration + ?Sized>(
    mapper: NullableTypeMapper<'_>,
    decl: &D,
) -> Result<LoweredTy, TypeError> {
    match decl.declared_type() {
        DeclaredType::Reference(name) => Ok(LoweredTy::Reference(name.clone())),
        DeclaredType::Value(_) => mapper.map_type(decl).map(LoweredTy::Value),
    }
}

/// Check a literal against an already lowered slot
pub fn check_default(ty: &LoweredTy, literal: &siglow_types::Literal) -> Result<(), TypeError> {
    match ty {
        LoweredTy::Value(decision) => literal.check_value_slot(decision),
        LoweredTy::Reference(name) => literal.check_reference_slot(name),
        LoweredTy::Unresolved(_) => Ok(()),
    }
}

fn unsupported(
    owner: &str,
    member: &str,
    slot: &str,
    err: &TypeError,
    span: Option<Span>,
) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::UnsupportedType,
        owner,
        member,
        format!("{}: {}", slot, err),
    )
    .with_span(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForwardArg, MethodBody, ParameterSpec, ReturnType};
    use siglow_types::{Literal, PrimitiveType, TargetTypeDecision, TargetValueType, ValueTypeRegistry};

    fn lower(method: &MethodSpec) -> LowerResult<MethodLowering> {
        let registry = ValueTypeRegistry::new();
        let options = LoweringOptions::default();
        SignatureLowerer::new(NullableTypeMapper::new(&registry), &options).lower("Main", method)
    }

    fn wrapped_int() -> LoweredTy {
        LoweredTy::Value(TargetTypeDecision::WrappedNullable(TargetValueType::Primitive(
            PrimitiveType::Int,
        )))
    }

    #[test]
    fn test_no_defaults_single_overload() {
        let method = MethodSpec::new("foo")
            .param(ParameterSpec::value("optInt", "Int"))
            .param(ParameterSpec::reference("reqString", "String"));

        let result = lower(&method).unwrap();
        assert_eq!(result.overloads.len(), 1);
        assert!(result.overloads[0].is_canonical());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_trailing_default_adds_forwarding() {
        let method = MethodSpec::new("foo2")
            .param(ParameterSpec::value("optInt", "Int"))
            .param(ParameterSpec::reference("reqString", "String"))
            .param(ParameterSpec::value("optBool", "Bool").with_default(Literal::Bool(false)))
            .returns(ReturnType::value("Bool"))
            .body_lines(["return false;"]);

        let result = lower(&method).unwrap();
        assert_eq!(result.overloads.len(), 2);

        let canonical = &result.overloads[0];
        assert_eq!(canonical.signature(), "foo2(int, String, bool)");
        assert_eq!(canonical.params[2].native_default.as_deref(), Some("false"));
        assert_eq!(
            canonical.body,
            OverloadBody::Original(MethodBody::Block(vec!["return false;".to_string()]))
        );

        let forwarding = &result.overloads[1];
        assert_eq!(forwarding.signature(), "foo2(int, String)");
        assert!(forwarding.params.iter().all(|p| p.native_default.is_none()));
        let call = forwarding.forwarding_call().unwrap();
        assert_eq!(call.target, "foo2");
        assert_eq!(call.render_args(), "optInt, reqString, false");
    }

    #[test]
    fn test_nullable_default_wraps_literal() {
        let method = MethodSpec::new("foo5").param(
            ParameterSpec::value("nullableIntWithDef", "Int")
                .nullable()
                .with_default(Literal::Int(4)),
        );

        let result = lower(&method).unwrap();
        assert_eq!(result.overloads[0].params[0].ty, wrapped_int());

        let call = result.overloads[1].forwarding_call().unwrap();
        assert_eq!(
            call.args,
            vec![ForwardArg::Literal {
                literal: Literal::Int(4),
                wraps_into_nullable: true,
                slot: Some(PrimitiveType::Int),
            }]
        );
    }

    #[test]
    fn test_constructor_forwards_through_this() {
        let method = MethodSpec::constructor("Main")
            .param(ParameterSpec::value("x", "Int").with_default(Literal::Int(1)));

        let result = lower(&method).unwrap();
        assert_eq!(result.overloads[1].forwarding_call().unwrap().target, "this");
    }

    #[test]
    fn test_non_trailing_default_warns() {
        let method = MethodSpec::new("foo")
            .param(ParameterSpec::value("optInt", "Int").with_default(Literal::Int(4)))
            .param(ParameterSpec::reference("reqString", "String"));

        let result = lower(&method).unwrap();
        assert_eq!(result.overloads.len(), 1);
        assert!(result.overloads[0].params[0].native_default.is_none());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::NonTrailingDefault);
    }

    #[test]
    fn test_unsupported_type_placeholder() {
        let method = MethodSpec::new("move")
            .param(ParameterSpec::value("by", "Vec3"))
            .returns(ReturnType::value("Vec3"));

        let result = lower(&method).unwrap();
        assert_eq!(result.overloads[0].params[0].ty, LoweredTy::Unresolved("Vec3".to_string()));
        assert_eq!(
            result.overloads[0].return_type,
            Some(LoweredTy::Unresolved("Vec3".to_string()))
        );
        assert_eq!(result.diagnostics.len(), 2);
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::UnsupportedType));
    }

    #[test]
    fn test_incompatible_default_fails() {
        let method = MethodSpec::new("foo")
            .param(ParameterSpec::value("x", "Int").with_default(Literal::Null));

        assert_eq!(
            lower(&method),
            Err(LowerError::IncompatibleDefault {
                param: "x".to_string(),
                literal: "null".to_string(),
                target: "int".to_string(),
            })
        );
    }

    #[test]
    fn test_native_defaults_disabled() {
        let registry = ValueTypeRegistry::new();
        let options = LoweringOptions {
            emit_native_defaults: false,
            ..LoweringOptions::default()
        };
        let method = MethodSpec::new("foo4")
            .param(ParameterSpec::value("optInt", "Int").nullable().with_default(Literal::Null));

        let result = SignatureLowerer::new(NullableTypeMapper::new(&registry), &options)
            .lower("Main", &method)
            .unwrap();
        assert!(result.overloads[0].params[0].native_default.is_none());
        assert_eq!(result.overloads[1].forwarding_call().unwrap().render_args(), "null");
    }
}
