//! Forwarding overload synthesis

use crate::model::{ForwardArg, ForwardingCall, MethodKind, MethodSpec, ParameterSpec};
use crate::overload::{EmittedOverload, EmittedParam, OverloadBody};

/// Index where the trailing run of defaulted parameters begins.
///
/// The target only lets callers omit a suffix, so only defaults inside this
/// run can be filled in by a forwarding overload. Equals `params.len()` when
/// the last parameter has no default.
pub fn trailing_default_start(params: &[ParameterSpec]) -> usize {
    params
        .iter()
        .rposition(|p| !p.has_default())
        .map_or(0, |last_required| last_required + 1)
}

/// Build the forwarding overload that keeps the first `keep` parameters and
/// fills every later one from its default literal.
///
/// `params` are the canonical overload's parameters; `method` is the source
/// declaration the defaults come from.
pub fn forwarding_overload(
    method: &MethodSpec,
    params: &[EmittedParam],
    keep: usize,
    canonical: &EmittedOverload,
) -> EmittedOverload {
    let mut args: Vec<ForwardArg> = params[..keep]
        .iter()
        .map(|p| ForwardArg::param(p.name.clone()))
        .collect();

    for (spec, emitted) in method.params[keep..].iter().zip(&params[keep..]) {
        if let Some(literal) = &spec.default {
            args.push(ForwardArg::Literal {
                literal: literal.clone(),
                wraps_into_nullable: emitted.ty.is_wrapped() && !literal.is_null(),
                slot: emitted.ty.primitive(),
            });
        }
    }

    let prefix = params[..keep]
        .iter()
        .map(|p| EmittedParam {
            name: p.name.clone(),
            ty: p.ty.clone(),
            native_default: None,
        })
        .collect();

    EmittedOverload {
        name: canonical.name.clone(),
        kind: canonical.kind,
        modifiers: canonical.modifiers,
        params: prefix,
        return_type: canonical.return_type.clone(),
        body: OverloadBody::Forward(ForwardingCall::new(call_target(method), args)),
    }
}

fn call_target(method: &MethodSpec) -> String {
    match method.kind {
        MethodKind::Method => method.name.clone(),
        MethodKind::Constructor => "this".to_string(),
    }
}
