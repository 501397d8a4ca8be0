//! Lowering of one owning type

use tracing::{debug, warn};

use super::{check_default, lower_slot, SignatureLowerer};
use crate::collision::CollisionDetector;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::model::{FieldSpec, TypeSpec};
use crate::overload::{EmittedOverload, LoweredField, LoweredMethod, LoweredTy, LoweredTypeDecl};
use crate::stats::LoweringStats;

/// Result of lowering one owning type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeLowering {
    pub decl: LoweredTypeDecl,
    /// Field and method diagnostics in declaration order, collisions last
    pub diagnostics: Vec<Diagnostic>,
    pub stats: LoweringStats,
}

/// Lowers every member of an owning type and resolves overload collisions
#[derive(Debug, Clone, Copy)]
pub struct TypeLowerer<'a> {
    signatures: SignatureLowerer<'a>,
}

impl<'a> TypeLowerer<'a> {
    pub fn new(signatures: SignatureLowerer<'a>) -> Self {
        Self { signatures }
    }

    pub fn lower(&self, ty: &TypeSpec) -> TypeLowering {
        let mut diagnostics = Vec::new();
        let mut stats = LoweringStats {
            types: 1,
            fields: ty.fields.len(),
            methods: ty.methods.len(),
            ..Default::default()
        };

        let fields = ty
            .fields
            .iter()
            .map(|field| self.lower_field(&ty.name, field, &mut diagnostics))
            .collect();

        let mut detector = CollisionDetector::new();
        let mut lowered: Vec<(usize, Vec<EmittedOverload>)> = Vec::with_capacity(ty.methods.len());

        for (index, method) in ty.methods.iter().enumerate() {
            match self.signatures.lower(&ty.name, method) {
                Ok(result) => {
                    diagnostics.extend(result.diagnostics);
                    detector.record(index, method.span, &result.overloads);
                    lowered.push((index, result.overloads));
                }
                Err(err) => {
                    warn!(owner = %ty.name, method = %method.name, error = %err, "skipping method");
                    stats.skipped_methods += 1;
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::IncompatibleDefault,
                            &ty.name,
                            &method.name,
                            err.to_string(),
                        )
                        .with_span(method.span),
                    );
                }
            }
        }

        let report = detector.finish(&ty.name);
        stats.collisions = report.collision_count();
        diagnostics.extend(report.diagnostics.iter().cloned());

        let mut methods = Vec::with_capacity(lowered.len());
        for (index, overloads) in lowered {
            if report.is_skipped(index) {
                warn!(
                    owner = %ty.name,
                    method = %ty.methods[index].name,
                    "skipping method with colliding overloads"
                );
                stats.skipped_methods += 1;
                continue;
            }
            let method = LoweredMethod {
                name: ty.methods[index].name.clone(),
                index,
                overloads,
            };
            stats.overloads += method.overloads.len();
            stats.forwarding += method.forwarding().count();
            methods.push(method);
        }

        stats.unsupported = diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::UnsupportedType)
            .count();

        debug!(
            owner = %ty.name,
            methods = methods.len(),
            overloads = stats.overloads,
            diagnostics = diagnostics.len(),
            "lowered type"
        );

        TypeLowering {
            decl: LoweredTypeDecl {
                name: ty.name.clone(),
                fields,
                methods,
            },
            diagnostics,
            stats,
        }
    }

    fn lower_field(
        &self,
        owner: &str,
        field: &FieldSpec,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> LoweredField {
        let ty = match lower_slot(self.signatures.mapper(), field) {
            Ok(ty) => ty,
            Err(err) => {
                diagnostics.push(
                    Diagnostic::new(DiagnosticKind::UnsupportedType, owner, &field.name, err.to_string())
                        .with_span(field.span),
                );
                LoweredTy::Unresolved(field.ty.name().to_string())
            }
        };

        let initializer = match &field.initializer {
            Some(literal) => match check_default(&ty, literal) {
                Ok(()) => Some(literal.render(ty.primitive())),
                Err(err) => {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::IncompatibleDefault,
                            owner,
                            &field.name,
                            format!("initializer dropped: {}", err),
                        )
                        .with_span(field.span),
                    );
                    None
                }
            },
            None => None,
        };

        LoweredField {
            name: field.name.clone(),
            modifiers: field.modifiers,
            ty,
            initializer,
        }
    }
}
