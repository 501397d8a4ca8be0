//! Whole-program lowering pass
//!
//! Owning types are independent, so they are lowered on a small pool of
//! scoped worker threads pulling from a shared injector queue. Each worker
//! keeps its results locally; diagnostics go through the shared
//! [`DiagnosticSink`]. Output order never depends on scheduling.

use crossbeam_deque::{Injector, Steal};
use serde::{Deserialize, Serialize};
use siglow_types::{NullableTypeMapper, ValueTypeRegistry};
use std::thread;
use tracing::{debug, info};

use crate::config::LoweringConfig;
use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::lower::{SignatureLowerer, TypeLowerer};
use crate::model::{ProgramSpec, TypeSpec};
use crate::overload::LoweredTypeDecl;
use crate::stats::LoweringStats;

/// Everything a lowering run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoweredProgram {
    pub namespace: String,
    /// Lowered types in declaration order
    pub types: Vec<LoweredTypeDecl>,
    /// Diagnostics ordered by owning type, then by position inside the type
    pub diagnostics: Vec<Diagnostic>,
    pub stats: LoweringStats,
}

impl LoweredProgram {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Lowers a whole program with one configuration
#[derive(Debug, Clone)]
pub struct LoweringPass {
    config: LoweringConfig,
    registry: ValueTypeRegistry,
}

impl LoweringPass {
    pub fn new(config: LoweringConfig) -> Self {
        let registry = config.registry();
        debug!(
            user_value_types = registry.user_type_count(),
            style = ?config.lowering.nullable_style,
            "configured lowering pass"
        );
        Self { config, registry }
    }

    /// Lower every type. Always completes; failures surface as diagnostics.
    pub fn run(&self, program: &ProgramSpec) -> LoweredProgram {
        let signatures = SignatureLowerer::new(
            NullableTypeMapper::new(&self.registry),
            &self.config.lowering,
        );
        let lowerer = TypeLowerer::new(signatures);
        let sink = DiagnosticSink::new();

        let workers = self.config.worker_count().min(program.types.len()).max(1);
        debug!(types = program.types.len(), workers, "starting lowering pass");

        let mut results: Vec<Lowered> = if workers == 1 {
            program
                .types
                .iter()
                .enumerate()
                .map(|(order, ty)| lower_one(&lowerer, &sink, order, ty))
                .collect()
        } else {
            let queue = Injector::new();
            for entry in program.types.iter().enumerate() {
                queue.push(entry);
            }

            thread::scope(|scope| {
                let handles: Vec<_> = (0..workers)
                    .map(|_| scope.spawn(|| worker_loop(&queue, &lowerer, &sink)))
                    .collect();

                let mut all = Vec::with_capacity(program.types.len());
                for handle in handles {
                    match handle.join() {
                        Ok(batch) => all.extend(batch),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
                all
            })
        };

        results.sort_by_key(|(order, _, _)| *order);

        let mut stats = LoweringStats::default();
        let mut types = Vec::with_capacity(results.len());
        for (_, decl, type_stats) in results {
            stats += type_stats;
            types.push(decl);
        }

        let diagnostics = sink.into_sorted();
        info!(
            types = stats.types,
            methods = stats.methods,
            overloads = stats.overloads,
            skipped = stats.skipped_methods,
            diagnostics = diagnostics.len(),
            "lowering pass finished"
        );

        LoweredProgram {
            namespace: program.namespace.clone(),
            types,
            diagnostics,
            stats,
        }
    }
}

type Lowered = (usize, LoweredTypeDecl, LoweringStats);

fn worker_loop(
    queue: &Injector<(usize, &TypeSpec)>,
    lowerer: &TypeLowerer<'_>,
    sink: &DiagnosticSink,
) -> Vec<Lowered> {
    let mut done = Vec::new();
    loop {
        match queue.steal() {
            Steal::Success((order, ty)) => done.push(lower_one(lowerer, sink, order, ty)),
            Steal::Empty => break,
            Steal::Retry => continue,
        }
    }
    done
}

fn lower_one(
    lowerer: &TypeLowerer<'_>,
    sink: &DiagnosticSink,
    order: usize,
    ty: &TypeSpec,
) -> Lowered {
    let result = lowerer.lower(ty);
    sink.extend(order, result.diagnostics);
    (order, result.decl, result.stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodSpec, ParameterSpec};
    use siglow_types::Literal;

    fn program(types: usize) -> ProgramSpec {
        let mut program = ProgramSpec::new("app");
        for i in 0..types {
            program = program.with_type(
                TypeSpec::new(format!("T{}", i)).method(
                    MethodSpec::new("run")
                        .param(ParameterSpec::value("by", "Vec3"))
                        .param(ParameterSpec::value("n", "Int").with_default(Literal::Int(1))),
                ),
            );
        }
        program
    }

    #[test]
    fn test_empty_program() {
        let result = LoweringPass::new(LoweringConfig::default()).run(&ProgramSpec::new("app"));
        assert!(result.types.is_empty());
        assert!(!result.has_errors());
        assert_eq!(result.stats, LoweringStats::default());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let program = program(24);

        let mut sequential = LoweringConfig::default();
        sequential.lowering.threads = 1;
        let mut parallel = LoweringConfig::default();
        parallel.lowering.threads = 4;

        let a = LoweringPass::new(sequential).run(&program);
        let b = LoweringPass::new(parallel).run(&program);
        assert_eq!(a, b);

        let owners: Vec<&str> = b.diagnostics.iter().map(|d| d.owner.as_str()).collect();
        let expected: Vec<String> = (0..24).map(|i| format!("T{}", i)).collect();
        assert_eq!(owners, expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(b.error_count(), 24);
        assert_eq!(b.stats.types, 24);
        assert_eq!(b.stats.overloads, 48);
        assert_eq!(b.stats.unsupported, 24);
    }

    #[test]
    fn test_json_output() {
        let result = LoweringPass::new(LoweringConfig::default()).run(&program(1));
        let json = result.to_json().unwrap();
        let back: LoweredProgram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
