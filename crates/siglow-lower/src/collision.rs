//! Overload collision detection
//!
//! Within one owning type, no two source declarations may lower to overloads
//! that share kind, name and emitted parameter-type sequence. Detection runs
//! after every method of the type has been lowered.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::model::{MethodKind, Span};
use crate::overload::{EmittedOverload, LoweredTy};

/// Identity of an emitted overload as seen by the target's overload resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CollisionKey {
    kind: MethodKind,
    name: String,
    params: Vec<LoweredTy>,
}

#[derive(Debug)]
struct Occurrence {
    method_index: usize,
    canonical: bool,
    span: Option<Span>,
}

#[derive(Debug)]
struct Group {
    key: CollisionKey,
    occurrences: Vec<Occurrence>,
}

impl Group {
    /// Distinct declarations contributing to this key, in first-seen order
    fn methods(&self) -> Vec<usize> {
        let mut seen = Vec::new();
        for occ in &self.occurrences {
            if !seen.contains(&occ.method_index) {
                seen.push(occ.method_index);
            }
        }
        seen
    }
}

/// Outcome of detection for one owning type
#[derive(Debug, Default)]
pub struct CollisionReport {
    /// Declaration indices that must not be emitted
    pub skipped: FxHashSet<usize>,
    /// One diagnostic per colliding sequence, in first-seen order
    pub diagnostics: Vec<Diagnostic>,
}

impl CollisionReport {
    pub fn is_skipped(&self, method_index: usize) -> bool {
        self.skipped.contains(&method_index)
    }

    pub fn collision_count(&self) -> usize {
        self.diagnostics.len()
    }
}

/// Groups emitted overloads by signature
#[derive(Debug, Default)]
pub struct CollisionDetector {
    index: FxHashMap<CollisionKey, usize>,
    groups: Vec<Group>,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every overload produced for the declaration at `method_index`
    pub fn record(&mut self, method_index: usize, span: Option<Span>, overloads: &[EmittedOverload]) {
        for overload in overloads {
            let key = CollisionKey {
                kind: overload.kind,
                name: overload.name.clone(),
                params: overload.param_types(),
            };
            let occurrence = Occurrence {
                method_index,
                canonical: overload.is_canonical(),
                span,
            };

            match self.index.get(&key) {
                Some(&group) => self.groups[group].occurrences.push(occurrence),
                None => {
                    self.index.insert(key.clone(), self.groups.len());
                    self.groups.push(Group {
                        key,
                        occurrences: vec![occurrence],
                    });
                }
            }
        }
    }

    /// Build the report for `owner`
    pub fn finish(self, owner: &str) -> CollisionReport {
        let mut report = CollisionReport::default();

        for group in &self.groups {
            let methods = group.methods();
            if methods.len() < 2 {
                continue;
            }

            trace!(owner, name = %group.key.name, declarations = ?methods, "overload collision");
            report.skipped.extend(methods.iter().copied());

            let sources: Vec<String> = group
                .occurrences
                .iter()
                .map(|occ| {
                    let role = if occ.canonical { "canonical" } else { "forwarding" };
                    format!("declaration #{} ({})", occ.method_index, role)
                })
                .collect();
            let types: Vec<String> = group.key.params.iter().map(|t| t.to_string()).collect();
            let detail = format!(
                "parameter types ({}) are produced by {}",
                types.join(", "),
                sources.join(" and ")
            );

            // Point at the later declaration; the first one is usually the intended one
            let span = group.occurrences.iter().rev().find_map(|occ| occ.span);
            report.diagnostics.push(
                Diagnostic::new(DiagnosticKind::SignatureCollision, owner, &group.key.name, detail)
                    .with_span(span),
            );
        }

        report
    }
}
