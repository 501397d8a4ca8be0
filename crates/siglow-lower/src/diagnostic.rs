//! Lowering diagnostics
//!
//! Structured reports collected during a lowering run, plus rendering through
//! codespan-reporting for terminals and serde for tooling.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, Severity as CsSeverity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::WriteColor;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::model::Span;

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Two overloads lower to the same name and parameter-type sequence
    SignatureCollision,
    /// A declared value type has no target representation
    UnsupportedType,
    /// A default literal does not fit its parameter
    IncompatibleDefault,
    /// A default on a parameter that is followed by a required one
    NonTrailingDefault,
}

impl DiagnosticKind {
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::SignatureCollision => "L0001",
            DiagnosticKind::UnsupportedType => "L0002",
            DiagnosticKind::IncompatibleDefault => "L0003",
            DiagnosticKind::NonTrailingDefault => "L0004",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::NonTrailingDefault => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::SignatureCollision => "signature collision",
            DiagnosticKind::UnsupportedType => "unsupported type",
            DiagnosticKind::IncompatibleDefault => "incompatible default",
            DiagnosticKind::NonTrailingDefault => "non-trailing default",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One structured report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: String,
    pub severity: Severity,
    /// Owning type
    pub owner: String,
    /// Method or field name
    pub member: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        owner: impl Into<String>,
        member: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: kind.code().to_string(),
            severity: kind.severity(),
            owner: owner.into(),
            member: member.into(),
            detail: detail.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// One-line summary: `Owner.member: detail`
    pub fn message(&self) -> String {
        format!("{}.{}: {}", self.owner, self.member, self.detail)
    }

    /// Convert to a codespan diagnostic. Labels are attached only when both a
    /// span and a source file are available.
    pub fn to_codespan(&self, file_id: Option<usize>) -> CsDiagnostic<usize> {
        let severity = match self.severity {
            Severity::Error => CsSeverity::Error,
            Severity::Warning => CsSeverity::Warning,
        };
        let mut diag = CsDiagnostic::new(severity)
            .with_message(format!("{} in {}.{}", self.kind, self.owner, self.member))
            .with_code(self.code.clone());

        match (file_id, self.span) {
            (Some(file_id), Some(span)) => {
                let label = Label::primary(file_id, span.start as usize..span.end as usize)
                    .with_message(self.detail.clone());
                diag = diag.with_labels(vec![label]);
            }
            _ => diag = diag.with_notes(vec![self.detail.clone()]),
        }

        if self.kind == DiagnosticKind::SignatureCollision {
            diag.notes
                .push("help: rename one declaration or remove a default value".to_string());
        }
        diag
    }

    /// Write the diagnostic to a terminal
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
        file_id: Option<usize>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.to_codespan(file_id))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}[{}]: {}", severity, self.code, self.message())
    }
}

/// Shared, append-only diagnostic buffer for a lowering run.
///
/// Each entry carries the declaration position of its owning type so the
/// collected reports can be put back into a deterministic order after a
/// parallel run.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Mutex<Vec<(usize, Diagnostic)>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, order: usize, diagnostic: Diagnostic) {
        self.entries.lock().push((order, diagnostic));
    }

    /// Append a batch under a single lock, keeping its internal order
    pub fn extend(&self, order: usize, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        let mut entries = self.entries.lock();
        entries.extend(diagnostics.into_iter().map(|d| (order, d)));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.entries.lock().iter().filter(|(_, d)| d.is_error()).count()
    }

    /// Drain into owning-type order; order within one type is preserved
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut entries = self.entries.into_inner();
        entries.sort_by_key(|(order, _)| *order);
        entries.into_iter().map(|(_, d)| d).collect()
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(
    path: impl Into<PathBuf>,
    source: impl Into<String>,
) -> (SimpleFiles<String, String>, usize) {
    let mut files = SimpleFiles::new();
    let id = files.add(path.into().display().to_string(), source.into());
    (files, id)
}
