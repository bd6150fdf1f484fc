//! Warnings. None of these stop later phases.

use plover_reporting::{Diagnostic, IntoDiagnostic, Label};
use plover_span::Span;

pub struct UnreachableCode {
    pub span: Span,
}

impl IntoDiagnostic for UnreachableCode {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::warning()
            .with_message("unreachable code")
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
    }
}

/// A comparison whose result is fixed because one side is `null`.
pub struct AlwaysValue {
    pub value: String,
    pub span: Span,
}

impl IntoDiagnostic for AlwaysValue {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::warning()
            .with_message(format!("expression will always result to '{}'", self.value))
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
    }
}

pub struct PossibleNullDereference {
    pub span: Span,
}

impl IntoDiagnostic for PossibleNullDereference {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::warning()
            .with_message("dereference of a possibly null value")
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
    }
}
