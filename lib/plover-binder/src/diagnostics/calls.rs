//! Call and overload resolution errors.

use plover_reporting::{Diagnostic, IntoDiagnostic, Label};
use plover_span::Span;

use super::simple_error;

pub struct IncorrectArgumentCount {
    pub name: String,
    pub expected: usize,
    pub found: usize,
    pub span: Span,
}

impl IntoDiagnostic for IncorrectArgumentCount {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let word = if self.expected == 1 { "argument" } else { "arguments" };
        Diagnostic::error()
            .with_message(format!(
                "function '{}' expects {} {}, got {}",
                self.name, self.expected, word, self.found
            ))
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
    }
}

/// A positional argument after a named one.
pub struct NamedBeforeUnnamed {
    pub span: Span,
}

impl IntoDiagnostic for NamedBeforeUnnamed {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "all named arguments must come after any unnamed arguments".to_string(),
        )
    }
}

pub struct NamedArgumentTwice {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for NamedArgumentTwice {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!(
                "named argument '{}' cannot be specified multiple times",
                self.name
            ),
        )
    }
}

pub struct NoSuchParameter {
    pub function: String,
    pub parameter: String,
    pub has_overloads: bool,
    pub span: Span,
}

impl IntoDiagnostic for NoSuchParameter {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let subject = if self.has_overloads {
            "the best overload for"
        } else {
            "function"
        };
        simple_error(
            file_id,
            &self.span,
            format!(
                "{} '{}' does not have a parameter named '{}'",
                subject, self.function, self.parameter
            ),
        )
    }
}

/// A named argument for a slot already filled positionally.
pub struct ParameterAlreadySpecified {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for ParameterAlreadySpecified {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!(
                "named argument '{}' specifies a parameter for which a positional argument has already been given",
                self.name
            ),
        )
    }
}

pub struct NoOverload {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for NoOverload {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!(
                "no overload for function '{}' matches parameter list",
                self.name
            ),
        )
    }
}

/// More than one overload ties for the lowest conversion score.
pub struct AmbiguousOverload {
    pub name: String,
    pub candidates: Vec<String>,
    pub span: Span,
}

impl IntoDiagnostic for AmbiguousOverload {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!(
                "multiple overloads for function '{}' match parameter list",
                self.name
            ))
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
            .with_notes(
                self.candidates
                    .iter()
                    .map(|candidate| format!("candidate: {}", candidate))
                    .collect(),
            )
    }
}
