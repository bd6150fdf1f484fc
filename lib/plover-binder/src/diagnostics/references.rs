//! Reference and constness errors.

use plover_reporting::{Diagnostic, IntoDiagnostic, Label};
use plover_span::Span;

use super::simple_error;

pub struct ReferenceNoInitialization {
    pub span: Span,
}

impl IntoDiagnostic for ReferenceNoInitialization {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "reference variable must have an initializer".to_string(),
        )
    }
}

/// A `ref` variable initialized from something other than a `ref` expression.
pub struct ReferenceWrongInitialization {
    pub span: Span,
}

impl IntoDiagnostic for ReferenceWrongInitialization {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("reference variable must be initialized with a reference")
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
            .with_notes(vec!["write 'ref name' to take a reference".to_string()])
    }
}

/// A plain variable initialized from a `ref` expression.
pub struct WrongInitializationReference {
    pub span: Span,
}

impl IntoDiagnostic for WrongInitializationReference {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "cannot initialize variable with reference".to_string(),
        )
    }
}

pub struct ReferenceToConstant {
    pub is_constant: bool,
    pub span: Span,
}

impl IntoDiagnostic for ReferenceToConstant {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let word = if self.is_constant { "constant" } else { "variable" };
        simple_error(
            file_id,
            &self.span,
            format!(
                "cannot assign a reference to a constant to a by-reference {} expecting a reference to a variable",
                word
            ),
        )
    }
}

pub struct ConstantReferenceToNonConstant {
    pub is_constant: bool,
    pub span: Span,
}

impl IntoDiagnostic for ConstantReferenceToNonConstant {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let word = if self.is_constant { "constant" } else { "variable" };
        simple_error(
            file_id,
            &self.span,
            format!(
                "cannot assign a reference to a variable to a by-reference {} expecting a reference to a constant",
                word
            ),
        )
    }
}

pub struct ConstantAssignment {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for ConstantAssignment {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!(
                "'{}' cannot be assigned to as it is a constant",
                self.name
            ))
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
    }
}

/// The left side of an assignment is not a variable, field or index.
pub struct CannotAssign {
    pub span: Span,
}

impl IntoDiagnostic for CannotAssign {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "left side of assignment operation must be a variable, field, or indexer".to_string(),
        )
    }
}
