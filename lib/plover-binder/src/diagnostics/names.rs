//! Name resolution errors.

use plover_reporting::{Diagnostic, IntoDiagnostic, Label};
use plover_span::Span;

use super::simple_error;

/// A name that resolves to nothing in scope.
pub struct UndefinedName {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for UndefinedName {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!("undefined symbol '{}'", self.name))
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message("not found in this scope")
            ])
    }
}

/// A function or type used where a variable is required.
pub struct NotAVariable {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for NotAVariable {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!("function '{}' used as a variable", self.name),
        )
    }
}

pub struct UndefinedFunction {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for UndefinedFunction {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!("undefined function '{}'", self.name))
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message("no function with this name")
            ])
    }
}

pub struct CannotCallNonFunction {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for CannotCallNonFunction {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!("called object '{}' is not a function", self.name),
        )
    }
}

pub struct UnknownType {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for UnknownType {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(file_id, &self.span, format!("unknown type '{}'", self.name))
    }
}

/// Member access naming a field the struct does not declare.
pub struct NoSuchMember {
    pub ty: String,
    pub member: String,
    pub span: Span,
}

impl IntoDiagnostic for NoSuchMember {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!("'{}' contains no such member '{}'", self.ty, self.member),
        )
    }
}

pub struct UnknownAttribute {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for UnknownAttribute {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!("unknown attribute '{}'", self.name))
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
            .with_notes(vec!["the only supported attribute is 'NotNull'".to_string()])
    }
}
