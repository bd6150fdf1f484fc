//! Control flow and entry point errors.

use plover_reporting::{Diagnostic, IntoDiagnostic, Label};
use plover_span::Span;

use super::simple_error;

/// `break` or `continue` with no enclosing loop.
pub struct InvalidBreakOrContinue {
    pub keyword: String,
    pub span: Span,
}

impl IntoDiagnostic for InvalidBreakOrContinue {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!("{} statement not within a loop", self.keyword),
        )
    }
}

pub struct NotAllPathsReturn {
    pub function: String,
    pub span: Span,
}

impl IntoDiagnostic for NotAllPathsReturn {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("not all code paths return a value")
            .with_labels(vec![Label::primary(file_id, self.span.clone())
                .with_message(format!("'{}' can reach its end without returning", self.function))])
    }
}

pub struct ReturnOutsideFunction {
    pub span: Span,
}

impl IntoDiagnostic for ReturnOutsideFunction {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "global return cannot return a value".to_string(),
        )
    }
}

pub struct UnexpectedReturnValue {
    pub span: Span,
}

impl IntoDiagnostic for UnexpectedReturnValue {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "return statement with a value, in function returning void".to_string(),
        )
    }
}

pub struct MissingReturnValue {
    pub span: Span,
}

impl IntoDiagnostic for MissingReturnValue {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "return statement with no value, in function returning non-void".to_string(),
        )
    }
}

pub struct InvalidMainReturnType {
    pub span: Span,
}

impl IntoDiagnostic for InvalidMainReturnType {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("invalid main signature: must return void or int")
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
    }
}

pub struct InvalidMainParameters {
    pub span: Span,
}

impl IntoDiagnostic for InvalidMainParameters {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("invalid main signature: must take no arguments")
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
    }
}

/// Both a `main` function and global statements.
pub struct MainAndGlobals {
    pub span: Span,
}

impl IntoDiagnostic for MainAndGlobals {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "declaring a main function and using global statements creates ambiguous entry point"
                .to_string(),
        )
    }
}

pub struct GlobalStatementsInMultipleFiles {
    pub span: Span,
}

impl IntoDiagnostic for GlobalStatementsInMultipleFiles {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "multiple files with global statements creates ambiguous entry point".to_string(),
        )
    }
}

pub struct InvalidExpressionStatement {
    pub span: Span,
}

impl IntoDiagnostic for InvalidExpressionStatement {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "only assignment and call expressions can be used as a statement".to_string(),
        )
    }
}

pub struct TryMustHaveCatchOrFinally {
    pub span: Span,
}

impl IntoDiagnostic for TryMustHaveCatchOrFinally {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "try statement must have a catch or finally".to_string(),
        )
    }
}
