//! Type errors.

use plover_reporting::{Diagnostic, IntoDiagnostic, Label};
use plover_span::Span;

use super::simple_error;

/// No conversion exists between the two types.
pub struct CannotConvert {
    pub from: String,
    pub to: String,
    pub span: Span,
}

impl IntoDiagnostic for CannotConvert {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!("cannot convert from type '{}' to '{}'", self.from, self.to),
        )
    }
}

/// A conversion exists but needs a cast expression.
pub struct CannotConvertImplicitly {
    pub from: String,
    pub to: String,
    pub span: Span,
}

impl IntoDiagnostic for CannotConvertImplicitly {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!(
                "cannot convert from type '{}' to '{}' implicitly",
                self.from, self.to
            ))
            .with_labels(vec![Label::primary(file_id, self.span.clone())
                .with_message("an explicit conversion exists")])
            .with_notes(vec![format!(
                "add an explicit cast: ({}){{expression}}",
                self.to
            )])
    }
}

/// A void expression where a value is required.
pub struct NoValue {
    pub span: Span,
}

impl IntoDiagnostic for NoValue {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(file_id, &self.span, "expression must have a value".to_string())
    }
}

pub struct InvalidUnaryOperatorUse {
    pub op: String,
    pub operand: String,
    pub span: Span,
}

impl IntoDiagnostic for InvalidUnaryOperatorUse {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!(
                "operator '{}' is not defined for type '{}'",
                self.op, self.operand
            ),
        )
    }
}

pub struct InvalidBinaryOperatorUse {
    pub op: String,
    pub left: String,
    pub right: String,
    pub span: Span,
}

impl IntoDiagnostic for InvalidBinaryOperatorUse {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!(
                "operator '{}' is not defined for types '{}' and '{}'",
                self.op, self.left, self.right
            ),
        )
    }
}

pub struct InvalidTernaryOperatorUse {
    pub op: String,
    pub left: String,
    pub center: String,
    pub right: String,
    pub span: Span,
}

impl IntoDiagnostic for InvalidTernaryOperatorUse {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!(
                "operator '{}' is not defined for types '{}', '{}', and '{}'",
                self.op, self.left, self.center, self.right
            ),
        )
    }
}

/// `is` and `isnt` only compare against `null`.
pub struct UnsupportedIsOperator {
    pub span: Span,
}

impl IntoDiagnostic for UnsupportedIsOperator {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "cannot use 'is' or 'isnt' operators against non-null values".to_string(),
        )
    }
}

pub struct CannotApplyIndexing {
    pub ty: String,
    pub span: Span,
}

impl IntoDiagnostic for CannotApplyIndexing {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!(
                "cannot apply indexing with [] to an expression of type '{}'",
                self.ty
            ),
        )
    }
}

pub struct NullAssignOnNotNull {
    pub span: Span,
}

impl IntoDiagnostic for NullAssignOnNotNull {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "cannot assign null to non-nullable variable".to_string(),
        )
    }
}

pub struct DivideByZero {
    pub span: Span,
}

impl IntoDiagnostic for DivideByZero {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("cannot divide by zero")
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message("divisor is zero")
            ])
    }
}

/// A numeric literal that does not fit its type.
pub struct InvalidLiteral {
    pub text: String,
    pub span: Span,
}

impl IntoDiagnostic for InvalidLiteral {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(file_id, &self.span, format!("invalid literal '{}'", self.text))
    }
}
