//! Declaration errors.

use plover_reporting::{Diagnostic, IntoDiagnostic, Label};
use plover_span::Span;

use super::simple_error;

/// A variable name already taken in the same scope.
pub struct AlreadyDeclared {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for AlreadyDeclared {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(file_id, &self.span, format!("redefinition of '{}'", self.name))
    }
}

pub struct ParameterAlreadyDeclared {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for ParameterAlreadyDeclared {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!("redefinition of parameter '{}'", self.name),
        )
    }
}

/// A function whose signature duplicates one already in scope.
pub struct FunctionAlreadyDeclared {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for FunctionAlreadyDeclared {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(format!("redefinition of function '{}'", self.name))
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
            .with_notes(vec![
                "overloads must differ in their parameter types".to_string()
            ])
    }
}

pub struct StructAlreadyDeclared {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for StructAlreadyDeclared {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!("redefinition of struct '{}'", self.name),
        )
    }
}

pub struct DefaultBeforeNoDefault {
    pub span: Span,
}

impl IntoDiagnostic for DefaultBeforeNoDefault {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "all optional parameters must be specified after any required parameters".to_string(),
        )
    }
}

pub struct DefaultMustBeConstant {
    pub span: Span,
}

impl IntoDiagnostic for DefaultMustBeConstant {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "default values for parameters must be compile-time constants".to_string(),
        )
    }
}

/// Two local functions with one name in the same block.
pub struct CannotOverloadNested {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for CannotOverloadNested {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!(
                "cannot overload nested functions; nested function '{}' has already been defined",
                self.name
            ),
        )
    }
}

pub struct NameUsedInEnclosingScope {
    pub name: String,
    pub span: Span,
}

impl IntoDiagnostic for NameUsedInEnclosingScope {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            format!(
                "a local named '{}' cannot be declared in this scope because that name is used in an enclosing scope to define a local or parameter",
                self.name
            ),
        )
    }
}

pub struct VoidVariable {
    pub span: Span,
}

impl IntoDiagnostic for VoidVariable {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(file_id, &self.span, "cannot use void as a type".to_string())
    }
}

pub struct NoInitOnImplicit {
    pub span: Span,
}

impl IntoDiagnostic for NoInitOnImplicit {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "implicitly-typed variable must have initializer".to_string(),
        )
    }
}

pub struct NullAssignOnImplicit {
    pub span: Span,
}

impl IntoDiagnostic for NullAssignOnImplicit {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "cannot assign 'null' to an implicitly-typed variable".to_string(),
        )
    }
}

pub struct EmptyInitializerListOnImplicit {
    pub span: Span,
}

impl IntoDiagnostic for EmptyInitializerListOnImplicit {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "cannot assign empty initializer list to an implicitly-typed variable".to_string(),
        )
    }
}

pub struct NullInitializerListOnImplicit {
    pub span: Span,
}

impl IntoDiagnostic for NullInitializerListOnImplicit {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "cannot initialize an implicitly-typed variable with an initializer list only containing 'null'"
                .to_string(),
        )
    }
}

/// `var x[]` style declarations; the rank comes from the initializer.
pub struct ImpliedDimensions {
    pub span: Span,
}

impl IntoDiagnostic for ImpliedDimensions {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        simple_error(
            file_id,
            &self.span,
            "collection dimensions are inferred and not necessary".to_string(),
        )
    }
}
