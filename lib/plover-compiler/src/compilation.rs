use std::rc::Rc;

use plover_binder::{bind_global_scope, bind_program, BoundGlobalScope, BoundProgram, SourceTree};
use plover_lexer::lex;
use plover_parser::{parse_compilation_unit, Parser};
use plover_reporting::{Diagnostic, DiagnosticContext, DiagnosticQueue, IntoDiagnostic, Label};
use plover_span::Span;
use plover_syntax_tree::ast::{AstNode, CompilationUnit};
use tracing::debug;

use crate::error::{CompilationError, CompilationResult};
use crate::options::CompilationOptions;
use crate::source_file::SourceFile;

/// One bound submission.
///
/// A compilation holds the global scope and program of its sources plus a
/// link to the submission it continued, if any. Created via
/// `Compilation::builder()` or [`Compilation::continue_with`].
pub struct Compilation {
    options: CompilationOptions,
    source_files: Vec<SourceFile>,
    global_scope: Rc<BoundGlobalScope>,
    program: Rc<BoundProgram>,
    diagnostics: DiagnosticContext,
}

/// The previous submission's global scope and program.
type Previous = (Rc<BoundGlobalScope>, Rc<BoundProgram>);

impl Compilation {
    /// Create a new compilation builder.
    ///
    /// # Example
    /// ```no_run
    /// # use plover_compiler::Compilation;
    /// let compilation = Compilation::builder()
    ///     .add_source("main.plv", "int main() { return 0; }")
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> crate::CompilationBuilder {
        crate::CompilationBuilder::new()
    }

    pub(crate) fn from_sources(
        options: CompilationOptions,
        previous: Option<Previous>,
        sources: Vec<(String, String)>,
    ) -> CompilationResult<Self> {
        let mut diagnostics = DiagnosticContext::new();
        let mut source_files = Vec::new();
        let mut trees = Vec::new();

        for (name, source) in sources {
            let file_id = diagnostics.add_file(name.clone(), source.clone());
            let (root, queue) = parse(&source, file_id);
            let unit = CompilationUnit::cast(root.clone())
                .ok_or_else(|| CompilationError::MissingCompilationUnit(name.clone()))?;

            trees.push(SourceTree {
                file_id,
                root: unit,
                diagnostics: queue,
            });
            source_files.push(SourceFile::new(name, source, file_id, root));
        }

        let (previous_scope, previous_program) = previous.unzip();
        let binder_options = options.binder_options();
        let global_scope = bind_global_scope(binder_options, previous_scope, &trees)?;
        let program = bind_program(binder_options, previous_program, &global_scope)?;

        let mut queue = global_scope.diagnostics.clone();
        queue.extend(program.diagnostics.iter().cloned());
        if options.warnings_as_errors {
            queue.promote_warnings();
        }
        diagnostics.report(&queue);

        debug!(
            files = source_files.len(),
            diagnostics = diagnostics.len(),
            errors = diagnostics.has_errors(),
            "compiled submission"
        );

        Ok(Self {
            options,
            source_files,
            global_scope: Rc::new(global_scope),
            program: Rc::new(program),
            diagnostics,
        })
    }

    /// Bind `sources` as the next submission.
    ///
    /// The new submission sees every declaration of this one and may shadow
    /// them. Options carry over.
    pub fn continue_with(
        &self,
        sources: impl IntoIterator<Item = (String, String)>,
    ) -> CompilationResult<Compilation> {
        debug!("continuing submission");
        let previous = (self.global_scope.clone(), self.program.clone());
        Self::from_sources(self.options, Some(previous), sources.into_iter().collect())
    }

    pub fn options(&self) -> CompilationOptions {
        self.options
    }

    /// Get all source files of this submission.
    pub fn source_files(&self) -> &[SourceFile] {
        &self.source_files
    }

    /// Get a specific source file by name.
    pub fn get_source_file(&self, name: &str) -> Option<&SourceFile> {
        self.source_files.iter().find(|file| file.name() == name)
    }

    pub fn global_scope(&self) -> &BoundGlobalScope {
        &self.global_scope
    }

    /// Lowered bodies. Empty when the global scope has errors.
    pub fn program(&self) -> &BoundProgram {
        &self.program
    }

    pub fn diagnostics(&self) -> &DiagnosticContext {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Lex and parse one file, collecting its problems as diagnostics.
fn parse(source: &str, file_id: usize) -> (plover_syntax_tree::SyntaxNode, DiagnosticQueue) {
    let mut queue = DiagnosticQueue::new();

    let tokens: Vec<_> = lex(source)
        .filter_map(|result| match result {
            Ok(spanned) => Some((spanned.value, spanned.span)),
            Err(error) => {
                queue.push(LexError { span: error.span }, file_id);
                None
            }
        })
        .collect();

    let result = Parser::parse(source, tokens.into_iter(), parse_compilation_unit);
    for error in result.errors {
        queue.push(
            ParseErrorDiagnostic {
                message: error.message,
                span: error.span,
            },
            file_id,
        );
    }
    (result.tree, queue)
}

struct LexError {
    span: Span,
}

impl IntoDiagnostic for LexError {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("invalid token")
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message("unrecognized token")
            ])
    }
}

struct ParseErrorDiagnostic {
    message: String,
    span: Option<Span>,
}

impl IntoDiagnostic for ParseErrorDiagnostic {
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::error().with_message(&self.message);
        match &self.span {
            Some(span) => diagnostic.with_labels(vec![
                Label::primary(file_id, span.clone()).with_message("error occurred here")
            ]),
            None => diagnostic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(compilation: &Compilation) -> Vec<String> {
        compilation
            .diagnostics()
            .diagnostics()
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }

    #[test]
    fn test_clean_compilation() {
        let compilation = Compilation::builder()
            .add_source("main.plv", "int main() { return 0; }")
            .build()
            .unwrap();

        assert!(!compilation.has_errors(), "{:?}", messages(&compilation));
        assert!(compilation.get_source_file("main.plv").is_some());
        assert!(compilation.program().body("main").is_some());
    }

    #[test]
    fn test_lex_error_stops_binding() {
        let compilation = Compilation::builder()
            .add_source("main.plv", "int x = 1 # 2;")
            .build()
            .unwrap();

        assert_eq!(messages(&compilation)[0], "invalid token");
        assert!(compilation.global_scope().functions.is_empty());
        assert!(compilation.program().functions.is_empty());
    }

    #[test]
    fn test_warnings_as_errors() {
        let source = "void main() { if (false) { PrintLine(); } }";
        let lenient = Compilation::builder().add_source("a.plv", source).build().unwrap();
        assert!(!lenient.has_errors());
        assert_eq!(lenient.diagnostics().len(), 1);

        let strict = Compilation::builder()
            .options(CompilationOptions::new().warnings_as_errors(true))
            .add_source("a.plv", source)
            .build()
            .unwrap();
        assert!(strict.has_errors());
    }

    #[test]
    fn test_continue_with() {
        let options = CompilationOptions::new().script_mode(true);
        let first = Compilation::builder()
            .options(options)
            .add_source("1", "int Square(int x) { return x * x; }")
            .build()
            .unwrap();
        let second = first
            .continue_with([("2".to_string(), "Square(4);".to_string())])
            .unwrap();

        assert!(!second.has_errors(), "{:?}", messages(&second));
        assert!(second.program().body("Square").is_some());
        assert!(second.global_scope().script_function.is_some());
    }
}
