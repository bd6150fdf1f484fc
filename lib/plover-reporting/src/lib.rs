use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use std::collections::HashMap;

// Re-export commonly used types from codespan_reporting
pub use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// Trait for types that can be converted into a diagnostic.
/// Implement this for your error types to integrate with the reporting system.
pub trait IntoDiagnostic {
    /// Convert this error into a codespan diagnostic.
    fn into_diagnostic(&self, file_id: usize) -> Diagnostic<usize>;
}

fn is_error(diagnostic: &Diagnostic<usize>) -> bool {
    diagnostic.severity == Severity::Error || diagnostic.severity == Severity::Bug
}

/// An ordered queue of diagnostics owned by one producer at a time.
///
/// Queues are never shared: a producer hands its diagnostics to another with
/// [`DiagnosticQueue::move_from`] or by moving the whole queue. Speculative
/// work records [`DiagnosticQueue::checkpoint`] and rolls back with
/// [`DiagnosticQueue::rollback`].
#[derive(Debug, Clone, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic<usize>>,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a diagnostic raised in `file_id`.
    pub fn push<D: IntoDiagnostic>(&mut self, diagnostic: D, file_id: usize) {
        self.diagnostics.push(diagnostic.into_diagnostic(file_id));
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic<usize>) {
        self.diagnostics.push(diagnostic);
    }

    /// Drain every diagnostic of `other` onto the end of this queue.
    pub fn move_from(&mut self, other: &mut DiagnosticQueue) {
        self.diagnostics.append(&mut other.diagnostics);
    }

    /// Take the contents, leaving this queue empty.
    pub fn take(&mut self) -> DiagnosticQueue {
        std::mem::take(self)
    }

    pub fn checkpoint(&self) -> usize {
        self.diagnostics.len()
    }

    /// Discard everything pushed since `checkpoint`, returning it.
    pub fn rollback(&mut self, checkpoint: usize) -> Vec<Diagnostic<usize>> {
        self.diagnostics.split_off(checkpoint.min(self.diagnostics.len()))
    }

    /// Whether anything was pushed since `checkpoint`.
    pub fn grew_since(&self, checkpoint: usize) -> bool {
        self.diagnostics.len() > checkpoint
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic<usize>> {
        self.diagnostics.iter().filter(|d| is_error(d))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic<usize>> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Turn every warning into an error.
    pub fn promote_warnings(&mut self) {
        for diagnostic in &mut self.diagnostics {
            if diagnostic.severity == Severity::Warning {
                diagnostic.severity = Severity::Error;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic<usize>> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic<usize>> {
        self.diagnostics
    }
}

impl Extend<Diagnostic<usize>> for DiagnosticQueue {
    fn extend<T: IntoIterator<Item = Diagnostic<usize>>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}

/// Context for managing and reporting diagnostics.
/// This struct owns the source files and can emit diagnostics to the terminal.
pub struct DiagnosticContext {
    files: SimpleFiles<String, String>,
    diagnostics: Vec<Diagnostic<usize>>,
    file_map: HashMap<String, usize>,
}

impl DiagnosticContext {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            diagnostics: Vec::new(),
            file_map: HashMap::new(),
        }
    }

    /// Add a source file to the context.
    /// Returns the file ID that can be used when creating diagnostics.
    pub fn add_file(&mut self, name: String, source: String) -> usize {
        if let Some(&id) = self.file_map.get(&name) {
            return id;
        }
        let id = self.files.add(name.clone(), source);
        self.file_map.insert(name, id);
        id
    }

    /// Add every diagnostic of a queue, in order.
    pub fn report(&mut self, queue: &DiagnosticQueue) {
        self.diagnostics.extend(queue.iter().cloned());
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(is_error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Emit all diagnostics to stderr with color support.
    pub fn emit(&self) -> Result<(), codespan_reporting::files::Error> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();

        for diagnostic in &self.diagnostics {
            term::emit(&mut writer.lock(), &config, &self.files, diagnostic)?;
        }

        Ok(())
    }

    /// Emit all diagnostics to a custom writer.
    pub fn emit_to<W: term::termcolor::WriteColor>(
        &self,
        writer: &mut W,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = codespan_reporting::term::Config::default();

        for diagnostic in &self.diagnostics {
            term::emit(writer, &config, &self.files, diagnostic)?;
        }

        Ok(())
    }

    pub fn diagnostics(&self) -> &[Diagnostic<usize>] {
        &self.diagnostics
    }
}

impl Default for DiagnosticContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper macro to create a simple diagnostic.
#[macro_export]
macro_rules! diagnostic {
    (error, $($args:tt)*) => {
        $crate::Diagnostic::error().with_message(format!($($args)*))
    };
    (warning, $($args:tt)*) => {
        $crate::Diagnostic::warning().with_message(format!($($args)*))
    };
}
