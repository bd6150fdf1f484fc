use std::fs;
use std::io;
use std::path::Path;

use crate::compilation::Compilation;
use crate::error::CompilationResult;
use crate::options::CompilationOptions;

/// Builder for creating a `Compilation`.
///
/// Add source files from strings or file paths, then call `build()` to bind
/// them all as one submission.
#[derive(Debug, Default)]
pub struct CompilationBuilder {
    options: CompilationOptions,
    sources: Vec<(String, String)>,
}

impl CompilationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: CompilationOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a source file from a string.
    ///
    /// # Example
    /// ```no_run
    /// # use plover_compiler::CompilationBuilder;
    /// let builder = CompilationBuilder::new()
    ///     .add_source("main.plv", "int main() { return 0; }");
    /// ```
    pub fn add_source(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.sources.push((name.into(), source.into()));
        self
    }

    /// Add a source file from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn add_file(mut self, path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string();
        self.sources.push((name, source));
        Ok(self)
    }

    /// Lex, parse and bind every source.
    ///
    /// Diagnostics about the sources are collected on the compilation; an
    /// `Err` means the compiler itself failed.
    pub fn build(self) -> CompilationResult<Compilation> {
        Compilation::from_sources(self.options, None, self.sources)
    }
}
