//! # Plover Compiler
//!
//! A high-level compilation API for Plover, shaped after Roslyn's
//! `Compilation`.
//!
//! ## Example
//!
//! ```no_run
//! use plover_compiler::Compilation;
//!
//! let compilation = Compilation::builder()
//!     .add_source("main.plv", "int main() { return Twice(21) - 42; }")
//!     .add_source("util.plv", "int Twice(int x) { return x * 2; }")
//!     .build()
//!     .unwrap();
//!
//! if compilation.has_errors() {
//!     compilation.diagnostics().emit().unwrap();
//!     std::process::exit(1);
//! }
//!
//! for (function, body) in &compilation.program().functions {
//!     println!("{}:\n{}", function, body);
//! }
//! ```

mod builder;
mod compilation;
mod error;
mod options;
mod source_file;

pub use builder::CompilationBuilder;
pub use compilation::Compilation;
pub use error::{CompilationError, CompilationResult};
pub use options::CompilationOptions;
pub use source_file::SourceFile;

// Re-export commonly used types from dependencies
pub use plover_binder::{BoundGlobalScope, BoundProgram, ControlFlowGraph};
pub use plover_bound_tree::{BoundBlockStatement, FunctionSymbol};
pub use plover_reporting::{Diagnostic, DiagnosticContext, IntoDiagnostic, Label, Severity};
pub use plover_syntax_tree::SyntaxNode;
